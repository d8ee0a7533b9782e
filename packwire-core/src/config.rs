// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use crate::memory::{DEFAULT_MAX_ARRAYS_PER_BUCKET, DEFAULT_MAX_ARRAY_LEN};
use crate::types::CompressionKind;

/// Configuration for packwire serialization.
///
/// Shared by a [`Packer`](crate::packer::Packer) and everything it hands
/// blocks to, so that encoding, decoding and compression agree.
#[derive(Clone, Debug)]
pub struct Config {
    /// Compression applied by `serialize` and expected by `deserialize`.
    pub compression: CompressionKind,
    /// Size of the first array rented for an output block.
    pub initial_block_size: usize,
    /// Maximum nesting depth when decoding dynamic values or skipping.
    pub max_depth: u32,
    /// Largest original length an LZ4 payload may declare.
    pub max_decompressed_len: usize,
    /// Largest array the packer's pool retains.
    pub max_pooled_array_len: usize,
    /// Arrays retained per pool size class.
    pub max_arrays_per_bucket: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            compression: CompressionKind::None,
            initial_block_size: 256,
            max_depth: 64,
            max_decompressed_len: 256 * 1024 * 1024,
            max_pooled_array_len: DEFAULT_MAX_ARRAY_LEN,
            max_arrays_per_bucket: DEFAULT_MAX_ARRAYS_PER_BUCKET,
        }
    }
}

impl Config {
    /// Creates a new Config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn compression(&self) -> CompressionKind {
        self.compression
    }

    #[inline(always)]
    pub fn is_compressed(&self) -> bool {
        self.compression != CompressionKind::None
    }

    #[inline(always)]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    #[inline(always)]
    pub fn max_decompressed_len(&self) -> usize {
        self.max_decompressed_len
    }
}
