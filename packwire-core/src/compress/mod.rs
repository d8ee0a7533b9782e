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

//! Payload compression.
//!
//! An LZ4 payload is a MessagePack unsigned integer holding the original
//! length, followed by one LZ4 block. Nothing records which kind was used,
//! so the reader must be told the same [`CompressionKind`] as the writer.

pub mod lz4;

use crate::buffer::ByteBlock;
use crate::codec::{read, write};
use crate::error::Error;
use crate::memory::{ArrayPool, BlockProvider};
use crate::types::CompressionKind;
use std::sync::Arc;

/// Compresses `input` into a block rented from the shared pool.
pub fn compress(kind: CompressionKind, input: &[u8]) -> Result<ByteBlock<'static>, Error> {
    compress_in(ArrayPool::shared().clone(), kind, input)
}

/// Compresses `input` into a block rented from `provider`.
pub fn compress_in(
    provider: Arc<dyn BlockProvider<u8>>,
    kind: CompressionKind,
    input: &[u8],
) -> Result<ByteBlock<'static>, Error> {
    match kind {
        CompressionKind::None => Ok(ByteBlock::from_bytes_in(provider, input)),
        CompressionKind::Lz4 => {
            let original_len = input.len() as u64;
            let bound = lz4::max_compressed_len(input.len());
            let mut block = ByteBlock::with_provider(provider, write::uint_len(original_len) + bound);
            write::write_u64(&mut block, original_len)?;
            let span = block.get_span(bound)?;
            let written = lz4::encode(input, span)?;
            block.advance(written)?;
            Ok(block)
        }
    }
}

/// Reverses [`compress`]. An LZ4 payload may not declare an original
/// length above `max_len`.
pub fn decompress(kind: CompressionKind, input: &[u8], max_len: usize) -> Result<ByteBlock<'static>, Error> {
    decompress_in(ArrayPool::shared().clone(), kind, input, max_len)
}

/// Reverses [`compress_in`], renting the output from `provider`.
pub fn decompress_in(
    provider: Arc<dyn BlockProvider<u8>>,
    kind: CompressionKind,
    input: &[u8],
    max_len: usize,
) -> Result<ByteBlock<'static>, Error> {
    match kind {
        CompressionKind::None => Ok(ByteBlock::from_bytes_in(provider, input)),
        CompressionKind::Lz4 => {
            let (declared, consumed) = read::try_read_u64(input)?;
            let original_len = usize::try_from(declared)
                .ok()
                .filter(|&len| len <= max_len)
                .ok_or_else(|| {
                    Error::invalid_format(format!(
                        "compressed payload declares {declared} bytes, limit is {max_len}"
                    ))
                })?;
            let mut block = ByteBlock::with_provider(provider, original_len);
            let span = block.get_span(original_len)?;
            let written = lz4::decode(&input[consumed..], &mut span[..original_len])?;
            block.advance(written)?;
            Ok(block)
        }
    }
}
