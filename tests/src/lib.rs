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

//! Shared helpers for the integration tests.

use packwire_core::formatter::Formatter;
use packwire_core::packer::Packer;
use std::fmt::Debug;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Installs a test-writer subscriber filtered by `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Serializes `value`, checks the reported length, and reads it back.
pub fn test_roundtrip<T>(packer: &Packer, value: T) -> Vec<u8>
where
    T: Formatter + PartialEq + Debug,
{
    let bytes = packer.serialize(&value).unwrap();
    if !packer.config().is_compressed() {
        assert_eq!(packer.get_length(&value).unwrap(), bytes.len());
    }
    let result: Option<T> = packer.deserialize(&bytes).unwrap();
    assert_eq!(result, Some(value));
    bytes
}

/// Uncompressed encoding of `value`.
pub fn encode<T: Formatter>(value: &T) -> Vec<u8> {
    Packer::default().serialize(value).unwrap()
}
