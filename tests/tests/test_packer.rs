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

use packwire::{ArrayPool, ByteBlock, CompressionKind, Config, Error, FormatterResolver, PackObject, Packer};
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Arc;
use tests::{init_tracing, test_roundtrip};

#[derive(PackObject, Debug, PartialEq, Clone)]
struct Event {
    id: u64,
    source: String,
    payload: Vec<u8>,
    attributes: HashMap<String, String>,
}

fn event(id: u64) -> Event {
    Event {
        id,
        source: format!("sensor-{}", id % 4),
        payload: vec![(id % 251) as u8; 64],
        attributes: HashMap::from([("zone".to_string(), "east".to_string())]),
    }
}

#[test]
fn test_uncompressed_and_compressed_round_trips() {
    init_tracing();
    let plain = Packer::default();
    let lz4 = Packer::default().compression(CompressionKind::Lz4);
    let events: Vec<Event> = (0..100).map(event).collect();

    let plain_bytes = test_roundtrip(&plain, events.clone());
    let lz4_bytes = test_roundtrip(&lz4, events);
    assert!(lz4_bytes.len() < plain_bytes.len() / 2);
}

#[test]
fn test_compression_kind_must_match() {
    let lz4 = Packer::default().compression(CompressionKind::Lz4);
    let plain = Packer::default();
    let bytes = lz4.serialize(&"x".repeat(500)).unwrap();
    assert!(plain.deserialize::<String>(&bytes).is_err());
}

#[test]
fn test_corrupt_compressed_payload() {
    let lz4 = Packer::default().compression(CompressionKind::Lz4);
    let mut bytes = lz4.serialize(&vec![7u32; 1000]).unwrap();
    let last = bytes.len() - 1;
    bytes.truncate(last - 3);
    assert!(matches!(lz4.deserialize::<Vec<u32>>(&bytes), Err(Error::Corrupted(_))));
}

#[test]
fn test_config_builds_private_pool() {
    let config = Config {
        max_pooled_array_len: 4096,
        max_arrays_per_bucket: 2,
        ..Config::new()
    };
    let packer = Packer::new(config);
    assert!(!Arc::ptr_eq(packer.pool(), ArrayPool::shared()));
    assert_eq!(packer.pool().max_array_len(), 4096);
    packer.serialize(&event(1)).unwrap();
    assert!(packer.pool().rented() >= 1);
    assert_eq!(packer.pool().rented(), packer.pool().returned());

    let default = Packer::new(Config::default());
    assert!(Arc::ptr_eq(default.pool(), ArrayPool::shared()));
}

#[test]
fn test_private_resolver() {
    let resolver = Arc::new(FormatterResolver::new());
    let packer = Packer::default().with_resolver(resolver.clone());
    assert!(resolver.is_empty());
    packer.serialize(&event(2)).unwrap();
    assert!(resolver.contains::<Event>());
    assert!(resolver.contains::<HashMap<String, String>>());
    let len = resolver.len();
    packer.serialize(&event(3)).unwrap();
    assert_eq!(resolver.len(), len);
}

#[test]
fn test_stream_helpers() {
    let packer = Packer::default();
    let mut sink = Vec::new();
    let written = packer.serialize_to_writer(&event(4), &mut sink).unwrap();
    assert_eq!(written, sink.len());
    let back: Option<Event> = packer.deserialize_from_reader(Cursor::new(sink)).unwrap();
    assert_eq!(back, Some(event(4)));
    assert_eq!(packer.deserialize_from_reader::<Event, _>(Cursor::new(Vec::new())).unwrap(), None);
}

#[test]
fn test_compressed_block_is_consumed_whole() {
    let packer = Packer::default().compression(CompressionKind::Lz4);
    let mut block = ByteBlock::new();
    packer.serialize_to_block(&event(5), &mut block).unwrap();
    let back = packer.deserialize_block::<Event>(&mut block).unwrap();
    assert_eq!(back, Some(event(5)));
    assert_eq!(block.remaining(), 0);
}

#[test]
fn test_depth_limit_applies_to_typed_reads() {
    let nested = vec![vec![vec![1u8]]];
    let bytes = Packer::default().serialize(&nested).unwrap();
    let shallow = Packer::default().max_depth(2);
    assert!(matches!(
        shallow.deserialize::<Vec<Vec<Vec<u8>>>>(&bytes),
        Err(Error::DepthExceed(_))
    ));
    assert_eq!(Packer::default().max_depth(3).deserialize(&bytes).unwrap(), Some(nested));
}

#[test]
fn test_lengths() {
    let packer = Packer::default();
    let value = event(6);
    assert_eq!(packer.get_length(&value).unwrap(), packer.serialize(&value).unwrap().len());
    assert_eq!(packer.get_default_length::<String>().unwrap(), 16);
}
