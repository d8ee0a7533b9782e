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

use bytes::Bytes;
use packwire_core::buffer::ByteBlock;
use packwire_core::error::Error;
use packwire_core::formatter::{Extension, Formatter, Outcome, Value, ValueOutcome};
use packwire_core::packer::Packer;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tests::{encode, test_roundtrip};
use uuid::Uuid;

#[test]
fn test_numbers() {
    let packer = Packer::default();
    assert_eq!(test_roundtrip(&packer, 0u8), vec![0x00]);
    assert_eq!(test_roundtrip(&packer, 300u16), vec![0xcd, 0x01, 0x2c]);
    assert_eq!(test_roundtrip(&packer, -1i32), vec![0xff]);
    assert_eq!(test_roundtrip(&packer, 5i64), vec![0x05]);
    test_roundtrip(&packer, u64::MAX);
    test_roundtrip(&packer, i64::MIN);
    test_roundtrip(&packer, usize::MAX);
    test_roundtrip(&packer, isize::MIN);
    assert_eq!(test_roundtrip(&packer, 1.5f32), vec![0xca, 0x3f, 0xc0, 0, 0]);
    test_roundtrip(&packer, -0.125f64);
}

#[test]
fn test_integer_narrowing_is_checked() {
    let packer = Packer::default();
    let wide = encode(&70_000u32);
    assert!(matches!(packer.deserialize::<u16>(&wide), Err(Error::InvalidFormat(_))));
    let negative = encode(&-5i32);
    assert!(packer.deserialize::<u64>(&negative).is_err());
    assert_eq!(packer.deserialize::<i8>(&encode(&100u64)).unwrap(), Some(100));
}

#[test]
fn test_text_and_scalars() {
    let packer = Packer::default();
    assert_eq!(test_roundtrip(&packer, true), vec![0xc3]);
    test_roundtrip(&packer, 'é');
    test_roundtrip(&packer, String::from("hello"));
    test_roundtrip(&packer, "x".repeat(40));
    test_roundtrip(&packer, Box::<str>::from("boxed"));
    assert!(packer.deserialize::<char>(&encode(&0xd800u32)).is_err());
}

#[test]
fn test_binary_versus_byte_vectors() {
    let packer = Packer::default();
    let bin = test_roundtrip(&packer, Bytes::from_static(&[1, 2, 3]));
    assert_eq!(bin, vec![0xc4, 0x03, 1, 2, 3]);
    let array = test_roundtrip(&packer, vec![1u8, 2, 3]);
    assert_eq!(array, vec![0x93, 1, 2, 3]);
}

#[test]
fn test_nil_shapes() {
    let packer = Packer::default();
    assert_eq!(encode(&None::<i32>), vec![0xc0]);
    assert_eq!(encode(&()), vec![0xc0]);
    assert_eq!(packer.deserialize::<Option<i32>>(&[0xc0]).unwrap(), Some(None));
    assert_eq!(packer.deserialize::<i32>(&[0xc0]).unwrap(), None);
    test_roundtrip(&packer, ());
    test_roundtrip(&packer, Value::Nil);
    test_roundtrip(&packer, None::<i32>);
    test_roundtrip(&packer, Some(7i32));
    test_roundtrip(&packer, vec![Some(1u8), None, Some(3)]);
}

#[test]
fn test_collections() {
    let packer = Packer::default();
    test_roundtrip(&packer, vec![String::from("a"), String::from("bc")]);
    test_roundtrip(&packer, VecDeque::from(vec![1i16, -2, 3]));
    test_roundtrip(&packer, BTreeSet::from([3u32, 1, 2]));
    test_roundtrip(&packer, HashSet::from([10i64, 20]));
    test_roundtrip(&packer, [1.0f64, 2.0, 3.0]);
    test_roundtrip(&packer, (1u8, String::from("two"), 3.0f32));
    test_roundtrip(&packer, vec![vec![1u8], vec![], vec![2, 3]]);
    assert_eq!(encode(&Vec::<u32>::new()), vec![0x90]);
}

#[test]
fn test_wrong_arity_is_rejected() {
    let packer = Packer::default();
    let three = encode(&vec![1u8, 2, 3]);
    assert!(packer.deserialize::<[u8; 2]>(&three).is_err());
    assert!(packer.deserialize::<(u8, u8)>(&three).is_err());
    assert_eq!(packer.deserialize::<(u8, u8, u8)>(&three).unwrap(), Some((1, 2, 3)));
}

#[test]
fn test_maps() {
    let packer = Packer::default();
    let ordered = BTreeMap::from([(String::from("a"), 1u32), (String::from("b"), 2)]);
    let bytes = test_roundtrip(&packer, ordered);
    assert_eq!(bytes, vec![0x82, 0xa1, b'a', 0x01, 0xa1, b'b', 0x02]);

    let mut hashed = HashMap::new();
    hashed.insert(1u64, vec![String::from("x")]);
    hashed.insert(2u64, Vec::new());
    test_roundtrip(&packer, hashed);
}

#[test]
fn test_pointers() {
    let packer = Packer::default();
    test_roundtrip(&packer, Box::new(42u32));
    test_roundtrip(&packer, Arc::new(String::from("shared")));
    assert_eq!(encode(&Box::new(1u8)), encode(&1u8));
}

#[test]
fn test_uuid() {
    let packer = Packer::default();
    let id = Uuid::new_v4();
    let bytes = test_roundtrip(&packer, id);
    assert_eq!(&bytes[..2], &[0xc4, 0x10]);
    assert_eq!(&bytes[2..], id.as_bytes());

    let short = encode(&Bytes::from_static(&[0; 8]));
    assert!(matches!(packer.deserialize::<Uuid>(&short), Err(Error::Truncated(16, 8))));
    let long = encode(&Bytes::from_static(&[0; 20]));
    assert!(matches!(packer.deserialize::<Uuid>(&long), Err(Error::InvalidFormat(_))));
}

#[test]
fn test_extension() {
    let packer = Packer::default();
    let ext = Extension::new(42, vec![1u8, 2, 3, 4]);
    let bytes = test_roundtrip(&packer, ext);
    assert_eq!(bytes, vec![0xd6, 42, 1, 2, 3, 4]);
    test_roundtrip(&packer, Extension::new(-5, vec![0u8; 3]));
}

#[test]
fn test_dynamic_values() {
    let packer = Packer::default();
    let value = Value::Map(vec![
        (Value::from("name"), Value::from("sensor")),
        (
            Value::from("readings"),
            Value::Array(vec![Value::Int(-3), Value::UInt(7), Value::F64(1.25)]),
        ),
        (Value::from("raw"), Value::Binary(vec![0xde, 0xad])),
        (Value::from("ok"), Value::Bool(true)),
        (Value::from("none"), Value::Nil),
    ]);
    test_roundtrip(&packer, value);

    let decoded: Value = packer.deserialize(&encode(&5i64)).unwrap().unwrap();
    assert_eq!(decoded, Value::UInt(5));
    assert_eq!(decoded.as_i64(), Some(5));
}

#[test]
fn test_dynamic_value_depth_limit() {
    let mut nested = Value::Array(vec![]);
    for _ in 0..10 {
        nested = Value::Array(vec![nested]);
    }
    let bytes = encode(&nested);
    let mut block = ByteBlock::from_bytes(&bytes);
    assert!(matches!(Value::read_with_depth(&mut block, 5), Err(Error::DepthExceed(_))));
    assert_eq!(block.read_position(), 0);
    assert_eq!(Value::read_with_depth(&mut block, 10).unwrap(), nested);
}

#[test]
fn test_outcomes() {
    let packer = Packer::default();
    let bytes = encode(&Outcome::failure("no"));
    assert_eq!(bytes, vec![0xc2, 0xa2, b'n', b'o']);

    let mut block = ByteBlock::from_bytes(&bytes);
    let outcome = Outcome::deserialize(&mut block).unwrap();
    assert!(!outcome.is_success);
    assert_eq!(outcome.message, "no");

    let mut block = ByteBlock::new();
    ValueOutcome::success(vec![1u8, 2]).serialize(&mut block).unwrap();
    assert_eq!(block.as_slice(), &[0xc3, 0xa0, 0x92, 0x01, 0x02]);
    let read = ValueOutcome::<Vec<u8>>::deserialize(&mut block).unwrap();
    assert!(read.is_success);
    assert_eq!(read.value, vec![1, 2]);
    assert!(packer.register::<ValueOutcome<Vec<u8>>>().is_ok());
}
