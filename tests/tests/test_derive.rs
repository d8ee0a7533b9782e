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

use packwire::{Error, PackObject, Packer};
use std::collections::HashMap;
use tests::{encode, test_roundtrip};

#[derive(PackObject, Debug, PartialEq, Default)]
struct Address {
    street: String,
    zip: u32,
}

#[derive(PackObject, Debug, PartialEq)]
struct Person {
    name: String,
    age: u8,
    address: Option<Address>,
    tags: Vec<String>,
    scores: HashMap<String, i64>,
}

#[derive(PackObject, Debug, PartialEq)]
struct Point(i32, i32);

#[derive(PackObject, Debug, PartialEq)]
struct Marker;

#[derive(PackObject, Debug, PartialEq)]
struct Wrapper<T> {
    inner: T,
    count: u16,
}

#[derive(PackObject, Debug, PartialEq)]
struct Cached {
    key: String,
    #[packwire(skip)]
    hits: u64,
    value: Vec<u8>,
}

#[derive(PackObject, Debug, PartialEq)]
struct AddressV2 {
    street: String,
    zip: u32,
    country: String,
    floors: Vec<u8>,
}

#[derive(PackObject, Debug, PartialEq, Clone, Copy)]
enum Color {
    Red,
    Green = 5,
    Blue,
}

#[derive(PackObject, Debug, PartialEq, Clone, Copy)]
#[repr(u8)]
enum Level {
    Low = 1,
    High = 200,
}

#[derive(PackObject, Debug, PartialEq)]
struct Tree {
    label: String,
    children: Vec<Tree>,
}

#[test]
fn test_nested_struct() {
    let packer = Packer::default();
    let person = Person {
        name: "Ada".to_string(),
        age: 36,
        address: Some(Address {
            street: "Main".to_string(),
            zip: 12345,
        }),
        tags: vec!["a".to_string(), "b".to_string()],
        scores: HashMap::from([("math".to_string(), 100)]),
    };
    let bytes = test_roundtrip(&packer, person);
    assert_eq!(bytes[0], 0x95);

    let no_address = Person {
        name: String::new(),
        age: 0,
        address: None,
        tags: Vec::new(),
        scores: HashMap::new(),
    };
    let bytes = test_roundtrip(&packer, no_address);
    assert_eq!(bytes, vec![0x95, 0xa0, 0x00, 0xc0, 0x90, 0x80]);
}

#[test]
fn test_tuple_and_unit_structs() {
    let packer = Packer::default();
    assert_eq!(test_roundtrip(&packer, Point(-1, 300)), vec![0x92, 0xff, 0xcd, 0x01, 0x2c]);
    assert_eq!(test_roundtrip(&packer, Marker), vec![0x90]);
}

#[test]
fn test_generic_struct() {
    let packer = Packer::default();
    test_roundtrip(
        &packer,
        Wrapper {
            inner: vec![Point(1, 2)],
            count: 1,
        },
    );
    test_roundtrip(
        &packer,
        Wrapper {
            inner: "text".to_string(),
            count: 2,
        },
    );
}

#[test]
fn test_skipped_field_uses_default() {
    let packer = Packer::default();
    let cached = Cached {
        key: "k".to_string(),
        hits: 99,
        value: vec![1],
    };
    let bytes = packer.serialize(&cached).unwrap();
    assert_eq!(bytes, vec![0x92, 0xa1, b'k', 0x91, 0x01]);
    assert_eq!(packer.get_length(&cached).unwrap(), bytes.len());
    let back: Cached = packer.deserialize(&bytes).unwrap().unwrap();
    assert_eq!(back.hits, 0);
    assert_eq!(back.key, "k");
    assert_eq!(back.value, vec![1]);
}

#[test]
fn test_newer_writer_older_reader() {
    let packer = Packer::default();
    let newer = AddressV2 {
        street: "Elm".to_string(),
        zip: 1,
        country: "NZ".to_string(),
        floors: vec![1, 2, 3],
    };
    let bytes = encode(&newer);
    let older: Address = packer.deserialize(&bytes).unwrap().unwrap();
    assert_eq!(
        older,
        Address {
            street: "Elm".to_string(),
            zip: 1
        }
    );
}

#[test]
fn test_too_few_fields_is_an_error() {
    let packer = Packer::default();
    let bytes = encode(&("Elm".to_string(),));
    assert!(matches!(
        packer.deserialize::<Address>(&bytes),
        Err(Error::InvalidFormat(_))
    ));
}

#[test]
fn test_enums() {
    let packer = Packer::default();
    assert_eq!(test_roundtrip(&packer, Color::Red), vec![0x00]);
    assert_eq!(test_roundtrip(&packer, Color::Green), vec![0x05]);
    assert_eq!(test_roundtrip(&packer, Color::Blue), vec![0x06]);
    assert_eq!(test_roundtrip(&packer, Level::High), vec![0xcc, 0xc8]);
    test_roundtrip(&packer, vec![Level::Low, Level::High]);
}

#[test]
fn test_unknown_discriminant() {
    let packer = Packer::default();
    assert!(matches!(
        packer.deserialize::<Color>(&encode(&3i32)),
        Err(Error::InvalidFormat(_))
    ));
    assert!(packer.deserialize::<Level>(&encode(&-1i32)).is_err());
}

#[test]
fn test_recursive_type() {
    let packer = Packer::default();
    let tree = Tree {
        label: "root".to_string(),
        children: vec![
            Tree {
                label: "leaf".to_string(),
                children: vec![],
            },
            Tree {
                label: "branch".to_string(),
                children: vec![Tree {
                    label: "deep".to_string(),
                    children: vec![],
                }],
            },
        ],
    };
    test_roundtrip(&packer, tree);
    assert!(packer.resolver().contains::<Tree>());
    assert!(packer.resolver().contains::<Vec<Tree>>());
}
