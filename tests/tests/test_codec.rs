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

use packwire_core::buffer::ByteBlock;
use packwire_core::codec::{read, skip_value, value_len, write, Timestamp};
use packwire_core::error::Error;
use packwire_core::types::{ExtensionHeader, FormatKind};

#[test]
fn test_known_encodings() {
    let mut block = ByteBlock::new();
    write::write_str(&mut block, "hello").unwrap();
    assert_eq!(block.as_slice(), &[0xa5, b'h', b'e', b'l', b'l', b'o']);

    let mut block = ByteBlock::new();
    write::write_u32(&mut block, 300).unwrap();
    assert_eq!(block.as_slice(), &[0xcd, 0x01, 0x2c]);

    let mut block = ByteBlock::new();
    write::write_nil(&mut block).unwrap();
    assert_eq!(block.as_slice(), &[0xc0]);
}

#[test]
fn test_signed_values_use_narrowest_encoding() {
    let cases: &[(i64, &[u8])] = &[
        (-1, &[0xff]),
        (-32, &[0xe0]),
        (-33, &[0xd0, 0xdf]),
        (-129, &[0xd1, 0xff, 0x7f]),
        (-32769, &[0xd2, 0xff, 0xff, 0x7f, 0xff]),
        (200, &[0xcc, 0xc8]),
    ];
    for (value, expected) in cases {
        let mut block = ByteBlock::new();
        write::write_i64(&mut block, *value).unwrap();
        assert_eq!(block.as_slice(), *expected, "value {value}");
        assert_eq!(write::int_len(*value), expected.len());
        assert_eq!(read::read_i64(&mut block).unwrap(), *value);
    }
}

#[test]
fn test_header_boundaries() {
    let mut dest = [0u8; 8];
    assert_eq!(write::try_write_str_header(&mut dest, 31).unwrap(), 1);
    assert_eq!(dest[0], 0xbf);
    assert_eq!(write::try_write_str_header(&mut dest, 32).unwrap(), 2);
    assert_eq!(&dest[..2], &[0xd9, 0x20]);
    assert_eq!(write::try_write_array_header(&mut dest, 16).unwrap(), 3);
    assert_eq!(&dest[..3], &[0xdc, 0x00, 0x10]);
    assert_eq!(write::try_write_map_header(&mut dest, 65536).unwrap(), 5);
    assert_eq!(&dest[..5], &[0xdf, 0x00, 0x01, 0x00, 0x00]);
    assert_eq!(write::try_write_bin_header(&mut dest, 0).unwrap(), 2);
    assert_eq!(&dest[..2], &[0xc4, 0x00]);
}

#[test]
fn test_try_write_reports_required_size() {
    let mut dest = [0xaau8; 3];
    let err = write::try_write_u32(&mut dest, 70_000).unwrap_err();
    assert!(matches!(err, Error::BufferTooSmall { required: 5, available: 3 }));
    assert_eq!(err.required_len(), Some(5));
    assert_eq!(dest, [0xaa; 3]);
}

#[test]
fn test_forced_width_writers() {
    let mut dest = [0u8; 9];
    assert_eq!(write::try_write_u32_forced(&mut dest, 1).unwrap(), 5);
    assert_eq!(&dest[..5], &[0xce, 0, 0, 0, 1]);
    assert_eq!(write::try_write_i16_forced(&mut dest, -1).unwrap(), 3);
    assert_eq!(&dest[..3], &[0xd1, 0xff, 0xff]);
    assert_eq!(read::try_read_i16(&dest[..3]).unwrap(), (-1, 3));
    assert!(read::try_read_u8(&dest[..3]).is_err());
}

#[test]
fn test_failed_read_consumes_nothing() {
    let mut block = ByteBlock::from_bytes(&[0xcd, 0x01]);
    assert!(matches!(read::read_u16(&mut block), Err(Error::Truncated(..))));
    assert_eq!(block.read_position(), 0);

    let mut block = ByteBlock::from_bytes(&[0xcd, 0x01, 0x00]);
    assert!(matches!(read::read_u8(&mut block), Err(Error::InvalidFormat(_))));
    assert_eq!(block.read_position(), 0);
    assert_eq!(read::read_u16(&mut block).unwrap(), 256);
}

#[test]
fn test_floats_accept_integers() {
    let mut block = ByteBlock::new();
    write::write_i8(&mut block, -3).unwrap();
    write::write_f32(&mut block, 1.5).unwrap();
    assert_eq!(read::read_f64(&mut block).unwrap(), -3.0);
    assert_eq!(read::read_f64(&mut block).unwrap(), 1.5);
}

#[test]
fn test_timestamp_shapes() {
    let cases = [
        (Timestamp::new(1, 0).unwrap(), vec![0xd6, 0xff, 0, 0, 0, 1]),
        (
            Timestamp::new(1, 1).unwrap(),
            vec![0xd7, 0xff, 0, 0, 0, 0x04, 0, 0, 0, 0x01],
        ),
        (
            Timestamp::new(-1, 0).unwrap(),
            vec![0xc7, 0x0c, 0xff, 0, 0, 0, 0, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff],
        ),
    ];
    for (timestamp, expected) in cases {
        let mut block = ByteBlock::new();
        write::write_timestamp(&mut block, timestamp).unwrap();
        assert_eq!(block.as_slice(), expected.as_slice());
        assert_eq!(write::timestamp_len(&timestamp), expected.len());
        assert_eq!(read::read_timestamp(&mut block).unwrap(), timestamp);
    }
}

#[test]
fn test_timestamp_rejects_bad_nanos() {
    // 64-bit shape with nanos = 1e9
    let packed: u64 = (1_000_000_000u64 << 34) | 5;
    let mut bytes = vec![0xd7, 0xff];
    bytes.extend_from_slice(&packed.to_be_bytes());
    assert!(read::try_read_timestamp(&bytes).is_err());
}

#[test]
fn test_extension_headers() {
    let mut block = ByteBlock::new();
    write::write_ext_header(&mut block, ExtensionHeader::new(5, 16)).unwrap();
    write::write_ext_header(&mut block, ExtensionHeader::new(5, 300)).unwrap();
    assert_eq!(block.as_slice(), &[0xd8, 0x05, 0xc8, 0x01, 0x2c, 0x05]);
    assert_eq!(read::read_ext_header(&mut block).unwrap(), ExtensionHeader::new(5, 16));
    assert_eq!(read::read_ext_header(&mut block).unwrap(), ExtensionHeader::new(5, 300));
}

#[test]
fn test_peek_does_not_consume() {
    let mut block = ByteBlock::new();
    write::write_bin(&mut block, &[1, 2, 3]).unwrap();
    assert_eq!(read::peek_kind(&block).unwrap(), FormatKind::Binary);
    assert_eq!(read::peek_code(&block).unwrap(), 0xc4);
    assert!(!read::is_nil(&block));
    assert!(!read::read_nil_if_present(&mut block).unwrap());
    assert_eq!(read::read_bin(&mut block).unwrap(), vec![1, 2, 3]);
}

#[test]
fn test_skip_nested_value() {
    let mut block = ByteBlock::new();
    write::write_map_header(&mut block, 2).unwrap();
    write::write_str(&mut block, "a").unwrap();
    write::write_array_header(&mut block, 3).unwrap();
    write::write_u8(&mut block, 1).unwrap();
    write::write_nil(&mut block).unwrap();
    write::write_extension(&mut block, 3, &[9; 5]).unwrap();
    write::write_str(&mut block, "b").unwrap();
    write::write_f64(&mut block, 0.25).unwrap();
    let total = block.len();
    write::write_bool(&mut block, true).unwrap();

    assert_eq!(value_len(block.as_slice(), 8).unwrap(), total);
    skip_value(&mut block, 8).unwrap();
    assert_eq!(block.read_position(), total);
    assert!(read::read_bool(&mut block).unwrap());
}

#[test]
fn test_skip_rejects_truncated_and_deep_values() {
    let mut block = ByteBlock::from_bytes(&[0x92, 0x01]);
    assert!(skip_value(&mut block, 8).is_err());
    assert_eq!(block.read_position(), 0);

    let mut block = ByteBlock::from_bytes(&[0x91, 0x91, 0x91, 0x90]);
    assert!(matches!(skip_value(&mut block, 2), Err(Error::DepthExceed(_))));
    skip_value(&mut block, 3).unwrap();
    assert_eq!(block.remaining(), 0);
}

#[test]
fn test_invalid_utf8_is_encoding_error() {
    let mut block = ByteBlock::from_bytes(&[0xa2, 0xff, 0xfe]);
    assert!(matches!(read::read_string(&mut block), Err(Error::EncodingError(_))));
    assert_eq!(block.read_position(), 0);
}
