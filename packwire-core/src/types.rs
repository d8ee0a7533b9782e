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

//! MessagePack format codes and the small value types shared by the codec.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// MessagePack format codes.
///
/// Ranged families (fixint, fixmap, fixarray, fixstr, negative fixint) are
/// given by their lower bound plus a `*_MAX` or mask constant.
pub mod code {
    pub const POSITIVE_FIXINT_MIN: u8 = 0x00;
    pub const POSITIVE_FIXINT_MAX: u8 = 0x7f;
    pub const FIXMAP_MIN: u8 = 0x80;
    pub const FIXMAP_MAX: u8 = 0x8f;
    pub const FIXARRAY_MIN: u8 = 0x90;
    pub const FIXARRAY_MAX: u8 = 0x9f;
    pub const FIXSTR_MIN: u8 = 0xa0;
    pub const FIXSTR_MAX: u8 = 0xbf;
    pub const NIL: u8 = 0xc0;
    pub const NEVER_USED: u8 = 0xc1;
    pub const FALSE: u8 = 0xc2;
    pub const TRUE: u8 = 0xc3;
    pub const BIN8: u8 = 0xc4;
    pub const BIN16: u8 = 0xc5;
    pub const BIN32: u8 = 0xc6;
    pub const EXT8: u8 = 0xc7;
    pub const EXT16: u8 = 0xc8;
    pub const EXT32: u8 = 0xc9;
    pub const FLOAT32: u8 = 0xca;
    pub const FLOAT64: u8 = 0xcb;
    pub const UINT8: u8 = 0xcc;
    pub const UINT16: u8 = 0xcd;
    pub const UINT32: u8 = 0xce;
    pub const UINT64: u8 = 0xcf;
    pub const INT8: u8 = 0xd0;
    pub const INT16: u8 = 0xd1;
    pub const INT32: u8 = 0xd2;
    pub const INT64: u8 = 0xd3;
    pub const FIXEXT1: u8 = 0xd4;
    pub const FIXEXT2: u8 = 0xd5;
    pub const FIXEXT4: u8 = 0xd6;
    pub const FIXEXT8: u8 = 0xd7;
    pub const FIXEXT16: u8 = 0xd8;
    pub const STR8: u8 = 0xd9;
    pub const STR16: u8 = 0xda;
    pub const STR32: u8 = 0xdb;
    pub const ARRAY16: u8 = 0xdc;
    pub const ARRAY32: u8 = 0xdd;
    pub const MAP16: u8 = 0xde;
    pub const MAP32: u8 = 0xdf;
    pub const NEGATIVE_FIXINT_MIN: u8 = 0xe0;
    pub const NEGATIVE_FIXINT_MAX: u8 = 0xff;

    /// Largest count embedded in a fixmap/fixarray code.
    pub const FIX_CONTAINER_MAX_LEN: u32 = 15;
    /// Largest byte length embedded in a fixstr code.
    pub const FIXSTR_MAX_LEN: u32 = 31;
    /// Smallest value encodable as a negative fixint.
    pub const NEGATIVE_FIXINT_MIN_VALUE: i64 = -32;
}

/// Extension type code MessagePack reserves for timestamps.
pub const TIMESTAMP_EXT_TYPE: i8 = -1;

/// The logical family of a format code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormatKind {
    Integer,
    Nil,
    Boolean,
    Float,
    String,
    Binary,
    Array,
    Map,
    Extension,
    NeverUsed,
}

impl FormatKind {
    /// Classifies a format code.
    pub fn of(format_code: u8) -> FormatKind {
        match format_code {
            code::POSITIVE_FIXINT_MIN..=code::POSITIVE_FIXINT_MAX => FormatKind::Integer,
            code::FIXMAP_MIN..=code::FIXMAP_MAX => FormatKind::Map,
            code::FIXARRAY_MIN..=code::FIXARRAY_MAX => FormatKind::Array,
            code::FIXSTR_MIN..=code::FIXSTR_MAX => FormatKind::String,
            code::NIL => FormatKind::Nil,
            code::NEVER_USED => FormatKind::NeverUsed,
            code::FALSE | code::TRUE => FormatKind::Boolean,
            code::BIN8 | code::BIN16 | code::BIN32 => FormatKind::Binary,
            code::EXT8 | code::EXT16 | code::EXT32 => FormatKind::Extension,
            code::FLOAT32 | code::FLOAT64 => FormatKind::Float,
            code::UINT8..=code::INT64 => FormatKind::Integer,
            code::FIXEXT1..=code::FIXEXT16 => FormatKind::Extension,
            code::STR8 | code::STR16 | code::STR32 => FormatKind::String,
            code::ARRAY16 | code::ARRAY32 => FormatKind::Array,
            code::MAP16 | code::MAP32 => FormatKind::Map,
            code::NEGATIVE_FIXINT_MIN..=code::NEGATIVE_FIXINT_MAX => FormatKind::Integer,
        }
    }
}

/// Type code and payload length of an extension value.
///
/// Payload lengths of 1, 2, 4, 8 and 16 bytes are written with a single
/// fixext code; every other length gets an explicit ext8/16/32 length field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExtensionHeader {
    pub type_code: i8,
    pub length: u32,
}

impl ExtensionHeader {
    pub const fn new(type_code: i8, length: u32) -> Self {
        ExtensionHeader { type_code, length }
    }
}

/// Compression applied around a serialized payload.
///
/// The kind is not written into the payload. Persist it next to the bytes
/// and pass the same kind when reading them back.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive,
)]
#[repr(u8)]
pub enum CompressionKind {
    #[default]
    None = 0,
    Lz4 = 1,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_every_code() {
        assert_eq!(FormatKind::of(0x00), FormatKind::Integer);
        assert_eq!(FormatKind::of(0x7f), FormatKind::Integer);
        assert_eq!(FormatKind::of(0x85), FormatKind::Map);
        assert_eq!(FormatKind::of(0x93), FormatKind::Array);
        assert_eq!(FormatKind::of(0xa5), FormatKind::String);
        assert_eq!(FormatKind::of(0xc0), FormatKind::Nil);
        assert_eq!(FormatKind::of(0xc1), FormatKind::NeverUsed);
        assert_eq!(FormatKind::of(0xc3), FormatKind::Boolean);
        assert_eq!(FormatKind::of(0xc5), FormatKind::Binary);
        assert_eq!(FormatKind::of(0xc8), FormatKind::Extension);
        assert_eq!(FormatKind::of(0xcb), FormatKind::Float);
        assert_eq!(FormatKind::of(0xd3), FormatKind::Integer);
        assert_eq!(FormatKind::of(0xd8), FormatKind::Extension);
        assert_eq!(FormatKind::of(0xdb), FormatKind::String);
        assert_eq!(FormatKind::of(0xdd), FormatKind::Array);
        assert_eq!(FormatKind::of(0xdf), FormatKind::Map);
        assert_eq!(FormatKind::of(0xe0), FormatKind::Integer);
        assert_eq!(FormatKind::of(0xff), FormatKind::Integer);
    }

    #[test]
    fn compression_kind_from_byte() {
        assert_eq!(CompressionKind::try_from(1u8).unwrap(), CompressionKind::Lz4);
        assert!(CompressionKind::try_from(7u8).is_err());
        assert_eq!(u8::from(CompressionKind::None), 0);
    }
}
