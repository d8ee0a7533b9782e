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

//! Decoders.
//!
//! `try_read_*` decode from the front of a slice and return the value with
//! the number of bytes consumed. Block readers (`read_*`) decode at the
//! read position of a [`ByteBlock`] and advance it only on success.

use super::Timestamp;
use crate::buffer::ByteBlock;
use crate::error::Error;
use crate::types::{code, ExtensionHeader, FormatKind, TIMESTAMP_EXT_TYPE};
use byteorder::{BigEndian, ByteOrder};
use paste::paste;

#[inline(always)]
pub(crate) fn first(src: &[u8]) -> Result<u8, Error> {
    src.first().copied().ok_or_else(|| Error::truncated(1, 0))
}

#[inline(always)]
pub(crate) fn need(src: &[u8], len: usize) -> Result<(), Error> {
    if src.len() < len {
        return Err(Error::truncated(len, src.len()));
    }
    Ok(())
}

/// Reads a `width`-byte big-endian length that starts at `src[1]`.
#[inline(always)]
pub(crate) fn length_field(src: &[u8], width: usize) -> Result<usize, Error> {
    need(src, 1 + width)?;
    Ok(match width {
        1 => src[1] as usize,
        2 => BigEndian::read_u16(&src[1..3]) as usize,
        _ => BigEndian::read_u32(&src[1..5]) as usize,
    })
}

#[derive(Clone, Copy, Debug)]
enum RawInt {
    Unsigned(u64),
    Signed(i64),
}

fn try_read_raw_int(src: &[u8], expected: &'static str) -> Result<(RawInt, usize), Error> {
    let format_code = first(src)?;
    let raw = match format_code {
        code::POSITIVE_FIXINT_MIN..=code::POSITIVE_FIXINT_MAX => {
            return Ok((RawInt::Unsigned(format_code as u64), 1))
        }
        code::NEGATIVE_FIXINT_MIN..=code::NEGATIVE_FIXINT_MAX => {
            return Ok((RawInt::Signed(format_code as i8 as i64), 1))
        }
        code::UINT8 => {
            need(src, 2)?;
            (RawInt::Unsigned(src[1] as u64), 2)
        }
        code::UINT16 => {
            need(src, 3)?;
            (RawInt::Unsigned(BigEndian::read_u16(&src[1..3]) as u64), 3)
        }
        code::UINT32 => {
            need(src, 5)?;
            (RawInt::Unsigned(BigEndian::read_u32(&src[1..5]) as u64), 5)
        }
        code::UINT64 => {
            need(src, 9)?;
            (RawInt::Unsigned(BigEndian::read_u64(&src[1..9])), 9)
        }
        code::INT8 => {
            need(src, 2)?;
            (RawInt::Signed(src[1] as i8 as i64), 2)
        }
        code::INT16 => {
            need(src, 3)?;
            (RawInt::Signed(BigEndian::read_i16(&src[1..3]) as i64), 3)
        }
        code::INT32 => {
            need(src, 5)?;
            (RawInt::Signed(BigEndian::read_i32(&src[1..5]) as i64), 5)
        }
        code::INT64 => {
            need(src, 9)?;
            (RawInt::Signed(BigEndian::read_i64(&src[1..9])), 9)
        }
        other => return Err(Error::unexpected_code(other, expected)),
    };
    Ok(raw)
}

macro_rules! impl_int_readers {
    ($($ty:ident),*) => {
        paste! {
            $(
                #[doc = concat!("Reads any integer encoding whose value fits in `", stringify!($ty), "`.")]
                #[inline(always)]
                pub fn [<try_read_ $ty>](src: &[u8]) -> Result<($ty, usize), Error> {
                    let (raw, consumed) = try_read_raw_int(src, stringify!($ty))?;
                    let value = match raw {
                        RawInt::Unsigned(v) => $ty::try_from(v).ok(),
                        RawInt::Signed(v) => $ty::try_from(v).ok(),
                    };
                    match value {
                        Some(value) => Ok((value, consumed)),
                        None => Err(Error::invalid_format(format!(
                            "integer {:?} out of range for {}",
                            raw,
                            stringify!($ty)
                        ))),
                    }
                }

                #[inline(always)]
                pub fn [<read_ $ty>](block: &mut ByteBlock<'_>) -> Result<$ty, Error> {
                    let (value, consumed) = [<try_read_ $ty>](block.unread())?;
                    block.skip(consumed)?;
                    Ok(value)
                }
            )*
        }
    };
}

impl_int_readers!(u8, u16, u32, u64, i8, i16, i32, i64);

/// Consumes a nil if one is next. Returns whether it did and how many
/// bytes that took.
#[inline(always)]
pub fn try_read_nil(src: &[u8]) -> Result<(bool, usize), Error> {
    if first(src)? == code::NIL {
        Ok((true, 1))
    } else {
        Ok((false, 0))
    }
}

#[inline(always)]
pub fn try_read_bool(src: &[u8]) -> Result<(bool, usize), Error> {
    match first(src)? {
        code::TRUE => Ok((true, 1)),
        code::FALSE => Ok((false, 1)),
        other => Err(Error::unexpected_code(other, "bool")),
    }
}

/// Reads float32, float64 (narrowed) or any integer encoding.
pub fn try_read_f32(src: &[u8]) -> Result<(f32, usize), Error> {
    match first(src)? {
        code::FLOAT32 => {
            need(src, 5)?;
            Ok((BigEndian::read_f32(&src[1..5]), 5))
        }
        code::FLOAT64 => {
            need(src, 9)?;
            Ok((BigEndian::read_f64(&src[1..9]) as f32, 9))
        }
        _ => match try_read_raw_int(src, "f32")? {
            (RawInt::Unsigned(v), n) => Ok((v as f32, n)),
            (RawInt::Signed(v), n) => Ok((v as f32, n)),
        },
    }
}

/// Reads float64, float32 or any integer encoding.
pub fn try_read_f64(src: &[u8]) -> Result<(f64, usize), Error> {
    match first(src)? {
        code::FLOAT32 => {
            need(src, 5)?;
            Ok((BigEndian::read_f32(&src[1..5]) as f64, 5))
        }
        code::FLOAT64 => {
            need(src, 9)?;
            Ok((BigEndian::read_f64(&src[1..9]), 9))
        }
        _ => match try_read_raw_int(src, "f64")? {
            (RawInt::Unsigned(v), n) => Ok((v as f64, n)),
            (RawInt::Signed(v), n) => Ok((v as f64, n)),
        },
    }
}

pub fn try_read_array_header(src: &[u8]) -> Result<(u32, usize), Error> {
    match first(src)? {
        c @ code::FIXARRAY_MIN..=code::FIXARRAY_MAX => Ok(((c & 0x0f) as u32, 1)),
        code::ARRAY16 => Ok((length_field(src, 2)? as u32, 3)),
        code::ARRAY32 => Ok((length_field(src, 4)? as u32, 5)),
        other => Err(Error::unexpected_code(other, "array header")),
    }
}

pub fn try_read_map_header(src: &[u8]) -> Result<(u32, usize), Error> {
    match first(src)? {
        c @ code::FIXMAP_MIN..=code::FIXMAP_MAX => Ok(((c & 0x0f) as u32, 1)),
        code::MAP16 => Ok((length_field(src, 2)? as u32, 3)),
        code::MAP32 => Ok((length_field(src, 4)? as u32, 5)),
        other => Err(Error::unexpected_code(other, "map header")),
    }
}

pub fn try_read_str_header(src: &[u8]) -> Result<(u32, usize), Error> {
    match first(src)? {
        c @ code::FIXSTR_MIN..=code::FIXSTR_MAX => Ok(((c & 0x1f) as u32, 1)),
        code::STR8 => Ok((length_field(src, 1)? as u32, 2)),
        code::STR16 => Ok((length_field(src, 2)? as u32, 3)),
        code::STR32 => Ok((length_field(src, 4)? as u32, 5)),
        other => Err(Error::unexpected_code(other, "string header")),
    }
}

pub fn try_read_bin_header(src: &[u8]) -> Result<(u32, usize), Error> {
    match first(src)? {
        code::BIN8 => Ok((length_field(src, 1)? as u32, 2)),
        code::BIN16 => Ok((length_field(src, 2)? as u32, 3)),
        code::BIN32 => Ok((length_field(src, 4)? as u32, 5)),
        other => Err(Error::unexpected_code(other, "binary header")),
    }
}

pub fn try_read_ext_header(src: &[u8]) -> Result<(ExtensionHeader, usize), Error> {
    let (length, header_len) = match first(src)? {
        code::FIXEXT1 => (1, 2),
        code::FIXEXT2 => (2, 2),
        code::FIXEXT4 => (4, 2),
        code::FIXEXT8 => (8, 2),
        code::FIXEXT16 => (16, 2),
        code::EXT8 => (length_field(src, 1)? as u32, 3),
        code::EXT16 => (length_field(src, 2)? as u32, 4),
        code::EXT32 => (length_field(src, 4)? as u32, 6),
        other => return Err(Error::unexpected_code(other, "extension header")),
    };
    need(src, header_len)?;
    let type_code = src[header_len - 1] as i8;
    Ok((ExtensionHeader::new(type_code, length), header_len))
}

/// Reads a string value. The slice borrows from `src`.
pub fn try_read_str(src: &[u8]) -> Result<(&str, usize), Error> {
    let (len, header_len) = try_read_str_header(src)?;
    let end = header_len + len as usize;
    need(src, end)?;
    let text = std::str::from_utf8(&src[header_len..end])
        .map_err(|e| Error::encoding_error(format!("invalid UTF-8 in string value: {e}")))?;
    Ok((text, end))
}

/// Reads a binary value. The slice borrows from `src`.
pub fn try_read_bin(src: &[u8]) -> Result<(&[u8], usize), Error> {
    let (len, header_len) = try_read_bin_header(src)?;
    let end = header_len + len as usize;
    need(src, end)?;
    Ok((&src[header_len..end], end))
}

/// Reads a complete extension value: type code and payload.
pub fn try_read_extension(src: &[u8]) -> Result<((i8, &[u8]), usize), Error> {
    let (header, header_len) = try_read_ext_header(src)?;
    let end = header_len + header.length as usize;
    need(src, end)?;
    Ok(((header.type_code, &src[header_len..end]), end))
}

/// Reads a timestamp extension in any of its 4, 8 or 12-byte shapes.
pub fn try_read_timestamp(src: &[u8]) -> Result<(Timestamp, usize), Error> {
    let ((type_code, payload), consumed) = try_read_extension(src)?;
    if type_code != TIMESTAMP_EXT_TYPE {
        return Err(Error::invalid_format(format!(
            "extension type {type_code} is not a timestamp"
        )));
    }
    let timestamp = match payload.len() {
        4 => Timestamp {
            seconds: BigEndian::read_u32(payload) as i64,
            nanos: 0,
        },
        8 => {
            let packed = BigEndian::read_u64(payload);
            Timestamp::new((packed & 0x3_ffff_ffff) as i64, (packed >> 34) as u32)?
        }
        12 => Timestamp::new(
            BigEndian::read_i64(&payload[4..12]),
            BigEndian::read_u32(&payload[0..4]),
        )?,
        other => {
            return Err(Error::invalid_format(format!(
                "timestamp payload of {other} bytes"
            )))
        }
    };
    Ok((timestamp, consumed))
}

// ---------- block readers ----------

/// The format code at the read position, without consuming it.
#[inline(always)]
pub fn peek_code(block: &ByteBlock<'_>) -> Result<u8, Error> {
    block.peek_u8()
}

#[inline(always)]
pub fn peek_kind(block: &ByteBlock<'_>) -> Result<FormatKind, Error> {
    Ok(FormatKind::of(block.peek_u8()?))
}

/// Whether the next value is nil. Empty input is not nil.
#[inline(always)]
pub fn is_nil(block: &ByteBlock<'_>) -> bool {
    matches!(block.peek_u8(), Ok(code::NIL))
}

/// Consumes a nil if one is next.
#[inline(always)]
pub fn read_nil_if_present(block: &mut ByteBlock<'_>) -> Result<bool, Error> {
    let (nil, consumed) = try_read_nil(block.unread())?;
    block.skip(consumed)?;
    Ok(nil)
}

pub fn read_nil(block: &mut ByteBlock<'_>) -> Result<(), Error> {
    match block.peek_u8()? {
        code::NIL => block.skip(1),
        other => Err(Error::unexpected_code(other, "nil")),
    }
}

macro_rules! impl_block_readers {
    ($($name:ident => $try:ident -> $ty:ty;)*) => {
        $(
            #[inline(always)]
            pub fn $name(block: &mut ByteBlock<'_>) -> Result<$ty, Error> {
                let (value, consumed) = $try(block.unread())?;
                block.skip(consumed)?;
                Ok(value)
            }
        )*
    };
}

impl_block_readers! {
    read_bool => try_read_bool -> bool;
    read_f32 => try_read_f32 -> f32;
    read_f64 => try_read_f64 -> f64;
    read_ext_header => try_read_ext_header -> ExtensionHeader;
    read_timestamp => try_read_timestamp -> Timestamp;
}

macro_rules! impl_header_readers {
    ($($name:ident => $try:ident;)*) => {
        $(
            #[inline(always)]
            pub fn $name(block: &mut ByteBlock<'_>) -> Result<usize, Error> {
                let (len, consumed) = $try(block.unread())?;
                block.skip(consumed)?;
                Ok(len as usize)
            }
        )*
    };
}

impl_header_readers! {
    read_array_header => try_read_array_header;
    read_map_header => try_read_map_header;
    read_str_header => try_read_str_header;
    read_bin_header => try_read_bin_header;
}

/// Reads a string value into an owned `String`.
pub fn read_string(block: &mut ByteBlock<'_>) -> Result<String, Error> {
    let (text, consumed) = try_read_str(block.unread())?;
    let text = text.to_owned();
    block.skip(consumed)?;
    Ok(text)
}

/// Reads a binary value into an owned vector.
pub fn read_bin(block: &mut ByteBlock<'_>) -> Result<Vec<u8>, Error> {
    let (bytes, consumed) = try_read_bin(block.unread())?;
    let bytes = bytes.to_vec();
    block.skip(consumed)?;
    Ok(bytes)
}

/// Reads a complete extension value.
pub fn read_extension(block: &mut ByteBlock<'_>) -> Result<(i8, Vec<u8>), Error> {
    let ((type_code, payload), consumed) = try_read_extension(block.unread())?;
    let payload = payload.to_vec();
    block.skip(consumed)?;
    Ok((type_code, payload))
}
