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

//! Encoders.
//!
//! The `try_write_*` functions encode into a caller slice and return the
//! number of bytes written. When the slice is too short they return
//! [`Error::BufferTooSmall`] carrying the exact size needed and leave the
//! slice untouched. The `write_*` functions append to a [`ByteBlock`],
//! growing it as needed.

use super::Timestamp;
use crate::buffer::ByteBlock;
use crate::error::Error;
use crate::types::{code, ExtensionHeader, TIMESTAMP_EXT_TYPE};
use byteorder::{BigEndian, ByteOrder};

#[inline(always)]
fn ensure_room(dest: &[u8], required: usize) -> Result<(), Error> {
    if dest.len() < required {
        return Err(Error::buffer_too_small(required, dest.len()));
    }
    Ok(())
}

#[inline(always)]
pub(crate) fn len_u32(len: usize) -> Result<u32, Error> {
    u32::try_from(len)
        .map_err(|_| Error::unsupported(format!("length {len} exceeds the 32-bit MessagePack limit")))
}

// ---------- length helpers ----------

/// Encoded size of an unsigned integer.
#[inline(always)]
pub const fn uint_len(value: u64) -> usize {
    if value <= code::POSITIVE_FIXINT_MAX as u64 {
        1
    } else if value <= u8::MAX as u64 {
        2
    } else if value <= u16::MAX as u64 {
        3
    } else if value <= u32::MAX as u64 {
        5
    } else {
        9
    }
}

/// Encoded size of a signed integer.
#[inline(always)]
pub const fn int_len(value: i64) -> usize {
    if value >= 0 {
        uint_len(value as u64)
    } else if value >= code::NEGATIVE_FIXINT_MIN_VALUE {
        1
    } else if value >= i8::MIN as i64 {
        2
    } else if value >= i16::MIN as i64 {
        3
    } else if value >= i32::MIN as i64 {
        5
    } else {
        9
    }
}

#[inline(always)]
pub const fn array_header_len(count: u32) -> usize {
    if count <= code::FIX_CONTAINER_MAX_LEN {
        1
    } else if count <= u16::MAX as u32 {
        3
    } else {
        5
    }
}

#[inline(always)]
pub const fn map_header_len(count: u32) -> usize {
    array_header_len(count)
}

#[inline(always)]
pub const fn str_header_len(byte_len: u32) -> usize {
    if byte_len <= code::FIXSTR_MAX_LEN {
        1
    } else if byte_len <= u8::MAX as u32 {
        2
    } else if byte_len <= u16::MAX as u32 {
        3
    } else {
        5
    }
}

#[inline(always)]
pub const fn bin_header_len(byte_len: u32) -> usize {
    if byte_len <= u8::MAX as u32 {
        2
    } else if byte_len <= u16::MAX as u32 {
        3
    } else {
        5
    }
}

#[inline(always)]
pub const fn ext_header_len(payload_len: u32) -> usize {
    match payload_len {
        1 | 2 | 4 | 8 | 16 => 2,
        len if len <= u8::MAX as u32 => 3,
        len if len <= u16::MAX as u32 => 4,
        _ => 6,
    }
}

/// Encoded size of a timestamp, header included: 6, 10 or 15 bytes.
#[inline(always)]
pub const fn timestamp_len(timestamp: &Timestamp) -> usize {
    if timestamp.seconds >> 34 == 0 {
        if timestamp.nanos == 0 && timestamp.seconds <= u32::MAX as i64 {
            6
        } else {
            10
        }
    } else {
        15
    }
}

/// Encoded size of a string value, header and UTF-8 bytes.
#[inline(always)]
pub fn str_len(text: &str) -> usize {
    str_header_len(text.len().min(u32::MAX as usize) as u32) + text.len()
}

/// Encoded size of a binary value, header and payload.
#[inline(always)]
pub fn bin_len(bytes: &[u8]) -> usize {
    bin_header_len(bytes.len().min(u32::MAX as usize) as u32) + bytes.len()
}

// ---------- try-write into slices ----------

#[inline(always)]
pub fn try_write_nil(dest: &mut [u8]) -> Result<usize, Error> {
    ensure_room(dest, 1)?;
    dest[0] = code::NIL;
    Ok(1)
}

#[inline(always)]
pub fn try_write_bool(dest: &mut [u8], value: bool) -> Result<usize, Error> {
    ensure_room(dest, 1)?;
    dest[0] = if value { code::TRUE } else { code::FALSE };
    Ok(1)
}

/// Writes `value` in the narrowest unsigned encoding.
#[inline(always)]
pub fn try_write_u64(dest: &mut [u8], value: u64) -> Result<usize, Error> {
    let len = uint_len(value);
    ensure_room(dest, len)?;
    match len {
        1 => dest[0] = value as u8,
        2 => {
            dest[0] = code::UINT8;
            dest[1] = value as u8;
        }
        3 => {
            dest[0] = code::UINT16;
            BigEndian::write_u16(&mut dest[1..3], value as u16);
        }
        5 => {
            dest[0] = code::UINT32;
            BigEndian::write_u32(&mut dest[1..5], value as u32);
        }
        _ => {
            dest[0] = code::UINT64;
            BigEndian::write_u64(&mut dest[1..9], value);
        }
    }
    Ok(len)
}

#[inline(always)]
pub fn try_write_u8(dest: &mut [u8], value: u8) -> Result<usize, Error> {
    try_write_u64(dest, value as u64)
}

#[inline(always)]
pub fn try_write_u16(dest: &mut [u8], value: u16) -> Result<usize, Error> {
    try_write_u64(dest, value as u64)
}

#[inline(always)]
pub fn try_write_u32(dest: &mut [u8], value: u32) -> Result<usize, Error> {
    try_write_u64(dest, value as u64)
}

/// Writes `value` in the narrowest encoding. Non-negative values use the
/// unsigned encodings.
#[inline(always)]
pub fn try_write_i64(dest: &mut [u8], value: i64) -> Result<usize, Error> {
    if value >= 0 {
        return try_write_u64(dest, value as u64);
    }
    let len = int_len(value);
    ensure_room(dest, len)?;
    match len {
        1 => dest[0] = value as i8 as u8,
        2 => {
            dest[0] = code::INT8;
            dest[1] = value as i8 as u8;
        }
        3 => {
            dest[0] = code::INT16;
            BigEndian::write_i16(&mut dest[1..3], value as i16);
        }
        5 => {
            dest[0] = code::INT32;
            BigEndian::write_i32(&mut dest[1..5], value as i32);
        }
        _ => {
            dest[0] = code::INT64;
            BigEndian::write_i64(&mut dest[1..9], value);
        }
    }
    Ok(len)
}

#[inline(always)]
pub fn try_write_i8(dest: &mut [u8], value: i8) -> Result<usize, Error> {
    try_write_i64(dest, value as i64)
}

#[inline(always)]
pub fn try_write_i16(dest: &mut [u8], value: i16) -> Result<usize, Error> {
    try_write_i64(dest, value as i64)
}

#[inline(always)]
pub fn try_write_i32(dest: &mut [u8], value: i32) -> Result<usize, Error> {
    try_write_i64(dest, value as i64)
}

#[inline(always)]
pub fn try_write_f32(dest: &mut [u8], value: f32) -> Result<usize, Error> {
    ensure_room(dest, 5)?;
    dest[0] = code::FLOAT32;
    BigEndian::write_f32(&mut dest[1..5], value);
    Ok(5)
}

#[inline(always)]
pub fn try_write_f64(dest: &mut [u8], value: f64) -> Result<usize, Error> {
    ensure_room(dest, 9)?;
    dest[0] = code::FLOAT64;
    BigEndian::write_f64(&mut dest[1..9], value);
    Ok(9)
}

macro_rules! impl_forced_writers {
    ($($name:ident, $ty:ty, $code:path, $len:expr, |$d:ident, $v:ident| $put:expr;)*) => {
        $(
            #[doc = concat!("Writes `", stringify!($ty), "` with its explicit-width code even when a shorter encoding exists.")]
            #[inline(always)]
            pub fn $name(dest: &mut [u8], value: $ty) -> Result<usize, Error> {
                ensure_room(dest, $len)?;
                dest[0] = $code;
                let $d = &mut dest[1..$len];
                let $v = value;
                $put;
                Ok($len)
            }
        )*
    };
}

impl_forced_writers! {
    try_write_u8_forced, u8, code::UINT8, 2, |d, v| d[0] = v;
    try_write_u16_forced, u16, code::UINT16, 3, |d, v| BigEndian::write_u16(d, v);
    try_write_u32_forced, u32, code::UINT32, 5, |d, v| BigEndian::write_u32(d, v);
    try_write_u64_forced, u64, code::UINT64, 9, |d, v| BigEndian::write_u64(d, v);
    try_write_i8_forced, i8, code::INT8, 2, |d, v| d[0] = v as u8;
    try_write_i16_forced, i16, code::INT16, 3, |d, v| BigEndian::write_i16(d, v);
    try_write_i32_forced, i32, code::INT32, 5, |d, v| BigEndian::write_i32(d, v);
    try_write_i64_forced, i64, code::INT64, 9, |d, v| BigEndian::write_i64(d, v);
}

/// Writes a raw big-endian `u16` with no format code.
#[inline(always)]
pub fn try_write_u16_be(dest: &mut [u8], value: u16) -> Result<usize, Error> {
    ensure_room(dest, 2)?;
    BigEndian::write_u16(dest, value);
    Ok(2)
}

#[inline(always)]
pub fn try_write_u32_be(dest: &mut [u8], value: u32) -> Result<usize, Error> {
    ensure_room(dest, 4)?;
    BigEndian::write_u32(dest, value);
    Ok(4)
}

#[inline(always)]
pub fn try_write_u64_be(dest: &mut [u8], value: u64) -> Result<usize, Error> {
    ensure_room(dest, 8)?;
    BigEndian::write_u64(dest, value);
    Ok(8)
}

#[inline(always)]
pub fn try_write_i64_be(dest: &mut [u8], value: i64) -> Result<usize, Error> {
    ensure_room(dest, 8)?;
    BigEndian::write_i64(dest, value);
    Ok(8)
}

#[inline(always)]
fn put_container_header(dest: &mut [u8], count: u32, fix_base: u8, code16: u8, code32: u8) -> Result<usize, Error> {
    let len = array_header_len(count);
    ensure_room(dest, len)?;
    match len {
        1 => dest[0] = fix_base | count as u8,
        3 => {
            dest[0] = code16;
            BigEndian::write_u16(&mut dest[1..3], count as u16);
        }
        _ => {
            dest[0] = code32;
            BigEndian::write_u32(&mut dest[1..5], count);
        }
    }
    Ok(len)
}

/// Writes an array header. The `count` elements follow, written by the
/// caller.
#[inline(always)]
pub fn try_write_array_header(dest: &mut [u8], count: u32) -> Result<usize, Error> {
    put_container_header(dest, count, code::FIXARRAY_MIN, code::ARRAY16, code::ARRAY32)
}

/// Writes a map header. The `count` key/value pairs follow.
#[inline(always)]
pub fn try_write_map_header(dest: &mut [u8], count: u32) -> Result<usize, Error> {
    put_container_header(dest, count, code::FIXMAP_MIN, code::MAP16, code::MAP32)
}

/// Writes a string header for `byte_len` bytes of already encoded text.
#[inline(always)]
pub fn try_write_str_header(dest: &mut [u8], byte_len: u32) -> Result<usize, Error> {
    let len = str_header_len(byte_len);
    ensure_room(dest, len)?;
    match len {
        1 => dest[0] = code::FIXSTR_MIN | byte_len as u8,
        2 => {
            dest[0] = code::STR8;
            dest[1] = byte_len as u8;
        }
        3 => {
            dest[0] = code::STR16;
            BigEndian::write_u16(&mut dest[1..3], byte_len as u16);
        }
        _ => {
            dest[0] = code::STR32;
            BigEndian::write_u32(&mut dest[1..5], byte_len);
        }
    }
    Ok(len)
}

#[inline(always)]
pub fn try_write_bin_header(dest: &mut [u8], byte_len: u32) -> Result<usize, Error> {
    let len = bin_header_len(byte_len);
    ensure_room(dest, len)?;
    match len {
        2 => {
            dest[0] = code::BIN8;
            dest[1] = byte_len as u8;
        }
        3 => {
            dest[0] = code::BIN16;
            BigEndian::write_u16(&mut dest[1..3], byte_len as u16);
        }
        _ => {
            dest[0] = code::BIN32;
            BigEndian::write_u32(&mut dest[1..5], byte_len);
        }
    }
    Ok(len)
}

/// Writes an extension header: a fixext code for 1/2/4/8/16-byte
/// payloads, otherwise ext8/16/32 with an explicit length. The type code
/// comes last in both shapes.
#[inline(always)]
pub fn try_write_ext_header(dest: &mut [u8], header: ExtensionHeader) -> Result<usize, Error> {
    let len = ext_header_len(header.length);
    ensure_room(dest, len)?;
    match header.length {
        1 => dest[0] = code::FIXEXT1,
        2 => dest[0] = code::FIXEXT2,
        4 => dest[0] = code::FIXEXT4,
        8 => dest[0] = code::FIXEXT8,
        16 => dest[0] = code::FIXEXT16,
        length if len == 3 => {
            dest[0] = code::EXT8;
            dest[1] = length as u8;
        }
        length if len == 4 => {
            dest[0] = code::EXT16;
            BigEndian::write_u16(&mut dest[1..3], length as u16);
        }
        length => {
            dest[0] = code::EXT32;
            BigEndian::write_u32(&mut dest[1..5], length);
        }
    }
    dest[len - 1] = header.type_code as u8;
    Ok(len)
}

/// Writes a timestamp extension in the smallest of its three shapes.
pub fn try_write_timestamp(dest: &mut [u8], timestamp: Timestamp) -> Result<usize, Error> {
    let len = timestamp_len(&timestamp);
    ensure_room(dest, len)?;
    match len {
        6 => {
            try_write_ext_header(dest, ExtensionHeader::new(TIMESTAMP_EXT_TYPE, 4))?;
            BigEndian::write_u32(&mut dest[2..6], timestamp.seconds as u32);
        }
        10 => {
            try_write_ext_header(dest, ExtensionHeader::new(TIMESTAMP_EXT_TYPE, 8))?;
            let packed = ((timestamp.nanos as u64) << 34) | timestamp.seconds as u64;
            BigEndian::write_u64(&mut dest[2..10], packed);
        }
        _ => {
            try_write_ext_header(dest, ExtensionHeader::new(TIMESTAMP_EXT_TYPE, 12))?;
            BigEndian::write_u32(&mut dest[3..7], timestamp.nanos);
            BigEndian::write_i64(&mut dest[7..15], timestamp.seconds);
        }
    }
    Ok(len)
}

// ---------- block writers ----------

macro_rules! impl_block_writers {
    ($($name:ident => $try:ident($ty:ty), |$v:ident| $len:expr;)*) => {
        $(
            #[inline(always)]
            pub fn $name(block: &mut ByteBlock<'_>, value: $ty) -> Result<(), Error> {
                let $v = value;
                let span = block.get_span($len)?;
                let written = $try(span, value)?;
                block.advance(written)
            }
        )*
    };
}

impl_block_writers! {
    write_bool => try_write_bool(bool), |_v| 1;
    write_u8 => try_write_u8(u8), |v| uint_len(v as u64);
    write_u16 => try_write_u16(u16), |v| uint_len(v as u64);
    write_u32 => try_write_u32(u32), |v| uint_len(v as u64);
    write_u64 => try_write_u64(u64), |v| uint_len(v);
    write_i8 => try_write_i8(i8), |v| int_len(v as i64);
    write_i16 => try_write_i16(i16), |v| int_len(v as i64);
    write_i32 => try_write_i32(i32), |v| int_len(v as i64);
    write_i64 => try_write_i64(i64), |v| int_len(v);
    write_f32 => try_write_f32(f32), |_v| 5;
    write_f64 => try_write_f64(f64), |_v| 9;
    write_ext_header => try_write_ext_header(ExtensionHeader), |v| ext_header_len(v.length);
    write_timestamp => try_write_timestamp(Timestamp), |v| timestamp_len(&v);
}

#[inline(always)]
pub fn write_nil(block: &mut ByteBlock<'_>) -> Result<(), Error> {
    let span = block.get_span(1)?;
    let written = try_write_nil(span)?;
    block.advance(written)
}

pub fn write_array_header(block: &mut ByteBlock<'_>, count: usize) -> Result<(), Error> {
    let count = len_u32(count)?;
    let span = block.get_span(array_header_len(count))?;
    let written = try_write_array_header(span, count)?;
    block.advance(written)
}

pub fn write_map_header(block: &mut ByteBlock<'_>, count: usize) -> Result<(), Error> {
    let count = len_u32(count)?;
    let span = block.get_span(map_header_len(count))?;
    let written = try_write_map_header(span, count)?;
    block.advance(written)
}

pub fn write_str_header(block: &mut ByteBlock<'_>, byte_len: usize) -> Result<(), Error> {
    let byte_len = len_u32(byte_len)?;
    let span = block.get_span(str_header_len(byte_len))?;
    let written = try_write_str_header(span, byte_len)?;
    block.advance(written)
}

pub fn write_bin_header(block: &mut ByteBlock<'_>, byte_len: usize) -> Result<(), Error> {
    let byte_len = len_u32(byte_len)?;
    let span = block.get_span(bin_header_len(byte_len))?;
    let written = try_write_bin_header(span, byte_len)?;
    block.advance(written)
}

/// Writes a UTF-8 string value: header plus bytes.
pub fn write_str(block: &mut ByteBlock<'_>, text: &str) -> Result<(), Error> {
    write_str_header(block, text.len())?;
    block.write_bytes(text.as_bytes())
}

/// Writes a binary value: header plus bytes.
pub fn write_bin(block: &mut ByteBlock<'_>, bytes: &[u8]) -> Result<(), Error> {
    write_bin_header(block, bytes.len())?;
    block.write_bytes(bytes)
}

/// Writes a complete extension value.
pub fn write_extension(block: &mut ByteBlock<'_>, type_code: i8, payload: &[u8]) -> Result<(), Error> {
    let length = len_u32(payload.len())?;
    write_ext_header(block, ExtensionHeader::new(type_code, length))?;
    block.write_bytes(payload)
}

/// Appends already encoded MessagePack bytes.
#[inline(always)]
pub fn write_raw(block: &mut ByteBlock<'_>, encoded: &[u8]) -> Result<(), Error> {
    block.write_bytes(encoded)
}
