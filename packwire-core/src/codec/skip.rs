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

use super::read::{first, length_field, need};
use crate::buffer::ByteBlock;
use crate::error::Error;
use crate::types::code;

/// Header size, payload size and number of nested values of the value
/// starting at `src[0]`.
fn frame(src: &[u8]) -> Result<(usize, usize, usize), Error> {
    let format_code = first(src)?;
    Ok(match format_code {
        code::POSITIVE_FIXINT_MIN..=code::POSITIVE_FIXINT_MAX
        | code::NEGATIVE_FIXINT_MIN..=code::NEGATIVE_FIXINT_MAX
        | code::NIL
        | code::FALSE
        | code::TRUE => (1, 0, 0),
        code::FIXMAP_MIN..=code::FIXMAP_MAX => (1, 0, (format_code & 0x0f) as usize * 2),
        code::FIXARRAY_MIN..=code::FIXARRAY_MAX => (1, 0, (format_code & 0x0f) as usize),
        code::FIXSTR_MIN..=code::FIXSTR_MAX => (1, (format_code & 0x1f) as usize, 0),
        code::UINT8 | code::INT8 => (1, 1, 0),
        code::UINT16 | code::INT16 => (1, 2, 0),
        code::UINT32 | code::INT32 | code::FLOAT32 => (1, 4, 0),
        code::UINT64 | code::INT64 | code::FLOAT64 => (1, 8, 0),
        code::STR8 | code::BIN8 => (2, length_field(src, 1)?, 0),
        code::STR16 | code::BIN16 => (3, length_field(src, 2)?, 0),
        code::STR32 | code::BIN32 => (5, length_field(src, 4)?, 0),
        code::FIXEXT1 => (2, 1, 0),
        code::FIXEXT2 => (2, 2, 0),
        code::FIXEXT4 => (2, 4, 0),
        code::FIXEXT8 => (2, 8, 0),
        code::FIXEXT16 => (2, 16, 0),
        code::EXT8 => (3, length_field(src, 1)?, 0),
        code::EXT16 => (4, length_field(src, 2)?, 0),
        code::EXT32 => (6, length_field(src, 4)?, 0),
        code::ARRAY16 => (3, 0, length_field(src, 2)?),
        code::ARRAY32 => (5, 0, length_field(src, 4)?),
        code::MAP16 => (3, 0, length_field(src, 2)? * 2),
        code::MAP32 => (5, 0, length_field(src, 4)? * 2),
        other => return Err(Error::unexpected_code(other, "any value")),
    })
}

fn measure(src: &[u8], depth: u32, max_depth: u32) -> Result<usize, Error> {
    let (header, payload, children) = frame(src)?;
    let mut len = header + payload;
    need(src, len)?;
    if children == 0 {
        return Ok(len);
    }
    if depth >= max_depth {
        return Err(Error::depth_exceed(format!(
            "nesting deeper than {max_depth} levels"
        )));
    }
    for _ in 0..children {
        len += measure(&src[len..], depth + 1, max_depth)?;
    }
    Ok(len)
}

/// Byte length of the complete value at the front of `src`, nested values
/// included.
pub fn value_len(src: &[u8], max_depth: u32) -> Result<usize, Error> {
    measure(src, 0, max_depth)
}

/// Advances the read position past one complete value.
///
/// Nothing is consumed when the value is truncated, malformed or nested
/// deeper than `max_depth`.
pub fn skip_value(block: &mut ByteBlock<'_>, max_depth: u32) -> Result<(), Error> {
    let len = value_len(block.unread(), max_depth)?;
    block.skip(len)
}
