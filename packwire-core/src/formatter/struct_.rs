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

//! Support for derived struct formatters.
//!
//! A struct is an array of its fields in declaration order. Readers accept
//! arrays with extra trailing elements, so a field appended by a newer
//! writer does not break an older reader; a shorter array is an error.

use super::DEFAULT_MAX_DEPTH;
use crate::buffer::ByteBlock;
use crate::codec::{read, skip_value};
use crate::error::Error;

/// Reads the array header of a struct with `field_count` fields and
/// returns how many trailing elements the reader must skip.
pub fn read_struct_header<T: 'static>(block: &mut ByteBlock<'_>, field_count: usize) -> Result<usize, Error> {
    let start = block.read_position();
    let len = read::read_array_header(block)?;
    if len < field_count {
        block.seek(start)?;
        return Err(Error::with_type_context::<T>(Error::invalid_format(format!(
            "struct array of {len} elements, expected at least {field_count}"
        ))));
    }
    Ok(len - field_count)
}

/// Reads a struct array: the header, the fields through `read_fields`,
/// then any extra trailing elements. On failure the read position goes
/// back to where the struct started.
pub fn read_struct<'a, T, F>(block: &mut ByteBlock<'a>, field_count: usize, read_fields: F) -> Result<T, Error>
where
    T: 'static,
    F: FnOnce(&mut ByteBlock<'a>) -> Result<T, Error>,
{
    let start = block.read_position();
    let result = read_struct_header::<T>(block, field_count).and_then(|extra| {
        let value = read_fields(block)?;
        skip_extra_fields(block, extra)?;
        Ok(value)
    });
    if result.is_err() {
        let _ = block.seek(start);
    }
    result
}

/// Skips `count` values that follow the known fields.
pub fn skip_extra_fields(block: &mut ByteBlock<'_>, count: usize) -> Result<(), Error> {
    for _ in 0..count {
        skip_value(block, DEFAULT_MAX_DEPTH)?;
    }
    Ok(())
}
