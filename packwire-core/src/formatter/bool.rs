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

use super::Formatter;
use crate::buffer::ByteBlock;
use crate::codec::{read, write};
use crate::error::Error;

impl Formatter for bool {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_bool(block, *self)
    }

    #[inline(always)]
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read::read_bool(block)
    }

    fn default_length() -> usize {
        1
    }
}

/// Chars travel as their Unicode scalar value.
impl Formatter for char {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_u32(block, *self as u32)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        let start = block.read_position();
        let scalar = read::read_u32(block)?;
        char::from_u32(scalar).ok_or_else(|| {
            let _ = block.seek(start);
            Error::invalid_format(format!("0x{scalar:x} is not a Unicode scalar value"))
        })
    }

    fn get_length(&self) -> usize {
        write::uint_len(*self as u64)
    }

    fn default_length() -> usize {
        5
    }
}

/// The unit value is nil.
impl Formatter for () {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_nil(block)
    }

    #[inline(always)]
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read::read_nil(block)
    }

    fn default_length() -> usize {
        1
    }

    fn nil_is_value() -> bool {
        true
    }
}
