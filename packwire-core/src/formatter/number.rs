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
use paste::paste;

macro_rules! impl_uint_formatter {
    ($($ty:ident),*) => {
        paste! {
            $(
                impl Formatter for $ty {
                    #[inline(always)]
                    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
                        write::[<write_ $ty>](block, *self)
                    }

                    #[inline(always)]
                    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
                        read::[<read_ $ty>](block)
                    }

                    #[inline(always)]
                    fn get_length(&self) -> usize {
                        write::uint_len(*self as u64)
                    }

                    #[inline(always)]
                    fn default_length() -> usize {
                        1 + std::mem::size_of::<$ty>()
                    }
                }
            )*
        }
    };
}

macro_rules! impl_int_formatter {
    ($($ty:ident),*) => {
        paste! {
            $(
                impl Formatter for $ty {
                    #[inline(always)]
                    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
                        write::[<write_ $ty>](block, *self)
                    }

                    #[inline(always)]
                    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
                        read::[<read_ $ty>](block)
                    }

                    #[inline(always)]
                    fn get_length(&self) -> usize {
                        write::int_len(*self as i64)
                    }

                    #[inline(always)]
                    fn default_length() -> usize {
                        1 + std::mem::size_of::<$ty>()
                    }
                }
            )*
        }
    };
}

impl_uint_formatter!(u8, u16, u32, u64);
impl_int_formatter!(i8, i16, i32, i64);

impl Formatter for usize {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_u64(block, *self as u64)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        let start = block.read_position();
        let value = read::read_u64(block)?;
        usize::try_from(value).map_err(|_| {
            let _ = block.seek(start);
            Error::invalid_format(format!("integer {value} out of range for usize"))
        })
    }

    fn get_length(&self) -> usize {
        write::uint_len(*self as u64)
    }

    fn default_length() -> usize {
        9
    }
}

impl Formatter for isize {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_i64(block, *self as i64)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        let start = block.read_position();
        let value = read::read_i64(block)?;
        isize::try_from(value).map_err(|_| {
            let _ = block.seek(start);
            Error::invalid_format(format!("integer {value} out of range for isize"))
        })
    }

    fn get_length(&self) -> usize {
        write::int_len(*self as i64)
    }

    fn default_length() -> usize {
        9
    }
}

impl Formatter for f32 {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_f32(block, *self)
    }

    #[inline(always)]
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read::read_f32(block)
    }

    fn default_length() -> usize {
        5
    }
}

impl Formatter for f64 {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_f64(block, *self)
    }

    #[inline(always)]
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read::read_f64(block)
    }

    fn default_length() -> usize {
        9
    }
}
