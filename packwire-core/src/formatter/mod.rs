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

//! Type-driven formatters over the binary codec.
//!
//! A [`Formatter`] knows how to append a value to a [`ByteBlock`], how to
//! read it back, and how many bytes that takes. Implementations exist for
//! the primitive, string, collection, date/time and identifier types below;
//! structs and fieldless enums get one from `#[derive(PackObject)]`.

use crate::buffer::ByteBlock;
use crate::error::Error;
use crate::resolver::FormatterResolver;

mod binary;
mod bool;
mod collection;
mod datetime;
pub mod enum_;
mod extension;
mod guid;
mod map;
mod number;
mod option;
mod outcome;
mod pointer;
mod string;
pub mod struct_;
mod tuple;
mod value;

pub use extension::Extension;
pub use outcome::{Outcome, ValueOutcome};
pub use value::Value;

/// Nesting limit applied by formatters that decode arbitrary structures.
pub const DEFAULT_MAX_DEPTH: u32 = 64;

pub trait Formatter: Sized + 'static {
    /// Appends the encoding of `self` at the write position.
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error>;

    /// Decodes one value at the read position.
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error>;

    /// Encoded size of `self` in bytes. Exact for the built-in formatters.
    fn get_length(&self) -> usize {
        Self::default_length()
    }

    /// Size estimate used to pre-size a block before the value is known.
    fn default_length() -> usize;

    /// True when a nil encoding is a value of this type. Otherwise a
    /// top-level nil means no value at all.
    fn nil_is_value() -> bool {
        false
    }

    /// Registers the formatters of the types this one is built from.
    fn resolve_dependencies(_resolver: &FormatterResolver) -> Result<(), Error> {
        Ok(())
    }
}

/// Reads an array header and fails unless it holds exactly `expected`
/// elements.
pub fn read_exact_array_header<T: 'static>(block: &mut ByteBlock<'_>, expected: usize) -> Result<(), Error> {
    let start = block.read_position();
    let len = crate::codec::read::read_array_header(block)?;
    if len != expected {
        block.seek(start)?;
        return Err(Error::with_type_context::<T>(Error::invalid_format(format!(
            "array of {len} elements, expected {expected}"
        ))));
    }
    Ok(())
}
