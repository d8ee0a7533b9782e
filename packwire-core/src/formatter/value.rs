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

use super::{Extension, Formatter, DEFAULT_MAX_DEPTH};
use crate::buffer::ByteBlock;
use crate::codec::{read, write};
use crate::error::Error;
use crate::types::{code, FormatKind};

/// Any MessagePack value.
///
/// Non-negative integers decode as [`Value::UInt`] and negative ones as
/// [`Value::Int`], whichever variant wrote them.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    UInt(u64),
    F32(f32),
    F64(f64),
    String(String),
    Binary(Vec<u8>),
    Array(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Extension(Extension),
}

impl Value {
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::UInt(v) => Some(*v),
            Value::Int(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::UInt(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(v) => Some(*v as f64),
            Value::F64(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            Value::UInt(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Decodes one value, allowing at most `max_depth` levels of nesting.
    pub fn read_with_depth(block: &mut ByteBlock<'_>, max_depth: u32) -> Result<Value, Error> {
        let start = block.read_position();
        read_value(block, 0, max_depth).map_err(|e| {
            let _ = block.seek(start);
            e
        })
    }
}

fn read_value(block: &mut ByteBlock<'_>, depth: u32, max_depth: u32) -> Result<Value, Error> {
    let format_code = read::peek_code(block)?;
    Ok(match FormatKind::of(format_code) {
        FormatKind::Nil => {
            read::read_nil(block)?;
            Value::Nil
        }
        FormatKind::Boolean => Value::Bool(read::read_bool(block)?),
        FormatKind::Integer => match format_code {
            code::NEGATIVE_FIXINT_MIN..=code::NEGATIVE_FIXINT_MAX | code::INT8..=code::INT64 => {
                let value = read::read_i64(block)?;
                match u64::try_from(value) {
                    Ok(unsigned) => Value::UInt(unsigned),
                    Err(_) => Value::Int(value),
                }
            }
            _ => Value::UInt(read::read_u64(block)?),
        },
        FormatKind::Float if format_code == code::FLOAT32 => Value::F32(read::read_f32(block)?),
        FormatKind::Float => Value::F64(read::read_f64(block)?),
        FormatKind::String => Value::String(read::read_string(block)?),
        FormatKind::Binary => Value::Binary(read::read_bin(block)?),
        FormatKind::Extension => Value::Extension(Extension::deserialize(block)?),
        FormatKind::Array => {
            let len = read::read_array_header(block)?;
            check_depth(depth, max_depth, len)?;
            let items = (0..len)
                .map(|_| read_value(block, depth + 1, max_depth))
                .collect::<Result<Vec<_>, Error>>()?;
            Value::Array(items)
        }
        FormatKind::Map => {
            let len = read::read_map_header(block)?;
            check_depth(depth, max_depth, len)?;
            let entries = (0..len)
                .map(|_| -> Result<(Value, Value), Error> {
                    Ok((
                        read_value(block, depth + 1, max_depth)?,
                        read_value(block, depth + 1, max_depth)?,
                    ))
                })
                .collect::<Result<Vec<_>, Error>>()?;
            Value::Map(entries)
        }
        FormatKind::NeverUsed => return Err(Error::unexpected_code(format_code, "any value")),
    })
}

#[inline(always)]
fn check_depth(depth: u32, max_depth: u32, len: usize) -> Result<(), Error> {
    if len > 0 && depth >= max_depth {
        return Err(Error::depth_exceed(format!(
            "nesting deeper than {max_depth} levels"
        )));
    }
    Ok(())
}

impl Formatter for Value {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        match self {
            Value::Nil => write::write_nil(block),
            Value::Bool(v) => write::write_bool(block, *v),
            Value::Int(v) => write::write_i64(block, *v),
            Value::UInt(v) => write::write_u64(block, *v),
            Value::F32(v) => write::write_f32(block, *v),
            Value::F64(v) => write::write_f64(block, *v),
            Value::String(v) => write::write_str(block, v),
            Value::Binary(v) => write::write_bin(block, v),
            Value::Array(items) => {
                write::write_array_header(block, items.len())?;
                items.iter().try_for_each(|item| item.serialize(block))
            }
            Value::Map(entries) => {
                write::write_map_header(block, entries.len())?;
                entries.iter().try_for_each(|(key, value)| {
                    key.serialize(block)?;
                    value.serialize(block)
                })
            }
            Value::Extension(ext) => ext.serialize(block),
        }
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        Value::read_with_depth(block, DEFAULT_MAX_DEPTH)
    }

    fn get_length(&self) -> usize {
        match self {
            Value::Nil | Value::Bool(_) => 1,
            Value::Int(v) => write::int_len(*v),
            Value::UInt(v) => write::uint_len(*v),
            Value::F32(_) => 5,
            Value::F64(_) => 9,
            Value::String(v) => write::str_len(v),
            Value::Binary(v) => write::bin_len(v),
            Value::Array(items) => {
                write::array_header_len(items.len() as u32)
                    + items.iter().map(Value::get_length).sum::<usize>()
            }
            Value::Map(entries) => {
                write::map_header_len(entries.len() as u32)
                    + entries
                        .iter()
                        .map(|(k, v)| k.get_length() + v.get_length())
                        .sum::<usize>()
            }
            Value::Extension(ext) => ext.get_length(),
        }
    }

    fn default_length() -> usize {
        1
    }

    fn nil_is_value() -> bool {
        true
    }
}

macro_rules! impl_value_from {
    ($($ty:ty => $variant:ident as $target:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::$variant(v as $target)
                }
            }
        )*
    };
}

impl_value_from! {
    u8 => UInt as u64,
    u16 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    i8 => Int as i64,
    i16 => Int as i64,
    i32 => Int as i64,
    i64 => Int as i64,
    f32 => F32 as f32,
    f64 => F64 as f64,
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}
