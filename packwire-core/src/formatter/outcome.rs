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
use crate::codec::write;
use crate::error::Error;
use crate::resolver::FormatterResolver;

/// Success flag plus message.
///
/// Written as a bool followed by a string, with no enclosing array header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    pub is_success: bool,
    pub message: String,
}

impl Outcome {
    pub fn success() -> Self {
        Outcome {
            is_success: true,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Outcome {
            is_success: false,
            message: message.into(),
        }
    }
}

impl Formatter for Outcome {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        self.is_success.serialize(block)?;
        write::write_str(block, &self.message)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        let is_success = bool::deserialize(block)?;
        let message = String::deserialize(block)?;
        Ok(Outcome {
            is_success,
            message,
        })
    }

    fn get_length(&self) -> usize {
        1 + write::str_len(&self.message)
    }

    fn default_length() -> usize {
        2
    }
}

/// Success flag, message and payload, written in that order with no
/// enclosing header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValueOutcome<T> {
    pub is_success: bool,
    pub message: String,
    pub value: T,
}

impl<T> ValueOutcome<T> {
    pub fn success(value: T) -> Self {
        ValueOutcome {
            is_success: true,
            message: String::new(),
            value,
        }
    }

    pub fn failure(message: impl Into<String>, value: T) -> Self {
        ValueOutcome {
            is_success: false,
            message: message.into(),
            value,
        }
    }
}

impl<T: Formatter> Formatter for ValueOutcome<T> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        self.is_success.serialize(block)?;
        write::write_str(block, &self.message)?;
        self.value.serialize(block)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        let is_success = bool::deserialize(block)?;
        let message = String::deserialize(block)?;
        let value = T::deserialize(block)?;
        Ok(ValueOutcome {
            is_success,
            message,
            value,
        })
    }

    fn get_length(&self) -> usize {
        1 + write::str_len(&self.message) + self.value.get_length()
    }

    fn default_length() -> usize {
        2 + T::default_length()
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<T>()
    }
}
