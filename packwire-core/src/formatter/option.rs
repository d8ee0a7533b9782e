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
use crate::resolver::FormatterResolver;

/// `None` is nil; `Some` is the inner encoding.
impl<T: Formatter> Formatter for Option<T> {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        match self {
            Some(value) => value.serialize(block),
            None => write::write_nil(block),
        }
    }

    #[inline(always)]
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        if read::read_nil_if_present(block)? {
            Ok(None)
        } else {
            T::deserialize(block).map(Some)
        }
    }

    fn get_length(&self) -> usize {
        match self {
            Some(value) => value.get_length(),
            None => 1,
        }
    }

    // nil; recursive types reach themselves through an Option
    fn default_length() -> usize {
        1
    }

    fn nil_is_value() -> bool {
        true
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<T>()
    }
}
