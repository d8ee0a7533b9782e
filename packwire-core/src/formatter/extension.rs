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
use bytes::Bytes;

/// An extension value with an application-defined type code.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extension {
    pub type_code: i8,
    pub payload: Bytes,
}

impl Extension {
    pub fn new(type_code: i8, payload: impl Into<Bytes>) -> Self {
        Extension {
            type_code,
            payload: payload.into(),
        }
    }
}

impl Formatter for Extension {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_extension(block, self.type_code, &self.payload)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        let (type_code, payload) = read::read_extension(block)?;
        Ok(Extension::new(type_code, payload))
    }

    fn get_length(&self) -> usize {
        let len = self.payload.len().min(u32::MAX as usize) as u32;
        write::ext_header_len(len) + self.payload.len()
    }

    fn default_length() -> usize {
        3
    }
}
