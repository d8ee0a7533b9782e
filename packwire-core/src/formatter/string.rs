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

impl Formatter for String {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_str(block, self)
    }

    #[inline(always)]
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read::read_string(block)
    }

    #[inline(always)]
    fn get_length(&self) -> usize {
        write::str_len(self)
    }

    fn default_length() -> usize {
        16
    }
}

impl Formatter for Box<str> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_str(block, self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        Ok(read::read_string(block)?.into_boxed_str())
    }

    fn get_length(&self) -> usize {
        write::str_len(self)
    }

    fn default_length() -> usize {
        16
    }
}
