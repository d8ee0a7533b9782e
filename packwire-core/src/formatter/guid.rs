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
use uuid::Uuid;

const UUID_LEN: usize = 16;

/// A UUID is a 16-byte bin8 value in RFC 4122 byte order.
impl Formatter for Uuid {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_bin(block, self.as_bytes())
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        let (bytes, consumed) = read::try_read_bin(block.unread())?;
        if bytes.len() < UUID_LEN {
            return Err(Error::truncated(UUID_LEN, bytes.len()));
        }
        let bytes: [u8; UUID_LEN] = bytes.try_into().map_err(|_| {
            Error::invalid_format(format!("uuid payload of {} bytes", bytes.len()))
        })?;
        block.skip(consumed)?;
        Ok(Uuid::from_bytes(bytes))
    }

    fn get_length(&self) -> usize {
        2 + UUID_LEN
    }

    fn default_length() -> usize {
        2 + UUID_LEN
    }
}
