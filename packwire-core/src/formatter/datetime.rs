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
use crate::codec::{read, write, Timestamp};
use crate::error::Error;
use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Utc};

const TIMESTAMP_DEFAULT_LENGTH: usize = 15;

impl Formatter for Timestamp {
    #[inline(always)]
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_timestamp(block, *self)
    }

    #[inline(always)]
    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read::read_timestamp(block)
    }

    fn get_length(&self) -> usize {
        write::timestamp_len(self)
    }

    fn default_length() -> usize {
        TIMESTAMP_DEFAULT_LENGTH
    }
}

fn read_utc(block: &mut ByteBlock<'_>) -> Result<DateTime<Utc>, Error> {
    let start = block.read_position();
    let timestamp = read::read_timestamp(block)?;
    timestamp.to_utc().map_err(|e| {
        let _ = block.seek(start);
        e
    })
}

impl Formatter for DateTime<Utc> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_timestamp(block, Timestamp::from_datetime(self))
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read_utc(block)
    }

    fn get_length(&self) -> usize {
        write::timestamp_len(&Timestamp::from_datetime(self))
    }

    fn default_length() -> usize {
        TIMESTAMP_DEFAULT_LENGTH
    }
}

/// Local times are converted to UTC on write and back to the local zone
/// on read.
impl Formatter for DateTime<Local> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_timestamp(block, Timestamp::from_datetime(self))
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        Ok(read_utc(block)?.with_timezone(&Local))
    }

    fn get_length(&self) -> usize {
        write::timestamp_len(&Timestamp::from_datetime(self))
    }

    fn default_length() -> usize {
        TIMESTAMP_DEFAULT_LENGTH
    }
}

/// The wire format has no offset field: the instant survives, the offset
/// reads back as UTC.
impl Formatter for DateTime<FixedOffset> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_timestamp(block, Timestamp::from_datetime(self))
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        Ok(read_utc(block)?.fixed_offset())
    }

    fn get_length(&self) -> usize {
        write::timestamp_len(&Timestamp::from_datetime(self))
    }

    fn default_length() -> usize {
        TIMESTAMP_DEFAULT_LENGTH
    }
}

/// Zone-less date-times are written as if they were UTC.
impl Formatter for NaiveDateTime {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        write::write_timestamp(block, Timestamp::from_naive(self))
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        Ok(read_utc(block)?.naive_utc())
    }

    fn get_length(&self) -> usize {
        write::timestamp_len(&Timestamp::from_naive(self))
    }

    fn default_length() -> usize {
        TIMESTAMP_DEFAULT_LENGTH
    }
}
