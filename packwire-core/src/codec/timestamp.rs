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

use crate::error::Error;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// A point in time as seconds and nanoseconds since the Unix epoch (UTC).
///
/// This is the value carried by the timestamp extension (type -1).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp {
    pub seconds: i64,
    /// Always below 1,000,000,000.
    pub nanos: u32,
}

impl Timestamp {
    pub const UNIX_EPOCH: Timestamp = Timestamp {
        seconds: 0,
        nanos: 0,
    };

    pub fn new(seconds: i64, nanos: u32) -> Result<Self, Error> {
        if nanos >= NANOS_PER_SECOND {
            return Err(Error::invalid_format(format!(
                "timestamp nanoseconds out of range: {nanos}"
            )));
        }
        Ok(Timestamp { seconds, nanos })
    }

    /// Converts any zoned date-time; the result is always in UTC.
    pub fn from_datetime<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        let seconds = datetime.timestamp();
        let nanos = datetime.timestamp_subsec_nanos();
        // leap seconds are reported as nanos >= 1e9
        if nanos >= NANOS_PER_SECOND {
            Timestamp {
                seconds: seconds + 1,
                nanos: nanos - NANOS_PER_SECOND,
            }
        } else {
            Timestamp { seconds, nanos }
        }
    }

    /// Converts a date-time without a zone. Its fields are written as they
    /// are, without any offset applied.
    pub fn from_naive(datetime: &NaiveDateTime) -> Self {
        Timestamp::from_datetime(&datetime.and_utc())
    }

    pub fn to_utc(&self) -> Result<DateTime<Utc>, Error> {
        DateTime::from_timestamp(self.seconds, self.nanos).ok_or_else(|| {
            Error::invalid_format(format!(
                "timestamp {}.{:09} is outside the supported date range",
                self.seconds, self.nanos
            ))
        })
    }

    pub fn to_naive(&self) -> Result<NaiveDateTime, Error> {
        Ok(self.to_utc()?.naive_utc())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Timestamp::from_datetime(&datetime)
    }
}
