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

use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use packwire::{Packer, Timestamp};
use tests::{encode, test_roundtrip};

#[test]
fn test_whole_seconds_use_32_bit_shape() {
    let packer = Packer::default();
    let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let bytes = test_roundtrip(&packer, at);
    assert_eq!(bytes.len(), 6);
    assert_eq!(&bytes[..2], &[0xd6, 0xff]);
    assert_eq!(&bytes[2..], &(at.timestamp() as u32).to_be_bytes());
}

#[test]
fn test_sub_second_uses_64_bit_shape() {
    let packer = Packer::default();
    let at = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
    let bytes = test_roundtrip(&packer, at);
    assert_eq!(bytes.len(), 10);
    assert_eq!(&bytes[..2], &[0xd7, 0xff]);
}

#[test]
fn test_pre_epoch_uses_96_bit_shape() {
    let packer = Packer::default();
    let at = Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 40).unwrap();
    let bytes = test_roundtrip(&packer, at);
    assert_eq!(bytes.len(), 15);
    assert_eq!(&bytes[..3], &[0xc7, 0x0c, 0xff]);
}

#[test]
fn test_fixed_offset_reads_back_as_utc() {
    let packer = Packer::default();
    let offset = FixedOffset::east_opt(9 * 3600).unwrap();
    let local = offset.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
    let bytes = encode(&local);
    let back: DateTime<FixedOffset> = packer.deserialize(&bytes).unwrap().unwrap();
    assert_eq!(back, local);
    assert_eq!(back.offset().local_minus_utc(), 0);
    assert_eq!(bytes, encode(&local.with_timezone(&Utc)));
}

#[test]
fn test_naive_is_treated_as_utc() {
    let packer = Packer::default();
    let naive = NaiveDate::from_ymd_opt(2000, 2, 29)
        .unwrap()
        .and_hms_nano_opt(23, 59, 59, 500)
        .unwrap();
    test_roundtrip(&packer, naive);
    assert_eq!(encode(&naive), encode(&naive.and_utc()));
}

#[test]
fn test_local_keeps_instant() {
    let packer = Packer::default();
    let now = Local::now();
    let back: DateTime<Local> = packer.deserialize(&encode(&now)).unwrap().unwrap();
    assert_eq!(back, now);
}

#[test]
fn test_raw_timestamp_values() {
    let packer = Packer::default();
    test_roundtrip(&packer, Timestamp::UNIX_EPOCH);
    test_roundtrip(&packer, Timestamp::new(1 << 34, 0).unwrap());
    test_roundtrip(&packer, Timestamp::new(-62_135_596_800, 999_999_999).unwrap());
    assert!(Timestamp::new(0, 1_000_000_000).is_err());
}

#[test]
fn test_out_of_range_instant_is_rejected() {
    let packer = Packer::default();
    let bytes = encode(&Timestamp::new(i64::MAX, 0).unwrap());
    assert!(packer.deserialize::<DateTime<Utc>>(&bytes).is_err());
    assert!(packer.deserialize::<Timestamp>(&bytes).unwrap().is_some());
}
