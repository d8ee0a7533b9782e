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

//! Support for fieldless enums.
//!
//! `#[derive(PackObject)]` encodes a fieldless enum through the integer
//! formatter of its `#[repr]` type (`i32` when there is none). The wire
//! size therefore follows the discriminant value, and changing the repr
//! type changes which values decode.

use crate::error::Error;
use std::fmt::Display;

/// Error for a discriminant with no matching variant in `T`.
#[cold]
pub fn unknown_variant<T: 'static>(discriminant: impl Display) -> Error {
    Error::invalid_format(format!(
        "unknown discriminant {discriminant} for enum {}",
        std::any::type_name::<T>()
    ))
}
