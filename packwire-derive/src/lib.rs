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

//! # Packwire Derive Macros
//!
//! `#[derive(PackObject)]` implements `packwire_core::formatter::Formatter`
//! for a struct or a fieldless enum.
//!
//! **Structs** (named, tuple and unit) are written as a MessagePack array
//! of their fields in declaration order. Fields marked
//! `#[packwire(skip)]` are left out of the array and rebuilt with
//! `Default` when reading. A reader accepts an array with more elements
//! than it has fields and skips the extras; an array with fewer elements
//! is an error.
//!
//! **Enums** must be fieldless. A variant is written as its discriminant
//! through the formatter of the enum's `#[repr]` integer type, `i32` when
//! the enum has no repr. Reading an unknown discriminant is an error.
//!
//! Generated code refers to `::packwire_core`, so the deriving crate must
//! depend on `packwire-core`.
//!
//! ```rust
//! use packwire_core::packer::Packer;
//! use packwire_derive::PackObject;
//!
//! #[derive(PackObject, Debug, PartialEq)]
//! struct Order {
//!     id: u64,
//!     items: Vec<String>,
//!     status: Status,
//!     #[packwire(skip)]
//!     cached_total: Option<f64>,
//! }
//!
//! #[derive(PackObject, Debug, PartialEq)]
//! #[repr(u8)]
//! enum Status {
//!     Open = 1,
//!     Shipped = 2,
//! }
//!
//! let packer = Packer::default();
//! let order = Order {
//!     id: 7,
//!     items: vec!["tea".to_string()],
//!     status: Status::Shipped,
//!     cached_total: None,
//! };
//! let bytes = packer.serialize(&order).unwrap();
//! assert_eq!(bytes, vec![0x93, 0x07, 0x91, 0xa3, b't', b'e', b'a', 0x02]);
//! assert_eq!(packer.deserialize::<Order>(&bytes).unwrap(), Some(order));
//! ```

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

mod object;

/// Derives `Formatter` for a struct or a fieldless enum.
///
/// Field attribute:
///
/// - `#[packwire(skip)]`: leave the field out of the encoding and fill it
///   with `Default::default()` when decoding.
#[proc_macro_derive(PackObject, attributes(packwire))]
pub fn proc_macro_derive_pack_object(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    object::derive_formatter(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
