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

//! # Packwire
//!
//! MessagePack serialization over pooled byte blocks, with optional LZ4
//! compression of whole payloads.
//!
//! - Values are written in standard MessagePack, always in the narrowest
//!   encoding, so any MessagePack reader can decode them.
//! - Output blocks rent their storage from a size-classed pool and give it
//!   back when dropped.
//! - Formatters are resolved per type once and cached in a concurrent
//!   registry shared by every [`Packer`].
//! - `#[derive(PackObject)]` writes structs as arrays of their fields and
//!   fieldless enums as their integer discriminant.
//!
//! ## Quick start
//!
//! ```rust
//! use packwire::{CompressionKind, PackObject, Packer};
//! use std::collections::HashMap;
//!
//! #[derive(PackObject, Debug, PartialEq)]
//! struct Reading {
//!     sensor: String,
//!     samples: Vec<f64>,
//!     tags: HashMap<String, String>,
//! }
//!
//! let packer = Packer::default().compression(CompressionKind::Lz4);
//! let reading = Reading {
//!     sensor: "north-2".to_string(),
//!     samples: vec![20.5; 64],
//!     tags: HashMap::new(),
//! };
//! let bytes = packer.serialize(&reading).unwrap();
//! let back: Option<Reading> = packer.deserialize(&bytes).unwrap();
//! assert_eq!(back, Some(reading));
//! ```
//!
//! The compression kind is not stored in the payload; the reader must be
//! configured with the kind the writer used.
//!
//! ## Lower layers
//!
//! [`ByteBlock`] and the `codec` module of `packwire-core` can be used
//! directly to hand-encode values, and `packwire_core::compress::lz4`
//! exposes the raw LZ4 block codec. Types that derive [`PackObject`]
//! need `packwire-core` as a direct dependency.

pub use packwire_core::{
    buffer::ByteBlock, buffer::TextEncoding, codec::Timestamp, config::Config, error::Error,
    formatter::Extension, formatter::Formatter, formatter::Outcome, formatter::Value,
    formatter::ValueOutcome, memory::ArrayPool, packer::Packer, resolver::FormatterResolver,
    types::CompressionKind,
};
pub use packwire_derive::PackObject;
