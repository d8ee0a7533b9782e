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

//! # Packwire Core
//!
//! The core of the packwire serialization engine: pooled byte arenas, a
//! MessagePack codec built on them, type-driven formatters, and an LZ4
//! block codec for wrapping finished payloads.
//!
//! ## Architecture
//!
//! - **`memory`**: growable element arenas over pooled, fixed or owned
//!   storage, and the size-classed [`ArrayPool`](memory::ArrayPool)
//! - **`buffer`**: [`ByteBlock`](buffer::ByteBlock), a byte arena with a
//!   read cursor
//! - **`codec`**: MessagePack encoders and decoders over slices and blocks
//! - **`formatter`**: the [`Formatter`](formatter::Formatter) trait and the
//!   built-in formatters
//! - **`resolver`**: the concurrent formatter cache
//! - **`compress`**: LZ4 block compression and payload framing
//! - **`packer`**: the [`Packer`](packer::Packer) facade
//! - **`types`**: format codes and wire-level enums
//! - **`config`**, **`error`**, **`util`**
//!
//! ## Wire format
//!
//! Every value is standard MessagePack in its narrowest encoding, with
//! big-endian multi-byte fields. Structs are arrays of their fields in
//! declaration order and fieldless enums are their integer discriminant.
//! Timestamps use extension type -1 in its 32, 64 or 96 bit shape.
//!
//! ## Block lifecycle
//!
//! A block rents its storage from a provider on first write, grows by
//! renting a larger array and returning the old one, and gives its array
//! back exactly once when released or dropped. Fixed blocks over caller
//! memory never grow.
//!
//! ```rust
//! use packwire_core::buffer::ByteBlock;
//! use packwire_core::codec::{read, write};
//!
//! let mut block = ByteBlock::new();
//! write::write_str(&mut block, "hello").unwrap();
//! write::write_u16(&mut block, 300).unwrap();
//! assert_eq!(block.as_slice(), &[0xa5, b'h', b'e', b'l', b'l', b'o', 0xcd, 0x01, 0x2c]);
//!
//! assert_eq!(read::read_string(&mut block).unwrap(), "hello");
//! assert_eq!(read::read_u32(&mut block).unwrap(), 300);
//! ```

pub mod buffer;
pub mod codec;
pub mod compress;
pub mod config;
pub mod error;
pub mod formatter;
pub mod memory;
pub mod packer;
pub mod resolver;
pub mod types;
pub mod util;

pub use buffer::{ByteBlock, TextEncoding};
pub use config::Config;
pub use error::Error;
pub use formatter::{Extension, Formatter, Outcome, Value, ValueOutcome};
pub use memory::{ArrayPool, BlockProvider, MemoryBlock, MemoryOwner};
pub use packer::Packer;
pub use resolver::{FormatterInfo, FormatterResolver};
pub use types::CompressionKind;
