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

use crate::buffer::ByteBlock;
use crate::codec::{self, read};
use crate::compress;
use crate::config::Config;
use crate::error::Error;
use crate::formatter::Formatter;
use crate::memory::ArrayPool;
use crate::resolver::{FormatterInfo, FormatterResolver};
use crate::types::CompressionKind;
use std::io;
use std::sync::Arc;
use tracing::debug;

/// Entry point for turning values into MessagePack payloads and back.
///
/// A `Packer` resolves formatters through a [`FormatterResolver`], writes
/// into blocks rented from an [`ArrayPool`], and applies the configured
/// compression to whole payloads. It is `Send + Sync`; share one instance
/// between threads instead of building one per call.
///
/// # Examples
///
/// ```rust
/// use packwire_core::packer::Packer;
/// use packwire_core::types::CompressionKind;
///
/// let packer = Packer::default();
/// let bytes = packer.serialize(&300u32).unwrap();
/// assert_eq!(bytes, vec![0xcd, 0x01, 0x2c]);
/// assert_eq!(packer.deserialize::<u32>(&bytes).unwrap(), Some(300));
///
/// let packer = Packer::default().compression(CompressionKind::Lz4);
/// let bytes = packer.serialize(&vec![7u8; 1000]).unwrap();
/// assert!(bytes.len() < 100);
/// assert_eq!(packer.deserialize::<Vec<u8>>(&bytes).unwrap(), Some(vec![7u8; 1000]));
/// ```
#[derive(Clone, Debug)]
pub struct Packer {
    config: Config,
    resolver: Arc<FormatterResolver>,
    pool: Arc<ArrayPool<u8>>,
}

impl Default for Packer {
    fn default() -> Self {
        Packer {
            config: Config::default(),
            resolver: FormatterResolver::shared().clone(),
            pool: ArrayPool::shared().clone(),
        }
    }
}

impl Packer {
    /// Builds a packer from `config`. Non-default pool limits give the
    /// packer a pool of its own; otherwise it uses the shared pool.
    pub fn new(config: Config) -> Self {
        let packer = Packer::default();
        let pool_limits = (config.max_pooled_array_len, config.max_arrays_per_bucket);
        let packer = Packer { config, ..packer };
        if pool_limits == (crate::memory::DEFAULT_MAX_ARRAY_LEN, crate::memory::DEFAULT_MAX_ARRAYS_PER_BUCKET) {
            packer
        } else {
            packer.pool_limits(pool_limits.0, pool_limits.1)
        }
    }

    /// Sets the compression applied to every payload.
    ///
    /// The kind is not recorded in the payload, so the reading packer must
    /// be configured with the same kind.
    pub fn compression(mut self, kind: CompressionKind) -> Self {
        self.config.compression = kind;
        self
    }

    /// Sets how many bytes are rented up front for an output block.
    pub fn initial_block_size(mut self, size: usize) -> Self {
        self.config.initial_block_size = size;
        self
    }

    /// Sets the nesting limit for validating payloads and decoding dynamic
    /// values.
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Sets the largest original length an LZ4 payload may declare.
    pub fn max_decompressed_len(mut self, max_len: usize) -> Self {
        self.config.max_decompressed_len = max_len;
        self
    }

    /// Gives this packer a private pool with the given retention limits.
    pub fn pool_limits(mut self, max_array_len: usize, max_arrays_per_bucket: usize) -> Self {
        self.config.max_pooled_array_len = max_array_len;
        self.config.max_arrays_per_bucket = max_arrays_per_bucket;
        self.pool = Arc::new(ArrayPool::with_limits(max_array_len, max_arrays_per_bucket));
        self
    }

    /// Uses `pool` for every block this packer rents.
    pub fn with_pool(mut self, pool: Arc<ArrayPool<u8>>) -> Self {
        self.pool = pool;
        self
    }

    /// Uses `resolver` instead of the shared one.
    pub fn with_resolver(mut self, resolver: Arc<FormatterResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn resolver(&self) -> &Arc<FormatterResolver> {
        &self.resolver
    }

    pub fn pool(&self) -> &Arc<ArrayPool<u8>> {
        &self.pool
    }

    /// Resolves and caches the formatter of `T` ahead of first use.
    pub fn register<T: Formatter>(&self) -> Result<(), Error> {
        self.resolver.register::<T>()
    }

    fn formatter<T: Formatter>(&self) -> Result<Arc<FormatterInfo>, Error> {
        self.resolver.get_formatter::<T>()
    }

    fn rent_block(&self, size: usize) -> ByteBlock<'static> {
        ByteBlock::with_provider(self.pool.clone(), size.max(self.config.initial_block_size))
    }

    /// Encodes `value` into a fresh block, compressed per the config.
    fn encode<T: Formatter>(&self, value: &T) -> Result<ByteBlock<'static>, Error> {
        let info = self.formatter::<T>()?;
        let mut block = self.rent_block(info.default_length());
        info.serialize(value, &mut block)?;
        if !self.config.is_compressed() {
            return Ok(block);
        }
        let compressed = compress::compress_in(self.pool.clone(), self.config.compression, block.as_slice())?;
        debug!(
            "compressed {} payload from {} to {} bytes",
            info.type_name(),
            block.len(),
            compressed.len()
        );
        Ok(compressed)
    }

    /// Serializes `value` into a new byte vector.
    pub fn serialize<T: Formatter>(&self, value: &T) -> Result<Vec<u8>, Error> {
        Ok(self.encode(value)?.to_all_array())
    }

    /// Appends the payload of `value` to `dest`. On failure `dest` is left
    /// as it was.
    pub fn serialize_to_block<T: Formatter>(&self, value: &T, dest: &mut ByteBlock<'_>) -> Result<(), Error> {
        if self.config.is_compressed() {
            let payload = self.encode(value)?;
            return dest.write_block(&payload);
        }
        let info = self.formatter::<T>()?;
        let start = dest.committed();
        info.serialize(value, dest).map_err(|e| {
            let _ = dest.rewind(dest.committed() - start);
            e
        })
    }

    /// Writes the payload of `value` to `writer` and returns its length.
    pub fn serialize_to_writer<T: Formatter, W: io::Write>(&self, value: &T, mut writer: W) -> Result<usize, Error> {
        let payload = self.encode(value)?;
        writer.write_all(payload.as_slice()).map_err(io_error)?;
        Ok(payload.len())
    }

    /// Deserializes a complete payload.
    ///
    /// Empty input and a top-level nil both yield `None`, except for types
    /// whose nil is a value of their own (see [`Formatter::nil_is_value`]).
    /// Bytes left over after the value are an error.
    pub fn deserialize<T: Formatter>(&self, bytes: &[u8]) -> Result<Option<T>, Error> {
        if bytes.is_empty() {
            return Ok(None);
        }
        let mut block = self.open(bytes)?;
        let value = self.read_value(&mut block)?;
        ensure_consumed::<T>(&block)?;
        Ok(value)
    }

    /// Deserializes one value from the read position of `block`.
    ///
    /// Without compression the read position moves past the value and any
    /// following bytes stay unread. With compression the rest of `block` is
    /// one compressed payload and is consumed whole.
    pub fn deserialize_block<T: Formatter>(&self, block: &mut ByteBlock<'_>) -> Result<Option<T>, Error> {
        if block.remaining() == 0 {
            return Ok(None);
        }
        if !self.config.is_compressed() {
            return self.read_value(block);
        }
        let mut payload = self.open(block.unread())?;
        let value = self.read_value(&mut payload)?;
        ensure_consumed::<T>(&payload)?;
        block.skip(block.remaining())?;
        Ok(value)
    }

    /// Reads `reader` to its end and deserializes the payload.
    pub fn deserialize_from_reader<T: Formatter, R: io::Read>(&self, mut reader: R) -> Result<Option<T>, Error> {
        let mut block = self.rent_block(0);
        io::copy(&mut reader, &mut block).map_err(io_error)?;
        if block.is_empty() {
            return Ok(None);
        }
        let mut payload = if self.config.is_compressed() {
            self.open(block.as_slice())?
        } else {
            block
        };
        let value = self.read_value(&mut payload)?;
        ensure_consumed::<T>(&payload)?;
        Ok(value)
    }

    /// Copies or decompresses `bytes` into a block ready for reading.
    fn open(&self, bytes: &[u8]) -> Result<ByteBlock<'static>, Error> {
        compress::decompress_in(
            self.pool.clone(),
            self.config.compression,
            bytes,
            self.config.max_decompressed_len,
        )
    }

    fn read_value<T: Formatter>(&self, block: &mut ByteBlock<'_>) -> Result<Option<T>, Error> {
        codec::value_len(block.unread(), self.config.max_depth)?;
        if !T::nil_is_value() && read::read_nil_if_present(block)? {
            return Ok(None);
        }
        let info = self.formatter::<T>()?;
        info.deserialize::<T>(block).map(Some)
    }

    /// Compresses raw bytes with `kind`.
    pub fn compress(&self, kind: CompressionKind, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        Ok(compress::compress_in(self.pool.clone(), kind, bytes)?.to_all_array())
    }

    /// Reverses [`Packer::compress`], honouring the configured
    /// decompressed length limit.
    pub fn decompress(&self, kind: CompressionKind, bytes: &[u8]) -> Result<Vec<u8>, Error> {
        let block = compress::decompress_in(self.pool.clone(), kind, bytes, self.config.max_decompressed_len)?;
        Ok(block.to_all_array())
    }

    /// Exact uncompressed encoded size of `value`.
    pub fn get_length<T: Formatter>(&self, value: &T) -> Result<usize, Error> {
        self.formatter::<T>()?.get_length(value)
    }

    /// Size estimate the formatter of `T` reports before a value is known.
    pub fn get_default_length<T: Formatter>(&self) -> Result<usize, Error> {
        Ok(self.formatter::<T>()?.default_length())
    }
}

fn ensure_consumed<T: 'static>(block: &ByteBlock<'_>) -> Result<(), Error> {
    if block.remaining() != 0 {
        return Err(Error::with_type_context::<T>(Error::invalid_format(format!(
            "{} bytes left after the payload",
            block.remaining()
        ))));
    }
    Ok(())
}

#[cold]
fn io_error(err: io::Error) -> Error {
    Error::unknown(format!("io error: {err}"))
}
