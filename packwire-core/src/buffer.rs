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
use crate::memory::{ArrayPool, BackingKind, BlockProvider, MemoryBlock, MemoryOwner};
use byteorder::{BigEndian, ByteOrder, LittleEndian};
use bytes::Buf;
use sha2::{Digest, Sha256};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::io;
use std::sync::Arc;

/// Text encodings accepted by [`ByteBlock::write_str_encoded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Utf16Le,
    Utf16Be,
}

/// A byte arena with a read cursor.
///
/// Writes append at the committed end; reads consume from the read
/// position. `read_position() <= committed() <= capacity()` always holds.
///
/// Equality and hashing look at the committed bytes only. Cloning copies
/// them into a new pooled block, so two blocks never share storage.
pub struct ByteBlock<'a> {
    block: MemoryBlock<'a, u8>,
    read_position: usize,
}

impl ByteBlock<'static> {
    /// An empty block that rents from the shared pool on its first write.
    pub fn new() -> Self {
        ByteBlock::from_memory(MemoryBlock::unrented(ArrayPool::shared().clone()))
    }

    /// An empty block with at least `capacity` bytes rented from the shared
    /// pool.
    pub fn with_capacity(capacity: usize) -> Self {
        ByteBlock::with_provider(ArrayPool::shared().clone(), capacity)
    }

    pub fn with_provider(provider: Arc<dyn BlockProvider<u8>>, capacity: usize) -> Self {
        ByteBlock::from_memory(MemoryBlock::rent(provider, capacity))
    }

    /// Copies `bytes` into storage rented from the shared pool.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        ByteBlock::from_bytes_in(ArrayPool::shared().clone(), bytes)
    }

    /// Copies `bytes` into storage rented from `provider`.
    pub fn from_bytes_in(provider: Arc<dyn BlockProvider<u8>>, bytes: &[u8]) -> Self {
        ByteBlock::from_memory(MemoryBlock::rent_copy(provider, bytes))
    }

    /// Wraps `bytes` without copying. All of it counts as written and the
    /// block cannot grow.
    pub fn wrap_vec(bytes: Vec<u8>) -> Self {
        ByteBlock::from_memory(MemoryBlock::from(bytes))
    }
}

impl Default for ByteBlock<'static> {
    fn default() -> Self {
        ByteBlock::new()
    }
}

impl From<Vec<u8>> for ByteBlock<'static> {
    fn from(bytes: Vec<u8>) -> Self {
        ByteBlock::wrap_vec(bytes)
    }
}

impl<'a> ByteBlock<'a> {
    pub fn from_memory(block: MemoryBlock<'a, u8>) -> Self {
        ByteBlock {
            block,
            read_position: 0,
        }
    }

    /// Uses `memory` as an empty, fixed-size destination. Writes past its
    /// end fail.
    pub fn wrap_slice(memory: &'a mut [u8]) -> Self {
        ByteBlock::from_memory(MemoryBlock::destination(memory))
    }

    /// Takes ownership of `owner`; the first `committed` bytes count as
    /// written.
    pub fn wrap_owner(owner: Box<dyn MemoryOwner<u8> + 'a>, committed: usize) -> Result<Self, Error> {
        Ok(ByteBlock::from_memory(MemoryBlock::from_owner(owner, committed)?))
    }

    pub fn memory(&self) -> &MemoryBlock<'a, u8> {
        &self.block
    }

    pub fn into_memory(self) -> MemoryBlock<'a, u8> {
        self.block
    }

    #[inline(always)]
    pub fn committed(&self) -> usize {
        self.block.committed()
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.block.committed()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.block.capacity()
    }

    #[inline(always)]
    pub fn available(&self) -> usize {
        self.block.available()
    }

    pub fn kind(&self) -> BackingKind {
        self.block.kind()
    }

    pub fn is_bound(&self) -> bool {
        self.block.is_bound()
    }

    pub fn is_disposed(&self) -> bool {
        self.block.kind() == BackingKind::Released
    }

    /// The committed bytes, read or not.
    #[inline(always)]
    pub fn as_slice(&self) -> &[u8] {
        self.block.as_slice()
    }

    #[doc(alias = "get_memory")]
    #[inline(always)]
    pub fn get_span(&mut self, size_hint: usize) -> Result<&mut [u8], Error> {
        self.block.get_span(size_hint)
    }

    #[inline(always)]
    pub fn advance(&mut self, count: usize) -> Result<(), Error> {
        self.block.advance(count)
    }

    /// Un-commits the last `count` bytes. The read position is pulled back
    /// if it pointed past the new end.
    pub fn rewind(&mut self, count: usize) -> Result<(), Error> {
        self.block.rewind(count)?;
        self.read_position = self.read_position.min(self.block.committed());
        Ok(())
    }

    /// Zeroes the committed bytes and resets both cursors.
    pub fn clear(&mut self) {
        self.block.clear();
        self.read_position = 0;
    }

    // ---------- writers ----------

    #[inline(always)]
    pub fn write_u8(&mut self, value: u8) -> Result<(), Error> {
        self.block.push(value)
    }

    #[inline(always)]
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.block.write(bytes)
    }

    /// Appends the UTF-8 bytes of `text` without a length prefix.
    #[inline(always)]
    pub fn write_str(&mut self, text: &str) -> Result<(), Error> {
        self.block.write(text.as_bytes())
    }

    /// Appends `text` in `encoding` without a length prefix or byte-order
    /// mark.
    pub fn write_str_encoded(&mut self, text: &str, encoding: TextEncoding) -> Result<(), Error> {
        let put: fn(&mut [u8], u16) = match encoding {
            TextEncoding::Utf8 => return self.write_str(text),
            TextEncoding::Utf16Le => LittleEndian::write_u16,
            TextEncoding::Utf16Be => BigEndian::write_u16,
        };
        let len = text.encode_utf16().count() * 2;
        let span = self.block.get_span(len)?;
        for (unit, dest) in text.encode_utf16().zip(span.chunks_exact_mut(2)) {
            put(dest, unit);
        }
        self.block.advance(len)
    }

    /// Appends the committed bytes of `other`.
    pub fn write_block(&mut self, other: &ByteBlock<'_>) -> Result<(), Error> {
        self.block.write(other.as_slice())
    }

    /// Appends every remaining byte of a possibly non-contiguous buffer.
    pub fn write_buf<B: Buf>(&mut self, mut buf: B) -> Result<(), Error> {
        while buf.has_remaining() {
            let chunk = buf.chunk();
            let n = chunk.len();
            self.block.write(chunk)?;
            buf.advance(n);
        }
        Ok(())
    }

    // ---------- readers ----------

    #[inline(always)]
    pub fn read_position(&self) -> usize {
        self.read_position
    }

    /// Committed bytes not yet read.
    #[inline(always)]
    pub fn remaining(&self) -> usize {
        self.block.committed() - self.read_position
    }

    #[inline(always)]
    pub fn unread(&self) -> &[u8] {
        &self.block.as_slice()[self.read_position..]
    }

    #[inline(always)]
    pub fn peek_u8(&self) -> Result<u8, Error> {
        self.unread()
            .first()
            .copied()
            .ok_or_else(|| Error::truncated(1, 0))
    }

    #[inline(always)]
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        let value = self.peek_u8()?;
        self.read_position += 1;
        Ok(value)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&[u8], Error> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::truncated(len, remaining));
        }
        let start = self.read_position;
        self.read_position += len;
        Ok(&self.block.as_slice()[start..start + len])
    }

    /// Moves the read position to `position` within the committed bytes.
    pub fn seek(&mut self, position: usize) -> Result<(), Error> {
        let committed = self.block.committed();
        if position > committed {
            return Err(Error::buffer_out_of_bound(position, 0, committed));
        }
        self.read_position = position;
        Ok(())
    }

    pub fn skip(&mut self, len: usize) -> Result<(), Error> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::truncated(len, remaining));
        }
        self.read_position += len;
        Ok(())
    }

    pub fn reset_read(&mut self) {
        self.read_position = 0;
    }

    // ---------- whole-block operations ----------

    /// Reverses the committed bytes in place.
    pub fn reverse(&mut self) {
        self.block.as_mut_slice().reverse();
    }

    /// Reverses `len` committed bytes starting at `start`.
    pub fn reverse_range(&mut self, start: usize, len: usize) -> Result<(), Error> {
        let committed = self.block.committed();
        let end = start
            .checked_add(len)
            .filter(|&end| end <= committed)
            .ok_or_else(|| Error::buffer_out_of_bound(start, len, committed))?;
        self.block.as_mut_slice()[start..end].reverse();
        Ok(())
    }

    /// Copies the unread bytes.
    pub fn to_array(&self) -> Vec<u8> {
        self.unread().to_vec()
    }

    /// Copies every committed byte, including those already read.
    pub fn to_all_array(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Consumes the block and returns its committed bytes. A wrapped vector
    /// is returned without copying.
    pub fn into_vec(self) -> Vec<u8> {
        self.block.into_vec()
    }

    /// Copies `len` committed bytes starting at `start` into a new block.
    pub fn slice(&self, start: usize, len: usize) -> Result<ByteBlock<'static>, Error> {
        Ok(ByteBlock::from_memory(self.block.slice(start, len)?))
    }

    /// A 32-bit fingerprint of the committed bytes: the first four bytes of
    /// their SHA-256 digest.
    ///
    /// This is a content hash for lookups, not a security control.
    pub fn fingerprint(&self) -> u32 {
        let digest = Sha256::digest(self.as_slice());
        BigEndian::read_u32(&digest[..4])
    }

    /// Returns pooled storage to its provider. Calling it again, or on an
    /// unpooled block, does nothing.
    pub fn dispose(&mut self) {
        self.block.try_release();
        self.read_position = 0;
    }

    /// Replaces the content with a copy of `bytes` and rewinds the read
    /// cursor.
    pub fn reset_to(&mut self, bytes: &[u8]) -> Result<(), Error> {
        let committed = self.block.committed();
        self.block.rewind(committed)?;
        self.read_position = 0;
        self.block.write(bytes)
    }
}

impl PartialEq for ByteBlock<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for ByteBlock<'_> {}

impl Hash for ByteBlock<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u32(self.fingerprint());
    }
}

impl Clone for ByteBlock<'_> {
    fn clone(&self) -> Self {
        let provider = self
            .block
            .provider()
            .cloned()
            .unwrap_or_else(|| ArrayPool::shared().clone());
        ByteBlock {
            block: MemoryBlock::rent_copy(provider, self.as_slice()),
            read_position: self.read_position,
        }
    }
}

impl AsRef<[u8]> for ByteBlock<'_> {
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl fmt::Debug for ByteBlock<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteBlock")
            .field("kind", &self.kind())
            .field("committed", &self.committed())
            .field("read_position", &self.read_position)
            .field("capacity", &self.capacity())
            .finish()
    }
}

impl io::Write for ByteBlock<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_bytes(buf)
            .map_err(|e| io::Error::new(io::ErrorKind::WriteZero, e))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl io::Read for ByteBlock<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.remaining());
        buf[..n].copy_from_slice(&self.unread()[..n]);
        self.read_position += n;
        Ok(n)
    }
}
