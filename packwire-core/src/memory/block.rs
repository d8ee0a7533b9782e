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

use super::provider::{BlockProvider, MemoryOwner};
use super::Element;
use crate::error::Error;
use std::fmt;
use std::mem;
use std::sync::Arc;
use tracing::debug;

/// Which storage strategy backs a [`MemoryBlock`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BackingKind {
    Empty,
    Pooled,
    FixedArray,
    FixedMemory,
    Owner,
    Released,
}

enum Backing<'a, T: Element> {
    Empty,
    Pooled {
        storage: Vec<T>,
        provider: Arc<dyn BlockProvider<T>>,
    },
    FixedArray(Vec<T>),
    FixedMemory(&'a mut [T]),
    Owner(Box<dyn MemoryOwner<T> + 'a>),
    Released,
}

/// A region of `T` with a committed (written) prefix.
///
/// `0 <= committed() <= capacity()` holds at all times. Pooled blocks return
/// their storage to the provider when released or dropped; the other
/// backings never grow.
pub struct MemoryBlock<'a, T: Element> {
    backing: Backing<'a, T>,
    committed: usize,
}

impl<T: Element> MemoryBlock<'static, T> {
    /// The zero-capacity block. Allocates nothing.
    pub const fn empty() -> Self {
        MemoryBlock {
            backing: Backing::Empty,
            committed: 0,
        }
    }

    /// Rents storage for at least `size_hint` elements from `provider` and
    /// binds the block to it.
    pub fn rent(provider: Arc<dyn BlockProvider<T>>, size_hint: usize) -> Self {
        let storage = provider.rent(size_hint);
        MemoryBlock {
            backing: Backing::Pooled { storage, provider },
            committed: 0,
        }
    }

    /// Rents storage from `provider` and commits a copy of `src` into it.
    pub fn rent_copy(provider: Arc<dyn BlockProvider<T>>, src: &[T]) -> Self {
        let mut storage = provider.rent(src.len());
        storage[..src.len()].clone_from_slice(src);
        MemoryBlock {
            backing: Backing::Pooled { storage, provider },
            committed: src.len(),
        }
    }

    /// Binds the block to `provider` without renting yet. Storage is rented
    /// on the first [`get_span`](Self::get_span).
    pub fn unrented(provider: Arc<dyn BlockProvider<T>>) -> Self {
        MemoryBlock {
            backing: Backing::Pooled {
                storage: Vec::new(),
                provider,
            },
            committed: 0,
        }
    }

    /// Wraps `storage` without copying. The first `committed` elements
    /// count as written.
    pub fn from_vec(storage: Vec<T>, committed: usize) -> Result<Self, Error> {
        if committed > storage.len() {
            return Err(Error::buffer_out_of_bound(0, committed, storage.len()));
        }
        Ok(MemoryBlock {
            backing: Backing::FixedArray(storage),
            committed,
        })
    }
}

impl<T: Element> Default for MemoryBlock<'static, T> {
    fn default() -> Self {
        MemoryBlock::empty()
    }
}

/// A fixed block whose whole vector is committed.
impl<T: Element> From<Vec<T>> for MemoryBlock<'static, T> {
    fn from(storage: Vec<T>) -> Self {
        let committed = storage.len();
        MemoryBlock {
            backing: Backing::FixedArray(storage),
            committed,
        }
    }
}

impl<'a, T: Element> MemoryBlock<'a, T> {
    /// Wraps caller memory without copying. The block cannot outlive it.
    pub fn from_slice(memory: &'a mut [T], committed: usize) -> Result<Self, Error> {
        if committed > memory.len() {
            return Err(Error::buffer_out_of_bound(0, committed, memory.len()));
        }
        Ok(MemoryBlock {
            backing: Backing::FixedMemory(memory),
            committed,
        })
    }

    /// Wraps caller memory as an empty destination.
    pub fn destination(memory: &'a mut [T]) -> Self {
        MemoryBlock {
            backing: Backing::FixedMemory(memory),
            committed: 0,
        }
    }

    /// Takes ownership of `owner`; its memory is released when the block
    /// is dropped.
    pub fn from_owner(owner: Box<dyn MemoryOwner<T> + 'a>, committed: usize) -> Result<Self, Error> {
        let len = owner.memory().len();
        if committed > len {
            return Err(Error::buffer_out_of_bound(0, committed, len));
        }
        Ok(MemoryBlock {
            backing: Backing::Owner(owner),
            committed,
        })
    }

    pub fn kind(&self) -> BackingKind {
        match self.backing {
            Backing::Empty => BackingKind::Empty,
            Backing::Pooled { .. } => BackingKind::Pooled,
            Backing::FixedArray(_) => BackingKind::FixedArray,
            Backing::FixedMemory(_) => BackingKind::FixedMemory,
            Backing::Owner(_) => BackingKind::Owner,
            Backing::Released => BackingKind::Released,
        }
    }

    /// Whether the block is bound to a provider.
    pub fn is_bound(&self) -> bool {
        matches!(self.backing, Backing::Pooled { .. })
    }

    pub fn provider(&self) -> Option<&Arc<dyn BlockProvider<T>>> {
        match &self.backing {
            Backing::Pooled { provider, .. } => Some(provider),
            _ => None,
        }
    }

    #[inline(always)]
    fn storage(&self) -> &[T] {
        match &self.backing {
            Backing::Pooled { storage, .. } | Backing::FixedArray(storage) => storage,
            Backing::FixedMemory(memory) => &memory[..],
            Backing::Owner(owner) => owner.memory(),
            Backing::Empty | Backing::Released => &[],
        }
    }

    #[inline(always)]
    fn storage_mut(&mut self) -> &mut [T] {
        match &mut self.backing {
            Backing::Pooled { storage, .. } | Backing::FixedArray(storage) => storage,
            Backing::FixedMemory(memory) => &mut memory[..],
            Backing::Owner(owner) => owner.memory_mut(),
            Backing::Empty | Backing::Released => Default::default(),
        }
    }

    #[inline(always)]
    pub fn committed(&self) -> usize {
        self.committed
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.storage().len()
    }

    #[inline(always)]
    pub fn available(&self) -> usize {
        self.capacity() - self.committed
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.committed == 0
    }

    /// The committed region.
    #[inline(always)]
    pub fn as_slice(&self) -> &[T] {
        &self.storage()[..self.committed]
    }

    #[inline(always)]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let committed = self.committed;
        &mut self.storage_mut()[..committed]
    }

    /// Returns the writable region after the committed prefix, growing a
    /// pooled block until it holds at least `size_hint` elements (at least
    /// one when `size_hint` is zero).
    #[doc(alias = "get_memory")]
    #[inline(always)]
    pub fn get_span(&mut self, size_hint: usize) -> Result<&mut [T], Error> {
        let needed = size_hint.max(1);
        if self.available() < needed {
            self.grow(needed)?;
        }
        let committed = self.committed;
        Ok(&mut self.storage_mut()[committed..])
    }

    #[cold]
    fn grow(&mut self, size_hint: usize) -> Result<(), Error> {
        let committed = self.committed;
        let capacity = self.capacity();
        match &mut self.backing {
            Backing::Pooled { storage, provider } => {
                provider.ensure_capacity(storage, committed, size_hint);
                if storage.len() - committed < size_hint {
                    return Err(Error::buffer_out_of_bound(committed, size_hint, storage.len()));
                }
                Ok(())
            }
            Backing::Released => Err(Error::ownership("block has been released")),
            _ => Err(Error::buffer_out_of_bound(committed, size_hint, capacity)),
        }
    }

    /// Commits `count` elements written through [`get_span`](Self::get_span).
    #[inline(always)]
    pub fn advance(&mut self, count: usize) -> Result<(), Error> {
        let capacity = self.capacity();
        if count > capacity - self.committed {
            return Err(Error::buffer_out_of_bound(self.committed, count, capacity));
        }
        self.committed += count;
        Ok(())
    }

    /// Un-commits the last `count` elements.
    pub fn rewind(&mut self, count: usize) -> Result<(), Error> {
        if count > self.committed {
            return Err(Error::buffer_out_of_bound(0, count, self.committed));
        }
        let end = self.committed;
        self.committed -= count;
        if mem::needs_drop::<T>() {
            let start = self.committed;
            self.storage_mut()[start..end].fill(T::default());
        }
        Ok(())
    }

    /// Resets the committed region to defaults and un-commits it. Capacity
    /// is kept.
    pub fn clear(&mut self) {
        self.as_mut_slice().fill(T::default());
        self.committed = 0;
    }

    /// Appends `src`, growing if needed.
    pub fn write(&mut self, src: &[T]) -> Result<(), Error> {
        if src.is_empty() {
            return Ok(());
        }
        let span = self.get_span(src.len())?;
        span[..src.len()].clone_from_slice(src);
        self.advance(src.len())
    }

    /// Appends a single element.
    pub fn push(&mut self, value: T) -> Result<(), Error> {
        let span = self.get_span(1)?;
        span[0] = value;
        self.advance(1)
    }

    /// Copies `len` committed elements starting at `start` into a new block.
    ///
    /// A pooled source rents the copy from the same provider; any other
    /// backing produces a fixed block. The source is not modified.
    pub fn slice(&self, start: usize, len: usize) -> Result<MemoryBlock<'static, T>, Error> {
        let end = start
            .checked_add(len)
            .filter(|&end| end <= self.committed)
            .ok_or_else(|| Error::buffer_out_of_bound(start, len, self.committed))?;
        let src = &self.as_slice()[start..end];
        match &self.backing {
            Backing::Pooled { provider, .. } => Ok(MemoryBlock::rent_copy(provider.clone(), src)),
            _ => MemoryBlock::from_vec(src.to_vec(), len),
        }
    }

    /// Returns pooled storage to its provider.
    ///
    /// Fails when the block is not bound to a provider or was already
    /// released.
    pub fn release(&mut self) -> Result<(), Error> {
        match mem::replace(&mut self.backing, Backing::Released) {
            Backing::Pooled {
                mut storage,
                provider,
            } => {
                if mem::needs_drop::<T>() {
                    storage[..self.committed].fill(T::default());
                }
                self.committed = 0;
                if !storage.is_empty() {
                    provider.give_back(storage);
                }
                Ok(())
            }
            Backing::Released => {
                debug!("rejected release of an already released block");
                Err(Error::ownership("block already released"))
            }
            other => {
                self.backing = other;
                debug!(kind = ?self.kind(), "rejected release of an unbound block");
                Err(Error::ownership("block is not bound to a provider"))
            }
        }
    }

    /// Like [`release`](Self::release) but reports failure as `false`.
    pub fn try_release(&mut self) -> bool {
        if self.is_bound() {
            self.release().is_ok()
        } else {
            false
        }
    }

    /// Consumes the block and returns the committed elements.
    ///
    /// A fixed array is handed back without copying; pooled storage is
    /// copied out and returned to its provider.
    pub fn into_vec(mut self) -> Vec<T> {
        let committed = self.committed;
        if let Backing::FixedArray(storage) = &mut self.backing {
            let mut storage = mem::take(storage);
            storage.truncate(committed);
            self.backing = Backing::Released;
            self.committed = 0;
            return storage;
        }
        let out = self.as_slice().to_vec();
        self.try_release();
        out
    }
}

impl<T: Element> Drop for MemoryBlock<'_, T> {
    fn drop(&mut self) {
        self.try_release();
    }
}

impl<T: Element> fmt::Debug for MemoryBlock<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBlock")
            .field("kind", &self.kind())
            .field("committed", &self.committed)
            .field("capacity", &self.capacity())
            .finish()
    }
}
