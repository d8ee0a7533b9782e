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

use super::Element;

/// Source of backing storage for pooled [`MemoryBlock`](super::MemoryBlock)s.
///
/// Storage is a `Vec<T>` whose `len()` is the addressable capacity of the
/// block. A provider hands storage out with [`rent`](Self::rent), grows it
/// in place with [`ensure_capacity`](Self::ensure_capacity), and receives it
/// back exactly once through [`give_back`](Self::give_back).
pub trait BlockProvider<T: Element>: Send + Sync {
    /// Returns storage with `len() >= minimum_len`.
    ///
    /// Recycled storage may still hold elements from its previous use.
    fn rent(&self, minimum_len: usize) -> Vec<T>;

    /// Takes storage back.
    fn give_back(&self, storage: Vec<T>);

    /// Makes `storage.len() - committed >= size_hint`.
    ///
    /// The default rents a larger array (at least double the current one),
    /// copies the committed prefix forward and gives the old array back.
    fn ensure_capacity(&self, storage: &mut Vec<T>, committed: usize, size_hint: usize) {
        let needed = committed.saturating_add(size_hint);
        if storage.len() >= needed {
            return;
        }
        let target = needed.max(storage.len().saturating_mul(2));
        let mut grown = self.rent(target);
        grown[..committed].clone_from_slice(&storage[..committed]);
        let old = std::mem::replace(storage, grown);
        if !old.is_empty() {
            self.give_back(old);
        }
    }
}

/// Memory owned by something other than a provider, wrapped by a block
/// without copying.
///
/// Dropping the block drops the owner, which releases the memory.
pub trait MemoryOwner<T>: Send {
    fn memory(&self) -> &[T];
    fn memory_mut(&mut self) -> &mut [T];
}

impl<T: Send> MemoryOwner<T> for Vec<T> {
    fn memory(&self) -> &[T] {
        self
    }

    fn memory_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Send> MemoryOwner<T> for Box<[T]> {
    fn memory(&self) -> &[T] {
        self
    }

    fn memory_mut(&mut self) -> &mut [T] {
        self
    }
}
