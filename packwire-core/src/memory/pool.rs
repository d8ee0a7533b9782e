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

use super::provider::BlockProvider;
use super::Element;
use crate::util::Spinlock;
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use tracing::{debug, trace};

/// Smallest array handed out by the pool.
pub const MIN_ARRAY_LEN: usize = 256;

/// Arrays longer than this are not retained by default.
pub const DEFAULT_MAX_ARRAY_LEN: usize = 1024 * 1024;

/// Arrays kept per size class by default.
pub const DEFAULT_MAX_ARRAYS_PER_BUCKET: usize = 32;

/// Number of segments per bucket. Threads are spread over segments so
/// concurrent rent/return calls usually take different locks.
const NUM_SEGMENTS: usize = 8;

static THREAD_ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static SEGMENT_INDEX: Cell<usize> = Cell::new(
        THREAD_ID_COUNTER.fetch_add(1, Ordering::Relaxed) % NUM_SEGMENTS
    );
}

/// All arrays of one power-of-two length.
struct Bucket<T> {
    array_len: usize,
    segments: [Spinlock<Vec<Vec<T>>>; NUM_SEGMENTS],
    retained: AtomicUsize,
}

impl<T> Bucket<T> {
    fn new(array_len: usize) -> Self {
        Bucket {
            array_len,
            segments: std::array::from_fn(|_| Spinlock::new(Vec::new())),
            retained: AtomicUsize::new(0),
        }
    }

    fn take(&self, home: usize) -> Option<Vec<T>> {
        // own segment first, then steal from the others
        for i in 0..NUM_SEGMENTS {
            let segment = &self.segments[(home + i) % NUM_SEGMENTS];
            if let Some(array) = segment.lock().pop() {
                self.retained.fetch_sub(1, Ordering::Relaxed);
                return Some(array);
            }
        }
        None
    }

    fn put(&self, home: usize, array: Vec<T>, max_retained: usize) -> bool {
        if self.retained.fetch_add(1, Ordering::Relaxed) >= max_retained {
            self.retained.fetch_sub(1, Ordering::Relaxed);
            return false;
        }
        self.segments[home].lock().push(array);
        true
    }
}

/// A size-classed array pool.
///
/// Arrays come in power-of-two lengths from [`MIN_ARRAY_LEN`] up to the
/// configured maximum. Requests above the maximum are served with exactly
/// sized arrays that are dropped instead of retained on return.
pub struct ArrayPool<T> {
    buckets: Box<[Bucket<T>]>,
    max_array_len: usize,
    max_per_bucket: usize,
    rented: AtomicUsize,
    returned: AtomicUsize,
}

impl<T: Element> Default for ArrayPool<T> {
    fn default() -> Self {
        ArrayPool::new()
    }
}

impl<T: Element> ArrayPool<T> {
    pub fn new() -> Self {
        ArrayPool::with_limits(DEFAULT_MAX_ARRAY_LEN, DEFAULT_MAX_ARRAYS_PER_BUCKET)
    }

    /// Creates a pool retaining arrays up to `max_array_len` elements (rounded
    /// up to a power of two) and at most `max_per_bucket` arrays per size.
    pub fn with_limits(max_array_len: usize, max_per_bucket: usize) -> Self {
        let max_array_len = max_array_len.max(MIN_ARRAY_LEN).next_power_of_two();
        let classes = (max_array_len.trailing_zeros() - MIN_ARRAY_LEN.trailing_zeros()) as usize + 1;
        let buckets = (0..classes)
            .map(|i| Bucket::new(MIN_ARRAY_LEN << i))
            .collect::<Vec<_>>()
            .into_boxed_slice();
        ArrayPool {
            buckets,
            max_array_len,
            max_per_bucket,
            rented: AtomicUsize::new(0),
            returned: AtomicUsize::new(0),
        }
    }

    #[inline]
    fn bucket_index(&self, len: usize) -> Option<usize> {
        let size = len.max(MIN_ARRAY_LEN).checked_next_power_of_two()?;
        if size > self.max_array_len {
            return None;
        }
        Some((size.trailing_zeros() - MIN_ARRAY_LEN.trailing_zeros()) as usize)
    }

    /// Largest array length the pool retains.
    pub fn max_array_len(&self) -> usize {
        self.max_array_len
    }

    /// Number of arrays handed out so far.
    pub fn rented(&self) -> usize {
        self.rented.load(Ordering::Relaxed)
    }

    /// Number of arrays given back so far, retained or not.
    pub fn returned(&self) -> usize {
        self.returned.load(Ordering::Relaxed)
    }

    /// Number of arrays currently sitting in the pool.
    pub fn retained(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.retained.load(Ordering::Relaxed))
            .sum()
    }
}

impl<T: Element> std::fmt::Debug for ArrayPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayPool")
            .field("max_array_len", &self.max_array_len)
            .field("max_per_bucket", &self.max_per_bucket)
            .field("rented", &self.rented())
            .field("returned", &self.returned())
            .field("retained", &self.retained())
            .finish()
    }
}

impl ArrayPool<u8> {
    /// The process-wide byte pool used by blocks created without an
    /// explicit provider.
    pub fn shared() -> &'static Arc<ArrayPool<u8>> {
        static SHARED: OnceLock<Arc<ArrayPool<u8>>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(ArrayPool::new()))
    }
}

impl<T: Element> BlockProvider<T> for ArrayPool<T> {
    fn rent(&self, minimum_len: usize) -> Vec<T> {
        self.rented.fetch_add(1, Ordering::Relaxed);
        let Some(index) = self.bucket_index(minimum_len) else {
            trace!(len = minimum_len, "allocating unpooled array");
            return vec![T::default(); minimum_len];
        };
        let bucket = &self.buckets[index];
        let home = SEGMENT_INDEX.with(|idx| idx.get());
        bucket.take(home).unwrap_or_else(|| {
            trace!(len = bucket.array_len, "pool miss, allocating array");
            vec![T::default(); bucket.array_len]
        })
    }

    fn give_back(&self, storage: Vec<T>) {
        self.returned.fetch_add(1, Ordering::Relaxed);
        let len = storage.len();
        let Some(index) = self.bucket_index(len) else {
            debug!(len, "dropping array larger than the pool limit");
            return;
        };
        let bucket = &self.buckets[index];
        if bucket.array_len != len {
            debug!(len, "dropping array that was not rented from this pool");
            return;
        }
        let home = SEGMENT_INDEX.with(|idx| idx.get());
        if !bucket.put(home, storage, self.max_per_bucket) {
            trace!(len, "bucket full, dropping array");
        }
    }
}
