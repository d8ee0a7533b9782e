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

use packwire_core::buffer::ByteBlock;
use packwire_core::codec::write;
use packwire_core::error::Error;
use packwire_core::memory::{ArrayPool, BackingKind, BlockProvider, MemoryBlock};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Hands out exact-size arrays and counts traffic.
#[derive(Default)]
struct CountingProvider {
    rented: AtomicUsize,
    returned: AtomicUsize,
}

impl BlockProvider<u8> for CountingProvider {
    fn rent(&self, minimum_len: usize) -> Vec<u8> {
        self.rented.fetch_add(1, Ordering::SeqCst);
        vec![0; minimum_len.max(16)]
    }

    fn give_back(&self, _storage: Vec<u8>) {
        self.returned.fetch_add(1, Ordering::SeqCst);
    }
}

impl CountingProvider {
    fn outstanding(&self) -> usize {
        self.rented.load(Ordering::SeqCst) - self.returned.load(Ordering::SeqCst)
    }
}

#[test]
fn test_growth_returns_every_intermediate_array() {
    let provider = Arc::new(CountingProvider::default());
    {
        let mut block = ByteBlock::with_provider(provider.clone(), 1);
        for i in 0..1000u32 {
            write::write_u32(&mut block, i).unwrap();
        }
        assert!(provider.rented.load(Ordering::SeqCst) > 1);
        assert_eq!(provider.outstanding(), 1);
    }
    assert_eq!(provider.outstanding(), 0);
}

#[test]
fn test_storage_is_returned_exactly_once() {
    let provider = Arc::new(CountingProvider::default());
    let mut block = MemoryBlock::rent(provider.clone() as Arc<dyn BlockProvider<u8>>, 32);
    block.write(b"abc").unwrap();
    block.release().unwrap();
    assert!(matches!(block.release(), Err(Error::Ownership(_))));
    assert_eq!(block.kind(), BackingKind::Released);
    assert!(block.get_span(1).is_err());
    drop(block);
    assert_eq!(provider.returned.load(Ordering::SeqCst), 1);
}

#[test]
fn test_unbound_blocks_cannot_release() {
    let mut fixed = MemoryBlock::from(vec![1u8, 2, 3]);
    assert!(!fixed.is_bound());
    assert!(fixed.release().is_err());
    assert_eq!(fixed.as_slice(), &[1, 2, 3]);
}

#[test]
fn test_fixed_destination_refuses_to_grow() {
    let mut memory = [0u8; 4];
    {
        let mut block = ByteBlock::wrap_slice(&mut memory);
        assert_eq!(block.kind(), BackingKind::FixedMemory);
        block.write_bytes(&[1, 2, 3]).unwrap();
        assert!(block.write_bytes(&[4, 5]).is_err());
        assert_eq!(block.len(), 3);
        block.write_u8(4).unwrap();
        assert_eq!(block.available(), 0);
    }
    assert_eq!(memory, [1, 2, 3, 4]);
}

#[test]
fn test_advance_and_rewind_bounds() {
    let mut block = ByteBlock::with_capacity(8);
    let capacity = block.capacity();
    assert!(block.advance(capacity + 1).is_err());
    block.write_bytes(b"abcdef").unwrap();
    block.skip(5).unwrap();
    block.rewind(3).unwrap();
    assert_eq!(block.as_slice(), b"abc");
    assert_eq!(block.read_position(), 3);
    assert!(block.rewind(4).is_err());
}

#[test]
fn test_clear_resets_cursors_and_keeps_capacity() {
    let mut block = ByteBlock::from_bytes(b"hello");
    let capacity = block.capacity();
    block.skip(2).unwrap();
    block.clear();
    assert!(block.is_empty());
    assert_eq!(block.read_position(), 0);
    assert_eq!(block.capacity(), capacity);
    let span = block.get_span(5).unwrap();
    assert_eq!(&span[..5], &[0; 5]);
}

#[test]
fn test_slice_copies_from_the_same_pool() {
    let pool = Arc::new(ArrayPool::<u8>::new());
    let block = ByteBlock::from_bytes_in(pool.clone(), b"0123456789");
    let part = block.slice(2, 4).unwrap();
    assert_eq!(part.as_slice(), b"2345");
    assert_eq!(part.kind(), BackingKind::Pooled);
    assert_eq!(block.as_slice(), b"0123456789");
    assert_eq!(pool.rented(), 2);
    assert!(block.slice(8, 3).is_err());
}

#[test]
fn test_pool_recycles_after_drop() {
    let pool = Arc::new(ArrayPool::<u8>::with_limits(64 * 1024, 4));
    for _ in 0..10 {
        let mut block = ByteBlock::with_provider(pool.clone(), 1000);
        block.write_bytes(&[7; 1000]).unwrap();
    }
    assert_eq!(pool.rented(), 10);
    assert_eq!(pool.returned(), 10);
    assert_eq!(pool.retained(), 1);
}

#[test]
fn test_owner_backing() {
    let owner: Box<[u8]> = vec![9u8; 8].into_boxed_slice();
    let mut block = ByteBlock::wrap_owner(Box::new(owner), 2).unwrap();
    assert_eq!(block.kind(), BackingKind::Owner);
    assert_eq!(block.as_slice(), &[9, 9]);
    block.write_bytes(&[1, 2]).unwrap();
    assert_eq!(block.as_slice(), &[9, 9, 1, 2]);
    assert!(ByteBlock::wrap_owner(Box::new(vec![0u8; 2]), 3).is_err());
}

#[test]
fn test_io_traits() {
    let mut block = ByteBlock::new();
    block.write_all(b"stream").unwrap();
    let mut out = [0u8; 4];
    assert_eq!(block.read(&mut out).unwrap(), 4);
    assert_eq!(&out, b"stre");
    let mut rest = Vec::new();
    block.read_to_end(&mut rest).unwrap();
    assert_eq!(rest, b"am");
}

#[test]
fn test_reset_to_and_into_vec() {
    let mut block = ByteBlock::from_bytes(b"old contents");
    block.skip(4).unwrap();
    block.reset_to(b"new").unwrap();
    assert_eq!(block.read_position(), 0);
    assert_eq!(block.into_vec(), b"new".to_vec());

    let wrapped = ByteBlock::wrap_vec(vec![1, 2, 3]);
    assert_eq!(wrapped.kind(), BackingKind::FixedArray);
    assert_eq!(wrapped.into_vec(), vec![1, 2, 3]);
}
