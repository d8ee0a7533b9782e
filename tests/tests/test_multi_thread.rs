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

use packwire::{ArrayPool, ByteBlock, CompressionKind, FormatterResolver, PackObject, Packer};
use std::collections::BTreeMap;
use std::sync::{Arc, Barrier};
use std::thread;

#[derive(PackObject, Debug, PartialEq, Clone)]
struct Job {
    id: u32,
    name: String,
    inputs: BTreeMap<String, Vec<i64>>,
}

fn job(id: u32) -> Job {
    Job {
        id,
        name: format!("job-{id}"),
        inputs: (0..id % 5)
            .map(|i| (format!("in{i}"), vec![i as i64 - 2; (id % 7) as usize]))
            .collect(),
    }
}

#[test]
fn test_concurrent_resolution_yields_one_entry() {
    let resolver = Arc::new(FormatterResolver::new());
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = resolver.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                resolver.get_formatter::<Job>().unwrap()
            })
        })
        .collect();
    let infos: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for info in &infos[1..] {
        assert!(Arc::ptr_eq(&infos[0], info));
    }
    assert!(resolver.contains::<Job>());
}

#[test]
fn test_shared_packer_across_threads() {
    let pool = Arc::new(ArrayPool::<u8>::new());
    let packer = Arc::new(
        Packer::default()
            .with_pool(pool.clone())
            .compression(CompressionKind::Lz4),
    );
    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let packer = packer.clone();
            thread::spawn(move || {
                for i in 0..200u32 {
                    let value = job(t * 1000 + i);
                    let bytes = packer.serialize(&value).unwrap();
                    let back: Option<Job> = packer.deserialize(&bytes).unwrap();
                    assert_eq!(back, Some(value));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(pool.rented(), pool.returned());
}

#[test]
fn test_pool_balances_under_contention() {
    let pool = Arc::new(ArrayPool::<u8>::with_limits(1 << 16, 64));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let pool = pool.clone();
            thread::spawn(move || {
                for i in 0..500usize {
                    let mut block = ByteBlock::with_provider(pool.clone(), 16);
                    let len = (t * 131 + i * 17) % 5000;
                    block.write_bytes(&vec![t as u8; len]).unwrap();
                    assert_eq!(block.len(), len);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(pool.rented(), pool.returned());
    assert!(pool.retained() > 0);
}
