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

//! Growable element arenas over pooled, fixed or externally owned storage.
//!
//! A [`MemoryBlock`] hands out writable spans with
//! [`get_span`](MemoryBlock::get_span) and commits them with
//! [`advance`](MemoryBlock::advance). Pooled blocks grow by renting larger
//! arrays from their [`BlockProvider`]; fixed blocks never grow.

mod block;
mod pool;
mod provider;

pub use block::{BackingKind, MemoryBlock};
pub use pool::{
    ArrayPool, DEFAULT_MAX_ARRAYS_PER_BUCKET, DEFAULT_MAX_ARRAY_LEN, MIN_ARRAY_LEN,
};
pub use provider::{BlockProvider, MemoryOwner};

/// Element types a [`MemoryBlock`] can store.
pub trait Element: Clone + Default + Send + 'static {}

impl<T: Clone + Default + Send + 'static> Element for T {}
