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

use super::{read_exact_array_header, Formatter};
use crate::buffer::ByteBlock;
use crate::codec::{read, write};
use crate::error::Error;
use crate::resolver::FormatterResolver;
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

/// Writes `len` elements as an array.
pub(crate) fn serialize_seq<'v, T, I>(block: &mut ByteBlock<'_>, len: usize, items: I) -> Result<(), Error>
where
    T: Formatter,
    I: IntoIterator<Item = &'v T>,
{
    write::write_array_header(block, len)?;
    for item in items {
        item.serialize(block)?;
    }
    Ok(())
}

/// Reads an array into any collection.
///
/// The declared length is not trusted for pre-allocation; the collection
/// grows as elements decode.
pub(crate) fn deserialize_seq<T, C>(block: &mut ByteBlock<'_>) -> Result<C, Error>
where
    T: Formatter,
    C: FromIterator<T>,
{
    let len = read::read_array_header(block)?;
    (0..len).map(|_| T::deserialize(block)).collect()
}

pub(crate) fn seq_len<'v, T, I>(len: usize, items: I) -> usize
where
    T: Formatter,
    I: IntoIterator<Item = &'v T>,
{
    let header = write::array_header_len(len.min(u32::MAX as usize) as u32);
    header + items.into_iter().map(T::get_length).sum::<usize>()
}

impl<T: Formatter> Formatter for Vec<T> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        serialize_seq(block, self.len(), self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        deserialize_seq(block)
    }

    fn get_length(&self) -> usize {
        seq_len(self.len(), self)
    }

    fn default_length() -> usize {
        1
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<T>()
    }
}

impl<T: Formatter> Formatter for VecDeque<T> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        serialize_seq(block, self.len(), self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        deserialize_seq(block)
    }

    fn get_length(&self) -> usize {
        seq_len(self.len(), self)
    }

    fn default_length() -> usize {
        1
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<T>()
    }
}

impl<T, S> Formatter for HashSet<T, S>
where
    T: Formatter + Eq + Hash,
    S: BuildHasher + Default + 'static,
{
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        serialize_seq(block, self.len(), self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        deserialize_seq(block)
    }

    fn get_length(&self) -> usize {
        seq_len(self.len(), self)
    }

    fn default_length() -> usize {
        1
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<T>()
    }
}

impl<T: Formatter + Ord> Formatter for BTreeSet<T> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        serialize_seq(block, self.len(), self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        deserialize_seq(block)
    }

    fn get_length(&self) -> usize {
        seq_len(self.len(), self)
    }

    fn default_length() -> usize {
        1
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<T>()
    }
}

/// Fixed-size arrays must decode from an array of exactly `N` elements.
impl<T: Formatter, const N: usize> Formatter for [T; N] {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        serialize_seq(block, N, self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        read_exact_array_header::<Self>(block, N)?;
        let items = (0..N)
            .map(|_| T::deserialize(block))
            .collect::<Result<Vec<T>, Error>>()?;
        items
            .try_into()
            .map_err(|_| Error::unknown("fixed-size array length changed while decoding"))
    }

    fn get_length(&self) -> usize {
        seq_len(N, self)
    }

    fn default_length() -> usize {
        write::array_header_len(N.min(u32::MAX as usize) as u32) + N * T::default_length()
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<T>()
    }
}
