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

use super::Formatter;
use crate::buffer::ByteBlock;
use crate::codec::{read, write};
use crate::error::Error;
use crate::resolver::FormatterResolver;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

fn serialize_map<'v, K, V, I>(block: &mut ByteBlock<'_>, len: usize, entries: I) -> Result<(), Error>
where
    K: Formatter,
    V: Formatter,
    I: IntoIterator<Item = (&'v K, &'v V)>,
{
    write::write_map_header(block, len)?;
    for (key, value) in entries {
        key.serialize(block)?;
        value.serialize(block)?;
    }
    Ok(())
}

fn deserialize_map<K, V, C>(block: &mut ByteBlock<'_>) -> Result<C, Error>
where
    K: Formatter,
    V: Formatter,
    C: FromIterator<(K, V)>,
{
    let len = read::read_map_header(block)?;
    (0..len)
        .map(|_| -> Result<(K, V), Error> { Ok((K::deserialize(block)?, V::deserialize(block)?)) })
        .collect()
}

fn map_len<'v, K, V, I>(len: usize, entries: I) -> usize
where
    K: Formatter,
    V: Formatter,
    I: IntoIterator<Item = (&'v K, &'v V)>,
{
    let header = write::map_header_len(len.min(u32::MAX as usize) as u32);
    header
        + entries
            .into_iter()
            .map(|(key, value)| key.get_length() + value.get_length())
            .sum::<usize>()
}

impl<K, V, S> Formatter for HashMap<K, V, S>
where
    K: Formatter + Eq + Hash,
    V: Formatter,
    S: BuildHasher + Default + 'static,
{
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        serialize_map(block, self.len(), self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        deserialize_map(block)
    }

    fn get_length(&self) -> usize {
        map_len(self.len(), self)
    }

    fn default_length() -> usize {
        1
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<K>()?;
        resolver.register::<V>()
    }
}

impl<K: Formatter + Ord, V: Formatter> Formatter for BTreeMap<K, V> {
    fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        serialize_map(block, self.len(), self)
    }

    fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
        deserialize_map(block)
    }

    fn get_length(&self) -> usize {
        map_len(self.len(), self)
    }

    fn default_length() -> usize {
        1
    }

    fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
        resolver.register::<K>()?;
        resolver.register::<V>()
    }
}
