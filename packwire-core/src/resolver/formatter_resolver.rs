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
use crate::error::Error;
use crate::formatter::Formatter;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::{Arc, OnceLock};
use tracing::trace;

type SerializeFn = fn(&dyn Any, &mut ByteBlock<'_>) -> Result<(), Error>;
type DeserializeFn = fn(&mut ByteBlock<'_>) -> Result<Box<dyn Any>, Error>;
type LengthFn = fn(&dyn Any) -> Result<usize, Error>;

thread_local! {
    // Types whose dependencies this thread is currently resolving.
    static RESOLVING: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

/// Type-erased entry points of one formatter.
#[derive(Clone, Copy, Debug)]
pub struct Harness {
    serialize_fn: SerializeFn,
    deserialize_fn: DeserializeFn,
    length_fn: LengthFn,
}

impl Harness {
    pub fn of<T: Formatter>() -> Harness {
        Harness {
            serialize_fn: serialize_any::<T>,
            deserialize_fn: deserialize_any::<T>,
            length_fn: length_any::<T>,
        }
    }

    #[inline(always)]
    pub fn get_serialize_fn(&self) -> SerializeFn {
        self.serialize_fn
    }

    #[inline(always)]
    pub fn get_deserialize_fn(&self) -> DeserializeFn {
        self.deserialize_fn
    }

    #[inline(always)]
    pub fn get_length_fn(&self) -> LengthFn {
        self.length_fn
    }
}

fn downcast<T: 'static>(value: &dyn Any) -> Result<&T, Error> {
    value.downcast_ref::<T>().ok_or_else(|| {
        Error::unsupported(format!(
            "formatter for {} received a value of another type",
            std::any::type_name::<T>()
        ))
    })
}

fn serialize_any<T: Formatter>(value: &dyn Any, block: &mut ByteBlock<'_>) -> Result<(), Error> {
    downcast::<T>(value)?.serialize(block)
}

fn deserialize_any<T: Formatter>(block: &mut ByteBlock<'_>) -> Result<Box<dyn Any>, Error> {
    Ok(Box::new(T::deserialize(block)?))
}

fn length_any<T: Formatter>(value: &dyn Any) -> Result<usize, Error> {
    Ok(downcast::<T>(value)?.get_length())
}

/// A resolved formatter together with the type it belongs to.
#[derive(Clone, Debug)]
pub struct FormatterInfo {
    type_id: TypeId,
    type_name: &'static str,
    default_length: usize,
    harness: Harness,
}

impl FormatterInfo {
    pub fn of<T: Formatter>() -> FormatterInfo {
        FormatterInfo {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            default_length: T::default_length(),
            harness: Harness::of::<T>(),
        }
    }

    #[inline(always)]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline(always)]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    #[inline(always)]
    pub fn default_length(&self) -> usize {
        self.default_length
    }

    #[inline(always)]
    pub fn harness(&self) -> &Harness {
        &self.harness
    }

    fn check<T: 'static>(&self) -> Result<(), Error> {
        if self.type_id != TypeId::of::<T>() {
            return Err(Error::unsupported(format!(
                "formatter for {} used with {}",
                self.type_name,
                std::any::type_name::<T>()
            )));
        }
        Ok(())
    }

    pub fn serialize<T: 'static>(&self, value: &T, block: &mut ByteBlock<'_>) -> Result<(), Error> {
        self.check::<T>()?;
        (self.harness.serialize_fn)(value, block)
    }

    pub fn deserialize<T: 'static>(&self, block: &mut ByteBlock<'_>) -> Result<T, Error> {
        self.check::<T>()?;
        let boxed = (self.harness.deserialize_fn)(block)?;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| Error::unknown(format!("formatter for {} produced another type", self.type_name)))
    }

    pub fn get_length<T: 'static>(&self, value: &T) -> Result<usize, Error> {
        self.check::<T>()?;
        (self.harness.length_fn)(value)
    }
}

/// Removes a type from the thread's in-progress set when dropped.
struct ResolvingGuard(TypeId);

impl ResolvingGuard {
    /// Marks `id` as in progress, or returns `None` if it already is.
    fn enter(id: TypeId) -> Option<ResolvingGuard> {
        let inserted = RESOLVING.with(|set| set.borrow_mut().insert(id));
        inserted.then(|| ResolvingGuard(id))
    }
}

impl Drop for ResolvingGuard {
    fn drop(&mut self) {
        RESOLVING.with(|set| {
            set.borrow_mut().remove(&self.0);
        });
    }
}

/// Concurrent cache of formatters keyed by type.
///
/// The first lookup of a type resolves the formatters it is built from and
/// then caches its own entry. Later lookups return the cached entry. A type
/// that refers to itself, directly or through a collection, stops
/// recursing when it meets itself in the set of types the current thread is
/// already resolving.
#[derive(Debug, Default)]
pub struct FormatterResolver {
    formatters: DashMap<TypeId, Arc<FormatterInfo>>,
}

impl FormatterResolver {
    pub fn new() -> FormatterResolver {
        FormatterResolver::default()
    }

    /// Process-wide resolver used by packers that were not given their own.
    pub fn shared() -> &'static Arc<FormatterResolver> {
        static SHARED: OnceLock<Arc<FormatterResolver>> = OnceLock::new();
        SHARED.get_or_init(|| Arc::new(FormatterResolver::new()))
    }

    pub fn get_formatter<T: Formatter>(&self) -> Result<Arc<FormatterInfo>, Error> {
        let id = TypeId::of::<T>();
        if let Some(info) = self.formatters.get(&id) {
            return Ok(info.value().clone());
        }
        if let Some(_guard) = ResolvingGuard::enter(id) {
            T::resolve_dependencies(self)?;
        }
        let info = self
            .formatters
            .entry(id)
            .or_insert_with(|| {
                trace!("resolved formatter for {}", std::any::type_name::<T>());
                Arc::new(FormatterInfo::of::<T>())
            })
            .value()
            .clone();
        Ok(info)
    }

    /// Resolves and caches the formatter of `T` and everything it depends on.
    pub fn register<T: Formatter>(&self) -> Result<(), Error> {
        self.get_formatter::<T>().map(|_| ())
    }

    pub fn contains<T: 'static>(&self) -> bool {
        self.formatters.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }
}
