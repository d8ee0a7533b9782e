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
use crate::error::Error;
use crate::resolver::FormatterResolver;
use std::sync::Arc;

macro_rules! impl_pointer_formatter {
    ($($ptr:ident),*) => {
        $(
            impl<T: Formatter> Formatter for $ptr<T> {
                #[inline(always)]
                fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
                    T::serialize(self, block)
                }

                #[inline(always)]
                fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
                    T::deserialize(block).map($ptr::new)
                }

                fn get_length(&self) -> usize {
                    T::get_length(self)
                }

                fn default_length() -> usize {
                    T::default_length()
                }

                fn nil_is_value() -> bool {
                    T::nil_is_value()
                }

                fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
                    resolver.register::<T>()
                }
            }
        )*
    };
}

impl_pointer_formatter!(Box, Arc);
