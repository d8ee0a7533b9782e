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
use crate::codec::write;
use crate::error::Error;
use crate::resolver::FormatterResolver;

macro_rules! impl_tuple_formatter {
    ($len:expr; $($name:ident . $idx:tt),+) => {
        /// Tuples are fixed-length arrays.
        impl<$($name: Formatter),+> Formatter for ($($name,)+) {
            fn serialize(&self, block: &mut ByteBlock<'_>) -> Result<(), Error> {
                write::write_array_header(block, $len)?;
                $(self.$idx.serialize(block)?;)+
                Ok(())
            }

            fn deserialize(block: &mut ByteBlock<'_>) -> Result<Self, Error> {
                read_exact_array_header::<Self>(block, $len)?;
                Ok(($($name::deserialize(block)?,)+))
            }

            fn get_length(&self) -> usize {
                1 $(+ self.$idx.get_length())+
            }

            fn default_length() -> usize {
                1 $(+ $name::default_length())+
            }

            fn resolve_dependencies(resolver: &FormatterResolver) -> Result<(), Error> {
                $(resolver.register::<$name>()?;)+
                Ok(())
            }
        }
    };
}

impl_tuple_formatter!(1; A.0);
impl_tuple_formatter!(2; A.0, B.1);
impl_tuple_formatter!(3; A.0, B.1, C.2);
impl_tuple_formatter!(4; A.0, B.1, C.2, D.3);
impl_tuple_formatter!(5; A.0, B.1, C.2, D.3, E.4);
impl_tuple_formatter!(6; A.0, B.1, C.2, D.3, E.4, F.5);
