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

use super::{derive_enum, derive_struct};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, GenericParam};

/// Bodies of the five `Formatter` methods.
pub struct FormatterBodies {
    pub serialize: TokenStream,
    pub deserialize: TokenStream,
    pub get_length: TokenStream,
    pub default_length: TokenStream,
    pub resolve_dependencies: TokenStream,
}

pub fn derive_formatter(ast: &DeriveInput) -> syn::Result<TokenStream> {
    if let Some(lifetime) = ast.generics.lifetimes().next() {
        return Err(syn::Error::new_spanned(
            lifetime,
            "PackObject types must be 'static and cannot have lifetime parameters",
        ));
    }

    let bodies = match &ast.data {
        Data::Struct(data) => derive_struct::gen_bodies(&data.fields)?,
        Data::Enum(data) => derive_enum::gen_bodies(ast, data)?,
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &ast.ident,
                "PackObject cannot be derived for unions",
            ))
        }
    };

    let mut generics = ast.generics.clone();
    for param in generics.params.iter_mut() {
        if let GenericParam::Type(tp) = param {
            tp.bounds.push(parse_quote!(::packwire_core::formatter::Formatter));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let name = &ast.ident;
    let FormatterBodies {
        serialize,
        deserialize,
        get_length,
        default_length,
        resolve_dependencies,
    } = bodies;

    Ok(quote! {
        impl #impl_generics ::packwire_core::formatter::Formatter for #name #ty_generics #where_clause {
            fn serialize(
                &self,
                block: &mut ::packwire_core::buffer::ByteBlock<'_>,
            ) -> ::core::result::Result<(), ::packwire_core::error::Error> {
                #serialize
            }

            fn deserialize(
                block: &mut ::packwire_core::buffer::ByteBlock<'_>,
            ) -> ::core::result::Result<Self, ::packwire_core::error::Error> {
                #deserialize
            }

            fn get_length(&self) -> usize {
                #get_length
            }

            fn default_length() -> usize {
                #default_length
            }

            fn resolve_dependencies(
                resolver: &::packwire_core::resolver::FormatterResolver,
            ) -> ::core::result::Result<(), ::packwire_core::error::Error> {
                #resolve_dependencies
            }
        }
    })
}
