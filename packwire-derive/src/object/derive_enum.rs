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

use super::formatter::FormatterBodies;
use proc_macro2::{Ident, Span};
use quote::quote;
use syn::{DataEnum, DeriveInput, Fields};

const INT_REPRS: &[&str] = &[
    "u8", "u16", "u32", "u64", "usize", "i8", "i16", "i32", "i64", "isize",
];

/// The integer type named by `#[repr(..)]`, or `i32`.
fn repr_type(ast: &DeriveInput) -> syn::Result<Ident> {
    let mut repr = None;
    for attr in ast.attrs.iter().filter(|attr| attr.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            if let Some(ident) = meta.path.get_ident() {
                if INT_REPRS.iter().any(|name| ident == name) {
                    repr = Some(ident.clone());
                }
            }
            // align(..) and packed(..) carry arguments
            if meta.input.peek(syn::token::Paren) {
                let _args;
                syn::parenthesized!(_args in meta.input);
            }
            Ok(())
        })?;
    }
    Ok(repr.unwrap_or_else(|| Ident::new("i32", Span::call_site())))
}

pub fn gen_bodies(ast: &DeriveInput, data: &DataEnum) -> syn::Result<FormatterBodies> {
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "PackObject cannot be derived for an enum without variants",
        ));
    }
    if let Some(variant) = data.variants.iter().find(|v| !matches!(v.fields, Fields::Unit)) {
        return Err(syn::Error::new_spanned(
            variant,
            "PackObject supports only fieldless enums",
        ));
    }

    let repr = repr_type(ast)?;
    let idents: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();

    let discriminant = quote! {
        let discriminant: #repr = match self {
            #( Self::#idents => Self::#idents as #repr, )*
        };
    };
    let serialize = quote! {
        #discriminant
        ::packwire_core::formatter::Formatter::serialize(&discriminant, block)
    };
    let deserialize = quote! {
        let start = block.read_position();
        let discriminant = <#repr as ::packwire_core::formatter::Formatter>::deserialize(block)?;
        #(
            if discriminant == Self::#idents as #repr {
                return Ok(Self::#idents);
            }
        )*
        let _ = block.seek(start);
        Err(::packwire_core::formatter::enum_::unknown_variant::<Self>(discriminant))
    };
    let get_length = quote! {
        #discriminant
        ::packwire_core::formatter::Formatter::get_length(&discriminant)
    };
    let default_length = quote! {
        <#repr as ::packwire_core::formatter::Formatter>::default_length()
    };
    let resolve_dependencies = quote! {
        resolver.register::<#repr>()
    };

    Ok(FormatterBodies {
        serialize,
        deserialize,
        get_length,
        default_length,
        resolve_dependencies,
    })
}
