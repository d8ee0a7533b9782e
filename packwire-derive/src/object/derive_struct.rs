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

use super::field_meta::parse_field_meta;
use super::formatter::FormatterBodies;
use quote::{format_ident, quote};
use syn::{Fields, Index, Member, Type};

struct SourceField<'a> {
    member: Member,
    ty: &'a Type,
    skip: bool,
}

fn source_fields(fields: &Fields) -> syn::Result<Vec<SourceField<'_>>> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let member = match &field.ident {
                Some(ident) => Member::Named(ident.clone()),
                None => Member::Unnamed(Index::from(i)),
            };
            Ok(SourceField {
                member,
                ty: &field.ty,
                skip: parse_field_meta(field)?.skip,
            })
        })
        .collect()
}

pub fn gen_bodies(fields: &Fields) -> syn::Result<FormatterBodies> {
    let all = source_fields(fields)?;
    let encoded: Vec<&SourceField> = all.iter().filter(|f| !f.skip).collect();
    let count = encoded.len();
    let count_u32 = count as u32;
    let members: Vec<&Member> = encoded.iter().map(|f| &f.member).collect();
    let types: Vec<&Type> = encoded.iter().map(|f| f.ty).collect();

    let serialize = quote! {
        ::packwire_core::codec::write::write_array_header(block, #count)?;
        #(
            ::packwire_core::formatter::Formatter::serialize(&self.#members, block)?;
        )*
        Ok(())
    };

    // Struct expression fields are evaluated in the order written, which
    // is declaration order.
    let inits = all.iter().map(|f| {
        let ty = f.ty;
        if f.skip {
            quote! { ::core::default::Default::default() }
        } else {
            quote! { <#ty as ::packwire_core::formatter::Formatter>::deserialize(block)? }
        }
    });
    let construct = match fields {
        Fields::Named(_) => {
            let names = all.iter().map(|f| &f.member);
            quote! { Self { #(#names: #inits),* } }
        }
        Fields::Unnamed(_) => quote! { Self( #(#inits),* ) },
        Fields::Unit => quote! { Self },
    };
    let block_ident = if count == 0 {
        format_ident!("_block")
    } else {
        format_ident!("block")
    };
    let deserialize = quote! {
        ::packwire_core::formatter::struct_::read_struct::<Self, _>(block, #count, |#block_ident| {
            Ok(#construct)
        })
    };

    let get_length = quote! {
        ::packwire_core::codec::write::array_header_len(#count_u32)
            #( + ::packwire_core::formatter::Formatter::get_length(&self.#members) )*
    };
    let default_length = quote! {
        ::packwire_core::codec::write::array_header_len(#count_u32)
            #( + <#types as ::packwire_core::formatter::Formatter>::default_length() )*
    };
    let resolve_dependencies = if types.is_empty() {
        quote! {
            let _ = resolver;
            Ok(())
        }
    } else {
        quote! {
            #( resolver.register::<#types>()?; )*
            Ok(())
        }
    };

    Ok(FormatterBodies {
        serialize,
        deserialize,
        get_length,
        default_length,
        resolve_dependencies,
    })
}
