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

//! Parsing of `#[packwire(...)]` field attributes.

use syn::Field;

#[derive(Debug, Clone, Copy, Default)]
pub struct FieldMeta {
    /// Leave the field out of the encoding.
    pub skip: bool,
}

pub fn parse_field_meta(field: &Field) -> syn::Result<FieldMeta> {
    let mut meta = FieldMeta::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("packwire") {
            continue;
        }
        attr.parse_nested_meta(|nested| {
            if nested.path.is_ident("skip") {
                meta.skip = true;
                Ok(())
            } else {
                Err(nested.error("unsupported packwire attribute, expected `skip`"))
            }
        })?;
    }
    Ok(meta)
}
