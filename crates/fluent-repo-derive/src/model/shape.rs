// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `Model::shape` generation.
//!
//! The shape is built from `ShapeBuilder` calls and cached in a function-local
//! `OnceLock`, so each type builds its descriptor table once.
//!
//! ```rust,ignore
//! fn shape() -> &'static Shape {
//!     static SHAPE: OnceLock<Shape> = OnceLock::new();
//!     SHAPE.get_or_init(|| {
//!         Shape::builder("User")
//!             .field(FieldDescriptor::new("id", <i64 as FieldType>::kind()))
//!             .field(FieldDescriptor::new("email", <String as FieldType>::kind()).with_column("mail"))
//!             .build()
//!     })
//! }
//! ```

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::{FieldDef, ModelDef, Serialization};

/// Generate the `shape` method.
pub fn generate(model: &ModelDef) -> TokenStream {
    let krate = model.krate();
    let name = model.name_str();
    let table = model.table.as_ref().map(|table| quote! { .table(#table) });
    let fields = model.fields.iter().map(|field| descriptor(krate, field));

    quote! {
        fn shape() -> &'static #krate::Shape {
            static SHAPE: ::std::sync::OnceLock<#krate::Shape> = ::std::sync::OnceLock::new();
            SHAPE.get_or_init(|| {
                #krate::Shape::builder(#name)
                    #table
                    #(.field(#fields))*
                    .build()
            })
        }
    }
}

fn descriptor(krate: &syn::Path, field: &FieldDef) -> TokenStream {
    let name = field.name_str();
    let ty = &field.ty;

    let column = field.column.as_ref().map(|c| quote! { .with_column(#c) });
    let projection = field.projection.as_ref().map(|p| quote! { .with_projection(#p) });
    let preload = field.preload.as_ref().map(|p| quote! { .with_preload(#p) });
    let serialization = match &field.serialization {
        Some(Serialization::Name(n)) => Some(quote! { .with_serialization(#n) }),
        Some(Serialization::Skip) => Some(quote! { .skip_serialization() }),
        None => None
    };
    let primary_key = field.primary_key.then(|| quote! { .primary_key() });
    let embedded = field.embedded.then(|| quote! { .embedded() });

    quote! {
        #krate::FieldDescriptor::new(#name, <#ty as #krate::FieldType>::kind())
            #column
            #projection
            #preload
            #serialization
            #primary_key
            #embedded
    }
}
