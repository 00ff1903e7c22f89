// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `#[derive(Model)]` expansion.
//!
//! Parsing produces a [`ModelDef`]; each generator receives it and returns
//! one impl block.
//!
//! ```text
//! model/
//! ├── parse.rs       — ModelDef, struct attributes
//! ├── parse/field.rs — FieldDef, field attributes
//! ├── shape.rs       — Model::shape
//! ├── access.rs      — Model::field, set_field, identity
//! └── field_type.rs  — FieldType impl
//! ```

mod access;
mod field_type;
pub mod parse;
mod shape;

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use self::parse::ModelDef;

/// Entry point for the Model derive macro.
pub fn derive(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match ModelDef::from_derive_input(&input) {
        Ok(model) => generate(&model).into(),
        Err(err) => err.write_errors().into()
    }
}

fn generate(model: &ModelDef) -> proc_macro2::TokenStream {
    let krate = model.krate();
    let ident = &model.ident;
    let shape = shape::generate(model);
    let access = access::generate(model);
    let field_type = field_type::generate(model);

    quote! {
        #[automatically_derived]
        impl #krate::Model for #ident {
            #shape
            #access
        }

        #field_type
    }
}
