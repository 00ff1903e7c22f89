// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Struct-level attribute parsing.
//!
//! # Supported Attributes
//!
//! | Attribute | Required | Default | Description |
//! |-----------|----------|---------|-------------|
//! | `table` | No | derived | Storage table name |
//! | `identifiable` | No | `false` | Identity from `Identifiable::id` |
//! | `crate` | No | `::fluent_repo_core` | Runtime crate path |

mod field;

use darling::FromDeriveInput;
use syn::{DeriveInput, Ident};

pub use self::field::{FieldDef, Serialization};

/// Default runtime crate path.
pub fn default_crate_path() -> syn::Path {
    syn::parse_quote!(::fluent_repo_core)
}

/// Attributes parsed from `#[model(...)]` on the struct.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(model), supports(struct_named))]
pub struct ModelAttrs {
    /// Struct identifier.
    pub ident: Ident,

    /// Explicit storage table.
    #[darling(default)]
    pub table: Option<String>,

    /// Forward identity to `Identifiable`.
    #[darling(default)]
    pub identifiable: bool,

    /// Runtime crate path override.
    #[darling(default, rename = "crate")]
    pub krate: Option<syn::Path>
}

/// Parsed model definition passed to every generator.
#[derive(Debug)]
pub struct ModelDef {
    /// Struct identifier (e.g., `User`).
    pub ident: Ident,

    /// Explicit storage table, `None` to derive it at runtime.
    pub table: Option<String>,

    /// Whether `Model::identity` forwards to `Identifiable::id`.
    pub identifiable: bool,

    /// Runtime crate path.
    pub krate: syn::Path,

    /// Exported fields in declaration order.
    ///
    /// Private and `#[model(skip)]` fields are already removed.
    pub fields: Vec<FieldDef>
}

impl ModelDef {
    /// Parse a model definition from syn's `DeriveInput`.
    ///
    /// # Errors
    ///
    /// - Applied to an enum, union, tuple struct or unit struct
    /// - Generic parameters
    /// - Unknown or malformed `#[model(...)]` keys
    pub fn from_derive_input(input: &DeriveInput) -> darling::Result<Self> {
        let attrs = ModelAttrs::from_derive_input(input)?;

        if !input.generics.params.is_empty() {
            return Err(darling::Error::custom("Model cannot be derived for generic structs")
                .with_span(&input.generics));
        }

        let named = match &input.data {
            syn::Data::Struct(data) => match &data.fields {
                syn::Fields::Named(named) => &named.named,
                _ => {
                    return Err(darling::Error::custom("Model requires named fields")
                        .with_span(&input.ident));
                }
            },
            _ => {
                return Err(darling::Error::custom("Model can only be derived for structs")
                    .with_span(&input.ident));
            }
        };

        let mut errors = darling::Error::accumulator();
        let mut fields = Vec::with_capacity(named.len());
        for field in named {
            if let Some(parsed) = errors.handle(FieldDef::from_field(field))
                && parsed.is_exported()
            {
                fields.push(parsed);
            }
        }
        errors.finish()?;

        Ok(Self {
            ident: attrs.ident,
            table: attrs.table,
            identifiable: attrs.identifiable,
            krate: attrs.krate.unwrap_or_else(default_crate_path),
            fields
        })
    }

    /// Runtime crate path.
    #[must_use]
    pub fn krate(&self) -> &syn::Path {
        &self.krate
    }

    /// Struct name as written in the shape.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.to_string()
    }
}

#[cfg(test)]
mod tests;
