// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field-level attribute parsing.
//!
//! Two attribute families are read:
//!
//! - `#[model(...)]` — column, projection, preload, primary key, embedding
//!   and skip markers. Unknown keys are errors.
//! - `#[serde(...)]` — `rename`, `skip`/`skip_serializing` and `flatten`
//!   only. Every other serde key is ignored.
//!
//! # Example
//!
//! ```rust,ignore
//! #[model(column = "mail")]
//! pub email: String,
//!
//! #[serde(rename = "full_name")]
//! pub name: String,
//!
//! #[serde(flatten)]
//! pub base: Base,
//! ```

use syn::{Attribute, Field, Ident, LitStr, Meta, Type, Visibility, ext::IdentExt, meta::ParseNestedMeta};

/// Serialization tag read from `#[serde(...)]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Serialization {
    /// `rename = "..."`, or the `serialize` half of `rename(...)`.
    Name(String),

    /// `skip` or `skip_serializing`.
    Skip
}

/// Field definition with all parsed attributes.
#[derive(Debug)]
pub struct FieldDef {
    /// Field identifier as written, raw prefix included.
    pub ident: Ident,

    /// Field type.
    pub ty: Type,

    /// Declared `pub`.
    pub public: bool,

    /// `#[model(column = "...")]`.
    pub column: Option<String>,

    /// `#[model(projection = "...")]`.
    pub projection: Option<String>,

    /// `#[model(preload = "...")]`.
    pub preload: Option<String>,

    /// `#[model(primary_key)]`.
    pub primary_key: bool,

    /// `#[model(embedded)]` or `#[serde(flatten)]`.
    pub embedded: bool,

    /// `#[model(skip)]`.
    pub skip: bool,

    /// Serialization tag from serde.
    pub serialization: Option<Serialization>
}

impl FieldDef {
    /// Parse a field definition from syn's `Field`.
    ///
    /// # Errors
    ///
    /// Returns error for unnamed fields and for unknown or malformed
    /// `#[model(...)]` keys.
    pub fn from_field(field: &Field) -> darling::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| darling::Error::custom("Model fields must be named").with_span(field))?;

        let mut def = Self {
            ident,
            ty: field.ty.clone(),
            public: matches!(field.vis, Visibility::Public(_)),
            column: None,
            projection: None,
            preload: None,
            primary_key: false,
            embedded: false,
            skip: false,
            serialization: None
        };

        for attr in &field.attrs {
            if attr.path().is_ident("model") {
                def.parse_model_attr(attr).map_err(darling::Error::from)?;
            } else if attr.path().is_ident("serde") {
                def.parse_serde_attr(attr).map_err(darling::Error::from)?;
            }
        }

        Ok(def)
    }

    fn parse_model_attr(&mut self, attr: &Attribute) -> syn::Result<()> {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                self.column = Some(string_value(&meta)?);
            } else if meta.path.is_ident("projection") {
                self.projection = Some(string_value(&meta)?);
            } else if meta.path.is_ident("preload") {
                self.preload = Some(string_value(&meta)?);
            } else if meta.path.is_ident("primary_key") {
                self.primary_key = true;
            } else if meta.path.is_ident("embedded") {
                self.embedded = true;
            } else if meta.path.is_ident("skip") {
                self.skip = true;
            } else {
                return Err(meta.error(
                    "unknown model attribute, expected one of: column, projection, preload, \
                     primary_key, embedded, skip"
                ));
            }
            Ok(())
        })
    }

    fn parse_serde_attr(&mut self, attr: &Attribute) -> syn::Result<()> {
        if !matches!(attr.meta, Meta::List(_)) {
            return Ok(());
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                if meta.input.peek(syn::Token![=]) {
                    self.serialization = Some(Serialization::Name(string_value(&meta)?));
                } else {
                    meta.parse_nested_meta(|inner| {
                        if inner.path.is_ident("serialize") {
                            self.serialization = Some(Serialization::Name(string_value(&inner)?));
                        } else {
                            ignore_rest(&inner)?;
                        }
                        Ok(())
                    })?;
                }
            } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_serializing") {
                self.serialization = Some(Serialization::Skip);
            } else if meta.path.is_ident("flatten") {
                self.embedded = true;
            } else {
                ignore_rest(&meta)?;
            }
            Ok(())
        })
    }

    /// Field name without the raw identifier prefix.
    #[must_use]
    pub fn name_str(&self) -> String {
        self.ident.unraw().to_string()
    }

    /// Whether the field is part of the shape.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        self.public && !self.skip
    }
}

fn string_value(meta: &ParseNestedMeta<'_>) -> syn::Result<String> {
    let lit: LitStr = meta.value()?.parse()?;
    Ok(lit.value())
}

/// Consume `= expr` or `(...)` after a key that is not ours.
fn ignore_rest(meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
    if meta.input.peek(syn::Token![=]) {
        let _: syn::Expr = meta.value()?.parse()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        syn::parenthesized!(content in meta.input);
        let _: proc_macro2::TokenStream = content.parse()?;
    }
    Ok(())
}
