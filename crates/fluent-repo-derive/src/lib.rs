// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! Proc-macro implementation for `fluent-repo`.
//!
//! Use the `fluent-repo` facade instead of depending on this crate directly.
//!
//! # Attribute Quick Reference
//!
//! ## Struct-Level `#[model(...)]`
//!
//! ```rust,ignore
//! #[derive(Default, Model)]
//! #[model(
//!     table = "people",          // Optional: storage table (default: snake_case name + "s")
//!     identifiable,              // Optional: identity comes from `Identifiable::id`
//!     crate = "::fluent_repo"    // Optional: path to the runtime crate
//! )]
//! pub struct Person { /* ... */ }
//! ```
//!
//! ## Field-Level Attributes
//!
//! ```rust,ignore
//! pub struct Person {
//!     #[model(primary_key)]              // Explicit primary key marker
//!     pub code: String,
//!
//!     #[model(column = "full_name")]     // Persistence column override
//!     pub name: String,
//!
//!     #[model(projection = "nick")]      // Projection tag, beats `column`
//!     pub nickname: String,
//!
//!     #[model(preload = "Pets.Toys")]    // Association name for preloading
//!     pub pets: Vec<Pet>,
//!
//!     #[model(embedded)]                 // Fields are promoted into the parent
//!     pub audit: Audit,
//!
//!     #[model(skip)]                     // Not part of the shape
//!     pub cache: String,
//!
//!     #[serde(rename = "mail")]          // Read as the serialization tag
//!     pub email: String,
//!
//!     secret: String,                    // Private fields are never exported
//! }
//! ```
//!
//! # Generated Code Overview
//!
//! | Generated Item | Description |
//! |----------------|-------------|
//! | `impl Model` | Cached `Shape`, indexed `field` / `set_field`, optional `identity` |
//! | `impl FieldType` | Lets the struct nest inside other models as a record |

mod model;

use proc_macro::TokenStream;

/// Derive `Model` and `FieldType` for a struct with named fields.
///
/// The struct must implement `Default`. Generic, tuple and unit structs and
/// enums are rejected.
///
/// # Struct Attributes
///
/// | Attribute | Default | Description |
/// |-----------|---------|-------------|
/// | `table` | snake_case name + `s` | Storage table |
/// | `identifiable` | off | Forward `Model::identity` to `Identifiable::id` |
/// | `crate` | `::fluent_repo_core` | Runtime crate path |
///
/// # Field Attributes
///
/// | Attribute | Description |
/// |-----------|-------------|
/// | `#[model(column = "...")]` | Persistence column name |
/// | `#[model(projection = "...")]` | Projection column name, highest priority |
/// | `#[model(preload = "...")]` | Association name used for preloading |
/// | `#[model(primary_key)]` | Primary key marker |
/// | `#[model(embedded)]` | Embedded struct, fields promoted to the parent |
/// | `#[model(skip)]` | Exclude from the shape |
/// | `#[serde(rename = "...")]` | Serialization name |
/// | `#[serde(skip)]` | Serialization skip marker |
/// | `#[serde(flatten)]` | Same as `#[model(embedded)]` |
///
/// # Example
///
/// ```rust,ignore
/// use fluent_repo::Model;
///
/// #[derive(Debug, Default, Model)]
/// pub struct User {
///     pub id: i64,
///     #[model(column = "mail")]
///     pub email: String,
///     #[model(preload = "Posts")]
///     pub posts: Vec<Post>,
/// }
/// ```
#[proc_macro_derive(Model, attributes(model))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    model::derive(input)
}
