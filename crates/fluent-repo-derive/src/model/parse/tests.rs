// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Tests for model parsing.
//!
//! Tests use `syn::parse_quote!` to build struct definitions, then check the
//! parsed `ModelDef`:
//!
//! ```rust,ignore
//! let input: DeriveInput = syn::parse_quote! {
//!     #[model(table = "people")]
//!     pub struct Person { pub id: i64 }
//! };
//! let model = ModelDef::from_derive_input(&input).unwrap();
//! assert_eq!(model.table.as_deref(), Some("people"));
//! ```

use syn::DeriveInput;

use super::{ModelDef, Serialization, default_crate_path};

fn parse(input: DeriveInput) -> ModelDef {
    ModelDef::from_derive_input(&input).unwrap()
}

#[test]
fn default_crate_path_is_core() {
    let path = default_crate_path();
    let path_str = quote::quote!(#path).to_string();
    assert!(path_str.contains("fluent_repo_core"));
}

#[test]
fn struct_attributes() {
    let model = parse(syn::parse_quote! {
        #[model(table = "people", identifiable, crate = "::fluent_repo")]
        pub struct Person {
            pub id: i64
        }
    });
    assert_eq!(model.name_str(), "Person");
    assert_eq!(model.table.as_deref(), Some("people"));
    assert!(model.identifiable);
    let path = &model.krate;
    let path_str = quote::quote!(#path).to_string();
    assert!(path_str.ends_with("fluent_repo"));
}

#[test]
fn defaults_without_attributes() {
    let model = parse(syn::parse_quote! {
        pub struct Person {
            pub id: i64
        }
    });
    assert_eq!(model.table, None);
    assert!(!model.identifiable);
    assert_eq!(model.fields.len(), 1);
}

#[test]
fn private_and_skipped_fields_are_not_exported() {
    let model = parse(syn::parse_quote! {
        pub struct Account {
            pub id: i64,
            secret: String,
            pub(crate) internal: u8,
            #[model(skip)]
            pub cache: String,
            pub name: String
        }
    });
    let names: Vec<String> = model.fields.iter().map(|f| f.name_str()).collect();
    assert_eq!(names, ["id", "name"]);
}

#[test]
fn field_model_attributes() {
    let model = parse(syn::parse_quote! {
        pub struct Order {
            #[model(primary_key, column = "order_code")]
            pub code: String,
            #[model(projection = "total_cents")]
            pub total: i64,
            #[model(preload = "Lines.Product")]
            pub lines: Vec<Line>,
            #[model(embedded)]
            pub audit: Audit
        }
    });
    let code = &model.fields[0];
    assert!(code.primary_key);
    assert_eq!(code.column.as_deref(), Some("order_code"));
    assert_eq!(model.fields[1].projection.as_deref(), Some("total_cents"));
    assert_eq!(model.fields[2].preload.as_deref(), Some("Lines.Product"));
    assert!(model.fields[3].embedded);
}

#[test]
fn serde_attributes_are_read() {
    let model = parse(syn::parse_quote! {
        pub struct Contact {
            #[serde(rename = "mail", default)]
            pub email: String,
            #[serde(rename(serialize = "ph", deserialize = "phone_number"))]
            pub phone: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            pub fax: Option<String>,
            #[serde(skip)]
            pub hidden: String,
            #[serde(flatten)]
            pub base: Base
        }
    });
    assert_eq!(model.fields[0].serialization, Some(Serialization::Name("mail".into())));
    assert_eq!(model.fields[1].serialization, Some(Serialization::Name("ph".into())));
    assert_eq!(model.fields[2].serialization, None);
    assert_eq!(model.fields[3].serialization, Some(Serialization::Skip));
    assert!(model.fields[4].embedded);
}

#[test]
fn raw_identifiers_are_unprefixed() {
    let model = parse(syn::parse_quote! {
        pub struct Token {
            pub r#type: String
        }
    });
    assert_eq!(model.fields[0].name_str(), "type");
}

#[test]
fn unknown_model_key_is_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        pub struct Bad {
            #[model(colum = "x")]
            pub id: i64
        }
    };
    let err = ModelDef::from_derive_input(&input).unwrap_err();
    assert!(err.to_string().contains("unknown model attribute"));
}

#[test]
fn unknown_struct_key_is_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        #[model(tabel = "x")]
        pub struct Bad {
            pub id: i64
        }
    };
    assert!(ModelDef::from_derive_input(&input).is_err());
}

#[test]
fn enums_are_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        pub enum Status { Active, Inactive }
    };
    assert!(ModelDef::from_derive_input(&input).is_err());
}

#[test]
fn tuple_structs_are_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        pub struct Pair(pub i64, pub String);
    };
    assert!(ModelDef::from_derive_input(&input).is_err());
}

#[test]
fn unit_structs_are_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        pub struct Marker;
    };
    assert!(ModelDef::from_derive_input(&input).is_err());
}

#[test]
fn generic_structs_are_rejected() {
    let input: DeriveInput = syn::parse_quote! {
        pub struct Wrapper<T> {
            pub inner: T
        }
    };
    let err = ModelDef::from_derive_input(&input).unwrap_err();
    assert!(err.to_string().contains("generic"));
}
