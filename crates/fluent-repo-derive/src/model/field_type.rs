// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `FieldType` implementation for derived structs.
//!
//! A derived struct is a composite `Struct` kind. Nested records are mapped
//! by name, so a record of another shape (an entity field feeding a DTO
//! field) converts the same way top-level projection does.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::ModelDef;

/// Generate the `FieldType` impl.
pub fn generate(model: &ModelDef) -> TokenStream {
    let krate = model.krate();
    let ident = &model.ident;

    quote! {
        #[automatically_derived]
        impl #krate::FieldType for #ident {
            fn kind() -> #krate::TypeKind {
                #krate::TypeKind::Struct
            }

            fn to_value(&self) -> #krate::Value {
                #krate::Value::Record(#krate::Model::to_record(self))
            }

            fn from_value(
                value: &#krate::Value,
                policy: #krate::MappingPolicy
            ) -> #krate::MappingResult<::core::option::Option<Self>> {
                match value {
                    #krate::Value::Record(record) => {
                        #krate::mapping::map_record::<Self>(record, policy).map(::core::option::Option::Some)
                    }
                    #krate::Value::Null => ::core::result::Result::Ok(::core::option::Option::None),
                    other => #krate::kind::unconvertible(&#krate::TypeKind::Struct, other, policy)
                }
            }
        }
    }
}
