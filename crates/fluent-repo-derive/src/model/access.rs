// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Indexed field access and identity.
//!
//! Field `i` of the shape maps to match arm `i` in both `field` and
//! `set_field`; the order is the declaration order of exported fields.

use proc_macro2::TokenStream;
use quote::quote;

use super::parse::ModelDef;

/// Generate `field`, `set_field` and, when opted in, `identity`.
pub fn generate(model: &ModelDef) -> TokenStream {
    let krate = model.krate();
    let idents: Vec<_> = model.fields.iter().map(|f| &f.ident).collect();
    let indices: Vec<usize> = (0..idents.len()).collect();

    let identity = model.identifiable.then(|| {
        quote! {
            fn identity(&self) -> ::core::option::Option<#krate::Value> {
                ::core::option::Option::Some(#krate::FieldType::to_value(
                    &<Self as #krate::Identifiable>::id(self)
                ))
            }
        }
    });

    quote! {
        fn field(&self, index: usize) -> #krate::Value {
            match index {
                #(#indices => #krate::FieldType::to_value(&self.#idents),)*
                _ => #krate::Value::Null
            }
        }

        #[allow(unused_variables)]
        fn set_field(
            &mut self,
            index: usize,
            value: &#krate::Value,
            policy: #krate::MappingPolicy
        ) -> #krate::MappingResult<bool> {
            match index {
                #(#indices => #krate::model::assign(&mut self.#idents, value, policy),)*
                _ => ::core::result::Result::Ok(false)
            }
        }

        #identity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arms_follow_declaration_order() {
        let def = ModelDef::from_derive_input(&syn::parse_quote! {
            pub struct Pair {
                pub left: i32,
                hidden: i32,
                pub right: i32
            }
        })
        .unwrap();
        let code = generate(&def).to_string();
        let left = code.find("self . left").unwrap();
        let right = code.find("self . right").unwrap();
        assert!(left < right);
        assert!(code.contains("0usize"));
        assert!(code.contains("1usize"));
        assert!(!code.contains("2usize"));
        assert!(!code.contains("hidden"));
        assert!(!code.contains("fn identity"));
    }

    #[test]
    fn identifiable_emits_identity() {
        let def = ModelDef::from_derive_input(&syn::parse_quote! {
            #[model(identifiable)]
            pub struct Keyed { pub code: u32 }
        })
        .unwrap();
        let code = generate(&def).to_string();
        assert!(code.contains("fn identity"));
        assert!(code.contains("Identifiable"));
    }
}
