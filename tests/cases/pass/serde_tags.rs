// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use fluent_repo::{Model, SerializationTag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize, Model)]
pub struct Base {
    pub id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, Model)]
pub struct Account {
    #[serde(flatten)]
    pub base: Base,

    #[serde(rename = "mail", default)]
    pub email: String,

    #[serde(skip)]
    pub token: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

fn main() {
    let shape = Account::shape();
    assert!(shape.field("base").unwrap().is_embedded());
    assert_eq!(shape.field("email").unwrap().column_name(), "mail");
    assert_eq!(
        shape.field("token").unwrap().tags().serialization,
        Some(SerializationTag::Skip)
    );
    assert_eq!(shape.field("nickname").unwrap().column_name(), "nickname");
}
