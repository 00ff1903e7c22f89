// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use fluent_repo::{Model, Value};

#[derive(Debug, Default, Model)]
#[model(table = "people")]
pub struct Person {
    #[model(primary_key)]
    pub id: i64,

    #[model(column = "full_name")]
    pub name: String,

    pub age: u8,

    pub score: f64,

    pub active: bool,

    secret: String,
}

fn main() {
    let shape = Person::shape();
    assert_eq!(shape.table(), "people");
    assert_eq!(shape.len(), 5);
    assert_eq!(shape.field("name").unwrap().column_name(), "full_name");
    assert!(shape.field("secret").is_none());

    let person = Person {
        id: 1,
        name: "Ana".into(),
        secret: "hidden".into(),
        ..Default::default()
    };
    assert_eq!(person.field(1), Value::from("Ana"));
    assert_eq!(person.secret, "hidden");
}
