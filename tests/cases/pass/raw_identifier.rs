// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use fluent_repo::{Model, Value};

#[derive(Debug, Default, Model)]
pub struct Event {
    pub r#type: String,
    #[model(skip)]
    pub scratch: Vec<u8>,
}

fn main() {
    let shape = Event::shape();
    assert_eq!(shape.len(), 1);
    assert_eq!(shape.fields()[0].name(), "type");

    let mut event = Event::default();
    let assigned = event
        .set_field(0, &Value::from("created"), fluent_repo::MappingPolicy::Strict)
        .unwrap();
    assert!(assigned);
    assert_eq!(event.r#type, "created");
}
