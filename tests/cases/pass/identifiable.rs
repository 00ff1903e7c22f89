// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use fluent_repo::{Identifiable, Model, Value};

#[derive(Debug, Default, Model)]
#[model(identifiable)]
pub struct Invoice {
    pub number: String,
    pub total: i64,
}

impl Identifiable for Invoice {
    type Id = String;

    fn id(&self) -> String {
        self.number.clone()
    }
}

fn main() {
    let invoice = Invoice {
        number: "INV-1".into(),
        total: 10,
    };
    assert_eq!(invoice.identity(), Some(Value::from("INV-1")));
}
