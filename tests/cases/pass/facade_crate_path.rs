// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use fluent_repo::Model;

#[derive(Debug, Default, Model)]
#[model(crate = "::fluent_repo")]
pub struct Label {
    pub text: String,
}

#[derive(Debug, Default, Model)]
#[model(crate = "::fluent_repo")]
pub struct Board {
    pub id: u64,
    pub labels: Vec<Label>,
}

fn main() {
    assert_eq!(Board::shape().len(), 2);
    assert_eq!(Label::shape().table(), "labels");
}
