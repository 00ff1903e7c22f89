// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, HashMap};

use fluent_repo::{Model, ProjectionShape};

#[derive(Debug, Default, Model)]
pub struct Audit {
    pub created_by: String,
}

#[derive(Debug, Default, Model)]
pub struct Tag {
    pub label: String,
}

#[derive(Debug, Default, Model)]
pub struct Article {
    pub id: i64,

    #[model(embedded)]
    pub audit: Audit,

    pub cover: Option<Box<Tag>>,

    #[model(preload = "Tags")]
    pub tags: Vec<Tag>,

    pub labels: Vec<String>,

    pub meta: BTreeMap<String, String>,

    pub counters: HashMap<String, i64>,

    pub subtitle: Option<String>,
}

fn main() {
    let shape = ProjectionShape::of::<Article>();
    assert_eq!(shape.columns, ["id", "subtitle"]);
    assert_eq!(
        shape.associations,
        ["audit", "cover", "Tags", "labels", "meta", "counters"]
    );
    assert_eq!(Article::shape().table(), "articles");
}
