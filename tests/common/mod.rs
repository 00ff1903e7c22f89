// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared entities for integration tests.

#![allow(dead_code)]

use fluent_repo::{Model, memory::MemoryConnection, prelude::Repository};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Comment {
    pub id:   i64,
    pub body: String
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Post {
    pub id:       i64,
    pub title:    String,
    pub comments: Vec<Comment>
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Profile {
    pub bio: String
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct User {
    pub id:      i64,
    pub name:    String,
    #[model(column = "mail")]
    pub email:   String,
    pub age:     i32,
    pub active:  bool,
    pub profile: Option<Profile>,
    #[model(preload = "Posts")]
    pub posts:   Vec<Post>
}

pub fn user(name: &str, age: i32) -> User {
    User {
        id: 0,
        name: name.into(),
        email: format!("{}@x.com", name.to_lowercase()),
        age,
        active: age >= 18,
        profile: Some(Profile {
            bio: format!("{name} bio")
        }),
        posts: vec![
            Post {
                id:       0,
                title:    format!("{name} first"),
                comments: vec![Comment {
                    id:   0,
                    body: "great".into()
                }]
            },
            Post {
                id:       0,
                title:    format!("{name} second"),
                comments: Vec::new()
            },
        ]
    }
}

/// Route engine logs to the test writer; `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Connection holding Ana (30), Bo (17) and Cy (30), ids 1..=3.
pub fn seeded() -> MemoryConnection {
    init_tracing();
    let conn = MemoryConnection::new();
    for (name, age) in [("Ana", 30), ("Bo", 17), ("Cy", 30)] {
        Repository::<User, _>::new(conn.clone())
            .create(user(name, age))
            .execute_only()
            .unwrap();
    }
    conn
}

pub fn repo(conn: &MemoryConnection) -> Repository<User, MemoryConnection> {
    Repository::new(conn.clone())
}
