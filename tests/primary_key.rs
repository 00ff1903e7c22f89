// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use fluent_repo::{
    Identifiable, Model, Value,
    memory::MemoryConnection,
    prelude::Repository,
    primary_key::{primary_key_column, resolve}
};
use serde::Serialize;

#[allow(non_snake_case)]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Model)]
pub struct Base {
    pub ID: i64
}

#[allow(non_snake_case)]
#[derive(Debug, Default, Clone, PartialEq, Serialize, Model)]
pub struct Member {
    #[serde(flatten)]
    pub base: Base,
    pub Name: String
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Sku {
    pub label: String,
    #[model(primary_key, column = "sku_code")]
    pub code:  String
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
#[model(identifiable, table = "ledger")]
pub struct Entry {
    pub number: u32,
    pub amount: i64
}

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Badge {
    pub id:    Option<i64>,
    pub title: String
}

impl Identifiable for Entry {
    type Id = u32;

    fn id(&self) -> u32 {
        self.number
    }
}

#[test]
fn embedded_id_is_found_transitively() {
    let member = Member {
        base: Base {
            ID: 7
        },
        Name: "Ana".into()
    };
    let pk = resolve(&member).unwrap();
    assert_eq!(pk.field, "ID");
    assert_eq!(pk.column, "i_d");
    assert_eq!(pk.value, Value::Int(7));
}

#[test]
fn tagged_key_and_column() {
    let pk = resolve(&Sku {
        label: "Pen".into(),
        code:  "P-1".into()
    })
    .unwrap();
    assert_eq!(pk.field, "code");
    assert_eq!(pk.column, "sku_code");
    assert_eq!(primary_key_column::<Sku>(), "sku_code");
}

#[test]
fn identity_capability_wins() {
    let pk = resolve(&Entry {
        number: 12,
        amount: 5
    })
    .unwrap();
    assert_eq!(pk.field, "id");
    assert_eq!(pk.value, Value::UInt(12));
    assert_eq!(Entry::shape().table(), "ledger");
}

#[test]
fn embedded_keys_drive_repository_writes() {
    let conn = MemoryConnection::new();
    let created = Repository::<Member, _>::new(conn.clone())
        .create(Member {
            base: Base::default(),
            Name: "Ana".into()
        })
        .into_result()
        .unwrap();
    assert_eq!(created.base.ID, 1);

    let found = Repository::<Member, _>::new(conn.clone())
        .find_by_id(1)
        .first()
        .into_result()
        .unwrap();
    assert_eq!(found.Name, "Ana");

    Repository::<Member, _>::new(conn.clone())
        .delete_entity(&found)
        .execute_only()
        .unwrap();
    assert_eq!(conn.row_count::<Member>(), 0);
}

#[test]
fn string_keys_are_not_generated() {
    let conn = MemoryConnection::new();
    let repo = || Repository::<Sku, _>::new(conn.clone());
    repo()
        .create(Sku {
            label: "Pen".into(),
            code:  "P-1".into()
        })
        .execute_only()
        .unwrap();
    let dup = repo().create(Sku {
        label: "Other".into(),
        code:  "P-1".into()
    });
    assert!(dup.has_error());
    let found = repo().find_by_id("P-1").first().into_result().unwrap();
    assert_eq!(found.label, "Pen");
}

#[test]
fn nullable_keys_are_generated() {
    let conn = MemoryConnection::new();
    let repo = || Repository::<Badge, _>::new(conn.clone());
    let first = repo()
        .create(Badge {
            id:    None,
            title: "gold".into()
        })
        .into_result()
        .unwrap();
    let second = repo()
        .create(Badge {
            id:    None,
            title: "silver".into()
        })
        .into_result()
        .unwrap();
    assert_eq!((first.id, second.id), (Some(1), Some(2)));
    let found = repo().find_by_id(2).first().into_result().unwrap();
    assert_eq!(found.title, "silver");
}
