// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

mod common;

use common::{User, repo, seeded, user};
use fluent_repo::{
    Condition, Model, RepositoryError, SortDirection, TransactionOps,
    memory::{Cancellation, MemoryConnection, MemoryError},
    prelude::Repository
};

#[derive(Debug, Default, Clone, PartialEq, Model)]
pub struct Note {
    pub text: String
}

fn names(users: &[User]) -> Vec<&str> {
    users.iter().map(|u| u.name.as_str()).collect()
}

#[test]
fn count_and_exists_never_fail_on_no_rows() {
    let conn = seeded();
    let r = repo(&conn);
    assert_eq!(r.count(Vec::<(&str, i32)>::new()).unwrap(), 3);
    assert!(r.exists(Vec::<(&str, i32)>::new()).unwrap());
    assert_eq!(r.count([("age", 30)]).unwrap(), 2);
    assert_eq!(r.count([("age", 99)]).unwrap(), 0);
    assert!(!r.exists([("age", 99)]).unwrap());
}

#[test]
fn count_ignores_chain_state() {
    let conn = seeded();
    let r = repo(&conn)
        .filter(Condition::eq("name", "Ana"))
        .preload(["Posts"])
        .select(["name"]);
    assert_eq!(r.count([("active", true)]).unwrap(), 2);
    let last = conn.last_query().unwrap();
    assert!(last.preloads.is_empty());
    assert!(last.select.is_empty());
    assert_eq!(last.clauses.len(), 1);
}

#[test]
fn pagination_offsets() {
    let conn = MemoryConnection::new();
    let first = repo(&conn).paginate(1, 20);
    assert_eq!((first.query().offset, first.query().limit), (Some(0), Some(20)));
    let second = repo(&conn).paginate(2, 20);
    assert_eq!((second.query().offset, second.query().limit), (Some(20), Some(20)));
}

#[test]
fn paginated_reads() {
    let conn = seeded();
    let page = repo(&conn)
        .order_by("id", SortDirection::Asc)
        .paginate(2, 2)
        .all()
        .into_results()
        .unwrap();
    assert_eq!(names(&page), ["Cy"]);
}

#[test]
fn one_returns_a_single_row_when_many_match() {
    let conn = seeded();
    let r = repo(&conn).filter(Condition::eq("age", 30)).one();
    assert!(!r.has_error());
    assert_eq!(r.query().limit, Some(1));
    assert_eq!(r.result().unwrap().map(|u| u.name.as_str()), Some("Ana"));
}

#[test]
fn first_does_not_touch_limit() {
    let conn = seeded();
    let r = repo(&conn).first();
    assert_eq!(r.query().limit, None);
    assert_eq!(r.into_result().unwrap().id, 1);
}

#[test]
fn first_without_match_stores_not_found() {
    let conn = seeded();
    let r = repo(&conn).filter(Condition::eq("name", "Nobody")).first();
    assert!(r.has_error());
    assert!(r.last_error().unwrap().is_not_found());
    assert!(r.result().unwrap_err().is_not_found());
    assert!(r.execute_only().is_err());
    assert_eq!(r.into_result().unwrap_err().to_string(), "record not found");
}

#[test]
fn a_later_success_clears_the_error() {
    let conn = seeded();
    let r = repo(&conn).find_by_id(99).first();
    assert!(r.has_error());
    let r = r.all();
    assert!(!r.has_error());
    assert_eq!(r.results().unwrap().map(<[User]>::len), Some(0));
}

#[test]
fn filters_compose() {
    let conn = seeded();
    let adults = repo(&conn)
        .filter(Condition::ge("age", 18))
        .or_filter(Condition::eq("name", "Bo"))
        .not_filter(Condition::eq("name", "Cy"))
        .order("name")
        .all()
        .into_results()
        .unwrap();
    assert_eq!(names(&adults), ["Ana", "Bo"]);

    let like = repo(&conn)
        .filter(Condition::like("mail", "%y@x.com"))
        .all()
        .into_results()
        .unwrap();
    assert_eq!(names(&like), ["Cy"]);

    let within = repo(&conn)
        .filter(Condition::is_in("id", [1, 3]))
        .order("id desc")
        .all()
        .into_results()
        .unwrap();
    assert_eq!(names(&within), ["Cy", "Ana"]);
}

#[test]
fn group_and_having() {
    let conn = seeded();
    let groups = repo(&conn)
        .group("age")
        .having(Condition::gt("age", 20))
        .all()
        .into_results()
        .unwrap();
    assert_eq!(names(&groups), ["Ana"]);
}

#[test]
fn finders() {
    let conn = seeded();
    let bo = repo(&conn).find_by_id(2).first().into_result().unwrap();
    assert_eq!(bo.name, "Bo");

    let cy = repo(&conn).find_one([("name", "Cy")]).into_result().unwrap();
    assert_eq!(cy.id, 3);

    let all = repo(&conn).find_all().all().into_results().unwrap();
    assert_eq!(all.len(), 3);

    let r = repo(&conn).find_first();
    assert_eq!(r.query().limit, Some(1));
    assert_eq!(r.all().into_results().unwrap().len(), 1);
}

#[test]
fn associations_load_only_on_request() {
    let conn = seeded();
    let plain = repo(&conn).find_by_id(1).first().into_result().unwrap();
    assert!(plain.posts.is_empty());
    assert_eq!(plain.profile, None);

    let loaded = repo(&conn)
        .find_by_id(1)
        .preload(["Posts", "Posts.comments"])
        .first()
        .into_result()
        .unwrap();
    assert_eq!(loaded.posts.len(), 2);
    assert_eq!(loaded.posts[0].comments.len(), 1);
    assert_eq!(loaded.profile, None);
}

#[test]
fn unknown_preload_is_an_execution_error() {
    let conn = seeded();
    let err = repo(&conn).preload(["Friends"]).all().into_results().unwrap_err();
    assert!(err.is_execution());
    assert!(matches!(
        err.execution_source::<MemoryError>(),
        Some(MemoryError::UnknownAssociation { .. })
    ));
}

#[test]
fn create_assigns_keys() {
    let conn = MemoryConnection::new();
    let created = repo(&conn).create(user("Ana", 30)).into_result().unwrap();
    assert_eq!(created.id, 1);
    assert_eq!(created.posts.len(), 2);

    let batch = repo(&conn)
        .create_batch(vec![user("Bo", 17), user("Cy", 30)])
        .into_results()
        .unwrap();
    assert_eq!(batch.iter().map(|u| u.id).collect::<Vec<_>>(), [2, 3]);
    assert_eq!(conn.row_count::<User>(), 3);
}

#[test]
fn create_with_preload_rereads_the_row() {
    let conn = MemoryConnection::new();
    let created = repo(&conn)
        .create_with_preload(user("Ana", 30), ["profile"])
        .into_result()
        .unwrap();
    assert_eq!(created.id, 1);
    assert!(created.profile.is_some());
    assert!(created.posts.is_empty());

    let full = repo(&conn)
        .create_with_all_associations(user("Bo", 17))
        .into_result()
        .unwrap();
    assert!(full.profile.is_some());
    assert_eq!(full.posts.len(), 2);
}

#[test]
fn create_with_preload_falls_back_without_key() {
    let conn = MemoryConnection::new();
    let note = Repository::<Note, _>::new(conn.clone())
        .create_with_preload(
            Note {
                text: "hello".into()
            },
            ["anything"]
        )
        .into_result()
        .unwrap();
    assert_eq!(note.text, "hello");
}

#[test]
fn duplicate_create_stores_execution_error() {
    let conn = seeded();
    let mut dup = user("Dup", 1);
    dup.id = 1;
    let r = repo(&conn).create(dup);
    assert!(r.last_error().unwrap().is_execution());
    assert_eq!(conn.row_count::<User>(), 3);
}

#[test]
fn update_saves_and_update_with_preload_rereads() {
    let conn = seeded();
    let mut ana = repo(&conn).find_by_id(1).first().into_result().unwrap();
    ana.age = 31;
    repo(&conn).update(ana).execute_only().unwrap();
    assert_eq!(repo(&conn).count([("age", 31)]).unwrap(), 1);

    let mut bo = repo(&conn).find_by_id(2).first().into_result().unwrap();
    bo.name = "Bob".into();
    bo.posts = user("Bob", 17).posts;
    let reread = repo(&conn)
        .update_with_preload(bo, ["Posts"])
        .into_result()
        .unwrap();
    assert_eq!(reread.name, "Bob");
    assert_eq!(reread.posts.len(), 2);
    assert_eq!(reread.profile, None);
}

#[test]
fn update_fields_is_scoped_by_key() {
    let conn = seeded();
    let ana = repo(&conn).find_by_id(1).first().into_result().unwrap();
    let stored = repo(&conn)
        .update_fields(ana.clone(), [("name", "Anna")])
        .into_result()
        .unwrap();
    assert_eq!(stored, ana);
    let reread = repo(&conn).find_by_id(1).first().into_result().unwrap();
    assert_eq!(reread.name, "Anna");
    assert_eq!(repo(&conn).count([("name", "Anna")]).unwrap(), 1);

    let err = Repository::<Note, _>::new(conn.clone())
        .update_fields(Note::default(), [("text", "x")])
        .into_result()
        .unwrap_err();
    assert!(matches!(err, RepositoryError::PrimaryKeyNotFound { entity: "Note" }));
}

#[test]
fn deletes() {
    let conn = seeded();
    repo(&conn).delete(2).execute_only().unwrap();
    assert_eq!(conn.row_count::<User>(), 2);

    let ana = repo(&conn).find_by_id(1).first().into_result().unwrap();
    repo(&conn).delete_entity(&ana).execute_only().unwrap();
    assert_eq!(conn.row_count::<User>(), 1);

    let rest = repo(&conn).all().into_results().unwrap();
    repo(&conn).delete_batch(&rest).execute_only().unwrap();
    assert_eq!(conn.row_count::<User>(), 0);

    repo(&conn).delete_batch(&[]).execute_only().unwrap();

    let err = Repository::<Note, _>::new(conn.clone())
        .delete_entity(&Note::default())
        .execute_only()
        .unwrap_err();
    assert!(matches!(err, RepositoryError::PrimaryKeyNotFound { .. }));
}

#[test]
fn transaction_commits_on_ok() {
    let conn = seeded();
    let id = repo(&conn)
        .transaction(|tx| {
            let created = tx.create(user("Dee", 40)).into_result()?;
            Ok(created.id)
        })
        .unwrap();
    assert_eq!(id, 4);
    assert_eq!(conn.row_count::<User>(), 4);
}

#[test]
fn transaction_rolls_back_on_error() {
    let conn = seeded();
    let err = repo(&conn)
        .transaction(|tx| {
            let tx = tx.delete(1);
            tx.execute_only()?;
            tx.find_by_id(99).first().into_result().map(|_| ())
        })
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(conn.row_count::<User>(), 3);
}

#[test]
fn explicit_transaction_handle() {
    let conn = seeded();
    let tx = repo(&conn).begin().unwrap();
    Repository::<User, _>::new(tx.connection())
        .delete(1)
        .execute_only()
        .unwrap();
    assert_eq!(conn.row_count::<User>(), 3);
    tx.rollback().unwrap();
    assert_eq!(conn.row_count::<User>(), 3);

    let tx = repo(&conn).begin().unwrap();
    Repository::<User, _>::new(tx.connection())
        .delete(1)
        .execute_only()
        .unwrap();
    tx.commit().unwrap();
    assert_eq!(conn.row_count::<User>(), 2);
}

#[test]
fn cancelled_context_fails_terminal_calls() {
    let conn = seeded();
    let ctx = Cancellation::new();
    ctx.cancel();
    let r = repo(&conn)
        .filter(Condition::eq("age", 30))
        .with_context(ctx)
        .all();
    let err = r.last_error().unwrap();
    assert!(matches!(err.execution_source::<MemoryError>(), Some(MemoryError::Cancelled)));
    assert_eq!(r.query().clauses.len(), 1);
}

#[test]
fn with_connection_starts_a_fresh_chain() {
    let conn = seeded();
    let other = MemoryConnection::new();
    let chained = repo(&conn).filter(Condition::eq("age", 30));
    let fresh = chained.with_connection(other.clone());
    assert!(fresh.query().clauses.is_empty());
    assert_eq!(fresh.count(Vec::<(&str, i32)>::new()).unwrap(), 0);
    assert_eq!(chained.all().into_results().unwrap().len(), 2);
}

#[test]
fn raw_conditions_are_rejected_by_the_memory_engine() {
    let conn = seeded();
    let err = repo(&conn)
        .filter(Condition::raw("age > ?", vec![18.into()]))
        .all()
        .into_results()
        .unwrap_err();
    assert!(matches!(
        err.execution_source::<MemoryError>(),
        Some(MemoryError::UnsupportedCondition(_))
    ));
}

#[test]
fn joins_accumulate_and_memory_rejects_them() {
    let conn = seeded();
    let r = repo(&conn)
        .joins(["JOIN posts ON posts.user_id = users.id"])
        .joins(["LEFT JOIN profiles ON profiles.user_id = users.id"]);
    assert_eq!(r.query().joins, [
        "JOIN posts ON posts.user_id = users.id",
        "LEFT JOIN profiles ON profiles.user_id = users.id"
    ]);
    let r = r.all();
    let err = r.last_error().unwrap();
    assert!(matches!(
        err.execution_source::<MemoryError>(),
        Some(MemoryError::UnsupportedJoin(_))
    ));
}

#[test]
fn transaction_commit_keeps_concurrent_writes() {
    let conn = seeded();
    let tx = repo(&conn).begin().unwrap();
    repo(&conn).create(user("Dee", 40)).execute_only().unwrap();
    Repository::<User, _>::new(tx.connection())
        .create(user("Eve", 22))
        .execute_only()
        .unwrap();
    tx.commit().unwrap();
    assert_eq!(conn.row_count::<User>(), 5);
    assert_eq!(repo(&conn).count([("name", "Eve")]).unwrap(), 1);
}
