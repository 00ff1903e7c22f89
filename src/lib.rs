// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]

//! # fluent-repo
//!
//! One crate, all features. Re-exports:
//! - [`Model`](macro@Model) derive macro from `fluent-repo-derive`
//! - All types from `fluent-repo-core` ([`Repository`], [`Value`],
//!   [`Shape`], [`Projection`], the projection engine in [`mapping`] and,
//!   with the `memory` feature, the in-memory engine in [`memory`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use fluent_repo::prelude::*;
//!
//! #[derive(Debug, Default, Clone, Model)]
//! pub struct User {
//!     pub id: i64,
//!     pub name: String,
//!     #[model(column = "mail")]
//!     pub email: String,
//!     #[model(preload = "Posts")]
//!     pub posts: Vec<Post>,
//! }
//!
//! #[derive(Debug, Default, Model)]
//! pub struct UserCard {
//!     pub id: i64,
//!     pub name: String,
//! }
//!
//! let conn = MemoryConnection::new();
//! let user = Repository::<User, _>::new(conn.clone())
//!     .create(User { name: "ana".into(), ..Default::default() })
//!     .into_result()?;
//!
//! let cards: Vec<UserCard> = Repository::<User, _>::new(conn)
//!     .order("name desc")
//!     .paginate(1, 20)
//!     .project_to::<UserCard>()
//!     .all()
//!     .project_slice()?;
//! ```
//!
//! # Runtime Crate Path
//!
//! Generated code names `::fluent_repo_core`. Crates that depend only on
//! this facade point the macro at it:
//!
//! ```rust,ignore
//! #[derive(Default, Model)]
//! #[model(crate = "::fluent_repo")]
//! pub struct Tag {
//!     pub label: String,
//! }
//! ```

pub use fluent_repo_core::*;
pub use fluent_repo_derive::Model;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use fluent_repo_core::prelude::*;
    pub use fluent_repo_derive::Model;
}
