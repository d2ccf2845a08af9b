//! Relation-path join compilation.
//!
//! A dotted path such as `customer.profile.bio` is parsed into relation
//! segments and a column ([`RelationPath`]), walked from the base entity one
//! segment at a time, and compiled into `LEFT JOIN`s whose `ON` clauses carry
//! the key predicate plus the relation's own constraints. [`JoinSelect`] owns
//! the statement and the [`JoinRegistry`] that keeps each path joined once.
//!
//! # Architecture
//!
//! - **Path**: parsing and walking (`path`)
//! - **Join**: alias choice and `ON` condition per segment (`join`)
//! - **Constraint**: relation scopes and clauses rewritten onto the join alias (`constraint`)
//! - **Registry**: joined paths of one session (`registry`)
//! - **Select**: the query session and its `*_join` operations (`select`)

pub mod column;
pub(crate) mod constraint;
pub(crate) mod join;
pub mod path;
pub mod registry;
pub mod select;

pub use column::ResolvedColumn;
pub use path::RelationPath;
pub use registry::{JoinRegistry, JoinedPath};
pub use select::JoinSelect;
