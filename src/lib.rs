//! # Lifeguard Join
//!
//! Filter and sort a sea-query `SELECT` by columns reached through declared
//! relations. A dotted path such as `customer.profile.bio` compiles into
//! `LEFT JOIN`s with the right keys and aliases, joined once per query, with
//! each relation's own constraints folded into its join's `ON` clause.
//!
//! Entities describe their relations through [`JoinEntity`]; queries are built
//! with [`JoinSelect`].

pub mod config;
pub mod error;
pub mod metrics;
pub mod query;
pub mod relation;

#[cfg(test)]
mod tests_cfg;

pub use config::JoinConfig;
pub use error::{JoinError, Result};
pub use query::{JoinRegistry, JoinSelect, JoinedPath, RelationPath, ResolvedColumn};
pub use relation::{
    Boolean, ClauseArgs, JoinEntity, JoinRelation, Operator, Predicate, RelationClause,
    RelationQuery, RelationScope, RelationType,
};
