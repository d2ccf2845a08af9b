//! Error type for relation-path join compilation.
//!
//! Every variant is fatal to the call that produced it: the session is left
//! untouched and the error surfaces to the caller through `?`. Nothing here is
//! transient, so callers should fix the offending relation declaration or path
//! rather than retry.

use crate::relation::{JoinEntity, RelationType};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JoinError {
    /// An intermediate path segment resolved to a relation that cannot be
    /// compiled into a single `LEFT JOIN`.
    #[error("relation `{relation}` is {kind}; only belongs_to and has_one relations can be joined")]
    UnsupportedRelationKind { relation: String, kind: RelationType },

    /// A joined relation declares a global scope other than soft-delete.
    #[error("relation `{relation}` declares scope `{scope}`; only the soft-delete scope can be applied to a join")]
    InvalidRelationScope { relation: String, scope: String },

    /// A relation query uses a method outside the join whitelist.
    #[error("relation clause `{method}` is not allowed; use where, orWhere, withTrashed, withoutTrashed or onlyTrashed")]
    InvalidRelationClause { method: String },

    /// A path segment names a relation the entity does not declare.
    #[error("entity `{entity}` has no relation named `{relation}`")]
    UnknownRelation { entity: String, relation: String },

    /// The dotted path itself is malformed.
    #[error("invalid relation path `{path}`: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A comparison operator string could not be parsed.
    #[error("unknown comparison operator `{0}`")]
    InvalidOperator(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl JoinError {
    /// Build an [`JoinError::UnknownRelation`] for `entity`.
    ///
    /// Intended as the fallthrough arm of [`JoinEntity::relation`].
    pub fn unknown_relation(entity: &dyn JoinEntity, relation: &str) -> Self {
        JoinError::UnknownRelation {
            entity: entity.entity_name().to_owned(),
            relation: relation.to_owned(),
        }
    }

    pub(crate) fn invalid_path(path: &str, reason: impl Into<String>) -> Self {
        JoinError::InvalidPath {
            path: path.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, JoinError>;
