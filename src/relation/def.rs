//! Relationship descriptors for join compilation
//!
//! A `JoinRelation` is what an entity hands back when asked for one of its
//! relations by name. It carries the relation kind, the related entity, the
//! foreign key and the relation's own query definition (scopes and clauses).
//! Descriptors are cheap values: they are rebuilt on every lookup and never
//! cached by the query session.

use crate::relation::clause::RelationQuery;
use crate::relation::traits::JoinEntity;
use std::fmt;

/// Type of relationship between entities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationType {
    /// One-to-one relationship, foreign key on the related entity
    HasOne,
    /// One-to-many relationship, foreign key on the related entity
    HasMany,
    /// Many-to-one relationship, foreign key on the current entity
    BelongsTo,
}

impl RelationType {
    /// Whether a relation of this kind can be compiled into a single `LEFT JOIN`.
    ///
    /// `HasMany` is rejected: joining it would multiply base rows and the
    /// predicate would match any one of the related rows.
    pub fn is_joinable(self) -> bool {
        matches!(self, RelationType::BelongsTo | RelationType::HasOne)
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelationType::HasOne => "has_one",
            RelationType::HasMany => "has_many",
            RelationType::BelongsTo => "belongs_to",
        };
        f.write_str(name)
    }
}

/// Defines one relation of an entity, as seen by the join compiler.
///
/// The meaning of `foreign_key` depends on `rel_type`:
/// - `BelongsTo`: column on the *current* entity referencing the related primary key
/// - `HasOne` / `HasMany`: column on the *related* entity referencing the current primary key
///
/// # Example
///
/// ```
/// use lifeguard_join::{JoinEntity, JoinRelation, RelationQuery, RelationType, Result, JoinError};
///
/// struct Customer;
///
/// impl JoinEntity for Customer {
///     fn entity_name(&self) -> &'static str { "Customer" }
///     fn table_name(&self) -> &'static str { "customers" }
///     fn relation(&self, name: &str) -> Result<JoinRelation> {
///         Err(JoinError::unknown_relation(self, name))
///     }
/// }
///
/// let rel = JoinRelation::belongs_to(&Customer, "customer_id")
///     .with_query(RelationQuery::new().filter_eq("status", "active"));
///
/// assert_eq!(rel.rel_type, RelationType::BelongsTo);
/// assert_eq!(rel.related_table(), "customers");
/// assert_eq!(rel.related_primary_key(), "id");
/// ```
#[derive(Clone)]
pub struct JoinRelation {
    /// Type of relationship
    pub rel_type: RelationType,
    /// Entity reached by following the relation
    pub related: &'static dyn JoinEntity,
    /// Foreign key column, see the type-level docs for which side owns it
    pub foreign_key: &'static str,
    /// Scopes and clauses declared on the relation's query
    pub query: RelationQuery,
}

impl fmt::Debug for JoinRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JoinRelation")
            .field("rel_type", &self.rel_type)
            .field("related", &self.related.entity_name())
            .field("foreign_key", &self.foreign_key)
            .field("query", &self.query)
            .finish()
    }
}

impl JoinRelation {
    fn new(rel_type: RelationType, related: &'static dyn JoinEntity, foreign_key: &'static str) -> Self {
        Self {
            rel_type,
            related,
            foreign_key,
            query: RelationQuery::default(),
        }
    }

    /// The current entity holds `foreign_key`, referencing the related primary key.
    pub fn belongs_to(related: &'static dyn JoinEntity, foreign_key: &'static str) -> Self {
        Self::new(RelationType::BelongsTo, related, foreign_key)
    }

    /// The related entity holds `foreign_key`, referencing the current primary key.
    pub fn has_one(related: &'static dyn JoinEntity, foreign_key: &'static str) -> Self {
        Self::new(RelationType::HasOne, related, foreign_key)
    }

    /// Declared for completeness; resolving a path through it fails with
    /// [`JoinError::UnsupportedRelationKind`](crate::JoinError::UnsupportedRelationKind).
    pub fn has_many(related: &'static dyn JoinEntity, foreign_key: &'static str) -> Self {
        Self::new(RelationType::HasMany, related, foreign_key)
    }

    /// Attach the relation's query definition (scopes and clauses).
    pub fn with_query(mut self, query: RelationQuery) -> Self {
        self.query = query;
        self
    }

    pub fn related_table(&self) -> &'static str {
        self.related.table_name()
    }

    pub fn related_primary_key(&self) -> &'static str {
        self.related.primary_key()
    }
}
