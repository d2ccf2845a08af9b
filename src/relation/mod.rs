//! Relation declarations for join compilation.
//!
//! - **Traits**: the `JoinEntity` trait entities implement to expose relations by name
//! - **Def**: relation descriptors (`JoinRelation`, `RelationType`)
//! - **Clause**: the relation's own query definition (`RelationQuery`, scopes and clauses)

pub mod traits;
#[doc(inline)]
pub use traits::JoinEntity;

pub mod def;
#[doc(inline)]
pub use def::{JoinRelation, RelationType};

pub mod clause;
#[doc(inline)]
pub use clause::{
    Boolean, ClauseArgs, Operator, Predicate, RelationClause, RelationQuery, RelationScope,
};
