//! The entity trait consumed by the join compiler.

use crate::error::Result;
use crate::relation::def::JoinRelation;

/// An entity whose relations can be followed by a relation path.
///
/// Relations are looked up by name at resolution time, since paths are plain
/// strings supplied by the caller. Implementations are usually unit structs
/// matching on the relation name:
///
/// ```
/// use lifeguard_join::{JoinEntity, JoinError, JoinRelation, RelationQuery, Result};
///
/// struct Order;
/// struct Customer;
///
/// impl JoinEntity for Order {
///     fn entity_name(&self) -> &'static str { "Order" }
///     fn table_name(&self) -> &'static str { "orders" }
///     fn relation(&self, name: &str) -> Result<JoinRelation> {
///         match name {
///             "customer" => Ok(JoinRelation::belongs_to(&Customer, "customer_id")),
///             "active_customer" => Ok(JoinRelation::belongs_to(&Customer, "customer_id")
///                 .with_query(RelationQuery::new().filter_eq("status", "active"))),
///             _ => Err(JoinError::unknown_relation(self, name)),
///         }
///     }
/// }
///
/// impl JoinEntity for Customer {
///     fn entity_name(&self) -> &'static str { "Customer" }
///     fn table_name(&self) -> &'static str { "customers" }
///     fn soft_delete_column(&self) -> Option<&'static str> { Some("archived_at") }
///     fn relation(&self, name: &str) -> Result<JoinRelation> {
///         Err(JoinError::unknown_relation(self, name))
///     }
/// }
/// ```
pub trait JoinEntity: Send + Sync {
    /// Name used in error messages
    fn entity_name(&self) -> &'static str;

    fn table_name(&self) -> &'static str;

    fn primary_key(&self) -> &'static str {
        "id"
    }

    /// Column marking soft-deleted rows, when it differs from the configured default.
    fn soft_delete_column(&self) -> Option<&'static str> {
        None
    }

    /// Resolve a relation declared on this entity.
    ///
    /// Unknown names should return [`JoinError::UnknownRelation`](crate::JoinError::UnknownRelation);
    /// errors from declaring the relation's query (see
    /// [`RelationQuery::method`](crate::RelationQuery::method)) propagate unchanged.
    fn relation(&self, name: &str) -> Result<JoinRelation>;
}
