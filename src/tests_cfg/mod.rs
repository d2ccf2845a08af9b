//! Test entities shared by the unit tests.
//!
//! A small shop schema:
//!
//! - `orders` belong to a customer, a seller and a buyer (both `users`) and
//!   have many `order_items`
//! - `customers` belong to a country, have one profile and many orders
//! - `profiles` are keyed by `customer_id`
//! - `countries` mark deleted rows with `removed_at`
//! - `users` belong to a manager, who is another user

use crate::error::{JoinError, Result};
use crate::query::column::iden;
use crate::relation::{ClauseArgs, JoinEntity, JoinRelation, RelationQuery, RelationScope};
use sea_query::{Asterisk, Condition, PostgresQueryBuilder, Query};

pub struct Order;
pub struct OrderItem;
pub struct Customer;
pub struct Profile;
pub struct Country;
pub struct User;

impl JoinEntity for Order {
    fn entity_name(&self) -> &'static str {
        "Order"
    }

    fn table_name(&self) -> &'static str {
        "orders"
    }

    fn relation(&self, name: &str) -> Result<JoinRelation> {
        match name {
            "customer" => Ok(JoinRelation::belongs_to(&Customer, "customer_id")),
            "seller" => Ok(JoinRelation::belongs_to(&User, "seller_id")),
            "buyer" => Ok(JoinRelation::belongs_to(&User, "buyer_id")),
            "active_customer" => Ok(JoinRelation::belongs_to(&Customer, "customer_id")
                .with_query(RelationQuery::new().filter_eq("status", "active"))),
            "ranked_customer" => Ok(JoinRelation::belongs_to(&Customer, "customer_id")
                .with_query(RelationQuery::new().method("orderBy", ClauseArgs::None)?)),
            "items" => Ok(JoinRelation::has_many(&OrderItem, "order_id")),
            _ => Err(JoinError::unknown_relation(self, name)),
        }
    }
}

impl JoinEntity for OrderItem {
    fn entity_name(&self) -> &'static str {
        "OrderItem"
    }

    fn table_name(&self) -> &'static str {
        "order_items"
    }

    fn relation(&self, name: &str) -> Result<JoinRelation> {
        match name {
            "order" => Ok(JoinRelation::belongs_to(&Order, "order_id")),
            _ => Err(JoinError::unknown_relation(self, name)),
        }
    }
}

impl JoinEntity for Customer {
    fn entity_name(&self) -> &'static str {
        "Customer"
    }

    fn table_name(&self) -> &'static str {
        "customers"
    }

    fn relation(&self, name: &str) -> Result<JoinRelation> {
        match name {
            "profile" => Ok(JoinRelation::has_one(&Profile, "customer_id")),
            "live_profile" => Ok(JoinRelation::has_one(&Profile, "customer_id")
                .with_query(RelationQuery::new().soft_deletes())),
            "tenant_profile" => Ok(JoinRelation::has_one(&Profile, "customer_id")
                .with_query(RelationQuery::new().scope(RelationScope::Custom("tenant".into())))),
            "country" => Ok(JoinRelation::belongs_to(&Country, "country_id")),
            "current_country" => Ok(JoinRelation::belongs_to(&Country, "country_id")
                .with_query(RelationQuery::new().soft_deletes())),
            "orders" => Ok(JoinRelation::has_many(&Order, "customer_id")),
            _ => Err(JoinError::unknown_relation(self, name)),
        }
    }
}

impl JoinEntity for Profile {
    fn entity_name(&self) -> &'static str {
        "Profile"
    }

    fn table_name(&self) -> &'static str {
        "profiles"
    }

    fn primary_key(&self) -> &'static str {
        "customer_id"
    }

    fn relation(&self, name: &str) -> Result<JoinRelation> {
        match name {
            "customer" => Ok(JoinRelation::belongs_to(&Customer, "customer_id")),
            _ => Err(JoinError::unknown_relation(self, name)),
        }
    }
}

impl JoinEntity for Country {
    fn entity_name(&self) -> &'static str {
        "Country"
    }

    fn table_name(&self) -> &'static str {
        "countries"
    }

    fn soft_delete_column(&self) -> Option<&'static str> {
        Some("removed_at")
    }

    fn relation(&self, name: &str) -> Result<JoinRelation> {
        Err(JoinError::unknown_relation(self, name))
    }
}

impl JoinEntity for User {
    fn entity_name(&self) -> &'static str {
        "User"
    }

    fn table_name(&self) -> &'static str {
        "users"
    }

    fn relation(&self, name: &str) -> Result<JoinRelation> {
        match name {
            "manager" => Ok(JoinRelation::belongs_to(&User, "manager_id")),
            _ => Err(JoinError::unknown_relation(self, name)),
        }
    }
}

/// Render a condition as the `WHERE` clause of a throwaway select.
pub fn render_condition(condition: Condition) -> String {
    Query::select()
        .column(Asterisk)
        .from(iden("t"))
        .cond_where(condition)
        .to_string(PostgresQueryBuilder)
}
