//! Integration tests for relation-path joins through the public API.
//!
//! Test relationships:
//! - Order belongs_to Customer (customer_id)
//! - Order belongs_to User twice, as seller and buyer
//! - Customer has_one Profile (profiles.customer_id)
//! - Customer belongs_to Country (country_id)
//! - Customer has_many Orders (not joinable)

use lifeguard_join::{
    JoinConfig, JoinEntity, JoinError, JoinRelation, JoinSelect, Operator, RelationQuery, Result,
};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use sea_query::{Order as SortOrder, PostgresQueryBuilder};
use std::collections::{BTreeSet, HashMap};

// ============================================================================
// Test Entities
// ============================================================================

struct Order;
struct Customer;
struct Profile;
struct Country;
struct User;

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
            "profile" => Ok(JoinRelation::has_one(&Profile, "customer_id")
                .with_query(RelationQuery::new().soft_deletes())),
            "country" => Ok(JoinRelation::belongs_to(&Country, "country_id")
                .with_query(RelationQuery::new().filter_eq("enabled", true))),
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

    fn relation(&self, name: &str) -> Result<JoinRelation> {
        Err(JoinError::unknown_relation(self, name))
    }
}

impl JoinEntity for Country {
    fn entity_name(&self) -> &'static str {
        "Country"
    }

    fn table_name(&self) -> &'static str {
        "countries"
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
        Err(JoinError::unknown_relation(self, name))
    }
}

fn sql(query: &JoinSelect) -> String {
    query.to_string(PostgresQueryBuilder)
}

// ============================================================================
// Tests
// ============================================================================

#[test]
fn test_order_customer_profile_example() {
    let mut query = JoinSelect::new(&Order);
    let column = query.resolve_column("customer.profile.bio").unwrap();
    assert_eq!(column, "profiles.bio");

    let sql = sql(&query);
    assert!(
        sql.contains(r#"LEFT JOIN "customers" ON "customers"."id" = "orders"."customer_id""#),
        "{sql}"
    );
    assert!(
        sql.contains(r#"LEFT JOIN "profiles" ON "profiles"."customer_id" = "customers"."id""#),
        "{sql}"
    );
    assert!(sql.contains(r#""profiles"."deleted_at" IS NULL"#), "{sql}");
    assert!(!sql.contains("WHERE"), "{sql}");
}

#[test]
fn test_filter_and_sort_through_relations() {
    let query = JoinSelect::new(&Order)
        .where_join("customer.country.code", Operator::Eq, "NZ")
        .unwrap()
        .or_where_join("seller.name", Operator::Like, "A%")
        .unwrap()
        .order_by_join("customer.profile.bio", SortOrder::Asc)
        .unwrap();
    let sql = sql(&query);

    assert_eq!(sql.matches("LEFT JOIN").count(), 4, "{sql}");
    assert_eq!(sql.matches(r#"LEFT JOIN "customers""#).count(), 1, "{sql}");
    // relation constraint on the join, caller predicate in WHERE
    assert!(sql.contains(r#""countries"."enabled" = TRUE"#), "{sql}");
    assert!(sql.contains(r#"WHERE "countries"."code" = 'NZ' OR "users"."name" LIKE 'A%'"#), "{sql}");
    assert!(sql.contains(r#"ORDER BY "profiles"."bio" ASC"#), "{sql}");
}

#[test]
fn test_selection_and_grouping_applied_once() {
    let query = JoinSelect::new(&Order)
        .where_join("customer.name", Operator::Eq, "Ada")
        .unwrap()
        .where_join("customer.country.code", Operator::Eq, "NZ")
        .unwrap()
        .order_by_join("buyer.name", SortOrder::Desc)
        .unwrap();
    let sql = sql(&query);

    assert!(sql.starts_with(r#"SELECT "orders".* FROM "orders""#), "{sql}");
    assert_eq!(sql.matches("GROUP BY").count(), 1, "{sql}");
    assert!(sql.contains(r#"GROUP BY "orders"."id""#), "{sql}");
}

#[test]
fn test_failure_leaves_query_unchanged() {
    let mut query = JoinSelect::new(&Order);
    query.resolve_column("customer.name").unwrap();
    let before = sql(&query);

    let err = query.resolve_column("customer.orders.total").unwrap_err();
    assert!(matches!(err, JoinError::UnsupportedRelationKind { .. }));
    let err = query.resolve_column("customer.address.city").unwrap_err();
    assert!(matches!(err, JoinError::UnknownRelation { .. }));

    assert_eq!(sql(&query), before);
    assert_eq!(query.joined_paths().count(), 1);
}

#[test]
fn test_configured_aliasing() {
    let config = JoinConfig::from_toml_str(
        r#"
        [join]
        use_table_alias = true
        alias_prefix = "t"
        "#,
    )
    .unwrap();
    let mut query = JoinSelect::with_config(&Order, &config);
    let seller = query.resolve_column("seller.name").unwrap();
    let buyer = query.resolve_column("buyer.name").unwrap();

    assert!(seller.starts_with("t_"), "{seller}");
    assert!(buyer.starts_with("t_"), "{buyer}");
    assert_ne!(seller, buyer);
    assert!(query.uses_table_alias());
}

#[test]
fn test_shuffled_resolution_is_idempotent() {
    let paths = [
        "customer.name",
        "customer.email",
        "customer.profile.bio",
        "customer.country.code",
        "seller.name",
        "buyer.name",
        "total",
    ];
    // customer, customer.profile, customer.country, seller, buyer
    let expected_joins = 5;

    let mut rng = StdRng::seed_from_u64(7);
    for aliased in [false, true] {
        for _ in 0..8 {
            let mut order = paths.to_vec();
            order.shuffle(&mut rng);

            let mut query = if aliased {
                JoinSelect::aliased(&Order)
            } else {
                JoinSelect::new(&Order)
            };
            let first: HashMap<&str, String> = order
                .iter()
                .map(|path| (*path, query.resolve_column(path).unwrap()))
                .collect();
            assert_eq!(query.joined_paths().count(), expected_joins);

            order.shuffle(&mut rng);
            for path in &order {
                let again = query.resolve_column(path).unwrap();
                assert_eq!(again, first[path], "{path} resolved differently");
            }

            let sql = sql(&query);
            assert_eq!(sql.matches("LEFT JOIN").count(), expected_joins, "{sql}");

            let aliases: BTreeSet<_> = query.joins().map(|j| j.alias.clone()).collect();
            assert_eq!(aliases.len(), expected_joins, "aliases must be distinct");
        }
    }
}

