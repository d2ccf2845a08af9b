//! Relation query definitions: global scopes and constraint clauses.
//!
//! A relation can narrow its own query when it is declared, e.g. "the
//! customer, but only if active". When the relation is resolved through a join
//! those constraints have to move onto the join's `ON` clause. Only a closed
//! set of operations can be moved safely, so the set is modelled as enums and
//! anything outside it is rejected when the relation is declared.

use crate::error::{JoinError, Result};
use sea_query::{BinOper, Value};
use std::str::FromStr;

/// How a predicate is chained onto the ones before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Boolean {
    #[default]
    And,
    Or,
}

/// Comparison operator for column predicates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Lt,
    Lte,
    Gt,
    Gte,
    Like,
    NotLike,
}

impl Operator {
    pub fn bin_oper(self) -> BinOper {
        match self {
            Operator::Eq => BinOper::Equal,
            Operator::Ne => BinOper::NotEqual,
            Operator::Lt => BinOper::SmallerThan,
            Operator::Lte => BinOper::SmallerThanOrEqual,
            Operator::Gt => BinOper::GreaterThan,
            Operator::Gte => BinOper::GreaterThanOrEqual,
            Operator::Like => BinOper::Like,
            Operator::NotLike => BinOper::NotLike,
        }
    }
}

impl FromStr for Operator {
    type Err = JoinError;

    fn from_str(s: &str) -> Result<Self> {
        let op = match s.trim().to_ascii_lowercase().as_str() {
            "=" | "==" => Operator::Eq,
            "<>" | "!=" => Operator::Ne,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "like" => Operator::Like,
            "not like" => Operator::NotLike,
            _ => return Err(JoinError::InvalidOperator(s.to_owned())),
        };
        Ok(op)
    }
}

/// The predicate carried by a `where`/`orWhere` clause, written against the
/// related table's bare column names.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`
    Compare {
        column: String,
        op: Operator,
        value: Value,
    },
    /// `column IS NULL`, or `IS NOT NULL` when `negated`
    Null { column: String, negated: bool },
    /// `column = value` for every pair, grouped
    Map(Vec<(String, Value)>),
}

/// One constraint captured on a relation's query, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationClause {
    Where { boolean: Boolean, predicate: Predicate },
    WithTrashed,
    WithoutTrashed,
    OnlyTrashed,
}

impl RelationClause {
    /// Name of the declaring method, as accepted by [`RelationQuery::method`].
    pub fn method_name(&self) -> &'static str {
        match self {
            RelationClause::Where { boolean: Boolean::And, .. } => "where",
            RelationClause::Where { boolean: Boolean::Or, .. } => "orWhere",
            RelationClause::WithTrashed => "withTrashed",
            RelationClause::WithoutTrashed => "withoutTrashed",
            RelationClause::OnlyTrashed => "onlyTrashed",
        }
    }
}

/// A global scope attached to a relation's query.
///
/// Custom scopes may be declared (the relation might be used outside of joins)
/// but cannot be reapplied against a join alias.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RelationScope {
    SoftDelete,
    Custom(String),
}

impl RelationScope {
    pub fn from_name(name: &str) -> Self {
        match name {
            "soft_delete" | "soft_deletes" | "SoftDeletingScope" => RelationScope::SoftDelete,
            other => RelationScope::Custom(other.to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            RelationScope::SoftDelete => "soft_delete",
            RelationScope::Custom(name) => name,
        }
    }
}

/// Arguments for [`RelationQuery::method`].
#[derive(Debug, Clone, PartialEq)]
pub enum ClauseArgs {
    None,
    Column {
        column: String,
        op: Operator,
        value: Value,
    },
    Map(Vec<(String, Value)>),
}

/// Scopes and clauses declared on a relation.
///
/// # Example
///
/// ```
/// use lifeguard_join::{ClauseArgs, Operator, RelationQuery};
///
/// let typed = RelationQuery::new()
///     .soft_deletes()
///     .filter("status", Operator::Eq, "active");
///
/// let by_name = RelationQuery::new()
///     .soft_deletes()
///     .method(
///         "where",
///         ClauseArgs::Column { column: "status".into(), op: Operator::Eq, value: "active".into() },
///     )
///     .unwrap();
///
/// assert_eq!(typed, by_name);
/// assert!(RelationQuery::new().method("orderBy", ClauseArgs::None).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationQuery {
    scopes: Vec<RelationScope>,
    clauses: Vec<RelationClause>,
}

impl RelationQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scopes(&self) -> &[RelationScope] {
        &self.scopes
    }

    pub fn clauses(&self) -> &[RelationClause] {
        &self.clauses
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty() && self.clauses.is_empty()
    }

    pub fn scope(mut self, scope: RelationScope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Exclude soft-deleted related rows by default.
    pub fn soft_deletes(self) -> Self {
        self.scope(RelationScope::SoftDelete)
    }

    pub fn clause(mut self, clause: RelationClause) -> Self {
        self.clauses.push(clause);
        self
    }

    fn predicate(self, boolean: Boolean, predicate: Predicate) -> Self {
        self.clause(RelationClause::Where { boolean, predicate })
    }

    pub fn filter<V: Into<Value>>(self, column: &str, op: Operator, value: V) -> Self {
        self.predicate(
            Boolean::And,
            Predicate::Compare {
                column: column.to_owned(),
                op,
                value: value.into(),
            },
        )
    }

    pub fn or_filter<V: Into<Value>>(self, column: &str, op: Operator, value: V) -> Self {
        self.predicate(
            Boolean::Or,
            Predicate::Compare {
                column: column.to_owned(),
                op,
                value: value.into(),
            },
        )
    }

    pub fn filter_eq<V: Into<Value>>(self, column: &str, value: V) -> Self {
        self.filter(column, Operator::Eq, value)
    }

    /// `column = value` for every pair, AND-ed as one group.
    pub fn filter_map<I, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<Value>,
    {
        let pairs = pairs.into_iter().map(|(c, v)| (c.to_owned(), v.into())).collect();
        self.predicate(Boolean::And, Predicate::Map(pairs))
    }

    /// `column = value` for every pair, OR-ed as one group chained with OR.
    pub fn or_filter_map<I, V>(self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, V)>,
        V: Into<Value>,
    {
        let pairs = pairs.into_iter().map(|(c, v)| (c.to_owned(), v.into())).collect();
        self.predicate(Boolean::Or, Predicate::Map(pairs))
    }

    pub fn where_null(self, column: &str) -> Self {
        self.predicate(
            Boolean::And,
            Predicate::Null {
                column: column.to_owned(),
                negated: false,
            },
        )
    }

    pub fn where_not_null(self, column: &str) -> Self {
        self.predicate(
            Boolean::And,
            Predicate::Null {
                column: column.to_owned(),
                negated: true,
            },
        )
    }

    pub fn with_trashed(self) -> Self {
        self.clause(RelationClause::WithTrashed)
    }

    pub fn without_trashed(self) -> Self {
        self.clause(RelationClause::WithoutTrashed)
    }

    pub fn only_trashed(self) -> Self {
        self.clause(RelationClause::OnlyTrashed)
    }

    /// Declare a clause by method name.
    ///
    /// Accepts `where`, `orWhere`, `withTrashed`, `withoutTrashed` and
    /// `onlyTrashed` (snake_case spellings too). Any other method fails with
    /// [`JoinError::InvalidRelationClause`], as does `where`/`orWhere` without
    /// a predicate.
    pub fn method(self, name: &str, args: ClauseArgs) -> Result<Self> {
        let boolean = match name {
            "where" => Boolean::And,
            "orWhere" | "or_where" => Boolean::Or,
            "withTrashed" | "with_trashed" => return Ok(self.with_trashed()),
            "withoutTrashed" | "without_trashed" => return Ok(self.without_trashed()),
            "onlyTrashed" | "only_trashed" => return Ok(self.only_trashed()),
            other => {
                return Err(JoinError::InvalidRelationClause {
                    method: other.to_owned(),
                })
            }
        };

        let predicate = match args {
            ClauseArgs::Column { column, op, value } => Predicate::Compare { column, op, value },
            ClauseArgs::Map(pairs) => Predicate::Map(pairs),
            ClauseArgs::None => {
                return Err(JoinError::InvalidRelationClause {
                    method: format!("{name} without a predicate"),
                })
            }
        };
        Ok(self.predicate(boolean, predicate))
    }
}
