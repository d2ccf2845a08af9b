//! Relation path parsing and walking.
//!
//! A relation path is `relation.relation.column`: every segment but the last
//! names a relation on the entity reached so far, the last names a column.
//! Walking a path plans one join per relation segment against a scratch copy
//! of the session registry; nothing is committed here.

use crate::config::JoinConfig;
use crate::error::{JoinError, Result};
use crate::query::column::ResolvedColumn;
use crate::query::join::{extend_path, plan_join, JoinPlan, JoinStep, PlannedJoin};
use crate::query::registry::JoinRegistry;
use crate::relation::JoinEntity;
use once_cell::sync::Lazy;
use regex::Regex;

static SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("segment pattern is valid"));

/// A parsed, validated relation path.
///
/// # Example
///
/// ```
/// use lifeguard_join::RelationPath;
///
/// let path = RelationPath::parse("customer.profile.bio").unwrap();
/// assert_eq!(path.relations(), &["customer", "profile"]);
/// assert_eq!(path.column(), "bio");
/// assert!(path.is_nested());
///
/// assert!(RelationPath::parse("customer..bio").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationPath<'a> {
    raw: &'a str,
    relations: Vec<&'a str>,
    column: &'a str,
}

impl<'a> RelationPath<'a> {
    pub fn parse(raw: &'a str) -> Result<Self> {
        if raw.is_empty() {
            return Err(JoinError::invalid_path(raw, "path is empty"));
        }

        let mut segments: Vec<&'a str> = raw.split('.').collect();
        for (idx, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(JoinError::invalid_path(raw, format!("segment {} is empty", idx + 1)));
            }
            if !SEGMENT.is_match(segment) {
                return Err(JoinError::invalid_path(
                    raw,
                    format!("`{segment}` is not a valid identifier"),
                ));
            }
        }

        // split always yields at least one segment
        let column = segments.pop().unwrap_or_default();
        Ok(Self {
            raw,
            relations: segments,
            column,
        })
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Relation segments, in walk order
    pub fn relations(&self) -> &[&'a str] {
        &self.relations
    }

    pub fn column(&self) -> &'a str {
        self.column
    }

    /// Whether the path goes through at least one relation.
    pub fn is_nested(&self) -> bool {
        !self.relations.is_empty()
    }
}

/// Result of walking a path: the target column and the joins still to commit.
#[derive(Debug)]
pub(crate) struct Walk {
    pub target: ResolvedColumn,
    pub joins: Vec<PlannedJoin>,
    pub reused: usize,
}

pub(crate) fn walk(
    base: &'static dyn JoinEntity,
    registry: &JoinRegistry,
    config: &JoinConfig,
    path: &RelationPath<'_>,
) -> Result<Walk> {
    let mut scratch = registry.clone();
    let mut joins = Vec::new();
    let mut reused = 0;

    let mut current = base;
    let mut current_table = base.table_name().to_owned();
    let mut relation_path = String::new();
    let mut alias_path = String::new();
    let mut table_path = String::new();

    for &name in path.relations() {
        let relation = current.relation(name)?;
        relation_path = extend_path(&relation_path, name);

        let plan = plan_join(
            &scratch,
            config,
            &JoinStep {
                relation_name: name,
                relation: &relation,
                relation_path: &relation_path,
                alias_prefix: &alias_path,
                table_prefix: &table_path,
                current_table: &current_table,
                current_primary_key: current.primary_key(),
            },
        )?;

        let alias = match plan {
            JoinPlan::Reuse(alias) => {
                log::trace!("reusing join {alias} for relation path {relation_path}");
                reused += 1;
                alias
            }
            JoinPlan::Emit(join) => {
                let alias = join.alias.clone();
                scratch.insert(join.entry.clone());
                joins.push(join);
                alias
            }
        };

        alias_path = extend_path(&alias_path, &alias);
        table_path = extend_path(&table_path, relation.related_table());
        current = relation.related;
        current_table = alias;
    }

    Ok(Walk {
        target: ResolvedColumn::new(current_table, path.column()),
        joins,
        reused,
    })
}
