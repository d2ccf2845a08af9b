//! Plans the `LEFT JOIN` for one relation segment.
//!
//! Planning is side-effect free: it reads the registry, picks an alias, builds
//! the key predicate for the relation kind, folds in the relation's translated
//! constraints and hands back a [`PlannedJoin`]. The session commits planned
//! joins only after the whole path has been planned.

use crate::config::JoinConfig;
use crate::error::{JoinError, Result};
use crate::query::column::qualified;
use crate::query::constraint::{combine, translate_constraints, JoinContext};
use crate::query::registry::{JoinRegistry, JoinedPath};
use crate::relation::{Boolean, JoinRelation, RelationType};
use sea_query::{Condition, Expr, ExprTrait};
use uuid::Uuid;

/// One relation segment of a path being walked.
#[derive(Debug)]
pub(crate) struct JoinStep<'a> {
    pub relation_name: &'a str,
    pub relation: &'a JoinRelation,
    /// Relation names up to and including this segment
    pub relation_path: &'a str,
    /// Alias path of the segments before this one, empty at the base
    pub alias_prefix: &'a str,
    /// Table path of the segments before this one, empty at the base
    pub table_prefix: &'a str,
    /// Table or alias of the entity the relation is declared on
    pub current_table: &'a str,
    pub current_primary_key: &'a str,
}

#[derive(Debug, Clone)]
pub(crate) struct PlannedJoin {
    pub table: String,
    pub alias: String,
    pub on: Condition,
    pub entry: JoinedPath,
}

#[derive(Debug, Clone)]
pub(crate) enum JoinPlan {
    /// The path was joined earlier; carries its alias.
    Reuse(String),
    Emit(PlannedJoin),
}

pub(crate) fn plan_join(
    registry: &JoinRegistry,
    config: &JoinConfig,
    step: &JoinStep<'_>,
) -> Result<JoinPlan> {
    let relation = step.relation;
    if let Some(existing) = registry.lookup(step.relation_path) {
        return Ok(JoinPlan::Reuse(existing.alias.clone()));
    }

    if !relation.rel_type.is_joinable() {
        return Err(JoinError::UnsupportedRelationKind {
            relation: step.relation_name.to_owned(),
            kind: relation.rel_type,
        });
    }

    let table = relation.related_table();
    let alias = choose_alias(registry, config, step.relation_name, table);

    let key = if relation.rel_type == RelationType::BelongsTo {
        Expr::col(qualified(&alias, relation.related_primary_key()))
            .equals(qualified(step.current_table, relation.foreign_key))
    } else {
        Expr::col(qualified(&alias, relation.foreign_key))
            .equals(qualified(step.current_table, step.current_primary_key))
    };

    let soft_delete_column = relation
        .related
        .soft_delete_column()
        .unwrap_or(config.soft_delete_column.as_str());
    let constraints = translate_constraints(&JoinContext {
        relation_name: step.relation_name,
        relation,
        alias: &alias,
        soft_delete_column,
    })?;

    let on = combine(std::iter::once((Boolean::And, Condition::all().add(key))).chain(constraints));

    let entry = JoinedPath {
        relation_path: step.relation_path.to_owned(),
        alias_path: extend_path(step.alias_prefix, &alias),
        table_path: extend_path(step.table_prefix, table),
        alias: alias.clone(),
        table: table.to_owned(),
    };

    Ok(JoinPlan::Emit(PlannedJoin {
        table: table.to_owned(),
        alias,
        on,
        entry,
    }))
}

/// Pick the alias for a newly joined table.
///
/// With table aliasing on, always a fresh token. Otherwise the table name,
/// falling back to the relation name when the table name is already in use
/// (a second path to the same table, or a self-reference to the base table),
/// then to the relation name with a numeric suffix.
pub(crate) fn choose_alias(
    registry: &JoinRegistry,
    config: &JoinConfig,
    relation_name: &str,
    table: &str,
) -> String {
    if config.use_table_alias {
        return unique_alias(registry, &config.alias_prefix);
    }
    if !registry.is_alias_taken(table) {
        return table.to_owned();
    }
    if !registry.is_alias_taken(relation_name) {
        return relation_name.to_owned();
    }
    (2..)
        .map(|n| format!("{relation_name}_{n}"))
        .find(|alias| !registry.is_alias_taken(alias))
        .unwrap_or_else(|| unique_alias(registry, &config.alias_prefix))
}

fn unique_alias(registry: &JoinRegistry, prefix: &str) -> String {
    loop {
        let token = Uuid::new_v4().simple().to_string();
        let alias = format!("{prefix}_{}", &token[..12]);
        if !registry.is_alias_taken(&alias) {
            return alias;
        }
    }
}

pub(crate) fn extend_path(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}.{segment}")
    }
}
