//! Retargets a relation's declared constraints onto a join alias.
//!
//! The relation's scopes and clauses are written against its own table. Once
//! the related table is joined under an alias, each constraint is rewritten to
//! reference that alias and returned as a chain of `(Boolean, Condition)` for
//! the join's `ON` clause. Nothing is attached here: the caller owns the join.

use crate::error::{JoinError, Result};
use crate::query::column::qualified;
use crate::relation::{Boolean, JoinRelation, Operator, Predicate, RelationClause, RelationScope};
use sea_query::{Condition, DynIden, Expr, ExprTrait, Value};

/// Inputs for translating one relation's constraints.
#[derive(Debug, Clone, Copy)]
pub(crate) struct JoinContext<'a> {
    /// Name of the relation as written in the path segment
    pub relation_name: &'a str,
    pub relation: &'a JoinRelation,
    /// Alias the related table is joined under
    pub alias: &'a str,
    pub soft_delete_column: &'a str,
}

/// Translate scopes, then clauses in declaration order.
pub(crate) fn translate_constraints(ctx: &JoinContext<'_>) -> Result<Vec<(Boolean, Condition)>> {
    let query = &ctx.relation.query;
    let mut chain = Vec::with_capacity(query.scopes().len() + query.clauses().len());

    for scope in query.scopes() {
        match scope {
            RelationScope::SoftDelete => chain.push((Boolean::And, trashed(ctx, false))),
            RelationScope::Custom(name) => {
                return Err(JoinError::InvalidRelationScope {
                    relation: ctx.relation_name.to_owned(),
                    scope: name.clone(),
                })
            }
        }
    }

    for clause in query.clauses() {
        match clause {
            RelationClause::Where {
                predicate: Predicate::Map(pairs),
                ..
            } if pairs.is_empty() => {}
            RelationClause::Where { boolean, predicate } => {
                chain.push((*boolean, predicate_condition(ctx.alias, *boolean, predicate)));
            }
            RelationClause::WithTrashed => {}
            RelationClause::WithoutTrashed => chain.push((Boolean::And, trashed(ctx, false))),
            RelationClause::OnlyTrashed => chain.push((Boolean::And, trashed(ctx, true))),
        }
    }

    Ok(chain)
}

/// `alias.deleted_at IS NULL`, or `IS NOT NULL` for only-trashed.
fn trashed(ctx: &JoinContext<'_>, only_trashed: bool) -> Condition {
    let col = Expr::col(qualified(ctx.alias, ctx.soft_delete_column));
    let expr = if only_trashed { col.is_not_null() } else { col.is_null() };
    Condition::all().add(expr)
}

fn predicate_condition(alias: &str, boolean: Boolean, predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::Compare { column, op, value } => {
            Condition::all().add(compare(qualified(alias, column), *op, value.clone()))
        }
        Predicate::Null { column, negated } => {
            let col = Expr::col(qualified(alias, column));
            Condition::all().add(if *negated { col.is_not_null() } else { col.is_null() })
        }
        Predicate::Map(pairs) => {
            let group = match boolean {
                Boolean::And => Condition::all(),
                Boolean::Or => Condition::any(),
            };
            pairs.iter().fold(group, |group, (column, value)| {
                group.add(compare(qualified(alias, column), Operator::Eq, value.clone()))
            })
        }
    }
}

/// `column <op> value`, with a NULL value under `=` or `<>` rendered as
/// `IS NULL` or `IS NOT NULL`.
pub(crate) fn compare(column: (DynIden, DynIden), op: Operator, value: Value) -> Expr {
    let null = value == value.as_null();
    let col = Expr::col(column);
    match op {
        Operator::Eq if null => col.is_null(),
        Operator::Ne if null => col.is_not_null(),
        _ => col.binary(op.bin_oper(), value),
    }
}

/// Fold a flat AND/OR chain into one condition with SQL precedence.
///
/// Every `Or` opens a new AND-group and the groups are OR-ed, so
/// `a AND b OR c AND d` becomes `(a AND b) OR (c AND d)`. A leading `Or`
/// is treated as `And`.
pub(crate) fn combine<I>(chain: I) -> Condition
where
    I: IntoIterator<Item = (Boolean, Condition)>,
{
    let mut groups = Vec::new();
    let mut current: Option<Condition> = None;

    for (boolean, condition) in chain {
        current = Some(match (current.take(), boolean) {
            (Some(group), Boolean::And) => group.add(condition),
            (Some(group), Boolean::Or) => {
                groups.push(group);
                Condition::all().add(condition)
            }
            (None, _) => Condition::all().add(condition),
        });
    }
    groups.extend(current);

    match groups.len() {
        0 => Condition::all(),
        1 => groups.remove(0),
        _ => groups
            .into_iter()
            .fold(Condition::any(), |any, group| any.add(group)),
    }
}
