//! Select query builder with relation-path joins.
//!
//! `JoinSelect` wraps a sea-query `SelectStatement` over one base entity and
//! adds the `*_join` operations: each takes a relation path, makes sure the
//! joins it needs exist, and applies its predicate or ordering to the
//! resolved table-qualified column.

use crate::config::JoinConfig;
use crate::error::Result;
use crate::query::column::{iden, ResolvedColumn};
use crate::query::constraint::{combine, compare};
use crate::query::path::{walk, RelationPath};
use crate::query::registry::{JoinRegistry, JoinedPath};
use crate::relation::{Boolean, JoinEntity, Operator};
use sea_query::{
    Asterisk, Condition, Expr, ExprTrait, IntoColumnRef, IntoCondition, JoinType, Order,
    QueryBuilder, SelectStatement, Value, Values,
};

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Query session that can filter and sort through declared relations.
///
/// The session owns its join registry: a relation path is joined at most once,
/// however many operations reference it. The first operation that goes through
/// a relation also switches the selection to `base.*` grouped by the base
/// primary key, so one-to-many data hiding behind a one-to-one declaration
/// cannot duplicate base rows.
///
/// # Example
///
/// ```
/// use lifeguard_join::{JoinEntity, JoinError, JoinRelation, JoinSelect, Operator, Result};
/// use sea_query::{Order, PostgresQueryBuilder};
///
/// struct Post;
/// struct Author;
///
/// impl JoinEntity for Post {
///     fn entity_name(&self) -> &'static str { "Post" }
///     fn table_name(&self) -> &'static str { "posts" }
///     fn relation(&self, name: &str) -> Result<JoinRelation> {
///         match name {
///             "author" => Ok(JoinRelation::belongs_to(&Author, "author_id")),
///             _ => Err(JoinError::unknown_relation(self, name)),
///         }
///     }
/// }
///
/// impl JoinEntity for Author {
///     fn entity_name(&self) -> &'static str { "Author" }
///     fn table_name(&self) -> &'static str { "authors" }
///     fn relation(&self, name: &str) -> Result<JoinRelation> {
///         Err(JoinError::unknown_relation(self, name))
///     }
/// }
///
/// # fn main() -> Result<()> {
/// let sql = JoinSelect::new(&Post)
///     .where_join("author.name", Operator::Eq, "Ada")?
///     .order_by_join("author.name", Order::Asc)?
///     .to_string(PostgresQueryBuilder);
///
/// assert_eq!(sql.matches("LEFT JOIN").count(), 1);
/// assert!(sql.contains(r#""authors"."name" = 'Ada'"#));
/// # Ok(())
/// # }
/// ```
pub struct JoinSelect {
    pub(crate) query: SelectStatement,
    base: &'static dyn JoinEntity,
    registry: JoinRegistry,
    wheres: Vec<(Boolean, Condition)>,
    selected: bool,
    config: JoinConfig,
}

impl std::fmt::Debug for JoinSelect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JoinSelect")
            .field("base", &self.base.entity_name())
            .field("registry", &self.registry)
            .field("selected", &self.selected)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JoinSelect {
    /// Create a session over `base` with the default configuration.
    pub fn new(base: &'static dyn JoinEntity) -> Self {
        Self::with_config(base, &JoinConfig::default())
    }

    /// Create a session that joins every table under a generated alias.
    pub fn aliased(base: &'static dyn JoinEntity) -> Self {
        Self::with_config(
            base,
            &JoinConfig {
                use_table_alias: true,
                ..JoinConfig::default()
            },
        )
    }

    /// Create a session with the configuration from `config/config.toml` and the environment.
    pub fn configured(base: &'static dyn JoinEntity) -> Result<Self> {
        let config = JoinConfig::load()?;
        Ok(Self::with_config(base, &config))
    }

    pub fn with_config(base: &'static dyn JoinEntity, config: &JoinConfig) -> Self {
        let table = base.table_name();
        let mut query = SelectStatement::default();
        query.column(Asterisk).from(iden(table));
        Self {
            query,
            base,
            registry: JoinRegistry::new(table),
            wheres: Vec::new(),
            selected: false,
            config: config.clone(),
        }
    }

    /// Resolve a relation path to a table-qualified column, joining as needed.
    ///
    /// Returns `alias.column`. On error the session is unchanged: joins for
    /// earlier segments of a failing path are not committed.
    pub fn resolve_column(&mut self, path: &str) -> Result<String> {
        self.resolve(path).map(|column| column.to_string())
    }

    pub(crate) fn resolve(&mut self, path: &str) -> Result<ResolvedColumn> {
        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::resolve_path_span(path).entered();

        let walked = RelationPath::parse(path)
            .and_then(|parsed| walk(self.base, &self.registry, &self.config, &parsed).map(|w| (parsed, w)));
        let (parsed, walked) = match walked {
            Ok(ok) => ok,
            Err(err) => {
                log::debug!("failed to resolve relation path {path}: {err}");
                #[cfg(feature = "metrics")]
                METRICS.record_error();
                return Err(err);
            }
        };

        #[cfg(feature = "metrics")]
        METRICS.record_reused(walked.reused as u64);

        for join in walked.joins {
            log::debug!(
                "LEFT JOIN {} AS {} for relation path {}",
                join.table,
                join.alias,
                join.entry.relation_path
            );
            if join.alias == join.table {
                self.query
                    .join(JoinType::LeftJoin, iden(&join.table), join.on);
            } else {
                self.query
                    .join_as(JoinType::LeftJoin, iden(&join.table), iden(&join.alias), join.on);
            }
            self.registry.insert(join.entry);
            #[cfg(feature = "metrics")]
            METRICS.record_emitted();
        }

        if parsed.is_nested() && !self.selected {
            self.apply_selection();
        }

        Ok(walked.target)
    }

    /// Select `base.*` grouped by the base primary key, once per session.
    fn apply_selection(&mut self) {
        let table = self.base.table_name();
        self.selected = true;
        self.query
            .clear_selects()
            .column((iden(table), Asterisk))
            .group_by_col((iden(table), iden(self.base.primary_key())));
    }

    /// `path <op> value`, chained with AND.
    pub fn where_join<V: Into<Value>>(self, path: &str, op: Operator, value: V) -> Result<Self> {
        self.where_join_boolean(path, op, value, Boolean::And)
    }

    /// `path <op> value`, chained with OR.
    pub fn or_where_join<V: Into<Value>>(self, path: &str, op: Operator, value: V) -> Result<Self> {
        self.where_join_boolean(path, op, value, Boolean::Or)
    }

    pub fn where_join_boolean<V: Into<Value>>(
        mut self,
        path: &str,
        op: Operator,
        value: V,
        boolean: Boolean,
    ) -> Result<Self> {
        let target = self.resolve(path)?;
        let expr = compare(target.column_ref(), op, value.into());
        self.wheres.push((boolean, Condition::all().add(expr)));
        Ok(self)
    }

    pub fn where_null_join(mut self, path: &str) -> Result<Self> {
        let target = self.resolve(path)?;
        self.wheres
            .push((Boolean::And, Condition::all().add(Expr::col(target.column_ref()).is_null())));
        Ok(self)
    }

    pub fn where_not_null_join(mut self, path: &str) -> Result<Self> {
        let target = self.resolve(path)?;
        self.wheres.push((
            Boolean::And,
            Condition::all().add(Expr::col(target.column_ref()).is_not_null()),
        ));
        Ok(self)
    }

    pub fn where_in_join<I, V>(self, path: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_in_join_boolean(path, values, Boolean::And, false)
    }

    pub fn or_where_in_join<I, V>(self, path: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_in_join_boolean(path, values, Boolean::Or, false)
    }

    pub fn where_not_in_join<I, V>(self, path: &str, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.where_in_join_boolean(path, values, Boolean::And, true)
    }

    fn where_in_join_boolean<I, V>(
        mut self,
        path: &str,
        values: I,
        boolean: Boolean,
        negated: bool,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let target = self.resolve(path)?;
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let col = Expr::col(target.column_ref());
        let expr = if negated { col.is_not_in(values) } else { col.is_in(values) };
        self.wheres.push((boolean, Condition::all().add(expr)));
        Ok(self)
    }

    /// Order by a column reached through `path`.
    pub fn order_by_join(mut self, path: &str, order: Order) -> Result<Self> {
        let target = self.resolve(path)?;
        self.query.order_by(target.column_ref(), order);
        Ok(self)
    }

    /// Add a plain filter condition, chained with AND.
    pub fn filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.wheres.push((Boolean::And, condition.into_condition()));
        self
    }

    /// Add a plain filter condition, chained with OR.
    pub fn or_filter<F: IntoCondition>(mut self, condition: F) -> Self {
        self.wheres.push((Boolean::Or, condition.into_condition()));
        self
    }

    pub fn order_by<C: IntoColumnRef>(mut self, column: C, order: Order) -> Self {
        self.query.order_by(column, order);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.query.limit(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.query.offset(offset);
        self
    }

    /// Joined paths as `(alias path, real table path)`, in join order.
    pub fn joined_paths(&self) -> impl Iterator<Item = (&str, &str)> {
        self.registry
            .iter()
            .map(|j| (j.alias_path.as_str(), j.table_path.as_str()))
    }

    pub fn joins(&self) -> impl Iterator<Item = &JoinedPath> {
        self.registry.iter()
    }

    /// Whether the `base.*` selection and grouping has been applied.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    pub fn uses_table_alias(&self) -> bool {
        self.config.use_table_alias
    }

    pub fn base(&self) -> &'static dyn JoinEntity {
        self.base
    }

    /// The statement with the accumulated `WHERE` chain applied.
    pub fn statement(&self) -> SelectStatement {
        let mut query = self.query.clone();
        if !self.wheres.is_empty() {
            query.cond_where(combine(self.wheres.iter().cloned()));
        }
        query
    }

    pub fn build<B: QueryBuilder>(&self, builder: B) -> (String, Values) {
        self.statement().build(builder)
    }

    /// Render the statement with values inlined.
    pub fn to_string<B: QueryBuilder>(&self, builder: B) -> String {
        self.statement().to_string(builder)
    }
}
