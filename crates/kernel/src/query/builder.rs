//! Search query builder using SeaQuery.
//!
//! Composes optional filter predicates, a whitelisted sort, and page bounds
//! into SELECT and COUNT SQL for PostgreSQL. Predicates are AND-combined,
//! so every filter narrows the result set; absent filters contribute
//! nothing. Each call site names its fields explicitly — there is no
//! reflection-driven mapping from request fields to columns.

use sea_query::extension::postgres::PgExpr;
use sea_query::{
    Alias, Asterisk, Expr, ExprTrait, PostgresQueryBuilder, Query, SelectStatement, SimpleExpr,
    Value,
};

use super::page::Page;
use super::sort::SortSpec;

/// A LEFT JOIN to a related table, aliased for select labels.
struct Join {
    table: String,
    alias: String,
    local_column: String,
    foreign_column: String,
}

/// Builder for one entity search: filters + sort + page window.
pub struct SearchQuery {
    table: String,
    selects: Vec<(SimpleExpr, Option<String>)>,
    joins: Vec<Join>,
    conditions: Vec<SimpleExpr>,
    sort: Option<SortSpec>,
}

impl SearchQuery {
    /// Create a builder over a base table.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            selects: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            sort: None,
        }
    }

    /// Select a column from the base table.
    pub fn column(mut self, column: &str) -> Self {
        self.selects.push((
            Expr::col((Alias::new(&self.table), Alias::new(column))).into(),
            None,
        ));
        self
    }

    /// Select a column from the base table under a label.
    pub fn column_as(mut self, column: &str, label: &str) -> Self {
        self.selects.push((
            Expr::col((Alias::new(&self.table), Alias::new(column))).into(),
            Some(label.to_string()),
        ));
        self
    }

    /// Select a column from a joined table under a label.
    pub fn join_column(mut self, join_alias: &str, column: &str, label: &str) -> Self {
        self.selects.push((
            Expr::col((Alias::new(join_alias), Alias::new(column))).into(),
            Some(label.to_string()),
        ));
        self
    }

    /// LEFT JOIN `table` as `alias` on base.`local_column` = alias.`foreign_column`.
    pub fn left_join(
        mut self,
        table: &str,
        alias: &str,
        local_column: &str,
        foreign_column: &str,
    ) -> Self {
        self.joins.push(Join {
            table: table.to_string(),
            alias: alias.to_string(),
            local_column: local_column.to_string(),
            foreign_column: foreign_column.to_string(),
        });
        self
    }

    /// Exact-match predicate, skipped when the value is absent.
    pub fn filter_eq<V>(mut self, column: &str, value: Option<V>) -> Self
    where
        V: Into<Value>,
    {
        if let Some(v) = value {
            self.conditions.push(self.column_expr(column).eq(v.into()));
        }
        self
    }

    /// Case-insensitive substring predicate (`ILIKE '%value%'`), skipped
    /// when absent. LIKE wildcards in the value are escaped.
    pub fn filter_contains(mut self, column: &str, value: Option<&str>) -> Self {
        if let Some(v) = value {
            let pattern = format!("%{}%", escape_like_wildcards(v));
            self.conditions.push(self.column_expr(column).ilike(pattern));
        }
        self
    }

    /// Lower-bound predicate (`>=`), skipped when absent.
    pub fn filter_gte<V>(mut self, column: &str, value: Option<V>) -> Self
    where
        V: Into<Value>,
    {
        if let Some(v) = value {
            self.conditions.push(self.column_expr(column).gte(v.into()));
        }
        self
    }

    /// Upper-bound predicate (`<=`), skipped when absent.
    pub fn filter_lte<V>(mut self, column: &str, value: Option<V>) -> Self
    where
        V: Into<Value>,
    {
        if let Some(v) = value {
            self.conditions.push(self.column_expr(column).lte(v.into()));
        }
        self
    }

    /// Apply a resolved sort specification.
    pub fn sort(mut self, spec: SortSpec) -> Self {
        self.sort = Some(spec);
        self
    }

    /// Number of predicates composed so far. AND-combined predicates can
    /// only narrow the result set, so this count is the narrowing measure
    /// the tests assert on.
    pub fn predicate_count(&self) -> usize {
        self.conditions.len()
    }

    /// Render the bounded SELECT query.
    ///
    /// Offset/limit are only applied for positive page values; a zero page
    /// configuration degrades to an unbounded fetch rather than rendering
    /// a negative offset. Callers validate page bounds before getting here.
    pub fn build(&self, page: Page) -> String {
        let mut query = self.base_select();

        if self.selects.is_empty() {
            query.column((Alias::new(&self.table), Asterisk));
        } else {
            for (expr, label) in &self.selects {
                match label {
                    Some(l) => {
                        query.expr_as(expr.clone(), Alias::new(l));
                    }
                    None => {
                        query.expr(expr.clone());
                    }
                }
            }
        }

        if let Some(ref sort) = self.sort {
            query.order_by(
                (Alias::new(&self.table), Alias::new(&sort.field)),
                sort.direction.as_order(),
            );
        }

        if page.page > 0 && page.size > 0 {
            query.limit(u64::from(page.size));
            query.offset(page.offset());
        }

        query.to_string(PostgresQueryBuilder)
    }

    /// Render the COUNT query over the same filtered predicate set, with
    /// no ordering or bounds.
    pub fn build_count(&self) -> String {
        let mut query = self.base_select();
        query.expr(Expr::col(Asterisk).count());
        query.to_string(PostgresQueryBuilder)
    }

    /// FROM + JOINs + WHERE shared by the fetch and count queries.
    fn base_select(&self) -> SelectStatement {
        let mut query = Query::select();
        query.from(Alias::new(&self.table));

        for join in &self.joins {
            query.join_as(
                sea_query::JoinType::LeftJoin,
                Alias::new(&join.table),
                Alias::new(&join.alias),
                Expr::col((Alias::new(&self.table), Alias::new(&join.local_column)))
                    .equals((Alias::new(&join.alias), Alias::new(&join.foreign_column))),
            );
        }

        for condition in &self.conditions {
            query.and_where(condition.clone());
        }

        query
    }

    fn column_expr(&self, column: &str) -> SimpleExpr {
        Expr::col((Alias::new(&self.table), Alias::new(column))).into()
    }
}

/// Escape SQL LIKE wildcard characters (`%`, `_`, `\`) in a value.
fn escape_like_wildcards(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
