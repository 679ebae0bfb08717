//! Postgres query binding for storage-side predicates.
//!
//! [`QueryPredicate::to_sql`] renders the `WHERE` clause with `$n`
//! placeholders; this module wraps it in a `SELECT` and binds the parameters
//! in placeholder order.

use catalog_core::{DomainResult, FieldValue, QueryPredicate, sql_identifier};
use sqlx::Postgres;
use sqlx::postgres::PgArguments;
use sqlx::query::Query;

/// A rendered `SELECT * FROM <table> WHERE …` with its bind values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlSelect {
    sql: String,
    params: Vec<FieldValue>,
}

impl SqlSelect {
    /// Render `predicate` against `table`. Constants are folded first, so a
    /// predicate that simplifies to `TRUE` binds nothing.
    pub fn new(table: &str, predicate: &QueryPredicate) -> DomainResult<Self> {
        let table = sql_identifier(table)?;
        let filter = predicate.clone().simplify().to_sql()?;
        Ok(Self {
            sql: format!("SELECT * FROM {table} WHERE {}", filter.clause),
            params: filter.params,
        })
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[FieldValue] {
        &self.params
    }

    /// Build an executable query with every parameter bound.
    pub fn query(&self) -> Query<'_, Postgres, PgArguments> {
        self.params
            .iter()
            .fold(sqlx::query(&self.sql), |query, param| match param {
                // `to_sql` renders NULL comparisons as FALSE, so a NULL is never bound.
                FieldValue::Null => query,
                FieldValue::Bool(value) => query.bind(*value),
                FieldValue::Integer(value) => query.bind(*value),
                FieldValue::Decimal(value) => query.bind(*value),
                FieldValue::Text(value) => query.bind(value.as_str()),
            })
    }
}
