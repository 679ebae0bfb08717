//! Storage-side representation of a specification.
//!
//! A [`QueryPredicate`] is a plain data tree a query layer can inspect,
//! serialize, render to SQL ([`QueryPredicate::to_sql`]) or interpret directly
//! against a row ([`QueryPredicate::evaluate`]).
//!
//! Evaluation uses two-valued logic: any comparison involving `Null` is false,
//! and `IsNull` is the only way to match a missing value.

use core::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A scalar column value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(Decimal),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    fn partial_cmp_value(&self, other: &FieldValue) -> Option<Ordering> {
        use FieldValue::*;
        match (self, other) {
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Integer(a), Integer(b)) => Some(a.cmp(b)),
            (Decimal(a), Decimal(b)) => Some(a.cmp(b)),
            (Integer(a), Decimal(b)) => Some(rust_decimal::Decimal::from(*a).cmp(b)),
            (Decimal(a), Integer(b)) => Some(a.cmp(&rust_decimal::Decimal::from(*b))),
            (Text(a), Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Decimal> for FieldValue {
    fn from(value: Decimal) -> Self {
        FieldValue::Decimal(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl<V: Into<FieldValue>> From<Option<V>> for FieldValue {
    fn from(value: Option<V>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    /// Text equality ignoring case.
    EqIgnoreCase,
}

impl CompareOp {
    fn holds(self, left: &FieldValue, right: &FieldValue) -> bool {
        if left.is_null() || right.is_null() {
            return false;
        }

        if self == CompareOp::EqIgnoreCase {
            return match (left, right) {
                (FieldValue::Text(a), FieldValue::Text(b)) => a.to_uppercase() == b.to_uppercase(),
                _ => false,
            };
        }

        let Some(ordering) = left.partial_cmp_value(right) else {
            return false;
        };

        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::EqIgnoreCase => false,
        }
    }

    fn sql_operator(self) -> &'static str {
        match self {
            CompareOp::Eq | CompareOp::EqIgnoreCase => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

/// Row view of an entity, as a storage engine would see it.
pub trait Record {
    /// Value of the named column; unknown columns read as [`FieldValue::Null`].
    fn field(&self, name: &str) -> FieldValue;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryPredicate {
    Const {
        value: bool,
    },
    Compare {
        field: String,
        op: CompareOp,
        value: FieldValue,
    },
    IsNull {
        field: String,
    },
    And {
        left: Box<QueryPredicate>,
        right: Box<QueryPredicate>,
    },
    Or {
        left: Box<QueryPredicate>,
        right: Box<QueryPredicate>,
    },
    Not {
        inner: Box<QueryPredicate>,
    },
}

/// A rendered `WHERE` clause with positional (`$n`) parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlFilter {
    pub clause: String,
    pub params: Vec<FieldValue>,
}

impl QueryPredicate {
    pub fn constant(value: bool) -> Self {
        QueryPredicate::Const { value }
    }

    pub fn compare(field: impl Into<String>, op: CompareOp, value: impl Into<FieldValue>) -> Self {
        QueryPredicate::Compare {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, CompareOp::Eq, value)
    }

    pub fn ne(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, CompareOp::Ne, value)
    }

    pub fn lt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, CompareOp::Lt, value)
    }

    pub fn le(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, CompareOp::Le, value)
    }

    pub fn gt(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, CompareOp::Gt, value)
    }

    pub fn ge(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::compare(field, CompareOp::Ge, value)
    }

    pub fn eq_ignore_case(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::compare(field, CompareOp::EqIgnoreCase, FieldValue::Text(value.into()))
    }

    pub fn is_null(field: impl Into<String>) -> Self {
        QueryPredicate::IsNull {
            field: field.into(),
        }
    }

    pub fn and(self, other: QueryPredicate) -> Self {
        QueryPredicate::And {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn or(self, other: QueryPredicate) -> Self {
        QueryPredicate::Or {
            left: Box::new(self),
            right: Box::new(other),
        }
    }

    pub fn negate(self) -> Self {
        QueryPredicate::Not {
            inner: Box::new(self),
        }
    }

    /// Interpret the predicate against one row.
    pub fn evaluate<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            QueryPredicate::Const { value } => *value,
            QueryPredicate::Compare { field, op, value } => op.holds(&record.field(field), value),
            QueryPredicate::IsNull { field } => record.field(field).is_null(),
            QueryPredicate::And { left, right } => left.evaluate(record) && right.evaluate(record),
            QueryPredicate::Or { left, right } => left.evaluate(record) || right.evaluate(record),
            QueryPredicate::Not { inner } => !inner.evaluate(record),
        }
    }

    /// Fold constants and collapse double negation.
    pub fn simplify(self) -> QueryPredicate {
        match self {
            QueryPredicate::And { left, right } => {
                match (left.simplify(), right.simplify()) {
                    (QueryPredicate::Const { value: false }, _)
                    | (_, QueryPredicate::Const { value: false }) => Self::constant(false),
                    (QueryPredicate::Const { value: true }, other)
                    | (other, QueryPredicate::Const { value: true }) => other,
                    (l, r) => l.and(r),
                }
            }
            QueryPredicate::Or { left, right } => match (left.simplify(), right.simplify()) {
                (QueryPredicate::Const { value: true }, _)
                | (_, QueryPredicate::Const { value: true }) => Self::constant(true),
                (QueryPredicate::Const { value: false }, other)
                | (other, QueryPredicate::Const { value: false }) => other,
                (l, r) => l.or(r),
            },
            QueryPredicate::Not { inner } => match inner.simplify() {
                QueryPredicate::Const { value } => Self::constant(!value),
                QueryPredicate::Not { inner } => *inner,
                other => other.negate(),
            },
            leaf => leaf,
        }
    }

    /// Render a parameterised SQL `WHERE` clause.
    ///
    /// Field names are emitted verbatim and must be plain identifiers
    /// (optionally dotted); anything else is rejected. Comparisons are
    /// wrapped in `COALESCE(.., FALSE)` and a comparison against `Null`
    /// renders as `FALSE`, so the clause keeps the two-valued semantics of
    /// [`evaluate`](Self::evaluate) and `params` never holds a `Null`.
    pub fn to_sql(&self) -> DomainResult<SqlFilter> {
        let mut params = Vec::new();
        let clause = self.render_sql(&mut params)?;
        Ok(SqlFilter { clause, params })
    }

    fn render_sql(&self, params: &mut Vec<FieldValue>) -> DomainResult<String> {
        Ok(match self {
            QueryPredicate::Const { value: true } => "TRUE".to_string(),
            QueryPredicate::Const { value: false } => "FALSE".to_string(),
            QueryPredicate::Compare { field, op, value } => {
                let field = sql_identifier(field)?;
                if value.is_null() {
                    return Ok("FALSE".to_string());
                }
                params.push(value.clone());
                let placeholder = format!("${}", params.len());
                let comparison = match op {
                    CompareOp::EqIgnoreCase => format!("UPPER({field}) = UPPER({placeholder})"),
                    other => format!("{field} {} {placeholder}", other.sql_operator()),
                };
                // A NULL column reads as false, never unknown, so NOT agrees with `evaluate`.
                format!("COALESCE({comparison}, FALSE)")
            }
            QueryPredicate::IsNull { field } => format!("{} IS NULL", sql_identifier(field)?),
            QueryPredicate::And { left, right } => format!(
                "({} AND {})",
                left.render_sql(params)?,
                right.render_sql(params)?
            ),
            QueryPredicate::Or { left, right } => format!(
                "({} OR {})",
                left.render_sql(params)?,
                right.render_sql(params)?
            ),
            QueryPredicate::Not { inner } => format!("NOT ({})", inner.render_sql(params)?),
        })
    }
}

/// Accept `name` if it is a plain SQL identifier, optionally dotted
/// (`table.column`).
pub fn sql_identifier(field: &str) -> DomainResult<&str> {
    let valid = !field.is_empty()
        && field.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        });

    if valid {
        Ok(field)
    } else {
        Err(DomainError::validation(
            "field",
            format!("'{field}' is not a valid column identifier"),
        ))
    }
}
