// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Query descriptors and results shared by every backend.
//!
//! Both access paths receive the same [`Query`]: SQL text with positional
//! `$n` placeholders plus a list of parameter [`Value`]s. Parameter values are
//! never spliced into the SQL text.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// A scalar value used both as a query parameter and as a result cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Boolean
    Bool(bool),
    /// 64-bit integer
    Int(i64),
    /// Double precision float
    Float(f64),
    /// Text
    Text(String),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A single result row, cells in column order.
pub type Row = Vec<Value>;

/// Whether a query yields rows or an affected-row count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Returns a row set
    Read,
    /// Returns an affected-row count (DML and DDL)
    Write,
}

/// Backend-agnostic query descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// SQL text with `$1..$n` placeholders
    pub sql: Cow<'static, str>,
    /// Positional parameters
    pub params: Vec<Value>,
    /// Expected result shape
    pub kind: QueryKind,
}

impl Query {
    /// Create a row-returning query.
    pub fn read(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            kind: QueryKind::Read,
        }
    }

    /// Create a mutation.
    pub fn write(sql: impl Into<Cow<'static, str>>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
            kind: QueryKind::Write,
        }
    }

    /// Append a positional parameter.
    pub fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    /// Append several positional parameters.
    pub fn bind_all(mut self, values: impl IntoIterator<Item = Value>) -> Self {
        self.params.extend(values);
        self
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

/// What a backend returns for a successful call.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Ordered row set
    Rows(Vec<Row>),
    /// Mutation acknowledgment
    Mutation {
        /// Number of rows changed
        rows_affected: u64,
    },
}

impl QueryOutcome {
    /// Records touched by the call: row count for reads, change count for writes.
    pub fn affected_records(&self) -> u64 {
        match self {
            QueryOutcome::Rows(rows) => rows.len() as u64,
            QueryOutcome::Mutation { rows_affected } => *rows_affected,
        }
    }
}

/// Build a multi-row `VALUES` list of positional placeholders.
///
/// `values_placeholders(2, 3)` yields `($1, $2, $3), ($4, $5, $6)`.
pub fn values_placeholders(rows: usize, columns: usize) -> String {
    let mut out = String::with_capacity(rows * columns * 5);
    for row in 0..rows {
        if row > 0 {
            out.push_str(", ");
        }
        out.push('(');
        for col in 0..columns {
            if col > 0 {
                out.push_str(", ");
            }
            out.push('$');
            out.push_str(&(row * columns + col + 1).to_string());
        }
        out.push(')');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_placeholders() {
        assert_eq!(values_placeholders(2, 3), "($1, $2, $3), ($4, $5, $6)");
        assert_eq!(values_placeholders(1, 1), "($1)");
        assert_eq!(values_placeholders(0, 4), "");
    }

    #[test]
    fn test_query_builder_binds_in_order() {
        let query = Query::read("SELECT * FROM t WHERE a = $1 AND b = $2")
            .bind(7i64)
            .bind("x");
        assert_eq!(query.kind, QueryKind::Read);
        assert_eq!(query.params, vec![Value::Int(7), Value::Text("x".into())]);
    }

    #[test]
    fn test_affected_records() {
        let rows = QueryOutcome::Rows(vec![vec![Value::Int(1)], vec![Value::Int(2)]]);
        assert_eq!(rows.affected_records(), 2);

        let mutation = QueryOutcome::Mutation { rows_affected: 17 };
        assert_eq!(mutation.affected_records(), 17);
    }

    #[test]
    fn test_value_serializes_untagged() {
        let json = serde_json::to_value(vec![
            Value::Null,
            Value::Int(3),
            Value::Text("a".into()),
        ])
        .unwrap();
        assert_eq!(json, serde_json::json!([null, 3, "a"]));
    }
}
