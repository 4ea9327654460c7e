// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Alternate access path: SQL over HTTP.
//!
//! Each query is one JSON `POST` to a SQL gateway sitting in front of the same
//! database the primary path connects to.
//!
//! Request body:
//!
//! ```text
//! { "query": "SELECT ... WHERE id = $1", "params": [42] }
//! ```
//!
//! Response body (rows may be arrays or column-keyed objects; object rows keep
//! the column order they arrive in):
//!
//! ```text
//! { "command": "SELECT", "rowCount": 1, "rows": [[42, "user-000042"]] }
//! ```

use async_trait::async_trait;
use pathbench_core::{Backend, BackendError, Query, QueryKind, QueryOutcome, Row, Value};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Longest error body kept on a failed sample.
const MAX_ERROR_BODY: usize = 512;

/// Connection settings for the alternate path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSqlConfig {
    /// Full URL of the SQL endpoint
    pub endpoint: String,
    /// Bearer token, if the gateway requires one
    pub auth_token: Option<String>,
    /// Idle keep-alive connections kept per host
    pub max_idle_connections: usize,
}

impl Default for HttpSqlConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4444/sql".to_string(),
            auth_token: None,
            max_idle_connections: 10,
        }
    }
}

#[derive(Debug, Serialize)]
struct SqlRequest<'a> {
    query: &'a str,
    params: &'a [Value],
}

#[derive(Debug, Deserialize)]
struct SqlResponse {
    #[serde(default)]
    command: Option<String>,
    #[serde(default, rename = "rowCount")]
    row_count: Option<u64>,
    #[serde(default)]
    rows: Vec<WireRow>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireRow {
    Array(Vec<serde_json::Value>),
    Object(serde_json::Map<String, serde_json::Value>),
}

impl WireRow {
    fn into_row(self) -> Row {
        match self {
            WireRow::Array(cells) => cells.into_iter().map(from_json).collect(),
            WireRow::Object(cells) => cells.into_iter().map(|(_, v)| from_json(v)).collect(),
        }
    }
}

fn from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => Value::Text(s),
        nested => Value::Text(nested.to_string()),
    }
}

impl SqlResponse {
    fn into_outcome(self, kind: QueryKind) -> QueryOutcome {
        match kind {
            QueryKind::Read => {
                QueryOutcome::Rows(self.rows.into_iter().map(WireRow::into_row).collect())
            }
            QueryKind::Write => QueryOutcome::Mutation {
                rows_affected: self.row_count.unwrap_or(self.rows.len() as u64),
            },
        }
    }
}

/// Backend issuing each query as an HTTP request.
pub struct HttpSqlBackend {
    name: String,
    endpoint: String,
    auth_token: Option<String>,
    client: reqwest::Client,
}

impl HttpSqlBackend {
    /// Build the HTTP client. No request timeout is set: slow calls are
    /// measured, not cut short.
    pub fn new(config: &HttpSqlConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(config.max_idle_connections)
            .user_agent(concat!("pathbench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| BackendError::Connection(format!("Failed to build HTTP client: {e}")))?;

        info!(endpoint = %config.endpoint, "configured alternate backend");
        Ok(Self {
            name: "http-sql".to_string(),
            endpoint: config.endpoint.clone(),
            auth_token: config.auth_token.clone(),
            client,
        })
    }

    /// Endpoint queries are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Backend for HttpSqlBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, query: &Query) -> Result<QueryOutcome, BackendError> {
        let mut request = self.client.post(&self.endpoint).json(&SqlRequest {
            query: query.sql.as_ref(),
            params: &query.params,
        });
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Http {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        let body: SqlResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))?;

        if let Some(command) = &body.command {
            tracing::trace!(%command, row_count = ?body.row_count, "http sql response");
        }
        Ok(body.into_outcome(query.kind))
    }
}

fn classify(err: reqwest::Error) -> BackendError {
    if err.is_connect() || err.is_timeout() {
        BackendError::Connection(err.to_string())
    } else {
        BackendError::Query(err.to_string())
    }
}
