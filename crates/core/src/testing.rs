// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scripted in-memory backend for unit tests.

use crate::backend::Backend;
use crate::error::BackendError;
use crate::query::{Query, QueryKind, QueryOutcome, Value};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Answers every read with one row and every write with its row count.
///
/// Clones share the call counter, so a test can keep a clone after handing
/// the backend to the harness.
#[derive(Debug, Clone)]
pub(crate) struct FakeBackend {
    name: String,
    calls: Arc<AtomicUsize>,
    failing: Vec<FailRule>,
    delay: Option<Duration>,
}

impl FakeBackend {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            failing: Vec::new(),
            delay: None,
        }
    }

    /// Fail every query whose SQL starts with `prefix`.
    pub(crate) fn failing_on(self, prefix: &'static str) -> Self {
        self.failing_after(prefix, 0)
    }

    /// Let the first `skip` matching queries through, then fail the rest.
    pub(crate) fn failing_after(mut self, prefix: &'static str, skip: usize) -> Self {
        self.failing.push(FailRule {
            prefix,
            skip,
            seen: Arc::new(AtomicUsize::new(0)),
        });
        self
    }

    /// Sleep before answering.
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
struct FailRule {
    prefix: &'static str,
    skip: usize,
    seen: Arc<AtomicUsize>,
}

impl FailRule {
    fn rejects(&self, query: &Query) -> bool {
        query.sql.starts_with(self.prefix) && self.seen.fetch_add(1, Ordering::SeqCst) >= self.skip
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn execute(&self, query: &Query) -> Result<QueryOutcome, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.iter().any(|rule| rule.rejects(query)) {
            return Err(BackendError::Query(format!("{} rejected query", self.name)));
        }

        Ok(match query.kind {
            QueryKind::Read => QueryOutcome::Rows(vec![vec![Value::Int(1)]]),
            QueryKind::Write => QueryOutcome::Mutation {
                rows_affected: (query.params.len() / 4) as u64,
            },
        })
    }
}
