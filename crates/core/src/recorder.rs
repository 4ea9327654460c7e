// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Sample recording.
//!
//! [`SampleLog`] times one operation at a time and appends the outcome to a
//! run-scoped, append-only log. The log is a cheap handle: clones share the
//! same storage, so concurrent load streams running on separate tasks append
//! into one log.
//!
//! # Example
//!
//! ```ignore
//! use pathbench_core::recorder::SampleLog;
//! use pathbench_core::sample::OperationMeta;
//!
//! let log = SampleLog::new();
//! let meta = OperationMeta::new("point_lookup_user").category("point_lookup");
//! let record = log.record_query(meta, BackendKind::Primary, &backend, &query).await;
//! assert_eq!(log.len(), 1);
//! ```

use crate::backend::{Backend, BackendKind};
use crate::error::BackendError;
use crate::query::{Query, QueryOutcome};
use crate::sample::{OperationMeta, SampleRecord};
use std::fmt::Display;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tracing::warn;

/// Shared, append-only log of samples for one run.
#[derive(Debug, Clone, Default)]
pub struct SampleLog {
    samples: Arc<Mutex<Vec<SampleRecord>>>,
}

impl SampleLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Time `operation`, append the resulting sample and return it.
    ///
    /// Failures are timed exactly like successes. Nothing is retried.
    pub async fn record<F, Fut, E>(
        &self,
        meta: OperationMeta,
        backend: BackendKind,
        operation: F,
    ) -> SampleRecord
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<QueryOutcome, E>>,
        E: Display,
    {
        let start = Instant::now();
        let outcome = operation().await;
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        let (success, error, affected_records) = match outcome {
            Ok(result) => (true, None, Some(result.affected_records())),
            Err(err) => {
                let message = err.to_string();
                warn!(
                    label = %meta.label,
                    backend = %backend,
                    duration_ms,
                    error = %message,
                    "operation failed"
                );
                (false, Some(message), None)
            }
        };

        let record = SampleRecord {
            label: meta.label,
            category: meta.category,
            description: meta.description,
            query_text: meta.query_text,
            backend,
            duration_ms,
            success,
            error,
            affected_records,
        };

        self.lock().push(record.clone());
        record
    }

    /// Execute `query` on `backend` and record it, filling in the query text.
    pub async fn record_query(
        &self,
        meta: OperationMeta,
        kind: BackendKind,
        backend: &dyn Backend,
        query: &Query,
    ) -> SampleRecord {
        let meta = if meta.query_text.is_none() {
            meta.query_text(query.sql.as_ref())
        } else {
            meta
        };
        self.record::<_, _, BackendError>(meta, kind, || backend.execute(query))
            .await
    }

    /// Copy of every sample recorded so far, in append order.
    pub fn snapshot(&self) -> Vec<SampleRecord> {
        self.lock().clone()
    }

    /// Number of samples recorded so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every sample. Called once at the start of each run.
    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panic while holding the lock cannot leave a half-pushed record behind.
    fn lock(&self) -> MutexGuard<'_, Vec<SampleRecord>> {
        self.samples.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
