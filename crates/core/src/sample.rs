// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! The measured-operation record and the metadata describing an operation.

use crate::backend::BackendKind;
use serde::{Deserialize, Serialize};

/// One timed, recorded attempt of an operation against one backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    /// Operation label, e.g. `point_lookup_user`
    pub label: String,
    /// Category used for the per-category breakdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Human description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Literal query text, for reporting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_text: Option<String>,
    /// Access path the operation went through
    pub backend: BackendKind,
    /// Elapsed wall time in milliseconds, also on failure
    pub duration_ms: f64,
    /// Whether the operation succeeded
    pub success: bool,
    /// Error message, present iff `success` is false
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Rows returned or changed, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affected_records: Option<u64>,
}

/// Descriptive metadata for an operation about to be recorded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationMeta {
    /// Operation label
    pub label: String,
    /// Optional category
    pub category: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Optional literal query text
    pub query_text: Option<String>,
}

impl OperationMeta {
    /// Create metadata with only a label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Set the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the literal query text.
    pub fn query_text(mut self, query_text: impl Into<String>) -> Self {
        self.query_text = Some(query_text.into());
        self
    }
}
