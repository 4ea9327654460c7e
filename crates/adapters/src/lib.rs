// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Concrete access paths for the Pathbench harness.
//!
//! - [`postgres`] - Primary path: direct wire protocol through a sqlx pool
//! - [`http`] - Alternate path: SQL posted as JSON to an HTTP gateway
//!
//! Both point at the same database and implement
//! [`pathbench_core::Backend`].

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod http;
pub mod postgres;

pub use http::{HttpSqlBackend, HttpSqlConfig};
pub use postgres::{PostgresBackend, PostgresConfig};
