// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Workload generators.
//!
//! Every measured operation is paired: the same query is issued through the
//! primary path and then through the alternate path, and both outcomes are
//! appended to the [`SampleLog`]. A failing call is recorded and the suite
//! moves on; generators never abort on operation failures.
//!
//! Setup work (schema, seeding, cleanup) goes through the primary path only,
//! since both paths reach the same store. It is logged, not sampled.

use crate::backend::{Backend, BackendKind};
use crate::dataset::{self, DatasetShape, OrderRow};
use crate::error::BackendError;
use crate::query::Query;
use crate::recorder::SampleLog;
use crate::sample::OperationMeta;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Category labels used in samples and in the report breakdown.
pub mod categories {
    pub const POINT_LOOKUP: &str = "point_lookup";
    pub const FILTERED_SCAN: &str = "filtered_scan";
    pub const JOIN: &str = "join";
    pub const AGGREGATION: &str = "aggregation";
    pub const BULK_WRITE: &str = "bulk_write";
    pub const BULK_READ: &str = "bulk_read";
    pub const SEQUENTIAL_LOAD: &str = "sequential_load";
    pub const CONCURRENT_LOAD: &str = "concurrent_load";
    pub const RAW_QUERY: &str = "raw_query";
}

/// Rows inserted per bulk-write operation.
pub const BULK_WRITE_ROWS: usize = 20;

/// Rows fetched per bulk-read operation.
pub const BULK_READ_LIMIT: i64 = 500;

/// The fixed query shapes the suites are built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryShape {
    /// One user by primary key
    PointLookup,
    /// Orders filtered on status and amount
    FilteredScan,
    /// Users joined with their orders
    Join,
    /// Grouped aggregate over orders
    Aggregation,
    /// Multi-row order insert
    BulkWrite,
    /// Large ordered read
    BulkRead,
}

impl QueryShape {
    /// Shapes cycled through by the sequential load loop. Writes are left out
    /// so the loop does not grow the dataset under the other shapes.
    pub const SEQUENTIAL_ROTATION: [QueryShape; 4] = [
        QueryShape::PointLookup,
        QueryShape::FilteredScan,
        QueryShape::Join,
        QueryShape::Aggregation,
    ];

    /// Operation label recorded on samples.
    pub fn label(&self) -> &'static str {
        match self {
            QueryShape::PointLookup => "point_lookup_user",
            QueryShape::FilteredScan => "filter_orders_by_status",
            QueryShape::Join => "join_users_orders",
            QueryShape::Aggregation => "aggregate_orders_by_status",
            QueryShape::BulkWrite => "bulk_insert_orders",
            QueryShape::BulkRead => "bulk_read_orders",
        }
    }

    /// Category of the suite dedicated to this shape.
    pub fn category(&self) -> &'static str {
        match self {
            QueryShape::PointLookup => categories::POINT_LOOKUP,
            QueryShape::FilteredScan => categories::FILTERED_SCAN,
            QueryShape::Join => categories::JOIN,
            QueryShape::Aggregation => categories::AGGREGATION,
            QueryShape::BulkWrite => categories::BULK_WRITE,
            QueryShape::BulkRead => categories::BULK_READ,
        }
    }

    /// Human description recorded on samples.
    pub fn description(&self) -> &'static str {
        match self {
            QueryShape::PointLookup => "Fetch one user by primary key",
            QueryShape::FilteredScan => "Orders with one status above an amount threshold",
            QueryShape::Join => "Users in an age band joined with their orders",
            QueryShape::Aggregation => "Order count, sum and average per status",
            QueryShape::BulkWrite => "Insert a batch of orders in one statement",
            QueryShape::BulkRead => "Read the first orders by id",
        }
    }

    fn meta(&self, category: &str) -> OperationMeta {
        OperationMeta::new(self.label())
            .category(category)
            .description(self.description())
    }

    /// The `n`-th query of this shape as issued through `kind`.
    ///
    /// Only bulk writes differ between backends: each path writes its own
    /// id range so paired inserts never collide.
    pub fn query(&self, data: &DatasetShape, n: usize, kind: BackendKind) -> Query {
        match self {
            QueryShape::PointLookup => Query::read(dataset::POINT_LOOKUP).bind(data.user_id(n)),
            QueryShape::FilteredScan => Query::read(dataset::FILTERED_SCAN)
                .bind(dataset::ORDER_STATUSES[n % dataset::ORDER_STATUSES.len()])
                .bind(((n * 13) % 50) as f64),
            QueryShape::Join => {
                let low = 18 + (n % 50) as i64;
                Query::read(dataset::JOIN).bind(low).bind(low + 10)
            }
            QueryShape::Aggregation => Query::read(dataset::AGGREGATION),
            QueryShape::BulkWrite => {
                let slot = n * BackendKind::ALL.len() + kind as usize;
                let first_id = data.first_free_order_id() + (slot * BULK_WRITE_ROWS) as i64;
                dataset::insert_orders(
                    (0..BULK_WRITE_ROWS)
                        .map(|j| {
                            OrderRow::generate(
                                first_id + j as i64,
                                data.user_id(n * BULK_WRITE_ROWS + j),
                            )
                        })
                        .collect(),
                )
            }
            QueryShape::BulkRead => Query::read(dataset::BULK_READ).bind(BULK_READ_LIMIT),
        }
    }
}

/// Outcome of the seeding step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedSummary {
    /// Parent rows written
    pub users: usize,
    /// Dependent rows written
    pub orders: usize,
    /// Wall time spent seeding, in milliseconds
    pub elapsed_ms: f64,
}

/// Runs workloads against both backends and records into one log.
#[derive(Clone)]
pub struct Workloads {
    primary: Arc<dyn Backend>,
    alternate: Arc<dyn Backend>,
    log: SampleLog,
    data: DatasetShape,
}

impl Workloads {
    /// Bind workloads to two backends, a log and the seeded dataset shape.
    pub fn new(
        primary: Arc<dyn Backend>,
        alternate: Arc<dyn Backend>,
        log: SampleLog,
        data: DatasetShape,
    ) -> Self {
        Self {
            primary,
            alternate,
            log,
            data,
        }
    }

    fn backend(&self, kind: BackendKind) -> &Arc<dyn Backend> {
        match kind {
            BackendKind::Primary => &self.primary,
            BackendKind::Alternate => &self.alternate,
        }
    }

    /// Trivial round-trips through each backend. Timed for debugging only.
    pub async fn warmup(&self, rounds: usize) {
        let query = Query::read(dataset::WARMUP);
        for kind in BackendKind::ALL {
            for round in 0..rounds {
                let start = Instant::now();
                let result = self.backend(kind).execute(&query).await;
                debug!(
                    backend = %kind,
                    round,
                    elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
                    ok = result.is_ok(),
                    "warmup round"
                );
            }
        }
    }

    /// Create the benchmark tables if they do not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), BackendError> {
        for ddl in [dataset::CREATE_USERS_TABLE, dataset::CREATE_ORDERS_TABLE] {
            self.primary.execute(&Query::write(ddl)).await?;
        }
        Ok(())
    }

    /// Populate both tables in fixed-size batches through the primary path.
    pub async fn seed(&self, batch_size: usize) -> Result<SeedSummary, BackendError> {
        let start = Instant::now();
        let batches = dataset::seed_batches(self.data, batch_size);
        let batch_count = batches.len();

        for batch in batches {
            self.primary.execute(&batch).await?;
        }

        let summary = SeedSummary {
            users: self.data.users,
            orders: self.data.orders,
            elapsed_ms: start.elapsed().as_secs_f64() * 1000.0,
        };
        info!(
            users = summary.users,
            orders = summary.orders,
            batches = batch_count,
            elapsed_ms = summary.elapsed_ms,
            "seeded dataset"
        );
        Ok(summary)
    }

    /// Delete every benchmark row from the shared store. Returns rows deleted.
    pub async fn cleanup(&self) -> Result<u64, BackendError> {
        let start = Instant::now();
        let mut deleted = 0;
        // Dependents first, the foreign key points at users.
        for sql in [dataset::DELETE_ORDERS, dataset::DELETE_USERS] {
            deleted += self.primary.execute(&Query::write(sql)).await?.affected_records();
        }
        info!(
            deleted,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "cleaned up dataset"
        );
        Ok(deleted)
    }

    async fn paired(&self, shape: QueryShape, category: &str, n: usize) {
        for kind in BackendKind::ALL {
            let query = shape.query(&self.data, n, kind);
            self.log
                .record_query(shape.meta(category), kind, self.backend(kind).as_ref(), &query)
                .await;
        }
    }

    /// Run the dedicated suite for one shape: `iterations` paired operations.
    pub async fn suite(&self, shape: QueryShape, iterations: usize) {
        let before = self.log.len();
        for n in 0..iterations {
            self.paired(shape, shape.category(), n).await;
        }
        info!(
            suite = shape.category(),
            iterations,
            samples = self.log.len() - before,
            "suite complete"
        );
    }

    /// Point lookup suite.
    pub async fn point_lookups(&self, iterations: usize) {
        self.suite(QueryShape::PointLookup, iterations).await
    }

    /// Filtered scan suite.
    pub async fn filtered_scans(&self, iterations: usize) {
        self.suite(QueryShape::FilteredScan, iterations).await
    }

    /// Join suite.
    pub async fn joins(&self, iterations: usize) {
        self.suite(QueryShape::Join, iterations).await
    }

    /// Aggregation suite.
    pub async fn aggregations(&self, iterations: usize) {
        self.suite(QueryShape::Aggregation, iterations).await
    }

    /// Bulk write suite.
    pub async fn bulk_writes(&self, iterations: usize) {
        self.suite(QueryShape::BulkWrite, iterations).await
    }

    /// Bulk read suite.
    pub async fn bulk_reads(&self, iterations: usize) {
        self.suite(QueryShape::BulkRead, iterations).await
    }

    /// Every single-shot suite in a fixed order.
    pub async fn query_suites(&self, iterations: usize) {
        self.point_lookups(iterations).await;
        self.filtered_scans(iterations).await;
        self.joins(iterations).await;
        self.aggregations(iterations).await;
        self.bulk_writes(iterations).await;
        self.bulk_reads(iterations).await;
    }

    /// Rotate through representative shapes, one call at a time.
    pub async fn sequential_load(&self, iterations: usize) {
        let rotation = QueryShape::SEQUENTIAL_ROTATION;
        for n in 0..iterations {
            let shape = rotation[n % rotation.len()];
            self.paired(shape, categories::SEQUENTIAL_LOAD, n).await;
        }
        info!(iterations, "sequential load complete");
    }

    /// `concurrency` parallel streams of `iterations` point lookups, one
    /// backend at a time. Each wave is joined before the next one starts.
    pub async fn concurrent_load(&self, concurrency: usize, iterations: usize) {
        for kind in BackendKind::ALL {
            self.concurrent_wave(kind, concurrency, iterations).await;
        }
    }

    async fn concurrent_wave(&self, kind: BackendKind, concurrency: usize, iterations: usize) {
        let start = Instant::now();
        let mut streams = JoinSet::new();

        for stream in 0..concurrency {
            let backend = Arc::clone(self.backend(kind));
            let log = self.log.clone();
            let data = self.data;

            streams.spawn(async move {
                let shape = QueryShape::PointLookup;
                for i in 0..iterations {
                    let query = shape.query(&data, stream * iterations + i, kind);
                    log.record_query(
                        shape.meta(categories::CONCURRENT_LOAD),
                        kind,
                        backend.as_ref(),
                        &query,
                    )
                    .await;
                }
            });
        }

        while let Some(joined) = streams.join_next().await {
            if let Err(err) = joined {
                warn!(backend = %kind, error = %err, "concurrent stream did not finish");
            }
        }

        info!(
            backend = %kind,
            concurrency,
            iterations,
            elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
            "concurrent wave complete"
        );
    }

    /// Issue a caller-supplied read-only statement through both paths.
    pub async fn raw_query_probe(&self, sql: &str, iterations: usize) {
        let query = Query::read(sql.to_string());
        for _ in 0..iterations {
            for kind in BackendKind::ALL {
                let meta = OperationMeta::new("raw_query_probe")
                    .category(categories::RAW_QUERY)
                    .description("Caller-supplied query");
                self.log
                    .record_query(meta, kind, self.backend(kind).as_ref(), &query)
                    .await;
            }
        }
        info!(iterations, "raw query probe complete");
    }
}
