// Copyright 2025 Pathbench Contributors
// SPDX-License-Identifier: Apache-2.0

//! Benchmark schema, SQL templates and deterministic synthetic data.
//!
//! The dataset is two related tables: `bench_users` (parent) and
//! `bench_orders` (dependent, `user_id` references `bench_users.id`). Every
//! value is derived from the row id, so two runs at the same scale seed
//! byte-identical data.

use crate::query::{values_placeholders, Query, Value};

/// Orders seeded per user.
pub const ORDERS_PER_USER: usize = 3;

/// Order statuses, assigned round-robin by order id.
pub const ORDER_STATUSES: [&str; 4] = ["pending", "shipped", "delivered", "cancelled"];

pub const CREATE_USERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS bench_users (\
    id BIGINT PRIMARY KEY, \
    name TEXT NOT NULL, \
    email TEXT NOT NULL, \
    age INTEGER NOT NULL, \
    created_at TIMESTAMPTZ NOT NULL DEFAULT now())";

pub const CREATE_ORDERS_TABLE: &str = "CREATE TABLE IF NOT EXISTS bench_orders (\
    id BIGINT PRIMARY KEY, \
    user_id BIGINT NOT NULL REFERENCES bench_users(id), \
    amount DOUBLE PRECISION NOT NULL, \
    status TEXT NOT NULL, \
    created_at TIMESTAMPTZ NOT NULL DEFAULT now())";

pub const DELETE_ORDERS: &str = "DELETE FROM bench_orders";
pub const DELETE_USERS: &str = "DELETE FROM bench_users";

pub const INSERT_USERS_PREFIX: &str = "INSERT INTO bench_users (id, name, email, age) VALUES ";
pub const INSERT_ORDERS_PREFIX: &str =
    "INSERT INTO bench_orders (id, user_id, amount, status) VALUES ";

pub const WARMUP: &str = "SELECT 1";

pub const POINT_LOOKUP: &str = "SELECT id, name, email, age FROM bench_users WHERE id = $1";

pub const FILTERED_SCAN: &str = "SELECT id, user_id, amount, status FROM bench_orders \
    WHERE status = $1 AND amount > $2 ORDER BY amount DESC LIMIT 50";

pub const JOIN: &str = "SELECT u.id, u.name, o.id, o.amount FROM bench_users u \
    JOIN bench_orders o ON o.user_id = u.id \
    WHERE u.age BETWEEN $1 AND $2 ORDER BY o.id LIMIT 100";

pub const AGGREGATION: &str = "SELECT status, COUNT(*), SUM(amount), AVG(amount) \
    FROM bench_orders GROUP BY status ORDER BY status";

pub const BULK_READ: &str =
    "SELECT id, user_id, amount, status, created_at FROM bench_orders ORDER BY id LIMIT $1";

pub const DEFAULT_PROBE: &str = "SELECT COUNT(*) FROM bench_orders";

/// Size of the seeded dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetShape {
    /// Number of parent rows
    pub users: usize,
    /// Number of dependent rows
    pub orders: usize,
}

impl DatasetShape {
    /// Shape for a given scale: `scale` users, [`ORDERS_PER_USER`] orders each.
    pub fn for_scale(scale: usize) -> Self {
        Self {
            users: scale,
            orders: scale * ORDERS_PER_USER,
        }
    }

    /// A user id that exists for any `n`, spread across the id space.
    pub fn user_id(&self, n: usize) -> i64 {
        ((n * 7919) % self.users.max(1)) as i64 + 1
    }

    /// First id free for orders written during the run.
    pub fn first_free_order_id(&self) -> i64 {
        self.orders as i64 + 1
    }
}

/// A seeded parent row.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

impl UserRow {
    /// Deterministic user for `id`.
    pub fn generate(id: i64) -> Self {
        Self {
            id,
            name: format!("user-{id:06}"),
            email: format!("user{id}@bench.example"),
            age: 18 + (id * 7) % 60,
        }
    }

    fn values(self) -> [Value; 4] {
        [
            Value::Int(self.id),
            Value::Text(self.name),
            Value::Text(self.email),
            Value::Int(self.age),
        ]
    }
}

/// A seeded or written dependent row.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub status: &'static str,
}

impl OrderRow {
    /// Deterministic order for `id`, owned by `user_id`.
    pub fn generate(id: i64, user_id: i64) -> Self {
        Self {
            id,
            user_id,
            amount: ((id * 37) % 10_000) as f64 / 100.0 + 1.0,
            status: ORDER_STATUSES[(id as usize) % ORDER_STATUSES.len()],
        }
    }

    fn values(self) -> [Value; 4] {
        [
            Value::Int(self.id),
            Value::Int(self.user_id),
            Value::Float(self.amount),
            Value::Text(self.status.to_string()),
        ]
    }
}

/// Multi-row insert for a batch of users.
pub fn insert_users(rows: Vec<UserRow>) -> Query {
    let sql = format!("{INSERT_USERS_PREFIX}{}", values_placeholders(rows.len(), 4));
    Query::write(sql).bind_all(rows.into_iter().flat_map(UserRow::values))
}

/// Multi-row insert for a batch of orders.
pub fn insert_orders(rows: Vec<OrderRow>) -> Query {
    let sql = format!("{INSERT_ORDERS_PREFIX}{}", values_placeholders(rows.len(), 4));
    Query::write(sql).bind_all(rows.into_iter().flat_map(OrderRow::values))
}

/// Seeding batches for the whole dataset: all user batches, then all order batches.
///
/// Order `k` (1-based) belongs to user `(k - 1) / ORDERS_PER_USER + 1`.
pub fn seed_batches(shape: DatasetShape, batch_size: usize) -> Vec<Query> {
    let batch_size = batch_size.max(1);
    let mut batches = Vec::new();

    let user_ids: Vec<i64> = (1..=shape.users as i64).collect();
    for chunk in user_ids.chunks(batch_size) {
        batches.push(insert_users(
            chunk.iter().map(|&id| UserRow::generate(id)).collect(),
        ));
    }

    let order_ids: Vec<i64> = (1..=shape.orders as i64).collect();
    for chunk in order_ids.chunks(batch_size) {
        batches.push(insert_orders(
            chunk
                .iter()
                .map(|&id| OrderRow::generate(id, (id - 1) / ORDERS_PER_USER as i64 + 1))
                .collect(),
        ));
    }

    batches
}
