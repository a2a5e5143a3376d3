// ABOUTME: In-memory relational emulation backing the store abstraction
// ABOUTME: Statement-atomic table operations guarded by a single RwLock
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! In-memory store backend
//!
//! A minimal relational emulation used when no real database is configured.
//! Tables are vectors of JSON rows behind one `RwLock`, so each statement is
//! atomic: an insert either fully appends or leaves no trace. Nothing here
//! survives a restart; this backend exists for development and tests.
//!
//! The fault hook ([`MemoryStore::fail_next_inserts`]) lets tests force
//! insert failures on a named table to exercise compensation paths.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Action, Filter, FilterOp, JoinSpec, OrderBy, Query, Row, StoreResponse};

/// Shared mutable table data
type Tables = HashMap<String, Vec<Row>>;

/// In-memory store backend
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    /// Remaining forced insert failures per table
    fail_inserts: Arc<RwLock<HashMap<String, u32>>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Arrange for the next `count` inserts into `table` to fail
    ///
    /// Fault hook for tests; the failure surfaces through the normal
    /// `StoreResponse::error` channel.
    pub async fn fail_next_inserts(&self, table: &str, count: u32) {
        self.fail_inserts
            .write()
            .await
            .insert(table.to_owned(), count);
    }

    /// Execute a query descriptor against the in-memory tables
    pub async fn execute(&self, query: Query) -> StoreResponse {
        match &query.action {
            Action::Insert(rows) => {
                if self.take_forced_failure(&query.table).await {
                    return StoreResponse::err(format!(
                        "insert into {:?} rejected (forced failure)",
                        query.table
                    ));
                }
                self.insert_rows(&query.table, rows.clone(), None).await
            }
            Action::Upsert { rows, conflict_key } => {
                if self.take_forced_failure(&query.table).await {
                    return StoreResponse::err(format!(
                        "upsert into {:?} rejected (forced failure)",
                        query.table
                    ));
                }
                self.insert_rows(&query.table, rows.clone(), Some(conflict_key))
                    .await
            }
            Action::Select => self.select_rows(&query).await,
            Action::Delete => self.delete_rows(&query).await,
        }
    }

    async fn take_forced_failure(&self, table: &str) -> bool {
        let mut faults = self.fail_inserts.write().await;
        match faults.get_mut(table) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    async fn insert_rows(
        &self,
        table: &str,
        rows: Vec<Row>,
        conflict_key: Option<&str>,
    ) -> StoreResponse {
        let mut tables = self.tables.write().await;
        let mut inserted = Vec::with_capacity(rows.len());

        for mut row in rows {
            row.entry("id".to_owned())
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            row.entry("created_at".to_owned())
                .or_insert_with(|| Value::String(Utc::now().to_rfc3339()));

            let store = tables.entry(table.to_owned()).or_default();
            if let Some(key) = conflict_key {
                let incoming = row.get(key).cloned().unwrap_or(Value::Null);
                store.retain(|existing| existing.get(key) != Some(&incoming));
            }
            store.push(row.clone());
            inserted.push(row);
        }

        StoreResponse::ok(inserted)
    }

    async fn select_rows(&self, query: &Query) -> StoreResponse {
        let tables = self.tables.read().await;
        let mut result: Vec<Row> = tables
            .get(&query.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| matches_all(row, &query.filters))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if let Some(order) = &query.order {
            sort_rows(&mut result, order);
        }
        if let Some(join) = &query.join {
            attach_children(&mut result, join, &tables);
        }

        StoreResponse::ok(result)
    }

    async fn delete_rows(&self, query: &Query) -> StoreResponse {
        let mut tables = self.tables.write().await;
        let Some(store) = tables.get_mut(&query.table) else {
            return StoreResponse::ok(Vec::new());
        };

        let mut removed = Vec::new();
        store.retain(|row| {
            if matches_all(row, &query.filters) {
                removed.push(row.clone());
                false
            } else {
                true
            }
        });

        if let Some(order) = &query.order {
            sort_rows(&mut removed, order);
        }

        StoreResponse::ok(removed)
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| {
        let candidate = row.get(&filter.field);
        match filter.op {
            FilterOp::Eq => candidate == Some(&filter.value),
            FilterOp::Gte => value_gte(candidate, &filter.value),
        }
    })
}

/// `>=` over JSON values: numbers numerically, strings lexicographically
/// (which orders ISO-8601 dates correctly); mixed or absent values fail
fn value_gte(candidate: Option<&Value>, bound: &Value) -> bool {
    match (candidate, bound) {
        (Some(Value::Number(a)), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(a), Some(b)) => a >= b,
            _ => false,
        },
        (Some(Value::String(a)), Value::String(b)) => a.as_str() >= b.as_str(),
        _ => false,
    }
}

fn sort_rows(rows: &mut [Row], order: &OrderBy) {
    rows.sort_by(|a, b| {
        let ord = compare_values(a.get(&order.field), b.get(&order.field));
        if order.descending {
            ord.reverse()
        } else {
            ord
        }
    });
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(a)), Some(Value::Number(b))) => {
            match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
                _ => Ordering::Equal,
            }
        }
        (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
        (Some(Value::Bool(a)), Some(Value::Bool(b))) => a.cmp(b),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        (None | Some(Value::Null), Some(_)) => Ordering::Less,
        (Some(_), None | Some(Value::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Attach child rows whose foreign key equals the parent `id`
fn attach_children(rows: &mut [Row], join: &JoinSpec, tables: &Tables) {
    let children = tables.get(&join.child_table);
    for row in rows {
        let parent_id = row.get("id").cloned().unwrap_or(Value::Null);
        let matched: Vec<Value> = children
            .map(|rows| {
                rows.iter()
                    .filter(|child| child.get(&join.foreign_key) == Some(&parent_id))
                    .map(|child| Value::Object(child.clone()))
                    .collect()
            })
            .unwrap_or_default();
        row.insert(join.attach_as.clone(), Value::Array(matched));
    }
}
