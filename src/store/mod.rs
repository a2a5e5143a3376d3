// ABOUTME: Relational store abstraction with an immutable query descriptor
// ABOUTME: Dispatches execution to the in-memory emulation or the remote HTTP backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Relational store abstraction
//!
//! Callers describe an operation with an immutable [`Query`] value built by
//! chained calls (each consumes and returns the builder), then hand it to a
//! [`Datastore`] for execution. Filters accumulate with AND semantics; a
//! [`JoinSpec`] attaches one level of child rows to each parent row.
//!
//! Backend faults never surface as panics or early returns: every execution
//! yields a [`StoreResponse`] whose `error` field callers must check. The
//! service layer translates a populated `error` into a persistence failure.
//!
//! Rows are schema-less JSON maps. `insert` assigns a server-generated `id`
//! and `created_at` to any row missing them; `upsert` first removes rows
//! matching the conflict key (replace, not merge).

use serde_json::{Map, Value};
use tracing::info;

use crate::config::ServerConfig;

pub mod memory;
pub mod postgrest;

pub use memory::MemoryStore;
pub use postgrest::PostgrestStore;

/// A single stored row
pub type Row = Map<String, Value>;

/// Table holding workout rows
pub const WORKOUTS_TABLE: &str = "workouts";

/// Table holding exercise rows
pub const EXERCISES_TABLE: &str = "exercises";

/// Table holding AI analysis rows
pub const ANALYSES_TABLE: &str = "ai_analyses";

/// Comparison operator for a filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Field equals the value
    Eq,
    /// Field is greater than or equal to the value (numeric or lexicographic)
    Gte,
}

/// One accumulated filter; filters combine with AND
#[derive(Debug, Clone)]
pub struct Filter {
    /// Field the filter applies to
    pub field: String,
    /// Comparison operator
    pub op: FilterOp,
    /// Comparison operand
    pub value: Value,
}

/// Sort applied after filtering, before returning
#[derive(Debug, Clone)]
pub struct OrderBy {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    pub descending: bool,
}

/// Explicit one-level parent/child join
///
/// For each result row, all rows of `child_table` whose `foreign_key` field
/// equals the parent row's `id` are attached under `attach_as`.
#[derive(Debug, Clone)]
pub struct JoinSpec {
    /// Child table to pull rows from
    pub child_table: String,
    /// Child field matched against the parent `id`
    pub foreign_key: String,
    /// Field name the child rows are attached under
    pub attach_as: String,
}

impl JoinSpec {
    /// The one relation this system needs: workouts joined with exercises
    #[must_use]
    pub fn exercises() -> Self {
        Self {
            child_table: EXERCISES_TABLE.to_owned(),
            foreign_key: "workout_id".to_owned(),
            attach_as: "exercises".to_owned(),
        }
    }
}

/// Terminal operation a query performs
#[derive(Debug, Clone)]
pub enum Action {
    /// Return matching rows
    Select,
    /// Append rows, assigning missing ids and timestamps
    Insert(Vec<Row>),
    /// Insert, replacing existing rows matching the conflict key
    Upsert {
        /// Rows to store
        rows: Vec<Row>,
        /// Field whose equality identifies a conflicting existing row
        conflict_key: String,
    },
    /// Remove matching rows, returning them
    Delete,
}

/// Immutable description of one store operation
#[derive(Debug, Clone)]
pub struct Query {
    /// Target table
    pub table: String,
    /// Accumulated AND filters
    pub filters: Vec<Filter>,
    /// Optional sort
    pub order: Option<OrderBy>,
    /// Optional child-row join (select only)
    pub join: Option<JoinSpec>,
    /// Terminal operation
    pub action: Action,
}

impl Query {
    /// Start a query against a named table; the action defaults to select
    #[must_use]
    pub fn table(name: &str) -> Self {
        Self {
            table: name.to_owned(),
            filters: Vec::new(),
            order: None,
            join: None,
            action: Action::Select,
        }
    }

    /// Add an equality filter
    #[must_use]
    pub fn eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_owned(),
            op: FilterOp::Eq,
            value: value.into(),
        });
        self
    }

    /// Add a greater-than-or-equal filter
    #[must_use]
    pub fn gte(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.to_owned(),
            op: FilterOp::Gte,
            value: value.into(),
        });
        self
    }

    /// Sort the result set
    #[must_use]
    pub fn order_by(mut self, field: &str, descending: bool) -> Self {
        self.order = Some(OrderBy {
            field: field.to_owned(),
            descending,
        });
        self
    }

    /// Attach child rows to each result row
    #[must_use]
    pub fn join(mut self, spec: JoinSpec) -> Self {
        self.join = Some(spec);
        self
    }

    /// Terminal: return matching rows
    #[must_use]
    pub fn select(self) -> Self {
        self
    }

    /// Terminal: append rows
    #[must_use]
    pub fn insert(mut self, rows: Vec<Row>) -> Self {
        self.action = Action::Insert(rows);
        self
    }

    /// Terminal: insert with replace-on-conflict semantics
    #[must_use]
    pub fn upsert(mut self, rows: Vec<Row>, conflict_key: &str) -> Self {
        self.action = Action::Upsert {
            rows,
            conflict_key: conflict_key.to_owned(),
        };
        self
    }

    /// Terminal: remove matching rows
    #[must_use]
    pub fn delete(mut self) -> Self {
        self.action = Action::Delete;
        self
    }
}

/// Result of executing a query
///
/// A backend fault lands in `error`; `data` is empty in that case. Callers
/// check `error` after every execution.
#[derive(Debug, Clone, Default)]
pub struct StoreResponse {
    /// Returned rows (selected, inserted, or deleted)
    pub data: Vec<Row>,
    /// Backend-reported failure, if any
    pub error: Option<String>,
}

impl StoreResponse {
    /// Successful response carrying rows
    #[must_use]
    pub fn ok(data: Vec<Row>) -> Self {
        Self { data, error: None }
    }

    /// Failed response carrying the backend's error text
    #[must_use]
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            data: Vec::new(),
            error: Some(message.into()),
        }
    }
}

/// Store backend dispatch
///
/// Mirrors the two deployment shapes: a remote relational service when one
/// is configured, otherwise the single-process in-memory emulation.
#[derive(Clone)]
pub enum Datastore {
    /// In-memory relational emulation
    Memory(MemoryStore),
    /// Remote PostgREST-style service over HTTP
    Remote(PostgrestStore),
}

impl Datastore {
    /// Pick a backend from configuration and log the choice
    #[must_use]
    pub fn from_config(config: &ServerConfig) -> Self {
        match &config.database {
            Some(db) => {
                info!(url = %db.url, "using remote datastore");
                Self::Remote(PostgrestStore::new(db.clone(), config.store_timeout_secs))
            }
            None => {
                info!("no database configured, using in-memory datastore");
                Self::Memory(MemoryStore::new())
            }
        }
    }

    /// Execute a query against the active backend
    pub async fn execute(&self, query: Query) -> StoreResponse {
        match self {
            Self::Memory(store) => store.execute(query).await,
            Self::Remote(store) => store.execute(query).await,
        }
    }

    /// Human-readable backend name for startup logging
    #[must_use]
    pub const fn backend_name(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::Remote(_) => "remote",
        }
    }
}
