// ABOUTME: Remote store backend speaking a PostgREST-style HTTP interface
// ABOUTME: Translates query descriptors into reqwest calls with service-key headers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitTrack Pro

//! Remote store backend
//!
//! Translates a [`Query`](super::Query) descriptor into an HTTP request
//! against a PostgREST-style relational service (the interface Supabase
//! exposes). Only the contract this system consumes is reproduced: equality
//! and `gte` filters, ordering, one-level embedded child rows, insert,
//! upsert-on-conflict, and delete with row return.
//!
//! Transport failures and non-2xx statuses are captured into
//! [`StoreResponse::error`]; this backend never panics on a bad response.

use std::time::Duration;

use reqwest::{header, Client, Method, RequestBuilder};
use serde_json::Value;

use super::{Action, FilterOp, Query, Row, StoreResponse};
use crate::config::DatabaseConfig;

/// Remote PostgREST-style backend
#[derive(Clone)]
pub struct PostgrestStore {
    config: DatabaseConfig,
    http: Client,
}

impl PostgrestStore {
    /// Create a backend with an explicit per-request timeout
    #[must_use]
    pub fn new(config: DatabaseConfig, timeout_secs: u64) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_default();
        Self { config, http }
    }

    /// Execute a query descriptor against the remote service
    pub async fn execute(&self, query: Query) -> StoreResponse {
        let request = self.build_request(&query);
        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => return StoreResponse::err(format!("store request failed: {e}")),
        };

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if !status.is_success() {
            return StoreResponse::err(format!("store returned HTTP {status}: {body}"));
        }

        parse_rows(&body)
    }

    fn build_request(&self, query: &Query) -> RequestBuilder {
        let url = format!("{}/rest/v1/{}", self.config.url, query.table);
        let method = match &query.action {
            Action::Select => Method::GET,
            Action::Insert(_) | Action::Upsert { .. } => Method::POST,
            Action::Delete => Method::DELETE,
        };

        let mut request = self
            .http
            .request(method, url)
            .header("apikey", &self.config.service_key)
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.service_key),
            );

        let mut params: Vec<(String, String)> = Vec::new();
        for filter in &query.filters {
            let op = match filter.op {
                FilterOp::Eq => "eq",
                FilterOp::Gte => "gte",
            };
            params.push((
                filter.field.clone(),
                format!("{op}.{}", literal(&filter.value)),
            ));
        }
        if let Some(order) = &query.order {
            let direction = if order.descending { "desc" } else { "asc" };
            params.push(("order".to_owned(), format!("{}.{direction}", order.field)));
        }
        if let Some(join) = &query.join {
            // PostgREST embedded-resource syntax attaches child rows inline
            params.push((
                "select".to_owned(),
                format!("*,{}:{}(*)", join.attach_as, join.child_table),
            ));
        }

        request = request.query(&params);

        match &query.action {
            Action::Select => request,
            Action::Insert(rows) => request
                .header("Prefer", "return=representation")
                .json(&rows_json(rows)),
            Action::Upsert { rows, conflict_key } => request
                .header("Prefer", "return=representation,resolution=merge-duplicates")
                .query(&[("on_conflict", conflict_key.as_str())])
                .json(&rows_json(rows)),
            Action::Delete => request.header("Prefer", "return=representation"),
        }
    }
}

/// Render a filter operand the way PostgREST expects it in a query string
fn literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn rows_json(rows: &[Row]) -> Value {
    Value::Array(rows.iter().cloned().map(Value::Object).collect())
}

/// Parse a PostgREST response body into rows; single objects are wrapped
fn parse_rows(body: &str) -> StoreResponse {
    if body.trim().is_empty() {
        return StoreResponse::ok(Vec::new());
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => {
            let mut rows = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(row) => rows.push(row),
                    other => {
                        return StoreResponse::err(format!(
                            "store returned a non-object row: {other}"
                        ))
                    }
                }
            }
            StoreResponse::ok(rows)
        }
        Ok(Value::Object(row)) => StoreResponse::ok(vec![row]),
        Ok(other) => StoreResponse::err(format!("store returned unexpected JSON: {other}")),
        Err(e) => StoreResponse::err(format!("store returned unparseable body: {e}")),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn parses_array_and_object_bodies() {
        let arr = parse_rows(r#"[{"id":"a"},{"id":"b"}]"#);
        assert!(arr.error.is_none());
        assert_eq!(arr.data.len(), 2);

        let obj = parse_rows(r#"{"id":"a"}"#);
        assert!(obj.error.is_none());
        assert_eq!(obj.data.len(), 1);

        assert!(parse_rows("").error.is_none());
        assert!(parse_rows("not json").error.is_some());
        assert!(parse_rows("[1,2]").error.is_some());
    }
}
