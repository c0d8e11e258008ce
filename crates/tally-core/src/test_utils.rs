//! Test utilities for tally-core
//!
//! This module provides a mock finance backend that serves
//! `GET /transactions` for development and integration tests.

use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use std::net::SocketAddr;
use tokio::sync::oneshot;

use crate::models::RawTransaction;

/// What the mock backend answers on `/transactions`
#[derive(Debug, Clone)]
pub enum MockBackendResponse {
    /// 200 with a JSON array of transactions
    Transactions(Vec<RawTransaction>),
    /// 200 with an arbitrary body (for malformed JSON cases)
    Raw(String),
    /// 500 with an error body
    ServerError,
}

/// Mock finance backend for testing
pub struct MockBackendServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockBackendServer {
    /// Start the mock server on an available port
    pub async fn start(response: MockBackendResponse) -> Self {
        let app = Router::new().route(
            "/transactions",
            get(move || {
                let response = response.clone();
                async move { respond(response) }
            }),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Base URL to configure a source with
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockBackendServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn respond(response: MockBackendResponse) -> axum::response::Response {
    match response {
        MockBackendResponse::Transactions(transactions) => Json(transactions).into_response(),
        MockBackendResponse::Raw(body) => (
            StatusCode::OK,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        MockBackendResponse::ServerError => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "database unavailable" })),
        )
            .into_response(),
    }
}

/// Transactions spread over consecutive months starting at `start`
/// (`YYYY-MM`), one income and one expense record per month.
pub fn monthly_transactions(start: &str, months: &[(f64, f64)]) -> Vec<RawTransaction> {
    let start: crate::models::YearMonth = start.parse().unwrap();
    months
        .iter()
        .enumerate()
        .flat_map(|(i, &(income, expense))| {
            let month = start.checked_add_months(i as u32).unwrap();
            let date = format!("{}-15T09:30:00.000Z", month);
            vec![
                RawTransaction::new(&date, income, "income"),
                RawTransaction::new(&date, expense, "expense"),
            ]
        })
        .collect()
}
