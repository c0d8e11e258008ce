//! Transaction sources
//!
//! A source never fails from the pipeline's point of view: any fetch or
//! decode problem is logged and reported as an empty transaction list, which
//! the forecaster then treats as insufficient history.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::Result;
use crate::models::RawTransaction;

/// Supplies the transactions a forecast is computed from
#[async_trait]
pub trait TransactionSource: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Fetch every transaction; empty on any failure
    async fn fetch_transactions(&self) -> Vec<RawTransaction>;
}

/// Fetches transactions from the finance backend's REST API
#[derive(Clone)]
pub struct HttpTransactionSource {
    http_client: Client,
    base_url: String,
    timeout: Duration,
}

impl HttpTransactionSource {
    /// Create a source for `base_url` (transactions at `<base_url>/transactions`)
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.url, config.timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transactions_url(&self) -> String {
        format!("{}/transactions", self.base_url)
    }

    /// Fetch and decode, surfacing the failure cause
    pub async fn try_fetch(&self) -> Result<Vec<RawTransaction>> {
        let response = self
            .http_client
            .get(self.transactions_url())
            .timeout(self.timeout)
            .send()
            .await?
            .error_for_status()?;

        let transactions = response.json::<Vec<RawTransaction>>().await?;
        Ok(transactions)
    }
}

#[async_trait]
impl TransactionSource for HttpTransactionSource {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch_transactions(&self) -> Vec<RawTransaction> {
        match self.try_fetch().await {
            Ok(transactions) => {
                debug!(
                    url = %self.transactions_url(),
                    count = transactions.len(),
                    "Fetched transactions"
                );
                transactions
            }
            Err(e) => {
                warn!(
                    url = %self.transactions_url(),
                    error = %e,
                    "Failed to fetch transactions; continuing with none"
                );
                vec![]
            }
        }
    }
}

/// A fixed, in-memory transaction list
#[derive(Debug, Clone, Default)]
pub struct StaticTransactionSource {
    transactions: Vec<RawTransaction>,
}

impl StaticTransactionSource {
    pub fn new(transactions: Vec<RawTransaction>) -> Self {
        Self { transactions }
    }

    /// Decode a JSON array of transactions
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(content)?))
    }
}

#[async_trait]
impl TransactionSource for StaticTransactionSource {
    fn name(&self) -> &'static str {
        "static"
    }

    async fn fetch_transactions(&self) -> Vec<RawTransaction> {
        self.transactions.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockBackendResponse, MockBackendServer};

    #[tokio::test]
    async fn test_http_source_fetches_transactions() {
        let server = MockBackendServer::start(MockBackendResponse::Transactions(vec![
            RawTransaction::new("2024-01-05T00:00:00.000Z", 100.0, "income"),
            RawTransaction::new("2024-01-06T00:00:00.000Z", 40.0, "expense"),
        ]))
        .await;

        let source = HttpTransactionSource::new(&server.url(), Duration::from_secs(5));
        let transactions = source.fetch_transactions().await;

        assert_eq!(transactions.len(), 2);
        assert_eq!(transactions[0].kind.as_deref(), Some("income"));
    }

    #[tokio::test]
    async fn test_http_source_empty_on_server_error() {
        let server = MockBackendServer::start(MockBackendResponse::ServerError).await;
        let source = HttpTransactionSource::new(&server.url(), Duration::from_secs(5));

        assert!(source.try_fetch().await.is_err());
        assert!(source.fetch_transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_http_source_empty_on_malformed_body() {
        let server = MockBackendServer::start(MockBackendResponse::Raw(
            r#"{"error": "not a list"}"#.to_string(),
        ))
        .await;
        let source = HttpTransactionSource::new(&server.url(), Duration::from_secs(5));

        assert!(source.fetch_transactions().await.is_empty());
    }

    #[tokio::test]
    async fn test_http_source_empty_when_unreachable() {
        // Bind then drop a listener so the port is very likely closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let source =
            HttpTransactionSource::new(&format!("http://{}", addr), Duration::from_secs(2));
        assert!(source.fetch_transactions().await.is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let source =
            HttpTransactionSource::new("http://backend/api/finance/", Duration::from_secs(1));
        assert_eq!(source.base_url(), "http://backend/api/finance");
        assert_eq!(
            source.transactions_url(),
            "http://backend/api/finance/transactions"
        );
    }

    #[tokio::test]
    async fn test_static_source_from_json() {
        let source = StaticTransactionSource::from_json(
            r#"[{"date": "2024-02-01", "amount": 10, "type": "expense"}]"#,
        )
        .unwrap();
        let transactions = source.fetch_transactions().await;
        assert_eq!(transactions.len(), 1);
        assert_eq!(transactions[0].amount, Some(10.0));
    }

    #[test]
    fn test_static_source_rejects_non_array() {
        assert!(StaticTransactionSource::from_json("{}").is_err());
    }
}
