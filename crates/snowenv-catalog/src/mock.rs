//! Mock warehouse session for testing
//!
//! Stores canned result rows in memory, records every executed statement,
//! and can inject failures for specific statements. No warehouse, no
//! credentials.
//!
//! ```rust,ignore
//! let session = MockSession::new();
//! session
//!     .respond_with("SHOW MASKING POLICIES", vec![Row::from_values([
//!         "2024-01-01", "PII_MASK", "ACME_DEV", "GOVERNANCE", "MASKING_POLICY", "SYSADMIN", "",
//!     ])])
//!     .await;
//!
//! let rows = session.execute("SHOW MASKING POLICIES IN DATABASE \"ACME_DEV\"").await?;
//! assert_eq!(session.executed().await.len(), 1);
//! ```

use crate::session::{CatalogError, Row, Session};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory [`Session`] double.
///
/// Responses and injected errors are keyed by a statement fragment; the
/// first configured fragment contained in the executed statement wins.
/// Statements with no configured response succeed with zero rows, which
/// matches how DDL/DCL executes against the real warehouse.
#[derive(Clone, Default)]
pub struct MockSession {
    responses: Arc<RwLock<Vec<(String, Vec<Row>)>>>,
    failures: Arc<RwLock<Vec<(String, CatalogError)>>>,
    executed: Arc<RwLock<Vec<String>>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `rows` for any statement containing `fragment`.
    pub async fn respond_with(&self, fragment: impl Into<String>, rows: Vec<Row>) {
        self.responses.write().await.push((fragment.into(), rows));
    }

    /// Fail any statement containing `fragment` with `error`.
    pub async fn fail_with(&self, fragment: impl Into<String>, error: CatalogError) {
        self.failures.write().await.push((fragment.into(), error));
    }

    /// Every statement executed so far, in order. Failed statements are
    /// recorded too; the attempt happened.
    pub async fn executed(&self) -> Vec<String> {
        self.executed.read().await.clone()
    }

    pub async fn statement_count(&self) -> usize {
        self.executed.read().await.len()
    }

    /// Statements containing `fragment`, in execution order.
    pub async fn executed_matching(&self, fragment: &str) -> Vec<String> {
        self.executed
            .read()
            .await
            .iter()
            .filter(|s| s.contains(fragment))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl Session for MockSession {
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, CatalogError> {
        self.executed.write().await.push(sql.to_string());

        if let Some((_, error)) = self
            .failures
            .read()
            .await
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
        {
            return Err(error.clone());
        }

        let responses = self.responses.read().await;
        let rows = responses
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_statements_in_order() {
        let session = MockSession::new();
        session.execute("BEGIN").await.unwrap();
        session.execute("SELECT 1").await.unwrap();
        session.execute("COMMIT").await.unwrap();

        assert_eq!(session.executed().await, vec!["BEGIN", "SELECT 1", "COMMIT"]);
        assert_eq!(session.statement_count().await, 3);
    }

    #[tokio::test]
    async fn serves_rows_by_fragment() {
        let session = MockSession::new();
        session
            .respond_with("SHOW USER FUNCTIONS", vec![Row::from_values(["x"])])
            .await;

        let rows = session
            .execute("SHOW USER FUNCTIONS IN DATABASE \"ACME_DEV\"")
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);

        let none = session.execute("SELECT 1").await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn injected_failure_still_records_the_attempt() {
        let session = MockSession::new();
        session
            .fail_with("GRANT OWNERSHIP", CatalogError::PermissionDenied("nope".to_string()))
            .await;

        let result = session
            .execute("GRANT OWNERSHIP ON DATABASE \"X\" TO ROLE Y REVOKE CURRENT GRANTS")
            .await;
        assert!(matches!(result, Err(CatalogError::PermissionDenied(_))));
        assert_eq!(session.statement_count().await, 1);
    }

    #[tokio::test]
    async fn transaction_helpers_are_plain_statements() {
        let session = MockSession::new();
        session.begin().await.unwrap();
        session.rollback().await.unwrap();

        assert_eq!(session.executed().await, vec!["BEGIN", "ROLLBACK"]);
    }
}
