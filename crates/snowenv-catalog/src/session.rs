//! Warehouse session trait and positional row representation

use async_trait::async_trait;

/// One result row, positional.
///
/// Snowflake's introspection surfaces disagree on shape: structured
/// INFORMATION_SCHEMA queries project exactly the columns asked for, while
/// `SHOW` commands return a fixed wide layout. Rows are therefore kept as
/// positional cells and each consumer maps the positions it knows about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row(Vec<Option<String>>);

impl Row {
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self(cells)
    }

    /// Build a row of non-null cells, mostly for tests and fixtures.
    pub fn from_values<I>(cells: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self(cells.into_iter().map(|c| Some(c.into())).collect())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|c| c.as_deref())
    }

    /// Cell at `index`, or an invalid-response error when the cell is
    /// missing or NULL.
    pub fn column(&self, index: usize) -> Result<&str, CatalogError> {
        self.get(index).ok_or_else(|| {
            CatalogError::InvalidResponse(format!(
                "row has no value at column {index} (row width {})",
                self.0.len()
            ))
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Errors surfaced by warehouse access.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// An open warehouse session.
///
/// All statements of one invocation run sequentially on a single session;
/// the transaction helpers below are plain statements so that a mock can
/// observe them like any other.
#[async_trait]
pub trait Session: Send + Sync {
    /// Execute one statement and return its result rows (empty for
    /// DDL/DCL statements).
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, CatalogError>;

    async fn begin(&self) -> Result<(), CatalogError> {
        self.execute("BEGIN").await.map(|_| ())
    }

    async fn commit(&self) -> Result<(), CatalogError> {
        self.execute("COMMIT").await.map(|_| ())
    }

    async fn rollback(&self) -> Result<(), CatalogError> {
        self.execute("ROLLBACK").await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn row_positional_access() {
        let row = Row::from_values(["BASE TABLE", "PUBLIC", "ORDERS"]);
        assert_eq!(row.len(), 3);
        assert_eq!(row.get(0), Some("BASE TABLE"));
        assert_eq!(row.get(2), Some("ORDERS"));
        assert_eq!(row.get(3), None);
    }

    #[test]
    fn null_cell_reads_as_none() {
        let row = Row::new(vec![Some("a".to_string()), None]);
        assert_eq!(row.get(0), Some("a"));
        assert_eq!(row.get(1), None);
    }

    #[test]
    fn missing_column_is_invalid_response() {
        let row = Row::from_values(["only"]);
        let err = row.column(4).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidResponse(_)));
    }
}
