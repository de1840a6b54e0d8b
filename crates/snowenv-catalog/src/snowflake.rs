//! Snowflake session over the `snowflake-api` crate
//!
//! Compiled behind the `snowflake` cargo feature. Without the feature the
//! builder still exists but `build()` returns a configuration error
//! telling the operator which feature to rebuild with.
//!
//! Result sets arrive either as Arrow record batches or as JSON (Snowflake
//! picks per statement; `SHOW` commands usually come back as JSON). Both
//! are flattened into positional [`Row`]s of display strings, which is all
//! the discovery layer needs.

use crate::session::{CatalogError, Row, Session};
use async_trait::async_trait;
use snowenv_core::ConnectionConfig;

#[cfg(feature = "snowflake")]
use snowflake_api::SnowflakeApi;

/// Builder for [`SnowflakeSession`].
pub struct SnowflakeSessionBuilder {
    account: String,
    username: String,
    password: String,
    role: Option<String>,
    warehouse: Option<String>,
    database: Option<String>,
}

impl SnowflakeSessionBuilder {
    pub fn new(
        account: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            account: account.into(),
            username: username.into(),
            password: password.into(),
            role: None,
            warehouse: None,
            database: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    #[cfg(feature = "snowflake")]
    pub fn build(self) -> Result<SnowflakeSession, CatalogError> {
        let api = SnowflakeApi::with_password_auth(
            &self.account,
            self.warehouse.as_deref(),
            self.database.as_deref(),
            None, // schema
            &self.username,
            self.role.as_deref(),
            &self.password,
        )
        .map_err(|e| {
            CatalogError::Authentication(format!("Failed to authenticate with Snowflake: {e}"))
        })?;

        Ok(SnowflakeSession { api })
    }

    #[cfg(not(feature = "snowflake"))]
    pub fn build(self) -> Result<SnowflakeSession, CatalogError> {
        Err(CatalogError::Config(
            "Snowflake support not compiled. Rebuild with: cargo build --features snowflake"
                .to_string(),
        ))
    }
}

/// Live Snowflake session.
pub struct SnowflakeSession {
    #[cfg(feature = "snowflake")]
    api: SnowflakeApi,

    #[cfg(not(feature = "snowflake"))]
    _phantom: std::marker::PhantomData<()>,
}

impl SnowflakeSession {
    /// Builder pre-filled from connection configuration.
    pub fn connect(config: &ConnectionConfig) -> SnowflakeSessionBuilder {
        SnowflakeSessionBuilder::new(&config.account, &config.username, &config.password)
            .with_role(&config.role)
    }
}

#[async_trait]
impl Session for SnowflakeSession {
    #[cfg(feature = "snowflake")]
    async fn execute(&self, sql: &str) -> Result<Vec<Row>, CatalogError> {
        use snowflake_api::QueryResult;

        tracing::debug!(statement = sql, "executing");

        let result = self.api.exec(sql).await.map_err(map_exec_error)?;

        match result {
            QueryResult::Arrow(batches) => rows_from_batches(&batches),
            QueryResult::Json(json) => rows_from_json(&json.value),
            QueryResult::Empty => Ok(Vec::new()),
        }
    }

    #[cfg(not(feature = "snowflake"))]
    async fn execute(&self, _sql: &str) -> Result<Vec<Row>, CatalogError> {
        Err(CatalogError::Config(
            "Snowflake support not compiled. Rebuild with: cargo build --features snowflake"
                .to_string(),
        ))
    }
}

#[cfg(feature = "snowflake")]
fn map_exec_error(e: snowflake_api::SnowflakeApiError) -> CatalogError {
    let message = e.to_string();
    if message.contains("Insufficient privileges") || message.contains("Permission") {
        CatalogError::PermissionDenied(message)
    } else if message.contains("network") || message.contains("connection") {
        CatalogError::Network(message)
    } else {
        CatalogError::Query(message)
    }
}

#[cfg(feature = "snowflake")]
fn rows_from_batches(batches: &[arrow_array::RecordBatch]) -> Result<Vec<Row>, CatalogError> {
    use arrow_array::Array;
    use arrow_cast::display::{ArrayFormatter, FormatOptions};

    let options = FormatOptions::default();
    let mut rows = Vec::new();

    for batch in batches {
        let formatters = batch
            .columns()
            .iter()
            .map(|array| ArrayFormatter::try_new(array.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        for row_index in 0..batch.num_rows() {
            let mut cells = Vec::with_capacity(formatters.len());
            for (column_index, formatter) in formatters.iter().enumerate() {
                if batch.column(column_index).is_null(row_index) {
                    cells.push(None);
                } else {
                    cells.push(Some(formatter.value(row_index).to_string()));
                }
            }
            rows.push(Row::new(cells));
        }
    }

    Ok(rows)
}

#[cfg(feature = "snowflake")]
fn rows_from_json(value: &serde_json::Value) -> Result<Vec<Row>, CatalogError> {
    let rows = value
        .as_array()
        .ok_or_else(|| CatalogError::InvalidResponse("expected a JSON array of rows".to_string()))?;

    rows.iter()
        .map(|row| {
            let cells = row.as_array().ok_or_else(|| {
                CatalogError::InvalidResponse("expected each JSON row to be an array".to_string())
            })?;
            Ok(Row::new(cells.iter().map(json_cell).collect()))
        })
        .collect()
}

#[cfg(feature = "snowflake")]
fn json_cell(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
