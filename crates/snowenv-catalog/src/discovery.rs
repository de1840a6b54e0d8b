//! Per-kind object discovery
//!
//! Each kind of schema object is enumerated through a different Snowflake
//! surface: tables and views through a structured INFORMATION_SCHEMA
//! query, functions and masking policies through `SHOW` commands with
//! fixed positional layouts. One strategy per kind hides the difference
//! behind [`ObjectDiscovery`].

use crate::session::{CatalogError, Session};
use async_trait::async_trait;
use snowenv_core::{EnvironmentName, ObjectRecord};
use tracing::debug;

/// Enumerates objects of one kind inside a target database.
#[async_trait]
pub trait ObjectDiscovery: Send + Sync {
    /// Kind label used in logs and summaries.
    fn kind(&self) -> &'static str;

    async fn discover(
        &self,
        session: &dyn Session,
        env: &EnvironmentName,
    ) -> Result<Vec<ObjectRecord>, CatalogError>;
}

/// Tables and views, via `INFORMATION_SCHEMA.TABLES`, restricted to
/// objects owned by the given role.
pub struct TableDiscovery {
    owner_role: String,
}

impl TableDiscovery {
    pub fn new(owner_role: impl Into<String>) -> Self {
        Self { owner_role: owner_role.into() }
    }
}

#[async_trait]
impl ObjectDiscovery for TableDiscovery {
    fn kind(&self) -> &'static str {
        "tables"
    }

    async fn discover(
        &self,
        session: &dyn Session,
        env: &EnvironmentName,
    ) -> Result<Vec<ObjectRecord>, CatalogError> {
        let sql = format!(
            "SELECT TABLE_TYPE, TABLE_SCHEMA, TABLE_NAME \
             FROM {}.INFORMATION_SCHEMA.TABLES \
             WHERE TABLE_OWNER = '{}'",
            env.quoted(),
            self.owner_role,
        );

        let rows = session.execute(&sql).await?;
        debug!(env = %env, rows = rows.len(), "table discovery");

        rows.iter()
            .map(|row| {
                Ok(ObjectRecord::relation(
                    row.column(0)?,
                    env.as_str(),
                    row.column(1)?,
                    row.column(2)?,
                ))
            })
            .collect()
    }
}

// SHOW USER FUNCTIONS column positions: created_on, name, schema_name,
// is_builtin, is_aggregate, is_ansi, min_num_arguments, max_num_arguments,
// arguments, description, catalog_name, ...
const FUNCTION_NAME: usize = 1;
const FUNCTION_SCHEMA: usize = 2;
const FUNCTION_ARGUMENTS: usize = 8;
const FUNCTION_CATALOG: usize = 10;

/// User-defined functions, via `SHOW USER FUNCTIONS`.
#[derive(Default)]
pub struct FunctionDiscovery;

impl FunctionDiscovery {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObjectDiscovery for FunctionDiscovery {
    fn kind(&self) -> &'static str {
        "functions"
    }

    async fn discover(
        &self,
        session: &dyn Session,
        env: &EnvironmentName,
    ) -> Result<Vec<ObjectRecord>, CatalogError> {
        let sql = format!("SHOW USER FUNCTIONS IN DATABASE {}", env.quoted());
        let rows = session.execute(&sql).await?;

        let mut records = Vec::new();
        for row in &rows {
            // SHOW is not always reliably scoped by session context; keep
            // only rows the warehouse attributes to the target database.
            if row.column(FUNCTION_CATALOG)? != env.as_str() {
                continue;
            }

            records.push(ObjectRecord::function(
                env.as_str(),
                row.column(FUNCTION_SCHEMA)?,
                row.column(FUNCTION_NAME)?,
                signature_text(row.column(FUNCTION_ARGUMENTS)?),
            ));
        }

        debug!(env = %env, rows = rows.len(), kept = records.len(), "function discovery");
        Ok(records)
    }
}

/// The `arguments` column reads `NAME(ARG, ...) RETURN TYPE`; the record
/// keeps everything from the opening parenthesis on, RETURN clause
/// included.
fn signature_text(arguments: &str) -> &str {
    match arguments.find('(') {
        Some(start) => &arguments[start..],
        None => arguments,
    }
}

// SHOW MASKING POLICIES column positions: created_on, name, database_name,
// schema_name, kind, owner, comment. The qualifiers sit between the name
// and the owner, not next to each other in listing order.
const POLICY_NAME: usize = 1;
const POLICY_DATABASE: usize = 2;
const POLICY_SCHEMA: usize = 3;

/// Masking policies, via `SHOW MASKING POLICIES`.
///
/// Unlike tables and functions, every listed policy is kept regardless of
/// its current owner.
// TODO: confirm with the data platform team whether policies should be
// owner-filtered like tables are; today every listed policy transfers.
#[derive(Default)]
pub struct MaskingPolicyDiscovery;

impl MaskingPolicyDiscovery {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ObjectDiscovery for MaskingPolicyDiscovery {
    fn kind(&self) -> &'static str {
        "masking policies"
    }

    async fn discover(
        &self,
        session: &dyn Session,
        env: &EnvironmentName,
    ) -> Result<Vec<ObjectRecord>, CatalogError> {
        let sql = format!("SHOW MASKING POLICIES IN DATABASE {}", env.quoted());
        let rows = session.execute(&sql).await?;
        debug!(env = %env, rows = rows.len(), "masking policy discovery");

        rows.iter()
            .map(|row| {
                Ok(ObjectRecord::masking_policy(
                    row.column(POLICY_DATABASE)?,
                    row.column(POLICY_SCHEMA)?,
                    row.column(POLICY_NAME)?,
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSession;
    use crate::session::Row;
    use pretty_assertions::assert_eq;
    use snowenv_core::ObjectKind;

    fn function_row(name: &str, schema: &str, arguments: &str, catalog: &str) -> Row {
        Row::from_values([
            "2024-05-01 00:00:00.000",
            name,
            schema,
            "N",
            "N",
            "Y",
            "1",
            "1",
            arguments,
            "user-defined function",
            catalog,
        ])
    }

    #[tokio::test]
    async fn tables_project_type_schema_name() {
        let session = MockSession::new();
        session
            .respond_with(
                "INFORMATION_SCHEMA.TABLES",
                vec![
                    Row::from_values(["BASE TABLE", "PUBLIC", "ORDERS"]),
                    Row::from_values(["VIEW", "REPORTING", "ORDERS_BY_DAY"]),
                ],
            )
            .await;

        let env = EnvironmentName::new("acme-dev");
        let records = TableDiscovery::new("DBT_PRODUCTION")
            .discover(&session, &env)
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, ObjectKind::Relation { keyword: "TABLE".to_string() });
        assert_eq!(records[0].schema, "PUBLIC");
        assert_eq!(records[0].name, "ORDERS");
        assert_eq!(records[0].database, "acme_dev");
        assert_eq!(records[1].kind, ObjectKind::Relation { keyword: "VIEW".to_string() });
    }

    #[tokio::test]
    async fn table_query_filters_by_owner() {
        let session = MockSession::new();
        let env = EnvironmentName::new("acme_dev");
        TableDiscovery::new("DBT_PRODUCTION")
            .discover(&session, &env)
            .await
            .unwrap();

        let executed = session.executed().await;
        assert_eq!(executed.len(), 1);
        assert!(executed[0].contains("TABLE_OWNER = 'DBT_PRODUCTION'"));
        assert!(executed[0].contains("\"acme_dev\".INFORMATION_SCHEMA.TABLES"));
    }

    #[tokio::test]
    async fn functions_keep_only_target_catalog() {
        let session = MockSession::new();
        session
            .respond_with(
                "SHOW USER FUNCTIONS",
                vec![
                    function_row("FISCAL_QUARTER", "ANALYTICS", "FISCAL_QUARTER(DATE) RETURN VARCHAR", "acme_dev"),
                    function_row("LEFTOVER", "PUBLIC", "LEFTOVER(NUMBER) RETURN NUMBER", "OTHER_DB"),
                ],
            )
            .await;

        let env = EnvironmentName::new("acme_dev");
        let records = FunctionDiscovery::new().discover(&session, &env).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "FISCAL_QUARTER");
        assert_eq!(records[0].schema, "ANALYTICS");
        assert_eq!(records[0].signature.as_deref(), Some("(DATE) RETURN VARCHAR"));
    }

    #[tokio::test]
    async fn policies_map_positional_qualifiers() {
        let session = MockSession::new();
        session
            .respond_with(
                "SHOW MASKING POLICIES",
                vec![Row::from_values([
                    "2024-05-01 00:00:00.000",
                    "PII_MASK",
                    "acme_dev",
                    "GOVERNANCE",
                    "MASKING_POLICY",
                    "SECURITYADMIN",
                    "",
                ])],
            )
            .await;

        let env = EnvironmentName::new("acme_dev");
        let records = MaskingPolicyDiscovery::new().discover(&session, &env).await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].database, "acme_dev");
        assert_eq!(records[0].schema, "GOVERNANCE");
        assert_eq!(records[0].name, "PII_MASK");
    }

    #[tokio::test]
    async fn policies_are_kept_regardless_of_owner() {
        let session = MockSession::new();
        session
            .respond_with(
                "SHOW MASKING POLICIES",
                vec![
                    Row::from_values(["t", "A", "acme_dev", "S1", "MASKING_POLICY", "DBT_PRODUCTION", ""]),
                    Row::from_values(["t", "B", "acme_dev", "S2", "MASKING_POLICY", "SOMEONE_ELSE", ""]),
                ],
            )
            .await;

        let env = EnvironmentName::new("acme_dev");
        let records = MaskingPolicyDiscovery::new().discover(&session, &env).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn discovery_failure_propagates() {
        let session = MockSession::new();
        session
            .fail_with("INFORMATION_SCHEMA.TABLES", CatalogError::PermissionDenied("no".to_string()))
            .await;

        let env = EnvironmentName::new("acme_dev");
        let result = TableDiscovery::new("DBT_PRODUCTION").discover(&session, &env).await;
        assert!(matches!(result, Err(CatalogError::PermissionDenied(_))));
    }

    #[tokio::test]
    async fn short_function_row_is_invalid_response() {
        let session = MockSession::new();
        session
            .respond_with("SHOW USER FUNCTIONS", vec![Row::from_values(["t", "F", "S"])])
            .await;

        let env = EnvironmentName::new("acme_dev");
        let result = FunctionDiscovery::new().discover(&session, &env).await;
        assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
    }

    #[test]
    fn signature_starts_at_opening_paren() {
        assert_eq!(
            signature_text("FISCAL_QUARTER(DATE) RETURN VARCHAR"),
            "(DATE) RETURN VARCHAR"
        );
        assert_eq!(
            signature_text("ADD2(A NUMBER, B NUMBER) RETURN NUMBER"),
            "(A NUMBER, B NUMBER) RETURN NUMBER"
        );
        // No parenthesis at all: pass the text through untouched.
        assert_eq!(signature_text("WEIRD"), "WEIRD");
    }
}
