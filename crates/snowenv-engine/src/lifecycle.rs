//! Environment lifecycle commands
//!
//! `create` and `drop` each run inside one transaction on the shared
//! session: `BEGIN`, the environment-level DDL (plus, on create, the full
//! ownership transfer), then `COMMIT`, or `ROLLBACK` on the first error.

use crate::ddl::{render_create, render_drop};
use crate::transfer::{OwnershipTransfer, TransferSummary};
use crate::EngineError;
use snowenv_catalog::Session;
use snowenv_core::EnvironmentName;
use tracing::{info, warn};

/// Clone a new environment from `source_database` and hand everything in
/// it to `target_role`.
pub async fn create_environment(
    session: &dyn Session,
    raw_name: &str,
    target_role: &str,
    source_database: &str,
) -> Result<TransferSummary, EngineError> {
    let env = EnvironmentName::new(raw_name);
    info!(env = %env, source = source_database, "creating environment");

    session.begin().await?;
    let result = create_in_tx(session, &env, target_role, source_database).await;
    finish(session, result).await
}

async fn create_in_tx(
    session: &dyn Session,
    env: &EnvironmentName,
    target_role: &str,
    source_database: &str,
) -> Result<TransferSummary, EngineError> {
    for statement in render_create(env, source_database, target_role) {
        session.execute(statement.as_str()).await?;
    }

    OwnershipTransfer::new().run(session, env, target_role).await
}

/// Drop an environment. Succeeds when the database does not exist.
pub async fn drop_environment(
    session: &dyn Session,
    raw_name: &str,
) -> Result<(), EngineError> {
    let env = EnvironmentName::new(raw_name);
    info!(env = %env, "dropping environment");

    session.begin().await?;
    let result = session
        .execute(render_drop(&env).as_str())
        .await
        .map(|_| ())
        .map_err(EngineError::from);
    finish(session, result).await
}

/// Commit on success, roll back on failure. A rollback failure is logged
/// and swallowed; the original error is what the caller needs.
async fn finish<T>(
    session: &dyn Session,
    result: Result<T, EngineError>,
) -> Result<T, EngineError> {
    match result {
        Ok(value) => {
            session.commit().await?;
            Ok(value)
        }
        Err(error) => {
            if let Err(rollback) = session.rollback().await {
                warn!(error = %rollback, "rollback failed");
            }
            Err(error)
        }
    }
}
