//! Ownership transfer orchestration

use crate::ddl::render_ownership_transfer;
use crate::EngineError;
use snowenv_catalog::{
    FunctionDiscovery, MaskingPolicyDiscovery, ObjectDiscovery, Session, TableDiscovery,
};
use snowenv_core::{EnvironmentName, ObjectKind, PRODUCTION_OWNER_ROLE};
use tracing::{info, warn};

/// Per-kind counts of transferred objects, for the operator summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferSummary {
    pub tables: usize,
    pub functions: usize,
    pub masking_policies: usize,
}

impl TransferSummary {
    pub fn total(&self) -> usize {
        self.tables + self.functions + self.masking_policies
    }
}

/// Drives discovery and statement rendering across all object kinds.
///
/// Kinds run in a fixed order (tables and views, then functions, then
/// masking policies) so audit logs read the same way every run. Each
/// grant executes on the shared session; the first failure aborts the
/// remainder of the sequence.
pub struct OwnershipTransfer {
    source_owner_role: String,
}

impl OwnershipTransfer {
    pub fn new() -> Self {
        Self {
            source_owner_role: PRODUCTION_OWNER_ROLE.to_string(),
        }
    }

    /// Override the role whose objects are discovered for transfer.
    pub fn with_source_owner(role: impl Into<String>) -> Self {
        Self {
            source_owner_role: role.into(),
        }
    }

    pub async fn run(
        &self,
        session: &dyn Session,
        env: &EnvironmentName,
        target_role: &str,
    ) -> Result<TransferSummary, EngineError> {
        if target_role.trim().is_empty() {
            warn!(env = %env, "no target role given; skipping ownership transfer");
            return Ok(TransferSummary::default());
        }

        let discoveries: [Box<dyn ObjectDiscovery>; 3] = [
            Box::new(TableDiscovery::new(self.source_owner_role.clone())),
            Box::new(FunctionDiscovery::new()),
            Box::new(MaskingPolicyDiscovery::new()),
        ];

        let mut summary = TransferSummary::default();
        for discovery in &discoveries {
            let records = discovery.discover(session, env).await?;
            info!(
                env = %env,
                kind = discovery.kind(),
                count = records.len(),
                "transferring ownership"
            );

            for record in &records {
                let statement = render_ownership_transfer(env, record, target_role);
                session.execute(statement.as_str()).await?;

                match record.kind {
                    ObjectKind::Relation { .. } => summary.tables += 1,
                    ObjectKind::Function => summary.functions += 1,
                    ObjectKind::MaskingPolicy => summary.masking_policies += 1,
                }
            }
        }

        Ok(summary)
    }
}

impl Default for OwnershipTransfer {
    fn default() -> Self {
        Self::new()
    }
}
