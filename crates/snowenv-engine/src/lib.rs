//! Environment provisioning engine
//!
//! Statement rendering, ownership-transfer orchestration, and the
//! create/drop lifecycle commands. Everything here speaks through the
//! [`Session`](snowenv_catalog::Session) trait, so the whole engine runs
//! against the mock session in tests.

pub mod ddl;
pub mod lifecycle;
pub mod transfer;

pub use ddl::{render_create, render_drop, render_ownership_transfer, Statement};
pub use lifecycle::{create_environment, drop_environment};
pub use transfer::{OwnershipTransfer, TransferSummary};

use snowenv_catalog::CatalogError;

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
