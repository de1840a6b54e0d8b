//! snowenv core
//!
//! Domain model shared across the workspace: environment names, discovered
//! object records, and connection configuration.

pub mod config;
pub mod ident;
pub mod object;

pub use config::{ConfigError, ConnectionConfig, PRODUCTION_OWNER_ROLE, PUBLIC_ROLE, SOURCE_DATABASE};
pub use ident::{quote_ident, EnvironmentName};
pub use object::{ObjectKind, ObjectRecord};
