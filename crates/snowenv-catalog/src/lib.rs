//! Warehouse access for environment provisioning
//!
//! One [`Session`] trait covers statement execution against Snowflake; the
//! per-kind [`ObjectDiscovery`] strategies sit on top of it and normalize
//! the warehouse's heterogeneous metadata surfaces (INFORMATION_SCHEMA
//! queries vs. `SHOW` commands) into plain object records.
//!
//! Enable the real Snowflake session via the `snowflake` cargo feature;
//! without it only the [`MockSession`] is usable, which is enough for the
//! whole test suite.

pub mod discovery;
pub mod mock;
pub mod session;
pub mod snowflake;

pub use discovery::{
    FunctionDiscovery, MaskingPolicyDiscovery, ObjectDiscovery, TableDiscovery,
};
pub use mock::MockSession;
pub use session::{CatalogError, Row, Session};
pub use snowflake::{SnowflakeSession, SnowflakeSessionBuilder};
