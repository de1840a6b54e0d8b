//! Discovered schema objects

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a schema-scoped object eligible for ownership transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Table-like relation. `keyword` is the object-type token used in
    /// GRANT statements (`TABLE`, `VIEW`, ...).
    Relation { keyword: String },

    /// User-defined function, possibly overloaded by argument types.
    Function,

    /// Column-level masking policy.
    MaskingPolicy,
}

impl ObjectKind {
    /// Build a relation kind from a raw INFORMATION_SCHEMA table type.
    ///
    /// Snowflake reports base tables as `BASE TABLE`, which is not a valid
    /// GRANT object type; any other reported value (`VIEW`, ...) is already
    /// usable as-is.
    pub fn relation(raw_table_type: &str) -> Self {
        let keyword = match raw_table_type {
            "BASE TABLE" => "TABLE".to_string(),
            other => other.to_string(),
        };
        Self::Relation { keyword }
    }
}

/// A single object discovered in a cloned environment.
///
/// Records are produced by one discovery round-trip and consumed
/// immediately by the statement builder; they are never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub kind: ObjectKind,

    /// Qualifying database. The environment name for tables and functions;
    /// for masking policies this is the database reported by the listing.
    pub database: String,

    pub schema: String,

    pub name: String,

    /// Raw declared signature text, populated only for functions. Includes
    /// the trailing `RETURN <type>` clause exactly as reported; truncation
    /// happens at render time.
    pub signature: Option<String>,
}

impl ObjectRecord {
    pub fn relation(
        raw_table_type: &str,
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: ObjectKind::relation(raw_table_type),
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
            signature: None,
        }
    }

    pub fn function(
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            kind: ObjectKind::Function,
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
            signature: Some(signature.into()),
        }
    }

    pub fn masking_policy(
        database: impl Into<String>,
        schema: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            kind: ObjectKind::MaskingPolicy,
            database: database.into(),
            schema: schema.into(),
            name: name.into(),
            signature: None,
        }
    }

    /// Dotted three-part name, for logging.
    pub fn fqn(&self) -> String {
        format!("{}.{}.{}", self.database, self.schema, self.name)
    }
}

impl fmt::Display for ObjectRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fqn())
    }
}
