//! DDL/DCL statement rendering
//!
//! Pure functions from (operation, object identity, role) to statement
//! text. Caller-originated identifiers arrive here already normalized as
//! [`EnvironmentName`]s and are interpolated quoted; warehouse-reported
//! identifiers (schema and object names from discovery) are trusted
//! verbatim but still rendered quoted.

use snowenv_core::{quote_ident, EnvironmentName, ObjectKind, ObjectRecord, PUBLIC_ROLE};
use std::fmt;

/// A fully rendered statement, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement(String);

impl Statement {
    fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The create-phase statements, in execution order: clone the source
/// database, hand the database and all its schemas to the target role
/// (revoking whatever grants the clone carried over), then open read-side
/// USAGE to PUBLIC.
pub fn render_create(
    env: &EnvironmentName,
    source_database: &str,
    target_role: &str,
) -> Vec<Statement> {
    vec![
        Statement::new(format!(
            "CREATE OR REPLACE DATABASE {} CLONE {}",
            env.quoted(),
            quote_ident(source_database),
        )),
        Statement::new(format!(
            "GRANT OWNERSHIP ON DATABASE {} TO ROLE {} REVOKE CURRENT GRANTS",
            env.quoted(),
            target_role,
        )),
        Statement::new(format!(
            "GRANT OWNERSHIP ON ALL SCHEMAS IN DATABASE {} TO ROLE {} REVOKE CURRENT GRANTS",
            env.quoted(),
            target_role,
        )),
        Statement::new(format!(
            "GRANT USAGE ON DATABASE {} TO ROLE {}",
            env.quoted(),
            PUBLIC_ROLE,
        )),
    ]
}

/// Conditional drop; succeeds whether or not the database exists.
pub fn render_drop(env: &EnvironmentName) -> Statement {
    Statement::new(format!("DROP DATABASE IF EXISTS {}", env.quoted()))
}

/// One GRANT OWNERSHIP statement for a discovered object.
pub fn render_ownership_transfer(
    env: &EnvironmentName,
    record: &ObjectRecord,
    target_role: &str,
) -> Statement {
    let object = match &record.kind {
        ObjectKind::Relation { keyword } => format!(
            "{} {}.{}.{}",
            keyword,
            env.quoted(),
            quote_ident(&record.schema),
            quote_ident(&record.name),
        ),
        ObjectKind::Function => format!(
            "FUNCTION {}.{}.{}{}",
            env.quoted(),
            quote_ident(&record.schema),
            quote_ident(&record.name),
            argument_list(record.signature.as_deref().unwrap_or("()")),
        ),
        // Policies qualify by the database the listing reported, not the
        // environment parameter.
        ObjectKind::MaskingPolicy => format!(
            "MASKING POLICY {}.{}.{}",
            quote_ident(&record.database),
            quote_ident(&record.schema),
            quote_ident(&record.name),
        ),
    };

    Statement::new(format!(
        "GRANT OWNERSHIP ON {object} TO ROLE {target_role} REVOKE CURRENT GRANTS"
    ))
}

/// The warehouse reports a function signature with its return clause
/// attached (`(A NUMBER) RETURN NUMBER`); only the pre-RETURN portion is
/// the argument list needed to disambiguate overloads.
fn argument_list(signature: &str) -> &str {
    match signature.find(" RETURN ") {
        Some(end) => signature[..end].trim_end(),
        None => signature.trim_end(),
    }
}
