//! Environment name normalization and identifier quoting

use serde::Serialize;
use std::fmt;

/// A warehouse database name for a development environment.
///
/// Raw names typically come from git branch names or CI variables and may
/// contain hyphens, which Snowflake does not accept in an identifier.
/// Construction replaces every hyphen with an underscore; the rest of the
/// system only ever sees the normalized form, so normalization happens
/// exactly once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentName(String);

impl EnvironmentName {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().replace('-', "_"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name rendered as a quoted identifier, ready for interpolation
    /// into DDL text.
    pub fn quoted(&self) -> String {
        quote_ident(&self.0)
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render a double-quoted Snowflake identifier, doubling any embedded
/// double quote.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hyphens_become_underscores() {
        let env = EnvironmentName::new("feature-add-orders-model");
        assert_eq!(env.as_str(), "feature_add_orders_model");
        assert!(!env.as_str().contains('-'));
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = EnvironmentName::new("acme-dev");
        let twice = EnvironmentName::new(once.as_str());
        assert_eq!(once, twice);
    }

    #[test]
    fn clean_names_pass_through() {
        let env = EnvironmentName::new("ACME_DEV");
        assert_eq!(env.as_str(), "ACME_DEV");
    }

    #[test]
    fn quoting_wraps_and_escapes() {
        assert_eq!(quote_ident("acme_dev"), "\"acme_dev\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn quoted_uses_normalized_form() {
        let env = EnvironmentName::new("acme-dev");
        assert_eq!(env.quoted(), "\"acme_dev\"");
    }
}
