//! Connection configuration read from the process environment

use std::fmt;

/// Database every new environment is cloned from.
pub const SOURCE_DATABASE: &str = "ANALYTICS_PRODUCTION";

/// Role that owns every object in the production source data. Objects in a
/// fresh clone still belong to this role until ownership is transferred.
pub const PRODUCTION_OWNER_ROLE: &str = "DBT_PRODUCTION";

/// Role granted USAGE on each new environment.
pub const PUBLIC_ROLE: &str = "PUBLIC";

/// Snowflake connection settings.
///
/// Constructed once at process entry and passed down; nothing else in the
/// workspace reads the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub account: String,
    pub username: String,
    pub password: String,
    pub role: String,
}

impl ConnectionConfig {
    /// Read the `SNOWFLAKE_*` variables from the process environment.
    ///
    /// Every variable is required; the first missing one fails the whole
    /// invocation before any warehouse call is made.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injected variable
    /// lookup, so tests never touch process-global state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| {
            lookup(name).ok_or_else(|| ConfigError::MissingVariable(name.to_string()))
        };

        Ok(Self {
            account: require("SNOWFLAKE_ACCOUNT")?,
            username: require("SNOWFLAKE_USERNAME")?,
            password: require("SNOWFLAKE_PASSWORD")?,
            role: require("SNOWFLAKE_ROLE")?,
        })
    }
}

// Manual Debug so the password never lands in logs or error output.
impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("account", &self.account)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    MissingVariable(String),
}
