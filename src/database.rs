//! Database descriptor
//!
//! The parser never builds a connection string itself: it asks a
//! [`DatabaseDescriptor`] once per parse and stores the answer in the
//! resolved options. [`Database`] is the stock implementation, producing a
//! libpq keyword/value string.

use crate::config::{Config, non_empty};
use crate::error::{MigrationError, Result};

/// Builds the DSN handed to the migration executor.
pub trait DatabaseDescriptor {
    /// Resolve the connection string for `config`.
    ///
    /// Fails with [`MigrationError::Configuration`] when the configuration
    /// cannot describe a database.
    fn dsn(&self, config: &Config) -> Result<String>;
}

/// libpq keyword/value DSN (`dbname=odoo user=odoo host=db port=5432`).
///
/// Unset fields are left out so libpq falls back to its own defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Database;

impl DatabaseDescriptor for Database {
    fn dsn(&self, config: &Config) -> Result<String> {
        let dbname = non_empty(&config.database).ok_or_else(|| {
            MigrationError::configuration("a database name is required to build the DSN")
        })?;

        let port = config.db_port.map(|p| p.to_string());
        let params = [
            ("dbname", Some(dbname)),
            ("user", non_empty(&config.db_user)),
            ("password", non_empty(&config.db_password)),
            ("host", non_empty(&config.db_host)),
            ("port", port.as_deref()),
        ];

        Ok(params
            .iter()
            .filter_map(|(key, value)| value.map(|v| format!("{}={}", key, quote(v))))
            .collect::<Vec<_>>()
            .join(" "))
    }
}

/// Quote a libpq value when it contains whitespace, quotes or backslashes.
fn quote(value: &str) -> String {
    if !value.is_empty()
        && !value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\')
    {
        return value.to_string();
    }

    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{}'", escaped)
}
