//! External configuration
//!
//! Values supplied outside the descriptor (command line, environment). Each
//! `odoo_*` field overrides the matching entry of the descriptor's `options`
//! block; the database fields only feed the DSN builder.

use serde::Serialize;

/// Environment variables read by [`Config::from_env`]
pub mod env {
    pub const DATABASE: &str = "MARABUNTA_DATABASE";
    pub const DB_USER: &str = "MARABUNTA_DB_USER";
    pub const DB_PASSWORD: &str = "MARABUNTA_DB_PASSWORD";
    pub const DB_HOST: &str = "MARABUNTA_DB_HOST";
    pub const DB_PORT: &str = "MARABUNTA_DB_PORT";
    pub const ODOO_CMD: &str = "MARABUNTA_ODOO_CMD";
    pub const ODOO_ARGS: &str = "MARABUNTA_ODOO_ARGS";
    pub const ODOO_ADDONS_PATH: &str = "MARABUNTA_ODOO_ADDONS_PATH";
}

/// External configuration provider.
///
/// Unset and empty values are equivalent: neither overrides the descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Config {
    pub odoo_cmd: Option<String>,
    pub odoo_args: Option<String>,
    pub odoo_addons_path: Option<String>,

    pub database: Option<String>,
    pub db_user: Option<String>,
    #[serde(skip_serializing)]
    pub db_password: Option<String>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the `MARABUNTA_*` environment variables.
    ///
    /// An unparsable `MARABUNTA_DB_PORT` is ignored with a warning rather
    /// than failing: the DSN builder decides whether a port is required.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_port = lookup(env::DB_PORT).and_then(|raw| match raw.trim().parse() {
            Ok(port) => Some(port),
            Err(e) => {
                tracing::warn!("Ignoring {}={:?}: {}", env::DB_PORT, raw, e);
                None
            }
        });

        Self {
            odoo_cmd: lookup(env::ODOO_CMD),
            odoo_args: lookup(env::ODOO_ARGS),
            odoo_addons_path: lookup(env::ODOO_ADDONS_PATH),
            database: lookup(env::DATABASE),
            db_user: lookup(env::DB_USER),
            db_password: lookup(env::DB_PASSWORD),
            db_host: lookup(env::DB_HOST),
            db_port,
        }
    }

    /// Override the command used to run odoo
    pub fn with_odoo_cmd(mut self, cmd: impl Into<String>) -> Self {
        self.odoo_cmd = Some(cmd.into());
        self
    }

    /// Override the extra odoo arguments (whitespace separated)
    pub fn with_odoo_args(mut self, args: impl Into<String>) -> Self {
        self.odoo_args = Some(args.into());
        self
    }

    /// Override the addons path
    pub fn with_odoo_addons_path(mut self, path: impl Into<String>) -> Self {
        self.odoo_addons_path = Some(path.into());
        self
    }

    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.database = Some(name.into());
        self
    }

    pub fn with_db_user(mut self, user: impl Into<String>) -> Self {
        self.db_user = Some(user.into());
        self
    }

    pub fn with_db_password(mut self, password: impl Into<String>) -> Self {
        self.db_password = Some(password.into());
        self
    }

    pub fn with_db_host(mut self, host: impl Into<String>) -> Self {
        self.db_host = Some(host.into());
        self
    }

    pub fn with_db_port(mut self, port: u16) -> Self {
        self.db_port = Some(port);
        self
    }
}

/// A configured value, with empty strings treated as unset.
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
