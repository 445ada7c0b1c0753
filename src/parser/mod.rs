//! Descriptor parser: turns a YAML migration descriptor into a [`MigrationPlan`].
//!
//! # Pipeline
//!
//! ```text
//! input ──▶ load (serde_yaml::Value)
//!             │
//!             ▼
//!        migration root ── check_keys {options, versions}
//!             │
//!             ├──▶ options::resolve (once, shared by Arc)
//!             │
//!             └──▶ versions[i] ──▶ build_version
//!                                    ├── operations / addons (base)
//!                                    └── modes.<name> ── operations / addons
//! ```
//!
//! Validation is fail-fast: the first violation aborts the parse and no
//! partial plan is returned. Nothing here executes commands or touches a
//! database; the DSN is obtained from a [`DatabaseDescriptor`].

mod actions;
mod version;

pub use actions::{collect_addons, collect_operations};
pub use version::build_version;

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde_yaml::Value;
use tracing::{debug, info};

use crate::config::Config;
use crate::database::{Database, DatabaseDescriptor};
use crate::error::{MigrationError, Result, SchemaError};
use crate::model::MigrationPlan;
use crate::options;
use crate::schema::{self, MIGRATION_KEYS};

/// Loads one descriptor and compiles it into a [`MigrationPlan`].
///
/// ```ignore
/// use marabunta::{Config, DescriptorParser};
///
/// let config = Config::from_env();
/// let plan = DescriptorParser::new(config)
///     .load_from_file("migration.yml")?
///     .parse()?;
/// println!("{}", plan.summary());
/// ```
pub struct DescriptorParser {
    config: Config,
    database: Box<dyn DatabaseDescriptor>,
    document: Option<Value>,
}

impl DescriptorParser {
    /// Create a parser using the stock libpq DSN builder
    pub fn new(config: Config) -> Self {
        Self {
            config,
            database: Box::new(Database),
            document: None,
        }
    }

    /// Replace the DSN builder
    pub fn with_database(mut self, database: impl DatabaseDescriptor + 'static) -> Self {
        self.database = Box::new(database);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the descriptor from an in-memory YAML string.
    ///
    /// Blank input loads nothing; [`parse`](Self::parse) then reports a
    /// configuration error.
    pub fn load_from_str(mut self, input: &str) -> Result<Self> {
        self.document = if input.trim().is_empty() {
            None
        } else {
            Some(serde_yaml::from_str(input)?)
        };
        Ok(self)
    }

    /// Load the descriptor from a reader, consuming it entirely.
    pub fn load_from_reader<R: Read>(self, mut reader: R) -> Result<Self> {
        let mut input = String::new();
        reader.read_to_string(&mut input)?;
        self.load_from_str(&input)
    }

    /// Load the descriptor from a file. The file is closed before returning.
    pub fn load_from_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        debug!("Loading migration descriptor from {:?}", path.as_ref());
        let file = File::open(path.as_ref())?;
        self.load_from_reader(file)
    }

    /// Validate the loaded document and build the plan.
    pub fn parse(&self) -> Result<MigrationPlan> {
        let root = self
            .document
            .as_ref()
            .filter(|doc| !schema::is_blank(doc))
            .ok_or_else(|| MigrationError::configuration("no migration descriptor supplied"))?;

        // an empty `migration` block is as good as none
        let migration = root
            .as_mapping()
            .and_then(|m| m.get("migration"))
            .filter(|node| !schema::is_blank(node))
            .ok_or_else(|| SchemaError::missing_key("migration"))?;
        let migration = schema::check_keys(MIGRATION_KEYS, migration, "migration")?;

        let options = options::resolve(
            migration.get("options"),
            &self.config,
            self.database.as_ref(),
        )?;
        let options = Arc::new(options);

        let versions = match migration.get("versions") {
            None => &[][..],
            Some(node) if schema::is_blank(node) => &[][..],
            Some(Value::Sequence(entries)) => entries.as_slice(),
            Some(_) => return Err(SchemaError::wrong_type("versions", "list").into()),
        };

        let versions = versions
            .iter()
            .map(|entry| build_version(entry, &options))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        info!("Parsed migration descriptor: {} versions", versions.len());
        Ok(MigrationPlan::new(options, versions))
    }
}

/// Parse a descriptor held in memory with the stock DSN builder.
pub fn parse_descriptor(input: &str, config: &Config) -> Result<MigrationPlan> {
    DescriptorParser::new(config.clone())
        .load_from_str(input)?
        .parse()
}
