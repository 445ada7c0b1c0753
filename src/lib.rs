//! Marabunta migration descriptor library
//!
//! Compiles a YAML migration descriptor into a validated [`MigrationPlan`]:
//! an ordered list of versions, each with its pre/post operations and addon
//! actions, base and per-mode, sharing one set of resolved options. Running
//! the plan is left to the caller.

pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod model;
pub mod options;
pub mod parser;
pub mod schema;

// Re-export main types for convenience
pub use config::Config;
pub use database::{Database, DatabaseDescriptor};
pub use error::{MigrationError, Result, SchemaError};
pub use model::{
    AddonAction, AddonKind, MigrationPlan, Operation, Phase, ResolvedOptions, Version,
    VersionBuilder,
};
pub use parser::{DescriptorParser, parse_descriptor};
pub use schema::YAML_EXAMPLE;
