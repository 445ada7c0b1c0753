use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Config;

/// Marabunta - compile and check Odoo migration descriptors
#[derive(Parser)]
#[command(name = "marabunta")]
#[command(about = "Validate a migration descriptor and show the resulting plan")]
#[command(version)]
pub struct Cli {
    /// Log parser internals (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub database: DatabaseArgs,

    #[command(flatten)]
    pub odoo: OdooArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Database connection, used to build the DSN.
///
/// Each flag overrides the matching `MARABUNTA_*` environment variable.
#[derive(Args, Debug, Default)]
pub struct DatabaseArgs {
    /// Database name
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// Database user
    #[arg(short = 'u', long, global = true)]
    pub db_user: Option<String>,

    /// Database password
    #[arg(short = 'w', long, global = true)]
    pub db_password: Option<String>,

    /// Database host
    #[arg(short = 'H', long, global = true)]
    pub db_host: Option<String>,

    /// Database port
    #[arg(short = 'p', long, global = true)]
    pub db_port: Option<u16>,
}

/// Overrides for the descriptor's `options` block.
///
/// Each flag overrides the matching `MARABUNTA_ODOO_*` environment variable.
#[derive(Args, Debug, Default)]
pub struct OdooArgs {
    /// Command used to run odoo
    #[arg(long, global = true)]
    pub odoo_cmd: Option<String>,

    /// Extra odoo arguments (whitespace separated)
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub odoo_args: Option<String>,

    /// Addons path passed to odoo
    #[arg(long, global = true)]
    pub odoo_addons_path: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check that a descriptor is valid
    Validate {
        /// Path to the migration descriptor
        #[arg(env = "MARABUNTA_FILE")]
        file: PathBuf,
    },
    /// Print the plan compiled from a descriptor
    Plan {
        /// Path to the migration descriptor
        #[arg(env = "MARABUNTA_FILE")]
        file: PathBuf,

        /// Print the plan as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Print an example descriptor
    Example,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// External configuration: command line flags over the environment
    pub fn config(&self) -> Config {
        self.config_over(Config::from_env())
    }

    fn config_over(&self, base: Config) -> Config {
        Config {
            odoo_cmd: self.odoo.odoo_cmd.clone().or(base.odoo_cmd),
            odoo_args: self.odoo.odoo_args.clone().or(base.odoo_args),
            odoo_addons_path: self.odoo.odoo_addons_path.clone().or(base.odoo_addons_path),
            database: self.database.database.clone().or(base.database),
            db_user: self.database.db_user.clone().or(base.db_user),
            db_password: self.database.db_password.clone().or(base.db_password),
            db_host: self.database.db_host.clone().or(base.db_host),
            db_port: self.database.db_port.or(base.db_port),
        }
    }
}
