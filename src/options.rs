//! Option resolution
//!
//! Each option comes from the first source that provides it:
//!
//! 1. external configuration ([`Config`], i.e. command line / environment)
//! 2. the descriptor's `migration.options` block
//! 3. the built-in default (unset, or no arguments)
//!
//! Resolution happens once per parse. The result is wrapped in an `Arc` by
//! the parser and shared, read-only, by every version of the plan.

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::config::{Config, non_empty};
use crate::database::DatabaseDescriptor;
use crate::error::{Result, SchemaError};
use crate::model::ResolvedOptions;
use crate::schema;

/// Merge external configuration, the descriptor's `options` block and the
/// defaults into one [`ResolvedOptions`].
///
/// `document_options` is the raw `options` node (`None` or blank when the
/// descriptor does not declare one). Keys other than `odoo_cmd`, `odoo_args`
/// and `odoo_addons_path` are ignored. The DSN comes from `database`; its
/// configuration errors are returned unchanged.
pub fn resolve(
    document_options: Option<&Value>,
    config: &Config,
    database: &dyn DatabaseDescriptor,
) -> Result<ResolvedOptions> {
    let empty = Mapping::new();
    let declared = match document_options {
        None => &empty,
        Some(node) if schema::is_blank(node) => &empty,
        Some(Value::Mapping(declared)) => declared,
        Some(_) => return Err(SchemaError::not_a_mapping("options").into()),
    };

    let command = pick(non_empty(&config.odoo_cmd), declared, "odoo_cmd")?;
    let args: Vec<String> = pick(non_empty(&config.odoo_args), declared, "odoo_args")?
        .map(|raw| raw.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    let addons_path = pick(
        non_empty(&config.odoo_addons_path),
        declared,
        "odoo_addons_path",
    )?;

    let dsn = database.dsn(config)?;

    debug!(
        "Resolved options: command={:?}, args={:?}, addons_path={:?}",
        command, args, addons_path
    );

    Ok(ResolvedOptions {
        command,
        args,
        addons_path,
        dsn,
    })
}

/// External value if set, else the declared one (ignoring empty strings).
fn pick(external: Option<&str>, declared: &Mapping, key: &str) -> Result<Option<String>> {
    if let Some(value) = external {
        return Ok(Some(value.to_string()));
    }

    let Some(node) = schema::get(declared, key) else {
        return Ok(None);
    };
    let text = schema::scalar_text(node).ok_or_else(|| SchemaError::wrong_type(key, "string"))?;
    Ok(Some(text).filter(|t| !t.is_empty()))
}
