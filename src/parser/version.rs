//! Version entries
//!
//! A version is its base `operations`/`addons` blocks plus one overlay per
//! entry of `modes`. All of them feed the same [`VersionBuilder`], each
//! action tagged with the scope it came from.

use std::sync::Arc;

use serde_yaml::Value;
use tracing::debug;

use super::actions::{collect_addons, collect_operations};
use crate::error::SchemaError;
use crate::model::{ResolvedOptions, Version, VersionBuilder};
use crate::schema::{self, MODE_KEYS, VERSION_KEYS};

/// Build one [`Version`] from an entry of the `versions` list.
pub fn build_version(node: &Value, options: &Arc<ResolvedOptions>) -> Result<Version, SchemaError> {
    let entry = schema::check_keys(VERSION_KEYS, node, "versions")?;

    let number = match entry.get("version").filter(|value| !value.is_null()) {
        None => return Err(SchemaError::missing_key("version")),
        Some(value) => {
            schema::scalar_text(value).ok_or_else(|| SchemaError::wrong_type("version", "string"))?
        }
    };

    let mut version = VersionBuilder::new(number, Arc::clone(options));

    if let Some(operations) = schema::get(entry, "operations") {
        collect_operations(&mut version, operations, None)?;
    }
    if let Some(addons) = schema::get(entry, "addons") {
        collect_addons(&mut version, addons, None)?;
    }

    // unlike the other blocks, an explicit `modes:` with no value is an error
    if let Some(modes) = entry.get("modes") {
        let Value::Mapping(modes) = modes else {
            return Err(SchemaError::not_a_mapping("modes"));
        };
        for (name, mode) in modes {
            let name = schema::key_text(name);
            let block = schema::check_keys(MODE_KEYS, mode, &name)?;
            version.declare_mode(name.as_str());

            if let Some(operations) = schema::get(block, "operations") {
                collect_operations(&mut version, operations, Some(name.as_str()))?;
            }
            if let Some(addons) = schema::get(block, "addons") {
                collect_addons(&mut version, addons, Some(name.as_str()))?;
            }
        }
    }

    let version = version.finish();
    debug!(
        "Parsed version {}: {} operations, {} addon actions, modes {:?}",
        version.number(),
        version.all_operations().len(),
        version.all_addons().len(),
        version.modes().collect::<Vec<_>>()
    );
    Ok(version)
}
