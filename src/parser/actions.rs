//! Operations and addons blocks
//!
//! Both blocks are parsed the same way for the base scope and for every mode:
//! the caller passes the scope tag, and each element is appended to the
//! version builder in document order. No deduplication happens here, and an
//! addon listed for both install and remove is kept as-is.

use serde_yaml::Value;

use crate::error::SchemaError;
use crate::model::{AddonKind, Phase, VersionBuilder};
use crate::schema::{self, ADDON_KEYS, OPERATION_KEYS};

/// Parse an `operations` block (`pre` / `post` command lists).
///
/// A present key whose value is not a list, `null` included, is rejected.
pub fn collect_operations(
    version: &mut VersionBuilder,
    node: &Value,
    mode: Option<&str>,
) -> Result<(), SchemaError> {
    let operations = schema::check_keys(OPERATION_KEYS, node, "operations")?;

    for (key, commands) in operations {
        let key = schema::key_text(key);
        // check_keys leaves only `pre` and `post`
        let phase = match key.as_str() {
            "pre" => Phase::Pre,
            _ => Phase::Post,
        };
        for command in list_items(commands, &key)? {
            version.add_operation(phase, command, mode);
        }
    }

    Ok(())
}

/// Parse an `addons` block (`upgrade` / `install` / `remove` name lists).
///
/// Missing, `null` and empty values are no-ops.
pub fn collect_addons(
    version: &mut VersionBuilder,
    node: &Value,
    mode: Option<&str>,
) -> Result<(), SchemaError> {
    let addons = schema::check_keys(ADDON_KEYS, node, "addons")?;

    for kind in [AddonKind::Upgrade, AddonKind::Install, AddonKind::Remove] {
        let key = kind.to_string();
        let Some(names) = schema::get(addons, &key) else {
            continue;
        };
        version.add_addons(kind, list_items(names, &key)?, mode);
    }

    Ok(())
}

/// Elements of a list of scalars, rendered to text verbatim.
fn list_items(node: &Value, key: &str) -> Result<Vec<String>, SchemaError> {
    let Value::Sequence(items) = node else {
        return Err(SchemaError::wrong_type(key, "list"));
    };

    items
        .iter()
        .map(|item| {
            schema::scalar_text(item).ok_or_else(|| SchemaError::wrong_type(key, "list of strings"))
        })
        .collect()
}
