//! Descriptor schema checks
//!
//! Every mapping in a descriptor has a closed set of allowed keys. The check
//! is the same at each nesting level, so it lives here once:
//!
//! | Context            | Allowed keys                                   |
//! |--------------------|------------------------------------------------|
//! | `migration`        | `options`, `versions`                          |
//! | `versions` (entry) | `version`, `operations`, `addons`, `modes`     |
//! | `operations`       | `pre`, `post`                                  |
//! | `addons`           | `upgrade`, `install`, `remove`                 |
//! | `<mode name>`      | `operations`, `addons`                         |
//!
//! Fewer keys than allowed is always fine: partial documents are legal.

use std::collections::BTreeSet;

use serde_yaml::{Mapping, Value};

use crate::error::SchemaError;

pub const MIGRATION_KEYS: &[&str] = &["options", "versions"];
pub const VERSION_KEYS: &[&str] = &["version", "operations", "addons", "modes"];
pub const OPERATION_KEYS: &[&str] = &["pre", "post"];
pub const ADDON_KEYS: &[&str] = &["upgrade", "install", "remove"];
pub const MODE_KEYS: &[&str] = &["operations", "addons"];

/// Reference descriptor attached to every schema error.
pub const YAML_EXAMPLE: &str = r#"
migration:
  options:
    # --workers=0 --stop-after-init --no-xmlrpc are automatically added
    # These options are overridden by the corresponding command line arguments
    odoo_cmd: odoo
    odoo_args: --log-level=debug
  versions:
    - version: 0.0.1
      operations:
        pre:  # executed before 'addons'
          - echo 'pre-operation'
        post:  # executed after 'addons'
          - anthem songs::install
      addons:
        upgrade:  # executed with -u flag ...
          - base
        install:  # executed with -i flag ...
          - document
        # remove:  # uninstalled with a python script
      modes:
        prod:
          operations:
            pre:
              - echo 'pre-operation executed only when the mode is prod'
            post:
              - anthem songs::load_production_data
        demo:
          operations:
            post:
              - anthem songs::load_demo_data
          addons:
            upgrade:
              - demo_addon

    - version: 0.0.2
      # nothing to do

    - version: 0.0.3
      operations:
        pre:
          - echo 'foobar'
          - ls
          - bin/script_test.sh
        post:
          - echo 'post-op'

    - version: 0.0.4
      addons:
        upgrade:
          - popeye
"#;

/// Keys present in `keys` but absent from `allowed`.
pub fn unexpected_keys<'a, I>(allowed: &[&str], keys: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter(|key| !allowed.contains(key))
        .map(str::to_string)
        .collect()
}

/// Check that `node` is a mapping whose keys all belong to `allowed`.
///
/// Returns the mapping on success so the caller can descend into it without
/// re-matching the value.
pub fn check_keys<'v>(
    allowed: &[&str],
    node: &'v Value,
    context: &str,
) -> Result<&'v Mapping, SchemaError> {
    let Value::Mapping(mapping) = node else {
        return Err(SchemaError::not_a_mapping(context));
    };

    let keys: Vec<String> = mapping.keys().map(key_text).collect();
    let extra = unexpected_keys(allowed, keys.iter().map(String::as_str));
    if !extra.is_empty() {
        let allowed: BTreeSet<&str> = allowed.iter().copied().collect();
        return Err(SchemaError::UnexpectedKeys {
            context: context.to_string(),
            extra: extra.into_iter().collect(),
            allowed: allowed.into_iter().map(str::to_string).collect(),
        });
    }

    Ok(mapping)
}

/// Render a mapping key as text. YAML allows non-string keys (`1: x`,
/// `true: y`); they are compared by their textual form.
pub fn key_text(key: &Value) -> String {
    scalar_text(key).unwrap_or_else(|| {
        serde_yaml::to_string(key)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default()
    })
}

/// Textual form of a scalar, `None` for null, sequences and mappings.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

/// True for values a descriptor treats as "not given": `null`, `false`,
/// zero, an empty string, an empty list and an empty mapping.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::Mapping(mapping) => mapping.is_empty(),
        Value::Tagged(tagged) => is_blank(&tagged.value),
    }
}

/// Look up an optional `key` in a mapping, treating a blank value as absent.
pub fn get<'v>(mapping: &'v Mapping, key: &str) -> Option<&'v Value> {
    mapping.get(key).filter(|value| !is_blank(value))
}
