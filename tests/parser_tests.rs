//! Integration tests for descriptor parsing
//!
//! These tests verify:
//! - Plans mirror the document order of `versions`
//! - Mode overlays stay in their own scope
//! - Unknown keys are reported with their exact context
//! - Option precedence between configuration and descriptor
//! - Loading from files

use std::io::Write;

use marabunta::{
    AddonKind, Config, DescriptorParser, MigrationError, Phase, SchemaError, YAML_EXAMPLE,
    parse_descriptor,
};

fn config() -> Config {
    Config::new().with_database("odoodb")
}

const TWO_VERSIONS: &str = r#"
migration:
  versions:
    - version: 0.0.1
      operations:
        pre:
          - echo hi
      modes:
        demo:
          operations:
            post:
              - echo bye
    - version: 0.0.2
"#;

// =============================================================================
// Plan Shape
// =============================================================================

#[test]
fn test_two_version_scenario() {
    let plan = parse_descriptor(TWO_VERSIONS, &config()).expect("valid descriptor");
    assert_eq!(plan.len(), 2);

    let first = &plan.versions()[0];
    assert_eq!(first.number(), "0.0.1");
    let base_pre: Vec<_> = first.operations(Phase::Pre, None).collect();
    assert_eq!(base_pre.len(), 1);
    assert_eq!(base_pre[0].command, "echo hi");
    assert_eq!(base_pre[0].mode, None);

    let demo_post: Vec<_> = first.operations(Phase::Post, Some("demo")).collect();
    assert_eq!(demo_post.len(), 1);
    assert_eq!(demo_post[0].command, "echo bye");
    assert_eq!(demo_post[0].mode.as_deref(), Some("demo"));

    let second = &plan.versions()[1];
    assert_eq!(second.number(), "0.0.2");
    assert!(second.all_operations().is_empty());
    assert!(second.all_addons().is_empty());
}

#[test]
fn test_mode_isolation() {
    let plan = parse_descriptor(TWO_VERSIONS, &config()).expect("valid descriptor");
    let first = &plan.versions()[0];

    // demo's post operation never leaks into the base scope...
    assert_eq!(first.operations(Phase::Post, None).count(), 0);
    // ...and the base pre operation never shows up under demo
    assert_eq!(first.operations(Phase::Pre, Some("demo")).count(), 0);
}

#[test]
fn test_example_descriptor() {
    let plan = parse_descriptor(YAML_EXAMPLE, &config()).expect("example is valid");
    assert_eq!(plan.len(), 4);

    let first = plan.version("0.0.1").expect("first version");
    assert_eq!(
        first.addons(AddonKind::Upgrade, None).collect::<Vec<_>>(),
        vec!["base"]
    );
    assert_eq!(
        first.addons(AddonKind::Install, None).collect::<Vec<_>>(),
        vec!["document"]
    );
    let prod_post: Vec<_> = first
        .operations(Phase::Post, Some("prod"))
        .map(|op| op.command.as_str())
        .collect();
    assert_eq!(prod_post, vec!["anthem songs::load_production_data"]);

    let last = plan.version("0.0.4").expect("last version");
    assert_eq!(
        last.addons(AddonKind::Upgrade, None).collect::<Vec<_>>(),
        vec!["popeye"]
    );
}

#[test]
fn test_commands_copied_verbatim() {
    let input = r#"
migration:
  versions:
    - version: 1.0.0
      operations:
        pre:
          - "  padded  command  "
          - anthem songs.upgrade::main --flag='a b'
"#;
    let plan = parse_descriptor(input, &config()).expect("valid descriptor");
    let commands: Vec<_> = plan.versions()[0]
        .operations(Phase::Pre, None)
        .map(|op| op.command.clone())
        .collect();
    assert_eq!(
        commands,
        vec![
            "  padded  command  ".to_string(),
            "anthem songs.upgrade::main --flag='a b'".to_string()
        ]
    );
}

// =============================================================================
// Schema Errors
// =============================================================================

fn schema_error(input: &str) -> SchemaError {
    match parse_descriptor(input, &config()) {
        Err(MigrationError::Schema(err)) => err,
        other => panic!("expected a schema error, got {:?}", other),
    }
}

#[test]
fn test_unknown_addons_key() {
    let err = schema_error(
        r#"
migration:
  versions:
    - version: 0.0.1
      addons:
        delete:
          - crm
"#,
    );
    assert_eq!(err.context(), "addons");
    assert_eq!(err.extra_keys(), ["delete".to_string()]);
    assert_eq!(err.example(), YAML_EXAMPLE);
}

#[test]
fn test_unknown_key_at_every_level() {
    let cases = [
        ("migration:\n  bogus: 1", "migration", "bogus"),
        (
            "migration:\n  versions:\n    - version: 1\n      bogus: 1",
            "versions",
            "bogus",
        ),
        (
            "migration:\n  versions:\n    - version: 1\n      operations:\n        bogus: []",
            "operations",
            "bogus",
        ),
        (
            "migration:\n  versions:\n    - version: 1\n      modes:\n        prod:\n          bogus: 1",
            "prod",
            "bogus",
        ),
        (
            "migration:\n  versions:\n    - version: 1\n      modes:\n        prod:\n          addons:\n            bogus: []",
            "addons",
            "bogus",
        ),
    ];

    for (input, context, key) in cases {
        let err = schema_error(input);
        assert_eq!(err.context(), context, "input: {}", input);
        assert_eq!(err.extra_keys(), [key.to_string()], "input: {}", input);
    }
}

#[test]
fn test_first_violation_aborts() {
    // the second version is broken; no partial plan comes back
    let input = "migration:\n  versions:\n    - version: 1\n    - version: 2\n      operations:\n        pre: ls";
    let err = schema_error(input);
    assert_eq!(err, SchemaError::wrong_type("pre", "list"));
}

#[test]
fn test_error_message_includes_example() {
    let err = parse_descriptor("migration:\n  bogus: 1", &config()).expect_err("invalid");
    let message = err.to_string();
    assert!(message.contains("migration: the keys [\"bogus\"] are unexpected"));
    assert!(message.contains("allowed keys: [\"options\", \"versions\"]"));
    assert!(message.contains("anthem songs::install"));
}

#[test]
fn test_missing_root_and_empty_input() {
    assert_eq!(
        schema_error("other:\n  versions: []"),
        SchemaError::missing_key("migration")
    );

    let err = parse_descriptor("", &config()).expect_err("empty input");
    assert!(err.is_configuration());
}

// =============================================================================
// Options
// =============================================================================

#[test]
fn test_config_overrides_descriptor_options() {
    let config = config().with_odoo_cmd("/usr/bin/odoo");
    let plan = parse_descriptor(YAML_EXAMPLE, &config).expect("valid");
    let options = plan.versions()[0].options();
    assert_eq!(options.command.as_deref(), Some("/usr/bin/odoo"));
    // not overridden: still from the descriptor
    assert_eq!(options.args, vec!["--log-level=debug".to_string()]);
    assert_eq!(options.dsn, "dbname=odoodb");
}

#[test]
fn test_unknown_option_keys_ignored() {
    let input = "migration: {options: {odoo_cmd: odoo, odoo_workers: 4}, versions: []}";
    let plan = parse_descriptor(input, &config()).expect("extra option keys are ignored");
    assert!(plan.is_empty());
    let options = plan.options().expect("options resolved");
    assert_eq!(options.command.as_deref(), Some("odoo"));
}

#[test]
fn test_empty_migration_block_is_missing() {
    assert_eq!(
        schema_error("migration: {}"),
        SchemaError::missing_key("migration")
    );
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    file.write_all(YAML_EXAMPLE.as_bytes()).expect("write");

    let plan = DescriptorParser::new(config())
        .load_from_file(file.path())
        .expect("loads")
        .parse()
        .expect("parses");
    assert_eq!(plan.len(), 4);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let result = DescriptorParser::new(config()).load_from_file(dir.path().join("missing.yml"));
    assert!(matches!(result, Err(MigrationError::Io(_))));
}

#[test]
fn test_plan_json_output() {
    let plan = parse_descriptor(TWO_VERSIONS, &config()).expect("valid");
    let json: serde_json::Value = serde_json::to_value(&plan).expect("serializes");
    let versions = json["versions"].as_array().expect("versions array");
    assert_eq!(versions.len(), 2);
    assert_eq!(versions[0]["number"], "0.0.1");
    assert_eq!(versions[0]["operations"][1]["mode"], "demo");
    assert!(json["options"].get("dsn").is_none());
}
