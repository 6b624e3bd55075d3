//! Config defaults and validation tests for acless-config.
// crates/acless-config/tests/config_validation.rs
// =============================================================================
// Module: Config Defaults and Validation Tests
// Description: Validate default behavior and config invariants.
// Purpose: Ensure minimal config is valid and invalid tables fail closed.
// =============================================================================

use acless_config::MAX_ARGS_BYTES_LIMIT;
use acless_core::PolicyProvider;
use common::assert_invalid;

mod common;

type TestResult = Result<(), String>;

#[test]
fn default_config_validates() -> TestResult {
    let config = common::minimal_config().map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())?;
    if config.policy.authorization_tag() != "acless" {
        return Err("authorization tag should default to acless".to_string());
    }
    if config.policy.array_argument_tag() != "acless_array_arg" {
        return Err("array tag should default to acless_array_arg".to_string());
    }
    if !config.audit.enabled || config.audit.path.is_some() {
        return Err("audit should default to enabled on stderr".to_string());
    }
    if !config.sanitize.require_schema || config.sanitize.strip_unknown {
        return Err("sanitize defaults should fail closed".to_string());
    }
    if config.sanitize.max_args_bytes != 64 * 1024 {
        return Err("max_args_bytes should default to 64 KiB".to_string());
    }
    Ok(())
}

#[test]
fn empty_tag_name_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.policy.authorization_tag = String::new();
    assert_invalid(config.validate(), "policy.authorization_tag must be non-empty")
}

#[test]
fn whitespace_in_tag_name_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.policy.array_argument_tag = "array arg".to_string();
    assert_invalid(config.validate(), "must not contain whitespace")
}

#[test]
fn identical_tag_names_are_rejected() -> TestResult {
    let config = common::config_from_toml(
        r#"
[policy]
authorization_tag = "api"
array_argument_tag = "api"
"#,
    )
    .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "must differ")
}

#[test]
fn max_args_bytes_bounds_are_enforced() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.sanitize.max_args_bytes = 0;
    assert_invalid(config.validate(), "greater than zero")?;
    config.sanitize.max_args_bytes = MAX_ARGS_BYTES_LIMIT + 1;
    assert_invalid(config.validate(), "sanitize.max_args_bytes exceeds")?;
    config.sanitize.max_args_bytes = MAX_ARGS_BYTES_LIMIT;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn blank_audit_path_is_rejected() -> TestResult {
    let mut config = common::minimal_config().map_err(|err| err.to_string())?;
    config.audit.path = Some("   ".to_string());
    assert_invalid(config.validate(), "audit.path must be non-empty")
}

#[test]
fn duplicate_models_are_rejected() -> TestResult {
    let config = common::config_from_toml(
        r#"
[[models]]
name = "Article"
[[models]]
name = "Article"
"#,
    )
    .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "duplicate model: Article")
}

#[test]
fn duplicate_members_of_same_kind_are_rejected() -> TestResult {
    let config = common::config_from_toml(
        r#"
[[models]]
name = "Article"
[[models.members]]
name = "title"
kind = "method"
[[models.members]]
name = "title"
kind = "method"
"#,
    )
    .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "duplicate method Article.title")
}

#[test]
fn same_name_across_kinds_is_allowed() -> TestResult {
    let config = common::config_from_toml(
        r#"
[[models]]
name = "Article"
[[models.members]]
name = "title"
kind = "method"
[[models.members]]
name = "title"
kind = "property"
tags = ["acless"]
"#,
    )
    .map_err(|err| err.to_string())?;
    config.validate().map_err(|err| err.to_string())
}

#[test]
fn unknown_member_kind_fails_to_parse() -> TestResult {
    let parsed = common::config_from_toml(
        r#"
[[models]]
name = "Article"
[[models.members]]
name = "title"
kind = "field"
"#,
    );
    if parsed.is_ok() {
        return Err("unknown member kind should fail to parse".to_string());
    }
    Ok(())
}

#[test]
fn blank_model_name_is_rejected() -> TestResult {
    let config = common::config_from_toml(
        r#"
[[models]]
name = " "
"#,
    )
    .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "models.name must be non-empty")
}

#[test]
fn scalar_params_schema_is_rejected() -> TestResult {
    let config = common::config_from_toml(
        r#"
[[models]]
name = "Article"
[[models.members]]
name = "list"
kind = "method"
params_schema = "object"
"#,
    )
    .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "params_schema must be an object or boolean")
}

#[test]
fn member_tag_with_whitespace_is_rejected() -> TestResult {
    let config = common::config_from_toml(
        r#"
[[models]]
name = "Article"
[[models.members]]
name = "list"
kind = "method"
tags = ["acl ess"]
"#,
    )
    .map_err(|err| err.to_string())?;
    assert_invalid(config.validate(), "must not contain whitespace")
}
