// crates/acless-config/tests/common/mod.rs
// =============================================================================
// Module: Config Test Helpers
// Description: Shared helpers for config validation tests.
// Purpose: Reduce duplication across integration tests for acless-config.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use acless_config::AclessConfig;
use acless_config::ConfigError;

/// Parses a TOML string into an `AclessConfig` for tests.
pub fn config_from_toml(toml_str: &str) -> Result<AclessConfig, toml::de::Error> {
    toml::from_str(toml_str)
}

/// Returns a minimal config with all defaults applied.
pub fn minimal_config() -> Result<AclessConfig, toml::de::Error> {
    config_from_toml("")
}

/// Article model with one authorized method and one untagged property.
pub const ARTICLE_TOML: &str = r#"
[[models]]
name = "Article"

[[models.members]]
name = "list"
kind = "method"
tags = ["acless"]
params_schema = { type = "object", properties = { page = { type = "integer" } } }

[[models.members]]
name = "bulk"
kind = "method"
tags = ["acless", "acless_array_arg"]

[[models.members]]
name = "secret"
kind = "property"
tag_values = { role = ["admin"] }
"#;

/// Asserts that a result is an invalid-config error containing `needle`.
pub fn assert_invalid<T>(result: Result<T, ConfigError>, needle: &str) -> Result<(), String> {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config".to_string()),
    }
}
