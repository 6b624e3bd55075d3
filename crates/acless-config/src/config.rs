// crates/acless-config/src/config.rs
// ============================================================================
// Module: Acless Configuration
// Description: Configuration loading and validation for the Acless gate.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: acless-core, serde, serde_json, toml
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Missing or invalid configuration fails closed: a gate is never built from a
//! config that did not pass [`AclessConfig::validate`].
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use acless_core::GateAuditSink;
use acless_core::GateFileAuditSink;
use acless_core::GateNoopAuditSink;
use acless_core::GateStderrAuditSink;
use acless_core::MemberKind;
use acless_core::MemberRegistry;
use acless_core::MemberTags;
use acless_core::PolicyProvider;
use acless_core::runtime::DEFAULT_ARRAY_ARGUMENT_TAG;
use acless_core::runtime::DEFAULT_AUTHORIZATION_TAG;
use acless_core::runtime::MAX_NAME_LENGTH;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "acless.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "ACLESS_CONFIG";
/// Maximum configuration file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of declared models.
pub const MAX_MODELS: usize = 1024;
/// Maximum number of declared members per model.
pub const MAX_MEMBERS_PER_MODEL: usize = 4096;
/// Maximum number of tags per member.
pub const MAX_TAGS_PER_MEMBER: usize = 64;
/// Default serialized argument size limit in bytes.
pub const DEFAULT_MAX_ARGS_BYTES: usize = 64 * 1024;
/// Upper bound for the serialized argument size limit in bytes.
pub const MAX_ARGS_BYTES_LIMIT: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Acless gate configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AclessConfig {
    /// Tag policy configuration.
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Audit logging configuration.
    #[serde(default)]
    pub audit: AuditConfig,
    /// Argument sanitation configuration.
    #[serde(default)]
    pub sanitize: SanitizeConfig,
    /// Declared models and their members.
    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl AclessConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.policy.validate()?;
        self.audit.validate()?;
        self.sanitize.validate()?;
        if self.models.len() > MAX_MODELS {
            return Err(ConfigError::Invalid(format!("models exceeds {MAX_MODELS} entries")));
        }
        let mut seen = BTreeSet::new();
        for model in &self.models {
            model.validate()?;
            if !seen.insert(model.name.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate model: {}", model.name)));
            }
        }
        Ok(())
    }

    /// Builds the member registry from the declared models.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a declaration is rejected by the
    /// registry.
    pub fn build_registry(&self) -> Result<MemberRegistry, ConfigError> {
        let mut registry = MemberRegistry::new();
        for model in &self.models {
            registry
                .register_model(model.name.as_str())
                .map_err(|err| ConfigError::Invalid(err.to_string()))?;
            for member in &model.members {
                registry
                    .register(model.name.as_str(), member.name.as_str(), member.kind, member.tags())
                    .map_err(|err| ConfigError::Invalid(err.to_string()))?;
            }
        }
        Ok(registry)
    }
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Tag policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PolicyConfig {
    /// Tag whose presence grants external access.
    #[serde(default = "default_authorization_tag")]
    pub authorization_tag: String,
    /// Tag whose presence passes the raw argument list to a method.
    #[serde(default = "default_array_argument_tag")]
    pub array_argument_tag: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            authorization_tag: default_authorization_tag(),
            array_argument_tag: default_array_argument_tag(),
        }
    }
}

impl PolicyConfig {
    /// Validates tag names.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_tag_name("policy.authorization_tag", &self.authorization_tag)?;
        validate_tag_name("policy.array_argument_tag", &self.array_argument_tag)?;
        if self.authorization_tag == self.array_argument_tag {
            return Err(ConfigError::Invalid(
                "policy.authorization_tag and policy.array_argument_tag must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl PolicyProvider for PolicyConfig {
    fn authorization_tag(&self) -> &str {
        &self.authorization_tag
    }

    fn array_argument_tag(&self) -> &str {
        &self.array_argument_tag
    }
}

// ============================================================================
// SECTION: Audit
// ============================================================================

/// Audit logging configuration for gate resolutions.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Enable structured audit logging.
    #[serde(default = "default_audit_enabled")]
    pub enabled: bool,
    /// Optional audit log path (JSON lines). Stderr when absent.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: default_audit_enabled(),
            path: None,
        }
    }
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }

    /// Builds the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn build_sink(&self) -> Result<Arc<dyn GateAuditSink>, ConfigError> {
        if !self.enabled {
            return Ok(Arc::new(GateNoopAuditSink));
        }
        match &self.path {
            Some(path) => {
                let sink = GateFileAuditSink::new(Path::new(path.trim()))
                    .map_err(|err| ConfigError::Io(format!("audit.path: {err}")))?;
                Ok(Arc::new(sink))
            }
            None => Ok(Arc::new(GateStderrAuditSink)),
        }
    }
}

// ============================================================================
// SECTION: Sanitation
// ============================================================================

/// Argument sanitation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SanitizeConfig {
    /// Reject members that declare no argument schema.
    #[serde(default = "default_require_schema")]
    pub require_schema: bool,
    /// Drop object keys not declared by the member schema.
    #[serde(default)]
    pub strip_unknown: bool,
    /// Maximum serialized argument size in bytes.
    #[serde(default = "default_max_args_bytes")]
    pub max_args_bytes: usize,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            require_schema: default_require_schema(),
            strip_unknown: false,
            max_args_bytes: default_max_args_bytes(),
        }
    }
}

impl SanitizeConfig {
    /// Validates sanitation limits.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_args_bytes == 0 {
            return Err(ConfigError::Invalid(
                "sanitize.max_args_bytes must be greater than zero".to_string(),
            ));
        }
        if self.max_args_bytes > MAX_ARGS_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "sanitize.max_args_bytes exceeds {MAX_ARGS_BYTES_LIMIT}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Models
// ============================================================================

/// Declared model type.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    /// Model type identifier.
    pub name: String,
    /// Declared members.
    #[serde(default)]
    pub members: Vec<MemberConfig>,
}

impl ModelConfig {
    /// Validates the model declaration and its members.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_member_name("models.name", &self.name)?;
        if self.members.len() > MAX_MEMBERS_PER_MODEL {
            return Err(ConfigError::Invalid(format!(
                "models[{}].members exceeds {MAX_MEMBERS_PER_MODEL} entries",
                self.name
            )));
        }
        let mut seen = BTreeSet::new();
        for member in &self.members {
            let field = format!("models[{}].members", self.name);
            member.validate(&field)?;
            if !seen.insert((member.kind, member.name.as_str())) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate {} {}.{}",
                    member.kind, self.name, member.name
                )));
            }
        }
        Ok(())
    }
}

/// Declared member with tags and an optional argument schema.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberConfig {
    /// Member name.
    pub name: String,
    /// Member kind.
    pub kind: MemberKind,
    /// Presence-only tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Valued tags.
    #[serde(default)]
    pub tag_values: BTreeMap<String, Vec<String>>,
    /// Optional JSON schema for the sanitized arguments.
    #[serde(default)]
    pub params_schema: Option<Value>,
}

impl MemberConfig {
    /// Returns the declared tags as registry metadata.
    #[must_use]
    pub fn tags(&self) -> MemberTags {
        let mut tags: MemberTags = self.tags.iter().map(String::as_str).collect();
        for (name, values) in &self.tag_values {
            tags.insert_flag(name.as_str());
            for value in values {
                tags.insert_value(name.as_str(), value.as_str());
            }
        }
        tags
    }

    /// Validates the member declaration.
    fn validate(&self, field: &str) -> Result<(), ConfigError> {
        validate_member_name(&format!("{field}.name"), &self.name)?;
        if self.tags.len() + self.tag_values.len() > MAX_TAGS_PER_MEMBER {
            return Err(ConfigError::Invalid(format!(
                "{field}[{}] exceeds {MAX_TAGS_PER_MEMBER} tags",
                self.name
            )));
        }
        for tag in self.tags.iter().chain(self.tag_values.keys()) {
            validate_tag_name(&format!("{field}[{}].tags", self.name), tag)?;
        }
        if let Some(schema) = &self.params_schema
            && !(schema.is_object() || schema.is_boolean())
        {
            return Err(ConfigError::Invalid(format!(
                "{field}[{}].params_schema must be an object or boolean",
                self.name
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a tag name: non-empty, bounded, and free of whitespace.
fn validate_tag_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_NAME_LENGTH} bytes")));
    }
    if value.chars().any(char::is_whitespace) {
        return Err(ConfigError::Invalid(format!("{field} must not contain whitespace")));
    }
    Ok(())
}

/// Validates a model or member name.
fn validate_member_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds {MAX_NAME_LENGTH} bytes")));
    }
    Ok(())
}

/// Default authorization tag name.
fn default_authorization_tag() -> String {
    DEFAULT_AUTHORIZATION_TAG.to_string()
}

/// Default array-argument tag name.
fn default_array_argument_tag() -> String {
    DEFAULT_ARRAY_ARGUMENT_TAG.to_string()
}

/// Default audit logging enabled.
const fn default_audit_enabled() -> bool {
    true
}

/// Default to rejecting members without a schema.
const fn default_require_schema() -> bool {
    true
}

/// Default serialized argument size limit.
const fn default_max_args_bytes() -> usize {
    DEFAULT_MAX_ARGS_BYTES
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_path_string_rejects_empty_string() {
        let result = validate_path_string("audit.path", "  ");
        assert!(result.is_err(), "whitespace-only path should fail");
    }

    #[test]
    fn validate_path_string_rejects_component_too_long() {
        let value = format!("logs/{}", "a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        let result = validate_path_string("audit.path", &value);
        assert!(result.is_err(), "oversized component should fail");
    }

    #[test]
    fn validate_path_string_accepts_nested_path() {
        assert!(validate_path_string("audit.path", "./logs/audit.jsonl").is_ok());
    }

    #[test]
    fn validate_tag_name_rejects_whitespace() {
        assert!(validate_tag_name("policy.authorization_tag", "acl ess").is_err());
        assert!(validate_tag_name("policy.authorization_tag", "").is_err());
        assert!(validate_tag_name("policy.authorization_tag", "acless").is_ok());
    }

    #[test]
    fn validate_path_rejects_long_component() {
        let path = PathBuf::from("a".repeat(MAX_PATH_COMPONENT_LENGTH + 1));
        assert!(validate_path(&path).is_err());
    }
}
