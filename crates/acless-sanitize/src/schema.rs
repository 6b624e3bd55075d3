// crates/acless-sanitize/src/schema.rs
// ============================================================================
// Module: Schema Sanitizer
// Description: JSON-schema validation of gated call arguments.
// Purpose: Compile per-member argument schemas and enforce them at dispatch.
// Dependencies: acless-config, acless-core, jsonschema, serde_json
// ============================================================================

//! ## Overview
//! Schemas are compiled once with Draft 2020-12 and keyed by
//! `(model, kind, member)`. Sanitation checks the serialized size first, then
//! validates against the member's schema, then optionally strips object keys
//! the schema does not declare.
//!
//! Security posture: a member without a rule is rejected unless
//! `require_schema` is explicitly disabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use acless_config::AclessConfig;
use acless_config::DEFAULT_MAX_ARGS_BYTES;
use acless_config::SanitizeConfig;
use acless_core::MemberDescriptor;
use acless_core::MemberKind;
use acless_core::MemberName;
use acless_core::ModelTypeId;
use acless_core::SanitizeError;
use acless_core::Sanitizer;
use jsonschema::Draft;
use jsonschema::Validator;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Sanitation limits and switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeLimits {
    /// Maximum serialized argument size in bytes.
    pub max_args_bytes: usize,
    /// Reject members without a registered schema.
    pub require_schema: bool,
    /// Drop object keys not declared by the schema.
    pub strip_unknown: bool,
}

impl Default for SanitizeLimits {
    fn default() -> Self {
        Self {
            max_args_bytes: DEFAULT_MAX_ARGS_BYTES,
            require_schema: true,
            strip_unknown: false,
        }
    }
}

impl From<&SanitizeConfig> for SanitizeLimits {
    fn from(config: &SanitizeConfig) -> Self {
        Self {
            max_args_bytes: config.max_args_bytes,
            require_schema: config.require_schema,
            strip_unknown: config.strip_unknown,
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while registering sanitation rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeBuildError {
    /// Schema failed to compile.
    #[error("schema for {model}.{member} failed to compile: {error}")]
    SchemaCompile {
        /// Model type identifier.
        model: String,
        /// Member name.
        member: String,
        /// Compiler error details.
        error: String,
    },
    /// A rule is already registered for the member.
    #[error("{kind} {model}.{member} already has a schema")]
    DuplicateRule {
        /// Model type identifier.
        model: String,
        /// Member name.
        member: String,
        /// Member kind.
        kind: MemberKind,
    },
}

impl SanitizeBuildError {
    /// Returns the stable error code for this build error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SchemaCompile {
                ..
            } => "schema_compile",
            Self::DuplicateRule {
                ..
            } => "duplicate_rule",
        }
    }
}

// ============================================================================
// SECTION: Schema Sanitizer
// ============================================================================

/// Compiled rule for one member.
struct SchemaRule {
    /// Compiled argument schema.
    validator: Validator,
    /// Declared keys when unknown keys may be stripped.
    strippable: Option<DeclaredKeys>,
}

/// Object keys a schema declares through `properties` or `patternProperties`.
struct DeclaredKeys {
    /// Names listed under `properties`.
    names: BTreeSet<String>,
    /// Matcher for `patternProperties` regexes, when any are present.
    patterns: Option<Validator>,
}

impl DeclaredKeys {
    /// Returns true when the key is declared by name or pattern.
    fn contains(&self, key: &str) -> bool {
        self.names.contains(key)
            || self
                .patterns
                .as_ref()
                .is_some_and(|patterns| patterns.is_valid(&Value::String(key.to_string())))
    }
}

/// Lookup key for a member rule.
type RuleKey = (ModelTypeId, MemberKind, MemberName);

/// Sanitizer backed by compiled per-member JSON schemas.
///
/// # Invariants
/// - Rules are immutable once the gate is serving calls.
/// - Oversized arguments are rejected before schema validation.
pub struct SchemaSanitizer {
    /// Active limits.
    limits: SanitizeLimits,
    /// Compiled rules keyed by member.
    rules: BTreeMap<RuleKey, SchemaRule>,
}

impl SchemaSanitizer {
    /// Creates a sanitizer with no rules.
    #[must_use]
    pub const fn new(limits: SanitizeLimits) -> Self {
        Self {
            limits,
            rules: BTreeMap::new(),
        }
    }

    /// Builds a sanitizer from every `params_schema` in the config.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeBuildError`] when a schema fails to compile.
    pub fn from_config(config: &AclessConfig) -> Result<Self, SanitizeBuildError> {
        let mut sanitizer = Self::new(SanitizeLimits::from(&config.sanitize));
        for model in &config.models {
            for member in &model.members {
                if let Some(schema) = &member.params_schema {
                    sanitizer.register_schema(
                        model.name.as_str(),
                        member.kind,
                        member.name.as_str(),
                        schema,
                    )?;
                }
            }
        }
        Ok(sanitizer)
    }

    /// Returns the active limits.
    #[must_use]
    pub const fn limits(&self) -> SanitizeLimits {
        self.limits
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no rules are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compiles and registers the argument schema for a member.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeBuildError`] when the schema does not compile or a
    /// rule already exists for the member.
    pub fn register_schema(
        &mut self,
        model: impl Into<ModelTypeId>,
        kind: MemberKind,
        name: impl Into<MemberName>,
        schema: &Value,
    ) -> Result<(), SanitizeBuildError> {
        let key = (model.into(), kind, name.into());
        if self.rules.contains_key(&key) {
            return Err(SanitizeBuildError::DuplicateRule {
                model: key.0.to_string(),
                member: key.2.to_string(),
                kind,
            });
        }
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|err| SanitizeBuildError::SchemaCompile {
                model: key.0.to_string(),
                member: key.2.to_string(),
                error: err.to_string(),
            })?;
        let strippable =
            declared_keys(schema).map_err(|err| SanitizeBuildError::SchemaCompile {
                model: key.0.to_string(),
                member: key.2.to_string(),
                error: err,
            })?;
        let rule = SchemaRule {
            validator,
            strippable,
        };
        self.rules.insert(key, rule);
        Ok(())
    }
}

impl Sanitizer for SchemaSanitizer {
    fn sanitize(&self, member: &MemberDescriptor, args: Value) -> Result<Value, SanitizeError> {
        let actual_bytes = serde_json::to_vec(&args)
            .map_err(|err| SanitizeError::Rejected(err.to_string()))?
            .len();
        if actual_bytes > self.limits.max_args_bytes {
            return Err(SanitizeError::ArgsTooLarge {
                member: member.name.to_string(),
                max_bytes: self.limits.max_args_bytes,
                actual_bytes,
            });
        }
        let key = (member.model.clone(), member.kind, member.name.clone());
        let Some(rule) = self.rules.get(&key) else {
            if self.limits.require_schema {
                return Err(SanitizeError::RuleMissing {
                    model: member.model.to_string(),
                    member: member.name.to_string(),
                });
            }
            return Ok(args);
        };
        let messages: Vec<String> =
            rule.validator.iter_errors(&args).map(|err| err.to_string()).collect();
        if !messages.is_empty() {
            return Err(SanitizeError::SchemaViolation {
                member: member.name.to_string(),
                error: messages.join("; "),
            });
        }
        if !self.limits.strip_unknown {
            return Ok(args);
        }
        match (args, &rule.strippable) {
            (Value::Object(mut map), Some(declared)) => {
                map.retain(|key, _| declared.contains(key));
                Ok(Value::Object(map))
            }
            (args, _) => Ok(args),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the declared keys when undeclared keys may be removed.
///
/// Schemas without `properties` or `patternProperties` are left to validation
/// alone, as are schemas whose `additionalProperties` is anything but `true`.
fn declared_keys(schema: &Value) -> Result<Option<DeclaredKeys>, String> {
    match schema.get("additionalProperties") {
        None | Some(Value::Bool(true)) => {}
        Some(_) => return Ok(None),
    }
    let names: BTreeSet<String> = schema
        .get("properties")
        .and_then(Value::as_object)
        .map(|properties| properties.keys().cloned().collect())
        .unwrap_or_default();
    let patterns: Vec<Value> = schema
        .get("patternProperties")
        .and_then(Value::as_object)
        .map(|patterns| patterns.keys().map(|pattern| json!({ "pattern": pattern })).collect())
        .unwrap_or_default();
    if names.is_empty() && patterns.is_empty() && schema.get("properties").is_none() {
        return Ok(None);
    }
    let patterns = if patterns.is_empty() {
        None
    } else {
        let matcher = json!({ "type": "string", "anyOf": patterns });
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(&matcher)
            .map_err(|err| err.to_string())?;
        Some(validator)
    };
    Ok(Some(DeclaredKeys {
        names,
        patterns,
    }))
}
