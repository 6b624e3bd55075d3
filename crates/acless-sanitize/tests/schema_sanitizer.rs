// crates/acless-sanitize/tests/schema_sanitizer.rs
// ============================================================================
// Module: Schema Sanitizer Tests
// Description: Validate schema enforcement, limits, and key stripping.
// Purpose: Ensure the reference sanitizer fails closed on untrusted arguments.
// Dependencies: acless-config, acless-core, acless-sanitize, serde_json, toml
// ============================================================================

//! ## Overview
//! Covers rule registration, size limits, missing-rule handling, validation
//! failures, unknown-key stripping, and the sanitizer wired behind the
//! dispatch gate from a parsed config.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use acless_config::AclessConfig;
use acless_core::DispatchGate;
use acless_core::GateError;
use acless_core::MemberDescriptor;
use acless_core::MemberKind;
use acless_core::MemberTags;
use acless_core::ModelTypeId;
use acless_core::SanitizeError;
use acless_core::Sanitizer;
use acless_sanitize::SanitizeBuildError;
use acless_sanitize::SanitizeLimits;
use acless_sanitize::SchemaSanitizer;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn descriptor(name: &str, kind: MemberKind) -> MemberDescriptor {
    MemberDescriptor::new(ModelTypeId::new("Article"), name.into(), kind, MemberTags::new())
}

fn list_sanitizer(limits: SanitizeLimits) -> SchemaSanitizer {
    let mut sanitizer = SchemaSanitizer::new(limits);
    sanitizer
        .register_schema(
            "Article",
            MemberKind::Method,
            "list",
            &json!({
                "type": "object",
                "properties": {
                    "page": {"type": "integer", "minimum": 1},
                    "query": {"type": "string"}
                }
            }),
        )
        .unwrap();
    sanitizer
}

// ============================================================================
// SECTION: Registration
// ============================================================================

#[test]
fn duplicate_rule_is_rejected() {
    let mut sanitizer = list_sanitizer(SanitizeLimits::default());
    let err = sanitizer
        .register_schema("Article", MemberKind::Method, "list", &json!({"type": "object"}))
        .unwrap_err();
    assert_eq!(err.code(), "duplicate_rule");
    sanitizer
        .register_schema("Article", MemberKind::Property, "list", &json!({"type": "object"}))
        .unwrap();
    assert_eq!(sanitizer.len(), 2);
}

#[test]
fn invalid_schema_fails_to_compile() {
    let mut sanitizer = SchemaSanitizer::new(SanitizeLimits::default());
    let err = sanitizer
        .register_schema("Article", MemberKind::Method, "list", &json!({"type": 12}))
        .unwrap_err();
    assert!(matches!(err, SanitizeBuildError::SchemaCompile { .. }));
    assert!(sanitizer.is_empty());
}

// ============================================================================
// SECTION: Sanitation
// ============================================================================

#[test]
fn valid_arguments_pass_unchanged() {
    let sanitizer = list_sanitizer(SanitizeLimits::default());
    let args = json!({"page": 2, "query": "rust", "extra": true});
    let out = sanitizer.sanitize(&descriptor("list", MemberKind::Method), args.clone()).unwrap();
    assert_eq!(out, args);
}

#[test]
fn schema_violation_reports_member_and_reason() {
    let sanitizer = list_sanitizer(SanitizeLimits::default());
    let err = sanitizer
        .sanitize(&descriptor("list", MemberKind::Method), json!({"page": 0}))
        .unwrap_err();
    match err {
        SanitizeError::SchemaViolation {
            member,
            error,
        } => {
            assert_eq!(member, "list");
            assert!(!error.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_rule_fails_closed_by_default() {
    let sanitizer = list_sanitizer(SanitizeLimits::default());
    let err = sanitizer
        .sanitize(&descriptor("list", MemberKind::Property), json!({}))
        .unwrap_err();
    assert_eq!(
        err,
        SanitizeError::RuleMissing {
            model: "Article".to_string(),
            member: "list".to_string(),
        }
    );
}

#[test]
fn missing_rule_passes_through_when_not_required() {
    let sanitizer = list_sanitizer(SanitizeLimits {
        require_schema: false,
        ..SanitizeLimits::default()
    });
    let out = sanitizer.sanitize(&descriptor("bulk", MemberKind::Method), json!([1, 2])).unwrap();
    assert_eq!(out, json!([1, 2]));
}

#[test]
fn oversized_arguments_are_rejected_before_validation() {
    let sanitizer = list_sanitizer(SanitizeLimits {
        max_args_bytes: 16,
        ..SanitizeLimits::default()
    });
    let err = sanitizer
        .sanitize(&descriptor("list", MemberKind::Method), json!({"query": "x".repeat(32)}))
        .unwrap_err();
    match err {
        SanitizeError::ArgsTooLarge {
            max_bytes,
            actual_bytes,
            ..
        } => {
            assert_eq!(max_bytes, 16);
            assert!(actual_bytes > 16);
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = sanitizer
        .sanitize(&descriptor("unknown", MemberKind::Method), json!({"query": "x".repeat(32)}))
        .unwrap_err();
    assert_eq!(err.code(), "args_too_large");
}

#[test]
fn strip_unknown_removes_undeclared_keys() {
    let sanitizer = list_sanitizer(SanitizeLimits {
        strip_unknown: true,
        ..SanitizeLimits::default()
    });
    let out = sanitizer
        .sanitize(&descriptor("list", MemberKind::Method), json!({"page": 1, "admin": true}))
        .unwrap();
    assert_eq!(out, json!({"page": 1}));
}

#[test]
fn strip_unknown_leaves_closed_schemas_to_validation() {
    let mut sanitizer = SchemaSanitizer::new(SanitizeLimits {
        strip_unknown: true,
        ..SanitizeLimits::default()
    });
    sanitizer
        .register_schema(
            "Article",
            MemberKind::Method,
            "list",
            &json!({
                "type": "object",
                "properties": {"page": {"type": "integer"}},
                "additionalProperties": false
            }),
        )
        .unwrap();
    let err = sanitizer
        .sanitize(&descriptor("list", MemberKind::Method), json!({"page": 1, "admin": true}))
        .unwrap_err();
    assert_eq!(err.code(), "schema_violation");
}

#[test]
fn strip_unknown_keeps_pattern_keys_and_open_additional_schemas() {
    let mut sanitizer = SchemaSanitizer::new(SanitizeLimits {
        strip_unknown: true,
        ..SanitizeLimits::default()
    });
    sanitizer
        .register_schema(
            "Article",
            MemberKind::Method,
            "list",
            &json!({
                "type": "object",
                "properties": {"page": {"type": "integer"}},
                "patternProperties": {"^x_": {}}
            }),
        )
        .unwrap();
    sanitizer
        .register_schema(
            "Article",
            MemberKind::Method,
            "search",
            &json!({
                "type": "object",
                "properties": {"page": {"type": "integer"}},
                "additionalProperties": {"type": "string"},
                "patternProperties": {"^x_": {}}
            }),
        )
        .unwrap();

    let out = sanitizer
        .sanitize(
            &descriptor("list", MemberKind::Method),
            json!({"page": 1, "x_trace": 5, "admin": true}),
        )
        .unwrap();
    assert_eq!(out, json!({"page": 1, "x_trace": 5}));

    let args = json!({"page": 1, "note": "kept", "x_1": 5});
    let out = sanitizer.sanitize(&descriptor("search", MemberKind::Method), args.clone()).unwrap();
    assert_eq!(out, args);
}

// ============================================================================
// SECTION: Gate Integration
// ============================================================================

#[test]
fn gate_propagates_schema_failures_from_config() {
    let config: AclessConfig = toml::from_str(
        r#"
[sanitize]
strip_unknown = true

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
params_schema = { type = "array", items = { type = "integer" } }
"#,
    )
    .unwrap();
    config.validate().unwrap();
    let sanitizer = SchemaSanitizer::from_config(&config).unwrap();
    assert_eq!(sanitizer.len(), 2);
    assert_eq!(
        sanitizer.limits(),
        SanitizeLimits {
            strip_unknown: true,
            ..SanitizeLimits::default()
        }
    );
    let gate = DispatchGate::new(config.build_registry().unwrap(), config.policy.clone(), sanitizer);
    let article = ModelTypeId::new("Article");

    let result = gate.resolve(&article, "list", vec![json!({"page": 3, "debug": true})]).unwrap();
    assert_eq!(result.args(), &json!({"page": 3}));

    let result = gate.resolve(&article, "bulk", vec![json!(1), json!(2)]).unwrap();
    assert_eq!(result.args(), &json!([1, 2]));

    let err = gate.resolve(&article, "bulk", vec![json!("one")]).unwrap_err();
    assert!(matches!(err, GateError::Sanitation(SanitizeError::SchemaViolation { .. })));
    assert_eq!(err.code(), "sanitation_failed");

    let err = gate.resolve(&article, "list", vec![json!({"page": "three"})]).unwrap_err();
    assert_eq!(err.code(), "sanitation_failed");
}
