// crates/acless-core/tests/common/mod.rs
// ============================================================================
// Module: Gate Test Fixtures
// Description: Shared registry, sanitizer, and audit fixtures for gate tests.
// Purpose: Keep integration tests focused on resolution behavior.
// Dependencies: acless-core, serde_json
// ============================================================================

//! ## Overview
//! Provides a canonical `Article` model registry plus recording collaborators
//! that capture what the gate forwarded.

#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Shared fixtures are not used by every test binary."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use acless_core::DispatchGate;
use acless_core::GateAuditEvent;
use acless_core::GateAuditSink;
use acless_core::MemberDescriptor;
use acless_core::MemberKind;
use acless_core::MemberRegistry;
use acless_core::MemberTags;
use acless_core::ModelTypeId;
use acless_core::SanitizeError;
use acless_core::Sanitizer;
use acless_core::StaticPolicy;
use serde_json::Value;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Model used across gate tests.
pub const ARTICLE: &str = "Article";
/// Authorization tag used by the default policy.
pub const AUTH: &str = "acless";
/// Array-argument tag used by the default policy.
pub const ARRAY: &str = "acless_array_arg";

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Returns the article model identifier.
pub fn article() -> ModelTypeId {
    ModelTypeId::new(ARTICLE)
}

/// Builds the canonical article registry.
///
/// Methods: `list` (plain), `bulk` (array arg), `purge` (untagged),
/// `title` (untagged, shadows an authorized property), `summary` (authorized,
/// shadows an authorized property).
/// Properties: `title`, `summary`, `body` (carries the array tag), `slug`,
/// `secret` (untagged).
pub fn article_registry() -> MemberRegistry {
    let mut registry = MemberRegistry::new();
    let auth = || MemberTags::new().with_flag(AUTH);
    registry.register(ARTICLE, "list", MemberKind::Method, auth()).unwrap();
    registry.register(ARTICLE, "bulk", MemberKind::Method, auth().with_flag(ARRAY)).unwrap();
    registry.register(ARTICLE, "purge", MemberKind::Method, MemberTags::new()).unwrap();
    registry
        .register(ARTICLE, "title", MemberKind::Method, MemberTags::new().with_flag("internal"))
        .unwrap();
    registry.register(ARTICLE, "summary", MemberKind::Method, auth()).unwrap();
    registry.register(ARTICLE, "title", MemberKind::Property, auth()).unwrap();
    registry.register(ARTICLE, "summary", MemberKind::Property, auth()).unwrap();
    registry.register(ARTICLE, "body", MemberKind::Property, auth().with_flag(ARRAY)).unwrap();
    registry.register(ARTICLE, "slug", MemberKind::Property, auth()).unwrap();
    registry.register(ARTICLE, "secret", MemberKind::Property, MemberTags::new()).unwrap();
    registry
}

// ============================================================================
// SECTION: Recording Sanitizer
// ============================================================================

/// Sanitizer that records every submission and returns args unchanged.
#[derive(Clone, Default)]
pub struct RecordingSanitizer {
    /// Submitted `(member, kind, args)` triples.
    pub calls: Arc<Mutex<Vec<(String, MemberKind, Value)>>>,
}

impl RecordingSanitizer {
    /// Returns the recorded submissions.
    pub fn calls(&self) -> Vec<(String, MemberKind, Value)> {
        self.calls.lock().unwrap().clone()
    }

    /// Returns the last submitted args.
    pub fn last_args(&self) -> Option<Value> {
        self.calls.lock().unwrap().last().map(|(_, _, args)| args.clone())
    }
}

impl Sanitizer for RecordingSanitizer {
    fn sanitize(&self, member: &MemberDescriptor, args: Value) -> Result<Value, SanitizeError> {
        self.calls.lock().unwrap().push((member.name.to_string(), member.kind, args.clone()));
        Ok(args)
    }
}

/// Sanitizer that rejects every submission with a fixed error.
pub struct RejectingSanitizer(pub SanitizeError);

impl Sanitizer for RejectingSanitizer {
    fn sanitize(&self, _member: &MemberDescriptor, _args: Value) -> Result<Value, SanitizeError> {
        Err(self.0.clone())
    }
}

// ============================================================================
// SECTION: Recording Audit Sink
// ============================================================================

/// Audit sink that keeps events in memory.
#[derive(Default)]
pub struct RecordingAuditSink {
    /// Recorded events.
    pub events: Mutex<Vec<GateAuditEvent>>,
}

impl RecordingAuditSink {
    /// Returns the recorded events.
    pub fn events(&self) -> Vec<GateAuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl GateAuditSink for RecordingAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

// ============================================================================
// SECTION: Gate Builders
// ============================================================================

/// Builds a gate over the article registry with a recording sanitizer.
pub fn recording_gate() -> (DispatchGate<MemberRegistry, StaticPolicy, RecordingSanitizer>, RecordingSanitizer)
{
    let sanitizer = RecordingSanitizer::default();
    let gate = DispatchGate::new(article_registry(), StaticPolicy::default(), sanitizer.clone());
    (gate, sanitizer)
}
