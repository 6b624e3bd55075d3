// crates/acless-sanitize/src/lib.rs
// ============================================================================
// Module: Acless Sanitize Library
// Description: Schema-backed argument sanitation for gated members.
// Purpose: Provide the reference sanitizer used by the Acless CLI.
// Dependencies: acless-config, acless-core, jsonschema
// ============================================================================

//! ## Overview
//! [`SchemaSanitizer`] validates gated call arguments against per-member JSON
//! schemas compiled once at startup. It enforces a serialized size limit,
//! optionally strips undeclared object keys, and fails closed on members
//! without a rule unless configured otherwise.
//!
//! Security posture: arguments are untrusted; see [`SanitizeLimits`] for the
//! fail-closed defaults.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use schema::SanitizeBuildError;
pub use schema::SanitizeLimits;
pub use schema::SchemaSanitizer;
