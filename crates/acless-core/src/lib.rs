// crates/acless-core/src/lib.rs
// ============================================================================
// Module: Acless Core Library
// Description: Public API surface for the Acless access-control gate.
// Purpose: Expose member metadata types, gate interfaces, and runtime helpers.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Acless core intercepts calls to named methods and properties on a model,
//! verifies that the target carries the configured authorization tag,
//! normalizes and sanitizes the caller arguments, and packages the verified
//! call into a [`CallResult`] for an external executor. The gate never invokes
//! the target itself.
//!
//! Security posture: call requests are untrusted; every resolution fails
//! closed on missing members, missing tags, or malformed arguments.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::GateAuditEvent;
pub use audit::GateAuditSink;
pub use audit::GateFileAuditSink;
pub use audit::GateNoopAuditSink;
pub use audit::GateOutcome;
pub use audit::GateStderrAuditSink;
pub use interfaces::AnnotationInspector;
pub use interfaces::PolicyProvider;
pub use interfaces::SanitizeError;
pub use interfaces::Sanitizer;
pub use runtime::ArgumentShapeError;
pub use runtime::DispatchGate;
pub use runtime::GateError;
pub use runtime::GatedModel;
pub use runtime::MemberRegistry;
pub use runtime::ModelSurface;
pub use runtime::PassThroughSanitizer;
pub use runtime::RegistryError;
pub use runtime::StaticPolicy;
pub use runtime::normalize_args;
