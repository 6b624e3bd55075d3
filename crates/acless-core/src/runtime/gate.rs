// crates/acless-core/src/runtime/gate.rs
// ============================================================================
// Module: Dispatch Gate
// Description: Authorization and argument-shaping decision point.
// Purpose: Turn untrusted call requests into verified call results.
// Dependencies: crate::{audit, core, interfaces, runtime::normalize}, thiserror
// ============================================================================

//! ## Overview
//! The dispatch gate resolves a member name on a model type, checks the
//! authorization tag, shapes the arguments, runs the sanitizer, and builds a
//! [`CallResult`]. Methods are looked up strictly before properties; a denied
//! method never falls through to a same-named property.
//!
//! ## Invariants
//! - A call result is produced only for an existing, authorized member whose
//!   arguments passed sanitation.
//! - Tag names are read from the policy once per resolution.
//! - Sanitation errors are returned unchanged.
//! - Exactly one audit event is recorded per resolution.
//!
//! Security posture: this is the trust boundary between external requests
//! and in-process calls; every failure aborts before a result exists.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::audit::GateAuditEvent;
use crate::audit::GateAuditSink;
use crate::audit::GateNoopAuditSink;
use crate::audit::GateOutcome;
use crate::core::CallRequest;
use crate::core::CallResult;
use crate::core::MemberDescriptor;
use crate::core::MemberKind;
use crate::core::ModelTypeId;
use crate::interfaces::AnnotationInspector;
use crate::interfaces::PolicyProvider;
use crate::interfaces::SanitizeError;
use crate::interfaces::Sanitizer;
use crate::runtime::normalize::ArgumentShapeError;
use crate::runtime::normalize::normalize_args;
use crate::runtime::surface::ModelSurface;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Dispatch gate failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - "Does not exist", "exists but forbidden", and "malformed call shape"
///   remain distinguishable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// Neither a method nor a property with the name exists.
    #[error("member {model}.{member} does not exist")]
    NotFound {
        /// Model type identifier.
        model: ModelTypeId,
        /// Requested member name.
        member: String,
    },
    /// Member exists but lacks the authorization tag.
    #[error("{kind} {model}.{member} not accessible")]
    AccessDenied {
        /// Model type identifier.
        model: ModelTypeId,
        /// Member name.
        member: String,
        /// Member kind that was denied.
        kind: MemberKind,
    },
    /// Normalized arguments are not a structured value.
    #[error("{kind} {model}.{member} expects an array of parameters, found {found}")]
    InvalidArgumentShape {
        /// Model type identifier.
        model: ModelTypeId,
        /// Member name.
        member: String,
        /// Member kind being called.
        kind: MemberKind,
        /// JSON type label of the rejected argument.
        found: &'static str,
    },
    /// Sanitizer rejected the arguments.
    #[error(transparent)]
    Sanitation(#[from] SanitizeError),
}

impl GateError {
    /// Returns the stable error code for this gate error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound {
                ..
            } => "not_found",
            Self::AccessDenied {
                ..
            } => "access_denied",
            Self::InvalidArgumentShape {
                ..
            } => "invalid_argument_shape",
            Self::Sanitation(_) => "sanitation_failed",
        }
    }

    /// Returns true when retrying with reshaped arguments could succeed.
    #[must_use]
    pub const fn is_retryable_with_reshape(&self) -> bool {
        matches!(self, Self::InvalidArgumentShape { .. })
    }

    /// Returns the audit outcome for this error.
    const fn outcome(&self) -> GateOutcome {
        match self {
            Self::NotFound {
                ..
            } => GateOutcome::NotFound,
            Self::AccessDenied {
                ..
            } => GateOutcome::Denied,
            Self::InvalidArgumentShape {
                ..
            }
            | Self::Sanitation(_) => GateOutcome::Rejected,
        }
    }
}

// ============================================================================
// SECTION: Resolve Trace
// ============================================================================

/// Facts gathered during a resolution for the audit event.
#[derive(Debug, Default)]
struct ResolveTrace {
    /// Kind of the member that was found.
    kind: Option<MemberKind>,
    /// Plain-argument mode once decided.
    plain_args: Option<bool>,
    /// Arguments dropped by normalization.
    dropped_args: usize,
}

// ============================================================================
// SECTION: Dispatch Gate
// ============================================================================

/// Access-control gate for model members.
///
/// # Invariants
/// - Collaborators are read-only during resolution.
/// - Never invokes the resolved member.
pub struct DispatchGate<I, P, S> {
    /// Member existence and metadata lookup.
    inspector: I,
    /// Tag name source.
    policy: P,
    /// Argument sanitizer.
    sanitizer: S,
    /// Audit sink for resolution events.
    audit: Arc<dyn GateAuditSink>,
}

impl<I, P, S> DispatchGate<I, P, S>
where
    I: AnnotationInspector,
    P: PolicyProvider,
    S: Sanitizer,
{
    /// Creates a gate with a no-op audit sink.
    #[must_use]
    pub fn new(inspector: I, policy: P, sanitizer: S) -> Self {
        Self {
            inspector,
            policy,
            sanitizer,
            audit: Arc::new(GateNoopAuditSink),
        }
    }

    /// Returns the gate with the given audit sink installed.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn GateAuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Returns the annotation inspector.
    pub const fn inspector(&self) -> &I {
        &self.inspector
    }

    /// Returns the policy provider.
    pub const fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns a call surface bound to a model type.
    pub fn surface(&self, model: ModelTypeId) -> ModelSurface<'_, I, P, S> {
        ModelSurface::new(self, model)
    }

    /// Resolves a member call into a verified call result.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] when the member is missing, not accessible, the
    /// arguments are malformed, or sanitation fails.
    pub fn resolve(
        &self,
        model: &ModelTypeId,
        member: &str,
        args: Vec<Value>,
    ) -> Result<CallResult, GateError> {
        let arg_count = args.len();
        let mut trace = ResolveTrace::default();
        let result = self.resolve_member(model, member, args, &mut trace);
        self.record(model, member, arg_count, &trace, result.as_ref().err());
        result
    }

    /// Resolves a call request into a verified call result.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] under the same conditions as [`Self::resolve`].
    pub fn resolve_request(
        &self,
        model: &ModelTypeId,
        request: CallRequest,
    ) -> Result<CallResult, GateError> {
        self.resolve(model, &request.member, request.args)
    }

    /// Runs method-then-property resolution.
    fn resolve_member(
        &self,
        model: &ModelTypeId,
        member: &str,
        args: Vec<Value>,
        trace: &mut ResolveTrace,
    ) -> Result<CallResult, GateError> {
        let authorization_tag = self.policy.authorization_tag();
        let array_argument_tag = self.policy.array_argument_tag();

        if let Some(method) = self.inspector.member(model, member, MemberKind::Method) {
            trace.kind = Some(MemberKind::Method);
            if !method.tags.has(authorization_tag) {
                return Err(access_denied(method));
            }
            let plain_args = !method.tags.has(array_argument_tag);
            trace.plain_args = Some(plain_args);
            let args = if plain_args {
                trace.dropped_args = args.len().saturating_sub(1);
                Value::Object(normalize_args(args).map_err(|err| shape_error(method, err))?)
            } else {
                Value::Array(args)
            };
            let sanitized = self.sanitizer.sanitize(method, args)?;
            return Ok(CallResult::for_method(model.clone(), method.clone(), sanitized, plain_args));
        }

        if let Some(property) = self.inspector.member(model, member, MemberKind::Property) {
            trace.kind = Some(MemberKind::Property);
            if !property.tags.has(authorization_tag) {
                return Err(access_denied(property));
            }
            trace.plain_args = Some(false);
            trace.dropped_args = args.len().saturating_sub(1);
            let args =
                Value::Object(normalize_args(args).map_err(|err| shape_error(property, err))?);
            let sanitized = self.sanitizer.sanitize(property, args)?;
            return Ok(CallResult::for_property(model.clone(), property.clone(), sanitized));
        }

        Err(GateError::NotFound {
            model: model.clone(),
            member: member.to_string(),
        })
    }

    /// Records the audit event for a finished resolution.
    fn record(
        &self,
        model: &ModelTypeId,
        member: &str,
        arg_count: usize,
        trace: &ResolveTrace,
        error: Option<&GateError>,
    ) {
        let outcome = error.map_or(GateOutcome::Allowed, GateError::outcome);
        let mut event = GateAuditEvent::resolve(model, member, outcome);
        event.kind = trace.kind;
        event.error_code = error.map(GateError::code);
        event.plain_args = trace.plain_args;
        event.arg_count = arg_count;
        event.dropped_args = trace.dropped_args;
        self.audit.record(&event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds an access-denied error for a member.
fn access_denied(member: &MemberDescriptor) -> GateError {
    GateError::AccessDenied {
        model: member.model.clone(),
        member: member.name.to_string(),
        kind: member.kind,
    }
}

/// Builds an argument-shape error for a member.
fn shape_error(member: &MemberDescriptor, err: ArgumentShapeError) -> GateError {
    GateError::InvalidArgumentShape {
        model: member.model.clone(),
        member: member.name.to_string(),
        kind: member.kind,
        found: err.found,
    }
}
