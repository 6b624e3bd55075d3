// crates/acless-core/src/interfaces/mod.rs
// ============================================================================
// Module: Acless Interfaces
// Description: Collaborator interfaces consumed by the dispatch gate.
// Purpose: Define annotation lookup, policy, and sanitation contract surfaces.
// Dependencies: crate::core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Interfaces define how the gate integrates with member metadata, policy
//! configuration, and argument sanitation without embedding any backend.
//! Implementations must be deterministic for identical inputs and must not
//! mutate shared state during a resolution.
//!
//! Security posture: sanitizers consume untrusted arguments and must fail
//! closed on anything they cannot validate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;
use thiserror::Error;

use crate::core::MemberDescriptor;
use crate::core::MemberKind;
use crate::core::MemberTags;
use crate::core::ModelTypeId;

// ============================================================================
// SECTION: Annotation Inspector
// ============================================================================

/// Member existence and metadata lookup.
///
/// Method and property lookups are independent: a name may exist as one kind
/// and not the other.
pub trait AnnotationInspector {
    /// Returns the registered member, if any.
    fn member(&self, model: &ModelTypeId, name: &str, kind: MemberKind)
    -> Option<&MemberDescriptor>;

    /// Returns true when a member of the given kind exists.
    fn exists(&self, model: &ModelTypeId, name: &str, kind: MemberKind) -> bool {
        self.member(model, name, kind).is_some()
    }

    /// Returns the declared tags for a member, if it exists.
    fn metadata_of(&self, model: &ModelTypeId, name: &str, kind: MemberKind) -> Option<&MemberTags> {
        self.member(model, name, kind).map(|member| &member.tags)
    }
}

// ============================================================================
// SECTION: Policy Provider
// ============================================================================

/// Source of the configured tag names.
///
/// The gate reads both names once per resolution.
pub trait PolicyProvider {
    /// Tag whose presence grants external access to a member.
    fn authorization_tag(&self) -> &str;

    /// Tag whose presence marks a method as taking the raw argument list.
    fn array_argument_tag(&self) -> &str;
}

// ============================================================================
// SECTION: Sanitizer
// ============================================================================

/// Sanitation failures.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - The gate propagates these unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SanitizeError {
    /// No sanitation rule is registered for the member.
    #[error("no sanitation rule for {model}.{member}")]
    RuleMissing {
        /// Model type identifier.
        model: String,
        /// Member name.
        member: String,
    },
    /// Serialized arguments exceed the configured limit.
    #[error("arguments for {member} too large ({actual_bytes} > {max_bytes})")]
    ArgsTooLarge {
        /// Member name.
        member: String,
        /// Maximum allowed bytes.
        max_bytes: usize,
        /// Actual serialized size in bytes.
        actual_bytes: usize,
    },
    /// Arguments failed schema validation.
    #[error("arguments for {member} invalid: {error}")]
    SchemaViolation {
        /// Member name.
        member: String,
        /// Validation error details.
        error: String,
    },
    /// Sanitizer rejected the arguments.
    #[error("arguments rejected: {0}")]
    Rejected(String),
}

impl SanitizeError {
    /// Returns the stable error code for this sanitation error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::RuleMissing {
                ..
            } => "rule_missing",
            Self::ArgsTooLarge {
                ..
            } => "args_too_large",
            Self::SchemaViolation {
                ..
            } => "schema_violation",
            Self::Rejected(_) => "rejected",
        }
    }
}

/// Argument sanitizer for resolved members.
pub trait Sanitizer {
    /// Validates and transforms arguments for the member.
    ///
    /// # Errors
    ///
    /// Returns [`SanitizeError`] when the arguments are not acceptable.
    fn sanitize(&self, member: &MemberDescriptor, args: Value) -> Result<Value, SanitizeError>;
}

impl<T: AnnotationInspector + ?Sized> AnnotationInspector for &T {
    fn member(
        &self,
        model: &ModelTypeId,
        name: &str,
        kind: MemberKind,
    ) -> Option<&MemberDescriptor> {
        (**self).member(model, name, kind)
    }
}

impl<T: PolicyProvider + ?Sized> PolicyProvider for &T {
    fn authorization_tag(&self) -> &str {
        (**self).authorization_tag()
    }

    fn array_argument_tag(&self) -> &str {
        (**self).array_argument_tag()
    }
}

impl<T: Sanitizer + ?Sized> Sanitizer for &T {
    fn sanitize(&self, member: &MemberDescriptor, args: Value) -> Result<Value, SanitizeError> {
        (**self).sanitize(member, args)
    }
}
