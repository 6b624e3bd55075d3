// crates/acless-core/src/runtime/policy.rs
// ============================================================================
// Module: Built-in Policy and Sanitizer
// Description: In-memory policy provider and pass-through sanitizer.
// Purpose: Provide minimal collaborators for embedding and tests.
// Dependencies: crate::{core, interfaces}, serde_json
// ============================================================================

//! ## Overview
//! [`StaticPolicy`] holds fixed tag names. [`PassThroughSanitizer`] accepts
//! every argument unchanged and is meant for members whose arguments are
//! validated elsewhere; production deployments should prefer a rule-based
//! sanitizer.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::MemberDescriptor;
use crate::interfaces::PolicyProvider;
use crate::interfaces::SanitizeError;
use crate::interfaces::Sanitizer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default authorization tag name.
pub const DEFAULT_AUTHORIZATION_TAG: &str = "acless";
/// Default array-argument tag name.
pub const DEFAULT_ARRAY_ARGUMENT_TAG: &str = "acless_array_arg";

// ============================================================================
// SECTION: Static Policy
// ============================================================================

/// Policy provider with fixed tag names.
///
/// # Invariants
/// - Tag names never change after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticPolicy {
    /// Authorization tag name.
    authorization_tag: String,
    /// Array-argument tag name.
    array_argument_tag: String,
}

impl StaticPolicy {
    /// Creates a policy with explicit tag names.
    #[must_use]
    pub fn new(authorization_tag: impl Into<String>, array_argument_tag: impl Into<String>) -> Self {
        Self {
            authorization_tag: authorization_tag.into(),
            array_argument_tag: array_argument_tag.into(),
        }
    }
}

impl Default for StaticPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_AUTHORIZATION_TAG, DEFAULT_ARRAY_ARGUMENT_TAG)
    }
}

impl PolicyProvider for StaticPolicy {
    fn authorization_tag(&self) -> &str {
        &self.authorization_tag
    }

    fn array_argument_tag(&self) -> &str {
        &self.array_argument_tag
    }
}

// ============================================================================
// SECTION: Pass-Through Sanitizer
// ============================================================================

/// Sanitizer that returns arguments unchanged.
pub struct PassThroughSanitizer;

impl Sanitizer for PassThroughSanitizer {
    fn sanitize(&self, _member: &MemberDescriptor, args: Value) -> Result<Value, SanitizeError> {
        Ok(args)
    }
}
