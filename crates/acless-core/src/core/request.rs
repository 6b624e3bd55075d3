// crates/acless-core/src/core/request.rs
// ============================================================================
// Module: Acless Call Requests and Results
// Description: Transient call requests and verified call results.
// Purpose: Carry caller input into the gate and verified calls out of it.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A [`CallRequest`] is consumed once by the dispatch gate. A [`CallResult`]
//! is produced only for members that exist, carry the authorization tag, and
//! whose arguments passed sanitation. Ownership of the result passes to the
//! caller, which hands it to an executor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use serde_json::Value;

use crate::core::identifiers::ModelTypeId;
use crate::core::member::MemberDescriptor;
use crate::core::member::MemberKind;

// ============================================================================
// SECTION: Call Request
// ============================================================================

/// Caller-supplied member name and positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRequest {
    /// Target member name.
    pub member: String,
    /// Ordered raw arguments.
    pub args: Vec<Value>,
}

impl CallRequest {
    /// Creates a new call request.
    #[must_use]
    pub fn new(member: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            member: member.into(),
            args,
        }
    }
}

// ============================================================================
// SECTION: Call Result
// ============================================================================

/// Resolved call target.
///
/// # Invariants
/// - Exactly one member is carried; the variant matches the member kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "member", rename_all = "snake_case")]
pub enum CallTarget {
    /// Resolved method.
    Method(MemberDescriptor),
    /// Resolved property.
    Property(MemberDescriptor),
}

impl CallTarget {
    /// Returns the resolved member descriptor.
    #[must_use]
    pub const fn member(&self) -> &MemberDescriptor {
        match self {
            Self::Method(member) | Self::Property(member) => member,
        }
    }

    /// Returns the member kind for the target.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        match self {
            Self::Method(_) => MemberKind::Method,
            Self::Property(_) => MemberKind::Property,
        }
    }
}

/// Verified call packaged for an external executor.
///
/// # Invariants
/// - Exactly one of [`CallResult::method`] and [`CallResult::property`] is `Some`.
/// - `plain_args` is always `false` for property targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallResult {
    /// Model type the member was resolved on.
    model: ModelTypeId,
    /// Resolved member.
    target: CallTarget,
    /// Sanitized arguments.
    args: Value,
    /// Whether plain-argument collapsing was applied.
    plain_args: bool,
}

impl CallResult {
    /// Builds a result for a resolved method.
    #[must_use]
    pub const fn for_method(
        model: ModelTypeId,
        method: MemberDescriptor,
        args: Value,
        plain_args: bool,
    ) -> Self {
        Self {
            model,
            target: CallTarget::Method(method),
            args,
            plain_args,
        }
    }

    /// Builds a result for a resolved property.
    #[must_use]
    pub const fn for_property(model: ModelTypeId, property: MemberDescriptor, args: Value) -> Self {
        Self {
            model,
            target: CallTarget::Property(property),
            args,
            plain_args: false,
        }
    }

    /// Returns the model type.
    #[must_use]
    pub const fn model(&self) -> &ModelTypeId {
        &self.model
    }

    /// Returns the resolved target.
    #[must_use]
    pub const fn target(&self) -> &CallTarget {
        &self.target
    }

    /// Returns the resolved method, if the target is a method.
    #[must_use]
    pub const fn method(&self) -> Option<&MemberDescriptor> {
        match &self.target {
            CallTarget::Method(member) => Some(member),
            CallTarget::Property(_) => None,
        }
    }

    /// Returns the resolved property, if the target is a property.
    #[must_use]
    pub const fn property(&self) -> Option<&MemberDescriptor> {
        match &self.target {
            CallTarget::Property(member) => Some(member),
            CallTarget::Method(_) => None,
        }
    }

    /// Returns the sanitized arguments.
    #[must_use]
    pub const fn args(&self) -> &Value {
        &self.args
    }

    /// Returns whether plain-argument collapsing was applied.
    #[must_use]
    pub const fn plain_args(&self) -> bool {
        self.plain_args
    }

    /// Consumes the result and returns the sanitized arguments.
    #[must_use]
    pub fn into_args(self) -> Value {
        self.args
    }
}
