// crates/acless-core/src/runtime/surface.rs
// ============================================================================
// Module: Call Interception Surface
// Description: Instance-bound and type-bound entry points into the gate.
// Purpose: Give callers a plain function call in place of dynamic member dispatch.
// Dependencies: crate::{core, interfaces, runtime::gate}, serde_json
// ============================================================================

//! ## Overview
//! Models opt into gated access by implementing [`GatedModel`]. Both entry
//! points forward to [`DispatchGate::resolve`] with the model's own type and
//! perform no checks of their own. [`ModelSurface`] serves callers that only
//! know the model type at runtime.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Value;

use crate::core::CallResult;
use crate::core::ModelTypeId;
use crate::interfaces::AnnotationInspector;
use crate::interfaces::PolicyProvider;
use crate::interfaces::Sanitizer;
use crate::runtime::gate::DispatchGate;
use crate::runtime::gate::GateError;

// ============================================================================
// SECTION: Gated Model
// ============================================================================

/// Model type reachable through the dispatch gate.
pub trait GatedModel {
    /// Model type identifier used for member lookups.
    const MODEL_TYPE: &'static str;

    /// Returns the model type identifier.
    #[must_use]
    fn model_type() -> ModelTypeId {
        ModelTypeId::new(Self::MODEL_TYPE)
    }

    /// Resolves a member call in the context of a live instance.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] exactly as [`DispatchGate::resolve`] does.
    fn call_on_instance<I, P, S>(
        &self,
        gate: &DispatchGate<I, P, S>,
        name: &str,
        args: Vec<Value>,
    ) -> Result<CallResult, GateError>
    where
        I: AnnotationInspector,
        P: PolicyProvider,
        S: Sanitizer,
    {
        gate.resolve(&Self::model_type(), name, args)
    }

    /// Resolves a member call without an instance.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] exactly as [`DispatchGate::resolve`] does.
    fn call_on_type<I, P, S>(
        gate: &DispatchGate<I, P, S>,
        name: &str,
        args: Vec<Value>,
    ) -> Result<CallResult, GateError>
    where
        I: AnnotationInspector,
        P: PolicyProvider,
        S: Sanitizer,
    {
        gate.resolve(&Self::model_type(), name, args)
    }
}

// ============================================================================
// SECTION: Model Surface
// ============================================================================

/// Gate handle bound to a runtime-selected model type.
pub struct ModelSurface<'g, I, P, S> {
    /// Gate that performs resolution.
    gate: &'g DispatchGate<I, P, S>,
    /// Model type every call targets.
    model: ModelTypeId,
}

impl<'g, I, P, S> ModelSurface<'g, I, P, S>
where
    I: AnnotationInspector,
    P: PolicyProvider,
    S: Sanitizer,
{
    /// Binds a gate to a model type.
    #[must_use]
    pub const fn new(gate: &'g DispatchGate<I, P, S>, model: ModelTypeId) -> Self {
        Self {
            gate,
            model,
        }
    }

    /// Returns the bound model type.
    #[must_use]
    pub const fn model(&self) -> &ModelTypeId {
        &self.model
    }

    /// Resolves a member call on the bound model type.
    ///
    /// # Errors
    ///
    /// Returns [`GateError`] exactly as [`DispatchGate::resolve`] does.
    pub fn call(&self, name: &str, args: Vec<Value>) -> Result<CallResult, GateError> {
        self.gate.resolve(&self.model, name, args)
    }
}
