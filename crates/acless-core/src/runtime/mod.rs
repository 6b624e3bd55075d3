// crates/acless-core/src/runtime/mod.rs
// ============================================================================
// Module: Acless Runtime
// Description: Member registry, argument normalizer, dispatch gate, and call surface.
// Purpose: Resolve untrusted call requests into verified call results.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules implement the resolution pipeline. Every caller-facing
//! entry point funnels into [`DispatchGate::resolve`] so authorization and
//! argument shaping are decided in exactly one place.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod gate;
pub mod normalize;
pub mod policy;
pub mod registry;
pub mod surface;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use gate::DispatchGate;
pub use gate::GateError;
pub use normalize::ArgumentShapeError;
pub use normalize::normalize_args;
pub use policy::DEFAULT_ARRAY_ARGUMENT_TAG;
pub use policy::DEFAULT_AUTHORIZATION_TAG;
pub use policy::PassThroughSanitizer;
pub use policy::StaticPolicy;
pub use registry::MAX_NAME_LENGTH;
pub use registry::MemberRegistry;
pub use registry::RegistryError;
pub use surface::GatedModel;
pub use surface::ModelSurface;
