// crates/acless-core/src/core/mod.rs
// ============================================================================
// Module: Acless Core Types
// Description: Canonical model, member, and call-result structures.
// Purpose: Provide stable, serializable types shared by the gate and its collaborators.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Core types describe model members and their declared tags, the transient
//! call request, and the call result handed to executors. These types are the
//! canonical source of truth for the CLI and any other surface.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod member;
pub mod request;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::MemberName;
pub use identifiers::ModelTypeId;
pub use member::MemberDescriptor;
pub use member::MemberKind;
pub use member::MemberTags;
pub use request::CallRequest;
pub use request::CallResult;
pub use request::CallTarget;
