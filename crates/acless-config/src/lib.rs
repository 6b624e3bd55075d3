// crates/acless-config/src/lib.rs
// ============================================================================
// Module: Acless Config Library
// Description: Canonical config model and validation for the Acless gate.
// Purpose: Single source of truth for acless.toml semantics.
// Dependencies: acless-core, serde, toml
// ============================================================================

//! ## Overview
//! `acless-config` defines the configuration model for the Acless gate: tag
//! policy, audit output, sanitation limits, and the declared member table.
//! Validation is strict and fail-closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
