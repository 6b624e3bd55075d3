// crates/acless-core/src/runtime/normalize.rs
// ============================================================================
// Module: Argument Normalizer
// Description: Collapses positional call arguments into one structured argument.
// Purpose: Enforce the single-wrapped-object calling convention for plain calls.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! External callers wrap their real parameters in a single-element outer list.
//! [`normalize_args`] takes the first element as the candidate (an empty list
//! yields an empty object) and requires it to be a JSON object. Elements after
//! the first are dropped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Normalized candidate was not a structured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expects an array of parameters, found {found}")]
pub struct ArgumentShapeError {
    /// JSON type label of the rejected candidate.
    pub found: &'static str,
}

// ============================================================================
// SECTION: Normalizer
// ============================================================================

/// Collapses a positional argument list into its single structured argument.
///
/// # Errors
///
/// Returns [`ArgumentShapeError`] when the first argument is not a JSON object.
pub fn normalize_args(args: Vec<Value>) -> Result<Map<String, Value>, ArgumentShapeError> {
    match args.into_iter().next() {
        None => Ok(Map::new()),
        Some(Value::Object(map)) => Ok(map),
        Some(other) => Err(ArgumentShapeError {
            found: json_type_label(&other),
        }),
    }
}

/// Returns a stable JSON type label for error messages.
const fn json_type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
