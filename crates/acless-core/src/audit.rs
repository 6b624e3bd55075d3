// crates/acless-core/src/audit.rs
// ============================================================================
// Module: Gate Audit Logging
// Description: Structured audit events for dispatch gate resolutions.
// Purpose: Emit redacted JSON-lines audit logs without hard dependencies.
// Dependencies: crate::core, serde, serde_json
// ============================================================================

//! ## Overview
//! Every gate resolution produces one [`GateAuditEvent`]. Events carry the
//! model, member, outcome, and argument counts but never argument values.
//! Sinks are intentionally lightweight so deployments can route events to
//! their preferred logging pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::MemberKind;
use crate::core::ModelTypeId;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Gate resolution outcome classification.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateOutcome {
    /// Call result produced.
    Allowed,
    /// Member exists but lacks the authorization tag.
    Denied,
    /// No member with the requested name.
    NotFound,
    /// Arguments were malformed or failed sanitation.
    Rejected,
}

impl GateOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allowed => "allowed",
            Self::Denied => "denied",
            Self::NotFound => "not_found",
            Self::Rejected => "rejected",
        }
    }
}

/// Gate audit event payload.
///
/// # Invariants
/// - Argument values are never recorded; only counts.
/// - `kind` is `None` only when no member was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GateAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Model type the call targeted.
    pub model: ModelTypeId,
    /// Requested member name.
    pub member: String,
    /// Resolved member kind.
    pub kind: Option<MemberKind>,
    /// Resolution outcome.
    pub outcome: GateOutcome,
    /// Stable error code on failure.
    pub error_code: Option<&'static str>,
    /// Plain-argument mode, when resolution reached the argument stage.
    pub plain_args: Option<bool>,
    /// Number of raw positional arguments supplied.
    pub arg_count: usize,
    /// Positional arguments discarded by normalization.
    pub dropped_args: usize,
}

impl GateAuditEvent {
    /// Builds a `gate_resolve` event stamped with the current time.
    #[must_use]
    pub fn resolve(model: &ModelTypeId, member: &str, outcome: GateOutcome) -> Self {
        Self {
            event: "gate_resolve",
            timestamp_ms: now_ms(),
            model: model.clone(),
            member: member.to_string(),
            kind: None,
            outcome,
            error_code: None,
            plain_args: None,
            arg_count: 0,
            dropped_args: 0,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for gate resolution events.
pub trait GateAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &GateAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct GateStderrAuditSink;

impl GateAuditSink for GateStderrAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct GateFileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl GateFileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl GateAuditSink for GateFileAuditSink {
    fn record(&self, event: &GateAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

/// No-op audit sink.
pub struct GateNoopAuditSink;

impl GateAuditSink for GateNoopAuditSink {
    fn record(&self, _event: &GateAuditEvent) {}
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns milliseconds since the Unix epoch (zero if the clock is before it).
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |duration| duration.as_millis())
}
