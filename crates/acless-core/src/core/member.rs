// crates/acless-core/src/core/member.rs
// ============================================================================
// Module: Acless Members
// Description: Member kinds, declared tags, and member descriptors.
// Purpose: Represent the structured metadata attached to each model member.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A member is a named method or property on a model type. Its metadata is a
//! multimap from tag name to tag values, attached once at registration time.
//! Authorization only ever checks tag presence; values are carried for
//! sanitizers and tooling.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::MemberName;
use crate::core::identifiers::ModelTypeId;

// ============================================================================
// SECTION: Member Kind
// ============================================================================

/// Member kind classification.
///
/// # Invariants
/// - Variants are stable for serialization and audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Callable operation.
    Method,
    /// Data field.
    Property,
}

impl MemberKind {
    /// Returns a stable label for the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::Property => "property",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Member Tags
// ============================================================================

/// Declared metadata tags for a member.
///
/// # Invariants
/// - A tag is present once inserted, even with no values.
/// - Values keep insertion order per tag name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberTags(BTreeMap<String, Vec<String>>);

impl MemberTags {
    /// Creates an empty tag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Marks a tag as present without adding a value.
    pub fn insert_flag(&mut self, name: impl Into<String>) {
        self.0.entry(name.into()).or_default();
    }

    /// Appends a value under the given tag name.
    pub fn insert_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// Returns a copy with the tag marked present.
    #[must_use]
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.insert_flag(name);
        self
    }

    /// Returns a copy with the value appended under the tag name.
    #[must_use]
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert_value(name, value);
        self
    }

    /// Returns true when the tag is present.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Returns the values recorded for a tag (empty when absent or flag-only).
    #[must_use]
    pub fn values(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Iterates tag names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Returns the number of distinct tag names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no tags are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for MemberTags {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut tags = Self::new();
        for name in iter {
            tags.insert_flag(name);
        }
        tags
    }
}

// ============================================================================
// SECTION: Member Descriptor
// ============================================================================

/// Registered member with its declared metadata.
///
/// # Invariants
/// - `(model, kind, name)` is unique within a registry.
/// - Read-only once registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDescriptor {
    /// Owning model type.
    pub model: ModelTypeId,
    /// Member name.
    pub name: MemberName,
    /// Member kind.
    pub kind: MemberKind,
    /// Declared metadata tags.
    pub tags: MemberTags,
}

impl MemberDescriptor {
    /// Creates a new member descriptor.
    #[must_use]
    pub const fn new(
        model: ModelTypeId,
        name: MemberName,
        kind: MemberKind,
        tags: MemberTags,
    ) -> Self {
        Self {
            model,
            name,
            kind,
            tags,
        }
    }
}
