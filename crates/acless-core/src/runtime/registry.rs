// crates/acless-core/src/runtime/registry.rs
// ============================================================================
// Module: Member Registry
// Description: Initialization-time registry of model members and their tags.
// Purpose: Back the annotation inspector with an explicit, immutable table.
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! The member registry maps `(model, kind, name)` to a [`MemberDescriptor`].
//! It is populated once during initialization and only read afterwards, which
//! makes it safe to share across threads without coordination.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::MemberDescriptor;
use crate::core::MemberKind;
use crate::core::MemberName;
use crate::core::MemberTags;
use crate::core::ModelTypeId;
use crate::interfaces::AnnotationInspector;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum length in bytes for model and member names.
pub const MAX_NAME_LENGTH: usize = 255;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Registry construction errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Model or member name is empty or exceeds the length limit.
    #[error("invalid name: {0}")]
    InvalidName(String),
    /// Member is already registered for the model and kind.
    #[error("{kind} already registered: {model}.{member}")]
    DuplicateMember {
        /// Model type identifier.
        model: String,
        /// Member name.
        member: String,
        /// Member kind.
        kind: MemberKind,
    },
}

// ============================================================================
// SECTION: Model Members
// ============================================================================

/// Members declared on a single model type.
#[derive(Debug, Clone, Default)]
struct ModelMembers {
    /// Methods keyed by name.
    methods: BTreeMap<MemberName, MemberDescriptor>,
    /// Properties keyed by name.
    properties: BTreeMap<MemberName, MemberDescriptor>,
}

impl ModelMembers {
    /// Returns the member table for a kind.
    const fn table(&self, kind: MemberKind) -> &BTreeMap<MemberName, MemberDescriptor> {
        match kind {
            MemberKind::Method => &self.methods,
            MemberKind::Property => &self.properties,
        }
    }

    /// Returns the mutable member table for a kind.
    const fn table_mut(&mut self, kind: MemberKind) -> &mut BTreeMap<MemberName, MemberDescriptor> {
        match kind {
            MemberKind::Method => &mut self.methods,
            MemberKind::Property => &mut self.properties,
        }
    }
}

// ============================================================================
// SECTION: Member Registry
// ============================================================================

/// Registry of model members with declared tags.
///
/// # Invariants
/// - Names are non-empty and at most [`MAX_NAME_LENGTH`] bytes.
/// - Member names are unique per model within their kind.
/// - Descriptors are never mutated after registration.
#[derive(Debug, Clone, Default)]
pub struct MemberRegistry {
    /// Members keyed by model type.
    models: BTreeMap<ModelTypeId, ModelMembers>,
}

impl MemberRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            models: BTreeMap::new(),
        }
    }

    /// Declares a model type with no members.
    ///
    /// Declaring an already known model is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidName`] when the model name is invalid.
    pub fn register_model(&mut self, model: impl Into<ModelTypeId>) -> Result<(), RegistryError> {
        let model = model.into();
        validate_name("model", model.as_str())?;
        self.models.entry(model).or_default();
        Ok(())
    }

    /// Registers a member with its declared tags.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when a name is invalid or the member is
    /// already registered for the model and kind.
    pub fn register(
        &mut self,
        model: impl Into<ModelTypeId>,
        name: impl Into<MemberName>,
        kind: MemberKind,
        tags: MemberTags,
    ) -> Result<(), RegistryError> {
        let model = model.into();
        let name = name.into();
        validate_name("model", model.as_str())?;
        validate_name("member", name.as_str())?;
        let table = self.models.entry(model.clone()).or_default().table_mut(kind);
        if table.contains_key(&name) {
            return Err(RegistryError::DuplicateMember {
                model: model.to_string(),
                member: name.to_string(),
                kind,
            });
        }
        table.insert(name.clone(), MemberDescriptor::new(model, name, kind, tags));
        Ok(())
    }

    /// Returns true when the model type is known.
    #[must_use]
    pub fn contains_model(&self, model: &ModelTypeId) -> bool {
        self.models.contains_key(model)
    }

    /// Iterates known model types in sorted order.
    pub fn models(&self) -> impl Iterator<Item = &ModelTypeId> {
        self.models.keys()
    }

    /// Iterates a model's members, methods first, each kind in name order.
    pub fn members<'a>(
        &'a self,
        model: &ModelTypeId,
    ) -> impl Iterator<Item = &'a MemberDescriptor> + use<'a> {
        let entry = self.models.get(model);
        let methods = entry.into_iter().flat_map(|members| members.methods.values());
        let properties = entry.into_iter().flat_map(|members| members.properties.values());
        methods.chain(properties)
    }

    /// Returns the total number of registered members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.models.values().map(|members| members.methods.len() + members.properties.len()).sum()
    }

    /// Returns true when no members are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnnotationInspector for MemberRegistry {
    fn member(
        &self,
        model: &ModelTypeId,
        name: &str,
        kind: MemberKind,
    ) -> Option<&MemberDescriptor> {
        self.models.get(model)?.table(kind).get(name)
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a registry name against emptiness and length limits.
fn validate_name(field: &str, value: &str) -> Result<(), RegistryError> {
    if value.trim().is_empty() {
        return Err(RegistryError::InvalidName(format!("{field} name must be non-empty")));
    }
    if value.len() > MAX_NAME_LENGTH {
        return Err(RegistryError::InvalidName(format!(
            "{field} name exceeds {MAX_NAME_LENGTH} bytes"
        )));
    }
    Ok(())
}
