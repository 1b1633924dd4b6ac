//! Operation registry
//!
//! Explicit mapping from operation identifiers to their descriptors, built
//! once at startup. Name lookup goes through [`OperationId`]'s closed set of
//! codes, so only registered operations are ever callable by name.

use std::collections::BTreeMap;
use std::str::FromStr;

use armory_domain::{ArmoryError, Result};

use super::catalog::{standard_catalog, OperationDescriptor, OperationId};

/// Registered operations keyed by identifier
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    descriptors: BTreeMap<OperationId, OperationDescriptor>,
}

impl OperationRegistry {
    /// Registry with no operations
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry holding every game-data operation
    pub fn standard() -> Self {
        standard_catalog().into_iter().fold(Self::empty(), Self::with)
    }

    /// Add or replace a descriptor
    #[must_use]
    pub fn with(mut self, descriptor: OperationDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn register(&mut self, descriptor: OperationDescriptor) {
        self.descriptors.insert(descriptor.id, descriptor);
    }

    /// Resolve an operation name to its identifier.
    ///
    /// # Errors
    /// Returns `ArmoryError::UnknownOperation` if the name is not registered.
    pub fn resolve(&self, name: &str) -> Result<OperationId> {
        OperationId::from_str(name)
            .ok()
            .filter(|id| self.descriptors.contains_key(id))
            .ok_or_else(|| ArmoryError::UnknownOperation(name.to_string()))
    }

    /// Descriptor of a registered operation.
    ///
    /// # Errors
    /// Returns `ArmoryError::UnknownOperation` if `id` is not registered.
    pub fn descriptor(&self, id: OperationId) -> Result<&OperationDescriptor> {
        self.descriptors
            .get(&id)
            .ok_or_else(|| ArmoryError::UnknownOperation(id.as_str().to_string()))
    }

    /// Names of every registered operation, sorted by identifier
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.descriptors.keys().map(OperationId::as_str)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
