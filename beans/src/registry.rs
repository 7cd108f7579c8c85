//! Storage and enumeration of service definitions.

use crate::core::TypeKey;
use crate::definition::ServiceDefinition;
use crate::error::{IocError, Result};

use std::collections::HashMap;

/// Holds every definition in registration order, indexed by name and by each
/// declared type.
///
/// Definitions are addressed by their registration index everywhere else in
/// the crate. The registry is filled during the builder phase and never
/// changes once the container is built.
#[derive(Default)]
pub(crate) struct Registry {
  definitions: Vec<ServiceDefinition>,
  by_name: HashMap<String, usize>,
  by_type: HashMap<TypeKey, Vec<usize>>,
}

impl Registry {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  pub(crate) fn register(&mut self, definition: ServiceDefinition) -> Result<usize> {
    if self.by_name.contains_key(&definition.name) {
      return Err(IocError::DuplicateName {
        name: definition.name,
      });
    }
    let index = self.definitions.len();
    for binding in &definition.bindings {
      self.by_type.entry(binding.key).or_default().push(index);
    }
    self.by_name.insert(definition.name.clone(), index);
    self.definitions.push(definition);
    Ok(index)
  }

  /// Indices of definitions declaring `key`, in registration order.
  pub(crate) fn all_by_type(&self, key: &TypeKey) -> &[usize] {
    self.by_type.get(key).map(Vec::as_slice).unwrap_or(&[])
  }

  pub(crate) fn index_of(&self, name: &str) -> Result<usize> {
    self
      .by_name
      .get(name)
      .copied()
      .ok_or_else(|| IocError::not_found(format!("name '{}'", name)))
  }

  pub(crate) fn by_name(&self, name: &str) -> Result<&ServiceDefinition> {
    self.index_of(name).map(|index| self.get(index))
  }

  /// Index-based access; indices only ever come from this registry.
  pub(crate) fn get(&self, index: usize) -> &ServiceDefinition {
    &self.definitions[index]
  }

  pub(crate) fn iter(&self) -> impl Iterator<Item = &ServiceDefinition> {
    self.definitions.iter()
  }

  pub(crate) fn len(&self) -> usize {
    self.definitions.len()
  }

  pub(crate) fn names(&self) -> Vec<&str> {
    self.iter().map(ServiceDefinition::name).collect()
  }
}
