//! The `ContainerBuilder` registration phase and the `Container` lookup facade.

use crate::beans::Beans;
use crate::cache::InstanceCache;
use crate::core::TypeKey;
use crate::definition::{DefinitionInfo, Role, Scope, ServiceDefinition};
use crate::error::{IocError, Result};
use crate::registry::Registry;
use crate::resolver::Resolver;

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Collects service definitions before the container opens for lookups.
///
/// Registration needs `&mut self`, so it cannot overlap with lookups: a
/// [`Container`] only exists once [`build`](Self::build) has consumed the
/// builder, and its set of definitions is closed from then on.
#[derive(Default)]
pub struct ContainerBuilder {
  registry: Registry,
  eager: bool,
}

impl ContainerBuilder {
  /// Creates a new, empty `ContainerBuilder`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds a definition. Fails with [`IocError::DuplicateName`] if the name is taken.
  pub fn register(&mut self, definition: ServiceDefinition) -> Result<&mut Self> {
    let name = definition.name.clone();
    let scope = definition.scope;
    self.registry.register(definition)?;
    tracing::debug!(name = %name, scope = %scope, "registered service definition");
    Ok(self)
  }

  /// Registers an already-built value as a singleton named `name`.
  pub fn register_instance<T: Send + Sync + 'static>(
    &mut self,
    name: &str,
    value: T,
  ) -> Result<&mut Self> {
    self.register(ServiceDefinition::of::<T>(name).instance(value))
  }

  /// When set, [`build`](Self::build) constructs every singleton up front so
  /// wiring errors surface at startup instead of on first lookup.
  pub fn eager(&mut self, eager: bool) -> &mut Self {
    self.eager = eager;
    self
  }

  pub fn len(&self) -> usize {
    self.registry.len()
  }

  pub fn is_empty(&self) -> bool {
    self.registry.len() == 0
  }

  /// Closes registration and opens the container for lookups.
  pub fn build(self) -> Result<Container> {
    let cache = InstanceCache::new(&self.registry);
    let container = Container {
      resolver: Resolver::new(self.registry),
      cache,
    };
    tracing::debug!(
      definitions = container.len(),
      eager = self.eager,
      "container built"
    );
    if self.eager {
      container.preinstantiate_singletons()?;
    }
    Ok(container)
  }
}

impl fmt::Debug for ContainerBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ContainerBuilder")
      .field("definitions", &self.registry.names())
      .field("eager", &self.eager)
      .finish()
  }
}

/// The dependency injection container.
///
/// Lookups take `&self` and may run from any number of threads at once.
/// Singletons are built lazily on first lookup, exactly once, and live as long
/// as the container. Dropping the container drops every instance it still holds.
pub struct Container {
  resolver: Resolver,
  cache: InstanceCache,
}

impl Container {
  pub fn builder() -> ContainerBuilder {
    ContainerBuilder::new()
  }

  // --- PRIVATE HELPERS ---

  /// Plans `index` and builds the singletons it needs, dependencies first.
  fn prepare(&self, index: usize) -> Result<()> {
    let order = self.resolver.plan(index, |i| self.cache.is_built(i))?;
    self.cache.warm(&self.resolver, &order)
  }

  fn fetch<T: ?Sized + Send + Sync + 'static>(&self, index: usize, key: &TypeKey) -> Result<Arc<T>> {
    self.prepare(index)?;
    let handle = self.cache.handle(&self.resolver, index, key)?;
    downcast_handle(handle).ok_or_else(|| IocError::TypeMismatch {
      name: self.resolver.registry().get(index).name().to_owned(),
      requested: key.name.to_owned(),
    })
  }

  // --- Resolution ---

  /// Resolves the single definition declaring `T`.
  ///
  /// Fails with [`IocError::NotFound`] when nothing declares `T`, and with
  /// [`IocError::Ambiguous`] when several candidates do and none is primary.
  pub fn get_by_type<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
    let key = TypeKey::of::<T>();
    let index = self.resolver.select(&key, None)?;
    self.fetch(index, &key)
  }

  /// Resolves `T`, using `qualifier` to choose among several candidates.
  /// A qualifier matches a definition's name or one of its qualifier labels,
  /// and takes precedence over the primary marking.
  pub fn get_qualified<T: ?Sized + Send + Sync + 'static>(&self, qualifier: &str) -> Result<Arc<T>> {
    let key = TypeKey::of::<T>();
    let index = self.resolver.select(&key, Some(qualifier))?;
    self.fetch(index, &key)
  }

  /// Resolves the definition named `name` as `T`.
  ///
  /// Fails with [`IocError::NotFound`] for an unknown name and with
  /// [`IocError::TypeMismatch`] when that definition does not declare `T`.
  pub fn get_by_name<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
    let key = TypeKey::of::<T>();
    let index = self.resolver.select_named(name, &key)?;
    self.fetch(index, &key)
  }

  /// Resolves every definition declaring `T`, keyed by name in registration
  /// order. Returns an empty collection when nothing matches.
  pub fn get_all_by_type<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Beans<T>> {
    let key = TypeKey::of::<T>();
    let candidates = self.resolver.registry().all_by_type(&key);
    let mut entries = Vec::with_capacity(candidates.len());
    for &index in candidates {
      let name = self.resolver.registry().get(index).name().to_owned();
      entries.push((name, self.fetch(index, &key)?));
    }
    Ok(Beans::from_entries(entries))
  }

  /// Builds every singleton that is not built yet, in registration order.
  pub fn preinstantiate_singletons(&self) -> Result<()> {
    for (index, definition) in self.resolver.registry().iter().enumerate() {
      if definition.scope == Scope::Singleton && !self.cache.is_built(index) {
        self.prepare(index)?;
      }
    }
    Ok(())
  }

  // --- Introspection ---

  /// Every definition name, in registration order.
  pub fn definition_names(&self) -> Vec<&str> {
    self.resolver.registry().names()
  }

  pub fn definition_names_with_role(&self, role: Role) -> Vec<&str> {
    self
      .resolver
      .registry()
      .iter()
      .filter(|definition| definition.role == role)
      .map(ServiceDefinition::name)
      .collect()
  }

  pub fn definition(&self, name: &str) -> Result<DefinitionInfo> {
    self.resolver.registry().by_name(name).map(ServiceDefinition::info)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.resolver.registry().index_of(name).is_ok()
  }

  /// Whether the singleton named `name` has been constructed yet.
  /// Always `false` for prototypes and unknown names.
  pub fn is_instantiated(&self, name: &str) -> bool {
    self
      .resolver
      .registry()
      .index_of(name)
      .map(|index| self.cache.is_built(index))
      .unwrap_or(false)
  }

  pub fn len(&self) -> usize {
    self.resolver.registry().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl fmt::Debug for Container {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Container")
      .field("definitions", &self.definition_names())
      .finish_non_exhaustive()
  }
}

fn downcast_handle<T: ?Sized + Send + Sync + 'static>(handle: Box<dyn Any + Send + Sync>) -> Option<Arc<T>> {
  handle.downcast::<Arc<T>>().ok().map(|arc| *arc)
}
