//! The singleton registry: at most one instance per singleton definition.

use crate::core::{Handle, Instance, TypeKey};
use crate::definition::{DependencyKind, Provider, Scope};
use crate::dependencies::{Dependencies, Resolved};
use crate::error::{IocError, Result};
use crate::registry::Registry;
use crate::resolver::Resolver;

use once_cell::sync::OnceCell;

/// One lazily filled cell per definition, indexed like the registry.
///
/// `OnceCell::get_or_try_init` gives the per-definition exclusion: the first
/// caller runs the factory while concurrent callers for the same definition
/// block until the value is published, then all of them observe the same
/// instance. Cells of different definitions are independent, so unrelated
/// singletons build in parallel. A failed construction leaves the cell empty.
pub(crate) struct InstanceCache {
  cells: Vec<OnceCell<Instance>>,
}

/// What a definition's factory receives in one declared dependency position.
enum Slot {
  Single,
  /// The names of every candidate, in registration order.
  All(Vec<String>),
}

#[derive(Clone, Copy)]
struct Target {
  index: usize,
  key: TypeKey,
}

/// A definition under construction, collecting its dependency handles.
struct Frame {
  index: usize,
  /// The type the consumer asked this definition for.
  wanted: TypeKey,
  slots: Vec<Slot>,
  targets: Vec<Target>,
  handles: Vec<Handle>,
}

impl Frame {
  fn new(resolver: &Resolver, index: usize, wanted: TypeKey) -> Result<Self> {
    let definition = resolver.registry().get(index);
    let mut slots = Vec::with_capacity(definition.dependencies.len());
    let mut targets = Vec::with_capacity(definition.dependencies.len());
    for dependency in &definition.dependencies {
      let key = dependency.key;
      match &dependency.kind {
        DependencyKind::Single { qualifier } => {
          let selected = resolver.select(&key, qualifier.as_deref())?;
          targets.push(Target { index: selected, key });
          slots.push(Slot::Single);
        }
        DependencyKind::All => {
          let candidates = resolver.registry().all_by_type(&key);
          targets.extend(candidates.iter().map(|&index| Target { index, key }));
          slots.push(Slot::All(
            candidates
              .iter()
              .map(|&i| resolver.registry().get(i).name().to_owned())
              .collect(),
          ));
        }
      }
    }
    let handles = Vec::with_capacity(targets.len());
    Ok(Self {
      index,
      wanted,
      slots,
      targets,
      handles,
    })
  }

  fn pending(&self) -> Option<Target> {
    self.targets.get(self.handles.len()).copied()
  }

  fn into_dependencies(self, owner: &str) -> Dependencies {
    let mut handles = self.handles.into_iter();
    let mut resolved = Vec::with_capacity(self.slots.len());
    for slot in self.slots {
      match slot {
        Slot::Single => resolved.extend(handles.next().map(Resolved::Single)),
        Slot::All(names) => resolved.push(Resolved::All(names.into_iter().zip(&mut handles).collect())),
      }
    }
    Dependencies::new(owner, resolved)
  }
}

impl InstanceCache {
  /// Creates the cells, pre-filling those of definitions registered with a
  /// ready-made instance.
  pub(crate) fn new(registry: &Registry) -> Self {
    let cells = registry
      .iter()
      .map(|definition| match &definition.provider {
        Provider::Instance(instance) => OnceCell::with_value(instance.clone()),
        Provider::Factory(_) => OnceCell::new(),
      })
      .collect();
    Self { cells }
  }

  pub(crate) fn is_built(&self, index: usize) -> bool {
    self.cells[index].get().is_some()
  }

  /// Builds the singletons of a plan in its dependency-first order, so that
  /// every construction finds its singleton dependencies already cached.
  pub(crate) fn warm(&self, resolver: &Resolver, order: &[usize]) -> Result<()> {
    for &index in order {
      if resolver.registry().get(index).scope == Scope::Singleton {
        self.get_or_create(resolver, index)?;
      }
    }
    Ok(())
  }

  /// Returns the instance for `index`, constructing it if needed. The caller
  /// must have planned and warmed `index` first.
  pub(crate) fn get_or_create(&self, resolver: &Resolver, index: usize) -> Result<Instance> {
    let definition = resolver.registry().get(index);
    match definition.scope {
      Scope::Singleton => {
        let cell = &self.cells[index];
        if let Some(instance) = cell.get() {
          tracing::trace!(name = definition.name(), "singleton cache hit");
          return Ok(instance.clone());
        }
        cell
          .get_or_try_init(|| self.construct(resolver, index))
          .cloned()
      }
      Scope::Prototype => self.construct(resolver, index),
    }
  }

  /// Returns the instance for `index` viewed as the declared type `key`.
  pub(crate) fn handle(&self, resolver: &Resolver, index: usize, key: &TypeKey) -> Result<Handle> {
    let instance = self.get_or_create(resolver, index)?;
    view(resolver, index, key, &instance)
  }

  /// Constructs `index` with an explicit stack of frames. Singleton
  /// dependencies are taken from the cache; prototype dependencies get a
  /// frame of their own and a fresh instance for every position that needs one.
  fn construct(&self, resolver: &Resolver, index: usize) -> Result<Instance> {
    let produced = resolver.registry().get(index).produced;
    let mut current = Frame::new(resolver, index, produced)?;
    let mut parents: Vec<Frame> = Vec::new();

    loop {
      if let Some(target) = current.pending() {
        if resolver.registry().get(target.index).scope == Scope::Singleton {
          let handle = self.handle(resolver, target.index, &target.key)?;
          current.handles.push(handle);
        } else {
          let child = Frame::new(resolver, target.index, target.key)?;
          parents.push(std::mem::replace(&mut current, child));
        }
        continue;
      }

      let (finished, wanted) = (current.index, current.wanted);
      let instance = invoke(resolver, current)?;
      match parents.pop() {
        None => return Ok(instance),
        Some(mut parent) => {
          parent.handles.push(view(resolver, finished, &wanted, &instance)?);
          current = parent;
        }
      }
    }
  }
}

fn invoke(resolver: &Resolver, frame: Frame) -> Result<Instance> {
  let definition = resolver.registry().get(frame.index);
  match &definition.provider {
    Provider::Factory(factory) => {
      tracing::debug!(
        name = definition.name(),
        scope = %definition.scope,
        "constructing service"
      );
      let mut dependencies = frame.into_dependencies(definition.name());
      factory(&mut dependencies)
    }
    Provider::Instance(instance) => Ok(instance.clone()),
  }
}

fn view(resolver: &Resolver, index: usize, key: &TypeKey, instance: &Instance) -> Result<Handle> {
  let definition = resolver.registry().get(index);
  definition
    .cast(key, instance)
    .ok_or_else(|| IocError::TypeMismatch {
      name: definition.name().to_owned(),
      requested: key.name.to_owned(),
    })
}
