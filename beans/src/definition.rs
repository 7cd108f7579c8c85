//! Service definitions and the builder used to describe them.

use crate::core::{Handle, Instance, TypeKey};
use crate::dependencies::Dependencies;
use crate::error::Result;

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// How many instances a definition produces over the container's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
  /// One instance, built on first lookup and shared by every caller.
  #[default]
  Singleton,
  /// A fresh instance for every lookup.
  Prototype,
}

/// Who a definition is for. Purely informational; used to filter introspection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Role {
  /// Registered by the application itself.
  #[default]
  Application,
  /// Supporting plumbing the application does not look up directly.
  Infrastructure,
}

impl fmt::Display for Scope {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Scope::Singleton => f.write_str("singleton"),
      Scope::Prototype => f.write_str("prototype"),
    }
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Role::Application => f.write_str("application"),
      Role::Infrastructure => f.write_str("infrastructure"),
    }
  }
}

pub(crate) type Factory = Box<dyn Fn(&mut Dependencies) -> Result<Instance> + Send + Sync>;
type Caster = Box<dyn Fn(&Instance) -> Option<Handle> + Send + Sync>;

pub(crate) enum Provider {
  Factory(Factory),
  /// Built before registration; the cache is seeded with it at build time.
  Instance(Instance),
}

/// A type the definition can be looked up as, with the cast that turns the
/// stored instance into an `Arc` of that type.
pub(crate) struct Binding {
  pub(crate) key: TypeKey,
  cast: Caster,
}

#[derive(Clone)]
pub(crate) enum DependencyKind {
  Single { qualifier: Option<String> },
  All,
}

#[derive(Clone)]
pub(crate) struct Dependency {
  pub(crate) key: TypeKey,
  pub(crate) kind: DependencyKind,
}

/// One registrable unit: a unique name, the types it satisfies, the dependencies
/// its factory needs and the factory itself.
///
/// Definitions are created with [`ServiceDefinition::of`], which returns a
/// [`DefinitionBuilder`]. The builder is finished by supplying the factory.
pub struct ServiceDefinition {
  pub(crate) name: String,
  pub(crate) produced: TypeKey,
  pub(crate) bindings: Vec<Binding>,
  pub(crate) dependencies: Vec<Dependency>,
  pub(crate) provider: Provider,
  pub(crate) scope: Scope,
  pub(crate) role: Role,
  pub(crate) primary: bool,
  pub(crate) qualifiers: Vec<String>,
  pub(crate) description: Option<String>,
}

impl ServiceDefinition {
  /// Starts describing a definition named `name` whose factory produces `T`.
  ///
  /// `T` may be a concrete type or a trait object such as `dyn DiscountPolicy`.
  /// `T` is always one of the definition's declared types; more can be added
  /// with [`DefinitionBuilder::exposes`].
  pub fn of<T: ?Sized + Send + Sync + 'static>(name: impl Into<String>) -> DefinitionBuilder<T> {
    DefinitionBuilder::new(name.into())
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn scope(&self) -> Scope {
    self.scope
  }

  pub fn is_primary(&self) -> bool {
    self.primary
  }

  pub(crate) fn declares(&self, key: &TypeKey) -> bool {
    self.bindings.iter().any(|b| b.key == *key)
  }

  /// Views `instance` as the declared type `key`, yielding a boxed `Arc<U>`.
  pub(crate) fn cast(&self, key: &TypeKey, instance: &Instance) -> Option<Handle> {
    self
      .bindings
      .iter()
      .find(|b| b.key == *key)
      .and_then(|b| (b.cast)(instance))
  }

  /// A qualifier matches a definition's name or any of its qualifier labels.
  pub(crate) fn matches_qualifier(&self, qualifier: &str) -> bool {
    self.name == qualifier || self.qualifiers.iter().any(|q| q == qualifier)
  }

  /// Takes a snapshot of this definition's metadata.
  pub fn info(&self) -> DefinitionInfo {
    DefinitionInfo {
      name: self.name.clone(),
      type_name: self.produced.name,
      declared_types: self.bindings.iter().map(|b| b.key.name).collect(),
      dependencies: self
        .dependencies
        .iter()
        .map(|d| match &d.kind {
          DependencyKind::Single { qualifier } => DependencyInfo {
            type_name: d.key.name,
            qualifier: qualifier.clone(),
            collection: false,
          },
          DependencyKind::All => DependencyInfo {
            type_name: d.key.name,
            qualifier: None,
            collection: true,
          },
        })
        .collect(),
      scope: self.scope,
      role: self.role,
      primary: self.primary,
      qualifiers: self.qualifiers.clone(),
      description: self.description.clone(),
    }
  }
}

impl fmt::Debug for ServiceDefinition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ServiceDefinition")
      .field("name", &self.name)
      .field("produced", &self.produced)
      .field("scope", &self.scope)
      .field("primary", &self.primary)
      .finish_non_exhaustive()
  }
}

/// Describes a [`ServiceDefinition`] producing `T`.
///
/// ```
/// use fibre_beans::ServiceDefinition;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///   fn greet(&self) -> String;
/// }
///
/// struct English;
/// impl Greeter for English {
///   fn greet(&self) -> String {
///     "Hello!".into()
///   }
/// }
///
/// let definition = ServiceDefinition::of::<English>("english")
///   .exposes::<dyn Greeter>(|english| english)
///   .primary()
///   .factory(|_| Ok(English));
/// assert_eq!(definition.name(), "english");
/// ```
pub struct DefinitionBuilder<T: ?Sized> {
  name: String,
  bindings: Vec<Binding>,
  dependencies: Vec<Dependency>,
  scope: Scope,
  role: Role,
  primary: bool,
  qualifiers: Vec<String>,
  description: Option<String>,
  _produces: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Send + Sync + 'static> DefinitionBuilder<T> {
  fn new(name: String) -> Self {
    let own = Binding {
      key: TypeKey::of::<T>(),
      cast: Box::new(|instance: &Instance| {
        (**instance)
          .downcast_ref::<Arc<T>>()
          .map(|arc| Box::new(arc.clone()) as Handle)
      }),
    };
    Self {
      name,
      bindings: vec![own],
      dependencies: Vec::new(),
      scope: Scope::default(),
      role: Role::default(),
      primary: false,
      qualifiers: Vec::new(),
      description: None,
      _produces: PhantomData,
    }
  }

  /// Declares that this definition also satisfies `U`.
  ///
  /// `cast` converts the produced `Arc<T>` into an `Arc<U>`, which for a trait
  /// object is just the unsizing coercion: `.exposes::<dyn Trait>(|t| t)`.
  /// Both views share the same allocation.
  pub fn exposes<U: ?Sized + Send + Sync + 'static>(
    mut self,
    cast: impl Fn(Arc<T>) -> Arc<U> + Send + Sync + 'static,
  ) -> Self {
    let key = TypeKey::of::<U>();
    self.bindings.retain(|b| b.key != key);
    self.bindings.push(Binding {
      key,
      cast: Box::new(move |instance: &Instance| {
        (**instance)
          .downcast_ref::<Arc<T>>()
          .map(|arc| Box::new(cast(arc.clone())) as Handle)
      }),
    });
    self
  }

  /// Appends a dependency on exactly one `U`, resolved by type.
  pub fn depends_on<U: ?Sized + 'static>(mut self) -> Self {
    self.dependencies.push(Dependency {
      key: TypeKey::of::<U>(),
      kind: DependencyKind::Single { qualifier: None },
    });
    self
  }

  /// Appends a dependency on one `U`, using `qualifier` to choose among
  /// several candidates.
  pub fn depends_on_qualified<U: ?Sized + 'static>(mut self, qualifier: impl Into<String>) -> Self {
    self.dependencies.push(Dependency {
      key: TypeKey::of::<U>(),
      kind: DependencyKind::Single {
        qualifier: Some(qualifier.into()),
      },
    });
    self
  }

  /// Appends a dependency on every `U`, delivered as a [`Beans`](crate::Beans)
  /// keyed by definition name. An empty set is not an error.
  pub fn depends_on_all<U: ?Sized + 'static>(mut self) -> Self {
    self.dependencies.push(Dependency {
      key: TypeKey::of::<U>(),
      kind: DependencyKind::All,
    });
    self
  }

  /// Marks this definition as the default among same-type candidates.
  pub fn primary(mut self) -> Self {
    self.primary = true;
    self
  }

  /// Adds a qualifier label that lookups may use in place of the name.
  pub fn qualifier(mut self, label: impl Into<String>) -> Self {
    self.qualifiers.push(label.into());
    self
  }

  pub fn scope(mut self, scope: Scope) -> Self {
    self.scope = scope;
    self
  }

  pub fn role(mut self, role: Role) -> Self {
    self.role = role;
    self
  }

  pub fn description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Finishes the definition with a factory that returns a shared `Arc<T>`.
  /// This is the form to use when `T` is a trait object.
  pub fn shared_factory<F>(self, factory: F) -> ServiceDefinition
  where
    F: Fn(&mut Dependencies) -> Result<Arc<T>> + Send + Sync + 'static,
  {
    let provider = Provider::Factory(Box::new(move |deps: &mut Dependencies| {
      factory(deps).map(|arc| Arc::new(arc) as Instance)
    }));
    self.finish(provider)
  }

  /// Finishes the definition with an already-built shared instance.
  /// Forces singleton scope.
  pub fn shared_instance(mut self, instance: Arc<T>) -> ServiceDefinition {
    self.scope = Scope::Singleton;
    self.finish(Provider::Instance(Arc::new(instance)))
  }

  fn finish(self, provider: Provider) -> ServiceDefinition {
    ServiceDefinition {
      name: self.name,
      produced: TypeKey::of::<T>(),
      bindings: self.bindings,
      dependencies: self.dependencies,
      provider,
      scope: self.scope,
      role: self.role,
      primary: self.primary,
      qualifiers: self.qualifiers,
      description: self.description,
    }
  }
}

impl<T: Send + Sync + 'static> DefinitionBuilder<T> {
  /// Finishes the definition with a factory producing `T` by value.
  pub fn factory<F>(self, factory: F) -> ServiceDefinition
  where
    F: Fn(&mut Dependencies) -> Result<T> + Send + Sync + 'static,
  {
    self.shared_factory(move |deps| factory(deps).map(Arc::new))
  }

  /// Finishes the definition with an already-built value. Forces singleton scope.
  pub fn instance(self, value: T) -> ServiceDefinition {
    self.shared_instance(Arc::new(value))
  }
}

/// Metadata about a registered definition, for introspection and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionInfo {
  pub name: String,
  /// The type the factory produces.
  pub type_name: &'static str,
  /// Every type the definition can be looked up as, produced type first.
  pub declared_types: Vec<&'static str>,
  pub dependencies: Vec<DependencyInfo>,
  pub scope: Scope,
  pub role: Role,
  pub primary: bool,
  pub qualifiers: Vec<String>,
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyInfo {
  pub type_name: &'static str,
  pub qualifier: Option<String>,
  /// `true` for an all-candidates dependency.
  pub collection: bool,
}

impl fmt::Display for DependencyInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if self.collection {
      write!(f, "all {}", self.type_name)
    } else {
      match &self.qualifier {
        Some(q) => write!(f, "{} @ '{}'", self.type_name, q),
        None => f.write_str(self.type_name),
      }
    }
  }
}

impl fmt::Display for DefinitionInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "Definition [name={}; type={}; scope={}; role={}; primary={}",
      self.name, self.type_name, self.scope, self.role, self.primary
    )?;
    if !self.qualifiers.is_empty() {
      write!(f, "; qualifiers={}", self.qualifiers.join(","))?;
    }
    f.write_str("; dependencies=[")?;
    for (i, dep) in self.dependencies.iter().enumerate() {
      if i > 0 {
        f.write_str(", ")?;
      }
      write!(f, "{}", dep)?;
    }
    f.write_str("]]")
  }
}
