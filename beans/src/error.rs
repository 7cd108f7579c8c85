//! Error types reported by registration and lookup.

use thiserror::Error;

/// Boxed error produced by a user factory.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for every fallible container operation.
///
/// None of these are transient. Each describes a structural condition of the
/// registered definitions, so the container never retries and always hands
/// the precise kind back to the caller.
#[derive(Debug, Error)]
pub enum IocError {
  /// A definition with this name was already registered.
  #[error("a service definition named '{name}' is already registered")]
  DuplicateName { name: String },

  /// No definition matched a type lookup, or a named lookup missed.
  #[error("no service definition found for {requested}")]
  NotFound { requested: String },

  /// Two or more candidates matched and no rule narrowed them to one.
  #[error("{requested} is ambiguous, candidates: {}", .candidates.join(", "))]
  Ambiguous {
    requested: String,
    candidates: Vec<String>,
  },

  /// A definition's dependency chain leads back to itself.
  #[error("circular dependency detected: {}", .path.join(" -> "))]
  CyclicDependency { path: Vec<String> },

  /// A named lookup hit a definition that does not declare the requested type.
  #[error("service definition '{name}' does not provide {requested}")]
  TypeMismatch { name: String, requested: String },

  /// A factory consumed its dependencies in a different order or shape than declared.
  #[error("factory of '{definition}' requested {expected} for dependency #{position}, which was declared differently")]
  DependencyMismatch {
    definition: String,
    position: usize,
    expected: String,
  },

  /// A factory returned its own error.
  #[error("failed to construct '{name}': {source}")]
  Construction {
    name: String,
    #[source]
    source: BoxError,
  },
}

impl IocError {
  pub(crate) fn not_found(requested: impl Into<String>) -> Self {
    IocError::NotFound {
      requested: requested.into(),
    }
  }

  /// Wraps a factory's own failure. Factories call this from inside their body
  /// with the name they are registered under.
  pub fn construction(name: impl Into<String>, source: impl Into<BoxError>) -> Self {
    IocError::Construction {
      name: name.into(),
      source: source.into(),
    }
  }

  pub fn is_not_found(&self) -> bool {
    matches!(self, IocError::NotFound { .. })
  }

  pub fn is_ambiguous(&self) -> bool {
    matches!(self, IocError::Ambiguous { .. })
  }

  pub fn is_cyclic(&self) -> bool {
    matches!(self, IocError::CyclicDependency { .. })
  }

  pub fn is_duplicate(&self) -> bool {
    matches!(self, IocError::DuplicateName { .. })
  }
}

/// A specialized `Result` type for `fibre_beans` operations.
pub type Result<T, E = IocError> = std::result::Result<T, E>;
