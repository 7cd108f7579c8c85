//! Core, non-public data structures for the container.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A constructed service as the instance cache stores it.
///
/// The payload is always an `Arc<T>` where `T` is the type the definition's
/// factory produces. Keeping the `Arc<T>` itself (rather than `T`) lets trait
/// object definitions share the same storage shape as concrete ones.
pub(crate) type Instance = Arc<dyn Any + Send + Sync>;

/// A type-erased `Arc<U>` for one of a definition's declared types `U`.
pub(crate) type Handle = Box<dyn Any + Send + Sync>;

/// Identifies a declared type. Equality and hashing only look at the `TypeId`;
/// the name is carried along for error messages and introspection.
#[derive(Clone, Copy)]
pub(crate) struct TypeKey {
  pub(crate) id: TypeId,
  pub(crate) name: &'static str,
}

impl TypeKey {
  pub(crate) fn of<T: ?Sized + Any>() -> Self {
    Self {
      id: TypeId::of::<T>(),
      name: std::any::type_name::<T>(),
    }
  }
}

impl PartialEq for TypeKey {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl fmt::Debug for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "TypeKey({})", self.name)
  }
}

impl fmt::Display for TypeKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}
