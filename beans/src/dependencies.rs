//! The resolved dependencies handed to a factory.

use crate::beans::Beans;
use crate::core::Handle;
use crate::error::{IocError, Result};

use std::sync::Arc;

pub(crate) enum Resolved {
  Single(Handle),
  All(Vec<(String, Handle)>),
}

/// A factory's dependencies, already resolved in the order they were declared.
///
/// Each call to [`next`](Self::next) or [`next_all`](Self::next_all) consumes
/// the next declared dependency. Asking for a different type or shape than was
/// declared at that position yields [`IocError::DependencyMismatch`].
pub struct Dependencies {
  owner: String,
  position: usize,
  slots: std::vec::IntoIter<Resolved>,
}

impl Dependencies {
  pub(crate) fn new(owner: &str, resolved: Vec<Resolved>) -> Self {
    Self {
      owner: owner.to_owned(),
      position: 0,
      slots: resolved.into_iter(),
    }
  }

  /// Name of the definition being constructed.
  pub fn owner(&self) -> &str {
    &self.owner
  }

  /// How many declared dependencies have not been consumed yet.
  pub fn remaining(&self) -> usize {
    self.slots.len()
  }

  /// Takes the next dependency, declared with `depends_on::<U>()` or
  /// `depends_on_qualified::<U>(..)`.
  pub fn next<U: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Arc<U>> {
    let position = self.advance();
    match self.slots.next() {
      Some(Resolved::Single(handle)) => handle
        .downcast::<Arc<U>>()
        .map(|arc| *arc)
        .map_err(|_| self.mismatch::<U>(position)),
      _ => Err(self.mismatch::<U>(position)),
    }
  }

  /// Takes the next dependency, declared with `depends_on_all::<U>()`.
  pub fn next_all<U: ?Sized + Send + Sync + 'static>(&mut self) -> Result<Beans<U>> {
    let position = self.advance();
    match self.slots.next() {
      Some(Resolved::All(handles)) => {
        let mut entries = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
          let arc = handle
            .downcast::<Arc<U>>()
            .map_err(|_| self.mismatch::<U>(position))?;
          entries.push((name, *arc));
        }
        Ok(Beans::from_entries(entries))
      }
      _ => Err(self.mismatch::<U>(position)),
    }
  }

  fn advance(&mut self) -> usize {
    let position = self.position;
    self.position += 1;
    position
  }

  fn mismatch<U: ?Sized>(&self, position: usize) -> IocError {
    IocError::DependencyMismatch {
      definition: self.owner.clone(),
      position,
      expected: std::any::type_name::<U>().to_owned(),
    }
  }
}
