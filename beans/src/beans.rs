//! An ordered, name-keyed collection of resolved services.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Every instance matching a type, keyed by definition name, in registration order.
///
/// Returned by [`Container::get_all_by_type`](crate::Container::get_all_by_type) and
/// delivered to factories that declared
/// [`depends_on_all`](crate::DefinitionBuilder::depends_on_all).
pub struct Beans<T: ?Sized> {
  entries: Vec<(String, Arc<T>)>,
}

impl<T: ?Sized> Beans<T> {
  pub(crate) fn from_entries(entries: Vec<(String, Arc<T>)>) -> Self {
    Self { entries }
  }

  /// Looks up an instance by its definition name.
  pub fn get(&self, name: &str) -> Option<&Arc<T>> {
    self
      .entries
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, instance)| instance)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.get(name).is_some()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.entries.iter().map(|(n, _)| n.as_str())
  }

  pub fn values(&self) -> impl Iterator<Item = &Arc<T>> {
    self.entries.iter().map(|(_, instance)| instance)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<T>)> {
    self.entries.iter().map(|(n, instance)| (n.as_str(), instance))
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Drops the ordering and returns a plain map.
  pub fn into_map(self) -> HashMap<String, Arc<T>> {
    self.entries.into_iter().collect()
  }
}

impl<T: ?Sized> Default for Beans<T> {
  fn default() -> Self {
    Self {
      entries: Vec::new(),
    }
  }
}

// Manual impl: cloning only clones the `Arc`s, so `T` needs no `Clone` bound.
impl<T: ?Sized> Clone for Beans<T> {
  fn clone(&self) -> Self {
    Self {
      entries: self.entries.clone(),
    }
  }
}

impl<T: ?Sized> fmt::Debug for Beans<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_list().entries(self.names()).finish()
  }
}

impl<T: ?Sized> IntoIterator for Beans<T> {
  type Item = (String, Arc<T>);
  type IntoIter = std::vec::IntoIter<(String, Arc<T>)>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}
