//! Component scanning: discovering definitions without a central manifest.
//!
//! Components place a [`ComponentEntry`] into the [`COMPONENTS`] distributed
//! slice from wherever they are defined. At link time every entry in the
//! final binary is gathered into the slice, and
//! [`ContainerBuilder::scan`] registers the ones a [`ComponentScan`] selects.
//!
//! ```ignore
//! use fibre_beans::scan::{ComponentEntry, Stereotype, COMPONENTS};
//! use fibre_beans::ServiceDefinition;
//!
//! #[linkme::distributed_slice(COMPONENTS)]
//! static MEMBER_REPOSITORY: ComponentEntry = ComponentEntry {
//!   name: "memberRepository",
//!   stereotype: Stereotype::Repository,
//!   markers: &[],
//!   definition: || {
//!     ServiceDefinition::of::<MemoryMemberRepository>("memberRepository")
//!       .factory(|_| Ok(MemoryMemberRepository::default()))
//!   },
//! };
//! ```

use crate::container::ContainerBuilder;
use crate::definition::ServiceDefinition;
use crate::error::Result;

use linkme::distributed_slice;
use std::fmt;

/// Every component linked into the binary.
#[distributed_slice]
pub static COMPONENTS: [ComponentEntry] = [..];

/// The broad kind of a component, usable as a scan filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stereotype {
  Component,
  Service,
  Repository,
  Controller,
  Configuration,
}

/// A discoverable component.
pub struct ComponentEntry {
  /// Must equal the name of the definition `definition` returns.
  pub name: &'static str,
  pub stereotype: Stereotype,
  /// Free-form tags for include/exclude filters.
  pub markers: &'static [&'static str],
  pub definition: fn() -> ServiceDefinition,
}

impl fmt::Debug for ComponentEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ComponentEntry")
      .field("name", &self.name)
      .field("stereotype", &self.stereotype)
      .field("markers", &self.markers)
      .finish_non_exhaustive()
  }
}

/// A predicate over component entries.
pub enum Filter {
  Stereotype(Stereotype),
  Marker(&'static str),
  Name(String),
  Custom(fn(&ComponentEntry) -> bool),
}

impl Filter {
  pub fn matches(&self, entry: &ComponentEntry) -> bool {
    match self {
      Filter::Stereotype(stereotype) => entry.stereotype == *stereotype,
      Filter::Marker(marker) => entry.markers.contains(marker),
      Filter::Name(name) => entry.name == name,
      Filter::Custom(predicate) => predicate(entry),
    }
  }
}

impl fmt::Debug for Filter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Filter::Stereotype(s) => f.debug_tuple("Stereotype").field(s).finish(),
      Filter::Marker(m) => f.debug_tuple("Marker").field(m).finish(),
      Filter::Name(n) => f.debug_tuple("Name").field(n).finish(),
      Filter::Custom(_) => f.write_str("Custom(..)"),
    }
  }
}

/// Selects which discovered components get registered.
///
/// An entry is selected when it matches at least one include filter (or no
/// include filters are set) and matches no exclude filter.
#[derive(Debug, Default)]
pub struct ComponentScan {
  include: Vec<Filter>,
  exclude: Vec<Filter>,
}

impl ComponentScan {
  /// A scan that selects every component.
  pub fn new() -> Self {
    Self::default()
  }

  pub fn include(mut self, filter: Filter) -> Self {
    self.include.push(filter);
    self
  }

  pub fn exclude(mut self, filter: Filter) -> Self {
    self.exclude.push(filter);
    self
  }

  pub fn selects(&self, entry: &ComponentEntry) -> bool {
    let included = self.include.is_empty() || self.include.iter().any(|f| f.matches(entry));
    included && !self.exclude.iter().any(|f| f.matches(entry))
  }

  /// Selected entries of `entries`, sorted by name so link order never
  /// influences registration order.
  pub fn select<'a>(&self, entries: &'a [ComponentEntry]) -> Vec<&'a ComponentEntry> {
    let mut selected: Vec<&ComponentEntry> = entries.iter().filter(|e| self.selects(e)).collect();
    selected.sort_by_key(|e| e.name);
    selected
  }
}

impl ContainerBuilder {
  /// Registers every linked component that `scan` selects. Returns how many
  /// were registered.
  pub fn scan(&mut self, scan: &ComponentScan) -> Result<usize> {
    self.scan_entries(&COMPONENTS, scan)
  }

  /// Like [`scan`](Self::scan), over an explicit set of entries.
  pub fn scan_entries(&mut self, entries: &[ComponentEntry], scan: &ComponentScan) -> Result<usize> {
    let selected = scan.select(entries);
    for entry in &selected {
      tracing::debug!(
        component = entry.name,
        stereotype = ?entry.stereotype,
        "registering scanned component"
      );
      self.register((entry.definition)())?;
    }
    Ok(selected.len())
  }
}
