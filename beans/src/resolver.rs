//! Turns a lookup request into exactly one definition, and plans the order in
//! which a definition's dependency graph gets constructed.

use crate::core::TypeKey;
use crate::definition::DependencyKind;
use crate::error::{IocError, Result};
use crate::registry::Registry;

use dashmap::DashMap;
use std::collections::HashMap;

type SelectionKey = (TypeKey, Option<String>);

/// Applies the disambiguation rules on top of a closed [`Registry`].
///
/// The registry never changes after build, so a selection stays valid for the
/// container's lifetime and is memoised. Only unqualified selections and those
/// where the qualifier named the winner are kept; the set of such keys is
/// bounded by the registered names and labels.
pub(crate) struct Resolver {
  registry: Registry,
  selections: DashMap<SelectionKey, usize>,
}

/// DFS colouring. Unvisited definitions are simply absent from the map.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
  /// On the current path.
  Active,
  /// Fully explored, or already built.
  Done,
}

/// A definition on the planning stack and the dependencies still to visit.
struct Step {
  index: usize,
  next: Vec<usize>,
}

impl Resolver {
  pub(crate) fn new(registry: Registry) -> Self {
    Self {
      registry,
      selections: DashMap::new(),
    }
  }

  pub(crate) fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Resolves an explicit name, checking that the definition declares `key`.
  pub(crate) fn select_named(&self, name: &str, key: &TypeKey) -> Result<usize> {
    let index = self.registry.index_of(name)?;
    if !self.registry.get(index).declares(key) {
      return Err(IocError::TypeMismatch {
        name: name.to_owned(),
        requested: key.name.to_owned(),
      });
    }
    Ok(index)
  }

  /// Picks the single definition for `key`.
  ///
  /// With one candidate, that candidate wins. With several, a qualifier naming
  /// exactly one of them wins, then a lone primary among the remaining
  /// candidates. Anything else is ambiguous; the selection never depends on
  /// which candidate happened to be registered first.
  pub(crate) fn select(&self, key: &TypeKey, qualifier: Option<&str>) -> Result<usize> {
    let memo_key = (*key, qualifier.map(str::to_owned));
    if let Some(index) = self.selections.get(&memo_key) {
      return Ok(*index);
    }

    let index = self.select_uncached(key, qualifier)?;
    tracing::trace!(
      requested = key.name,
      qualifier,
      selected = self.registry.get(index).name(),
      "resolved service definition"
    );
    // Unmatched qualifiers come from callers at runtime; keeping them would
    // grow the memo without bound.
    let named = qualifier.map_or(true, |q| self.registry.get(index).matches_qualifier(q));
    if named {
      self.selections.insert(memo_key, index);
    }
    Ok(index)
  }

  fn select_uncached(&self, key: &TypeKey, qualifier: Option<&str>) -> Result<usize> {
    let candidates = self.registry.all_by_type(key);
    match candidates {
      [] => return Err(IocError::not_found(describe(key, qualifier))),
      [only] => return Ok(*only),
      _ => {}
    }

    let mut narrowed: Vec<usize> = candidates.to_vec();
    if let Some(qualifier) = qualifier {
      let matched: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&i| self.registry.get(i).matches_qualifier(qualifier))
        .collect();
      match matched.len() {
        0 => {}
        1 => return Ok(matched[0]),
        _ => narrowed = matched,
      }
    }

    let mut primaries = narrowed
      .iter()
      .copied()
      .filter(|&i| self.registry.get(i).is_primary());
    if let (Some(primary), None) = (primaries.next(), primaries.next()) {
      return Ok(primary);
    }

    Err(IocError::Ambiguous {
      requested: describe(key, qualifier),
      candidates: narrowed
        .iter()
        .map(|&i| self.registry.get(i).name().to_owned())
        .collect(),
    })
  }

  /// Walks everything `root` transitively depends on without constructing
  /// anything, and returns the definitions in dependency-first order, `root`
  /// last. Definitions for which `built` holds are neither visited nor
  /// returned. Fails on the first missing, ambiguous or circular dependency.
  ///
  /// The walk keeps its own stack, so the depth of the graph is not limited by
  /// the thread's stack. Construction only starts after this succeeds, so the
  /// per-definition locks taken while building are always acquired along an
  /// acyclic graph.
  pub(crate) fn plan(&self, root: usize, built: impl Fn(usize) -> bool) -> Result<Vec<usize>> {
    let mut order = Vec::new();
    if built(root) {
      return Ok(order);
    }

    let mut marks: HashMap<usize, Mark> = HashMap::new();
    let mut stack = vec![self.step(root)?];
    marks.insert(root, Mark::Active);

    while let Some(step) = stack.last_mut() {
      let Some(next) = step.next.pop() else {
        let index = step.index;
        stack.pop();
        marks.insert(index, Mark::Done);
        order.push(index);
        continue;
      };

      match marks.get(&next) {
        Some(Mark::Done) => {}
        Some(Mark::Active) => return Err(self.cyclic(&stack, next)),
        None if built(next) => {
          marks.insert(next, Mark::Done);
        }
        None => {
          stack.push(self.step(next)?);
          marks.insert(next, Mark::Active);
        }
      }
    }

    tracing::trace!(
      root = self.registry.get(root).name(),
      steps = order.len(),
      "planned construction"
    );
    Ok(order)
  }

  /// The definitions `index` depends on, stored in reverse so popping visits
  /// them in declaration order.
  fn step(&self, index: usize) -> Result<Step> {
    let mut next = Vec::new();
    for dependency in &self.registry.get(index).dependencies {
      match &dependency.kind {
        DependencyKind::Single { qualifier } => {
          next.push(self.select(&dependency.key, qualifier.as_deref())?);
        }
        DependencyKind::All => next.extend_from_slice(self.registry.all_by_type(&dependency.key)),
      }
    }
    next.reverse();
    Ok(Step { index, next })
  }

  /// The loop from the first occurrence of `repeated` on the stack, closed by
  /// `repeated` itself.
  fn cyclic(&self, stack: &[Step], repeated: usize) -> IocError {
    let start = stack.iter().position(|s| s.index == repeated).unwrap_or(0);
    IocError::CyclicDependency {
      path: stack[start..]
        .iter()
        .map(|s| s.index)
        .chain(std::iter::once(repeated))
        .map(|i| self.registry.get(i).name().to_owned())
        .collect(),
    }
  }
}

fn describe(key: &TypeKey, qualifier: Option<&str>) -> String {
  match qualifier {
    Some(q) => format!("type `{}` qualified '{}'", key.name, q),
    None => format!("type `{}`", key.name),
  }
}
