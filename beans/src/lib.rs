//! # Fibre Beans
//!
//! A small, thread-safe dependency injection container with typed lookups and a
//! singleton registry.
//!
//! ## Core Concepts
//!
//! - **Service definition**: a uniquely named unit with a factory, the types it
//!   can be looked up as, and the dependencies its factory needs.
//! - **Two phases**: definitions are registered on a [`ContainerBuilder`];
//!   [`ContainerBuilder::build`] closes registration and returns the [`Container`],
//!   which only serves lookups.
//! - **Disambiguation**: when several definitions declare the requested type, a
//!   qualifier picks one by name or label, otherwise the single `primary`
//!   definition wins, otherwise the lookup fails as ambiguous. Nothing is ever
//!   picked arbitrarily.
//! - **Singletons**: each singleton definition is built at most once, even under
//!   concurrent first lookups, and every caller shares that instance.
//! - **Scanning** (feature `scan`): components can register themselves from
//!   anywhere in the binary and be selected with include/exclude filters.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_beans::{Container, ServiceDefinition};
//! use std::sync::Arc;
//!
//! trait DiscountPolicy: Send + Sync {
//!   fn discount(&self, price: u32) -> u32;
//! }
//!
//! struct FixDiscountPolicy;
//! impl DiscountPolicy for FixDiscountPolicy {
//!   fn discount(&self, _price: u32) -> u32 {
//!     1000
//!   }
//! }
//!
//! struct OrderService {
//!   policy: Arc<dyn DiscountPolicy>,
//! }
//!
//! let mut builder = Container::builder();
//! builder
//!   .register(
//!     ServiceDefinition::of::<FixDiscountPolicy>("fixDiscount")
//!       .exposes::<dyn DiscountPolicy>(|policy| policy)
//!       .factory(|_| Ok(FixDiscountPolicy)),
//!   )?
//!   .register(
//!     ServiceDefinition::of::<OrderService>("orderService")
//!       .depends_on::<dyn DiscountPolicy>()
//!       .factory(|deps| Ok(OrderService { policy: deps.next::<dyn DiscountPolicy>()? })),
//!   )?;
//! let container = builder.build()?;
//!
//! let orders = container.get_by_type::<OrderService>()?;
//! assert_eq!(orders.policy.discount(10000), 1000);
//!
//! // Singletons are shared.
//! let again = container.get_by_name::<OrderService>("orderService")?;
//! assert!(Arc::ptr_eq(&orders, &again));
//! # Ok::<(), fibre_beans::IocError>(())
//! ```

mod beans;
mod cache;
mod container;
mod core;
mod definition;
mod dependencies;
mod error;
mod macros;
mod registry;
mod resolver;
#[cfg(feature = "scan")]
pub mod scan;

pub use beans::Beans;
pub use container::{Container, ContainerBuilder};
pub use definition::{DefinitionBuilder, DefinitionInfo, DependencyInfo, Role, Scope, ServiceDefinition};
pub use dependencies::Dependencies;
pub use error::{BoxError, IocError, Result};
