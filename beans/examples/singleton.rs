use fibre_beans::{resolve, Container, Scope, ServiceDefinition};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tracing_subscriber::EnvFilter;

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn main() -> Result<(), fibre_beans::IocError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let mut builder = Container::builder();
  builder
    // --- Singleton Registration ---
    // This factory will only be called ONCE.
    .register(
      ServiceDefinition::of::<RequestTracker>("singleton_tracker").factory(|_| {
        println!("Creating SINGLETON RequestTracker...");
        Ok(RequestTracker {
          id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
        })
      }),
    )?
    // --- Prototype Registration ---
    // This factory will be called EVERY time the service is resolved.
    .register(
      ServiceDefinition::of::<RequestTracker>("prototype_tracker")
        .scope(Scope::Prototype)
        .factory(|_| {
          println!("Creating PROTOTYPE RequestTracker...");
          Ok(RequestTracker {
            id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
          })
        }),
    )?;
  let container = builder.build()?;

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(container, RequestTracker, "singleton_tracker");
  let s2 = resolve!(container, RequestTracker, "singleton_tracker");
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, 0);
  assert_eq!(s2.id, 0);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "Singleton instances should be identical"
  );
  println!("Singleton instances are the same pointer, as expected.\n");

  println!("--- Resolving Prototypes ---");
  let p1 = resolve!(container, RequestTracker, "prototype_tracker");
  let p2 = resolve!(container, RequestTracker, "prototype_tracker");
  println!("Prototype 1 ID: {}, Prototype 2 ID: {}", p1.id, p2.id);
  assert_eq!(p1.id, 1);
  assert_eq!(p2.id, 2);
  assert!(
    !Arc::ptr_eq(&p1, &p2),
    "Prototype instances should be different"
  );
  println!("Prototype instances are different pointers, as expected.");
  Ok(())
}
