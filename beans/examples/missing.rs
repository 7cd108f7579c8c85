use fibre_beans::{resolve, Container, IocError, ServiceDefinition};
use std::panic::{self, AssertUnwindSafe};
use tracing_subscriber::EnvFilter;

struct UnregisteredService;

struct ServiceA;
struct ServiceB;

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let mut builder = Container::builder();
  builder
    .register(
      ServiceDefinition::of::<ServiceA>("serviceA")
        .depends_on::<ServiceB>()
        .factory(|_| Ok(ServiceA)),
    )
    .expect("serviceA is registered once")
    .register(
      ServiceDefinition::of::<ServiceB>("serviceB")
        .depends_on::<ServiceA>()
        .factory(|_| Ok(ServiceB)),
    )
    .expect("serviceB is registered once");

  // --- Duplicate names are refused at registration ---
  let duplicate = builder.register_instance("serviceA", 0_u32).unwrap_err();
  println!("Duplicate registration: {}", duplicate);
  assert!(duplicate.is_duplicate());

  let container = builder.build().expect("lazy build never constructs");

  // --- Using the panicking `resolve!` macro ---
  println!("\nAttempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(AssertUnwindSafe(|| {
    // This line will panic!
    let _service = resolve!(container, UnregisteredService);
  }));

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible lookups ---
  println!("\nNow, attempting to resolve using the fallible `get_by_type()` method...");

  match container.get_by_type::<UnregisteredService>() {
    Ok(_) => panic!("Should not have found the service!"),
    Err(err) => println!("Correctly received an error: {}", err),
  }

  // --- Cycles are reported with their full path ---
  match container.get_by_type::<ServiceA>() {
    Err(IocError::CyclicDependency { path }) => {
      println!("Cycle detected: {}", path.join(" -> "));
      assert_eq!(path, vec!["serviceA", "serviceB", "serviceA"]);
    }
    Err(other) => panic!("Unexpected error: {}", other),
    Ok(_) => panic!("A cycle must never resolve!"),
  }
}
