use fibre_beans::{Container, IocError};
use tracing_subscriber::EnvFilter;

// A function that resolves its input from whichever container it is given.
// Accepting a `&Container` keeps it testable against a controlled setup.
fn process_data(container: &Container) -> Result<String, IocError> {
  let data = container.get_by_type::<String>()?;
  Ok(format!("Processed: {}", data.to_uppercase()))
}

fn main() -> Result<(), IocError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // --- A container with test data ---
  println!("--- Running with a test container ---");
  let mut builder = Container::builder();
  builder.register_instance("data", "test data".to_string())?;
  let test_container = builder.build()?;

  let result = process_data(&test_container)?;
  println!("Result: {}", result);
  assert_eq!(result, "Processed: TEST DATA");

  // --- Verify Isolation ---
  // The instance registered in `test_container` does not exist anywhere else.
  let empty = Container::builder().build()?;
  let other = process_data(&empty);
  assert!(
    other.as_ref().is_err_and(|e| e.is_not_found()),
    "Dependency should not have leaked into another container!"
  );

  println!("\nVerified that containers are isolated from each other.");
  Ok(())
}
