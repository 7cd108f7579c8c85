use fibre_beans::{resolve, Container, ServiceDefinition};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() -> Result<(), fibre_beans::IocError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // --- Registration ---
  let mut builder = Container::builder();
  builder
    // The container stores the Arc<dyn Logger> the factory hands back.
    .register(
      ServiceDefinition::of::<dyn Logger>("logger")
        .shared_factory(|_| Ok(Arc::new(ConsoleLogger) as Arc<dyn Logger>)),
    )?
    // ReportService declares its dependency; the container hands it over.
    // ReportService never creates or looks up its own logger.
    .register(
      ServiceDefinition::of::<ReportService>("reportService")
        .depends_on::<dyn Logger>()
        .factory(|deps| {
          Ok(ReportService {
            logger: deps.next::<dyn Logger>()?,
          })
        }),
    )?;
  let container = builder.build()?;

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(container, ReportService);

  println!("Using the service...");
  report_service.generate_report();
  Ok(())
}
