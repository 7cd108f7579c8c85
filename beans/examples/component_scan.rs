//! Components register themselves next to their own code; the application
//! only chooses which ones to pick up.
//!
//! Run with `cargo run --example component_scan --features scan`.

use fibre_beans::scan::{ComponentEntry, ComponentScan, Filter, Stereotype, COMPONENTS};
use fibre_beans::{Container, IocError, ServiceDefinition};
use linkme::distributed_slice;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

trait Greeter: Send + Sync {
  fn greet(&self, name: &str) -> String;
}

struct EnglishGreeter;
impl Greeter for EnglishGreeter {
  fn greet(&self, name: &str) -> String {
    format!("Hello, {}!", name)
  }
}

struct KoreanGreeter;
impl Greeter for KoreanGreeter {
  fn greet(&self, name: &str) -> String {
    format!("Annyeong, {}!", name)
  }
}

struct WelcomeService {
  greeter: Arc<dyn Greeter>,
}

#[distributed_slice(COMPONENTS)]
static ENGLISH_GREETER: ComponentEntry = ComponentEntry {
  name: "englishGreeter",
  stereotype: Stereotype::Component,
  markers: &["greeter"],
  definition: || {
    ServiceDefinition::of::<EnglishGreeter>("englishGreeter")
      .exposes::<dyn Greeter>(|g| g)
      .primary()
      .factory(|_| Ok(EnglishGreeter))
  },
};

#[distributed_slice(COMPONENTS)]
static KOREAN_GREETER: ComponentEntry = ComponentEntry {
  name: "koreanGreeter",
  stereotype: Stereotype::Component,
  markers: &["greeter", "experimental"],
  definition: || {
    ServiceDefinition::of::<KoreanGreeter>("koreanGreeter")
      .exposes::<dyn Greeter>(|g| g)
      .factory(|_| Ok(KoreanGreeter))
  },
};

#[distributed_slice(COMPONENTS)]
static WELCOME_SERVICE: ComponentEntry = ComponentEntry {
  name: "welcomeService",
  stereotype: Stereotype::Service,
  markers: &[],
  definition: || {
    ServiceDefinition::of::<WelcomeService>("welcomeService")
      .depends_on::<dyn Greeter>()
      .factory(|deps| {
        Ok(WelcomeService {
          greeter: deps.next::<dyn Greeter>()?,
        })
      })
  },
};

fn main() -> Result<(), IocError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let mut builder = Container::builder();
  let found = builder.scan(&ComponentScan::new().exclude(Filter::Marker("experimental")))?;
  println!("Registered {} scanned components", found);
  let container = builder.build()?;

  let welcome = container.get_by_type::<WelcomeService>()?;
  println!("{}", welcome.greeter.greet("Fibre"));
  assert!(!container.contains("koreanGreeter"));
  Ok(())
}
