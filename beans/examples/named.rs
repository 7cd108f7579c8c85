use fibre_beans::{resolve, Container, ServiceDefinition};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// --- Abstraction and Implementations ---
trait MessageSender: Send + Sync {
  fn send(&self, to: &str, message: &str) -> String;
}

struct EmailSender;
impl MessageSender for EmailSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending email to {}: '{}'", to, message)
  }
}

struct SmsSender;
impl MessageSender for SmsSender {
  fn send(&self, to: &str, message: &str) -> String {
    format!("Sending SMS to {}: '{}'", to, message)
  }
}

fn main() -> Result<(), fibre_beans::IocError> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  // --- Registration ---
  // Both implementations declare `dyn MessageSender`. The SMS sender also
  // carries a qualifier label, and the email sender is the default.
  let mut builder = Container::builder();
  builder
    .register(
      ServiceDefinition::of::<EmailSender>("email")
        .exposes::<dyn MessageSender>(|s| s)
        .primary()
        .factory(|_| Ok(EmailSender)),
    )?
    .register(
      ServiceDefinition::of::<SmsSender>("sms")
        .exposes::<dyn MessageSender>(|s| s)
        .qualifier("mobile")
        .factory(|_| Ok(SmsSender)),
    )?;
  let container = builder.build()?;

  // --- Resolution ---
  // By name, by qualifier label, or by type, where the primary wins.
  let email_notifier = resolve!(container, trait MessageSender, "email");
  let sms_notifier = container.get_qualified::<dyn MessageSender>("mobile")?;
  let default_notifier = container.get_by_type::<dyn MessageSender>()?;

  let result1 = email_notifier.send("test@example.com", "Hello from Fibre!");
  let result2 = sms_notifier.send("+123456789", "Hello from Fibre!");

  println!("{}", result1);
  println!("{}", result2);

  assert!(result1.contains("email"));
  assert!(result2.contains("SMS"));
  assert!(Arc::ptr_eq(&email_notifier, &default_notifier));
  Ok(())
}
