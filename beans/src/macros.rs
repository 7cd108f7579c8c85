//! Public macros for ergonomic service resolution.

/// Resolves a service from a container, panicking if it cannot be resolved.
///
/// Meant for wiring code and tests where a missing service is a programming
/// error. For a non-panicking lookup, call [`Container::get_by_type`](crate::Container::get_by_type)
/// or [`Container::get_by_name`](crate::Container::get_by_name) directly.
///
/// # Panics
///
/// Panics with the underlying [`IocError`](crate::IocError) if the lookup fails.
///
/// # Examples
///
/// ```
/// use fibre_beans::{resolve, Container, ServiceDefinition};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// let mut builder = Container::builder();
/// builder.register_instance("message", String::from("hello")).unwrap();
/// builder
///   .register(
///     ServiceDefinition::of::<dyn Greeter>("greeter")
///       .shared_factory(|_| Ok(Arc::new(EnglishGreeter) as Arc<dyn Greeter>)),
///   )
///   .unwrap();
/// let container = builder.build().unwrap();
///
/// let message = resolve!(container, String);
/// assert_eq!(*message, "hello");
///
/// let greeter = resolve!(container, trait Greeter, "greeter");
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // Trait arms come first: once `:ty` starts parsing `trait ..` it cannot back out.

    // resolve!(container, trait MyTrait)
    ($container:expr, trait $trait_ident:ident) => {
        match $container.get_by_type::<dyn $trait_ident>() {
            Ok(service) => service,
            Err(err) => panic!(
                "Failed to resolve required trait service {}: {}",
                std::any::type_name::<dyn $trait_ident>(),
                err
            ),
        }
    };

    // resolve!(container, trait MyTrait, "name")
    ($container:expr, trait $trait_ident:ident, $name:expr) => {
        match $container.get_by_name::<dyn $trait_ident>($name) {
            Ok(service) => service,
            Err(err) => panic!(
                "Failed to resolve required trait service with name '{}': {}",
                $name, err
            ),
        }
    };

    // resolve!(container, MyService)
    ($container:expr, $type:ty) => {
        match $container.get_by_type::<$type>() {
            Ok(service) => service,
            Err(err) => panic!(
                "Failed to resolve required service {}: {}",
                std::any::type_name::<$type>(),
                err
            ),
        }
    };

    // resolve!(container, MyService, "name")
    ($container:expr, $type:ty, $name:expr) => {
        match $container.get_by_name::<$type>($name) {
            Ok(service) => service,
            Err(err) => panic!(
                "Failed to resolve required service with name '{}': {}",
                $name, err
            ),
        }
    };
}
