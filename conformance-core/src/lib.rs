//! Runtime interface conformance checking
//!
//! Declare an interface as a set of named members with parameter counts,
//! hand over an implementation object, and get back a capability that
//! exposes exactly the declared functions, or a [`ValidationError`] naming
//! the interface and member that do not conform.
//!
//! ```
//! use conformance_core::{Implementation, InterfaceSpec, validate};
//! use serde_json::json;
//!
//! let spec = InterfaceSpec::builder("Shape").member("area", 0).build()?;
//! let implementation = Implementation::new().with_function("area", 0, |_| Ok(json!(1)));
//!
//! let shape = validate(&spec, &implementation)?;
//! assert_eq!(shape.call("area", &[])?, json!(1));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cache;
pub mod capability;
pub mod config;
pub mod errors;
pub mod implementation;
pub mod spec;
pub mod validator;

#[cfg(test)]
mod tests;

pub use cache::{CacheStats, CachedValidator};
pub use capability::ValidatedCapability;
pub use config::ValidatorConfig;
pub use errors::{ErrorKind, ValidationError, ValidationResult};
pub use implementation::{Callable, Function, Implementation, Member};
pub use spec::{Arity, Declaration, Entry, InterfaceSpec, SpecBuilder};
pub use validator::InterfaceValidator;

/// Validate with the default configuration
pub fn validate(
    spec: &InterfaceSpec,
    implementation: &Implementation,
) -> ValidationResult<ValidatedCapability> {
    InterfaceValidator::default().validate(spec, implementation)
}
