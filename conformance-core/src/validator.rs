//! Interface Validator - cross-checks an implementation against a spec
//!
//! Validation runs in two phases. `check` decides conformance from the
//! shape of the inputs alone; `bind` copies the declared callables into a
//! fresh [`ValidatedCapability`]. The first violation aborts the pass.

use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::capability::ValidatedCapability;
use crate::config::ValidatorConfig;
use crate::errors::{ValidationError, ValidationResult};
use crate::implementation::{Callable, Implementation};
use crate::spec::{Declaration, InterfaceSpec};

/// Verifies that an implementation satisfies an interface
#[derive(Debug, Clone, Default)]
pub struct InterfaceValidator {
    config: ValidatorConfig,
}

impl InterfaceValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate an implementation and return only the declared members
    pub fn validate(
        &self,
        spec: &InterfaceSpec,
        implementation: &Implementation,
    ) -> ValidationResult<ValidatedCapability> {
        self.check(spec, implementation)?;
        Ok(self.bind(spec, implementation))
    }

    /// Validate a loose declaration, reporting whichever part is missing
    pub fn validate_declaration(
        &self,
        declaration: Option<Declaration>,
    ) -> ValidationResult<ValidatedCapability> {
        let declaration = declaration.ok_or(ValidationError::MissingArguments)?;
        let (spec, implementation) = declaration.into_parts()?;
        self.validate(&spec, &implementation)
    }

    /// Conformance check without building a result
    pub fn check(&self, spec: &InterfaceSpec, implementation: &Implementation) -> ValidationResult<()> {
        debug!(
            "Validating implementation of {} ({} declared, {} provided)",
            spec.name(),
            spec.len(),
            implementation.len()
        );

        let result = self.check_members(spec, implementation);
        if let Err(e) = &result {
            debug!(kind = %e.kind(), "Validation of {} failed: {}", spec.name(), e);
        }
        result
    }

    fn check_members(&self, spec: &InterfaceSpec, implementation: &Implementation) -> ValidationResult<()> {
        let interface = spec.name();

        for (member, _) in spec.members() {
            if !implementation.contains(member) {
                return Err(ValidationError::not_implemented(interface, member));
            }
        }

        for (name, entry) in implementation.iter() {
            let Some(expected) = spec.arity_of(name) else {
                if self.config.is_private(name) {
                    trace!("Skipping private member {}", name);
                    continue;
                }
                return Err(ValidationError::undeclared_member(interface, name));
            };

            let callable = entry
                .as_callable()
                .ok_or_else(|| ValidationError::not_a_function(interface, name))?;

            if self.config.check_arity && callable.arity() != expected {
                return Err(ValidationError::arity_mismatch(
                    interface,
                    name,
                    expected,
                    callable.arity(),
                ));
            }

            trace!("{}.{} conforms (arity {})", interface, name, callable.arity());
        }

        Ok(())
    }

    /// Build the capability from an implementation that already passed `check`
    pub(crate) fn bind(&self, spec: &InterfaceSpec, implementation: &Implementation) -> ValidatedCapability {
        let members: BTreeMap<String, Callable> = spec
            .members()
            .filter_map(|(name, _)| {
                implementation
                    .get(name)
                    .and_then(|entry| entry.as_callable())
                    .map(|callable| (name.to_string(), callable.clone()))
            })
            .collect();

        let private = if self.config.retain_private {
            implementation
                .iter()
                .filter(|(name, _)| !spec.declares(name) && self.config.is_private(name))
                .map(|(name, entry)| (name.to_string(), entry.clone()))
                .collect()
        } else {
            BTreeMap::new()
        };

        ValidatedCapability::new(spec.name(), members, private)
    }
}
