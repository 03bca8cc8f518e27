//! Validated capability objects

use anyhow::{Result, anyhow};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::implementation::{Callable, Member};

/// The sanitized result of a successful validation
///
/// Holds exactly the members the interface declares, each bound to the
/// implementation's callable. Private extras are only present when the
/// validator was configured to retain them.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCapability {
    interface: String,
    members: BTreeMap<String, Callable>,
    private: BTreeMap<String, Member>,
}

impl ValidatedCapability {
    pub(crate) fn new(
        interface: impl Into<String>,
        members: BTreeMap<String, Callable>,
        private: BTreeMap<String, Member>,
    ) -> Self {
        Self { interface: interface.into(), members, private }
    }

    /// Name of the interface this capability satisfies
    pub fn interface(&self) -> &str {
        &self.interface
    }

    pub fn get(&self, name: &str) -> Option<&Callable> {
        self.members.get(name)
    }

    /// Call a declared member by name
    pub fn call(&self, name: &str, args: &[Value]) -> Result<Value> {
        let callable = self
            .members
            .get(name)
            .ok_or_else(|| anyhow!("{} is not a member of {}", name, self.interface))?;
        callable.call(args)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Callable)> {
        self.members.iter().map(|(name, callable)| (name.as_str(), callable))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// A retained private entry (unvalidated)
    pub fn private(&self, name: &str) -> Option<&Member> {
        self.private.get(name)
    }

    pub fn into_members(self) -> BTreeMap<String, Callable> {
        self.members
    }
}
