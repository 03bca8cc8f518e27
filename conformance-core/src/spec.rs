//! Interface specifications
//!
//! An [`InterfaceSpec`] names a contract and records the parameter count of
//! every member it requires. Specs are built with [`SpecBuilder`], loaded from
//! TOML/JSON manifests, or extracted from a loose [`Declaration`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::errors::{ValidationError, ValidationResult};
use crate::implementation::Implementation;

/// Number of formal parameters a function declares
pub type Arity = usize;

/// A named contract: member name -> declared arity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSpec")]
pub struct InterfaceSpec {
    name: String,
    members: BTreeMap<String, Arity>,
}

/// Unchecked manifest shape, validated on the way into `InterfaceSpec`
#[derive(Deserialize)]
struct RawSpec {
    name: Option<String>,
    #[serde(default)]
    members: BTreeMap<String, Arity>,
}

impl TryFrom<RawSpec> for InterfaceSpec {
    type Error = ValidationError;

    fn try_from(raw: RawSpec) -> ValidationResult<Self> {
        match raw.name {
            Some(name) if !name.is_empty() => Ok(Self { name, members: raw.members }),
            _ => Err(ValidationError::MissingName),
        }
    }
}

impl InterfaceSpec {
    pub fn builder(name: impl Into<String>) -> SpecBuilder {
        SpecBuilder { name: name.into(), members: BTreeMap::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared arity of a member, `None` if the interface does not declare it
    pub fn arity_of(&self, member: &str) -> Option<Arity> {
        self.members.get(member).copied()
    }

    pub fn declares(&self, member: &str) -> bool {
        self.members.contains_key(member)
    }

    /// Declared members in name order
    pub fn members(&self) -> impl Iterator<Item = (&str, Arity)> {
        self.members.iter().map(|(name, arity)| (name.as_str(), *arity))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Parse an interface manifest from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse interface manifest")
    }

    /// Parse an interface manifest from a JSON string
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse interface manifest")
    }

    /// Load a manifest from disk; `.json` files are read as JSON, anything else as TOML
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read interface manifest from {:?}", path))?;

        let spec = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        };
        spec.with_context(|| format!("Invalid interface manifest {:?}", path))
    }

    /// Convert to TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize interface manifest to TOML")
    }
}

/// Incremental construction of an [`InterfaceSpec`]
#[derive(Debug, Clone)]
pub struct SpecBuilder {
    name: String,
    members: BTreeMap<String, Arity>,
}

impl SpecBuilder {
    /// Declare a member; declaring the same name again replaces its arity
    pub fn member(mut self, name: impl Into<String>, arity: Arity) -> Self {
        let name = name.into();
        if let Some(previous) = self.members.insert(name.clone(), arity) {
            warn!(
                "Member {}.{} declared twice (arity {} replaced by {})",
                self.name, name, previous, arity
            );
        }
        self
    }

    pub fn build(self) -> ValidationResult<InterfaceSpec> {
        if self.name.is_empty() {
            return Err(ValidationError::MissingName);
        }
        Ok(InterfaceSpec { name: self.name, members: self.members })
    }
}

/// A named entry of a [`Declaration`]
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Function-shaped placeholder; declares a member with this arity
    Signature(Arity),
    /// Arbitrary data, not part of the contract
    Data(Value),
}

/// Loose, constructor-style interface declaration
///
/// Mirrors an untyped "arguments object": every part may be missing, and the
/// validator reports which one is. Only [`Entry::Signature`] entries become
/// interface members.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    name: Option<String>,
    entries: BTreeMap<String, Entry>,
    implementation: Option<Implementation>,
}

impl Declaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn signature(self, name: impl Into<String>, arity: Arity) -> Self {
        self.entry(name, Entry::Signature(arity))
    }

    pub fn data(self, name: impl Into<String>, value: Value) -> Self {
        self.entry(name, Entry::Data(value))
    }

    pub fn entry(mut self, name: impl Into<String>, entry: Entry) -> Self {
        self.entries.insert(name.into(), entry);
        self
    }

    pub fn implemented_by(mut self, implementation: Implementation) -> Self {
        self.implementation = Some(implementation);
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn implementation(&self) -> Option<&Implementation> {
        self.implementation.as_ref()
    }

    /// Split into the extracted spec and the implementation
    ///
    /// Fails with `MissingName` or `MissingImplementation`, in that order.
    pub fn into_parts(self) -> ValidationResult<(InterfaceSpec, Implementation)> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(ValidationError::MissingName),
        };
        let implementation =
            self.implementation.ok_or_else(|| ValidationError::missing_implementation(&name))?;

        let members = self
            .entries
            .into_iter()
            .filter_map(|(member, entry)| match entry {
                Entry::Signature(arity) => Some((member, arity)),
                Entry::Data(_) => None,
            })
            .collect();

        Ok((InterfaceSpec { name, members }, implementation))
    }
}
