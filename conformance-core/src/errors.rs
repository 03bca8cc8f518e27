//! Error types for interface validation
//!
//! Every conformance violation is a variant of [`ValidationError`]. The
//! `Display` text names the offending interface and member, and
//! [`ValidationError::kind`] gives callers a tag to match on instead of
//! parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::spec::Arity;

/// Category of a validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    MissingArguments,
    MissingName,
    MissingImplementation,
    NotImplemented,
    UndeclaredMember,
    NotAFunction,
    ArityMismatch,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingArguments => "missing_arguments",
            Self::MissingName => "missing_name",
            Self::MissingImplementation => "missing_implementation",
            Self::NotImplemented => "not_implemented",
            Self::UndeclaredMember => "undeclared_member",
            Self::NotAFunction => "not_a_function",
            Self::ArityMismatch => "arity_mismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Main error type for interface validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No declaration was supplied at all
    #[error("No arguments supplied to an interface declaration.")]
    MissingArguments,

    /// The declaration has no (or an empty) interface name
    #[error("Interface name not defined.")]
    MissingName,

    /// The declaration names an interface but carries no implementation
    #[error("The interface {interface} has not been implemented.")]
    MissingImplementation { interface: String },

    /// A declared member has no implementation entry
    #[error("{interface}.{member} has not been implemented.")]
    NotImplemented { interface: String, member: String },

    /// The implementation has a public entry the interface does not declare
    #[error("{member} is not a defined member of {interface}.")]
    UndeclaredMember { interface: String, member: String },

    /// A declared member is implemented by plain data
    #[error("{interface}.{member} has not been implemented as a function.")]
    NotAFunction { interface: String, member: String },

    /// A declared member is implemented with the wrong parameter count
    #[error("An implementation of {interface}.{member} does not have the correct number of arguments.")]
    ArityMismatch { interface: String, member: String, expected: Arity, found: Arity },
}

impl ValidationError {
    /// Create a missing implementation error
    pub fn missing_implementation(interface: impl Into<String>) -> Self {
        Self::MissingImplementation { interface: interface.into() }
    }

    /// Create a not implemented error
    pub fn not_implemented(interface: impl Into<String>, member: impl Into<String>) -> Self {
        Self::NotImplemented { interface: interface.into(), member: member.into() }
    }

    /// Create an undeclared member error
    pub fn undeclared_member(interface: impl Into<String>, member: impl Into<String>) -> Self {
        Self::UndeclaredMember { interface: interface.into(), member: member.into() }
    }

    /// Create a not-a-function error
    pub fn not_a_function(interface: impl Into<String>, member: impl Into<String>) -> Self {
        Self::NotAFunction { interface: interface.into(), member: member.into() }
    }

    /// Create an arity mismatch error
    pub fn arity_mismatch(
        interface: impl Into<String>,
        member: impl Into<String>,
        expected: Arity,
        found: Arity,
    ) -> Self {
        Self::ArityMismatch { interface: interface.into(), member: member.into(), expected, found }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingArguments => ErrorKind::MissingArguments,
            Self::MissingName => ErrorKind::MissingName,
            Self::MissingImplementation { .. } => ErrorKind::MissingImplementation,
            Self::NotImplemented { .. } => ErrorKind::NotImplemented,
            Self::UndeclaredMember { .. } => ErrorKind::UndeclaredMember,
            Self::NotAFunction { .. } => ErrorKind::NotAFunction,
            Self::ArityMismatch { .. } => ErrorKind::ArityMismatch,
        }
    }

    /// Name of the interface the error refers to, if known
    pub fn interface(&self) -> Option<&str> {
        match self {
            Self::MissingArguments | Self::MissingName => None,
            Self::MissingImplementation { interface }
            | Self::NotImplemented { interface, .. }
            | Self::UndeclaredMember { interface, .. }
            | Self::NotAFunction { interface, .. }
            | Self::ArityMismatch { interface, .. } => Some(interface),
        }
    }

    /// Name of the offending member, if the error is about one
    pub fn member(&self) -> Option<&str> {
        match self {
            Self::NotImplemented { member, .. }
            | Self::UndeclaredMember { member, .. }
            | Self::NotAFunction { member, .. }
            | Self::ArityMismatch { member, .. } => Some(member),
            _ => None,
        }
    }
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;
