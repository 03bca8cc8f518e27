//! Candidate implementations
//!
//! An [`Implementation`] maps member names to [`Member`] values: either a
//! [`Callable`] or plain data. Rust closures do not expose their parameter
//! list, so every callable carries its declared arity alongside the function.

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::spec::Arity;

/// Function body shared by a [`Callable`]
pub type Function = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// A function value with its declared parameter count
#[derive(Clone)]
pub struct Callable {
    arity: Arity,
    function: Arc<Function>,
}

impl Callable {
    pub fn new<F>(arity: Arity, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self { arity, function: Arc::new(function) }
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Invoke the function. The argument count is not checked against the arity.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.function)(args)
    }

    /// Whether both values share the same underlying function
    pub fn same_function(&self, other: &Callable) -> bool {
        Arc::ptr_eq(&self.function, &other.function)
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        self.arity == other.arity && self.same_function(other)
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable").field("arity", &self.arity).finish_non_exhaustive()
    }
}

/// A single implementation entry
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Function(Callable),
    Value(Value),
}

impl Member {
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Self::Function(callable) => Some(callable),
            Self::Value(_) => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Function(_))
    }
}

impl From<Callable> for Member {
    fn from(callable: Callable) -> Self {
        Self::Function(callable)
    }
}

impl From<Value> for Member {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Caller-supplied object that claims to satisfy an interface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Implementation {
    members: BTreeMap<String, Member>,
}

impl Implementation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a function entry
    pub fn with_function<F>(self, name: impl Into<String>, arity: Arity, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        self.with(name, Callable::new(arity, function))
    }

    /// Add a plain data entry
    pub fn with_value(self, name: impl Into<String>, value: Value) -> Self {
        self.with(name, value)
    }

    pub fn with(mut self, name: impl Into<String>, member: impl Into<Member>) -> Self {
        self.insert(name, member);
        self
    }

    /// Insert an entry, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, member: impl Into<Member>) -> Option<Member> {
        self.members.insert(name.into(), member.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Member> {
        self.members.remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&Member> {
        self.members.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.members.contains_key(name)
    }

    /// Entries in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
        self.members.iter().map(|(name, member)| (name.as_str(), member))
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl<K: Into<String>, M: Into<Member>> FromIterator<(K, M)> for Implementation {
    fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
        Self { members: iter.into_iter().map(|(name, member)| (name.into(), member.into())).collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_callable_invocation() {
        let add = Callable::new(2, |args| {
            let sum: i64 = args.iter().filter_map(Value::as_i64).sum();
            Ok(json!(sum))
        });

        assert_eq!(add.arity(), 2);
        assert_eq!(add.call(&[json!(2), json!(3)]).unwrap(), json!(5));
        // Extra arguments are passed through untouched
        assert_eq!(add.call(&[json!(1), json!(1), json!(1)]).unwrap(), json!(3));
    }

    #[test]
    fn test_callable_equality_is_identity() {
        let f = Callable::new(0, |_| Ok(Value::Null));
        let g = Callable::new(0, |_| Ok(Value::Null));

        assert_eq!(f, f.clone());
        assert_ne!(f, g);
    }

    #[test]
    fn test_implementation_entries() {
        let implementation = Implementation::new()
            .with_function("area", 0, |_| Ok(json!(1)))
            .with_value("version", json!("1.0"));

        assert_eq!(implementation.len(), 2);
        assert!(implementation.get("area").unwrap().is_callable());
        assert!(implementation.get("version").unwrap().as_callable().is_none());
        let names: Vec<&str> = implementation.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["area", "version"]);
    }

    #[test]
    fn test_implementation_from_iterator() {
        let implementation: Implementation =
            vec![("a", Member::from(json!(1))), ("b", Member::from(json!(2)))].into_iter().collect();

        assert!(implementation.contains("a"));
        assert!(implementation.contains("b"));
    }

    #[test]
    fn test_insert_and_remove() {
        let mut implementation = Implementation::new().with_value("area", json!(1));

        let replaced = implementation.insert("area", Callable::new(0, |_| Ok(json!(2))));
        assert_eq!(replaced, Some(Member::Value(json!(1))));

        let removed = implementation.remove("area").unwrap();
        assert!(removed.is_callable());
        assert!(implementation.is_empty());
        assert!(implementation.remove("area").is_none());
    }

    #[test]
    fn test_failing_callable_propagates_error() {
        let failing = Callable::new(0, |_| anyhow::bail!("storage offline"));
        assert_eq!(failing.call(&[]).unwrap_err().to_string(), "storage offline");
    }
}
