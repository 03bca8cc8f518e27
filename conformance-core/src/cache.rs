//! Memoized validation
//!
//! Conformance depends only on the *shape* of the inputs: the declared
//! members with their arities and, for each non-private implementation
//! entry, whether it is callable and with which arity. [`CachedValidator`]
//! remembers the check outcome per shape fingerprint and rebinds the
//! caller's callables on every hit.
//!
//! The cache holds at most `cache_capacity` outcomes; inserting past the
//! limit evicts an arbitrary entry. A capacity of zero disables caching.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::trace;

use crate::capability::ValidatedCapability;
use crate::config::ValidatorConfig;
use crate::errors::ValidationResult;
use crate::implementation::Implementation;
use crate::spec::InterfaceSpec;
use crate::validator::InterfaceValidator;

type Fingerprint = [u8; 32];

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
}

/// Thread-safe validator that memoizes conformance outcomes
pub struct CachedValidator {
    validator: InterfaceValidator,
    outcomes: DashMap<Fingerprint, ValidationResult<()>>,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

impl CachedValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self::from_validator(InterfaceValidator::new(config))
    }

    pub fn from_validator(validator: InterfaceValidator) -> Self {
        Self {
            validator,
            outcomes: DashMap::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn validator(&self) -> &InterfaceValidator {
        &self.validator
    }

    /// Validate, reusing a previous outcome for an identically shaped input
    pub fn validate(
        &self,
        spec: &InterfaceSpec,
        implementation: &Implementation,
    ) -> ValidationResult<ValidatedCapability> {
        let capacity = self.validator.config().cache_capacity;
        if capacity == 0 {
            return self.validator.validate(spec, implementation);
        }

        let key = self.fingerprint(spec, implementation);

        let cached = self.outcomes.get(&key).map(|outcome| outcome.value().clone());
        let outcome = match cached {
            Some(outcome) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                trace!("Validation cache hit for {}", spec.name());
                outcome
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                let outcome = self.validator.check(spec, implementation);
                self.store(key, outcome.clone(), capacity);
                outcome
            }
        };

        outcome?;
        Ok(self.validator.bind(spec, implementation))
    }

    /// Hash the parts of the input that can change the check outcome
    ///
    /// Undeclared private entries are skipped: they are never rejected, and
    /// retained private members are collected by `bind` on every call.
    fn fingerprint(&self, spec: &InterfaceSpec, implementation: &Implementation) -> Fingerprint {
        let config = self.validator.config();
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"interface-shape-v1:");

        hash_str(&mut hasher, spec.name());
        hasher.update(&(spec.len() as u64).to_le_bytes());
        for (name, arity) in spec.members() {
            hash_str(&mut hasher, name);
            hasher.update(&(arity as u64).to_le_bytes());
        }

        for (name, entry) in implementation.iter() {
            if config.is_private(name) && !spec.declares(name) {
                continue;
            }
            hash_str(&mut hasher, name);
            match entry.as_callable() {
                Some(callable) => {
                    hasher.update(&[1u8]);
                    hasher.update(&(callable.arity() as u64).to_le_bytes());
                }
                None => {
                    hasher.update(&[0u8]);
                }
            }
        }

        *hasher.finalize().as_bytes()
    }

    fn store(&self, key: Fingerprint, outcome: ValidationResult<()>, capacity: usize) {
        if self.outcomes.len() >= capacity && !self.outcomes.contains_key(&key) {
            // Take the key first so no shard guard is held during removal
            let victim = self.outcomes.iter().next().map(|entry| *entry.key());
            if let Some(victim) = victim {
                self.outcomes.remove(&victim);
                self.evictions.fetch_add(1, Ordering::Relaxed);
            }
        }
        self.outcomes.insert(key, outcome);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            entries: self.outcomes.len(),
        }
    }

    /// Drop all cached outcomes and reset the counters
    pub fn clear(&self) {
        self.outcomes.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }
}

impl Default for CachedValidator {
    fn default() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

// Length prefix keeps adjacent names from running together
fn hash_str(hasher: &mut blake3::Hasher, value: &str) {
    hasher.update(&(value.len() as u64).to_le_bytes());
    hasher.update(value.as_bytes());
}
