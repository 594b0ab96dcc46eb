//! [`TypeIndex`]: an ordered, type-pattern-keyed lookup table.
//!
//! Used both for multi-dispatch (operator tables keyed by argument-tuple
//! type, scanned in insertion order for the first matching entry) and, via
//! the `TypeIndex<Type>` specialization, to condense the several
//! [`Mapping`](crate::matching::Mapping)s a structural match can produce
//! for the same polymorphic name into one narrowed binding.

use crate::matching::{intersect, match_types, Mapping};
use crate::ty::Type;

/// An insertion-ordered `Vec` of `(Type, V)` pairs, looked up by
/// [`match_types`] rather than equality -- the first entry whose key
/// matches the probe wins, mirroring the Language's first-match
/// dispatch semantics.
#[derive(Debug, Clone)]
pub struct TypeIndex<V> {
    entries: Vec<(Type, V)>,
}

impl<V> Default for TypeIndex<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> TypeIndex<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(Type, V)] {
        &self.entries
    }

    /// Insert or overwrite the entry keyed by `key` under exact type
    /// equality (not pattern matching).
    pub fn set(&mut self, key: Type, value: V) {
        if let Some(pos) = self.entries.iter().position(|(k, _)| crate::matching::equals(k, &key)) {
            self.entries[pos] = (key, value);
        } else {
            self.entries.push((key, value));
        }
    }

    /// Whether any entry's key matches `probe`.
    pub fn has(&self, probe: &Type) -> bool {
        self.entries.iter().any(|(k, _)| match_types(k, probe).matched)
    }

    /// The first entry (in insertion order) whose key matches `probe`.
    pub fn get(&self, probe: &Type) -> Option<&V> {
        self.entries
            .iter()
            .find(|(k, _)| match_types(k, probe).matched)
            .map(|(_, v)| v)
    }
}

impl TypeIndex<Type> {
    /// Insert `key -> value`, narrowing via [`intersect`] with whatever
    /// was already bound to an equivalent key rather than overwriting it.
    /// Returns `false`, leaving the existing binding untouched, if the two
    /// bindings' intersection is empty -- two mappings for the same
    /// polymorphic name that don't agree on anything is a contradiction,
    /// not something to paper over with `Any`.
    ///
    /// Used to condense the mapping lists produced by matching the same
    /// polymorphic name against multiple positions (e.g. every element of
    /// a spread, or every alternative of a union value) into a single
    /// binding.
    #[must_use]
    pub fn set_compete(&mut self, key: Type, value: Type) -> bool {
        if let Some(pos) = self.entries.iter().position(|(k, _)| crate::matching::equals(k, &key)) {
            let existing = self.entries[pos].1.clone();
            match intersect(&existing, &value) {
                Some(narrowed) => {
                    self.entries[pos] = (key, narrowed);
                    true
                }
                None => false,
            }
        } else {
            self.entries.push((key, value));
            true
        }
    }

    /// Drain this index back into a flat mapping list, keyed by
    /// polymorphic name. Non-`Polymorphic` keys (which `set_compete`
    /// never produces in practice) are dropped.
    pub fn into_mappings(self) -> Vec<Mapping> {
        self.entries
            .into_iter()
            .filter_map(|(key, value)| match key {
                Type::Polymorphic(name) => Some(Mapping { from: name, to: value }),
                _ => None,
            })
            .collect()
    }
}
