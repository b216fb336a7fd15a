//! Sets of variable names.
//!
//! `NameSet` offers both destructive operations (`insert`, `delete_name`,
//! `unite`, `intersect`, `subtract`, `rename`) that mutate `self`, and
//! non-destructive ones (`insertion`, `deletion`, `union`, `intersection`,
//! `difference`, `renamed`) that return a fresh set and leave both operands
//! untouched.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::substitution::Substitution;

/// An unordered collection of unique names.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameSet {
    elements: FxHashSet<String>,
}

impl NameSet {
    /// The empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from any list of names; duplicates collapse.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            elements: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.elements.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn size(&self) -> usize {
        self.elements.len()
    }

    /// The members in sorted order.
    pub fn to_list(&self) -> Vec<String> {
        let mut list: Vec<String> = self.elements.iter().cloned().collect();
        list.sort();
        list
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().map(String::as_str)
    }

    /// Replace the contents of `self` with the contents of `other`.
    pub fn mirror(&mut self, other: &NameSet) {
        self.elements.clone_from(&other.elements);
    }

    // =========================================================================
    // Destructive operations
    // =========================================================================

    /// Add `name`; no-op if already present.
    pub fn insert(&mut self, name: impl Into<String>) {
        self.elements.insert(name.into());
    }

    /// Remove `name`; no-op if absent.
    pub fn delete_name(&mut self, name: &str) {
        self.elements.remove(name);
    }

    pub fn unite(&mut self, other: &NameSet) {
        for name in &other.elements {
            if !self.elements.contains(name) {
                self.elements.insert(name.clone());
            }
        }
    }

    pub fn intersect(&mut self, other: &NameSet) {
        self.elements.retain(|name| other.elements.contains(name));
    }

    pub fn subtract(&mut self, other: &NameSet) {
        self.elements.retain(|name| !other.elements.contains(name));
    }

    /// Rename every member in place through `substitution`.
    pub fn rename(&mut self, substitution: &Substitution) {
        let renamed = self.renamed(substitution);
        self.mirror(&renamed);
    }

    // =========================================================================
    // Non-destructive operations
    // =========================================================================

    pub fn insertion(&self, name: impl Into<String>) -> NameSet {
        let mut result = self.clone();
        result.insert(name);
        result
    }

    pub fn deletion(&self, name: &str) -> NameSet {
        let mut result = self.clone();
        result.delete_name(name);
        result
    }

    pub fn union(&self, other: &NameSet) -> NameSet {
        let mut result = self.clone();
        result.unite(other);
        result
    }

    pub fn intersection(&self, other: &NameSet) -> NameSet {
        let mut result = self.clone();
        result.intersect(other);
        result
    }

    pub fn difference(&self, other: &NameSet) -> NameSet {
        let mut result = self.clone();
        result.subtract(other);
        result
    }

    /// A new set holding `substitution.apply(x)` for every member `x`.
    ///
    /// Several members may map to the same name, so the result can be smaller
    /// than `self`.
    pub fn renamed(&self, substitution: &Substitution) -> NameSet {
        Self {
            elements: self
                .elements
                .iter()
                .map(|name| substitution.apply(name).to_string())
                .collect(),
        }
    }

    /// Union of every set in `sets`; the empty set for an empty list.
    pub fn union_all<'a, I>(sets: I) -> NameSet
    where
        I: IntoIterator<Item = &'a NameSet>,
    {
        let mut result = NameSet::new();
        for set in sets {
            result.unite(set);
        }
        result
    }

    /// Intersection of every set in `sets`; the empty set for an empty list.
    pub fn intersect_all<'a, I>(sets: I) -> NameSet
    where
        I: IntoIterator<Item = &'a NameSet>,
    {
        let mut iter = sets.into_iter();
        let Some(first) = iter.next() else {
            return NameSet::new();
        };
        let mut result = first.clone();
        for set in iter {
            result.intersect(set);
        }
        result
    }
}

impl<S: Into<String>> FromIterator<S> for NameSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_names(iter)
    }
}

impl<S: Into<String>> Extend<S> for NameSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.elements.extend(iter.into_iter().map(Into::into));
    }
}

impl fmt::Display for NameSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NameSet{{{}}}", self.to_list().join(","))
    }
}

#[cfg(test)]
#[path = "../tests/name_set_tests.rs"]
mod tests;
