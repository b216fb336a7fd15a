//! Finite substitutions from old names to new names.
//!
//! A substitution is the identity outside its domain: `apply` returns the
//! argument unchanged for any name it has no entry for.
//!
//! `extend` and `remove` mutate in place and return `&mut Self` so they can
//! be chained. The renamer needs the original substitution intact after
//! deriving a scoped one from it, so `extended` and `removed` are provided as
//! copying variants.

use std::fmt;

use rustc_hash::FxHashMap;

/// A finite partial function old-name -> new-name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Substitution {
    bindings: FxHashMap<String, String>,
}

impl Substitution {
    /// The empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// The one-entry substitution `old -> new`.
    pub fn simple(old: impl Into<String>, new: impl Into<String>) -> Self {
        let mut bindings = FxHashMap::default();
        bindings.insert(old.into(), new.into());
        Self { bindings }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            bindings: pairs
                .into_iter()
                .map(|(old, new)| (old.into(), new.into()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn in_domain(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// The image of `name`, or `name` itself outside the domain.
    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        self.bindings.get(name).map_or(name, String::as_str)
    }

    /// Element-wise `apply`.
    pub fn map<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        names
            .iter()
            .map(|name| self.apply(name.as_ref()).to_string())
            .collect()
    }

    /// Merge `other` into `self`; `other` wins where both bind a name.
    pub fn extend(&mut self, other: &Substitution) -> &mut Self {
        for (old, new) in &other.bindings {
            self.bindings.insert(old.clone(), new.clone());
        }
        self
    }

    /// Delete the entries for `names` from the domain.
    pub fn remove<S: AsRef<str>>(&mut self, names: &[S]) -> &mut Self {
        for name in names {
            self.bindings.remove(name.as_ref());
        }
        self
    }

    /// Copying form of [`Substitution::extend`].
    pub fn extended(&self, other: &Substitution) -> Substitution {
        let mut result = self.clone();
        result.extend(other);
        result
    }

    /// Copying form of [`Substitution::remove`].
    pub fn removed<S: AsRef<str>>(&self, names: &[S]) -> Substitution {
        let mut result = self.clone();
        result.remove(names);
        result
    }

    /// Only the entries whose key is one of `names`.
    pub fn restrict_domain<S: AsRef<str>>(&self, names: &[S]) -> Substitution {
        Self {
            bindings: names
                .iter()
                .filter_map(|name| {
                    let name = name.as_ref();
                    self.bindings
                        .get(name)
                        .map(|new| (name.to_string(), new.clone()))
                })
                .collect(),
        }
    }

    /// Entries sorted by old name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .bindings
            .iter()
            .map(|(old, new)| (old.as_str(), new.as_str()))
            .collect();
        entries.sort_unstable();
        entries
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Substitution{")?;
        for (i, (old, new)) in self.entries().into_iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{old}->{new}")?;
        }
        f.write_str("}")
    }
}

#[cfg(test)]
#[path = "../tests/substitution_tests.rs"]
mod tests;
