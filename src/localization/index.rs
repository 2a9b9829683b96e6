use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::Namespace;

/// A translation key and the source-language text it stands for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub key: String,
    pub text: String,
}

impl Term {
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            text: text.into(),
        }
    }
}

/// Terms of one namespace in insertion order. A key, once added, keeps its text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    terms: Vec<Term>,
    keys: HashSet<String>,
}

impl Catalog {
    /// Returns false when the key was already present.
    pub fn insert(&mut self, key: &str, text: &str) -> bool {
        if self.keys.contains(key) {
            return false;
        }
        self.keys.insert(key.to_string());
        self.terms.push(Term::new(key, text));
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.text.as_str())
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Keys emitted so far in this run, per namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizationIndex {
    catalogs: BTreeMap<Namespace, Catalog>,
}

impl LocalizationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The namespace's catalog, created empty on first use.
    pub fn catalog_mut(&mut self, namespace: &Namespace) -> &mut Catalog {
        self.catalogs.entry(namespace.clone()).or_default()
    }

    pub fn catalog(&self, namespace: &Namespace) -> Option<&Catalog> {
        self.catalogs.get(namespace)
    }

    pub fn insert(&mut self, namespace: &Namespace, key: &str, text: &str) -> bool {
        self.catalog_mut(namespace).insert(key, text)
    }

    pub fn contains(&self, namespace: &Namespace, key: &str) -> bool {
        self.catalog(namespace).map(|c| c.contains(key)).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Namespace, &Catalog)> {
        self.catalogs.iter()
    }

    pub fn key_count(&self) -> usize {
        self.catalogs.values().map(Catalog::len).sum()
    }
}
