//! Keyword/definition data model.
//!
//! A [`KeywordMap`] behaves like an insertion-ordered dictionary: keys are
//! exact-match unique, inserting an existing keyword replaces its definition
//! in place, and iteration follows first-insertion order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single keyword with its definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordEntry {
    pub keyword: String,
    pub definition: String,
}

impl KeywordEntry {
    pub fn new(keyword: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            definition: definition.into(),
        }
    }
}

/// Ordered keyword -> definition mapping.
#[derive(Debug, Clone, Default)]
pub struct KeywordMap {
    entries: Vec<KeywordEntry>,
    positions: HashMap<String, usize>,
}

impl KeywordMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair. Returns the previous definition if the keyword was
    /// already present; the later definition wins.
    pub fn insert(
        &mut self,
        keyword: impl Into<String>,
        definition: impl Into<String>,
    ) -> Option<String> {
        let keyword = keyword.into();
        let definition = definition.into();

        if let Some(&pos) = self.positions.get(&keyword) {
            return Some(std::mem::replace(
                &mut self.entries[pos].definition,
                definition,
            ));
        }

        self.positions.insert(keyword.clone(), self.entries.len());
        self.entries.push(KeywordEntry {
            keyword,
            definition,
        });
        None
    }

    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.positions
            .get(keyword)
            .map(|&pos| self.entries[pos].definition.as_str())
    }

    #[must_use]
    pub fn contains_key(&self, keyword: &str) -> bool {
        self.positions.contains_key(keyword)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &KeywordEntry> {
        self.entries.iter()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.keyword.as_str())
    }
}

impl PartialEq for KeywordMap {
    /// Map equality: same keys with the same definitions, order ignored.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|e| other.get(&e.keyword) == Some(e.definition.as_str()))
    }
}

impl Eq for KeywordMap {}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeywordMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for KeywordMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (keyword, definition) in iter {
            self.insert(keyword, definition);
        }
    }
}

impl IntoIterator for KeywordMap {
    type Item = KeywordEntry;
    type IntoIter = std::vec::IntoIter<KeywordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a KeywordMap {
    type Item = &'a KeywordEntry;
    type IntoIter = std::slice::Iter<'a, KeywordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
