use crate::error::{PgnIndexError, Result};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;

/// Header tags of a single game.
///
/// Tags compare ASCII case-insensitively for every operation. Entries are kept sorted
/// by that comparison, and overwriting an existing tag keeps the casing it was first
/// stored with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameHeaderBag {
    headers: Vec<(String, String)>,
}

fn compare_tags(left: &str, right: &str) -> Ordering {
    left.bytes()
        .map(|b| b.to_ascii_lowercase())
        .cmp(right.bytes().map(|b| b.to_ascii_lowercase()))
}

impl GameHeaderBag {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            headers: Vec::new(),
        }
    }

    fn position(&self, tag: &str) -> std::result::Result<usize, usize> {
        self.headers.binary_search_by(|(stored, _)| compare_tags(stored, tag))
    }

    /// Number of distinct tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn get(&self, tag: &str) -> Result<&str> {
        self.position(tag)
            .map(|idx| self.headers[idx].1.as_str())
            .map_err(|_| PgnIndexError::TagNotFound(tag.to_string()))
    }

    /// Insert or overwrite the value for `tag`.
    pub fn set(&mut self, tag: impl Into<String>, value: impl Into<String>) {
        let tag = tag.into();
        let value = value.into();
        match self.position(&tag) {
            Ok(idx) => self.headers[idx].1 = value,
            Err(idx) => self.headers.insert(idx, (tag, value)),
        }
    }

    /// Remove `tag`, returning the value it held.
    pub fn remove(&mut self, tag: &str) -> Result<String> {
        match self.position(tag) {
            Ok(idx) => Ok(self.headers.remove(idx).1),
            Err(_) => Err(PgnIndexError::TagNotFound(tag.to_string())),
        }
    }

    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.position(tag).is_ok()
    }

    /// `(tag, value)` pairs in case-insensitive tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .map(|(tag, value)| (tag.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for GameHeaderBag {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (tag, value) in iter {
            self.set(tag, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for GameHeaderBag {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl Serialize for GameHeaderBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}
