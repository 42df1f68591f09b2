//! Localized values and the language fallback rule.
//!
//! A [`LocalizedText`] keeps its entries in the order the rows were read from
//! the store. When the requested language is missing, [`LocalizedText::resolve`]
//! falls back to the first entry, which makes the pick deterministic for a
//! given storage order.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered `language -> text` values for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedText {
    entries: Vec<(String, String)>,
}

impl LocalizedText {
    /// Create an empty value set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value. A language that is already present keeps its first value.
    pub fn push(&mut self, language: impl Into<String>, text: impl Into<String>) {
        let language = language.into();
        if self.get(&language).is_none() {
            self.entries.push((language, text.into()));
        }
    }

    /// Exact lookup without fallback.
    pub fn get(&self, language: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, text)| text.as_str())
    }

    /// Value in `language`, or the first stored value when that language is absent.
    ///
    /// Returns `None` only when there are no values at all.
    pub fn resolve(&self, language: &str) -> Option<&str> {
        self.get(language)
            .or_else(|| self.entries.first().map(|(_, text)| text.as_str()))
    }

    /// Iterate `(language, text)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(lang, text)| (lang.as_str(), text.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<L, T> FromIterator<(L, T)> for LocalizedText
where
    L: Into<String>,
    T: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (L, T)>>(iter: I) -> Self {
        let mut text = LocalizedText::new();
        for (language, value) in iter {
            text.push(language, value);
        }
        text
    }
}

impl Serialize for LocalizedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (language, text) in &self.entries {
            map.serialize_entry(language, text)?;
        }
        map.end()
    }
}

/// Drop repeated strings, keeping the first occurrence and the original order.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
