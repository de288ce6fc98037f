//! Per-language translation lookup.
//!
//! A [`Table`] is built once from an optional base mapping plus an ordered
//! list of catalogs, later sources overriding earlier ones, and is then only
//! read. It is `Sync`, so one table can serve any number of files patched in
//! parallel.

use std::{collections::HashMap, fmt};

/// Value stored under a translation key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    /// Replacement for `tr` and `trc` keys.
    Text(String),
    /// Plural category (`one`, `other`, ...) to text, in catalog order.
    Plural(Vec<(String, String)>),
}

impl Entry {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Entry::Text(text) => Some(text),
            Entry::Plural(_) => None,
        }
    }

    pub fn as_plural(&self) -> Option<&[(String, String)]> {
        match self {
            Entry::Text(_) => None,
            Entry::Plural(forms) => Some(forms),
        }
    }
}

impl From<&str> for Entry {
    fn from(text: &str) -> Self {
        Entry::Text(text.to_string())
    }
}

/// Key of a `trc(context, msg)` message.
pub fn context_key(message: &str, context: &str) -> String {
    format!("{}[C:{}]", message, context)
}

/// Key of a `trn(singular, plural, n)` message.
pub fn plural_key(singular: &str, plural: &str) -> String {
    format!("{}[N:{}]", singular, plural)
}

/// Entries extracted from one catalog file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub entries: Vec<(String, Entry)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: Entry) {
        self.entries.push((key.into(), entry));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<Entry>> FromIterator<(K, V)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Table {
    language: String,
    entries: HashMap<String, Entry>,
}

impl Table {
    /// Merge `base` and then every source in order; the last write of a key wins.
    pub fn build(
        language: impl Into<String>,
        sources: &[Catalog],
        base: Option<&HashMap<String, Entry>>,
    ) -> Self {
        let mut entries = base.cloned().unwrap_or_default();
        for source in sources {
            for (key, entry) in &source.entries {
                entries.insert(key.clone(), entry.clone());
            }
        }
        Self {
            language: language.into(),
            entries,
        }
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn lookup(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The merged mapping, usable as the base of a more specific locale.
    pub fn entries(&self) -> &HashMap<String, Entry> {
        &self.entries
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.language)
    }
}
