//! Ordered `(tag, text)` entry storage shared by the environment, the alias
//! table and the history.

/// One stored entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Numeric tag. History uses it as the entry number; other users keep 0.
    pub tag: usize,
    /// Entry payload, e.g. `KEY=VALUE` or a history line.
    pub text: String,
}

/// Insertion-ordered list of entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryList {
    entries: Vec<Entry>,
}

impl EntryList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry at the end of the list.
    pub fn push(&mut self, text: impl Into<String>, tag: usize) {
        self.entries.push(Entry {
            tag,
            text: text.into(),
        });
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Index of the `KEY=VALUE` entry whose key is exactly `key`.
    ///
    /// The key ends at the first `=`, so a `key` that itself contains `=`
    /// never matches.
    pub fn position_of_key(&self, key: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.text.split_once('=').is_some_and(|(k, _)| k == key))
    }

    /// Value part of the entry keyed by `key`.
    pub fn value_of(&self, key: &str) -> Option<&str> {
        let index = self.position_of_key(key)?;
        Some(&self.entries[index].text[key.len() + 1..])
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// Replace the text at `index`, keeping its position and tag.
    pub fn replace(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.entries.get_mut(index) {
            Some(entry) => {
                entry.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Remove and return the entry at `index`.
    pub fn remove(&mut self, index: usize) -> Option<Entry> {
        if index < self.entries.len() {
            Some(self.entries.remove(index))
        } else {
            None
        }
    }

    /// Drop entries from the front until at most `cap` remain.
    pub fn truncate_front(&mut self, cap: usize) {
        let excess = self.entries.len().saturating_sub(cap);
        if excess > 0 {
            self.entries.drain(..excess);
        }
    }

    /// Rewrite all tags as `0..len` and return the next free tag.
    pub fn renumber(&mut self) -> usize {
        for (i, entry) in self.entries.iter_mut().enumerate() {
            entry.tag = i;
        }
        self.entries.len()
    }

    #[cfg(test)]
    fn to_strings(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.text.clone()).collect()
    }
}

impl<'a> IntoIterator for &'a EntryList {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
