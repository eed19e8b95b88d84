//! Display-name lookup

use std::borrow::Cow;
use std::collections::HashMap;

use super::CanonicalId;

/// How display names are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NameMatching {
    #[default]
    CaseSensitive,
    CaseInsensitive,
}

/// Two-level index: normalized key -> (name as recorded, canonical id).
///
/// Normalization only affects lookup; the recorded spelling is kept for
/// diagnostics.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    matching: NameMatching,
    entries: HashMap<String, (String, CanonicalId)>,
}

impl NameIndex {
    pub fn new(matching: NameMatching) -> Self {
        Self { matching, entries: HashMap::new() }
    }

    pub fn matching(&self) -> NameMatching {
        self.matching
    }

    fn key<'n>(&self, name: &'n str) -> Cow<'n, str> {
        match self.matching {
            NameMatching::CaseSensitive => Cow::Borrowed(name),
            NameMatching::CaseInsensitive => Cow::Owned(name.to_lowercase()),
        }
    }

    pub fn get(&self, name: &str) -> Option<&CanonicalId> {
        self.entries.get(self.key(name).as_ref()).map(|(_, id)| id)
    }

    /// The spelling `name` was first recorded under.
    pub fn recorded_name(&self, name: &str) -> Option<&str> {
        self.entries.get(self.key(name).as_ref()).map(|(original, _)| original.as_str())
    }

    /// Binds `name` to `id`, replacing any previous binding.
    pub fn insert(&mut self, name: &str, id: CanonicalId) {
        let key = self.key(name).into_owned();
        match self.entries.get_mut(&key) {
            Some(entry) => entry.1 = id,
            None => {
                self.entries.insert(key, (name.to_string(), id));
            }
        }
    }

    /// Moves every name bound to `from` over to `to`.
    pub fn rebind(&mut self, from: &CanonicalId, to: &CanonicalId) {
        for (_, id) in self.entries.values_mut() {
            if id == from {
                *id = to.clone();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CanonicalId)> {
        self.entries.values().map(|(name, id)| (name.as_str(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_sensitive_lookup() {
        let mut index = NameIndex::new(NameMatching::CaseSensitive);
        index.insert("Noto Sans", CanonicalId::from("a"));
        assert_eq!(index.get("Noto Sans"), Some(&CanonicalId::from("a")));
        assert_eq!(index.get("noto sans"), None);
    }

    #[test]
    fn case_insensitive_lookup_keeps_recorded_spelling() {
        let mut index = NameIndex::new(NameMatching::CaseInsensitive);
        index.insert("Noto Sans", CanonicalId::from("a"));
        index.insert("NOTO SANS", CanonicalId::from("b"));
        assert_eq!(index.get("noto sans"), Some(&CanonicalId::from("b")));
        assert_eq!(index.recorded_name("noto SANS"), Some("Noto Sans"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn rebind_moves_all_aliases() {
        let mut index = NameIndex::new(NameMatching::CaseSensitive);
        index.insert("A", CanonicalId::from("1"));
        index.insert("B", CanonicalId::from("1"));
        index.insert("C", CanonicalId::from("2"));
        index.rebind(&CanonicalId::from("1"), &CanonicalId::from("2"));
        assert!(index.iter().all(|(_, id)| id.as_str() == "2"));
    }
}
