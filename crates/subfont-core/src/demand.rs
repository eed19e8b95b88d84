//! Character demand: the characters each logical font must render

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use crate::constants::LINE_BREAK;
use crate::font::CanonicalId;

/// Per-font union of rendered characters. Entries only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacterDemand {
    chars: BTreeMap<CanonicalId, BTreeSet<char>>,
}

impl CharacterDemand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every character of `text` to the demand of `id`.
    ///
    /// Line breaks are skipped. The fallback id records nothing. An entry is
    /// created for `id` even when `text` contributes no characters.
    pub fn record(&mut self, id: &CanonicalId, text: &str) {
        if id.is_fallback() {
            return;
        }
        let set = match self.chars.entry(id.clone()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(BTreeSet::new()),
        };
        set.extend(text.chars().filter(|&c| c != LINE_BREAK));
    }

    pub fn chars(&self, id: &CanonicalId) -> Option<&BTreeSet<char>> {
        self.chars.get(id)
    }

    /// Set union per key.
    pub fn merge(&mut self, other: CharacterDemand) {
        for (id, set) in other.chars {
            self.chars.entry(id).or_default().extend(set);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalId, &BTreeSet<char>)> {
        self.chars.iter()
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(s: &str) -> BTreeSet<char> {
        s.chars().collect()
    }

    #[test]
    fn record_excludes_line_breaks() {
        let mut demand = CharacterDemand::new();
        let id = CanonicalId::from("a");
        demand.record(&id, "Hel\nlo");
        assert_eq!(demand.chars(&id), Some(&set("Helo")));
    }

    #[test]
    fn fallback_records_nothing() {
        let mut demand = CharacterDemand::new();
        demand.record(&CanonicalId::fallback(), "abc");
        assert!(demand.is_empty());
    }

    #[test]
    fn empty_text_still_creates_entry() {
        let mut demand = CharacterDemand::new();
        demand.record(&CanonicalId::from("a"), "\n");
        assert_eq!(demand.chars(&CanonicalId::from("a")), Some(&BTreeSet::new()));
    }

    #[test]
    fn demand_only_grows() {
        let mut demand = CharacterDemand::new();
        let id = CanonicalId::from("a");
        let mut previous = BTreeSet::new();
        for text in ["abc", "", "xyz", "a", "日本語"] {
            demand.record(&id, text);
            let current = demand.chars(&id).cloned().unwrap_or_default();
            assert!(current.is_superset(&previous));
            previous = current;
        }
        assert_eq!(previous, set("abcxyz日本語"));
    }

    #[test]
    fn merge_is_union_and_commutative() {
        let (a, b) = (CanonicalId::from("a"), CanonicalId::from("b"));
        let mut left = CharacterDemand::new();
        left.record(&a, "ab");
        let mut right = CharacterDemand::new();
        right.record(&a, "bc");
        right.record(&b, "z");

        let mut one = left.clone();
        one.merge(right.clone());
        let mut two = right;
        two.merge(left);
        assert_eq!(one, two);
        assert_eq!(one.chars(&a), Some(&set("abc")));
        assert_eq!(one.len(), 2);
    }
}
