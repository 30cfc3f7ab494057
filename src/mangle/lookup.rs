//! Per-run lookup table for original → generated identifier mappings.

use indexmap::IndexMap;

/// The two identifier namespaces that get rewritten.
///
/// `for`, `href`, and `xlink:href` references resolve against [`Id`],
/// since they all point at element ids.
///
/// [`Id`]: IdentKind::Id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentKind {
    Id,
    Class,
}

/// Mapping store guaranteeing consistent original → pointer assignment
/// within one processing run.
///
/// One insertion-ordered partition per [`IdentKind`]. Created empty at the
/// start of a run and discarded at the end; nothing persists across runs
/// or documents.
#[derive(Debug, Default)]
pub struct LookupTable {
    ids: IndexMap<String, String>,
    classes: IndexMap<String, String>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn partition(&self, kind: IdentKind) -> &IndexMap<String, String> {
        match kind {
            IdentKind::Id => &self.ids,
            IdentKind::Class => &self.classes,
        }
    }

    fn partition_mut(&mut self, kind: IdentKind) -> &mut IndexMap<String, String> {
        match kind {
            IdentKind::Id => &mut self.ids,
            IdentKind::Class => &mut self.classes,
        }
    }

    /// Record a mapping. Unconditional: the caller guarantees `original`
    /// is not already present for `kind`; if it is, the last write wins.
    pub fn insert(&mut self, kind: IdentKind, original: String, pointer: String) {
        let _ = self.partition_mut(kind).insert(original, pointer);
    }

    /// The pointer previously recorded for exactly `original`, if any.
    pub fn exact(&self, kind: IdentKind, original: &str) -> Option<&str> {
        self.partition(kind).get(original).map(String::as_str)
    }

    /// Fragment lookup for values that *contain* a known original rather
    /// than equal one (`sprite.svg#gear`, `url(#gear)`).
    ///
    /// Scans original keys in insertion order; the first key that occurs
    /// as a literal substring of `candidate` wins, and its first
    /// occurrence is replaced by the key's pointer. The scan is purely
    /// textual: a key that happens to occur inside an unrelated part of
    /// `candidate` will match too. Callers rely on this
    /// insertion-order / first-occurrence policy.
    pub fn fragment(&self, kind: IdentKind, candidate: &str) -> Option<String> {
        for (key, pointer) in self.partition(kind) {
            if let Some(at) = candidate.find(key.as_str()) {
                let mut out =
                    String::with_capacity(candidate.len() - key.len() + pointer.len());
                out.push_str(&candidate[..at]);
                out.push_str(pointer);
                out.push_str(&candidate[at + key.len()..]);
                return Some(out);
            }
        }
        None
    }

    /// Number of mappings recorded for `kind`.
    pub fn len(&self, kind: IdentKind) -> usize {
        self.partition(kind).len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty() && self.classes.is_empty()
    }

    /// Iterate `(original, pointer)` pairs for `kind` in insertion order.
    pub fn iter(&self, kind: IdentKind) -> impl Iterator<Item = (&str, &str)> {
        self.partition(kind)
            .iter()
            .map(|(original, pointer)| (original.as_str(), pointer.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_hits_only_its_own_partition() {
        let mut table = LookupTable::new();
        table.insert(IdentKind::Class, "hero".into(), "a".into());
        assert_eq!(table.exact(IdentKind::Class, "hero"), Some("a"));
        assert_eq!(table.exact(IdentKind::Id, "hero"), None);
    }

    #[test]
    fn test_fragment_replaces_first_occurrence() {
        let mut table = LookupTable::new();
        table.insert(IdentKind::Id, "icon".into(), "a".into());
        // "icon" first occurs inside "icons" - that occurrence is the one
        // replaced, not the fragment after `#`.
        assert_eq!(
            table.fragment(IdentKind::Id, "icons.svg#icon"),
            Some("as.svg#icon".into())
        );
    }

    #[test]
    fn test_fragment_prefers_first_inserted_key() {
        let mut table = LookupTable::new();
        table.insert(IdentKind::Id, "gear".into(), "a".into());
        table.insert(IdentKind::Id, "sprite".into(), "b".into());
        // Both keys occur; "gear" was inserted first and wins.
        assert_eq!(
            table.fragment(IdentKind::Id, "sprite.svg#gear"),
            Some("sprite.svg#a".into())
        );
    }

    #[test]
    fn test_fragment_misses_when_no_key_is_contained() {
        let mut table = LookupTable::new();
        table.insert(IdentKind::Id, "gear".into(), "a".into());
        assert_eq!(table.fragment(IdentKind::Id, "sprite.svg#cog"), None);
    }

    #[test]
    fn test_last_write_wins_on_duplicate_insert() {
        let mut table = LookupTable::new();
        table.insert(IdentKind::Class, "hero".into(), "a".into());
        table.insert(IdentKind::Class, "hero".into(), "b".into());
        assert_eq!(table.exact(IdentKind::Class, "hero"), Some("b"));
        assert_eq!(table.len(IdentKind::Class), 1);
    }

    #[test]
    fn test_iter_preserves_insertion_order() {
        let mut table = LookupTable::new();
        table.insert(IdentKind::Class, "one".into(), "a".into());
        table.insert(IdentKind::Class, "two".into(), "b".into());
        table.insert(IdentKind::Class, "three".into(), "c".into());
        let keys: Vec<&str> = table.iter(IdentKind::Class).map(|(k, _)| k).collect();
        assert_eq!(keys, ["one", "two", "three"]);
    }
}
