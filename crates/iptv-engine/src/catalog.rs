use std::collections::BTreeSet;

use m3u::PlaylistEntry;
use rustc_hash::FxHashSet;
use serde::Serialize;

/// What to load: one playlist, or a pack of playlists merged into one catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "urls", rename_all = "snake_case")]
pub enum SourceSpec {
    Single(String),
    Pack(Vec<String>),
}

impl SourceSpec {
    pub fn single(url: impl Into<String>) -> Self {
        Self::Single(url.into())
    }

    pub fn pack<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Pack(urls.into_iter().map(Into::into).collect())
    }

    /// URLs in declaration order.
    pub fn urls(&self) -> &[String] {
        match self {
            Self::Single(url) => std::slice::from_ref(url),
            Self::Pack(urls) => urls,
        }
    }
}

/// Immutable set of entries plus their sorted group labels.
///
/// Always built whole; there is no way to patch a catalog after construction,
/// so the group list cannot drift from the entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    entries: Vec<PlaylistEntry>,
    groups: Vec<String>,
}

impl Catalog {
    /// Catalog over `entries` as given, without deduplication.
    pub fn from_entries(entries: Vec<PlaylistEntry>) -> Self {
        let groups = entries
            .iter()
            .map(|e| e.group_label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self { entries, groups }
    }

    /// Concatenates per-source results in order and keeps the first entry for
    /// each stream URL.
    pub fn merge(sources: Vec<Vec<PlaylistEntry>>) -> Self {
        let total: usize = sources.iter().map(Vec::len).sum();
        let mut seen = FxHashSet::default();
        seen.reserve(total);

        let mut entries = Vec::with_capacity(total);
        for entry in sources.into_iter().flatten() {
            if seen.insert(entry.stream_url.clone()) {
                entries.push(entry);
            }
        }
        Self::from_entries(entries)
    }

    pub fn entries(&self) -> &[PlaylistEntry] {
        &self.entries
    }

    /// Distinct group labels, ascending.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PlaylistEntry> {
        self.entries.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, group: &str, url: &str) -> PlaylistEntry {
        PlaylistEntry::new(id, id, url).with_group(group)
    }

    #[test]
    fn groups_are_sorted_and_distinct() {
        let catalog = Catalog::from_entries(vec![
            entry("a", "Sports", "http://a"),
            entry("b", "News", "http://b"),
            entry("c", "Sports", "http://c"),
            entry("d", "Movies", "http://d"),
        ]);
        assert_eq!(catalog.groups(), ["Movies", "News", "Sports"]);
    }

    #[test]
    fn merge_keeps_first_occurrence() {
        let a = vec![entry("a1", "X", "http://a1"), entry("shared-a", "X", "http://shared")];
        let b = vec![entry("shared-b", "Y", "http://shared"), entry("b1", "Y", "http://b1")];

        let catalog = Catalog::merge(vec![a, b]);
        let ids: Vec<_> = catalog.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["a1", "shared-a", "b1"]);
        assert_eq!(catalog.groups(), ["X", "Y"]);
    }

    #[test]
    fn single_source_is_not_deduplicated() {
        let catalog = Catalog::from_entries(vec![
            entry("a", "X", "http://same"),
            entry("b", "X", "http://same"),
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().id, "b");
    }

    #[test]
    fn repeated_ids_keep_distinct_positions() {
        let catalog = Catalog::merge(vec![
            vec![entry("ch-0", "X", "http://s/alpha")],
            vec![entry("ch-0", "X", "http://s/beta")],
        ]);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(0).unwrap().stream_url, "http://s/alpha");
        assert_eq!(catalog.get(1).unwrap().stream_url, "http://s/beta");
        assert!(catalog.get(2).is_none());
    }

    #[test]
    fn spec_urls_in_order() {
        assert_eq!(SourceSpec::single("http://one").urls(), ["http://one"]);
        assert_eq!(
            SourceSpec::pack(["http://1", "http://2"]).urls(),
            ["http://1", "http://2"]
        );
    }
}
