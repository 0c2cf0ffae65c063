//! Filtered, paged projection of a [`Catalog`].

use m3u::PlaylistEntry;
use serde::Serialize;

use crate::catalog::Catalog;

/// Group filter label that matches every entry.
pub const ALL_GROUPS: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum GroupFilter {
    #[default]
    All,
    Group(String),
}

impl GroupFilter {
    pub fn matches(&self, group_label: &str) -> bool {
        match self {
            Self::All => true,
            Self::Group(label) => label == group_label,
        }
    }
}

impl From<&str> for GroupFilter {
    fn from(label: &str) -> Self {
        if label == ALL_GROUPS {
            Self::All
        } else {
            Self::Group(label.to_string())
        }
    }
}

impl From<GroupFilter> for String {
    fn from(filter: GroupFilter) -> Self {
        match filter {
            GroupFilter::All => ALL_GROUPS.to_string(),
            GroupFilter::Group(label) => label,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    pub text: String,
    pub group: GroupFilter,
}

impl Query {
    pub fn new(text: impl Into<String>, group: impl Into<GroupFilter>) -> Self {
        Self {
            text: text.into(),
            group: group.into(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(text, GroupFilter::All)
    }

    /// Case-insensitive substring match on the display name, exact match on the group.
    pub fn matches(&self, entry: &PlaylistEntry) -> bool {
        self.group.matches(&entry.group_label)
            && (self.text.is_empty()
                || entry
                    .display_name
                    .to_lowercase()
                    .contains(&self.text.to_lowercase()))
    }
}

/// An entry on a page, with its position in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageItem<'a> {
    /// Stable handle for [`crate::Browser::select_entry`]; ids can repeat, positions cannot.
    pub index: usize,
    #[serde(flatten)]
    pub entry: &'a PlaylistEntry,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageView<'a> {
    pub items: Vec<PageItem<'a>>,
    /// 1-based page actually shown.
    pub page: usize,
    /// At least 1, even when nothing matches.
    pub total_pages: usize,
    pub match_count: usize,
}

/// Filters `catalog` by `query` and returns page `page` (1-based).
///
/// Out-of-range pages are clamped into `1..=total_pages`. A zero page size is
/// treated as 1.
pub fn view<'a>(catalog: &'a Catalog, query: &Query, page: usize, page_size: usize) -> PageView<'a> {
    let page_size = page_size.max(1);
    let matches: Vec<PageItem<'a>> = catalog
        .entries()
        .iter()
        .enumerate()
        .filter(|(_, e)| query.matches(e))
        .map(|(index, entry)| PageItem { index, entry })
        .collect();

    let match_count = matches.len();
    let total_pages = match_count.div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let items = matches
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    PageView {
        items,
        page,
        total_pages,
        match_count,
    }
}
