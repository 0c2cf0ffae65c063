use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Group label assigned to entries whose playlist declares none.
pub const DEFAULT_GROUP: &str = "Uncategorized";

/// One playable channel from a playlist document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Playlist-declared `tvg-id`, or `ch-<index>` scoped to the source it came from.
    pub id: String,
    pub display_name: String,
    pub group_label: String,
    /// May be empty.
    pub logo_url: String,
    /// Media location; never empty. Used as the identity when catalogs are merged.
    pub stream_url: String,
    /// Attributes the parser does not interpret, kept verbatim.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub raw_attributes: BTreeMap<String, String>,
}

impl PlaylistEntry {
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, stream_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            group_label: DEFAULT_GROUP.to_string(),
            logo_url: String::new(),
            stream_url: stream_url.into(),
            raw_attributes: BTreeMap::new(),
        }
    }

    pub fn with_group(mut self, group_label: impl Into<String>) -> Self {
        self.group_label = group_label.into();
        self
    }

    pub fn with_logo(mut self, logo_url: impl Into<String>) -> Self {
        self.logo_url = logo_url.into();
        self
    }

    pub fn with_raw_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.raw_attributes.insert(key.into(), value.into());
        self
    }
}
