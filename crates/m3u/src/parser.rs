// Playlist document parser: pairs each `#EXTINF` line with the URL line that follows it.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::entry::{DEFAULT_GROUP, PlaylistEntry};
use crate::extinf::{EXTINF_TAG, ExtInf, parse_extinf};

const EXTGRP: &str = "#EXTGRP:";
const EXTVLCOPT: &str = "#EXTVLCOPT:";

const ATTR_ID: &str = "tvg-id";
const ATTR_NAME: &str = "tvg-name";
const ATTR_LOGO: &str = "tvg-logo";
const ATTR_GROUP: &str = "group-title";

/// Player options that are kept with the entry instead of being discarded.
const KEPT_VLC_OPTIONS: [&str; 2] = ["http-referrer", "http-user-agent"];

/// Why a record was dropped. Only ever logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseSkip {
    /// Metadata line not followed by a URL line.
    MissingUrl,
    /// URL line without a preceding metadata line.
    OrphanUrl,
    /// `#EXTINF` without the `:` separator.
    MalformedDirective,
}

struct PendingRecord {
    line: usize,
    info: ExtInf,
    group_hint: Option<String>,
    options: Vec<(String, String)>,
}

impl PendingRecord {
    fn into_entry(self, stream_url: &str, index: usize) -> PlaylistEntry {
        let mut id = None;
        let mut name = None;
        let mut logo = None;
        let mut group = None;
        let mut raw_attributes = BTreeMap::new();

        for (key, value) in self.info.attributes {
            let slot = match key.as_str() {
                ATTR_ID => Some(&mut id),
                ATTR_NAME => Some(&mut name),
                ATTR_LOGO => Some(&mut logo),
                ATTR_GROUP => Some(&mut group),
                _ => None,
            };
            match slot {
                Some(slot) if slot.is_none() => *slot = Some(value),
                Some(_) => {}
                None => {
                    raw_attributes.entry(key).or_insert(value);
                }
            }
        }
        for (key, value) in self.options {
            raw_attributes.entry(key).or_insert(value);
        }

        let display_name = if self.info.title.is_empty() {
            name.unwrap_or_default()
        } else {
            self.info.title
        };
        let group_label = group
            .filter(|g| !g.is_empty())
            .or(self.group_hint.filter(|g| !g.is_empty()))
            .unwrap_or_else(|| DEFAULT_GROUP.to_string());

        PlaylistEntry {
            id: id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("ch-{index}")),
            display_name,
            group_label,
            logo_url: logo.unwrap_or_default(),
            stream_url: stream_url.to_string(),
            raw_attributes,
        }
    }
}

/// `#EXTINF` as a whole tag; `#EXTINFO:` and similar are other directives.
fn is_extinf(line: &str) -> bool {
    line.strip_prefix(EXTINF_TAG).is_some_and(|rest| {
        rest.is_empty() || rest.starts_with(':') || rest.starts_with(char::is_whitespace)
    })
}

fn skip(reason: ParseSkip, line: usize) {
    debug!(?reason, line = line + 1, "Skipping playlist record");
}

/// Parses a playlist document into entries, in document order.
///
/// Never fails: incomplete records are dropped and parsing continues with the
/// next line. Entries without a fallback `tvg-id` get `ch-<n>`, where `n` is
/// the entry's position in the returned vector.
pub fn parse(text: &str) -> Vec<PlaylistEntry> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut entries = Vec::new();
    let mut pending: Option<PendingRecord> = None;

    for (line_no, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if is_extinf(line) {
            if let Some(previous) = pending.take() {
                skip(ParseSkip::MissingUrl, previous.line);
            }
            match parse_extinf(line) {
                Some(info) => {
                    pending = Some(PendingRecord {
                        line: line_no,
                        info,
                        group_hint: None,
                        options: Vec::new(),
                    })
                }
                None => skip(ParseSkip::MalformedDirective, line_no),
            }
            continue;
        }

        if let Some(label) = line.strip_prefix(EXTGRP) {
            if let Some(record) = pending.as_mut() {
                record.group_hint.get_or_insert_with(|| label.trim().to_string());
            }
            continue;
        }

        if let Some(option) = line.strip_prefix(EXTVLCOPT) {
            if let (Some(record), Some((key, value))) = (pending.as_mut(), option.split_once('=')) {
                if KEPT_VLC_OPTIONS.contains(&key) {
                    record.options.push((key.to_string(), value.to_string()));
                }
            }
            continue;
        }

        if line.starts_with('#') {
            trace!(line = line_no + 1, "Ignoring directive");
            continue;
        }

        match pending.take() {
            Some(record) => {
                let index = entries.len();
                entries.push(record.into_entry(line, index));
            }
            None => skip(ParseSkip::OrphanUrl, line_no),
        }
    }

    if let Some(record) = pending {
        skip(ParseSkip::MissingUrl, record.line);
    }

    debug!(entries = entries.len(), "Parsed playlist");
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"#EXTM3U x-tvg-url="https://epg.example/guide.xml"
#EXTINF:-1 tvg-id="France2.fr" tvg-logo="https://logo.example/f2.png" group-title="General",France 2
https://stream.example/f2/index.m3u8
#EXTINF:-1 tvg-id="Arte.fr" tvg-country="FR" group-title="Culture",Arte
https://stream.example/arte/index.m3u8
#EXTINF:-1,No Group
https://stream.example/nogroup.m3u8
"#;

    #[test]
    fn one_entry_per_record_in_order() {
        let entries = parse(SAMPLE);
        let names: Vec<_> = entries.iter().map(|e| e.display_name.as_str()).collect();
        assert_eq!(names, ["France 2", "Arte", "No Group"]);

        let first = &entries[0];
        assert_eq!(first.id, "France2.fr");
        assert_eq!(first.group_label, "General");
        assert_eq!(first.logo_url, "https://logo.example/f2.png");
        assert_eq!(first.stream_url, "https://stream.example/f2/index.m3u8");
        assert!(first.raw_attributes.is_empty());
    }

    #[test]
    fn missing_group_defaults_to_uncategorized() {
        let entries = parse(SAMPLE);
        assert_eq!(entries[2].group_label, DEFAULT_GROUP);
        assert_eq!(entries[2].logo_url, "");
    }

    #[test]
    fn unrecognized_attributes_are_kept_verbatim() {
        let entries = parse(SAMPLE);
        assert_eq!(
            entries[1].raw_attributes.get("tvg-country").map(String::as_str),
            Some("FR")
        );
        assert!(!entries[1].raw_attributes.contains_key("tvg-id"));
    }

    #[test]
    fn positional_id_when_tag_missing() {
        let entries = parse(SAMPLE);
        assert_eq!(entries[2].id, "ch-2");
    }

    #[test]
    fn metadata_without_url_does_not_corrupt_following_records() {
        let text = "#EXTM3U\n\
                    #EXTINF:-1 group-title=\"A\",Dangling\n\
                    #EXTINF:-1 group-title=\"B\",Kept\n\
                    http://b.example/live.m3u8\n\
                    #EXTINF:-1,Trailing without url\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "Kept");
        assert_eq!(entries[0].group_label, "B");
        assert_eq!(entries[0].id, "ch-0");
    }

    #[test]
    fn orphan_url_lines_are_skipped() {
        let text = "#EXTM3U\nhttp://orphan.example/a.m3u8\n#EXTINF:-1,Real\nhttp://real.example/b.m3u8\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].stream_url, "http://real.example/b.m3u8");
    }

    #[test]
    fn directives_between_metadata_and_url() {
        let text = "#EXTM3U\r\n\
                    #EXTINF:-1 tvg-name=\"Fallback Name\",\r\n\
                    #EXTGRP:Sports\r\n\
                    #EXTVLCOPT:http-referrer=https://ref.example/\r\n\
                    #EXTVLCOPT:network-caching=1000\r\n\
                    \r\n\
                    https://sport.example/live.m3u8\r\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.display_name, "Fallback Name");
        assert_eq!(entry.group_label, "Sports");
        assert_eq!(
            entry.raw_attributes.get("http-referrer").map(String::as_str),
            Some("https://ref.example/")
        );
        assert!(!entry.raw_attributes.contains_key("network-caching"));
    }

    #[test]
    fn group_title_wins_over_extgrp() {
        let text = "#EXTINF:-1 group-title=\"News\",Channel\n#EXTGRP:Other\nhttp://n.example/x\n";
        assert_eq!(parse(text)[0].group_label, "News");
    }

    #[test]
    fn malformed_extinf_starts_no_record() {
        let text = "#EXTINF -1,Broken\nhttp://broken.example/x\n#EXTINF:-1,Good\nhttp://good.example/y\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "Good");
    }

    #[test]
    fn similar_directive_keeps_pending_record() {
        let text = "#EXTINF:-1,Kept\n#EXTINFO:extra\nhttp://kept.example/a\n";
        let entries = parse(text);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].display_name, "Kept");
        assert_eq!(entries[0].stream_url, "http://kept.example/a");
    }

    #[test]
    fn header_and_bom_are_optional() {
        let with_bom = "\u{feff}#EXTINF:-1,One\nhttp://one.example/\n";
        let without_header = "#EXTINF:-1,One\nhttp://one.example/\n";
        assert_eq!(parse(with_bom), parse(without_header));
        assert_eq!(parse(without_header).len(), 1);
    }

    #[test]
    fn empty_document() {
        assert!(parse("").is_empty());
        assert!(parse("#EXTM3U\n").is_empty());
    }

    #[test]
    fn entries_serialize_without_empty_raw_attributes() {
        let entries = parse("#EXTINF:-1,One\nhttp://one.example/\n");
        let json = serde_json::to_value(&entries[0]).unwrap();
        assert_eq!(json["group_label"], DEFAULT_GROUP);
        assert!(json.get("raw_attributes").is_none());
    }
}
