use crate::{cli::OutputFormat, error::Result};
#[cfg(feature = "colored-output")]
use colored::*;
use iptv_engine::{
    PageView, PlaybackSession, PlaybackState, Query, SavedSource,
    presets::{PACKS, PRESETS},
};
use serde::Serialize;
use std::io::Write;

pub struct OutputManager {
    colored: bool,
}

impl OutputManager {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn format_page(&self, page: &PageView<'_>, query: &Query, format: OutputFormat) -> Result<String> {
        if format != OutputFormat::Pretty {
            return to_json(page, format);
        }

        let mut output = String::new();
        for item in &page.items {
            let entry = item.entry;
            output.push_str(&format!(
                "{} {} {} {}\n",
                self.colorize(&format!("#{}", item.index), &Color::Magenta, true),
                self.colorize(&format!("[{}]", entry.id), &Color::Yellow, false),
                self.colorize(&entry.display_name, &Color::Cyan, true),
                self.colorize(&format!("({})", entry.group_label), &Color::Green, false),
            ));
            output.push_str(&format!("    {}\n", self.colorize(&entry.stream_url, &Color::Blue, false)));
        }
        if page.items.is_empty() {
            output.push_str("No channels match.\n");
        }

        let filter = match (query.text.is_empty(), String::from(query.group.clone())) {
            (true, group) => format!("group {group}"),
            (false, group) => format!("\"{}\" in group {group}", query.text),
        };
        output.push('\n');
        output.push_str(&self.colorize(
            &format!(
                "Page {}/{} - {} channel(s) matching {filter}",
                page.page, page.total_pages, page.match_count
            ),
            &Color::Green,
            true,
        ));
        output.push('\n');
        Ok(output)
    }

    pub fn format_groups(&self, groups: &[String], format: OutputFormat) -> Result<String> {
        if format != OutputFormat::Pretty {
            return to_json(&groups, format);
        }
        let mut output = self.colorize(&format!("{} group(s):", groups.len()), &Color::Green, true);
        output.push('\n');
        for group in groups {
            output.push_str(&format!("  {group}\n"));
        }
        Ok(output)
    }

    pub fn format_presets(&self, format: OutputFormat) -> Result<String> {
        if format != OutputFormat::Pretty {
            #[derive(Serialize)]
            struct Listing<'a> {
                key: &'a str,
                name: &'a str,
                urls: Vec<&'a str>,
                initial_query: &'a str,
            }
            let listing: Vec<Listing<'_>> = PRESETS
                .iter()
                .map(|p| Listing {
                    key: p.key,
                    name: p.name,
                    urls: vec![p.url],
                    initial_query: "",
                })
                .chain(PACKS.iter().map(|p| Listing {
                    key: p.key,
                    name: p.name,
                    urls: p.urls.to_vec(),
                    initial_query: p.initial_query,
                }))
                .collect();
            return to_json(&listing, format);
        }

        let mut output = self.colorize("Presets:", &Color::Green, true);
        output.push('\n');
        for preset in PRESETS {
            output.push_str(&format!(
                "  {:<10} {:<16} {}\n",
                self.colorize(preset.key, &Color::Yellow, false),
                preset.name,
                self.colorize(preset.url, &Color::Blue, false)
            ));
        }
        output.push('\n');
        output.push_str(&self.colorize("Packs:", &Color::Green, true));
        output.push('\n');
        for pack in PACKS {
            output.push_str(&format!(
                "  {:<10} {} ({} playlists, search \"{}\")\n",
                self.colorize(pack.key, &Color::Yellow, false),
                pack.name,
                pack.urls.len(),
                pack.initial_query
            ));
        }
        Ok(output)
    }

    pub fn format_saved(&self, saved: &[SavedSource], format: OutputFormat) -> Result<String> {
        if format != OutputFormat::Pretty {
            return to_json(&saved, format);
        }
        if saved.is_empty() {
            return Ok("No saved sources.\n".to_string());
        }
        let mut output = String::new();
        for (index, source) in saved.iter().enumerate() {
            output.push_str(&format!(
                "  {} {} {}\n",
                self.colorize(&index.to_string(), &Color::Yellow, false),
                source.name,
                self.colorize(&source.url, &Color::Blue, false)
            ));
        }
        Ok(output)
    }

    pub fn format_session(&self, session: &PlaybackSession, format: OutputFormat) -> Result<String> {
        if format != OutputFormat::Pretty {
            return to_json(session, format);
        }

        let (label, color) = match session.state {
            PlaybackState::Playing => ("reachable", Color::Green),
            PlaybackState::Failed => ("failed", Color::Red),
            _ => ("no answer", Color::Yellow),
        };
        let mut output = format!(
            "{}: {}\n",
            self.colorize("Stream", &Color::Yellow, false),
            self.colorize(session.target_url.as_deref().unwrap_or("-"), &Color::Blue, false)
        );
        output.push_str(&format!(
            "{}: {}\n",
            self.colorize("Status", &Color::Yellow, false),
            self.colorize(label, &color, true)
        ));
        if session.recovery_attempts > 0 {
            output.push_str(&format!("Recovery attempts: {}\n", session.recovery_attempts));
        }
        if let Some(err) = &session.last_error {
            output.push_str(&format!(
                "{}: {err}\n",
                self.colorize("Last error", &Color::Yellow, false)
            ));
        }
        Ok(output)
    }

    fn colorize(&self, text: &str, color: &Color, bold: bool) -> String {
        #[cfg(feature = "colored-output")]
        {
            if self.colored {
                let colored_text = match color {
                    Color::Green => text.green(),
                    Color::Yellow => text.yellow(),
                    Color::Blue => text.blue(),
                    Color::Cyan => text.cyan(),
                    Color::Red => text.red(),
                    Color::Magenta => text.magenta(),
                };
                if bold {
                    colored_text.bold().to_string()
                } else {
                    colored_text.to_string()
                }
            } else {
                text.to_string()
            }
        }
        #[cfg(not(feature = "colored-output"))]
        {
            let _ = (color, bold, self.colored);
            text.to_string()
        }
    }
}

enum Color {
    Green,
    Yellow,
    Blue,
    Cyan,
    Red,
    Magenta,
}

fn to_json<T: Serialize + ?Sized>(value: &T, format: OutputFormat) -> Result<String> {
    let mut json = if format == OutputFormat::JsonCompact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    json.push('\n');
    Ok(json)
}

pub fn write_output(content: &str) -> Result<()> {
    print!("{content}");
    std::io::stdout().flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use iptv_engine::{Catalog, PlaylistEntry, view};

    fn catalog() -> Catalog {
        Catalog::from_entries(vec![
            PlaylistEntry::new("fr2", "France 2", "http://s/f2").with_group("General"),
            PlaylistEntry::new("arte", "Arte", "http://s/arte").with_group("Culture"),
        ])
    }

    #[test]
    fn pretty_page_lists_channels_and_footer() {
        let catalog = catalog();
        let query = Query::default();
        let page = view(&catalog, &query, 1, 24);
        let text = OutputManager::new(false)
            .format_page(&page, &query, OutputFormat::Pretty)
            .unwrap();
        assert!(text.contains("#0 [fr2] France 2 (General)"));
        assert!(text.contains("#1 [arte] Arte (Culture)"));
        assert!(text.contains("Page 1/1 - 2 channel(s) matching group All"));
    }

    #[test]
    fn json_page_is_structured() {
        let catalog = catalog();
        let query = Query::text("arte");
        let page = view(&catalog, &query, 1, 24);
        let text = OutputManager::new(false)
            .format_page(&page, &query, OutputFormat::JsonCompact)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["match_count"], 1);
        assert_eq!(json["items"][0]["stream_url"], "http://s/arte");
        assert_eq!(json["items"][0]["index"], 1);
    }

    #[test]
    fn presets_listing_includes_packs() {
        let text = OutputManager::new(false)
            .format_presets(OutputFormat::Pretty)
            .unwrap();
        assert!(text.contains("sports-pack"));
        assert!(text.contains("https://iptv-org.github.io/iptv/countries/fr.m3u"));
    }
}
