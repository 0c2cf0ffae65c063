//! Built-in sources from the public iptv-org index.

use crate::catalog::SourceSpec;

const IPTV_ORG: &str = "https://iptv-org.github.io/iptv";

/// A named single playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Short identifier for command lines.
    pub key: &'static str,
    pub name: &'static str,
    pub url: &'static str,
}

impl Preset {
    pub fn spec(&self) -> SourceSpec {
        SourceSpec::single(self.url)
    }
}

/// Several playlists merged into one catalog, opened with a search already applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pack {
    pub key: &'static str,
    pub name: &'static str,
    pub urls: &'static [&'static str],
    pub initial_query: &'static str,
}

impl Pack {
    pub fn spec(&self) -> SourceSpec {
        SourceSpec::pack(self.urls.iter().copied())
    }
}

macro_rules! preset {
    ($key:literal, $name:literal, $path:literal) => {
        Preset {
            key: $key,
            name: $name,
            url: concat!("https://iptv-org.github.io/iptv/", $path),
        }
    };
}

pub const PRESETS: &[Preset] = &[
    preset!("fr", "France", "countries/fr.m3u"),
    preset!("dz", "Algeria", "countries/dz.m3u"),
    preset!("us", "USA", "countries/us.m3u"),
    preset!("football", "Football", "categories/football.m3u"),
    preset!("auto", "Auto/Moto", "categories/auto.m3u"),
    preset!("fight", "Combat Sports", "categories/fight.m3u"),
    preset!("sports", "Sports", "categories/sports.m3u"),
    preset!("extreme", "Extreme Sports", "categories/extreme_sports.m3u"),
    preset!("movies", "Movies", "categories/movies.m3u"),
    preset!("all", "General", "index.m3u"),
];

pub const PACKS: &[Pack] = &[Pack {
    key: "sports-pack",
    name: "Pack Sports",
    urls: &[
        "https://iptv-org.github.io/iptv/categories/sports.m3u",
        "https://iptv-org.github.io/iptv/countries/qa.m3u",
        "https://iptv-org.github.io/iptv/countries/fr.m3u",
        "https://iptv-org.github.io/iptv/countries/tr.m3u",
        "https://iptv-org.github.io/iptv/countries/us.m3u",
        "https://iptv-org.github.io/iptv/countries/sa.m3u",
        "https://iptv-org.github.io/iptv/countries/ae.m3u",
        "https://raw.githubusercontent.com/hemzaberkane/ARAB-IPTV/main/ARABIPTV.m3u",
    ],
    initial_query: "bein",
}];

/// Source loaded when nothing else was chosen.
pub const DEFAULT_SOURCE: &str = "https://iptv-org.github.io/iptv/countries/fr.m3u";

/// Looks a preset up by key or display name, ignoring case.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(name) || p.name.eq_ignore_ascii_case(name))
}

pub fn find_pack(name: &str) -> Option<&'static Pack> {
    PACKS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(name) || p.name.eq_ignore_ascii_case(name))
}

/// Playlist URL for a country code in the iptv-org index.
pub fn country_url(code: &str) -> String {
    format!("{IPTV_ORG}/countries/{}.m3u", code.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_key_or_name() {
        assert_eq!(find_preset("FR").unwrap().url, DEFAULT_SOURCE);
        assert_eq!(find_preset("combat sports").unwrap().key, "fight");
        assert!(find_preset("nowhere").is_none());
    }

    #[test]
    fn sports_pack_merges_eight_sources() {
        let pack = find_pack("Pack Sports").unwrap();
        assert_eq!(pack.initial_query, "bein");
        assert_eq!(pack.spec().urls().len(), 8);
        assert!(matches!(pack.spec(), SourceSpec::Pack(_)));
    }

    #[test]
    fn country_urls_match_presets() {
        assert_eq!(country_url("DZ"), find_preset("dz").unwrap().url);
    }
}
