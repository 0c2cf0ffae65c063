// `#EXTINF` metadata line: `#EXTINF:<duration> key="value" ...,<title>`

pub(crate) const EXTINF_TAG: &str = "#EXTINF";

/// A parsed `#EXTINF` line.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtInf {
    /// Leading duration marker, `-1` for live channels. `None` when missing or not numeric.
    pub duration: Option<f64>,
    /// Attributes in declaration order. Keys are kept exactly as written.
    pub attributes: Vec<(String, String)>,
    /// Text after the first comma that is not inside a quoted value.
    pub title: String,
}

impl ExtInf {
    /// Case-sensitive attribute lookup. The first declaration wins.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Parses a full `#EXTINF:` line. Returns `None` if the line is not one.
pub fn parse_extinf(line: &str) -> Option<ExtInf> {
    let body = line.strip_prefix(EXTINF_TAG)?.strip_prefix(':')?;
    let (header, title) = split_title(body);

    let mut rest = header.trim_start();
    let token_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
    let duration = rest[..token_end].parse::<f64>().ok();
    if duration.is_some() {
        rest = &rest[token_end..];
    }

    Some(ExtInf {
        duration,
        attributes: parse_attributes(rest),
        title: title.trim().to_string(),
    })
}

fn split_title(body: &str) -> (&str, &str) {
    let mut quoted = false;
    for (idx, ch) in body.char_indices() {
        match ch {
            '"' => quoted = !quoted,
            ',' if !quoted => return (&body[..idx], &body[idx + 1..]),
            _ => {}
        }
    }
    (body, "")
}

fn parse_attributes(mut input: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();

    loop {
        input = input.trim_start();
        if input.is_empty() {
            break;
        }

        let key_end = input
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(input.len());
        let key = &input[..key_end];
        input = &input[key_end..];

        let Some(after_eq) = input.strip_prefix('=') else {
            // bare word without a value
            continue;
        };

        let (value, remaining) = if let Some(quoted) = after_eq.strip_prefix('"') {
            match quoted.find('"') {
                Some(close) => (&quoted[..close], &quoted[close + 1..]),
                None => (quoted, ""),
            }
        } else {
            let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
            (&after_eq[..end], &after_eq[end..])
        };
        input = remaining;

        if !key.is_empty() {
            attributes.push((key.to_string(), value.to_string()));
        }
    }

    attributes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_duration_attributes_and_title() {
        let info = parse_extinf(
            r#"#EXTINF:-1 tvg-id="France2.fr" tvg-logo="https://i.imgur.com/a.png" group-title="General",France 2 (1080p)"#,
        )
        .unwrap();

        assert_eq!(info.duration, Some(-1.0));
        assert_eq!(info.attribute("tvg-id"), Some("France2.fr"));
        assert_eq!(info.attribute("tvg-logo"), Some("https://i.imgur.com/a.png"));
        assert_eq!(info.attribute("group-title"), Some("General"));
        assert_eq!(info.title, "France 2 (1080p)");
    }

    #[test]
    fn comma_inside_quotes_does_not_end_the_header() {
        let info = parse_extinf(r#"#EXTINF:-1 group-title="News, Weather",Meteo"#).unwrap();
        assert_eq!(info.attribute("group-title"), Some("News, Weather"));
        assert_eq!(info.title, "Meteo");
    }

    #[test]
    fn attribute_keys_are_case_sensitive() {
        let info = parse_extinf(r#"#EXTINF:-1 TVG-ID="upper",Name"#).unwrap();
        assert_eq!(info.attribute("tvg-id"), None);
        assert_eq!(info.attribute("TVG-ID"), Some("upper"));
    }

    #[test]
    fn missing_duration_and_title() {
        let info = parse_extinf(r#"#EXTINF:tvg-name="Only Name""#).unwrap();
        assert_eq!(info.duration, None);
        assert_eq!(info.attribute("tvg-name"), Some("Only Name"));
        assert_eq!(info.title, "");
    }

    #[test]
    fn unquoted_values_and_unterminated_quotes() {
        let info = parse_extinf(r#"#EXTINF:0 catchup=default tvg-shift="2,Broken"#).unwrap();
        assert_eq!(info.duration, Some(0.0));
        assert_eq!(info.attribute("catchup"), Some("default"));
        // The quote never closes, so the comma belongs to the value.
        assert_eq!(info.attribute("tvg-shift"), Some("2,Broken"));
        assert_eq!(info.title, "");
    }

    #[test]
    fn rejects_other_lines() {
        assert!(parse_extinf("#EXTM3U").is_none());
        assert!(parse_extinf("#EXTINF -1,No colon").is_none());
        assert!(parse_extinf("http://example.com/stream.m3u8").is_none());
    }
}
