use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities;
use crate::error::ExtractError;

/// One playable stream found on the player page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedSource {
    pub quality: String, // Label as shown by the site, e.g. "720p"
    pub url: String,     // Fully decoded playback URL
}

/// Sources in the order the site lists them.
pub type VideoSourceList = Vec<ExtractedSource>;

/// Carves the source text of a named array literal out of a document.
///
/// Kept behind a trait so the boundary heuristic can be swapped without
/// touching the resolver.
pub trait ArrayCarver: Send + Sync {
    fn carve(&self, document: &str, prefix: &str) -> Result<String, ExtractError>;
}

/// Takes everything after the last occurrence of the prefix, cuts it at the
/// first `];` and closes it with a single `]`. Without any `];` the whole rest
/// of the document gets the `]` appended.
///
/// This is a heuristic, not a grammar: a `];` inside a string value ends the
/// array early and the parser then rejects the truncated text. Player pages
/// seen so far never contain one.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminatorCarver;

impl TerminatorCarver {
    const TERMINATOR: &'static str = "];";
}

impl ArrayCarver for TerminatorCarver {
    fn carve(&self, document: &str, prefix: &str) -> Result<String, ExtractError> {
        // The literal may also appear earlier as inert text, the real
        // assignment is the last one
        let pos = document
            .rfind(prefix)
            .ok_or_else(|| ExtractError::BlockNotFound {
                prefix: prefix.to_string(),
            })?;

        let rest = &document[pos + prefix.len()..];
        let body = rest
            .find(Self::TERMINATOR)
            .map_or(rest, |end| &rest[..end]);

        Ok(format!("{body}]"))
    }
}

/// Parses carved array text into sources.
///
/// Entries without a string `src` and `label` are noise and get dropped.
/// Only text that is not a JSON array at all is an error; an array without a
/// single usable entry yields an empty list.
pub fn parse_source_list(array_text: &str) -> Result<VideoSourceList, ExtractError> {
    let value: Value =
        serde_json::from_str(array_text.trim()).map_err(|e| ExtractError::MalformedArray {
            reason: e.to_string(),
        })?;

    let entries = value.as_array().ok_or_else(|| ExtractError::MalformedArray {
        reason: format!("expected an array, found {}", json_type(&value)),
    })?;

    let mut sources = Vec::with_capacity(entries.len());
    for (i, entry) in entries.iter().enumerate() {
        let src = entry.get("src").and_then(Value::as_str).filter(|s| !s.is_empty());
        let label = entry.get("label").and_then(Value::as_str).filter(|s| !s.is_empty());

        match (src, label) {
            (Some(src), Some(label)) => sources.push(ExtractedSource {
                quality: label.to_string(),
                url: entities::decode(src),
            }),
            _ => debug!("skipping source entry {i} without src/label: {entry}"),
        }
    }

    Ok(sources)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "var video_sources = ";

    #[test]
    fn carves_array_and_drops_trailing_script() {
        let page = r#"<script>var video_sources = [{"src":"a","label":"720p"}]; player.setup();</script>"#;
        let carved = TerminatorCarver.carve(page, PREFIX).unwrap();
        assert_eq!(carved, r#"[{"src":"a","label":"720p"}]"#);
    }

    #[test]
    fn uses_last_prefix_occurrence() {
        let page = concat!(
            "<p>docs mention var video_sources = [{\"src\":\"old\",\"label\":\"old\"}];</p>",
            "<script>var video_sources = [{\"src\":\"new\",\"label\":\"1080p\"}];</script>",
        );
        let carved = TerminatorCarver.carve(page, PREFIX).unwrap();
        assert_eq!(carved, r#"[{"src":"new","label":"1080p"}]"#);
    }

    #[test]
    fn closes_array_cut_off_before_terminator() {
        let page = r#"<script>var video_sources = [{"src":"https://cdn/a.mp4","label":"720p"}"#;
        let carved = TerminatorCarver.carve(page, PREFIX).unwrap();
        assert_eq!(carved, r#"[{"src":"https://cdn/a.mp4","label":"720p"}]"#);

        let list = parse_source_list(&carved).unwrap();
        assert_eq!(
            list,
            vec![ExtractedSource {
                quality: "720p".into(),
                url: "https://cdn/a.mp4".into()
            }]
        );
    }

    #[test]
    fn missing_prefix() {
        let err = TerminatorCarver.carve("<html></html>", PREFIX).unwrap_err();
        assert_eq!(
            err,
            ExtractError::BlockNotFound {
                prefix: PREFIX.to_string()
            }
        );
    }

    #[test]
    fn parses_entries_in_order() {
        let list = parse_source_list(
            r#"[{"src":"https://cdn/b.mp4","label":"1080p"},{"src":"https://cdn/a.mp4","label":"480p"}]"#,
        )
        .unwrap();
        let qualities: Vec<_> = list.iter().map(|s| s.quality.as_str()).collect();
        assert_eq!(qualities, ["1080p", "480p"]);
        assert_eq!(list[0].url, "https://cdn/b.mp4");
    }

    #[test]
    fn drops_incomplete_entries() {
        let list = parse_source_list(
            r#"[
                {"src":"https://cdn/1.mp4"},
                {"label":"360p"},
                {"src":"https://cdn/2.mp4","label":"720p","type":"video/mp4"},
                {"src":"","label":"240p"},
                {"src":5,"label":"144p"},
                "stray",
                {"src":"https://cdn/3.mp4?a=1&amp;b=2","label":"480p"}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            list,
            vec![
                ExtractedSource {
                    quality: "720p".into(),
                    url: "https://cdn/2.mp4".into()
                },
                ExtractedSource {
                    quality: "480p".into(),
                    url: "https://cdn/3.mp4?a=1&b=2".into()
                },
            ]
        );
    }

    #[test]
    fn no_valid_entries_is_empty_not_error() {
        let list = parse_source_list(r#"[{"src":"https://cdn/1.mp4"},{}]"#).unwrap();
        assert!(list.is_empty());
        assert!(parse_source_list("[]").unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array_text() {
        assert!(matches!(
            parse_source_list(r#"{"src":"x","label":"y"}"#),
            Err(ExtractError::MalformedArray { .. })
        ));
        assert!(matches!(
            parse_source_list("[{\"src\":"),
            Err(ExtractError::MalformedArray { .. })
        ));
    }

    // The carve boundary is only an approximation: a `];` inside a string
    // value cuts the array short and the result no longer parses.
    #[test]
    fn terminator_inside_string_truncates_early() {
        let page = r#"var video_sources = [{"src":"https://cdn/x.mp4?q=];","label":"720p"}];"#;
        let carved = TerminatorCarver.carve(page, PREFIX).unwrap();
        assert_eq!(carved, r#"[{"src":"https://cdn/x.mp4?q=]"#);
        assert!(matches!(
            parse_source_list(&carved),
            Err(ExtractError::MalformedArray { .. })
        ));
    }

    #[test]
    fn closing_bracket_without_terminator_inside_string_is_fine() {
        let page = r#"var video_sources = [{"src":"https://cdn/x].mp4","label":"720p"}];"#;
        let carved = TerminatorCarver.carve(page, PREFIX).unwrap();
        let list = parse_source_list(&carved).unwrap();
        assert_eq!(list[0].url, "https://cdn/x].mp4");
    }
}
