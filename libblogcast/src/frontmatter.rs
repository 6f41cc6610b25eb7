//! `+++`-delimited TOML front matter
//!
//! Malformed headers never fail a scan. A block that is not valid TOML leaves
//! every field at its default. A field of the wrong type is defaulted on its
//! own, and a bad date leaves the timestamp empty, so the post is dropped
//! later by the eligibility filter.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use tracing::{error, warn};

const DELIMITER: &str = "+++";

/// Metadata extracted from a post's header
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub draft: bool,
    pub date: Option<DateTime<FixedOffset>>,
}

/// Return the text between the opening and closing `+++` lines
///
/// `None` when the document has no header or the header is never closed.
pub fn extract_block(content: &str) -> Option<&str> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let (first, rest) = content.split_once('\n')?;
    if first.trim_end() != DELIMITER {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == DELIMITER {
            return Some(&rest[..offset]);
        }
        offset += line.len();
    }

    None
}

/// Parse a document's front matter
///
/// `source` identifies the document in log messages.
pub fn parse(content: &str, source: &str) -> FrontMatter {
    let Some(block) = extract_block(content) else {
        return FrontMatter::default();
    };

    let mut table: toml::Table = match toml::from_str(block) {
        Ok(table) => table,
        Err(e) => {
            error!("Error parsing frontmatter for {}: {}", source, e);
            return FrontMatter::default();
        }
    };

    FrontMatter {
        title: string_field(&mut table, "title", source),
        description: string_field(&mut table, "description", source),
        tags: tags_field(&mut table, source),
        draft: draft_field(&mut table, source),
        date: date_field(&mut table, source),
    }
}

fn wrong_type(source: &str, key: &str, value: &toml::Value) {
    warn!(
        "Ignoring `{}` in {}: unexpected {} value",
        key,
        source,
        value.type_str()
    );
}

fn string_field(table: &mut toml::Table, key: &str, source: &str) -> String {
    match table.remove(key) {
        None => String::new(),
        Some(toml::Value::String(s)) => s,
        Some(other) => {
            wrong_type(source, key, &other);
            String::new()
        }
    }
}

fn tags_field(table: &mut toml::Table, source: &str) -> Vec<String> {
    match table.remove("tags") {
        None => Vec::new(),
        Some(toml::Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                toml::Value::String(tag) => Some(tag),
                other => {
                    wrong_type(source, "tags", &other);
                    None
                }
            })
            .collect(),
        Some(other) => {
            wrong_type(source, "tags", &other);
            Vec::new()
        }
    }
}

fn draft_field(table: &mut toml::Table, source: &str) -> bool {
    match table.remove("draft") {
        None => false,
        Some(toml::Value::Boolean(draft)) => draft,
        Some(other) => {
            wrong_type(source, "draft", &other);
            false
        }
    }
}

fn date_field(table: &mut toml::Table, source: &str) -> Option<DateTime<FixedOffset>> {
    let raw = match table.remove("date")? {
        toml::Value::String(s) if s.trim().is_empty() => return None,
        toml::Value::String(s) => s,
        toml::Value::Datetime(dt) => dt.to_string(),
        other => {
            wrong_type(source, "date", &other);
            return None;
        }
    };

    parse_date(&raw).or_else(|| {
        warn!("Could not parse date in {}: {}", source, raw);
        None
    })
}

/// Parse an ISO-8601 date-time
///
/// A trailing `Z` is rewritten to `+00:00`. Values without an offset are
/// taken as UTC, and a bare date means midnight UTC.
pub fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    let normalized = match value.strip_suffix('Z').or_else(|| value.strip_suffix('z')) {
        Some(head) => format!("{}+00:00", head),
        None => value.to_string(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Some(dt);
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(&normalized, format) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_parse_full_header() {
        let doc = r#"+++
title = "Shipping a Rust CLI"
date = "2024-03-10T09:30:00Z"
description = "Notes from the release"
tags = ["Rust", "cli-tools"]
draft = false
+++

Body text.
"#;
        let fm = parse(doc, "shipping.md");
        assert_eq!(fm.title, "Shipping a Rust CLI");
        assert_eq!(fm.description, "Notes from the release");
        assert_eq!(fm.tags, vec!["Rust", "cli-tools"]);
        assert!(!fm.draft);
        assert_eq!(
            fm.date.unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 10, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let fm = parse("+++\ntitle = \"Only a title\"\n+++\n", "only.md");
        assert_eq!(fm.title, "Only a title");
        assert!(fm.description.is_empty());
        assert!(fm.tags.is_empty());
        assert!(!fm.draft);
        assert!(fm.date.is_none());
    }

    #[test]
    fn test_native_toml_datetime() {
        let fm = parse(
            "+++\ntitle = \"Native\"\ndate = 2024-01-15T10:00:00-05:00\n+++\n",
            "native.md",
        );
        let date = fm.date.unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap());
        assert_eq!(date.offset().local_minus_utc(), -5 * 3600);
    }

    #[test]
    fn test_malformed_date_is_none() {
        let fm = parse(
            "+++\ntitle = \"Bad date\"\ndate = \"last tuesday\"\n+++\n",
            "bad-date.md",
        );
        assert_eq!(fm.title, "Bad date");
        assert!(fm.date.is_none());
    }

    #[test]
    fn test_malformed_block_leaves_defaults() {
        let fm = parse(
            "+++\ntitle = \"Broken\"\ndate = \"2024-01-01\"\ntags = [\"rust\"\n+++\n",
            "broken.md",
        );
        assert_eq!(fm, FrontMatter::default());
    }

    #[test]
    fn test_wrong_field_types_default_only_that_field() {
        let fm = parse(
            "+++\ntitle = \"Hello\"\ndate = \"2024-01-01T00:00:00Z\"\ntags = \"rust\"\ndraft = \"false\"\n+++\n",
            "scalar-tags.md",
        );
        assert_eq!(fm.title, "Hello");
        assert!(fm.tags.is_empty());
        assert!(!fm.draft);
        assert_eq!(
            fm.date.unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_non_string_tags_are_skipped() {
        let fm = parse(
            "+++\ntitle = 42\ndate = 2024-01-01\ntags = [\"rust\", 1, \"cli\"]\n+++\n",
            "mixed.md",
        );
        assert!(fm.title.is_empty());
        assert_eq!(fm.tags, vec!["rust", "cli"]);
        assert!(fm.date.is_some());
    }

    #[test]
    fn test_opening_delimiter_allows_trailing_whitespace() {
        let doc = "+++ \ntitle = \"Hello\"\ndate = \"2024-01-01\"\n+++\n";
        assert_eq!(extract_block(doc), Some("title = \"Hello\"\ndate = \"2024-01-01\"\n"));
        let fm = parse(doc, "spaced.md");
        assert_eq!(fm.title, "Hello");
        assert!(fm.date.is_some());
    }

    #[test]
    fn test_no_header() {
        assert_eq!(parse("# Just markdown\n", "plain.md"), FrontMatter::default());
        assert!(extract_block("---\ntitle: yaml\n---\n").is_none());
    }

    #[test]
    fn test_unclosed_header() {
        assert!(extract_block("+++\ntitle = \"x\"\n").is_none());
        assert_eq!(
            parse("+++\ntitle = \"x\"\n", "unclosed.md"),
            FrontMatter::default()
        );
    }

    #[test]
    fn test_extract_block_ignores_inline_delimiters() {
        let doc = "+++\ntitle = \"a +++ b\"\n+++\nbody +++\n";
        assert_eq!(extract_block(doc), Some("title = \"a +++ b\"\n"));
    }

    #[test]
    fn test_extract_block_crlf() {
        let doc = "+++\r\ntitle = \"Windows\"\r\n+++\r\nbody";
        assert_eq!(extract_block(doc), Some("title = \"Windows\"\r\n"));
        assert_eq!(parse(doc, "crlf.md").title, "Windows");
    }

    #[test]
    fn test_parse_date_forms() {
        let utc = Utc.with_ymd_and_hms(2023, 11, 2, 8, 15, 0).unwrap();
        assert_eq!(parse_date("2023-11-02T08:15:00Z").unwrap(), utc);
        assert_eq!(parse_date("2023-11-02T08:15:00+00:00").unwrap(), utc);
        assert_eq!(parse_date("2023-11-02T10:15:00+02:00").unwrap(), utc);
        assert_eq!(parse_date("2023-11-02T08:15:00").unwrap(), utc);
        assert_eq!(
            parse_date("2023-11-02").unwrap(),
            Utc.with_ymd_and_hms(2023, 11, 2, 0, 0, 0).unwrap()
        );
        assert!(parse_date("").is_none());
        assert!(parse_date("02/11/2023").is_none());
    }
}
