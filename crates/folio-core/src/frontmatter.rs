//! Frontmatter parsing for content files.
//!
//! A document starts with a metadata block delimited by `---` (YAML) or `+++`
//! (TOML) lines, followed by the free-form body. Every field is optional at
//! parse time; [`Frontmatter::validate_common`] enforces the required ones.

use std::{collections::HashMap, path::Path};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Frontmatter metadata for content files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Publication date as written in the file.
    #[serde(default)]
    pub date: Option<String>,

    /// Last modification date as written in the file.
    #[serde(default, alias = "modified", alias = "lastModified")]
    pub updated: Option<String>,

    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// Cover image path or URL.
    #[serde(default)]
    pub image: Option<String>,

    /// Project role (projects only).
    #[serde(default)]
    pub role: Option<String>,

    /// Project technology stack (projects only).
    #[serde(default)]
    pub stack: Vec<String>,

    #[serde(default, alias = "demoUrl")]
    pub demo_url: Option<String>,

    #[serde(default, alias = "repoUrl")]
    pub repo_url: Option<String>,

    /// Whether the project is highlighted on the home page.
    #[serde(default)]
    pub featured: bool,

    /// Post author (blog only).
    #[serde(default)]
    pub author: Option<String>,

    /// Custom extra fields.
    #[serde(default, flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Required fields shared by every collection, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommonFields {
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub updated: Option<NaiveDate>,
    pub tags: Vec<String>,
    pub image: Option<String>,
}

/// Delimiter types for frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontmatterFormat {
    /// YAML frontmatter delimited by `---`.
    Yaml,
    /// TOML frontmatter delimited by `+++`.
    Toml,
}

impl FrontmatterFormat {
    /// Get the delimiter string for this format.
    pub fn delimiter(&self) -> &'static str {
        match self {
            Self::Yaml => "---",
            Self::Toml => "+++",
        }
    }
}

/// Split content into frontmatter and body.
///
/// Both delimiters must sit on their own line. Returns `None` when the text does
/// not open with a delimiter line or the block is never closed.
pub fn split_frontmatter(content: &str) -> Option<(FrontmatterFormat, &str, &str)> {
    let content = content.trim_start_matches('\u{feff}').trim_start();

    let format = if content.starts_with("---") {
        FrontmatterFormat::Yaml
    } else if content.starts_with("+++") {
        FrontmatterFormat::Toml
    } else {
        return None;
    };
    let delimiter = format.delimiter();

    let (opening, rest) = content.split_once('\n')?;
    if opening.trim_end() != delimiter {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delimiter {
            let frontmatter = rest[..offset].trim();
            let body = rest[offset + line.len()..].trim_start();
            return Some((format, frontmatter, body));
        }
        offset += line.len();
    }

    None
}

/// Parse frontmatter from a string.
///
/// Text without a metadata block yields an empty [`Frontmatter`] and the whole
/// text as body.
pub fn parse_frontmatter(content: &str, path: &Path) -> Result<(Frontmatter, String)> {
    let Some((format, fm_str, body)) = split_frontmatter(content) else {
        return Ok((Frontmatter::default(), content.to_string()));
    };

    if fm_str.is_empty() {
        return Ok((Frontmatter::default(), body.to_string()));
    }

    let frontmatter = match format {
        FrontmatterFormat::Yaml => {
            serde_yaml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?
        }
        FrontmatterFormat::Toml => parse_toml(fm_str, path)?,
    };

    Ok((frontmatter, body.to_string()))
}

/// TOML dates are native values; turn them back into strings before mapping.
fn parse_toml(fm_str: &str, path: &Path) -> Result<Frontmatter> {
    let mut table: toml::Table =
        toml::from_str(fm_str).map_err(|e| CoreError::frontmatter(path, e.to_string()))?;

    for (_, value) in table.iter_mut() {
        if let toml::Value::Datetime(dt) = value {
            *value = toml::Value::String(dt.to_string());
        }
    }

    toml::Value::Table(table)
        .try_into()
        .map_err(|e: toml::de::Error| CoreError::frontmatter(path, e.to_string()))
}

/// Parse a calendar date from `YYYY-MM-DD` or a full timestamp.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .ok()
        .map(|dt| dt.date())
}

impl Frontmatter {
    /// Validate the fields every document must carry.
    pub fn validate_common(&self, path: &Path) -> Result<CommonFields> {
        let title = required_text(self.title.as_deref(), path, "title")?;
        let description = required_text(self.description.as_deref(), path, "description")?;

        let raw_date = self
            .date
            .as_deref()
            .ok_or_else(|| CoreError::missing_field(path, "date"))?;
        let date = parse_date(raw_date).ok_or_else(|| CoreError::invalid_date(path, raw_date))?;

        let updated = match self.updated.as_deref() {
            Some(raw) => Some(parse_date(raw).ok_or_else(|| CoreError::invalid_date(path, raw))?),
            None => None,
        };

        let tags = self
            .tags
            .clone()
            .ok_or_else(|| CoreError::missing_field(path, "tags"))?;

        Ok(CommonFields {
            title,
            description,
            date,
            updated,
            tags,
            image: self.image.clone().filter(|s| !s.trim().is_empty()),
        })
    }
}

fn required_text(value: Option<&str>, path: &Path, field: &'static str) -> Result<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CoreError::missing_field(path, field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_yaml() -> &'static str {
        r#"---
title: "Hello World"
description: "A first post"
date: 2024-01-14
tags:
  - rust
  - web
image: /images/hello.png
author: Duc
---

This is the body content."#
    }

    #[test]
    fn test_split_yaml_frontmatter() {
        let (format, fm, body) = split_frontmatter(full_yaml()).expect("split");
        assert_eq!(format, FrontmatterFormat::Yaml);
        assert!(fm.contains("title:"));
        assert_eq!(body, "This is the body content.");
    }

    #[test]
    fn test_split_toml_frontmatter() {
        let content = "+++\ntitle = \"Hello\"\n+++\n\nBody.";
        let (format, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(format, FrontmatterFormat::Toml);
        assert_eq!(fm, "title = \"Hello\"");
        assert_eq!(body, "Body.");
    }

    #[test]
    fn test_no_frontmatter() {
        assert!(split_frontmatter("Just some content without frontmatter.").is_none());
    }

    #[test]
    fn test_unclosed_frontmatter() {
        assert!(split_frontmatter("---\ntitle: x\nno closing line").is_none());
    }

    #[test]
    fn test_dashes_inside_block_do_not_close_it() {
        let content = "---\ntitle: a---b\n---\nBody";
        let (_, fm, body) = split_frontmatter(content).expect("split");
        assert_eq!(fm, "title: a---b");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let (fm, body) = parse_frontmatter(full_yaml(), Path::new("a.mdx")).expect("parse");

        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-14"));
        assert_eq!(fm.tags, Some(vec!["rust".to_string(), "web".to_string()]));
        assert_eq!(fm.author.as_deref(), Some("Duc"));
        assert_eq!(body, "This is the body content.");
    }

    #[test]
    fn test_parse_camel_case_project_fields() {
        let content = r#"---
title: Shop
role: Lead
stack: [Next.js, Rust]
demoUrl: https://demo.example.com
repoUrl: https://github.com/example/shop
featured: true
---
Body"#;
        let (fm, _) = parse_frontmatter(content, Path::new("shop.mdx")).expect("parse");

        assert_eq!(fm.role.as_deref(), Some("Lead"));
        assert_eq!(fm.stack, vec!["Next.js", "Rust"]);
        assert_eq!(fm.demo_url.as_deref(), Some("https://demo.example.com"));
        assert_eq!(fm.repo_url.as_deref(), Some("https://github.com/example/shop"));
        assert!(fm.featured);
    }

    #[test]
    fn test_parse_toml_native_date() {
        let content = r#"+++
title = "Test Post"
description = "desc"
date = 2024-06-01
tags = ["rust"]
+++

Content here."#;

        let (fm, body) = parse_frontmatter(content, Path::new("a.md")).expect("parse");
        assert_eq!(fm.date.as_deref(), Some("2024-06-01"));
        assert_eq!(body, "Content here.");

        let common = fm.validate_common(Path::new("a.md")).expect("valid");
        assert_eq!(common.date, NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"));
    }

    #[test]
    fn test_missing_block_returns_empty_metadata() {
        let content = "No metadata here.";
        let (fm, body) = parse_frontmatter(content, Path::new("a.mdx")).expect("parse");
        assert_eq!(fm, Frontmatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";
        let err = parse_frontmatter(content, Path::new("bad.mdx")).unwrap_err();
        assert!(matches!(err, CoreError::Frontmatter { .. }));
    }

    #[test]
    fn test_extra_fields_are_kept() {
        let content = "---\ntitle: T\nseries: rust-intro\n---\nBody";
        let (fm, _) = parse_frontmatter(content, Path::new("a.mdx")).expect("parse");
        assert_eq!(
            fm.extra.get("series").and_then(|v| v.as_str()),
            Some("rust-intro")
        );
    }

    #[test]
    fn test_validate_common() {
        let (fm, _) = parse_frontmatter(full_yaml(), Path::new("a.mdx")).expect("parse");
        let common = fm.validate_common(Path::new("a.mdx")).expect("valid");

        assert_eq!(common.title, "Hello World");
        assert_eq!(common.description, "A first post");
        assert_eq!(common.date, NaiveDate::from_ymd_opt(2024, 1, 14).expect("date"));
        assert_eq!(common.updated, None);
        assert_eq!(common.image.as_deref(), Some("/images/hello.png"));
    }

    #[test]
    fn test_validate_missing_title() {
        let fm = Frontmatter {
            title: Some("   ".to_string()),
            description: Some("d".to_string()),
            date: Some("2024-01-01".to_string()),
            tags: Some(vec![]),
            ..Frontmatter::default()
        };
        let err = fm.validate_common(Path::new("a.mdx")).unwrap_err();
        assert!(matches!(err, CoreError::MissingField { field: "title", .. }));
    }

    #[test]
    fn test_validate_missing_tags() {
        let fm = Frontmatter {
            title: Some("t".to_string()),
            description: Some("d".to_string()),
            date: Some("2024-01-01".to_string()),
            ..Frontmatter::default()
        };
        let err = fm.validate_common(Path::new("a.mdx")).unwrap_err();
        assert!(matches!(err, CoreError::MissingField { field: "tags", .. }));
    }

    #[test]
    fn test_validate_invalid_date() {
        let fm = Frontmatter {
            title: Some("t".to_string()),
            description: Some("d".to_string()),
            date: Some("not a date".to_string()),
            tags: Some(vec![]),
            ..Frontmatter::default()
        };
        let err = fm.validate_common(Path::new("a.mdx")).unwrap_err();
        assert!(matches!(err, CoreError::InvalidDate { .. }));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024-03-09T10:00:00Z"), expected);
        assert_eq!(parse_date("2024-03-09T10:00:00+07:00"), expected);
        assert_eq!(parse_date("2024-03-09T10:00:00"), expected);
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("March 9"), None);
    }
}
