//! Normalized document records.
//!
//! Each file in a collection directory becomes one record. Records are plain
//! values built fresh on every listing or lookup.

use std::{fmt, path::Path};

use chrono::NaiveDate;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;

use crate::{
    error::{CoreError, Result},
    frontmatter::Frontmatter,
};

/// Characters left as-is in a URL path segment (RFC 3986 unreserved).
const SEGMENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Words per minute used for reading time estimates.
pub const WORDS_PER_MINUTE: usize = 200;

/// The two document collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    /// Project write-ups under `projects/`.
    Projects,
    /// Blog posts under `blog/`.
    Blog,
}

impl Collection {
    /// Directory name inside the content root.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Projects => "projects",
            Self::Blog => "blog",
        }
    }

    /// Route prefix for index and detail pages.
    pub fn route(&self) -> &'static str {
        match self {
            Self::Projects => "/projects",
            Self::Blog => "/blog",
        }
    }

    /// Route of a single document, with the slug percent-encoded.
    pub fn document_route(&self, slug: &str) -> String {
        format!(
            "{}/{}",
            self.route(),
            utf8_percent_encode(slug, SEGMENT_ENCODE_SET)
        )
    }

    /// Human readable section name, used in breadcrumbs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Projects => "Projects",
            Self::Blog => "Blog",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// Fields common to every document record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    /// File name without extension.
    pub slug: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<NaiveDate>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl DocumentMeta {
    /// Validate the shared fields of `frontmatter` for the document at `path`.
    pub fn from_frontmatter(slug: &str, frontmatter: &Frontmatter, path: &Path) -> Result<Self> {
        let common = frontmatter.validate_common(path)?;
        Ok(Self {
            slug: slug.to_string(),
            title: common.title,
            description: common.description,
            date: common.date,
            updated: common.updated,
            tags: common.tags,
            image: common.image,
        })
    }

    /// Date of the latest change, falling back to the publication date.
    pub fn last_modified(&self) -> NaiveDate {
        self.updated.unwrap_or(self.date)
    }
}

/// A record in the `projects` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRecord {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    pub role: String,
    pub stack: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_url: Option<String>,
    pub featured: bool,
}

impl ProjectRecord {
    /// Build a project record, requiring a `role`.
    pub fn from_frontmatter(slug: &str, frontmatter: &Frontmatter, path: &Path) -> Result<Self> {
        let meta = DocumentMeta::from_frontmatter(slug, frontmatter, path)?;
        let role = frontmatter
            .role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| CoreError::missing_field(path, "role"))?
            .to_string();

        Ok(Self {
            meta,
            role,
            stack: frontmatter.stack.clone(),
            demo_url: frontmatter.demo_url.clone(),
            repo_url: frontmatter.repo_url.clone(),
            featured: frontmatter.featured,
        })
    }
}

/// A record in the `blog` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(flatten)]
    pub meta: DocumentMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Estimated minutes to read the body.
    pub reading_time: usize,
}

impl PostRecord {
    /// Build a post record; the reading time is derived from `body`.
    pub fn from_frontmatter(
        slug: &str,
        frontmatter: &Frontmatter,
        body: &str,
        path: &Path,
    ) -> Result<Self> {
        Ok(Self {
            meta: DocumentMeta::from_frontmatter(slug, frontmatter, path)?,
            author: frontmatter.author.clone(),
            reading_time: reading_time(body),
        })
    }
}

/// A record together with its unrendered body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDocument<R> {
    pub record: R,
    pub body: String,
}

/// Estimated reading time in minutes: `ceil(words / 200)`.
///
/// Words are whitespace-separated runs. An empty body reads in 0 minutes,
/// anything else takes at least 1.
pub fn reading_time(body: &str) -> usize {
    body.split_whitespace().count().div_ceil(WORDS_PER_MINUTE)
}
