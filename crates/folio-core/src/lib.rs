//! Folio Core Library
//!
//! Shared types for the folio content pipeline: site configuration, front matter
//! parsing and the normalized document records for the `projects` and `blog`
//! collections.

pub mod config;
pub mod document;
pub mod error;
pub mod frontmatter;

pub use config::{BuildConfig, Config, ManifestConfig, SiteConfig, SiteLinks};
pub use document::{
    Collection, DocumentMeta, ParsedDocument, PostRecord, ProjectRecord, reading_time,
};
pub use error::{CoreError, Result};
pub use frontmatter::{CommonFields, Frontmatter, FrontmatterFormat, parse_frontmatter};
