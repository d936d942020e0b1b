//! Folio Generator Library
//!
//! Reads the content collections and produces everything a page or crawler
//! needs from them.
//!
//! # Modules
//!
//! - [`repository`] - Project and post collections on disk
//! - [`seo`] - Head metadata with social preview tags
//! - [`schema`] - schema.org structured data
//! - [`routes`] - Fixed site routes
//! - [`sitemap`] - XML sitemap generation
//! - [`robots`] - Crawler policy and robots.txt
//! - [`manifest`] - Web app manifest
//! - [`page`] - Detail page assembly
//! - [`build`] - Build orchestration

pub mod build;
pub mod manifest;
pub mod page;
pub mod repository;
pub mod robots;
pub mod routes;
pub mod schema;
pub mod seo;
pub mod sitemap;

pub use build::{BuildError, BuildStats, Builder};
pub use manifest::{ManifestGenerator, WebManifest};
pub use page::{PageRenderer, Template, TemplateContext};
pub use repository::{ContentRepository, Listing, Record, Rejected, RepositoryError};
pub use robots::{RobotsGenerator, RobotsPolicy, RuleGroup};
pub use routes::StaticPage;
pub use schema::{Breadcrumb, SchemaGenerator, StructuredData};
pub use seo::{MetadataGenerator, PageKind, PageMetadata, PageSeo};
pub use sitemap::{ChangeFreq, SitemapEntry, SitemapGenerator};
