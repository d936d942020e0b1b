//! Build orchestration.
//!
//! Coordinates the full site build process.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{Local, NaiveDate};
use folio_core::{Collection, Config, ParsedDocument, PostRecord, ProjectRecord};
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    manifest::ManifestGenerator,
    page::{PageError, PageRenderer},
    repository::{ContentRepository, Record, RepositoryError},
    robots::RobotsGenerator,
    routes::StaticPage,
    schema::SchemaGenerator,
    seo::{MetadataGenerator, PageSeo},
    sitemap::SitemapGenerator,
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Repository error.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Page assembly error.
    #[error("page error: {0}")]
    Page(#[from] PageError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Project pages written.
    pub projects: usize,

    /// Post pages written.
    pub posts: usize,

    /// Documents excluded because their metadata is invalid.
    pub skipped: usize,

    /// Entries in `sitemap.xml`.
    pub sitemap_entries: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    content_dir: PathBuf,
    output_dir: PathBuf,
    build_date: Option<NaiveDate>,
}

impl Builder {
    /// Create a new builder.
    #[must_use]
    pub fn new(
        config: Config,
        content_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            config,
            content_dir: content_dir.into(),
            output_dir: output_dir.into(),
            build_date: None,
        }
    }

    /// Date stamped on static routes; defaults to today.
    #[must_use]
    pub fn with_build_date(mut self, date: NaiveDate) -> Self {
        self.build_date = Some(date);
        self
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();
        let today = self
            .build_date
            .unwrap_or_else(|| Local::now().date_naive());

        info!(
            content = %self.content_dir.display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        // 1. Clean output directory
        self.clean_output()?;

        // 2. Load both collections
        let repository = ContentRepository::with_root(&self.config, &self.content_dir);
        let projects = repository.listing::<ProjectRecord>()?;
        let posts = repository.listing::<PostRecord>()?;
        stats.skipped = projects.rejected.len() + posts.rejected.len();

        // 3. Detail pages
        let renderer = PageRenderer::new(&self.config)?;
        let project_records = self.write_pages(projects.documents, Collection::Projects, |doc| {
            renderer.render_project(doc)
        });
        let post_records = self.write_pages(posts.documents, Collection::Blog, |doc| {
            renderer.render_post(doc)
        });
        stats.projects = project_records.len();
        stats.posts = post_records.len();

        // 4. Collection indexes
        self.write_json(Collection::Projects.dir_name(), "index.json", &project_records)?;
        self.write_json(Collection::Blog.dir_name(), "index.json", &post_records)?;

        // 5. Static page metadata and the site owner's structured data
        self.write_static_metadata()?;
        let person = SchemaGenerator::new(self.config.site.clone()).person();
        self.write_json("", "person.json", &person)?;

        // 6. Sitemap
        let sitemap = SitemapGenerator::new(self.config.site.clone());
        let entries = sitemap.entries(&project_records, &post_records, today);
        stats.sitemap_entries = entries.len();
        self.write_file("sitemap.xml", sitemap.to_xml(&entries))?;

        // 7. Robots policy
        let robots = RobotsGenerator::new(self.config.site.clone()).policy();
        self.write_file("robots.txt", robots.to_robots_txt())?;

        // 8. Web app manifest
        let manifest =
            ManifestGenerator::new(self.config.site.clone(), self.config.manifest.clone());
        self.write_file("manifest.webmanifest", manifest.to_json()?)?;

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            projects = stats.projects,
            posts = stats.posts,
            skipped = stats.skipped,
            sitemap_entries = stats.sitemap_entries,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Clean the output directory.
    fn clean_output(&self) -> Result<()> {
        if self.output_dir.exists() {
            debug!(dir = %self.output_dir.display(), "cleaning output directory");
            fs::remove_dir_all(&self.output_dir)?;
        }
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Render detail pages in parallel into `<collection>/<slug>/index.html`.
    ///
    /// Returns the records whose page was written, in listing order.
    fn write_pages<R, F>(
        &self,
        documents: Vec<ParsedDocument<R>>,
        collection: Collection,
        render: F,
    ) -> Vec<R>
    where
        R: Record + Sync,
        F: Fn(&ParsedDocument<R>) -> std::result::Result<String, PageError> + Sync,
    {
        info!(%collection, count = documents.len(), "generating pages");

        let results: Vec<_> = documents
            .par_iter()
            .map(|doc| {
                let html = render(doc)?;
                let output_path = self.page_path(collection, &doc.record.meta().slug);

                if let Some(parent) = output_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&output_path, &html)?;

                debug!(path = %output_path.display(), "wrote page");
                Ok::<_, BuildError>(())
            })
            .collect();

        documents
            .into_iter()
            .zip(results)
            .filter_map(|(doc, result)| match result {
                Ok(()) => Some(doc.record),
                Err(e) => {
                    warn!(
                        %collection,
                        slug = %doc.record.meta().slug,
                        error = %e,
                        "failed to generate page"
                    );
                    None
                }
            })
            .collect()
    }

    /// `meta.json` with the head metadata of every static page.
    fn write_static_metadata(&self) -> Result<()> {
        let generator = MetadataGenerator::new(self.config.site.clone());
        for page in StaticPage::ALL {
            let metadata = generator.generate(&PageSeo::for_static(page));
            self.write_json(page.slug().unwrap_or_default(), "meta.json", &metadata)?;
        }
        Ok(())
    }

    fn page_path(&self, collection: Collection, slug: &str) -> PathBuf {
        self.output_dir
            .join(collection.dir_name())
            .join(slug)
            .join("index.html")
    }

    fn write_json<T: Serialize + ?Sized>(&self, dir: &str, name: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_file(Path::new(dir).join(name), json)
    }

    fn write_file(&self, relative: impl AsRef<Path>, contents: String) -> Result<()> {
        let path = self.output_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        info!(path = %path.display(), "generated file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use folio_core::SiteConfig;
    use tempfile::TempDir;

    use super::*;

    fn test_config() -> Config {
        Config::from_site(SiteConfig {
            name: "Test Site".to_string(),
            url: "https://example.com".to_string(),
            ..SiteConfig::default()
        })
    }

    fn build_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 1).expect("date")
    }

    #[test]
    fn test_build_empty_site() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        let stats = Builder::new(test_config(), content_dir.path(), output_dir.path())
            .with_build_date(build_date())
            .build()
            .unwrap();

        assert_eq!(stats.projects, 0);
        assert_eq!(stats.posts, 0);
        assert_eq!(stats.sitemap_entries, StaticPage::ALL.len());
        for file in [
            "sitemap.xml",
            "robots.txt",
            "manifest.webmanifest",
            "meta.json",
            "about/meta.json",
            "person.json",
            "projects/index.json",
            "blog/index.json",
        ] {
            assert!(output_dir.path().join(file).exists(), "{file} should exist");
        }
    }

    #[test]
    fn test_build_with_content() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();

        fs::create_dir_all(content_dir.path().join("blog")).unwrap();
        fs::write(
            content_dir.path().join("blog/test-post.mdx"),
            "---\ntitle: Test Post\ndescription: A test\ndate: 2024-06-01\ntags:\n  - rust\n---\n\n## Hello\n\nHello, world!\n",
        )
        .unwrap();
        fs::write(
            content_dir.path().join("blog/broken.mdx"),
            "---\ntitle: Broken\n---\n",
        )
        .unwrap();

        let stats = Builder::new(test_config(), content_dir.path(), output_dir.path())
            .with_build_date(build_date())
            .build()
            .unwrap();

        assert_eq!(stats.posts, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.sitemap_entries, StaticPage::ALL.len() + 1);

        let html =
            fs::read_to_string(output_dir.path().join("blog/test-post/index.html")).unwrap();
        assert!(html.contains("<title>Test Post | Test Site</title>"));

        let index = fs::read_to_string(output_dir.path().join("blog/index.json")).unwrap();
        let index: serde_json::Value = serde_json::from_str(&index).unwrap();
        assert_eq!(index[0]["slug"], "test-post");
        assert_eq!(index[0]["readingTime"], 1);
    }

    #[test]
    fn test_failed_pages_are_left_out() {
        let output_dir = TempDir::new().unwrap();
        let builder = Builder::new(test_config(), "unused", output_dir.path());

        let post = |slug: &str| ParsedDocument {
            record: PostRecord {
                meta: folio_core::DocumentMeta {
                    slug: slug.to_string(),
                    title: slug.to_string(),
                    description: "d".to_string(),
                    date: build_date(),
                    updated: None,
                    tags: vec![],
                    image: None,
                },
                author: None,
                reading_time: 1,
            },
            body: String::new(),
        };

        let written = builder.write_pages(vec![post("ok"), post("broken")], Collection::Blog, |doc| {
            if doc.record.meta.slug == "broken" {
                Err(PageError::MissingVariable("content".to_string()))
            } else {
                Ok("<html></html>".to_string())
            }
        });

        let slugs: Vec<_> = written.iter().map(|p| p.meta.slug.as_str()).collect();
        assert_eq!(slugs, vec!["ok"]);
        assert!(output_dir.path().join("blog/ok/index.html").exists());
        assert!(!output_dir.path().join("blog/broken").exists());
    }

    #[test]
    fn test_build_cleans_output() {
        let content_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        fs::write(output_dir.path().join("stale.html"), "old").unwrap();

        Builder::new(test_config(), content_dir.path(), output_dir.path())
            .build()
            .unwrap();

        assert!(!output_dir.path().join("stale.html").exists());
    }

    #[test]
    fn test_build_stats() {
        let stats = BuildStats::default();
        assert_eq!(stats.posts, 0);
        assert_eq!(stats.duration_ms, 0);
    }
}
