//! Search-engine and social preview metadata.
//!
//! [`MetadataGenerator::generate`] is total: every optional input falls back
//! to a site-wide default, so a complete [`PageMetadata`] is always produced.

use chrono::NaiveDate;
use folio_core::{Collection, PostRecord, ProjectRecord, SiteConfig};
use folio_parser::html::escape_html;
use serde::Serialize;

use crate::routes::StaticPage;

/// Social preview image width.
pub const OG_IMAGE_WIDTH: u32 = 1200;

/// Social preview image height.
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// Open Graph object type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageKind {
    #[default]
    Website,
    Article,
}

impl PageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Website => "website",
            Self::Article => "article",
        }
    }
}

/// Per-page metadata inputs. Everything is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSeo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    /// Site-relative path of the page, the site root when absent.
    pub path: Option<String>,
    pub kind: PageKind,
    pub published_time: Option<NaiveDate>,
    pub modified_time: Option<NaiveDate>,
    pub tags: Vec<String>,
}

impl PageSeo {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Mark the page as an article with its publication dates.
    #[must_use]
    pub fn article(mut self, published: NaiveDate, modified: Option<NaiveDate>) -> Self {
        self.kind = PageKind::Article;
        self.published_time = Some(published);
        self.modified_time = modified;
        self
    }

    #[must_use]
    pub fn tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Inputs for one of the fixed pages.
    pub fn for_static(page: StaticPage) -> Self {
        let mut seo = Self::new().path(page.path());
        seo.title = page.title().map(str::to_string);
        seo.description = page.description().map(str::to_string);
        seo
    }

    /// Inputs for a project detail page.
    pub fn for_project(project: &ProjectRecord) -> Self {
        let meta = &project.meta;
        Self::new()
            .title(&meta.title)
            .description(&meta.description)
            .image(meta.image.clone())
            .path(Collection::Projects.document_route(&meta.slug))
    }

    /// Inputs for a blog post page.
    pub fn for_post(post: &PostRecord) -> Self {
        let meta = &post.meta;
        Self::new()
            .title(&meta.title)
            .description(&meta.description)
            .image(meta.image.clone())
            .path(Collection::Blog.document_route(&meta.slug))
            .article(meta.date, meta.updated)
            .tags(meta.tags.clone())
    }
}

/// Complete head metadata for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub metadata_base: String,
    pub canonical: String,
    pub open_graph: OpenGraph,
    pub twitter: TwitterCard,
    pub robots: RobotsDirectives,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenGraph {
    #[serde(rename = "type")]
    pub kind: PageKind,
    pub locale: String,
    pub url: String,
    pub title: String,
    pub description: String,
    pub site_name: String,
    pub images: Vec<OgImage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_time: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_time: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OgImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TwitterCard {
    pub card: &'static str,
    pub title: String,
    pub description: String,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotsDirectives {
    pub index: bool,
    pub follow: bool,
    #[serde(rename = "googleBot")]
    pub google_bot: GoogleBotDirectives,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GoogleBotDirectives {
    pub index: bool,
    pub follow: bool,
    #[serde(rename = "max-video-preview")]
    pub max_video_preview: i32,
    #[serde(rename = "max-image-preview")]
    pub max_image_preview: &'static str,
    #[serde(rename = "max-snippet")]
    pub max_snippet: i32,
}

impl Default for RobotsDirectives {
    fn default() -> Self {
        Self {
            index: true,
            follow: true,
            google_bot: GoogleBotDirectives {
                index: true,
                follow: true,
                max_video_preview: -1,
                max_image_preview: "large",
                max_snippet: -1,
            },
        }
    }
}

/// Builds [`PageMetadata`] from the site identity.
#[derive(Debug, Clone)]
pub struct MetadataGenerator {
    site: SiteConfig,
}

impl MetadataGenerator {
    #[must_use]
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// `"<Title> | <SiteName>"`, or the bare site name without a title.
    pub fn page_title(&self, title: Option<&str>) -> String {
        match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => format!("{title} | {}", self.site.name),
            None => self.site.name.clone(),
        }
    }

    pub fn generate(&self, page: &PageSeo) -> PageMetadata {
        let title = self.page_title(page.title.as_deref());
        let description = page
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.site.description)
            .to_string();
        let canonical = self.site.url_for(page.path.as_deref().unwrap_or_default());
        let image = self.site.absolute(
            page.image
                .as_deref()
                .filter(|i| !i.trim().is_empty())
                .unwrap_or(&self.site.og_image),
        );

        let article = page.kind == PageKind::Article;
        let open_graph = OpenGraph {
            kind: page.kind,
            locale: self.site.locale.clone(),
            url: canonical.clone(),
            title: title.clone(),
            description: description.clone(),
            site_name: self.site.name.clone(),
            images: vec![OgImage {
                url: image.clone(),
                width: OG_IMAGE_WIDTH,
                height: OG_IMAGE_HEIGHT,
                alt: title.clone(),
            }],
            published_time: page.published_time.filter(|_| article),
            modified_time: page.modified_time.filter(|_| article),
            tags: article.then(|| page.tags.clone()),
        };

        let twitter = TwitterCard {
            card: "summary_large_image",
            title: title.clone(),
            description: description.clone(),
            images: vec![image],
            creator: self.site.twitter_handle.clone(),
        };

        PageMetadata {
            title,
            description,
            metadata_base: self.site.url_for(""),
            canonical,
            open_graph,
            twitter,
            robots: RobotsDirectives::default(),
        }
    }
}

impl PageMetadata {
    /// Render the metadata as HTML head tags, one per line.
    pub fn to_head_html(&self) -> String {
        let mut out = String::new();
        let mut meta = |attr: &str, key: &str, value: &str| {
            out.push_str(&format!(
                "<meta {attr}=\"{key}\" content=\"{}\" />\n",
                escape_html(value)
            ));
        };

        meta("name", "description", &self.description);

        let og = &self.open_graph;
        meta("property", "og:type", og.kind.as_str());
        meta("property", "og:locale", &og.locale);
        meta("property", "og:url", &og.url);
        meta("property", "og:title", &og.title);
        meta("property", "og:description", &og.description);
        meta("property", "og:site_name", &og.site_name);
        for image in &og.images {
            meta("property", "og:image", &image.url);
            meta("property", "og:image:width", &image.width.to_string());
            meta("property", "og:image:height", &image.height.to_string());
            meta("property", "og:image:alt", &image.alt);
        }
        if let Some(published) = og.published_time {
            meta("property", "article:published_time", &published.to_string());
        }
        if let Some(modified) = og.modified_time {
            meta("property", "article:modified_time", &modified.to_string());
        }
        for tag in og.tags.iter().flatten() {
            meta("property", "article:tag", tag);
        }

        let tw = &self.twitter;
        meta("name", "twitter:card", tw.card);
        meta("name", "twitter:title", &tw.title);
        meta("name", "twitter:description", &tw.description);
        for image in &tw.images {
            meta("name", "twitter:image", image);
        }
        if let Some(creator) = &tw.creator {
            meta("name", "twitter:creator", creator);
        }

        meta("name", "robots", &self.robots.content());
        meta("name", "googlebot", &self.robots.google_bot.content());

        format!(
            "<title>{}</title>\n<link rel=\"canonical\" href=\"{}\" />\n{out}",
            escape_html(&self.title),
            escape_html(&self.canonical)
        )
    }
}

fn index_follow(index: bool, follow: bool) -> String {
    let index = if index { "index" } else { "noindex" };
    let follow = if follow { "follow" } else { "nofollow" };
    format!("{index}, {follow}")
}

impl RobotsDirectives {
    fn content(&self) -> String {
        index_follow(self.index, self.follow)
    }
}

impl GoogleBotDirectives {
    fn content(&self) -> String {
        format!(
            "{}, max-video-preview:{}, max-image-preview:{}, max-snippet:{}",
            index_follow(self.index, self.follow),
            self.max_video_preview,
            self.max_image_preview,
            self.max_snippet
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            name: "Nguyen Ngoc Duc".to_string(),
            description: "I build fast web experiences.".to_string(),
            url: "https://n2duc.dev".to_string(),
            twitter_handle: Some("@n2duc".to_string()),
            ..SiteConfig::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn test_defaults_are_complete() {
        let meta = MetadataGenerator::new(site()).generate(&PageSeo::default());

        assert_eq!(meta.title, "Nguyen Ngoc Duc");
        assert_eq!(meta.description, "I build fast web experiences.");
        assert_eq!(meta.canonical, "https://n2duc.dev");
        assert_eq!(meta.metadata_base, "https://n2duc.dev");
        assert_eq!(meta.open_graph.kind, PageKind::Website);
        assert_eq!(meta.open_graph.images.len(), 1);
        assert_eq!(meta.open_graph.images[0].url, "https://n2duc.dev/og-default.png");
        assert_eq!(meta.open_graph.images[0].alt, "Nguyen Ngoc Duc");
        assert_eq!(meta.twitter.card, "summary_large_image");
        assert!(meta.open_graph.published_time.is_none());
        assert!(meta.open_graph.tags.is_none());
    }

    #[test]
    fn test_defaults_with_default_site() {
        let meta = MetadataGenerator::new(SiteConfig::default()).generate(&PageSeo::default());

        assert_eq!(meta.title, "Portfolio");
        assert_eq!(meta.canonical, "http://localhost:3000");
        assert!(meta.twitter.creator.is_none());
    }

    #[test]
    fn test_title_composition() {
        let generator = MetadataGenerator::new(site());

        assert_eq!(generator.page_title(Some("Blog")), "Blog | Nguyen Ngoc Duc");
        assert_eq!(generator.page_title(Some("  ")), "Nguyen Ngoc Duc");
        assert_eq!(generator.page_title(None), "Nguyen Ngoc Duc");
    }

    #[test]
    fn test_blank_description_falls_back() {
        let seo = PageSeo::new().description("   ");
        let meta = MetadataGenerator::new(site()).generate(&seo);
        assert_eq!(meta.description, "I build fast web experiences.");
    }

    #[test]
    fn test_article_adds_dates_and_tags() {
        let seo = PageSeo::new()
            .title("Hello")
            .path("/blog/hello")
            .image(Some("https://cdn.example.com/hello.png".to_string()))
            .article(date(2024, 6, 1), Some(date(2024, 6, 3)))
            .tags(vec!["rust".to_string(), "web".to_string()]);
        let meta = MetadataGenerator::new(site()).generate(&seo);

        assert_eq!(meta.canonical, "https://n2duc.dev/blog/hello");
        assert_eq!(meta.open_graph.kind, PageKind::Article);
        assert_eq!(meta.open_graph.published_time, Some(date(2024, 6, 1)));
        assert_eq!(meta.open_graph.modified_time, Some(date(2024, 6, 3)));
        assert_eq!(
            meta.open_graph.tags,
            Some(vec!["rust".to_string(), "web".to_string()])
        );
        assert_eq!(meta.twitter.images, vec!["https://cdn.example.com/hello.png"]);
    }

    #[test]
    fn test_website_ignores_article_fields() {
        let mut seo = PageSeo::new().tags(vec!["x".to_string()]);
        seo.published_time = Some(date(2024, 1, 1));
        let meta = MetadataGenerator::new(site()).generate(&seo);

        assert!(meta.open_graph.published_time.is_none());
        assert!(meta.open_graph.tags.is_none());
    }

    #[test]
    fn test_static_page_inputs() {
        let meta = MetadataGenerator::new(site()).generate(&PageSeo::for_static(StaticPage::Projects));

        assert_eq!(meta.title, "Projects | Nguyen Ngoc Duc");
        assert_eq!(meta.description, "A showcase of my recent work and case studies");
        assert_eq!(meta.canonical, "https://n2duc.dev/projects");
    }

    #[test]
    fn test_serialized_shape() {
        let meta = MetadataGenerator::new(site()).generate(&PageSeo::default());
        let json = serde_json::to_value(&meta).expect("serialize");

        assert_eq!(json["openGraph"]["type"], "website");
        assert_eq!(json["openGraph"]["siteName"], "Nguyen Ngoc Duc");
        assert_eq!(json["robots"]["googleBot"]["max-video-preview"], -1);
        assert_eq!(json["robots"]["googleBot"]["max-image-preview"], "large");
        assert!(json["openGraph"].get("publishedTime").is_none());
    }

    #[test]
    fn test_head_html() {
        let seo = PageSeo::new()
            .title("Tips & Tricks")
            .article(date(2024, 6, 1), None)
            .tags(vec!["rust".to_string()]);
        let html = MetadataGenerator::new(site()).generate(&seo).to_head_html();

        assert!(html.starts_with("<title>Tips &amp; Tricks | Nguyen Ngoc Duc</title>\n"));
        assert!(html.contains("<link rel=\"canonical\" href=\"https://n2duc.dev\" />"));
        assert!(html.contains("<meta property=\"og:type\" content=\"article\" />"));
        assert!(html.contains("<meta property=\"article:published_time\" content=\"2024-06-01\" />"));
        assert!(html.contains("<meta property=\"article:tag\" content=\"rust\" />"));
        assert!(html.contains("<meta name=\"twitter:creator\" content=\"@n2duc\" />"));
        assert!(html.contains(
            "<meta name=\"googlebot\" content=\"index, follow, max-video-preview:-1, max-image-preview:large, max-snippet:-1\" />"
        ));
        assert!(!html.contains("article:modified_time"));
    }
}
