//! Sitemap generation.
//!
//! One entry per static route and per document, sorted by priority.

use chrono::NaiveDate;
use folio_core::{Collection, PostRecord, ProjectRecord, SiteConfig};
use serde::Serialize;
use tracing::debug;

use crate::routes::StaticPage;

/// Change frequency for sitemap entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

/// Priority and change frequency of project pages.
pub const PROJECT_HINTS: (ChangeFreq, f32) = (ChangeFreq::Monthly, 0.8);

/// Priority and change frequency of blog posts.
pub const POST_HINTS: (ChangeFreq, f32) = (ChangeFreq::Monthly, 0.7);

/// A sitemap URL entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SitemapEntry {
    /// Absolute URL.
    pub url: String,
    pub last_modified: NaiveDate,
    pub change_frequency: ChangeFreq,
    /// Always within `[0, 1]`.
    pub priority: f32,
}

impl SitemapEntry {
    /// Create an entry, clamping `priority` into `[0, 1]`.
    pub fn new(
        url: impl Into<String>,
        last_modified: NaiveDate,
        change_frequency: ChangeFreq,
        priority: f32,
    ) -> Self {
        let priority = if priority.is_nan() {
            0.0
        } else {
            priority.clamp(0.0, 1.0)
        };
        Self {
            url: url.into(),
            last_modified,
            change_frequency,
            priority,
        }
    }
}

/// Sitemap generator.
#[derive(Debug, Clone)]
pub struct SitemapGenerator {
    site: SiteConfig,
}

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    /// Entries for the static routes and both collections.
    ///
    /// Static routes are stamped with `today`; documents use their last
    /// modification date. Ties in priority keep insertion order.
    pub fn entries(
        &self,
        projects: &[ProjectRecord],
        posts: &[PostRecord],
        today: NaiveDate,
    ) -> Vec<SitemapEntry> {
        let statics = StaticPage::ALL.iter().map(|page| {
            SitemapEntry::new(
                self.site.url_for(page.path()),
                today,
                page.change_frequency(),
                page.priority(),
            )
        });

        let (project_freq, project_priority) = PROJECT_HINTS;
        let projects = projects.iter().map(|p| {
            SitemapEntry::new(
                self.site
                    .url_for(&Collection::Projects.document_route(&p.meta.slug)),
                p.meta.last_modified(),
                project_freq,
                project_priority,
            )
        });

        let (post_freq, post_priority) = POST_HINTS;
        let posts = posts.iter().map(|p| {
            SitemapEntry::new(
                self.site.url_for(&Collection::Blog.document_route(&p.meta.slug)),
                p.meta.last_modified(),
                post_freq,
                post_priority,
            )
        });

        let mut entries: Vec<_> = statics.chain(projects).chain(posts).collect();
        entries.sort_by(|a, b| b.priority.total_cmp(&a.priority));

        debug!(count = entries.len(), "generated sitemap entries");
        entries
    }

    /// Generate sitemap XML.
    pub fn to_xml(&self, entries: &[SitemapEntry]) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for entry in entries {
            xml.push_str("  <url>\n");
            xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.url)));
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                entry.last_modified.format("%Y-%m-%d")
            ));
            xml.push_str(&format!(
                "    <changefreq>{}</changefreq>\n",
                entry.change_frequency.as_str()
            ));
            xml.push_str(&format!("    <priority>{:.1}</priority>\n", entry.priority));
            xml.push_str("  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use folio_core::DocumentMeta;

    use super::*;

    fn site() -> SiteConfig {
        SiteConfig {
            url: "https://example.com".to_string(),
            ..SiteConfig::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    fn meta(slug: &str, updated: Option<NaiveDate>) -> DocumentMeta {
        DocumentMeta {
            slug: slug.to_string(),
            title: slug.to_string(),
            description: String::new(),
            date: date(2024, 1, 1),
            updated,
            tags: vec![],
            image: None,
        }
    }

    fn project(slug: &str) -> ProjectRecord {
        ProjectRecord {
            meta: meta(slug, None),
            role: "Lead".to_string(),
            stack: vec![],
            demo_url: None,
            repo_url: None,
            featured: false,
        }
    }

    fn post(slug: &str, updated: Option<NaiveDate>) -> PostRecord {
        PostRecord {
            meta: meta(slug, updated),
            author: None,
            reading_time: 1,
        }
    }

    #[test]
    fn test_entry_count_and_absolute_urls() {
        let generator = SitemapGenerator::new(site());
        let entries = generator.entries(
            &[project("shop"), project("crm")],
            &[post("hello", None)],
            date(2025, 1, 1),
        );

        assert_eq!(entries.len(), StaticPage::ALL.len() + 3);
        assert!(entries.iter().all(|e| e.url.starts_with("https://example.com")));
    }

    #[test]
    fn test_sorted_by_priority() {
        let generator = SitemapGenerator::new(site());
        let entries = generator.entries(&[project("shop")], &[post("hello", None)], date(2025, 1, 1));

        let urls: Vec<_> = entries.iter().map(|e| e.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://example.com",
                "https://example.com/projects",
                "https://example.com/blog",
                "https://example.com/about",
                "https://example.com/projects/shop",
                "https://example.com/contact",
                "https://example.com/blog/hello",
            ]
        );
        assert!(entries.windows(2).all(|w| w[0].priority >= w[1].priority));
    }

    #[test]
    fn test_last_modified() {
        let generator = SitemapGenerator::new(site());
        let entries = generator.entries(
            &[project("shop")],
            &[post("hello", Some(date(2024, 3, 2)))],
            date(2025, 1, 1),
        );

        let find = |url: &str| {
            entries
                .iter()
                .find(|e| e.url == url)
                .expect("entry present")
                .last_modified
        };
        assert_eq!(find("https://example.com"), date(2025, 1, 1));
        assert_eq!(find("https://example.com/projects/shop"), date(2024, 1, 1));
        assert_eq!(find("https://example.com/blog/hello"), date(2024, 3, 2));
    }

    #[test]
    fn test_priority_is_clamped() {
        let d = date(2024, 1, 1);
        assert_eq!(SitemapEntry::new("u", d, ChangeFreq::Daily, 1.5).priority, 1.0);
        assert_eq!(SitemapEntry::new("u", d, ChangeFreq::Daily, -0.2).priority, 0.0);
        assert_eq!(SitemapEntry::new("u", d, ChangeFreq::Daily, f32::NAN).priority, 0.0);
    }

    #[test]
    fn test_generate_xml() {
        let generator = SitemapGenerator::new(site());
        let entries = generator.entries(&[], &[post("a&b", None)], date(2025, 1, 1));
        let xml = generator.to_xml(&entries);

        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<urlset"));
        assert!(xml.contains("<loc>https://example.com/about</loc>"));
        assert!(xml.contains("<loc>https://example.com/blog/a&amp;b</loc>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<lastmod>2025-01-01</lastmod>"));
        assert_eq!(xml.matches("<url>").count(), 6);
    }

    #[test]
    fn test_slug_with_space_is_encoded() {
        let generator = SitemapGenerator::new(site());
        let entries = generator.entries(&[], &[post("my post", None)], date(2025, 1, 1));

        assert!(entries.iter().any(|e| e.url == "https://example.com/blog/my%20post"));
        assert!(entries.iter().all(|e| !e.url.contains(' ')));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }
}
