//! Robots.txt generation.
//!
//! The rule table is fixed: search engines, a catch-all group, social preview
//! crawlers, and a deny-all group for abusive crawlers. Groups are independent;
//! resolving overlapping user agents is left to the crawler.

use folio_core::SiteConfig;
use serde::Serialize;

const SEARCH_ENGINES: &[&str] = &[
    "Googlebot",
    "Googlebot-Image",
    "Googlebot-News",
    "Bingbot",
    "Slurp",
    "DuckDuckBot",
];

const SEARCH_ENGINE_DISALLOW: &[&str] = &[
    "/api/",
    "/admin/",
    "/_next/static/",
    "/out/",
    "/*.json$",
    "/node_modules/",
];

const DEFAULT_ALLOW: &[&str] = &[
    "/",
    "/blog/",
    "/projects/",
    "/about/",
    "/contact/",
    "/*.jpg",
    "/*.jpeg",
    "/*.png",
    "/*.webp",
    "/*.svg",
];

const DEFAULT_DISALLOW: &[&str] = &[
    "/api/",
    "/admin/",
    "/_next/",
    "/out/",
    "/*.json$",
    "/node_modules/",
    "/private/",
    "/draft/",
    "/temp/",
];

const SOCIAL_CRAWLERS: &[&str] = &[
    "facebookexternalhit",
    "Twitterbot",
    "LinkedInBot",
    "WhatsApp",
    "Slackbot",
];

const BLOCKED_CRAWLERS: &[&str] = &[
    "AhrefsBot",
    "SemrushBot",
    "dotbot",
    "MJ12bot",
    "rogerbot",
    "BLEXBot",
    "PetalBot",
];

/// Rules shared by one or more user agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleGroup {
    pub user_agents: Vec<String>,
    pub allow: Vec<String>,
    pub disallow: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl_delay: Option<u32>,
}

impl RuleGroup {
    fn new(
        user_agents: &[&str],
        allow: &[&str],
        disallow: &[&str],
        crawl_delay: Option<u32>,
    ) -> Self {
        Self {
            user_agents: owned(user_agents),
            allow: owned(allow),
            disallow: owned(disallow),
            crawl_delay,
        }
    }
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Complete crawler policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotsPolicy {
    pub rules: Vec<RuleGroup>,
    pub sitemap: String,
    pub host: String,
}

/// Robots.txt generator.
#[derive(Debug, Clone)]
pub struct RobotsGenerator {
    site: SiteConfig,
}

impl RobotsGenerator {
    /// Create a new robots generator.
    #[must_use]
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    pub fn policy(&self) -> RobotsPolicy {
        RobotsPolicy {
            rules: vec![
                RuleGroup::new(SEARCH_ENGINES, &["/"], SEARCH_ENGINE_DISALLOW, Some(0)),
                RuleGroup::new(&["*"], DEFAULT_ALLOW, DEFAULT_DISALLOW, Some(1)),
                RuleGroup::new(SOCIAL_CRAWLERS, &["/"], &[], None),
                RuleGroup::new(BLOCKED_CRAWLERS, &[], &["/"], None),
            ],
            sitemap: self.site.url_for("sitemap.xml"),
            host: self.site.url_for(""),
        }
    }
}

impl RobotsPolicy {
    /// Render in robots.txt syntax, one blank line between groups.
    pub fn to_robots_txt(&self) -> String {
        let mut out = String::new();

        for group in &self.rules {
            for agent in &group.user_agents {
                out.push_str(&format!("User-agent: {agent}\n"));
            }
            for path in &group.allow {
                out.push_str(&format!("Allow: {path}\n"));
            }
            for path in &group.disallow {
                out.push_str(&format!("Disallow: {path}\n"));
            }
            if let Some(delay) = group.crawl_delay {
                out.push_str(&format!("Crawl-delay: {delay}\n"));
            }
            out.push('\n');
        }

        out.push_str(&format!("Sitemap: {}\n", self.sitemap));
        out.push_str(&format!("Host: {}\n", self.host));
        out
    }
}
