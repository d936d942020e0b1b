//! Site configuration management.
//!
//! The configuration is loaded once at startup and handed to each component
//! through its constructor. Nothing in the pipeline reads it from global state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Main configuration structure for folio.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site owner identity and public URL.
    #[serde(default)]
    pub site: SiteConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// Web app manifest settings.
    #[serde(default)]
    pub manifest: ManifestConfig,
}

/// Site-wide configuration describing the site owner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Owner name, also used as the site name.
    pub name: String,

    /// Owner job title.
    #[serde(default)]
    pub title: String,

    /// Default page description.
    #[serde(default)]
    pub description: String,

    /// Absolute base URL (e.g., "https://example.com").
    pub url: String,

    /// Default social preview image.
    #[serde(default = "default_og_image")]
    pub og_image: String,

    /// Portrait used in the person schema.
    #[serde(default = "default_avatar")]
    pub avatar: String,

    /// Contact email.
    #[serde(default)]
    pub email: String,

    /// City or region shown in the person schema.
    #[serde(default)]
    pub location: String,

    /// ISO country code for the postal address.
    #[serde(default)]
    pub country: String,

    /// Open Graph locale.
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Social card creator handle (e.g., "@someone").
    #[serde(default)]
    pub twitter_handle: Option<String>,

    /// Profile links.
    #[serde(default)]
    pub links: SiteLinks,
}

/// Profile links of the site owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteLinks {
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub twitter: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl SiteLinks {
    /// Profile links in `sameAs` order, skipping absent ones.
    pub fn profiles(&self) -> Vec<String> {
        [&self.github, &self.linkedin, &self.twitter]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Build configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory holding the `projects` and `blog` collections.
    #[serde(default = "default_content_dir")]
    pub content_dir: String,

    /// Output directory for generated files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Document file extensions. The first one is used for slug lookups first.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Syntax highlighting theme name.
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,
}

/// Web app manifest configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Short application name.
    #[serde(default)]
    pub short_name: Option<String>,

    #[serde(default = "default_start_url")]
    pub start_url: String,

    #[serde(default = "default_display")]
    pub display: String,

    #[serde(default = "default_background_color")]
    pub background_color: String,

    #[serde(default = "default_theme_color")]
    pub theme_color: String,

    /// Application icons.
    #[serde(default = "default_icons")]
    pub icons: Vec<ManifestIcon>,
}

/// A single manifest icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime: String,
}

// Default value functions
fn default_og_image() -> String {
    "/og-default.png".to_string()
}

fn default_avatar() -> String {
    "/avatar.jpg".to_string()
}

fn default_locale() -> String {
    "en_US".to_string()
}

fn default_content_dir() -> String {
    "content".to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["mdx".to_string(), "md".to_string()]
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

fn default_start_url() -> String {
    "/".to_string()
}

fn default_display() -> String {
    "standalone".to_string()
}

fn default_background_color() -> String {
    "#0B0D10".to_string()
}

fn default_theme_color() -> String {
    "#22D3EE".to_string()
}

fn default_icons() -> Vec<ManifestIcon> {
    vec![ManifestIcon {
        src: "/favicon.ico".to_string(),
        sizes: "any".to_string(),
        mime: "image/x-icon".to_string(),
    }]
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "Portfolio".to_string(),
            title: String::new(),
            description: String::new(),
            url: "http://localhost:3000".to_string(),
            og_image: default_og_image(),
            avatar: default_avatar(),
            email: String::new(),
            location: String::new(),
            country: String::new(),
            locale: default_locale(),
            twitter_handle: None,
            links: SiteLinks::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            extensions: default_extensions(),
            syntax_theme: default_syntax_theme(),
        }
    }
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            short_name: None,
            start_url: default_start_url(),
            display: default_display(),
            background_color: default_background_color(),
            theme_color: default_theme_color(),
            icons: default_icons(),
        }
    }
}

impl SiteConfig {
    /// Get the full URL for a path.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{path}")
        }
    }

    /// Resolve a site-relative path to an absolute URL, keeping absolute URLs as they are.
    pub fn absolute(&self, url_or_path: &str) -> String {
        if is_absolute_url(url_or_path) {
            url_or_path.to_string()
        } else {
            self.url_for(url_or_path)
        }
    }
}

/// Whether `value` carries an http(s) scheme.
pub fn is_absolute_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

impl Config {
    /// Build a configuration around the given site identity, defaulting everything else.
    #[must_use]
    pub fn from_site(site: SiteConfig) -> Self {
        Self {
            site,
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file with `FOLIO_` environment overrides.
    ///
    /// Nested keys use a double underscore, e.g. `FOLIO_SITE__URL`.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix("FOLIO")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate and normalize the configuration.
    fn validate(&mut self) -> Result<()> {
        if self.site.name.trim().is_empty() {
            return Err(CoreError::config("site.name cannot be empty"));
        }

        if self.site.url.is_empty() {
            return Err(CoreError::config("site.url cannot be empty"));
        }

        if !is_absolute_url(&self.site.url) {
            return Err(CoreError::config(format!(
                "site.url must be an absolute http(s) URL, got `{}`",
                self.site.url
            )));
        }

        if self.site.url.ends_with('/') {
            tracing::warn!(url = %self.site.url, "site.url should not have a trailing slash");
            self.site.url = self.site.url.trim_end_matches('/').to_string();
        }

        if self.build.extensions.is_empty() {
            return Err(CoreError::config("build.extensions cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r##"
[site]
name = "Nguyen Ngoc Duc"
title = "Website Developer / Frontend Engineer"
description = "I build fast, accessible, and delightful web experiences."
url = "https://n2duc.dev"
email = "contact@n2duc.dev"
location = "Da Nang, VN"
country = "VN"
twitter_handle = "@n2duc"

[site.links]
github = "https://github.com/n2duc"
linkedin = "https://linkedin.com/in/n2duc"

[build]
output_dir = "dist"
extensions = ["md"]
syntax_theme = "InspiredGitHub"

[manifest]
short_name = "N2Duc"
theme_color = "#000000"
"##
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.name, "Nguyen Ngoc Duc");
        assert_eq!(config.site.url, "https://n2duc.dev");
        assert_eq!(config.site.country, "VN");
        assert_eq!(config.site.twitter_handle.as_deref(), Some("@n2duc"));
        assert_eq!(
            config.site.links.profiles(),
            vec!["https://github.com/n2duc", "https://linkedin.com/in/n2duc"]
        );
        assert_eq!(config.build.output_dir, "dist");
        assert_eq!(config.build.content_dir, "content");
        assert_eq!(config.build.extensions, vec!["md"]);
        assert_eq!(config.build.syntax_theme, "InspiredGitHub");
        assert_eq!(config.manifest.short_name.as_deref(), Some("N2Duc"));
        assert_eq!(config.manifest.theme_color, "#000000");
        assert_eq!(config.manifest.background_color, "#0B0D10");
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        let minimal_config = r#"
[site]
name = "Minimal Site"
url = "https://example.com"
"#;
        std::fs::write(&config_path, minimal_config).expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.site.og_image, "/og-default.png");
        assert_eq!(config.site.locale, "en_US");
        assert_eq!(config.build.output_dir, "public");
        assert_eq!(config.build.extensions, vec!["mdx", "md"]);
        assert_eq!(config.build.syntax_theme, "base16-ocean.dark");
        assert_eq!(config.manifest.display, "standalone");
        assert_eq!(config.manifest.icons.len(), 1);
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        std::fs::write(
            &config_path,
            "[site]\nname = \"Test\"\nurl = \"https://example.com/\"\n",
        )
        .expect("write");

        let config = Config::load(&config_path).expect("load config");
        assert_eq!(config.site.url, "https://example.com");
    }

    #[test]
    fn test_url_for() {
        let site = SiteConfig {
            url: "https://example.com".to_string(),
            ..SiteConfig::default()
        };

        assert_eq!(site.url_for("/blog/hello"), "https://example.com/blog/hello");
        assert_eq!(site.url_for("blog/hello"), "https://example.com/blog/hello");
        assert_eq!(site.url_for("/"), "https://example.com");
        assert_eq!(site.url_for(""), "https://example.com");
    }

    #[test]
    fn test_absolute() {
        let site = SiteConfig {
            url: "https://example.com".to_string(),
            ..SiteConfig::default()
        };

        assert_eq!(site.absolute("/og.png"), "https://example.com/og.png");
        assert_eq!(
            site.absolute("https://cdn.example.org/og.png"),
            "https://cdn.example.org/og.png"
        );
    }

    #[test]
    fn test_config_validation_empty_name() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        std::fs::write(
            &config_path,
            "[site]\nname = \"\"\nurl = \"https://example.com\"\n",
        )
        .expect("write");

        let result = Config::load(&config_path);
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("name cannot be empty")
        );
    }

    #[test]
    fn test_config_validation_relative_url() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        std::fs::write(&config_path, "[site]\nname = \"Test\"\nurl = \"example.com\"\n")
            .expect("write");

        let err = Config::load(&config_path).unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn test_load_with_env() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("folio.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let config = Config::load_with_env(&config_path).expect("load config");
        assert_eq!(config.site.name, "Nguyen Ngoc Duc");
        assert_eq!(config.build.output_dir, "dist");
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/folio.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
