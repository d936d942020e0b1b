//! Web app manifest generation.

use folio_core::{ManifestConfig, SiteConfig, config::ManifestIcon};
use serde::Serialize;

/// Contents of `manifest.webmanifest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub display: String,
    pub background_color: String,
    pub theme_color: String,
    pub icons: Vec<ManifestIcon>,
}

/// Builds the manifest from the site identity and manifest settings.
#[derive(Debug, Clone)]
pub struct ManifestGenerator {
    site: SiteConfig,
    manifest: ManifestConfig,
}

impl ManifestGenerator {
    #[must_use]
    pub fn new(site: SiteConfig, manifest: ManifestConfig) -> Self {
        Self { site, manifest }
    }

    /// The short name falls back to the site name.
    pub fn manifest(&self) -> WebManifest {
        let short_name = self
            .manifest
            .short_name
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| self.site.name.clone());

        WebManifest {
            name: self.site.name.clone(),
            short_name,
            description: self.site.description.clone(),
            start_url: self.manifest.start_url.clone(),
            display: self.manifest.display.clone(),
            background_color: self.manifest.background_color.clone(),
            theme_color: self.manifest.theme_color.clone(),
            icons: self.manifest.icons.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.manifest())
    }
}
