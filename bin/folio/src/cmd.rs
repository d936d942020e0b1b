//! CLI commands.

pub mod build;
pub mod check;
pub mod new;
pub mod robots;
pub mod sitemap;

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use folio_core::Config;

/// Load `folio.toml` with `FOLIO_` environment overrides.
pub fn load_config(config_path: &Path) -> Result<Config> {
    Config::load_with_env(config_path).wrap_err_with(|| {
        format!(
            "Failed to load configuration from {}",
            config_path.display()
        )
    })
}

/// Resolve a configured directory against the directory holding the config file.
pub fn site_path(config_path: &Path, configured: &str) -> PathBuf {
    let configured = Path::new(configured);
    if configured.is_absolute() {
        return configured.to_path_buf();
    }
    config_path
        .parent()
        .map_or_else(|| configured.to_path_buf(), |dir| dir.join(configured))
}
