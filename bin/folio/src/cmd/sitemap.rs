//! Sitemap command - prints sitemap.xml

use std::path::Path;

use chrono::Local;
use color_eyre::eyre::{Result, WrapErr};
use folio_generator::{ContentRepository, SitemapGenerator};

use super::{load_config, site_path};

/// Print the sitemap for the current content to stdout.
pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let repository =
        ContentRepository::with_root(&config, site_path(config_path, &config.build.content_dir));

    let projects = repository
        .list_projects()
        .wrap_err("Failed to list projects")?;
    let posts = repository.list_posts().wrap_err("Failed to list posts")?;

    let generator = SitemapGenerator::new(config.site);
    let entries = generator.entries(&projects, &posts, Local::now().date_naive());
    tracing::info!(count = entries.len(), "Generated sitemap");

    print!("{}", generator.to_xml(&entries));
    Ok(())
}
