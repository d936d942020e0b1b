//! Build command - generates the site artefacts

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::config::is_absolute_url;
use folio_generator::Builder;

use super::{load_config, site_path};

/// Run the build command.
///
/// Renders every document and writes the sitemap, robots policy and manifest.
/// `output` and `content` override the configured directories; `url`
/// overrides the site base URL.
pub fn run(
    config_path: &Path,
    output: Option<&Path>,
    content: Option<&Path>,
    url: Option<&str>,
) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?output, ?content, ?url, "Starting build");

    let mut config = load_config(config_path)?;

    // Override site URL if specified via CLI
    if let Some(url) = url {
        if !is_absolute_url(url) {
            bail!("--url must be an absolute http(s) URL, got `{url}`");
        }
        tracing::info!(url, "Overriding site URL from CLI");
        config.site.url = url.trim_end_matches('/').to_string();
    }

    let content_dir = content.map_or_else(
        || site_path(config_path, &config.build.content_dir),
        Path::to_path_buf,
    );
    let output_dir = output.map_or_else(
        || site_path(config_path, &config.build.output_dir),
        Path::to_path_buf,
    );

    tracing::debug!(?config, "Loaded configuration");

    let stats = Builder::new(config, &content_dir, &output_dir)
        .build()
        .wrap_err("Build failed")?;

    let duration = start.elapsed();

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Projects:   {}", stats.projects);
    println!("  Posts:      {}", stats.posts);
    println!("  Skipped:    {}", stats.skipped);
    println!("  Sitemap:    {} URLs", stats.sitemap_entries);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", output_dir.display());
    println!();

    if stats.skipped > 0 {
        println!("  Run `folio check` to see why documents were skipped.");
        println!();
    }

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(())
}
