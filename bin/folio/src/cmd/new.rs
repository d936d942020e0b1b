//! New command - scaffold a document

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::Local;
use color_eyre::eyre::{Result, WrapErr, bail};
use folio_core::Collection;
use folio_parser::slugify;

use super::{load_config, site_path};

/// Run the new command.
///
/// Creates `<content>/<collection>/<slug>.<ext>` with front matter for the
/// collection, using the first configured extension.
pub fn run(
    config_path: &Path,
    collection: Collection,
    slug: &str,
    title: Option<&str>,
) -> Result<PathBuf> {
    tracing::info!(%collection, slug, "Creating new document");

    if slugify(slug) != slug {
        bail!(
            "`{slug}` is not a valid slug, try `{}`",
            slugify(slug)
        );
    }

    let config = load_config(config_path)?;
    let extension = config
        .build
        .extensions
        .first()
        .map_or("mdx", String::as_str);

    let dir = site_path(config_path, &config.build.content_dir).join(collection.dir_name());
    let file_path = dir.join(format!("{slug}.{extension}"));
    if file_path.exists() {
        bail!("{} already exists", file_path.display());
    }

    let title = title.map_or_else(|| title_from_slug(slug), str::to_string);
    let date = Local::now().format("%Y-%m-%d").to_string();

    fs::create_dir_all(&dir).wrap_err("Failed to create directories")?;
    fs::write(&file_path, scaffold(collection, &title, &date)).wrap_err("Failed to write file")?;

    tracing::info!(?file_path, "Created new document");
    println!("Created: {}", file_path.display());
    println!("Replace the placeholder description before publishing.");

    Ok(file_path)
}

/// `my-first-post` becomes `My First Post`.
fn title_from_slug(slug: &str) -> String {
    slug.split('-')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn scaffold(collection: Collection, title: &str, date: &str) -> String {
    let title = title.replace('\\', "\\\\").replace('"', "\\\"");
    let extra = match collection {
        Collection::Projects => {
            "role: \"Developer\"\nstack: []\n# demoUrl: https://\n# repoUrl: https://\nfeatured: false\n"
        }
        Collection::Blog => "",
    };

    format!(
        r#"---
title: "{title}"
description: "Summary of {title}"
date: {date}
tags: []
{extra}---

Write your content here.
"#
    )
}
