//! Check command - validate configuration and content

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use folio_core::{Config, DocumentMeta};
use folio_generator::{ContentRepository, Listing, Record};
use folio_parser::SyntaxHighlighter;

use super::{load_config, site_path};

/// Descriptions beyond this length are truncated in search results.
const MAX_DESCRIPTION_LEN: usize = 160;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates configuration and every document in both collections.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and content");

    let result = validate(config_path);

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Collect every error and warning for the site at `config_path`.
pub fn validate(config_path: &Path) -> ValidationResult {
    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let config = match load_config(config_path) {
        Ok(c) => {
            println!("  ✓ Configuration valid");
            c
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e:#}"));
            println!("  ✗ Configuration invalid: {e:#}");
            return result;
        }
    };
    check_config_values(&config, &mut result);

    let content_dir = site_path(config_path, &config.build.content_dir);
    let repository = ContentRepository::with_root(&config, &content_dir);

    println!("\nChecking content files...");
    check_collection(&repository, &mut result, |_: &folio_core::ProjectRecord| None);
    check_collection(&repository, &mut result, |post: &folio_core::PostRecord| {
        (post.reading_time == 0).then(|| "post body is empty".to_string())
    });

    result
}

/// Check configuration values for common issues.
fn check_config_values(config: &Config, result: &mut ValidationResult) {
    if let Err(e) = SyntaxHighlighter::new(&config.build.syntax_theme) {
        result.add_error(format!("build.syntax_theme: {e}"));
    }

    if config.site.description.trim().is_empty() {
        result.add_warning("site.description is empty, pages without one fall back to it");
    }

    if config.site.title.trim().is_empty() {
        result.add_warning("site.title is empty, the person schema will have no job title");
    }

    if let Some(handle) = &config.site.twitter_handle
        && !handle.starts_with('@')
    {
        result.add_warning(format!("site.twitter_handle `{handle}` should start with @"));
    }

    if config.site.url.starts_with("http://") && !config.site.url.contains("localhost") {
        result.add_warning("site.url uses http://, canonical URLs should use https://");
    }
}

fn check_collection<R: Record>(
    repository: &ContentRepository,
    result: &mut ValidationResult,
    extra: impl Fn(&R) -> Option<String>,
) {
    let collection = R::COLLECTION;
    let dir = repository.collection_dir(collection);
    if !dir.is_dir() {
        result.add_warning(format!(
            "{collection}: directory {} does not exist",
            dir.display()
        ));
        println!("  ⚠ {collection}/ missing");
        return;
    }

    let Listing {
        documents,
        rejected,
    } = match repository.listing::<R>() {
        Ok(listing) => listing,
        Err(e) => {
            result.add_error(format!("{collection}: {e}"));
            return;
        }
    };

    for r in &rejected {
        result.add_error(format!("{}: {}", r.path.display(), r.error));
    }

    for doc in &documents {
        let meta = doc.record.meta();
        for warning in document_warnings(meta)
            .into_iter()
            .chain(extra(&doc.record))
        {
            result.add_warning(format!("{}/{}: {warning}", collection, meta.slug));
        }
    }

    let total = documents.len() + rejected.len();
    if rejected.is_empty() {
        println!("  ✓ {collection}: all {total} documents valid");
    } else {
        println!(
            "  ✗ {collection}: {}/{total} documents have errors",
            rejected.len()
        );
    }
}

fn document_warnings(meta: &DocumentMeta) -> Vec<String> {
    let mut warnings = Vec::new();

    let len = meta.description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        warnings.push(format!(
            "description is {len} characters, search snippets show about {MAX_DESCRIPTION_LEN}"
        ));
    }
    if meta.tags.is_empty() {
        warnings.push("no tags".to_string());
    }
    if meta.updated.is_some_and(|updated| updated < meta.date) {
        warnings.push("updated date is before the publication date".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn site(dir: &TempDir) -> std::path::PathBuf {
        let config_path = dir.path().join("folio.toml");
        fs::write(
            &config_path,
            "[site]\nname = \"Test\"\ntitle = \"Engineer\"\ndescription = \"Site\"\nurl = \"https://example.com\"\n",
        )
        .unwrap();
        fs::create_dir_all(dir.path().join("content/projects")).unwrap();
        fs::create_dir_all(dir.path().join("content/blog")).unwrap();
        config_path
    }

    #[test]
    fn test_valid_site_passes() {
        let dir = TempDir::new().unwrap();
        let config_path = site(&dir);
        fs::write(
            dir.path().join("content/blog/hello.mdx"),
            "---\ntitle: Hello\ndescription: Hi\ndate: 2024-01-01\ntags: [rust]\n---\n\nBody text.\n",
        )
        .unwrap();

        let result = validate(&config_path);
        assert!(!result.has_errors(), "{:?}", result.errors);
        assert!(!result.has_warnings(), "{:?}", result.warnings);
        assert!(run(&config_path, true).is_ok());
    }

    #[test]
    fn test_malformed_document_is_error() {
        let dir = TempDir::new().unwrap();
        let config_path = site(&dir);
        fs::write(
            dir.path().join("content/blog/bad.mdx"),
            "---\ntitle: Bad\ndescription: x\ndate: someday\ntags: []\n---\n",
        )
        .unwrap();

        let result = validate(&config_path);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("bad.mdx"));
        assert!(run(&config_path, false).is_err());
    }

    #[test]
    fn test_warnings_fail_only_in_strict_mode() {
        let dir = TempDir::new().unwrap();
        let config_path = site(&dir);
        fs::write(
            dir.path().join("content/blog/empty.mdx"),
            "---\ntitle: Empty\ndescription: x\ndate: 2024-01-01\ntags: []\n---\n",
        )
        .unwrap();

        let result = validate(&config_path);
        assert!(!result.has_errors());
        assert_eq!(result.warnings.len(), 2);
        assert!(run(&config_path, false).is_ok());
        assert!(run(&config_path, true).is_err());
    }

    #[test]
    fn test_missing_config_is_error() {
        let dir = TempDir::new().unwrap();
        let result = validate(&dir.path().join("missing.toml"));
        assert!(result.has_errors());
    }
}
