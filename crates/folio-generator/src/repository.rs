//! Content repository.
//!
//! Reads the `projects` and `blog` collections from the content directory.
//! Every call re-reads the files; nothing is cached between calls.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use folio_core::{
    Collection, Config, CoreError, DocumentMeta, Frontmatter, ParsedDocument, PostRecord,
    ProjectRecord, parse_frontmatter,
};
use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Content repository errors.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The document exists but its metadata is malformed.
    #[error("invalid document: {0}")]
    Invalid(#[from] CoreError),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

/// A record type stored in one collection.
pub trait Record: Sized + Send {
    /// Collection holding records of this type.
    const COLLECTION: Collection;

    /// Validate front matter and build the record.
    fn from_source(
        slug: &str,
        frontmatter: &Frontmatter,
        body: &str,
        path: &Path,
    ) -> folio_core::Result<Self>;

    /// Shared document fields.
    fn meta(&self) -> &DocumentMeta;
}

impl Record for ProjectRecord {
    const COLLECTION: Collection = Collection::Projects;

    fn from_source(
        slug: &str,
        frontmatter: &Frontmatter,
        _body: &str,
        path: &Path,
    ) -> folio_core::Result<Self> {
        ProjectRecord::from_frontmatter(slug, frontmatter, path)
    }

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }
}

impl Record for PostRecord {
    const COLLECTION: Collection = Collection::Blog;

    fn from_source(
        slug: &str,
        frontmatter: &Frontmatter,
        body: &str,
        path: &Path,
    ) -> folio_core::Result<Self> {
        PostRecord::from_frontmatter(slug, frontmatter, body, path)
    }

    fn meta(&self) -> &DocumentMeta {
        &self.meta
    }
}

/// A document file that failed validation.
#[derive(Debug)]
pub struct Rejected {
    pub path: PathBuf,
    pub error: RepositoryError,
}

/// A loaded collection.
#[derive(Debug)]
pub struct Listing<R> {
    /// Valid documents, newest first.
    pub documents: Vec<ParsedDocument<R>>,
    /// Files that failed validation, in slug order.
    pub rejected: Vec<Rejected>,
}

/// File-backed document repository.
#[derive(Debug, Clone)]
pub struct ContentRepository {
    root: PathBuf,
    extensions: Vec<String>,
}

impl ContentRepository {
    /// Create a repository rooted at the configured content directory.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_root(config, &config.build.content_dir)
    }

    /// Create a repository rooted at an explicit content directory.
    #[must_use]
    pub fn with_root(config: &Config, root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extensions: config.build.extensions.clone(),
        }
    }

    /// Content root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one collection.
    pub fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root.join(collection.dir_name())
    }

    /// All valid projects, newest first.
    pub fn list_projects(&self) -> Result<Vec<ProjectRecord>> {
        self.list()
    }

    /// All valid posts, newest first, with reading times.
    pub fn list_posts(&self) -> Result<Vec<PostRecord>> {
        self.list()
    }

    /// Look up one project. `Ok(None)` when no file matches `slug`.
    pub fn get_project_by_slug(&self, slug: &str) -> Result<Option<ParsedDocument<ProjectRecord>>> {
        self.get(slug)
    }

    /// Look up one post. `Ok(None)` when no file matches `slug`.
    pub fn get_post_by_slug(&self, slug: &str) -> Result<Option<ParsedDocument<PostRecord>>> {
        self.get(slug)
    }

    /// Validate every file of a collection, returning the ones that fail.
    pub fn rejected(&self, collection: Collection) -> Result<Vec<Rejected>> {
        Ok(match collection {
            Collection::Projects => self.listing::<ProjectRecord>()?.rejected,
            Collection::Blog => self.listing::<PostRecord>()?.rejected,
        })
    }

    /// List and sort a collection.
    ///
    /// Files are enumerated in slug order and parsed in parallel. Malformed
    /// documents are skipped with a warning. The final sort is stable, so
    /// documents sharing a date keep slug order.
    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        Ok(self
            .listing::<R>()?
            .documents
            .into_iter()
            .map(|document| document.record)
            .collect())
    }

    /// Load a whole collection, keeping bodies and rejected files.
    pub fn listing<R: Record>(&self) -> Result<Listing<R>> {
        let collection = R::COLLECTION;
        let files = self.document_files(collection)?;
        debug!(%collection, count = files.len(), "found document files");

        let loaded: Vec<_> = files
            .par_iter()
            .map(|(slug, path)| (path, load::<R>(slug, path)))
            .collect();

        let mut documents = Vec::with_capacity(loaded.len());
        let mut rejected = Vec::new();
        for (path, result) in loaded {
            match result {
                Ok(document) => documents.push(document),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping malformed document");
                    rejected.push(Rejected {
                        path: path.clone(),
                        error,
                    });
                }
            }
        }

        documents.sort_by(|a, b| b.record.meta().date.cmp(&a.record.meta().date));

        info!(
            %collection,
            count = documents.len(),
            skipped = rejected.len(),
            "listed documents"
        );
        Ok(Listing {
            documents,
            rejected,
        })
    }

    /// Load one document by slug.
    pub fn get<R: Record>(&self, slug: &str) -> Result<Option<ParsedDocument<R>>> {
        if !is_valid_slug(slug) {
            debug!(slug, "rejecting hidden slug or slug with path components");
            return Ok(None);
        }

        let dir = self.collection_dir(R::COLLECTION);
        for ext in &self.extensions {
            let path = dir.join(format!("{slug}.{ext}"));
            if path.is_file() {
                return load(slug, &path).map(Some);
            }
        }

        Ok(None)
    }

    /// Document files of a collection keyed by slug.
    ///
    /// A missing directory yields no files. When one slug exists with several
    /// extensions, the earliest configured extension wins.
    fn document_files(&self, collection: Collection) -> Result<Vec<(String, PathBuf)>> {
        let dir = self.collection_dir(collection);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %dir.display(), "collection directory missing");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut files: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
        for entry in entries {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let (Some(stem), Some(ext)) = (
                path.file_stem().and_then(|s| s.to_str()),
                path.extension().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            let Some(rank) = self.extensions.iter().position(|e| e == ext) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }

            match files.get(stem).map(|(r, p)| (*r, p.display().to_string())) {
                Some((existing, kept)) => {
                    warn!(
                        slug = stem,
                        %kept,
                        other = %path.display(),
                        "duplicate slug in collection"
                    );
                    if rank < existing {
                        files.insert(stem.to_string(), (rank, path));
                    }
                }
                None => {
                    files.insert(stem.to_string(), (rank, path));
                }
            }
        }

        Ok(files
            .into_iter()
            .map(|(slug, (_, path))| (slug, path))
            .collect())
    }
}

fn load<R: Record>(slug: &str, path: &Path) -> Result<ParsedDocument<R>> {
    let content = fs::read_to_string(path)?;
    let (frontmatter, body) = parse_frontmatter(&content, path)?;
    let record = R::from_source(slug, &frontmatter, &body, path)?;
    Ok(ParsedDocument { record, body })
}

/// Hidden stems are never documents; listing skips them too.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\', '\0'])
}
