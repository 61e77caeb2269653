//! Document loading.
//!
//! Reads plain UTF-8 text documents from disk and locates the
//! processed text rendition of a source document. Text extraction
//! from binary formats lives behind the [`PageSource`] trait; a
//! page that fails to extract is logged and skipped, never fatal
//! for the whole document.

use glob::Pattern;
use once_cell::sync::Lazy;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::Span;
use walkdir::WalkDir;

use crate::core::error::{KgError, Result};

static TEXT_DOCUMENT: Lazy<Pattern> = Lazy::new(|| Pattern::new("*.txt").unwrap());

/// Read a UTF-8 file, mapping failures onto document errors
pub fn read_utf8(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => KgError::DocumentNotFound(path.display().to_string()),
        ErrorKind::InvalidData => {
            KgError::UnsupportedFormat(format!("{} is not valid UTF-8 text", path.display()))
        }
        _ => KgError::IoError(e),
    })
}

/// A paged document whose text is extracted by an external tool
pub trait PageSource {
    fn page_count(&self) -> usize;

    /// Text of one page (0-based)
    fn page_text(&self, index: usize) -> Result<String>;
}

/// Concatenate the non-blank pages of `source`, separated by a blank
/// line. Pages that fail are logged and left out.
pub fn extract_pages(source: &dyn PageSource) -> String {
    let total = source.page_count();
    let mut pages = Vec::with_capacity(total);

    for index in 0..total {
        match source.page_text(index) {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!("Extracted page {}/{}", index + 1, total);
                pages.push(text);
            }
            Ok(_) => tracing::debug!("Page {}/{} is blank", index + 1, total),
            Err(e) => tracing::warn!("Failed to extract page {}/{}: {}", index + 1, total, e),
        }
    }

    let text = pages.join("\n\n");
    tracing::info!(
        "Extracted {} of {} pages ({} chars)",
        pages.len(),
        total,
        text.chars().count()
    );
    text
}

/// Locates and reads text documents
#[derive(Debug, Clone)]
pub struct DocumentLoader {
    /// Where source documents live
    input_dir: PathBuf,

    /// Where `<stem>.txt` renditions of source documents live
    processed_dir: PathBuf,

    /// File name patterns treated as documents
    patterns: Vec<Pattern>,

    span: Span,
}

impl DocumentLoader {
    /// Create a loader matching `*.txt` documents
    pub fn new(input_dir: impl Into<PathBuf>, processed_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            processed_dir: processed_dir.into(),
            patterns: vec![TEXT_DOCUMENT.clone()],
            span: tracing::info_span!("document_loader"),
        }
    }

    /// Replace the document patterns (glob syntax, matched on file names)
    pub fn with_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p)
                    .map_err(|e| KgError::ConfigError(format!("Invalid document pattern '{p}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }

    /// List matching documents under `dir`, sorted.
    ///
    /// A missing directory is not an error: it yields an empty list.
    pub fn list_documents(&self, dir: &Path) -> Vec<PathBuf> {
        let _enter = self.span.enter();

        if !dir.is_dir() {
            tracing::warn!("Directory does not exist: {:?}", dir);
            return Vec::new();
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && self.matches(entry.path()))
            .map(|entry| entry.into_path())
            .collect();

        files.sort();
        files.dedup();

        tracing::info!("Found {} documents in {:?}", files.len(), dir);
        files
    }

    /// Read one text document
    pub fn load_text(&self, path: &Path) -> Result<String> {
        let _enter = self.span.enter();
        let text = read_utf8(path)?;
        tracing::info!("Loaded {:?} ({} chars)", path, text.chars().count());
        Ok(text)
    }

    /// Path of the processed text rendition of `source`
    pub fn processed_path(&self, source: &Path) -> Option<PathBuf> {
        let stem = source.file_stem()?;
        let mut name = stem.to_os_string();
        name.push(".txt");
        Some(self.processed_dir.join(name))
    }

    /// Read the processed rendition of `source`, if there is one
    pub fn load_processed(&self, source: &Path) -> Result<Option<String>> {
        let Some(path) = self.processed_path(source) else {
            return Err(KgError::InvalidPath(source.display().to_string()));
        };

        if !path.exists() {
            self.span
                .in_scope(|| tracing::info!("No processed text for {:?}", source));
            return Ok(None);
        }

        self.load_text(&path).map(Some)
    }

    /// Load every document under `dir`, skipping the ones that fail
    pub fn load_all(&self, dir: &Path) -> Vec<(PathBuf, String)> {
        let files = self.list_documents(dir);
        let total = files.len();
        let mut loaded = Vec::with_capacity(total);

        for path in files {
            match self.load_text(&path) {
                Ok(text) => loaded.push((path, text)),
                Err(e) => {
                    self.span
                        .in_scope(|| tracing::error!("Failed to load {:?}: {}", path, e));
                }
            }
        }

        self.span
            .in_scope(|| tracing::info!("Loaded {}/{} documents", loaded.len(), total));
        loaded
    }

    /// Write extracted text, creating parent directories
    pub fn save_text(&self, text: &str, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)?;
        self.span
            .in_scope(|| tracing::info!("Saved text to {:?}", path));
        Ok(())
    }

    fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
            return false;
        };
        self.patterns.iter().any(|p| p.matches(name))
    }
}
