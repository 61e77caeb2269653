//! Triplet validation against source text.
//!
//! A triplet is checked by looking up its evidence in the processed
//! text of the document it came from, ignoring all whitespace. When
//! the evidence is not found verbatim, finding the subject and/or the
//! object still counts as valid.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Span;
use walkdir::WalkDir;

use crate::core::error::Result;
use crate::core::loader::read_utf8;
use crate::core::saver::RAW_TRIPLETS_FILE;
use crate::core::types::{RawTriplet, ValidationDetail, ValidationReport, Verdict};

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Evidence kept in a report detail, in characters
const EVIDENCE_PREVIEW_CHARS: usize = 100;

/// Remove every whitespace character
pub fn normalize_text(text: &str) -> String {
    WHITESPACE.replace_all(text, "").into_owned()
}

/// Check one triplet against already-normalized source text
pub fn validate_triplet(triplet: &RawTriplet, normalized_text: &str) -> Verdict {
    let evidence = triplet.evidence.trim();
    if evidence.is_empty() {
        return Verdict::EmptyEvidence;
    }

    if normalized_text.contains(&normalize_text(evidence)) {
        return Verdict::EvidenceFound;
    }

    let found = |entity: &str| {
        let entity = normalize_text(entity);
        !entity.is_empty() && normalized_text.contains(&entity)
    };

    match (found(&triplet.subject), found(&triplet.object)) {
        (true, true) => Verdict::BothEntitiesFound,
        (true, false) | (false, true) => Verdict::OneEntityFound,
        (false, false) => Verdict::NotFound,
    }
}

/// Validates every `raw_triplets.json` under an output directory.
///
/// Triplets in `<output>/<doc>/raw_triplets.json` are checked against
/// `<processed>/<doc>.txt`.
#[derive(Debug, Clone)]
pub struct TripletValidator {
    output_dir: PathBuf,
    processed_dir: PathBuf,
    limit: usize,
    span: Span,
}

impl TripletValidator {
    /// `limit` caps the number of triplets checked per document
    pub fn new(
        output_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
        limit: usize,
    ) -> Self {
        Self {
            output_dir: output_dir.into(),
            processed_dir: processed_dir.into(),
            limit,
            span: tracing::info_span!("triplet_validator"),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Find the raw triplet files, sorted by path
    pub fn triplet_files(&self) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.output_dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == RAW_TRIPLETS_FILE)
            .map(|entry| entry.into_path())
            .collect();
        files.sort();
        files
    }

    /// Validate all documents and aggregate the results.
    ///
    /// A document is logged and skipped when its processed text is
    /// missing or unreadable, or when its triplet file is unreadable or
    /// empty.
    pub fn validate_all(&self) -> Result<ValidationReport> {
        let _enter = self.span.enter();
        let mut report = ValidationReport::new();

        let files = self.triplet_files();
        if files.is_empty() {
            tracing::warn!("No {} files found under {:?}", RAW_TRIPLETS_FILE, self.output_dir);
            return Ok(report);
        }
        tracing::info!("Found {} triplet files", files.len());

        for triplet_file in files {
            let Some(document) = document_name(&triplet_file) else {
                tracing::warn!("Cannot derive document name from {:?}", triplet_file);
                continue;
            };

            let text_file = self.processed_dir.join(format!("{document}.txt"));
            if !text_file.exists() {
                tracing::warn!("No processed text for {}: {:?}", document, text_file);
                continue;
            }

            let triplets = match load_triplets(&triplet_file) {
                Ok(triplets) => triplets,
                Err(e) => {
                    tracing::warn!("Failed to load {:?}: {}", triplet_file, e);
                    continue;
                }
            };
            let text = match read_utf8(&text_file) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", text_file, e);
                    continue;
                }
            };

            if triplets.is_empty() || text.is_empty() {
                tracing::warn!("Nothing to validate for {}, skipping", document);
                continue;
            }

            self.validate_document(&document, &triplets, &text, &mut report);
        }

        tracing::info!(
            "Validated {} triplets: {} valid, {} invalid ({:.2}%)",
            report.total,
            report.valid,
            report.invalid,
            report.accuracy()
        );
        Ok(report)
    }

    fn validate_document(
        &self,
        document: &str,
        triplets: &[RawTriplet],
        text: &str,
        report: &mut ValidationReport,
    ) {
        let normalized = normalize_text(text);
        let to_validate = &triplets[..triplets.len().min(self.limit)];
        tracing::info!(
            "Validating {} of {} triplets for {}",
            to_validate.len(),
            triplets.len(),
            document
        );

        for (idx, triplet) in to_validate.iter().enumerate() {
            let verdict = validate_triplet(triplet, &normalized);
            tracing::debug!("[{}] {}: {}", idx + 1, document, verdict.reason());

            report.record(ValidationDetail {
                index: idx + 1,
                document: document.to_string(),
                verdict,
                subject: triplet.subject.clone(),
                relation: triplet.relation_type.clone(),
                object: triplet.object.clone(),
                evidence: triplet.evidence.chars().take(EVIDENCE_PREVIEW_CHARS).collect(),
            });
        }
    }

    /// Write the report as pretty JSON
    pub fn save_report(&self, report: &ValidationReport, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(report)?)?;
        self.span
            .in_scope(|| tracing::info!("Saved validation report to {:?}", path));
        Ok(())
    }
}

fn document_name(triplet_file: &Path) -> Option<String> {
    let dir = triplet_file.parent()?.file_name()?;
    Some(dir.to_string_lossy().into_owned())
}

fn load_triplets(path: &Path) -> Result<Vec<RawTriplet>> {
    let content = read_utf8(path)?;
    Ok(serde_json::from_str(&content)?)
}
