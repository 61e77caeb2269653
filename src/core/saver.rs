//! Triplet persistence.
//!
//! Raw extraction output is kept as pretty-printed JSON next to the
//! final `triplets.csv`, which renames the triplet fields into the
//! head/relation/tail shape expected by graph import tools.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::Span;
use uuid::Uuid;

use crate::core::error::{KgError, Result};
use crate::core::types::{RawTriplet, TripletRecord};

/// File name of the raw extraction output
pub const RAW_TRIPLETS_FILE: &str = "raw_triplets.json";

/// File name of the persisted triplet table
pub const TRIPLETS_CSV_FILE: &str = "triplets.csv";

const CSV_HEADER: [&str; 7] = [
    "id",
    "head",
    "head_type",
    "relation",
    "tail",
    "tail_type",
    "evidence",
];

/// Writes triplets under one output directory
#[derive(Debug, Clone)]
pub struct KgSaver {
    output_dir: PathBuf,
    span: Span,
}

impl KgSaver {
    /// Create a saver, creating `output_dir` if needed
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir).map_err(|e| {
            KgError::StorageError(format!("Cannot create {}: {e}", output_dir.display()))
        })?;

        Ok(Self {
            output_dir,
            span: tracing::info_span!("kg_saver"),
        })
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn raw_path(&self) -> PathBuf {
        self.output_dir.join(RAW_TRIPLETS_FILE)
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output_dir.join(TRIPLETS_CSV_FILE)
    }

    /// Save raw triplets as pretty JSON (non-ASCII kept as is)
    pub fn save_raw(&self, triplets: &[RawTriplet]) -> Result<PathBuf> {
        let path = self.raw_path();
        let json = serde_json::to_string_pretty(triplets)?;
        fs::write(&path, json)?;

        self.span.in_scope(|| {
            tracing::info!("Saved {} raw triplets to {:?}", triplets.len(), path)
        });
        Ok(path)
    }

    /// Load raw triplets; a missing or malformed file yields none
    pub fn load_raw(&self) -> Vec<RawTriplet> {
        let _enter = self.span.enter();
        let path = self.raw_path();

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Cannot read {:?}: {}", path, e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(triplets) => triplets,
            Err(e) => {
                tracing::warn!("Malformed raw triplets in {:?}: {}", path, e);
                Vec::new()
            }
        }
    }

    /// Write `triplets.csv` and return the number of rows.
    ///
    /// Nothing is written when `triplets` is empty.
    pub fn save_triplets(&self, triplets: &[RawTriplet]) -> Result<usize> {
        let _enter = self.span.enter();

        if triplets.is_empty() {
            tracing::warn!("No triplets to save");
            return Ok(0);
        }

        let records = to_records(triplets);
        let mut out = csv_line(CSV_HEADER);
        for record in &records {
            out.push_str(&csv_line([
                record.id.as_str(),
                record.head.as_str(),
                record.head_type.as_str(),
                record.relation.as_str(),
                record.tail.as_str(),
                record.tail_type.as_str(),
                record.evidence.as_str(),
            ]));
        }

        let path = self.csv_path();
        fs::write(&path, out)?;
        tracing::info!("Saved {} triplets to {:?}", records.len(), path);
        Ok(records.len())
    }
}

/// Convert raw triplets into persisted records with fresh ids
pub fn to_records(triplets: &[RawTriplet]) -> Vec<TripletRecord> {
    triplets
        .iter()
        .map(|t| TripletRecord {
            id: short_id(),
            head: t.subject.trim().to_string(),
            head_type: t.subject_type.trim().to_string(),
            relation: t.relation_type.trim().to_string(),
            tail: t.object.trim().to_string(),
            tail_type: t.object_type.trim().to_string(),
            evidence: t.evidence.trim().to_string(),
        })
        .collect()
}

fn short_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

fn csv_line<const N: usize>(fields: [&str; N]) -> String {
    let mut line = fields.map(csv_escape).join(",");
    line.push('\n');
    line
}

/// Quote a CSV field when it holds a delimiter, quote or line break
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
