//! Core data types for kgsplit.
//!
//! This module defines the value records passed between the
//! chunking engine and its collaborators: chunks, raw and
//! persisted triplets, and validation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A single bounded segment of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Sequential label within the document (`chunk_001`, ...)
    pub id: String,

    /// Units rejoined with their separator
    pub text: String,

    /// Estimated token count of `text`
    pub size_estimate: usize,

    /// Char offset of the first unit in the source document
    pub start_char: usize,

    /// Char offset one past the last unit in the source document
    pub end_char: usize,
}

impl Chunk {
    /// Format the 1-based sequence number as a chunk id
    pub fn format_id(seq: usize) -> String {
        format!("chunk_{seq:03}")
    }

    /// Number of source characters spanned by this chunk
    pub fn span_len(&self) -> usize {
        self.end_char - self.start_char
    }
}

/// Chunks produced for one source document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunks {
    /// Path of the source document
    pub source: PathBuf,

    /// Length of the source in characters
    pub total_chars: usize,

    /// Chunks in document order
    pub chunks: Vec<Chunk>,
}

/// Statistics from a chunking run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkStats {
    pub documents_chunked: usize,
    pub documents_skipped: usize,
    pub chunks_created: usize,
    pub duration_ms: u64,
}

/// A triplet candidate as returned by the language model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTriplet {
    #[serde(default)]
    pub subject: String,

    #[serde(default)]
    pub subject_type: String,

    #[serde(default)]
    pub relation_type: String,

    #[serde(default)]
    pub object: String,

    #[serde(default)]
    pub object_type: String,

    #[serde(default)]
    pub evidence: String,
}

impl RawTriplet {
    /// A triplet is usable only with a subject, relation and object
    pub fn is_complete(&self) -> bool {
        !self.subject.trim().is_empty()
            && !self.relation_type.trim().is_empty()
            && !self.object.trim().is_empty()
    }
}

/// A persisted triplet row (`triplets.csv`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripletRecord {
    pub id: String,
    pub head: String,
    pub head_type: String,
    pub relation: String,
    pub tail: String,
    pub tail_type: String,
    pub evidence: String,
}

/// Outcome of checking one triplet against its source document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Evidence text occurs in the document
    EvidenceFound,
    /// Evidence missing, but subject and object both occur
    BothEntitiesFound,
    /// Evidence missing, but subject or object occurs
    OneEntityFound,
    /// The triplet carries no evidence
    EmptyEvidence,
    /// Neither evidence nor entities occur
    NotFound,
}

impl Verdict {
    pub fn is_valid(self) -> bool {
        matches!(
            self,
            Verdict::EvidenceFound | Verdict::BothEntitiesFound | Verdict::OneEntityFound
        )
    }

    /// Short human-readable reason
    pub fn reason(self) -> &'static str {
        match self {
            Verdict::EvidenceFound => "evidence found in source text",
            Verdict::BothEntitiesFound => "subject and object found in source text",
            Verdict::OneEntityFound => "subject or object found in source text",
            Verdict::EmptyEvidence => "evidence is empty",
            Verdict::NotFound => "evidence and entities not found in source text",
        }
    }
}

/// Per-triplet validation detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationDetail {
    /// 1-based position within the document's triplet list
    pub index: usize,
    pub document: String,
    pub verdict: Verdict,
    pub subject: String,
    pub relation: String,
    pub object: String,
    /// Evidence truncated to 100 characters
    pub evidence: String,
}

/// Aggregated validation results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub details: Vec<ValidationDetail>,
    pub generated_at: DateTime<Utc>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            total: 0,
            valid: 0,
            invalid: 0,
            details: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    /// Record one validated triplet
    pub fn record(&mut self, detail: ValidationDetail) {
        self.total += 1;
        if detail.verdict.is_valid() {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
        self.details.push(detail);
    }

    /// Share of valid triplets in percent (0 when nothing was checked)
    pub fn accuracy(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.valid as f64 / self.total as f64 * 100.0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationDetail> {
        self.details.iter().filter(|d| !d.verdict.is_valid())
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}
