//! Configuration management for kgsplit.
//!
//! This module handles loading configuration from TOML files and
//! environment variables, with sensible defaults for all settings.

use crate::core::error::{KgError, Result};
use crate::core::splitter::{SplitterSettings, Strategy, CHARS_PER_TOKEN};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub splitter: SplitterConfig,
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

/// Chunking configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SplitterConfig {
    /// Maximum estimated tokens per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap between consecutive chunks, in estimated tokens
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,

    /// Documents at or below this many characters are never split
    #[serde(default = "default_min_chunk_size")]
    pub min_chunk_size: usize,

    /// Segmentation strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Separator placed between (and after) rejoined sentences
    #[serde(default = "default_sentence_terminator")]
    pub sentence_terminator: String,
}

/// Directory layout
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Raw source documents
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,

    /// Plain-text renditions of the source documents
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,

    /// Extracted triplets and reports
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

/// Triplet extraction configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExtractionConfig {
    /// Model identifier passed to the extractor
    #[serde(default = "default_model")]
    pub model: String,

    /// Prompt template, `{text}` is replaced by the chunk text
    #[serde(default = "default_prompt_template")]
    pub prompt_template: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Number of chunks sent to the extractor at once
    #[serde(default = "default_max_concurrent_chunks")]
    pub max_concurrent_chunks: usize,
}

/// Evidence validation configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Maximum triplets validated per document
    #[serde(default = "default_validation_limit")]
    pub limit: usize,
}

// Default value functions
fn default_chunk_size() -> usize {
    4096
}

fn default_chunk_overlap() -> usize {
    200
}

fn default_min_chunk_size() -> usize {
    100
}

fn default_sentence_terminator() -> String {
    "。".to_string()
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("./data/input")
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from("./data/processed")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./data/output")
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_prompt_template() -> String {
    "Extract knowledge triplets from the text below. Respond with a JSON object \
     {\"triplets\": [{\"subject\", \"subject_type\", \"relation_type\", \"object\", \
     \"object_type\", \"evidence\"}]}. The evidence must be copied verbatim from the text.\n\n\
     Text:\n{text}"
        .to_string()
}

fn default_temperature() -> f32 {
    0.1
}

fn default_max_concurrent_chunks() -> usize {
    1
}

fn default_validation_limit() -> usize {
    200
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
            min_chunk_size: default_min_chunk_size(),
            strategy: Strategy::default(),
            sentence_terminator: default_sentence_terminator(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            processed_dir: default_processed_dir(),
            output_dir: default_output_dir(),
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            prompt_template: default_prompt_template(),
            temperature: default_temperature(),
            max_concurrent_chunks: default_max_concurrent_chunks(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            limit: default_validation_limit(),
        }
    }
}

impl From<&SplitterConfig> for SplitterSettings {
    fn from(config: &SplitterConfig) -> Self {
        SplitterSettings::from_token_budget(config.chunk_size, config.chunk_overlap)
            .with_min_chunk_size(config.min_chunk_size)
            .with_strategy(config.strategy)
            .with_sentence_terminator(config.sentence_terminator.clone())
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| KgError::ConfigError(format!("Failed to read config file: {e}")))?;

        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Default location of the user config file
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kgsplit").join("config.toml"))
    }

    /// Load config with priority: env vars > TOML > defaults
    ///
    /// File lookup order:
    /// 1. KGSPLIT_CONFIG env var
    /// 2. User config file (~/.config/kgsplit/config.toml)
    /// 3. ./kgsplit.toml
    /// 4. Defaults
    pub fn load() -> Result<Self> {
        let mut config = if let Ok(config_path) = env::var("KGSPLIT_CONFIG") {
            Self::from_file(config_path)?
        } else {
            match Self::user_config_file() {
                Some(path) if path.exists() => Self::from_file(path)?,
                _ if Path::new("kgsplit.toml").exists() => Self::from_file("kgsplit.toml")?,
                _ => Self::default(),
            }
        };

        config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Load an explicit config file, then apply env overrides
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let mut config = Self::from_file(path)?;
        config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Merge configuration with environment variables
    pub fn merge_env(&mut self) {
        // Splitter configuration
        if let Ok(chunk_size) = env::var("KGSPLIT_CHUNK_SIZE") {
            if let Ok(size) = chunk_size.parse() {
                self.splitter.chunk_size = size;
            }
        }
        if let Ok(overlap) = env::var("KGSPLIT_CHUNK_OVERLAP") {
            if let Ok(o) = overlap.parse() {
                self.splitter.chunk_overlap = o;
            }
        }
        if let Ok(min_size) = env::var("KGSPLIT_MIN_CHUNK_SIZE") {
            if let Ok(size) = min_size.parse() {
                self.splitter.min_chunk_size = size;
            }
        }
        if let Ok(strategy) = env::var("KGSPLIT_STRATEGY") {
            if let Ok(s) = strategy.parse() {
                self.splitter.strategy = s;
            }
        }

        // Paths
        if let Ok(dir) = env::var("KGSPLIT_INPUT_DIR") {
            self.paths.input_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("KGSPLIT_PROCESSED_DIR") {
            self.paths.processed_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = env::var("KGSPLIT_OUTPUT_DIR") {
            self.paths.output_dir = PathBuf::from(dir);
        }

        // Extraction
        if let Ok(model) = env::var("KGSPLIT_MODEL") {
            self.extraction.model = model;
        }

        // Validation
        if let Ok(limit) = env::var("KGSPLIT_VALIDATION_LIMIT") {
            if let Ok(l) = limit.parse() {
                self.validation.limit = l;
            }
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.splitter.chunk_size == 0 {
            return Err(KgError::ConfigError(
                "Chunk size must be non-zero".to_string(),
            ));
        }

        if self.splitter.chunk_overlap >= self.splitter.chunk_size {
            return Err(KgError::ConfigError(
                "Chunk overlap must be less than chunk size".to_string(),
            ));
        }

        if (self.splitter.chunk_size as f64 / CHARS_PER_TOKEN) < 1.0 {
            return Err(KgError::ConfigError(format!(
                "Chunk size {} is too small to hold a single character",
                self.splitter.chunk_size
            )));
        }

        if !self.extraction.prompt_template.contains("{text}") {
            return Err(KgError::ConfigError(
                "Prompt template must contain a {text} placeholder".to_string(),
            ));
        }

        if self.extraction.max_concurrent_chunks == 0 {
            return Err(KgError::ConfigError(
                "Max concurrent chunks must be non-zero".to_string(),
            ));
        }

        if self.validation.limit == 0 {
            return Err(KgError::ConfigError(
                "Validation limit must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Settings consumed by the chunking engine
    pub fn splitter_settings(&self) -> SplitterSettings {
        SplitterSettings::from(&self.splitter)
    }

    /// Log the effective configuration
    pub fn log_config(&self) {
        let settings = self.splitter_settings();
        tracing::info!("Configuration loaded:");
        tracing::info!("  Chunk size: {} tokens", self.splitter.chunk_size);
        tracing::info!("  Chunk overlap: {} tokens", self.splitter.chunk_overlap);
        tracing::info!(
            "  Char budget: {} chars ({} overlap)",
            settings.max_chars(),
            settings.overlap_chars()
        );
        tracing::info!("  Min chunk size: {} chars", self.splitter.min_chunk_size);
        tracing::info!("  Strategy: {}", self.splitter.strategy);
        tracing::info!("  Input dir: {:?}", self.paths.input_dir);
        tracing::info!("  Processed dir: {:?}", self.paths.processed_dir);
        tracing::info!("  Output dir: {:?}", self.paths.output_dir);
        tracing::info!("  Model: {}", self.extraction.model);
        tracing::info!("  Validation limit: {}", self.validation.limit);
    }
}
