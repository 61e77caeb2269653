//! Unified service container for kgsplit
//!
//! Provides shared access to all core services.

use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::loader::DocumentLoader;
use crate::core::pipeline::ChunkingPipeline;
use crate::core::saver::KgSaver;
use crate::core::splitter::TextSplitter;
use crate::core::validate::TripletValidator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Unified services container
///
/// All commands use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Splitter built from the `[splitter]` section
    pub splitter: Arc<TextSplitter>,

    /// Loader for the configured input and processed directories
    pub loader: Arc<DocumentLoader>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration
    pub fn new(config: Config) -> Self {
        let splitter = Arc::new(TextSplitter::new(config.splitter_settings()));
        let loader = Arc::new(DocumentLoader::new(
            config.paths.input_dir.clone(),
            config.paths.processed_dir.clone(),
        ));

        Self {
            splitter,
            loader,
            config: Arc::new(config),
        }
    }

    /// Create a ChunkingPipeline sharing this container's splitter
    pub fn create_pipeline(&self) -> ChunkingPipeline {
        ChunkingPipeline::new((*self.loader).clone(), (*self.splitter).clone())
    }

    /// Create a saver for `output_dir`, or the configured output directory
    pub fn create_saver(&self, output_dir: Option<&Path>) -> Result<KgSaver> {
        let dir = output_dir.unwrap_or(&self.config.paths.output_dir);
        KgSaver::new(dir)
    }

    /// Output directory of one document (`<output_dir>/<document>`)
    pub fn document_output_dir(&self, document: &str) -> PathBuf {
        self.config.paths.output_dir.join(document)
    }

    /// Create a validator over the configured directories
    ///
    /// `limit` overrides the configured per-document limit.
    pub fn create_validator(&self, limit: Option<usize>) -> TripletValidator {
        TripletValidator::new(
            self.config.paths.output_dir.clone(),
            self.config.paths.processed_dir.clone(),
            limit.unwrap_or(self.config.validation.limit),
        )
    }
}
