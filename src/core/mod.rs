//! Core domain logic
//!
//! This module contains all chunking and triplet handling logic,
//! independent of the command-line adapter.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **splitter**: Token estimation, segmentation and chunk assembly
//! - **loader**: Text document discovery and reading
//! - **pipeline**: Parallel chunking of many documents
//! - **extract**: Prompting and response parsing for triplet extraction
//! - **saver**: Raw JSON and CSV triplet persistence
//! - **validate**: Evidence lookup against source text
//! - **services**: Unified service container

pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod pipeline;
pub mod saver;
pub mod services;
pub mod splitter;
pub mod types;
pub mod validate;

// Re-export key types for convenience
pub use config::Config;
pub use error::{KgError, Result};
pub use services::Services;
pub use splitter::{SplitterSettings, Strategy, TextSplitter};
