//! kgsplit - Document chunking for knowledge-graph extraction
//!
//! Splits long documents into overlapping, size-bounded chunks that
//! fit a language model's context window, and handles the triplets
//! extracted from them.
//!
//! # Architecture
//!
//! The codebase is organized into two main modules:
//!
//! - **core**: Domain logic
//!   - config, error, types
//!   - splitter (token estimate, segmentation, windowing)
//!   - loader, pipeline (document discovery, parallel chunking)
//!   - extract, saver, validate (triplet handling)
//!   - services (unified service container)
//!
//! - **cli**: Command-line adapter (depends on core)
//!
//! # Key Features
//!
//! - Char-based offsets into the source (never splits a code point)
//! - Sentence and paragraph strategies with recursive fallback
//! - Overlap carried between consecutive chunks
//! - Whitespace-insensitive evidence validation

// Core domain logic
pub mod core;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{KgError, Result};
pub use core::services::Services;
pub use core::splitter::{SplitterSettings, Strategy, TextSplitter};
pub use core::types::*;
