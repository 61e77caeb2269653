//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod completions;
pub mod config;
pub mod estimate;
pub mod save;
pub mod split;
pub mod validate;

// Re-export argument types for use in mod.rs
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use estimate::EstimateArgs;
pub use save::SaveArgs;
pub use split::SplitArgs;
pub use validate::ValidateArgs;
