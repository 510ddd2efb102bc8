//! Configuration management for scopecheck
//!
//! Configuration priority (highest to lowest):
//! 1. Command line arguments
//! 2. --config specified file
//! 3. ~/.scopecheck/config.toml
//! 4. ./scopecheck.toml

pub mod args;
pub mod merged;
pub mod settings;

pub use args::{Args, ParsedArgs};
pub use merged::MergedConfig;
pub use settings::{Config, LogLevel};
