//! Configuration module for Unlinked
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use unlinked::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("unlinked.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CheckMode, Config, DEFAULT_USER_AGENT};

// Re-export parser functions
pub use parser::{apply_overrides, discover_config_path, load_config, load_effective_config};
pub use validation::validate;
