//! Configuration module for pricewalk
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use pricewalk::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Output will be written to: {}", config.output.csv_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, SiteConfig, UserAgentConfig, VariantConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
