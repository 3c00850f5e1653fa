//! Configuration module for pagesift
//!
//! This module handles loading, parsing, and validating JSON configuration
//! documents.
//!
//! # Example
//!
//! ```no_run
//! use pagesift::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.json")).unwrap();
//! println!("Crawling {} targets", config.target_urls.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AttrValue, Config, CsvSinkConfig, DataParsing, NavigatorSettings, RawAttribute, RawElement,
    SavingConfig, SqliteSinkConfig, TargetOptions, TargetUrl,
};

// Re-export parser functions
pub use parser::load_config;
pub use validation::validate;
