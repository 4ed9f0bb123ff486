//! Error handling for the apidoc2mcp conversion library.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use apidoc2mcp_core::error::{Error, Result};
//!
//! fn might_fail() -> Result<()> {
//!     // Operations that might fail...
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Result type for apidoc2mcp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for apidoc2mcp operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP error while fetching a remote document
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Document parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Format conversion error
    #[error("Conversion error: {0}")]
    Convert(String),

    /// Service generation error
    #[error("Generation error: {0}")]
    Generate(String),

    /// Template engine error
    #[error("Template engine error: {0}")]
    Tera(#[from] tera::Error),
}

impl Error {
    /// Create a new parse error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new conversion error
    pub fn convert<S: Into<String>>(msg: S) -> Self {
        Self::Convert(msg.into())
    }

    /// Create a new generation error
    pub fn generate<S: Into<String>>(msg: S) -> Self {
        Self::Generate(msg.into())
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Self::Parse(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Self::Parse(s)
    }
}
