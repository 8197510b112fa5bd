//! Error types for drawmap-core
//!
//! Parsing, classification, layout and diagram assembly are total over their inputs.
//! The only failure surfaces are malformed XML, serialisation of the host inventory,
//! bad command-line configuration and the "nothing parsed" condition.

/// Result type alias for drawmap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for drawmap operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input looked like an XML report but could not be parsed
    #[error("Malformed XML input: {0}")]
    Xml(#[from] roxmltree::Error),

    /// JSON serialisation error
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command-line configuration
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No grammar produced a single host
    #[error("No hosts parsed from input. Check that the file contains Nmap output.")]
    NoHosts,
}
