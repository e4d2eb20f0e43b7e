//! # Error Handling
//!
//! Centralized error type for `sf-toolbox`. Every failure the library can
//! report is a variant of [`Error`], built with `thiserror`.
//!
//! Variants fall into three groups:
//!
//! - **User-actionable configuration problems** (`ConfigMissing`,
//!   `ConfigEmpty`, `ConfigParse`, `Project`). These are detected before any
//!   org call or file write happens.
//! - **Org failures** (`ManifestEmpty`, `RetrievalFailed`, `OrgCommand`).
//!   These abort the run before any merge.
//! - **Local I/O and document problems** (`Document`, `Filesystem`, `Io`,
//!   `Json`).
//!
//! `CleanupFailed` is never returned from a run; it only renders the warning
//! shown when the scratch directory could not be removed.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for sf-toolbox operations
#[derive(Error, Debug)]
pub enum Error {
    /// The configuration document does not exist at the resolved path.
    #[error("Config file does not exist: {}{}", path.display(), hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ConfigMissing {
        path: PathBuf,
        /// Optional hint for how to create the configuration
        hint: Option<String>,
    },

    /// The configuration parsed but activates no category at all.
    #[error("Config file contains no {subject} to retrieve\n  hint: edit the config file and enable at least one category")]
    ConfigEmpty { subject: String },

    /// The configuration document is not valid JSON for the expected shape.
    #[error("Configuration parsing error in {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// No manifest group resolved to a retrievable member.
    #[error("Nothing to retrieve for {operation}: no configured item exists in the org")]
    ManifestEmpty { operation: String },

    /// The org reported a terminal error for the retrieve request.
    #[error("Retrieval failed: {message}")]
    RetrievalFailed { message: String },

    /// A Salesforce CLI invocation failed or returned unreadable output.
    #[error("Salesforce CLI command failed: {command} - {message}")]
    OrgCommand { command: String, message: String },

    /// The scratch directory could not be removed after a successful update.
    #[error("An error occurred while cleaning the working directory. Please delete this folder if you don't need it: {}", path.display())]
    CleanupFailed { path: PathBuf },

    /// A metadata document could not be parsed or has an unexpected root.
    #[error("Document error in {}: {message}", path.display())]
    Document { path: PathBuf, message: String },

    /// The Salesforce project layout is unusable.
    #[error("Project error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    Project {
        message: String,
        /// Optional hint for how to fix the project layout
        hint: Option<String>,
    },

    /// A filesystem operation failed after its retry.
    #[error("Filesystem operation error: {message}")]
    Filesystem { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for sf-toolbox operations
pub type Result<T> = std::result::Result<T, Error>;
