//! Error types for bridge setup.

use thiserror::Error;

/// Errors surfaced by `FileOperations::setup`.
///
/// Absent plugins and unsupported operation/source combinations are not
/// errors; they are skipped silently. Only configuration extraction failures
/// abort setup. A failing source is contained and reported per source.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Failed to resolve configuration: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Source '{name}' failed to integrate: {reason}")]
    SourceFailed { name: String, reason: String },
}
