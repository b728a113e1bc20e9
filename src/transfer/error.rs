use thiserror::Error;

/// Errors that abort a whole import or export
///
/// Per-file problems never surface here; they are collected as
/// [`TransferFailure`](super::TransferFailure) records in the report.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The export target could not be created or finalized
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest could not be serialized
    #[error("Manifest error: {0}")]
    Manifest(#[from] serde_json::Error),

    /// Nothing to import
    #[error("No input files given")]
    NoInput,
}
