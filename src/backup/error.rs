use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackupError {
    /// No backup with this label
    #[error("Backup not found: {0}")]
    NotFound(String),
}
