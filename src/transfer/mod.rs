//! Import and export of image + sidecar tag file pairs
//!
//! An exported dataset is a flat set of `<name>.<ext>` images, each paired with
//! a `<name>.txt` holding its tags joined by `", "`, plus a `manifest.json`
//! recording where every image came from. The set is written to a directory
//! or bundled into a zip or tarball.
//!
//! Import accepts loose files, directories and archives in any mix and pairs
//! images with their tag files by file stem.

use std::fmt;
use std::path::Path;

pub mod archive;
pub mod error;
pub mod export;
pub mod import;
pub mod manifest;

pub use error::TransferError;
pub use export::{ExportReport, ExportTarget, ImageSource, LocalFiles, export};
pub use import::{ImportOptions, ImportReport, import_into};

/// Recognized image extensions, lowercase
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Extension given to exported images whose source has none we recognize
pub const DEFAULT_EXTENSION: &str = "png";

/// What a file is, judged by its name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Image,
    Tags,
    Archive,
    Manifest,
    Other,
}

impl FileKind {
    /// Classify a file name, ignoring case
    #[must_use]
    pub fn of(name: &str) -> Self {
        let lower = name.to_lowercase();
        if lower == manifest::MANIFEST_NAME {
            return Self::Manifest;
        }
        if archive::ArchiveKind::from_name(&lower).is_some() {
            return Self::Archive;
        }
        match Path::new(&lower).extension().and_then(|e| e.to_str()) {
            Some("txt") => Self::Tags,
            Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => Self::Image,
            _ => Self::Other,
        }
    }
}

/// Stable export name for a source reference
///
/// The sum of the UTF-16 code units of `source_ref`, in lowercase hex. The
/// sum ignores character order, so anagrams collide; [`export`] suffixes
/// colliding names.
///
/// # Examples
/// ```
/// use curatr::transfer::export_hash;
/// assert_eq!(export_hash("ab"), "c3");
/// assert_eq!(export_hash("ba"), export_hash("ab"));
/// ```
#[must_use]
pub fn export_hash(source_ref: &str) -> String {
    let sum: u64 = source_ref.encode_utf16().map(u64::from).sum();
    format!("{sum:x}")
}

/// Image extension of a source reference, or [`DEFAULT_EXTENSION`]
///
/// Query strings and fragments of URL references are ignored.
#[must_use]
pub fn image_extension(source_ref: &str) -> String {
    let path = source_ref.split(['?', '#']).next().unwrap_or_default();
    let name = path.rsplit(['/', '\\']).next().unwrap_or_default();
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .filter(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

/// One file that could not be read or written; the rest of the batch went on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferFailure {
    /// File name or source reference involved
    pub name: String,
    pub error: String,
}

impl TransferFailure {
    pub fn new(name: impl Into<String>, error: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            error: error.to_string(),
        }
    }
}

impl fmt::Display for TransferFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.error)
    }
}
