//! Writing entries out as image + tag file pairs

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::archive::{ArchiveKind, ArchiveWriter};
use super::manifest::{MANIFEST_NAME, Manifest};
use super::{TransferError, TransferFailure, export_hash, image_extension};
use crate::{ImageEntry, tags};

/// Provides the bytes of an entry's image
pub trait ImageSource {
    /// # Errors
    ///
    /// Returns an `io::Error` if the image cannot be read.
    fn read(&self, source_ref: &str) -> io::Result<Vec<u8>>;
}

impl<F> ImageSource for F
where
    F: Fn(&str) -> io::Result<Vec<u8>>,
{
    fn read(&self, source_ref: &str) -> io::Result<Vec<u8>> {
        self(source_ref)
    }
}

/// Reads source references as local paths (`file://` URLs included)
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFiles;

impl ImageSource for LocalFiles {
    fn read(&self, source_ref: &str) -> io::Result<Vec<u8>> {
        let path = source_ref.strip_prefix("file://").unwrap_or(source_ref);
        if path.contains("://") {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "remote sources cannot be read locally",
            ));
        }
        fs::read(path)
    }
}

/// Where an export goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportTarget {
    Archive(PathBuf, ArchiveKind),
    Directory(PathBuf),
}

impl ExportTarget {
    /// An archive if the name ends in a tarball extension, else a directory
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match ArchiveKind::from_path(&path) {
            Some(kind) => Self::Archive(path, kind),
            None => Self::Directory(path),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Archive(path, _) | Self::Directory(path) => path,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExportReport {
    /// Number of pairs written
    pub exported: usize,
    pub failures: Vec<TransferFailure>,
}

enum Output {
    Archive(ArchiveWriter),
    Directory(PathBuf),
}

impl Output {
    fn open(target: &ExportTarget) -> io::Result<Self> {
        match target {
            ExportTarget::Archive(path, kind) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent)?;
                }
                Ok(Self::Archive(ArchiveWriter::create(path, *kind)?))
            }
            ExportTarget::Directory(path) => {
                fs::create_dir_all(path)?;
                Ok(Self::Directory(path.clone()))
            }
        }
    }

    fn write(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        match self {
            Self::Archive(writer) => writer.append(name, data),
            Self::Directory(dir) => fs::write(dir.join(name), data),
        }
    }

    fn finish(self) -> io::Result<()> {
        match self {
            Self::Archive(writer) => writer.finish(),
            Self::Directory(_) => Ok(()),
        }
    }
}

/// Export file stems for `entries`, in order, with `-<n>` suffixes on collision
fn plan_stems(entries: &[&ImageEntry]) -> Vec<String> {
    let mut used = HashSet::new();
    entries
        .iter()
        .map(|entry| {
            let base = export_hash(&entry.source_ref);
            let mut stem = base.clone();
            let mut n = 1;
            while !used.insert(stem.clone()) {
                stem = format!("{base}-{n}");
                n += 1;
            }
            stem
        })
        .collect()
}

/// Image bytes from the entry's source, falling back to its local copy
fn read_image<S: ImageSource + ?Sized>(source: &S, entry: &ImageEntry) -> io::Result<Vec<u8>> {
    match (source.read(&entry.source_ref), &entry.local_path) {
        (Err(e), Some(local)) => {
            debug!("reading local copy of {}: {e}", entry.source_ref);
            source.read(local)
        }
        (result, _) => result,
    }
}

/// Write every entry as an image + `.txt` pair, plus a manifest
///
/// Entries whose image cannot be read or written are skipped and listed in
/// the report; the rest of the batch is still exported.
///
/// # Errors
///
/// Returns `TransferError` only when the target itself cannot be created,
/// the manifest cannot be written, or the archive cannot be finalized.
pub fn export<'a, I, S>(entries: I, source: &S, target: &ExportTarget) -> Result<ExportReport, TransferError>
where
    I: IntoIterator<Item = &'a ImageEntry>,
    S: ImageSource + ?Sized,
{
    let entries: Vec<&ImageEntry> = entries.into_iter().collect();
    let stems = plan_stems(&entries);
    let mut output = Output::open(target)?;
    let mut manifest = Manifest::new();
    let mut report = ExportReport::default();

    for (entry, stem) in entries.iter().zip(&stems) {
        let image_name = format!("{stem}.{}", image_extension(&entry.source_ref));
        let text_name = format!("{stem}.txt");

        let written = read_image(source, entry).and_then(|data| {
            output.write(&image_name, &data)?;
            output.write(&text_name, tags::join_list(&entry.tags).as_bytes())
        });
        match written {
            Ok(()) => {
                manifest.insert(image_name, entry);
                report.exported += 1;
            }
            Err(e) => {
                warn!("skipping {}: {e}", entry.source_ref);
                report.failures.push(TransferFailure::new(entry.source_ref.clone(), e));
            }
        }
    }

    output.write(MANIFEST_NAME, &manifest.to_json()?)?;
    output.finish()?;
    info!(
        "exported {} pairs to {} ({} failed)",
        report.exported,
        target.path().display(),
        report.failures.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::entry;

    #[test]
    fn test_plan_stems_suffixes_collisions() {
        let a = entry("ab", &[]);
        let b = entry("ba", &[]);
        let c = entry("x", &[]);
        let d = entry("ab ", &[]);
        assert_ne!(export_hash("ab "), export_hash("ab"));

        let stems = plan_stems(&[&a, &b, &c, &d]);
        assert_eq!(stems, vec!["c3", "c3-1", "78", "e3"]);
    }

    #[test]
    fn test_read_falls_back_to_local_copy() {
        let source = |path: &str| -> io::Result<Vec<u8>> {
            match path {
                "/media/1.png" => Ok(b"local".to_vec()),
                _ => Err(io::Error::from(io::ErrorKind::NotFound)),
            }
        };
        let copied = entry("https://img.example/1.png", &[]).with_local_path("/media/1.png");
        assert_eq!(read_image(&source, &copied).unwrap(), b"local");
        assert!(read_image(&source, &entry("https://img.example/2.png", &[])).is_err());
    }

    #[test]
    fn test_target_from_path() {
        assert!(matches!(ExportTarget::from_path("out.tar.gz"), ExportTarget::Archive(_, ArchiveKind::TarGz)));
        assert!(matches!(ExportTarget::from_path("out.zip"), ExportTarget::Archive(_, ArchiveKind::Zip)));
        assert!(matches!(ExportTarget::from_path("out"), ExportTarget::Directory(_)));
    }

    #[test]
    fn test_local_files_rejects_remote() {
        let err = LocalFiles.read("https://example.com/a.png").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Unsupported);
    }
}
