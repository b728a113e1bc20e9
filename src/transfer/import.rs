//! Reading image + tag file pairs into the entry store

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::archive::{ArchiveMember, archive_stem, read_archive};
use super::manifest::Manifest;
use super::{FileKind, TransferError, TransferFailure};
use crate::store::{EntryStore, StoreError};
use crate::tags::{self, LIST_SEPARATOR};
use crate::{EntryId, ImageEntry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Images found inside archives are extracted under `media_dir/<archive stem>/`
    pub media_dir: PathBuf,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    /// Ids of the entries added, in discovery order
    pub imported: Vec<EntryId>,
    /// Source references skipped because a live entry already has them
    pub duplicates: Vec<String>,
    pub failures: Vec<TransferFailure>,
}

enum Origin {
    Loose(PathBuf),
    Archived { archive: String, data: Vec<u8> },
}

struct FoundImage {
    name: String,
    origin: Origin,
}

/// Everything discovered in the inputs, before pairing
#[derive(Default)]
struct Pools {
    loose: Vec<FoundImage>,
    archived: Vec<FoundImage>,
    /// Tag file contents keyed by file stem; later files replace earlier ones
    texts: HashMap<String, String>,
    manifest: Manifest,
    failures: Vec<TransferFailure>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn stem(name: &str) -> String {
    Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl Pools {
    fn gather(paths: &[PathBuf]) -> Self {
        let mut pools = Self::default();
        for path in paths {
            if path.is_dir() {
                for entry in WalkDir::new(path).sort_by_file_name() {
                    match entry {
                        Ok(e) if e.file_type().is_file() => pools.add_file(e.path()),
                        Ok(_) => {}
                        Err(e) => pools.fail(path.display().to_string(), e),
                    }
                }
            } else if path.is_file() {
                if FileKind::of(&file_name(path)) == FileKind::Other {
                    pools.fail(path.display().to_string(), "unsupported file type");
                } else {
                    pools.add_file(path);
                }
            } else {
                pools.fail(path.display().to_string(), "no such file or directory");
            }
        }
        pools
    }

    fn fail(&mut self, name: String, error: impl std::fmt::Display) {
        warn!("import: {name}: {error}");
        self.failures.push(TransferFailure::new(name, error));
    }

    fn add_file(&mut self, path: &Path) {
        let name = file_name(path);
        match FileKind::of(&name) {
            FileKind::Image => self.loose.push(FoundImage {
                name,
                origin: Origin::Loose(path.to_path_buf()),
            }),
            FileKind::Tags => match fs::read_to_string(path) {
                Ok(text) => {
                    self.texts.insert(stem(&name), text);
                }
                Err(e) => self.fail(path.display().to_string(), e),
            },
            FileKind::Manifest => match fs::read(path).map(|bytes| Manifest::from_json(&bytes)) {
                Ok(Ok(manifest)) => self.manifest.merge(manifest),
                Ok(Err(e)) => self.fail(path.display().to_string(), e),
                Err(e) => self.fail(path.display().to_string(), e),
            },
            FileKind::Archive => match read_archive(path) {
                Ok(members) => {
                    let archive = archive_stem(&name).to_string();
                    debug!("expanding {} ({} files)", path.display(), members.len());
                    for member in members {
                        self.add_member(&archive, member);
                    }
                }
                Err(e) => self.fail(path.display().to_string(), e),
            },
            FileKind::Other => debug!("ignoring {}", path.display()),
        }
    }

    fn add_member(&mut self, archive: &str, member: ArchiveMember) {
        let ArchiveMember { name, data } = member;
        match FileKind::of(&name) {
            FileKind::Image => self.archived.push(FoundImage {
                name,
                origin: Origin::Archived {
                    archive: archive.to_string(),
                    data,
                },
            }),
            FileKind::Tags => match String::from_utf8(data) {
                Ok(text) => {
                    self.texts.insert(stem(&name), text);
                }
                Err(e) => self.fail(format!("{archive}/{name}"), e),
            },
            FileKind::Manifest => match Manifest::from_json(&data) {
                Ok(manifest) => self.manifest.merge(manifest),
                Err(e) => self.fail(format!("{archive}/{name}"), e),
            },
            FileKind::Archive | FileKind::Other => debug!("ignoring {archive}/{name}"),
        }
    }

    /// Pair every image with its tags, loose images first
    fn into_entries(mut self, options: &ImportOptions) -> (Vec<ImageEntry>, Vec<TransferFailure>) {
        let images: Vec<FoundImage> = std::mem::take(&mut self.loose)
            .into_iter()
            .chain(std::mem::take(&mut self.archived))
            .collect();

        let mut entries = Vec::with_capacity(images.len());
        for image in images {
            let Some(located) = self.locate(&image, options) else {
                continue;
            };
            let tag_list = self
                .texts
                .get(&stem(&image.name))
                .map(|text| tags::split_list_on(text, LIST_SEPARATOR))
                .unwrap_or_default();
            let entry = match self.manifest.get(&image.name) {
                Some(known) => ImageEntry::new(known.source_ref.clone(), known.page_url.clone(), tag_list)
                    .with_local_path(located),
                None => ImageEntry::new(located, None, tag_list),
            };
            entries.push(entry);
        }
        (entries, self.failures)
    }

    /// Local path of an image, extracting it first when it came from an archive
    fn locate(&mut self, image: &FoundImage, options: &ImportOptions) -> Option<String> {
        match &image.origin {
            Origin::Loose(path) => {
                let path = fs::canonicalize(path).unwrap_or_else(|_| path.clone());
                Some(path.display().to_string())
            }
            Origin::Archived { archive, data } => {
                let dir = options.media_dir.join(archive);
                let dest = dir.join(&image.name);
                match fs::create_dir_all(&dir).and_then(|()| fs::write(&dest, data)) {
                    Ok(()) => Some(dest.display().to_string()),
                    Err(e) => {
                        self.fail(format!("{archive}/{}", image.name), e);
                        None
                    }
                }
            }
        }
    }
}

/// Read image/tag pairs from `paths` into entries without touching any store
///
/// Images from archives are extracted under `options.media_dir`.
#[must_use]
pub fn read_pairs(paths: &[PathBuf], options: &ImportOptions) -> (Vec<ImageEntry>, Vec<TransferFailure>) {
    Pools::gather(paths).into_entries(options)
}

/// Import every image found in `paths` into `store`
///
/// Images without a tag file get an empty tag list. Images whose source
/// reference is already live are skipped and listed as duplicates. Unreadable
/// files are listed as failures while the rest of the batch continues.
///
/// # Errors
///
/// Returns `TransferError::NoInput` if `paths` is empty.
pub fn import_into(store: &mut EntryStore, paths: &[PathBuf], options: &ImportOptions) -> Result<ImportReport, TransferError> {
    if paths.is_empty() {
        return Err(TransferError::NoInput);
    }
    let (entries, failures) = read_pairs(paths, options);
    let mut report = ImportReport {
        failures,
        ..ImportReport::default()
    };

    for entry in entries {
        match store.add(entry) {
            Ok(id) => report.imported.push(id),
            Err(StoreError::Duplicate(source_ref)) => {
                warn!("skipping duplicate {source_ref}");
                report.duplicates.push(source_ref);
            }
            Err(e) => report.failures.push(TransferFailure::new("store", e)),
        }
    }
    info!(
        "imported {} entries ({} duplicates, {} failures)",
        report.imported.len(),
        report.duplicates.len(),
        report.failures.len()
    );
    Ok(report)
}
