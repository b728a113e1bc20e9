//! Zip and tarball reading and writing
//!
//! Only regular files are read back; directory structure inside an archive is
//! flattened to file names since pairs live at the archive root.

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use tar::{Archive, Builder, EntryType, Header};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Recognized archive extensions
const EXTENSIONS: [(&str, ArchiveKind); 4] = [
    (".tar.gz", ArchiveKind::TarGz),
    (".tgz", ArchiveKind::TarGz),
    (".tar", ArchiveKind::Tar),
    (".zip", ArchiveKind::Zip),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    Zip,
    Tar,
    TarGz,
}

impl ArchiveKind {
    /// Archive kind of a file name (`.zip`, `.tar`, `.tar.gz` or `.tgz`), ignoring case
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        EXTENSIONS
            .iter()
            .find(|(ext, _)| split_extension(name, ext).is_some())
            .map(|(_, kind)| *kind)
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name().and_then(|n| n.to_str()).and_then(Self::from_name)
    }
}

/// Byte offset where `ext` starts in `name`, if `name` ends with it (ASCII case-insensitive)
fn split_extension(name: &str, ext: &str) -> Option<usize> {
    let split = name.len().checked_sub(ext.len())?;
    name.get(split..)
        .is_some_and(|tail| tail.eq_ignore_ascii_case(ext))
        .then_some(split)
}

/// File name of an archive without its archive extension
#[must_use]
pub fn archive_stem(name: &str) -> &str {
    EXTENSIONS
        .iter()
        .find_map(|(ext, _)| split_extension(name, ext))
        .and_then(|split| name.get(..split))
        .unwrap_or(name)
}

/// A regular file read out of an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveMember {
    pub name: String,
    pub data: Vec<u8>,
}

/// Read every regular file of the archive at `path`, in archive order
///
/// # Errors
///
/// Returns an `io::Error` if the file cannot be opened or the stream is
/// corrupt.
pub fn read_archive(path: &Path) -> io::Result<Vec<ArchiveMember>> {
    let kind = ArchiveKind::from_path(path).ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("not an archive: {}", path.display()))
    })?;
    let file = File::open(path)?;
    match kind {
        ArchiveKind::Zip => read_zip_members(file),
        ArchiveKind::Tar => read_members(file),
        ArchiveKind::TarGz => read_members(GzDecoder::new(file)),
    }
}

fn read_zip_members(file: File) -> io::Result<Vec<ArchiveMember>> {
    let mut archive = ZipArchive::new(file).map_err(io::Error::other)?;
    let mut members = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(io::Error::other)?;
        if entry.is_dir() {
            continue;
        }
        let Some(name) = Path::new(entry.name())
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
        else {
            continue;
        };
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        members.push(ArchiveMember { name, data });
    }
    Ok(members)
}

fn read_members<R: Read>(reader: R) -> io::Result<Vec<ArchiveMember>> {
    let mut archive = Archive::new(reader);
    let mut members = Vec::new();
    for entry in archive.entries()? {
        let mut entry = entry?;
        if entry.header().entry_type() != EntryType::Regular {
            continue;
        }
        let path = entry.path()?;
        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            continue;
        };
        let mut data = Vec::new();
        entry.read_to_end(&mut data)?;
        members.push(ArchiveMember { name, data });
    }
    Ok(members)
}

enum Sink {
    Zip(Box<ZipWriter<File>>),
    Plain(Builder<File>),
    Gzip(Builder<GzEncoder<File>>),
}

/// Streams files into a new archive
pub struct ArchiveWriter {
    sink: Sink,
    mtime: u64,
}

impl ArchiveWriter {
    /// Create the archive file, truncating any existing one
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the file cannot be created.
    pub fn create(path: &Path, kind: ArchiveKind) -> io::Result<Self> {
        let file = File::create(path)?;
        let sink = match kind {
            ArchiveKind::Zip => Sink::Zip(Box::new(ZipWriter::new(file))),
            ArchiveKind::Tar => Sink::Plain(Builder::new(file)),
            ArchiveKind::TarGz => Sink::Gzip(Builder::new(GzEncoder::new(file, Compression::default()))),
        };
        Ok(Self {
            sink,
            mtime: u64::try_from(chrono::Utc::now().timestamp()).unwrap_or(0),
        })
    }

    /// Append one file at the archive root
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if the write fails.
    pub fn append(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        let mut header = Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_mtime(self.mtime);
        header.set_cksum();
        match &mut self.sink {
            Sink::Zip(writer) => {
                let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
                writer.start_file(name, options).map_err(io::Error::other)?;
                writer.write_all(data)
            }
            Sink::Plain(builder) => builder.append_data(&mut header, name, data),
            Sink::Gzip(builder) => builder.append_data(&mut header, name, data),
        }
    }

    /// Write the archive trailer and flush everything to disk
    ///
    /// # Errors
    ///
    /// Returns an `io::Error` if finalizing fails.
    pub fn finish(self) -> io::Result<()> {
        let mut file = match self.sink {
            Sink::Zip(writer) => writer.finish().map_err(io::Error::other)?,
            Sink::Plain(builder) => builder.into_inner()?,
            Sink::Gzip(builder) => builder.into_inner()?.finish()?,
        };
        file.flush()?;
        file.sync_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(ArchiveKind::from_name("set.tar.gz"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::from_name("SET.TGZ"), Some(ArchiveKind::TarGz));
        assert_eq!(ArchiveKind::from_name("set.tar"), Some(ArchiveKind::Tar));
        assert_eq!(ArchiveKind::from_name("set.ZIP"), Some(ArchiveKind::Zip));
        assert_eq!(ArchiveKind::from_name("a.png"), None);
    }

    #[test]
    fn test_archive_stem() {
        assert_eq!(archive_stem("export.tar.gz"), "export");
        assert_eq!(archive_stem("Export.TGZ"), "Export");
        assert_eq!(archive_stem("plain.tar"), "plain");
        assert_eq!(archive_stem("dataset.zip"), "dataset");
        assert_eq!(archive_stem("other"), "other");
    }

    #[test]
    fn test_members_come_back_in_order() {
        let dir = TempDir::new().unwrap();
        for name in ["out.tar", "out.tar.gz", "out.zip"] {
            let path = dir.path().join(name);
            let kind = ArchiveKind::from_path(&path).unwrap();
            let mut writer = ArchiveWriter::create(&path, kind).unwrap();
            writer.append("b.png", b"\x89PNG").unwrap();
            writer.append("b.txt", b"x, y").unwrap();
            writer.append("a.txt", b"").unwrap();
            writer.finish().unwrap();

            let members = read_archive(&path).unwrap();
            let names: Vec<&str> = members.iter().map(|m| m.name.as_str()).collect();
            assert_eq!(names, vec!["b.png", "b.txt", "a.txt"]);
            assert_eq!(members[1].data, b"x, y");
            assert!(members[2].data.is_empty());
        }
    }

    #[test]
    fn test_corrupt_archive_is_error() {
        let dir = TempDir::new().unwrap();
        for name in ["bad.tar.gz", "bad.zip"] {
            let path = dir.path().join(name);
            std::fs::write(&path, b"definitely not an archive").unwrap();
            assert!(read_archive(&path).is_err());
        }
    }
}
