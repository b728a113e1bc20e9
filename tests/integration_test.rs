//! Integration tests for curatr
//!
//! These tests open real sled-backed sessions in temporary directories and run
//! complete workflows through the public API.

use std::fs;
use std::path::{Path, PathBuf};

use curatr::ImageEntry;
use curatr::mutate::Placement;
use curatr::persist::SledStore;
use curatr::session::Session;
use curatr::tags::split_list;
use curatr::transfer::{ExportTarget, ImportOptions, LocalFiles};
use tempfile::TempDir;

fn open_session(path: &Path) -> Session<SledStore> {
    Session::open(SledStore::open(path).unwrap()).unwrap()
}

fn create_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, name.as_bytes()).unwrap();
    path
}

fn add(session: &mut Session<SledStore>, source: &Path, tags: &str) {
    let entry = ImageEntry::new(source.to_string_lossy(), None, split_list(tags));
    session.add_entry(entry).unwrap();
}

#[test]
fn test_session_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session");
    let image = create_image(dir.path(), "a.png");

    {
        let mut session = open_session(&db_path);
        add(&mut session, &image, "1girl, solo");
        session.capture_backup(Some("first")).unwrap();
    }

    let session = open_session(&db_path);
    assert_eq!(session.entries().count(), 1);
    assert_eq!(session.entries().entries()[0].tags, vec!["1girl", "solo"]);
    assert_eq!(session.backups().list(), vec!["first"]);
}

#[test]
fn test_query_and_bulk_tagging() {
    let dir = TempDir::new().unwrap();
    let mut session = open_session(&dir.path().join("session"));
    let a = create_image(dir.path(), "a.png");
    let b = create_image(dir.path(), "b.png");
    let c = create_image(dir.path(), "c.png");
    add(&mut session, &a, "1girl, solo, smile");
    add(&mut session, &b, "1girls, outdoors");
    add(&mut session, &c, "1boy");

    assert_eq!(session.query("1girl").len(), 2);
    assert_eq!(session.query("1girl && solo").len(), 1);
    assert_eq!(session.query("1boy || outdoors").len(), 2);

    let hits = session.query("1girl");
    let selection: Vec<_> = session.list(Some(&hits)).iter().map(|e| e.id.clone()).collect();
    session.add_tags(&selection, &split_list("highres"), Placement::Append).unwrap();
    session.remove_tags(&selection, &split_list("SOLO")).unwrap();

    let tags: Vec<Vec<String>> = session.entries().entries().iter().map(|e| e.tags.clone()).collect();
    assert_eq!(tags[0], vec!["1girl", "smile", "highres"]);
    assert_eq!(tags[1], vec!["1girls", "outdoors", "highres"]);
    assert_eq!(tags[2], vec!["1boy"]);
}

#[test]
fn test_export_import_round_trip_through_tarball() {
    let dir = TempDir::new().unwrap();
    let mut source = open_session(&dir.path().join("source"));
    let a = create_image(dir.path(), "a.png");
    let b = create_image(dir.path(), "b.jpg");
    add(&mut source, &a, "1girl, solo");
    add(&mut source, &b, "landscape");

    let archive = dir.path().join("dataset.tar.gz");
    let report = source.export(&LocalFiles, &ExportTarget::from_path(&archive)).unwrap();
    assert_eq!(report.exported, 2);
    assert!(report.failures.is_empty());

    let mut target = open_session(&dir.path().join("target"));
    let options = ImportOptions {
        media_dir: dir.path().join("media"),
    };
    let report = target.import(&[archive], &options).unwrap();
    assert_eq!(report.imported.len(), 2);

    let imported: Vec<(&str, &[String])> = target
        .entries()
        .entries()
        .iter()
        .map(|e| (e.source_ref.as_str(), e.tags.as_slice()))
        .collect();
    assert_eq!(imported[0].0, a.to_string_lossy());
    assert_eq!(imported[0].1, ["1girl", "solo"]);
    assert_eq!(imported[1].1, ["landscape"]);

    let again = target.import(&[dir.path().join("dataset.tar.gz")], &options).unwrap();
    assert!(again.imported.is_empty());
    assert_eq!(again.duplicates.len(), 2);
}

#[test]
fn test_backup_restore_after_removal() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("session");
    let image = create_image(dir.path(), "a.png");
    {
        let mut session = open_session(&db_path);
        add(&mut session, &image, "x");
        session.capture_backup(Some("keep")).unwrap();
        let id = session.resolve(&image.to_string_lossy()).unwrap();
        session.remove_entry(&id).unwrap();
        assert!(session.entries().is_empty());
    }

    let mut session = open_session(&db_path);
    session.restore_backup("keep").unwrap();
    assert_eq!(session.entries().count(), 1);
    assert!(session.restore_backup("missing").is_err());
}

#[test]
fn test_imported_archive_exports_after_sources_are_gone() {
    let dir = TempDir::new().unwrap();
    let mut source = open_session(&dir.path().join("source"));
    let a = create_image(dir.path(), "a.png");
    let b = create_image(dir.path(), "b.png");
    add(&mut source, &a, "1girl");
    add(&mut source, &b, "landscape");

    let archive = dir.path().join("dataset.tar.gz");
    source.export(&LocalFiles, &ExportTarget::from_path(&archive)).unwrap();
    fs::remove_file(&a).unwrap();
    fs::remove_file(&b).unwrap();

    let mut target = open_session(&dir.path().join("target"));
    let options = ImportOptions {
        media_dir: dir.path().join("media"),
    };
    target.import(&[archive], &options).unwrap();
    assert_eq!(target.entries().entries()[0].source_ref, a.to_string_lossy());

    let out = dir.path().join("again");
    let report = target.export(&LocalFiles, &ExportTarget::from_path(&out)).unwrap();
    assert_eq!(report.exported, 2);
    assert!(report.failures.is_empty());

    let mut images: Vec<Vec<u8>> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "png"))
        .map(|p| fs::read(p).unwrap())
        .collect();
    images.sort();
    assert_eq!(images, vec![b"a.png".to_vec(), b"b.png".to_vec()]);
}
