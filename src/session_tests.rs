//! Session persistence and end-to-end behavior over a `MemoryStore`

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::Session;
use crate::backup::{Backup, BackupError};
use crate::mutate::{MutateError, Placement};
use crate::persist::{self, BACKUPS, CATEGORIES, IMAGES, KeyValueStore, MemoryStore, RECYCLED};
use crate::scrape::{MergeOutcome, ScrapeCategory, ScrapeRules, TagScrapeResult};
use crate::store::StoreError;
use crate::testing::{TestSession, entry, tags};
use crate::{CuratrError, ImageEntry, TagCategory};

fn stored_images(store: &MemoryStore) -> Vec<ImageEntry> {
    persist::load(store, IMAGES).unwrap().unwrap()
}

#[test]
fn test_first_open_initializes_every_key() {
    let store = MemoryStore::new();
    let session = Session::open(store).unwrap();
    for key in [IMAGES, RECYCLED, CATEGORIES, BACKUPS] {
        assert!(session.store.get(key).unwrap().is_some(), "{key} missing");
    }
    assert!(session.entries().is_empty());
}

#[test]
fn test_every_mutation_is_persisted() {
    let mut session = TestSession::new();
    let id = session.add_entry(entry("a.png", &["x"])).unwrap();
    assert_eq!(stored_images(&session.store).len(), 1);

    session.set_tags(&id, tags(&["y", "z"])).unwrap();
    assert_eq!(stored_images(&session.store)[0].tags, vec!["y", "z"]);

    session.remove_entry(&id).unwrap();
    assert!(stored_images(&session.store).is_empty());
    let recycled: Vec<ImageEntry> = persist::load(&session.store, RECYCLED).unwrap().unwrap();
    assert_eq!(recycled.len(), 1);
}

#[test]
fn test_reopen_restores_state() {
    let mut session = TestSession::new();
    session.add_entry(entry("a.png", &["x"])).unwrap();
    let gone = session.add_entry(entry("b.png", &[])).unwrap();
    session.remove_entry(&gone).unwrap();
    session
        .add_category(TagCategory::new("People", "👤", tags(&["1girl"])))
        .unwrap();
    session.capture_backup(Some("snap")).unwrap();

    let reopened = Session::open(session.store).unwrap();
    assert_eq!(reopened.entries().count(), 1);
    assert_eq!(reopened.entries().recycled().len(), 1);
    assert_eq!(reopened.categories().list()[0].name, "People");
    assert_eq!(reopened.backups().list(), vec!["snap"]);
}

#[test]
fn test_failed_mutation_writes_nothing() {
    let mut session = TestSession::with_entries(vec![entry("a.png", &["x"])]);
    let before = session.store.get(IMAGES).unwrap();
    let id = session.resolve("a.png").unwrap();

    let err = session.add_tags(&[id], &tags(&[""]), Placement::Append).unwrap_err();
    assert!(matches!(err, CuratrError::MutateError(MutateError::EmptyTags)));
    assert_eq!(session.store.get(IMAGES).unwrap(), before);
}

#[test]
fn test_duplicate_add_is_reported() {
    let mut session = TestSession::with_entries(vec![entry("a.png", &[])]);
    let err = session.add_entry(entry("a.png", &["other"])).unwrap_err();
    assert!(matches!(err, CuratrError::StoreError(StoreError::Duplicate(_))));
    assert_eq!(session.entries().count(), 1);
}

#[test]
fn test_query_then_list_keeps_store_order() {
    let session = TestSession::with_entries(vec![
        entry("a.png", &["1girl", "solo"]),
        entry("b.png", &["1girls"]),
        entry("c.png", &["1boy"]),
    ]);
    let hits = session.query("1girl");
    let sources: Vec<&str> = session.list(Some(&hits)).iter().map(|e| e.source_ref.as_str()).collect();
    assert_eq!(sources, vec!["a.png", "b.png"]);

    let exact = session.query("1girl && solo");
    assert_eq!(exact.len(), 1);
    assert_eq!(session.query("").len(), 3);
}

#[test]
fn test_add_tags_to_query_selection() {
    let mut session = TestSession::with_entries(vec![entry("a.png", &["a", "b"]), entry("c.png", &["c"])]);
    let mut selection: Vec<_> = session.query("a").into_iter().collect();
    selection.sort();
    let mut rng = StdRng::seed_from_u64(5);

    session
        .add_tags_with_rng(&selection, &tags(&["new"]), Placement::Append, &mut rng)
        .unwrap();
    assert_eq!(session.entries().entries()[0].tags, vec!["a", "b", "new"]);
    assert_eq!(session.entries().entries()[1].tags, vec!["c"]);
}

#[test]
fn test_backup_restore_roundtrip() {
    let mut session = TestSession::with_entries(vec![entry("a.png", &["x"]), entry("b.png", &["y"])]);
    session.add_category(TagCategory::new("C", "🔵", tags(&["x"]))).unwrap();
    session.capture_backup(Some("A")).unwrap();
    let expected_entries = session.entries().entries().to_vec();
    let expected_categories = session.categories().list().to_vec();

    let ids: Vec<_> = session.entries().entries().iter().map(|e| e.id.clone()).collect();
    for id in &ids {
        session.remove_entry(id).unwrap();
    }
    session.clear_category_tags(0).unwrap();

    session.restore_backup("A").unwrap();
    assert_eq!(session.entries().entries(), expected_entries.as_slice());
    assert_eq!(session.categories().list(), expected_categories.as_slice());

    let stored: Vec<Backup> = persist::load(&session.store, BACKUPS).unwrap().unwrap();
    assert_eq!(stored[0].images, expected_entries);
}

#[test]
fn test_backup_not_found() {
    let mut session = TestSession::new();
    let err = session.restore_backup("nope").unwrap_err();
    assert!(matches!(err, CuratrError::BackupError(BackupError::NotFound(_))));
    let err = session.delete_backup("nope").unwrap_err();
    assert!(matches!(err, CuratrError::BackupError(BackupError::NotFound(_))));
}

#[test]
fn test_default_backup_label_is_timestamp() {
    let mut session = TestSession::new();
    let label = session.capture_backup(None).unwrap();
    assert!(chrono::NaiveDateTime::parse_from_str(&label, crate::backup::LABEL_FORMAT).is_ok());
}

#[test]
fn test_recycle_and_restore_all() {
    let mut session = TestSession::with_entries(vec![entry("a.png", &[]), entry("b.png", &[])]);
    let a = session.resolve("a.png").unwrap();
    let b = session.resolve("b.png").unwrap();
    session.remove_entry(&a).unwrap();
    session.remove_entry(&b).unwrap();
    session.add_entry(entry("a.png", &["again"])).unwrap();

    let restored = session.restore_all_recycled().unwrap();
    assert_eq!(restored, vec![b]);
    assert_eq!(session.entries().recycled().len(), 1);
    assert_eq!(session.purge_recycled().unwrap(), 1);
    assert!(session.resolve_recycled("a.png").is_err());
}

#[test]
fn test_category_edits() {
    let mut session = TestSession::new();
    session.add_category(TagCategory::new("first", "1", vec![])).unwrap();
    session.add_category(TagCategory::new("second", "", vec![])).unwrap();
    assert!(!session.categories().list()[1].emoji.is_empty());

    assert_eq!(session.move_category_up(1).unwrap(), 0);
    session.rename_category(0, "renamed").unwrap();
    session.set_category_emoji(0, "★").unwrap();
    assert_eq!(session.add_category_tags(0, &tags(&["a", "A", "b"])).unwrap(), 2);
    assert!(session.remove_category_tag(0, "a").unwrap());
    assert_eq!(session.categories().list()[0].tags, vec!["b"]);
    assert_eq!(session.move_category_down(0).unwrap(), 1);
    assert_eq!(session.remove_category(1).unwrap().name, "renamed");

    let err = session.rename_category(7, "x").unwrap_err();
    assert!(matches!(err, CuratrError::StoreError(StoreError::CategoryNotFound(7))));
}

#[test]
fn test_merge_scraped_and_scrape_into() {
    let mut session = TestSession::new();
    let result = TagScrapeResult {
        tags_by_category: [(ScrapeCategory::General, tags(&["smile"]))].into_iter().collect(),
        source_ref: "https://img.example/1.png".into(),
        page_url: None,
    };
    let outcome = session.merge_scraped(&result, &ScrapeRules::default()).unwrap();
    assert!(matches!(outcome, MergeOutcome::Added(_)));
    assert_eq!(stored_images(&session.store).len(), 1);

    let scraper = |source_ref: &str, _: &crate::scrape::ScrapeOptions| TagScrapeResult {
        tags_by_category: [(ScrapeCategory::General, tags(&["solo"]))].into_iter().collect(),
        source_ref: source_ref.to_string(),
        page_url: None,
    };
    let outcome = session
        .scrape_into(&scraper, "https://img.example/1.png", &Default::default())
        .unwrap();
    assert!(matches!(outcome, MergeOutcome::Extended { added: 1, .. }));
    assert_eq!(session.entries().entries()[0].tags, vec!["smile", "solo"]);
}

#[test]
fn test_stats_and_counts() {
    let session = TestSession::with_entries(vec![entry("a.png", &["x", "y"]), entry("b.png", &["x"])]);
    let stats = session.stats();
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.unique_tags, 2);
    assert_eq!(session.tag_counts()[0], ("x".to_string(), 2));

    let selected = session.select_by_tags(&tags(&["y"]), &[]);
    assert_eq!(selected.len(), 1);
}
