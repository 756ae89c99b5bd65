use chrono::TimeZone as _;

use super::*;

fn artifact(name: &str, ms: i64) -> PanoramaArtifact {
    PanoramaArtifact {
        filename: name.to_string(),
        bytes: vec![1, 2, 3],
        created_at: Utc.timestamp_millis_opt(ms).single().unwrap(),
        width: 1,
        height: 1,
    }
}

#[test]
fn save_list_delete_roundtrip() {
    let store = InMemoryStore::new();
    let locator = store.save(&artifact("panorama_a.png", 10)).unwrap();
    assert_eq!(locator.as_str(), "/api/download/panorama_a.png");
    store.save(&artifact("panorama_b.png", 20)).unwrap();

    let listed = store.list().unwrap();
    let names: Vec<_> = listed.iter().map(|e| e.filename.as_str()).collect();
    assert_eq!(names, vec!["panorama_b.png", "panorama_a.png"]);
    assert_eq!(listed[0].size, 3);

    assert_eq!(
        store.delete("panorama_b.png").unwrap(),
        DeleteOutcome::Removed
    );
    assert!(!store.exists("panorama_b.png").unwrap());
    assert_eq!(store.len(), 1);
}

#[test]
fn delete_missing_reports_not_found() {
    let store = InMemoryStore::new();
    let outcome = store.delete("panorama_none.png").unwrap();
    assert_eq!(outcome, DeleteOutcome::NotFound);
    assert!(!outcome.removed());
}

#[test]
fn save_refuses_to_overwrite() {
    let store = InMemoryStore::new();
    store.save(&artifact("panorama_a.png", 10)).unwrap();
    let err = store.save(&artifact("panorama_a.png", 11)).unwrap_err();
    assert!(matches!(err, PanoError::Storage { .. }));
}

#[test]
fn read_returns_saved_bytes() {
    let store = InMemoryStore::new();
    store.save(&artifact("panorama_a.png", 10)).unwrap();
    assert_eq!(store.read("panorama_a.png").unwrap(), Some(vec![1, 2, 3]));
    assert_eq!(store.read("panorama_z.png").unwrap(), None);
    assert!(store.read("../etc/passwd").is_err());
}

#[test]
fn locator_exposes_filename() {
    let store = InMemoryStore::new();
    let locator = store.save(&artifact("panorama_a.png", 10)).unwrap();
    assert_eq!(locator.filename(), Some("panorama_a.png"));
    assert_eq!(Locator::new("/api/download/", "").filename(), None);
}
