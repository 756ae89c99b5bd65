use std::path::PathBuf;

use chrono::TimeZone as _;

use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("panoweave-unit").join(name);
    let _ = fs::remove_dir_all(&dir);
    dir
}

fn artifact(name: &str) -> PanoramaArtifact {
    PanoramaArtifact {
        filename: name.to_string(),
        bytes: vec![0x89, b'P', b'N', b'G'],
        created_at: Utc.timestamp_millis_opt(0).single().unwrap(),
        width: 1,
        height: 1,
    }
}

#[test]
fn open_creates_root() {
    let dir = scratch("open_creates_root");
    let store = DirectoryStore::open(&dir).unwrap();
    assert!(store.root().is_dir());
}

#[test]
fn save_then_delete_hides_from_list() {
    let dir = scratch("save_then_delete");
    let store = DirectoryStore::open(&dir).unwrap();

    let locator = store.save(&artifact("panorama_1_2_t.png")).unwrap();
    assert_eq!(locator.as_str(), "/api/download/panorama_1_2_t.png");
    assert!(store.exists("panorama_1_2_t.png").unwrap());

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].size, 4);
    assert_eq!(listed[0].locator, locator);

    assert_eq!(
        store.delete("panorama_1_2_t.png").unwrap(),
        DeleteOutcome::Removed
    );
    assert!(!store.exists("panorama_1_2_t.png").unwrap());
    assert!(store.list().unwrap().is_empty());
    assert_eq!(
        store.delete("panorama_1_2_t.png").unwrap(),
        DeleteOutcome::NotFound
    );
}

#[test]
fn list_ignores_foreign_files() {
    let dir = scratch("list_ignores_foreign");
    let store = DirectoryStore::open(&dir).unwrap();
    fs::write(dir.join("notes.txt"), b"x").unwrap();
    fs::write(dir.join("other.png"), b"x").unwrap();
    fs::create_dir_all(dir.join("panorama_dir.png")).unwrap();
    store.save(&artifact("panorama_a.png")).unwrap();

    let names: Vec<_> = store
        .list()
        .unwrap()
        .into_iter()
        .map(|e| e.filename)
        .collect();
    assert_eq!(names, vec!["panorama_a.png".to_string()]);
}

#[test]
fn save_does_not_overwrite() {
    let dir = scratch("save_no_overwrite");
    let store = DirectoryStore::open(&dir).unwrap();
    store.save(&artifact("panorama_a.png")).unwrap();
    let err = store.save(&artifact("panorama_a.png")).unwrap_err();
    assert!(matches!(err, PanoError::Storage { .. }));
}

#[test]
fn custom_locator_prefix() {
    let dir = scratch("custom_prefix");
    let store = DirectoryStore::open(&dir)
        .unwrap()
        .with_locator_prefix("/output/");
    let locator = store.save(&artifact("panorama_a.png")).unwrap();
    assert_eq!(locator.to_string(), "/output/panorama_a.png");
}

#[test]
fn traversal_is_rejected_everywhere() {
    let dir = scratch("traversal");
    let store = DirectoryStore::open(&dir).unwrap();
    assert!(store.save(&artifact("../panorama_a.png")).is_err());
    assert!(store.delete("../Cargo.toml").is_err());
    assert!(store.exists("..").is_err());
    assert!(store.read("a/b.png").is_err());
}

#[test]
fn list_of_missing_root_is_empty() {
    let dir = scratch("missing_root");
    let store = DirectoryStore::open(&dir).unwrap();
    fs::remove_dir_all(&dir).unwrap();
    assert!(store.list().unwrap().is_empty());
}
