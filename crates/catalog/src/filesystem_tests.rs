// SPDX-License-Identifier: MIT

use std::fs;

use tempfile::tempdir;

use super::*;
use igor_core::Testsuite;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

#[tokio::test]
async fn items_loads_every_suite_file_recursively() {
    let dir = tempdir().unwrap();
    write(dir.path(), "basic.json", r#"{"name": "basic", "testsets": []}"#);
    write(dir.path(), "nested/advanced.yaml", "name: advanced\ntestsets: []\n");

    let origin = FilesystemOrigin::<Testsuite>::new("fs", dir.path(), |s| &s.name);
    let items = origin.items().await.unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.contains_key("basic"));
    assert!(items.contains_key("advanced"));
}

#[tokio::test]
async fn lookup_returns_none_for_unknown_name() {
    let dir = tempdir().unwrap();
    let origin = FilesystemOrigin::<Testsuite>::new("fs", dir.path(), |s| &s.name);
    assert!(origin.lookup("nope").await.unwrap().is_none());
}

#[tokio::test]
async fn items_skips_unparseable_files_with_a_warning() {
    let dir = tempdir().unwrap();
    write(dir.path(), "broken.json", "{not valid json");
    write(dir.path(), "ok.json", r#"{"name": "ok", "testsets": []}"#);

    let origin = FilesystemOrigin::<Testsuite>::new("fs", dir.path(), |s| &s.name);
    let items = origin.items().await.unwrap();
    assert_eq!(items.len(), 1);
    assert!(items.contains_key("ok"));
}

#[tokio::test]
async fn items_is_empty_for_a_missing_directory() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does-not-exist");
    let origin = FilesystemOrigin::<Testsuite>::new("fs", missing, |s| &s.name);
    assert!(origin.items().await.unwrap().is_empty());
}
