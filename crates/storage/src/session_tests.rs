// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;
use std::io::Read;

use bzip2::read::BzDecoder;
use tempfile::tempdir;

use super::*;

#[test]
fn new_session_directory_is_named_with_the_cookie() {
    let root = tempdir().unwrap();
    let session = TestSession::new("abc123", root.path()).unwrap();
    let name = session.dir().file_name().unwrap().to_string_lossy().to_string();
    assert!(name.contains("abc123"));
    assert!(session.dir().exists());
}

#[cfg(unix)]
#[test]
fn new_session_directory_is_world_traversable() {
    use std::os::unix::fs::PermissionsExt;

    let root = tempdir().unwrap();
    let session = TestSession::new("abc123", root.path()).unwrap();
    let mode = fs::metadata(session.dir()).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o755);
    let artifacts_mode = fs::metadata(session.artifacts_dir()).unwrap().permissions().mode();
    assert_eq!(artifacts_mode & 0o777, 0o755);
}

#[test]
fn artifacts_live_under_an_artifacts_subdirectory() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    session.add_artifact("log.txt", b"hello").unwrap();
    assert!(session.artifacts_dir().join("log.txt").exists());
    assert_eq!(
        session.artifacts_dir().parent().unwrap(),
        session.dir()
    );
}

#[test]
fn add_artifact_rejects_path_separators() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    let err = session.add_artifact("sub/dir", b"data").unwrap_err();
    assert!(matches!(err, StorageError::InvalidArtifactName(_)));
}

#[test]
fn add_and_get_artifact_round_trips() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    session.add_artifact("log.txt", b"hello").unwrap();
    assert_eq!(session.get_artifact("log.txt").unwrap(), b"hello");
}

#[test]
fn get_artifact_reports_missing_artifact() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    let err = session.get_artifact("nope.txt").unwrap_err();
    assert!(matches!(err, StorageError::ArtifactNotFound(name) if name == "nope.txt"));
}

#[test]
fn artifact_names_are_sorted() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    session.add_artifact("b.txt", b"b").unwrap();
    session.add_artifact("a.txt", b"a").unwrap();
    assert_eq!(session.artifact_names().unwrap(), vec!["a.txt", "b.txt"]);
}

#[test]
fn archive_contains_every_selected_artifact() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    session.add_artifact("0-log.txt", b"log contents").unwrap();
    session.add_artifact("0-annotations.yaml", b"- a note").unwrap();

    let archive_bytes = session.get_artifacts_archive(None).unwrap();
    let decoder = BzDecoder::new(archive_bytes.as_slice());
    let mut archive = tar::Archive::new(decoder);

    let mut names = BTreeSet::new();
    for entry in archive.entries().unwrap() {
        let entry = entry.unwrap();
        names.insert(entry.path().unwrap().to_string_lossy().to_string());
    }
    assert_eq!(
        names,
        BTreeSet::from(["0-log.txt".to_string(), "0-annotations.yaml".to_string()])
    );
}

#[test]
fn archive_skips_a_requested_but_absent_artifact() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    session.add_artifact("present.txt", b"x").unwrap();

    let selection = vec!["present.txt".to_string(), "missing.txt".to_string()];
    let archive_bytes = session.get_artifacts_archive(Some(&selection)).unwrap();
    let decoder = BzDecoder::new(archive_bytes.as_slice());
    let mut archive = tar::Archive::new(decoder);
    let entries: Vec<_> = archive.entries().unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn remove_deletes_artifacts_and_the_directory() {
    let root = tempdir().unwrap();
    let session = TestSession::new("cookie", root.path()).unwrap();
    session.add_artifact("only.txt", b"x").unwrap();
    let dir = session.dir().to_path_buf();

    session.remove().unwrap();
    assert!(!dir.exists());
}

