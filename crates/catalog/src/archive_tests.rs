// SPDX-License-Identifier: MIT

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::Read as _;

use bzip2::read::BzDecoder;
use igor_core::{Testcase, Testset};
use tempfile::tempdir;

use super::*;

fn suite_with_one_case(filename: &str, dependencies: Vec<String>) -> Testsuite {
    Testsuite {
        name: "suite".to_string(),
        description: String::new(),
        testsets: vec![Testset {
            name: "set".to_string(),
            description: String::new(),
            libs: BTreeMap::new(),
            testcases: vec![Testcase {
                name: "case".to_string(),
                filename: filename.to_string(),
                dependencies,
                ..Default::default()
            }],
        }],
    }
}

fn archive_names(bytes: &[u8]) -> BTreeSet<String> {
    let decoder = BzDecoder::new(bytes);
    let mut archive = tar::Archive::new(decoder);
    archive
        .entries()
        .unwrap()
        .map(|entry| entry.unwrap().path().unwrap().to_string_lossy().to_string())
        .collect()
}

#[test]
fn archive_lays_out_testcases_under_stepn_basename() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("case.sh"), b"#!/bin/sh\necho hi").unwrap();
    let suite = suite_with_one_case("case.sh", vec![]);

    let bytes = build_testsuite_archive(&suite, root.path()).unwrap();
    assert_eq!(archive_names(&bytes), BTreeSet::from(["testcases/0-case.sh".to_string()]));
}

#[test]
fn archive_includes_a_deps_file_when_dependencies_are_present() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("case.sh"), b"echo hi").unwrap();
    fs::write(root.path().join("other.sh"), b"echo hi").unwrap();
    let suite = Testsuite {
        name: "suite".to_string(),
        description: String::new(),
        testsets: vec![Testset {
            name: "set".to_string(),
            description: String::new(),
            libs: BTreeMap::new(),
            testcases: vec![
                Testcase { name: "other".to_string(), filename: "other.sh".to_string(), ..Default::default() },
                Testcase {
                    name: "case".to_string(),
                    filename: "case.sh".to_string(),
                    dependencies: vec!["other".to_string()],
                    ..Default::default()
                },
            ],
        }],
    };

    let bytes = build_testsuite_archive(&suite, root.path()).unwrap();
    let names = archive_names(&bytes);
    assert!(names.contains("testcases/1-case.sh.deps"));

    let decoder = BzDecoder::new(bytes.as_slice());
    let mut archive = tar::Archive::new(decoder);
    let mut found = false;
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        if entry.path().unwrap().to_string_lossy() == "testcases/1-case.sh.deps" {
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            assert_eq!(content, "other");
            found = true;
        }
    }
    assert!(found);
}

#[test]
fn archive_rejects_a_dependency_on_an_unknown_testcase() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("case.sh"), b"echo hi").unwrap();
    let suite = suite_with_one_case("case.sh", vec!["nonexistent".to_string()]);

    let err = build_testsuite_archive(&suite, root.path()).unwrap_err();
    assert!(matches!(err, CatalogError::UnresolvedDependency { .. }));
}

#[test]
fn archive_includes_the_extra_d_directory_when_present() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("case.sh"), b"echo hi").unwrap();
    fs::create_dir_all(root.path().join("case.sh.d")).unwrap();
    fs::write(root.path().join("case.sh.d/helper"), b"helper").unwrap();
    let suite = suite_with_one_case("case.sh", vec![]);

    let bytes = build_testsuite_archive(&suite, root.path()).unwrap();
    let names = archive_names(&bytes);
    assert!(names.iter().any(|n| n.starts_with("testcases/0-case.sh.d/")));
}

#[test]
fn archive_skips_an_empty_testcase_filename() {
    let root = tempdir().unwrap();
    let suite = suite_with_one_case("", vec![]);
    let bytes = build_testsuite_archive(&suite, root.path()).unwrap();
    assert!(archive_names(&bytes).is_empty());
}

#[test]
fn archive_adds_suite_libs_under_testcases_lib() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("case.sh"), b"echo hi").unwrap();
    fs::create_dir_all(root.path().join("libs/common")).unwrap();
    fs::write(root.path().join("libs/common/helper.sh"), b"lib").unwrap();

    let mut libs = BTreeMap::new();
    libs.insert("common".to_string(), "libs/common".to_string());
    let suite = Testsuite {
        name: "suite".to_string(),
        description: String::new(),
        testsets: vec![Testset {
            name: "set".to_string(),
            description: String::new(),
            libs,
            testcases: vec![Testcase {
                name: "case".to_string(),
                filename: "case.sh".to_string(),
                ..Default::default()
            }],
        }],
    };

    let bytes = build_testsuite_archive(&suite, root.path()).unwrap();
    let names = archive_names(&bytes);
    assert!(names.iter().any(|n| n.starts_with("testcases/lib/common/")));
}

#[test]
fn archive_skips_a_lib_whose_path_is_missing() {
    let root = tempdir().unwrap();
    fs::write(root.path().join("case.sh"), b"echo hi").unwrap();
    let mut libs = BTreeMap::new();
    libs.insert("missing".to_string(), "nowhere".to_string());
    let suite = Testsuite {
        name: "suite".to_string(),
        description: String::new(),
        testsets: vec![Testset {
            name: "set".to_string(),
            description: String::new(),
            libs,
            testcases: vec![Testcase {
                name: "case".to_string(),
                filename: "case.sh".to_string(),
                ..Default::default()
            }],
        }],
    };

    let bytes = build_testsuite_archive(&suite, root.path()).unwrap();
    let names = archive_names(&bytes);
    assert!(!names.iter().any(|n| n.starts_with("testcases/lib/missing")));
}
