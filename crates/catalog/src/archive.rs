// SPDX-License-Identifier: MIT

//! Builds the bzip2-compressed tar a guest downloads for a job's testsuite.
//!
//! Testcases are laid out under `testcases/<stepN>-<basename>`, an optional
//! `<basename>.d/` tree rides along if present on disk, dependencies become
//! a `.deps` sibling file, and suite libs land under `testcases/lib/<name>`.

use std::io::Write;
use std::path::Path;

use bzip2::write::BzEncoder;
use bzip2::Compression;
use tracing::warn;

use igor_core::Testsuite;

use crate::error::CatalogError;

const SUBDIR: &str = "testcases";

/// `root` is the directory testcase and lib paths in `suite` are relative
/// to — the directory the suite's own catalog file was loaded from.
pub fn build_testsuite_archive(suite: &Testsuite, root: &Path) -> Result<Vec<u8>, CatalogError> {
    check_dependencies(suite)?;

    let mut buffer = Vec::new();
    {
        let encoder = BzEncoder::new(&mut buffer, Compression::best());
        let mut archive = tar::Builder::new(encoder);
        add_testcases(&mut archive, suite, root)?;
        add_libs(&mut archive, suite, root)?;
        archive.into_inner()?.finish()?;
    }
    Ok(buffer)
}

/// A typo'd dependency name should fail the build, not ship a `.deps` file
/// pointing nowhere.
fn check_dependencies(suite: &Testsuite) -> Result<(), CatalogError> {
    let flattened = suite.flatten();
    for testcase in &flattened {
        if !testcase.dependencies_resolved(&flattened) {
            let dependency = testcase
                .dependencies
                .iter()
                .find(|dep| !flattened.iter().any(|tc| &tc.name == *dep))
                .cloned()
                .unwrap_or_default();
            return Err(CatalogError::UnresolvedDependency { testcase: testcase.name.clone(), dependency });
        }
    }
    Ok(())
}

fn add_testcases<W: Write>(archive: &mut tar::Builder<W>, suite: &Testsuite, root: &Path) -> Result<(), CatalogError> {
    for (stepn, testcase) in suite.flatten().iter().enumerate() {
        if testcase.filename.is_empty() {
            warn!(testcase = %testcase.name, "empty testcase, skipping");
            continue;
        }
        let src = root.join(&testcase.filename);
        let basename = Path::new(&testcase.filename)
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| testcase.filename.clone());
        let arcname = format!("{SUBDIR}/{stepn}-{basename}");

        archive.append_path_with_name(&src, &arcname)?;

        if !testcase.dependencies.is_empty() {
            let deps = testcase.dependencies.join("\n");
            let mut header = tar::Header::new_gnu();
            header.set_size(deps.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            archive.append_data(&mut header, format!("{arcname}.deps"), deps.as_bytes())?;
        }

        let extra_dir_name = format!("{}.d", testcase.filename);
        let extra_dir = root.join(&extra_dir_name);
        if extra_dir.is_dir() {
            archive.append_dir_all(format!("{arcname}.d"), &extra_dir)?;
        }
    }
    Ok(())
}

fn add_libs<W: Write>(archive: &mut tar::Builder<W>, suite: &Testsuite, root: &Path) -> Result<(), CatalogError> {
    let (libs, duplicates) = suite.merged_libs();
    for name in &duplicates {
        warn!(lib = %name, "duplicate lib name across testsets, skipping");
    }

    for (name, path) in &libs {
        let src = root.join(path);
        if !src.exists() {
            warn!(lib = %name, path = %src.display(), "lib path does not exist, skipping");
            continue;
        }
        let arcname = format!("{SUBDIR}/lib/{name}");
        if src.is_dir() {
            archive.append_dir_all(arcname, &src)?;
        } else {
            archive.append_path_with_name(&src, arcname)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "archive_tests.rs"]
mod tests;
