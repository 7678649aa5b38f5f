// SPDX-License-Identifier: MIT

//! A [`TestSession`] is one job's scratch directory: where result artifacts
//! (logs, annotation files, anything a guest or hook drops off) accumulate,
//! and from which the daemon can build a downloadable archive.

use std::collections::HashSet;
use std::fs;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use bzip2::write::BzEncoder;
use bzip2::Compression;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("artifact name '{0}' must not contain a path separator")]
    InvalidArtifactName(String),
    #[error("artifact '{0}' not found in session")]
    ArtifactNotFound(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// A per-job scratch directory under the daemon's configured session root.
///
/// Laid out as `<session_root>/<random>-<cookie>/artifacts/*` per spec;
/// `dir()` is the outer, randomly-named directory, `artifacts_dir()` is
/// where actual artifact files live. Cleanup is best-effort:
/// [`remove`](Self::remove) deletes the artifacts it knows about and only
/// removes both directories if nothing else turned up in them.
pub struct TestSession {
    cookie: String,
    dir: PathBuf,
    artifacts_dir: PathBuf,
}

impl TestSession {
    pub fn new(cookie: impl Into<String>, session_root: &Path) -> Result<Self, StorageError> {
        let cookie = cookie.into();
        fs::create_dir_all(session_root)?;

        let dir = tempfile::Builder::new()
            .prefix("igord-session-")
            .suffix(&format!("-{cookie}"))
            .tempdir_in(session_root)?
            .into_path();
        set_world_traversable(&dir)?;

        let artifacts_dir = dir.join("artifacts");
        fs::create_dir(&artifacts_dir)?;
        set_world_traversable(&artifacts_dir)?;

        info!(%cookie, dir = %dir.display(), "starting test session");
        Ok(Self {
            cookie,
            dir,
            artifacts_dir,
        })
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    /// Write `data` as artifact `name`. `name` must be a bare filename.
    pub fn add_artifact(&self, name: &str, data: &[u8]) -> Result<(), StorageError> {
        validate_artifact_name(name)?;
        fs::write(self.artifacts_dir.join(name), data)?;
        Ok(())
    }

    pub fn get_artifact(&self, name: &str) -> Result<Vec<u8>, StorageError> {
        validate_artifact_name(name)?;
        fs::read(self.artifacts_dir.join(name)).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StorageError::ArtifactNotFound(name.to_string())
            } else {
                StorageError::Io(err)
            }
        })
    }

    /// Artifact file names present right now, sorted for deterministic
    /// listing (the order artifacts land on disk is otherwise unspecified).
    pub fn artifact_names(&self) -> Result<Vec<String>, StorageError> {
        let mut names: Vec<String> = fs::read_dir(&self.artifacts_dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        names.sort();
        Ok(names)
    }

    /// Build a bzip2-compressed tar of the given artifacts (or all of them,
    /// if `selection` is `None`). Names not actually present are skipped
    /// with a debug log rather than failing the whole archive.
    pub fn get_artifacts_archive(&self, selection: Option<&[String]>) -> Result<Vec<u8>, StorageError> {
        let existing: HashSet<String> = self.artifact_names()?.into_iter().collect();
        let wanted: Vec<String> = match selection {
            Some(names) => names.to_vec(),
            None => existing.iter().cloned().collect(),
        };

        let mut buffer = Vec::new();
        {
            let encoder = BzEncoder::new(&mut buffer, Compression::best());
            let mut archive = tar::Builder::new(encoder);
            for name in &wanted {
                if !existing.contains(name) {
                    debug!(artifact = %name, cookie = %self.cookie, "artifact not here");
                    continue;
                }
                debug!(artifact = %name, cookie = %self.cookie, "adding artifact to archive");
                archive.append_path_with_name(self.artifacts_dir.join(name), name)?;
            }
            archive.into_inner()?.finish()?;
        }
        Ok(buffer)
    }

    /// Best-effort teardown: remove every known artifact, then both
    /// directories if nothing unexpected turned up in them. Anything left
    /// behind is logged, not deleted.
    pub fn remove(&self) -> Result<(), StorageError> {
        debug!(cookie = %self.cookie, "removing session");
        for name in self.artifact_names()? {
            debug!(artifact = %name, cookie = %self.cookie, "removing artifact");
            fs::remove_file(self.artifacts_dir.join(&name))?;
        }

        if dir_has_entries(&self.artifacts_dir)? {
            warn!(
                cookie = %self.cookie,
                dir = %self.artifacts_dir.display(),
                "remaining files after session cleanup"
            );
            return Ok(());
        }
        fs::remove_dir(&self.artifacts_dir)?;

        if dir_has_entries(&self.dir)? {
            warn!(
                cookie = %self.cookie,
                dir = %self.dir.display(),
                "remaining files after session cleanup"
            );
        } else {
            fs::remove_dir(&self.dir)?;
        }
        Ok(())
    }
}

fn dir_has_entries(dir: &Path) -> Result<bool, StorageError> {
    Ok(fs::read_dir(dir)?.next().is_some())
}

fn validate_artifact_name(name: &str) -> Result<(), StorageError> {
    if name.contains('/') || name.contains('\\') {
        return Err(StorageError::InvalidArtifactName(name.to_string()));
    }
    Ok(())
}

#[cfg(unix)]
fn set_world_traversable(dir: &Path) -> Result<(), StorageError> {
    let mut perms = fs::metadata(dir)?.permissions();
    perms.set_mode(0o755);
    fs::set_permissions(dir, perms)?;
    Ok(())
}

#[cfg(not(unix))]
fn set_world_traversable(_dir: &Path) -> Result<(), StorageError> {
    Ok(())
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
