// SPDX-License-Identifier: MIT

//! A directory of JSON/YAML catalog files, scanned recursively, each
//! deserializing to one entity: `.suite`/`.set`/`.plan` files parsed with
//! serde rather than a hand-rolled line format.

use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::warn;

use igor_adapters::{AdapterError, Origin};

/// Scans `dir` recursively for `.json`/`.yaml`/`.yml` files, each holding one
/// `T`. `key_of` extracts the name entries are keyed (and looked up) by.
pub struct FilesystemOrigin<T> {
    name: String,
    dir: PathBuf,
    key_of: fn(&T) -> &str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FilesystemOrigin<T>
where
    T: DeserializeOwned,
{
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>, key_of: fn(&T) -> &str) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
            key_of,
            _marker: PhantomData,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn load_all(&self) -> Result<BTreeMap<String, T>, AdapterError> {
        let mut items = BTreeMap::new();
        for path in collect_catalog_files(&self.dir).map_err(|err| AdapterError::Provider(err.to_string()))? {
            let item: T = match parse_catalog_file(&path) {
                Ok(item) => item,
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unparseable catalog file");
                    continue;
                }
            };
            let key = (self.key_of)(&item).to_string();
            if items.contains_key(&key) {
                warn!(path = %path.display(), %key, "duplicate name within origin, keeping first occurrence");
                continue;
            }
            items.insert(key, item);
        }
        Ok(items)
    }
}

#[async_trait]
impl<T> Origin<T> for FilesystemOrigin<T>
where
    T: Clone + Send + Sync + DeserializeOwned + 'static,
{
    fn name(&self) -> String {
        self.name.clone()
    }

    async fn items(&self) -> Result<BTreeMap<String, T>, AdapterError> {
        self.load_all()
    }

    async fn lookup(&self, name: &str) -> Result<Option<T>, AdapterError> {
        Ok(self.load_all()?.remove(name))
    }
}

fn collect_catalog_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !dir.exists() {
        return Ok(files);
    }
    let mut stack = vec![dir.to_path_buf()];
    while let Some(current) = stack.pop() {
        for entry in std::fs::read_dir(&current)?.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_catalog_file(&path) {
                files.push(path);
            }
        }
    }
    Ok(files)
}

fn is_catalog_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("json") | Some("yaml") | Some("yml")
    )
}

fn parse_catalog_file<T: DeserializeOwned>(path: &Path) -> Result<T, String> {
    let content = std::fs::read_to_string(path).map_err(|err| err.to_string())?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|err| err.to_string()),
        _ => serde_yml::from_str(&content).map_err(|err| err.to_string()),
    }
}

#[cfg(test)]
#[path = "filesystem_tests.rs"]
mod tests;
