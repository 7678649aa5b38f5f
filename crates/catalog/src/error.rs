// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{category} '{name}' not found")]
    NotFound { category: &'static str, name: String },
    #[error("failed to parse catalog file {path}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("testcase '{testcase}' depends on unknown testcase '{dependency}'")]
    UnresolvedDependency { testcase: String, dependency: String },
    #[error(transparent)]
    Testplan(#[from] igor_core::testplan::TestplanError),
    #[error(transparent)]
    Adapter(#[from] igor_adapters::AdapterError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
