// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("unrecognized rendering format: {0}")]
    UnknownFormat(String),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml encoding failed: {0}")]
    Yaml(#[from] serde_yml::Error),
    #[error("xml encoding failed: {0}")]
    Xml(#[from] quick_xml::Error),
}
