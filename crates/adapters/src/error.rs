// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("duplicate {category} name: {name}")]
    DuplicateName { category: &'static str, name: String },
    #[error("no origins registered for this category")]
    NoOrigins,
    #[error("operation not supported: {0}")]
    Unsupported(&'static str),
    #[error("provider error: {0}")]
    Provider(String),
}
