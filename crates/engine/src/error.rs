// SPDX-License-Identifier: MIT

use igor_adapters::AdapterError;
use igor_catalog::CatalogError;
use igor_core::CookieError;
use igor_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("{category} '{name}' not found")]
    NotFound { category: &'static str, name: String },

    #[error("precondition violated: {0}")]
    Precondition(String),

    #[error("provider error: {0}")]
    Provider(#[from] AdapterError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Cookie(#[from] CookieError),
}

impl EngineError {
    pub fn not_found(category: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            category,
            name: name.into(),
        }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}
