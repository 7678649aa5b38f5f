// SPDX-License-Identifier: MIT

//! Maps every typed error from the crates below into one of three HTTP
//! outcomes: 404 (not found, empty body), 412 (precondition, body is the
//! message), 500 (provider/internal failure, logged and the message
//! returned).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum DaemonError {
    #[error("{category} '{name}' not found")]
    NotFound { category: &'static str, name: String },
    #[error("precondition violated: {0}")]
    Precondition(String),
    #[error("unauthorized")]
    Unauthorized,
    #[error("internal error: {0}")]
    Internal(String),
}

impl DaemonError {
    pub fn not_found(category: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound { category, name: name.into() }
    }

    pub fn precondition(message: impl Into<String>) -> Self {
        Self::Precondition(message.into())
    }
}

impl From<igor_engine::EngineError> for DaemonError {
    fn from(err: igor_engine::EngineError) -> Self {
        use igor_engine::EngineError as E;
        match err {
            E::NotFound { category, name } => Self::NotFound { category, name },
            E::Precondition(msg) => Self::Precondition(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<igor_catalog::CatalogError> for DaemonError {
    fn from(err: igor_catalog::CatalogError) -> Self {
        use igor_catalog::CatalogError as E;
        match err {
            E::NotFound { category, name } => Self::NotFound { category, name },
            other @ E::UnresolvedDependency { .. } => Self::precondition(other.to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<igor_adapters::AdapterError> for DaemonError {
    fn from(err: igor_adapters::AdapterError) -> Self {
        use igor_adapters::AdapterError as E;
        match err {
            E::Unsupported(_) | E::DuplicateName { .. } | E::NoOrigins => Self::precondition(err.to_string()),
            E::Provider(msg) => Self::Internal(msg),
        }
    }
}

impl From<igor_storage::StorageError> for DaemonError {
    fn from(err: igor_storage::StorageError) -> Self {
        use igor_storage::StorageError as E;
        match err {
            E::InvalidArtifactName(name) => Self::precondition(format!("invalid artifact name: {name}")),
            E::ArtifactNotFound(name) => Self::not_found("artifact", name),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl From<igor_wire::WireError> for DaemonError {
    fn from(err: igor_wire::WireError) -> Self {
        match err {
            igor_wire::WireError::UnknownFormat(format) => Self::precondition(format!("unrecognized format: {format}")),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for DaemonError {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND.into_response(),
            Self::Precondition(msg) => (StatusCode::PRECONDITION_FAILED, msg).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Internal(msg) => {
                error!(%msg, "internal error serving request");
                (StatusCode::INTERNAL_SERVER_ERROR, msg).into_response()
            }
        }
    }
}
