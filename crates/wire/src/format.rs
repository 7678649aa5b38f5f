// SPDX-License-Identifier: MIT

//! The `?format=` query parameter contract: JSON by default,
//! `xml` or `yaml` on request. Anything else is a precondition failure, not
//! a fallback to JSON — the HTTP layer maps [`WireError::UnknownFormat`] to
//! `412`.

use crate::error::WireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Xml,
    Yaml,
}

impl Format {
    /// Parse a `?format=` value. `None`/empty defaults to JSON.
    pub fn parse(raw: Option<&str>) -> Result<Self, WireError> {
        match raw.unwrap_or("") {
            "" | "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            "yaml" => Ok(Self::Yaml),
            other => Err(WireError::UnknownFormat(other.to_string())),
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
            Self::Xml => "application/xml",
            Self::Yaml => "application/x-yaml",
        }
    }
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
