// SPDX-License-Identifier: MIT

//! Render any wire DTO into a response body, keyed off the `?format=` query
//! parameter: JSON by default, XML (with the fixed stylesheet reference)
//! or YAML on request.

use serde::Serialize;

use crate::error::WireError;
use crate::format::Format;
use crate::xml::to_xml_string;

/// `(content-type, body)` pair ready to hand to an HTTP response.
pub fn render(format: Format, root_tag: &str, value: &impl Serialize) -> Result<(&'static str, String), WireError> {
    let body = match format {
        Format::Json => serde_json::to_string(value)?,
        Format::Xml => to_xml_string(root_tag, value)?,
        Format::Yaml => serde_yml::to_string(value)?,
    };
    Ok((format.content_type(), body))
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
