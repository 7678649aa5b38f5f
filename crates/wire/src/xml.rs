// SPDX-License-Identifier: MIT

//! `dict <-> XML` conversion, preserving the invariant that converting a
//! dict to XML and back loses no leaf scalar.
//!
//! The encoding rule: a JSON object's keys become child elements; a JSON
//! array repeats its parent's own tag once per element (so `{"c": [1,2]}`
//! renders as two sibling `<c>` elements, not a wrapped list); every other
//! value becomes that element's text content. Every leaf is serialized as
//! text, so the inverse (`xml_to_value`) hands back strings rather than the
//! original JSON type — only the textual content of scalars is guaranteed
//! to survive the round trip.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use serde::Serialize;
use serde_json::Value;
use std::io::Cursor;

use crate::error::WireError;

/// A fixed stylesheet reference. The daemon serves this path as a static
/// XSLT stub.
pub const STYLESHEET_HREF: &str = "/static/igor.xsl";

/// Render `value` as an XML document rooted at `root_tag`, with the fixed
/// stylesheet processing instruction.
pub fn to_xml_string(root_tag: &str, value: &impl Serialize) -> Result<String, WireError> {
    let json = serde_json::to_value(value)?;
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(quick_xml::events::BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::PI(quick_xml::events::BytesPI::new(format!(
        "xml-stylesheet type=\"text/xsl\" href=\"{STYLESHEET_HREF}\""
    ))))?;
    write_node(&mut writer, root_tag, &json)?;
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_node(writer: &mut Writer<Cursor<Vec<u8>>>, tag: &str, value: &Value) -> Result<(), WireError> {
    match value {
        Value::Array(items) => {
            for item in items {
                write_node(writer, tag, item)?;
            }
            if items.is_empty() {
                writer.write_event(Event::Empty(BytesStart::new(tag)))?;
            }
        }
        Value::Object(map) => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            for (key, child) in map {
                write_node(writer, key, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
        Value::Null => {
            writer.write_event(Event::Empty(BytesStart::new(tag)))?;
        }
        scalar => {
            writer.write_event(Event::Start(BytesStart::new(tag)))?;
            writer.write_event(Event::Text(BytesText::new(&scalar_text(scalar))))?;
            writer.write_event(Event::End(BytesEnd::new(tag)))?;
        }
    }
    Ok(())
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}

/// The inverse of [`write_node`]'s encoding: sibling elements sharing a tag
/// fold into a JSON array, an element with children becomes an object, and
/// a childless element becomes a string leaf. Used only to verify the
/// round-trip invariant; the daemon never needs to parse XML it serves.
pub fn xml_to_value(xml: &str) -> Result<Value, WireError> {
    // The writer side never pretty-prints, so there is no stray
    // whitespace-only text between sibling tags to trim here.
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Decl(_) | Event::PI(_) | Event::Comment(_) => {}
            Event::Start(_) => {
                let value = read_element(&mut reader)?;
                return Ok(value);
            }
            Event::Empty(_) => return Ok(Value::Null),
            Event::Eof => return Ok(Value::Null),
            _ => {}
        }
        buf.clear();
    }
}

fn read_element(reader: &mut Reader<&[u8]>) -> Result<Value, WireError> {
    let mut children: Vec<(String, Value)> = Vec::new();
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(start) => {
                let name = local_name(start.name());
                let value = read_element(reader)?;
                children.push((name, value));
            }
            Event::Empty(start) => {
                let name = local_name(start.name());
                children.push((name, Value::Null));
            }
            Event::Text(t) => {
                text.push_str(&t.unescape()?);
            }
            Event::End(_) => break,
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if children.is_empty() {
        return Ok(Value::String(text));
    }

    let mut grouped: Vec<(String, Vec<Value>)> = Vec::new();
    for (name, value) in children {
        match grouped.iter_mut().find(|(n, _)| n == &name) {
            Some((_, values)) => values.push(value),
            None => grouped.push((name, vec![value])),
        }
    }

    let mut map = serde_json::Map::new();
    for (name, mut values) in grouped {
        let folded = if values.len() == 1 { values.remove(0) } else { Value::Array(values) };
        map.insert(name, folded);
    }
    Ok(Value::Object(map))
}

fn local_name(name: QName) -> String {
    String::from_utf8_lossy(name.0).into_owned()
}

#[cfg(test)]
#[path = "xml_tests.rs"]
mod tests;
