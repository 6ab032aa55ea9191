//! Reading and writing the JSON documents a mod package is made of.
//!
//! Mod authors write `content.json` and `manifest.json` by hand, so input is parsed
//! as JSON5 (comments, trailing commas, unquoted keys). Output is strict JSON with
//! four-space indentation, and key order is preserved end to end.

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;

/// Parse a comment-tolerant JSON document into an ordered value
pub fn load_document(path: &Utf8Path) -> Result<Value> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    parse_document(&contents).with_context(|| format!("Failed to parse {}", path))
}

pub fn parse_document(contents: &str) -> Result<Value> {
    // Strip a UTF-8 BOM; editors on Windows like to add one
    let contents = contents.strip_prefix('\u{feff}').unwrap_or(contents);
    Ok(json5::from_str(contents)?)
}

/// Render a document with quoted keys, four-space indentation and a trailing newline
pub fn to_pretty_string<T: Serialize>(document: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .context("Failed to serialize document")?;
    buffer.push(b'\n');
    Ok(String::from_utf8(buffer)?)
}
