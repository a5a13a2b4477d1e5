//! Mod manifest schema and parser.
//!
//! Every mod archive carries a `mod.json` under its root directory:
//!
//! ```json
//! {
//!     "name": "Better Trees",
//!     "priority": 10,
//!     "overrides": {
//!         "scenes/tree.tscn": "better_trees/scenes/tree.tscn"
//!     }
//! }
//! ```
//!
//! [`parse_manifest`] reads it from a mounted [`ModNamespace`] and produces a
//! [`ModMetadata`], or a [`ParseError`] describing why the mod can't be used.

use overmod_archive::{ModNamespace, MountError};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// File name of the manifest inside a mod's root directory.
pub const MANIFEST_FILE_NAME: &str = "mod.json";

/// Returns the manifest path for a mod mounted under `mod_id`.
pub fn manifest_path(mod_id: &str) -> String {
    format!("{}/{}", mod_id, MANIFEST_FILE_NAME)
}

/// Errors produced while reading a mod manifest.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Manifest not found: {0}")]
    ManifestMissing(String),

    #[error("Manifest could not be read: {0}")]
    Unreadable(#[from] MountError),

    #[error("Manifest root is not a JSON object: {0}")]
    InvalidRoot(String),

    #[error("Malformed manifest field '{field}': {reason}")]
    MalformedField { field: &'static str, reason: String },
}

/// The on-disk manifest document.
///
/// Unknown keys are ignored.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
pub struct ModManifest {
    /// Display name of the mod.
    pub name: String,

    /// Resolution rank, higher wins.
    #[serde(alias = "load_order")]
    pub priority: i64,

    /// Original resource path -> replacement resource path.
    pub overrides: BTreeMap<String, String>,
}

/// Metadata for one successfully parsed mod.
#[derive(Debug, Clone, PartialEq)]
pub struct ModMetadata {
    /// Identifier the mod was mounted under (its archive file stem).
    pub id: String,
    /// Display name from the manifest.
    pub name: String,
    pub priority: i64,
    pub overrides: BTreeMap<String, String>,
}

impl ModMetadata {
    pub fn from_manifest(id: impl Into<String>, manifest: ModManifest) -> Self {
        Self {
            id: id.into(),
            name: manifest.name,
            priority: manifest.priority,
            overrides: manifest.overrides,
        }
    }
}

/// Read and parse the manifest of the mod mounted under `mod_id`.
pub fn parse_manifest<N>(namespace: &mut N, mod_id: &str) -> Result<ModMetadata, ParseError>
where
    N: ModNamespace + ?Sized,
{
    let path = manifest_path(mod_id);
    if !namespace.contains(&path) {
        return Err(ParseError::ManifestMissing(path));
    }

    let content = namespace.read_to_string(&path)?;
    parse_manifest_str(&content, mod_id)
}

/// Parse manifest text for the mod `mod_id`.
///
/// Text that is not valid JSON is reported as [`ParseError::InvalidRoot`],
/// the same as a document whose root is an array or scalar.
pub fn parse_manifest_str(content: &str, mod_id: &str) -> Result<ModMetadata, ParseError> {
    // Strip UTF-8 BOM if present
    let content = content.trim_start_matches('\u{feff}').trim();

    let root: Value =
        serde_json::from_str(content).map_err(|e| ParseError::InvalidRoot(e.to_string()))?;

    let Value::Object(object) = root else {
        return Err(ParseError::InvalidRoot(format!(
            "expected an object, found {}",
            json_kind(&root)
        )));
    };

    let manifest = ModManifest {
        name: required_field(&object, "name", &[])?,
        priority: required_field(&object, "priority", &["load_order"])?,
        overrides: required_field(&object, "overrides", &[])?,
    };

    Ok(ModMetadata::from_manifest(mod_id, manifest))
}

/// Deserialize one top-level field, falling back to `aliases` in order.
fn required_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    field: &'static str,
    aliases: &[&str],
) -> Result<T, ParseError> {
    let value = std::iter::once(field)
        .chain(aliases.iter().copied())
        .find_map(|key| object.get(key))
        .ok_or_else(|| ParseError::MalformedField {
            field,
            reason: "missing".to_string(),
        })?;

    T::deserialize(value).map_err(|e| ParseError::MalformedField {
        field,
        reason: e.to_string(),
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
