//! Per-directory metadata files merged into matrix entries.

use std::path::Path;

use serde_json::{Map, Value};

use crate::core::matrix::MatrixEntry;

/// Key owned by the entry itself; metadata may never override it.
pub const DIRECTORY_KEY: &str = "directory";

#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("{0}")]
    Read(#[from] std::io::Error),
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("expected a key-value mapping, found {0}")]
    NotAMapping(&'static str),
    #[error("Unsupported metadata file format: {0}")]
    Unsupported(String),
}

/// Metadata file formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataFormat {
    Json,
    Yaml,
    Unsupported,
}

type ParseFn = fn(&str) -> Result<Value, MetadataError>;

/// Extension (lowercase, without dot) → format.
const FORMATS: &[(&str, MetadataFormat)] = &[
    ("json", MetadataFormat::Json),
    ("yaml", MetadataFormat::Yaml),
    ("yml", MetadataFormat::Yaml),
];

fn parse_json(content: &str) -> Result<Value, MetadataError> {
    Ok(serde_json::from_str(content)?)
}

fn parse_yaml(content: &str) -> Result<Value, MetadataError> {
    Ok(serde_yaml::from_str(content)?)
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl MetadataFormat {
    pub fn from_file_name(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        FORMATS
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, format)| *format)
            .unwrap_or(Self::Unsupported)
    }

    fn parser(self) -> Option<ParseFn> {
        match self {
            Self::Json => Some(parse_json),
            Self::Yaml => Some(parse_yaml),
            Self::Unsupported => None,
        }
    }

    /// Parse `content` into a flat key-value mapping. An empty document gives an empty mapping.
    pub fn parse(self, content: &str) -> Result<Map<String, Value>, MetadataError> {
        let parse = self
            .parser()
            .ok_or_else(|| MetadataError::Unsupported(format!("{:?}", self)))?;
        match parse(content)? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            other => Err(MetadataError::NotAMapping(kind_name(&other))),
        }
    }
}

/// Extension as written in the file name, for messages.
fn display_extension(file_name: &str) -> String {
    Path::new(file_name)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Matrix entry for `dir`, with the fields of `root/dir/file_name` when it can be read.
///
/// Every failure is logged and leaves the entry with only its `directory` key.
pub fn enrich(root: &Path, dir: &str, file_name: &str) -> MatrixEntry {
    let mut entry = MatrixEntry::new(dir);
    let path = root.join(dir).join(file_name);
    log::debug!("Checking for metadata file at {}", path.display());

    if !path.is_file() {
        log::warn!(
            "Metadata file not found for directory {}: {}",
            dir,
            path.display()
        );
        return entry;
    }

    let format = MetadataFormat::from_file_name(file_name);
    if format == MetadataFormat::Unsupported {
        log::warn!(
            "Unsupported metadata file format: {}. Skipping metadata for {}.",
            display_extension(file_name),
            dir
        );
        return entry;
    }

    let parsed = std::fs::read_to_string(&path)
        .map_err(MetadataError::from)
        .and_then(|content| format.parse(&content));
    match parsed {
        Ok(fields) => {
            merge(&mut entry, fields);
            log::debug!("Successfully parsed metadata for {}", dir);
        }
        Err(e) => log::warn!("Failed to parse metadata file for directory {}: {}", dir, e),
    }
    entry
}

/// Copy `fields` onto the entry, dropping any `directory` key.
pub fn merge(entry: &mut MatrixEntry, fields: Map<String, Value>) {
    for (key, value) in fields {
        if key == DIRECTORY_KEY {
            log::warn!(
                "'{}' key found in metadata for {}. It will be ignored.",
                DIRECTORY_KEY,
                entry.directory
            );
            continue;
        }
        entry.fields.insert(key, value);
    }
}
