//! Matrix output shapes.

use serde::Serialize;
use serde_json::{Map, Value};

/// One `include` item: the directory name followed by its metadata fields in file order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixEntry {
    pub directory: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl MatrixEntry {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            fields: Map::new(),
        }
    }
}

/// `{"directory": [...]}` without metadata, `{"include": [...]}` with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Matrix {
    Directories { directory: Vec<String> },
    Include { include: Vec<MatrixEntry> },
}

impl Matrix {
    pub fn len(&self) -> usize {
        match self {
            Self::Directories { directory } => directory.len(),
            Self::Include { include } => include.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compact JSON, as consumed by `fromJSON()` in workflow expressions.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
