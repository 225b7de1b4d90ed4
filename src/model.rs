use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::errors::HeritageError;

/// One ethnicity-specific source file.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFile {
    pub path: PathBuf,
    /// `metadata.ethnicity`, or "Unknown".
    pub ethnicity: String,
    /// Records are kept as raw JSON so unknown fields survive a merge.
    pub families: Vec<Value>,
}

/// The merged output, `data/heritage-data.json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnifiedFile {
    pub metadata: UnifiedMetadata,
    pub families: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnifiedMetadata {
    pub version: String,
    /// `YYYY-MM-DD`
    pub last_updated: String,
    pub total_families: usize,
    pub ethnicities: EthnicityTally,
    pub generated_from: Vec<String>,
}

/// Record count per ethnicity label, in order of first appearance.
///
/// Inserting a label again replaces its count but keeps its position.
pub type EthnicityTally = IndexMap<String, usize>;

/// Read and parse a whole JSON document.
pub fn read_json(path: &Path) -> Result<Value, HeritageError> {
    let raw = fs::read_to_string(path).map_err(|e| HeritageError::io(path, e))?;
    serde_json::from_str(&raw).map_err(|e| HeritageError::parse(path, e))
}

/// Write `value` as 2-space indented JSON, non-ASCII text left unescaped.
pub fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), HeritageError> {
    let file = File::create(path).map_err(|e| HeritageError::io(path, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, value).map_err(|e| HeritageError::io(path, e.into()))?;
    out.flush().map_err(|e| HeritageError::io(path, e))
}

/// Take the `families` array out of a parsed document; absent means empty.
pub fn families_of(doc: &mut Value, path: &Path) -> Result<Vec<Value>, HeritageError> {
    let Some(obj) = doc.as_object_mut() else {
        return Err(HeritageError::shape(path, "top-level JSON is not an object"));
    };
    match obj.remove("families") {
        None => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(HeritageError::shape(path, "'families' is not an array")),
    }
}
