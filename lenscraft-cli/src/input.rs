use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Read an OCR JSON file from disk
pub fn read_input(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read input file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Pull the fragment array out of an OCR-lens result object.
///
/// `{ "segments": [...] }` yields the array; anything else is returned as-is
/// and left for the core processor to accept or reject.
pub fn extract_fragments(document: Value) -> Value {
    match document {
        Value::Object(mut map) if map.get("segments").is_some_and(Value::is_array) => {
            map.remove("segments").unwrap_or(Value::Null)
        }
        other => other,
    }
}
