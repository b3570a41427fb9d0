use crate::error::ReportError;
use core_types::Record;
use std::fs;
use std::path::Path;

/// Reads a JSON file holding an array of flat objects.
///
/// Field names and the order of both objects and fields are preserved.
pub fn load(path: &Path) -> Result<Vec<Record>, ReportError> {
    let text = fs::read_to_string(path).map_err(|source| ReportError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<Record> =
        serde_json::from_str(&text).map_err(|source| ReportError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    tracing::info!(path = %path.display(), records = records.len(), "Loaded input file.");
    Ok(records)
}
