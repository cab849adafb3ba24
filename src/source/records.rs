//! Raw record files: the hand-off format between `scrape` and `build`.

use crate::types::RawVideoRecord;
use crate::{CatalogError, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Load a JSON array of raw records.
///
/// A missing file or an empty array is [`CatalogError::SourceUnavailable`],
/// since either leaves nothing to build a catalog from.
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<RawVideoRecord>> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            CatalogError::SourceUnavailable(format!("{} does not exist", path.display()))
        }
        _ => CatalogError::Io(e),
    })?;

    let records: Vec<RawVideoRecord> = serde_json::from_str(&json)?;
    if records.is_empty() {
        return Err(CatalogError::SourceUnavailable(format!(
            "{} contains no records",
            path.display()
        )));
    }

    log::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Write raw records as a pretty-printed JSON array, creating parent
/// directories as needed.
pub fn save_records(path: impl AsRef<Path>, records: &[RawVideoRecord]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(records)?)?;
    log::debug!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}
