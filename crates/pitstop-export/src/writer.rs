//! JSON output files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::ExportError;

const INDENT: &[u8] = b"    ";

/// `<output_dir>/<race_name>.json`.
///
/// # Errors
///
/// Returns [`ExportError::InvalidFileName`] if `race_name` is blank or would
/// escape `output_dir`.
pub fn output_path(output_dir: &Path, race_name: &str) -> Result<PathBuf, ExportError> {
    let name = race_name.trim();
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(ExportError::InvalidFileName(race_name.to_owned()));
    }
    Ok(output_dir.join(format!("{name}.json")))
}

/// Writes `records` as a 4-space indented JSON array, creating `output_dir`
/// if needed and replacing any existing file.
///
/// # Errors
///
/// Returns [`ExportError`] on an unusable race name, a failed directory
/// creation or write, or a serialization failure.
pub fn write_records(
    records: &[Value],
    output_dir: &Path,
    race_name: &str,
) -> Result<PathBuf, ExportError> {
    let path = output_path(output_dir, race_name)?;

    fs::create_dir_all(output_dir).map_err(|source| ExportError::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut buf = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;

    fs::write(&path, &buf).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
