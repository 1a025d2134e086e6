//! Filesystem helpers shared across the installation pipeline.
//!
//! All settings writes in this crate go through [`atomic_write`]: content is
//! written to a temporary file in the destination directory and renamed into
//! place, so the final path is never observed partially written. On any write
//! failure the temporary file is removed before the error propagates.

use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Create a directory and all of its parents if they don't exist.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .with_context(|| format!("Failed to create directory {}", path.display()))
}

/// Write `content` to `path` atomically via a temp file and rename.
///
/// The temporary file is created in the same directory as the destination so
/// the rename never crosses a filesystem boundary. If the write or the rename
/// fails, the temporary file is cleaned up and the error propagates.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    ensure_dir(dir)?;

    let mut temp = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    temp.write_all(content)
        .with_context(|| format!("Failed to write temp file for {}", path.display()))?;
    // persist() renames into place; on failure the temp file is dropped and
    // removed before we return.
    temp.persist(path)
        .with_context(|| format!("Failed to rename temp file into {}", path.display()))?;
    Ok(())
}

/// Read and parse a JSON file.
pub fn read_json_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON from {}", path.display()))
}

/// Serialize `value` as pretty-printed JSON and write it atomically.
///
/// Key order is preserved as-is (serde_json is built with `preserve_order`),
/// and the output ends with a trailing newline.
pub fn write_json_atomic(path: &Path, value: &Value) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value)
        .with_context(|| format!("Failed to serialize JSON for {}", path.display()))?;
    content.push('\n');
    atomic_write(path, content.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a/b/c.txt");
        atomic_write(&path, b"hello").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f.txt");
        fs::write(&path, "old").unwrap();
        atomic_write(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_files() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("f.txt");
        atomic_write(&path, b"data").unwrap();
        let entries: Vec<_> = fs::read_dir(temp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_json_round_trips_with_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let value = json!({"env": {"X": "1"}, "list": [1, 2]});
        write_json_atomic(&path, &value).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        assert_eq!(read_json_file(&path).unwrap(), value);
    }

    #[test]
    fn test_write_json_preserves_key_order() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("settings.json");
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        write_json_atomic(&path, &value).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let z = raw.find("\"z\"").unwrap();
        let a = raw.find("\"a\"").unwrap();
        let m = raw.find("\"m\"").unwrap();
        assert!(z < a && a < m);
    }

    #[test]
    fn test_read_json_file_reports_parse_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(read_json_file(&path).is_err());
    }
}
