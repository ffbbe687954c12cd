//! In-place JSON manifest patching.

use crate::error::{Error, Result};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

/// Set the top-level `field` of the JSON object in `path` to `value`.
///
/// The file is opened once for read-modify-write. The rewritten document may
/// be shorter than the old one, so the file is truncated to the exact new
/// length afterwards. Other fields keep their values and order.
///
/// Not safe for concurrent writers to the same path.
pub fn patch_json_field(path: &Path, field: &str, value: Value) -> Result<()> {
    let mut file = OpenOptions::new()
        .read(true)
        .write(true)
        .open(path)
        .map_err(|e| Error::io(path, e))?;

    let mut document = read_document(&mut file, path)?;
    let Some(object) = document.as_object_mut() else {
        return Err(Error::NotAnObject {
            path: path.to_path_buf(),
        });
    };
    object.insert(field.to_string(), value);

    let mut rendered = serde_json::to_string_pretty(&document).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    rendered.push('\n');

    file.seek(SeekFrom::Start(0))
        .map_err(|e| Error::io(path, e))?;
    file.write_all(rendered.as_bytes())
        .map_err(|e| Error::io(path, e))?;
    file.set_len(rendered.len() as u64)
        .map_err(|e| Error::io(path, e))?;
    file.flush().map_err(|e| Error::io(path, e))?;

    log::debug!("patched {field} in {}", path.display());
    Ok(())
}

/// Read the top-level `field` of the JSON object in `path`.
///
/// Returns `Ok(None)` when the document is an object without that field.
pub fn read_json_field(path: &Path, field: &str) -> Result<Option<Value>> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let document = read_document(&mut file, path)?;
    match document {
        Value::Object(object) => Ok(object.get(field).cloned()),
        _ => Err(Error::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

fn read_document(file: &mut File, path: &Path) -> Result<Value> {
    let mut content = String::new();
    file.read_to_string(&mut content)
        .map_err(|e| Error::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::fs;

    #[test]
    fn test_patch_main_keeps_other_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"main": "a", "other": 1}"#).unwrap();

        patch_json_field(&path, "main", json!("./loadNapCat.cjs")).unwrap();

        let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed["main"], "./loadNapCat.cjs");
        assert_eq!(parsed["other"], 1);
    }

    #[test]
    fn test_patch_truncates_when_shrinking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        let long_main = "./application.asar/app_launcher/".repeat(20) + "index.js";
        fs::write(
            &path,
            serde_json::to_string_pretty(&json!({ "main": long_main, "name": "qq" })).unwrap(),
        )
        .unwrap();
        let before = fs::metadata(&path).unwrap().len();

        patch_json_field(&path, "main", json!("./x.cjs")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!((content.len() as u64) < before);
        assert_eq!(fs::metadata(&path).unwrap().len(), content.len() as u64);
        // Trailing garbage would make this fail to parse.
        let parsed: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed, json!({ "main": "./x.cjs", "name": "qq" }));
    }

    #[test]
    fn test_patch_preserves_field_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"name": "qq", "main": "a", "version": "3.2.21"}"#).unwrap();

        patch_json_field(&path, "main", json!("./loadNapCat.cjs")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let name = content.find("\"name\"").unwrap();
        let main = content.find("\"main\"").unwrap();
        let version = content.find("\"version\"").unwrap();
        assert!(name < main && main < version);
    }

    #[test]
    fn test_patch_adds_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{}").unwrap();

        patch_json_field(&path, "main", json!("./loadNapCat.cjs")).unwrap();

        assert_eq!(
            read_json_field(&path, "main").unwrap(),
            Some(json!("./loadNapCat.cjs"))
        );
    }

    #[test]
    fn test_malformed_document_is_parse_error_and_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "{\"main\": ").unwrap();

        let err = patch_json_field(&path, "main", json!("x")).unwrap_err();

        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{\"main\": ");
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, "[1, 2]").unwrap();

        let err = patch_json_field(&path, "main", json!("x")).unwrap_err();
        assert!(matches!(err, Error::NotAnObject { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = patch_json_field(&dir.path().join("nope.json"), "main", json!("x")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_read_missing_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("package.json");
        fs::write(&path, r#"{"name": "qq"}"#).unwrap();
        assert_eq!(read_json_field(&path, "main").unwrap(), None);
    }
}
