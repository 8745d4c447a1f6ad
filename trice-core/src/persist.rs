//! JSON persistence of the ID list.
//!
//! # File format
//!
//! ```text
//! [
//! 	{
//! 		"id": 12345,
//! 		"fmtType": "TRICE0",
//! 		"fmtStrg": "Hi",
//! 		"created": 1600000000,
//! 		"removed": 0
//! 	}
//! ]
//! ```
//!
//! Tab-indented, fields in declaration order, so the file diffs cleanly under
//! version control. Save flow: serialize → `<file>.tmp` sibling → `rename`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::{io_err, RegistryError};
use crate::registry::Registry;
use crate::types::Item;

/// Parse a JSON document into items, without touching the filesystem.
pub fn from_json(path: &Path, contents: &str) -> Result<Vec<Item>, RegistryError> {
    serde_json::from_str(contents).map_err(|e| RegistryError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Serialize items as a tab-indented JSON array.
pub fn to_json(items: &[Item]) -> Result<Vec<u8>, RegistryError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"\t"));
    items.serialize(&mut ser)?;
    Ok(buf)
}

/// `<dir>/<file>.tmp`, always in the same directory as the target (same filesystem).
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

impl Registry {
    /// Load the list at `path`.
    ///
    /// Returns `RegistryError::ListNotFound` if absent, `RegistryError::Io` on
    /// other read failures and `RegistryError::Parse` (with path + line context)
    /// if the content is not a JSON array of items.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.reload(path)?;
        Ok(registry)
    }

    /// Like [`Registry::load`], but a missing file yields an empty registry.
    pub fn load_or_default(path: &Path) -> Result<Self, RegistryError> {
        match Self::load(path) {
            Err(RegistryError::ListNotFound { .. }) => Ok(Self::new()),
            other => other,
        }
    }

    /// Replace this registry's items with the contents of `path`.
    ///
    /// On error the registry is left unchanged.
    pub fn reload(&mut self, path: &Path) -> Result<(), RegistryError> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RegistryError::ListNotFound {
                path: path.to_path_buf(),
            },
            _ => io_err(path, e),
        })?;
        let items = from_json(path, &contents)?;
        self.replace_items(items);
        Ok(())
    }

    /// Atomically write the list to `path`.
    ///
    /// A crash before the rename leaves only an orphan `.tmp` next to an
    /// intact previous list.
    pub fn save(&self, path: &Path) -> Result<(), RegistryError> {
        let json = to_json(self.items())?;
        let tmp = tmp_path(path);

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;
        }
        std::fs::write(&tmp, json).map_err(|e| io_err(&tmp, e))?;
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(path, e));
        }
        tracing::debug!("saved {} items to {}", self.len(), path.display());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TraceId;
    use tempfile::TempDir;

    #[test]
    fn tmp_path_is_sibling() {
        let tmp = tmp_path(Path::new("/a/b/til.json"));
        assert_eq!(tmp, PathBuf::from("/a/b/til.json.tmp"));
    }

    #[test]
    fn output_is_tab_indented() {
        let items = vec![Item::new(TraceId::new(12345).unwrap(), "TR0", "Hi", 0)];
        let text = String::from_utf8(to_json(&items).unwrap()).unwrap();
        assert_eq!(
            text,
            "[\n\t{\n\t\t\"id\": 12345,\n\t\t\"fmtType\": \"TR0\",\n\t\t\"fmtStrg\": \"Hi\",\n\t\t\"created\": 0,\n\t\t\"removed\": 0\n\t}\n]"
        );
    }

    #[test]
    fn empty_list_round_trips() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("til.json");
        Registry::with_seed(0).save(&path).expect("save");
        let loaded = Registry::load(&path).expect("load");
        assert!(loaded.is_empty());
    }

    #[test]
    fn missing_file_is_list_not_found() {
        let dir = TempDir::new().expect("tempdir");
        let err = Registry::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, RegistryError::ListNotFound { .. }));
        assert!(Registry::load_or_default(&dir.path().join("nope.json"))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn failed_reload_keeps_items() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("til.json");
        std::fs::write(&path, "{ not json").unwrap();
        let mut reg = Registry::from_items(vec![Item::new(TraceId::new(1).unwrap(), "T", "s", 0)]);
        assert!(reg.reload(&path).is_err());
        assert_eq!(reg.len(), 1);
    }
}
