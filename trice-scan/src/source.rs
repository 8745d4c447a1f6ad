//! Source file discovery and call site patterns.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use crate::error::{io_err, ScanError};

/// File extensions treated as C/C++ sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "h", "cc", "cpp", "cxx", "hh", "hpp"];

/// `TRICE<kind>( Id(<n>), "<fmt>"` — the ID argument and the format string
/// literal (escapes kept verbatim).
pub(crate) static CALL_SITE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?P<head>\b(?P<kind>TRICE[0-9A-Za-z_]*)\s*\(\s*Id\s*\(\s*)(?P<id>\d+)(?P<tail>\s*\)\s*,\s*)"(?P<fmt>(?:[^"\\\n]|\\.)*)""#,
    )
    .expect("call site pattern is valid")
});

/// `TRICE<kind>( Id(<n>)` — only the ID argument.
pub(crate) static ID_ARG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?P<head>\bTRICE[0-9A-Za-z_]*\s*\(\s*)Id\s*\(\s*(?P<id>\d+)\s*\)")
        .expect("ID argument pattern is valid")
});

/// True if `path` has one of the [`SOURCE_EXTENSIONS`].
pub fn is_source_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| SOURCE_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

/// Recursively collect source files below `root`, or `root` itself if it is a file.
///
/// The returned list is sorted so passes run in a deterministic order.
pub fn discover_source_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::SourceNotFound {
            path: root.to_path_buf(),
        });
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Read a source file as UTF-8; `Ok(None)` for files that are not valid UTF-8.
pub(crate) fn read_source(path: &Path) -> Result<Option<String>, ScanError> {
    let bytes = std::fs::read(path).map_err(|e| io_err(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(Some(text)),
        Err(_) => {
            tracing::warn!("skipping non-UTF-8 file {}", path.display());
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
