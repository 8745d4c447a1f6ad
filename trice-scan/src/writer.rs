//! Atomic source file writer.
//!
//! Write flow: compare with current content → skip if identical →
//! `<file>.trice.tmp` sibling → `rename` over the original (atomic on POSIX).

use std::path::{Path, PathBuf};

use crate::error::{io_err, ScanError};

/// Outcome of an individual file write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File content was replaced.
    Written { path: PathBuf },
    /// New content equals the current content; nothing was written.
    Unchanged { path: PathBuf },
    /// `--dry-run` mode: the file *would* have been written.
    WouldWrite { path: PathBuf },
}

impl WriteResult {
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path }
            | WriteResult::Unchanged { path }
            | WriteResult::WouldWrite { path } => path,
        }
    }

    /// True for `Written` and `WouldWrite`.
    pub fn is_change(&self) -> bool {
        !matches!(self, WriteResult::Unchanged { .. })
    }
}

/// Replace `path`'s content with `new`, given its current content `old`.
pub fn write_if_changed(
    path: &Path,
    old: &str,
    new: &str,
    dry_run: bool,
) -> Result<WriteResult, ScanError> {
    if old == new {
        return Ok(WriteResult::Unchanged {
            path: path.to_path_buf(),
        });
    }

    if dry_run {
        tracing::info!("[dry-run] would write: {}", path.display());
        return Ok(WriteResult::WouldWrite {
            path: path.to_path_buf(),
        });
    }

    let tmp = PathBuf::from(format!("{}.trice.tmp", path.display()));
    std::fs::write(&tmp, new).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }

    tracing::info!("wrote: {}", path.display());
    Ok(WriteResult::Written {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
