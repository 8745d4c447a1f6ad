pub mod check;
pub mod lookup;
pub mod update;
pub mod zero;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Resolve `path` against the current directory.
pub(crate) fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("could not determine current directory")?;
    Ok(cwd.join(path))
}
