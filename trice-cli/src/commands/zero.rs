//! `trice zero --src <dir>` — reset every call site ID to `Id(0)`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use trice_scan::{zero_tree, WriteResult};

use super::absolute;

/// Arguments for `trice zero`.
#[derive(Args, Debug)]
pub struct ZeroArgs {
    /// Source tree root (required).
    #[arg(long)]
    pub src: PathBuf,

    /// Show what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}

impl ZeroArgs {
    pub fn run(self) -> Result<()> {
        let src = absolute(&self.src)?;
        let report = zero_tree(&src, self.dry_run)
            .with_context(|| format!("failed to zero IDs below {}", src.display()))?;

        let prefix = if self.dry_run { "[dry-run] " } else { "" };
        for w in &report.writes {
            if let WriteResult::Written { path } | WriteResult::WouldWrite { path } = w {
                println!("{prefix}  ✎  {}", path.display());
            }
        }
        println!(
            "{prefix}{} IDs zeroed in {} of {} files",
            report.ids_zeroed,
            report.writes.len(),
            report.files_scanned
        );
        Ok(())
    }
}
