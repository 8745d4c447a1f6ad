//! `trice update` — assign IDs in a source tree and update the ID list.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use trice_scan::{update_tree, UpdateOptions, UpdateReport, WriteResult};

use super::absolute;

/// Arguments for `trice update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Source directory or single file.
    #[arg(long, default_value = ".")]
    pub src: PathBuf,

    /// ID list path.
    #[arg(long, default_value = "til.json")]
    pub list: PathBuf,

    /// Show what would change without writing any file.
    #[arg(long)]
    pub dry_run: bool,

    /// When all IDs are taken, hand out IDs removed more than 30 days ago.
    #[arg(long)]
    pub reuse_removed: bool,
}

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        let src = absolute(&self.src)?;
        let list = absolute(&self.list)?;
        let opts = UpdateOptions {
            dry_run: self.dry_run,
            reuse_removed: self.reuse_removed,
        };

        let report = update_tree(&src, &list, opts).with_context(|| {
            format!("failed update on {} with {}", src.display(), list.display())
        })?;

        print_report(&report, &list, self.dry_run);
        Ok(())
    }
}

fn print_report(report: &UpdateReport, list: &std::path::Path, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };

    for w in &report.writes {
        match w {
            WriteResult::Written { path } => println!("{prefix}  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("{prefix}  ~  {}", path.display()),
            WriteResult::Unchanged { .. } => {}
        }
    }

    println!(
        "{prefix}{} call sites in {} files: {} new, {} revived, {} reassigned, {} removed",
        report.call_sites,
        report.files_scanned,
        report.inserted,
        report.revived,
        report.reassigned,
        report.removed,
    );
    if report.list_changed {
        println!("{prefix}{} IDs in list {}", report.list_len, list.display());
    } else {
        println!("{prefix}✓ ID list {} unchanged", list.display());
    }
}
