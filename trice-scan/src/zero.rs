//! `zero` pass: reset every call site ID in a source tree to `Id(0)`.
//!
//! Independent of the ID list; a following `update` pass assigns fresh IDs.

use std::path::Path;

use crate::error::ScanError;
use crate::source::{discover_source_files, read_source, ID_ARG};
use crate::writer::{write_if_changed, WriteResult};

/// Summary of a zero pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZeroReport {
    pub files_scanned: usize,
    /// Call site IDs that were (or would be) reset.
    pub ids_zeroed: usize,
    pub writes: Vec<WriteResult>,
}

/// Replace `Id(n)` with `Id(0)` in every `TRICE…(` call of `text`.
///
/// Returns the new text and the number of IDs that were not already zero.
pub fn zero_ids_in_text(text: &str) -> (String, usize) {
    let mut zeroed = 0;
    let out = ID_ARG.replace_all(text, |caps: &regex::Captures<'_>| {
        if caps["id"].bytes().any(|b| b != b'0') {
            zeroed += 1;
        }
        format!("{}Id(0)", &caps["head"])
    });
    (out.into_owned(), zeroed)
}

/// Run the zero pass over `src`.
pub fn zero_tree(src: &Path, dry_run: bool) -> Result<ZeroReport, ScanError> {
    let mut report = ZeroReport::default();
    for path in discover_source_files(src)? {
        let Some(text) = read_source(&path)? else {
            continue;
        };
        report.files_scanned += 1;
        let (zeroed_text, count) = zero_ids_in_text(&text);
        report.ids_zeroed += count;
        let write = write_if_changed(&path, &text, &zeroed_text, dry_run)?;
        if write.is_change() {
            report.writes.push(write);
        }
    }
    tracing::info!(
        "zeroed {} IDs in {} of {} files",
        report.ids_zeroed,
        report.writes.len(),
        report.files_scanned
    );
    Ok(report)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
