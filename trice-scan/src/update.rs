//! `update` pass: reconcile every call site in a source tree with the ID list.
//!
//! 1. Load the list (a missing list starts empty).
//! 2. For each source file, reconcile each `TRICE…( Id(n), "fmt"` call site
//!    and compute the text with effective IDs, in memory.
//! 3. Mark list items not seen during the pass as removed.
//! 4. Save the list if anything changed.
//! 5. Rewrite the sources whose IDs changed.
//!
//! Any failure up to step 4 leaves both the list and the sources untouched.
//!
//! In dry-run mode the same report is computed but nothing is written.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use trice_core::{ReconcileOutcome, Registry, RegistryError, TraceId};

use crate::error::ScanError;
use crate::source::{discover_source_files, read_source, CALL_SITE};
use crate::writer::{write_if_changed, WriteResult};

/// Options for [`update_tree`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Compute changes without writing sources or the list.
    pub dry_run: bool,
    /// Let a full ID space hand out long-removed IDs again.
    pub reuse_removed: bool,
}

/// Summary of an update pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    pub files_scanned: usize,
    pub writes: Vec<WriteResult>,
    pub call_sites: usize,
    pub inserted: usize,
    pub revived: usize,
    pub reassigned: usize,
    pub removed: usize,
    /// Items in the list after the pass.
    pub list_len: usize,
    /// The list file was (or in dry-run, would have been) written.
    pub list_changed: bool,
}

impl UpdateReport {
    /// Source files whose IDs were (or would be) rewritten.
    pub fn rewritten(&self) -> impl Iterator<Item = &Path> {
        self.writes.iter().filter(|w| w.is_change()).map(WriteResult::path)
    }

    fn record(&mut self, outcome: ReconcileOutcome) {
        match outcome {
            ReconcileOutcome::Unchanged => {}
            ReconcileOutcome::Revived => self.revived += 1,
            ReconcileOutcome::Inserted => self.inserted += 1,
            ReconcileOutcome::Reassigned { .. } => self.reassigned += 1,
        }
    }
}

/// Run the update pass over `src` against the list at `list`.
pub fn update_tree(src: &Path, list: &Path, opts: UpdateOptions) -> Result<UpdateReport, ScanError> {
    update_tree_at(src, list, opts, Utc::now().timestamp())
}

/// [`update_tree`] with an explicit pass timestamp (unix seconds).
pub fn update_tree_at(
    src: &Path,
    list: &Path,
    opts: UpdateOptions,
    now: i64,
) -> Result<UpdateReport, ScanError> {
    let mut registry = Registry::load_or_default(list)?.with_reuse_removed(opts.reuse_removed);
    let files = discover_source_files(src)?;

    let mut report = UpdateReport::default();
    let mut seen = HashSet::new();
    let mut pending = Vec::new();

    for path in &files {
        let Some(text) = read_source(path)? else {
            continue;
        };
        report.files_scanned += 1;
        let updated = update_text(&mut registry, &text, &mut seen, &mut report, now)?;
        if updated != text {
            pending.push((path, text, updated));
        }
    }

    report.removed = registry.mark_removed_except(&seen, now);
    report.list_len = registry.len();
    report.list_changed =
        report.inserted + report.revived + report.reassigned + report.removed > 0;

    // The list goes first: a source must never carry an ID the list lacks.
    if report.list_changed && !opts.dry_run {
        registry.save(list)?;
        tracing::info!("{} IDs in list {}", registry.len(), list.display());
    }

    for (path, old, new) in pending {
        report.writes.push(write_if_changed(path, &old, &new, opts.dry_run)?);
    }

    Ok(report)
}

/// Reconcile all call sites in `text`, returning the text with effective IDs.
///
/// Every effective ID is added to `seen`.
pub fn update_text(
    registry: &mut Registry,
    text: &str,
    seen: &mut HashSet<TraceId>,
    report: &mut UpdateReport,
    now: i64,
) -> Result<String, RegistryError> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in CALL_SITE.captures_iter(text) {
        let (Some(id_match), Some(kind), Some(fmt)) =
            (caps.name("id"), caps.name("kind"), caps.name("fmt"))
        else {
            continue;
        };
        let hint = id_match.as_str().parse::<u16>().unwrap_or_else(|_| {
            tracing::warn!("ID {} out of range, assigning a new one", id_match.as_str());
            0
        });

        let r = registry.reconcile_at(hint, kind.as_str(), fmt.as_str(), now)?;
        report.call_sites += 1;
        report.record(r.outcome);
        seen.insert(r.id);

        let effective = r.id.to_string();
        if id_match.as_str() != effective {
            tracing::debug!("{}: Id({}) -> Id({})", kind.as_str(), id_match.as_str(), r.id);
            out.push_str(&text[last..id_match.start()]);
            out.push_str(&effective);
            last = id_match.end();
        }
    }

    out.push_str(&text[last..]);
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
