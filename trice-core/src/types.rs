//! Domain types for the trace ID list.
//!
//! Field names of [`Item`] are the on-disk JSON names of `til.json`
//! and must not change.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A trace identifier in `1..=65535`. Zero is reserved and never constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct TraceId(u16);

impl TraceId {
    /// Largest valid identifier.
    pub const MAX: u16 = u16::MAX;

    /// Returns `None` for the reserved value 0.
    pub fn new(id: u16) -> Option<Self> {
        (id != 0).then_some(Self(id))
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl TryFrom<u16> for TraceId {
    type Error = RegistryError;

    fn try_from(id: u16) -> Result<Self, Self::Error> {
        Self::new(id).ok_or(RegistryError::InvalidId(0))
    }
}

impl TryFrom<u32> for TraceId {
    type Error = RegistryError;

    fn try_from(id: u32) -> Result<Self, Self::Error> {
        u16::try_from(id)
            .ok()
            .and_then(Self::new)
            .ok_or(RegistryError::InvalidId(id))
    }
}

impl From<TraceId> for u16 {
    fn from(id: TraceId) -> Self {
        id.0
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// Metadata of one trace call site.
///
/// `removed == 0` is the "currently present in source" sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: TraceId,
    /// Macro name, encoding operand bit width and parameter count (e.g. `TRICE8_7`).
    #[serde(rename = "fmtType")]
    pub fmt_type: String,
    #[serde(rename = "fmtStrg")]
    pub fmt_strg: String,
    /// UTC unix seconds of first observation.
    pub created: i64,
    /// UTC unix seconds the call site was last found missing, or 0.
    pub removed: i64,
}

impl Item {
    pub fn new(id: TraceId, fmt_type: impl Into<String>, fmt_strg: impl Into<String>, created: i64) -> Self {
        Self {
            id,
            fmt_type: fmt_type.into(),
            fmt_strg: fmt_strg.into(),
            created,
            removed: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.removed == 0
    }

    /// True when both the format type and the format string equal the given ones.
    pub fn same_format(&self, fmt_type: &str, fmt_strg: &str) -> bool {
        self.fmt_type == fmt_type && self.fmt_strg == fmt_strg
    }
}

// ---------------------------------------------------------------------------
// Reconciliation outcome
// ---------------------------------------------------------------------------

/// What a single [`Registry::reconcile`](crate::Registry::reconcile) call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// An active item with the same ID and format already existed.
    Unchanged,
    /// A removed item with the same ID and format was found again.
    Revived,
    /// A new item was appended under the hinted (or a fresh) ID.
    Inserted,
    /// The hinted ID was bound to a different format; a new item got a fresh ID.
    /// The item holding `previous` is left as it was.
    Reassigned { previous: TraceId },
}

/// Effective identifier and change flag returned by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciled {
    pub id: TraceId,
    pub changed: bool,
    pub outcome: ReconcileOutcome,
}

impl Reconciled {
    pub(crate) fn new(id: TraceId, outcome: ReconcileOutcome) -> Self {
        Self {
            id,
            changed: outcome != ReconcileOutcome::Unchanged,
            outcome,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
