//! The trace ID list.
//!
//! [`Registry`] owns the ordered items (the persisted order of `til.json`)
//! together with an identifier-keyed [`IdIndex`] and an [`IdAllocator`].
//! The item vector is never exposed mutably, so every change goes through
//! [`Registry::reconcile`] or [`Registry::mark_removed_except`] and the
//! index and allocator stay in step with it.
//!
//! Items are never deleted. A call site missing from the latest scan gets a
//! `removed` timestamp; finding it again clears the timestamp.

use std::collections::HashSet;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::alloc::{IdAllocator, REUSE_AFTER_SECS};
use crate::error::RegistryError;
use crate::index::IdIndex;
use crate::types::{Item, ReconcileOutcome, Reconciled, TraceId};

/// Ordered collection of [`Item`]s with O(1) lookup by identifier.
#[derive(Debug, Clone)]
pub struct Registry {
    items: Vec<Item>,
    index: IdIndex,
    alloc: IdAllocator,
    rng: StdRng,
    reuse_removed: bool,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Registry {
    fn eq(&self, other: &Self) -> bool {
        self.items == other.items
    }
}

impl Eq for Registry {}

impl Registry {
    /// Empty registry with an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Empty registry with a deterministic RNG.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            items: Vec::new(),
            index: IdIndex::default(),
            alloc: IdAllocator::new(),
            rng,
            reuse_removed: false,
        }
    }

    /// Build a registry from items in list order, rebuilding index and allocator.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut registry = Self::new();
        registry.replace_items(items);
        registry
    }

    /// Allow a full ID space to hand out identifiers removed for at least
    /// [`REUSE_AFTER_SECS`]. Off by default.
    pub fn with_reuse_removed(mut self, reuse: bool) -> Self {
        self.reuse_removed = reuse;
        self
    }

    pub(crate) fn replace_items(&mut self, items: Vec<Item>) {
        self.items = Vec::with_capacity(items.len());
        self.index = IdIndex::default();
        self.alloc = IdAllocator::new();
        for item in items {
            self.push(item);
        }
        let ids: HashSet<TraceId> = self.items.iter().map(|i| i.id).collect();
        for id in ids {
            self.refresh_retired(id);
        }
    }

    // -----------------------------------------------------------------------
    // Read access
    // -----------------------------------------------------------------------

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items whose call site is currently present.
    pub fn active_count(&self) -> usize {
        self.items.iter().filter(|i| i.is_active()).count()
    }

    pub fn allocator(&self) -> &IdAllocator {
        &self.alloc
    }

    /// Position of the item the decoder should use for `id`.
    ///
    /// If several items share the identifier, the first active one wins,
    /// otherwise the first one in list order.
    pub fn position(&self, id: u16) -> Result<usize, RegistryError> {
        let positions = TraceId::new(id)
            .map(|id| self.index.positions(id))
            .unwrap_or_default();
        positions
            .iter()
            .copied()
            .find(|&p| self.items[p].is_active())
            .or_else(|| positions.first().copied())
            .ok_or(RegistryError::NotFound { id })
    }

    /// Resolve a wire identifier to its item.
    pub fn locate(&self, id: u16) -> Result<&Item, RegistryError> {
        self.position(id).map(|p| &self.items[p])
    }

    pub fn get(&self, id: u16) -> Option<&Item> {
        self.locate(id).ok()
    }

    // -----------------------------------------------------------------------
    // Reconciliation
    // -----------------------------------------------------------------------

    /// Reconcile one discovered call site, stamping new items with the current time.
    ///
    /// See [`Registry::reconcile_at`].
    pub fn reconcile(
        &mut self,
        hint: u16,
        fmt_type: &str,
        fmt_strg: &str,
    ) -> Result<Reconciled, RegistryError> {
        self.reconcile_at(hint, fmt_type, fmt_strg, Utc::now().timestamp())
    }

    /// Reconcile one discovered call site `(hint, fmt_type, fmt_strg)` at time `now`.
    ///
    /// - same ID and format, active: nothing changes;
    /// - same ID and format, removed: the removal mark is cleared;
    /// - same ID, different format: a new item is appended under a fresh ID and
    ///   the existing item is kept untouched under the old one;
    /// - unknown ID: a new item is appended under the hint, or under a fresh ID
    ///   when the hint is 0.
    ///
    /// When several items share the ID, the one with the same format is
    /// consulted. A removed item is not revived while another item holds its
    /// ID; the call site is treated as a different format instead, so at most
    /// one item per ID is ever active.
    pub fn reconcile_at(
        &mut self,
        hint: u16,
        fmt_type: &str,
        fmt_strg: &str,
        now: i64,
    ) -> Result<Reconciled, RegistryError> {
        let Some(id) = TraceId::new(hint) else {
            let fresh = self.fresh_id(now)?;
            self.push(Item::new(fresh, fmt_type, fmt_strg, now));
            tracing::debug!("new ID {fresh} for {fmt_type} {fmt_strg:?}");
            return Ok(Reconciled::new(fresh, ReconcileOutcome::Inserted));
        };

        let positions = self.index.positions(id);
        let known = !positions.is_empty();
        let matching = positions
            .iter()
            .copied()
            .find(|&p| self.items[p].same_format(fmt_type, fmt_strg));
        let held_by_other = positions.iter().any(|&p| {
            let item = &self.items[p];
            item.is_active() && !item.same_format(fmt_type, fmt_strg)
        });

        match matching {
            Some(pos) if self.items[pos].is_active() => {
                return Ok(Reconciled::new(id, ReconcileOutcome::Unchanged));
            }
            // A recycled ID stays with its new owner; the returning call site
            // falls through to the collision branch.
            Some(pos) if !held_by_other => {
                self.items[pos].removed = 0;
                self.alloc.reinstate(id);
                tracing::debug!("ID {id} is back in source");
                return Ok(Reconciled::new(id, ReconcileOutcome::Revived));
            }
            _ => {}
        }

        if known {
            let fresh = self.fresh_id(now)?;
            tracing::warn!(
                "ID {id} is bound to a different format; {fmt_type} {fmt_strg:?} gets new ID {fresh}"
            );
            self.push(Item::new(fresh, fmt_type, fmt_strg, now));
            return Ok(Reconciled::new(fresh, ReconcileOutcome::Reassigned { previous: id }));
        }

        self.push(Item::new(id, fmt_type, fmt_strg, now));
        tracing::debug!("added ID {id} for {fmt_type} {fmt_strg:?}");
        Ok(Reconciled::new(id, ReconcileOutcome::Inserted))
    }

    /// Stamp `removed = now` on every active item whose ID is not in `seen`.
    ///
    /// Returns the number of items newly marked removed.
    pub fn mark_removed_except(&mut self, seen: &HashSet<TraceId>, now: i64) -> usize {
        let mut touched = HashSet::new();
        let mut count = 0;
        for item in self.items.iter_mut() {
            if item.is_active() && !seen.contains(&item.id) {
                item.removed = now;
                touched.insert(item.id);
                count += 1;
            }
        }
        for id in touched {
            self.refresh_retired(id);
        }
        count
    }

    // -----------------------------------------------------------------------
    // Private helpers
    // -----------------------------------------------------------------------

    fn push(&mut self, item: Item) {
        let id = item.id;
        self.index.insert(id, self.items.len());
        self.alloc.mark_used(id);
        self.items.push(item);
    }

    fn fresh_id(&mut self, now: i64) -> Result<TraceId, RegistryError> {
        let reuse_before = self.reuse_removed.then(|| now - REUSE_AFTER_SECS);
        self.alloc.allocate(&mut self.rng, reuse_before)
    }

    fn refresh_retired(&mut self, id: TraceId) {
        let mut latest_removal = None;
        for &p in self.index.positions(id) {
            let item = &self.items[p];
            if item.is_active() {
                self.alloc.reinstate(id);
                return;
            }
            latest_removal = latest_removal.max(Some(item.removed));
        }
        if let Some(at) = latest_removal {
            self.alloc.retire(id, at);
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
