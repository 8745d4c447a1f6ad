//! Identifier allocation.
//!
//! [`IdAllocator`] tracks every identifier bound to an item (active or removed)
//! in a 65536-bit set, so an allocation decision never scans the item list and
//! always terminates. Identifiers whose items are all removed are additionally
//! kept in a queue ordered by removal time; when the space is full and reuse
//! is enabled, the longest-removed one is handed out again.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use rand::Rng;

use crate::error::RegistryError;
use crate::types::TraceId;

/// Identifiers must have been removed this long (seconds) before reuse.
pub const REUSE_AFTER_SECS: i64 = 30 * 24 * 60 * 60;

/// Random draws attempted before falling back to picking the k-th free ID.
const MAX_DRAWS: usize = 32;

const WORDS: usize = 1 << 10;

/// Tracks in-use and retired identifiers.
#[derive(Clone)]
pub struct IdAllocator {
    used: Box<[u64; WORDS]>,
    count: usize,
    /// `(removed_at, id)` of identifiers with no active item, oldest first.
    retired: BTreeSet<(i64, u16)>,
    retired_at: HashMap<u16, i64>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self {
            used: Box::new([0; WORDS]),
            count: 0,
            retired: BTreeSet::new(),
            retired_at: HashMap::new(),
        }
    }
}

impl fmt::Debug for IdAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdAllocator")
            .field("used", &self.count)
            .field("retired", &self.retired.len())
            .finish()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, id: u16) -> bool {
        self.used[usize::from(id) >> 6] & (1u64 << (id & 63)) != 0
    }

    /// Number of identifiers currently bound.
    pub fn used_count(&self) -> usize {
        self.count
    }

    /// Number of identifiers still free (never bound).
    pub fn free_count(&self) -> usize {
        usize::from(TraceId::MAX) - self.count
    }

    pub fn mark_used(&mut self, id: TraceId) {
        let id = id.get();
        if !self.is_used(id) {
            self.used[usize::from(id) >> 6] |= 1u64 << (id & 63);
            self.count += 1;
        }
    }

    /// Record that `id` has no active item since `removed_at`.
    pub fn retire(&mut self, id: TraceId, removed_at: i64) {
        self.reinstate(id);
        self.retired.insert((removed_at, id.get()));
        self.retired_at.insert(id.get(), removed_at);
    }

    /// Record that `id` has an active item again.
    pub fn reinstate(&mut self, id: TraceId) {
        if let Some(at) = self.retired_at.remove(&id.get()) {
            self.retired.remove(&(at, id.get()));
        }
    }

    /// The longest-retired identifier and its removal time.
    pub fn oldest_retired(&self) -> Option<(TraceId, i64)> {
        self.retired
            .first()
            .and_then(|&(at, id)| TraceId::new(id).map(|id| (id, at)))
    }

    /// Pick an identifier not bound to any item.
    ///
    /// Uniform over the free space. With `reuse_before = Some(t)`, a full space
    /// falls back to the oldest identifier retired at or before `t`; the caller
    /// owns binding it (the allocator reinstates it here).
    pub fn allocate<R: Rng>(
        &mut self,
        rng: &mut R,
        reuse_before: Option<i64>,
    ) -> Result<TraceId, RegistryError> {
        let free = self.free_count();
        if free > 0 {
            let id = self.draw_free(rng, free)?;
            self.mark_used(id);
            return Ok(id);
        }
        if let (Some(cutoff), Some((id, at))) = (reuse_before, self.oldest_retired()) {
            if at <= cutoff {
                tracing::info!("ID space full, reusing ID {id} removed at {at}");
                self.reinstate(id);
                return Ok(id);
            }
        }
        Err(RegistryError::AllocationExhausted)
    }

    fn draw_free<R: Rng>(&self, rng: &mut R, free: usize) -> Result<TraceId, RegistryError> {
        // Rejection sampling is cheap while at least a third of the space is free.
        if free * 3 >= usize::from(TraceId::MAX) {
            for _ in 0..MAX_DRAWS {
                let candidate = rng.gen_range(1..=TraceId::MAX);
                if !self.is_used(candidate) {
                    if let Some(id) = TraceId::new(candidate) {
                        return Ok(id);
                    }
                }
            }
        }
        let k = rng.gen_range(0..free);
        (1..=TraceId::MAX)
            .filter(|&id| !self.is_used(id))
            .nth(k)
            .and_then(TraceId::new)
            .ok_or(RegistryError::AllocationExhausted)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn id(n: u16) -> TraceId {
        TraceId::new(n).unwrap()
    }

    fn full_except(except: &[u16]) -> IdAllocator {
        let mut a = IdAllocator::new();
        for n in 1..=TraceId::MAX {
            if !except.contains(&n) {
                a.mark_used(id(n));
            }
        }
        a
    }

    #[test]
    fn allocated_ids_are_in_range_and_unique() {
        let mut a = IdAllocator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..1000 {
            let got = a.allocate(&mut rng, None).expect("allocate");
            assert!(got.get() >= 1);
            assert!(seen.insert(got), "duplicate {got}");
        }
        assert_eq!(a.used_count(), 1000);
    }

    #[test]
    fn nearly_full_space_finds_the_last_free_id() {
        let mut a = full_except(&[4242]);
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(a.allocate(&mut rng, None).unwrap(), id(4242));
        assert_eq!(a.free_count(), 0);
    }

    #[test]
    fn full_space_is_exhausted() {
        let mut a = full_except(&[]);
        let mut rng = StdRng::seed_from_u64(3);
        let err = a.allocate(&mut rng, None).unwrap_err();
        assert!(matches!(err, RegistryError::AllocationExhausted));
    }

    #[test]
    fn full_space_reuses_oldest_retired_id() {
        let mut a = full_except(&[]);
        a.retire(id(9), 500);
        a.retire(id(3), 100);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(a.allocate(&mut rng, Some(1_000)).unwrap(), id(3));
        assert_eq!(a.oldest_retired(), Some((id(9), 500)));
    }

    #[test]
    fn recently_retired_id_is_not_reused() {
        let mut a = full_except(&[]);
        a.retire(id(9), 5_000);
        let mut rng = StdRng::seed_from_u64(3);
        assert!(a.allocate(&mut rng, Some(1_000)).is_err());
    }

    #[test]
    fn reinstate_drops_retired_entry() {
        let mut a = IdAllocator::new();
        a.mark_used(id(5));
        a.retire(id(5), 10);
        a.reinstate(id(5));
        assert_eq!(a.oldest_retired(), None);
    }
}
