//! Identifier-keyed positions into the ordered item list.

use std::collections::HashMap;

use crate::types::TraceId;

/// Maps each identifier to the positions of its items, in list order.
///
/// A well-formed list has one position per identifier; several appear only
/// when a hand-edited file repeats an ID or a retired ID was reused.
#[derive(Debug, Clone, Default)]
pub struct IdIndex {
    positions: HashMap<u16, Vec<usize>>,
}

impl IdIndex {
    pub fn insert(&mut self, id: TraceId, position: usize) {
        self.positions.entry(id.get()).or_default().push(position);
    }

    pub fn positions(&self, id: TraceId) -> &[usize] {
        self.positions.get(&id.get()).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, id: TraceId) -> bool {
        self.positions.contains_key(&id.get())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
