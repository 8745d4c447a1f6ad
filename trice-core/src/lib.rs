//! trice core library — the trace ID list and its persistence.
//!
//! - [`types`] — [`TraceId`], [`Item`] and reconciliation outcomes
//! - [`registry`] — [`Registry`]: reconcile, removal marking, lookup
//! - [`alloc`] — [`IdAllocator`]: bounded fresh-ID allocation
//! - [`index`] — identifier-keyed positions backing lookups
//! - [`persist`] — `til.json` load / save
//! - [`error`] — [`RegistryError`]

pub mod alloc;
pub mod error;
pub mod index;
pub mod persist;
pub mod registry;
pub mod types;

pub use alloc::IdAllocator;
pub use error::RegistryError;
pub use registry::Registry;
pub use types::{Item, ReconcileOutcome, Reconciled, TraceId};
