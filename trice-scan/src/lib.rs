//! # trice-scan
//!
//! Source tree passes over C sources containing `TRICE…( Id(n), "fmt", … )`
//! call sites.
//!
//! Call [`update_tree`] to reconcile every call site with the ID list and
//! write assigned IDs back into the sources, or [`zero_tree`] to reset every
//! call site ID to `Id(0)`.

pub mod error;
pub mod source;
pub mod update;
pub mod writer;
pub mod zero;

pub use error::ScanError;
pub use update::{update_tree, UpdateOptions, UpdateReport};
pub use writer::WriteResult;
pub use zero::{zero_tree, ZeroReport};
