//! Output Generation
//!
//! Snapshot generation and the files written for external viewers.

pub mod snapshot;

pub use snapshot::*;
