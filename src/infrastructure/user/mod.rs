//! User infrastructure module
//!
//! This module provides the in-memory user service and the JSON snapshot
//! format it imports from and exports to.

mod service;
mod snapshot;

pub use service::UserService;
pub use snapshot::{EntryError, ExportOutcome, ImportReport, SkippedEntry};
