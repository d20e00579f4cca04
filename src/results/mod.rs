//! Stored benchmark runs
//!
//! Persists runs as JSON and exports them for spreadsheets.

#![allow(dead_code)]

mod storage;

pub use storage::{ExportFormat, ResultsStorage, StoredRun};
