//! Output formatting module
//!
//! Renders run results as tables, JSON, CSV or one-line summaries.

mod formatter;

pub use formatter::{write_csv, write_results_to_file, OutputFormat, ResultFormatter};
