//! Output formatters for `longpaths` scan results.
//!
//! # Available Formatters
//!
//! - **Terminal**: Aligned table with a summary line
//! - **CSV**: One row per violation, minimal or detailed columns
//!
//! Each formatter accepts already-sorted violations and contains no business
//! logic; every derived field is filled in by the scanner.

pub mod csv;
pub mod terminal;

/// CSV output renderer function.
///
/// See [`csv::render`] for full documentation.
pub use csv::render as render_csv;

/// Terminal output renderer function.
///
/// See [`terminal::render`] for full documentation.
pub use terminal::render as render_terminal;
