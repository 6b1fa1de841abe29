//! Terminal output for command results and errors.

pub mod error;
pub mod human;

pub use error::render_error;
pub use human::{render_assembly, render_correlation, render_help, render_report, render_reports};
