//! Error rendering for calbr.
//!
//! Operator mistakes (unknown verb, bad keyword, bad literal) print as the
//! bare message. Everything else gets the error code in front.

use colored::Colorize;

use crate::error::CalbrError;

/// Render an error for the terminal.
#[must_use]
pub fn render_error(error: &CalbrError, no_color: bool) -> String {
    if error.is_recoverable() {
        return error.to_string();
    }

    let header = format!("Error [{}]:", error.error_code());
    let header = if no_color {
        header
    } else {
        header.red().bold().to_string()
    };
    format!("{header} {error}")
}
