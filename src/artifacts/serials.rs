//! Serial number expansion for command positionals.
//!
//! Accepted forms:
//! - `1001` (three to five digits)
//! - `1001-1005`, `1001~1005`, `1001:1005` (inclusive range, either order)
//!
//! Range ends of different widths are not expanded; both ends are taken as
//! given.

use std::sync::LazyLock;

use regex::Regex;

static SINGLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{3,5}$").expect("valid regex"));
static RANGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3,5})[-~:](\d{3,5})$").expect("valid regex"));

/// Expand positional arguments into serials, in first-seen order without
/// duplicates. Tokens that are neither a serial nor a range are skipped.
#[must_use]
pub fn parse_serial_numbers<S: AsRef<str>>(args: &[S]) -> Vec<String> {
    let mut serials: Vec<String> = Vec::new();
    let mut push = |serial: String| {
        if !serials.contains(&serial) {
            serials.push(serial);
        }
    };

    for arg in args {
        let arg = arg.as_ref();
        if SINGLE.is_match(arg) {
            push(arg.to_string());
        } else if let Some(caps) = RANGE.captures(arg) {
            let (first, last) = (&caps[1], &caps[2]);
            if first.len() == last.len() {
                for serial in expand_range(first, last) {
                    push(serial);
                }
            } else {
                push(first.to_string());
                push(last.to_string());
            }
        } else {
            tracing::warn!(token = arg, "Skipping token that is not a serial number");
        }
    }

    serials
}

fn expand_range(first: &str, last: &str) -> Vec<String> {
    // Both ends are at most five digits, so they always fit.
    let (Ok(a), Ok(b)) = (first.parse::<u32>(), last.parse::<u32>()) else {
        return Vec::new();
    };
    let width = first.len();
    (a.min(b)..=a.max(b))
        .map(|n| format!("{n:0width$}"))
        .collect()
}
