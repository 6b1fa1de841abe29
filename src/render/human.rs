//! Human-readable output using colored.
//!
//! Renders transfer reports, derivative plans and the help listing.

use chrono::NaiveDate;
use colored::Colorize;

use crate::artifacts::{Assembly, Correlation, FileReport, Summary, TransferStatus};
use crate::core::element::CommandElement;

/// Gap between the name column and the description in `help`.
const HELP_GAP: &str = "   ";

fn paint(text: &str, status: TransferStatus, no_color: bool) -> String {
    if no_color {
        return text.to_string();
    }
    match status {
        TransferStatus::Success => text.green().to_string(),
        TransferStatus::Missing => text.yellow().to_string(),
        TransferStatus::Failure => text.red().bold().to_string(),
    }
}

/// One report line: `Copying calibrate:  1001.pCal   ....    Success`.
#[must_use]
pub fn render_report(report: &FileReport, no_color: bool) -> String {
    format!(
        "{}:  {}   ....    {}",
        report.action,
        report.target,
        paint(&report.status.to_string(), report.status, no_color)
    )
}

/// All report lines followed by a totals line.
#[must_use]
pub fn render_reports(reports: &[FileReport], no_color: bool) -> String {
    let mut output = String::new();
    for report in reports {
        output.push_str(&render_report(report, no_color));
        output.push('\n');
    }

    let summary = Summary::of(reports);
    let line = summary.to_string();
    if no_color {
        output.push_str(&line);
    } else {
        output.push_str(&line.dimmed().to_string());
    }
    output.push('\n');
    output
}

/// Per-serial outcome of correlating calibrations with linear fits.
#[must_use]
pub fn render_correlation(
    correlation: &Correlation,
    model: &str,
    date: NaiveDate,
    no_color: bool,
) -> String {
    match correlation.name(model, date) {
        Some(name) => {
            let name = if no_color {
                name
            } else {
                name.bold().to_string()
            };
            format!("Derivative: {}   ....    {name}", correlation.serial)
        }
        None => format!(
            "Derivative: {}   ....    {} {}",
            correlation.serial,
            paint("Missing", TransferStatus::Missing, no_color),
            correlation.missing().join(", ")
        ),
    }
}

/// Result of assembling one package.
#[must_use]
pub fn render_assembly(name: &str, assembly: Assembly, no_color: bool) -> String {
    let (label, status) = match assembly {
        Assembly::Created => ("Success", TransferStatus::Success),
        Assembly::Exists => ("Exists", TransferStatus::Missing),
    };
    format!(
        "Assembling: {name}   ....    {}",
        paint(label, status, no_color)
    )
}

/// Every command in registration order, names padded to `width`.
///
/// Aliases other than the display name follow the description.
#[must_use]
pub fn render_help(elements: &[CommandElement], width: usize) -> String {
    let mut output = String::new();
    for element in elements {
        let others: Vec<&str> = element
            .identifier()
            .iter()
            .map(String::as_str)
            .filter(|alias| *alias != element.name())
            .collect();

        let mut line = format!(
            "{:<width$}{HELP_GAP}{}",
            element.name(),
            element.description()
        );
        if !others.is_empty() {
            if !element.description().is_empty() {
                line.push(' ');
            }
            line.push_str(&format!("(aliases: {})", others.join(", ")));
        }
        output.push_str(line.trim_end());
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::element::Flow;

    fn report(target: &str, status: TransferStatus) -> FileReport {
        FileReport {
            action: "Copying calibrate".to_string(),
            target: target.to_string(),
            status,
        }
    }

    #[test]
    fn report_line_layout() {
        let line = render_report(&report("1001.pCal", TransferStatus::Missing), true);
        assert_eq!(line, "Copying calibrate:  1001.pCal   ....    Missing");
    }

    #[test]
    fn reports_end_with_summary() {
        let text = render_reports(
            &[
                report("1001.pCal", TransferStatus::Success),
                report("1001.fCal", TransferStatus::Failure),
            ],
            true,
        );
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "1 succeeded, 0 missing, 1 failed");
    }

    #[test]
    fn colored_output_wraps_status() {
        colored::control::set_override(true);
        let line = render_report(&report("1001.pCal", TransferStatus::Success), false);
        colored::control::unset_override();
        assert!(line.contains("\x1b["));
        assert!(line.contains("Success"));
    }

    #[test]
    fn help_pads_names_to_width() {
        let elements = vec![
            CommandElement::builder(["help"])
                .description("List commands")
                .callback(|_, _| Ok(Flow::Continue))
                .build()
                .unwrap(),
            CommandElement::builder(["make-derivative", "makeder"])
                .description("Build derivative packages")
                .callback(|_, _| Ok(Flow::Continue))
                .build()
                .unwrap(),
            CommandElement::builder(["exit", "quit"])
                .callback(|_, _| Ok(Flow::Exit))
                .build()
                .unwrap(),
        ];

        let text = render_help(&elements, 15);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "help              List commands");
        assert_eq!(
            lines[1],
            "make-derivative   Build derivative packages (aliases: makeder)"
        );
        assert_eq!(lines[2], "exit              (aliases: quit)");
    }
}
