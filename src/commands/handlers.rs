//! Handler functions for the built-in commands.

use std::path::PathBuf;

use chrono::Local;

use crate::artifacts::catalog::ensure_dir;
use crate::artifacts::derivative::assemble;
use crate::artifacts::transfer;
use crate::artifacts::{CalibrateKinds, Catalog, Patterns, TransferMode, correlate, parse_serial_numbers};
use crate::core::dispatcher::DispatchContext;
use crate::core::element::{Arguments, Flow};
use crate::error::Result;
use crate::render::{render_assembly, render_correlation, render_error, render_help, render_reports};
use crate::storage::config::Settings;

const NOTHING_DONE: &str = "No serial number given, nothing done";

/// Serials named by the positionals, or `None` after telling the operator.
fn serials(args: &Arguments) -> Option<Vec<String>> {
    let serials = parse_serial_numbers(args.positional());
    if serials.is_empty() {
        println!("{NOTHING_DONE}");
        None
    } else {
        tracing::debug!(?serials, "Parsed serial numbers");
        Some(serials)
    }
}

/// `dest=` if given, otherwise the export directory.
fn destination(args: &Arguments, settings: &Settings) -> PathBuf {
    args.text("dest")
        .map_or_else(|| settings.export.clone(), PathBuf::from)
}

fn mode(args: &Arguments) -> TransferMode {
    TransferMode::from_flag(args.flag("move").unwrap_or(false))
}

pub fn copy_calibrates(ctx: &DispatchContext<'_>, args: &Arguments) -> Result<Flow> {
    let Some(serials) = serials(args) else {
        return Ok(Flow::Continue);
    };
    let settings = ctx.settings();
    let kinds = CalibrateKinds {
        pres: args.flag("pres").unwrap_or(true),
        flow: args.flag("flow").unwrap_or(true),
    };

    let reports = transfer::copy_calibrates(
        &serials,
        &settings.calibrates,
        &destination(args, settings),
        kinds,
        mode(args),
    )?;
    print!("{}", render_reports(&reports, settings.no_color));
    Ok(Flow::Continue)
}

pub fn copy_linearfits(ctx: &DispatchContext<'_>, args: &Arguments) -> Result<Flow> {
    let Some(serials) = serials(args) else {
        return Ok(Flow::Continue);
    };
    let settings = ctx.settings();
    let patterns = Patterns::new(&settings.model)?;

    let reports = transfer::copy_linearfits(
        &serials,
        &settings.linearfits,
        &destination(args, settings),
        &patterns,
        mode(args),
    )?;
    print!("{}", render_reports(&reports, settings.no_color));
    Ok(Flow::Continue)
}

pub fn concat_calibrates(ctx: &DispatchContext<'_>, args: &Arguments) -> Result<Flow> {
    let Some(serials) = serials(args) else {
        return Ok(Flow::Continue);
    };
    let settings = ctx.settings();

    let reports =
        transfer::concat_calibrates(&serials, &settings.calibrates, &destination(args, settings))?;
    print!("{}", render_reports(&reports, settings.no_color));
    Ok(Flow::Continue)
}

pub fn make_derivative(ctx: &DispatchContext<'_>, args: &Arguments) -> Result<Flow> {
    let Some(serials) = serials(args) else {
        return Ok(Flow::Continue);
    };
    let settings = ctx.settings();
    let dry = args.flag("dry").unwrap_or(false);
    if !dry {
        ensure_dir(&settings.derivatives)?;
    }

    let patterns = Patterns::new(&settings.model)?;
    let catalog = Catalog::scan(&settings.calibrates, &settings.linearfits, &patterns)?;
    let date = Local::now().date_naive();

    for correlation in correlate(&serials, &catalog) {
        println!(
            "{}",
            render_correlation(&correlation, &settings.model, date, settings.no_color)
        );
        if dry {
            continue;
        }
        let Some(name) = correlation.name(&settings.model, date) else {
            continue;
        };
        match assemble(&correlation, &name, &settings.derivatives) {
            Ok(assembly) => println!("{}", render_assembly(&name, assembly, settings.no_color)),
            Err(err) => {
                tracing::warn!(package = %name, error = %err, "Derivative assembly failed");
                println!("{}", render_error(&err, settings.no_color));
            }
        }
    }
    Ok(Flow::Continue)
}

pub fn help(ctx: &DispatchContext<'_>, _args: &Arguments) -> Result<Flow> {
    print!("{}", render_help(ctx.all(), ctx.max_name_len()));
    Ok(Flow::Continue)
}
