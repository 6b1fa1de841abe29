//! Derivative packages: a dated directory holding the pressure calibration,
//! flow calibration and linear fit of one serial.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use super::catalog::{Catalog, LinearFit, ensure_dir};
use super::transfer::{TransferMode, transfer_file};
use crate::error::Result;

/// Date format used inside derivative names.
pub const DATE_FORMAT: &str = "%Y.%m.%d";

/// `<MODEL> ST<serial>(<YYYY.MM.DD>)<volume>`
#[must_use]
pub fn derivative_name(model: &str, serial: &str, date: NaiveDate, volume: &str) -> String {
    format!("{model} ST{serial}({}){volume}", date.format(DATE_FORMAT))
}

/// Artifacts found for one serial.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    pub serial: String,
    pub pres: Option<PathBuf>,
    pub flow: Option<PathBuf>,
    pub linearfit: Option<LinearFit>,
}

impl Correlation {
    /// Names of the artifacts not found, in `pCal`, `fCal`, `xls` order.
    #[must_use]
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.pres.is_none() {
            missing.push("pCal");
        }
        if self.flow.is_none() {
            missing.push("fCal");
        }
        if self.linearfit.is_none() {
            missing.push("xls");
        }
        missing
    }

    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.pres.is_some() && self.flow.is_some() && self.linearfit.is_some()
    }

    /// Package name, if all three artifacts are present.
    #[must_use]
    pub fn name(&self, model: &str, date: NaiveDate) -> Option<String> {
        if !self.is_complete() {
            return None;
        }
        let volume = self.linearfit.as_ref().map_or("", |fit| fit.volume.as_str());
        Some(derivative_name(model, &self.serial, date, volume))
    }

    fn sources(&self) -> impl Iterator<Item = &Path> {
        [
            self.pres.as_deref(),
            self.flow.as_deref(),
            self.linearfit.as_ref().map(|fit| fit.path.as_path()),
        ]
        .into_iter()
        .flatten()
    }
}

/// Correlate each serial against the catalog, preserving serial order.
#[must_use]
pub fn correlate(serials: &[String], catalog: &Catalog) -> Vec<Correlation> {
    serials
        .iter()
        .map(|serial| Correlation {
            serial: serial.clone(),
            pres: catalog.pres.get(serial).cloned(),
            flow: catalog.flow.get(serial).cloned(),
            linearfit: catalog.linearfits.get(serial).cloned(),
        })
        .collect()
}

/// What happened to one package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assembly {
    Created,
    /// Directory already present; nothing written.
    Exists,
}

/// Create `<derivatives>/<name>/` and copy the serial's three artifacts into it.
///
/// # Errors
///
/// Returns an error if `derivatives` is unusable, or if creating the
/// directory or copying a file fails. A partially filled package is left in
/// place.
pub fn assemble(correlation: &Correlation, name: &str, derivatives: &Path) -> Result<Assembly> {
    ensure_dir(derivatives)?;
    let package = derivatives.join(name);
    if package.exists() {
        tracing::warn!(package = %package.display(), "Derivative package already exists");
        return Ok(Assembly::Exists);
    }

    fs::create_dir(&package)?;
    for source in correlation.sources() {
        transfer_file(source, &package, TransferMode::Copy)?;
    }
    tracing::info!(package = %package.display(), "Assembled derivative package");
    Ok(Assembly::Created)
}
