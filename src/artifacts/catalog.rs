//! Directory scanning for calibrations and linear fits.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{CalbrError, Result};

/// Filename patterns for one model prefix.
#[derive(Debug, Clone)]
pub struct Patterns {
    pres: Regex,
    flow: Regex,
    linearfit: Regex,
    linearfit_prefix: Regex,
}

impl Patterns {
    /// Build the patterns for `model`, e.g. `ZCF-301B`.
    ///
    /// # Errors
    ///
    /// Returns [`CalbrError::Other`] if a pattern fails to compile.
    pub fn new(model: &str) -> Result<Self> {
        let model = regex::escape(model);
        let compile = |pattern: &str| Regex::new(pattern).map_err(anyhow::Error::from);
        Ok(Self {
            pres: compile(r"^(\d{4,5})\.pCal$")?,
            flow: compile(r"^(\d{4,5})\.fCal$")?,
            linearfit: compile(&format!(r"^{model}\s+ST(\d{{4,5}})\w{{4,}}(-?\w{{0,3}})\.xls$"))?,
            linearfit_prefix: compile(&format!(r"^{model}\s+ST(\d{{3,5}})"))?,
        })
    }

    /// Serial of a pressure calibration filename.
    #[must_use]
    pub fn pres_serial<'a>(&self, filename: &'a str) -> Option<&'a str> {
        capture(&self.pres, filename)
    }

    /// Serial of a flow calibration filename.
    #[must_use]
    pub fn flow_serial<'a>(&self, filename: &'a str) -> Option<&'a str> {
        capture(&self.flow, filename)
    }

    /// Serial and volume suffix of a complete linear-fit filename.
    #[must_use]
    pub fn linearfit<'a>(&self, filename: &'a str) -> Option<(&'a str, &'a str)> {
        let caps = self.linearfit.captures(filename)?;
        let serial = caps.get(1)?.as_str();
        let volume = caps.get(2).map_or("", |m| m.as_str());
        Some((serial, volume))
    }

    /// Serial of any file that merely starts like a linear fit.
    #[must_use]
    pub fn linearfit_prefix_serial<'a>(&self, filename: &'a str) -> Option<&'a str> {
        capture(&self.linearfit_prefix, filename)
    }
}

fn capture<'a>(pattern: &Regex, filename: &'a str) -> Option<&'a str> {
    pattern
        .captures(filename)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// A linear-fit spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinearFit {
    pub path: PathBuf,
    /// Volume suffix such as `-50`, possibly empty.
    pub volume: String,
}

/// Calibrations and linear fits found on disk, keyed by serial.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub pres: BTreeMap<String, PathBuf>,
    pub flow: BTreeMap<String, PathBuf>,
    pub linearfits: BTreeMap<String, LinearFit>,
}

impl Catalog {
    /// Scan `calibrates` and `linearfits`. Files that match no pattern are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CalbrError::Directory`] if either directory is unusable, or
    /// an I/O error from reading it.
    pub fn scan(calibrates: &Path, linearfits: &Path, patterns: &Patterns) -> Result<Self> {
        let mut catalog = Self::default();

        for (name, path) in list_files(calibrates)? {
            if let Some(serial) = patterns.pres_serial(&name) {
                catalog.pres.insert(serial.to_string(), path);
            } else if let Some(serial) = patterns.flow_serial(&name) {
                catalog.flow.insert(serial.to_string(), path);
            }
        }

        for (name, path) in list_files(linearfits)? {
            if let Some((serial, volume)) = patterns.linearfit(&name) {
                catalog.linearfits.insert(
                    serial.to_string(),
                    LinearFit {
                        path,
                        volume: volume.to_string(),
                    },
                );
            }
        }

        tracing::debug!(
            pres = catalog.pres.len(),
            flow = catalog.flow.len(),
            linearfits = catalog.linearfits.len(),
            "Scanned artifacts"
        );
        Ok(catalog)
    }
}

/// Fail unless `path` exists and is a directory.
///
/// # Errors
///
/// Returns [`CalbrError::Directory`] describing what is wrong.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(CalbrError::Directory {
            path: path.display().to_string(),
            reason: "directory does not exist",
        });
    }
    if !path.is_dir() {
        return Err(CalbrError::Directory {
            path: path.display().to_string(),
            reason: "not a directory",
        });
    }
    Ok(())
}

/// Regular files in `dir` as `(file name, path)`, sorted by name.
///
/// # Errors
///
/// Returns an error if `dir` is unusable or cannot be read.
pub fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    ensure_dir(dir)?;
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            files.push((name.to_string(), path));
        }
    }
    files.sort();
    Ok(files)
}
