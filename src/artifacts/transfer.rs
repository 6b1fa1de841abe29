//! Copy, move and concatenation of calibration artifacts.
//!
//! Every file is attempted independently and reported as [`TransferStatus`].
//! Nothing is rolled back when a later file fails.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use super::catalog::{Patterns, ensure_dir, list_files};
use crate::error::Result;

/// Outcome for one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStatus {
    Success,
    /// Source file not present.
    Missing,
    /// Present but the operation failed, or produced an empty file.
    Failure,
}

impl fmt::Display for TransferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "Success"),
            Self::Missing => write!(f, "Missing"),
            Self::Failure => write!(f, "Failure"),
        }
    }
}

/// Whether sources are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

impl TransferMode {
    #[must_use]
    pub const fn from_flag(move_files: bool) -> Self {
        if move_files { Self::Move } else { Self::Copy }
    }

    #[must_use]
    pub const fn verb(self) -> &'static str {
        match self {
            Self::Copy => "Copying",
            Self::Move => "Moving",
        }
    }
}

/// Which calibration kinds to transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrateKinds {
    pub pres: bool,
    pub flow: bool,
}

impl Default for CalibrateKinds {
    fn default() -> Self {
        Self {
            pres: true,
            flow: true,
        }
    }
}

/// One line of a transfer report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReport {
    /// e.g. `Copying calibrate`.
    pub action: String,
    /// File name or serial the line is about.
    pub target: String,
    pub status: TransferStatus,
}

impl FileReport {
    fn new(action: impl Into<String>, target: impl Into<String>, status: TransferStatus) -> Self {
        Self {
            action: action.into(),
            target: target.into(),
            status,
        }
    }
}

/// Totals over a batch of reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub success: usize,
    pub missing: usize,
    pub failure: usize,
}

impl Summary {
    #[must_use]
    pub fn of(reports: &[FileReport]) -> Self {
        reports.iter().fold(Self::default(), |mut acc, report| {
            match report.status {
                TransferStatus::Success => acc.success += 1,
                TransferStatus::Missing => acc.missing += 1,
                TransferStatus::Failure => acc.failure += 1,
            }
            acc
        })
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} missing, {} failed",
            self.success, self.missing, self.failure
        )
    }
}

/// Copy or move `<serial>.pCal` then `<serial>.fCal` files from `src` to `dest`.
///
/// All pressure files are handled before any flow file.
///
/// # Errors
///
/// Returns an error if `src` or `dest` is not a usable directory.
pub fn copy_calibrates(
    serials: &[String],
    src: &Path,
    dest: &Path,
    kinds: CalibrateKinds,
    mode: TransferMode,
) -> Result<Vec<FileReport>> {
    ensure_dir(dest)?;
    let available: Vec<String> = list_files(src)?.into_iter().map(|(name, _)| name).collect();
    let action = format!("{} calibrate", mode.verb());

    let mut names: Vec<String> = Vec::new();
    if kinds.pres {
        names.extend(serials.iter().map(|serial| format!("{serial}.pCal")));
    }
    if kinds.flow {
        names.extend(serials.iter().map(|serial| format!("{serial}.fCal")));
    }

    let reports = names
        .into_iter()
        .map(|name| {
            let status = if available.contains(&name) {
                transfer_status(&src.join(&name), dest, mode)
            } else {
                TransferStatus::Missing
            };
            FileReport::new(action.clone(), name, status)
        })
        .collect();
    Ok(reports)
}

/// Copy or move the first linear fit in `src` whose name starts with
/// `<MODEL> ST<serial>` for each serial.
///
/// # Errors
///
/// Returns an error if `src` or `dest` is not a usable directory.
pub fn copy_linearfits(
    serials: &[String],
    src: &Path,
    dest: &Path,
    patterns: &Patterns,
    mode: TransferMode,
) -> Result<Vec<FileReport>> {
    ensure_dir(dest)?;
    let files = list_files(src)?;
    let action = format!("{} linearfit", mode.verb());

    let reports = serials
        .iter()
        .map(|serial| {
            let found = files
                .iter()
                .find(|(name, _)| patterns.linearfit_prefix_serial(name) == Some(serial.as_str()));
            let status = found.map_or(TransferStatus::Missing, |(_, path)| {
                transfer_status(path, dest, mode)
            });
            FileReport::new(action.clone(), format!("{serial}(xls)"), status)
        })
        .collect();
    Ok(reports)
}

/// Write `<serial>.Cal` into `dest` as the pressure calibration followed by
/// the flow calibration.
///
/// # Errors
///
/// Returns an error if `src` or `dest` is not a usable directory.
pub fn concat_calibrates(serials: &[String], src: &Path, dest: &Path) -> Result<Vec<FileReport>> {
    ensure_dir(src)?;
    ensure_dir(dest)?;

    let reports = serials
        .iter()
        .map(|serial| {
            let target = format!("{serial}.Cal");
            let pres = src.join(format!("{serial}.pCal"));
            let flow = src.join(format!("{serial}.fCal"));
            let status = if pres.is_file() && flow.is_file() {
                match concat_files(&pres, &flow, &dest.join(&target)) {
                    Ok(0) => {
                        tracing::warn!(file = %target, "Concatenated calibrate is empty");
                        TransferStatus::Failure
                    }
                    Ok(bytes) => {
                        tracing::info!(file = %target, bytes, "Concatenated calibrates");
                        TransferStatus::Success
                    }
                    Err(err) => {
                        tracing::warn!(file = %target, error = %err, "Concatenation failed");
                        TransferStatus::Failure
                    }
                }
            } else {
                TransferStatus::Missing
            };
            FileReport::new("Concat calibrates", target, status)
        })
        .collect();
    Ok(reports)
}

fn concat_files(first: &Path, second: &Path, target: &Path) -> io::Result<usize> {
    let mut content = fs::read(first)?;
    content.extend(fs::read(second)?);
    fs::write(target, &content)?;
    Ok(content.len())
}

fn transfer_status(source: &Path, dest_dir: &Path, mode: TransferMode) -> TransferStatus {
    match transfer_file(source, dest_dir, mode) {
        Ok(()) => {
            tracing::info!(source = %source.display(), dest = %dest_dir.display(), ?mode, "Transferred file");
            TransferStatus::Success
        }
        Err(err) => {
            tracing::warn!(source = %source.display(), error = %err, "Transfer failed");
            TransferStatus::Failure
        }
    }
}

/// Copy or move `source` into `dest_dir`, keeping its file name.
///
/// A move that cannot be done by rename (e.g. across filesystems) falls back
/// to copy and remove.
///
/// # Errors
///
/// Returns the underlying I/O error.
pub fn transfer_file(source: &Path, dest_dir: &Path, mode: TransferMode) -> io::Result<()> {
    let name = source
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"))?;
    let target = dest_dir.join(name);

    match mode {
        TransferMode::Copy => fs::copy(source, &target).map(|_| ()),
        TransferMode::Move => fs::rename(source, &target).or_else(|_| {
            fs::copy(source, &target)?;
            fs::remove_file(source)
        }),
    }
}
