//! calbr - calibration REPL
//!
//! Correlates pressure and flow calibrations with linear-fit spreadsheets by
//! serial number and assembles them into dated derivative packages.

// Note: deny (not forbid) to allow #[allow(unsafe_code)] in test helpers for env var manipulation
#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod render;
pub mod storage;
pub mod util;

pub use error::{CalbrError, ExitCode, Result};
