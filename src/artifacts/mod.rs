//! Calibration artifacts: serial parsing, directory catalogs, transfers and
//! derivative packages.

pub mod catalog;
pub mod derivative;
pub mod serials;
pub mod transfer;

pub use catalog::{Catalog, LinearFit, Patterns};
pub use derivative::{Assembly, Correlation, correlate, derivative_name};
pub use serials::parse_serial_numbers;
pub use transfer::{CalibrateKinds, FileReport, Summary, TransferMode, TransferStatus};
