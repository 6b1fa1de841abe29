//! Shared fixtures for integration tests.
//!
//! A [`Lab`] is a temporary directory laid out like a calibration bench:
//!
//! ```text
//! <tmp>/calibrates/   *.pCal, *.fCal
//! <tmp>/linearfits/   <MODEL> ST<serial>....xls
//! <tmp>/derivatives/
//! <tmp>/export/
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const MODEL: &str = "ZCF-301B";

pub struct Lab {
    root: TempDir,
}

impl Lab {
    pub fn new() -> Self {
        let root = TempDir::new().expect("create temp dir");
        for dir in ["calibrates", "linearfits", "derivatives", "export"] {
            fs::create_dir(root.path().join(dir)).expect("create lab dir");
        }
        Self { root }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn calibrates(&self) -> PathBuf {
        self.root().join("calibrates")
    }

    pub fn linearfits(&self) -> PathBuf {
        self.root().join("linearfits")
    }

    pub fn derivatives(&self) -> PathBuf {
        self.root().join("derivatives")
    }

    pub fn export(&self) -> PathBuf {
        self.root().join("export")
    }

    pub fn config_file(&self) -> PathBuf {
        self.root().join("config.toml")
    }

    /// Write `<serial>.pCal` and `<serial>.fCal`.
    pub fn calibrate(&self, serial: &str) -> &Self {
        fs::write(self.calibrates().join(format!("{serial}.pCal")), format!("P{serial}\n"))
            .expect("write pCal");
        fs::write(self.calibrates().join(format!("{serial}.fCal")), format!("F{serial}\n"))
            .expect("write fCal");
        self
    }

    /// Write `<MODEL> ST<serial>fits<volume>.xls` and return its file name.
    pub fn linearfit(&self, serial: &str, volume: &str) -> String {
        let name = format!("{MODEL} ST{serial}fits{volume}.xls");
        fs::write(self.linearfits().join(&name), "xls").expect("write linear fit");
        name
    }

    pub fn write_config(&self, content: &str) -> &Self {
        fs::write(self.config_file(), content).expect("write config");
        self
    }

    /// The binary pointed at this lab, isolated from the caller's environment.
    #[allow(deprecated)]
    pub fn calbr(&self) -> Command {
        let mut cmd = Command::cargo_bin("calbr").expect("calbr binary");
        cmd.env_remove("CALBR_CONFIG")
            .env_remove("CALBR_LOG")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .env("CALBR_CALIBRATES", self.calibrates())
            .env("CALBR_LINEARFITS", self.linearfits())
            .env("CALBR_DERIVATIVES", self.derivatives())
            .env("CALBR_EXPORT", self.export())
            .arg("--config")
            .arg(self.config_file());
        cmd
    }
}
