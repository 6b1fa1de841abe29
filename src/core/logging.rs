//! Tracing setup for a session.
//!
//! Command output and the prompt own stdout, so log events go to stderr, or
//! to the file named by `CALBR_LOG_FILE`. Only `calbr` events pass the
//! default filter, at `error`. Raising it to `debug` (`--verbose`,
//! `--log-level debug` or `CALBR_LOG=debug`) shows command registration,
//! every dispatched line and each rejected one. `RUST_LOG` replaces the
//! filter entirely.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;

/// Level for `calbr` events.
pub const ENV_LEVEL: &str = "CALBR_LOG";
/// `human`, `json` or `compact`.
pub const ENV_FORMAT: &str = "CALBR_LOG_FORMAT";
/// Append events to this file instead of stderr.
pub const ENV_FILE: &str = "CALBR_LOG_FILE";

/// Threshold for `calbr` events, most verbose first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    #[default]
    Error,
}

impl LogLevel {
    /// Parse a level name, case-insensitive. `verbose` means debug and
    /// `critical` means error.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "debug" | "verbose" => Some(Self::Debug),
            "info" => Some(Self::Info),
            "warn" | "warning" => Some(Self::Warn),
            "error" | "critical" | "crit" => Some(Self::Error),
            _ => None,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// How events are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Untimed, one event per line.
    #[default]
    Human,
    /// One JSON object per line.
    Json,
    /// Terse single line with target.
    Compact,
}

impl LogFormat {
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "human" => Some(Self::Human),
            "json" => Some(Self::Json),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }
}

/// Resolved logging options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogOptions {
    pub level: LogLevel,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
}

impl LogOptions {
    /// Combine CLI flags with `CALBR_LOG*` variables. Flags win; `verbose`
    /// lowers the threshold to at most `debug`.
    #[must_use]
    pub fn resolve(level_flag: Option<&str>, json: bool, verbose: bool) -> Self {
        let mut level = level_flag
            .and_then(LogLevel::parse)
            .or_else(|| env_value(ENV_LEVEL).as_deref().and_then(LogLevel::parse))
            .unwrap_or_default();
        if verbose {
            level = level.min(LogLevel::Debug);
        }

        let format = if json {
            LogFormat::Json
        } else {
            env_value(ENV_FORMAT)
                .as_deref()
                .and_then(LogFormat::parse)
                .unwrap_or_default()
        };

        Self {
            level,
            format,
            file: env_value(ENV_FILE).map(PathBuf::from),
        }
    }

    /// Filter directive used when `RUST_LOG` is unset.
    #[must_use]
    pub fn directive(&self) -> String {
        format!("calbr={}", self.level.name())
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn open_log_file(options: &LogOptions) -> Option<File> {
    let path = options.file.as_ref()?;
    OpenOptions::new().create(true).append(true).open(path).ok()
}

/// Install the global subscriber. A second call is a no-op.
///
/// An unopenable log file falls back to stderr.
pub fn init(options: &LogOptions) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.directive()));
    let writer = open_log_file(options).map_or_else(
        || BoxMakeWriter::new(std::io::stderr),
        BoxMakeWriter::new,
    );

    let layer = match options.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(writer)
            .boxed(),
        LogFormat::Human => tracing_subscriber::fmt::layer()
            .with_target(false)
            .without_time()
            .with_writer(writer)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .try_init()
        .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[allow(unsafe_code)]
    fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
        let _guard = ENV_LOCK.lock().unwrap();
        let prior: Vec<_> = vars
            .iter()
            .map(|(key, _)| (*key, std::env::var(key).ok()))
            .collect();
        for (key, value) in vars {
            unsafe {
                match value {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
        f();
        for (key, value) in prior {
            unsafe {
                match value {
                    Some(val) => std::env::set_var(key, val),
                    None => std::env::remove_var(key),
                }
            }
        }
    }

    fn clean() -> [(&'static str, Option<&'static str>); 3] {
        [(ENV_LEVEL, None), (ENV_FORMAT, None), (ENV_FILE, None)]
    }

    #[test]
    fn level_names_and_aliases() {
        assert_eq!(LogLevel::parse("TRACE"), Some(LogLevel::Trace));
        assert_eq!(LogLevel::parse("verbose"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse(" crit "), Some(LogLevel::Error));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogFormat::parse("Json"), Some(LogFormat::Json));
        assert_eq!(LogFormat::parse("xml"), None);
    }

    #[test]
    fn defaults_to_calbr_errors_on_stderr() {
        with_env(&clean(), || {
            let options = LogOptions::resolve(None, false, false);
            assert_eq!(options, LogOptions::default());
            assert_eq!(options.directive(), "calbr=error");
        });
    }

    #[test]
    fn verbose_lowers_but_never_raises() {
        with_env(&clean(), || {
            assert_eq!(LogOptions::resolve(None, false, true).level, LogLevel::Debug);
            assert_eq!(
                LogOptions::resolve(Some("trace"), false, true).level,
                LogLevel::Trace
            );
        });
    }

    #[test]
    fn flag_beats_env() {
        with_env(
            &[
                (ENV_LEVEL, Some("warn")),
                (ENV_FORMAT, Some("compact")),
                (ENV_FILE, Some("/tmp/calbr.log")),
            ],
            || {
                let options = LogOptions::resolve(None, false, false);
                assert_eq!(options.level, LogLevel::Warn);
                assert_eq!(options.format, LogFormat::Compact);
                assert_eq!(options.file, Some(PathBuf::from("/tmp/calbr.log")));

                let options = LogOptions::resolve(Some("info"), true, false);
                assert_eq!(options.directive(), "calbr=info");
                assert_eq!(options.format, LogFormat::Json);
            },
        );
    }

    #[test]
    fn blank_env_values_are_ignored() {
        with_env(
            &[(ENV_LEVEL, Some("  ")), (ENV_FORMAT, None), (ENV_FILE, Some(""))],
            || {
                let options = LogOptions::resolve(None, false, false);
                assert_eq!(options.level, LogLevel::Error);
                assert!(options.file.is_none());
            },
        );
    }
}
