//! Configuration file loading and settings resolution.
//!
//! Loads configuration from `<config_dir>/config.toml` (see [`AppPaths`]).
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `CALBR_CONFIG`: Override config file path
//! - `CALBR_CALIBRATES`: Directory of pressure/flow calibrations
//! - `CALBR_LINEARFITS`: Directory of linear-fit spreadsheets
//! - `CALBR_DERIVATIVES`: Directory where derivative packages are assembled
//! - `CALBR_EXPORT`: Default destination for copy/move/concat

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::Cli;
use crate::core::coercion::TypedValue;
use crate::error::{CalbrError, Result};
use crate::util::env::should_use_color;

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "CALBR_CONFIG";
/// Environment variable for the calibrations directory.
pub const ENV_CALIBRATES: &str = "CALBR_CALIBRATES";
/// Environment variable for the linear-fits directory.
pub const ENV_LINEARFITS: &str = "CALBR_LINEARFITS";
/// Environment variable for the derivatives directory.
pub const ENV_DERIVATIVES: &str = "CALBR_DERIVATIVES";
/// Environment variable for the default export directory.
pub const ENV_EXPORT: &str = "CALBR_EXPORT";

/// Model prefix used in linear-fit and derivative names.
pub const DEFAULT_MODEL: &str = "ZCF-301B";
/// REPL prompt.
pub const DEFAULT_PROMPT: &str = ">>> ";

// =============================================================================
// Resolved Settings
// =============================================================================

/// Fully resolved settings, built once at startup and handed to handlers by
/// reference.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Source of `*.pCal` / `*.fCal` files.
    pub calibrates: PathBuf,
    /// Source of linear-fit spreadsheets.
    pub linearfits: PathBuf,
    /// Where derivative packages are assembled.
    pub derivatives: PathBuf,
    /// Default destination for copy, move and concat.
    pub export: PathBuf,
    /// Model prefix, e.g. `ZCF-301B`.
    pub model: String,
    /// REPL prompt.
    pub prompt: String,
    /// Plain output without ANSI colors.
    pub no_color: bool,
    /// Per-command overrides keyed by display name.
    pub commands: BTreeMap<String, CommandOverride>,
    /// Source of each setting for debugging.
    pub sources: SettingSources,
}

/// Tracks the source of each resolved path.
#[derive(Debug, Clone, Default)]
pub struct SettingSources {
    pub calibrates: ConfigSource,
    pub linearfits: ConfigSource,
    pub derivatives: ConfigSource,
    pub export: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        let here = PathBuf::from(".");
        Self {
            calibrates: here.clone(),
            linearfits: here.clone(),
            derivatives: here.clone(),
            export: here,
            model: DEFAULT_MODEL.to_string(),
            prompt: DEFAULT_PROMPT.to_string(),
            no_color: false,
            commands: BTreeMap::new(),
            sources: SettingSources::default(),
        }
    }
}

impl Settings {
    /// Resolve settings from CLI args, environment variables and the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but is invalid.
    pub fn resolve(cli: &Cli) -> Result<Self> {
        let config = Self::load_config(cli)?;
        Self::resolve_with(cli, config)
    }

    /// Resolve against an already loaded config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config fails validation.
    pub fn resolve_with(cli: &Cli, config: Config) -> Result<Self> {
        config.validate()?;

        let mut sources = SettingSources::default();
        let calibrates = resolve_dir(
            cli.calibrates.as_ref(),
            ENV_CALIBRATES,
            config.paths.calibrates.as_ref(),
            &mut sources.calibrates,
        );
        let linearfits = resolve_dir(
            cli.linearfits.as_ref(),
            ENV_LINEARFITS,
            config.paths.linearfits.as_ref(),
            &mut sources.linearfits,
        );
        let derivatives = resolve_dir(
            cli.derivatives.as_ref(),
            ENV_DERIVATIVES,
            config.paths.derivatives.as_ref(),
            &mut sources.derivatives,
        );
        let export = resolve_dir(
            cli.export.as_ref(),
            ENV_EXPORT,
            config.paths.export.as_ref(),
            &mut sources.export,
        );

        Ok(Self {
            calibrates,
            linearfits,
            derivatives,
            export,
            model: config.naming.model,
            prompt: config.repl.prompt,
            no_color: !should_use_color(cli.no_color),
            commands: config.commands,
            sources,
        })
    }

    /// Load config file: `--config`, then `CALBR_CONFIG`, then the default path.
    fn load_config(cli: &Cli) -> Result<Config> {
        if let Some(path) = &cli.config {
            Config::load_from(path)
        } else if let Ok(path) = std::env::var(ENV_CONFIG) {
            Config::load_from(Path::new(&path))
        } else {
            Config::load()
        }
    }

    /// Human-readable listing of each setting and its source.
    #[must_use]
    pub fn describe(&self) -> String {
        let rows = [
            ("calibrates", &self.calibrates, self.sources.calibrates),
            ("linearfits", &self.linearfits, self.sources.linearfits),
            ("derivatives", &self.derivatives, self.sources.derivatives),
            ("export", &self.export, self.sources.export),
        ];
        let mut out = String::new();
        for (key, path, source) in rows {
            out.push_str(&format!("{key:<12} {}  ({source})\n", path.display()));
        }
        out.push_str(&format!("{:<12} {}\n", "model", self.model));
        out.push_str(&format!("{:<12} {:?}\n", "prompt", self.prompt));
        out
    }
}

fn resolve_dir(
    cli: Option<&PathBuf>,
    env_var: &str,
    file: Option<&PathBuf>,
    source: &mut ConfigSource,
) -> PathBuf {
    // 1. CLI flag
    if let Some(path) = cli {
        *source = ConfigSource::Cli;
        return path.clone();
    }

    // 2. Environment variable
    if let Ok(value) = std::env::var(env_var) {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            *source = ConfigSource::Env;
            return PathBuf::from(trimmed);
        }
    }

    // 3. Config file
    if let Some(path) = file {
        *source = ConfigSource::ConfigFile;
        return path.clone();
    }

    // 4. Default
    *source = ConfigSource::Default;
    PathBuf::from(".")
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration as written in `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artifact directories.
    pub paths: PathsConfig,
    /// Naming conventions.
    pub naming: NamingConfig,
    /// REPL settings.
    pub repl: ReplConfig,
    /// Per-command overrides keyed by display name.
    pub commands: BTreeMap<String, CommandOverride>,
}

/// Artifact directories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub calibrates: Option<PathBuf>,
    pub linearfits: Option<PathBuf>,
    pub derivatives: Option<PathBuf>,
    pub export: Option<PathBuf>,
}

/// Naming conventions for linear fits and derivatives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub model: String,
}

/// REPL settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub prompt: String,
}

/// Declarative overrides for one built-in command.
///
/// Unknown attribute names are collected and rejected by [`Config::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandOverride {
    /// Extra aliases.
    pub aliases: Vec<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement defaults; types must match the command's prototype.
    pub defaults: BTreeMap<String, toml::Value>,
    /// Anything else in the table.
    #[serde(flatten)]
    pub unknown: BTreeMap<String, toml::Value>,
}

impl CommandOverride {
    /// Defaults converted to typed values.
    ///
    /// # Errors
    ///
    /// Returns [`CalbrError::ConfigInvalid`] for tables, datetimes or
    /// non-string arrays.
    pub fn typed_defaults(&self, command: &str) -> Result<Vec<(String, TypedValue)>> {
        self.defaults
            .iter()
            .map(|(param, value)| {
                typed_value(value)
                    .map(|typed| (param.clone(), typed))
                    .ok_or_else(|| CalbrError::ConfigInvalid {
                        key: format!("commands.{command}.defaults.{param}"),
                        value: value.to_string(),
                        message: "expected string, integer, boolean, float or list of strings"
                            .to_string(),
                    })
            })
            .collect()
    }
}

fn typed_value(value: &toml::Value) -> Option<TypedValue> {
    match value {
        toml::Value::String(s) => Some(TypedValue::Str(s.clone())),
        toml::Value::Integer(n) => Some(TypedValue::Int(*n)),
        toml::Value::Boolean(b) => Some(TypedValue::Bool(*b)),
        toml::Value::Float(x) => Some(TypedValue::Float(*x)),
        toml::Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(TypedValue::List),
        toml::Value::Datetime(_) | toml::Value::Table(_) => None,
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().config_file())
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    /// Returns error only if the file exists but is invalid.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CalbrError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - The model prefix is non-empty and has no whitespace
    /// - The prompt is non-empty
    /// - Command overrides only use known attributes
    pub fn validate(&self) -> Result<()> {
        let model = &self.naming.model;
        if model.is_empty() || model.chars().any(char::is_whitespace) {
            return Err(CalbrError::ConfigInvalid {
                key: "naming.model".to_string(),
                value: model.clone(),
                message: "model prefix must be non-empty and contain no whitespace".to_string(),
            });
        }

        if self.repl.prompt.is_empty() {
            return Err(CalbrError::ConfigInvalid {
                key: "repl.prompt".to_string(),
                value: String::new(),
                message: "prompt must not be empty".to_string(),
            });
        }

        for (command, over) in &self.commands {
            if let Some(attribute) = over.unknown.keys().next() {
                tracing::debug!(command, attribute, "Unknown command attribute");
                return Err(CalbrError::UnknownAttribute {
                    attribute: attribute.clone(),
                });
            }
        }

        Ok(())
    }
}
