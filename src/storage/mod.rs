//! Configuration file and settings resolution.

pub mod config;
pub mod paths;

pub use config::{
    CommandOverride, Config, ConfigSource, ENV_CALIBRATES, ENV_CONFIG, ENV_DERIVATIVES,
    ENV_EXPORT, ENV_LINEARFITS, SettingSources, Settings,
};
pub use paths::AppPaths;
