//! Settings for the engine and the demo binary.
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! `mapvalue.toml` (or any file given explicitly), then environment variables
//! such as `MAPVALUE_MAX_DEPTH` or `MAPVALUE_SAMPLE__USERS`.

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::engine::DEFAULT_MAX_DEPTH;
use crate::error::Result;

pub const DEFAULT_CONFIG: &str = "mapvalue";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Deepest nesting a single mapping call may reach.
    pub max_depth: usize,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
    /// Override used by the "Map by value" demonstration.
    pub description: String,
    /// Shared override used by the "Map by collection" demonstration.
    pub collection_description: String,
    pub sample: SampleSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            log_filter: String::from("warn"),
            description: String::from("I Nicholas a ne Kolya"),
            collection_description: String::from("Common description for user and roles"),
            sample: SampleSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SampleSettings {
    pub users: usize,
    pub roles_per_user: usize,
    /// Fixed seed for reproducible samples, random when absent.
    pub seed: Option<u64>,
}

impl Default for SampleSettings {
    fn default() -> Self {
        Self {
            users: 2,
            roles_per_user: 1,
            seed: None,
        }
    }
}

impl Settings {
    /// Loads `path` when given (it must exist), otherwise `mapvalue.*` from the
    /// working directory if present.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::with_name(path.unwrap_or(DEFAULT_CONFIG)).required(path.is_some()))
            .add_source(
                Environment::with_prefix("MAPVALUE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
