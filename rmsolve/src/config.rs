//! Layered configuration for the command-line tools.
//!
//! Sources, from lowest to highest precedence: built-in defaults, an optional
//! TOML file, and environment variables.

use rms_core::models::QuantileSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings shared by every subcommand
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, Default)]
pub struct AppConfig {
    /// Controls for the inverse normal CDF
    #[serde(default)]
    pub quantile: QuantileSettings,

    /// How results are written
    #[serde(default)]
    pub output: OutputConfig,
}

/// How results are written
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indent the JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. The config file, if one is given
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern
    /// `RMS_<SECTION>__<KEY>` to `<section>.<key>`:
    ///
    /// ```bash
    /// export RMS_QUANTILE__TOLERANCE=1e-10
    /// export RMS_OUTPUT__PRETTY=false
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        Self::load_with(path, Some("RMS"))
    }

    fn load_with(path: Option<&Path>, env_prefix: Option<&str>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        config = config.add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(anyhow::anyhow!(
                    "Config file {} does not exist",
                    path.display()
                ));
            }
        }

        if let Some(prefix) = env_prefix {
            config = config.add_source(
                config::Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
