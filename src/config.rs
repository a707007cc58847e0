//! Configuration for parameter handling.
//!
//! Settings live in the `[params]` section of `config/config.toml` and can be
//! overridden with `LIFEGUARD_PARAMS__*` environment variables, e.g.
//! `LIFEGUARD_PARAMS__BOOLEAN_TYPES=boolean,bool,tinyint`.

use crate::param::BooleanPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/config.toml";
const ENV_PREFIX: &str = "LIFEGUARD";
const SECTION: &str = "params";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ParamsConfig {
    /// Base column types that receive boolean coercion
    #[serde(default = "default_boolean_types")]
    pub boolean_types: Vec<String>,
    /// Page size used by batched iteration when none is given
    #[serde(default = "default_batch_size")]
    pub default_batch_size: u64,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            boolean_types: default_boolean_types(),
            default_batch_size: default_batch_size(),
        }
    }
}

fn default_boolean_types() -> Vec<String> {
    vec!["boolean".to_string(), "bool".to_string()]
}

fn default_batch_size() -> u64 {
    100
}

fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("params.boolean_types")
        .try_parsing(true)
}

impl ParamsConfig {
    /// Load from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `[params]` section yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(environment());

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("Failed to load {CONFIG_FILE}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(environment())
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        Self::from_config(&settings)
    }

    /// Read the `[params]` section of an already-built configuration
    pub fn from_config(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<ParamsConfig>(SECTION) {
            Ok(params) => Ok(params),
            Err(ConfigError::NotFound(_)) => {
                log::debug!("No [{SECTION}] configuration section, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(ConfigError::Message(format!(
                "Params configuration could not be loaded from file or environment: {e}"
            ))),
        }
    }

    pub fn boolean_policy(&self) -> BooleanPolicy {
        BooleanPolicy::new(&self.boolean_types)
    }
}
