//! Join compiler configuration.
//!
//! [`JoinConfig`] can be loaded from the `[join]` section of
//! `config/config.toml` or from `LIFEGUARD__JOIN__*` environment variables via
//! `JoinConfig::load()`, and handed to
//! [`JoinSelect::with_config`](crate::JoinSelect::with_config).

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

const CONFIG_FILE: &str = "config/config.toml";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct JoinConfig {
    /// Join every table under a generated alias instead of its real name
    #[serde(default)]
    pub use_table_alias: bool,
    /// Soft-delete column for entities that do not name their own
    #[serde(default = "default_soft_delete_column")]
    pub soft_delete_column: String,
    /// Prefix of generated aliases
    #[serde(default = "default_alias_prefix")]
    pub alias_prefix: String,
}

fn default_soft_delete_column() -> String {
    "deleted_at".to_string()
}

fn default_alias_prefix() -> String {
    "j".to_string()
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            use_table_alias: false,
            soft_delete_column: default_soft_delete_column(),
            alias_prefix: default_alias_prefix(),
        }
    }
}

impl JoinConfig {
    /// Load the join configuration from `config/config.toml`, falling back to env vars.
    ///
    /// A missing `[join]` section yields the defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix("LIFEGUARD").separator("__"));

        let settings = match builder.build() {
            Ok(cfg) => cfg,
            Err(err) => {
                if std::path::Path::new(CONFIG_FILE).exists() {
                    log::warn!("failed to load {CONFIG_FILE}, falling back to env: {err}");
                }
                Config::builder()
                    .add_source(Environment::with_prefix("LIFEGUARD").separator("__"))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "Failed to load configuration from file and env: {err}, then env-only error: {env_err}"
                        ))
                    })?
            }
        };

        Self::from_settings(&settings)
    }

    /// Parse a TOML document containing a `[join]` section.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Self::from_settings(&settings)
    }

    fn from_settings(settings: &Config) -> Result<Self, ConfigError> {
        match settings.get::<JoinConfig>("join") {
            Ok(config) => Ok(config),
            Err(ConfigError::NotFound(_)) => Ok(Self::default()),
            Err(e) => Err(ConfigError::Message(format!(
                "Join configuration could not be loaded: {e}"
            ))),
        }
    }
}
