use std::path::Path;

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::{Deserialize, Serialize};

use super::LayerSettings;
use crate::logging::LoggingConfig;

/// Префикс переменных окружения, например `GROUPCAST_LAYER__BACKEND=redis`.
pub const ENV_PREFIX: &str = "GROUPCAST";

/// Все настройки приложения.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layer: LayerSettings,
    pub logging: LoggingConfig,
}

impl Settings {
    /// Значения по умолчанию, переопределённые переменными `GROUPCAST_*`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::build(Self::builder()?)
    }

    /// Значения по умолчанию, затем TOML-файл `path` (если он есть), затем
    /// окружение.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Self::builder()?.add_source(File::from(path.as_ref()).required(false));
        Self::build(builder)
    }

    /// Проверяет то, что не проверит serde: префикс ключей и сроки жизни.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layer
            .validate_prefix()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        if self.layer.expires_secs == 0 || self.layer.channel_expires_secs == 0 {
            return Err(ConfigError::Message(
                "layer expiry values must be at least one second".to_string(),
            ));
        }
        Ok(())
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let defaults = Self::default();
        Config::builder()
            // Значения по умолчанию
            .set_default("layer.backend", "local")?
            .set_default("layer.expires_secs", defaults.layer.expires_secs)?
            .set_default("layer.channel_expires_secs", defaults.layer.channel_expires_secs)?
            .set_default("layer.capacity", defaults.layer.capacity as u64)?
            .set_default("layer.redis_url", defaults.layer.redis_url)?
            .set_default("layer.prefix", defaults.layer.prefix)?
            .set_default("logging.level", defaults.logging.level)?
            .set_default("logging.format", "compact")?
            .set_default("logging.with_ansi", defaults.logging.with_ansi)?
            .set_default("logging.with_target", defaults.logging.with_target)?
            .set_default("logging.file_prefix", defaults.logging.file_prefix)
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let cfg = builder
            // Переменные окружения с префиксом GROUPCAST_
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = cfg.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}
