use std::time::Duration;

use groupcast_error::{InvalidNameError, NameKind};
use serde::{Deserialize, Serialize};

use crate::layer::{
    validate_name, DEFAULT_CAPACITY, DEFAULT_CHANNEL_EXPIRES, DEFAULT_LAYER_EXPIRES,
    DEFAULT_PREFIX,
};
#[cfg(feature = "redis")]
use crate::store::DEFAULT_REDIS_URL;

/// Какой слой каналов строить.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Членство в памяти процесса.
    #[default]
    Local,
    /// Распределённый слой поверх хранилища в процессе.
    Memory,
    /// Распределённый слой поверх Redis.
    #[cfg(feature = "redis")]
    Redis,
}

/// Секция `[layer]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerSettings {
    pub backend: Backend,
    /// Срок жизни локального слоя в секундах; на членство не влияет.
    pub expires_secs: u64,
    /// Срок жизни каналов, которые создаёт слой, в секундах.
    pub channel_expires_secs: u64,
    /// Рекомендуемый размер группы локального слоя.
    pub capacity: usize,
    pub redis_url: String,
    /// Пространство имён ключей групп в распределённом хранилище.
    pub prefix: String,
}

impl LayerSettings {
    pub fn expires(&self) -> Duration {
        Duration::from_secs(self.expires_secs)
    }

    pub fn channel_expires(&self) -> Duration {
        Duration::from_secs(self.channel_expires_secs)
    }

    /// Префикс попадает в ключи хранилища и должен быть идентификатором.
    pub fn validate_prefix(&self) -> Result<(), InvalidNameError> {
        validate_name(NameKind::Group, &self.prefix)
    }
}

impl Default for LayerSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Local,
            expires_secs: DEFAULT_LAYER_EXPIRES.as_secs(),
            channel_expires_secs: DEFAULT_CHANNEL_EXPIRES.as_secs(),
            capacity: DEFAULT_CAPACITY,
            #[cfg(feature = "redis")]
            redis_url: DEFAULT_REDIS_URL.to_string(),
            #[cfg(not(feature = "redis"))]
            redis_url: "redis://localhost".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = LayerSettings::default();
        assert_eq!(s.backend, Backend::Local);
        assert_eq!(s.expires(), Duration::from_secs(36_000));
        assert_eq!(s.channel_expires(), Duration::from_secs(60));
        assert_eq!(s.capacity, 100);
        assert_eq!(s.prefix, "group");
        assert_eq!(s.redis_url, "redis://localhost");
    }

    #[test]
    fn test_validate_prefix() {
        assert!(LayerSettings::default().validate_prefix().is_ok());
        let s = LayerSettings {
            prefix: "a-b".into(),
            ..Default::default()
        };
        let err = s.validate_prefix().unwrap_err();
        assert_eq!(err.kind, NameKind::Group);
        assert_eq!(err.name, "a-b");
    }

    #[test]
    fn test_backend_names() {
        let b: Backend = serde_json::from_str("\"memory\"").unwrap();
        assert_eq!(b, Backend::Memory);
        assert!(serde_json::from_str::<Backend>("\"postgres\"").is_err());
    }
}
