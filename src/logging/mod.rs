pub mod config;
mod filters;
mod formatter;
pub mod handle;
pub mod sinks;

use std::path::PathBuf;

pub use self::config::{LogFormat, LoggingConfig, DEFAULT_FILE_PREFIX};
pub use handle::LoggingHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Ошибки инициализации логирования.
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("invalid log filter directive '{directive}': {reason}")]
    InvalidDirective { directive: String, reason: String },
    #[error("cannot create log directory {path}: {source}")]
    LogDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("global subscriber already installed: {0}")]
    AlreadyInitialized(String),
}

/// Устанавливает глобальный подписчик `tracing` по `config`.
///
/// Консоль включена всегда; файл с ежедневной ротацией добавляется, если
/// задан `file_dir`. Возвращённый handle держать до выхода.
pub fn init_logging(config: LoggingConfig) -> Result<LoggingHandle, LoggingError> {
    let env_filter = filters::build_filter_from_config(&config)?;
    let mut layers = vec![sinks::console::layer_with_config(&config)];

    let file_guard = match &config.file_dir {
        Some(dir) => {
            let (file_layer, guard) = sinks::file::layer_with_config(&config, dir)?;
            layers.push(file_layer);
            Some(guard)
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        level = %config.level,
        format = ?config.format,
        file_dir = ?config.file_dir,
        "logging initialized"
    );

    Ok(LoggingHandle::new(file_guard))
}
