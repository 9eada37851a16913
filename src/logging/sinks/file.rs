use std::{fs, path::Path};

use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling::daily};
use tracing_subscriber::{layer::Layer as LayerTrait, registry::LookupSpan};

use crate::logging::{formatter, LoggingConfig, LoggingError};

/// Файловый слой в `dir` с ежедневной ротацией.
///
/// Возвращённый guard при drop сбрасывает фоновую запись и должен
/// пережить подписчика.
pub fn layer_with_config<S>(
    config: &LoggingConfig,
    dir: &Path,
) -> Result<(Box<dyn LayerTrait<S> + Send + Sync>, WorkerGuard), LoggingError>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fs::create_dir_all(dir).map_err(|source| LoggingError::LogDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let (writer, guard) = non_blocking(daily(dir, &config.file_prefix));
    // В файл без ANSI-последовательностей.
    let layer = formatter::build_formatter(config.format, false, config.with_target, writer);
    Ok((layer, guard))
}
