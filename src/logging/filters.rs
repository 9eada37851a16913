use tracing_subscriber::EnvFilter;

use super::{LoggingConfig, LoggingError};

/// Строит глобальный фильтр.
///
/// `RUST_LOG` побеждает, если задан и разбирается. Иначе берётся директива
/// из конфигурации, и неверная директива даёт ошибку, а не тихий откат.
pub fn build_filter_from_config(config: &LoggingConfig) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directive = config.build_filter_directive();
    EnvFilter::try_new(&directive).map_err(|e| LoggingError::InvalidDirective {
        directive,
        reason: e.to_string(),
    })
}
