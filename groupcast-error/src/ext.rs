use std::{any::Any, error::Error};

use crate::{LogLevel, StatusCode};

/// Общий интерфейс ошибок groupcast.
///
/// Транспорт, который держит соединение, решает по нему, что отправить
/// клиенту, с каким уровнем залогировать и стоит ли повторить операцию.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Код ошибки. По умолчанию [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Для downcast к конкретному типу.
    fn as_any(&self) -> &dyn Any;

    /// Текст, который можно показать клиенту.
    ///
    /// Внутренние ошибки сворачиваются в `"Internal server error"`.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Повторная попытка может пройти (таймаут, обрыв соединения).
    fn is_retryable(&self) -> bool {
        self.status_code().is_retryable()
    }

    fn log_level(&self) -> LogLevel {
        self.status_code().log_level()
    }

    /// Пары ключ–значение для метрик.
    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        vec![("status_code", self.status_code().to_string())]
    }
}
