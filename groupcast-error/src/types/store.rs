use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки внешнего хранилища групп.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Не удалось подключиться к хранилищу
    ConnectionFailed { address: String, reason: String },
    /// Таймаут операции
    Timeout { operation: String },
    /// Хранилище отклонило команду
    Command { operation: String, reason: String },
    /// Неожиданный ответ хранилища
    Protocol { reason: String },
    /// Некорректный glob-паттерн при сканировании ключей
    InvalidPattern { pattern: String, reason: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::ConnectionFailed { address, reason } => {
                write!(f, "Failed to connect to group store at {address}: {reason}")
            }
            Self::Timeout { operation } => write!(f, "Group store operation timed out: {operation}"),
            Self::Command { operation, reason } => {
                write!(f, "Group store command {operation} failed: {reason}")
            }
            Self::Protocol { reason } => write!(f, "Unexpected group store response: {reason}"),
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "Invalid key pattern '{pattern}': {reason}")
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl ErrorExt for StoreError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::ConnectionFailed { .. } => StatusCode::ConnectionFailed,
            Self::Timeout { .. } => StatusCode::Timeout,
            Self::Command { .. } => StatusCode::StorageUnavailable,
            Self::Protocol { .. } => StatusCode::ProtocolError,
            Self::InvalidPattern { .. } => StatusCode::InvalidArgs,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::ConnectionFailed { .. } | Self::Command { .. } => {
                "Group store unavailable".to_string()
            }
            Self::Timeout { .. } => "Group store timeout".to_string(),
            Self::Protocol { .. } => "Internal server error".to_string(),
            Self::InvalidPattern { pattern, .. } => format!("Invalid key pattern: {pattern}"),
        }
    }
}
