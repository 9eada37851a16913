use std::fmt;

use num_enum::TryFromPrimitive;
#[cfg(feature = "serde_repr")]
use serde_repr::{Deserialize_repr, Serialize_repr};
#[cfg(feature = "strum")]
use strum_macros::{AsRefStr, EnumIter};

/// Коды статуса для категоризации ошибок.
///
/// # Диапазоны:
/// - 0xxx: Успех
/// - 1xxx: Общие ошибки
/// - 2xxx: Ошибки данных (имена групп и каналов)
/// - 5xxx: Хранилище групп
/// - 6xxx: Сеть / IO
/// - 9xxx: Доставка сообщений
///
/// `num_enum::TryFromPrimitive` даёт `TryFrom<u32>`, что удобно, когда код
/// передаётся транспортному слою вместе с текстом ошибки.
#[cfg_attr(feature = "strum", derive(AsRefStr, EnumIter))]
#[cfg_attr(feature = "serde_repr", derive(Serialize_repr, Deserialize_repr))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u32)]
#[non_exhaustive]
pub enum StatusCode {
    // === 0xxx: Успех ===
    Success = 0,

    // === 1xxx: Общие ошибки ===
    Unknown = 1000,
    Internal = 1003,
    InvalidArgs = 1004,

    // === 2xxx: Ошибки данных ===
    InvalidName = 2003,

    // === 5xxx: Хранилище ===
    StorageUnavailable = 5000,

    // === 6xxx: Сеть/IO ===
    ConnectionClosed = 6001,
    Timeout = 6002,
    ProtocolError = 6003,
    ConnectionFailed = 6004,

    // === 9xxx: Доставка ===
    NoSink = 9000,
    NoReceivers = 9001,
    DeliveryFailed = 9002,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

////////////////////////////////////////////////////////////////////////////////
// Собственные методы
////////////////////////////////////////////////////////////////////////////////

impl StatusCode {
    /// Числовое представление кода статуса.
    pub const fn code(self) -> u32 {
        self as u32
    }

    /// Пытается получить вариант `StatusCode` из `u32`.
    ///
    /// Возвращает `None`, если значение не соответствует ни одному варианту.
    pub fn from_u32(v: u32) -> Option<Self> {
        Self::try_from(v).ok()
    }

    /// Возвращает `true`, если операцию с этим кодом имеет смысл повторить.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Timeout
                | Self::StorageUnavailable
                | Self::ConnectionFailed
                | Self::NoReceivers
        )
    }

    /// Вернёт `true`, если переданный `code` означает успешный результат.
    pub fn is_success(code: u32) -> bool {
        Self::Success as u32 == code
    }

    /// Ошибка вызывающей стороны: неверное имя или аргументы.
    pub fn is_client_error(&self) -> bool {
        let c = self.code();
        (2000..=4999).contains(&c) || matches!(self, Self::InvalidArgs)
    }

    /// Внутренняя или инфраструктурная ошибка (`1xxx`, `5xxx..6xxx`).
    pub fn is_server_error(&self) -> bool {
        let c = self.code();
        matches!(c, 1000..=1999 | 5000..=6999)
    }

    /// Ошибка доставки полезной нагрузки получателю (диапазон 9xxx).
    pub fn is_delivery_error(&self) -> bool {
        (9000..=9999).contains(&self.code())
    }

    /// Рекомендуемый уровень логирования для данного кода.
    pub fn log_level(&self) -> LogLevel {
        match self {
            Self::Success => LogLevel::Trace,
            Self::InvalidArgs | Self::InvalidName => LogLevel::Info,
            Self::Timeout | Self::ConnectionClosed | Self::NoReceivers => LogLevel::Warn,
            Self::Internal | Self::StorageUnavailable => LogLevel::Error,
            _ => LogLevel::Warn,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Общие реализации трейтов для StatusCode
////////////////////////////////////////////////////////////////////////////////

impl From<StatusCode> for u32 {
    fn from(c: StatusCode) -> Self {
        c.code()
    }
}

impl fmt::Display for StatusCode {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        #[cfg(feature = "strum")]
        {
            write!(f, "{} ({})", self.as_ref(), self.code())
        }
        #[cfg(not(feature = "strum"))]
        {
            write!(f, "{:?} ({})", self, self.code())
        }
    }
}

////////////////////////////////////////////////////////////////////////////////
// Тесты
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    /// Тест проверяет, что retryable-коды помечаются корректно.
    #[test]
    fn test_retryable() {
        assert!(StatusCode::Timeout.is_retryable());
        assert!(StatusCode::ConnectionFailed.is_retryable());
        assert!(!StatusCode::InvalidName.is_retryable());
        assert!(!StatusCode::NoSink.is_retryable());
    }

    /// Тест проверяет разделение клиентских и серверных ошибок.
    #[test]
    fn test_client_vs_server() {
        assert!(StatusCode::InvalidName.is_client_error());
        assert!(StatusCode::InvalidArgs.is_client_error());
        assert!(StatusCode::Internal.is_server_error());
        assert!(StatusCode::ConnectionFailed.is_server_error());
        assert!(!StatusCode::DeliveryFailed.is_server_error());
    }

    #[test]
    fn test_delivery_range() {
        assert!(StatusCode::NoSink.is_delivery_error());
        assert!(StatusCode::DeliveryFailed.is_delivery_error());
        assert!(!StatusCode::Timeout.is_delivery_error());
    }

    /// Тест проверяет конвертацию через `TryFrom<u32>` и `from_u32`.
    #[test]
    fn test_from_try_from_u32() {
        let n = StatusCode::InvalidName.code();
        assert_eq!(StatusCode::try_from(n).unwrap(), StatusCode::InvalidName);
        assert!(StatusCode::from_u32(99999).is_none());
    }

    #[test]
    fn test_code_and_into() {
        let c = StatusCode::InvalidName;
        assert_eq!(c.code(), 2003);
        let n: u32 = c.into();
        assert_eq!(n, 2003);
        assert!(StatusCode::is_success(StatusCode::Success.code()));
        assert!(!StatusCode::is_success(StatusCode::InvalidName.code()));
    }

    /// Коды, которые ни одна ошибка не выдаёт, в словаре отсутствуют.
    #[test]
    fn test_no_unused_codes() {
        for code in [1001, 2000, 5002, 6000] {
            assert!(StatusCode::from_u32(code).is_none(), "{code}");
        }
    }

    #[test]
    fn test_log_level_mappings() {
        assert_eq!(StatusCode::Success.log_level(), LogLevel::Trace);
        assert_eq!(StatusCode::InvalidName.log_level(), LogLevel::Info);
        assert_eq!(StatusCode::StorageUnavailable.log_level(), LogLevel::Error);
        assert_eq!(StatusCode::DeliveryFailed.log_level(), LogLevel::Warn);
    }

    /// Строка `Display` должна содержать имя варианта и числовой код.
    #[test]
    fn test_display_contains_name_and_code() {
        let s = format!("{}", StatusCode::InvalidName);
        assert!(s.contains("2003"), "Display must contain code, got: {s}");
        assert!(s.contains("InvalidName"), "Display must contain name, got: {s}");
    }
}
