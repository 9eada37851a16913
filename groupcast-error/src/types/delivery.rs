use std::any::Any;

use crate::{ErrorExt, StatusCode};

/// Ошибки доставки полезной нагрузки в sink канала.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryError {
    /// У канала нет функции доставки
    NoSink { channel: String },
    /// Приёмная сторона соединения закрыта
    Closed { channel: String },
    /// В широковещательном sink нет ни одного активного получателя
    NoReceivers,
    /// Транспорт отклонил сообщение
    Failed { channel: String, reason: String },
}

impl DeliveryError {
    pub fn failed(
        channel: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Failed {
            channel: channel.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for DeliveryError {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            Self::NoSink { channel } => write!(f, "Channel {channel} has no delivery sink"),
            Self::Closed { channel } => write!(f, "Connection behind channel {channel} is closed"),
            Self::NoReceivers => write!(f, "Broadcast sink has no active receivers"),
            Self::Failed { channel, reason } => {
                write!(f, "Delivery to channel {channel} failed: {reason}")
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

impl ErrorExt for DeliveryError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::NoSink { .. } => StatusCode::NoSink,
            Self::Closed { .. } => StatusCode::ConnectionClosed,
            Self::NoReceivers => StatusCode::NoReceivers,
            Self::Failed { .. } => StatusCode::DeliveryFailed,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn client_message(&self) -> String {
        match self {
            Self::NoSink { .. } => "Channel is not connected".to_string(),
            Self::Closed { .. } => "Connection closed".to_string(),
            Self::NoReceivers => "No active receivers".to_string(),
            Self::Failed { .. } => "Delivery failed".to_string(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        let mut tags = vec![
            ("error_type", "delivery".to_string()),
            ("status_code", self.status_code().to_string()),
        ];
        match self {
            Self::NoSink { channel } | Self::Closed { channel } | Self::Failed { channel, .. } => {
                tags.push(("channel", channel.clone()));
            }
            Self::NoReceivers => {}
        }
        tags
    }
}
