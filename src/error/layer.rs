use std::any::Any;

use groupcast_error::{DeliveryError, ErrorExt, InvalidNameError, StatusCode, StoreError};
use thiserror::Error;

pub type LayerResult<T> = Result<T, LayerError>;

/// Ошибка операции слоя каналов.
///
/// Все варианты прозрачны: вызывающий видит ровно ту ошибку, которую
/// выдали проверка имени, sink или хранилище групп.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),

    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LayerError {
    pub fn is_invalid_name(&self) -> bool {
        matches!(self, Self::InvalidName(_))
    }

    pub fn as_delivery(&self) -> Option<&DeliveryError> {
        match self {
            Self::Delivery(e) => Some(e),
            _ => None,
        }
    }
}

impl ErrorExt for LayerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidName(e) => e.status_code(),
            Self::Delivery(e) => e.status_code(),
            Self::Store(e) => e.status_code(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        match self {
            Self::InvalidName(e) => e.as_any(),
            Self::Delivery(e) => e.as_any(),
            Self::Store(e) => e.as_any(),
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::InvalidName(e) => e.client_message(),
            Self::Delivery(e) => e.client_message(),
            Self::Store(e) => e.client_message(),
        }
    }

    fn metrics_tags(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::InvalidName(e) => e.metrics_tags(),
            Self::Delivery(e) => e.metrics_tags(),
            Self::Store(e) => e.metrics_tags(),
        }
    }
}
