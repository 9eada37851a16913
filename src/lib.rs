//! Слой каналов для publish/subscribe по группам.
//!
//! Соединения представлены [`Channel`]; каналы входят в именованные группы,
//! и сообщение группе получает каждый её участник. Членство хранится либо
//! в памяти процесса ([`LocalLayer`]), либо во внешнем key/value хранилище,
//! общем для многих процессов ([`DistributedLayer`]).

/// Загрузка настроек.
pub mod config;
/// Типы ошибок и псевдонимы `Result`.
pub mod error;
/// Каналы, группы, слои и сессии.
pub mod layer;
/// Настройка подписчика `tracing`.
pub mod logging;
/// Хранилища key/value для распределённого слоя.
pub mod store;

// -----------------------------------------------------------------------------
//  Frequently used public types
// -----------------------------------------------------------------------------

pub use self::config::{Backend, LayerSettings, Settings};
pub use error::{
    DeliveryError, ErrorExt, InvalidNameError, LayerError, LayerResult, NameKind, StatusCode,
    StoreError,
};
pub use layer::{
    mpsc_sink, sink_fn, BroadcastSink, Channel, ChannelId, ChannelLayer, DistributedLayer, Layer,
    LocalLayer, Payload, Session, SharedSink, Sink,
};
pub use logging::{init_logging, LoggingConfig, LoggingHandle};
#[cfg(feature = "redis")]
pub use store::RedisGroupStore;
pub use store::{GroupStore, InMemoryGroupStore};
