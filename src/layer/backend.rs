use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use super::{Channel, ChannelLayer, DistributedLayer, LocalLayer, Payload, SharedSink};
use crate::{
    config::{Backend, LayerSettings},
    error::LayerResult,
    store::InMemoryGroupStore,
};
#[cfg(feature = "redis")]
use crate::store::RedisGroupStore;

/// Слой каналов, выбранный при старте.
///
/// Создаётся один раз и передаётся транспорту, обычно как `Arc<Layer>`.
pub enum Layer {
    Local(LocalLayer),
    Memory(DistributedLayer<InMemoryGroupStore>),
    #[cfg(feature = "redis")]
    Redis(DistributedLayer<RedisGroupStore>),
}

impl Layer {
    /// Создаёт слой по `settings`.
    ///
    /// Подключения ещё нет: распределённый слой подключается при первом
    /// обращении.
    pub fn initialize(settings: &LayerSettings) -> LayerResult<Self> {
        let layer = match settings.backend {
            Backend::Local => Self::Local(
                LocalLayer::new(settings.expires(), settings.capacity)
                    .with_channel_expires(settings.channel_expires()),
            ),
            Backend::Memory => Self::Memory(
                DistributedLayer::new(InMemoryGroupStore::new(), &settings.prefix)?
                    .with_expires(settings.channel_expires()),
            ),
            #[cfg(feature = "redis")]
            Backend::Redis => Self::Redis(
                DistributedLayer::new(RedisGroupStore::open(&settings.redis_url)?, &settings.prefix)?
                    .with_expires(settings.channel_expires()),
            ),
        };
        info!(backend = layer.backend_name(), "channel layer initialized");
        Ok(layer)
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::Memory(_) => "memory",
            #[cfg(feature = "redis")]
            Self::Redis(_) => "redis",
        }
    }

    /// Членство хранится вне памяти процесса.
    pub fn is_distributed(&self) -> bool {
        !matches!(self, Self::Local(_))
    }

    /// Срок жизни каналов, которые создаёт этот слой.
    pub fn channel_expires(&self) -> Duration {
        match self {
            Self::Local(layer) => layer.channel_expires(),
            Self::Memory(layer) => layer.expires(),
            #[cfg(feature = "redis")]
            Self::Redis(layer) => layer.expires(),
        }
    }

    /// Делает `sink` общим sink распределённого слоя, заменяя прежний.
    /// Возвращает `false` для локального слоя, где общего sink нет.
    pub fn replace_shared_sink(
        &self,
        sink: SharedSink,
    ) -> bool {
        match self {
            Self::Local(_) => false,
            Self::Memory(layer) => {
                layer.set_sink(sink);
                true
            }
            #[cfg(feature = "redis")]
            Self::Redis(layer) => {
                layer.set_sink(sink);
                true
            }
        }
    }

    /// Текущий общий sink; у локального слоя его нет.
    pub fn shared_sink(&self) -> Option<SharedSink> {
        match self {
            Self::Local(_) => None,
            Self::Memory(layer) => layer.sink(),
            #[cfg(feature = "redis")]
            Self::Redis(layer) => layer.sink(),
        }
    }

    /// Активный бэкенд через общий трейт.
    pub fn get_layer(&self) -> &dyn ChannelLayer {
        match self {
            Self::Local(layer) => layer,
            Self::Memory(layer) => layer,
            #[cfg(feature = "redis")]
            Self::Redis(layer) => layer,
        }
    }
}

#[async_trait]
impl ChannelLayer for Layer {
    async fn add(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()> {
        self.get_layer().add(group, channel).await
    }

    async fn add_named(
        &self,
        group: &str,
        name: &str,
        sink: Option<SharedSink>,
    ) -> LayerResult<Channel> {
        self.get_layer().add_named(group, name, sink).await
    }

    async fn remove(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()> {
        self.get_layer().remove(group, channel).await
    }

    async fn remove_channel(
        &self,
        channel: &Channel,
    ) -> LayerResult<()> {
        self.get_layer().remove_channel(channel).await
    }

    async fn flush(&self) -> LayerResult<()> {
        self.get_layer().flush().await
    }

    async fn group_send(
        &self,
        group: &str,
        payload: Payload,
    ) -> LayerResult<()> {
        self.get_layer().group_send(group, payload).await
    }

    async fn members(
        &self,
        group: &str,
    ) -> LayerResult<Vec<String>> {
        self.get_layer().members(group).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::layer::BroadcastSink;

    #[test]
    fn test_initialize_local_from_defaults() {
        let settings = LayerSettings::default();
        let layer = Layer::initialize(&settings).unwrap();
        assert_eq!(layer.backend_name(), "local");
        assert!(!layer.is_distributed());
        assert_eq!(layer.channel_expires(), Duration::from_secs(60));
    }

    /// Каналы по имени живут `channel_expires_secs`, а не `expires_secs`.
    #[tokio::test]
    async fn test_local_add_named_uses_channel_expiry() {
        let layer = Layer::initialize(&LayerSettings {
            expires_secs: 500,
            channel_expires_secs: 20,
            ..Default::default()
        })
        .unwrap();
        let ch = layer.add_named("room", "alice", None).await.unwrap();
        assert_eq!(ch.expires(), Duration::from_secs(20));
    }

    #[test]
    fn test_initialize_memory_uses_prefix_and_channel_expiry() {
        let settings = LayerSettings {
            backend: Backend::Memory,
            prefix: "chat".into(),
            channel_expires_secs: 15,
            ..Default::default()
        };
        let layer = Layer::initialize(&settings).unwrap();
        match &layer {
            Layer::Memory(inner) => {
                assert_eq!(inner.prefix(), "chat");
                assert_eq!(inner.group_key("room"), "chat_room");
            }
            _ => panic!("expected memory backend"),
        }
        assert_eq!(layer.channel_expires(), Duration::from_secs(15));
    }

    #[test]
    fn test_initialize_rejects_bad_prefix() {
        let settings = LayerSettings {
            backend: Backend::Memory,
            prefix: "bad prefix".into(),
            ..Default::default()
        };
        let err = Layer::initialize(&settings).err().unwrap();
        assert!(err.is_invalid_name());
    }

    #[test]
    fn test_replace_shared_sink_only_on_distributed() {
        let local = Layer::initialize(&LayerSettings::default()).unwrap();
        assert!(!local.replace_shared_sink(Arc::new(BroadcastSink::new(1))));
        assert!(local.shared_sink().is_none());

        let memory = Layer::initialize(&LayerSettings {
            backend: Backend::Memory,
            ..Default::default()
        })
        .unwrap();
        let first: SharedSink = Arc::new(BroadcastSink::new(1));
        let second: SharedSink = Arc::new(BroadcastSink::new(1));
        assert!(memory.replace_shared_sink(first));
        assert!(memory.replace_shared_sink(second.clone()));
        assert!(Arc::ptr_eq(&memory.shared_sink().unwrap(), &second));
    }

    #[tokio::test]
    async fn test_dispatch_through_enum() {
        let layer = Layer::initialize(&LayerSettings::default()).unwrap();
        let (sink, mut rx) = crate::layer::mpsc_sink("me");
        let ch = layer.add_named("room", "me", Some(sink)).await.unwrap();
        layer.group_send("room", Payload::from("hello")).await.unwrap();
        assert_eq!(rx.recv().await, Some(Payload::from("hello")));

        layer.remove_channel(&ch).await.unwrap();
        assert!(layer.members("room").await.unwrap().is_empty());
    }

    #[cfg(feature = "redis")]
    #[test]
    fn test_initialize_redis_is_lazy() {
        let settings = LayerSettings {
            backend: Backend::Redis,
            redis_url: "redis://127.0.0.1:1".into(),
            ..Default::default()
        };
        let layer = Layer::initialize(&settings).unwrap();
        assert_eq!(layer.backend_name(), "redis");
    }
}
