use std::{collections::BTreeSet, sync::Arc};

use parking_lot::Mutex;
use tracing::debug;

use super::{Channel, ChannelLayer, Layer, Payload, SharedSink};
use crate::error::LayerResult;

/// Слой каналов глазами одного соединения.
///
/// Сессия владеет анонимным каналом, привязанным к sink соединения. На
/// распределённом слое sink последней открытой сессии становится общим sink
/// слоя. [`close`](Self::close) убирает канал из всех групп; вызывать при
/// разрыве соединения.
pub struct Session {
    layer: Arc<Layer>,
    channel: Channel,
    groups: Mutex<BTreeSet<String>>,
}

impl Session {
    pub fn open(
        layer: Arc<Layer>,
        sink: SharedSink,
    ) -> Self {
        let channel = Channel::anonymous_with_expires(Some(sink.clone()), layer.channel_expires());
        if layer.replace_shared_sink(sink) {
            debug!(channel = channel.name(), "session sink is now the shared sink");
        }
        debug!(channel = channel.name(), backend = layer.backend_name(), "session opened");

        Self {
            layer,
            channel,
            groups: Mutex::new(BTreeSet::new()),
        }
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn layer(&self) -> &Arc<Layer> {
        &self.layer
    }

    /// Группы, в которые вошли и из которых ещё не вышли, по имени.
    pub fn groups(&self) -> Vec<String> {
        self.groups.lock().iter().cloned().collect()
    }

    pub async fn join(
        &self,
        group: &str,
    ) -> LayerResult<()> {
        self.layer.add(group, &self.channel).await?;
        self.groups.lock().insert(group.to_string());
        Ok(())
    }

    pub async fn leave(
        &self,
        group: &str,
    ) -> LayerResult<()> {
        self.layer.remove(group, &self.channel).await?;
        self.groups.lock().remove(group);
        Ok(())
    }

    /// Рассылает `payload` группе; состоять в ней не обязательно.
    pub async fn send_to(
        &self,
        group: &str,
        payload: impl Into<Payload>,
    ) -> LayerResult<()> {
        self.layer.group_send(group, payload.into()).await
    }

    /// Убирает канал из всех групп.
    pub async fn close(self) -> LayerResult<()> {
        self.layer.remove_channel(&self.channel).await?;
        let groups = self.groups.lock().len();
        debug!(channel = self.channel.name(), groups, "session closed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{Backend, LayerSettings},
        layer::{mpsc_sink, BroadcastSink},
    };

    fn local() -> Arc<Layer> {
        Arc::new(Layer::initialize(&LayerSettings::default()).unwrap())
    }

    #[tokio::test]
    async fn test_join_send_leave() {
        let layer = local();
        let (sink, mut rx) = mpsc_sink("conn");
        let session = Session::open(layer.clone(), sink);

        session.join("room").await.unwrap();
        session.send_to("room", "hi").await.unwrap();
        assert_eq!(rx.recv().await, Some(Payload::from("hi")));
        assert_eq!(session.groups(), vec!["room"]);

        session.leave("room").await.unwrap();
        assert!(session.groups().is_empty());
        assert!(layer.members("room").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_close_removes_everywhere() {
        let layer = local();
        let (sink, _rx) = mpsc_sink("conn");
        let session = Session::open(layer.clone(), sink);
        for group in ["a", "b"] {
            session.join(group).await.unwrap();
        }
        let name = session.channel().name().to_string();
        assert_eq!(layer.members("a").await.unwrap(), vec![name]);

        session.close().await.unwrap();
        assert!(layer.members("a").await.unwrap().is_empty());
        assert!(layer.members("b").await.unwrap().is_empty());
    }

    /// Канал сессии живёт 60 секунд на любом бэкенде.
    #[test]
    fn test_session_channel_uses_channel_expiry() {
        for backend in [Backend::Local, Backend::Memory] {
            let layer = Arc::new(
                Layer::initialize(&LayerSettings {
                    backend,
                    ..Default::default()
                })
                .unwrap(),
            );
            let (sink, _rx) = mpsc_sink("conn");
            let session = Session::open(layer, sink);
            assert_eq!(
                session.channel().expires(),
                std::time::Duration::from_secs(60)
            );
        }
    }

    /// Общим sink распределённого слоя становится sink последней сессии.
    #[tokio::test]
    async fn test_latest_session_sink_becomes_shared() {
        let layer = Arc::new(
            Layer::initialize(&LayerSettings {
                backend: Backend::Memory,
                ..Default::default()
            })
            .unwrap(),
        );
        let shared = Arc::new(BroadcastSink::new(8));
        let mut rx = shared.subscribe();

        let (other, mut other_rx) = mpsc_sink("other");
        let first = Session::open(layer.clone(), other);
        let second = Session::open(layer.clone(), shared.clone());

        first.join("room").await.unwrap();
        second.join("room").await.unwrap();
        second.send_to("room", "x").await.unwrap();

        // два участника — две доставки через общий sink
        assert_eq!(rx.recv().await.unwrap(), Payload::from("x"));
        assert_eq!(rx.recv().await.unwrap(), Payload::from("x"));
        assert_eq!(
            shared
                .delivered_count
                .load(std::sync::atomic::Ordering::Relaxed),
            2
        );
        assert!(other_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_join_rejects_invalid_group() {
        let (sink, _rx) = mpsc_sink("conn");
        let session = Session::open(local(), sink);
        assert!(session.join("1room").await.unwrap_err().is_invalid_name());
        assert!(session.groups().is_empty());
    }
}
