use std::time::Duration;

use async_trait::async_trait;
use groupcast_error::{DeliveryError, InvalidNameError, NameKind};
use parking_lot::RwLock;
use tokio::sync::OnceCell;
use tracing::{debug, info, trace};

use super::{validate_name, Channel, ChannelLayer, Payload, SharedSink, DEFAULT_CHANNEL_EXPIRES};
use crate::{error::LayerResult, store::GroupStore};

/// Пространство имён ключей групп по умолчанию.
pub const DEFAULT_PREFIX: &str = "group";

/// Значение поля членства; важно только имя поля.
const MEMBER_MARKER: &str = "1";

/// Слой каналов, членство которого хранится во внешнем [`GroupStore`].
///
/// Группа — это хеш по ключу `<prefix>_<group>`, участник — поле этого
/// хеша с именем канала. Сами каналы не сохраняются, поэтому доставка не
/// может попасть в конкретное соединение: все участники обслуживаются
/// одним общим sink, заданным через [`set_sink`](Self::set_sink). Это
/// корректно, только если общий sink сам раздаёт сообщение всему процессу
/// (например, [`BroadcastSink`](super::BroadcastSink)).
///
/// В отличие от [`LocalLayer`](super::LocalLayer), просроченные каналы не
/// вычищаются: участник остаётся до `remove` или `flush`.
pub struct DistributedLayer<S> {
    store: S,
    prefix: String,
    sink: RwLock<Option<SharedSink>>,
    connected: OnceCell<()>,
    /// Срок жизни каналов, которые создаёт [`ChannelLayer::add_named`].
    expires: Duration,
}

impl<S: GroupStore> DistributedLayer<S> {
    /// Слой поверх `store`; ключи групп начинаются с `prefix`.
    pub fn new(
        store: S,
        prefix: &str,
    ) -> Result<Self, InvalidNameError> {
        validate_name(NameKind::Group, prefix)?;
        Ok(Self {
            store,
            prefix: prefix.to_string(),
            sink: RwLock::new(None),
            connected: OnceCell::new(),
            expires: DEFAULT_CHANNEL_EXPIRES,
        })
    }

    /// Задаёт срок жизни каналов, создаваемых `add_named`.
    pub fn with_expires(
        mut self,
        expires: Duration,
    ) -> Self {
        self.expires = expires;
        self
    }

    pub fn expires(&self) -> Duration {
        self.expires
    }

    /// То же, что [`new`](Self::new), но с уже заданным общим sink.
    pub fn with_sink(
        store: S,
        prefix: &str,
        sink: SharedSink,
    ) -> Result<Self, InvalidNameError> {
        let layer = Self::new(store, prefix)?;
        layer.set_sink(sink);
        Ok(layer)
    }

    /// Заменяет общий sink, через который работает `group_send`.
    ///
    /// Побеждает последний вызов.
    pub fn set_sink(
        &self,
        sink: SharedSink,
    ) {
        *self.sink.write() = Some(sink);
    }

    pub fn sink(&self) -> Option<SharedSink> {
        self.sink.read().clone()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Ключ группы в хранилище: `<prefix>_<group>`, если префикса ещё нет.
    pub fn group_key(
        &self,
        group: &str,
    ) -> String {
        match group.strip_prefix(self.prefix.as_str()) {
            Some(rest) if rest.starts_with('_') => group.to_string(),
            _ => format!("{}_{}", self.prefix, group),
        }
    }

    /// Подключается к хранилищу один раз.
    ///
    /// Каждая операция сначала вызывает этот метод; одновременные первые
    /// вызовы ждут одну и ту же попытку. Неудачная попытка не запоминается,
    /// следующий вызов пробует снова.
    pub async fn connect(&self) -> LayerResult<()> {
        self.connected
            .get_or_try_init(|| async {
                self.store.connect().await?;
                info!(prefix = %self.prefix, "distributed layer connected");
                Ok::<_, crate::error::LayerError>(())
            })
            .await?;
        Ok(())
    }

    async fn group_keys(&self) -> LayerResult<Vec<String>> {
        Ok(self.store.scan(&self.group_key("*")).await?)
    }

    async fn insert(
        &self,
        group: &str,
        channel: &str,
    ) -> LayerResult<()> {
        let key = self.group_key(group);
        self.store.hset(&key, channel, MEMBER_MARKER).await?;
        debug!(key = %key, channel, "channel added");
        Ok(())
    }
}

#[async_trait]
impl<S: GroupStore> ChannelLayer for DistributedLayer<S> {
    async fn add(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()> {
        self.connect().await?;
        validate_name(NameKind::Group, group)?;
        self.insert(group, channel.name()).await
    }

    async fn add_named(
        &self,
        group: &str,
        name: &str,
        sink: Option<SharedSink>,
    ) -> LayerResult<Channel> {
        self.connect().await?;
        validate_name(NameKind::Group, group)?;
        let channel = Channel::new(Some(name), sink, self.expires)?;
        self.insert(group, channel.name()).await?;
        Ok(channel)
    }

    async fn remove(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()> {
        self.connect().await?;
        let key = self.group_key(group);
        if self.store.hdel(&key, channel.name()).await? {
            debug!(key = %key, channel = channel.name(), "channel removed");
        }
        Ok(())
    }

    async fn remove_channel(
        &self,
        channel: &Channel,
    ) -> LayerResult<()> {
        self.connect().await?;
        // Обратного индекса нет: проходим все группы пространства имён.
        let keys = self.group_keys().await?;
        for key in &keys {
            self.store.hdel(key, channel.name()).await?;
        }
        debug!(
            channel = channel.name(),
            scanned = keys.len(),
            "channel removed from all groups"
        );
        Ok(())
    }

    async fn flush(&self) -> LayerResult<()> {
        self.connect().await?;
        let keys = self.group_keys().await?;
        for key in &keys {
            self.store.del(key).await?;
        }
        debug!(prefix = %self.prefix, groups = keys.len(), "layer flushed");
        Ok(())
    }

    async fn group_send(
        &self,
        group: &str,
        payload: Payload,
    ) -> LayerResult<()> {
        self.connect().await?;
        let members = self.store.hkeys(&self.group_key(group)).await?;

        trace!(
            group,
            members = members.len(),
            bytes = payload.len_hint(),
            "group send"
        );

        if members.is_empty() {
            return Ok(());
        }
        let sink = self.sink().ok_or_else(|| DeliveryError::NoSink {
            channel: members[0].clone(),
        })?;

        // Одна доставка через общий sink на каждого участника группы.
        for _ in &members {
            Channel::anonymous(Some(sink.clone()))
                .send(payload.clone())
                .await?;
        }
        Ok(())
    }

    async fn members(
        &self,
        group: &str,
    ) -> LayerResult<Vec<String>> {
        self.connect().await?;
        Ok(self.store.hkeys(&self.group_key(group)).await?)
    }
}
