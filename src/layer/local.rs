use std::{collections::HashMap, sync::Arc, time::Duration};

use async_trait::async_trait;
use groupcast_error::NameKind;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use super::{
    validate_name, Channel, ChannelId, ChannelLayer, Payload, SharedSink, DEFAULT_CHANNEL_EXPIRES,
};
use crate::error::LayerResult;

/// Срок жизни слоя по умолчанию.
pub const DEFAULT_LAYER_EXPIRES: Duration = Duration::from_secs(36_000);
/// Рекомендуемый размер группы по умолчанию.
pub const DEFAULT_CAPACITY: usize = 100;

type Members = HashMap<ChannelId, Channel>;

/// Слой каналов в памяти процесса.
///
/// Хранит `имя группы → участники` в map под одним mutex. Блокировка не
/// держится через `.await`: `group_send` вычищает просроченные каналы,
/// снимает копию участников и отпускает блокировку до доставки.
///
/// Просроченные каналы удаляются лениво, проходом в начале каждого
/// `group_send`.
pub struct LocalLayer {
    groups: Mutex<HashMap<Arc<str>, Members>>,
    /// Рекомендуемый размер группы: превышение логируется, но не запрещается.
    capacity: usize,
    /// Срок жизни слоя по умолчанию; на членство не влияет.
    expires: Duration,
    /// Срок жизни каналов, которые создаёт [`ChannelLayer::add_named`].
    channel_expires: Duration,
}

impl LocalLayer {
    pub fn new(
        expires: Duration,
        capacity: usize,
    ) -> Self {
        Self {
            groups: Mutex::new(HashMap::new()),
            capacity,
            expires,
            channel_expires: DEFAULT_CHANNEL_EXPIRES,
        }
    }

    /// Задаёт срок жизни каналов, создаваемых по имени.
    pub fn with_channel_expires(
        mut self,
        channel_expires: Duration,
    ) -> Self {
        self.channel_expires = channel_expires;
        self
    }

    pub fn channel_expires(&self) -> Duration {
        self.channel_expires
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn expires(&self) -> Duration {
        self.expires
    }

    /// Число групп хотя бы с одним участником.
    pub fn group_count(&self) -> usize {
        self.groups.lock().len()
    }

    /// Удаляет все просроченные членства во всех группах.
    ///
    /// Возвращает число удалённых членств. Опустевшие группы удаляются.
    pub fn clean_expired(&self) -> usize {
        let mut groups = self.groups.lock();
        let mut removed = 0;

        groups.retain(|group, members| {
            let before = members.len();
            members.retain(|_, channel| !channel.is_expired());
            let dropped = before - members.len();
            if dropped > 0 {
                trace!(group = %group, dropped, "expired channels swept");
            }
            removed += dropped;
            !members.is_empty()
        });

        if removed > 0 {
            debug!(removed, "expired memberships removed");
        }
        removed
    }

    fn insert(
        &self,
        group: &str,
        channel: &Channel,
    ) {
        let mut groups = self.groups.lock();
        let members = groups.entry(Arc::from(group)).or_default();
        members.insert(channel.id(), channel.clone());

        if members.len() > self.capacity {
            warn!(
                group,
                size = members.len(),
                capacity = self.capacity,
                "group exceeds advisory capacity"
            );
        }
        debug!(group, channel = channel.name(), id = %channel.id(), "channel added");
    }

    fn snapshot(
        &self,
        group: &str,
    ) -> Vec<Channel> {
        self.groups
            .lock()
            .get(group)
            .map(|members| members.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl Default for LocalLayer {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER_EXPIRES, DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl ChannelLayer for LocalLayer {
    async fn add(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()> {
        validate_name(NameKind::Group, group)?;
        self.insert(group, channel);
        Ok(())
    }

    async fn add_named(
        &self,
        group: &str,
        name: &str,
        sink: Option<SharedSink>,
    ) -> LayerResult<Channel> {
        validate_name(NameKind::Group, group)?;
        let channel = Channel::new(Some(name), sink, self.channel_expires)?;
        self.insert(group, &channel);
        Ok(channel)
    }

    async fn remove(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()> {
        let mut groups = self.groups.lock();
        if let Some(members) = groups.get_mut(group) {
            if members.remove(&channel.id()).is_some() {
                debug!(group, channel = channel.name(), "channel removed");
            }
            if members.is_empty() {
                groups.remove(group);
            }
        }
        Ok(())
    }

    async fn remove_channel(
        &self,
        channel: &Channel,
    ) -> LayerResult<()> {
        let mut groups = self.groups.lock();
        let id = channel.id();
        let mut left = 0;

        groups.retain(|_, members| {
            if members.remove(&id).is_some() {
                left += 1;
            }
            !members.is_empty()
        });

        debug!(channel = channel.name(), groups = left, "channel removed from all groups");
        Ok(())
    }

    async fn flush(&self) -> LayerResult<()> {
        let mut groups = self.groups.lock();
        let count = groups.len();
        groups.clear();
        debug!(groups = count, "layer flushed");
        Ok(())
    }

    async fn group_send(
        &self,
        group: &str,
        payload: Payload,
    ) -> LayerResult<()> {
        self.clean_expired();
        let members = self.snapshot(group);

        trace!(
            group,
            members = members.len(),
            bytes = payload.len_hint(),
            "group send"
        );

        // Первая ошибка доставки прерывает рассылку оставшимся участникам.
        for channel in &members {
            channel.send(payload.clone()).await?;
        }
        Ok(())
    }

    async fn members(
        &self,
        group: &str,
    ) -> LayerResult<Vec<String>> {
        Ok(self
            .snapshot(group)
            .iter()
            .map(|channel| channel.name().to_string())
            .collect())
    }
}
