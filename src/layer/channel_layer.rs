use async_trait::async_trait;

use super::{Channel, Payload, SharedSink};
use crate::error::LayerResult;

/// Членство в группах и рассылка, общие для всех бэкендов.
///
/// Удаление отсутствующего никогда не ошибка: соединения рвутся
/// одновременно с изменением групп, и эта гонка не должна ломать доставку.
/// Имена, не являющиеся идентификаторами, отклоняются в `add`.
#[async_trait]
pub trait ChannelLayer: Send + Sync {
    /// Добавляет `channel` в `group`. Повторное добавление ничего не меняет.
    async fn add(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()>;

    /// Создаёт канал `name` с `sink` и добавляет его в `group`.
    ///
    /// Канал возвращается, чтобы его можно было потом удалить.
    async fn add_named(
        &self,
        group: &str,
        name: &str,
        sink: Option<SharedSink>,
    ) -> LayerResult<Channel>;

    /// Убирает `channel` из `group`, если он там есть.
    async fn remove(
        &self,
        group: &str,
        channel: &Channel,
    ) -> LayerResult<()>;

    /// Убирает `channel` из всех его групп.
    async fn remove_channel(
        &self,
        channel: &Channel,
    ) -> LayerResult<()>;

    /// Удаляет все группы и членства.
    async fn flush(&self) -> LayerResult<()>;

    /// Доставляет `payload` каждому текущему участнику `group` по очереди.
    /// Первая ошибка доставки прерывает рассылку и возвращается.
    async fn group_send(
        &self,
        group: &str,
        payload: Payload,
    ) -> LayerResult<()>;

    /// Имена текущих участников `group`.
    async fn members(
        &self,
        group: &str,
    ) -> LayerResult<Vec<String>>;
}
