use async_trait::async_trait;
use groupcast_error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Key/value хранилище хешей с полями.
///
/// Любое хранилище с этими примитивами годится для
/// [`DistributedLayer`](crate::layer::DistributedLayer). Шаблоны в синтаксисе
/// glob (`*`, `?`, `[..]`), как у Redis `SCAN MATCH`.
#[async_trait]
pub trait GroupStore: Send + Sync {
    /// Устанавливает соединение. Вызывается один раз до любых других операций.
    async fn connect(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Записывает `field` хеша `key`, создавая хеш при необходимости.
    async fn hset(
        &self,
        key: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<()>;

    /// Удаляет `field` из хеша `key`. Возвращает, было ли поле.
    async fn hdel(
        &self,
        key: &str,
        field: &str,
    ) -> StoreResult<bool>;

    /// Имена полей хеша `key`; пусто, если ключа нет.
    async fn hkeys(
        &self,
        key: &str,
    ) -> StoreResult<Vec<String>>;

    /// Все ключи, подходящие под `pattern`.
    async fn scan(
        &self,
        pattern: &str,
    ) -> StoreResult<Vec<String>>;

    /// Удаляет `key`. Возвращает, был ли ключ.
    async fn del(
        &self,
        key: &str,
    ) -> StoreResult<bool>;
}
