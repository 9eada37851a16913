use async_trait::async_trait;
use groupcast_error::StoreError;
use redis::{aio::MultiplexedConnection, AsyncCommands, Client, ErrorKind, RedisError};
use tokio::sync::OnceCell;
use tracing::info;

use super::{GroupStore, StoreResult};

/// Адрес сервера Redis по умолчанию.
pub const DEFAULT_REDIS_URL: &str = "redis://localhost";

/// [`GroupStore`] поверх сервера Redis.
///
/// Одно мультиплексированное соединение: его открывает первый `connect`,
/// дальше им пользуются все вызовы.
pub struct RedisGroupStore {
    url: String,
    client: Client,
    conn: OnceCell<MultiplexedConnection>,
}

impl RedisGroupStore {
    /// Разбирает `url`; соединения нет до [`GroupStore::connect`].
    pub fn open(url: &str) -> StoreResult<Self> {
        let client = Client::open(url).map_err(|e| StoreError::ConnectionFailed {
            address: url.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            url: url.to_string(),
            client,
            conn: OnceCell::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn conn(&self) -> StoreResult<MultiplexedConnection> {
        let conn = self
            .conn
            .get_or_try_init(|| async {
                let conn = self
                    .client
                    .get_multiplexed_async_connection()
                    .await
                    .map_err(|e| StoreError::ConnectionFailed {
                        address: self.url.clone(),
                        reason: e.to_string(),
                    })?;
                info!(url = %self.url, "connected to redis group store");
                Ok::<_, StoreError>(conn)
            })
            .await?;
        Ok(conn.clone())
    }

    /// Переводит ошибку Redis в операции `operation` в [`StoreError`].
    fn store_error(
        &self,
        operation: &str,
        err: RedisError,
    ) -> StoreError {
        map_error(&self.url, operation, err)
    }
}

fn map_error(
    url: &str,
    operation: &str,
    err: RedisError,
) -> StoreError {
    if err.is_timeout() {
        StoreError::Timeout {
            operation: operation.to_string(),
        }
    } else if err.is_connection_dropped() || err.is_connection_refusal() || err.is_io_error() {
        StoreError::ConnectionFailed {
            address: url.to_string(),
            reason: err.to_string(),
        }
    } else if err.kind() == ErrorKind::TypeError {
        StoreError::Protocol {
            reason: err.to_string(),
        }
    } else {
        StoreError::Command {
            operation: operation.to_string(),
            reason: err.to_string(),
        }
    }
}

#[async_trait]
impl GroupStore for RedisGroupStore {
    async fn connect(&self) -> StoreResult<()> {
        self.conn().await.map(|_| ())
    }

    async fn hset(
        &self,
        key: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<()> {
        let mut conn = self.conn().await?;
        conn.hset::<_, _, _, ()>(key, field, value)
            .await
            .map_err(|e| self.store_error("HSET", e))
    }

    async fn hdel(
        &self,
        key: &str,
        field: &str,
    ) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn
            .hdel(key, field)
            .await
            .map_err(|e| self.store_error("HDEL", e))?;
        Ok(removed > 0)
    }

    async fn hkeys(
        &self,
        key: &str,
    ) -> StoreResult<Vec<String>> {
        let mut conn = self.conn().await?;
        conn.hkeys(key).await.map_err(|e| self.store_error("HKEYS", e))
    }

    async fn scan(
        &self,
        pattern: &str,
    ) -> StoreResult<Vec<String>> {
        let mut conn = self.conn().await?;
        let mut iter = conn
            .scan_match::<_, String>(pattern)
            .await
            .map_err(|e| self.store_error("SCAN", e))?;

        // Проходим курсор целиком, а не только первую страницу.
        let mut keys = Vec::new();
        while let Some(key) = iter.next_item().await {
            keys.push(key);
        }
        Ok(keys)
    }

    async fn del(
        &self,
        key: &str,
    ) -> StoreResult<bool> {
        let mut conn = self.conn().await?;
        let removed: i64 = conn.del(key).await.map_err(|e| self.store_error("DEL", e))?;
        Ok(removed > 0)
    }
}
