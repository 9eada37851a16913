use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use dashmap::DashMap;
use globset::Glob;
use groupcast_error::StoreError;

use super::{GroupStore, StoreResult};

/// [`GroupStore`] в памяти процесса.
///
/// Клоны делят одни данные, поэтому слои поверх клонов одного хранилища
/// ведут себя как процессы с общим внешним сервером. Хеш, у которого
/// удалили последнее поле, исчезает, как в Redis.
#[derive(Clone, Default)]
pub struct InMemoryGroupStore {
    data: Arc<DashMap<String, HashMap<String, String>>>,
    connects: Arc<AtomicUsize>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Сколько раз вызывали `connect` во всех клонах.
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::Relaxed)
    }

    /// Число ключей в хранилище.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Значение `field` хеша `key`.
    pub fn hget(
        &self,
        key: &str,
        field: &str,
    ) -> Option<String> {
        self.data
            .get(key)
            .and_then(|hash| hash.get(field).cloned())
    }
}

#[async_trait]
impl GroupStore for InMemoryGroupStore {
    async fn connect(&self) -> StoreResult<()> {
        self.connects.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn hset(
        &self,
        key: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<()> {
        self.data
            .entry(key.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn hdel(
        &self,
        key: &str,
        field: &str,
    ) -> StoreResult<bool> {
        let existed = match self.data.get_mut(key) {
            Some(mut hash) => hash.remove(field).is_some(),
            None => return Ok(false),
        };
        // Ссылка на шард уже отпущена, иначе remove_if заблокируется.
        self.data.remove_if(key, |_, hash| hash.is_empty());
        Ok(existed)
    }

    async fn hkeys(
        &self,
        key: &str,
    ) -> StoreResult<Vec<String>> {
        Ok(self
            .data
            .get(key)
            .map(|hash| hash.keys().cloned().collect())
            .unwrap_or_default())
    }

    async fn scan(
        &self,
        pattern: &str,
    ) -> StoreResult<Vec<String>> {
        let matcher = Glob::new(pattern)
            .map_err(|e| StoreError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })?
            .compile_matcher();

        Ok(self
            .data
            .iter()
            .filter(|entry| matcher.is_match(entry.key().as_str()))
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn del(
        &self,
        key: &str,
    ) -> StoreResult<bool> {
        Ok(self.data.remove(key).is_some())
    }
}
