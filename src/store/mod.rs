//! Внешние key/value хранилища для членства в группах.
//!
//! - `group_store`: трейт [`GroupStore`], примитивы распределённого слоя
//!   (поля хешей, обход ключей, удаление ключа).
//! - `memory`: хранилище на `DashMap`, общее для клонов.
//! - `redis`: хранилище на Redis (feature `redis`).

pub mod group_store;
pub mod memory;
#[cfg(feature = "redis")]
pub mod redis;

pub use group_store::*;
pub use memory::*;
#[cfg(feature = "redis")]
pub use self::redis::*;
