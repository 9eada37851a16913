//! Конфигурация: встроенные значения по умолчанию, необязательный TOML-файл
//! и переменные окружения `GROUPCAST_*`, по возрастанию приоритета.

pub mod layer;
pub mod settings;

pub use layer::{Backend, LayerSettings};
pub use settings::{Settings, ENV_PREFIX};
