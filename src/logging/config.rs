use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Префикс имени файла лога по умолчанию.
pub const DEFAULT_FILE_PREFIX: &str = "groupcast.log";

/// Формат вывода консольного и файлового слоёв.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

/// Секция `[logging]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень или полная директива фильтра, например `info` или `groupcast=debug,warn`.
    pub level: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub with_target: bool,
    /// Каталог файла лога с ежедневной ротацией; без него файла нет.
    pub file_dir: Option<PathBuf>,
    pub file_prefix: String,
}

impl LoggingConfig {
    /// Директива фильтра из `level`.
    ///
    /// Голый уровень действует на всё; строка с `=` или `,` берётся как
    /// директива без изменений.
    pub fn build_filter_directive(&self) -> String {
        let level = self.level.trim();
        if level.is_empty() {
            "info".to_string()
        } else {
            level.to_string()
        }
    }

    pub fn file_enabled(&self) -> bool {
        self.file_dir.is_some()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            with_ansi: true,
            with_target: true,
            file_dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}
