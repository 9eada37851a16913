use std::time::Instant;

use tracing_appender::non_blocking::WorkerGuard;

/// Держит конвейер логирования живым.
///
/// Хранит guard файловой записи; drop сбрасывает буфер.
/// При выходе вызовите [`shutdown`](Self::shutdown), чтобы сбросить буфер явно
/// и залогировать, сколько это заняло.
pub struct LoggingHandle {
    file_guard: Option<WorkerGuard>,
}

impl LoggingHandle {
    pub fn new(file_guard: Option<WorkerGuard>) -> Self {
        Self { file_guard }
    }

    /// Подключён ли файловый слой.
    pub fn has_file_sink(&self) -> bool {
        self.file_guard.is_some()
    }

    /// Сбрасывает и отключает файловый слой.
    pub fn shutdown(mut self) {
        let start = Instant::now();
        tracing::debug!(file_sink = self.has_file_sink(), "logging shutdown");
        drop(self.file_guard.take());
        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            "logging shutdown completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_without_file_sink() {
        let handle = LoggingHandle::new(None);
        assert!(!handle.has_file_sink());
        handle.shutdown();
    }

    #[test]
    fn test_shutdown_flushes_file_writer() {
        use std::io::Write;

        let tmp = tempfile::tempdir().unwrap();
        let appender = tracing_appender::rolling::never(tmp.path(), "out.log");
        let (mut writer, guard) = tracing_appender::non_blocking(appender);
        writer.write_all(b"last line\n").unwrap();

        let handle = LoggingHandle::new(Some(guard));
        assert!(handle.has_file_sink());
        handle.shutdown();

        let text = std::fs::read_to_string(tmp.path().join("out.log")).unwrap();
        assert_eq!(text, "last line\n");
    }
}
