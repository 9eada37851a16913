use tracing_subscriber::{
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::Layer as LayerTrait,
    registry::LookupSpan,
};

use super::LogFormat;

/// Строит fmt-слой в формате `format`, пишущий в `writer`.
///
/// Слой упакован в `Box`, чтобы стереть конкретный тип формата.
pub fn build_formatter<S, W>(
    format: LogFormat,
    with_ansi: bool,
    with_target: bool,
    writer: W,
) -> Box<dyn LayerTrait<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .event_format(fmt::format().json().with_current_span(true))
                .with_writer(writer)
                .with_ansi(with_ansi)
                .with_target(with_target);
            Box::new(layer)
        }
        LogFormat::Pretty => {
            let layer = fmt::layer()
                .event_format(fmt::format().pretty())
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(writer)
                .with_ansi(with_ansi)
                .with_target(with_target);
            Box::new(layer)
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .event_format(fmt::format().compact())
                .with_writer(writer)
                .with_ansi(with_ansi)
                .with_target(with_target);
            Box::new(layer)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::{prelude::*, registry::Registry};

    use super::*;

    #[derive(Clone)]
    struct Buf(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Buf {
        fn write(
            &mut self,
            buf: &[u8],
        ) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(format: LogFormat) -> String {
        let out = Arc::new(Mutex::new(Vec::new()));
        let buf = Buf(out.clone());
        let layer = build_formatter::<Registry, _>(format, false, true, move || buf.clone());
        let subscriber = Registry::default().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(group = "room", "group send");
        });
        let text = String::from_utf8_lossy(&out.lock().unwrap()).to_string();
        text
    }

    #[test]
    fn test_json_format_is_json() {
        let line = capture(LogFormat::Json);
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["fields"]["message"], "group send");
        assert_eq!(value["fields"]["group"], "room");
    }

    #[test]
    fn test_compact_and_pretty_contain_message() {
        for format in [LogFormat::Compact, LogFormat::Pretty] {
            let text = capture(format);
            assert!(text.contains("group send"), "{format:?}: {text}");
        }
    }
}
