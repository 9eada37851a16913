use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use groupcast_error::DeliveryError;
use tokio::sync::{broadcast, mpsc};

use super::Payload;

/// Способ доставки канала: передаёт сообщение конечному получателю,
/// обычно пишущей половине сетевого соединения.
#[async_trait]
pub trait Sink: Send + Sync {
    async fn deliver(
        &self,
        payload: Payload,
    ) -> Result<(), DeliveryError>;
}

pub type SharedSink = Arc<dyn Sink>;

/// Превращает async-замыкание в [`Sink`].
pub struct FnSink<F> {
    f: F,
}

impl<F> FnSink<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> Sink for FnSink<F>
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), DeliveryError>> + Send + 'static,
{
    async fn deliver(
        &self,
        payload: Payload,
    ) -> Result<(), DeliveryError> {
        (self.f)(payload).await
    }
}

/// Сокращение для `Arc::new(FnSink::new(f))`.
pub fn sink_fn<F, Fut>(f: F) -> SharedSink
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), DeliveryError>> + Send + 'static,
{
    Arc::new(FnSink::new(f))
}

/// Sink одного соединения: сообщения встают в очередь задачи, которая
/// владеет приёмником и пишет в сокет.
#[derive(Clone)]
pub struct ChannelSink {
    label: Arc<str>,
    tx: mpsc::UnboundedSender<Payload>,
}

impl ChannelSink {
    pub fn new(
        label: impl Into<Arc<str>>,
        tx: mpsc::UnboundedSender<Payload>,
    ) -> Self {
        Self {
            label: label.into(),
            tx,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl fmt::Debug for ChannelSink {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("ChannelSink")
            .field("label", &self.label)
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[async_trait]
impl Sink for ChannelSink {
    async fn deliver(
        &self,
        payload: Payload,
    ) -> Result<(), DeliveryError> {
        self.tx.send(payload).map_err(|_| DeliveryError::Closed {
            channel: self.label.to_string(),
        })
    }
}

/// Создаёт [`ChannelSink`] вместе с приёмником, который вычитывает
/// пишущая задача соединения.
pub fn mpsc_sink(label: impl Into<Arc<str>>) -> (SharedSink, mpsc::UnboundedReceiver<Payload>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (Arc::new(ChannelSink::new(label, tx)), rx)
}

/// Sink рассылки на весь процесс.
///
/// Каждый подписчик получает каждое сообщение. Именно такой sink ждёт
/// распределённый слой: один общий на процесс, а не на соединение.
pub struct BroadcastSink {
    tx: broadcast::Sender<Payload>,
    /// Успешные вызовы `deliver`.
    pub delivered_count: AtomicUsize,
    /// Вызовы `deliver` без живых подписчиков.
    pub send_error_count: AtomicUsize,
}

impl BroadcastSink {
    /// Sink, подписчики которого буферизуют до `capacity` сообщений.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            tx,
            delivered_count: AtomicUsize::new(0),
            send_error_count: AtomicUsize::new(0),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Payload> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

#[async_trait]
impl Sink for BroadcastSink {
    async fn deliver(
        &self,
        payload: Payload,
    ) -> Result<(), DeliveryError> {
        match self.tx.send(payload) {
            Ok(_) => {
                self.delivered_count.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(_) => {
                self.send_error_count.fetch_add(1, Ordering::Relaxed);
                Err(DeliveryError::NoReceivers)
            }
        }
    }
}
