use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use groupcast_error::{DeliveryError, InvalidNameError, NameKind};

use super::{random_name, validate_name, Payload, SharedSink};

/// Срок жизни канала по умолчанию.
pub const DEFAULT_CHANNEL_EXPIRES: Duration = Duration::from_secs(60);

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(1);

/// Уникальный в процессе идентификатор [`Channel`].
///
/// Членство в локальном слое хранится по нему, а не по имени: два канала
/// с одинаковым именем — два разных участника.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl ChannelId {
    fn next() -> Self {
        Self(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct ChannelInner {
    id: ChannelId,
    name: Arc<str>,
    expires: Duration,
    created_at: SystemTime,
    sink: Option<SharedSink>,
}

/// Именованный канал к одному получателю с ограниченным сроком жизни.
///
/// Клонировать дёшево, и клон — *тот же* канал: у него те же id, время
/// создания и sink. Равенство и хеш считаются по id.
#[derive(Clone)]
pub struct Channel {
    inner: Arc<ChannelInner>,
}

impl Channel {
    /// Создаёт канал.
    ///
    /// Без `name` генерируется случайное имя из 12 букв. Заданное имя должно
    /// быть идентификатором, иначе возвращается [`InvalidNameError`].
    pub fn new(
        name: Option<&str>,
        sink: Option<SharedSink>,
        expires: Duration,
    ) -> Result<Self, InvalidNameError> {
        let name: Arc<str> = match name {
            Some(name) => {
                validate_name(NameKind::Channel, name)?;
                Arc::from(name)
            }
            None => Arc::from(random_name()),
        };

        Ok(Self::build(name, sink, expires))
    }

    /// Именованный канал со сроком жизни по умолчанию.
    pub fn named(
        name: &str,
        sink: Option<SharedSink>,
    ) -> Result<Self, InvalidNameError> {
        Self::new(Some(name), sink, DEFAULT_CHANNEL_EXPIRES)
    }

    /// Канал со сгенерированным именем и сроком жизни по умолчанию.
    pub fn anonymous(sink: Option<SharedSink>) -> Self {
        Self::anonymous_with_expires(sink, DEFAULT_CHANNEL_EXPIRES)
    }

    /// Канал со сгенерированным именем и заданным сроком жизни.
    pub fn anonymous_with_expires(
        sink: Option<SharedSink>,
        expires: Duration,
    ) -> Self {
        Self::build(Arc::from(random_name()), sink, expires)
    }

    fn build(
        name: Arc<str>,
        sink: Option<SharedSink>,
        expires: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(ChannelInner {
                id: ChannelId::next(),
                name,
                expires,
                created_at: SystemTime::now(),
                sink,
            }),
        }
    }

    pub fn id(&self) -> ChannelId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn expires(&self) -> Duration {
        self.inner.expires
    }

    pub fn created_at(&self) -> SystemTime {
        self.inner.created_at
    }

    pub fn has_sink(&self) -> bool {
        self.inner.sink.is_some()
    }

    /// Передаёт `payload` в sink канала.
    ///
    /// Ошибки sink возвращаются как есть, без повторов.
    pub async fn send(
        &self,
        payload: Payload,
    ) -> Result<(), DeliveryError> {
        match &self.inner.sink {
            Some(sink) => sink.deliver(payload).await,
            None => Err(DeliveryError::NoSink {
                channel: self.name().to_string(),
            }),
        }
    }

    /// Истёк ли срок жизни канала.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(SystemTime::now())
    }

    /// Проверка срока жизни на заданный момент времени.
    ///
    /// Время создания усекается до целых секунд, сравнение строгое:
    /// `created_at + expires < now`.
    pub fn is_expired_at(
        &self,
        now: SystemTime,
    ) -> bool {
        let created = self
            .inner
            .created_at
            .duration_since(UNIX_EPOCH)
            .map(|d| Duration::from_secs(d.as_secs()))
            .unwrap_or_default();
        let now = now.duration_since(UNIX_EPOCH).unwrap_or_default();
        created + self.inner.expires < now
    }
}

impl PartialEq for Channel {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Channel {}

impl Hash for Channel {
    fn hash<H: Hasher>(
        &self,
        state: &mut H,
    ) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Channel {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("Channel")
            .field("name", &self.inner.name)
            .field("id", &self.inner.id.0)
            .finish()
    }
}
