//! Каналы, группы и слои, которые рассылают им сообщения.
//!
//! [`Channel`] — именованный канал к одному получателю. [`ChannelLayer`]
//! знает, какие каналы входят в какие группы, и доставляет [`Payload`]
//! каждому участнику группы. Реализаций две: [`LocalLayer`] держит всё
//! в памяти процесса, [`DistributedLayer`] хранит членство в
//! [`GroupStore`](crate::store::GroupStore), общем для многих процессов.

pub mod backend;
pub mod channel;
pub mod channel_layer;
pub mod distributed;
pub mod local;
pub mod name;
pub mod payload;
pub mod session;
pub mod sink;

pub use backend::*;
pub use channel::*;
pub use channel_layer::*;
pub use distributed::*;
pub use local::*;
pub use name::*;
pub use payload::*;
pub use session::*;
pub use sink::*;
