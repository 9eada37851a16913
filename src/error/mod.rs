pub mod layer;

pub use groupcast_error::{
    DeliveryError, ErrorExt, InvalidNameError, NameKind, StatusCode, StoreError,
};
pub use layer::{LayerError, LayerResult};
