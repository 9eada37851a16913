//! Ошибки groupcast: коды статуса, [`ErrorExt`] и доменные типы ошибок
//! (имена, доставка, хранилище групп).

pub mod ext;
pub mod status_code;
pub mod types;

pub use ext::*;
pub use status_code::*;
pub use types::*;
