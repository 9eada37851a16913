pub mod delivery;
pub mod name;
pub mod store;

// Публичный экспорт всех типов ошибок из вложенных модулей.
pub use delivery::*;
pub use name::*;
pub use store::*;
