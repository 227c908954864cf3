pub mod config;
pub mod error;
pub mod kind;

pub use config::{EngineConfig, ViolationPolicy};
pub use error::{Result, TransactionError};
pub use kind::{EventKind, StoreKind};
