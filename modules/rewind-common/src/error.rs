use thiserror::Error;

use crate::kind::{EventKind, StoreKind};

/// Invariant violations. Each one indicates a bug in calling code, not a
/// runtime data condition. "Nothing to undo" and other expected failures are
/// reported through `Ok(false)` from `execute`, never through this type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("store {0} is already registered")]
    DuplicateStore(StoreKind),

    #[error("store {0} is not registered")]
    UnknownStore(StoreKind),

    #[error("store {kind} does not hold a {expected}")]
    StoreTypeMismatch {
        kind: StoreKind,
        expected: &'static str,
    },

    #[error("store registry has been torn down")]
    StoreTornDown,

    #[error("event kind {0} is not registered")]
    UnknownEventKind(EventKind),

    #[error("event kind {0} is reserved by the core")]
    ReservedEventKind(EventKind),

    #[error("event kind {0} is already registered")]
    DuplicateEventKind(EventKind),

    #[error("event kind {kind} does not spawn a {expected}")]
    EventTypeMismatch {
        kind: EventKind,
        expected: &'static str,
    },

    #[error("{count} undo/redo events proposed in one frame")]
    MultiplePriority { count: usize },

    #[error("{count} ordinary events proposed in one frame")]
    MultipleOrdinary { count: usize },

    /// An earlier `execute` or `undo` failed partway through applying a
    /// frame. Store state no longer matches History.
    #[error("transaction system is poisoned by a failed apply in frame {frame}")]
    Poisoned { frame: u64 },
}

pub type Result<T> = std::result::Result<T, TransactionError>;
