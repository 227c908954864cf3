//! Event contract, bundling, and the append-only undo/redo history.
//!
//! History is never truncated and carries no cursor. Undo and Redo are
//! themselves committed as bundles; the next target in either direction is
//! re-derived by counting backwards from the tail (see [`EventHistory::resolve`]).

pub mod action;
pub mod bundle;
pub mod event;
pub mod history;
pub mod journal;
pub mod metadata;

pub use action::{downcast_action, Action, AsAny};
pub use bundle::EventBundle;
pub use event::{Direction, Event, EventBody, HistoryStep};
pub use history::EventHistory;
pub use journal::JournalEntry;
pub use metadata::{EventMetadata, MetadataRegistry, Spawner};
