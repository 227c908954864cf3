//! Transaction system: proposal queue, per-frame flush, undo/redo.
//!
//! Collaborators propose events during a frame through a
//! [`TransactionContext`]. Once per frame the host calls
//! [`TransactionSystem::on_update`], which commits at most one ordinary event
//! or one Undo/Redo into History and reports what happened.

pub mod active;
pub mod context;
pub mod journal;
pub mod system;

pub use context::TransactionContext;
pub use journal::Journal;
pub use system::TransactionSystem;

pub use rewind_common::{EngineConfig, EventKind, Result, StoreKind, TransactionError, ViolationPolicy};
pub use rewind_events::{downcast_action, Action, Direction, EventMetadata, MetadataRegistry};
pub use rewind_stores::StoreRegistry;
