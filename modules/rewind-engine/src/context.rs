use std::any::Any;

use rewind_common::{EventKind, Result, StoreKind};
use rewind_events::Action;

use crate::system::TransactionSystem;

/// Explicit handle for code that proposes events during a frame.
///
/// Exposes spawning and read-only store access, but not `flush`: committing
/// stays with the host loop.
pub struct TransactionContext<'a> {
    system: &'a mut TransactionSystem,
}

impl<'a> TransactionContext<'a> {
    pub(crate) fn new(system: &'a mut TransactionSystem) -> Self {
        Self { system }
    }

    pub fn spawn(&mut self, kind: EventKind) -> Result<&mut dyn Action> {
        self.system.spawn(kind)
    }

    pub fn spawn_as<A: Action>(&mut self, kind: EventKind) -> Result<&mut A> {
        self.system.spawn_as::<A>(kind)
    }

    /// Spawn `kind` and overwrite the fresh instance with `action`.
    pub fn propose<A: Action>(&mut self, kind: EventKind, action: A) -> Result<()> {
        *self.system.spawn_as::<A>(kind)? = action;
        Ok(())
    }

    pub fn request_undo(&mut self) {
        self.system.request_undo();
    }

    pub fn request_redo(&mut self) {
        self.system.request_redo();
    }

    pub fn store<T: Any>(&self, kind: StoreKind) -> Result<&T> {
        self.system.store(kind)
    }

    pub fn can_undo(&self) -> bool {
        self.system.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.system.can_redo()
    }

    pub fn pending(&self) -> usize {
        self.system.pending()
    }

    /// Reborrow for passing down to a nested call site.
    pub fn reborrow(&mut self) -> TransactionContext<'_> {
        TransactionContext::new(self.system)
    }
}
