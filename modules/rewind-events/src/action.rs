//! The contract every application event kind implements.

use std::any::Any;
use std::fmt;

use rewind_common::Result;
use rewind_stores::StoreRegistry;

/// Upcast helper so `dyn Action` can be downcast to its concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A reversible unit of change over the store set.
///
/// The instance holds kind-specific parameters (filled in by whoever spawned
/// it) and, after a successful `execute`, whatever pre-image `undo` needs.
/// Dropping the instance is its `destroy`.
pub trait Action: AsAny + fmt::Debug + 'static {
    /// Apply the change. `Ok(false)` means "nothing happened": the event is
    /// discarded with no History entry. `execute` runs again on Redo, after
    /// `undo`, and must recapture its pre-image each time.
    fn execute(&mut self, stores: &mut StoreRegistry) -> Result<bool>;

    /// Reverse the last successful `execute`.
    fn undo(&mut self, stores: &mut StoreRegistry) -> Result<()>;

    /// Fold `next` (a just-executed event of the same kind) into this
    /// already-committed one so that a single `undo` reverts both.
    /// Returns `false` if the delta can't be merged.
    fn merge(&mut self, _next: &dyn Action) -> bool {
        false
    }

    fn describe(&self) -> String {
        format!("{self:?}")
    }
}

/// Downcast a borrowed action, typically the `next` argument of [`Action::merge`].
pub fn downcast_action<A: Action>(action: &dyn Action) -> Option<&A> {
    action.as_any().downcast_ref::<A>()
}
