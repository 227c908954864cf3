//! Process-wide default system, for bootstrap code only.
//!
//! Steady-state proposal paths take a [`TransactionContext`] instead. The
//! slot is thread-local: the transaction system is single-threaded.
//!
//! [`TransactionContext`]: crate::TransactionContext

use std::cell::RefCell;
use std::rc::Rc;

use crate::system::TransactionSystem;

pub type SharedSystem = Rc<RefCell<TransactionSystem>>;

thread_local! {
    static ACTIVE: RefCell<Option<SharedSystem>> = const { RefCell::new(None) };
}

/// Make `system` the active one. Returns the shared handle.
pub fn install(system: TransactionSystem) -> SharedSystem {
    let shared = Rc::new(RefCell::new(system));
    install_shared(shared.clone());
    shared
}

/// Make an existing handle active, returning whichever was active before.
pub fn install_shared(shared: SharedSystem) -> Option<SharedSystem> {
    ACTIVE.with(|slot| slot.borrow_mut().replace(shared))
}

pub fn active() -> Option<SharedSystem> {
    ACTIVE.with(|slot| slot.borrow().clone())
}

/// Run `f` against the active system. `None` if nothing is installed or the
/// system is already borrowed further up the stack.
pub fn with_active<R>(f: impl FnOnce(&mut TransactionSystem) -> R) -> Option<R> {
    let shared = active()?;
    let mut system = shared.try_borrow_mut().ok()?;
    Some(f(&mut system))
}

pub fn uninstall() -> Option<SharedSystem> {
    ACTIVE.with(|slot| slot.borrow_mut().take())
}
