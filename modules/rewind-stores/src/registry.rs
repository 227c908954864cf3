use std::any::{type_name, Any};
use std::fmt;

use rewind_common::{Result, StoreKind, TransactionError};
use tracing::{debug, trace};

type Destroyer = Box<dyn FnOnce(Box<dyn Any>)>;

struct StoreEntry {
    kind: StoreKind,
    type_name: &'static str,
    payload: Box<dyn Any>,
    destroyer: Destroyer,
}

/// Owns every registered store payload.
///
/// Lookup is a linear scan by kind: the registry is small and fixed at
/// bootstrap.
#[derive(Default)]
pub struct StoreRegistry {
    entries: Vec<StoreEntry>,
    torn_down: bool,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a store. `spawner` runs immediately; `destroyer` runs once at
    /// teardown.
    pub fn register<T, S, D>(&mut self, kind: StoreKind, spawner: S, destroyer: D) -> Result<()>
    where
        T: Any,
        S: FnOnce() -> T,
        D: FnOnce(T) + 'static,
    {
        if self.torn_down {
            return Err(TransactionError::StoreTornDown);
        }
        if self.entries.iter().any(|e| e.kind == kind) {
            return Err(TransactionError::DuplicateStore(kind));
        }

        let payload: Box<dyn Any> = Box::new(spawner());
        let destroyer: Destroyer = Box::new(move |payload: Box<dyn Any>| {
            if let Ok(payload) = payload.downcast::<T>() {
                destroyer(*payload);
            }
        });

        debug!(%kind, payload = type_name::<T>(), "Store registered");
        self.entries.push(StoreEntry {
            kind,
            type_name: type_name::<T>(),
            payload,
            destroyer,
        });
        Ok(())
    }

    /// Register a store spawned from `T::default()` and dropped at teardown.
    pub fn register_default<T: Any + Default>(&mut self, kind: StoreKind) -> Result<()> {
        self.register(kind, T::default, drop)
    }

    pub fn get<T: Any>(&self, kind: StoreKind) -> Result<&T> {
        self.entry(kind)?
            .payload
            .downcast_ref::<T>()
            .ok_or(TransactionError::StoreTypeMismatch {
                kind,
                expected: type_name::<T>(),
            })
    }

    pub fn get_mut<T: Any>(&mut self, kind: StoreKind) -> Result<&mut T> {
        self.entry_mut(kind)?
            .payload
            .downcast_mut::<T>()
            .ok_or(TransactionError::StoreTypeMismatch {
                kind,
                expected: type_name::<T>(),
            })
    }

    pub fn contains(&self, kind: StoreKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    /// Registered kinds, in registration order.
    pub fn kinds(&self) -> Vec<StoreKind> {
        self.entries.iter().map(|e| e.kind).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every destroyer once, newest store first. Later calls are no-ops,
    /// and every lookup afterwards fails with `StoreTornDown`.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        while let Some(entry) = self.entries.pop() {
            trace!(kind = %entry.kind, payload = entry.type_name, "Destroying store");
            (entry.destroyer)(entry.payload);
        }
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    fn entry(&self, kind: StoreKind) -> Result<&StoreEntry> {
        if self.torn_down {
            return Err(TransactionError::StoreTornDown);
        }
        self.entries
            .iter()
            .find(|e| e.kind == kind)
            .ok_or(TransactionError::UnknownStore(kind))
    }

    fn entry_mut(&mut self, kind: StoreKind) -> Result<&mut StoreEntry> {
        if self.torn_down {
            return Err(TransactionError::StoreTornDown);
        }
        self.entries
            .iter_mut()
            .find(|e| e.kind == kind)
            .ok_or(TransactionError::UnknownStore(kind))
    }
}

impl Drop for StoreRegistry {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreRegistry")
            .field(
                "stores",
                &self
                    .entries
                    .iter()
                    .map(|e| (e.kind, e.type_name))
                    .collect::<Vec<_>>(),
            )
            .field("torn_down", &self.torn_down)
            .finish()
    }
}
