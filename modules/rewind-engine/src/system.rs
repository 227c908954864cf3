//! The per-frame flush protocol.

use std::any::{type_name, Any};

use rewind_common::{EngineConfig, EventKind, Result, StoreKind, TransactionError, ViolationPolicy};
use rewind_events::{
    Action, Direction, Event, EventBundle, EventHistory, EventMetadata, MetadataRegistry,
};
use rewind_stores::StoreRegistry;
use tracing::{debug, error, info, trace, warn};
use uuid::Uuid;

use crate::context::TransactionContext;
use crate::journal::Journal;

/// Owns the stores, the proposal queue, and History.
///
/// The queue is drained by every [`flush`](Self::flush). History grows for
/// the life of the session and is never truncated.
pub struct TransactionSystem {
    session_id: Uuid,
    config: EngineConfig,
    registry: MetadataRegistry,
    stores: StoreRegistry,
    queue: Vec<Event>,
    history: EventHistory,
    frame: u64,
    poisoned_at: Option<u64>,
}

impl TransactionSystem {
    pub fn new(config: EngineConfig, registry: MetadataRegistry) -> Self {
        let session_id = Uuid::new_v4();
        info!(
            session = %session_id,
            kinds = registry.iter().count(),
            "Transaction system created"
        );
        Self {
            session_id,
            config,
            registry,
            stores: StoreRegistry::new(),
            queue: Vec::new(),
            history: EventHistory::new(),
            frame: 0,
            poisoned_at: None,
        }
    }

    // -----------------------------------------------------------------------
    // Bootstrap
    // -----------------------------------------------------------------------

    /// Register a store; `spawner` runs now, `destroyer` at teardown.
    pub fn register_store<T, S, D>(&mut self, kind: StoreKind, spawner: S, destroyer: D) -> Result<()>
    where
        T: Any,
        S: FnOnce() -> T,
        D: FnOnce(T) + 'static,
    {
        self.stores.register(kind, spawner, destroyer)
    }

    pub fn register_default_store<T: Any + Default>(&mut self, kind: StoreKind) -> Result<()> {
        self.stores.register_default::<T>(kind)
    }

    pub fn register_event(&mut self, metadata: EventMetadata) -> Result<()> {
        self.registry.register(metadata)
    }

    /// The proposal surface handed to collaborators.
    pub fn context(&mut self) -> TransactionContext<'_> {
        TransactionContext::new(self)
    }

    // -----------------------------------------------------------------------
    // Proposals
    // -----------------------------------------------------------------------

    /// Queue a fresh instance of `kind` and return it for the caller to fill in.
    pub fn spawn(&mut self, kind: EventKind) -> Result<&mut dyn Action> {
        let action = self.instantiate(kind)?;
        Ok(self.enqueue(kind, action))
    }

    /// Like [`spawn`](Self::spawn), downcast to the concrete instance type.
    /// Nothing is queued if `kind` does not spawn an `A`.
    pub fn spawn_as<A: Action>(&mut self, kind: EventKind) -> Result<&mut A> {
        let mismatch = TransactionError::EventTypeMismatch {
            kind,
            expected: type_name::<A>(),
        };
        let action = self.instantiate(kind)?;
        if !(*action).as_any().is::<A>() {
            return Err(mismatch);
        }
        self.enqueue(kind, action)
            .as_any_mut()
            .downcast_mut::<A>()
            .ok_or(mismatch)
    }

    pub fn request_undo(&mut self) {
        self.request_step(Direction::Undo);
    }

    pub fn request_redo(&mut self) {
        self.request_step(Direction::Redo);
    }

    fn request_step(&mut self, direction: Direction) {
        trace!(session = %self.session_id, %direction, "Step requested");
        self.queue.push(Event::step(direction));
    }

    fn instantiate(&self, kind: EventKind) -> Result<Box<dyn Action>> {
        let metadata = self.registry.spawnable(kind)?;
        let action = metadata
            .spawn()
            .ok_or(TransactionError::ReservedEventKind(kind))?;
        trace!(%kind, description = metadata.description, "Event spawned");
        Ok(action)
    }

    fn enqueue(&mut self, kind: EventKind, action: Box<dyn Action>) -> &mut dyn Action {
        self.queue.push(Event::action(kind, action));
        match self.queue.last_mut().and_then(Event::as_action_mut) {
            Some(action) => action,
            None => unreachable!("an action event was just queued"),
        }
    }

    // -----------------------------------------------------------------------
    // Flush
    // -----------------------------------------------------------------------

    /// Frame hook for the host loop.
    pub fn on_update(&mut self) -> Result<EventKind> {
        self.flush()
    }

    /// Commit this frame's proposals and clear the queue.
    ///
    /// Returns the committed kind, or NOOP when nothing was committed. An
    /// invariant violation destroys the whole queue unexecuted and is handled
    /// per [`ViolationPolicy`].
    ///
    /// An `Err` raised by an action while it is being applied poisons the
    /// system: stores may be half-updated, so every later flush destroys its
    /// queue and returns [`TransactionError::Poisoned`].
    pub fn flush(&mut self) -> Result<EventKind> {
        self.frame += 1;
        let queue = std::mem::take(&mut self.queue);

        let outcome = match self.poisoned_at {
            Some(frame) => {
                destroy_all(queue);
                Err(TransactionError::Poisoned { frame })
            }
            None => self.commit(queue),
        };
        if let Err(error) = &outcome {
            error!(
                session = %self.session_id,
                frame = self.frame,
                %error,
                "Frame discarded"
            );
            if self.config.violation_policy == ViolationPolicy::Panic {
                panic!("transaction invariant violated: {error}");
            }
        }
        outcome
    }

    fn commit(&mut self, queue: Vec<Event>) -> Result<EventKind> {
        if queue.is_empty() {
            return Ok(EventKind::NOOP);
        }

        let priority = queue.iter().filter(|e| e.is_priority()).count();
        if priority > 1 {
            destroy_all(queue);
            return Err(TransactionError::MultiplePriority { count: priority });
        }

        if priority == 1 {
            let (mut steps, ordinary): (Vec<Event>, Vec<Event>) =
                queue.into_iter().partition(Event::is_priority);
            for event in ordinary {
                debug!(kind = %event.kind(), "Ordinary proposal dropped by undo/redo frame");
                event.destroy();
            }
            return match steps.pop() {
                Some(step) => self.commit_priority(step),
                None => Ok(EventKind::NOOP),
            };
        }

        if queue.len() > 1 {
            let count = queue.len();
            destroy_all(queue);
            return Err(TransactionError::MultipleOrdinary { count });
        }

        match queue.into_iter().next() {
            Some(event) => self.commit_ordinary(event),
            None => Ok(EventKind::NOOP),
        }
    }

    fn commit_priority(&mut self, mut event: Event) -> Result<EventKind> {
        let Some(direction) = Direction::from_kind(event.kind()) else {
            event.destroy();
            return Ok(EventKind::NOOP);
        };

        let Some(target) = self.history.resolve(direction) else {
            debug!(frame = self.frame, "Nothing to {direction}");
            event.destroy();
            return Ok(EventKind::NOOP);
        };

        let applied = match direction {
            Direction::Undo => self.history.undo_bundle(target, &mut self.stores),
            Direction::Redo => self.history.redo_bundle(target, &mut self.stores),
        };
        let applied = match applied {
            Ok(applied) => applied,
            Err(error) => {
                event.destroy();
                return Err(self.poison(error));
            }
        };
        if !applied {
            debug!(frame = self.frame, target, "{direction} declined");
            event.destroy();
            return Ok(EventKind::NOOP);
        }

        if let Some(step) = event.as_step_mut() {
            step.target = Some(target);
        }
        let index = self
            .history
            .push(EventBundle::new(event, false, self.frame));
        debug!(frame = self.frame, index, target, "Committed {direction}");
        self.check_growth();

        Ok(direction.kind())
    }

    fn commit_ordinary(&mut self, mut event: Event) -> Result<EventKind> {
        let kind = event.kind();
        let metadata = self.registry.get(kind)?;
        let (continuable, secondary) = (metadata.continuable, metadata.secondary);

        let executed = match event.execute(&mut self.stores) {
            Ok(executed) => executed,
            Err(error) => {
                event.destroy();
                return Err(self.poison(error));
            }
        };
        if !executed {
            debug!(frame = self.frame, %kind, "Event declined; nothing committed");
            event.destroy();
            return Ok(EventKind::NOOP);
        }

        if continuable {
            if let Some(last) = self.history.last_mut().filter(|b| b.kind() == kind) {
                if last.leading_mut().merge(&event) {
                    debug!(frame = self.frame, %kind, "Continuation merged");
                    event.destroy();
                    return Ok(kind);
                }
                warn!(%kind, "Continuable event refused merge; committing separately");
            }
        }

        if secondary {
            if let Some(last) = self.history.last_mut().filter(|b| b.is_secondary()) {
                last.push(event);
                debug!(frame = self.frame, %kind, members = last.len(), "Secondary effect grouped");
                return Ok(kind);
            }
        }

        let index = self
            .history
            .push(EventBundle::new(event, secondary, self.frame));
        debug!(frame = self.frame, %kind, index, secondary, "Committed bundle");
        self.check_growth();

        Ok(kind)
    }

    fn poison(&mut self, error: TransactionError) -> TransactionError {
        error!(
            session = %self.session_id,
            frame = self.frame,
            %error,
            "Action failed while applying; refusing further frames"
        );
        self.poisoned_at = Some(self.frame);
        error
    }

    fn check_growth(&self) {
        if let Some(every) = self.config.history_warn_len.filter(|n| *n > 0) {
            let len = self.history.len();
            if len % every == 0 {
                warn!(session = %self.session_id, len, "History has grown to {len} bundles");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Whether a failed apply has stopped this system from committing.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned_at.is_some()
    }

    pub fn can_undo(&self) -> bool {
        self.history.resolve(Direction::Undo).is_some()
    }

    pub fn can_redo(&self) -> bool {
        self.history.resolve(Direction::Redo).is_some()
    }

    pub fn store<T: Any>(&self, kind: StoreKind) -> Result<&T> {
        self.stores.get(kind)
    }

    pub fn stores(&self) -> &StoreRegistry {
        &self.stores
    }

    pub fn history(&self) -> &EventHistory {
        &self.history
    }

    pub fn registry(&self) -> &MetadataRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Number of flushes so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Events proposed since the last flush.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn journal(&self) -> Journal {
        Journal {
            session_id: self.session_id,
            frame: self.frame,
            entries: self.history.journal(&self.registry),
        }
    }

    /// Destroy pending proposals and tear down every store. Also runs on drop.
    pub fn teardown(&mut self) {
        destroy_all(std::mem::take(&mut self.queue));
        if !self.stores.is_torn_down() {
            info!(
                session = %self.session_id,
                frames = self.frame,
                bundles = self.history.len(),
                "Tearing down transaction system"
            );
        }
        self.stores.teardown();
    }
}

impl Drop for TransactionSystem {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn destroy_all(queue: Vec<Event>) {
    for event in queue {
        event.destroy();
    }
}
