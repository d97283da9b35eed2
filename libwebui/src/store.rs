//! Single-store state container
//!
//! A [`Store`] holds the current snapshot of some state `S`, applies actions
//! `A` to it through a pure reducer, and notifies subscribers after every
//! committed transition.
//!
//! # Dispatch queue
//!
//! Dispatches are serialized through a queue. A subscriber that dispatches
//! while being notified does not re-enter the reducer: its action is queued
//! and applied once the current transition has been fully delivered.
//!
//! # Lifecycle
//!
//! A store created with [`Store::new`] is uninitialized. Actions dispatched
//! before [`Store::init`] are held back and replayed on top of the initial
//! state, followed by a single notification.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::Result;
use crate::events::{Event, EventBus};
use crate::instance;

/// Pure state transition function
pub type Reducer<S, A> = fn(&S, &A) -> S;

/// Actions a store can log and publish by name
pub trait StoreAction {
    /// Discriminant of the action, e.g. `change-directory`
    fn name(&self) -> &'static str;
}

/// Receives every committed state
pub trait StoreObserver<S> {
    fn on_state_changed(&self, state: &Arc<S>);
}

impl<S, F: Fn(&Arc<S>)> StoreObserver<S> for F {
    fn on_state_changed(&self, state: &Arc<S>) {
        self(state)
    }
}

pub struct Store<S, A> {
    reducer: Reducer<S, A>,
    state: RefCell<Arc<S>>,
    initialized: Cell<bool>,
    queue: RefCell<VecDeque<A>>,
    draining: Cell<bool>,
    batch_mode: Cell<bool>,
    dirty: Cell<bool>,
    sequence: Cell<u64>,
    observers: RefCell<Vec<Rc<dyn StoreObserver<S>>>>,
    events: Option<EventBus>,
}

impl<S: Default, A: StoreAction> Store<S, A> {
    /// Create an uninitialized store; see [`Store::init`]
    pub fn new(reducer: Reducer<S, A>) -> Self {
        Self::build(reducer, S::default(), false)
    }
}

impl<S, A: StoreAction> Store<S, A> {
    /// Create a store that is ready to dispatch
    pub fn with_state(reducer: Reducer<S, A>, state: S) -> Self {
        Self::build(reducer, state, true)
    }

    fn build(reducer: Reducer<S, A>, state: S, initialized: bool) -> Self {
        Self {
            reducer,
            state: RefCell::new(Arc::new(state)),
            initialized: Cell::new(initialized),
            queue: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            batch_mode: Cell::new(false),
            dirty: Cell::new(false),
            sequence: Cell::new(0),
            observers: RefCell::new(Vec::new()),
            events: None,
        }
    }

    /// Publish every committed action on `events`
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = Some(events);
        self
    }

    /// Initialize with `state`, replay actions dispatched so far, then
    /// notify subscribers once
    ///
    /// Inside a batch the notification is deferred to
    /// [`Store::end_batch_update`].
    pub fn init(&self, state: S) {
        if self.initialized.get() {
            tracing::warn!("store initialized twice, replacing state");
        }
        *self.state.borrow_mut() = Arc::new(state);
        self.initialized.set(true);

        let pending = self.queue.borrow().len();
        if pending > 0 {
            tracing::debug!(pending, "replaying actions dispatched before init");
        }

        let was_batching = self.batch_mode.replace(true);
        self.drain();
        self.batch_mode.set(was_batching);

        if was_batching {
            // An open batch notifies when it closes.
            self.dirty.set(true);
        } else {
            self.dirty.set(false);
            self.notify();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// The current snapshot
    pub fn get_state(&self) -> Arc<S> {
        self.state.borrow().clone()
    }

    /// Number of actions applied so far
    pub fn sequence(&self) -> u64 {
        self.sequence.get()
    }

    /// Apply `action` through the reducer and notify subscribers
    ///
    /// Before `init` the action is held back. From inside a subscriber
    /// callback it is queued behind the transition being delivered.
    pub fn dispatch(&self, action: A) {
        self.queue.borrow_mut().push_back(action);
        if !self.initialized.get() {
            tracing::trace!("store not initialized, action queued");
            return;
        }
        if self.draining.get() {
            return;
        }
        self.drain();
    }

    fn drain(&self) {
        self.draining.set(true);
        loop {
            // Pop in its own statement so the queue is not borrowed while
            // subscribers run (they may dispatch).
            let next = self.queue.borrow_mut().pop_front();
            let Some(action) = next else { break };
            self.apply(&action);
        }
        self.draining.set(false);
    }

    fn apply(&self, action: &A) {
        let current = self.get_state();
        let next = Arc::new((self.reducer)(&current, action));
        *self.state.borrow_mut() = next;

        let sequence = self.sequence.get() + 1;
        self.sequence.set(sequence);
        tracing::debug!(action = action.name(), sequence, "action dispatched");

        if let Some(events) = &self.events {
            events.emit(Event::state_changed(action.name(), sequence));
        }

        if self.batch_mode.get() {
            self.dirty.set(true);
        } else {
            self.notify();
        }
    }

    /// Hold notifications until [`Store::end_batch_update`]
    pub fn begin_batch_update(&self) {
        self.batch_mode.set(true);
    }

    /// Leave batch mode and notify once if anything was dispatched
    pub fn end_batch_update(&self) {
        self.batch_mode.set(false);
        if self.dirty.replace(false) {
            self.notify();
        }
    }

    /// Subscribe to state changes
    ///
    /// # Panics
    ///
    /// Panics if `observer` is already subscribed.
    pub fn subscribe(&self, observer: Rc<dyn StoreObserver<S>>) {
        let mut observers = self.observers.borrow_mut();
        assert!(
            !observers.iter().any(|o| same_observer(o, &observer)),
            "store observer is already subscribed"
        );
        observers.push(observer);
    }

    /// Unsubscribe from state changes
    ///
    /// # Panics
    ///
    /// Panics if `observer` is not subscribed.
    pub fn unsubscribe(&self, observer: &Rc<dyn StoreObserver<S>>) {
        let mut observers = self.observers.borrow_mut();
        let Some(index) = observers.iter().position(|o| same_observer(o, observer)) else {
            panic!("store observer is not subscribed");
        };
        observers.remove(index);
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    fn notify(&self) {
        let state = self.get_state();
        let observers: Vec<_> = self.observers.borrow().clone();
        for observer in observers {
            observer.on_state_changed(&state);
        }
    }
}

impl<S: 'static, A: StoreAction + 'static> Store<S, A> {
    /// Make `store` this thread's instance for its state and action types
    pub fn install(store: Rc<Self>) -> Result<()> {
        instance::install(store)
    }

    /// This thread's installed store, if any
    ///
    /// Unlike [`Router::get_instance`](crate::router::Router::get_instance)
    /// nothing is created on first access: a store needs a reducer and an
    /// initial state that only the host knows, so it must be installed
    /// with [`Store::install`] first.
    pub fn get_instance() -> Option<Rc<Self>> {
        instance::get::<Self>()
    }
}

fn same_observer<S>(a: &Rc<dyn StoreObserver<S>>, b: &Rc<dyn StoreObserver<S>>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
