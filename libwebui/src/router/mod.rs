//! In-page navigation
//!
//! A WebUI surface that shows different subpages under different URLs keeps
//! its notion of "where am I" in a [`Router`]. The router maps between a
//! structured [`Route`] and the URL of the current history entry, and
//! notifies registered [`RouteObserver`]s synchronously whenever the route is
//! replaced.
//!
//! ```
//! use std::rc::Rc;
//! use libwebui::router::{History, MemoryHistory, PasswordManagerPage, Router};
//!
//! let history = MemoryHistory::at("/passwords").unwrap();
//! let router = Router::new(Rc::new(history.clone()));
//!
//! router.navigate_to(PasswordManagerPage::Checkup);
//! assert_eq!(router.current_route().page, PasswordManagerPage::Checkup);
//! assert_eq!(history.location().pathname, "/checkup");
//! ```

pub mod history;
pub mod observer;
pub mod page;
pub mod route;

pub use history::{History, Location, MemoryHistory, PopStateListener};
pub use observer::{is_priming, RouteAttachment, RouteObserver, RouteObserverMixin};
pub use page::{Page, PasswordManagerPage, UrlParam};
pub use route::{QueryParams, Route};

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::events::{Event, EventBus, NavigationKind};
use crate::instance;

/// Owner of the current route for one UI session
pub struct Router<P: Page> {
    history: Rc<dyn History>,
    current_route: RefCell<Rc<Route<P>>>,
    observers: RefCell<Vec<Rc<dyn RouteObserver<P>>>>,
    events: Option<EventBus>,
}

impl<P: Page> Router<P> {
    /// Create a router reading from and writing to `history`
    ///
    /// The initial route is derived from the current location right away, and
    /// a popstate listener is installed so back/forward moves are picked up.
    pub fn new(history: Rc<dyn History>) -> Rc<Self> {
        Self::build(history, None)
    }

    /// Like [`Router::new`], additionally publishing every route change on
    /// `events`
    pub fn with_event_bus(history: Rc<dyn History>, events: EventBus) -> Rc<Self> {
        Self::build(history, Some(events))
    }

    fn build(history: Rc<dyn History>, events: Option<EventBus>) -> Rc<Self> {
        let router = Rc::new(Self {
            history,
            current_route: RefCell::new(Rc::new(Route::new(P::DEFAULT, QueryParams::new()))),
            observers: RefCell::new(Vec::new()),
            events,
        });

        router.process_route();

        let weak = Rc::downgrade(&router);
        router
            .history
            .set_popstate_listener(Some(Rc::new(move || {
                if let Some(router) = weak.upgrade() {
                    router.process_route();
                }
            })));

        router
    }

    /// This thread's router for page set `P`
    ///
    /// Returns the installed instance, or lazily creates one over an
    /// in-memory history positioned at the default page.
    pub fn get_instance() -> Result<Rc<Self>> {
        if let Some(router) = instance::get::<Self>() {
            return Ok(router);
        }
        let history = MemoryHistory::at(&P::DEFAULT.path())?;
        Ok(instance::get_or_init(|| Self::new(Rc::new(history))))
    }

    /// Make `router` this thread's instance for page set `P`
    pub fn install(router: Rc<Self>) -> Result<()> {
        instance::install(router)
    }

    /// The current route. Replaced, never mutated, on every change.
    pub fn current_route(&self) -> Rc<Route<P>> {
        self.current_route.borrow().clone()
    }

    /// Register an observer
    ///
    /// # Panics
    ///
    /// Panics if `observer` is already registered.
    pub fn add_observer(&self, observer: Rc<dyn RouteObserver<P>>) {
        let mut observers = self.observers.borrow_mut();
        assert!(
            !observers.iter().any(|o| same_observer(o, &observer)),
            "route observer is already registered"
        );
        observers.push(observer);
    }

    /// Deregister an observer
    ///
    /// # Panics
    ///
    /// Panics if `observer` is not registered.
    pub fn remove_observer(&self, observer: &Rc<dyn RouteObserver<P>>) {
        assert!(
            self.discard_observer(observer),
            "route observer is not registered"
        );
    }

    /// Remove `observer` if present, reporting whether it was
    pub(crate) fn discard_observer(&self, observer: &Rc<dyn RouteObserver<P>>) -> bool {
        let mut observers = self.observers.borrow_mut();
        match observers.iter().position(|o| same_observer(o, observer)) {
            Some(index) => {
                observers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.borrow().len()
    }

    /// Navigate to `page` and push a new history entry
    ///
    /// Navigating to a different page always clears the query parameters.
    /// Navigating to the current page does nothing.
    pub fn navigate_to(&self, page: P) {
        if page == self.current_route().page {
            tracing::trace!(?page, "already on page, not navigating");
            return;
        }

        let new_route = Rc::new(Route::new(page, QueryParams::new()));
        self.history.push_state(&page.path());
        tracing::debug!(?page, "navigated");
        self.commit(new_route, NavigationKind::Push);
    }

    /// Replace the query parameters of the current route
    ///
    /// Rewrites the current history entry instead of pushing one, so the
    /// change is not reachable through back/forward. The page stays the same.
    pub fn update_router_params(&self, params: QueryParams) {
        let page = self.current_route().page;
        let new_route = Rc::new(Route::new(page, params));
        self.history.replace_state(&new_route.url());
        tracing::debug!(?page, query = %new_route.query_parameters, "router params updated");
        self.commit(new_route, NavigationKind::Replace);
    }

    /// Recompute the route from the live location and notify observers
    ///
    /// An unrecognized first path segment keeps the previous page and
    /// rewrites the current entry to that page's canonical path.
    pub fn process_route(&self) {
        let location = self.history.location();
        let previous_page = self.current_route().page;
        let query_parameters = QueryParams::parse(&location.search);

        let page = match P::from_segment(location.section()) {
            Some(page) => page,
            None => {
                tracing::warn!(
                    path = %location.pathname,
                    page = ?previous_page,
                    "unknown page in URL, normalizing"
                );
                self.history.replace_state(&previous_page.path());
                if let Some(events) = &self.events {
                    events.emit(Event::route_normalized(
                        &location.pathname,
                        previous_page.segment(),
                    ));
                }
                previous_page
            }
        };

        self.commit(Rc::new(Route::new(page, query_parameters)), NavigationKind::Pop);
    }

    fn commit(&self, new_route: Rc<Route<P>>, navigation: NavigationKind) {
        let old_route = self.current_route.replace(new_route.clone());
        assert!(
            !Rc::ptr_eq(&old_route, &new_route),
            "route must be replaced by a new allocation"
        );

        if let Some(events) = &self.events {
            events.emit(Event::route_changed(
                new_route.page.segment(),
                &new_route.query_parameters.to_string(),
                navigation,
            ));
        }

        // Snapshot so observers may register or deregister while being notified.
        let observers: Vec<_> = self.observers.borrow().clone();
        for observer in observers {
            observer.current_route_changed(&new_route, &old_route);
        }
    }
}

impl<P: Page> std::fmt::Debug for Router<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("current_route", &self.current_route.borrow())
            .field("observers", &self.observer_count())
            .finish()
    }
}

fn same_observer<P: Page>(a: &Rc<dyn RouteObserver<P>>, b: &Rc<dyn RouteObserver<P>>) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}
