//! Route observers and the attach/detach capability
//!
//! A UI component opts into route notifications by implementing
//! [`RouteObserver`]. Every such type automatically gains
//! [`RouteObserverMixin`], which supplies the lifecycle half: register on
//! attach (with an immediate priming call), deregister on detach.
//!
//! # Priming
//!
//! The priming call made on attach passes the *same* `Rc<Route>` as both
//! `new_route` and `old_route`. It is the observer's first notification and
//! is the only one where the two are identical; every later notification
//! carries two distinct allocations. Use [`is_priming`] to tell them apart.

use std::rc::{Rc, Weak};

use super::page::Page;
use super::route::Route;
use super::Router;

/// Receives route changes from a [`Router`]
pub trait RouteObserver<P: Page> {
    /// Called synchronously after the router commits a new route
    ///
    /// # Panics
    ///
    /// The default implementation panics. Types that adopt the capability
    /// must override it.
    fn current_route_changed(&self, new_route: &Rc<Route<P>>, old_route: &Rc<Route<P>>) {
        let _ = (new_route, old_route);
        panic!(
            "{} registered as a route observer without overriding current_route_changed",
            std::any::type_name::<Self>()
        );
    }
}

/// True for the notification delivered on attach
pub fn is_priming<P: Page>(new_route: &Rc<Route<P>>, old_route: &Rc<Route<P>>) -> bool {
    Rc::ptr_eq(new_route, old_route)
}

/// Lifecycle hooks for route observers
///
/// Blanket-implemented for every [`RouteObserver`]; there is nothing to
/// implement by hand.
pub trait RouteObserverMixin<P: Page>: RouteObserver<P> + Sized + 'static {
    /// Register with `router` and prime with the current route
    ///
    /// # Panics
    ///
    /// Panics if this observer is already registered.
    fn connected_callback(self: &Rc<Self>, router: &Router<P>) {
        let observer: Rc<dyn RouteObserver<P>> = self.clone();
        router.add_observer(observer);

        let current = router.current_route();
        self.current_route_changed(&current, &current);
    }

    /// Deregister from `router`
    ///
    /// # Panics
    ///
    /// Panics if this observer is not registered.
    fn disconnected_callback(self: &Rc<Self>, router: &Router<P>) {
        let observer: Rc<dyn RouteObserver<P>> = self.clone();
        router.remove_observer(&observer);
    }

    /// Connect and return a guard that disconnects when dropped
    fn attach(self: &Rc<Self>, router: &Rc<Router<P>>) -> RouteAttachment<P> {
        self.connected_callback(router);
        RouteAttachment {
            router: Rc::downgrade(router),
            observer: self.clone(),
        }
    }
}

impl<P: Page, T: RouteObserver<P> + 'static> RouteObserverMixin<P> for T {}

/// Keeps an observer attached to a router for as long as it lives
#[must_use = "dropping the attachment detaches the observer immediately"]
pub struct RouteAttachment<P: Page> {
    router: Weak<Router<P>>,
    observer: Rc<dyn RouteObserver<P>>,
}

impl<P: Page> RouteAttachment<P> {
    /// Detach now instead of at drop
    pub fn detach(self) {}
}

impl<P: Page> Drop for RouteAttachment<P> {
    fn drop(&mut self) {
        if let Some(router) = self.router.upgrade() {
            // Tolerate an explicit disconnected_callback having run already.
            router.discard_observer(&self.observer);
        }
    }
}
