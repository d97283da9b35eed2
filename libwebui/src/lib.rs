//! libwebui - state plumbing for single-page WebUI front ends
//!
//! Two independent pieces live here:
//!
//! - [`router`]: a URL router that mirrors browser history into a typed
//!   [`Route`](router::Route) and notifies registered route observers
//! - [`store`]: a reducer-driven state container, with the Files app state
//!   model in [`files`]
//!
//! Both are single-threaded (`Rc`/`RefCell`) and can publish their
//! transitions on an [`EventBus`](events::EventBus).

pub mod config;
pub mod error;
pub mod events;
pub mod files;
pub mod instance;
pub mod logging;
pub mod router;
pub mod store;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, WebUiError};
pub use events::{Event, EventBus};
pub use router::{
    History, MemoryHistory, PasswordManagerPage, QueryParams, Route, RouteObserver,
    RouteObserverMixin, Router,
};
pub use store::{Store, StoreAction, StoreObserver};
