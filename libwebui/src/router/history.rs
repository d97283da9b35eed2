//! History access seam
//!
//! The router never touches a browser directly. It reads the current location
//! and writes new entries through [`History`], so a host can bridge to real
//! session history while tests and headless tools use [`MemoryHistory`].

use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

use crate::config::DEFAULT_ORIGIN;
use crate::error::Result;

/// Callback fired when the history position moves outside the app's
/// control (back/forward)
pub type PopStateListener = Rc<dyn Fn()>;

/// The path and query of the current history entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Absolute path, always starting with `/`
    pub pathname: String,
    /// Query string including the leading `?`, or empty
    pub search: String,
}

impl Location {
    fn from_url(url: &Url) -> Self {
        Self {
            pathname: url.path().to_string(),
            search: url.query().map(|q| format!("?{}", q)).unwrap_or_default(),
        }
    }

    /// First path segment, or the empty string for `/`
    pub fn section(&self) -> &str {
        self.pathname
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("")
    }
}

/// Read and write access to session history
///
/// URLs passed to `push_state`/`replace_state` may be absolute paths or
/// relative references; they resolve against the current entry the way a
/// browser resolves them.
pub trait History {
    fn location(&self) -> Location;

    /// Add a new entry after the current one, discarding forward entries
    fn push_state(&self, url: &str);

    /// Rewrite the current entry without creating a new one
    fn replace_state(&self, url: &str);

    /// Install (or clear) the back/forward listener
    fn set_popstate_listener(&self, listener: Option<PopStateListener>);
}

struct MemoryHistoryInner {
    entries: Vec<Url>,
    index: usize,
    pushes: usize,
    replaces: usize,
    listener: Option<PopStateListener>,
}

/// In-memory session history
///
/// Cloning yields another handle to the same history, so a test can keep one
/// handle to drive back/forward while the router owns another.
#[derive(Clone)]
pub struct MemoryHistory {
    inner: Rc<RefCell<MemoryHistoryInner>>,
}

impl MemoryHistory {
    /// Create a history with a single entry at `initial` (resolved against
    /// `origin`)
    pub fn new(origin: &str, initial: &str) -> Result<Self> {
        let base = Url::parse(origin)?;
        let first = base.join(initial)?;
        Ok(Self {
            inner: Rc::new(RefCell::new(MemoryHistoryInner {
                entries: vec![first],
                index: 0,
                pushes: 0,
                replaces: 0,
                listener: None,
            })),
        })
    }

    /// History at `initial` on the default password manager origin
    pub fn at(initial: &str) -> Result<Self> {
        Self::new(DEFAULT_ORIGIN, initial)
    }

    /// Full URL of the current entry
    pub fn current_url(&self) -> String {
        let inner = self.inner.borrow();
        inner.entries[inner.index].to_string()
    }

    /// Number of entries in the session history
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the current entry
    pub fn index(&self) -> usize {
        self.inner.borrow().index
    }

    /// Number of `push_state` calls so far
    pub fn push_count(&self) -> usize {
        self.inner.borrow().pushes
    }

    /// Number of `replace_state` calls so far
    pub fn replace_count(&self) -> usize {
        self.inner.borrow().replaces
    }

    pub fn back(&self) -> bool {
        self.go(-1)
    }

    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries and fire the popstate listener
    ///
    /// Returns false, without firing, when the target is out of range or
    /// `delta` is zero.
    pub fn go(&self, delta: isize) -> bool {
        let listener = {
            let mut inner = self.inner.borrow_mut();
            let target = inner.index as isize + delta;
            if delta == 0 || target < 0 || target >= inner.entries.len() as isize {
                return false;
            }
            inner.index = target as usize;
            inner.listener.clone()
        };
        // The listener usually reads the location back, so the borrow above
        // must be released before it runs.
        if let Some(listener) = listener {
            listener();
        }
        true
    }

    fn resolve(inner: &MemoryHistoryInner, url: &str) -> Option<Url> {
        match inner.entries[inner.index].join(url) {
            Ok(resolved) => Some(resolved),
            Err(e) => {
                tracing::warn!(url, error = %e, "ignoring unresolvable history URL");
                None
            }
        }
    }
}

impl History for MemoryHistory {
    fn location(&self) -> Location {
        let inner = self.inner.borrow();
        Location::from_url(&inner.entries[inner.index])
    }

    fn push_state(&self, url: &str) {
        let mut inner = self.inner.borrow_mut();
        let Some(resolved) = Self::resolve(&inner, url) else {
            return;
        };
        let next = inner.index + 1;
        inner.entries.truncate(next);
        inner.entries.push(resolved);
        inner.index = next;
        inner.pushes += 1;
    }

    fn replace_state(&self, url: &str) {
        let mut inner = self.inner.borrow_mut();
        let Some(resolved) = Self::resolve(&inner, url) else {
            return;
        };
        let index = inner.index;
        inner.entries[index] = resolved;
        inner.replaces += 1;
    }

    fn set_popstate_listener(&self, listener: Option<PopStateListener>) {
        self.inner.borrow_mut().listener = listener;
    }
}

impl std::fmt::Debug for MemoryHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("MemoryHistory")
            .field("entries", &inner.entries.iter().map(Url::as_str).collect::<Vec<_>>())
            .field("index", &inner.index)
            .finish()
    }
}
