//! Per-thread instance registry
//!
//! Routers and stores are built explicitly and passed to whoever needs them.
//! Hosts that prefer a single well-known instance per UI thread can install
//! one here and look it up by type.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::error::{Result, WebUiError};

thread_local! {
    static INSTANCES: RefCell<HashMap<TypeId, Rc<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Install `value` as this thread's instance of `T`
///
/// Fails if an instance of `T` is already installed.
pub fn install<T: 'static>(value: Rc<T>) -> Result<()> {
    INSTANCES.with(|instances| {
        let mut instances = instances.borrow_mut();
        if instances.contains_key(&TypeId::of::<T>()) {
            return Err(WebUiError::AlreadyInstalled(std::any::type_name::<T>()));
        }
        instances.insert(TypeId::of::<T>(), value);
        Ok(())
    })
}

/// This thread's instance of `T`, if one is installed
pub fn get<T: 'static>() -> Option<Rc<T>> {
    INSTANCES.with(|instances| {
        instances
            .borrow()
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|any| any.downcast::<T>().ok())
    })
}

/// This thread's instance of `T`, constructing and installing it with
/// `init` on first access
pub fn get_or_init<T: 'static>(init: impl FnOnce() -> Rc<T>) -> Rc<T> {
    if let Some(existing) = get::<T>() {
        return existing;
    }
    // `init` may itself consult the registry, so no borrow is held while it runs.
    let created = init();
    INSTANCES.with(|instances| {
        instances
            .borrow_mut()
            .entry(TypeId::of::<T>())
            .or_insert_with(|| created.clone() as Rc<dyn Any>)
            .clone()
            .downcast::<T>()
            .unwrap_or(created)
    })
}

/// Remove this thread's instance of `T`, returning it
pub fn uninstall<T: 'static>() -> Option<Rc<T>> {
    INSTANCES.with(|instances| {
        instances
            .borrow_mut()
            .remove(&TypeId::of::<T>())
            .and_then(|any| any.downcast::<T>().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    #[test]
    fn test_install_then_get() {
        install(Rc::new(Counter(7))).unwrap();
        assert_eq!(get::<Counter>().unwrap().0, 7);
        uninstall::<Counter>();
    }

    #[test]
    fn test_double_install_rejected() {
        install(Rc::new(Counter(1))).unwrap();
        let err = install(Rc::new(Counter(2))).unwrap_err();
        assert!(matches!(err, WebUiError::AlreadyInstalled(_)));
        assert_eq!(get::<Counter>().unwrap().0, 1);
        uninstall::<Counter>();
    }

    #[test]
    fn test_get_or_init_initializes_once() {
        let first = get_or_init(|| Rc::new(Counter(1)));
        let second = get_or_init(|| Rc::new(Counter(2)));
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(second.0, 1);
        uninstall::<Counter>();
    }

    #[test]
    fn test_uninstall_missing() {
        struct Never;
        assert!(uninstall::<Never>().is_none());
        assert!(get::<Never>().is_none());
    }
}
