//! Non-owning component handles and sibling lookup.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::Component;

/// Non-owning handle to a registered component.
///
/// The registry keeps the only strong reference; a handle observes the
/// component while it stays registered and goes dead when it is removed,
/// so a handle can never extend a component's lifetime.
///
/// # Panics
///
/// [`with`](Self::with) and [`with_mut`](Self::with_mut) borrow the
/// component at runtime. Borrowing the component that is currently being
/// driven (e.g. looking yourself up from inside your own `init`) panics.
pub struct ComponentHandle {
    inner: Weak<RefCell<dyn Component>>,
}

impl ComponentHandle {
    /// Wraps a weak reference handed out by the registry.
    #[must_use]
    pub fn new(inner: Weak<RefCell<dyn Component>>) -> Self {
        Self { inner }
    }

    /// Returns `true` while the registry still owns the component.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    /// Runs `f` with a shared borrow of the component, or returns `None`
    /// if it has been removed.
    pub fn with<R>(&self, f: impl FnOnce(&dyn Component) -> R) -> Option<R> {
        let rc = self.inner.upgrade()?;
        let guard = rc.borrow();
        Some(f(&*guard))
    }

    /// Runs `f` with an exclusive borrow of the component, or returns
    /// `None` if it has been removed.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut dyn Component) -> R) -> Option<R> {
        let rc = self.inner.upgrade()?;
        let mut guard = rc.borrow_mut();
        Some(f(&mut *guard))
    }
}

impl Clone for ComponentHandle {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

/// Lookup of registered components by name.
///
/// Implemented by the registry; components reach it through
/// [`Context::peer`](crate::Context::peer).
pub trait PeerLookup {
    /// Returns a handle to the named component, if registered.
    fn peer(&self, name: &str) -> Option<ComponentHandle>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ComponentError, Context};

    struct Named;

    impl Component for Named {
        fn name(&self) -> &str {
            "named"
        }

        fn init(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
            Ok(())
        }

        fn tick(&mut self, _ctx: &Context) {}

        fn shutdown(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    #[test]
    fn handle_observes_while_owned() {
        let strong: Rc<RefCell<dyn Component>> = Rc::new(RefCell::new(Named));
        let handle = ComponentHandle::new(Rc::downgrade(&strong));

        assert!(handle.is_alive());
        assert_eq!(handle.with(|c| c.name().to_string()), Some("named".into()));
    }

    #[test]
    fn handle_goes_dead_after_drop() {
        let strong: Rc<RefCell<dyn Component>> = Rc::new(RefCell::new(Named));
        let handle = ComponentHandle::new(Rc::downgrade(&strong));
        drop(strong);

        assert!(!handle.is_alive());
        assert!(handle.with(|c| c.name().to_string()).is_none());
        assert!(handle.with_mut(|_c| ()).is_none());
    }
}
