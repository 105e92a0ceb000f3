//! Component contract and shared handles.
//!
//! A component is a unit of dockable UI content — an editor, a tree, a
//! terminal. Rendering, input, and content are the embedding shell's
//! business; this contract covers only what panels and the persistence
//! layer need: identity, visibility, focus, and lifecycle.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// A unit of dockable UI content.
pub trait DockComponent {
    /// Stable identifier, unique within the shell.
    fn id(&self) -> &str;

    /// Human-readable tab label.
    fn title(&self) -> &str;

    /// Hide or reveal the component's content area.
    fn set_hidden(&mut self, hidden: bool);

    /// Whether the content area is currently hidden.
    fn is_hidden(&self) -> bool;

    /// Give the component input focus.
    fn activate(&mut self) {}

    /// Close the component. Owners are expected to drop their handles and
    /// notify any panel still holding one.
    fn close(&mut self) {}

    /// Typed access to the optional state-persistence capability.
    ///
    /// Components with no inner state to persist keep the default `None`.
    fn as_stateful(&mut self) -> Option<&mut dyn StatefulComponent> {
        None
    }
}

/// Optional capability for components that persist inner state across
/// sessions.
pub trait StatefulComponent {
    /// Snapshot the inner state. Called on shutdown; must be synchronous
    /// and side-effect free.
    fn store_state(&self) -> Value;

    /// Reapply a stored snapshot. Called immediately after construction,
    /// before the component is handed to anyone else.
    fn restore_state(&mut self, state: Value);
}

/// Shared, cheaply clonable reference to a live component.
///
/// Identity is pointer identity: two handles compare equal iff they refer
/// to the same component instance. Handles are single-threaded; panels,
/// stacks, and the codec all run on one cooperative scheduler.
#[derive(Clone)]
pub struct ComponentHandle {
    inner: Rc<RefCell<dyn DockComponent>>,
}

impl ComponentHandle {
    /// Wrap a component in a shared handle.
    pub fn new(component: impl DockComponent + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(component)),
        }
    }

    /// The component's stable identifier.
    #[must_use]
    pub fn id(&self) -> String {
        self.inner.borrow().id().to_owned()
    }

    /// The component's tab label.
    #[must_use]
    pub fn title(&self) -> String {
        self.inner.borrow().title().to_owned()
    }

    /// Immutable access to the component.
    #[must_use]
    pub fn borrow(&self) -> Ref<'_, dyn DockComponent> {
        self.inner.borrow()
    }

    /// Mutable access to the component.
    #[must_use]
    pub fn borrow_mut(&self) -> RefMut<'_, dyn DockComponent> {
        self.inner.borrow_mut()
    }

    /// Hide or reveal the component.
    pub fn set_hidden(&self, hidden: bool) {
        self.inner.borrow_mut().set_hidden(hidden);
    }

    /// Whether the component is currently hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.borrow().is_hidden()
    }

    /// Give the component input focus.
    pub fn activate(&self) {
        self.inner.borrow_mut().activate();
    }

    /// Ask the component to close itself.
    pub fn close(&self) {
        self.inner.borrow_mut().close();
    }

    /// Snapshot inner state, if the component carries the stateful
    /// capability.
    #[must_use]
    pub fn store_state(&self) -> Option<Value> {
        self.inner
            .borrow_mut()
            .as_stateful()
            .map(|stateful| stateful.store_state())
    }

    /// Reapply a stored snapshot. Returns `false` when the component has
    /// no stateful capability (the payload is dropped).
    pub fn restore_state(&self, state: Value) -> bool {
        match self.inner.borrow_mut().as_stateful() {
            Some(stateful) => {
                stateful.restore_state(state);
                true
            }
            None => false,
        }
    }

    /// Whether two handles refer to the same component instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl PartialEq for ComponentHandle {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ComponentHandle {}

impl fmt::Debug for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHandle")
            .field("id", &self.id())
            .finish_non_exhaustive()
    }
}
