//! Stacked content area and its parent-container chrome.
//!
//! The stack owns the ordered component handles for one panel; at most
//! one of them is shown at a time. The optional container handle exposes
//! the chrome flags (`hidden`, `collapsed`) the embedding shell reads to
//! style the region around the panel.

use std::cell::RefCell;
use std::rc::Rc;

use dockhand_core::ComponentHandle;

#[derive(Debug, Default, Clone, Copy)]
struct ContainerFlags {
    hidden: bool,
    collapsed: bool,
}

/// Shared handle to the chrome of the container hosting a panel's strip
/// and stack.
///
/// The panel handler writes the flags; the embedding shell reads them.
#[derive(Clone, Debug, Default)]
pub struct PanelContainerHandle {
    inner: Rc<RefCell<ContainerFlags>>,
}

impl PanelContainerHandle {
    /// A visible, non-collapsed container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the whole container is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.borrow().hidden
    }

    /// Whether the container is collapsed (strip visible, content not).
    #[must_use]
    pub fn is_collapsed(&self) -> bool {
        self.inner.borrow().collapsed
    }

    pub(crate) fn set_hidden(&self, hidden: bool) {
        self.inner.borrow_mut().hidden = hidden;
    }

    pub(crate) fn set_collapsed(&self, collapsed: bool) {
        self.inner.borrow_mut().collapsed = collapsed;
    }
}

/// Ordered stack of components, at most one of which is shown.
#[derive(Debug, Default)]
pub struct ContentStack {
    components: Vec<ComponentHandle>,
    hidden: bool,
    container: Option<PanelContainerHandle>,
}

impl ContentStack {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach the container whose chrome this stack drives.
    pub fn set_container(&mut self, container: PanelContainerHandle) {
        self.container = Some(container);
    }

    /// The attached container, if any.
    #[must_use]
    pub fn container(&self) -> Option<&PanelContainerHandle> {
        self.container.as_ref()
    }

    /// Insert a component at `index` (clamped to the current length).
    pub fn insert(&mut self, index: usize, handle: ComponentHandle) {
        let index = index.min(self.components.len());
        self.components.insert(index, handle);
    }

    /// Remove and return the component with `id`.
    pub fn remove(&mut self, id: &str) -> Option<ComponentHandle> {
        let index = self
            .components
            .iter()
            .position(|handle| handle.id() == id)?;
        Some(self.components.remove(index))
    }

    /// Remove every component.
    pub fn clear(&mut self) {
        self.components.clear();
    }

    /// The component with `id`, if present.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ComponentHandle> {
        self.components.iter().find(|handle| handle.id() == id)
    }

    /// The components, in stack order.
    #[must_use]
    pub fn components(&self) -> &[ComponentHandle] {
        &self.components
    }

    /// Number of components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the stack holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Hide or reveal the content area.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Whether the content area is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dockhand_core::testing::StubComponent;

    fn handle(id: &str) -> ComponentHandle {
        ComponentHandle::new(StubComponent::new(id))
    }

    #[test]
    fn insert_and_remove_keep_order() {
        let mut stack = ContentStack::new();
        stack.insert(0, handle("a"));
        stack.insert(1, handle("c"));
        stack.insert(1, handle("b"));
        let order: Vec<String> = stack.components().iter().map(ComponentHandle::id).collect();
        assert_eq!(order, ["a", "b", "c"]);

        let removed = stack.remove("b").unwrap();
        assert_eq!(removed.id(), "b");
        assert!(stack.remove("b").is_none());
        assert_eq!(stack.len(), 2);
    }

    #[test]
    fn container_flags_are_shared() {
        let container = PanelContainerHandle::new();
        let mut stack = ContentStack::new();
        stack.set_container(container.clone());
        stack.container().unwrap().set_collapsed(true);
        assert!(container.is_collapsed());
        assert!(!container.is_hidden());
    }
}
