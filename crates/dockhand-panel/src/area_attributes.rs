//! Expanded-area attributes for external styling.
//!
//! When a panel expands a component, the shell may want to restyle the
//! chrome around that docking edge. The handler stamps the expanded
//! component's id into a shared map keyed by side; clearing the
//! expansion clears the entry.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crate::side_panel::Side;

/// Shared side → expanded-component-id map.
#[derive(Clone, Debug, Default)]
pub struct AreaAttributes {
    inner: Rc<RefCell<BTreeMap<Side, String>>>,
}

impl AreaAttributes {
    /// An empty attribute map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `component_id` is expanded on `side`.
    pub fn set(&self, side: Side, component_id: impl Into<String>) {
        self.inner.borrow_mut().insert(side, component_id.into());
    }

    /// Record that nothing is expanded on `side`.
    pub fn clear(&self, side: Side) {
        self.inner.borrow_mut().remove(&side);
    }

    /// Id of the component expanded on `side`, if any.
    #[must_use]
    pub fn get(&self, side: Side) -> Option<String> {
        self.inner.borrow().get(&side).cloned()
    }
}
