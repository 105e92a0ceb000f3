//! Tab strip backing a side panel.
//!
//! Keeps an ordered list of identity-keyed tabs plus the current
//! selection. The selection is the single record of which component is
//! expanded; the panel handler derives everything else from it.

use tracing::debug;

/// Which way the strip runs; follows the docking edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Tabs laid out in a row (bottom edge).
    Horizontal,
    /// Tabs laid out in a column (left/right edges).
    Vertical,
}

/// One tab, keyed by its component id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabEntry {
    id: String,
    label: String,
}

impl TabEntry {
    /// Build a tab for the component with `id`.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// The owning component's id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The tab label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Selection transition reported by the strip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentChange {
    /// Selected component id before the transition.
    pub previous: Option<String>,
    /// Selected component id after the transition.
    pub current: Option<String>,
}

impl CurrentChange {
    /// Whether the transition changed nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.previous == self.current
    }
}

/// Ordered, identity-keyed tab list with an optional current selection.
#[derive(Debug)]
pub struct TabStrip {
    orientation: Orientation,
    entries: Vec<TabEntry>,
    current: Option<String>,
    hidden: bool,
}

impl TabStrip {
    /// An empty strip.
    #[must_use]
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            entries: Vec::new(),
            current: None,
            hidden: false,
        }
    }

    /// The strip's orientation.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Insert a tab at `index` (clamped to the current length).
    pub fn insert(&mut self, index: usize, entry: TabEntry) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, entry);
    }

    /// Remove the tab for `id`.
    ///
    /// Returns `None` when no such tab exists. Otherwise returns the
    /// selection transition: a no-op when the removed tab was not
    /// selected, a selection-clearing change when it was.
    pub fn remove(&mut self, id: &str) -> Option<CurrentChange> {
        let index = self.entries.iter().position(|entry| entry.id == id)?;
        self.entries.remove(index);
        if self.current.as_deref() == Some(id) {
            Some(self.set_current(None))
        } else {
            Some(CurrentChange {
                previous: self.current.clone(),
                current: self.current.clone(),
            })
        }
    }

    /// Remove every tab and clear the selection.
    pub fn clear(&mut self) -> CurrentChange {
        self.entries.clear();
        self.set_current(None)
    }

    /// Change the selection, returning the transition.
    ///
    /// An id with no matching tab clears the selection. No-op transitions
    /// are returned as-is; callers decide whether to react.
    pub fn set_current(&mut self, id: Option<&str>) -> CurrentChange {
        let next = id
            .and_then(|id| self.entries.iter().find(|entry| entry.id == id))
            .map(|entry| entry.id.clone());
        let previous = self.current.clone();
        if previous != next {
            debug!(
                message = "tab_strip.switch",
                previous = ?previous,
                current = ?next,
            );
        }
        self.current = next;
        CurrentChange {
            previous,
            current: self.current.clone(),
        }
    }

    /// Id of the currently selected tab.
    #[must_use]
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Position of the tab for `id`.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }

    /// The tabs, in display order.
    #[must_use]
    pub fn entries(&self) -> &[TabEntry] {
        &self.entries
    }

    /// Number of tabs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the strip has no tabs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Hide or reveal the strip.
    pub fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    /// Whether the strip is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strip_with(ids: &[&str]) -> TabStrip {
        let mut strip = TabStrip::new(Orientation::Vertical);
        for (index, id) in ids.iter().enumerate() {
            strip.insert(index, TabEntry::new(*id, id.to_uppercase()));
        }
        strip
    }

    #[test]
    fn insert_clamps_index() {
        let mut strip = strip_with(&["a"]);
        strip.insert(99, TabEntry::new("b", "B"));
        let order: Vec<&str> = strip.entries().iter().map(TabEntry::id).collect();
        assert_eq!(order, ["a", "b"]);
    }

    #[test]
    fn set_current_reports_transition() {
        let mut strip = strip_with(&["a", "b"]);
        let change = strip.set_current(Some("b"));
        assert_eq!(change.previous, None);
        assert_eq!(change.current, Some("b".to_owned()));
        assert!(!change.is_noop());
        assert_eq!(strip.current(), Some("b"));
    }

    #[test]
    fn set_current_unknown_id_clears_selection() {
        let mut strip = strip_with(&["a"]);
        strip.set_current(Some("a"));
        let change = strip.set_current(Some("ghost"));
        assert_eq!(change.current, None);
        assert_eq!(strip.current(), None);
    }

    #[test]
    fn set_current_same_id_is_noop() {
        let mut strip = strip_with(&["a"]);
        strip.set_current(Some("a"));
        assert!(strip.set_current(Some("a")).is_noop());
    }

    #[test]
    fn remove_selected_tab_clears_selection() {
        let mut strip = strip_with(&["a", "b"]);
        strip.set_current(Some("a"));
        let change = strip.remove("a").unwrap();
        assert_eq!(change.previous, Some("a".to_owned()));
        assert_eq!(change.current, None);
        assert_eq!(strip.len(), 1);
    }

    #[test]
    fn remove_other_tab_keeps_selection() {
        let mut strip = strip_with(&["a", "b"]);
        strip.set_current(Some("a"));
        let change = strip.remove("b").unwrap();
        assert!(change.is_noop());
        assert_eq!(strip.current(), Some("a"));
    }

    #[test]
    fn remove_unknown_tab_reports_nothing() {
        let mut strip = strip_with(&["a"]);
        assert!(strip.remove("ghost").is_none());
    }

    #[test]
    fn clear_drops_tabs_and_selection() {
        let mut strip = strip_with(&["a", "b"]);
        strip.set_current(Some("b"));
        let change = strip.clear();
        assert_eq!(change.previous, Some("b".to_owned()));
        assert_eq!(change.current, None);
        assert!(strip.is_empty());
    }
}
