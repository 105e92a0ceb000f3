//! Side panel handler: a rank-ordered dock area with a tab strip and a
//! stacked content area.
//!
//! The handler is the only mutator of its three structures — the rank
//! list, the tab strip, and the content stack — so they can never race.
//! The strip's current selection is the single source of truth for which
//! component is expanded; the stack's visibility and the container chrome
//! are derived from it after every mutation, never tracked separately.

use std::fmt;

use dockhand_core::{ComponentHandle, ComponentSlots, LayoutNode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::area_attributes::AreaAttributes;
use crate::content_stack::{ContentStack, PanelContainerHandle};
use crate::tab_strip::{CurrentChange, Orientation, TabEntry, TabStrip};

/// Rank assigned when the caller has no ordering preference.
pub const DEFAULT_RANK: i32 = 100;

/// Fragment field naming the currently expanded components.
const EXPANDED_FIELD: &str = "expanded";
/// Fragment field naming the full ordered component set.
const COMPONENTS_FIELD: &str = "components";
/// Fragment type tag.
const SIDEBAR_TYPE: &str = "sidebar";

/// Docking edge a side panel is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Left edge.
    Left,
    /// Right edge.
    Right,
    /// Bottom edge.
    Bottom,
}

impl Side {
    /// Lowercase name of the edge.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
        }
    }

    /// Tab strips run vertically along the left/right edges and
    /// horizontally along the bottom.
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Left | Self::Right => Orientation::Vertical,
            Self::Bottom => Orientation::Horizontal,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component and its sort rank.
#[derive(Debug, Clone)]
struct RankItem {
    handle: ComponentHandle,
    rank: i32,
}

/// Layout fragment a side panel produces and consumes.
///
/// `expanded` holds at most one component: side panels follow a
/// single-expansion model, and the type keeps that invariant explicit
/// instead of re-deriving it from a list.
#[derive(Debug, Clone, Default)]
pub struct SidePanelLayout {
    /// Full ordered component set.
    pub components: Vec<ComponentHandle>,
    /// The currently expanded component, if any.
    pub expanded: Option<ComponentHandle>,
}

impl SidePanelLayout {
    /// Encode the fragment as a layout tree node.
    #[must_use]
    pub fn to_layout_node(&self) -> LayoutNode {
        LayoutNode::object([
            (
                "type",
                LayoutNode::Scalar(Value::String(SIDEBAR_TYPE.to_owned())),
            ),
            (
                COMPONENTS_FIELD,
                LayoutNode::Components(ComponentSlots::from_handles(
                    self.components.iter().cloned(),
                )),
            ),
            (
                EXPANDED_FIELD,
                LayoutNode::Components(ComponentSlots::from_handles(
                    self.expanded.iter().cloned(),
                )),
            ),
        ])
    }

    /// Decode a fragment from a layout tree node.
    ///
    /// Returns `None` when the node is not a sidebar object. Vacant slots
    /// (components that failed to restore) are skipped, and only the
    /// first occupied expanded slot is honored.
    #[must_use]
    pub fn from_layout_node(node: &LayoutNode) -> Option<Self> {
        let kind = node.get("type")?.as_scalar()?.as_str()?;
        if kind != SIDEBAR_TYPE {
            return None;
        }
        let components = node
            .get(COMPONENTS_FIELD)
            .and_then(LayoutNode::as_components)
            .map(|slots| slots.present().cloned().collect())
            .unwrap_or_default();
        let expanded = node
            .get(EXPANDED_FIELD)
            .and_then(LayoutNode::as_components)
            .and_then(|slots| slots.present().next().cloned());
        Some(Self {
            components,
            expanded,
        })
    }
}

/// Manages one docking edge: a rank list, a tab strip, and a content
/// stack, kept consistent through every insert, removal, and expansion
/// change.
#[derive(Debug)]
pub struct SidePanelHandler {
    side: Side,
    items: Vec<RankItem>,
    tab_strip: TabStrip,
    stack: ContentStack,
    attributes: AreaAttributes,
}

impl SidePanelHandler {
    /// Create the strip and stack for one docking edge.
    #[must_use]
    pub fn new(side: Side) -> Self {
        let mut handler = Self {
            side,
            items: Vec::new(),
            tab_strip: TabStrip::new(side.orientation()),
            stack: ContentStack::new(),
            attributes: AreaAttributes::new(),
        };
        handler.refresh_visibility();
        handler
    }

    /// Share an attribute map with other handlers and the shell.
    #[must_use]
    pub fn with_attributes(mut self, attributes: AreaAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Attach the container chrome hosting this panel.
    #[must_use]
    pub fn with_container(mut self, container: PanelContainerHandle) -> Self {
        self.stack.set_container(container);
        self.refresh_visibility();
        self
    }

    /// The edge this panel docks to.
    #[must_use]
    pub fn side(&self) -> Side {
        self.side
    }

    /// The tab strip.
    #[must_use]
    pub fn tab_strip(&self) -> &TabStrip {
        &self.tab_strip
    }

    /// The content stack.
    #[must_use]
    pub fn stack(&self) -> &ContentStack {
        &self.stack
    }

    /// The attribute map this panel stamps.
    #[must_use]
    pub fn attributes(&self) -> &AreaAttributes {
        &self.attributes
    }

    /// The components, in visible (rank) order.
    #[must_use]
    pub fn components(&self) -> &[ComponentHandle] {
        self.stack.components()
    }

    /// The currently expanded component, derived from the tab selection.
    #[must_use]
    pub fn expanded(&self) -> Option<ComponentHandle> {
        self.tab_strip
            .current()
            .and_then(|id| self.find_handle(id))
    }

    /// Insert a component at the position its rank dictates.
    ///
    /// Equal ranks keep insertion order: a later insert with the same
    /// rank lands after the existing entries. The component starts hidden
    /// until it is expanded. Re-adding a handle that is already present
    /// is the caller's move to make (remove first); the handler does not
    /// deduplicate.
    pub fn add_component(&mut self, handle: ComponentHandle, rank: i32) {
        handle.set_hidden(true);
        let index = self.items.partition_point(|item| item.rank <= rank);
        let entry = TabEntry::new(handle.id(), handle.title());
        debug!(
            message = "side_panel.add",
            side = %self.side,
            id = %handle.id(),
            rank,
            index,
        );
        self.items.insert(index, RankItem {
            handle: handle.clone(),
            rank,
        });
        self.stack.insert(index, handle);
        self.tab_strip.insert(index, entry);
        self.refresh_visibility();
    }

    /// Expand the component with `id`.
    ///
    /// Returns the component when found, `None` (with no state change)
    /// otherwise.
    pub fn expand(&mut self, id: &str) -> Option<ComponentHandle> {
        let handle = self.find_handle(id)?;
        let change = self.tab_strip.set_current(Some(id));
        self.apply_current_change(&change);
        Some(handle)
    }

    /// Expand and focus the component with `id`.
    pub fn activate(&mut self, id: &str) -> Option<ComponentHandle> {
        let handle = self.expand(id)?;
        handle.activate();
        Some(handle)
    }

    /// Collapse the panel so nothing is expanded.
    pub fn collapse(&mut self) {
        let change = self.tab_strip.set_current(None);
        self.apply_current_change(&change);
    }

    /// Remove every component from the panel.
    pub fn clear(&mut self) {
        self.items.clear();
        self.stack.clear();
        let change = self.tab_strip.clear();
        self.apply_current_change(&change);
    }

    /// Produce the fragment describing contents and expansion.
    #[must_use]
    pub fn layout_data(&self) -> SidePanelLayout {
        SidePanelLayout {
            components: self.stack.components().to_vec(),
            expanded: self.expanded(),
        }
    }

    /// Replace contents from a fragment.
    ///
    /// Components are re-added in fragment order with rank = position, so
    /// the persisted ordering is reproduced positionally rather than by
    /// re-deriving the original ranks. At most one component is then
    /// re-expanded.
    pub fn apply_layout_data(&mut self, layout: &SidePanelLayout) {
        self.collapse();
        self.clear();
        for (index, handle) in layout.components.iter().enumerate() {
            self.add_component(handle.clone(), index as i32);
        }
        if let Some(expanded) = &layout.expanded {
            self.expand(&expanded.id());
        }
    }

    /// Note that `id`'s component left the stack (closed or reparented
    /// away).
    ///
    /// Bottom panels auto-select a replacement when the expanded
    /// component is removed — first the item now occupying the vacated
    /// index, else the new last item. Left and right panels collapse
    /// instead. The asymmetry is a deliberate policy: a bottom panel
    /// (terminals, problem lists) should rarely sit empty while it still
    /// has content.
    pub fn component_removed(&mut self, id: &str) {
        let Some(index) = self
            .items
            .iter()
            .position(|item| item.handle.id() == id)
        else {
            return;
        };
        let was_expanded = self.tab_strip.current() == Some(id);
        self.items.remove(index);
        self.stack.remove(id);
        debug!(message = "side_panel.removed", side = %self.side, id);
        if let Some(change) = self.tab_strip.remove(id) {
            self.apply_current_change(&change);
        }
        if was_expanded && self.side == Side::Bottom {
            let replacement = self
                .items
                .get(index)
                .or_else(|| self.items.last())
                .map(|item| item.handle.id());
            if let Some(replacement) = replacement {
                self.expand(&replacement);
            }
        }
        self.refresh_visibility();
    }

    /// Forward a tab activation request to the component.
    pub fn tab_activate_requested(&mut self, id: &str) {
        if let Some(handle) = self.find_handle(id) {
            handle.activate();
        }
    }

    /// Forward a tab close request to the component.
    pub fn tab_close_requested(&mut self, id: &str) {
        if let Some(handle) = self.find_handle(id) {
            handle.close();
        }
    }

    fn find_handle(&self, id: &str) -> Option<ComponentHandle> {
        self.items
            .iter()
            .find(|item| item.handle.id() == id)
            .map(|item| item.handle.clone())
    }

    /// React to a selection transition: swap component visibility, stamp
    /// the area attribute, and re-derive the panel's visibility flags.
    fn apply_current_change(&mut self, change: &CurrentChange) {
        if !change.is_noop() {
            if let Some(previous) = change
                .previous
                .as_deref()
                .and_then(|id| self.find_handle(id))
            {
                previous.set_hidden(true);
            }
            match change
                .current
                .as_deref()
                .and_then(|id| self.find_handle(id))
            {
                Some(current) => {
                    current.set_hidden(false);
                    self.attributes.set(self.side, current.id());
                }
                None => self.attributes.clear(self.side),
            }
        }
        self.refresh_visibility();
    }

    /// Derive all visibility flags from the strip and its selection.
    ///
    /// Runs after every structural change; the flags must never be left
    /// stale between a mutation and its visibility update.
    fn refresh_visibility(&mut self) {
        let hide_strip = self.tab_strip.is_empty();
        self.tab_strip.set_hidden(hide_strip);
        let hide_stack = self.tab_strip.current().is_none();
        self.stack.set_hidden(hide_stack);
        if let Some(container) = self.stack.container() {
            container.set_collapsed(hide_stack);
            container.set_hidden(hide_strip && hide_stack);
        }
    }
}
