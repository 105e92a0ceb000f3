//! The layout tree.
//!
//! A shell describes its layout as an acyclic tree of [`LayoutNode`]s.
//! Plain values pass through persistence verbatim; component collections
//! are an explicit tree variant — the only place live references may
//! appear — so the codec never has to infer reference-carrying fields
//! from naming conventions.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::component::ComponentHandle;
use crate::error::SerializationError;

/// One node of a shell layout description.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode {
    /// A plain value, persisted verbatim.
    Scalar(Value),
    /// An ordered sequence of child nodes.
    List(Vec<LayoutNode>),
    /// Named child nodes.
    Object(BTreeMap<String, LayoutNode>),
    /// An ordered collection of live components. The only variant that may
    /// carry component references.
    Components(ComponentSlots),
}

impl LayoutNode {
    /// Encode any serializable value as a scalar node.
    pub fn scalar<T: Serialize>(value: &T) -> Result<Self, SerializationError> {
        serde_json::to_value(value)
            .map(Self::Scalar)
            .map_err(SerializationError::Encode)
    }

    /// Build an object node from key/node pairs.
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, LayoutNode)>) -> Self {
        Self::Object(
            fields
                .into_iter()
                .map(|(key, node)| (key.into(), node))
                .collect(),
        )
    }

    /// Child node under `key`, for object nodes.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&LayoutNode> {
        match self {
            Self::Object(fields) => fields.get(key),
            _ => None,
        }
    }

    /// The scalar value, if this is a scalar node.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// The child list, if this is a list node.
    #[must_use]
    pub fn as_list(&self) -> Option<&[LayoutNode]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The named children, if this is an object node.
    #[must_use]
    pub fn as_object(&self) -> Option<&BTreeMap<String, LayoutNode>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// The component slots, if this is a components node.
    #[must_use]
    pub fn as_components(&self) -> Option<&ComponentSlots> {
        match self {
            Self::Components(slots) => Some(slots),
            _ => None,
        }
    }
}

/// Ordered component slots.
///
/// Positions are stable: when a component fails to come back during a
/// restore, its slot stays vacant instead of shifting later entries down,
/// so every survivor keeps the index it was persisted with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentSlots {
    slots: Vec<Option<ComponentHandle>>,
}

impl ComponentSlots {
    /// An empty slot list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `len` vacant slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    /// Fully occupied slots, in iteration order.
    pub fn from_handles(handles: impl IntoIterator<Item = ComponentHandle>) -> Self {
        Self {
            slots: handles.into_iter().map(Some).collect(),
        }
    }

    /// Append an occupied slot.
    pub fn push(&mut self, handle: ComponentHandle) {
        self.slots.push(Some(handle));
    }

    /// Occupy the slot at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds; slots are sized up front via
    /// [`ComponentSlots::with_len`].
    pub fn set(&mut self, index: usize, handle: ComponentHandle) {
        self.slots[index] = Some(handle);
    }

    /// The handle at `index`, if the slot is occupied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ComponentHandle> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Whether the slot at `index` exists but is vacant.
    #[must_use]
    pub fn is_vacant(&self, index: usize) -> bool {
        matches!(self.slots.get(index), Some(None))
    }

    /// Number of slots, vacant ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether there are no slots at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Occupied handles, in slot order.
    pub fn present(&self) -> impl Iterator<Item = &ComponentHandle> {
        self.slots.iter().flatten()
    }
}

impl FromIterator<ComponentHandle> for ComponentSlots {
    fn from_iter<I: IntoIterator<Item = ComponentHandle>>(iter: I) -> Self {
        Self::from_handles(iter)
    }
}
