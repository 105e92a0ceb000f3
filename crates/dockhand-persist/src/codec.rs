//! Deflate/inflate codec between live layout trees and persisted strings.
//!
//! # Data flow
//!
//! ```text
//! LayoutNode ── deflate ──▶ StoredLayout ──▶ one JSON string
//! one JSON string ──▶ StoredLayout ── inflate ──▶ LayoutNode
//!                                 │
//!                                 └─ ComponentRegistry (async rebuild)
//! ```
//!
//! Deflate is synchronous: component collections become replayable
//! records, everything else is copied structurally. Inflate is
//! asynchronous: every record of every collection is issued as a
//! reconstruction job up front, all jobs are awaited together, and each
//! result lands in its pre-computed slot — so the final order matches
//! the stored order no matter which job settles first, and one failed
//! job only costs its own slot.

use dockhand_core::{
    ComponentHandle, ComponentRegistry, ComponentSlots, LayoutNode, SerializationError,
};
use futures::future;
use tracing::{debug, warn};

use crate::schema::{ComponentRecord, MAX_LAYOUT_DEPTH, StoredLayout, StoredNode};

/// Converts layout trees to persisted strings and back.
///
/// The registry is a constructor-injected dependency: the codec never
/// reaches for ambient state, so it runs against any registry
/// implementation, stubs included.
pub struct LayoutCodec<R> {
    registry: R,
}

impl<R: ComponentRegistry> LayoutCodec<R> {
    /// Build a codec over `registry`.
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    /// The registry reconstructions are replayed through.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Turn a layout tree into its persisted string form.
    ///
    /// Components with no registry descriptor cannot be replayed and are
    /// skipped (they would persist as dangling references). Stateful
    /// components contribute an inner-state snapshot. Fails only when the
    /// tree itself cannot be represented; callers are expected to discard
    /// the persisted layout on failure rather than keep a partial write.
    pub fn deflate(&self, layout: &LayoutNode) -> Result<String, SerializationError> {
        let root = self.encode(layout, 0)?;
        serde_json::to_string(&StoredLayout::new(root)).map_err(SerializationError::Encode)
    }

    fn encode(&self, node: &LayoutNode, depth: usize) -> Result<StoredNode, SerializationError> {
        if depth >= MAX_LAYOUT_DEPTH {
            return Err(SerializationError::DepthExceeded {
                limit: MAX_LAYOUT_DEPTH,
            });
        }
        Ok(match node {
            LayoutNode::Scalar(value) => StoredNode::Scalar {
                value: value.clone(),
            },
            LayoutNode::List(items) => StoredNode::List {
                items: items
                    .iter()
                    .map(|item| self.encode(item, depth + 1))
                    .collect::<Result<_, _>>()?,
            },
            LayoutNode::Object(fields) => StoredNode::Object {
                fields: fields
                    .iter()
                    .map(|(key, child)| Ok((key.clone(), self.encode(child, depth + 1)?)))
                    .collect::<Result<_, SerializationError>>()?,
            },
            LayoutNode::Components(slots) => StoredNode::Components {
                records: self.encode_components(slots),
            },
        })
    }

    fn encode_components(&self, slots: &ComponentSlots) -> Vec<ComponentRecord> {
        let mut records = Vec::with_capacity(slots.len());
        for handle in slots.present() {
            let Some(construction_options) = self.registry.describe(handle) else {
                debug!(message = "layout.deflate.skipped", id = %handle.id());
                continue;
            };
            records.push(ComponentRecord {
                construction_options,
                inner_state: handle.store_state(),
            });
        }
        records
    }

    /// Rebuild a layout tree from its persisted string form.
    ///
    /// All reconstructions across the whole tree are issued before any is
    /// awaited, then awaited together; the returned future resolves only
    /// once every one of them has settled. A failed reconstruction is
    /// logged as a warning naming the offending factory and leaves its
    /// slot vacant — it never aborts the siblings.
    pub async fn inflate(&self, serialized: &str) -> Result<LayoutNode, SerializationError> {
        let stored: StoredLayout =
            serde_json::from_str(serialized).map_err(SerializationError::Decode)?;
        stored.validate()?;

        let mut collections = Vec::new();
        collect_collections(&stored.root, &mut collections);

        let mut jobs = Vec::new();
        for (ordinal, records) in collections.iter().enumerate() {
            for (slot, record) in records.iter().enumerate() {
                jobs.push(self.reconstruct_record(ordinal, slot, record));
            }
        }
        let outcomes = future::join_all(jobs).await;

        let mut filled: Vec<ComponentSlots> = collections
            .iter()
            .map(|records| ComponentSlots::with_len(records.len()))
            .collect();
        for (ordinal, slot, handle) in outcomes {
            if let Some(handle) = handle {
                filled[ordinal].set(slot, handle);
            }
        }

        let mut filled = filled.into_iter();
        Ok(decode(&stored.root, &mut filled))
    }

    async fn reconstruct_record(
        &self,
        ordinal: usize,
        slot: usize,
        record: &ComponentRecord,
    ) -> (usize, usize, Option<ComponentHandle>) {
        let descriptor = record.construction_options.clone();
        let factory_id = descriptor.factory_id.clone();
        match self.registry.reconstruct(descriptor).await {
            Ok(handle) => {
                // Inner state goes in before anyone can see the component.
                if let Some(state) = &record.inner_state
                    && !handle.restore_state(state.clone())
                {
                    debug!(
                        message = "layout.inflate.state_dropped",
                        factory_id = %factory_id,
                        id = %handle.id(),
                    );
                }
                (ordinal, slot, Some(handle))
            }
            Err(error) => {
                warn!(
                    message = "layout.inflate.reconstruct_failed",
                    factory_id = %factory_id,
                    options = %record.construction_options.options,
                    error = %error,
                );
                (ordinal, slot, None)
            }
        }
    }
}

/// Collect every component collection in walk order (lists by index,
/// objects by field name). [`decode`] consumes filled slot lists in the
/// same order, so the two walks must stay mirror images.
fn collect_collections<'a>(node: &'a StoredNode, out: &mut Vec<&'a [ComponentRecord]>) {
    match node {
        StoredNode::Scalar { .. } => {}
        StoredNode::List { items } => {
            for item in items {
                collect_collections(item, out);
            }
        }
        StoredNode::Object { fields } => {
            for child in fields.values() {
                collect_collections(child, out);
            }
        }
        StoredNode::Components { records } => out.push(records),
    }
}

fn decode(node: &StoredNode, filled: &mut std::vec::IntoIter<ComponentSlots>) -> LayoutNode {
    match node {
        StoredNode::Scalar { value } => LayoutNode::Scalar(value.clone()),
        StoredNode::List { items } => {
            LayoutNode::List(items.iter().map(|item| decode(item, filled)).collect())
        }
        StoredNode::Object { fields } => LayoutNode::Object(
            fields
                .iter()
                .map(|(key, child)| (key.clone(), decode(child, filled)))
                .collect(),
        ),
        StoredNode::Components { .. } => {
            LayoutNode::Components(filled.next().unwrap_or_default())
        }
    }
}
