//! Whole-shell layout persistence orchestration.
//!
//! The restorer sits between three parties: the shell (which can
//! describe and apply its layout as a tree), the codec (which converts
//! that tree to and from one string), and a storage backend (which keeps
//! that string under a fixed key). Shutdown captures, startup restores,
//! and a reset command clears — with a one-shot guard so the reload a
//! reset triggers cannot re-persist the layout being discarded.

use std::cell::Cell;

use dockhand_core::{ComponentRegistry, LayoutNode, StorageResult};
use tracing::{debug, error, info, warn};

use crate::codec::LayoutCodec;
use crate::storage::StorageBackend;

/// Storage key the serialized layout lives under.
pub const LAYOUT_STORAGE_KEY: &str = "layout";

/// Command id for the user-facing "reset layout" action.
pub const RESET_LAYOUT_COMMAND: &str = "layout.reset";

/// Shell surface the restorer drives.
pub trait ShellLayout {
    /// Describe the current layout as a tree.
    fn layout_data(&self) -> LayoutNode;

    /// Apply a restored layout description.
    fn apply_layout_data(&mut self, layout: LayoutNode);
}

/// Populates a default layout when no usable persisted layout exists.
pub trait LayoutInitializer {
    /// Contribute to the default layout.
    fn initialize_layout(&self, shell: &mut dyn ShellLayout);
}

/// Saves and restores the shell layout across sessions.
pub struct LayoutRestorer<R, S> {
    codec: LayoutCodec<R>,
    storage: S,
    should_store: Cell<bool>,
}

impl<R: ComponentRegistry, S: StorageBackend> LayoutRestorer<R, S> {
    /// Build a restorer over a registry and a storage backend.
    pub fn new(registry: R, storage: S) -> Self {
        Self {
            codec: LayoutCodec::new(registry),
            storage,
            should_store: Cell::new(true),
        }
    }

    /// The codec used for capture and restore.
    pub fn codec(&self) -> &LayoutCodec<R> {
        &self.codec
    }

    /// The backing store.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Restore the persisted layout into `shell`, falling back to the
    /// initializers when nothing usable is stored.
    ///
    /// A corrupt or incompatible persisted layout — and a failing storage
    /// read — are logged and treated as absent: the shell comes up with
    /// its default layout rather than failing to start. Components that
    /// cannot be rebuilt are already absent from the tree the codec
    /// returns; their loss is log-only.
    pub async fn initialize_layout(
        &self,
        shell: &mut dyn ShellLayout,
        initializers: &[&dyn LayoutInitializer],
    ) {
        let serialized = match self.storage.get(LAYOUT_STORAGE_KEY) {
            Ok(value) => value,
            Err(error) => {
                warn!(message = "layout.load_failed", error = %error);
                None
            }
        };
        if let Some(serialized) = serialized {
            match self.codec.inflate(&serialized).await {
                Ok(layout) => {
                    info!(message = "layout.restored");
                    shell.apply_layout_data(layout);
                    return;
                }
                Err(error) => warn!(message = "layout.restore_failed", error = %error),
            }
        }
        debug!(message = "layout.default", initializers = initializers.len());
        for initializer in initializers {
            initializer.initialize_layout(shell);
        }
    }

    /// Capture and persist the shell layout, replacing the stored value
    /// wholesale.
    ///
    /// Does nothing after [`reset_layout`](Self::reset_layout). When the
    /// layout cannot be serialized, the key is cleared instead of
    /// written: a corrupt save must never outlive a clean reset.
    pub fn store_layout(&self, shell: &dyn ShellLayout) {
        if !self.should_store.get() {
            debug!(message = "layout.store_suppressed");
            return;
        }
        let layout = shell.layout_data();
        match self.codec.deflate(&layout) {
            Ok(serialized) => {
                if let Err(storage_error) = self.storage.set(LAYOUT_STORAGE_KEY, &serialized) {
                    error!(message = "layout.store_failed", error = %storage_error);
                }
            }
            Err(serialize_error) => {
                if let Err(storage_error) = self.storage.remove(LAYOUT_STORAGE_KEY) {
                    error!(message = "layout.clear_failed", error = %storage_error);
                }
                error!(message = "layout.serialize_failed", error = %serialize_error);
            }
        }
    }

    /// Clear the persisted layout and suppress any further automatic
    /// save — the [`RESET_LAYOUT_COMMAND`] action.
    ///
    /// The guard is one-shot by design: the host reloads the shell right
    /// after a reset, and without the guard the shutdown hook would
    /// immediately re-persist the layout being discarded. Reloading
    /// itself is the host's job.
    pub fn reset_layout(&self) -> StorageResult<()> {
        self.should_store.set(false);
        info!(message = "layout.reset");
        self.storage.remove(LAYOUT_STORAGE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::MAX_LAYOUT_DEPTH;
    use crate::storage::MemoryStorage;
    use dockhand_core::testing::{StubComponent, StubRegistry};
    use dockhand_core::{
        ComponentHandle, ComponentSlots, ConstructionDescriptor, StorageError,
    };
    use serde_json::json;

    /// Shell stub holding a fixed description and recording applications.
    struct RecordingShell {
        layout: LayoutNode,
        applied: Vec<LayoutNode>,
    }

    impl RecordingShell {
        fn with_layout(layout: LayoutNode) -> Self {
            Self {
                layout,
                applied: Vec::new(),
            }
        }

        fn empty() -> Self {
            Self::with_layout(LayoutNode::object([(
                "theme",
                LayoutNode::Scalar(json!("default")),
            )]))
        }
    }

    impl ShellLayout for RecordingShell {
        fn layout_data(&self) -> LayoutNode {
            self.layout.clone()
        }

        fn apply_layout_data(&mut self, layout: LayoutNode) {
            self.applied.push(layout);
        }
    }

    /// Initializer stamping a marker so tests can see it ran.
    struct MarkerInitializer;

    impl LayoutInitializer for MarkerInitializer {
        fn initialize_layout(&self, shell: &mut dyn ShellLayout) {
            shell.apply_layout_data(LayoutNode::Scalar(json!("initialized")));
        }
    }

    /// Backend whose reads always fail.
    struct BrokenStorage;

    impl StorageBackend for BrokenStorage {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Io(std::io::Error::other("disk on fire")))
        }

        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Ok(())
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    fn too_deep_layout() -> LayoutNode {
        let mut node = LayoutNode::Scalar(json!(0));
        for _ in 0..(MAX_LAYOUT_DEPTH + 8) {
            node = LayoutNode::List(vec![node]);
        }
        node
    }

    #[tokio::test]
    async fn initialize_without_persisted_layout_runs_initializers() {
        let restorer = LayoutRestorer::new(StubRegistry::new(), MemoryStorage::new());
        let mut shell = RecordingShell::empty();
        restorer
            .initialize_layout(&mut shell, &[&MarkerInitializer])
            .await;
        assert_eq!(shell.applied, vec![LayoutNode::Scalar(json!("initialized"))]);
    }

    #[tokio::test]
    async fn initialize_applies_persisted_layout_and_skips_initializers() {
        let registry = StubRegistry::new();
        registry.register_stub("view");
        let handle = ComponentHandle::new(StubComponent::new("files"));
        registry.adopt(
            &handle,
            ConstructionDescriptor::new("view", json!({"id": "files"})),
        );

        let storage = MemoryStorage::new();
        let restorer = LayoutRestorer::new(&registry, &storage);

        let shell_layout = LayoutNode::object([(
            "left",
            LayoutNode::Components(ComponentSlots::from_handles([handle])),
        )]);
        restorer.store_layout(&RecordingShell::with_layout(shell_layout));
        assert!(storage.get(LAYOUT_STORAGE_KEY).unwrap().is_some());

        let mut fresh = RecordingShell::empty();
        restorer
            .initialize_layout(&mut fresh, &[&MarkerInitializer])
            .await;
        assert_eq!(fresh.applied.len(), 1);
        let slots = fresh.applied[0]
            .get("left")
            .and_then(LayoutNode::as_components)
            .unwrap();
        assert_eq!(slots.get(0).unwrap().id(), "files");
    }

    #[tokio::test]
    async fn corrupt_persisted_layout_falls_back_to_initializers() {
        let storage = MemoryStorage::new();
        storage.set(LAYOUT_STORAGE_KEY, "{ not a layout").unwrap();
        let restorer = LayoutRestorer::new(StubRegistry::new(), &storage);

        let mut shell = RecordingShell::empty();
        restorer
            .initialize_layout(&mut shell, &[&MarkerInitializer])
            .await;
        assert_eq!(shell.applied, vec![LayoutNode::Scalar(json!("initialized"))]);
    }

    #[tokio::test]
    async fn failing_storage_read_falls_back_to_initializers() {
        let restorer = LayoutRestorer::new(StubRegistry::new(), BrokenStorage);
        let mut shell = RecordingShell::empty();
        restorer
            .initialize_layout(&mut shell, &[&MarkerInitializer])
            .await;
        assert_eq!(shell.applied, vec![LayoutNode::Scalar(json!("initialized"))]);
    }

    #[test]
    fn unserializable_layout_clears_the_previous_good_value() {
        let storage = MemoryStorage::new();
        storage.set(LAYOUT_STORAGE_KEY, "previously good").unwrap();
        let restorer = LayoutRestorer::new(StubRegistry::new(), &storage);

        restorer.store_layout(&RecordingShell::with_layout(too_deep_layout()));
        assert_eq!(storage.get(LAYOUT_STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn reset_clears_storage_and_suppresses_the_next_store() {
        let storage = MemoryStorage::new();
        let restorer = LayoutRestorer::new(StubRegistry::new(), &storage);
        let shell = RecordingShell::empty();

        restorer.store_layout(&shell);
        assert!(storage.get(LAYOUT_STORAGE_KEY).unwrap().is_some());

        restorer.reset_layout().unwrap();
        assert_eq!(storage.get(LAYOUT_STORAGE_KEY).unwrap(), None);

        // The shutdown-triggered save right after a reset must not
        // re-persist the discarded layout.
        restorer.store_layout(&shell);
        assert_eq!(storage.get(LAYOUT_STORAGE_KEY).unwrap(), None);
    }
}
