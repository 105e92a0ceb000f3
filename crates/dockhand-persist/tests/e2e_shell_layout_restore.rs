//! End-to-end: capture a two-panel shell layout, simulate a restart, and
//! restore it into fresh panels.
//!
//! Exercises the full chain — side panel fragments embedded in a shell
//! tree, descriptor substitution on capture, asynchronous reconstruction
//! on restore, inner-state round-tripping, and panel reassembly.

use dockhand_core::testing::{StubComponent, StubRegistry};
use dockhand_core::{ComponentHandle, ConstructionDescriptor, LayoutNode};
use dockhand_panel::{DEFAULT_RANK, Side, SidePanelHandler, SidePanelLayout};
use dockhand_persist::{
    LAYOUT_STORAGE_KEY, LayoutRestorer, MemoryStorage, ShellLayout, StorageBackend,
};
use serde_json::{Value, json};

/// Minimal shell: one left panel, one bottom panel, one plain setting.
struct PanelShell {
    left: SidePanelHandler,
    bottom: SidePanelHandler,
}

impl PanelShell {
    fn new() -> Self {
        Self {
            left: SidePanelHandler::new(Side::Left),
            bottom: SidePanelHandler::new(Side::Bottom),
        }
    }
}

impl ShellLayout for PanelShell {
    fn layout_data(&self) -> LayoutNode {
        LayoutNode::object([
            ("left_panel", self.left.layout_data().to_layout_node()),
            ("bottom_panel", self.bottom.layout_data().to_layout_node()),
            ("zoom", LayoutNode::Scalar(json!(1.25))),
        ])
    }

    fn apply_layout_data(&mut self, layout: LayoutNode) {
        if let Some(fragment) = layout
            .get("left_panel")
            .and_then(SidePanelLayout::from_layout_node)
        {
            self.left.apply_layout_data(&fragment);
        }
        if let Some(fragment) = layout
            .get("bottom_panel")
            .and_then(SidePanelLayout::from_layout_node)
        {
            self.bottom.apply_layout_data(&fragment);
        }
    }
}

fn registry_with_factories() -> StubRegistry {
    let registry = StubRegistry::new();
    registry.register("view", |options| {
        let id = options
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("view")
            .to_owned();
        Ok(ComponentHandle::new(StubComponent::new(id)))
    });
    registry.register("terminal", |options| {
        let id = options
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("terminal")
            .to_owned();
        Ok(ComponentHandle::new(StubComponent::new(id).stateful()))
    });
    registry
}

fn adopt_view(registry: &StubRegistry, id: &str) -> ComponentHandle {
    let handle = ComponentHandle::new(StubComponent::new(id));
    registry.adopt(&handle, ConstructionDescriptor::new("view", json!({"id": id})));
    handle
}

#[tokio::test]
async fn shell_layout_survives_a_restart() {
    let registry = registry_with_factories();
    let storage = MemoryStorage::new();

    // First session: populate the panels.
    let mut shell = PanelShell::new();
    shell.left.add_component(adopt_view(&registry, "files"), 10);
    shell.left.add_component(adopt_view(&registry, "search"), 20);
    shell.left.expand("search");

    let term = ComponentHandle::new(
        StubComponent::new("term-1").with_state(json!({"scrollback": 250})),
    );
    registry.adopt(
        &term,
        ConstructionDescriptor::new("terminal", json!({"id": "term-1"})),
    );
    shell.bottom.add_component(term, DEFAULT_RANK);
    shell.bottom.expand("term-1");

    let restorer = LayoutRestorer::new(&registry, &storage);
    restorer.store_layout(&shell);
    assert!(storage.get(LAYOUT_STORAGE_KEY).unwrap().is_some());

    // Second session: fresh shell, same registry and storage.
    let mut restarted = PanelShell::new();
    restorer.initialize_layout(&mut restarted, &[]).await;

    let left_order: Vec<String> = restarted
        .left
        .components()
        .iter()
        .map(ComponentHandle::id)
        .collect();
    assert_eq!(left_order, ["files", "search"]);
    assert_eq!(
        restarted.left.expanded().map(|h| h.id()),
        Some("search".to_owned())
    );

    let bottom = &restarted.bottom;
    assert_eq!(bottom.components().len(), 1);
    let restored_term = bottom.expanded().expect("terminal should be re-expanded");
    assert_eq!(restored_term.id(), "term-1");
    assert_eq!(
        restored_term.store_state(),
        Some(json!({"scrollback": 250}))
    );
    assert!(!restored_term.is_hidden());
}

#[tokio::test]
async fn component_lost_between_sessions_degrades_gracefully() {
    let registry = registry_with_factories();
    let storage = MemoryStorage::new();

    let mut shell = PanelShell::new();
    shell.left.add_component(adopt_view(&registry, "files"), 10);

    // This component's factory will not exist in the next session.
    let orphan = ComponentHandle::new(StubComponent::new("legacy"));
    registry.adopt(
        &orphan,
        ConstructionDescriptor::new("uninstalled-plugin", json!({"id": "legacy"})),
    );
    shell.left.add_component(orphan, 20);
    shell.left.add_component(adopt_view(&registry, "outline"), 30);
    shell.left.expand("files");

    let restorer = LayoutRestorer::new(&registry, &storage);
    restorer.store_layout(&shell);

    let mut restarted = PanelShell::new();
    restorer.initialize_layout(&mut restarted, &[]).await;

    // The unreachable component is simply gone; the survivors keep their
    // relative order and the expansion still applies.
    let left_order: Vec<String> = restarted
        .left
        .components()
        .iter()
        .map(ComponentHandle::id)
        .collect();
    assert_eq!(left_order, ["files", "outline"]);
    assert_eq!(
        restarted.left.expanded().map(|h| h.id()),
        Some("files".to_owned())
    );
}

#[tokio::test]
async fn unknown_component_is_absent_from_the_persisted_string() {
    let registry = registry_with_factories();
    let storage = MemoryStorage::new();

    let mut shell = PanelShell::new();
    shell.left.add_component(adopt_view(&registry, "files"), 10);
    shell
        .left
        .add_component(ComponentHandle::new(StubComponent::new("unmanaged")), 20);

    let restorer = LayoutRestorer::new(&registry, &storage);
    restorer.store_layout(&shell);

    let serialized = storage.get(LAYOUT_STORAGE_KEY).unwrap().unwrap();
    assert!(serialized.contains("files"));
    assert!(!serialized.contains("unmanaged"));
}
