#![forbid(unsafe_code)]

//! Core contracts for Dockhand: dockable components, component registries,
//! and the layout tree that describes a shell.
//!
//! This crate holds only contracts and data — no panel mechanics (see
//! `dockhand-panel`) and no persistence (see `dockhand-persist`). The
//! pieces:
//!
//! - [`DockComponent`] / [`StatefulComponent`]: what a unit of dockable
//!   content must (and may optionally) provide.
//! - [`ComponentHandle`]: shared, pointer-identity reference to a live
//!   component. All access is single-threaded.
//! - [`ComponentRegistry`] / [`ConstructionDescriptor`]: the asynchronous
//!   factory service that can describe a live component and replay that
//!   description into a fresh instance.
//! - [`LayoutNode`] / [`ComponentSlots`]: the layout tree. Component
//!   collections are an explicit tree variant, so nothing downstream ever
//!   has to guess which fields hold live references.
//! - [`error`]: the failure taxonomy shared by panels and persistence.

pub mod component;
pub mod error;
pub mod layout;
pub mod registry;
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use component::{ComponentHandle, DockComponent, StatefulComponent};
pub use error::{ReconstructionError, SerializationError, StorageError, StorageResult};
pub use layout::{ComponentSlots, LayoutNode};
pub use registry::{ComponentRegistry, ConstructionDescriptor, ReconstructionFuture};
