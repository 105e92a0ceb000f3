#![forbid(unsafe_code)]

//! Layout persistence for Dockhand shells.
//!
//! Three layers:
//!
//! - [`schema`]: the versioned, kind-tagged stored form of a layout tree.
//! - [`codec`]: [`LayoutCodec`] turns a live [`dockhand_core::LayoutNode`]
//!   into one string (*deflate*) and asynchronously back (*inflate*),
//!   replaying component construction through a registry while preserving
//!   collection order across out-of-order completions.
//! - [`restorer`]: [`LayoutRestorer`] wires the codec to a
//!   [`StorageBackend`] and a shell — capture on shutdown, restore on
//!   startup, reset on demand.
//!
//! Failure policy throughout: one broken component never takes the rest
//! of the layout down, and a failed save never leaves a corrupt value
//! behind — the persisted key is cleared instead.

pub mod codec;
pub mod restorer;
pub mod schema;
pub mod storage;

pub use codec::LayoutCodec;
pub use restorer::{
    LAYOUT_STORAGE_KEY, LayoutInitializer, LayoutRestorer, RESET_LAYOUT_COMMAND, ShellLayout,
};
pub use schema::{
    ComponentRecord, LAYOUT_SCHEMA_VERSION, MAX_LAYOUT_DEPTH, StoredLayout, StoredNode,
};
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
