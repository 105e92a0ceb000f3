#![forbid(unsafe_code)]

//! Rank-ordered side panels for Dockhand.
//!
//! A side panel docks components along one edge of the shell (left,
//! right, or bottom). Each panel is driven by a [`SidePanelHandler`]
//! owning three synchronized structures:
//!
//! - a rank-sorted item list (the source of ordering),
//! - a [`TabStrip`] whose current selection is the *only* record of which
//!   component is expanded,
//! - a [`ContentStack`] showing at most that one expanded component.
//!
//! The handler is the sole mutator of all three; every mutation ends with
//! an atomic visibility derivation so the strip, stack, and container
//! chrome can never disagree about what should be on screen.

pub mod area_attributes;
pub mod content_stack;
pub mod side_panel;
pub mod tab_strip;

pub use area_attributes::AreaAttributes;
pub use content_stack::{ContentStack, PanelContainerHandle};
pub use side_panel::{DEFAULT_RANK, Side, SidePanelHandler, SidePanelLayout};
pub use tab_strip::{CurrentChange, Orientation, TabEntry, TabStrip};
