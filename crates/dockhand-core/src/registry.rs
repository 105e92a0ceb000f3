//! Component registry contract.
//!
//! The registry is the factory service behind layout persistence: it can
//! describe a live component as a replayable descriptor, and replay such a
//! descriptor into a fresh (or cached) instance. It is always an explicit,
//! constructor-injected dependency of whatever consumes it — never an
//! ambient lookup — so the layout machinery stays testable without a live
//! component framework.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::ComponentHandle;
use crate::error::ReconstructionError;

/// The minimal, replayable identity of a component: which factory produced
/// it, with what options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructionDescriptor {
    /// Identifier of the producing factory.
    pub factory_id: String,
    /// Factory options, opaque to the layout machinery.
    #[serde(default)]
    pub options: Value,
}

impl ConstructionDescriptor {
    /// Build a descriptor.
    pub fn new(factory_id: impl Into<String>, options: Value) -> Self {
        Self {
            factory_id: factory_id.into(),
            options,
        }
    }
}

/// Future returned by [`ComponentRegistry::reconstruct`].
///
/// Boxed and non-`Send`: reconstruction runs on the single cooperative
/// scheduler alongside everything else.
pub type ReconstructionFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ComponentHandle, ReconstructionError>> + 'a>>;

/// Asynchronous, fallible component factory service.
pub trait ComponentRegistry {
    /// The descriptor that produced `component`, or `None` when the
    /// component is not registry-managed and therefore cannot be
    /// persisted.
    fn describe(&self, component: &ComponentHandle) -> Option<ConstructionDescriptor>;

    /// Get or asynchronously create the component for `descriptor`.
    fn reconstruct(&self, descriptor: ConstructionDescriptor) -> ReconstructionFuture<'_>;
}

impl<T: ComponentRegistry + ?Sized> ComponentRegistry for &T {
    fn describe(&self, component: &ComponentHandle) -> Option<ConstructionDescriptor> {
        (**self).describe(component)
    }

    fn reconstruct(&self, descriptor: ConstructionDescriptor) -> ReconstructionFuture<'_> {
        (**self).reconstruct(descriptor)
    }
}

impl<T: ComponentRegistry + ?Sized> ComponentRegistry for Rc<T> {
    fn describe(&self, component: &ComponentHandle) -> Option<ConstructionDescriptor> {
        (**self).describe(component)
    }

    fn reconstruct(&self, descriptor: ConstructionDescriptor) -> ReconstructionFuture<'_> {
        (**self).reconstruct(descriptor)
    }
}
