//! Stub components, registries, and scriptable futures for tests.
//!
//! Everything here is deterministic and free of real UI machinery, so
//! panel and persistence behavior can be exercised without a component
//! framework. Downstream crates opt in through the `test-helpers`
//! feature.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use serde_json::Value;

use crate::component::{ComponentHandle, DockComponent, StatefulComponent};
use crate::error::ReconstructionError;
use crate::registry::{ComponentRegistry, ConstructionDescriptor, ReconstructionFuture};

/// Shared window into a [`StubComponent`]'s recorded lifecycle calls.
///
/// Handles erase the concrete component type, so tests that need to
/// observe calls hand the component a probe up front and read it back
/// afterwards.
#[derive(Clone, Debug, Default)]
pub struct StubProbe {
    inner: Rc<RefCell<ProbeState>>,
}

#[derive(Debug, Default)]
struct ProbeState {
    activations: u32,
    closes: u32,
    restored: Vec<Value>,
}

impl StubProbe {
    /// A fresh probe.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// How many times the component was activated.
    #[must_use]
    pub fn activations(&self) -> u32 {
        self.inner.borrow().activations
    }

    /// How many times the component was asked to close.
    #[must_use]
    pub fn closes(&self) -> u32 {
        self.inner.borrow().closes
    }

    /// Every payload passed to `restore_state`, in order.
    #[must_use]
    pub fn restored(&self) -> Vec<Value> {
        self.inner.borrow().restored.clone()
    }
}

/// Scriptable component that records lifecycle calls.
#[derive(Debug)]
pub struct StubComponent {
    id: String,
    title: String,
    hidden: bool,
    stateful: bool,
    state: Value,
    probe: StubProbe,
}

impl StubComponent {
    /// A visible, stateless component whose title equals its id.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            hidden: false,
            stateful: false,
            state: Value::Null,
            probe: StubProbe::new(),
        }
    }

    /// Override the tab label.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Enable the stateful capability with an initial payload.
    #[must_use]
    pub fn with_state(mut self, state: Value) -> Self {
        self.stateful = true;
        self.state = state;
        self
    }

    /// Enable the stateful capability with a null payload.
    #[must_use]
    pub fn stateful(mut self) -> Self {
        self.stateful = true;
        self
    }

    /// Record lifecycle calls into `probe` instead of a private one.
    #[must_use]
    pub fn with_probe(mut self, probe: StubProbe) -> Self {
        self.probe = probe;
        self
    }
}

impl DockComponent for StubComponent {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn set_hidden(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    fn activate(&mut self) {
        self.probe.inner.borrow_mut().activations += 1;
    }

    fn close(&mut self) {
        self.probe.inner.borrow_mut().closes += 1;
    }

    fn as_stateful(&mut self) -> Option<&mut dyn StatefulComponent> {
        if self.stateful { Some(self) } else { None }
    }
}

impl StatefulComponent for StubComponent {
    fn store_state(&self) -> Value {
        self.state.clone()
    }

    fn restore_state(&mut self, state: Value) {
        self.probe.inner.borrow_mut().restored.push(state.clone());
        self.state = state;
    }
}

type Factory = Box<dyn Fn(Value) -> Result<ComponentHandle, ReconstructionError>>;

/// Programmable in-memory registry.
///
/// Factories run synchronously when a reconstruction is issued; the
/// returned future completes after a configurable number of polls so
/// tests can script completion order across concurrent reconstructions.
#[derive(Default)]
pub struct StubRegistry {
    factories: RefCell<BTreeMap<String, Factory>>,
    delays: RefCell<BTreeMap<String, u32>>,
    adopted: RefCell<Vec<(ComponentHandle, ConstructionDescriptor)>>,
}

impl StubRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory. Components it produces are adopted
    /// automatically, so a later capture can describe them again.
    pub fn register(
        &self,
        factory_id: impl Into<String>,
        factory: impl Fn(Value) -> Result<ComponentHandle, ReconstructionError> + 'static,
    ) {
        self.factories
            .borrow_mut()
            .insert(factory_id.into(), Box::new(factory));
    }

    /// Register a factory producing stateless [`StubComponent`]s named by
    /// the `"id"` option (falling back to the factory id).
    pub fn register_stub(&self, factory_id: impl Into<String>) {
        let factory_id = factory_id.into();
        let name = factory_id.clone();
        self.register(factory_id, move |options| {
            let id = options
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or(&name)
                .to_owned();
            Ok(ComponentHandle::new(StubComponent::new(id)))
        });
    }

    /// Register a factory that always fails with `message`.
    pub fn register_failing(&self, factory_id: impl Into<String>, message: impl Into<String>) {
        let factory_id = factory_id.into();
        let id = factory_id.clone();
        let message = message.into();
        self.register(factory_id, move |_| {
            Err(ReconstructionError::Factory {
                factory_id: id.clone(),
                message: message.clone(),
            })
        });
    }

    /// Keep `factory_id`'s futures pending for `polls` polls before they
    /// complete.
    pub fn delay(&self, factory_id: impl Into<String>, polls: u32) {
        self.delays.borrow_mut().insert(factory_id.into(), polls);
    }

    /// Associate an existing component with the descriptor `describe`
    /// should report for it.
    pub fn adopt(&self, handle: &ComponentHandle, descriptor: ConstructionDescriptor) {
        self.adopted
            .borrow_mut()
            .push((handle.clone(), descriptor));
    }

    /// How many components the registry currently knows about.
    #[must_use]
    pub fn adopted_count(&self) -> usize {
        self.adopted.borrow().len()
    }
}

impl ComponentRegistry for StubRegistry {
    fn describe(&self, component: &ComponentHandle) -> Option<ConstructionDescriptor> {
        self.adopted
            .borrow()
            .iter()
            .find(|(handle, _)| handle.ptr_eq(component))
            .map(|(_, descriptor)| descriptor.clone())
    }

    fn reconstruct(&self, descriptor: ConstructionDescriptor) -> ReconstructionFuture<'_> {
        let polls = self
            .delays
            .borrow()
            .get(&descriptor.factory_id)
            .copied()
            .unwrap_or(0);
        let result = match self.factories.borrow().get(&descriptor.factory_id) {
            Some(factory) => factory(descriptor.options.clone()),
            None => Err(ReconstructionError::MissingFactory {
                factory_id: descriptor.factory_id.clone(),
            }),
        };
        if let Ok(handle) = &result {
            self.adopt(handle, descriptor);
        }
        Box::pin(CountdownFuture::new(polls, result))
    }
}

/// Future that stays pending for a fixed number of polls before yielding
/// its value.
///
/// Under a join-all, futures with smaller countdowns complete earlier, so
/// tests can force any settlement order they need.
#[derive(Debug)]
pub struct CountdownFuture<T> {
    remaining: u32,
    value: Option<T>,
}

impl<T> CountdownFuture<T> {
    /// A future yielding `value` after `remaining` additional polls.
    pub fn new(remaining: u32, value: T) -> Self {
        Self {
            remaining,
            value: Some(value),
        }
    }
}

impl<T: Unpin> Future for CountdownFuture<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();
        if this.remaining == 0 {
            Poll::Ready(this.value.take().expect("countdown future polled after completion"))
        } else {
            this.remaining -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
