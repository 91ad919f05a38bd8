//! Testing harness for component implementations.
//!
//! Drives a single component through its lifecycle against an isolated bus,
//! without the registry or the full core. Execution is synchronous and
//! deterministic.
//!
//! # Example
//!
//! ```
//! use hearth_component::testing::ComponentTestHarness;
//! use hearth_component::{Component, ComponentError, Context};
//!
//! struct Counter {
//!     ticks: u32,
//! }
//!
//! impl Component for Counter {
//!     fn name(&self) -> &str {
//!         "counter"
//!     }
//!
//!     fn init(&mut self, ctx: &Context) -> Result<(), ComponentError> {
//!         ctx.publish_sticky("counter/ticks", 0);
//!         Ok(())
//!     }
//!
//!     fn tick(&mut self, ctx: &Context) {
//!         self.ticks += 1;
//!         ctx.publish_sticky("counter/ticks", self.ticks);
//!     }
//!
//!     fn shutdown(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut harness = ComponentTestHarness::new(Counter { ticks: 0 });
//! harness.init().unwrap();
//! harness.tick();
//! harness.poll();
//! assert_eq!(harness.bus().sticky_value("counter/ticks"), Some(1.into()));
//! ```

use hearth_event::EventBus;
use hearth_types::OwnerToken;

use crate::{Component, ComponentError, ComponentHandle, Context, PeerLookup};

/// A [`PeerLookup`] with no peers; every lookup misses.
pub struct NoPeers;

impl PeerLookup for NoPeers {
    fn peer(&self, _name: &str) -> Option<ComponentHandle> {
        None
    }
}

/// Harness owning one component and an isolated bus.
pub struct ComponentTestHarness<C: Component> {
    component: C,
    bus: EventBus,
    owner: OwnerToken,
}

impl<C: Component> ComponentTestHarness<C> {
    /// Wraps a component with a fresh bus and owner token.
    #[must_use]
    pub fn new(component: C) -> Self {
        let bus = EventBus::new();
        let owner = bus.issue_owner();
        Self {
            component,
            bus,
            owner,
        }
    }

    /// Runs the component's first startup phase.
    pub fn init(&mut self) -> Result<(), ComponentError> {
        let ctx = Context::new(self.bus.clone(), self.owner, &NoPeers);
        self.component.init(&ctx)
    }

    /// Runs the component's second startup phase.
    pub fn on_all_ready(&mut self) {
        let ctx = Context::new(self.bus.clone(), self.owner, &NoPeers);
        self.component.on_all_ready(&ctx);
    }

    /// Runs one tick.
    pub fn tick(&mut self) {
        let ctx = Context::new(self.bus.clone(), self.owner, &NoPeers);
        self.component.tick(&ctx);
    }

    /// Runs the component's shutdown and strips its subscriptions.
    pub fn shutdown(&mut self) -> Result<(), ComponentError> {
        let ctx = Context::new(self.bus.clone(), self.owner, &NoPeers);
        let result = self.component.shutdown(&ctx);
        self.bus.unsubscribe_owner(self.owner);
        result
    }

    /// Drains the bus queue, dispatching to the component's handlers.
    pub fn poll(&self) -> usize {
        self.bus.poll()
    }

    /// The harness bus, for publishing test stimuli or inspecting state.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// The component's owner token.
    #[must_use]
    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    /// Shared access to the component under test.
    #[must_use]
    pub fn component(&self) -> &C {
        &self.component
    }

    /// Exclusive access to the component under test.
    pub fn component_mut(&mut self) -> &mut C {
        &mut self.component
    }
}
