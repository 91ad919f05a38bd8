//! Component capability interface for hearth.
//!
//! A component is one independent unit of firmware logic: a sensor driver,
//! a network client, a telemetry forwarder. Components never hold direct
//! references to each other; they declare dependencies by name, implement
//! the small lifecycle contract below, and communicate over the event bus.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                   Core (hearth-runtime)                   │
//! │   - dependency resolution (topological order)             │
//! │   - two-phase startup, tick loop, reverse shutdown        │
//! │   - owns the EventBus                                     │
//! └───────────────────────────────────────────────────────────┘
//!                │ drives, passing a Context per call
//!    ┌───────────┼───────────────┐
//!    ▼           ▼               ▼
//! ┌────────┐ ┌────────┐    ┌───────────┐
//! │ Sensor │ │  WiFi  │    │ Telemetry │   impl Component
//! └────────┘ └────────┘    └───────────┘
//! ```
//!
//! # Lifecycle
//!
//! | Method | Phase | Contract |
//! |--------|-------|----------|
//! | [`Component::init`] | startup, dependency order | dependencies already ready |
//! | [`Component::on_all_ready`] | after every init succeeded | sibling lookup is safe |
//! | [`Component::tick`] | every loop iteration | must not block |
//! | [`Component::shutdown`] | teardown, reverse order | dependents already gone |
//!
//! # Example
//!
//! ```
//! use hearth_component::{Component, ComponentError, Context, Dependency};
//!
//! struct Heater {
//!     deps: Vec<Dependency>,
//! }
//!
//! impl Heater {
//!     fn new() -> Self {
//!         Self {
//!             deps: vec![Dependency::required("thermostat")],
//!         }
//!     }
//! }
//!
//! impl Component for Heater {
//!     fn name(&self) -> &str {
//!         "heater"
//!     }
//!
//!     fn dependencies(&self) -> &[Dependency] {
//!         &self.deps
//!     }
//!
//!     fn init(&mut self, ctx: &Context) -> Result<(), ComponentError> {
//!         ctx.subscribe("thermostat/setpoint", |_ev| {
//!             // react to setpoint changes
//!         });
//!         Ok(())
//!     }
//!
//!     fn tick(&mut self, _ctx: &Context) {}
//!
//!     fn shutdown(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
//!         Ok(())
//!     }
//! }
//! ```

mod component;
mod context;
mod dependency;
mod error;
mod handle;
mod status;
pub mod testing;

pub use component::Component;
pub use context::Context;
pub use dependency::Dependency;
pub use error::ComponentError;
pub use handle::{ComponentHandle, PeerLookup};
pub use status::LifecycleStatus;

// Re-export the event types components interact with.
pub use hearth_event::{Event, EventBus, SubscribeOptions};
pub use hearth_types::{OwnerToken, SubscriptionId};
