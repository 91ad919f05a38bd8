//! Runtime layer for hearth.
//!
//! Composes the component registry and the event bus into one entry point
//! for firmware main loops:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                           Core                              │
//! │  begin(config) ─► resolve ─► init_all ─► after_ready_all    │
//! │  tick()        ─► tick_all ─► bus.poll()                    │
//! │  shutdown()    ─► shutdown/start ─► shutdown_all (reverse)  │
//! └────────────────────────────┬────────────────────────────────┘
//!                              │ owns
//!              ┌───────────────┴───────────────┐
//!              ▼                               ▼
//!     ┌─────────────────┐             ┌─────────────────┐
//!     │ComponentRegistry│────────────►│    EventBus     │
//!     │  (lifecycle)    │  publishes  │   (delivery)    │
//!     └─────────────────┘  lifecycle  └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use hearth_component::{Component, ComponentError, Context, Dependency};
//! use hearth_runtime::{Core, CoreConfig};
//!
//! struct Blink;
//!
//! impl Component for Blink {
//!     fn name(&self) -> &str {
//!         "blink"
//!     }
//!
//!     fn init(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
//!         Ok(())
//!     }
//!
//!     fn tick(&mut self, ctx: &Context) {
//!         ctx.publish("led/toggle", serde_json::Value::Null);
//!     }
//!
//!     fn shutdown(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut core = Core::new();
//! core.add_component(Blink)?;
//! core.begin(CoreConfig::default())?;
//! core.tick();
//! core.shutdown();
//! # Ok::<(), hearth_runtime::RuntimeError>(())
//! ```
//!
//! # Related crates
//!
//! - [`hearth_component`] — the capability interface components implement
//! - [`hearth_event`] — the bus underneath the registry
//! - [`hearth_types`] — ids and the [`ErrorCode`](hearth_types::ErrorCode) trait

mod core;
mod error;
mod registry;

pub use crate::core::{Core, CoreConfig};
pub use error::RuntimeError;
pub use registry::{ComponentRegistry, LifecycleListener};

// Re-export the SDK-layer types callers need alongside the runtime.
pub use hearth_component::{
    Component, ComponentError, ComponentHandle, Context, Dependency, LifecycleStatus,
};
pub use hearth_event::{topics, Event, EventBus, SubscribeOptions};
pub use hearth_types::{ErrorCode, OwnerToken, SubscriptionId};
