//! The capability interface every unit of logic implements.

use crate::{ComponentError, Context, Dependency};

/// A unit of firmware logic managed by the registry.
///
/// Components declare what they need by name, never by reference; the
/// registry resolves a startup order from those declarations and drives
/// the methods below. All communication with other components goes through
/// the bus exposed on the [`Context`] passed to every call.
///
/// # Two-phase startup
///
/// [`init`](Self::init) runs in dependency order: a component's required
/// dependencies have always completed `init` before it runs, but components
/// later in the order (or registered later) may not exist yet. Sibling
/// lookup is therefore only guaranteed to succeed in
/// [`on_all_ready`](Self::on_all_ready), which runs after every component
/// finished the first phase.
///
/// # Cooperative contract
///
/// `tick` runs once per loop iteration and must not block; anything
/// long-running is spread across ticks. Event handlers registered through
/// the context run inline during the core's poll pass.
pub trait Component {
    /// Unique name, used as the registry key.
    fn name(&self) -> &str;

    /// Declared dependencies. Returned as a slice so the runtime can walk
    /// it without allocating; implementors keep the list in a field.
    fn dependencies(&self) -> &[Dependency] {
        &[]
    }

    /// First-phase startup, invoked once in dependency order.
    ///
    /// # Errors
    ///
    /// Returning an error marks the component failed and aborts the
    /// remaining startup sequence; components already started keep running.
    fn init(&mut self, ctx: &Context) -> Result<(), ComponentError>;

    /// Second-phase startup hook, invoked after every component completed
    /// [`init`](Self::init). Safe place for sibling lookup.
    fn on_all_ready(&mut self, _ctx: &Context) {}

    /// Per-tick method, invoked every loop iteration while the component
    /// is ready. Must not block.
    fn tick(&mut self, ctx: &Context);

    /// Teardown, invoked in reverse dependency order: everything that
    /// depends on this component has already been shut down.
    ///
    /// # Errors
    ///
    /// A shutdown error is logged by the registry; teardown continues.
    fn shutdown(&mut self, ctx: &Context) -> Result<(), ComponentError>;
}
