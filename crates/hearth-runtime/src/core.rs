//! Core facade: one registry, one bus, one run loop.

use hearth_component::{Component, ComponentHandle};
use hearth_event::{topics, Event, EventBus, DEFAULT_QUEUE_CAPACITY};
use hearth_types::SubscriptionId;
use serde_json::Value;
use tracing::{info, warn};

use crate::{ComponentRegistry, RuntimeError};

/// Core configuration.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Device name, for logging and telemetry payloads.
    pub device_name: String,
    /// Stable device identifier; empty when the platform provides none.
    pub device_id: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            device_name: "hearth".to_string(),
            device_id: String::new(),
        }
    }
}

/// Central runtime composing the registry and the bus.
///
/// `Core` drives the two-phase startup protocol, the cooperative tick loop
/// and teardown, publishing its own lifecycle transitions onto the bus so
/// external listeners can react without polling internal state:
///
/// | Transition | Topic |
/// |------------|-------|
/// | each component started | `component/ready` |
/// | a component failed startup | `component/error` |
/// | both startup phases done | `system/ready` |
/// | teardown about to begin | `shutdown/start` |
///
/// # Example
///
/// ```no_run
/// use hearth_runtime::{Core, CoreConfig};
///
/// let mut core = Core::new();
/// // core.add_component(...)?;
/// core.begin(CoreConfig::default())?;
/// loop {
///     core.tick();
/// #   break;
/// }
/// # core.shutdown();
/// # Ok::<(), hearth_runtime::RuntimeError>(())
/// ```
pub struct Core {
    config: CoreConfig,
    registry: ComponentRegistry,
    started: bool,
}

impl Core {
    /// Creates a core with the default bus queue capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_queue_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a core whose bus holds up to `capacity` queued events.
    #[must_use]
    pub fn with_queue_capacity(capacity: usize) -> Self {
        Self {
            config: CoreConfig::default(),
            registry: ComponentRegistry::with_bus(EventBus::with_capacity(capacity)),
            started: false,
        }
    }

    /// Registers a component.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateName`] if the name is taken.
    pub fn add_component(&mut self, component: impl Component + 'static) -> Result<(), RuntimeError> {
        self.registry.register(component)
    }

    /// Returns a non-owning handle to the named component.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<ComponentHandle> {
        self.registry.lookup(name)
    }

    /// Removes a component at runtime. See [`ComponentRegistry::remove`].
    pub fn remove_component(&mut self, name: &str) -> bool {
        self.registry.remove(name)
    }

    /// Number of registered components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.registry.component_count()
    }

    /// The registry driving the components.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// The shared event bus.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        self.registry.bus()
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Resolves dependencies and starts every component.
    ///
    /// Runs both startup phases (`init_all`, then `after_ready_all`), then
    /// publishes [`topics::SYSTEM_READY`]. Idempotent: a second call warns
    /// and returns Ok.
    ///
    /// # Errors
    ///
    /// Resolution errors mean nothing was started;
    /// [`RuntimeError::ComponentInit`] means components earlier in the
    /// order are running and may be torn down with [`shutdown`](Self::shutdown).
    pub fn begin(&mut self, config: CoreConfig) -> Result<(), RuntimeError> {
        if self.started {
            warn!("core already started");
            return Ok(());
        }
        self.config = config;
        info!(device = %self.config.device_name, "starting components");

        self.registry.init_all()?;
        self.registry.after_ready_all();
        self.bus().publish(topics::SYSTEM_READY, Value::Null);
        self.started = true;
        info!(components = self.registry.component_count(), "system ready");
        Ok(())
    }

    /// One iteration of the run loop: tick every live component, then
    /// drain the bus. Ticking first makes tick-driven publishes visible to
    /// subscribers within the same iteration.
    pub fn tick(&mut self) {
        if !self.started {
            return;
        }
        self.registry.tick_all();
        self.registry.bus().poll();
    }

    /// Publishes [`topics::SHUTDOWN_START`] and delivers it while every
    /// component is still alive, then tears components down in reverse
    /// startup order. Also tears down the started subset after a partial
    /// startup failure. Runs automatically on drop if still needed.
    pub fn shutdown(&mut self) {
        if !self.started && !self.registry.has_live_components() {
            return;
        }
        info!("shutdown starting");
        let bus = self.registry.bus().clone();
        bus.publish(topics::SHUTDOWN_START, Value::Null);
        bus.poll();
        self.registry.shutdown_all();
        self.started = false;
    }

    /// Subscribes to a topic pattern on the shared bus.
    pub fn subscribe(
        &self,
        pattern: &str,
        handler: impl Fn(&Event) + 'static,
    ) -> SubscriptionId {
        self.bus().subscribe(pattern, handler)
    }

    /// Publishes an event on the shared bus.
    pub fn publish(&self, topic: impl Into<String>, payload: impl Into<Value>) {
        self.bus().publish(topic, payload);
    }

    /// Publishes a sticky event on the shared bus.
    pub fn publish_sticky(&self, topic: impl Into<String>, payload: impl Into<Value>) {
        self.bus().publish_sticky(topic, payload);
    }
}

impl Default for Core {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Core {
    fn drop(&mut self) {
        self.shutdown();
    }
}
