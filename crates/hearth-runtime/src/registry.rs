//! Component registry: ownership, dependency resolution, lifecycle drivers.
//!
//! The registry exclusively owns every registered component for its
//! registered lifetime and drives all status transitions:
//!
//! ```text
//! register ──► resolve ──► init_all ──► after_ready_all ──► tick_all* ──► shutdown_all
//!                │              │                                              │
//!                │              └ component/ready per component                └ reverse order,
//!                └ Kahn's algorithm over declared edges                          owner purge
//! ```
//!
//! Resolution builds a directed graph from each component's declared
//! dependency list and produces a total order in which every required
//! predecessor precedes its dependent. Optional dependencies bias the order
//! when the named component exists and are ignored otherwise; only required
//! edges can fail resolution (cycle, or dependency never registered).

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use hearth_component::{
    Component, ComponentHandle, Context, Dependency, LifecycleStatus, PeerLookup,
};
use hearth_event::{topics, EventBus};
use hearth_types::OwnerToken;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::RuntimeError;

/// Observer of registry membership changes.
///
/// Added with [`ComponentRegistry::add_listener`]; useful for dashboards
/// and diagnostics that track the component set without polling.
pub trait LifecycleListener {
    /// A component was registered under `name`.
    fn on_component_added(&self, _name: &str) {}

    /// The component registered under `name` was removed.
    fn on_component_removed(&self, _name: &str) {}
}

struct Record {
    name: String,
    component: Rc<RefCell<dyn Component>>,
    status: LifecycleStatus,
    /// Dependency list snapshotted at registration.
    dependencies: Vec<Dependency>,
    owner: OwnerToken,
}

/// Owns all registered components and drives their lifecycle.
pub struct ComponentRegistry {
    /// Records in registration order; resolution ties break on this.
    records: Vec<Record>,
    /// Name → index into `records`.
    index: HashMap<String, usize>,
    /// Resolved startup order, set by `init_all`.
    order: Vec<String>,
    initialized: bool,
    bus: EventBus,
    listeners: Vec<Rc<dyn LifecycleListener>>,
}

impl ComponentRegistry {
    /// Creates a registry with a default-capacity bus.
    #[must_use]
    pub fn new() -> Self {
        Self::with_bus(EventBus::new())
    }

    /// Creates a registry around an existing bus.
    #[must_use]
    pub fn with_bus(bus: EventBus) -> Self {
        Self {
            records: Vec::new(),
            index: HashMap::new(),
            order: Vec::new(),
            initialized: false,
            bus,
            listeners: Vec::new(),
        }
    }

    /// The bus shared by every component in this registry.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Registers a component under its unique name.
    ///
    /// The component's dependency list is snapshotted here and an owner
    /// token is issued for its bus subscriptions.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::DuplicateName`] if the name is taken; the registry
    /// is left unchanged.
    pub fn register(&mut self, component: impl Component + 'static) -> Result<(), RuntimeError> {
        let name = component.name().to_string();
        if self.index.contains_key(&name) {
            error!(component = %name, "component already registered");
            return Err(RuntimeError::DuplicateName(name));
        }

        let dependencies = component.dependencies().to_vec();
        let owner = self.bus.issue_owner();
        self.index.insert(name.clone(), self.records.len());
        self.records.push(Record {
            name: name.clone(),
            component: Rc::new(RefCell::new(component)),
            status: LifecycleStatus::Registered,
            dependencies,
            owner,
        });

        info!(component = %name, "registered component");
        for listener in &self.listeners {
            listener.on_component_added(&name);
        }
        Ok(())
    }

    /// Returns a non-owning handle to the named component.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ComponentHandle> {
        self.peer(name)
    }

    /// Returns the named component's lifecycle status.
    #[must_use]
    pub fn status_of(&self, name: &str) -> Option<LifecycleStatus> {
        self.index.get(name).map(|&idx| self.records[idx].status)
    }

    /// Number of registered components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.records.len()
    }

    /// Whether `init_all` has completed successfully.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Whether any component is currently ready.
    #[must_use]
    pub fn has_live_components(&self) -> bool {
        self.records.iter().any(|r| r.status.is_live())
    }

    /// Registers a lifecycle listener.
    pub fn add_listener(&mut self, listener: Rc<dyn LifecycleListener>) {
        self.listeners.push(listener);
    }

    /// Removes a previously added listener.
    pub fn remove_listener(&mut self, listener: &Rc<dyn LifecycleListener>) {
        self.listeners.retain(|l| !Rc::ptr_eq(l, listener));
    }

    /// Removes a component by name at any time, independent of whether
    /// anything still depends on it (no cascading removal; this is an
    /// escape hatch for dynamic reconfiguration).
    ///
    /// A ready component is shut down first; its owner's subscriptions are
    /// purged either way. Returns `false` if the name is unknown.
    pub fn remove(&mut self, name: &str) -> bool {
        let Some(&idx) = self.index.get(name) else {
            return false;
        };
        let owner = self.records[idx].owner;

        if self.records[idx].status.is_live() {
            let component = Rc::clone(&self.records[idx].component);
            info!(component = %name, "shutting down component before removal");
            let result = {
                let ctx = Context::new(self.bus.clone(), owner, &*self);
                component.borrow_mut().shutdown(&ctx)
            };
            if let Err(err) = result {
                warn!(component = %name, error = %err, "component shutdown reported failure");
            }
        }
        self.bus.unsubscribe_owner(owner);

        for listener in &self.listeners {
            listener.on_component_removed(name);
        }

        self.index.remove(name);
        self.records.remove(idx);
        for (i, record) in self.records.iter().enumerate().skip(idx) {
            self.index.insert(record.name.clone(), i);
        }
        self.order.retain(|n| n.as_str() != name);

        info!(component = %name, "component removed");
        true
    }

    /// Computes a startup order from the declared dependency lists.
    ///
    /// Kahn's algorithm over the edges whose target is registered, seeded
    /// and tie-broken by registration order. When the elimination stalls
    /// with only optional in-edges remaining on some component, the
    /// earliest-registered such component is released, so optional cycles
    /// never fail. No partial order is ever returned.
    ///
    /// # Errors
    ///
    /// [`RuntimeError::MissingDependency`] for a required dependency on an
    /// unregistered name; [`RuntimeError::CycleDetected`] when required
    /// edges form a cycle.
    pub fn resolve(&self) -> Result<Vec<String>, RuntimeError> {
        let count = self.records.len();
        let mut required_in = vec![0usize; count];
        let mut optional_in = vec![0usize; count];
        // dependency index → [(dependent index, required)]
        let mut dependents: Vec<Vec<(usize, bool)>> = vec![Vec::new(); count];

        for (idx, record) in self.records.iter().enumerate() {
            for dep in &record.dependencies {
                match self.index.get(&dep.name) {
                    Some(&dep_idx) => {
                        dependents[dep_idx].push((idx, dep.required));
                        if dep.required {
                            required_in[idx] += 1;
                        } else {
                            optional_in[idx] += 1;
                        }
                    }
                    None if dep.required => {
                        error!(
                            component = %record.name,
                            dependency = %dep.name,
                            "required dependency not registered"
                        );
                        return Err(RuntimeError::MissingDependency {
                            dependent: record.name.clone(),
                            dependency: dep.name.clone(),
                        });
                    }
                    None => {
                        debug!(
                            component = %record.name,
                            dependency = %dep.name,
                            "optional dependency not registered, ignoring"
                        );
                    }
                }
            }
        }

        let mut scheduled: Vec<bool> = (0..count)
            .map(|i| required_in[i] == 0 && optional_in[i] == 0)
            .collect();
        let mut ready: VecDeque<usize> = (0..count).filter(|&i| scheduled[i]).collect();
        let mut order = Vec::with_capacity(count);

        while order.len() < count {
            let Some(idx) = ready.pop_front() else {
                // Stalled. A component whose remaining in-edges are all
                // optional may be released; a stall where every stalled
                // component still has required in-edges is a true cycle.
                match (0..count).find(|&i| !scheduled[i] && required_in[i] == 0) {
                    Some(released) => {
                        debug!(
                            component = %self.records[released].name,
                            "breaking optional dependency cycle"
                        );
                        optional_in[released] = 0;
                        scheduled[released] = true;
                        ready.push_back(released);
                        continue;
                    }
                    None => {
                        let stalled = (0..count)
                            .filter(|&i| !scheduled[i])
                            .map(|i| self.records[i].name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ");
                        error!(components = %stalled, "dependency cycle detected");
                        return Err(RuntimeError::CycleDetected(stalled));
                    }
                }
            };

            order.push(self.records[idx].name.clone());
            for &(dependent, required) in &dependents[idx] {
                if scheduled[dependent] {
                    continue;
                }
                if required {
                    required_in[dependent] -= 1;
                } else {
                    optional_in[dependent] = optional_in[dependent].saturating_sub(1);
                }
                if required_in[dependent] == 0 && optional_in[dependent] == 0 {
                    scheduled[dependent] = true;
                    ready.push_back(dependent);
                }
            }
        }

        Ok(order)
    }

    /// Runs every component's first startup phase in resolved order.
    ///
    /// Publishes [`topics::COMPONENT_READY`] per success. On the first
    /// failure the component is marked failed, its subscriptions are
    /// purged, [`topics::COMPONENT_ERROR`] is published, and the remaining
    /// sequence is aborted. Components already started keep running.
    ///
    /// # Errors
    ///
    /// Any [`resolve`](Self::resolve) error (nothing started), or
    /// [`RuntimeError::ComponentInit`] naming the failed component.
    pub fn init_all(&mut self) -> Result<(), RuntimeError> {
        if self.initialized {
            warn!("components already initialized");
            return Ok(());
        }

        self.order = self.resolve()?;

        for i in 0..self.order.len() {
            let name = self.order[i].clone();
            let idx = self.index[&name];
            match self.records[idx].status {
                LifecycleStatus::Registered => {}
                status => {
                    debug!(component = %name, %status, "skipping init, not in a startable state");
                    continue;
                }
            }

            self.records[idx].status = LifecycleStatus::Initializing;
            info!(component = %name, "initializing component");
            let (component, owner) = {
                let record = &self.records[idx];
                (Rc::clone(&record.component), record.owner)
            };
            let result = {
                let ctx = Context::new(self.bus.clone(), owner, &*self);
                component.borrow_mut().init(&ctx)
            };

            match result {
                Ok(()) => {
                    self.records[idx].status = LifecycleStatus::Ready;
                    self.bus.publish(topics::COMPONENT_READY, name.as_str());
                    info!(component = %name, "component ready");
                }
                Err(err) => {
                    self.records[idx].status = LifecycleStatus::Failed;
                    self.bus.unsubscribe_owner(owner);
                    self.bus.publish(
                        topics::COMPONENT_ERROR,
                        json!({ "component": name, "error": err.to_string() }),
                    );
                    error!(component = %name, error = %err, "component failed to initialize");
                    return Err(RuntimeError::ComponentInit { name, source: err });
                }
            }
        }

        self.initialized = true;
        info!(count = self.order.len(), "all components initialized");
        Ok(())
    }

    /// Runs the second startup phase on every ready component, in the same
    /// resolved order. Sibling lookup is safe here: every component has
    /// completed `init` before the first hook runs.
    pub fn after_ready_all(&self) {
        for name in &self.order {
            let Some(&idx) = self.index.get(name) else {
                continue;
            };
            if !self.records[idx].status.is_live() {
                continue;
            }
            let record = &self.records[idx];
            let component = Rc::clone(&record.component);
            let ctx = Context::new(self.bus.clone(), record.owner, self);
            component.borrow_mut().on_all_ready(&ctx);
        }
    }

    /// Runs one tick of every live component, in resolved order.
    ///
    /// After a partial startup failure the started subset keeps ticking;
    /// failed and never-started components are skipped.
    pub fn tick_all(&self) {
        if self.order.is_empty() {
            return;
        }
        for name in &self.order {
            let Some(&idx) = self.index.get(name) else {
                continue;
            };
            if !self.records[idx].status.is_live() {
                continue;
            }
            let record = &self.records[idx];
            let component = Rc::clone(&record.component);
            let ctx = Context::new(self.bus.clone(), record.owner, self);
            component.borrow_mut().tick(&ctx);
        }
    }

    /// Shuts every live component down in the exact reverse of the startup
    /// order, so a component is always torn down before anything it
    /// depends on. Also tears down the started subset after a partial
    /// startup failure.
    ///
    /// Shutdown errors are logged and teardown continues; each component's
    /// owner subscriptions are purged after its shutdown runs.
    pub fn shutdown_all(&mut self) {
        if self.order.is_empty() || !self.has_live_components() {
            self.initialized = false;
            return;
        }
        let order = self.order.clone();
        for name in order.iter().rev() {
            let Some(&idx) = self.index.get(name) else {
                continue;
            };
            if !self.records[idx].status.is_live() {
                continue;
            }
            let (component, owner) = {
                let record = &self.records[idx];
                (Rc::clone(&record.component), record.owner)
            };
            info!(component = %name, "shutting down component");
            let result = {
                let ctx = Context::new(self.bus.clone(), owner, &*self);
                component.borrow_mut().shutdown(&ctx)
            };
            if let Err(err) = result {
                warn!(component = %name, error = %err, "component shutdown reported failure");
            }
            self.bus.unsubscribe_owner(owner);
            self.records[idx].status = LifecycleStatus::ShutDown;
        }
        self.initialized = false;
        info!("all components shut down");
    }
}

impl PeerLookup for ComponentRegistry {
    fn peer(&self, name: &str) -> Option<ComponentHandle> {
        self.index
            .get(name)
            .map(|&idx| ComponentHandle::new(Rc::downgrade(&self.records[idx].component)))
    }
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ComponentRegistry {
    fn drop(&mut self) {
        // Components still running are torn down in dependency-reverse
        // order before their records are destroyed.
        self.shutdown_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_component::ComponentError;
    use hearth_types::ErrorCode;

    struct Stub {
        name: &'static str,
        deps: Vec<Dependency>,
    }

    impl Stub {
        fn new(name: &'static str, deps: Vec<Dependency>) -> Self {
            Self { name, deps }
        }
    }

    impl Component for Stub {
        fn name(&self) -> &str {
            self.name
        }

        fn dependencies(&self) -> &[Dependency] {
            &self.deps
        }

        fn init(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
            Ok(())
        }

        fn tick(&mut self, _ctx: &Context) {}

        fn shutdown(&mut self, _ctx: &Context) -> Result<(), ComponentError> {
            Ok(())
        }
    }

    #[test]
    fn duplicate_registration_is_rejected_without_mutation() {
        let mut registry = ComponentRegistry::new();
        registry.register(Stub::new("a", vec![])).unwrap();

        let err = registry.register(Stub::new("a", vec![])).unwrap_err();
        assert_eq!(err.code(), "RUNTIME_DUPLICATE_NAME");
        assert_eq!(registry.component_count(), 1);
    }

    #[test]
    fn resolve_orders_dependencies_first() {
        let mut registry = ComponentRegistry::new();
        // Registered backwards on purpose.
        registry
            .register(Stub::new("c", vec![Dependency::required("b")]))
            .unwrap();
        registry
            .register(Stub::new("b", vec![Dependency::required("a")]))
            .unwrap();
        registry.register(Stub::new("a", vec![])).unwrap();

        assert_eq!(registry.resolve().unwrap(), vec!["a", "b", "c"]);
    }

    #[test]
    fn resolve_without_dependencies_keeps_registration_order() {
        let mut registry = ComponentRegistry::new();
        registry.register(Stub::new("x", vec![])).unwrap();
        registry.register(Stub::new("y", vec![])).unwrap();
        registry.register(Stub::new("z", vec![])).unwrap();

        assert_eq!(registry.resolve().unwrap(), vec!["x", "y", "z"]);
    }

    #[test]
    fn required_cycle_fails() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(Stub::new("x", vec![Dependency::required("y")]))
            .unwrap();
        registry
            .register(Stub::new("y", vec![Dependency::required("x")]))
            .unwrap();

        let err = registry.resolve().unwrap_err();
        assert_eq!(err.code(), "RUNTIME_CYCLE_DETECTED");
        assert!(err.to_string().contains('x') && err.to_string().contains('y'));
    }

    #[test]
    fn missing_required_dependency_fails() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(Stub::new("d", vec![Dependency::required("ghost")]))
            .unwrap();

        let err = registry.resolve().unwrap_err();
        assert_eq!(err.code(), "RUNTIME_MISSING_DEPENDENCY");
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn missing_optional_dependency_is_ignored() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(Stub::new("d", vec![Dependency::optional("ghost")]))
            .unwrap();

        assert_eq!(registry.resolve().unwrap(), vec!["d"]);
    }

    #[test]
    fn optional_edge_biases_order() {
        let mut registry = ComponentRegistry::new();
        // "ui" prefers to start after "theme" when it exists.
        registry
            .register(Stub::new("ui", vec![Dependency::optional("theme")]))
            .unwrap();
        registry.register(Stub::new("theme", vec![])).unwrap();

        assert_eq!(registry.resolve().unwrap(), vec!["theme", "ui"]);
    }

    #[test]
    fn optional_cycle_resolves() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(Stub::new("a", vec![Dependency::optional("b")]))
            .unwrap();
        registry
            .register(Stub::new("b", vec![Dependency::optional("a")]))
            .unwrap();

        // Earliest-registered stalled component released first.
        assert_eq!(registry.resolve().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn optional_back_edge_does_not_block_required_chain() {
        let mut registry = ComponentRegistry::new();
        registry
            .register(Stub::new("a", vec![Dependency::required("b")]))
            .unwrap();
        registry
            .register(Stub::new("b", vec![Dependency::optional("a")]))
            .unwrap();
        // b is released via the optional edge, then a follows: no failure.
        assert_eq!(registry.resolve().unwrap(), vec!["b", "a"]);
    }

    #[test]
    fn lookup_returns_live_handle() {
        let mut registry = ComponentRegistry::new();
        registry.register(Stub::new("a", vec![])).unwrap();

        let handle = registry.lookup("a").expect("registered");
        assert!(handle.is_alive());
        assert_eq!(handle.with(|c| c.name().to_string()), Some("a".into()));
        assert!(registry.lookup("nope").is_none());
    }

    #[test]
    fn remove_invalidates_handles_and_order() {
        let mut registry = ComponentRegistry::new();
        registry.register(Stub::new("a", vec![])).unwrap();
        registry.register(Stub::new("b", vec![])).unwrap();
        registry.init_all().unwrap();

        let handle = registry.lookup("a").expect("registered");
        assert!(registry.remove("a"));
        assert!(!handle.is_alive());
        assert!(!registry.remove("a"));
        assert_eq!(registry.component_count(), 1);
        assert_eq!(registry.status_of("b"), Some(LifecycleStatus::Ready));
    }

    #[test]
    fn statuses_follow_the_lifecycle() {
        let mut registry = ComponentRegistry::new();
        registry.register(Stub::new("a", vec![])).unwrap();
        assert_eq!(registry.status_of("a"), Some(LifecycleStatus::Registered));

        registry.init_all().unwrap();
        assert_eq!(registry.status_of("a"), Some(LifecycleStatus::Ready));
        assert!(registry.has_live_components());

        registry.shutdown_all();
        assert_eq!(registry.status_of("a"), Some(LifecycleStatus::ShutDown));
        assert!(!registry.has_live_components());
    }

    #[test]
    fn listeners_observe_add_and_remove() {
        struct CountingListener {
            added: RefCell<Vec<String>>,
            removed: RefCell<Vec<String>>,
        }

        impl LifecycleListener for CountingListener {
            fn on_component_added(&self, name: &str) {
                self.added.borrow_mut().push(name.to_string());
            }

            fn on_component_removed(&self, name: &str) {
                self.removed.borrow_mut().push(name.to_string());
            }
        }

        let listener = Rc::new(CountingListener {
            added: RefCell::new(Vec::new()),
            removed: RefCell::new(Vec::new()),
        });

        let mut registry = ComponentRegistry::new();
        let as_dyn: Rc<dyn LifecycleListener> = listener.clone();
        registry.add_listener(Rc::clone(&as_dyn));

        registry.register(Stub::new("a", vec![])).unwrap();
        registry.remove("a");
        assert_eq!(*listener.added.borrow(), vec!["a"]);
        assert_eq!(*listener.removed.borrow(), vec!["a"]);

        registry.remove_listener(&as_dyn);
        registry.register(Stub::new("b", vec![])).unwrap();
        assert_eq!(listener.added.borrow().len(), 1);
    }
}
