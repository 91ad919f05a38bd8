//! Per-call context handed to component lifecycle methods.

use hearth_event::{Event, EventBus, SubscribeOptions};
use hearth_types::{OwnerToken, SubscriptionId};
use serde_json::Value;

use crate::{ComponentHandle, PeerLookup};

/// The runtime services a component may use during a lifecycle call.
///
/// The context is the only way a component reaches the bus and its
/// siblings; there is no ambient global instance, so tests can run every
/// component against an isolated bus. A component that needs the bus
/// outside lifecycle calls (from inside an event handler, say) clones it
/// out of the context during `init`.
///
/// Subscriptions made through [`subscribe`](Self::subscribe) carry the
/// component's [`OwnerToken`] automatically, so the registry can strip all
/// of them in one call when the component shuts down or is removed.
pub struct Context<'a> {
    bus: EventBus,
    owner: OwnerToken,
    peers: &'a dyn PeerLookup,
}

impl<'a> Context<'a> {
    /// Builds a context. Called by the registry (and test harnesses).
    #[must_use]
    pub fn new(bus: EventBus, owner: OwnerToken, peers: &'a dyn PeerLookup) -> Self {
        Self { bus, owner, peers }
    }

    /// The event bus. Clone it to keep it beyond this call.
    #[must_use]
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// This component's owner token.
    #[must_use]
    pub fn owner(&self) -> OwnerToken {
        self.owner
    }

    /// Looks up a sibling component by name.
    ///
    /// During `init` a sibling may legitimately be missing or not yet
    /// started; `on_all_ready` is the guaranteed-safe phase for lookups.
    #[must_use]
    pub fn peer(&self, name: &str) -> Option<ComponentHandle> {
        self.peers.peer(name)
    }

    /// Subscribes to a topic pattern, tagged with this component's owner
    /// token.
    pub fn subscribe(
        &self,
        pattern: &str,
        handler: impl Fn(&Event) + 'static,
    ) -> SubscriptionId {
        self.bus
            .subscribe_with(pattern, handler, SubscribeOptions::default().with_owner(self.owner))
    }

    /// Like [`subscribe`](Self::subscribe), additionally replaying matching
    /// sticky values synchronously.
    pub fn subscribe_replay(
        &self,
        pattern: &str,
        handler: impl Fn(&Event) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe_with(
            pattern,
            handler,
            SubscribeOptions::default().with_owner(self.owner).with_replay(),
        )
    }

    /// Publishes an event on a topic.
    pub fn publish(&self, topic: impl Into<String>, payload: impl Into<Value>) {
        self.bus.publish(topic, payload);
    }

    /// Publishes an event and caches it as the topic's sticky value.
    pub fn publish_sticky(&self, topic: impl Into<String>, payload: impl Into<Value>) {
        self.bus.publish_sticky(topic, payload);
    }
}
