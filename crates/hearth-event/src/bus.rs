//! Topic-based event bus with a bounded delivery queue.
//!
//! [`EventBus`] is a cheaply cloneable handle over shared single-threaded
//! state. Publishing appends to a fixed-capacity FIFO queue (at capacity the
//! oldest entry is evicted, never the newest); [`EventBus::poll`] drains the
//! queue and dispatches each event inline to every matching subscription.
//!
//! # Re-entrancy
//!
//! Handlers run with no borrow of the bus held: the matching handlers for an
//! event are snapshotted out first, then invoked. A handler may therefore
//! `publish`, `subscribe` or `unsubscribe` freely. Events published from
//! inside a handler are queued for the next `poll`.
//!
//! # Sticky events
//!
//! [`EventBus::publish_sticky`] additionally caches the latest payload per
//! topic. A later subscriber passing [`SubscribeOptions::with_replay`]
//! receives every cached value matching its pattern synchronously, during
//! the `subscribe` call, and is not re-delivered the still-queued original
//! of a value it already replayed.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::rc::Rc;

use hearth_types::{OwnerToken, SubscriptionId};
use serde_json::Value;
use tracing::{debug, trace};

use crate::{Event, TopicPattern};

/// Default capacity of the delivery queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 32;

type Handler = Rc<dyn Fn(&Event)>;

/// Options for [`EventBus::subscribe_with`].
///
/// # Example
///
/// ```
/// use hearth_event::{EventBus, SubscribeOptions};
///
/// let bus = EventBus::new();
/// let owner = bus.issue_owner();
/// let opts = SubscribeOptions::default().with_owner(owner).with_replay();
/// bus.subscribe_with("wifi/*", |_ev| {}, opts);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribeOptions {
    owner: Option<OwnerToken>,
    replay: bool,
}

impl SubscribeOptions {
    /// Tags the subscription with an owner token for bulk removal.
    #[must_use]
    pub fn with_owner(mut self, owner: OwnerToken) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Requests synchronous replay of matching sticky values.
    #[must_use]
    pub fn with_replay(mut self) -> Self {
        self.replay = true;
        self
    }
}

struct Subscription {
    id: SubscriptionId,
    pattern: TopicPattern,
    handler: Handler,
    owner: Option<OwnerToken>,
    /// Per-topic sequence watermark set by sticky replay. Queued events at
    /// or below the watermark were already seen via replay and are skipped.
    replayed: HashMap<String, u64>,
}

impl Subscription {
    fn delivers(&self, topic: &str, seq: u64) -> bool {
        match self.replayed.get(topic) {
            Some(&watermark) => seq > watermark,
            None => true,
        }
    }
}

struct StickyEntry {
    payload: Value,
    /// Sequence number of the publish that produced this value.
    seq: u64,
}

struct QueuedEvent {
    event: Event,
    seq: u64,
}

struct BusInner {
    /// Exact-pattern subscriptions, keyed by topic for O(1) dispatch.
    exact: HashMap<String, Vec<Subscription>>,
    /// Wildcard subscriptions, scanned per event.
    wildcard: Vec<Subscription>,
    queue: VecDeque<QueuedEvent>,
    capacity: usize,
    /// Latest sticky payload per topic. BTreeMap keeps replay order
    /// deterministic for wildcard subscribers.
    sticky: BTreeMap<String, StickyEntry>,
    next_sub: u64,
    next_owner: u64,
    next_seq: u64,
}

/// Topic-addressed publish/subscribe channel.
///
/// Clones share the same underlying bus; a component typically keeps a clone
/// captured from its startup context.
///
/// # Example
///
/// ```
/// use hearth_event::EventBus;
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let bus = EventBus::new();
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// bus.subscribe("sensor.*", move |ev| {
///     sink.borrow_mut().push(ev.payload.clone());
/// });
///
/// bus.publish("sensor.temp", 21);
/// bus.poll();
/// assert_eq!(seen.borrow().len(), 1);
/// ```
#[derive(Clone)]
pub struct EventBus {
    inner: Rc<RefCell<BusInner>>,
}

impl EventBus {
    /// Creates a bus with the default queue capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_QUEUE_CAPACITY)
    }

    /// Creates a bus with the given queue capacity (minimum 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(BusInner {
                exact: HashMap::new(),
                wildcard: Vec::new(),
                queue: VecDeque::new(),
                capacity: capacity.max(1),
                sticky: BTreeMap::new(),
                next_sub: 1,
                next_owner: 1,
                next_seq: 1,
            })),
        }
    }

    /// Mints a fresh owner token for grouping subscriptions.
    #[must_use]
    pub fn issue_owner(&self) -> OwnerToken {
        let mut inner = self.inner.borrow_mut();
        let token = OwnerToken::new(inner.next_owner);
        inner.next_owner += 1;
        token
    }

    /// Subscribes to a topic pattern. Returns a fresh subscription id.
    pub fn subscribe(
        &self,
        pattern: &str,
        handler: impl Fn(&Event) + 'static,
    ) -> SubscriptionId {
        self.subscribe_with(pattern, handler, SubscribeOptions::default())
    }

    /// Subscribes with explicit options.
    ///
    /// With [`SubscribeOptions::with_replay`], every sticky value matching
    /// `pattern` is delivered to `handler` synchronously before this call
    /// returns, in topic order. Those values are not delivered again when
    /// their originating events drain from the queue.
    pub fn subscribe_with(
        &self,
        pattern: &str,
        handler: impl Fn(&Event) + 'static,
        options: SubscribeOptions,
    ) -> SubscriptionId {
        let handler: Handler = Rc::new(handler);
        let pattern = TopicPattern::parse(pattern);
        let mut replays: Vec<Event> = Vec::new();

        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriptionId::new(inner.next_sub);
            inner.next_sub += 1;

            let mut sub = Subscription {
                id,
                pattern,
                handler: Rc::clone(&handler),
                owner: options.owner,
                replayed: HashMap::new(),
            };

            if options.replay {
                for (topic, entry) in &inner.sticky {
                    if sub.pattern.matches(topic) {
                        sub.replayed.insert(topic.clone(), entry.seq);
                        replays.push(Event::new(topic.clone(), entry.payload.clone()));
                    }
                }
            }

            match &sub.pattern {
                TopicPattern::Exact(topic) => {
                    let topic = topic.clone();
                    inner.exact.entry(topic).or_default().push(sub);
                }
                TopicPattern::Prefix(_) => inner.wildcard.push(sub),
            }
            id
        };

        // Replay outside the borrow so the handler may re-enter the bus.
        for event in &replays {
            handler(event);
        }
        id
    }

    /// Removes exactly one subscription. Returns false for unknown ids.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let mut removed = false;
        for subs in inner.exact.values_mut() {
            let before = subs.len();
            subs.retain(|s| s.id != id);
            removed |= subs.len() != before;
        }
        let before = inner.wildcard.len();
        inner.wildcard.retain(|s| s.id != id);
        removed |= inner.wildcard.len() != before;
        inner.exact.retain(|_, subs| !subs.is_empty());
        removed
    }

    /// Removes every subscription tagged with `owner`. Returns the count.
    pub fn unsubscribe_owner(&self, owner: OwnerToken) -> usize {
        let mut inner = self.inner.borrow_mut();
        let mut removed = 0;
        for subs in inner.exact.values_mut() {
            let before = subs.len();
            subs.retain(|s| s.owner != Some(owner));
            removed += before - subs.len();
        }
        let before = inner.wildcard.len();
        inner.wildcard.retain(|s| s.owner != Some(owner));
        removed += before - inner.wildcard.len();
        inner.exact.retain(|_, subs| !subs.is_empty());
        if removed > 0 {
            debug!(%owner, removed, "removed owner subscriptions");
        }
        removed
    }

    /// Queues an event. Never blocks, never fails; at capacity the oldest
    /// queued event is evicted.
    pub fn publish(&self, topic: impl Into<String>, payload: impl Into<Value>) {
        self.enqueue(Event::new(topic, payload), false);
    }

    /// Queues an event and caches it as the topic's latest sticky value,
    /// so future replay subscribers receive it immediately.
    pub fn publish_sticky(&self, topic: impl Into<String>, payload: impl Into<Value>) {
        self.enqueue(Event::new(topic, payload), true);
    }

    fn enqueue(&self, event: Event, sticky: bool) {
        let mut inner = self.inner.borrow_mut();
        let seq = inner.next_seq;
        inner.next_seq += 1;

        if sticky {
            inner.sticky.insert(
                event.topic.clone(),
                StickyEntry {
                    payload: event.payload.clone(),
                    seq,
                },
            );
        }

        if inner.queue.len() == inner.capacity {
            if let Some(dropped) = inner.queue.pop_front() {
                trace!(topic = %dropped.event.topic, "queue full, dropping oldest event");
            }
        }
        inner.queue.push_back(QueuedEvent { event, seq });
    }

    /// Drains the queue, dispatching each event inline to every matching
    /// subscription in strict FIFO order. Returns the number of events
    /// dispatched.
    ///
    /// Only events queued when the call starts are drained; events published
    /// by a handler wait for the next `poll`.
    pub fn poll(&self) -> usize {
        let pending = self.inner.borrow().queue.len();
        let mut dispatched = 0;
        for _ in 0..pending {
            let Some(queued) = self.inner.borrow_mut().queue.pop_front() else {
                break;
            };
            // Snapshot matching handlers so they run without a bus borrow
            // held and keep running even if one of them unsubscribes another.
            let handlers = self.matching_handlers(&queued);
            for handler in handlers {
                handler(&queued.event);
            }
            dispatched += 1;
        }
        dispatched
    }

    fn matching_handlers(&self, queued: &QueuedEvent) -> Vec<Handler> {
        let inner = self.inner.borrow();
        let mut handlers = Vec::new();
        if let Some(subs) = inner.exact.get(&queued.event.topic) {
            for sub in subs {
                if sub.delivers(&queued.event.topic, queued.seq) {
                    handlers.push(Rc::clone(&sub.handler));
                }
            }
        }
        for sub in &inner.wildcard {
            if sub.pattern.matches(&queued.event.topic)
                && sub.delivers(&queued.event.topic, queued.seq)
            {
                handlers.push(Rc::clone(&sub.handler));
            }
        }
        handlers
    }

    /// Returns the latest sticky value for `topic`, if any.
    #[must_use]
    pub fn sticky_value(&self, topic: &str) -> Option<Value> {
        self.inner
            .borrow()
            .sticky
            .get(topic)
            .map(|entry| entry.payload.clone())
    }

    /// Returns the number of events currently queued.
    #[must_use]
    pub fn queued_len(&self) -> usize {
        self.inner.borrow().queue.len()
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        let inner = self.inner.borrow();
        inner.exact.values().map(Vec::len).sum::<usize>() + inner.wildcard.len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;

    /// Shared recorder for handler observations.
    fn recorder() -> (Rc<RefCell<Vec<Value>>>, impl Fn(&Event) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |ev: &Event| sink.borrow_mut().push(ev.payload.clone()))
    }

    #[test]
    fn fifo_delivery_order() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe("counter", handler);

        for i in 1..=5 {
            bus.publish("counter", i);
        }
        assert_eq!(bus.poll(), 5);
        assert_eq!(*seen.borrow(), vec![json!(1), json!(2), json!(3), json!(4), json!(5)]);
    }

    #[test]
    fn drop_oldest_keeps_last_capacity_events() {
        let bus = EventBus::with_capacity(32);
        let (seen, handler) = recorder();
        bus.subscribe("flood", handler);

        for i in 0..100 {
            bus.publish("flood", i);
        }
        assert_eq!(bus.queued_len(), 32);
        assert_eq!(bus.poll(), 32);

        let expected: Vec<Value> = (68..100).map(|i| json!(i)).collect();
        assert_eq!(*seen.borrow(), expected);
    }

    #[test]
    fn sticky_replay_is_synchronous_and_not_redelivered() {
        let bus = EventBus::new();
        bus.publish_sticky("state", 42);

        let (seen, handler) = recorder();
        bus.subscribe_with("state", handler, SubscribeOptions::default().with_replay());
        // Replay happened during the subscribe call itself.
        assert_eq!(*seen.borrow(), vec![json!(42)]);

        bus.publish("state", 43);
        bus.poll();
        // The queued original of 42 was suppressed; only 43 follows.
        assert_eq!(*seen.borrow(), vec![json!(42), json!(43)]);
    }

    #[test]
    fn replay_without_sticky_value_is_silent() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe_with("state", handler, SubscribeOptions::default().with_replay());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn plain_subscribe_still_sees_queued_sticky_event() {
        let bus = EventBus::new();
        bus.publish_sticky("state", 42);

        let (seen, handler) = recorder();
        bus.subscribe("state", handler);
        bus.poll();
        assert_eq!(*seen.borrow(), vec![json!(42)]);
    }

    #[test]
    fn sticky_overwritten_in_place() {
        let bus = EventBus::new();
        bus.publish_sticky("state", 1);
        bus.publish_sticky("state", 2);
        assert_eq!(bus.sticky_value("state"), Some(json!(2)));
    }

    #[test]
    fn newer_queued_event_survives_replay_suppression() {
        let bus = EventBus::new();
        bus.publish_sticky("state", 1);
        // Plain publish after the sticky: newer information, must deliver.
        bus.publish("state", 2);

        let (seen, handler) = recorder();
        bus.subscribe_with("state", handler, SubscribeOptions::default().with_replay());
        assert_eq!(*seen.borrow(), vec![json!(1)]);

        bus.poll();
        assert_eq!(*seen.borrow(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn wildcard_replay_delivers_each_matching_topic_once() {
        let bus = EventBus::new();
        bus.publish_sticky("sensor.temp", 21);
        bus.publish_sticky("sensor.humidity", 40);
        bus.publish_sticky("actuator.state", "off");

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe_with(
            "sensor.*",
            move |ev| sink.borrow_mut().push(ev.clone()),
            SubscribeOptions::default().with_replay(),
        );

        // BTreeMap iteration: topic order, sensors only.
        {
            let events = seen.borrow();
            let topics: Vec<&str> = events.iter().map(|e| e.topic.as_str()).collect();
            assert_eq!(topics, vec!["sensor.humidity", "sensor.temp"]);
        }

        bus.poll();
        // Queued originals suppressed for this subscriber.
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn wildcard_matches_prefix_only() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe("sensor.*", handler);

        bus.publish("sensor.update", 1);
        bus.publish("sensor.temp", 2);
        bus.publish("actuator.update", 3);
        bus.poll();
        assert_eq!(*seen.borrow(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn unsubscribe_removes_exactly_one() {
        let bus = EventBus::new();
        let (seen_a, handler_a) = recorder();
        let (seen_b, handler_b) = recorder();
        let a = bus.subscribe("t", handler_a);
        bus.subscribe("t", handler_b);

        assert!(bus.unsubscribe(a));
        assert!(!bus.unsubscribe(a));

        bus.publish("t", 1);
        bus.poll();
        assert!(seen_a.borrow().is_empty());
        assert_eq!(seen_b.borrow().len(), 1);
    }

    #[test]
    fn unsubscribe_owner_spares_other_owners() {
        let bus = EventBus::new();
        let owner_a = bus.issue_owner();
        let owner_b = bus.issue_owner();

        let (seen_a, handler_a) = recorder();
        let (seen_a2, handler_a2) = recorder();
        let (seen_b, handler_b) = recorder();
        bus.subscribe_with("t", handler_a, SubscribeOptions::default().with_owner(owner_a));
        bus.subscribe_with("u.*", handler_a2, SubscribeOptions::default().with_owner(owner_a));
        bus.subscribe_with("t", handler_b, SubscribeOptions::default().with_owner(owner_b));

        assert_eq!(bus.unsubscribe_owner(owner_a), 2);
        assert_eq!(bus.subscription_count(), 1);

        bus.publish("t", 1);
        bus.publish("u.x", 2);
        bus.poll();
        assert!(seen_a.borrow().is_empty());
        assert!(seen_a2.borrow().is_empty());
        assert_eq!(*seen_b.borrow(), vec![json!(1)]);
    }

    #[test]
    fn subscription_ids_are_unique_and_monotonic() {
        let bus = EventBus::new();
        let a = bus.subscribe("t", |_| {});
        let b = bus.subscribe("t", |_| {});
        bus.unsubscribe(a);
        let c = bus.subscribe("t", |_| {});
        assert!(a < b && b < c);
    }

    #[test]
    fn handler_publish_waits_for_next_poll() {
        let bus = EventBus::new();
        let (seen, handler) = recorder();
        bus.subscribe("out", handler);

        let republish = bus.clone();
        bus.subscribe("in", move |_ev| republish.publish("out", "echoed"));

        bus.publish("in", 1);
        assert_eq!(bus.poll(), 1);
        assert!(seen.borrow().is_empty(), "re-entrant publish must not deliver in the same poll");
        assert_eq!(bus.poll(), 1);
        assert_eq!(*seen.borrow(), vec![json!("echoed")]);
    }

    #[test]
    fn handler_may_unsubscribe_mid_event_without_affecting_snapshot() {
        let bus = EventBus::new();

        // The killer runs first and unsubscribes the victim while the event
        // is being dispatched; the victim was already snapshotted for this
        // event and still fires once.
        let victim_id = Rc::new(RefCell::new(None::<SubscriptionId>));
        let killer_bus = bus.clone();
        let target = Rc::clone(&victim_id);
        bus.subscribe("t", move |_ev| {
            if let Some(id) = *target.borrow() {
                killer_bus.unsubscribe(id);
            }
        });

        let (seen, handler) = recorder();
        *victim_id.borrow_mut() = Some(bus.subscribe("t", handler));

        bus.publish("t", 1);
        bus.poll();
        assert_eq!(seen.borrow().len(), 1);

        bus.publish("t", 2);
        bus.poll();
        assert_eq!(seen.borrow().len(), 1);
    }
}
