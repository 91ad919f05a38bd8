//! Event system for hearth.
//!
//! This crate provides the topic-addressed publish/subscribe bus that sits
//! underneath the component lifecycle. Components never call each other
//! directly; producers publish onto topics and consumers subscribe to them,
//! so optional peripherals can be absent without breaking anything upstream.
//!
//! ```text
//! ┌──────────┐ publish("sensor.temp", 21.5)  ┌─────────────────────────┐
//! │  Sensor  │ ─────────────────────────────►│        EventBus         │
//! └──────────┘                               │  ┌───────────────────┐  │
//! ┌──────────┐ publish_sticky("wifi/up", ..) │  │ bounded queue (32)│  │
//! │   WiFi   │ ─────────────────────────────►│  │ drop-oldest       │  │
//! └──────────┘                               │  └───────────────────┘  │
//!                                            │  sticky cache per topic │
//! ┌──────────┐  subscribe("sensor.*")        └───────────┬─────────────┘
//! │ Actuator │ ◄─────────────────────────────────────────┘ poll()
//! └──────────┘         dispatched inline, FIFO
//! ```
//!
//! # Delivery model
//!
//! | Operation | Behavior |
//! |-----------|----------|
//! | [`EventBus::publish`] | Enqueue; never blocks, never fails |
//! | [`EventBus::publish_sticky`] | Enqueue and cache the latest value per topic |
//! | [`EventBus::poll`] | Drain the queue FIFO, dispatch inline |
//! | replay on subscribe | Matching sticky values delivered synchronously |
//!
//! Everything is single-threaded and cooperative: callbacks run inline on
//! the caller, inside `subscribe` (replay) or inside `poll` (queued
//! delivery). Re-entering the bus from a callback is permitted.
//!
//! # Crate structure
//!
//! - [`EventBus`], [`SubscribeOptions`] — the bus itself
//! - [`Event`] — topic plus type-erased payload
//! - [`TopicPattern`] — exact or trailing-wildcard topic matching
//! - [`topics`] — core lifecycle topic constants

mod bus;
mod event;
mod topic;
pub mod topics;

pub use bus::{EventBus, SubscribeOptions, DEFAULT_QUEUE_CAPACITY};
pub use event::Event;
pub use topic::TopicPattern;

// Re-export for convenience: ids travel with every subscription.
pub use hearth_types::{OwnerToken, SubscriptionId};
