//! Identifier types for hearth.
//!
//! Identifiers are small monotonic integers minted by the instance that owns
//! them (the event bus issues both subscription ids and owner tokens). They
//! are opaque: holders compare them and hand them back, nothing more. An
//! issuing instance never reuses an id for its lifetime.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier for a single event-bus subscription.
///
/// Returned by `EventBus::subscribe`; pass it back to `unsubscribe` to
/// remove exactly that subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    /// Wraps a raw id value. Normally only the issuing bus calls this.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Opaque token identifying the owner of a group of subscriptions.
///
/// Issued once per component at registration. A component remembers its own
/// token and the bus removes every subscription carrying it in a single
/// `unsubscribe_owner` call at teardown, so no dangling handler can fire
/// after the component is gone. The token is compared, never dereferenced:
/// no lifetime relationship exists between the bus and the owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerToken(u64);

impl OwnerToken {
    /// Wraps a raw token value. Normally only the issuing bus calls this.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw token value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for OwnerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "owner#{}", self.0)
    }
}
