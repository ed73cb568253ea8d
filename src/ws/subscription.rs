//! Per-connection subscription manager.
//!
//! Tracks which event types a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

/// Event type names a client may subscribe to.
pub const EVENT_TYPES: [&str; 5] = [
    "pool_created",
    "liquidity_added",
    "liquidity_removed",
    "tokens_swapped",
    "price_updated",
];

/// Wildcard matching every event type.
pub const WILDCARD: &str = "*";

/// Manages the set of event subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed event types. If `subscribe_all` is true, this set is ignored.
    event_types: HashSet<&'static str>,
    /// Whether the client subscribes to everything (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds event types to the subscription set and returns the names that
    /// are not known event types.
    pub fn subscribe<'a>(&mut self, names: &'a [String]) -> Vec<&'a str> {
        let mut rejected = Vec::new();
        for name in names {
            if name == WILDCARD {
                self.subscribe_all = true;
            } else if let Some(known) = EVENT_TYPES.iter().find(|t| **t == name.as_str()) {
                self.event_types.insert(*known);
            } else {
                rejected.push(name.as_str());
            }
        }
        rejected
    }

    /// Removes event types from the subscription set. `"*"` clears all.
    pub fn unsubscribe(&mut self, names: &[String]) {
        for name in names {
            if name == WILDCARD {
                self.subscribe_all = false;
                self.event_types.clear();
            } else {
                self.event_types.remove(name.as_str());
            }
        }
    }

    /// Returns `true` if events of `event_type` should be forwarded.
    #[must_use]
    pub fn matches(&self, event_type: &str) -> bool {
        self.subscribe_all || self.event_types.contains(event_type)
    }

    /// Returns the explicitly subscribed event types, sorted.
    #[must_use]
    pub fn subscribed(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.event_types.iter().copied().collect();
        types.sort_unstable();
        types
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches("tokens_swapped"));
    }

    #[test]
    fn subscribe_specific_type() {
        let mut mgr = SubscriptionManager::new();
        let requested = names(&["tokens_swapped"]);
        assert!(mgr.subscribe(&requested).is_empty());
        assert!(mgr.matches("tokens_swapped"));
        assert!(!mgr.matches("price_updated"));
    }

    #[test]
    fn unknown_types_are_reported() {
        let mut mgr = SubscriptionManager::new();
        let requested = names(&["price_updated", "pool_removed"]);
        assert_eq!(mgr.subscribe(&requested), vec!["pool_removed"]);
        assert_eq!(mgr.subscribed(), vec!["price_updated"]);
    }

    #[test]
    fn wildcard_matches_everything_until_cleared() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&names(&["*", "liquidity_added"]));
        assert!(mgr.is_subscribed_all());
        assert!(mgr.matches("pool_created"));

        mgr.unsubscribe(&names(&["*"]));
        assert!(!mgr.matches("liquidity_added"));
        assert!(mgr.subscribed().is_empty());
    }

    #[test]
    fn unsubscribe_removes_type() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&names(&["liquidity_removed", "tokens_swapped"]));
        mgr.unsubscribe(&names(&["tokens_swapped"]));
        assert_eq!(mgr.subscribed(), vec!["liquidity_removed"]);
    }
}
