//! Typed in-process publish/subscribe.
//!
//! Events are a closed enum implementing [`Event`]; each variant maps to a
//! kind, and listeners subscribe per kind. Publishing is synchronous: every
//! listener registered for the event's kind runs in registration order before
//! [`EventChannel::publish`] returns.

use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

/// An event that can travel over an [`EventChannel`].
pub trait Event {
    /// Closed set of event kinds.
    type Kind: Copy + Eq + Hash + Debug + Display + Send + 'static;

    fn kind(&self) -> Self::Kind;
}

/// Handle returned by [`EventChannel::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

/// Failure reported by a listener.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ListenerError(String);

impl ListenerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<String> for ListenerError {
    fn from(message: String) -> Self {
        Self(message)
    }
}

impl From<&str> for ListenerError {
    fn from(message: &str) -> Self {
        Self(message.to_string())
    }
}

/// One or more listeners failed while an event was published.
///
/// Every listener still ran; this collects the failures.
#[derive(Debug, Error)]
#[error("{} of {delivered} listeners failed for {kind}", failures.len())]
pub struct PublishError {
    /// Kind of the published event.
    pub kind: String,
    /// Listeners the event was delivered to.
    pub delivered: usize,
    pub failures: Vec<(ListenerId, ListenerError)>,
}

type Listener<E> = Arc<dyn Fn(&E) -> Result<(), ListenerError> + Send + Sync>;

struct Registry<E: Event> {
    next_id: u64,
    listeners: HashMap<E::Kind, Vec<(ListenerId, Listener<E>)>>,
}

/// Typed event channel. Clones share one listener registry.
pub struct EventChannel<E: Event> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E: Event> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: HashMap::new(),
            })),
        }
    }
}

impl<E: Event> Debug for EventChannel<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<_, _> = registry
            .listeners
            .iter()
            .map(|(kind, listeners)| (*kind, listeners.len()))
            .collect();
        f.debug_struct("EventChannel").field("listeners", &counts).finish()
    }
}

impl<E: Event> EventChannel<E> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for events of `kind`.
    pub fn subscribe<F>(&self, kind: E::Kind, listener: F) -> ListenerId
    where
        F: Fn(&E) -> Result<(), ListenerError> + Send + Sync + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = ListenerId(registry.next_id);
        registry.next_id += 1;
        registry
            .listeners
            .entry(kind)
            .or_default()
            .push((id, Arc::new(listener)));
        tracing::debug!(%kind, listener = %id, "Listener subscribed");
        id
    }

    /// Remove one listener. Returns whether it was registered.
    pub fn unsubscribe(&self, kind: E::Kind, id: ListenerId) -> bool {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(listeners) = registry.listeners.get_mut(&kind) else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        let removed = listeners.len() != before;
        if listeners.is_empty() {
            registry.listeners.remove(&kind);
        }
        removed
    }

    /// Remove every listener for `kind`. Returns how many were removed.
    pub fn unsubscribe_all(&self, kind: E::Kind) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .remove(&kind)
            .map_or(0, |listeners| listeners.len())
    }

    /// Listeners currently registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: E::Kind) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Deliver `event` to every listener of its kind, in registration order.
    ///
    /// Listeners run outside the registry lock, so they may subscribe or
    /// unsubscribe; such changes apply from the next publish.
    ///
    /// # Errors
    ///
    /// Returns `PublishError` if any listener failed. All listeners run
    /// regardless.
    pub fn publish(&self, event: &E) -> Result<usize, PublishError> {
        let kind = event.kind();
        let snapshot: Vec<(ListenerId, Listener<E>)> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        let mut failures = Vec::new();
        for (id, listener) in &snapshot {
            if let Err(e) = listener(event) {
                tracing::error!(%kind, listener = %id, error = %e, "Event listener failed");
                failures.push((*id, e));
            }
        }

        tracing::debug!(%kind, delivered = snapshot.len(), "Event published");
        if failures.is_empty() {
            Ok(snapshot.len())
        } else {
            Err(PublishError {
                kind: kind.to_string(),
                delivered: snapshot.len(),
                failures,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug)]
    enum Shelf {
        Stocked(u32),
        Emptied,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum ShelfKind {
        Stocked,
        Emptied,
    }

    impl Display for ShelfKind {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(match self {
                Self::Stocked => "stocked",
                Self::Emptied => "emptied",
            })
        }
    }

    impl Event for Shelf {
        type Kind = ShelfKind;

        fn kind(&self) -> ShelfKind {
            match self {
                Self::Stocked(_) => ShelfKind::Stocked,
                Self::Emptied => ShelfKind::Emptied,
            }
        }
    }

    type Log = Arc<Mutex<Vec<String>>>;

    #[test]
    fn test_publish_in_registration_order() {
        let channel = EventChannel::<Shelf>::new();
        let log = Log::default();

        for name in ["first", "second", "third"] {
            let log = Arc::clone(&log);
            channel.subscribe(ShelfKind::Stocked, move |event| {
                if let Shelf::Stocked(n) = event {
                    log.lock().unwrap().push(format!("{name}:{n}"));
                }
                Ok(())
            });
        }

        assert_eq!(channel.publish(&Shelf::Stocked(4)).unwrap(), 3);
        assert_eq!(*log.lock().unwrap(), vec!["first:4", "second:4", "third:4"]);
    }

    #[test]
    fn test_only_matching_kind_receives() {
        let channel = EventChannel::<Shelf>::new();
        let log = Log::default();
        let stocked = Arc::clone(&log);
        channel.subscribe(ShelfKind::Stocked, move |_| {
            stocked.lock().unwrap().push("stocked".to_string());
            Ok(())
        });

        assert_eq!(channel.publish(&Shelf::Emptied).unwrap(), 0);
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn test_unsubscribe_one_and_all() {
        let channel = EventChannel::<Shelf>::new();
        let a = channel.subscribe(ShelfKind::Emptied, |_| Ok(()));
        let _b = channel.subscribe(ShelfKind::Emptied, |_| Ok(()));
        let _c = channel.subscribe(ShelfKind::Emptied, |_| Ok(()));

        assert!(channel.unsubscribe(ShelfKind::Emptied, a));
        assert!(!channel.unsubscribe(ShelfKind::Emptied, a));
        assert!(!channel.unsubscribe(ShelfKind::Stocked, a));
        assert_eq!(channel.listener_count(ShelfKind::Emptied), 2);

        assert_eq!(channel.unsubscribe_all(ShelfKind::Emptied), 2);
        assert_eq!(channel.listener_count(ShelfKind::Emptied), 0);
        assert_eq!(channel.unsubscribe_all(ShelfKind::Emptied), 0);
    }

    #[test]
    fn test_failing_listener_does_not_stop_others() {
        let channel = EventChannel::<Shelf>::new();
        let log = Log::default();

        let failing = channel.subscribe(ShelfKind::Stocked, |_| Err("disk full".into()));
        let after = Arc::clone(&log);
        channel.subscribe(ShelfKind::Stocked, move |_| {
            after.lock().unwrap().push("after".to_string());
            Ok(())
        });

        let err = channel.publish(&Shelf::Stocked(1)).unwrap_err();
        assert_eq!(err.delivered, 2);
        assert_eq!(err.failures, vec![(failing, ListenerError::new("disk full"))]);
        assert_eq!(err.to_string(), "1 of 2 listeners failed for stocked");
        assert_eq!(*log.lock().unwrap(), vec!["after"]);
    }

    #[test]
    fn test_listener_may_unsubscribe_itself() {
        let channel = EventChannel::<Shelf>::new();
        let inner = channel.clone();
        let id = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&id);

        let registered = channel.subscribe(ShelfKind::Emptied, move |_| {
            if let Some(own) = *slot.lock().unwrap() {
                inner.unsubscribe(ShelfKind::Emptied, own);
            }
            Ok(())
        });
        *id.lock().unwrap() = Some(registered);

        assert_eq!(channel.publish(&Shelf::Emptied).unwrap(), 1);
        assert_eq!(channel.listener_count(ShelfKind::Emptied), 0);
        assert_eq!(channel.publish(&Shelf::Emptied).unwrap(), 0);
    }

    #[test]
    fn test_clones_share_registry() {
        let channel = EventChannel::<Shelf>::new();
        let clone = channel.clone();
        clone.subscribe(ShelfKind::Stocked, |_| Ok(()));
        assert_eq!(channel.listener_count(ShelfKind::Stocked), 1);
    }
}
