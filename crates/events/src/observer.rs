//! Subject/observer abstraction (mechanics only).
//!
//! A subject owns an [`ObserverSet`] and calls [`ObserverSet::notify`] after each
//! successful mutation. Observers never hold a reference back to the subject;
//! they only see it for the duration of `update`.
//!
//! ## Delivery
//!
//! - Every observer attached when `notify` starts is invoked exactly once.
//! - Dispatch iterates over a snapshot of the set, so changes made to the set
//!   while dispatching take effect from the next round.
//! - Invocation order is attachment order, but callers must not rely on it.

use std::sync::Arc;

/// Receives change notifications from a subject of type `S`.
///
/// Implementations are reporters: they must not mutate the subject, and they
/// must tolerate being called for changes that do not concern them.
pub trait Observer<S: ?Sized>: Send + Sync {
    fn update(&self, subject: &S);
}

/// Set of observer handles with identity semantics.
///
/// Two handles are the same observer when they point at the same allocation;
/// attaching the same handle twice keeps a single entry.
pub struct ObserverSet<S: ?Sized> {
    observers: Vec<Arc<dyn Observer<S>>>,
}

impl<S: ?Sized> ObserverSet<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an observer. Returns `false` if it was already attached.
    pub fn attach(&mut self, observer: Arc<dyn Observer<S>>) -> bool {
        if self.contains(&observer) {
            return false;
        }
        self.observers.push(observer);
        true
    }

    /// Detach an observer. Returns `false` if it was not attached.
    pub fn detach(&mut self, observer: &Arc<dyn Observer<S>>) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| !same_observer(o, observer));
        self.observers.len() != before
    }

    pub fn contains(&self, observer: &Arc<dyn Observer<S>>) -> bool {
        self.observers.iter().any(|o| same_observer(o, observer))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Observer<S>>> {
        self.observers.iter()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    /// Invoke `update` on every attached observer.
    pub fn notify(&self, subject: &S) {
        let snapshot = self.observers.clone();
        tracing::trace!(observers = snapshot.len(), "notifying observers");
        for observer in snapshot {
            observer.update(subject);
        }
    }
}

impl<S: ?Sized> Default for ObserverSet<S> {
    fn default() -> Self {
        Self {
            observers: Vec::new(),
        }
    }
}

impl<S: ?Sized> Clone for ObserverSet<S> {
    fn clone(&self) -> Self {
        Self {
            observers: self.observers.clone(),
        }
    }
}

impl<S: ?Sized> core::fmt::Debug for ObserverSet<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("observers", &self.observers.len())
            .finish()
    }
}

// Compare data pointers only; vtable pointers are not guaranteed unique.
fn same_observer<S: ?Sized>(a: &Arc<dyn Observer<S>>, b: &Arc<dyn Observer<S>>) -> bool {
    core::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
