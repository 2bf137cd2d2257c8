use alloc::vec::Vec;
use core::fmt;

use crate::maybe_sync::{RwLock, WeakRef};
use crate::DynListener;

#[cfg(doc)]
use crate::{Listener, Store};

// -------------------------------------------------------------------------------------------------

/// The set of listeners registered with one [`Store`], in insertion order.
///
/// Delivery snapshots the set first: a notification goes to exactly the listeners registered
/// at the moment it begins, so a listener may subscribe or unsubscribe during delivery
/// without affecting the current fan-out (and without deadlocking against the registry lock).
pub(crate) struct Registry<S: 'static> {
    inner: RwLock<Inner<S>>,
}

struct Inner<S: 'static> {
    entries: Vec<Entry<S>>,
    /// Monotonic; never reused, so removal by id is unambiguous.
    next_id: u64,
}

struct Entry<S: 'static> {
    id: u64,
    listener: DynListener<S>,
}

impl<S: 'static> Registry<S> {
    pub(crate) fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: Vec::new(),
                next_id: 0,
            }),
        }
    }

    pub(crate) fn add(&self, listener: DynListener<S>) -> u64 {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push(Entry { id, listener });
        log::trace!(
            "listener {id} subscribed ({} registered)",
            inner.entries.len()
        );
        id
    }

    /// Removes the entry with the given id. Unknown ids are a no-op,
    /// which is what makes repeated unsubscription harmless.
    pub(crate) fn remove(&self, id: u64) {
        let mut inner = self.inner.write();
        if let Some(index) = inner.entries.iter().position(|entry| entry.id == id) {
            inner.entries.remove(index);
            log::trace!("listener {id} unsubscribed ({} remain)", inner.entries.len());
        }
    }

    pub(crate) fn contains(&self, id: u64) -> bool {
        self.inner.read().entries.iter().any(|entry| entry.id == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    /// Delivers `state` to every listener registered at the moment this call begins.
    pub(crate) fn notify(&self, state: &S) {
        let snapshot: Vec<DynListener<S>> = self
            .inner
            .read()
            .entries
            .iter()
            .map(|entry| entry.listener.clone())
            .collect();
        // The lock is released here; listeners are free to call back into the registry.
        log::trace!("notifying {} listeners", snapshot.len());
        for listener in snapshot {
            listener.receive(state);
        }
    }
}

impl<S: 'static> fmt::Debug for Registry<S> {
    #[mutants::skip] // diagnostic output only; mutations are not observable by behavior tests
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // not using f.debug_tuple() so this is never printed on multiple lines
        if let Some(inner) = self.inner.try_read() {
            write!(f, "Registry({})", inner.entries.len())
        } else {
            write!(f, "Registry(?)")
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Handle to one [`Listener`] registration, returned by [`Store::subscribe()`].
///
/// Dropping the `Subscription` removes the listener; call [`detach()`](Self::detach)
/// to leave the listener registered for the rest of the store's life instead.
/// [`unsubscribe()`](Self::unsubscribe) is idempotent: removing a registration that is
/// already gone is a no-op, never an error.
///
/// # Generic parameters
///
/// * `S` is the state type of the store this subscription belongs to.
#[must_use = "dropping a Subscription unsubscribes its listener; call detach() to keep it"]
pub struct Subscription<S: 'static> {
    registry: WeakRef<Registry<S>>,
    id: u64,
}

impl<S: 'static> Subscription<S> {
    pub(crate) fn new(registry: WeakRef<Registry<S>>, id: u64) -> Self {
        Self { registry, id }
    }

    /// Removes the associated listener from the store's registry.
    ///
    /// Calling this more than once, or after the store has been dropped, has no effect.
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.remove(self.id);
        }
    }

    /// Returns whether the associated listener is still registered.
    pub fn is_active(&self) -> bool {
        self.registry
            .upgrade()
            .is_some_and(|registry| registry.contains(self.id))
    }

    /// Consumes the subscription without unsubscribing,
    /// leaving the listener registered as long as the store exists.
    pub fn detach(mut self) {
        self.registry = WeakRef::new();
    }
}

impl<S: 'static> Drop for Subscription<S> {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl<S: 'static> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
