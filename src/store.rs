use core::fmt;
use core::mem;

use crate::maybe_sync::{RwLock, Shared};
use crate::registry::Registry;
use crate::util::Unquote;
use crate::{IntoListener, Subscription};

#[cfg(doc)]
use crate::Binding;

// -------------------------------------------------------------------------------------------------

/// A single-value state container which notifies listeners when the value is replaced.
///
/// A `Store` is a cheap-to-clone handle: every clone refers to the same value and the same
/// listener registry, so an application composes independent stores simply by creating
/// independent instances. Reading requires cloning the value, so if the clone is not cheap,
/// consider wrapping the value in [`Shared`] to reduce the cost to reference count changes.
///
/// Mutation happens only through [`set()`](Self::set) and its variants, each of which
/// commits the new value and then synchronously delivers it to every listener registered
/// at the moment delivery begins. Listeners therefore always observe a fully committed
/// state; a [`get()`](Self::get) from inside a listener returns the value that was just set.
///
/// For binding a store to a UI component, see [`bind()`](Self::bind) and [`Binding`].
///
/// # Generic parameters
///
/// * `T` is the type of the value.
pub struct Store<T: 'static> {
    shared: Shared<StoreShared<T>>,
}

struct StoreShared<T: 'static> {
    /// `None` only for stores created by [`Store::empty()`] which have not yet been written.
    state: RwLock<Option<T>>,
    /// Separately reference-counted so that [`Subscription`]s can point at it weakly
    /// without keeping the state alive.
    registry: Shared<Registry<T>>,
}

impl<T: 'static> Store<T> {
    /// Creates a new [`Store`] containing the given value.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::from_option(Some(value))
    }

    /// Creates a new [`Store`] with no value.
    ///
    /// Reads panic until the first [`set()`](Self::set); use [`try_get()`](Self::try_get)
    /// or [`try_read()`](Self::try_read) to read such a store safely.
    #[must_use]
    pub fn empty() -> Self {
        Self::from_option(None)
    }

    fn from_option(value: Option<T>) -> Self {
        Self {
            shared: Shared::new(StoreShared {
                state: RwLock::new(value),
                registry: Shared::new(Registry::new()),
            }),
        }
    }

    /// Returns a clone of the current value, or [`None`] if no value has been set yet.
    #[must_use]
    pub fn try_get(&self) -> Option<T>
    where
        T: Clone,
    {
        (*self.shared.state.read()).clone()
    }

    /// Returns a clone of the current value.
    ///
    /// # Panics
    ///
    /// Panics if the store was created with [`Store::empty()`] and has never been written.
    #[must_use]
    #[track_caller]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        match &*self.shared.state.read() {
            Some(value) => value.clone(),
            None => panic!("Store::get() called on a store which has no value"),
        }
    }

    /// Applies `select` to the current value and returns the result, without cloning the
    /// whole value.
    ///
    /// The selector runs while the store's lock is held, so it must not write to this store.
    ///
    /// # Panics
    ///
    /// Panics if the store was created with [`Store::empty()`] and has never been written.
    #[track_caller]
    pub fn read<R>(&self, select: impl FnOnce(&T) -> R) -> R {
        match &*self.shared.state.read() {
            Some(value) => select(value),
            None => panic!("Store::read() called on a store which has no value"),
        }
    }

    /// Like [`read()`](Self::read), but returns [`None`] instead of panicking when the store
    /// has no value.
    pub fn try_read<R>(&self, select: impl FnOnce(&T) -> R) -> Option<R> {
        self.shared.state.read().as_ref().map(select)
    }

    /// Replaces the value unconditionally, then synchronously notifies all currently
    /// registered listeners with the new value.
    ///
    /// Note that this does not test whether the new value is equal to the old one;
    /// if that is desired, call [`set_if_unequal()`](Self::set_if_unequal).
    ///
    /// Caution: While listeners are *expected* not to have immediate side effects on
    /// notification, this cannot be enforced. A panicking listener aborts delivery to the
    /// listeners after it.
    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        let committed = value.clone();
        // Using mem::replace instead of assignment so that _old_value will be dropped
        // after unlocking instead of before.
        let _old_value = mem::replace(&mut *self.shared.state.write(), Some(value));
        log::trace!("state committed; beginning fan-out");
        self.shared.registry.notify(&committed);
    }

    /// Replaces the value iff it is unequal to the current one.
    ///
    /// Compared to [`set()`](Self::set), this avoids sending spurious change notifications.
    /// A store with no value yet is always considered unequal.
    ///
    /// Caution: This executes `PartialEq::eq()` with the lock held; this may delay readers
    /// of the value.
    pub fn set_if_unequal(&self, value: T)
    where
        T: Clone + PartialEq,
    {
        let mut guard = self.shared.state.write();
        if guard.as_ref() == Some(&value) {
            return;
        }
        let committed = value.clone();
        let _old_value = mem::replace(&mut *guard, Some(value));

        // Don't hold the lock while notifying.
        // Listeners shouldn't be trying to read immediately, but we don't want to create
        // this deadlock opportunity regardless.
        drop(guard);

        log::trace!("state committed; beginning fan-out");
        self.shared.registry.notify(&committed);
    }

    /// Computes a new value from the previous one, then proceeds as [`set()`](Self::set).
    ///
    /// Replacing and updating are distinct, explicitly named operations, so a store whose
    /// value type is itself callable is unambiguous: `set(f)` stores `f`, while
    /// `update(|_| f)` stores the result of no call at all — just `f` again.
    ///
    /// The updater runs while the store's read lock is held, so it must not write to this
    /// store; it should be a pure function of the previous state.
    ///
    /// Note: this function is not atomic, in that the read lock is released before the new
    /// value is committed, so other modifications can be made in between. It is not any
    /// more powerful than calling `read()` followed by `set()`.
    ///
    /// # Panics
    ///
    /// Panics if the store was created with [`Store::empty()`] and has never been written,
    /// since then there is no previous value to update.
    #[track_caller]
    pub fn update(&self, updater: impl FnOnce(&T) -> T)
    where
        T: Clone,
    {
        let next = match &*self.shared.state.read() {
            Some(prev) => updater(prev),
            None => panic!("Store::update() called on a store which has no value"),
        };
        self.set(next);
    }

    /// Modifies a clone of the current value in place using the provided function,
    /// then proceeds as [`set()`](Self::set).
    ///
    /// Note: this function is not atomic, in that other modifications can be made between
    /// the time this function reads the current value and writes the new one. It is not any
    /// more powerful than calling `get()` followed by `set()`.
    ///
    /// # Panics
    ///
    /// Panics if the store was created with [`Store::empty()`] and has never been written.
    #[track_caller]
    pub fn mutate(&self, f: impl FnOnce(&mut T))
    where
        T: Clone,
    {
        let mut value = self.get();
        f(&mut value);
        self.set(value);
    }

    /// Registers `listener` to be notified on every subsequent [`set()`](Self::set).
    ///
    /// Registering the identical listener twice yields two independent subscriptions,
    /// each delivered once per change.
    ///
    /// The returned [`Subscription`] removes the listener when dropped or when
    /// [`Subscription::unsubscribe()`] is called; call [`Subscription::detach()`] to keep
    /// the listener for the rest of the store's life.
    pub fn subscribe<L: IntoListener<T>>(&self, listener: L) -> Subscription<T> {
        let id = self.shared.registry.add(listener.into_dyn_listener());
        Subscription::new(Shared::downgrade(&self.shared.registry), id)
    }

    /// Computes the exact count of currently registered listeners.
    ///
    /// This operation is intended for testing and diagnostic purposes.
    pub fn listener_count(&self) -> usize {
        self.shared.registry.len()
    }
}

// -------------------------------------------------------------------------------------------------

impl<T: 'static> Clone for Store<T> {
    /// Clones the handle, not the value: both handles refer to the same state and the
    /// same listeners.
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<T: 'static> Default for Store<T> {
    /// Equivalent to [`Store::empty()`].
    fn default() -> Self {
        Self::empty()
    }
}

impl<T: Clone + fmt::Debug + 'static> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ds = f.debug_struct("Store");
        // Note that we clone rather than holding the lock, to ensure that we cannot
        // deadlock or delay by holding it while waiting on the caller-provided output stream.
        match self.try_get() {
            Some(value) => ds.field("value", &value),
            None => ds.field("value", &Unquote("(unset)")),
        };
        ds.field("owners", &Shared::strong_count(&self.shared));
        ds.field("listeners", &self.shared.registry.len());
        ds.finish()
    }
}

impl<T: 'static> fmt::Pointer for Store<T> {
    /// Prints the address of the store's shared state, which is the same for all clones
    /// of this handle.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ds = f.debug_struct("Store");
        ds.field("address", &Shared::as_ptr(&self.shared));
        ds.finish()
    }
}

// -------------------------------------------------------------------------------------------------
