use alloc::boxed::Box;
use core::fmt;

use cfg_if::cfg_if;

use crate::gate::Gate;
use crate::listener::Wake;
use crate::maybe_sync::{MaybeSendSync, Shared};
use crate::util::Unquote;
use crate::{equality, Store, Subscription};

cfg_if! {
    if #[cfg(feature = "sync")] {
        type DynSelector<T, U> = Box<dyn Fn(&T) -> U + Send + Sync>;
        type DynComparator<U> = Box<dyn Fn(&U, &U) -> bool + Send + Sync>;
    } else {
        type DynSelector<T, U> = Box<dyn Fn(&T) -> U>;
        type DynComparator<U> = Box<dyn Fn(&U, &U) -> bool>;
    }
}

/// A read-only view of a [`Store`] suitable for driving an external consumer such as a
/// UI component: it projects the state through a selector and hands out snapshots which
/// are pointer-stable for as long as the projected value does not change.
///
/// Construct one using [`Store::bind()`], [`Store::bind_with()`], or [`Store::binding()`].
///
/// A `Binding` is the [`Gate`] pattern packaged for consumers that cannot name the
/// selector and comparator types: both are boxed, and the binding keeps its own handle
/// to the store, so it is a self-contained value.
///
/// # Generic parameters
///
/// * `T` is the type of the state in the underlying store.
/// * `U` is the type of the projected value.
pub struct Binding<T: 'static, U> {
    store: Store<T>,
    gate: Gate<U, DynSelector<T, U>, DynComparator<U>>,
}

impl<T: 'static> Store<T> {
    /// Returns a [`Binding`] which projects this store's state through `select` and
    /// compares successive projections with `==`.
    ///
    /// ```
    /// use storelet::{Shared, Store};
    ///
    /// let store = Store::new((10, 20));
    /// let binding = store.bind(|&(first, _)| first);
    ///
    /// let before = binding.snapshot();
    /// store.set((10, 99)); // does not affect the projection
    /// let after = binding.snapshot();
    /// assert!(Shared::ptr_eq(&before, &after));
    /// ```
    pub fn bind<U, F>(&self, select: F) -> Binding<T, U>
    where
        U: PartialEq + 'static,
        F: Fn(&T) -> U + MaybeSendSync + 'static,
    {
        self.bind_with(select, equality::strict)
    }

    /// Returns a [`Binding`] which projects this store's state through `select` and
    /// compares successive projections with `equal`.
    ///
    /// `equal` should be an equivalence relation; the comparators in [`equality`] are
    /// suitable choices. When it returns `true`, the binding's consumer will keep seeing
    /// the previous snapshot.
    pub fn bind_with<U, F, E>(&self, select: F, equal: E) -> Binding<T, U>
    where
        U: 'static,
        F: Fn(&T) -> U + MaybeSendSync + 'static,
        E: Fn(&U, &U) -> bool + MaybeSendSync + 'static,
    {
        let select: DynSelector<T, U> = Box::new(select);
        let equal: DynComparator<U> = Box::new(equal);
        Binding {
            store: self.clone(),
            gate: Gate::new(select, equal),
        }
    }

    /// Returns a [`Binding`] over the entire state, unprojected.
    ///
    /// Successive snapshots share one allocation until the state compares unequal
    /// with `==`.
    pub fn binding(&self) -> Binding<T, T>
    where
        T: Clone + PartialEq,
    {
        self.bind(T::clone)
    }
}

impl<T: 'static, U> Binding<T, U> {
    /// Computes the current projection of the store's state.
    ///
    /// If the projection is equal (according to this binding's comparator) to the one
    /// previously returned, then the same [`Shared`] allocation is returned again, so
    /// consumers may use pointer comparison to decide whether anything changed.
    ///
    /// # Panics
    ///
    /// Panics if the underlying store has no value. Use [`Binding::try_snapshot()`] to
    /// handle that case.
    #[must_use]
    #[track_caller]
    pub fn snapshot(&self) -> Shared<U> {
        self.store.read(|state| self.gate.project(state))
    }

    /// Computes the current projection of the store's state, or [`None`] if the store
    /// has no value.
    #[must_use]
    pub fn try_snapshot(&self) -> Option<Shared<U>> {
        self.store.try_read(|state| self.gate.project(state))
    }

    /// Subscribes `wake` to the underlying store.
    ///
    /// The waker will be called on every committed state change, including changes this
    /// binding's projection filters out; the consumer is expected to respond by calling
    /// [`Binding::snapshot()`] and comparing pointers.
    #[must_use]
    pub fn subscribe(&self, wake: Wake) -> Subscription<T> {
        self.store.subscribe(wake)
    }

    /// Discards the remembered projection, so that the next [`Binding::snapshot()`]
    /// allocates afresh.
    pub fn reset(&self) {
        self.gate.reset();
    }

    /// Returns the store this binding reads from.
    #[must_use]
    pub fn store(&self) -> &Store<T> {
        &self.store
    }
}

impl<T: 'static, U> fmt::Debug for Binding<T, U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("state", &Unquote::type_name::<T>())
            .field("projection", &Unquote::type_name::<U>())
            .field("primed", &self.gate.remembered().is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------

/// The subscription seam a rendering framework consumes: a way to subscribe for
/// wake-ups and a way to take an immutable snapshot afterward.
///
/// The contract is:
///
/// * `snapshot()` must return equal (for [`Binding`], pointer-equal) values as long as
///   no change notification has been delivered since the previous call.
/// * `subscribe()` must arrange for the [`Wake`] to be called after every change, and
///   must stop doing so when the returned guard is dropped.
pub trait ExternalStore {
    /// The immutable value handed to the consumer. `Binding` uses [`Shared<U>`] so that
    /// snapshots are cheap to retain and compare.
    type Snapshot;

    /// Keeps the subscription alive; dropping it unsubscribes.
    type Guard;

    /// Returns the current snapshot.
    fn snapshot(&self) -> Self::Snapshot;

    /// Requests that `wake` be called after every subsequent change.
    fn subscribe(&self, wake: Wake) -> Self::Guard;
}

impl<T: 'static, U: 'static> ExternalStore for Binding<T, U> {
    type Snapshot = Shared<U>;
    type Guard = Subscription<T>;

    fn snapshot(&self) -> Self::Snapshot {
        Binding::snapshot(self)
    }

    fn subscribe(&self, wake: Wake) -> Self::Guard {
        Binding::subscribe(self, wake)
    }
}

// -------------------------------------------------------------------------------------------------
