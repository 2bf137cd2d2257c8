use core::fmt;

use crate::maybe_sync::MaybeSendSync;
use crate::util::Unquote;

#[cfg(doc)]
use crate::{Binding, Store};

// -------------------------------------------------------------------------------------------------

/// A receiver of state-change notifications from a [`Store`].
///
/// A listener is invoked synchronously, after the new state has been committed, with a
/// reference to that state. It must not assume anything about which thread it is called on
/// beyond what the crate's `sync` feature flavor guarantees.
///
/// # Requirements on implementors
///
/// * Do not panic; a panicking listener aborts delivery to listeners later in the
///   registration order, starving them.
/// * Do not block, and do not acquire any locks other than ones used solely for the
///   listener's own state. In particular, calling [`Store::set()`] on the notifying store
///   from inside `receive()` is re-entrant mutation and should be avoided; reading via
///   [`Store::get()`] is permitted and observes the committed state.
///
/// The typical listener sets a dirty flag or enqueues a small message for later processing,
/// rather than doing real work during delivery; see [`Flag`](crate::Flag).
///
/// # Generic parameters
///
/// * `S` is the type of the state that will be received.
pub trait Listener<S>: fmt::Debug {
    /// Process the given post-update state.
    fn receive(&self, state: &S);

    /// Wraps this listener in the crate's type-erased, reference-counted form.
    ///
    /// The purpose of this method over simply calling `Rc::new()` or `Arc::new()` is that
    /// it will not rewrap a listener which is already type-erased.
    fn into_dyn_listener(self) -> DynListener<S>
    where
        Self: Sized + MaybeSendSync + 'static,
    {
        cfg_if::cfg_if! {
            if #[cfg(feature = "sync")] {
                alloc::sync::Arc::new(self)
            } else {
                alloc::rc::Rc::new(self)
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------

cfg_if::cfg_if! {
    if #[cfg(feature = "sync")] {
        /// Type-erased form of a [`Listener`] which receives states of type `S`.
        ///
        /// With the `sync` feature enabled this is an [`Arc`](alloc::sync::Arc) and requires
        /// the listener to be [`Send`] + [`Sync`]; without it, an [`Rc`](alloc::rc::Rc).
        pub type DynListener<S> = alloc::sync::Arc<dyn Listener<S> + Send + Sync>;
    } else {
        /// Type-erased form of a [`Listener`] which receives states of type `S`.
        ///
        /// With the `sync` feature enabled this is an [`Arc`](alloc::sync::Arc) and requires
        /// the listener to be [`Send`] + [`Sync`]; without it, an [`Rc`](alloc::rc::Rc).
        pub type DynListener<S> = alloc::rc::Rc<dyn Listener<S>>;
    }
}

/// Bound alias for the listener types accepted by [`Store::subscribe()`](Store::subscribe):
/// any `'static` [`Listener`] which meets the crate flavor's threading requirements.
///
/// Every suitable listener implements this automatically; it exists so that bounds need
/// not be written out per flavor.
pub trait IntoListener<S>: Listener<S> + MaybeSendSync + 'static {}

impl<S, L> IntoListener<S> for L where L: Listener<S> + MaybeSendSync + 'static {}

/// Delegates to the referent.
impl<S, L: Listener<S> + ?Sized> Listener<S> for alloc::boxed::Box<L> {
    fn receive(&self, state: &S) {
        (**self).receive(state)
    }
}

/// Delegates to the referent. Erasing an already-erased listener is a no-op rather than
/// a second layer of indirection.
impl<S> Listener<S> for DynListener<S> {
    fn receive(&self, state: &S) {
        (**self).receive(state)
    }

    fn into_dyn_listener(self) -> DynListener<S> {
        self
    }
}

// -------------------------------------------------------------------------------------------------

/// A [`Listener`] which discards all notifications.
///
/// Use this when a [`Listener`] is demanded, but there is nothing it should do.
#[expect(clippy::exhaustive_structs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct NullListener;

impl<S> Listener<S> for NullListener {
    fn receive(&self, _state: &S) {}
}

/// Tuples of listeners may be used to deliver each notification to multiple listeners
/// with static dispatch.
impl<S, L1, L2> Listener<S> for (L1, L2)
where
    L1: Listener<S>,
    L2: Listener<S>,
{
    fn receive(&self, state: &S) {
        self.0.receive(state);
        self.1.receive(state);
    }
}

// -------------------------------------------------------------------------------------------------

/// A [`Listener`] which delegates to a plain function (usually a closure).
///
/// Construct this using [`from_fn()`].
///
/// # Generic parameters
///
/// * `F` is the type of the function.
pub struct FnListener<F> {
    function: F,
}

/// Wraps a function so that it may be used as a [`Listener`];
/// the function receives a reference to each committed state.
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicI32, Ordering::Relaxed};
/// use std::sync::Arc;
/// use storelet::Store;
///
/// let store = Store::new(1);
/// let seen = Arc::new(AtomicI32::new(0));
/// let subscription = store.subscribe(storelet::from_fn({
///     let seen = seen.clone();
///     move |&state: &i32| seen.store(state, Relaxed)
/// }));
///
/// store.set(7);
/// assert_eq!(seen.load(Relaxed), 7);
/// # drop(subscription);
/// ```
pub fn from_fn<S, F: Fn(&S)>(function: F) -> FnListener<F> {
    FnListener { function }
}

impl<S, F: Fn(&S)> Listener<S> for FnListener<F> {
    fn receive(&self, state: &S) {
        (self.function)(state);
    }
}

impl<F> fmt::Debug for FnListener<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnListener")
            .field("function", &Unquote::type_name::<F>())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------

/// A type-erased re-render trigger: a callback taking no arguments.
///
/// This is the shape a hosting UI framework's external-store subscription primitive
/// hands over; it can be used directly as a [`Listener`] for any state type, which is
/// how [`Binding::subscribe()`](Binding) registers it.
pub struct Wake(WakeFn);

cfg_if::cfg_if! {
    if #[cfg(feature = "sync")] {
        type WakeFn = alloc::boxed::Box<dyn Fn() + Send + Sync>;
    } else {
        type WakeFn = alloc::boxed::Box<dyn Fn()>;
    }
}

impl Wake {
    /// Wraps the given callback.
    pub fn new<F: Fn() + MaybeSendSync + 'static>(function: F) -> Self {
        Self(alloc::boxed::Box::new(function))
    }

    /// Invokes the wrapped callback.
    pub fn wake(&self) {
        (self.0)()
    }
}

impl<S> Listener<S> for Wake {
    fn receive(&self, _state: &S) {
        (self.0)()
    }
}

impl fmt::Debug for Wake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wake")
    }
}

// -------------------------------------------------------------------------------------------------
