use alloc::sync::{Arc, Weak};
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::maybe_sync::{Mutex, Shared, WeakRef};
use crate::util::Unquote;
use crate::{Listener, Store, Subscription};

// -------------------------------------------------------------------------------------------------

/// A [`Listener`] destination which records only whether any notification has arrived,
/// until cleared.
///
/// It is implemented as a shared [`AtomicBool`], so it is [`Send`] and [`Sync`] regardless
/// of whether the `sync` crate feature is enabled. This is the minimal well-behaved
/// re-render request accumulator: a renderer checks (and clears) the flag on its own
/// schedule instead of doing work during delivery.
///
/// The atomic orderings used are [`Release`](Ordering::Release) for setting the flag, and
/// [`Acquire`](Ordering::Acquire) for reading and clearing it, so if the notification is
/// carried across threads then the recipient can rely on seeing effects that happened
/// before the flag was set.
pub struct Flag {
    shared: Arc<AtomicBool>,
}

/// [`Flag::listener()`] implementation.
#[derive(Clone)]
pub struct FlagListener {
    weak: Weak<AtomicBool>,
}

impl Flag {
    const SET_ORDERING: Ordering = Ordering::Release;
    const GET_CLEAR_ORDERING: Ordering = Ordering::Acquire;

    /// Constructs a new [`Flag`] with the given initial value.
    ///
    /// ```
    /// # use storelet::Flag;
    /// assert_eq!(Flag::new(false).get_and_clear(), false);
    /// assert_eq!(Flag::new(true).get_and_clear(), true);
    /// ```
    #[must_use]
    pub fn new(value: bool) -> Self {
        Self {
            shared: Arc::new(AtomicBool::new(value)),
        }
    }

    /// Constructs a new [`Flag`] already subscribed to the given store.
    ///
    /// This is a convenience for calling `new()` followed by `listener()` and
    /// [`Store::subscribe()`]. Drop or detach the returned [`Subscription`] as appropriate.
    ///
    /// ```
    /// use storelet::{Flag, Store};
    ///
    /// let store = Store::new(0);
    /// let (flag, subscription) = Flag::listening(false, &store);
    ///
    /// store.set(1);
    /// assert_eq!(flag.get_and_clear(), true);
    /// # drop(subscription);
    /// ```
    #[must_use]
    pub fn listening<T: 'static>(value: bool, store: &Store<T>) -> (Self, Subscription<T>) {
        let new_self = Self::new(value);
        let subscription = store.subscribe(new_self.listener());
        (new_self, subscription)
    }

    /// Returns a [`Listener`] which will set this flag to [`true`] whenever it receives
    /// a notification.
    #[must_use]
    pub fn listener(&self) -> FlagListener {
        FlagListener {
            weak: Arc::downgrade(&self.shared),
        }
    }

    /// Returns the flag value, setting it to [`false`] at the same time.
    #[allow(clippy::must_use_candidate)]
    #[inline]
    pub fn get_and_clear(&self) -> bool {
        self.shared.swap(false, Self::GET_CLEAR_ORDERING)
    }

    /// Sets the flag value to [`true`], as if a notification had been received.
    ///
    /// This may be useful when the caller of `get_and_clear()` realizes it cannot actually
    /// complete its work, but wants to try again later.
    #[inline]
    pub fn set(&self) {
        self.shared.store(true, Self::SET_ORDERING);
    }
}

impl<S> Listener<S> for FlagListener {
    fn receive(&self, _state: &S) {
        if let Some(cell) = self.weak.upgrade() {
            cell.store(true, Flag::SET_ORDERING);
        }
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never multiline
        write!(f, "Flag({:?})", self.shared.load(Ordering::Relaxed))
    }
}
impl fmt::Debug for FlagListener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let strong = self.weak.upgrade();

        let mut ds = f.debug_struct("FlagListener");
        ds.field("alive", &strong.is_some());
        if let Some(strong) = strong {
            ds.field("value", &(strong.load(Ordering::Relaxed)));
        }
        ds.finish()
    }
}

// -------------------------------------------------------------------------------------------------

/// A [`Listener`] destination which records every state it observes.
///
/// This is only intended for testing; real listeners should not unboundedly accumulate
/// clones of the state.
///
/// # Generic parameters
///
/// * `S` is the type of the observed states.
pub struct Log<S>(Shared<Mutex<Vec<S>>>);

/// [`Log::listener()`] implementation.
///
/// # Generic parameters
///
/// * `S` is the type of the observed states.
pub struct LogListener<S>(WeakRef<Mutex<Vec<S>>>);

impl<S> Log<S> {
    /// Constructs a new empty [`Log`].
    #[must_use]
    pub fn new() -> Self {
        Self(Shared::new(Mutex::new(Vec::new())))
    }

    /// Returns a [`Listener`] which records the states it receives in this `Log`.
    #[must_use]
    pub fn listener(&self) -> LogListener<S> {
        LogListener(Shared::downgrade(&self.0))
    }

    /// Removes and returns all states recorded so far.
    ///
    /// ```
    /// use storelet::{Log, Store};
    ///
    /// let store = Store::new(1);
    /// let log: Log<i32> = Log::new();
    /// let subscription = store.subscribe(log.listener());
    ///
    /// store.set(2);
    /// store.set(3);
    /// assert_eq!(log.drain(), vec![2, 3]);
    /// assert_eq!(log.drain(), Vec::<i32>::new());
    /// # drop(subscription);
    /// ```
    #[must_use]
    pub fn drain(&self) -> Vec<S> {
        self.0.lock().drain(..).collect()
    }
}

impl<S: Clone> Listener<S> for LogListener<S> {
    fn receive(&self, state: &S) {
        if let Some(strong) = self.0.upgrade() {
            strong.lock().push(state.clone());
        }
    }
}

impl<S> Default for Log<S> {
    // This implementation cannot be derived because we do not want S: Default
    fn default() -> Self {
        Self::new()
    }
}

impl<S: fmt::Debug> fmt::Debug for Log<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Log(store) = self;
        f.debug_tuple("Log").field(&*store.lock()).finish()
    }
}

impl<S> fmt::Debug for LogListener<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogListener")
            .field("type", &Unquote::type_name::<S>())
            .field("alive", &(self.0.strong_count() > 0))
            .finish()
    }
}

impl<S> Clone for LogListener<S> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

// -------------------------------------------------------------------------------------------------
