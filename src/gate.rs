use core::fmt;

use crate::maybe_sync::{Mutex, Shared};
use crate::util::Unquote;

#[cfg(doc)]
use crate::Binding;

// -------------------------------------------------------------------------------------------------

/// A selector paired with a comparator and a memory of the last derived value.
///
/// [`project()`](Self::project) computes `select(state)` and compares the result against the
/// previously remembered value with `equal`. When the comparator declares equality, the
/// *previous* shared pointer is returned, so a consumer holding the last result can detect
/// "nothing relevant changed" with a cheap [`Shared::ptr_eq`] check even though the selector
/// allocated a fresh value. This is what lets a UI binding skip redundant re-renders.
///
/// The memory cell is private, per-gate state; two consumers using the same selector must
/// each own their own `Gate`. [`Binding`] creates one per call for exactly this reason.
///
/// The very first projection is always treated as changed and the comparator is not
/// consulted, so comparators never see a "no previous value" placeholder.
///
/// # Generic parameters
///
/// * `U` is the type of the derived value.
/// * `F` is the selector, a pure function from state to `U`.
/// * `E` is the comparator.
///
/// # Example
///
/// ```
/// use storelet::{equality, Gate, Shared};
///
/// let gate = Gate::new(|state: &(i32, i32)| state.0, equality::strict);
///
/// let first = gate.project(&(1, 2));
/// let second = gate.project(&(1, 3)); // projection unchanged
/// assert!(Shared::ptr_eq(&first, &second));
///
/// let third = gate.project(&(7, 3));
/// assert!(!Shared::ptr_eq(&first, &third));
/// assert_eq!(*third, 7);
/// ```
pub struct Gate<U, F, E> {
    select: F,
    equal: E,
    last: Mutex<Option<Shared<U>>>,
}

impl<U, F, E> Gate<U, F, E> {
    /// Constructs a [`Gate`] with no remembered value.
    #[must_use]
    pub fn new(select: F, equal: E) -> Self {
        Self {
            select,
            equal,
            last: Mutex::new(None),
        }
    }

    /// Computes the projection of `state`, returning the previously returned pointer
    /// whenever the comparator considers the newly computed value equal to it.
    ///
    /// Panics from the selector or the comparator propagate to the caller, and leave the
    /// remembered value unchanged.
    pub fn project<S>(&self, state: &S) -> Shared<U>
    where
        F: Fn(&S) -> U,
        E: Fn(&U, &U) -> bool,
    {
        let next = (self.select)(state);
        let mut last = self.last.lock();
        match &*last {
            Some(prev) if (self.equal)(prev, &next) => prev.clone(),
            _ => {
                let next = Shared::new(next);
                *last = Some(next.clone());
                next
            }
        }
    }

    /// Returns the remembered value, if any projection has been computed yet.
    #[must_use]
    pub fn remembered(&self) -> Option<Shared<U>> {
        self.last.lock().clone()
    }

    /// Forgets the remembered value, so the next [`project()`](Self::project) is treated
    /// as changed regardless of the comparator.
    pub fn reset(&self) {
        *self.last.lock() = None;
    }
}

impl<U, F, E> fmt::Debug for Gate<U, F, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate")
            // The type name of the selector may give a useful clue about which consumer
            // this gate belongs to, without printing the (possibly large) remembered value.
            .field("select", &Unquote::type_name::<F>())
            .field("primed", &self.last.lock().is_some())
            .finish()
    }
}

// -------------------------------------------------------------------------------------------------
