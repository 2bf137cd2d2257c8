//! Comparators for deciding whether a derived value "changed".
//!
//! The functions here all have the shape `fn(&U, &U) -> bool` expected by
//! [`Gate`](crate::Gate) and [`Store::bind_with()`](crate::Store::bind_with):
//!
//! * [`strict`] — ordinary value equality via [`PartialEq`]; the default used by
//!   [`Store::bind()`](crate::Store::bind).
//! * [`identity`] — the strictest meaningful comparison: shared pointers by address,
//!   floats by bit pattern (`NaN` is identical to itself; `0.0` and `-0.0` are not),
//!   other primitives by value.
//! * [`shallow`] — identity applied one level deep into a collection, and no deeper.
//! * [`json`] — equal iff the serialized representations are textually identical.
//! * [`never`] / [`always`] — force or suppress every change report.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::rc::Rc;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

// -------------------------------------------------------------------------------------------------
// Comparator functions.

/// Value equality: `a == b`.
pub fn strict<T: PartialEq>(a: &T, b: &T) -> bool {
    a == b
}

/// Identity equality; see [`IdentityEq`].
pub fn identity<T: IdentityEq + ?Sized>(a: &T, b: &T) -> bool {
    a.identity_eq(b)
}

/// Shallow equality; see [`ShallowEq`].
pub fn shallow<T: ShallowEq + ?Sized>(a: &T, b: &T) -> bool {
    a.shallow_eq(b)
}

/// Serialization equality: the two values' JSON representations are textually identical.
///
/// Caveats, which are inherent to the approach and not defects to design around silently:
/// map types whose iteration order is nondeterministic may serialize unequal despite equal
/// contents, and values a serializer cannot represent are compared by whatever the
/// serializer does emit. A value which fails to serialize compares unequal to everything,
/// including itself.
pub fn json<T: serde::Serialize + ?Sized>(a: &T, b: &T) -> bool {
    match (serde_json::to_string(a), serde_json::to_string(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Reports every pair as unequal, forcing a change report on every projection.
pub fn never<T: ?Sized>(_: &T, _: &T) -> bool {
    false
}

/// Reports every pair as equal, so a gated consumer never observes a new projection
/// after its first one.
pub fn always<T: ?Sized>(_: &T, _: &T) -> bool {
    true
}

// -------------------------------------------------------------------------------------------------

/// Identity comparison: are these two values *the same thing*, rather than merely equal?
///
/// For shared pointers this is address equality ([`Rc::ptr_eq`]/[`Arc::ptr_eq`]); for
/// floats, bit-pattern equality, which unlike IEEE 754 `==` makes `NaN` identical to itself
/// and distinguishes `0.0` from `-0.0`; for the remaining primitives and strings, identity
/// and value equality coincide.
///
/// There is deliberately no implementation for general structs or collections: a freshly
/// built aggregate is never *the same thing* as another, which is exactly the distinction
/// [`shallow`] and [`strict`] exist to relax.
pub trait IdentityEq {
    /// Returns whether `self` and `other` are identical.
    fn identity_eq(&self, other: &Self) -> bool;
}

/// Identity applied one level deep: collections match when they have the same shape and
/// every directly contained value is [identical](IdentityEq). Never recursive — two maps
/// holding structurally equal but separately allocated values compare unequal.
pub trait ShallowEq {
    /// Returns whether `self` and `other` are equal one level deep.
    fn shallow_eq(&self, other: &Self) -> bool;
}

// For scalar types, identity, shallow, and value equality all coincide.
macro_rules! eq_by_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl IdentityEq for $t {
                fn identity_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
            impl ShallowEq for $t {
                fn shallow_eq(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    }
}
eq_by_value!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    str,
    String,
);

macro_rules! eq_by_bits {
    ($($t:ty),* $(,)?) => {
        $(
            impl IdentityEq for $t {
                fn identity_eq(&self, other: &Self) -> bool {
                    self.to_bits() == other.to_bits()
                }
            }
            impl ShallowEq for $t {
                fn shallow_eq(&self, other: &Self) -> bool {
                    self.identity_eq(other)
                }
            }
        )*
    }
}
eq_by_bits!(f32, f64);

impl<T: ?Sized> IdentityEq for Rc<T> {
    fn identity_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}
impl<T: ?Sized> IdentityEq for Arc<T> {
    fn identity_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}
impl<T: ?Sized> ShallowEq for Rc<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(self, other)
    }
}
impl<T: ?Sized> ShallowEq for Arc<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: IdentityEq + ?Sized> IdentityEq for &T {
    fn identity_eq(&self, other: &Self) -> bool {
        T::identity_eq(self, other)
    }
}
impl<T: ShallowEq + ?Sized> ShallowEq for &T {
    fn shallow_eq(&self, other: &Self) -> bool {
        T::shallow_eq(self, other)
    }
}

impl<T: IdentityEq> IdentityEq for Option<T> {
    fn identity_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (None, None) => true,
            (Some(a), Some(b)) => a.identity_eq(b),
            _ => false,
        }
    }
}
impl<T: IdentityEq> ShallowEq for Option<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.identity_eq(other)
    }
}

// -------------------------------------------------------------------------------------------------
// One-level collection comparisons.

impl<T: IdentityEq> ShallowEq for [T] {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.identity_eq(b))
    }
}
impl<T: IdentityEq> ShallowEq for Vec<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.as_slice().shallow_eq(other.as_slice())
    }
}

impl<K: Ord, V: IdentityEq> ShallowEq for BTreeMap<K, V> {
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|((ka, va), (kb, vb))| ka == kb && va.identity_eq(vb))
    }
}

impl<T: Ord> ShallowEq for BTreeSet<T> {
    fn shallow_eq(&self, other: &Self) -> bool {
        // Set membership; elements compare as themselves, there is no deeper level.
        self == other
    }
}

#[cfg(feature = "std")]
impl<K, V, S> ShallowEq for std::collections::HashMap<K, V, S>
where
    K: core::hash::Hash + Eq,
    V: IdentityEq,
    S: core::hash::BuildHasher,
{
    fn shallow_eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .all(|(k, va)| other.get(k).is_some_and(|vb| va.identity_eq(vb)))
    }
}

#[cfg(feature = "std")]
impl<T, S> ShallowEq for std::collections::HashSet<T, S>
where
    T: core::hash::Hash + Eq,
    S: core::hash::BuildHasher,
{
    fn shallow_eq(&self, other: &Self) -> bool {
        self == other
    }
}

// -------------------------------------------------------------------------------------------------
