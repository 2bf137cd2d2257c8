use core::{fmt, ops};

// -------------------------------------------------------------------------------------------------

cfg_if::cfg_if! {
    if #[cfg(feature = "sync")] {
        /// Bound which is [`Send`] + [`Sync`] when the `sync` feature is enabled,
        /// and trivially satisfied when it is not.
        ///
        /// This lets listener and selector bounds be written once rather than per flavor.
        /// Every type implements it automatically; it is not meant to be implemented by hand.
        pub trait MaybeSendSync: Send + Sync {}
        impl<T: ?Sized + Send + Sync> MaybeSendSync for T {}
    } else {
        /// Bound which is [`Send`] + [`Sync`] when the `sync` feature is enabled,
        /// and trivially satisfied when it is not.
        ///
        /// This lets listener and selector bounds be written once rather than per flavor.
        /// Every type implements it automatically; it is not meant to be implemented by hand.
        pub trait MaybeSendSync {}
        impl<T: ?Sized> MaybeSendSync for T {}
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "sync")] {
        /// Reference-counted shared pointer: [`alloc::sync::Arc`] when the `sync` feature is
        /// enabled and [`alloc::rc::Rc`] when it is not.
        ///
        /// Appears in public signatures wherever the crate hands out a pointer whose identity
        /// is meaningful, such as [`Gate::project()`](crate::Gate::project) results.
        pub type Shared<T> = alloc::sync::Arc<T>;
        pub(crate) type WeakRef<T> = alloc::sync::Weak<T>;
    } else {
        /// Reference-counted shared pointer: [`alloc::sync::Arc`] when the `sync` feature is
        /// enabled and [`alloc::rc::Rc`] when it is not.
        ///
        /// Appears in public signatures wherever the crate hands out a pointer whose identity
        /// is meaningful, such as [`Gate::project()`](crate::Gate::project) results.
        pub type Shared<T> = alloc::rc::Rc<T>;
        pub(crate) type WeakRef<T> = alloc::rc::Weak<T>;
    }
}

// -------------------------------------------------------------------------------------------------

/// Wrapper around [`core::cell::RefCell`] or [`std::sync::Mutex`] depending on whether
/// the `sync` feature is enabled.
///
/// # Caution!
///
/// * This may or may not be `Sync`.
/// * Poisoning is absorbed rather than propagated.
/// * This may or may not deadlock if locked again from the same thread.
#[derive(Default)]
#[must_use]
pub(crate) struct Mutex<T: ?Sized>(InnerMutex<T>);

#[allow(missing_debug_implementations)]
#[must_use]
pub(crate) struct MutexGuard<'a, T: ?Sized>(InnerMutexGuard<'a, T>);

/// Wrapper around [`core::cell::RefCell`] or [`std::sync::RwLock`] depending on whether
/// the `sync` feature is enabled. Same cautions as [`Mutex`] apply.
#[derive(Default)]
#[must_use]
pub(crate) struct RwLock<T: ?Sized>(InnerRwLock<T>);

#[allow(missing_debug_implementations)]
#[must_use]
pub(crate) struct RwLockReadGuard<'a, T: ?Sized>(InnerRwLockReadGuard<'a, T>);
#[allow(missing_debug_implementations)]
#[must_use]
pub(crate) struct RwLockWriteGuard<'a, T: ?Sized>(InnerRwLockWriteGuard<'a, T>);

cfg_if::cfg_if! {
    if #[cfg(feature = "sync")] {
        type InnerMutex<T> = std::sync::Mutex<T>;
        type InnerMutexGuard<'a, T> = std::sync::MutexGuard<'a, T>;
        type InnerRwLock<T> = std::sync::RwLock<T>;
        type InnerRwLockReadGuard<'a, T> = std::sync::RwLockReadGuard<'a, T>;
        type InnerRwLockWriteGuard<'a, T> = std::sync::RwLockWriteGuard<'a, T>;
    } else {
        type InnerMutex<T> = core::cell::RefCell<T>;
        type InnerMutexGuard<'a, T> = core::cell::RefMut<'a, T>;
        type InnerRwLock<T> = core::cell::RefCell<T>;
        type InnerRwLockReadGuard<'a, T> = core::cell::Ref<'a, T>;
        type InnerRwLockWriteGuard<'a, T> = core::cell::RefMut<'a, T>;
    }
}

impl<T> Mutex<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self(InnerMutex::new(value))
    }
}

impl<T: ?Sized> Mutex<T> {
    /// Locks unconditionally. Poison, where it exists, is cleared rather than propagated,
    /// because listeners are required not to panic on account of other listeners' failures.
    pub(crate) fn lock(&self) -> MutexGuard<'_, T> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "sync")] {
                let guard = self.0.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
            } else {
                let guard = self.0.borrow_mut();
            }
        }
        MutexGuard(guard)
    }
}

impl<T> RwLock<T> {
    pub(crate) const fn new(value: T) -> Self {
        Self(InnerRwLock::new(value))
    }
}

impl<T: ?Sized> RwLock<T> {
    pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "sync")] {
                let guard = self.0.read().unwrap_or_else(std::sync::PoisonError::into_inner);
            } else {
                let guard = self.0.borrow();
            }
        }
        RwLockReadGuard(guard)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "sync")] {
                let guard = self.0.write().unwrap_or_else(std::sync::PoisonError::into_inner);
            } else {
                let guard = self.0.borrow_mut();
            }
        }
        RwLockWriteGuard(guard)
    }

    /// Non-blocking read for use in [`fmt::Debug`] implementations only.
    pub(crate) fn try_read(&self) -> Option<RwLockReadGuard<'_, T>> {
        cfg_if::cfg_if! {
            if #[cfg(feature = "sync")] {
                let result = match self.0.try_read() {
                    Ok(guard) => Some(guard),
                    Err(std::sync::TryLockError::Poisoned(e)) => Some(e.into_inner()),
                    Err(std::sync::TryLockError::WouldBlock) => None,
                };
            } else {
                let result = self.0.try_borrow().ok();
            }
        }
        result.map(RwLockReadGuard)
    }
}

impl<T: ?Sized + fmt::Debug> fmt::Debug for Mutex<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl<T: ?Sized + fmt::Debug> fmt::Debug for RwLock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<T: ?Sized> ops::Deref for MutexGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T: ?Sized> ops::DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
impl<T: ?Sized> ops::Deref for RwLockReadGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T: ?Sized> ops::Deref for RwLockWriteGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl<T: ?Sized> ops::DerefMut for RwLockWriteGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}
