use std::panic::{RefUnwindSafe, UnwindSafe};

use static_assertions::{assert_impl_all, assert_not_impl_any};

use storelet::{
    Binding, Flag, FlagListener, Log, LogListener, NullListener, Store, Subscription, Wake,
};

#[allow(dead_code, reason = "used only inside `const _` blocks")]
#[cfg(feature = "sync")]
const fn assert_send_sync_if_cfg<T: Send + Sync>() {}
#[allow(dead_code, reason = "used only inside `const _` blocks")]
#[cfg(not(feature = "sync"))]
const fn assert_send_sync_if_cfg<T>() {}

const _: () = {
    // All types of interest in the library are listed here, in alphabetical order.

    assert_send_sync_if_cfg::<Binding<i32, i32>>();

    // Flag is backed by an atomic and is thread-safe in every configuration.
    assert_impl_all!(Flag: Send, Sync);
    assert_impl_all!(FlagListener: Send, Sync, Clone);

    assert_send_sync_if_cfg::<Log<i32>>();
    assert_send_sync_if_cfg::<LogListener<i32>>();

    assert_impl_all!(NullListener: Send, Sync, Copy, RefUnwindSafe, UnwindSafe);

    assert_send_sync_if_cfg::<Store<i32>>();
    assert_send_sync_if_cfg::<Subscription<i32>>();
    assert_send_sync_if_cfg::<Wake>();

    #[cfg(feature = "sync")]
    {
        // A store whose state cannot cross threads must not either.
        assert_not_impl_any!(Store<*const ()>: Send, Sync);
        assert_not_impl_any!(Log<*const ()>: Send, Sync);
    }
    #[cfg(not(feature = "sync"))]
    {
        assert_not_impl_any!(Store<i32>: Send, Sync);
        assert_not_impl_any!(Subscription<i32>: Send, Sync);
        assert_not_impl_any!(Wake: Send, Sync);
    }
};
