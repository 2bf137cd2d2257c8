use pretty_assertions::assert_eq;

use storelet::{from_fn, DynListener, Flag, Listener as _, Log, Store};

/// The spine of the library, end to end: set, subscribe, observe, unsubscribe.
#[test]
fn store_lifecycle() {
    let _ = env_logger::builder().is_test(true).try_init();

    let store = Store::new("initial");
    let log: Log<&str> = Log::new();
    let subscription = store.subscribe(log.listener());

    assert_eq!(store.get(), "initial");
    assert_eq!(log.drain(), Vec::<&str>::new());

    store.set("second");
    store.set("third");
    assert_eq!(store.get(), "third");
    assert_eq!(log.drain(), vec!["second", "third"]);

    subscription.unsubscribe();
    store.set("fourth");
    assert_eq!(store.get(), "fourth");
    assert_eq!(log.drain(), Vec::<&str>::new());
}

#[test]
fn dropping_the_subscription_unsubscribes() {
    let store = Store::new(0);
    let (flag, subscription) = Flag::listening(false, &store);
    assert_eq!(store.listener_count(), 1);

    drop(subscription);
    assert_eq!(store.listener_count(), 0);
    store.set(1);
    assert_eq!(flag.get_and_clear(), false);
}

#[test]
fn detached_subscription_outlives_its_guard() {
    let store = Store::new(0);
    let (flag, subscription) = Flag::listening(false, &store);
    subscription.detach();

    store.set(1);
    assert_eq!(flag.get_and_clear(), true);
}

#[test]
fn unsubscribe_is_idempotent() {
    let store = Store::new(0);
    let log: Log<i32> = Log::new();
    let subscription = store.subscribe(log.listener());

    subscription.unsubscribe();
    subscription.unsubscribe();
    drop(subscription); // unsubscribes a third time
    assert_eq!(store.listener_count(), 0);
}

/// Dead listeners are harmless; the registry just keeps delivering into the void.
/// (Compaction of dead entries is the [`Subscription`]'s job, not the listener's.)
#[test]
fn dropped_listener_target_is_tolerated() {
    let store = Store::new(0);
    let log: Log<i32> = Log::new();
    store.subscribe(log.listener()).detach();

    drop(log);
    store.set(1); // must not panic
}

/// Listeners may re-enter the store they are subscribed to.
#[test]
fn listener_may_reenter_the_store() {
    let store: Store<i32> = Store::new(0);
    let log: Log<i32> = Log::new();
    store
        .subscribe(from_fn({
            let observer = store.clone();
            let log_listener = log.listener();
            move |state: &i32| {
                // get() during delivery sees the committed state.
                assert_eq!(observer.get(), *state);
                // and subscribing during delivery is permitted.
                observer.subscribe(log_listener.clone()).detach();
            }
        }))
        .detach();

    store.set(1);
    assert_eq!(store.listener_count(), 2);
    store.set(2);
    assert_eq!(store.listener_count(), 3);
    assert_eq!(log.drain(), vec![2]);
}

/// A panicking listener aborts the remainder of the current fan-out and the panic
/// propagates to the `set()` caller, but the commit itself is unaffected.
#[test]
fn panicking_listener_aborts_delivery_but_not_the_commit() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let store = Store::new(0);
    let notified_before: Log<i32> = Log::new();
    let notified_after: Log<i32> = Log::new();
    store.subscribe(notified_before.listener()).detach();
    store
        .subscribe(from_fn(|&state: &i32| {
            if state == 1 {
                panic!("deliberate failure");
            }
        }))
        .detach();
    store.subscribe(notified_after.listener()).detach();

    assert!(catch_unwind(AssertUnwindSafe(|| store.set(1))).is_err());

    // The state was committed before delivery began; the listener registered before the
    // faulty one saw it, and the one registered after it was starved.
    assert_eq!(store.get(), 1);
    assert_eq!(notified_before.drain(), vec![1]);
    assert_eq!(notified_after.drain(), Vec::<i32>::new());

    // The store remains usable, and the next delivery runs in full.
    store.set(2);
    assert_eq!(notified_before.drain(), vec![2]);
    assert_eq!(notified_after.drain(), vec![2]);
}

/// An already-erased listener is still a listener, so it can be subscribed to a second
/// store (or the same one again).
#[test]
fn erased_listener_can_be_resubscribed() {
    let log: Log<i32> = Log::new();
    let listener: DynListener<i32> = log.listener().into_dyn_listener();

    let store_a = Store::new(0);
    let store_b = Store::new(0);
    store_a.subscribe(listener.clone()).detach();
    store_b.subscribe(listener).detach();

    store_a.set(1);
    store_b.set(2);
    assert_eq!(log.drain(), vec![1, 2]);
}

#[cfg(feature = "sync")]
#[test]
fn store_is_usable_across_threads() {
    let store = Store::new(0u32);
    let (flag, subscription) = Flag::listening(false, &store);

    let handles: Vec<std::thread::JoinHandle<()>> = (1..=4)
        .map(|thread_number| {
            let store = store.clone();
            std::thread::spawn(move || {
                for _ in 0..100 {
                    store.set(thread_number);
                    let _ = store.get();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // set() is atomic but last-write-wins; we only know *some* thread's write survived.
    assert!((1..=4).contains(&store.get()));
    assert_eq!(flag.get_and_clear(), true);
    drop(subscription);
}
