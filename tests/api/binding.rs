use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};
use std::sync::Arc;

use pretty_assertions::assert_eq;

use storelet::{equality, ExternalStore, Shared, Store, Wake};

#[derive(Clone, Debug, PartialEq)]
struct Todo {
    title: String,
    done: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct App {
    todos: Vec<Todo>,
    filter: &'static str,
}

fn sample_app() -> App {
    App {
        todos: vec![
            Todo {
                title: "water plants".to_owned(),
                done: false,
            },
            Todo {
                title: "file taxes".to_owned(),
                done: true,
            },
        ],
        filter: "all",
    }
}

/// The render loop that a UI framework's external-store hook performs:
/// wake → snapshot → pointer-compare → re-render only on change.
#[test]
fn simulated_render_loop() {
    let store = Store::new(sample_app());
    let binding = store.bind(|app: &App| {
        app.todos
            .iter()
            .filter(|todo| !todo.done)
            .map(|todo| todo.title.clone())
            .collect::<Vec<String>>()
    });

    let woken = Arc::new(AtomicUsize::new(0));
    let _guard = binding.subscribe(Wake::new({
        let woken = woken.clone();
        move || {
            woken.fetch_add(1, Relaxed);
        }
    }));

    let mut renders = 0;
    let mut last = binding.snapshot();
    renders += 1;
    assert_eq!(*last, vec!["water plants".to_owned()]);

    let mut pump = |binding: &storelet::Binding<App, Vec<String>>, renders: &mut i32| {
        let next = binding.snapshot();
        if !Shared::ptr_eq(&next, &last) {
            *renders += 1;
            last = next;
        }
    };

    // Changing the filter wakes the consumer but produces an equal projection,
    // so the snapshot is pointer-identical and no re-render happens.
    store.update(|app| App {
        filter: "active",
        ..app.clone()
    });
    assert_eq!(woken.load(Relaxed), 1);
    pump(&binding, &mut renders);
    assert_eq!(renders, 1);

    // Completing a todo changes the projection.
    store.update(|app| {
        let mut app = app.clone();
        app.todos[0].done = true;
        app
    });
    assert_eq!(woken.load(Relaxed), 2);
    pump(&binding, &mut renders);
    assert_eq!(renders, 2);
    assert_eq!(*last, Vec::<String>::new());
}

/// Two bindings over the same store keep independent memories.
#[test]
fn bindings_are_independent_consumers() {
    let store = Store::new((1, 2));
    let first = store.bind(|&(a, _): &(i32, i32)| a);
    let second = store.bind(|&(_, b): &(i32, i32)| b);

    let first_before = first.snapshot();
    let second_before = second.snapshot();

    store.set((1, 99));
    assert!(Shared::ptr_eq(&first_before, &first.snapshot()));
    assert!(!Shared::ptr_eq(&second_before, &second.snapshot()));
}

/// Snapshots reflect writes even when no consumer was woken in between,
/// because projection happens at read time.
#[test]
fn snapshot_without_subscription() {
    let store = Store::new(10);
    let binding = store.bind(|&n: &i32| n * 2);

    assert_eq!(*binding.snapshot(), 20);
    store.set(11);
    assert_eq!(*binding.snapshot(), 22);
}

#[test]
fn structural_comparator_ignores_fresh_allocations() {
    let store = Store::new(vec![1, 2, 3]);
    // The selector allocates a fresh Vec every time it runs; under a structural
    // comparator the consumer still sees one stable snapshot.
    let binding = store.bind_with(|v: &Vec<i32>| v.clone(), equality::json);

    let before = binding.snapshot();
    store.set(vec![1, 2, 3]);
    assert!(Shared::ptr_eq(&before, &binding.snapshot()));

    store.set(vec![1, 2, 3, 4]);
    assert!(!Shared::ptr_eq(&before, &binding.snapshot()));
}

#[test]
fn identity_comparator_tracks_allocations() {
    let shared_list: Shared<Vec<i32>> = Shared::new(vec![1, 2, 3]);
    let store = Store::new(shared_list.clone());
    let binding = store.bind_with(|v: &Shared<Vec<i32>>| v.clone(), equality::identity);

    let before = binding.snapshot();
    store.set(shared_list); // same allocation, no new snapshot
    assert!(Shared::ptr_eq(&before, &binding.snapshot()));

    store.set(Shared::new(vec![1, 2, 3])); // equal contents, different allocation
    assert!(!Shared::ptr_eq(&before, &binding.snapshot()));
}

/// A renderer written against [`ExternalStore`] accepts any conforming view.
#[test]
fn generic_over_external_store() {
    fn mount<V>(view: &V) -> (V::Snapshot, V::Guard)
    where
        V: ExternalStore,
    {
        let guard = view.subscribe(Wake::new(|| {}));
        (view.snapshot(), guard)
    }

    let store = Store::new(5);
    let binding = store.binding();
    let (snapshot, guard) = mount(&binding);
    assert_eq!(*snapshot, 5);
    assert_eq!(store.listener_count(), 1);
    drop(guard);
    assert_eq!(store.listener_count(), 0);
}
