//! Comparator behavior as observed through [`Gate`], which is how consumers
//! actually meet these functions.

use std::rc::Rc;

use storelet::{equality, Gate, Shared};

#[test]
fn strict_gate_on_derived_values() {
    let gate = Gate::new(|&(a, b): &(i32, i32)| a + b, equality::strict);

    let first = gate.project(&(1, 2));
    // A different state with the same sum is "no change".
    let second = gate.project(&(0, 3));
    assert!(Shared::ptr_eq(&first, &second));

    let third = gate.project(&(2, 3));
    assert_eq!(*third, 5);
    assert!(!Shared::ptr_eq(&second, &third));
}

#[test]
fn identity_gate_distinguishes_equal_allocations() {
    let one = Rc::new("payload".to_owned());
    let other = Rc::new("payload".to_owned());

    let gate = Gate::new(Clone::clone, equality::identity);
    let first = gate.project(&one);
    assert!(Shared::ptr_eq(&first, &gate.project(&one.clone())));
    // Equal contents, different allocation: a change under identity.
    assert!(!Shared::ptr_eq(&first, &gate.project(&other)));
}

#[test]
fn shallow_gate_sees_one_level() {
    let item = Rc::new(1);
    let gate = Gate::new(Clone::clone, equality::shallow);

    let first = gate.project(&vec![item.clone()]);
    // Same element allocation in a freshly built Vec: shallow-equal.
    assert!(Shared::ptr_eq(&first, &gate.project(&vec![item])));
    // Different element allocation: a change.
    assert!(!Shared::ptr_eq(&first, &gate.project(&vec![Rc::new(1)])));
}

#[test]
fn json_gate_is_structural() {
    // The selector rebuilds its output on every projection; only the comparator
    // keeps the consumer's snapshot stable.
    let gate = Gate::new(
        |point: &(i32, i32)| vec![point.0, point.1],
        equality::json,
    );
    let first = gate.project(&(1, 2));
    assert!(Shared::ptr_eq(&first, &gate.project(&(1, 2))));
    assert!(!Shared::ptr_eq(&first, &gate.project(&(1, 3))));
}

/// A panic out of the comparator propagates to the caller, and the last *successful*
/// projection stays remembered.
#[test]
fn panicking_comparator_leaves_the_memory_in_place() {
    use std::panic::{catch_unwind, AssertUnwindSafe};

    let gate = Gate::new(
        |&n: &i32| n,
        |a: &i32, b: &i32| {
            if *b == 13 {
                panic!("deliberate failure");
            }
            a == b
        },
    );

    let first = gate.project(&1);
    assert!(catch_unwind(AssertUnwindSafe(|| gate.project(&13))).is_err());
    // The failed projection was not recorded, so an equal state still matches `first`.
    assert!(Shared::ptr_eq(&first, &gate.project(&1)));
}

#[test]
fn never_gate_always_reallocates() {
    let gate = Gate::new(|&n: &i32| n, equality::never);
    let first = gate.project(&1);
    let second = gate.project(&1);
    assert_eq!(first, second);
    assert!(!Shared::ptr_eq(&first, &second));
}
