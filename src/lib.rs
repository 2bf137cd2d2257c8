//! Minimal external state container with change notification, designed for driving
//! component-based UIs but usable anywhere a small shared value needs observers.
//!
//! The building blocks are:
//!
//! * [`Store`], a shared, subscribable container for a single state value.
//! * [`Listener`], the trait by which subscribers receive committed states, along with
//!   adapters such as [`from_fn()`], [`Flag`], and [`Log`].
//! * [`Gate`] and [`Binding`], which project the state through a selector and compare
//!   successive projections so consumers only see (and only reallocate for) meaningful
//!   changes.
//! * [`equality`], a small library of comparator functions for use with gates and
//!   bindings.
//! * [`ExternalStore`], the subscribe-and-snapshot seam a rendering framework consumes.
//!
//! # Example
//!
//! ```
//! use storelet::{Shared, Store};
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Session { user: &'static str, clicks: u32 }
//!
//! let store = Store::new(Session { user: "alice", clicks: 0 });
//! let user = store.bind(|s: &Session| s.user);
//!
//! let before: Shared<&str> = user.snapshot();
//! store.update(|s| Session { clicks: s.clicks + 1, ..s.clone() });
//!
//! // The user projection did not change, so the snapshot allocation is reused.
//! assert!(Shared::ptr_eq(&before, &user.snapshot()));
//! ```
//!
//! # Crate feature flags
//!
//! All features are disabled by default.
//!
//! * `"std"`: Requires the standard library. Provides comparator impls for std
//!   collection types.
//! * `"sync"`: Requires the standard library and enables `"std"`.
//!   When enabled, the shared pointer type is [`Arc`](alloc::sync::Arc) rather than
//!   [`Rc`](alloc::rc::Rc), listeners must be [`Send`] and [`Sync`], and stores may be
//!   shared between threads.

#![no_std]
//
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(explicit_outlives_requirements)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(redundant_lifetimes)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unnameable_types)]
#![warn(unused_extern_crates)]
#![warn(unused_lifetimes)]
#![warn(unreachable_pub)]
#![warn(
    clippy::alloc_instead_of_core,
    clippy::std_instead_of_core,
    clippy::std_instead_of_alloc
)]
#![warn(clippy::assigning_clones)]
#![warn(clippy::doc_markdown)]
#![warn(clippy::exhaustive_enums)]
#![warn(clippy::exhaustive_structs)]
#![warn(clippy::inconsistent_struct_constructor)]
#![warn(clippy::manual_let_else)]
#![warn(clippy::missing_panics_doc)]
#![warn(clippy::pedantic)]
#![warn(clippy::return_self_not_must_use)]
#![warn(clippy::should_panic_without_expect)]
#![warn(clippy::unnecessary_self_imports)]
#![warn(clippy::unnecessary_wraps)]
#![allow(clippy::bool_assert_comparison, reason = "less legible")]
#![allow(clippy::explicit_auto_deref)]
#![allow(clippy::semicolon_if_nothing_returned, reason = "explicit delegation")]
#![allow(
    clippy::module_name_repetitions,
    reason = "all types are re-exported from the crate root"
)]
#![cfg_attr(test, allow(clippy::arc_with_non_send_sync))]

// -------------------------------------------------------------------------------------------------

extern crate alloc;

#[cfg(any(feature = "std", test))]
extern crate std;

// -------------------------------------------------------------------------------------------------

mod binding;
pub use binding::{Binding, ExternalStore};

pub mod equality;

mod gate;
pub use gate::Gate;

mod listener;
pub use listener::{from_fn, DynListener, FnListener, IntoListener, Listener, NullListener, Wake};

mod maybe_sync;
pub use maybe_sync::{MaybeSendSync, Shared};

mod observers;
pub use observers::{Flag, FlagListener, Log, LogListener};

mod registry;
pub use registry::Subscription;

mod store;
pub use store::Store;

mod util;
