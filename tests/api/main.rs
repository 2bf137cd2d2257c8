#![allow(clippy::bool_assert_comparison, reason = "less legible")]
#![allow(clippy::arc_with_non_send_sync)]

mod binding;
mod equality;
mod static_properties;
mod store;
