//! Memory management utilities for the Lute runtime
//!
//! The runtime's value cells are reference counted, with runtime-checked borrows for
//! mutable cells. Cycle reclamation is layered on top by the runtime's heap, which keeps
//! a registry of [WeakPtr] handles to the cells it has allocated and breaks unreachable
//! cycles during collection.
//!
//! Making custom GC types that support trait objects or other DSTs is currently only
//! possible with nightly Rust, while the stabilization of DST custom coercions is pending [^1].
//! Until then, alternative implementations of `Ptr` and `PtrMut` could be introduced with a
//! nightly-only feature.
//!
//! [^1] <https://github.com/rust-lang/rust/issues/18598>

#![warn(missing_docs)]

#[cfg(all(feature = "arc", feature = "rc"))]
compile_error!("A single memory management feature can be enabled at a time");

#[cfg(not(any(feature = "arc", feature = "rc")))]
compile_error!("Either the arc or the rc memory management feature must be enabled");

mod address;
mod ptr;
mod ptr_impl;
mod ptr_mut;

pub use address::Address;
pub use ptr::{Ptr, WeakPtr};
pub use ptr_mut::{Borrow, BorrowMut, LCell, PtrMut, WeakPtrMut};
