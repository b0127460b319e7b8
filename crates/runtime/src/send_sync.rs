//! Definitions of Send and Sync used in the Lute runtime
//!
//! When Lute is being used in a single-threaded context [LuteSend] and [LuteSync] are empty
//! traits implemented for all types.

#[cfg(feature = "rc")]
mod traits {
    /// An empty trait for single-threaded contexts, implemented for all types
    pub trait LuteSend {}
    impl<T> LuteSend for T {}

    /// An empty trait for single-threaded contexts, implemented for all types
    pub trait LuteSync {}
    impl<T> LuteSync for T {}
}

#[cfg(not(feature = "rc"))]
mod traits {
    pub use std::marker::{Send as LuteSend, Sync as LuteSync};
}

pub use traits::*;
