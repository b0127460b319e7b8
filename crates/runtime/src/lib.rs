//! Contains the value runtime for the Lute language
//!
//! The runtime is driven by external collaborators: the compiler produces [Module]s whose
//! constants are [LValue]s, the instruction dispatcher calls into [ops] and [cast], and
//! host embedders marshal values through the [bridge] traits. The values themselves live
//! in a [Heap], which layers cycle collection over the reference-counted cells provided
//! by `lute_memory`.

#![warn(missing_docs)]

mod display_context;
mod error;
mod heap;
mod send_sync;
mod types;

pub mod bridge;
pub mod cast;
pub mod ops;
pub mod prelude;

pub use crate::{
    cast::ValueType,
    display_context::DisplayContext,
    error::{Error, Result, unexpected_type, unexpected_type_with_slice},
    heap::{Heap, trace_children},
    send_sync::{LuteSend, LuteSync},
    types::{
        CallContext, LFunction, LIterator, LIteratorOutput, LList, LMap, LNativeFunction, LRange,
        LString, LTagged, LTuple, LValue, LuteFunction, LuteHasher, LuteIterator, Module,
        ValueKey, ValueMap, ValueVec,
    },
};
pub use lute_memory::{Borrow, BorrowMut, Ptr, PtrMut, WeakPtr, WeakPtrMut, make_ptr, make_ptr_mut};
