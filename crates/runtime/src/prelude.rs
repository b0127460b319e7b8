//! A collection of useful items to make it easier to work with `lute_runtime`

#[doc(inline)]
pub use crate::{
    CallContext, DisplayContext, Error, Heap, LFunction, LIterator, LIteratorOutput, LList, LMap,
    LNativeFunction, LRange, LString, LTagged, LTuple, LValue, LuteFunction, LuteHasher,
    LuteIterator, LuteSend, LuteSync, Module, Result, ValueKey, ValueMap, ValueType, ValueVec,
    bridge::{FromValue, IntoCallResult},
    make_ptr, make_ptr_mut, runtime_error, unexpected_type, unexpected_type_with_slice,
};
