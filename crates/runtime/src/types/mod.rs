//! The core types used in the Lute runtime

mod function;
mod iterator;
mod list;
mod map;
mod module;
mod native_function;
mod range;
mod string;
mod tagged;
mod tuple;
mod value;
mod value_key;

pub use self::{
    function::LFunction,
    iterator::{LIterator, LIteratorOutput, LuteIterator},
    list::{LList, ValueVec},
    map::{LMap, LuteHasher, ValueMap},
    module::Module,
    native_function::{CallContext, LNativeFunction, LuteFunction},
    range::LRange,
    string::LString,
    tagged::LTagged,
    tuple::LTuple,
    value::LValue,
    value_key::ValueKey,
};
