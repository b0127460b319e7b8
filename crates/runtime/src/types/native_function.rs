use crate::{Heap, LValue, LuteSend, LuteSync, Ptr, Result, make_ptr, runtime_error};
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// A trait for native functions used by the Lute runtime
pub trait LuteFunction:
    Fn(&mut CallContext) -> Result<LValue> + LuteSend + LuteSync + 'static
{
}

impl<T> LuteFunction for T where
    T: Fn(&mut CallContext) -> Result<LValue> + LuteSend + LuteSync + 'static
{
}

/// A function that's defined outside of the Lute runtime
///
/// Native functions carry their expected argument count, which is checked when the
/// function is called. Method-style natives (like `list.append`) additionally carry the
/// receiver they were resolved on, which is handed to the implementation through
/// [CallContext::instance] and traversed by the collector like any other reference.
///
/// See [LValue::NativeFunction]
pub struct LNativeFunction {
    /// The number of arguments expected by the function
    pub arg_count: u8,
    /// The function implementation that's called when calling the native function
    //
    // The type signature can't be simplified without stabilized trait aliases,
    // see https://github.com/rust-lang/rust/issues/55628
    #[allow(clippy::type_complexity)]
    pub function: Ptr<dyn LuteFunction>,
    /// The bound receiver for method-style natives
    pub instance: Option<Ptr<LValue>>,
}

impl LNativeFunction {
    /// Creates a new native function
    pub fn new(arg_count: u8, function: impl LuteFunction) -> Self {
        Self {
            arg_count,
            function: make_ptr!(function),
            instance: None,
        }
    }

    /// Returns the function with the given value bound as its receiver
    #[must_use]
    pub fn with_instance(mut self, instance: LValue) -> Self {
        self.instance = Some(instance.into());
        self
    }

    /// Calls the function with the given arguments
    ///
    /// The argument count is validated here, at the call site, before the implementation
    /// runs.
    pub fn call(&self, heap: &mut Heap, args: &[LValue]) -> Result<LValue> {
        if args.len() != self.arg_count as usize {
            return runtime_error!(
                "expected {} arguments, found {}",
                self.arg_count,
                args.len()
            );
        }

        let mut ctx = CallContext {
            heap,
            args,
            instance: self.instance.as_deref(),
        };
        (self.function)(&mut ctx)
    }
}

impl Clone for LNativeFunction {
    fn clone(&self) -> Self {
        Self {
            arg_count: self.arg_count,
            function: self.function.clone(),
            instance: self.instance.clone(),
        }
    }
}

impl PartialEq for LNativeFunction {
    fn eq(&self, other: &Self) -> bool {
        let same_instance = match (&self.instance, &other.instance) {
            (None, None) => true,
            (Some(a), Some(b)) => Ptr::ptr_eq(a, b),
            _ => false,
        };
        Ptr::ptr_eq(&self.function, &other.function) && same_instance
    }
}

impl fmt::Debug for LNativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "native function: {}", Ptr::address(&self.function))
    }
}

impl Hash for LNativeFunction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Ptr::address(&self.function).hash(state)
    }
}

/// The context provided when a call to a [LNativeFunction] is made
pub struct CallContext<'a> {
    /// The heap in which the call's allocations should be made
    pub heap: &'a mut Heap,
    args: &'a [LValue],
    instance: Option<&'a LValue>,
}

impl<'a> CallContext<'a> {
    /// Returns a new context for calling native functions
    pub fn new(heap: &'a mut Heap, args: &'a [LValue]) -> Self {
        Self {
            heap,
            args,
            instance: None,
        }
    }

    /// Returns the function call's arguments
    pub fn args(&self) -> &[LValue] {
        self.args
    }

    /// Returns the receiver the function was bound to, if any
    ///
    /// Method-style natives use this to recover the container they were resolved on.
    pub fn instance(&self) -> Option<&LValue> {
        self.instance
    }
}
