//! Marshalling between host values and runtime values
//!
//! Host functions are wrapped into native function values through [TypedFunction]
//! trampolines: each positional argument is converted with [FromValue] (producing
//! "expected ..." errors on mismatches), an optional leading `&mut CallContext`
//! parameter is supplied implicitly without consuming an argument, and the return value
//! converts back through [IntoCallResult], with `Result` returns propagating runtime
//! errors. Everything is resolved at compile time; no signatures are interpreted at
//! runtime.
//!
//! Host enums map to tagged values through the [bridge_enum!](crate::bridge_enum) macro,
//! and host modules are registered as maps of named values (see [LMap::add_fn]).

use crate::{
    CallContext, Error, LList, LMap, LNativeFunction, LRange, LString, LTagged, LTuple, LValue,
    LuteSend, LuteSync, Result, runtime_error, unexpected_type,
};

/// Extraction of a typed host value from a runtime value
///
/// Each implementation enforces the variant it accepts, so conversion failures surface
/// as "expected ..." runtime errors at the call site.
///
/// Strings come back as [LString] handles (or copies for `String`), which own their data
/// for as long as the host holds them; there's no window in which a collection can
/// invalidate the bytes.
pub trait FromValue: Sized {
    /// Extracts a host value from a runtime value, enforcing the expected variant
    fn from_value(value: &LValue) -> Result<Self>;
}

impl FromValue for () {
    fn from_value(value: &LValue) -> Result<Self> {
        match value {
            LValue::Null => Ok(()),
            unexpected => unexpected_type("null", unexpected),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: &LValue) -> Result<Self> {
        match value {
            LValue::Bool(b) => Ok(*b),
            unexpected => unexpected_type("bool", unexpected),
        }
    }
}

impl FromValue for LValue {
    fn from_value(value: &LValue) -> Result<Self> {
        Ok(value.clone())
    }
}

impl FromValue for LString {
    fn from_value(value: &LValue) -> Result<Self> {
        match value {
            LValue::Str(s) => Ok(s.clone()),
            unexpected => unexpected_type("str", unexpected),
        }
    }
}

impl FromValue for String {
    fn from_value(value: &LValue) -> Result<Self> {
        LString::from_value(value).map(|s| s.as_str().to_string())
    }
}

impl FromValue for f64 {
    fn from_value(value: &LValue) -> Result<Self> {
        match value {
            LValue::Float(n) => Ok(*n),
            LValue::Int(n) => Ok(*n as f64),
            unexpected => unexpected_type("num", unexpected),
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &LValue) -> Result<Self> {
        f64::from_value(value).map(|n| n as f32)
    }
}

macro_rules! impl_from_value_int {
    ($($type:ty),+ $(,)?) => {
        $(
            impl FromValue for $type {
                fn from_value(value: &LValue) -> Result<Self> {
                    match value {
                        LValue::Int(n) => <$type>::try_from(*n).map_err(|_| {
                            Error::from(format!(
                                "cannot fit int {n} in {}",
                                stringify!($type)
                            ))
                        }),
                        LValue::Float(n) => {
                            let truncated = float_to_int(*n)?;
                            <$type>::try_from(truncated).map_err(|_| {
                                Error::from(format!(
                                    "cannot fit int {truncated} in {}",
                                    stringify!($type)
                                ))
                            })
                        }
                        unexpected => unexpected_type("int", unexpected),
                    }
                }
            }
        )+
    };
}

impl_from_value_int!(i8, i16, i32, i64, u8, u16, u32, u64, isize, usize);

macro_rules! impl_from_value_variant {
    ($($type:ty => $variant:ident, $expected:literal);+ $(;)?) => {
        $(
            impl FromValue for $type {
                fn from_value(value: &LValue) -> Result<Self> {
                    match value {
                        LValue::$variant(inner) => Ok(inner.clone()),
                        unexpected => unexpected_type($expected, unexpected),
                    }
                }
            }
        )+
    };
}

impl_from_value_variant!(
    LList => List, "list";
    LMap => Map, "map";
    LTuple => Tuple, "tuple";
    LRange => Range, "range";
    LNativeFunction => NativeFunction, "fn";
);

impl FromValue for LTagged {
    fn from_value(value: &LValue) -> Result<Self> {
        match value {
            LValue::Tagged(t) => Ok(t.as_ref().clone()),
            unexpected => unexpected_type("tagged value", unexpected),
        }
    }
}

// Truncating float-to-int conversion, rejecting values an i64 can't hold
fn float_to_int(n: f64) -> Result<i64> {
    let truncated = n.trunc();
    if !truncated.is_finite()
        || truncated < i64::MIN as f64
        || truncated >= i64::MAX as f64 + 1.0
    {
        return runtime_error!("cannot fit num {n} in an int");
    }
    Ok(truncated as i64)
}

/// Conversion of a host function's return value into a call result
///
/// Plain values convert through their `From` impls; `Result` returns pass runtime errors
/// through to the caller, which unwinds the call like any other runtime error.
pub trait IntoCallResult {
    /// Converts the host return value into the call's result
    fn into_call_result(self) -> Result<LValue>;
}

impl IntoCallResult for LValue {
    fn into_call_result(self) -> Result<LValue> {
        Ok(self)
    }
}

impl IntoCallResult for Result<LValue> {
    fn into_call_result(self) -> Result<LValue> {
        self
    }
}

macro_rules! impl_into_call_result {
    ($($type:ty),+ $(,)?) => {
        $(
            impl IntoCallResult for $type {
                fn into_call_result(self) -> Result<LValue> {
                    Ok(self.into())
                }
            }

            impl IntoCallResult for Result<$type> {
                fn into_call_result(self) -> Result<LValue> {
                    self.map(LValue::from)
                }
            }
        )+
    };
}

impl_into_call_result!(
    (),
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    isize,
    usize,
    f32,
    f64,
    &'static str,
    String,
    LString,
    LRange,
    LTuple,
    LList,
    LMap,
    LTagged,
    LNativeFunction,
);

/// Marker for trampoline signatures whose first parameter is the implicit call context
///
/// The context parameter is supplied by the runtime and doesn't consume a call argument,
/// so it doesn't count towards the wrapped function's `arg_count`.
pub struct WithContext;

/// A host function that can be wrapped as a native function
///
/// Implementations are generated for functions of up to four [FromValue] arguments,
/// optionally preceded by a `&mut CallContext` parameter, returning any
/// [IntoCallResult] type. The `Args` parameter only disambiguates the implementations
/// and never appears in values.
pub trait TypedFunction<Args>: LuteSend + LuteSync + 'static {
    /// The number of runtime-supplied arguments the function expects
    const ARG_COUNT: u8;

    /// Invokes the function with arguments taken from the call context
    fn invoke(&self, ctx: &mut CallContext) -> Result<LValue>;
}

macro_rules! impl_typed_function {
    ($count:expr $(, $arg:ident => $index:tt)*) => {
        impl<F, R $(, $arg)*> TypedFunction<($($arg,)*)> for F
        where
            F: Fn($($arg),*) -> R + LuteSend + LuteSync + 'static,
            R: IntoCallResult,
            $($arg: FromValue,)*
        {
            const ARG_COUNT: u8 = $count;

            fn invoke(&self, _ctx: &mut CallContext) -> Result<LValue> {
                (self)($($arg::from_value(&_ctx.args()[$index])?),*).into_call_result()
            }
        }

        impl<F, R $(, $arg)*> TypedFunction<(WithContext, $($arg,)*)> for F
        where
            F: Fn(&mut CallContext, $($arg),*) -> R + LuteSend + LuteSync + 'static,
            R: IntoCallResult,
            $($arg: FromValue,)*
        {
            const ARG_COUNT: u8 = $count;

            #[allow(non_snake_case)]
            fn invoke(&self, ctx: &mut CallContext) -> Result<LValue> {
                $(let $arg = $arg::from_value(&ctx.args()[$index])?;)*
                (self)(ctx $(, $arg)*).into_call_result()
            }
        }
    };
}

impl_typed_function!(0);
impl_typed_function!(1, A0 => 0);
impl_typed_function!(2, A0 => 0, A1 => 1);
impl_typed_function!(3, A0 => 0, A1 => 1, A2 => 2);
impl_typed_function!(4, A0 => 0, A1 => 1, A2 => 2, A3 => 3);

impl LNativeFunction {
    /// Wraps a typed host function as a native function value
    ///
    /// The wrapped function's `arg_count` is the number of non-implicit parameters, and
    /// stays fixed for the lifetime of the value.
    pub fn from_typed<Args, F>(f: F) -> Self
    where
        F: TypedFunction<Args>,
    {
        Self::new(F::ARG_COUNT, move |ctx| f.invoke(ctx))
    }
}

/// Implements the bridge between a host enum and tagged values
///
/// Converting the enum into an [LValue](crate::LValue) produces a tagged value whose tag
/// is the variant's name wrapping null, and extracting the enum back requires a tagged
/// value with a declared name and a null payload.
///
/// ```
/// use lute_runtime::{LValue, bridge_enum, bridge::FromValue};
///
/// #[derive(Debug, PartialEq)]
/// enum Mode {
///     Read,
///     Write,
/// }
///
/// bridge_enum!(Mode, Read, Write);
///
/// let value = LValue::from(Mode::Read);
/// assert_eq!(Mode::from_value(&value).unwrap(), Mode::Read);
/// ```
#[macro_export]
macro_rules! bridge_enum {
    ($enum:ty, $($variant:ident),+ $(,)?) => {
        impl From<$enum> for $crate::LValue {
            fn from(value: $enum) -> Self {
                let name = match value {
                    $(<$enum>::$variant => stringify!($variant),)+
                };
                $crate::LValue::tagged(name, $crate::LValue::Null)
            }
        }

        impl $crate::bridge::FromValue for $enum {
            fn from_value(value: &$crate::LValue) -> $crate::Result<Self> {
                match value {
                    $crate::LValue::Tagged(tagged)
                        if matches!(tagged.contents, $crate::LValue::Null) =>
                    {
                        match tagged.tag.as_str() {
                            $(stringify!($variant) => Ok(<$enum>::$variant),)+
                            other => Err($crate::Error::from(format!(
                                "no value by such name: '{other}'"
                            ))),
                        }
                    }
                    unexpected => $crate::unexpected_type(
                        concat!("a tagged value for ", stringify!($enum)),
                        unexpected,
                    ),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Heap;

    fn add(a: i64, b: i64) -> i64 {
        a + b
    }

    #[test]
    fn typed_functions_convert_their_arguments() {
        let mut heap = Heap::new();
        let native = LNativeFunction::from_typed(add);
        assert_eq!(native.arg_count, 2);

        let result = native
            .call(&mut heap, &[LValue::from(2), LValue::from(3)])
            .unwrap();
        assert!(result.value_eq(&LValue::from(5)));
    }

    #[test]
    fn argument_type_mismatches_are_reported() {
        let mut heap = Heap::new();
        let native = LNativeFunction::from_typed(add);

        let error = native
            .call(&mut heap, &[LValue::from("2"), LValue::from(3)])
            .unwrap_err();
        assert!(error.to_string().contains("expected int"));
    }

    #[test]
    fn context_parameters_are_implicit() {
        fn append_to(ctx: &mut CallContext, list: LList, item: LValue) -> Result<()> {
            let item = ctx.heap.dupe(&item);
            list.data_mut().push(item);
            Ok(())
        }

        let mut heap = Heap::new();
        let native = LNativeFunction::from_typed(append_to);
        // The context parameter doesn't count towards the argument count
        assert_eq!(native.arg_count, 2);

        let list = LList::default();
        native
            .call(
                &mut heap,
                &[LValue::List(list.clone()), LValue::from(1)],
            )
            .unwrap();
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn result_errors_propagate() {
        fn fails() -> Result<i64> {
            runtime_error!("host failure")
        }

        let mut heap = Heap::new();
        let native = LNativeFunction::from_typed(fails);
        let error = native.call(&mut heap, &[]).unwrap_err();
        assert!(error.to_string().contains("host failure"));
    }

    #[test]
    fn int_narrowing_is_range_checked() {
        let value = LValue::from(300);
        let error = u8::from_value(&value).unwrap_err();
        assert!(error.to_string().contains("cannot fit int"));

        assert_eq!(u8::from_value(&LValue::from(255)).unwrap(), 255);
        // Floats truncate on the way into integer targets
        assert_eq!(i64::from_value(&LValue::from(3.9)).unwrap(), 3);
    }
}
