//! The `as` and `is` operations driven by the instruction dispatcher

use crate::{LValue, Result, runtime_error};
use std::fmt;

/// The type ids that Lute programs can name in `as` and `is` expressions
///
/// There's no id for the iterator pseudo type, which can't be named in programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ValueType {
    Null,
    Bool,
    Int,
    Num,
    Str,
    Range,
    Tuple,
    List,
    Map,
    Error,
    Function,
    Tagged,
}

impl ValueType {
    /// Returns the name of the type as used in Lute programs
    pub fn name(&self) -> &'static str {
        use ValueType::*;
        match self {
            Null => "null",
            Bool => "bool",
            Int => "int",
            Num => "num",
            Str => "str",
            Range => "range",
            Tuple => "tuple",
            List => "list",
            Map => "map",
            Error => "error",
            Function => "fn",
            Tagged => "tagged",
        }
    }

    fn matches(&self, value: &LValue) -> bool {
        match (self, value) {
            (Self::Null, LValue::Null) => true,
            (Self::Bool, LValue::Bool(_)) => true,
            (Self::Int, LValue::Int(_)) => true,
            (Self::Num, LValue::Float(_)) => true,
            (Self::Str, LValue::Str(_)) => true,
            (Self::Range, LValue::Range(_)) => true,
            (Self::Tuple, LValue::Tuple(_)) => true,
            (Self::List, LValue::List(_)) => true,
            (Self::Map, LValue::Map(_)) => true,
            (Self::Error, LValue::Error(_)) => true,
            // Native functions satisfy the function type alongside Lute functions
            (Self::Function, LValue::Function(_) | LValue::NativeFunction(_)) => true,
            (Self::Tagged, LValue::Tagged(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returns true if the value satisfies the given type
///
/// Both Lute functions and native functions satisfy `fn`; everything else matches its
/// own tag only.
pub fn value_is(value: &LValue, target: ValueType) -> bool {
    target.matches(value)
}

/// Converts the value to the given type, returning a new value
///
/// Casting to `null` always produces null, and casting a value to its own type returns
/// the value unchanged. Bools, ints, nums, and strings convert between each other where
/// a conversion is meaningful; malformed strings are runtime errors. Conversions to the
/// container types aren't available yet, and the remaining targets have no meaningful
/// conversion at all.
pub fn cast(value: &LValue, target: ValueType) -> Result<LValue> {
    use LValue::{Bool, Float, Int, Str};

    if target == ValueType::Null {
        return Ok(LValue::NULL);
    }

    if target.matches(value) {
        return Ok(value.clone());
    }

    match (value, target) {
        (Int(n), ValueType::Bool) => Ok(LValue::Bool(*n != 0)),
        (Float(n), ValueType::Bool) => Ok(LValue::Bool(*n != 0.0)),
        (Str(s), ValueType::Bool) => match s.as_str() {
            "true" => Ok(LValue::TRUE),
            "false" => Ok(LValue::FALSE),
            _ => runtime_error!("cannot cast string \"{s}\" to bool"),
        },

        (Float(n), ValueType::Int) => Ok(LValue::Int(*n as i64)),
        (Bool(b), ValueType::Int) => Ok(LValue::Int(*b as i64)),
        (Str(s), ValueType::Int) => match s.as_str().parse::<i64>() {
            Ok(n) => Ok(LValue::Int(n)),
            Err(_) => runtime_error!("cannot cast string \"{s}\" to int"),
        },

        (Int(n), ValueType::Num) => Ok(LValue::Float(*n as f64)),
        (Bool(b), ValueType::Num) => Ok(LValue::Float(*b as i64 as f64)),
        (Str(s), ValueType::Num) => match s.as_str().parse::<f64>() {
            Ok(n) => Ok(LValue::Float(n)),
            Err(_) => runtime_error!("cannot cast string \"{s}\" to num"),
        },

        (_, ValueType::Str | ValueType::Tuple | ValueType::List | ValueType::Map) => {
            runtime_error!("casting to {target} is not yet supported")
        }

        _ => runtime_error!(
            "invalid cast to {target} from '{}'",
            value.type_as_string()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(LValue::from(0), ValueType::Bool, LValue::FALSE; "zero int to bool")]
    #[test_case(LValue::from(2), ValueType::Bool, LValue::TRUE; "nonzero int to bool")]
    #[test_case(LValue::from(3.5), ValueType::Int, LValue::from(3); "float truncates to int")]
    #[test_case(LValue::from(-3.5), ValueType::Int, LValue::from(-3); "negative float truncates to int")]
    #[test_case(LValue::TRUE, ValueType::Int, LValue::from(1); "bool to int")]
    #[test_case(LValue::from("3.5"), ValueType::Num, LValue::from(3.5); "numeric string to num")]
    #[test_case(LValue::from("42"), ValueType::Int, LValue::from(42); "numeric string to int")]
    #[test_case(LValue::from("true"), ValueType::Bool, LValue::TRUE; "true string to bool")]
    fn successful_casts(value: LValue, target: ValueType, expected: LValue) {
        assert!(cast(&value, target).unwrap().value_eq(&expected));
    }

    #[test_case(LValue::from("3.5"), ValueType::Int; "fractional string to int")]
    #[test_case(LValue::from("no"), ValueType::Bool; "arbitrary string to bool")]
    #[test_case(LValue::from("x42"), ValueType::Num; "malformed string to num")]
    #[test_case(LValue::from(1), ValueType::Tuple; "reserved tuple target")]
    #[test_case(LValue::from(1), ValueType::Error; "meaningless error target")]
    fn failing_casts(value: LValue, target: ValueType) {
        assert!(cast(&value, target).is_err());
    }

    #[test]
    fn cast_to_null_always_succeeds() {
        assert!(matches!(
            cast(&LValue::from("anything"), ValueType::Null).unwrap(),
            LValue::Null
        ));
    }

    #[test]
    fn same_type_cast_returns_the_value() {
        let list = LValue::List(crate::LList::default());
        let LValue::List(result) = cast(&list, ValueType::List).unwrap() else {
            panic!("expected a list");
        };
        let LValue::List(original) = &list else {
            unreachable!()
        };
        assert!(result.is_same_instance(original));
    }

    #[test]
    fn functions_and_natives_both_satisfy_fn() {
        let native = LValue::NativeFunction(crate::LNativeFunction::new(0, |_| {
            Ok(LValue::Null)
        }));
        assert!(value_is(&native, ValueType::Function));
        assert!(!value_is(&native, ValueType::Map));
    }
}
