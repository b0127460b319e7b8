//! Tests for the `as` and `is` operations, including display round-trips

use lute_runtime::{LList, LValue, ValueType, cast};

#[test]
fn scripted_cast_scenarios() {
    // as("3.5", num) -> 3.5
    let n = cast::cast(&LValue::from("3.5"), ValueType::Num).unwrap();
    assert!(n.value_eq(&LValue::from(3.5)));

    // as("3.5", int) -> error
    assert!(cast::cast(&LValue::from("3.5"), ValueType::Int).is_err());

    // as(3.5, int) -> 3
    let n = cast::cast(&LValue::from(3.5), ValueType::Int).unwrap();
    assert!(n.value_eq(&LValue::from(3)));

    // as(0, bool) -> false
    let b = cast::cast(&LValue::from(0), ValueType::Bool).unwrap();
    assert!(matches!(b, LValue::Bool(false)));

    // as("no", bool) -> error
    assert!(cast::cast(&LValue::from("no"), ValueType::Bool).is_err());
}

#[test]
fn casting_int_to_num_and_back() {
    // A numeric string converts consistently whether it goes through int first or not
    let source = LValue::from("42");
    let via_int = cast::cast(&cast::cast(&source, ValueType::Int).unwrap(), ValueType::Num)
        .unwrap();
    let direct = cast::cast(&source, ValueType::Num).unwrap();
    assert!(via_int.value_eq(&direct));
}

#[test]
fn display_round_trips_through_cast() {
    for value in [LValue::from(42), LValue::from(-7)] {
        let displayed = LValue::from(value.display_string(None));
        let parsed = cast::cast(&displayed, ValueType::Int).unwrap();
        assert!(parsed.value_eq(&value));
    }

    for value in [LValue::from(3.5), LValue::from(-0.25), LValue::from(1e300)] {
        let displayed = LValue::from(value.display_string(None));
        let parsed = cast::cast(&displayed, ValueType::Num).unwrap();
        assert!(parsed.value_eq(&value));
    }

    for value in [LValue::TRUE, LValue::FALSE] {
        let displayed = LValue::from(value.display_string(None));
        let parsed = cast::cast(&displayed, ValueType::Bool).unwrap();
        assert!(parsed.value_eq(&value));
    }
}

#[test]
fn is_matches_tags() {
    use lute_runtime::cast::value_is;

    assert!(value_is(&LValue::Null, ValueType::Null));
    assert!(value_is(&LValue::from(1), ValueType::Int));
    assert!(!value_is(&LValue::from(1), ValueType::Num));
    assert!(value_is(&LValue::from(1.0), ValueType::Num));
    assert!(value_is(&LValue::List(LList::default()), ValueType::List));
    assert!(!value_is(&LValue::List(LList::default()), ValueType::Tuple));
    assert!(value_is(
        &LValue::error(LValue::from("oops")),
        ValueType::Error
    ));
    assert!(value_is(
        &LValue::tagged("Ok", LValue::from(5)),
        ValueType::Tagged
    ));
}
