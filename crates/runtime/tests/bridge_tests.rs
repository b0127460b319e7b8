//! Tests for host/runtime marshalling and native function wrapping

use lute_runtime::{
    Heap, LList, LMap, LNativeFunction, LValue, bridge::FromValue, bridge_enum, ops,
    runtime_error,
};

fn add(a: i64, b: i64) -> i64 {
    a + b
}

#[test]
fn registered_function_is_callable() {
    let mut heap = Heap::new();
    let native = LNativeFunction::from_typed(add);

    let result = native
        .call(&mut heap, &[LValue::from(2), LValue::from(3)])
        .unwrap();
    assert!(result.value_eq(&LValue::from(5)));
}

#[test]
fn argument_conversion_errors_name_the_expected_type() {
    let mut heap = Heap::new();
    let native = LNativeFunction::from_typed(add);

    let error = native
        .call(&mut heap, &[LValue::from("2"), LValue::from(3)])
        .unwrap_err();
    assert!(error.to_string().contains("expected int"));
}

#[test]
fn arity_is_checked_at_the_call_site() {
    let mut heap = Heap::new();
    let native = LNativeFunction::from_typed(add);
    assert_eq!(native.arg_count, 2);

    assert!(native.call(&mut heap, &[LValue::from(2)]).is_err());
    assert!(
        native
            .call(
                &mut heap,
                &[LValue::from(1), LValue::from(2), LValue::from(3)]
            )
            .is_err()
    );
}

#[test]
fn modules_are_maps_of_named_values() {
    let mut heap = Heap::new();

    // A host module is registered as a map from names to values
    let module = LMap::new();
    module.add_fn("add", LNativeFunction::from_typed(add));
    module.insert("version", 1);

    let module_value = heap.alloc(LValue::Map(module));

    let add_value =
        ops::get_index(&mut heap, &module_value, &LValue::from("add")).unwrap();
    let LValue::NativeFunction(add_fn) = add_value else {
        panic!("expected a native function");
    };
    let result = add_fn
        .call(&mut heap, &[LValue::from(20), LValue::from(22)])
        .unwrap();
    assert!(result.value_eq(&LValue::from(42)));
}

#[test]
fn host_results_propagate_runtime_errors() {
    fn checked_div(a: i64, b: i64) -> lute_runtime::Result<i64> {
        if b == 0 {
            return runtime_error!("division by zero");
        }
        Ok(a / b)
    }

    let mut heap = Heap::new();
    let native = LNativeFunction::from_typed(checked_div);

    let ok = native
        .call(&mut heap, &[LValue::from(10), LValue::from(2)])
        .unwrap();
    assert!(ok.value_eq(&LValue::from(5)));

    let error = native
        .call(&mut heap, &[LValue::from(1), LValue::from(0)])
        .unwrap_err();
    assert!(error.to_string().contains("division by zero"));
}

#[test]
fn string_results_are_owned_handles() {
    fn greeting() -> String {
        "hello".to_string()
    }

    let mut heap = Heap::new();
    let native = LNativeFunction::from_typed(greeting);
    let result = native.call(&mut heap, &[]).unwrap();

    let s = lute_runtime::LString::from_value(&result).unwrap();
    // A collection can't invalidate the returned handle
    heap.collect(&[]);
    assert_eq!(s.as_str(), "hello");
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Direction {
    North,
    South,
}

bridge_enum!(Direction, North, South);

#[test]
fn enums_bridge_through_tagged_values() {
    let value = LValue::from(Direction::South);
    assert!(value.value_eq(&LValue::tagged("South", LValue::Null)));

    assert_eq!(Direction::from_value(&value).unwrap(), Direction::South);

    // An unknown tag name is rejected
    let unknown = LValue::tagged("East", LValue::Null);
    let error = Direction::from_value(&unknown).unwrap_err();
    assert!(error.to_string().contains("no value by such name"));

    // A non-null payload doesn't match an enum
    let with_payload = LValue::tagged("North", LValue::from(1));
    assert!(Direction::from_value(&with_payload).is_err());
}

#[test]
fn tagged_value_equality() {
    let ok5 = LValue::tagged("Ok", LValue::from(5));

    assert!(ok5.value_eq(&LValue::tagged("Ok", LValue::from(5))));
    assert!(!ok5.value_eq(&LValue::tagged("Ok", LValue::from(6))));
    assert!(!ok5.value_eq(&LValue::tagged("Err", LValue::from(5))));

    // Tagged values aren't containers, `in` rejects them
    assert!(ops::contains(&LValue::tagged("Ok", LValue::Null), &ok5).is_err());
}

#[test]
fn lists_bridge_by_variant() {
    let list = LValue::List(LList::from_slice(&[LValue::from(1)]));
    assert!(LList::from_value(&list).is_ok());
    assert!(LList::from_value(&LValue::from(1)).is_err());
}
