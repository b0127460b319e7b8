//! Tests for the canonical display forms of values

use lute_runtime::{
    LFunction, LList, LMap, LNativeFunction, LRange, LTuple, LValue, Module, Ptr,
};

#[test]
fn primitive_forms() {
    assert_eq!(LValue::Null.display_string(None), "null");
    assert_eq!(LValue::TRUE.display_string(None), "true");
    assert_eq!(LValue::from(-42).display_string(None), "-42");
    assert_eq!(LValue::from(3.5).display_string(None), "3.5");
}

#[test]
fn strings_are_quoted_and_escaped() {
    assert_eq!(LValue::from("plain").display_string(None), "\"plain\"");
    assert_eq!(
        LValue::from("a\nb\t'c'\r\"d\"").display_string(None),
        "\"a\\nb\\t\\'c\\'\\r\\\"d\\\"\""
    );
    // Control bytes outside the named escapes use lowercase hex
    assert_eq!(
        LValue::from("\u{1}\u{1f}").display_string(None),
        "\"\\x01\\x1f\""
    );
    // Non-ASCII text passes through unescaped
    assert_eq!(LValue::from("héllo").display_string(None), "\"héllo\"");
}

#[test]
fn range_form() {
    let r = LValue::Range(LRange::new(0, 10, 2).unwrap());
    assert_eq!(r.display_string(None), "0:10:2");

    let r = LValue::Range(LRange::new(10, 0, -1).unwrap());
    assert_eq!(r.display_string(None), "10:0:-1");
}

#[test]
fn container_forms() {
    let list = LValue::List(LList::from_slice(&[
        LValue::from(1),
        LValue::from("two"),
        LValue::Null,
    ]));
    assert_eq!(list.display_string(None), "[1, \"two\", null]");

    let tuple = LValue::Tuple(LTuple::from(vec![LValue::from(1)]));
    assert_eq!(tuple.display_string(None), "(1)");

    let map = LMap::new();
    map.insert("a", 1);
    assert_eq!(LValue::Map(map).display_string(None), "{\"a\": 1}");

    let error = LValue::error(LValue::from("oops"));
    assert_eq!(error.display_string(None), "error(\"oops\")");

    let tagged = LValue::tagged("Ok", LValue::from(5));
    assert_eq!(tagged.display_string(None), "@Ok(5)");
}

#[test]
fn depth_zero_abbreviates_compound_values() {
    let list = LValue::List(LList::from_slice(&[LValue::from(1)]));
    assert_eq!(list.display_string(Some(0)), "[...]");

    let tuple = LValue::Tuple(LTuple::from(vec![LValue::from(1)]));
    assert_eq!(tuple.display_string(Some(0)), "(...)");

    let map = LMap::new();
    map.insert("a", 1);
    assert_eq!(LValue::Map(map).display_string(Some(0)), "{...}");

    assert_eq!(
        LValue::error(LValue::from(1)).display_string(Some(0)),
        "error(...)"
    );
    assert_eq!(
        LValue::tagged("Ok", LValue::from(1)).display_string(Some(0)),
        "@Ok(...)"
    );
}

#[test]
fn depth_budget_applies_per_level() {
    let inner = LValue::List(LList::from_slice(&[LValue::from(1)]));
    let outer = LValue::List(LList::from_slice(&[inner, LValue::from(2)]));

    assert_eq!(outer.display_string(Some(1)), "[[...], 2]");
    assert_eq!(outer.display_string(Some(2)), "[[1], 2]");
}

#[test]
fn function_form() {
    let module = Ptr::from(Module::new("test"));
    let captures = LList::from_slice(&[LValue::from(1), LValue::from(2)]);
    let f = LValue::Function(LFunction::new(module, 0x40, 3, captures));
    assert_eq!(f.display_string(None), "fn(3)@0x40[2]");
}

#[test]
fn native_form() {
    let f = LValue::NativeFunction(LNativeFunction::new(1, |_| Ok(LValue::Null)));
    let displayed = f.display_string(None);
    assert!(displayed.starts_with("native(1)@0x"));
}

#[test]
fn self_referential_values_terminate() {
    let list = LList::default();
    list.data_mut().push(LValue::List(list.clone()));
    assert_eq!(LValue::List(list).display_string(None), "[[...]]");
}
