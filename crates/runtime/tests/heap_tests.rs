//! Tests for the heap's dupe policy and cycle collection

use lute_runtime::{Heap, LList, LMap, LValue, ops, trace_children};

#[test]
fn list_can_contain_itself_through_index_set() {
    let mut heap = Heap::new();
    let list = LList::from_slice(&[LValue::Null]);
    let value = heap.alloc(LValue::List(list.clone()));

    // list[0] = list
    ops::set_index(&mut heap, &value, &LValue::from(0), &value).unwrap();

    let LValue::List(element) = list.data()[0].clone() else {
        panic!("expected a list");
    };
    assert!(element.is_same_instance(&list));

    // The cycle is rooted, so it survives a collection
    assert_eq!(heap.collect(&[value.clone()]), 0);

    // Unrooted, the cycle is reclaimed
    drop(value);
    drop(list);
    assert_eq!(heap.collect(&[]), 1);
}

#[test]
fn nested_structures_survive_while_rooted() {
    let mut heap = Heap::new();

    let inner = heap.alloc(LValue::List(LList::from_slice(&[LValue::from(1)])));
    let map = LMap::new();
    map.insert("inner", inner.clone());
    let root = heap.alloc(LValue::Map(map));
    drop(inner);

    assert_eq!(heap.collect(&[root.clone()]), 0);

    let LValue::Map(m) = &root else { unreachable!() };
    let LValue::List(kept) = m.get("inner").unwrap() else {
        panic!("expected a list");
    };
    assert!(kept.data()[0].value_eq(&LValue::from(1)));
}

#[test]
fn iterators_keep_their_source_alive() {
    let mut heap = Heap::new();

    let list = heap.alloc(LValue::List(LList::from_slice(&[LValue::from(1)])));
    let iterator = LValue::Iterator(ops::make_iterator(&list).unwrap());
    drop(list);

    // The iterator's source is traced like any other reference
    assert_eq!(heap.collect(&[iterator.clone()]), 0);

    let LValue::Iterator(mut iterator) = iterator else {
        unreachable!()
    };
    let first = iterator.next_value().unwrap().unwrap();
    assert!(first.value_eq(&LValue::from(1)));
}

#[test]
fn bound_methods_keep_their_receiver_alive() {
    let mut heap = Heap::new();

    let list = heap.alloc(LValue::List(LList::default()));
    let append = ops::get_index(&mut heap, &list, &LValue::from("append")).unwrap();
    drop(list);

    // The bound receiver is visible to the traversal, so it stays reachable
    assert_eq!(heap.collect(&[append.clone()]), 0);

    let LValue::NativeFunction(append) = append else {
        unreachable!()
    };
    append.call(&mut heap, &[LValue::from(1)]).unwrap();
}

#[test]
fn trace_children_visits_direct_references() {
    let inner = LValue::from("inner");
    let list = LValue::List(LList::from_slice(&[inner.clone(), LValue::from(2)]));

    let mut seen = Vec::new();
    trace_children(&list, |child| seen.push(child));
    assert_eq!(seen.len(), 2);
    assert!(seen[0].value_eq(&inner));

    let tagged = LValue::tagged("Ok", LValue::from(5));
    let mut seen = Vec::new();
    trace_children(&tagged, |child| seen.push(child));
    assert_eq!(seen.len(), 1);
    assert!(seen[0].value_eq(&LValue::from(5)));
}

#[test]
fn dupe_of_primitives_copies_the_payload() {
    let mut heap = Heap::new();

    for value in [
        LValue::Null,
        LValue::TRUE,
        LValue::from(42),
        LValue::from(2.5),
    ] {
        assert!(heap.dupe(&value).value_eq(&value));
    }
}
