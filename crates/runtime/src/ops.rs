//! The container protocol driven by the instruction dispatcher
//!
//! Indexed get/set, membership tests, property access, and iterator creation. The
//! dispatcher validates nothing up front; every operation here checks its operand types
//! and reports runtime errors for invalid combinations.

use crate::{
    Heap, LIterator, LNativeFunction, LValue, Result, ValueKey, runtime_error, unexpected_type,
};

/// Returns the value at the given index of a container
///
/// Tuples and lists are indexed by ints (negative indices count from the back) and
/// expose properties through string indices (`"len"`, and `"append"` on lists, which
/// resolves to a native function bound to the list). Strings expose `"len"` as their
/// byte length. Maps are indexed by key lookup with any key type.
pub fn get_index(heap: &mut Heap, container: &LValue, index: &LValue) -> Result<LValue> {
    use LValue::{Int, List, Map, Range, Str, Tuple};

    match (container, index) {
        (Tuple(t), Int(i)) => {
            let index = normalize_index(*i, t.len())?;
            Ok(t.data()[index].clone())
        }
        (List(l), Int(i)) => {
            let index = normalize_index(*i, l.len())?;
            Ok(l.data()[index].clone())
        }
        (Tuple(_) | List(_) | Str(_), Range(_)) => {
            runtime_error!("range indexing is not yet supported")
        }
        (Str(_), Int(_)) => {
            runtime_error!("string indexing is not yet supported")
        }
        (Tuple(t), Str(property)) => match property.as_str() {
            "len" => Ok(LValue::from(t.len())),
            unknown => runtime_error!("no such property on tuple: '{unknown}'"),
        },
        (List(l), Str(property)) => match property.as_str() {
            "len" => Ok(LValue::from(l.len())),
            "append" => Ok(heap.alloc(make_append_fn(container.clone()))),
            unknown => runtime_error!("no such property on list: '{unknown}'"),
        },
        (Str(s), Str(property)) => match property.as_str() {
            "len" => Ok(LValue::from(s.len())),
            unknown => runtime_error!("no such property on str: '{unknown}'"),
        },
        (Map(m), key) => match m.get(&ValueKey::from(key.clone())) {
            Some(value) => Ok(value),
            None => runtime_error!("key not found in map: {}", key.display_string(Some(1))),
        },
        (Tuple(_) | List(_) | Str(_), unexpected) => {
            unexpected_type("an int, range, or str as index", unexpected)
        }
        (unexpected, _) => unexpected_type("an indexable value", unexpected),
    }
}

/// Assigns to the given index of a container
///
/// Tuple and list slots are replaced in place; a tuple's length never changes. Map
/// entries are inserted or replaced, with both the key and the value duped before
/// storage so that later mutations of the caller's cells don't leak into the map.
pub fn set_index(
    heap: &mut Heap,
    container: &LValue,
    index: &LValue,
    value: &LValue,
) -> Result<()> {
    use LValue::{Int, List, Map, Tuple};

    match (container, index) {
        (Tuple(t), Int(i)) => {
            let index = normalize_index(*i, t.len())?;
            t.data_mut()[index] = value.clone();
            Ok(())
        }
        (List(l), Int(i)) => {
            let index = normalize_index(*i, l.len())?;
            l.data_mut()[index] = value.clone();
            Ok(())
        }
        (Map(m), key) => {
            let key = heap.dupe(key);
            let value = heap.dupe(value);
            m.insert(ValueKey::from(key), value);
            Ok(())
        }
        (Tuple(_) | List(_), unexpected) => unexpected_type("an int as index", unexpected),
        (unexpected, _) => unexpected_type("an indexable value", unexpected),
    }
}

/// Returns true if the container holds the given value
///
/// Strings test substring containment, tuples and lists test element equality, maps test
/// key presence, and ranges test arithmetic membership (which agrees with iteration).
pub fn contains(container: &LValue, value: &LValue) -> Result<bool> {
    use LValue::{Int, List, Map, Range, Str, Tuple};

    match (container, value) {
        (Str(s), Str(v)) => Ok(s.contains(v.as_str())),
        (Str(_), unexpected) => unexpected_type("a str as the operand of 'in'", unexpected),
        (Tuple(t), v) => Ok(t.data().iter().any(|element| element.value_eq(v))),
        (List(l), v) => Ok(l.data().iter().any(|element| element.value_eq(v))),
        (Map(m), key) => Ok(m.data().contains_key(&ValueKey::from(key.clone()))),
        (Range(r), Int(n)) => Ok(r.contains(*n)),
        (Range(_), unexpected) => unexpected_type("an int as the operand of 'in'", unexpected),
        (unexpected, _) => unexpected_type("a container", unexpected),
    }
}

/// Creates an iterator over the given value
///
/// See [LIterator::make]
pub fn make_iterator(value: &LValue) -> Result<LIterator> {
    LIterator::make(value)
}

// Uniform negative index handling: a negative index counts back from the container's
// length, anything out of range afterwards is an error
fn normalize_index(index: i64, len: usize) -> Result<usize> {
    let normalized = if index < 0 {
        index + len as i64
    } else {
        index
    };

    if normalized < 0 || normalized >= len as i64 {
        runtime_error!("index out of bounds (index: {index}, size: {len})")
    } else {
        Ok(normalized as usize)
    }
}

// `list.append` resolves to a native function bound to the list it was accessed through.
// The bound receiver travels on the native value itself so that the collector can see it.
fn make_append_fn(list: LValue) -> LValue {
    let append = LNativeFunction::new(1, |ctx| {
        let Some(LValue::List(list)) = ctx.instance().cloned() else {
            return runtime_error!("append called without a bound list");
        };
        let arg = ctx.args()[0].clone();
        let item = ctx.heap.dupe(&arg);
        list.data_mut().push(item);
        Ok(LValue::Null)
    })
    .with_instance(list);

    LValue::NativeFunction(append)
}
