use crate::{
    Borrow, BorrowMut, DisplayContext, LNativeFunction, LValue, Ptr, PtrMut, ValueKey,
};
use indexmap::{Equivalent, IndexMap};
use lute_memory::{Address, WeakPtrMut};
use rustc_hash::FxHasher;
use std::{
    hash::{BuildHasherDefault, Hash},
    ops::{Deref, DerefMut},
};

/// The hasher used throughout the Lute runtime
pub type LuteHasher = FxHasher;

type ValueMapType = IndexMap<ValueKey, LValue, BuildHasherDefault<LuteHasher>>;

/// The insertion-ordered (ValueKey -> LValue) map data used by the Lute runtime
///
/// See also: [LMap]
#[derive(Clone, Default)]
pub struct ValueMap(ValueMapType);

impl ValueMap {
    /// Creates a new ValueMap with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(ValueMapType::with_capacity_and_hasher(
            capacity,
            Default::default(),
        ))
    }
}

impl Deref for ValueMap {
    type Target = ValueMapType;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for ValueMap {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl FromIterator<(ValueKey, LValue)> for ValueMap {
    fn from_iter<T: IntoIterator<Item = (ValueKey, LValue)>>(iter: T) -> ValueMap {
        Self(ValueMapType::from_iter(iter))
    }
}

/// The map type used by the Lute runtime
///
/// Entries keep their insertion order. Keys are matched by value equality, while maps
/// themselves hash and compare as identities (see [ValueKey]).
#[derive(Clone, Default)]
pub struct LMap {
    data: PtrMut<ValueMap>,
}

impl LMap {
    /// Creates an empty LMap
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty LMap with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: ValueMap::with_capacity(capacity).into(),
        }
    }

    /// Creates an LMap initialized with the provided data
    pub fn with_data(data: ValueMap) -> Self {
        Self { data: data.into() }
    }

    /// Provides a reference to the map's data
    pub fn data(&self) -> Borrow<'_, ValueMap> {
        self.data.borrow()
    }

    /// Provides a mutable reference to the map's data
    pub fn data_mut(&self) -> BorrowMut<'_, ValueMap> {
        self.data.borrow_mut()
    }

    /// Returns a clone of the value corresponding to the given key
    pub fn get<K>(&self, key: &K) -> Option<LValue>
    where
        K: Hash + Equivalent<ValueKey> + ?Sized,
    {
        self.data.borrow().get(key).cloned()
    }

    /// Inserts an entry into the map
    pub fn insert(&self, key: impl Into<ValueKey>, value: impl Into<LValue>) {
        self.data_mut().insert(key.into(), value.into());
    }

    /// Adds a native function to the map
    ///
    /// This is the building block for host modules: a module is a map from names to
    /// values, usually native functions.
    pub fn add_fn(&self, id: &str, f: LNativeFunction) {
        self.insert(id, LValue::NativeFunction(f));
    }

    /// Returns the number of entries in the map
    pub fn len(&self) -> usize {
        self.data().len()
    }

    /// Returns true if the map contains no entries
    pub fn is_empty(&self) -> bool {
        self.data().is_empty()
    }

    /// Returns true if the provided map shares this map's entry storage
    pub fn is_same_instance(&self, other: &Self) -> bool {
        PtrMut::ptr_eq(&self.data, &other.data)
    }

    /// Returns the address of the map's entry storage
    pub fn data_address(&self) -> Address {
        Ptr::address(&self.data)
    }

    pub(crate) fn downgrade(&self) -> WeakPtrMut<ValueMap> {
        Ptr::downgrade(&self.data)
    }

    /// Renders the map into the provided display context
    pub fn display(&self, ctx: &mut DisplayContext) {
        ctx.append('{');

        let id = self.data_address();
        if ctx.is_in_parents(id) {
            ctx.append("...");
        } else {
            ctx.push_container(id);

            for (i, (key, value)) in self.data().iter().enumerate() {
                if i > 0 {
                    ctx.append(", ");
                }

                key.value().display(ctx);
                ctx.append(": ");
                value.display(ctx);
            }

            ctx.pop_container();
        }

        ctx.append('}');
    }
}

impl From<ValueMap> for LMap {
    fn from(value: ValueMap) -> Self {
        LMap::with_data(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_and_remove_with_string() {
        let m = LMap::default();

        assert!(m.get("test").is_none());
        m.insert("test", LValue::Null);
        assert!(m.get("test").is_some());
        assert!(matches!(
            m.data_mut().shift_remove("test"),
            Some(LValue::Null)
        ));
        assert!(m.get("test").is_none());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let m = LMap::default();
        m.insert("b", 1);
        m.insert("a", 2);
        m.insert("c", 3);

        let keys: Vec<String> = m
            .data()
            .keys()
            .map(|k| k.value().display_string(None))
            .collect();
        assert_eq!(keys, ["\"b\"", "\"a\"", "\"c\""]);
    }
}
