use crate::{LString, LValue, types::value::hash_value_into};
use indexmap::Equivalent;
use std::{
    fmt,
    hash::{Hash, Hasher},
};

/// The key type used by [ValueMap](crate::ValueMap)
///
/// Keys are matched by value equality, with the same rules as the `==` operation:
/// numbers match across the int/float pair, tuples and lists match elementwise, and maps
/// match only as identities. Hashing follows the same projection so that equal keys
/// always share a hash.
#[derive(Clone, Debug)]
pub struct ValueKey(LValue);

impl ValueKey {
    /// Returns a reference to the key's value
    pub fn value(&self) -> &LValue {
        &self.0
    }
}

impl From<LValue> for ValueKey {
    fn from(value: LValue) -> Self {
        Self(value)
    }
}

impl PartialEq for ValueKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.value_eq(&other.0)
    }
}

impl Eq for ValueKey {}

impl Hash for ValueKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match &self.0 {
            // String keys hash the way `str` does, so that `&str` lookups find them
            LValue::Str(s) => s.as_str().hash(state),
            other => hash_value_into(other, state),
        }
    }
}

impl fmt::Display for ValueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<LString> for ValueKey {
    fn from(value: LString) -> Self {
        Self(LValue::Str(value))
    }
}

impl From<&str> for ValueKey {
    fn from(value: &str) -> Self {
        Self(LValue::Str(value.into()))
    }
}

impl From<i64> for ValueKey {
    fn from(value: i64) -> Self {
        Self(LValue::Int(value))
    }
}

// Support efficient map accesses with &str
impl Equivalent<ValueKey> for str {
    fn equivalent(&self, other: &ValueKey) -> bool {
        match &other.0 {
            LValue::Str(s) => self == s.as_str(),
            _ => false,
        }
    }
}

impl Equivalent<ValueKey> for LString {
    fn equivalent(&self, other: &ValueKey) -> bool {
        match &other.0 {
            LValue::Str(s) => self == s,
            _ => false,
        }
    }
}
