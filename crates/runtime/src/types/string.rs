use crate::Ptr;
use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    ops::{Deref, Range},
};

/// The string type used by the Lute runtime
///
/// The underlying string data is immutable and shared between instances, with internal
/// bounds allowing for shared subslices. Substrings produced by slicing or iteration
/// share the lifetime of their source data, so no copies are made.
#[derive(Clone)]
pub struct LString(Inner);

#[derive(Clone)]
enum Inner {
    // A string that covers all of its data
    Full(Ptr<str>),
    // A string with bounds into shared data
    //
    // By heap-allocating the bounds the size of LString is kept at two words.
    Slice(Ptr<StringSlice>),
}

#[derive(Clone)]
struct StringSlice {
    data: Ptr<str>,
    bounds: Range<usize>,
}

impl LString {
    /// Returns a new LString with shared data and new bounds
    ///
    /// The bounds are relative to the current string's bounds, so the result is always a
    /// subslice of the input. If the bounds are out of range, or would split a UTF-8
    /// code point, then `None` is returned.
    pub fn with_bounds(&self, new_bounds: Range<usize>) -> Option<Self> {
        let (data, base) = match &self.0 {
            Inner::Full(data) => (data, 0),
            Inner::Slice(slice) => (&slice.data, slice.bounds.start),
        };

        if new_bounds.end < new_bounds.start || new_bounds.end > self.len() {
            return None;
        }

        let bounds = (base + new_bounds.start)..(base + new_bounds.end);
        // str::get validates both the range and the code point boundaries
        data.get(bounds.clone())?;

        Some(Self(Inner::Slice(
            StringSlice {
                data: data.clone(),
                bounds,
            }
            .into(),
        )))
    }

    /// Returns the string as a `&str`
    pub fn as_str(&self) -> &str {
        self
    }

    /// Returns true if the two strings share the same data and bounds
    pub fn is_same_instance(&self, other: &Self) -> bool {
        let (data_a, bounds_a) = self.data_and_bounds();
        let (data_b, bounds_b) = other.data_and_bounds();
        Ptr::ptr_eq(data_a, data_b) && bounds_a == bounds_b
    }

    /// Returns true if the other string shares this string's data
    pub fn shares_data_with(&self, other: &Self) -> bool {
        Ptr::ptr_eq(self.data_and_bounds().0, other.data_and_bounds().0)
    }

    fn data_and_bounds(&self) -> (&Ptr<str>, Range<usize>) {
        match &self.0 {
            Inner::Full(data) => (data, 0..data.len()),
            Inner::Slice(slice) => (&slice.data, slice.bounds.clone()),
        }
    }
}

impl Default for LString {
    fn default() -> Self {
        Self(Inner::Full("".into()))
    }
}

impl From<Ptr<str>> for LString {
    fn from(data: Ptr<str>) -> Self {
        Self(Inner::Full(data))
    }
}

impl From<&str> for LString {
    fn from(data: &str) -> Self {
        Self(Inner::Full(data.into()))
    }
}

impl From<String> for LString {
    fn from(data: String) -> Self {
        Self(Inner::Full(data.into()))
    }
}

impl Deref for LString {
    type Target = str;

    fn deref(&self) -> &str {
        match &self.0 {
            Inner::Full(data) => data,
            Inner::Slice(slice) => &slice.data[slice.bounds.clone()],
        }
    }
}

impl AsRef<str> for LString {
    fn as_ref(&self) -> &str {
        self
    }
}

impl PartialEq for LString {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for LString {}

impl PartialEq<&str> for LString {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl PartialOrd for LString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Hash for LString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write(self.as_bytes());
    }
}

impl fmt::Display for LString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self)
    }
}

impl fmt::Debug for LString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_bounds_shares_data() {
        let s = LString::from("hello, world!");
        let hello = s.with_bounds(0..5).unwrap();
        assert_eq!(hello, "hello");
        assert!(hello.shares_data_with(&s));

        let world = s.with_bounds(7..12).unwrap();
        assert_eq!(world, "world");
    }

    #[test]
    fn with_bounds_relative_to_slice() {
        let s = LString::from("hello, world!");
        let world = s.with_bounds(7..13).unwrap();
        let orl = world.with_bounds(1..4).unwrap();
        assert_eq!(orl, "orl");
    }

    #[test]
    fn with_bounds_rejects_split_code_points() {
        let s = LString::from("héllo");
        assert!(s.with_bounds(0..2).is_none());
        assert_eq!(s.with_bounds(1..3).unwrap(), "é");
    }

    #[test]
    fn with_bounds_out_of_range() {
        let s = LString::from("abc");
        assert!(s.with_bounds(1..5).is_none());
    }
}
