use crate::{
    Error, LList, LMap, LRange, LString, LTuple, LValue, LuteSend, LuteSync, PtrMut, Result,
    make_ptr_mut, runtime_error,
};
use std::{fmt, result::Result as StdResult};

/// The trait used to implement iterators in the Lute runtime
///
/// Each iterable source has its own iterator type with a cursor that matches the source:
/// an element index for tuples, lists, and maps, a byte offset for strings, and the
/// range itself for ranges.
pub trait LuteIterator: Iterator<Item = LIteratorOutput> + LuteSend + LuteSync {
    /// Returns a copy of the iterator that will produce the same remaining output
    fn make_copy(&self) -> LIterator;

    /// Returns the value being iterated over
    ///
    /// The collector uses this to keep an iterator's source reachable.
    fn source(&self) -> LValue;
}

/// The output type for iterators in the Lute runtime
#[derive(Clone)]
pub enum LIteratorOutput {
    /// A single value
    Value(LValue),
    /// A pair of values
    ///
    /// This is used by map iterators, which produce key/value pairs. The pair
    /// materializes as a fresh tuple when it's converted into an [LValue], so consumers
    /// never observe shared pair storage between iteration steps.
    ValuePair(LValue, LValue),
    /// An error that occurred during iteration
    Error(Error),
}

impl<T> From<T> for LIteratorOutput
where
    LValue: From<T>,
{
    fn from(value: T) -> Self {
        Self::Value(value.into())
    }
}

impl TryFrom<LIteratorOutput> for LValue {
    type Error = Error;

    fn try_from(output: LIteratorOutput) -> StdResult<Self, Error> {
        match output {
            LIteratorOutput::Value(value) => Ok(value),
            LIteratorOutput::ValuePair(first, second) => {
                Ok(LValue::Tuple(LTuple::from(vec![first, second])))
            }
            LIteratorOutput::Error(error) => Err(error),
        }
    }
}

/// The iterator value type used in the Lute runtime
#[derive(Clone)]
pub struct LIterator(PtrMut<dyn LuteIterator>);

impl LIterator {
    /// Creates a new LIterator from any type that implements [LuteIterator]
    pub fn new(iterator: impl LuteIterator + 'static) -> Self {
        Self(make_ptr_mut!(iterator))
    }

    /// Creates an iterator over the given value
    ///
    /// Ranges, strings, tuples, lists, and maps are iterable; anything else produces an
    /// "invalid type for iteration" error.
    pub fn make(value: &LValue) -> Result<Self> {
        let result = match value {
            LValue::Range(r) => Self::with_range(*r),
            LValue::Str(s) => Self::with_string(s.clone()),
            LValue::Tuple(t) => Self::with_tuple(t.clone()),
            LValue::List(l) => Self::with_list(l.clone()),
            LValue::Map(m) => Self::with_map(m.clone()),
            unexpected => {
                return runtime_error!(
                    "invalid type for iteration: '{}'",
                    unexpected.type_as_string()
                );
            }
        };
        Ok(result)
    }

    /// Creates a new LIterator from a range
    pub fn with_range(range: LRange) -> Self {
        Self::new(RangeIterator { range })
    }

    /// Creates a new LIterator from a string
    pub fn with_string(s: LString) -> Self {
        Self::new(StringIterator { data: s, offset: 0 })
    }

    /// Creates a new LIterator from a tuple
    pub fn with_tuple(tuple: LTuple) -> Self {
        Self::new(TupleIterator {
            data: tuple,
            index: 0,
        })
    }

    /// Creates a new LIterator from a list
    pub fn with_list(list: LList) -> Self {
        Self::new(ListIterator {
            data: list,
            index: 0,
        })
    }

    /// Creates a new LIterator from a map
    pub fn with_map(map: LMap) -> Self {
        Self::new(MapIterator {
            data: map,
            index: 0,
        })
    }

    /// Makes a copy of the iterator
    ///
    /// See [LuteIterator::make_copy]
    pub fn make_copy(&self) -> Self {
        self.0.borrow().make_copy()
    }

    /// Returns the value being iterated over
    ///
    /// See [LuteIterator::source]
    pub fn source(&self) -> LValue {
        self.0.borrow().source()
    }

    /// Returns the next value produced by the iterator
    ///
    /// `None` signals exhaustion, which the dispatcher translates into the null value.
    /// Signalling out-of-band keeps exhaustion distinguishable from a container that
    /// legitimately holds nulls.
    pub fn next_value(&mut self) -> Result<Option<LValue>> {
        match self.next() {
            Some(output) => LValue::try_from(output).map(Some),
            None => Ok(None),
        }
    }
}

impl Iterator for LIterator {
    type Item = LIteratorOutput;

    fn next(&mut self) -> Option<Self::Item> {
        self.0.borrow_mut().next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.borrow().size_hint()
    }
}

impl fmt::Debug for LIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LIterator")
    }
}

// Convenience type alias for the rest of this module
type Output = LIteratorOutput;

#[derive(Clone)]
struct RangeIterator {
    range: LRange,
}

impl LuteIterator for RangeIterator {
    fn make_copy(&self) -> LIterator {
        LIterator::new(self.clone())
    }

    fn source(&self) -> LValue {
        LValue::Range(self.range)
    }
}

impl Iterator for RangeIterator {
    type Item = Output;

    fn next(&mut self) -> Option<Self::Item> {
        self.range.pop_front().map(Output::from)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.range.size();
        (remaining, Some(remaining))
    }
}

#[derive(Clone)]
struct TupleIterator {
    data: LTuple,
    index: usize,
}

impl LuteIterator for TupleIterator {
    fn make_copy(&self) -> LIterator {
        LIterator::new(self.clone())
    }

    fn source(&self) -> LValue {
        LValue::Tuple(self.data.clone())
    }
}

impl Iterator for TupleIterator {
    type Item = Output;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.data.data().get(self.index).cloned()?;
        self.index += 1;
        Some(Output::Value(result))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

#[derive(Clone)]
struct ListIterator {
    data: LList,
    index: usize,
}

impl LuteIterator for ListIterator {
    fn make_copy(&self) -> LIterator {
        LIterator::new(self.clone())
    }

    fn source(&self) -> LValue {
        LValue::List(self.data.clone())
    }
}

impl Iterator for ListIterator {
    type Item = Output;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.data.data().get(self.index).cloned()?;
        self.index += 1;
        Some(Output::Value(result))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

#[derive(Clone)]
struct StringIterator {
    data: LString,
    // A byte offset into the string data, always on a code point boundary
    offset: usize,
}

impl LuteIterator for StringIterator {
    fn make_copy(&self) -> LIterator {
        LIterator::new(self.clone())
    }

    fn source(&self) -> LValue {
        LValue::Str(self.data.clone())
    }
}

impl Iterator for StringIterator {
    type Item = Output;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.data.len() {
            return None;
        }

        let lead = self.data.as_bytes()[self.offset];
        let char_len = match lead {
            0x00..=0x7f => 1,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => {
                return Some(Output::Error(Error::from("invalid utf-8 sequence")));
            }
        };

        let bounds = self.offset..self.offset + char_len;
        match self.data.with_bounds(bounds) {
            Some(code_point) => {
                self.offset += char_len;
                Some(Output::Value(LValue::Str(code_point)))
            }
            None => Some(Output::Error(Error::from("invalid utf-8 sequence"))),
        }
    }
}

#[derive(Clone)]
struct MapIterator {
    data: LMap,
    index: usize,
}

impl LuteIterator for MapIterator {
    fn make_copy(&self) -> LIterator {
        LIterator::new(self.clone())
    }

    fn source(&self) -> LValue {
        LValue::Map(self.data.clone())
    }
}

impl Iterator for MapIterator {
    type Item = Output;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self
            .data
            .data()
            .get_index(self.index)
            .map(|(key, value)| Output::ValuePair(key.value().clone(), value.clone()))?;
        self.index += 1;
        Some(result)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.data.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}
