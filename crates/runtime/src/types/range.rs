use crate::{Error, Result, runtime_error};
use std::fmt;

/// The integer range type used by the Lute runtime
///
/// Ranges are half-open and stepped: `start:end:step` covers the values reached from
/// `start` by repeatedly adding `step` while staying on the `start` side of `end`.
/// A negative step produces a descending range. A step of zero is rejected at
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LRange {
    start: i64,
    end: i64,
    step: i64,
}

impl LRange {
    /// Initializes a range with the given bounds and step
    ///
    /// Returns an error if `step` is zero.
    pub fn new(start: i64, end: i64, step: i64) -> Result<Self> {
        if step == 0 {
            return runtime_error!("a range's step can't be zero");
        }

        Ok(Self { start, end, step })
    }

    /// Initializes a range from optional parts, as produced by range expressions
    ///
    /// Missing parts take their defaults: `start = 0`, `end = i64::MAX`, `step = 1`.
    pub fn from_parts(
        start: Option<i64>,
        end: Option<i64>,
        step: Option<i64>,
    ) -> Result<Self> {
        Self::new(
            start.unwrap_or(0),
            end.unwrap_or(i64::MAX),
            step.unwrap_or(1),
        )
    }

    /// Returns the start of the range
    pub fn start(&self) -> i64 {
        self.start
    }

    /// Returns the end of the range
    pub fn end(&self) -> i64 {
        self.end
    }

    /// Returns the range's step
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Returns true if the range is ascending
    pub fn is_ascending(&self) -> bool {
        self.step > 0
    }

    /// Returns true if the given value would be produced by iterating over the range
    ///
    /// Membership agrees with iteration: the range is half-open in the direction of its
    /// step, and the value needs to be reachable from `start` in `step`-sized increments.
    pub fn contains(&self, n: i64) -> bool {
        let in_bounds = if self.is_ascending() {
            self.start <= n && n < self.end
        } else {
            self.end < n && n <= self.start
        };

        // i128 arithmetic avoids overflow for bounds near the i64 limits
        in_bounds && (n as i128 - self.start as i128) % self.step as i128 == 0
    }

    /// Returns the number of values produced by iterating over the range
    pub fn size(&self) -> usize {
        let (start, end, step) = (
            self.start as i128,
            self.end as i128,
            self.step as i128,
        );

        let span = if self.is_ascending() {
            end - start
        } else {
            start - end
        };

        if span <= 0 {
            0
        } else {
            ((span + step.abs() - 1) / step.abs()) as usize
        }
    }

    /// Removes and returns the first value in the range
    ///
    /// This is the iteration driver used by range iterators: the start bound advances by
    /// `step` until it passes `end` (in the direction of the step), at which point `None`
    /// is returned.
    pub fn pop_front(&mut self) -> Option<i64> {
        let exhausted = if self.is_ascending() {
            self.start >= self.end
        } else {
            self.start <= self.end
        };

        if exhausted {
            return None;
        }

        let result = self.start;
        self.start = match self.start.checked_add(self.step) {
            Some(next) => next,
            // The next value can't be represented, so it's necessarily past the end
            None => self.end,
        };
        Some(result)
    }
}

impl From<std::ops::Range<i64>> for LRange {
    fn from(range: std::ops::Range<i64>) -> Self {
        Self {
            start: range.start,
            end: range.end,
            step: 1,
        }
    }
}

impl TryFrom<(i64, i64, i64)> for LRange {
    type Error = Error;

    fn try_from((start, end, step): (i64, i64, i64)) -> Result<Self> {
        Self::new(start, end, step)
    }
}

impl fmt::Display for LRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.start, self.end, self.step)
    }
}
