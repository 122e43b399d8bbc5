// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::ops::Deref;

use crate::error::{illegal_argument, ArrayError};
use crate::IntArray;

/// An immutable arithmetic progression `start, start + step, ...` up to,
/// but not including, `end`.
///
/// A `Range` dereferences to a read-only [`IntArray`] view holding the
/// progression: every array method is available, every mutating method
/// fails with an unsupported-operation error.
///
/// ```
/// use ndbackend::Range;
///
/// let r = Range::new(0, 10, 2).unwrap();
/// assert_eq!(r.size(), 5);
/// assert_eq!(r.to_vec(), vec![0, 2, 4, 6, 8]);
/// assert!(r.contains(6));
/// assert!(r.set(&[0], 1).is_err());
/// ```
pub struct Range {
    start: i32,
    end: i32,
    step: i32,
    array: IntArray,
}

impl Range {
    /// Create the range `[start, end)` with the given step.
    ///
    /// **Errors** if `step` is zero, or if `end` cannot be reached from
    /// `start` in the direction of `step`.
    pub fn new(start: i32, end: i32, step: i32) -> Result<Range, ArrayError> {
        let size = range_size(start, end, step)?;
        let values = (0..size).map(|i| start + i as i32 * step).collect();
        let array = IntArray::from_vec(values).view().into_read_only();
        Ok(Range {
            start,
            end,
            step,
            array,
        })
    }

    /// The range `[start, end)` with step 1.
    pub fn exclusive(start: i32, end: i32) -> Result<Range, ArrayError> {
        Range::new(start, end, 1)
    }

    pub fn start(&self) -> i32 {
        self.start
    }

    pub fn end(&self) -> i32 {
        self.end
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Return `true` if `value` is an element of the progression.
    pub fn contains(&self, value: i32) -> bool {
        let (start, end, step) = (i64::from(self.start), i64::from(self.end), i64::from(self.step));
        let value = i64::from(value);
        let inside = if step > 0 {
            value >= start && value < end
        } else {
            value <= start && value > end
        };
        inside && (value - start) % step == 0
    }

    /// A range with positive step is already sorted; this is a no-op.
    ///
    /// **Errors** for a negative step, since sorting would require
    /// mutation.
    pub fn sort(&self) -> Result<(), ArrayError> {
        if self.step > 0 || self.array.size() <= 1 {
            Ok(())
        } else {
            Err(ArrayError::Unsupported("a range with negative step cannot be sorted"))
        }
    }

    /// Return the elements of the range as an [`IntArray`] view.
    pub fn as_array(&self) -> &IntArray {
        &self.array
    }
}

fn range_size(start: i32, end: i32, step: i32) -> Result<usize, ArrayError> {
    if step == 0 {
        return Err(illegal_argument("range step must be nonzero"));
    }
    if (start < end && step < 0) || (start > end && step > 0) {
        return Err(illegal_argument(format!(
            "range {}..{} cannot be traversed with step {}",
            start, end, step
        )));
    }
    let span = (i64::from(end) - i64::from(start)).unsigned_abs();
    let step = i64::from(step).unsigned_abs();
    Ok((span / step + u64::from(span % step != 0)) as usize)
}

impl Deref for Range {
    type Target = IntArray;

    fn deref(&self) -> &IntArray {
        &self.array
    }
}

/// Two ranges are equal if they have the same start, end and step.
impl PartialEq for Range {
    fn eq(&self, other: &Range) -> bool {
        (self.start, self.end, self.step) == (other.start, other.end, other.step)
    }
}

impl Eq for Range {}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Range")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("step", &self.step)
            .finish()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.array.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn sizes() {
        assert_eq!(range_size(0, 10, 3).unwrap(), 4);
        assert_eq!(range_size(0, 9, 3).unwrap(), 3);
        assert_eq!(range_size(5, 5, 1).unwrap(), 0);
        assert_eq!(range_size(10, 0, -4).unwrap(), 3);
        assert_eq!(range_size(0, 10, -1).unwrap_err().kind(), ErrorKind::IllegalArgument);
        assert_eq!(range_size(0, 10, 0).unwrap_err().kind(), ErrorKind::IllegalArgument);
    }

    #[test]
    fn negative_step() {
        let r = Range::new(10, 0, -3).unwrap();
        assert_eq!(r.to_vec(), vec![10, 7, 4, 1]);
        assert!(r.contains(4));
        assert!(!r.contains(0));
        assert!(!r.contains(5));
        assert_eq!(r.sort().unwrap_err().kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn contains_is_relative_to_start() {
        let r = Range::new(1, 10, 3).unwrap();
        assert!(r.contains(7));
        assert!(!r.contains(6));
        assert!(!r.contains(10));
    }

    #[test]
    fn always_a_read_only_view() {
        let r = Range::exclusive(0, 3).unwrap();
        assert!(r.is_view());
        assert!(r.is_read_only());
        assert_eq!(r.set_flat(0, 1).unwrap_err().kind(), ErrorKind::Unsupported);
        let sub = r.as_view(1, &[2], &[1]).unwrap();
        assert!(sub.is_read_only());
        assert_eq!(Range::exclusive(0, 3).unwrap(), r);
    }
}
