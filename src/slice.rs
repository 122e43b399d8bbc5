// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::error::{illegal_argument, ArrayError};

/// A slice (range with step size) of one axis.
///
/// Negative `start` or `end` indexes are counted from the back of the axis.
/// If `end` is `None`, the slice extends to the end of the axis.
///
/// ## Examples
///
/// `Slice::new(0, None, 1)` is the full range of an axis. It can also be
/// created with `Slice::from(..)`.
///
/// `Slice::new(a, Some(b), 2)` is every second element from `a` until `b`.
/// It can also be created with `Slice::from(a..b).step_by(2)`.
///
/// `Slice::new(a, None, -1)` is every element, from `a` until the end, in
/// reverse order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Slice {
    /// start index; negative are counted from the back of the axis
    pub start: isize,
    /// end index; negative are counted from the back of the axis; when not
    /// present the default is the full length of the axis.
    pub end: Option<isize>,
    /// step size in elements; the default is 1, for every element.
    pub step: isize,
}

impl Slice {
    /// Create a new `Slice` with the given extents.
    ///
    /// A zero `step` is reported when the slice is applied.
    pub fn new(start: isize, end: Option<isize>, step: isize) -> Slice {
        Slice { start, end, step }
    }

    /// Create a new `Slice` with the given step size (multiplied with the
    /// previous step size).
    #[inline]
    pub fn step_by(self, step: isize) -> Self {
        Slice {
            step: self.step * step,
            ..self
        }
    }

    /// Resolve the slice against an axis of length `len`.
    ///
    /// Returns the index of the first selected element, the number of
    /// selected elements and the step.
    pub(crate) fn resolve(&self, len: usize) -> Result<(usize, usize, isize), ArrayError> {
        if self.step == 0 {
            return Err(illegal_argument("slice step must be nonzero"));
        }
        let start = abs_index(len, self.start)?;
        let mut end = abs_index(len, self.end.unwrap_or(len as isize))?;
        if end < start {
            end = start;
        }
        let m = end - start;
        let step = self.step.unsigned_abs();
        let count = m / step + usize::from(m % step > 0);
        let first = if self.step < 0 && m > 0 { end - 1 } else { start };
        Ok((first, count, self.step))
    }
}

fn abs_index(len: usize, index: isize) -> Result<usize, ArrayError> {
    let abs = if index < 0 { len as isize + index } else { index };
    if abs < 0 || abs as usize > len {
        Err(illegal_argument(format!("slice index {} out of bounds for axis of length {}", index, len)))
    } else {
        Ok(abs as usize)
    }
}

macro_rules! impl_slice_from_index_type {
    ($index:ty) => {
        impl From<Range<$index>> for Slice {
            #[inline]
            fn from(r: Range<$index>) -> Slice {
                Slice {
                    start: r.start as isize,
                    end: Some(r.end as isize),
                    step: 1,
                }
            }
        }

        impl From<RangeFrom<$index>> for Slice {
            #[inline]
            fn from(r: RangeFrom<$index>) -> Slice {
                Slice {
                    start: r.start as isize,
                    end: None,
                    step: 1,
                }
            }
        }

        impl From<RangeTo<$index>> for Slice {
            #[inline]
            fn from(r: RangeTo<$index>) -> Slice {
                Slice {
                    start: 0,
                    end: Some(r.end as isize),
                    step: 1,
                }
            }
        }
    };
}

impl_slice_from_index_type!(isize);
impl_slice_from_index_type!(usize);
impl_slice_from_index_type!(i32);

impl From<RangeFull> for Slice {
    #[inline]
    fn from(_: RangeFull) -> Slice {
        Slice {
            start: 0,
            end: None,
            step: 1,
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start != 0 {
            write!(f, "{}", self.start)?;
        }
        write!(f, "..")?;
        if let Some(i) = self.end {
            write!(f, "{}", i)?;
        }
        if self.step != 1 {
            write!(f, ";{}", self.step)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Slice;

    #[test]
    fn resolve() {
        assert_eq!(Slice::from(..).resolve(5).unwrap(), (0, 5, 1));
        assert_eq!(Slice::from(1..4).resolve(5).unwrap(), (1, 3, 1));
        assert_eq!(Slice::from(0..5).step_by(2).resolve(5).unwrap(), (0, 3, 2));
        assert_eq!(Slice::from(..).step_by(-1).resolve(5).unwrap(), (4, 5, -1));
        assert_eq!(Slice::new(-2, None, 1).resolve(5).unwrap(), (3, 2, 1));
        assert_eq!(Slice::from(3..1).resolve(5).unwrap(), (3, 0, 1));
        assert!(Slice::from(0..6).resolve(5).is_err());
        assert!(Slice::new(0, None, 0).resolve(5).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Slice::from(..).to_string(), "..");
        assert_eq!(Slice::from(1..4).step_by(2).to_string(), "1..4;2");
    }
}
