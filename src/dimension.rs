// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Shape and stride arithmetic.
//!
//! Arrays in this crate are laid out in column-major ("Fortran") order by
//! default: the first axis varies fastest. All functions here are pure.

use crate::error::{illegal_argument, ArrayError};

/// Return the number of elements of an array with the given shape.
///
/// The empty shape has size 1; any zero-length axis gives size 0.
///
/// **Panics** if the product overflows `usize`; see [`size_checked`].
#[inline]
pub fn size(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Return the number of elements of an array with the given shape, or
/// `None` if the product overflows.
pub fn size_checked(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d))
}

/// Compute the default (column-major) strides of the shape.
///
/// ```
/// use ndbackend::dimension::compute_stride;
/// assert_eq!(compute_stride(&[2, 3, 4]), vec![1, 2, 6]);
/// ```
#[inline]
pub fn compute_stride(shape: &[usize]) -> Vec<isize> {
    compute_stride_from(1, shape)
}

/// Compute column-major strides starting from the stride `st` of the
/// first axis.
pub fn compute_stride_from(st: isize, shape: &[usize]) -> Vec<isize> {
    let mut st = st;
    let mut strides = Vec::with_capacity(shape.len());
    for &d in shape {
        strides.push(st);
        st *= d as isize;
    }
    strides
}

/// Return the signed distance from the array offset to the element at
/// `index`, i.e. `Σ index[d] * strides[d]`.
#[inline]
pub fn stride_offset(index: &[usize], strides: &[isize]) -> isize {
    index
        .iter()
        .zip(strides)
        .fold(0, |acc, (&i, &s)| acc + i as isize * s)
}

/// Return the buffer position of the element at `index`:
/// `offset + Σ index[d] * strides[d]`.
#[inline]
pub fn offset(index: &[usize], offset: usize, strides: &[isize]) -> usize {
    (offset as isize + stride_offset(index, strides)) as usize
}

/// Return the buffer position of the `i`-th element when the array is
/// traversed in column-major logical order.
///
/// This is the inverse of the column-major raveling of a multi-index.
#[inline]
pub fn linear_offset(i: usize, offset: usize, strides: &[isize], shape: &[usize]) -> usize {
    let pos = match strides.len() {
        0 => offset as isize,
        1 => offset as isize + i as isize * strides[0],
        2 => {
            let rows = shape[0];
            let (col, row) = (i / rows, i % rows);
            offset as isize + row as isize * strides[0] + col as isize * strides[1]
        }
        _ => {
            let mut rest = i;
            let mut pos = offset as isize;
            for (&d, &s) in shape.iter().zip(strides) {
                pos += (rest % d) as isize * s;
                rest /= d;
            }
            pos
        }
    };
    pos as usize
}

/// Convert the column-major linear position `i` to a multi-index.
pub fn unravel_index(i: usize, shape: &[usize]) -> Vec<usize> {
    let mut rest = i;
    shape
        .iter()
        .map(|&d| {
            let ix = rest % d;
            rest /= d;
            ix
        })
        .collect()
}

/// Check that `index` has the rank of `shape` and that every component is
/// inside `[0, shape[d])`.
pub fn check_index(index: &[usize], shape: &[usize]) -> Result<(), ArrayError> {
    if index.len() != shape.len() || index.iter().zip(shape).any(|(&i, &d)| i >= d) {
        Err(ArrayError::IndexOutOfBounds {
            index: index.to_vec(),
            shape: shape.to_vec(),
        })
    } else {
        Ok(())
    }
}

/// Check that every element addressed by `(offset, shape, strides)` lies
/// inside a buffer of length `len`.
pub fn can_index_buffer(
    len: usize,
    offset: usize,
    shape: &[usize],
    strides: &[isize],
) -> Result<(), ArrayError> {
    if shape.len() != strides.len() {
        return Err(illegal_argument(format!(
            "shape {:?} and strides {:?} have different rank",
            shape, strides
        )));
    }
    let n = size_checked(shape).ok_or_else(|| illegal_argument(format!("shape {:?} overflows", shape)))?;
    if n == 0 {
        return if offset <= len {
            Ok(())
        } else {
            Err(illegal_argument(format!("offset {} out of bounds for buffer of length {}", offset, len)))
        };
    }
    let mut low = offset as isize;
    let mut high = offset as isize;
    for (&d, &s) in shape.iter().zip(strides) {
        let reach = (d as isize - 1) * s;
        if reach < 0 {
            low += reach;
        } else {
            high += reach;
        }
    }
    if low < 0 || high >= len as isize {
        Err(illegal_argument(format!(
            "view (offset {}, shape {:?}, strides {:?}) out of bounds for buffer of length {}",
            offset, shape, strides, len
        )))
    } else {
        Ok(())
    }
}

/// True if `strides` are the default column-major strides of `shape`.
#[inline]
pub fn is_default_strides(shape: &[usize], strides: &[isize]) -> bool {
    compute_stride(shape) == strides
}

/// Return a copy of `v` without the element at `axis`.
pub fn remove_axis<A: Copy>(v: &[A], axis: usize) -> Vec<A> {
    v.iter()
        .enumerate()
        .filter(|&(i, _)| i != axis)
        .map(|(_, &x)| x)
        .collect()
}

/// Return a reversed copy of `v`.
pub fn reverse<A: Copy>(v: &[A]) -> Vec<A> {
    v.iter().rev().copied().collect()
}

/// An iterator over the buffer positions of an array in column-major
/// logical order.
#[derive(Clone, Debug)]
pub struct Positions<'a> {
    shape: &'a [usize],
    strides: &'a [isize],
    index: Vec<usize>,
    pos: isize,
    remaining: usize,
}

impl<'a> Positions<'a> {
    pub fn new(offset: usize, shape: &'a [usize], strides: &'a [isize]) -> Self {
        Positions {
            shape,
            strides,
            index: vec![0; shape.len()],
            pos: offset as isize,
            remaining: size(shape),
        }
    }
}

impl<'a> Iterator for Positions<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.pos as usize;
        self.remaining -= 1;
        if self.remaining > 0 {
            // odometer, first axis fastest
            for axis in 0..self.index.len() {
                self.index[axis] += 1;
                self.pos += self.strides[axis];
                if self.index[axis] < self.shape[axis] {
                    break;
                }
                self.pos -= self.index[axis] as isize * self.strides[axis];
                self.index[axis] = 0;
            }
        }
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a> ExactSizeIterator for Positions<'a> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(size(&[]), 1);
        assert_eq!(size(&[3, 0, 2]), 0);
        assert_eq!(size(&[3, 4, 2]), 24);
        assert_eq!(size_checked(&[usize::MAX, 2]), None);
    }

    #[test]
    fn strides_are_column_major() {
        assert_eq!(compute_stride(&[3]), vec![1]);
        assert_eq!(compute_stride(&[3, 4]), vec![1, 3]);
        assert_eq!(compute_stride_from(2, &[3, 4]), vec![2, 6]);
        assert!(is_default_strides(&[3, 4], &[1, 3]));
        assert!(!is_default_strides(&[3, 4], &[4, 1]));
    }

    #[test]
    fn linear_offsets_match_positions() {
        let shape = [3, 2, 4];
        let strides = [2, 12, -24];
        let offset = 100;
        let positions: Vec<_> = Positions::new(offset, &shape, &strides).collect();
        assert_eq!(positions.len(), 24);
        for (i, &p) in positions.iter().enumerate() {
            assert_eq!(p, linear_offset(i, offset, &strides, &shape));
            let index = unravel_index(i, &shape);
            assert_eq!(p, super::offset(&index, offset, &strides));
        }
    }

    #[test]
    fn index_checks() {
        assert!(check_index(&[1, 2], &[2, 3]).is_ok());
        assert!(check_index(&[2, 0], &[2, 3]).is_err());
        assert!(check_index(&[0], &[2, 3]).is_err());
    }

    #[test]
    fn buffer_bounds() {
        assert!(can_index_buffer(6, 0, &[2, 3], &[1, 2]).is_ok());
        assert!(can_index_buffer(6, 1, &[2, 3], &[1, 2]).is_err());
        assert!(can_index_buffer(6, 5, &[3], &[-2]).is_ok());
        assert!(can_index_buffer(6, 3, &[3], &[-2]).is_err());
        assert!(can_index_buffer(0, 0, &[0, 3], &[1, 1]).is_ok());
    }

    #[test]
    fn axes() {
        assert_eq!(remove_axis(&[1, 2, 3], 1), vec![1, 3]);
        assert_eq!(reverse(&[1, 2, 3]), vec![3, 2, 1]);
    }
}
