// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use crate::error::ArrayError;
use crate::range::Range;
use crate::{Array, BooleanArray, DoubleArray, IntArray, ObjectArray};

/// Creates arrays for a backend.
///
/// All backends in this crate share one storage representation, so the
/// factory of every backend builds the same [`Array`] type; arrays from
/// different backends can be mixed freely.
#[derive(Copy, Clone, Debug, Default)]
pub struct ArrayFactory {
    _private: (),
}

impl ArrayFactory {
    pub const fn new() -> Self {
        ArrayFactory { _private: () }
    }

    /// Create a one-dimensional array from a vector.
    pub fn array<A>(&self, data: Vec<A>) -> Array<A> {
        Array::from_vec(data)
    }

    /// Create a matrix from its rows.
    ///
    /// **Errors** if the rows differ in length.
    pub fn matrix<A, R>(&self, rows: &[R]) -> Result<Array<A>, ArrayError>
    where
        A: Clone,
        R: AsRef<[A]>,
    {
        Array::from_rows(rows)
    }

    /// Create an array with the given shape from column-major data.
    pub fn from_shape_vec<A>(&self, shape: &[usize], data: Vec<A>) -> Result<Array<A>, ArrayError> {
        Array::from_shape_vec(shape, data)
    }

    /// A zero-filled `f64` array.
    pub fn double_array(&self, shape: &[usize]) -> DoubleArray {
        DoubleArray::zeros(shape)
    }

    /// A zero-filled `i32` array.
    pub fn int_array(&self, shape: &[usize]) -> IntArray {
        IntArray::zeros(shape)
    }

    /// A `false`-filled array.
    pub fn boolean_array(&self, shape: &[usize]) -> BooleanArray {
        BooleanArray::default(shape)
    }

    /// An array of default values.
    pub fn object_array<T: Default>(&self, shape: &[usize]) -> ObjectArray<T> {
        ObjectArray::default(shape)
    }

    pub fn zeros(&self, shape: &[usize]) -> DoubleArray {
        DoubleArray::zeros(shape)
    }

    pub fn ones(&self, shape: &[usize]) -> DoubleArray {
        DoubleArray::ones(shape)
    }

    /// A square matrix with `data` on its diagonal.
    pub fn diag(&self, data: &DoubleArray) -> Result<DoubleArray, ArrayError> {
        DoubleArray::from_diag(data)
    }

    pub fn eye(&self, n: usize) -> DoubleArray {
        DoubleArray::eye(n)
    }

    /// `n` evenly spaced values from `start` to `end`, inclusive.
    pub fn linspace(&self, start: f64, end: f64, n: usize) -> DoubleArray {
        DoubleArray::linspace(start, end, n)
    }

    /// The range `start, start + step, ...` excluding `end`.
    pub fn range(&self, start: i32, end: i32, step: i32) -> Result<Range, ArrayError> {
        Range::new(start, end, step)
    }

    /// The range `0, 1, ..., end - 1`.
    pub fn range_to(&self, end: i32) -> Result<Range, ArrayError> {
        Range::new(0, end, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::ArrayFactory;

    #[test]
    fn builds_root_arrays() {
        let bj = ArrayFactory::new();
        let m = bj.matrix(&[[1., 2.], [3., 4.]]).unwrap();
        assert_eq!(m.get(&[1, 0]).unwrap(), 3.);
        assert!(!m.is_view());
        assert_eq!(bj.boolean_array(&[2]).to_vec(), vec![false, false]);
        assert_eq!(bj.object_array::<String>(&[1]).to_vec(), vec![String::new()]);
        assert_eq!(bj.range_to(3).unwrap().to_vec(), vec![0, 1, 2]);
        assert!(bj.range(0, 3, 0).is_err());
    }
}
