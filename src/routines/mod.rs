// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Array routines: BLAS level 1-3 operations and reductions over
//! [`DoubleArray`]s.
//!
//! [`ArrayRoutines`] is object safe; every method has a generic default
//! that works for any stride pattern. [`BlasArrayRoutines`] overrides the
//! BLAS operations and hands eligible operands to a [`Blas`](crate::kernel::Blas)
//! kernel.

use std::fmt;

use crate::error::ArrayError;
use crate::DoubleArray;

mod blas;
pub(crate) mod generic;

pub use self::blas::BlasArrayRoutines;

/// Transpose flag of a matrix operand.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// Use the matrix as it is.
    Keep,
    /// Use the transpose of the matrix.
    Transpose,
}

impl Op {
    pub fn is_transpose(self) -> bool {
        self == Op::Transpose
    }

    /// Shape of `op(A)` for an `A` of shape `(rows, cols)`.
    #[inline]
    pub(crate) fn apply(self, rows: usize, cols: usize) -> (usize, usize) {
        match self {
            Op::Keep => (rows, cols),
            Op::Transpose => (cols, rows),
        }
    }

    /// The BLAS/LAPACK character of the flag.
    pub fn as_char(self) -> char {
        match self {
            Op::Keep => 'n',
            Op::Transpose => 't',
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

pub(crate) const VECTOR_REQUIRED: &str = "vector required";
pub(crate) const MATRIX_REQUIRED: &str = "require 2d-array";

/// BLAS operations and reductions of a backend.
///
/// Output arguments are passed by shared reference, like every mutation of
/// an [`Array`](crate::Array), and must not be read-only.
///
/// ```
/// use ndbackend::{ArrayBackend, BaseBackend, DoubleArray};
///
/// let backend = BaseBackend::new();
/// let r = backend.array_routines();
/// let x = DoubleArray::from_vec(vec![1., 2., 3.]);
/// let y = DoubleArray::from_vec(vec![4., 5., 6.]);
/// assert_eq!(r.dot(&x, &y).unwrap(), 32.);
/// ```
pub trait ArrayRoutines: Send + Sync + fmt::Debug {
    /// `Σ a[i] * b[i]` of two vectors of equal size.
    fn dot(&self, a: &DoubleArray, b: &DoubleArray) -> Result<f64, ArrayError> {
        generic::dot(a, b)
    }

    /// Euclidean norm of a vector.
    fn norm2(&self, a: &DoubleArray) -> Result<f64, ArrayError> {
        generic::norm2(a)
    }

    /// `Σ |a[i]|` of a vector.
    fn asum(&self, a: &DoubleArray) -> Result<f64, ArrayError> {
        generic::asum(a)
    }

    /// Index of the first element of largest absolute value; 0 for an
    /// empty vector.
    fn iamax(&self, a: &DoubleArray) -> Result<usize, ArrayError> {
        generic::iamax(a)
    }

    /// `a ← alpha * a`
    fn scal(&self, alpha: f64, a: &DoubleArray) -> Result<(), ArrayError> {
        generic::scal(alpha, a)
    }

    /// `y ← alpha * x + y`
    fn axpy(&self, alpha: f64, x: &DoubleArray, y: &DoubleArray) -> Result<(), ArrayError> {
        generic::axpy(alpha, x, y)
    }

    /// `y ← alpha * op(a) * x + beta * y`
    fn gemv(
        &self,
        trans: Op,
        alpha: f64,
        a: &DoubleArray,
        x: &DoubleArray,
        beta: f64,
        y: &DoubleArray,
    ) -> Result<(), ArrayError> {
        generic::gemv(trans, alpha, a, x, beta, y)
    }

    /// `a ← alpha * x * yᵀ + a`
    fn ger(&self, alpha: f64, x: &DoubleArray, y: &DoubleArray, a: &DoubleArray) -> Result<(), ArrayError> {
        generic::ger(alpha, x, y, a)
    }

    /// `c ← alpha * op(a) * op(b) + beta * c`
    fn gemm(
        &self,
        transa: Op,
        transb: Op,
        alpha: f64,
        a: &DoubleArray,
        b: &DoubleArray,
        beta: f64,
        c: &DoubleArray,
    ) -> Result<(), ArrayError> {
        generic::gemm(transa, transb, alpha, a, b, beta, c)
    }

    /// Copy the elements of `from` into `to`, which must have the same
    /// size.
    fn copy(&self, from: &DoubleArray, to: &DoubleArray) -> Result<(), ArrayError> {
        generic::copy(from, to)
    }

    /// Exchange the elements of two arrays of the same shape.
    fn swap(&self, a: &DoubleArray, b: &DoubleArray) -> Result<(), ArrayError> {
        generic::swap(a, b)
    }

    fn sum(&self, x: &DoubleArray) -> f64 {
        generic::sum(x)
    }

    /// Arithmetic mean; NaN for an empty array.
    fn mean(&self, x: &DoubleArray) -> f64 {
        generic::mean(x)
    }

    /// Population variance; NaN for an empty array.
    fn var(&self, x: &DoubleArray) -> f64 {
        generic::var(x)
    }

    /// Population standard deviation.
    fn std(&self, x: &DoubleArray) -> f64 {
        generic::var(x).sqrt()
    }

    /// Smallest element; `+∞` for an empty array.
    fn min(&self, x: &DoubleArray) -> f64 {
        generic::min(x)
    }

    /// Largest element; `-∞` for an empty array.
    fn max(&self, x: &DoubleArray) -> f64 {
        generic::max(x)
    }

    /// Product of the elements; 1 for an empty array.
    fn prod(&self, x: &DoubleArray) -> f64 {
        generic::prod(x)
    }

    /// Cumulative sums in column-major logical order, in a new array of
    /// the same shape.
    fn cumsum(&self, x: &DoubleArray) -> DoubleArray {
        generic::cumsum(x)
    }

    /// Sum of the diagonal of a matrix.
    fn trace(&self, x: &DoubleArray) -> Result<f64, ArrayError> {
        generic::trace(x)
    }

    /// Sums of the lanes along `axis`; the result has the shape of `x`
    /// without `axis`.
    ///
    /// ```
    /// use ndbackend::{ArrayBackend, BaseBackend, DoubleArray};
    ///
    /// let backend = BaseBackend::new();
    /// let r = backend.array_routines();
    /// let x = DoubleArray::from_rows(&[[1., 2.], [3., 4.]]).unwrap();
    /// assert_eq!(r.sum_axis(&x, 0).unwrap().to_vec(), vec![4., 6.]);
    /// assert_eq!(r.sum_axis(&x, 1).unwrap().to_vec(), vec![3., 7.]);
    /// ```
    fn sum_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::reduce_axis(x, axis, |v| self.sum(v))
    }

    fn mean_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::reduce_axis(x, axis, |v| self.mean(v))
    }

    fn var_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::reduce_axis(x, axis, |v| self.var(v))
    }

    fn std_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::reduce_axis(x, axis, |v| self.std(v))
    }

    fn min_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::reduce_axis(x, axis, |v| self.min(v))
    }

    fn max_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::reduce_axis(x, axis, |v| self.max(v))
    }

    fn prod_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::reduce_axis(x, axis, |v| self.prod(v))
    }

    /// Cumulative sums along each lane of `axis`, in a new array of the
    /// same shape.
    fn cumsum_axis(&self, x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
        generic::cumsum_axis(x, axis)
    }

    /// See [`vstack`](crate::vstack).
    fn vstack(&self, arrays: &[&DoubleArray]) -> Result<DoubleArray, ArrayError> {
        crate::vstack(arrays)
    }

    /// See [`hstack`](crate::hstack).
    fn hstack(&self, arrays: &[&DoubleArray]) -> Result<DoubleArray, ArrayError> {
        crate::hstack(arrays)
    }

    /// See [`vsplit`](crate::vsplit).
    fn vsplit(&self, x: &DoubleArray, parts: usize) -> Result<Vec<DoubleArray>, ArrayError> {
        crate::vsplit(x, parts)
    }

    /// See [`hsplit`](crate::hsplit).
    fn hsplit(&self, x: &DoubleArray, parts: usize) -> Result<Vec<DoubleArray>, ArrayError> {
        crate::hsplit(x, parts)
    }

    /// See [`repmat`](crate::repmat).
    fn repmat(&self, x: &DoubleArray, r: usize, c: usize) -> Result<DoubleArray, ArrayError> {
        crate::repmat(x, r, c)
    }

    fn repeat(&self, x: &DoubleArray, num: usize) -> DoubleArray {
        crate::repeat(x, num)
    }

    fn take(&self, x: &DoubleArray, num: usize) -> Result<DoubleArray, ArrayError> {
        crate::take(x, num)
    }
}

/// Routines implemented with the generic algorithms only.
#[derive(Copy, Clone, Debug, Default)]
pub struct BaseArrayRoutines;

impl ArrayRoutines for BaseArrayRoutines {}
