// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Constructor methods for arrays.
//!
//! Every constructor here creates a *root* array: a fresh buffer with the
//! default column-major strides.

use num_traits::{One, Zero};

use crate::data_repr::Buffer;
use crate::dimension;
use crate::error::{illegal_argument, ArrayError};
use crate::{Array, DoubleArray};

macro_rules! size_checked_unwrap {
    ($shape:expr) => {
        match dimension::size_checked($shape) {
            Some(sz) => sz,
            None => panic!("ndbackend: Shape too large, number of elements overflows usize"),
        }
    };
}

/// Constructor methods for one-dimensional arrays.
impl<A> Array<A> {
    /// Create a one-dimensional array from a vector (no copying needed).
    ///
    /// ```rust
    /// use ndbackend::Array;
    ///
    /// let array = Array::from_vec(vec![1., 2., 3., 4.]);
    /// assert_eq!(array.shape(), &[4]);
    /// ```
    pub fn from_vec(v: Vec<A>) -> Self {
        let n = v.len();
        Self::from_parts(Buffer::from_vec(v), 0, vec![n], vec![1], 0, false, false)
    }
}

/// Constructor methods for n-dimensional arrays.
impl<A> Array<A> {
    /// Create an array with the given shape from a vector in column-major
    /// order (no copying needed).
    ///
    /// **Errors** if the length of `v` is not the number of elements of
    /// `shape`.
    ///
    /// ```rust
    /// use ndbackend::Array;
    ///
    /// let a = Array::from_shape_vec(&[2, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(a.get(&[0, 1]).unwrap(), 3);
    /// ```
    pub fn from_shape_vec(shape: &[usize], v: Vec<A>) -> Result<Self, ArrayError> {
        let size = dimension::size_checked(shape)
            .ok_or_else(|| illegal_argument(format!("shape {:?} overflows", shape)))?;
        if size != v.len() {
            return Err(illegal_argument(format!(
                "data of length {} does not fit shape {:?}",
                v.len(),
                shape
            )));
        }
        let strides = dimension::compute_stride(shape);
        Ok(Self::from_parts(Buffer::from_vec(v), 0, shape.to_vec(), strides, 0, false, false))
    }

    /// Create an array with copies of `elem`.
    ///
    /// **Panics** if the number of elements in `shape` would overflow usize.
    pub fn from_elem(shape: &[usize], elem: A) -> Self
    where
        A: Clone,
    {
        let size = size_checked_unwrap!(shape);
        let strides = dimension::compute_stride(shape);
        Self::from_parts(Buffer::from_vec(vec![elem; size]), 0, shape.to_vec(), strides, 0, false, false)
    }

    /// Create an array with values created by the function `f`, which is
    /// called with the multi-index of each element, in column-major order.
    ///
    /// **Panics** if the number of elements in `shape` would overflow usize.
    pub fn from_shape_fn<F>(shape: &[usize], mut f: F) -> Self
    where
        F: FnMut(&[usize]) -> A,
    {
        let size = size_checked_unwrap!(shape);
        let v = (0..size)
            .map(|i| f(&dimension::unravel_index(i, shape)))
            .collect();
        let strides = dimension::compute_stride(shape);
        Self::from_parts(Buffer::from_vec(v), 0, shape.to_vec(), strides, 0, false, false)
    }

    /// Create an array with default values.
    pub fn default(shape: &[usize]) -> Self
    where
        A: Default,
    {
        Self::from_shape_fn(shape, |_| A::default())
    }

    /// Create an array filled with zeros.
    pub fn zeros(shape: &[usize]) -> Self
    where
        A: Clone + Zero,
    {
        Self::from_elem(shape, A::zero())
    }

    /// Create an array filled with ones.
    pub fn ones(shape: &[usize]) -> Self
    where
        A: Clone + One,
    {
        Self::from_elem(shape, A::one())
    }

    /// Create a matrix from its rows.
    ///
    /// **Errors** if the rows are not all of the same length.
    ///
    /// ```rust
    /// use ndbackend::Array;
    ///
    /// let a = Array::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!(a.shape(), &[2, 3]);
    /// assert_eq!(a.to_vec(), vec![1, 4, 2, 5, 3, 6]);
    /// ```
    pub fn from_rows<R>(rows: &[R]) -> Result<Self, ArrayError>
    where
        R: AsRef<[A]>,
        A: Clone,
    {
        let m = rows.len();
        let n = rows.first().map_or(0, |r| r.as_ref().len());
        if let Some(bad) = rows.iter().position(|r| r.as_ref().len() != n) {
            return Err(illegal_argument(format!(
                "row {} has length {}, expected {}",
                bad,
                rows[bad].as_ref().len(),
                n
            )));
        }
        let mut v = Vec::with_capacity(m * n);
        for j in 0..n {
            for row in rows {
                v.push(row.as_ref()[j].clone());
            }
        }
        Self::from_shape_vec(&[m, n], v)
    }

    /// Create an identity matrix of size `n` (square 2D array).
    pub fn eye(n: usize) -> Self
    where
        A: Clone + Zero + One,
    {
        Self::from_shape_fn(&[n, n], |ix| if ix[0] == ix[1] { A::one() } else { A::zero() })
    }

    /// Create a square matrix with the elements of the vector `v` on its
    /// diagonal.
    ///
    /// **Errors** if `v` is not a vector.
    pub fn from_diag(v: &Array<A>) -> Result<Self, ArrayError>
    where
        A: Clone + Zero,
    {
        if !v.is_vector() {
            return Err(illegal_argument("vector required"));
        }
        let d = v.to_vec();
        let n = d.len();
        Ok(Self::from_shape_fn(&[n, n], |ix| {
            if ix[0] == ix[1] {
                d[ix[0]].clone()
            } else {
                A::zero()
            }
        }))
    }

    /// Create a root array from a vector whose length is known to match
    /// `shape`.
    pub(crate) fn from_shape_vec_unchecked(shape: &[usize], v: Vec<A>) -> Self {
        debug_assert_eq!(dimension::size(shape), v.len());
        let strides = dimension::compute_stride(shape);
        Self::from_parts(Buffer::from_vec(v), 0, shape.to_vec(), strides, 0, false, false)
    }

    /// Assemble an array from its raw parts.
    pub(crate) fn from_parts(
        data: Buffer<A>,
        offset: usize,
        shape: Vec<usize>,
        strides: Vec<isize>,
        major_axis: usize,
        view: bool,
        read_only: bool,
    ) -> Self {
        debug_assert_eq!(shape.len(), strides.len());
        Array {
            data,
            offset,
            shape,
            strides,
            major_axis,
            view,
            read_only,
        }
    }
}

impl DoubleArray {
    /// Create a one-dimensional array with `n` evenly spaced elements from
    /// `start` to `end` (inclusive).
    ///
    /// ```rust
    /// use ndbackend::DoubleArray;
    ///
    /// let array = DoubleArray::linspace(0., 1., 5);
    /// assert_eq!(array.to_vec(), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
    /// ```
    pub fn linspace(start: f64, end: f64, n: usize) -> Self {
        let step = if n > 1 {
            (end - start) / (n - 1) as f64
        } else {
            0.
        };
        Self::from_vec((0..n).map(|i| start + step * i as f64).collect())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Array, DoubleArray};

    #[test]
    fn root_arrays_have_default_strides() {
        let a = Array::<i32>::zeros(&[2, 3, 4]);
        assert_eq!(a.strides(), &[1, 2, 6]);
        assert!(!a.is_view());
        assert_eq!(a.offset(), 0);
    }

    #[test]
    fn shape_vec_must_fit() {
        assert!(Array::from_shape_vec(&[2, 2], vec![1, 2, 3]).is_err());
        assert!(Array::from_shape_vec(&[0, 2], Vec::<i32>::new()).is_ok());
    }

    #[test]
    fn ragged_rows() {
        assert!(Array::from_rows(&[vec![1, 2], vec![3]]).is_err());
        let empty = Array::<i32>::from_rows::<Vec<i32>>(&[]).unwrap();
        assert_eq!(empty.shape(), &[0, 0]);
    }

    #[test]
    fn eye_and_diag() {
        let e = DoubleArray::eye(3);
        assert_eq!(e.to_vec(), vec![1., 0., 0., 0., 1., 0., 0., 0., 1.]);
        let d = DoubleArray::from_diag(&DoubleArray::from_vec(vec![1., 2.])).unwrap();
        assert_eq!(d.to_vec(), vec![1., 0., 0., 2.]);
    }

    #[test]
    fn linspace_endpoints() {
        assert_eq!(DoubleArray::linspace(1., 1., 1).to_vec(), vec![1.]);
        assert!(DoubleArray::linspace(0., 1., 0).is_empty());
    }
}
