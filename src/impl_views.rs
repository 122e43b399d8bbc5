// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Methods deriving views from an array.
//!
//! A view shares the backing buffer of the array it is derived from and
//! inherits its read-only flag.

use crate::dimension;
use crate::error::{illegal_argument, ArrayError};
use crate::slice::Slice;
use crate::Array;

impl<A> Array<A> {
    /// Create a view of the backing buffer with the given offset, shape and
    /// strides. The major axis is the first axis.
    ///
    /// The view may address any part of the buffer, not only the elements
    /// of `self`.
    ///
    /// **Errors** if the shape and strides differ in rank or if any
    /// addressed position lies outside of the buffer.
    ///
    /// ```
    /// use ndbackend::Array;
    ///
    /// let a = Array::from_vec((0..6).collect::<Vec<i32>>());
    /// let m = a.as_view(0, &[3, 2], &[2, 1]).unwrap();
    /// assert_eq!(m.get(&[1, 1]).unwrap(), 3);
    /// assert!(a.as_view(1, &[3, 2], &[2, 1]).is_err());
    /// ```
    pub fn as_view(&self, offset: usize, shape: &[usize], strides: &[isize]) -> Result<Array<A>, ArrayError> {
        self.as_view_major(offset, shape, strides, 0)
    }

    /// Create a view with an explicit major axis, see [`.as_view()`](Array::as_view).
    pub fn as_view_major(
        &self,
        offset: usize,
        shape: &[usize],
        strides: &[isize],
        major_axis: usize,
    ) -> Result<Array<A>, ArrayError> {
        if major_axis >= shape.len().max(1) {
            return Err(illegal_argument(format!(
                "major axis {} out of bounds for shape {:?}",
                major_axis, shape
            )));
        }
        dimension::can_index_buffer(self.data.len(), offset, shape, strides)?;
        Ok(Array::from_parts(
            self.data.share(),
            offset,
            shape.to_vec(),
            strides.to_vec(),
            major_axis,
            true,
            self.read_only,
        ))
    }

    /// Return a view of the same elements, sharing the buffer.
    pub fn view(&self) -> Array<A> {
        Array::from_parts(
            self.data.share(),
            self.offset,
            self.shape.clone(),
            self.strides.clone(),
            self.major_axis,
            true,
            self.read_only,
        )
    }

    pub(crate) fn into_read_only(mut self) -> Array<A> {
        self.read_only = true;
        self
    }

    // views produced here are in bounds by construction
    fn derived(&self, offset: usize, shape: Vec<usize>, strides: Vec<isize>, major_axis: usize) -> Array<A> {
        debug_assert!(dimension::can_index_buffer(self.data.len(), offset, &shape, &strides).is_ok());
        Array::from_parts(self.data.share(), offset, shape, strides, major_axis, true, self.read_only)
    }

    pub(crate) fn check_axis(&self, axis: usize) -> Result<(), ArrayError> {
        if axis < self.ndim() {
            Ok(())
        } else {
            Err(illegal_argument(format!("axis {} out of bounds for shape {:?}", axis, self.shape)))
        }
    }

    fn require_matrix(&self) -> Result<(), ArrayError> {
        if self.is_matrix() {
            Ok(())
        } else {
            Err(illegal_argument("require 2d-array"))
        }
    }

    /// Select the `index`-th subarray along the first axis, removing that
    /// axis.
    pub fn select(&self, index: usize) -> Result<Array<A>, ArrayError> {
        self.select_axis(0, index)
    }

    /// Select the `index`-th subarray along `axis`, removing the axis.
    ///
    /// **Errors** if `axis` or `index` is out of bounds.
    pub fn select_axis(&self, axis: usize, index: usize) -> Result<Array<A>, ArrayError> {
        self.check_axis(axis)?;
        if index >= self.shape[axis] {
            return Err(ArrayError::IndexOutOfBounds {
                index: vec![index],
                shape: vec![self.shape[axis]],
            });
        }
        let offset = (self.offset as isize + index as isize * self.strides[axis]) as usize;
        Ok(self.derived(
            offset,
            dimension::remove_axis(&self.shape, axis),
            dimension::remove_axis(&self.strides, axis),
            0,
        ))
    }

    /// Number of one-dimensional lanes along `axis`.
    ///
    /// **Panics** if the axis is out of bounds.
    pub fn vectors(&self, axis: usize) -> usize {
        let len = self.shape[axis];
        if len == 0 {
            0
        } else {
            self.size() / len
        }
    }

    /// Return the `index`-th one-dimensional lane along `axis`.
    ///
    /// Lanes are numbered in column-major order of the remaining axes, so
    /// for a matrix `vector(0, j)` is column `j` and `vector(1, i)` is row
    /// `i`.
    pub fn vector(&self, axis: usize, index: usize) -> Result<Array<A>, ArrayError> {
        self.check_axis(axis)?;
        let count = self.vectors(axis);
        if index >= count {
            return Err(ArrayError::IndexOutOfBounds {
                index: vec![index],
                shape: vec![count],
            });
        }
        let rest_shape = dimension::remove_axis(&self.shape, axis);
        let rest_strides = dimension::remove_axis(&self.strides, axis);
        let offset = dimension::linear_offset(index, self.offset, &rest_strides, &rest_shape);
        Ok(self.derived(offset, vec![self.shape[axis]], vec![self.strides[axis]], 0))
    }

    /// Return row `i` of a matrix as a one-dimensional view.
    pub fn row(&self, i: usize) -> Result<Array<A>, ArrayError> {
        self.require_matrix()?;
        self.select_axis(0, i)
    }

    /// Return column `j` of a matrix as a one-dimensional view.
    pub fn column(&self, j: usize) -> Result<Array<A>, ArrayError> {
        self.require_matrix()?;
        self.select_axis(1, j)
    }

    /// Return the main diagonal of a matrix as a one-dimensional view.
    pub fn diagonal(&self) -> Result<Array<A>, ArrayError> {
        self.require_matrix()?;
        let n = self.shape[0].min(self.shape[1]);
        Ok(self.derived(self.offset, vec![n], vec![self.strides[0] + self.strides[1]], 0))
    }

    /// Return the `rows × cols` block of a matrix starting at `(row, col)`.
    pub fn sub_matrix(&self, row: usize, col: usize, rows: usize, cols: usize) -> Result<Array<A>, ArrayError> {
        self.require_matrix()?;
        if row + rows > self.shape[0] || col + cols > self.shape[1] {
            return Err(illegal_argument(format!(
                "block ({}, {}) of shape [{}, {}] does not fit in {:?}",
                row, col, rows, cols, self.shape
            )));
        }
        let offset = dimension::offset(&[row, col], self.offset, &self.strides);
        Ok(self.derived(offset, vec![rows, cols], self.strides.clone(), self.major_axis))
    }

    /// Slice the array with one [`Slice`] per axis.
    ///
    /// ```
    /// use ndbackend::{Array, Slice};
    ///
    /// let a = Array::from_vec((0..10).collect::<Vec<i32>>());
    /// let evens = a.slice(&[Slice::from(..).step_by(2)]).unwrap();
    /// assert_eq!(evens.to_vec(), vec![0, 2, 4, 6, 8]);
    /// let reversed = a.slice(&[Slice::from(..).step_by(-1)]).unwrap();
    /// assert_eq!(reversed.get(&[0]).unwrap(), 9);
    /// ```
    pub fn slice(&self, info: &[Slice]) -> Result<Array<A>, ArrayError> {
        if info.len() != self.ndim() {
            return Err(illegal_argument(format!(
                "{} slices for an array of shape {:?}",
                info.len(),
                self.shape
            )));
        }
        let mut offset = self.offset as isize;
        let mut shape = Vec::with_capacity(info.len());
        let mut strides = Vec::with_capacity(info.len());
        for ((s, &len), &stride) in info.iter().zip(&self.shape).zip(&self.strides) {
            let (first, count, step) = s.resolve(len)?;
            if count > 0 {
                offset += first as isize * stride;
            }
            shape.push(count);
            strides.push(stride * step);
        }
        Ok(self.derived(offset as usize, shape, strides, self.major_axis))
    }

    /// Return a view with the axes reversed; for a matrix this is the
    /// transpose.
    pub fn transpose(&self) -> Array<A> {
        let major_axis = match self.ndim() {
            0 | 1 => self.major_axis,
            n => n - 1 - self.major_axis,
        };
        self.derived(
            self.offset,
            dimension::reverse(&self.shape),
            dimension::reverse(&self.strides),
            major_axis,
        )
    }

    /// Return an array with the same elements, in column-major order, and
    /// a new shape.
    ///
    /// The result is a view when `self` is contiguous and a fresh copy
    /// otherwise.
    ///
    /// **Errors** if the number of elements differs.
    pub fn reshape(&self, shape: &[usize]) -> Result<Array<A>, ArrayError>
    where
        A: Clone,
    {
        if dimension::size_checked(shape) != Some(self.size()) {
            return Err(illegal_argument(format!(
                "cannot reshape {:?} into {:?}",
                self.shape, shape
            )));
        }
        if self.is_contiguous() {
            Ok(self.derived(self.offset, shape.to_vec(), dimension::compute_stride(shape), 0))
        } else {
            Ok(Array::from_shape_vec_unchecked(shape, self.to_vec()))
        }
    }

    /// Return the elements as a one-dimensional array, see
    /// [`.reshape()`](Array::reshape).
    pub fn ravel(&self) -> Result<Array<A>, ArrayError>
    where
        A: Clone,
    {
        self.reshape(&[self.size()])
    }
}

#[cfg(test)]
mod tests {
    use crate::{Array, ErrorKind, Slice};

    fn matrix() -> Array<i32> {
        // [[0, 3, 6, 9],
        //  [1, 4, 7, 10],
        //  [2, 5, 8, 11]]
        Array::from_shape_vec(&[3, 4], (0..12).collect()).unwrap()
    }

    #[test]
    fn views_inherit_read_only() {
        let a = Array::from_vec(vec![1, 2, 3]).into_read_only();
        let v = a.view();
        assert!(v.is_view());
        assert!(v.is_read_only());
        assert_eq!(v.set(&[0], 5).unwrap_err().kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn as_view_checks_major_axis() {
        let a = Array::from_vec(vec![1, 2, 3, 4]);
        assert!(a.as_view_major(0, &[2, 2], &[1, 2], 2).is_err());
        let v = a.as_view_major(0, &[2, 2], &[1, 2], 1).unwrap();
        assert_eq!(v.major_stride(), 2);
    }

    #[test]
    fn rows_columns_diagonal() {
        let m = matrix();
        assert_eq!(m.row(1).unwrap().to_vec(), vec![1, 4, 7, 10]);
        assert_eq!(m.column(2).unwrap().to_vec(), vec![6, 7, 8]);
        assert_eq!(m.diagonal().unwrap().to_vec(), vec![0, 4, 8]);
        assert!(m.row(3).is_err());
        assert!(Array::from_vec(vec![1]).row(0).is_err());
    }

    #[test]
    fn lanes() {
        let m = matrix();
        assert_eq!(m.vectors(0), 4);
        assert_eq!(m.vectors(1), 3);
        assert_eq!(m.vector(0, 1).unwrap().to_vec(), vec![3, 4, 5]);
        assert_eq!(m.vector(1, 2).unwrap().to_vec(), vec![2, 5, 8, 11]);
    }

    #[test]
    fn sub_matrix_and_transpose() {
        let m = matrix();
        let b = m.sub_matrix(1, 1, 2, 2).unwrap();
        assert_eq!(b.to_vec(), vec![4, 5, 7, 8]);
        assert!(!b.is_contiguous());
        let t = m.transpose();
        assert_eq!(t.shape(), &[4, 3]);
        assert_eq!(t.get(&[3, 2]).unwrap(), 11);
        assert_eq!(t.major_axis(), 1);
        assert!(m.sub_matrix(2, 0, 2, 1).is_err());
    }

    #[test]
    fn reshape_copies_strided_arrays() {
        let m = matrix();
        let r = m.reshape(&[4, 3]).unwrap();
        assert!(r.shares_buffer(&m));
        let t = m.transpose();
        let r = t.reshape(&[12]).unwrap();
        assert!(!r.shares_buffer(&m));
        assert_eq!(r.get(&[1]).unwrap(), 3);
        assert!(m.reshape(&[5]).is_err());
    }

    #[test]
    fn slicing_two_axes() {
        let m = matrix();
        let s = m.slice(&[Slice::from(1..), Slice::from(..).step_by(-2)]).unwrap();
        assert_eq!(s.shape(), &[2, 2]);
        assert_eq!(s.to_vec(), vec![10, 11, 4, 5]);
    }
}
