// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::cmp::Ordering;

use crate::data_repr::{ArrayData, ArrayDataMut};
use crate::dimension::{self, Positions};
use crate::error::{size_mismatch, ArrayError};
use crate::Array;

/// # Methods For All Array Types
impl<A> Array<A> {
    /// Return the shape of the array as a slice.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Return the strides of the array as a slice.
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    /// Return the position of the first element in the backing buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Return the number of dimensions (axes) in the array
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Same as [`ndim`](Self::ndim).
    pub fn dims(&self) -> usize {
        self.ndim()
    }

    /// Return the total number of elements in the array.
    pub fn size(&self) -> usize {
        dimension::size(&self.shape)
    }

    /// Return the length of `axis`.
    ///
    /// **Panics** if the axis is out of bounds.
    pub fn size_of(&self, axis: usize) -> usize {
        self.shape[axis]
    }

    /// Return the stride of `axis`.
    ///
    /// **Panics** if the axis is out of bounds.
    pub fn stride_of(&self, axis: usize) -> isize {
        self.strides[axis]
    }

    /// Return whether the array has any elements
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Number of rows; a one-dimensional array is a column vector.
    pub fn rows(&self) -> usize {
        self.shape.first().copied().unwrap_or(1)
    }

    /// Number of columns; 1 for arrays with fewer than two axes.
    pub fn columns(&self) -> usize {
        self.shape.get(1).copied().unwrap_or(1)
    }

    /// Index of the axis whose stride is the major stride.
    pub fn major_axis(&self) -> usize {
        self.major_axis
    }

    /// The stride along the major axis.
    pub fn major_stride(&self) -> isize {
        self.strides.get(self.major_axis).copied().unwrap_or(1)
    }

    /// True for one-dimensional arrays and for matrices with a single row
    /// or column.
    pub fn is_vector(&self) -> bool {
        match self.shape.len() {
            1 => true,
            2 => self.shape[0] == 1 || self.shape[1] == 1,
            _ => false,
        }
    }

    /// True for two-dimensional arrays.
    pub fn is_matrix(&self) -> bool {
        self.shape.len() == 2
    }

    pub fn is_square(&self) -> bool {
        self.is_matrix() && self.shape[0] == self.shape[1]
    }

    /// True if the array shares the buffer of another array it was derived
    /// from.
    pub fn is_view(&self) -> bool {
        self.view
    }

    /// True if the strides are the default column-major strides of the
    /// shape.
    pub fn is_contiguous(&self) -> bool {
        dimension::is_default_strides(&self.shape, &self.strides)
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Return `true` if `self` and `other` use the same backing buffer.
    pub fn shares_buffer(&self, other: &Array<A>) -> bool {
        self.data.ptr_eq(&other.data)
    }

    /// Stride between consecutive elements of the array seen as a vector.
    ///
    /// For a one-row matrix this is the column stride, otherwise the stride
    /// of the first axis.
    pub(crate) fn vector_stride(&self) -> isize {
        match self.shape.len() {
            0 => 1,
            2 if self.shape[0] == 1 && self.shape[1] != 1 => self.strides[1],
            _ => self.strides[0],
        }
    }

    /// Buffer positions of the elements in column-major logical order.
    pub(crate) fn positions(&self) -> Positions<'_> {
        Positions::new(self.offset, &self.shape, &self.strides)
    }

    pub(crate) fn ensure_writable(&self) -> Result<(), ArrayError> {
        if self.read_only {
            Err(ArrayError::Unsupported("array is read-only"))
        } else {
            Ok(())
        }
    }

    /// Guarded shared access to the whole backing buffer, including
    /// elements outside of this view.
    pub fn data(&self) -> ArrayData<'_, A> {
        self.data.read()
    }

    /// Guarded exclusive access to the whole backing buffer.
    ///
    /// **Errors** if the array is read-only.
    pub fn data_mut(&self) -> Result<ArrayDataMut<'_, A>, ArrayError> {
        self.ensure_writable()?;
        Ok(self.data.write())
    }

    /// Return the element at `index`.
    ///
    /// **Errors** if the index has the wrong rank or is out of bounds.
    pub fn get(&self, index: &[usize]) -> Result<A, ArrayError>
    where
        A: Clone,
    {
        dimension::check_index(index, &self.shape)?;
        let pos = dimension::offset(index, self.offset, &self.strides);
        Ok(self.data.read()[pos].clone())
    }

    /// Set the element at `index`.
    ///
    /// **Errors** if the array is read-only, or if the index has the wrong
    /// rank or is out of bounds.
    pub fn set(&self, index: &[usize], value: A) -> Result<(), ArrayError> {
        self.ensure_writable()?;
        dimension::check_index(index, &self.shape)?;
        let pos = dimension::offset(index, self.offset, &self.strides);
        self.data.write()[pos] = value;
        Ok(())
    }

    fn check_flat(&self, i: usize) -> Result<(), ArrayError> {
        if i < self.size() {
            Ok(())
        } else {
            Err(ArrayError::IndexOutOfBounds {
                index: vec![i],
                shape: vec![self.size()],
            })
        }
    }

    /// Return the `i`-th element in column-major logical order.
    pub fn get_flat(&self, i: usize) -> Result<A, ArrayError>
    where
        A: Clone,
    {
        self.check_flat(i)?;
        let pos = dimension::linear_offset(i, self.offset, &self.strides, &self.shape);
        Ok(self.data.read()[pos].clone())
    }

    /// Set the `i`-th element in column-major logical order.
    pub fn set_flat(&self, i: usize, value: A) -> Result<(), ArrayError> {
        self.ensure_writable()?;
        self.check_flat(i)?;
        let pos = dimension::linear_offset(i, self.offset, &self.strides, &self.shape);
        self.data.write()[pos] = value;
        Ok(())
    }

    /// Return the elements in column-major logical order.
    pub fn to_vec(&self) -> Vec<A>
    where
        A: Clone,
    {
        let data = self.data.read();
        if self.is_contiguous() {
            return data[self.offset..self.offset + self.size()].to_vec();
        }
        self.positions().map(|p| data[p].clone()).collect()
    }

    /// Return an iterator over a snapshot of the elements in column-major
    /// logical order.
    ///
    /// The iterator owns its values; writes made while iterating are not
    /// observed.
    pub fn iter(&self) -> std::vec::IntoIter<A>
    where
        A: Clone,
    {
        self.to_vec().into_iter()
    }

    /// Return a densely packed root array with the same shape and
    /// elements.
    ///
    /// The copy is always writable, also when `self` is read-only.
    pub fn copy(&self) -> Array<A>
    where
        A: Clone,
    {
        // to_vec yields column-major order, which is the layout of a root
        Array::from_shape_vec_unchecked(&self.shape, self.to_vec())
    }

    /// Return a new root array of the same element type with default
    /// values.
    pub fn new_empty_array(&self, shape: &[usize]) -> Array<A>
    where
        A: Default,
    {
        Array::default(shape)
    }

    /// Apply `f` to every element, in column-major order, and collect the
    /// results in a new root array with the same shape.
    pub fn map<B, F>(&self, mut f: F) -> Array<B>
    where
        F: FnMut(&A) -> B,
    {
        let data = self.data.read();
        let v = self.positions().map(|p| f(&data[p])).collect();
        drop(data);
        Array::from_shape_vec_unchecked(&self.shape, v)
    }

    /// Modify every element in place.
    pub fn map_inplace<F>(&self, mut f: F) -> Result<(), ArrayError>
    where
        F: FnMut(&mut A),
    {
        self.ensure_writable()?;
        let mut data = self.data.write();
        for p in self.positions() {
            f(&mut data[p]);
        }
        Ok(())
    }

    /// Set every element to `value`.
    pub fn fill(&self, value: A) -> Result<(), ArrayError>
    where
        A: Clone,
    {
        self.map_inplace(|x| *x = value.clone())
    }

    /// Copy the elements of `other` into `self`, both traversed in
    /// column-major logical order.
    ///
    /// **Errors** if the arrays differ in size or `self` is read-only.
    pub fn assign(&self, other: &Array<A>) -> Result<(), ArrayError>
    where
        A: Clone,
    {
        self.ensure_writable()?;
        if self.size() != other.size() {
            return Err(size_mismatch(&self.shape, &other.shape));
        }
        if self.data.ptr_eq(&other.data) {
            return self.assign_values(other.to_vec());
        }
        let src = other.data.read();
        let mut dst = self.data.write();
        if self.is_contiguous() && other.is_contiguous() {
            let n = self.size();
            dst[self.offset..self.offset + n].clone_from_slice(&src[other.offset..other.offset + n]);
        } else {
            for (d, s) in self.positions().zip(other.positions()) {
                dst[d] = src[s].clone();
            }
        }
        Ok(())
    }

    /// Copy `values`, in column-major logical order, into `self`.
    pub fn assign_slice(&self, values: &[A]) -> Result<(), ArrayError>
    where
        A: Clone,
    {
        self.ensure_writable()?;
        if values.len() != self.size() {
            return Err(size_mismatch(&self.shape, &[values.len()]));
        }
        let mut dst = self.data.write();
        for (p, v) in self.positions().zip(values) {
            dst[p] = v.clone();
        }
        Ok(())
    }

    pub(crate) fn assign_values(&self, values: Vec<A>) -> Result<(), ArrayError> {
        self.ensure_writable()?;
        debug_assert_eq!(values.len(), self.size());
        let mut dst = self.data.write();
        for (p, v) in self.positions().zip(values) {
            dst[p] = v;
        }
        Ok(())
    }

    /// Exchange the elements of `self` and `other`.
    ///
    /// **Errors** if the arrays differ in size or either is read-only.
    pub fn swap(&self, other: &Array<A>) -> Result<(), ArrayError>
    where
        A: Clone,
    {
        self.ensure_writable()?;
        other.ensure_writable()?;
        if self.size() != other.size() {
            return Err(size_mismatch(&self.shape, &other.shape));
        }
        if self.data.ptr_eq(&other.data) {
            let (mine, theirs) = (self.to_vec(), other.to_vec());
            let mut data = self.data.write();
            for (p, v) in self.positions().zip(theirs) {
                data[p] = v;
            }
            for (p, v) in other.positions().zip(mine) {
                data[p] = v;
            }
            return Ok(());
        }
        // lock in address order
        let (mut a, mut b) = if self.data.addr() < other.data.addr() {
            let a = self.data.write();
            (a, other.data.write())
        } else {
            let b = other.data.write();
            (self.data.write(), b)
        };
        for (pa, pb) in self.positions().zip(other.positions()) {
            std::mem::swap(&mut a[pa], &mut b[pb]);
        }
        Ok(())
    }

    /// Sort the elements in place, in column-major logical order.
    ///
    /// **Errors** if the array is read-only.
    pub fn sort(&self) -> Result<(), ArrayError>
    where
        A: Clone + Ord,
    {
        self.sort_by(Ord::cmp)
    }

    /// Sort the elements in place with a comparator function.
    ///
    /// The sort is stable and honours the strides of the array: only the
    /// positions addressed by this array are permuted.
    ///
    /// ```
    /// use ndbackend::Array;
    ///
    /// let a = Array::from_vec(vec![3., 1., 2., 0.]);
    /// a.sort_by(|x, y| y.partial_cmp(x).unwrap()).unwrap();
    /// assert_eq!(a.to_vec(), vec![3., 2., 1., 0.]);
    /// ```
    pub fn sort_by<F>(&self, mut compare: F) -> Result<(), ArrayError>
    where
        A: Clone,
        F: FnMut(&A, &A) -> Ordering,
    {
        self.ensure_writable()?;
        let mut data = self.data.write();
        let positions: Vec<usize> = self.positions().collect();
        let mut values: Vec<A> = positions.iter().map(|&p| data[p].clone()).collect();
        values.sort_by(&mut compare);
        for (p, v) in positions.into_iter().zip(values) {
            data[p] = v;
        }
        Ok(())
    }
}
