// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Layout queries: can an array be handed to a BLAS/LAPACK kernel as it
//! is?

use crate::Array;

#[allow(non_camel_case_types)]
type blas_index = i32; // blas index type

/// Kernel parameters of an array that is usable as a BLAS vector.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct VectorLayout {
    /// Position of the first element in the backing buffer.
    pub offset: usize,
    /// Number of elements.
    pub len: usize,
    /// Increment between elements.
    pub inc: i32,
}

/// Kernel parameters of an array that is usable as a column-major BLAS
/// matrix.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MatrixLayout {
    /// Position of the first element in the backing buffer.
    pub offset: usize,
    pub rows: usize,
    pub cols: usize,
    /// Leading dimension: the distance between the starts of two columns.
    pub ld: i32,
}

fn fits(n: usize) -> bool {
    n <= blas_index::MAX as usize
}

impl<A> Array<A> {
    /// Return the kernel parameters of `self` as a vector, or `None` if
    /// it is not a vector or its elements are not adjacent in memory.
    ///
    /// ```
    /// use ndbackend::DoubleArray;
    ///
    /// let m = DoubleArray::zeros(&[3, 4]);
    /// assert!(m.column(1).unwrap().blas_vector().is_some());
    /// assert!(m.row(1).unwrap().blas_vector().is_none());
    /// ```
    pub fn blas_vector(&self) -> Option<VectorLayout> {
        if !self.is_vector() || !fits(self.size()) {
            return None;
        }
        if self.size() > 1 && self.vector_stride() != 1 {
            return None;
        }
        Some(VectorLayout {
            offset: self.offset,
            len: self.size(),
            inc: 1,
        })
    }

    /// Return the kernel parameters of `self` as a column-major matrix, or
    /// `None` if it is not a matrix, its columns are not contiguous, or its
    /// column stride is smaller than the number of rows.
    ///
    /// A padded matrix, such as a block of a larger matrix, qualifies: its
    /// leading dimension is the column stride.
    pub fn blas_matrix(&self) -> Option<MatrixLayout> {
        if !self.is_matrix() {
            return None;
        }
        let (rows, cols) = (self.shape[0], self.shape[1]);
        let (s0, s1) = (self.strides[0], self.strides[1]);
        if !fits(rows) || !fits(cols) {
            return None;
        }
        if !(s0 == 1 || rows <= 1) {
            return None;
        }
        let min_ld = rows.max(1);
        let ld = if cols <= 1 {
            min_ld
        } else if s1 >= min_ld as isize && s1 <= blas_index::MAX as isize {
            s1 as usize
        } else {
            return None;
        };
        Some(MatrixLayout {
            offset: self.offset,
            rows,
            cols,
            ld: ld as i32,
        })
    }

    /// True if `self` is a writable root array with its elements packed at
    /// the start of the buffer, so a kernel may work on the buffer in
    /// place.
    pub(crate) fn is_dense_root(&self) -> bool {
        !self.view && !self.read_only && self.offset == 0 && self.is_contiguous()
    }
}
