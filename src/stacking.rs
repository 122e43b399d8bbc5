// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Stacking, splitting and repeating matrices.
//!
//! One-dimensional arrays take part as column vectors (`n × 1`), as
//! everywhere else in the crate. Stacking and repeating allocate a new
//! root array; splitting returns views of the input.

use crate::error::{illegal_argument, ArrayError};
use crate::Array;

fn check_at_most_2d<A>(op: &str, a: &Array<A>) -> Result<(), ArrayError> {
    if a.ndim() <= 2 {
        Ok(())
    } else {
        Err(illegal_argument(format!("{} requires arrays with at most two axes, got shape {:?}", op, a.shape())))
    }
}

/// Stack matrices on top of each other.
///
/// All arrays must have the same number of columns; the result has the sum
/// of their rows.
///
/// **Errors** if `arrays` is empty or the columns differ.
///
/// ```
/// use ndbackend::{vstack, DoubleArray};
///
/// let a = DoubleArray::from_rows(&[[1., 2.]]).unwrap();
/// let b = DoubleArray::from_rows(&[[3., 4.], [5., 6.]]).unwrap();
/// let c = vstack(&[&a, &b]).unwrap();
/// assert_eq!(c.shape(), &[3, 2]);
/// assert_eq!(c.row(2).unwrap().to_vec(), vec![5., 6.]);
/// ```
pub fn vstack<A: Clone>(arrays: &[&Array<A>]) -> Result<Array<A>, ArrayError> {
    let first = arrays
        .first()
        .ok_or_else(|| illegal_argument("vstack of an empty list"))?;
    let columns = first.columns();
    let mut rows = 0;
    for a in arrays {
        check_at_most_2d("vstack", a)?;
        if a.columns() != columns {
            return Err(illegal_argument(format!("Can't vstack {:?} with {:?}", a.shape(), first.shape())));
        }
        rows += a.rows();
    }

    let parts: Vec<Vec<A>> = arrays.iter().map(|a| a.to_vec()).collect();
    let mut data = Vec::with_capacity(rows * columns);
    for j in 0..columns {
        for (a, part) in arrays.iter().zip(&parts) {
            let m = a.rows();
            data.extend_from_slice(&part[j * m..(j + 1) * m]);
        }
    }
    Array::from_shape_vec(&[rows, columns], data)
}

/// Stack matrices side by side.
///
/// All arrays must have the same number of rows; the result has the sum of
/// their columns.
///
/// **Errors** if `arrays` is empty or the rows differ.
pub fn hstack<A: Clone>(arrays: &[&Array<A>]) -> Result<Array<A>, ArrayError> {
    let first = arrays
        .first()
        .ok_or_else(|| illegal_argument("hstack of an empty list"))?;
    let rows = first.rows();
    let mut columns = 0;
    for a in arrays {
        check_at_most_2d("hstack", a)?;
        if a.rows() != rows {
            return Err(illegal_argument(format!("Can't hstack {:?} with {:?}", a.shape(), first.shape())));
        }
        columns += a.columns();
    }

    // columns are contiguous in column-major order
    let mut data = Vec::with_capacity(rows * columns);
    for a in arrays {
        data.extend(a.to_vec());
    }
    Array::from_shape_vec(&[rows, columns], data)
}

/// Split a matrix row-wise into `parts` matrices of equal height.
///
/// The parts are views sharing the buffer of `array`.
///
/// **Errors** if `array` is not a matrix or `parts` does not evenly divide
/// its rows.
pub fn vsplit<A>(array: &Array<A>, parts: usize) -> Result<Vec<Array<A>>, ArrayError> {
    if !array.is_matrix() {
        return Err(illegal_argument("require 2d-array"));
    }
    if parts == 0 || array.rows() % parts != 0 {
        return Err(illegal_argument(format!("{} parts does not evenly divide {} rows", parts, array.rows())));
    }
    let height = array.rows() / parts;
    (0..parts)
        .map(|k| array.sub_matrix(k * height, 0, height, array.columns()))
        .collect()
}

/// Split a matrix column-wise into `parts` matrices of equal width.
///
/// The parts are views sharing the buffer of `array`.
///
/// **Errors** if `array` is not a matrix or `parts` does not evenly divide
/// its columns.
pub fn hsplit<A>(array: &Array<A>, parts: usize) -> Result<Vec<Array<A>>, ArrayError> {
    if !array.is_matrix() {
        return Err(illegal_argument("require 2d-array"));
    }
    if parts == 0 || array.columns() % parts != 0 {
        return Err(illegal_argument(format!("{} parts does not evenly divide {} columns", parts, array.columns())));
    }
    let width = array.columns() / parts;
    (0..parts)
        .map(|k| array.sub_matrix(0, k * width, array.rows(), width))
        .collect()
}

/// Tile `x` `r` times vertically and `c` times horizontally.
///
/// ```
/// use ndbackend::{repmat, IntArray};
///
/// let x = IntArray::from_rows(&[[1, 2]]).unwrap();
/// let y = repmat(&x, 2, 2).unwrap();
/// assert_eq!(y.shape(), &[2, 4]);
/// assert_eq!(y.row(1).unwrap().to_vec(), vec![1, 2, 1, 2]);
/// ```
pub fn repmat<A: Clone>(x: &Array<A>, r: usize, c: usize) -> Result<Array<A>, ArrayError> {
    check_at_most_2d("repmat", x)?;
    let (m, n) = (x.rows(), x.columns());
    let values = x.to_vec();
    let mut data = Vec::with_capacity(values.len() * r * c);
    for _ in 0..c {
        for j in 0..n {
            let column = &values[j * m..(j + 1) * m];
            for _ in 0..r {
                data.extend_from_slice(column);
            }
        }
    }
    Array::from_shape_vec(&[m * r, n * c], data)
}

/// Repeat each element `num` times, in column-major logical order, into a
/// one-dimensional array.
pub fn repeat<A: Clone>(x: &Array<A>, num: usize) -> Array<A> {
    let data = x
        .iter()
        .flat_map(|v| std::iter::repeat(v).take(num))
        .collect();
    Array::from_vec(data)
}

/// The first `num` elements in column-major logical order, as a new
/// one-dimensional array.
///
/// **Errors** if `num` exceeds the size of `x`.
pub fn take<A: Clone>(x: &Array<A>, num: usize) -> Result<Array<A>, ArrayError> {
    if num > x.size() {
        return Err(illegal_argument(format!("cannot take {} elements of an array of size {}", num, x.size())));
    }
    Ok(Array::from_vec(x.iter().take(num).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DoubleArray, ErrorKind, IntArray};

    #[test]
    fn stack_vectors_as_columns() {
        let a = IntArray::from_vec(vec![1, 2]);
        let b = IntArray::from_vec(vec![3, 4]);
        let h = hstack(&[&a, &b]).unwrap();
        assert_eq!(h.shape(), &[2, 2]);
        assert_eq!(h.row(0).unwrap().to_vec(), vec![1, 3]);
        let v = vstack(&[&a, &b]).unwrap();
        assert_eq!(v.shape(), &[4, 1]);
        assert_eq!(v.to_vec(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn stack_errors() {
        let a = DoubleArray::zeros(&[2, 2]);
        let b = DoubleArray::zeros(&[2, 3]);
        assert_eq!(vstack(&[&a, &b]).unwrap_err().kind(), ErrorKind::IllegalArgument);
        assert!(hstack(&[&a, &b]).is_ok());
        assert!(hstack::<f64>(&[]).is_err());
        let cube = DoubleArray::zeros(&[2, 2, 2]);
        assert!(vstack(&[&a, &cube]).is_err());
    }

    #[test]
    fn split_parts_are_views() {
        let a = IntArray::from_shape_vec(&[4, 2], (0..8).collect()).unwrap();
        let parts = vsplit(&a, 2).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[1].to_vec(), vec![2, 3, 6, 7]);
        parts[1].set(&[0, 0], 20).unwrap();
        assert_eq!(a.get(&[2, 0]).unwrap(), 20);

        let cols = hsplit(&a, 2).unwrap();
        assert_eq!(cols[0].shape(), &[4, 1]);
        assert_eq!(cols[1].to_vec(), vec![4, 5, 6, 7]);
        assert!(vsplit(&a, 3).is_err());
        assert!(hsplit(&a, 0).is_err());
    }

    #[test]
    fn repeat_and_take() {
        let x = IntArray::from_rows(&[[1, 2], [3, 4]]).unwrap();
        assert_eq!(repeat(&x, 2).to_vec(), vec![1, 1, 3, 3, 2, 2, 4, 4]);
        assert_eq!(repeat(&x, 0).size(), 0);
        assert_eq!(take(&x, 3).unwrap().to_vec(), vec![1, 3, 2]);
        assert!(take(&x, 5).is_err());
    }

    #[test]
    fn repmat_tiles() {
        let x = IntArray::from_rows(&[[1, 2], [3, 4]]).unwrap();
        let y = repmat(&x, 2, 1).unwrap();
        assert_eq!(y.shape(), &[4, 2]);
        assert_eq!(y.column(0).unwrap().to_vec(), vec![1, 3, 1, 3]);
        assert_eq!(repmat(&x, 0, 3).unwrap().shape(), &[0, 6]);
    }
}
