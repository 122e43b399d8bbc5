// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Element-wise algorithms that work for any stride pattern.
//!
//! Inputs are read into column-major snapshots first, so an output may
//! share its buffer with an input.

use super::{Op, MATRIX_REQUIRED, VECTOR_REQUIRED};
use crate::dimension;
use crate::error::{check_argument, size_mismatch, ArrayError};
use crate::DoubleArray;

pub(crate) fn check_vectors(a: &DoubleArray, b: &DoubleArray) -> Result<(), ArrayError> {
    check_argument(a.is_vector() && b.is_vector(), VECTOR_REQUIRED)?;
    if a.size() != b.size() {
        return Err(size_mismatch(a.shape(), b.shape()));
    }
    Ok(())
}

/// Check `y ← op(A) x` and return `(rows, cols)` of `A`.
pub(crate) fn check_gemv(trans: Op, a: &DoubleArray, x: &DoubleArray, y: &DoubleArray) -> Result<(usize, usize), ArrayError> {
    check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
    check_argument(x.is_vector() && y.is_vector(), VECTOR_REQUIRED)?;
    let (m, n) = (a.rows(), a.columns());
    let (rows, cols) = trans.apply(m, n);
    if x.size() != cols || y.size() != rows {
        return Err(ArrayError::NonConformant(format!(
            "op(a) has size ({},{}), x has size {}, y has size {}",
            rows,
            cols,
            x.size(),
            y.size()
        )));
    }
    Ok((m, n))
}

pub(crate) fn check_ger(x: &DoubleArray, y: &DoubleArray, a: &DoubleArray) -> Result<(), ArrayError> {
    check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
    check_argument(x.is_vector() && y.is_vector(), VECTOR_REQUIRED)?;
    if x.size() != a.rows() || y.size() != a.columns() {
        return Err(ArrayError::NonConformant(format!(
            "a has size ({},{}), x has size {}, y has size {}",
            a.rows(),
            a.columns(),
            x.size(),
            y.size()
        )));
    }
    Ok(())
}

/// Check `C ← op(A) op(B)` and return `(m, n, k)`.
pub(crate) fn check_gemm(
    transa: Op,
    transb: Op,
    a: &DoubleArray,
    b: &DoubleArray,
    c: &DoubleArray,
) -> Result<(usize, usize, usize), ArrayError> {
    check_argument(a.is_matrix() && b.is_matrix() && c.is_matrix(), MATRIX_REQUIRED)?;
    let (m, k) = transa.apply(a.rows(), a.columns());
    let (kb, n) = transb.apply(b.rows(), b.columns());
    if k != kb || c.rows() != m || c.columns() != n {
        return Err(ArrayError::NonConformant(format!(
            "a has size ({},{}), b has size ({},{}), c has size ({}, {})",
            m,
            k,
            kb,
            n,
            c.rows(),
            c.columns()
        )));
    }
    Ok((m, n, k))
}

pub(crate) fn dot(a: &DoubleArray, b: &DoubleArray) -> Result<f64, ArrayError> {
    check_vectors(a, b)?;
    Ok(a.iter().zip(b.iter()).map(|(x, y)| x * y).sum())
}

pub(crate) fn norm2(a: &DoubleArray) -> Result<f64, ArrayError> {
    check_argument(a.is_vector(), VECTOR_REQUIRED)?;
    Ok(a.iter().map(|x| x * x).sum::<f64>().sqrt())
}

pub(crate) fn asum(a: &DoubleArray) -> Result<f64, ArrayError> {
    check_argument(a.is_vector(), VECTOR_REQUIRED)?;
    Ok(a.iter().map(f64::abs).sum())
}

pub(crate) fn iamax(a: &DoubleArray) -> Result<usize, ArrayError> {
    check_argument(a.is_vector(), VECTOR_REQUIRED)?;
    let mut best = 0;
    let mut max = f64::NEG_INFINITY;
    for (i, x) in a.iter().enumerate() {
        if x.abs() > max {
            max = x.abs();
            best = i;
        }
    }
    Ok(best)
}

pub(crate) fn scal(alpha: f64, a: &DoubleArray) -> Result<(), ArrayError> {
    check_argument(a.is_vector(), VECTOR_REQUIRED)?;
    a.ensure_writable()?;
    if alpha == 1.0 {
        return Ok(());
    }
    a.map_inplace(|x| *x *= alpha)
}

pub(crate) fn axpy(alpha: f64, x: &DoubleArray, y: &DoubleArray) -> Result<(), ArrayError> {
    check_vectors(x, y)?;
    y.ensure_writable()?;
    if alpha == 0.0 {
        return Ok(());
    }
    let xs = x.to_vec();
    let ys = y.to_vec();
    y.assign_values(xs.iter().zip(ys).map(|(x, y)| alpha * x + y).collect())
}

pub(crate) fn gemv(trans: Op, alpha: f64, a: &DoubleArray, x: &DoubleArray, beta: f64, y: &DoubleArray) -> Result<(), ArrayError> {
    let (m, _) = check_gemv(trans, a, x, y)?;
    y.ensure_writable()?;
    let av = a.to_vec();
    let xs = x.to_vec();
    let ys = y.to_vec();
    let mut out = Vec::with_capacity(ys.len());
    for (i, yi) in ys.into_iter().enumerate() {
        let mut acc = 0.0;
        for (l, xl) in xs.iter().enumerate() {
            let aik = match trans {
                Op::Keep => av[i + l * m],
                Op::Transpose => av[l + i * m],
            };
            acc += aik * xl;
        }
        // beta == 0 ignores y, NaNs included
        out.push(if beta == 0.0 { alpha * acc } else { alpha * acc + beta * yi });
    }
    y.assign_values(out)
}

pub(crate) fn ger(alpha: f64, x: &DoubleArray, y: &DoubleArray, a: &DoubleArray) -> Result<(), ArrayError> {
    check_ger(x, y, a)?;
    a.ensure_writable()?;
    if alpha == 0.0 {
        return Ok(());
    }
    let m = a.rows();
    let xs = x.to_vec();
    let ys = y.to_vec();
    let mut av = a.to_vec();
    for (j, yj) in ys.iter().enumerate() {
        for (i, xi) in xs.iter().enumerate() {
            av[i + j * m] += alpha * xi * yj;
        }
    }
    a.assign_values(av)
}

pub(crate) fn gemm(
    transa: Op,
    transb: Op,
    alpha: f64,
    a: &DoubleArray,
    b: &DoubleArray,
    beta: f64,
    c: &DoubleArray,
) -> Result<(), ArrayError> {
    let (m, n, k) = check_gemm(transa, transb, a, b, c)?;
    c.ensure_writable()?;
    let (ar, br) = (a.rows(), b.rows());
    let av = a.to_vec();
    let bv = b.to_vec();
    let mut cv = c.to_vec();
    let a_at = |i: usize, l: usize| match transa {
        Op::Keep => av[i + l * ar],
        Op::Transpose => av[l + i * ar],
    };
    let b_at = |l: usize, j: usize| match transb {
        Op::Keep => bv[l + j * br],
        Op::Transpose => bv[j + l * br],
    };
    for j in 0..n {
        for i in 0..m {
            let mut acc = 0.0;
            for l in 0..k {
                acc += a_at(i, l) * b_at(l, j);
            }
            let cij = &mut cv[i + j * m];
            *cij = if beta == 0.0 { alpha * acc } else { alpha * acc + beta * *cij };
        }
    }
    c.assign_values(cv)
}

pub(crate) fn copy(from: &DoubleArray, to: &DoubleArray) -> Result<(), ArrayError> {
    to.assign(from)
}

pub(crate) fn swap(a: &DoubleArray, b: &DoubleArray) -> Result<(), ArrayError> {
    if a.shape() != b.shape() {
        return Err(size_mismatch(a.shape(), b.shape()));
    }
    a.swap(b)
}

pub(crate) fn sum(x: &DoubleArray) -> f64 {
    x.iter().sum()
}

pub(crate) fn mean(x: &DoubleArray) -> f64 {
    sum(x) / x.size() as f64
}

pub(crate) fn var(x: &DoubleArray) -> f64 {
    let values = x.to_vec();
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n
}

pub(crate) fn min(x: &DoubleArray) -> f64 {
    x.iter().fold(f64::INFINITY, f64::min)
}

pub(crate) fn max(x: &DoubleArray) -> f64 {
    x.iter().fold(f64::NEG_INFINITY, f64::max)
}

pub(crate) fn prod(x: &DoubleArray) -> f64 {
    x.iter().product()
}

pub(crate) fn cumsum(x: &DoubleArray) -> DoubleArray {
    let mut acc = 0.0;
    x.map(|v| {
        acc += v;
        acc
    })
}

/// Reduce every lane along `axis` with `f`; the result has the shape of
/// `x` without `axis`, element `i` holding the reduction of lane `i`.
pub(crate) fn reduce_axis<F>(x: &DoubleArray, axis: usize, f: F) -> Result<DoubleArray, ArrayError>
where
    F: Fn(&DoubleArray) -> f64,
{
    x.check_axis(axis)?;
    let shape = dimension::remove_axis(x.shape(), axis);
    let values = if x.shape()[axis] == 0 {
        // lanes of length zero
        let empty = f(&DoubleArray::from_vec(Vec::new()));
        vec![empty; dimension::size(&shape)]
    } else {
        (0..x.vectors(axis))
            .map(|i| x.vector(axis, i).map(|lane| f(&lane)))
            .collect::<Result<Vec<_>, _>>()?
    };
    DoubleArray::from_shape_vec(&shape, values)
}

/// Cumulative sums along each lane of `axis`, in a new array of the shape
/// of `x`.
pub(crate) fn cumsum_axis(x: &DoubleArray, axis: usize) -> Result<DoubleArray, ArrayError> {
    x.check_axis(axis)?;
    let out = DoubleArray::zeros(x.shape());
    if x.shape()[axis] > 0 {
        for i in 0..x.vectors(axis) {
            out.vector(axis, i)?.assign(&cumsum(&x.vector(axis, i)?))?;
        }
    }
    Ok(out)
}

pub(crate) fn trace(x: &DoubleArray) -> Result<f64, ArrayError> {
    check_argument(x.is_matrix(), MATRIX_REQUIRED)?;
    let n = x.rows().min(x.columns());
    (0..n).map(|i| x.get(&[i, i])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn matrix(rows: &[[f64; 2]]) -> DoubleArray {
        DoubleArray::from_rows(rows).unwrap()
    }

    #[test]
    fn reductions() {
        let x = DoubleArray::from_vec(vec![1., 2., 3., 4.]);
        assert_eq!(sum(&x), 10.);
        assert_eq!(mean(&x), 2.5);
        assert_eq!(var(&x), 1.25);
        assert_eq!(min(&x), 1.);
        assert_eq!(max(&x), 4.);
        assert_eq!(prod(&x), 24.);
        assert_eq!(cumsum(&x).to_vec(), vec![1., 3., 6., 10.]);
    }

    #[test]
    fn empty_reductions() {
        let x = DoubleArray::from_vec(vec![]);
        assert!(mean(&x).is_nan());
        assert_eq!(min(&x), f64::INFINITY);
        assert_eq!(max(&x), f64::NEG_INFINITY);
        assert_eq!(prod(&x), 1.);
    }

    #[test]
    fn cumsum_of_a_view_keeps_shape() {
        let a = matrix(&[[1., 2.], [3., 4.]]);
        let c = cumsum(&a.transpose());
        assert_eq!(c.shape(), &[2, 2]);
        // column-major order of the transpose is 1, 2, 3, 4
        assert_eq!(c.to_vec(), vec![1., 3., 6., 10.]);
    }

    #[test]
    fn reduce_lanes_of_a_matrix() {
        // [[1, 2, 3], [4, 5, 6]]
        let a = DoubleArray::from_rows(&[[1., 2., 3.], [4., 5., 6.]]).unwrap();
        let columns = reduce_axis(&a, 0, sum).unwrap();
        assert_eq!(columns.shape(), &[3]);
        assert_eq!(columns.to_vec(), vec![5., 7., 9.]);
        let rows = reduce_axis(&a, 1, max).unwrap();
        assert_eq!(rows.to_vec(), vec![3., 6.]);
        assert_eq!(reduce_axis(&a, 2, sum).unwrap_err().kind(), ErrorKind::IllegalArgument);
    }

    #[test]
    fn reduce_lanes_of_length_zero() {
        let a = DoubleArray::zeros(&[0, 3]);
        let m = reduce_axis(&a, 0, mean).unwrap();
        assert_eq!(m.shape(), &[3]);
        assert!(m.iter().all(f64::is_nan));
        assert_eq!(reduce_axis(&a, 1, sum).unwrap().shape(), &[0]);
    }

    #[test]
    fn cumsum_along_rows() {
        let a = DoubleArray::from_rows(&[[1., 2., 3.], [4., 5., 6.]]).unwrap();
        let c = cumsum_axis(&a, 1).unwrap();
        assert_eq!(c.get(&[0, 2]).unwrap(), 6.);
        assert_eq!(c.get(&[1, 1]).unwrap(), 9.);
        let c = cumsum_axis(&a, 0).unwrap();
        assert_eq!(c.to_vec(), vec![1., 5., 2., 7., 3., 9.]);
    }

    #[test]
    fn trace_of_rectangular() {
        let a = DoubleArray::from_shape_vec(&[2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
        assert_eq!(trace(&a).unwrap(), 5.);
        let v = DoubleArray::from_vec(vec![1.]);
        assert_eq!(trace(&v).unwrap_err(), crate::error::illegal_argument("require 2d-array"));
    }

    #[test]
    fn iamax_first_maximum() {
        let x = DoubleArray::from_vec(vec![1., -3., 3., 2.]);
        assert_eq!(iamax(&x).unwrap(), 1);
    }

    #[test]
    fn gemv_transposed() {
        let a = matrix(&[[1., 2.], [3., 4.]]);
        let x = DoubleArray::from_vec(vec![1., 1.]);
        let y = DoubleArray::from_vec(vec![f64::NAN, f64::NAN]);
        gemv(Op::Transpose, 1., &a, &x, 0., &y).unwrap();
        assert_eq!(y.to_vec(), vec![4., 6.]);
    }

    #[test]
    fn ger_accumulates() {
        let a = DoubleArray::eye(2);
        let x = DoubleArray::from_vec(vec![1., 2.]);
        let y = DoubleArray::from_vec(vec![3., 4.]);
        ger(1., &x, &y, &a).unwrap();
        assert_eq!(a.to_vec(), vec![4., 6., 4., 9.]);
    }

    #[test]
    fn gemm_conformance_names_all_shapes() {
        let a = DoubleArray::zeros(&[2, 3]);
        let b = DoubleArray::zeros(&[2, 2]);
        let c = DoubleArray::zeros(&[2, 2]);
        let err = gemm(Op::Keep, Op::Keep, 1., &a, &b, 0., &c).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonConformant);
        assert_eq!(
            err,
            ArrayError::NonConformant("a has size (2,3), b has size (2,2), c has size (2, 2)".into())
        );
    }

    #[test]
    fn gemm_output_aliases_input() {
        let a = matrix(&[[1., 2.], [3., 4.]]);
        gemm(Op::Keep, Op::Keep, 1., &a, &a.view(), 0., &a).unwrap();
        assert_eq!(a.to_vec(), vec![7., 15., 10., 22.]);
    }

    #[test]
    fn axpy_zero_alpha_is_noop() {
        let x = DoubleArray::from_vec(vec![1., 2.]);
        let y = DoubleArray::from_vec(vec![f64::NAN, 1.]);
        axpy(0., &x, &y).unwrap();
        assert!(y.get(&[0]).unwrap().is_nan());
    }

    #[test]
    fn swap_requires_same_shape() {
        let a = DoubleArray::zeros(&[2, 2]);
        let b = DoubleArray::zeros(&[4]);
        assert_eq!(swap(&a, &b).unwrap_err().kind(), ErrorKind::IllegalArgument);
    }
}
