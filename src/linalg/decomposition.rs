// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Results of the high level linear algebra operations.

use num_complex::Complex64;

use super::workspace::SINGULAR_MATRIX;
use crate::error::{illegal_argument, ArrayError, LapackError};
use crate::{Array, DoubleArray, IntArray};

/// LU factorization with partial pivoting, `A = P * L * U`.
///
/// Holds the packed factors as computed by `getrf`: `U` on and above the
/// diagonal, the unit lower triangular `L` below it, and the 1-based row
/// interchanges.
#[derive(Debug)]
pub struct LuDecomposition {
    lu: DoubleArray,
    pivots: IntArray,
}

impl LuDecomposition {
    pub(crate) fn new(lu: DoubleArray, pivots: IntArray) -> Self {
        LuDecomposition { lu, pivots }
    }

    /// The packed factors.
    pub fn decomposition(&self) -> &DoubleArray {
        &self.lu
    }

    /// Row `i` was interchanged with row `pivots[i]` (1-based).
    pub fn pivots(&self) -> &IntArray {
        &self.pivots
    }

    pub(crate) fn into_decomposition(self) -> DoubleArray {
        self.lu
    }

    fn packed(&self) -> (usize, usize, Vec<f64>) {
        (self.lu.rows(), self.lu.columns(), self.lu.to_vec())
    }

    /// The unit lower triangular factor, `m × min(m, n)`.
    pub fn lower(&self) -> DoubleArray {
        let (m, n, lu) = self.packed();
        let k = m.min(n);
        DoubleArray::from_shape_fn(&[m, k], |ix| match ix[0].cmp(&ix[1]) {
            std::cmp::Ordering::Greater => lu[ix[0] + ix[1] * m],
            std::cmp::Ordering::Equal => 1.0,
            std::cmp::Ordering::Less => 0.0,
        })
    }

    /// The upper triangular factor, `min(m, n) × n`.
    pub fn upper(&self) -> DoubleArray {
        let (m, n, lu) = self.packed();
        let k = m.min(n);
        DoubleArray::from_shape_fn(&[k, n], |ix| if ix[0] <= ix[1] { lu[ix[0] + ix[1] * m] } else { 0.0 })
    }

    /// The `m × m` permutation matrix `P`.
    pub fn permutation(&self) -> DoubleArray {
        let m = self.lu.rows();
        let mut rows: Vec<usize> = (0..m).collect();
        for (i, p) in self.pivots.iter().enumerate() {
            rows.swap(i, (p.max(1) - 1) as usize);
        }
        let mut data = vec![0.0; m * m];
        for (i, r) in rows.into_iter().enumerate() {
            data[r + i * m] = 1.0;
        }
        DoubleArray::from_shape_vec_unchecked(&[m, m], data)
    }

    fn require_square(&self) -> Result<usize, ArrayError> {
        if self.lu.is_square() {
            Ok(self.lu.rows())
        } else {
            Err(illegal_argument("Matrix must be square."))
        }
    }

    /// **Errors** if the factored matrix is not square.
    pub fn determinant(&self) -> Result<f64, ArrayError> {
        let n = self.require_square()?;
        let lu = self.lu.to_vec();
        let mut det = 1.0;
        for (i, p) in self.pivots.iter().enumerate() {
            det *= lu[i + i * n];
            if p as usize != i + 1 {
                det = -det;
            }
        }
        Ok(det)
    }

    /// True if no diagonal element of `U` is zero.
    ///
    /// **Errors** if the factored matrix is not square.
    pub fn is_nonsingular(&self) -> Result<bool, ArrayError> {
        let n = self.require_square()?;
        let lu = self.lu.to_vec();
        Ok((0..n).all(|i| lu[i + i * n] != 0.0))
    }

    /// Solve `A * X = B` with the factors; `b` is a vector or a matrix
    /// with `n` rows.
    ///
    /// **Errors** if the factored matrix is not square, `b` has the wrong
    /// number of rows, or `U` is singular.
    pub fn solve(&self, b: &DoubleArray) -> Result<DoubleArray, ArrayError> {
        let n = self.require_square()?;
        if b.ndim() > 2 || b.rows() != n {
            return Err(ArrayError::NonConformant(format!(
                "a has size ({},{}), b has shape {:?}",
                n,
                n,
                b.shape()
            )));
        }
        let lu = self.lu.to_vec();
        if let Some(i) = (0..n).find(|&i| lu[i + i * n] == 0.0) {
            return Err(LapackError::new(i as i32 + 1, SINGULAR_MATRIX).into());
        }
        let nrhs = b.columns();
        let mut x = b.to_vec();
        for (i, p) in self.pivots.iter().enumerate() {
            let p = (p.max(1) - 1) as usize;
            if p != i {
                for j in 0..nrhs {
                    x.swap(i + j * n, p + j * n);
                }
            }
        }
        for j in 0..nrhs {
            let col = &mut x[j * n..(j + 1) * n];
            for i in 0..n {
                let acc: f64 = (0..i).map(|l| lu[i + l * n] * col[l]).sum();
                col[i] -= acc;
            }
            for i in (0..n).rev() {
                let acc: f64 = (i + 1..n).map(|l| lu[i + l * n] * col[l]).sum();
                col[i] = (col[i] - acc) / lu[i + i * n];
            }
        }
        Ok(DoubleArray::from_shape_vec_unchecked(b.shape(), x))
    }
}

/// Singular value decomposition `A = U * Σ * Vᵀ`.
#[derive(Debug)]
pub struct SingularValueDecomposition {
    s: DoubleArray,
    u: DoubleArray,
    vt: DoubleArray,
}

impl SingularValueDecomposition {
    pub(crate) fn new(s: DoubleArray, u: DoubleArray, vt: DoubleArray) -> Self {
        SingularValueDecomposition { s, u, vt }
    }

    /// The singular values in descending order.
    pub fn singular_values(&self) -> &DoubleArray {
        &self.s
    }

    /// `U`, with the left singular vectors in its columns.
    pub fn left_singular_vectors(&self) -> &DoubleArray {
        &self.u
    }

    /// `V`, with the right singular vectors in its columns; a view of
    /// [`vt`](Self::vt).
    pub fn right_singular_vectors(&self) -> DoubleArray {
        self.vt.transpose()
    }

    pub fn vt(&self) -> &DoubleArray {
        &self.vt
    }

    /// `Σ` as an `m × n` matrix.
    pub fn diagonal(&self) -> DoubleArray {
        let (m, n) = (self.u.rows(), self.vt.rows());
        let s = self.s.to_vec();
        DoubleArray::from_shape_fn(&[m, n], |ix| if ix[0] == ix[1] { s[ix[0]] } else { 0.0 })
    }
}

/// Eigenvalues and right eigenvectors of a square matrix.
#[derive(Debug)]
pub struct EigenDecomposition {
    values: Array<Complex64>,
    vectors: Array<Complex64>,
}

impl EigenDecomposition {
    /// Assemble the decomposition from the output of `geev`: complex
    /// conjugate pairs are stored as two consecutive real columns of
    /// `vr`, the real and imaginary parts of the first vector of the pair.
    pub(crate) fn from_real_parts(wr: &DoubleArray, wi: &DoubleArray, vr: &DoubleArray) -> Self {
        let n = wr.size();
        let (wr, wi, v) = (wr.to_vec(), wi.to_vec(), vr.to_vec());
        let values: Vec<Complex64> = wr.iter().zip(&wi).map(|(&re, &im)| Complex64::new(re, im)).collect();
        let mut vectors = vec![Complex64::new(0.0, 0.0); n * n];
        let mut j = 0;
        while j < n {
            if wi[j] != 0.0 && j + 1 < n {
                for i in 0..n {
                    let (re, im) = (v[i + j * n], v[i + (j + 1) * n]);
                    vectors[i + j * n] = Complex64::new(re, im);
                    vectors[i + (j + 1) * n] = Complex64::new(re, -im);
                }
                j += 2;
            } else {
                for i in 0..n {
                    vectors[i + j * n] = Complex64::new(v[i + j * n], 0.0);
                }
                j += 1;
            }
        }
        EigenDecomposition {
            values: Array::from_shape_vec_unchecked(&[n], values),
            vectors: Array::from_shape_vec_unchecked(&[n, n], vectors),
        }
    }

    /// Assemble the decomposition of a symmetric matrix from its real
    /// eigenvalues and eigenvectors.
    pub(crate) fn from_symmetric(w: &DoubleArray, z: &DoubleArray) -> Self {
        EigenDecomposition {
            values: w.map(|&re| Complex64::new(re, 0.0)),
            vectors: z.map(|&re| Complex64::new(re, 0.0)),
        }
    }

    pub fn eigenvalues(&self) -> &Array<Complex64> {
        &self.values
    }

    /// The eigenvectors, one per column, in the order of the eigenvalues
    /// and normalized to unit euclidean norm.
    pub fn eigenvectors(&self) -> &Array<Complex64> {
        &self.vectors
    }

    pub fn real_eigenvalues(&self) -> DoubleArray {
        self.values.map(|c| c.re)
    }

    pub fn imag_eigenvalues(&self) -> DoubleArray {
        self.values.map(|c| c.im)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors() -> LuDecomposition {
        // getrf of [[1, 2], [3, 4]]: rows swapped, L = [[1, 0], [1/3, 1]],
        // U = [[3, 4], [0, 2/3]]
        let lu = DoubleArray::from_rows(&[[3., 4.], [1. / 3., 2. / 3.]]).unwrap();
        LuDecomposition::new(lu, IntArray::from_vec(vec![2, 2]))
    }

    #[test]
    fn determinant_counts_interchanges() {
        let d = factors().determinant().unwrap();
        assert!((d + 2.).abs() < 1e-12);
    }

    #[test]
    fn permutation_reconstructs() {
        let lu = factors();
        assert_eq!(lu.permutation().to_vec(), vec![0., 1., 1., 0.]);
        assert_eq!(lu.lower().to_vec(), vec![1., 1. / 3., 0., 1.]);
        assert_eq!(lu.upper().to_vec(), vec![3., 0., 4., 2. / 3.]);
    }

    #[test]
    fn solve_with_factors() {
        let x = factors().solve(&DoubleArray::from_vec(vec![5., 11.])).unwrap();
        let x = x.to_vec();
        assert!((x[0] - 1.).abs() < 1e-12 && (x[1] - 2.).abs() < 1e-12);
    }

    #[test]
    fn singular_factors() {
        let lu = LuDecomposition::new(DoubleArray::zeros(&[2, 2]), IntArray::from_vec(vec![1, 2]));
        assert!(!lu.is_nonsingular().unwrap());
        let err = lu.solve(&DoubleArray::zeros(&[2])).unwrap_err();
        assert_eq!(err, ArrayError::Lapack(LapackError::new(1, SINGULAR_MATRIX)));
    }

    #[test]
    fn conjugate_pairs() {
        let wr = DoubleArray::from_vec(vec![0., 0.]);
        let wi = DoubleArray::from_vec(vec![1., -1.]);
        let vr = DoubleArray::from_shape_vec(&[2, 2], vec![0.5, 0.5, 0.5, -0.5]).unwrap();
        let e = EigenDecomposition::from_real_parts(&wr, &wi, &vr);
        let v = e.eigenvectors().to_vec();
        assert_eq!(v[1], Complex64::new(0.5, -0.5));
        assert_eq!(v[3], Complex64::new(0.5, 0.5));
        assert_eq!(e.imag_eigenvalues().to_vec(), vec![1., -1.]);
    }
}
