// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Linear algebra: LAPACK drivers and the decompositions built on them.
//!
//! The LAPACK-level methods of [`LinearAlgebraRoutines`] take their
//! character flags case-insensitively and write their results into the
//! arrays they are given, like the Fortran routines they wrap. The high
//! level methods ([`lu`](LinearAlgebraRoutines::lu),
//! [`svd`](LinearAlgebraRoutines::svd), ...) work on copies of their input
//! and return new arrays.

use std::fmt;

use crate::error::{check_argument, illegal_argument, ArrayError, LapackError};
use crate::routines::{generic, Op, MATRIX_REQUIRED};
use crate::{DoubleArray, IntArray};

mod decomposition;
mod lapack;
mod workspace;

pub use self::decomposition::{EigenDecomposition, LuDecomposition, SingularValueDecomposition};
pub use self::lapack::LapackRoutines;
pub(crate) use self::workspace::SINGULAR_MATRIX;

/// Singular values at or below this value do not count towards the rank.
pub const RANK_TOLERANCE: f64 = 1e-10;

const SQUARE_REQUIRED: &str = "require square 2d-array";

/// LAPACK routines and linear algebra operations of a backend.
///
/// ```
/// use ndbackend::{ArrayBackend, DoubleArray, PortableBackend};
///
/// let backend = PortableBackend::new();
/// let linalg = backend.linear_algebra_routines();
/// let a = DoubleArray::from_rows(&[[4., 3.], [6., 3.]]).unwrap();
/// let det = linalg.det(&a).unwrap();
/// assert!((det + 6.).abs() < 1e-12);
/// ```
pub trait LinearAlgebraRoutines: Send + Sync + fmt::Debug {
    /// QR factorization `A = Q * R` in place; `tau` receives the
    /// `min(m, n)` scalar factors of the reflectors that define `Q`.
    fn geqrf(&self, a: &DoubleArray, tau: &DoubleArray) -> Result<(), ArrayError>;

    /// Overwrite `c` with `op(Q) * c` (`side = 'l'`) or `c * op(Q)`
    /// (`side = 'r'`), with `Q` given by the reflectors in `a` and `tau`
    /// from [`geqrf`](Self::geqrf).
    fn ormqr(&self, side: char, trans: Op, a: &DoubleArray, tau: &DoubleArray, c: &DoubleArray) -> Result<(), ArrayError>;

    /// Eigenvalues, in ascending order in `w`, and for `jobz = 'v'` the
    /// orthonormal eigenvectors, in the columns of `a`, of a symmetric
    /// matrix whose `uplo` triangle is stored in `a`.
    fn syev(&self, jobz: char, uplo: char, a: &DoubleArray, w: &DoubleArray) -> Result<(), ArrayError>;

    /// Like [`syev`](Self::syev), by divide and conquer.
    fn syevd(&self, jobz: char, uplo: char, a: &DoubleArray, w: &DoubleArray) -> Result<(), ArrayError>;

    /// Selected eigenvalues and optionally eigenvectors of a symmetric
    /// matrix. `range` is `'a'` (all), `'v'` (in `(vl, vu]`) or `'i'` (the
    /// `il`-th through `iu`-th, 1-based). Returns the number found, which
    /// occupy the leading elements of `w` and columns of `z`.
    ///
    /// `z` is required for `jobz = 'v'`, with `n` rows and at least as many
    /// columns as requested; `isuppz`, of size `2 * max(1, n)`, is required
    /// for `jobz = 'v'` with `range = 'a'`.
    fn syevr(
        &self,
        jobz: char,
        range: char,
        uplo: char,
        a: &DoubleArray,
        vl: f64,
        vu: f64,
        il: i32,
        iu: i32,
        abstol: f64,
        w: &DoubleArray,
        z: Option<&DoubleArray>,
        isuppz: Option<&IntArray>,
    ) -> Result<usize, ArrayError>;

    /// Eigenvalues `wr + i wi` of a general square matrix and, for a job
    /// of `'v'`, its left and right eigenvectors in `vl` and `vr`.
    ///
    /// The eigenvectors have unit norm and their largest component real.
    /// A complex pair occupies two consecutive columns holding the real
    /// and imaginary part of the vector of the eigenvalue with positive
    /// imaginary part.
    fn geev(
        &self,
        jobvl: char,
        jobvr: char,
        a: &DoubleArray,
        wr: &DoubleArray,
        wi: &DoubleArray,
        vl: Option<&DoubleArray>,
        vr: Option<&DoubleArray>,
    ) -> Result<(), ArrayError>;

    /// LU factorization with partial pivoting in place; `ipiv` receives
    /// the 1-based row interchanges.
    ///
    /// Returns `i > 0` if `U(i, i)` is exactly zero; the factorization is
    /// complete in that case but `U` is singular.
    fn getrf(&self, a: &DoubleArray, ipiv: &IntArray) -> Result<i32, ArrayError>;

    /// Inverse of a matrix from its [`getrf`](Self::getrf) factors, in
    /// place. Returns `i > 0` if `U(i, i)` is zero.
    fn getri(&self, a: &DoubleArray, ipiv: &IntArray) -> Result<i32, ArrayError>;

    /// Solve `A * X = B`; `a` is overwritten by its LU factors and `b` by
    /// the solution. Returns `i > 0` if `U(i, i)` is zero, in which case no
    /// solution was computed.
    fn gesv(&self, a: &DoubleArray, ipiv: &IntArray, b: &DoubleArray) -> Result<i32, ArrayError>;

    /// Minimum norm least squares solution of `A * X = B` by a complete
    /// orthogonal factorization. `b` has `max(m, n)` rows and receives the
    /// solution in its leading `n` rows. Returns the effective rank.
    fn gelsy(&self, a: &DoubleArray, b: &DoubleArray, jpvt: &IntArray, rcond: f64) -> Result<usize, ArrayError>;

    /// Singular value decomposition; see the Fortran documentation of
    /// `DGESVD` for the job flags `'a'`, `'s'`, `'o'` and `'n'`.
    fn gesvd(
        &self,
        jobu: char,
        jobvt: char,
        a: &DoubleArray,
        s: &DoubleArray,
        u: Option<&DoubleArray>,
        vt: Option<&DoubleArray>,
    ) -> Result<(), ArrayError>;

    /// Singular value decomposition by divide and conquer.
    fn gesdd(
        &self,
        jobz: char,
        a: &DoubleArray,
        s: &DoubleArray,
        u: Option<&DoubleArray>,
        vt: Option<&DoubleArray>,
    ) -> Result<(), ArrayError>;

    /// Eigenvalues and right eigenvectors of a square matrix.
    fn eig(&self, x: &DoubleArray) -> Result<EigenDecomposition, ArrayError> {
        check_argument(x.is_square(), SQUARE_REQUIRED)?;
        let n = x.rows();
        let (wr, wi) = (DoubleArray::zeros(&[n]), DoubleArray::zeros(&[n]));
        let vr = DoubleArray::zeros(&[n, n]);
        self.geev('n', 'v', &x.copy(), &wr, &wi, None, Some(&vr))?;
        Ok(EigenDecomposition::from_real_parts(&wr, &wi, &vr))
    }

    /// Eigenvalues and eigenvectors of a symmetric matrix, read from its
    /// upper triangle.
    fn eigh(&self, x: &DoubleArray) -> Result<EigenDecomposition, ArrayError> {
        check_argument(x.is_square(), SQUARE_REQUIRED)?;
        let a = x.copy();
        let w = DoubleArray::zeros(&[x.rows()]);
        self.syevd('v', 'u', &a, &w)?;
        Ok(EigenDecomposition::from_symmetric(&w, &a))
    }

    /// LU factorization of a copy of `x`.
    fn lu(&self, x: &DoubleArray) -> Result<LuDecomposition, ArrayError> {
        check_argument(x.is_matrix(), MATRIX_REQUIRED)?;
        let lu = x.copy();
        let pivots = IntArray::zeros(&[x.rows().min(x.columns())]);
        self.getrf(&lu, &pivots)?;
        Ok(LuDecomposition::new(lu, pivots))
    }

    /// **Errors** if `x` is not square or singular.
    fn inv(&self, x: &DoubleArray) -> Result<DoubleArray, ArrayError> {
        check_argument(x.is_square(), SQUARE_REQUIRED)?;
        let lu = self.lu(x)?;
        let info = self.getri(lu.decomposition(), lu.pivots())?;
        if info > 0 {
            return Err(LapackError::new(info, SINGULAR_MATRIX).into());
        }
        Ok(lu.into_decomposition())
    }

    fn det(&self, x: &DoubleArray) -> Result<f64, ArrayError> {
        if !x.is_square() {
            return Err(illegal_argument("argument must be a square array"));
        }
        self.lu(x)?.determinant()
    }

    /// Full singular value decomposition of a copy of `x`.
    fn svd(&self, x: &DoubleArray) -> Result<SingularValueDecomposition, ArrayError> {
        check_argument(x.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n) = (x.rows(), x.columns());
        let s = DoubleArray::zeros(&[m.min(n)]);
        let u = DoubleArray::zeros(&[m, m]);
        let vt = DoubleArray::zeros(&[n, n]);
        self.gesdd('a', &x.copy(), &s, Some(&u), Some(&vt))?;
        Ok(SingularValueDecomposition::new(s, u, vt))
    }

    /// Moore-Penrose pseudo-inverse; singular values below machine epsilon
    /// are treated as zero.
    fn pinv(&self, x: &DoubleArray) -> Result<DoubleArray, ArrayError> {
        check_argument(x.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n) = (x.rows(), x.columns());
        let svd = self.svd(x)?;
        let s = svd.singular_values().to_vec();
        let r = s.iter().take_while(|&&v| v > f64::EPSILON).count();
        let u = svd.left_singular_vectors().sub_matrix(0, 0, m, r)?;
        // V[.., ..r] * diag(1 / s)
        let v = svd.right_singular_vectors().sub_matrix(0, 0, n, r)?.copy();
        for (j, sj) in s.iter().take(r).enumerate() {
            v.column(j)?.map_inplace(|x| *x /= sj)?;
        }
        let pinv = DoubleArray::zeros(&[n, m]);
        generic::gemm(Op::Keep, Op::Transpose, 1.0, &v, &u, 0.0, &pinv)?;
        Ok(pinv)
    }

    /// Number of singular values above [`RANK_TOLERANCE`].
    fn rank(&self, x: &DoubleArray) -> Result<usize, ArrayError> {
        let svd = self.svd(x)?;
        Ok(svd.singular_values().iter().filter(|&s| s > RANK_TOLERANCE).count())
    }

    /// Solve `A * X = B` for square `a`; `b` is a vector or a matrix.
    ///
    /// **Errors** if `a` is singular.
    fn solve(&self, a: &DoubleArray, b: &DoubleArray) -> Result<DoubleArray, ArrayError> {
        check_argument(a.is_square(), SQUARE_REQUIRED)?;
        let x = b.copy();
        let ipiv = IntArray::zeros(&[a.rows()]);
        let info = self.gesv(&a.copy(), &ipiv, &x)?;
        if info > 0 {
            return Err(LapackError::new(info, SINGULAR_MATRIX).into());
        }
        Ok(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::RustKernels;

    fn linalg() -> LapackRoutines<RustKernels> {
        LapackRoutines::new(RustKernels)
    }

    fn close(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-9)
    }

    #[test]
    fn inverse() {
        let a = DoubleArray::from_rows(&[[4., 7.], [2., 6.]]).unwrap();
        let inv = linalg().inv(&a).unwrap();
        assert!(close(&inv.to_vec(), &[0.6, -0.2, -0.7, 0.4]));
        // the input is left as it was
        assert_eq!(a.to_vec(), vec![4., 2., 7., 6.]);
    }

    #[test]
    fn inverse_of_singular() {
        let a = DoubleArray::from_rows(&[[1., 2.], [2., 4.]]).unwrap();
        let err = linalg().inv(&a).unwrap_err();
        assert!(matches!(err, ArrayError::Lapack(ref e) if e.is_numerical_failure()));
    }

    #[test]
    fn rank_and_pinv() {
        let x = DoubleArray::from_rows(&[[1., 1.], [2., 2.], [3., 3.]]).unwrap();
        assert_eq!(linalg().rank(&x).unwrap(), 1);
        let p = linalg().pinv(&x).unwrap();
        assert_eq!(p.shape(), &[2, 3]);
        let e = 1. / 28.;
        assert!(close(&p.to_vec(), &[e, e, 2. * e, 2. * e, 3. * e, 3. * e]));
    }

    #[test]
    fn symmetric_eigen() {
        let a = DoubleArray::from_rows(&[[2., 1.], [1., 2.]]).unwrap();
        let e = linalg().eigh(&a).unwrap();
        assert!(close(&e.real_eigenvalues().to_vec(), &[1., 3.]));
        assert!(close(&e.imag_eigenvalues().to_vec(), &[0., 0.]));
    }

    #[test]
    fn rotation_has_imaginary_pair() {
        let a = DoubleArray::from_rows(&[[0., -1.], [1., 0.]]).unwrap();
        let e = linalg().eig(&a).unwrap();
        let mut im = e.imag_eigenvalues().to_vec();
        im.sort_by(f64::total_cmp);
        assert!(close(&im, &[-1., 1.]));
    }

    #[test]
    fn solve_vector() {
        let a = DoubleArray::from_rows(&[[3., 1.], [1., 2.]]).unwrap();
        let b = DoubleArray::from_vec(vec![9., 8.]);
        let x = linalg().solve(&a, &b).unwrap();
        assert!(close(&x.to_vec(), &[2., 3.]));
    }

    #[test]
    fn lu_of_wide_matrix() {
        let a = DoubleArray::from_rows(&[[1., 2., 3.], [4., 5., 6.]]).unwrap();
        let lu = linalg().lu(&a).unwrap();
        assert_eq!(lu.lower().shape(), &[2, 2]);
        assert_eq!(lu.upper().shape(), &[2, 3]);
        assert!(lu.determinant().is_err());
    }
}
