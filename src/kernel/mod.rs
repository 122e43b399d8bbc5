// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! BLAS and LAPACK kernels.
//!
//! The [`Blas`] and [`Lapack`] traits are the native call surface of the
//! routines in this crate. They follow the Fortran conventions of the
//! reference BLAS/LAPACK:
//!
//! - matrices are column-major; `ld*` is the leading dimension, i.e. the
//!   distance between the starts of two columns;
//! - every slice starts at the first element the routine addresses
//!   (`a[0]` is `A(1,1)`);
//! - dimensions, increments and pivot indices are `i32`; pivot indices are
//!   1-based;
//! - character flags are ASCII bytes such as `b'N'`, `b'V'`;
//! - LAPACK routines return their `info` status: 0 on success, `-i` when
//!   argument `i` was illegal and a positive, routine specific code for
//!   numerical failures;
//! - calling a LAPACK routine with `lwork == -1` (or `liwork == -1`) is a
//!   workspace query: the optimal sizes are written to `work[0]` (and
//!   `iwork[0]`) and nothing else is touched.
//!
//! Two implementations exist: [`RustKernels`], written in Rust and always
//! available, and `NetlibKernels` (crate feature `netlib`), which calls
//! a system CBLAS/LAPACK through `cblas-sys` and `lapack-sys`.

use crate::routines::Op;

mod reference;
#[cfg(feature = "netlib")]
mod netlib;

pub use self::reference::RustKernels;
#[cfg(feature = "netlib")]
pub use self::netlib::NetlibKernels;

/// BLAS level 1, 2 and 3 kernels in double precision.
///
/// Increments are positive.
pub trait Blas {
    /// Return `Σ x[i] * y[i]`.
    fn ddot(&self, n: i32, x: &[f64], incx: i32, y: &[f64], incy: i32) -> f64;

    /// Return the euclidean norm of `x`.
    fn dnrm2(&self, n: i32, x: &[f64], incx: i32) -> f64;

    /// Return `Σ |x[i]|`.
    fn dasum(&self, n: i32, x: &[f64], incx: i32) -> f64;

    /// Return the 0-based index of the first element of maximum absolute
    /// value; 0 for an empty vector.
    fn idamax(&self, n: i32, x: &[f64], incx: i32) -> usize;

    /// `x ← alpha * x`
    fn dscal(&self, n: i32, alpha: f64, x: &mut [f64], incx: i32);

    /// `y ← alpha * x + y`
    fn daxpy(&self, n: i32, alpha: f64, x: &[f64], incx: i32, y: &mut [f64], incy: i32);

    /// `y ← x`
    fn dcopy(&self, n: i32, x: &[f64], incx: i32, y: &mut [f64], incy: i32);

    /// `y ← alpha * op(A) * x + beta * y` with `A` of size `m × n`.
    fn dgemv(
        &self,
        trans: Op,
        m: i32,
        n: i32,
        alpha: f64,
        a: &[f64],
        lda: i32,
        x: &[f64],
        incx: i32,
        beta: f64,
        y: &mut [f64],
        incy: i32,
    );

    /// `A ← alpha * x * yᵀ + A` with `A` of size `m × n`.
    fn dger(&self, m: i32, n: i32, alpha: f64, x: &[f64], incx: i32, y: &[f64], incy: i32, a: &mut [f64], lda: i32);

    /// `C ← alpha * op(A) * op(B) + beta * C` with `op(A)` of size `m × k`
    /// and `op(B)` of size `k × n`.
    fn dgemm(
        &self,
        transa: Op,
        transb: Op,
        m: i32,
        n: i32,
        k: i32,
        alpha: f64,
        a: &[f64],
        lda: i32,
        b: &[f64],
        ldb: i32,
        beta: f64,
        c: &mut [f64],
        ldc: i32,
    );
}

/// LAPACK drivers and computational routines in double precision.
///
/// Array arguments that are not referenced for the given job flags (for
/// example `vl` when `jobvl == b'N'`) may be empty slices; their leading
/// dimension must still be at least 1.
pub trait Lapack {
    /// QR factorization `A = Q * R`; `Q` is returned as elementary
    /// reflectors below the diagonal of `a` and in `tau`.
    fn dgeqrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, tau: &mut [f64], work: &mut [f64], lwork: i32) -> i32;

    /// Overwrite `C` with `op(Q) * C` (`side == b'L'`) or `C * op(Q)`
    /// (`side == b'R'`), where `Q` is given by `k` reflectors from
    /// [`dgeqrf`](Lapack::dgeqrf).
    fn dormqr(
        &self,
        side: u8,
        trans: u8,
        m: i32,
        n: i32,
        k: i32,
        a: &[f64],
        lda: i32,
        tau: &[f64],
        c: &mut [f64],
        ldc: i32,
        work: &mut [f64],
        lwork: i32,
    ) -> i32;

    /// Eigenvalues, and optionally eigenvectors, of a symmetric matrix.
    fn dsyev(
        &self,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [f64],
        lda: i32,
        w: &mut [f64],
        work: &mut [f64],
        lwork: i32,
    ) -> i32;

    /// Like [`dsyev`](Lapack::dsyev), using divide and conquer with an
    /// integer workspace.
    fn dsyevd(
        &self,
        jobz: u8,
        uplo: u8,
        n: i32,
        a: &mut [f64],
        lda: i32,
        w: &mut [f64],
        work: &mut [f64],
        lwork: i32,
        iwork: &mut [i32],
        liwork: i32,
    ) -> i32;

    /// Selected eigenvalues, and optionally eigenvectors, of a symmetric
    /// matrix; `range` is `b'A'` (all), `b'V'` (in `(vl, vu]`) or `b'I'`
    /// (the `il`-th through `iu`-th, 1-based). The number found is written
    /// to `m`.
    fn dsyevr(
        &self,
        jobz: u8,
        range: u8,
        uplo: u8,
        n: i32,
        a: &mut [f64],
        lda: i32,
        vl: f64,
        vu: f64,
        il: i32,
        iu: i32,
        abstol: f64,
        m: &mut i32,
        w: &mut [f64],
        z: &mut [f64],
        ldz: i32,
        isuppz: &mut [i32],
        work: &mut [f64],
        lwork: i32,
        iwork: &mut [i32],
        liwork: i32,
    ) -> i32;

    /// Eigenvalues `wr + i wi` and optionally left and right eigenvectors
    /// of a general square matrix.
    fn dgeev(
        &self,
        jobvl: u8,
        jobvr: u8,
        n: i32,
        a: &mut [f64],
        lda: i32,
        wr: &mut [f64],
        wi: &mut [f64],
        vl: &mut [f64],
        ldvl: i32,
        vr: &mut [f64],
        ldvr: i32,
        work: &mut [f64],
        lwork: i32,
    ) -> i32;

    /// LU factorization with partial pivoting, `A = P * L * U`.
    fn dgetrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32]) -> i32;

    /// Inverse of a matrix from its [`dgetrf`](Lapack::dgetrf) factors.
    fn dgetri(&self, n: i32, a: &mut [f64], lda: i32, ipiv: &[i32], work: &mut [f64], lwork: i32) -> i32;

    /// Solve `A * X = B`; `a` is overwritten by its LU factors and `b` by
    /// the solution.
    fn dgesv(&self, n: i32, nrhs: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32], b: &mut [f64], ldb: i32) -> i32;

    /// Minimum norm least squares solution using a complete orthogonal
    /// factorization; the effective rank is written to `rank`.
    fn dgelsy(
        &self,
        m: i32,
        n: i32,
        nrhs: i32,
        a: &mut [f64],
        lda: i32,
        b: &mut [f64],
        ldb: i32,
        jpvt: &mut [i32],
        rcond: f64,
        rank: &mut i32,
        work: &mut [f64],
        lwork: i32,
    ) -> i32;

    /// Singular value decomposition `A = U * Σ * Vᵀ`.
    fn dgesvd(
        &self,
        jobu: u8,
        jobvt: u8,
        m: i32,
        n: i32,
        a: &mut [f64],
        lda: i32,
        s: &mut [f64],
        u: &mut [f64],
        ldu: i32,
        vt: &mut [f64],
        ldvt: i32,
        work: &mut [f64],
        lwork: i32,
    ) -> i32;

    /// Singular value decomposition using divide and conquer.
    fn dgesdd(
        &self,
        jobz: u8,
        m: i32,
        n: i32,
        a: &mut [f64],
        lda: i32,
        s: &mut [f64],
        u: &mut [f64],
        ldu: i32,
        vt: &mut [f64],
        ldvt: i32,
        work: &mut [f64],
        lwork: i32,
        iwork: &mut [i32],
    ) -> i32;
}
