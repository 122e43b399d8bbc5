// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Kernels calling a system CBLAS and LAPACK.
//!
//! The library itself is linked by the final binary, for example through
//! `blas-src` and `lapack-src`.

use cblas_sys as blas_sys;
use cblas_sys::{CblasColMajor, CblasNoTrans, CblasTrans, CBLAS_TRANSPOSE};
use libc::c_char;

use super::reference::{mat_span, vec_span};
use super::{Blas, Lapack};
use crate::routines::Op;

/// Kernels backed by the system CBLAS and LAPACK libraries.
#[derive(Copy, Clone, Debug, Default)]
pub struct NetlibKernels;

fn transpose(op: Op) -> CBLAS_TRANSPOSE {
    match op {
        Op::Keep => CblasNoTrans,
        Op::Transpose => CblasTrans,
    }
}

#[inline]
fn dim(n: i32) -> usize {
    n.max(0) as usize
}

/// The slices handed to the C libraries must cover what they address.
fn check_vec(x: &[f64], n: i32, inc: i32, name: &str) {
    assert!(x.len() >= vec_span(dim(n), dim(inc).max(1)), "{}: slice too short", name);
}

fn check_mat(a: &[f64], rows: i32, cols: i32, ld: i32, name: &str) {
    assert!(a.len() >= mat_span(dim(rows), dim(cols), dim(ld)), "{}: slice too short", name);
}

fn check_work(work: &[f64], lwork: i32) {
    if lwork != -1 {
        assert!(work.len() >= dim(lwork), "work: slice shorter than lwork");
    } else {
        assert!(!work.is_empty(), "work: empty slice for a workspace query");
    }
}

fn check_iwork(iwork: &[i32], liwork: i32) {
    if liwork != -1 {
        assert!(iwork.len() >= dim(liwork), "iwork: slice shorter than liwork");
    } else {
        assert!(!iwork.is_empty(), "iwork: empty slice for a workspace query");
    }
}

#[inline]
fn flag(c: &u8) -> *const c_char {
    c as *const u8 as *const c_char
}

impl Blas for NetlibKernels {
    fn ddot(&self, n: i32, x: &[f64], incx: i32, y: &[f64], incy: i32) -> f64 {
        check_vec(x, n, incx, "x");
        check_vec(y, n, incy, "y");
        unsafe { blas_sys::cblas_ddot(n, x.as_ptr(), incx, y.as_ptr(), incy) }
    }

    fn dnrm2(&self, n: i32, x: &[f64], incx: i32) -> f64 {
        check_vec(x, n, incx, "x");
        unsafe { blas_sys::cblas_dnrm2(n, x.as_ptr(), incx) }
    }

    fn dasum(&self, n: i32, x: &[f64], incx: i32) -> f64 {
        check_vec(x, n, incx, "x");
        unsafe { blas_sys::cblas_dasum(n, x.as_ptr(), incx) }
    }

    fn idamax(&self, n: i32, x: &[f64], incx: i32) -> usize {
        if n <= 0 {
            return 0;
        }
        check_vec(x, n, incx, "x");
        unsafe { blas_sys::cblas_idamax(n, x.as_ptr(), incx) as usize }
    }

    fn dscal(&self, n: i32, alpha: f64, x: &mut [f64], incx: i32) {
        check_vec(x, n, incx, "x");
        unsafe { blas_sys::cblas_dscal(n, alpha, x.as_mut_ptr(), incx) }
    }

    fn daxpy(&self, n: i32, alpha: f64, x: &[f64], incx: i32, y: &mut [f64], incy: i32) {
        check_vec(x, n, incx, "x");
        check_vec(y, n, incy, "y");
        unsafe { blas_sys::cblas_daxpy(n, alpha, x.as_ptr(), incx, y.as_mut_ptr(), incy) }
    }

    fn dcopy(&self, n: i32, x: &[f64], incx: i32, y: &mut [f64], incy: i32) {
        check_vec(x, n, incx, "x");
        check_vec(y, n, incy, "y");
        unsafe { blas_sys::cblas_dcopy(n, x.as_ptr(), incx, y.as_mut_ptr(), incy) }
    }

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
    ) {
        let (leny, lenx) = match trans {
            Op::Keep => (m, n),
            Op::Transpose => (n, m),
        };
        check_mat(a, m, n, lda, "a");
        check_vec(x, lenx, incx, "x");
        check_vec(y, leny, incy, "y");
        unsafe {
            blas_sys::cblas_dgemv(
                CblasColMajor,
                transpose(trans),
                m,
                n,
                alpha,
                a.as_ptr(),
                lda,
                x.as_ptr(),
                incx,
                beta,
                y.as_mut_ptr(),
                incy,
            )
        }
    }

    fn dger(&self, m: i32, n: i32, alpha: f64, x: &[f64], incx: i32, y: &[f64], incy: i32, a: &mut [f64], lda: i32) {
        check_vec(x, m, incx, "x");
        check_vec(y, n, incy, "y");
        check_mat(a, m, n, lda, "a");
        unsafe {
            blas_sys::cblas_dger(
                CblasColMajor,
                m,
                n,
                alpha,
                x.as_ptr(),
                incx,
                y.as_ptr(),
                incy,
                a.as_mut_ptr(),
                lda,
            )
        }
    }

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
    ) {
        let (ar, ac) = if transa == Op::Keep { (m, k) } else { (k, m) };
        let (br, bc) = if transb == Op::Keep { (k, n) } else { (n, k) };
        check_mat(a, ar, ac, lda, "a");
        check_mat(b, br, bc, ldb, "b");
        check_mat(c, m, n, ldc, "c");
        // gemm is C ← αA^Op B^Op + βC
        unsafe {
            blas_sys::cblas_dgemm(
                CblasColMajor,
                transpose(transa),
                transpose(transb),
                m,
                n,
                k,
                alpha,
                a.as_ptr(),
                lda,
                b.as_ptr(),
                ldb,
                beta,
                c.as_mut_ptr(),
                ldc,
            )
        }
    }
}

impl Lapack for NetlibKernels {
    fn dgeqrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, tau: &mut [f64], work: &mut [f64], lwork: i32) -> i32 {
        check_mat(a, m, n, lda, "a");
        check_work(work, lwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dgeqrf_(
                &m,
                &n,
                a.as_mut_ptr(),
                &lda,
                tau.as_mut_ptr(),
                work.as_mut_ptr(),
                &lwork,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(c, m, n, ldc, "c");
        check_work(work, lwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dormqr_(
                flag(&side),
                flag(&trans),
                &m,
                &n,
                &k,
                a.as_ptr(),
                &lda,
                tau.as_ptr(),
                c.as_mut_ptr(),
                &ldc,
                work.as_mut_ptr(),
                &lwork,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(a, n, n, lda, "a");
        check_work(work, lwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dsyev_(
                flag(&jobz),
                flag(&uplo),
                &n,
                a.as_mut_ptr(),
                &lda,
                w.as_mut_ptr(),
                work.as_mut_ptr(),
                &lwork,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(a, n, n, lda, "a");
        check_work(work, lwork);
        check_iwork(iwork, liwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dsyevd_(
                flag(&jobz),
                flag(&uplo),
                &n,
                a.as_mut_ptr(),
                &lda,
                w.as_mut_ptr(),
                work.as_mut_ptr(),
                &lwork,
                iwork.as_mut_ptr(),
                &liwork,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(a, n, n, lda, "a");
        check_work(work, lwork);
        check_iwork(iwork, liwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dsyevr_(
                flag(&jobz),
                flag(&range),
                flag(&uplo),
                &n,
                a.as_mut_ptr(),
                &lda,
                &vl,
                &vu,
                &il,
                &iu,
                &abstol,
                m,
                w.as_mut_ptr(),
                z.as_mut_ptr(),
                &ldz,
                isuppz.as_mut_ptr(),
                work.as_mut_ptr(),
                &lwork,
                iwork.as_mut_ptr(),
                &liwork,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(a, n, n, lda, "a");
        check_work(work, lwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dgeev_(
                flag(&jobvl),
                flag(&jobvr),
                &n,
                a.as_mut_ptr(),
                &lda,
                wr.as_mut_ptr(),
                wi.as_mut_ptr(),
                vl.as_mut_ptr(),
                &ldvl,
                vr.as_mut_ptr(),
                &ldvr,
                work.as_mut_ptr(),
                &lwork,
                &mut info,
            )
        };
        info
    }

    fn dgetrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32]) -> i32 {
        check_mat(a, m, n, lda, "a");
        assert!(ipiv.len() >= dim(m.min(n)), "ipiv: slice too short");
        let mut info = 0;
        unsafe { lapack_sys::dgetrf_(&m, &n, a.as_mut_ptr(), &lda, ipiv.as_mut_ptr(), &mut info) };
        info
    }

    fn dgetri(&self, n: i32, a: &mut [f64], lda: i32, ipiv: &[i32], work: &mut [f64], lwork: i32) -> i32 {
        check_mat(a, n, n, lda, "a");
        check_work(work, lwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dgetri_(
                &n,
                a.as_mut_ptr(),
                &lda,
                ipiv.as_ptr(),
                work.as_mut_ptr(),
                &lwork,
                &mut info,
            )
        };
        info
    }

    fn dgesv(&self, n: i32, nrhs: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32], b: &mut [f64], ldb: i32) -> i32 {
        check_mat(a, n, n, lda, "a");
        check_mat(b, n, nrhs, ldb, "b");
        assert!(ipiv.len() >= dim(n), "ipiv: slice too short");
        let mut info = 0;
        unsafe {
            lapack_sys::dgesv_(
                &n,
                &nrhs,
                a.as_mut_ptr(),
                &lda,
                ipiv.as_mut_ptr(),
                b.as_mut_ptr(),
                &ldb,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(a, m, n, lda, "a");
        check_mat(b, m.max(n), nrhs, ldb, "b");
        check_work(work, lwork);
        assert!(jpvt.len() >= dim(n), "jpvt: slice too short");
        let mut info = 0;
        unsafe {
            lapack_sys::dgelsy_(
                &m,
                &n,
                &nrhs,
                a.as_mut_ptr(),
                &lda,
                b.as_mut_ptr(),
                &ldb,
                jpvt.as_mut_ptr(),
                &rcond,
                rank,
                work.as_mut_ptr(),
                &lwork,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(a, m, n, lda, "a");
        check_work(work, lwork);
        let mut info = 0;
        unsafe {
            lapack_sys::dgesvd_(
                flag(&jobu),
                flag(&jobvt),
                &m,
                &n,
                a.as_mut_ptr(),
                &lda,
                s.as_mut_ptr(),
                u.as_mut_ptr(),
                &ldu,
                vt.as_mut_ptr(),
                &ldvt,
                work.as_mut_ptr(),
                &lwork,
                &mut info,
            )
        };
        info
    }

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
    ) -> i32 {
        check_mat(a, m, n, lda, "a");
        check_work(work, lwork);
        assert!(iwork.len() >= 8 * dim(m.min(n)), "iwork: slice too short");
        let mut info = 0;
        unsafe {
            lapack_sys::dgesdd_(
                flag(&jobz),
                &m,
                &n,
                a.as_mut_ptr(),
                &lda,
                s.as_mut_ptr(),
                u.as_mut_ptr(),
                &ldu,
                vt.as_mut_ptr(),
                &ldvt,
                work.as_mut_ptr(),
                &lwork,
                iwork.as_mut_ptr(),
                &mut info,
            )
        };
        info
    }
}
