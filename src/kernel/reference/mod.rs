// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Kernels written in Rust.
//!
//! The LAPACK entry points check their arguments and workspace sizes the
//! way the reference LAPACK does and return the same `info` codes; the
//! algorithms behind them are unblocked and favour simplicity.

mod blas;
mod eigen;
mod lstsq;
mod lu;
mod mat;
mod qr;
mod svd;

#[cfg(feature = "netlib")]
pub(super) use self::blas::{mat_span, vec_span};
use self::mat::Mat;
use self::svd::Job;
use super::{Blas, Lapack};
use crate::routines::Op;

/// BLAS and LAPACK kernels implemented in Rust; always available.
#[derive(Copy, Clone, Debug, Default)]
pub struct RustKernels;

#[inline]
fn dim(n: i32) -> usize {
    n.max(0) as usize
}

#[inline]
fn inc(inc: i32) -> usize {
    inc.max(1) as usize
}

/// Store a workspace size in the first element of `work`.
fn report<T: From<i32>>(work: &mut [T], size: usize) {
    if let Some(w) = work.first_mut() {
        *w = T::from(size.min(i32::MAX as usize) as i32);
    }
}

fn upper(flag: u8) -> u8 {
    flag.to_ascii_uppercase()
}

impl Blas for RustKernels {
    fn ddot(&self, n: i32, x: &[f64], incx: i32, y: &[f64], incy: i32) -> f64 {
        blas::ddot(dim(n), x, inc(incx), y, inc(incy))
    }

    fn dnrm2(&self, n: i32, x: &[f64], incx: i32) -> f64 {
        blas::dnrm2(dim(n), x, inc(incx))
    }

    fn dasum(&self, n: i32, x: &[f64], incx: i32) -> f64 {
        blas::dasum(dim(n), x, inc(incx))
    }

    fn idamax(&self, n: i32, x: &[f64], incx: i32) -> usize {
        blas::idamax(dim(n), x, inc(incx))
    }

    fn dscal(&self, n: i32, alpha: f64, x: &mut [f64], incx: i32) {
        blas::dscal(dim(n), alpha, x, inc(incx))
    }

    fn daxpy(&self, n: i32, alpha: f64, x: &[f64], incx: i32, y: &mut [f64], incy: i32) {
        blas::daxpy(dim(n), alpha, x, inc(incx), y, inc(incy))
    }

    fn dcopy(&self, n: i32, x: &[f64], incx: i32, y: &mut [f64], incy: i32) {
        blas::dcopy(dim(n), x, inc(incx), y, inc(incy))
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
        blas::dgemv(trans, dim(m), dim(n), alpha, a, dim(lda), x, inc(incx), beta, y, inc(incy))
    }

    fn dger(&self, m: i32, n: i32, alpha: f64, x: &[f64], incx: i32, y: &[f64], incy: i32, a: &mut [f64], lda: i32) {
        blas::dger(dim(m), dim(n), alpha, x, inc(incx), y, inc(incy), a, dim(lda))
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
        blas::dgemm(transa, transb, dim(m), dim(n), dim(k), alpha, a, dim(lda), b, dim(ldb), beta, c, dim(ldc))
    }
}

/// Shared body of the symmetric eigensolvers: eigenvalues go to `w`, and
/// eigenvectors replace `a` when `vectors` is set.
fn symmetric_eigen(vectors: bool, uplo_upper: bool, n: usize, a: &mut [f64], lda: usize, w: &mut [f64]) -> i32 {
    if n == 0 {
        return 0;
    }
    match eigen::symmetric(Mat::symmetric(a, lda, n, uplo_upper)) {
        Ok((values, v)) => {
            w[..n].copy_from_slice(&values);
            if vectors {
                v.write_block(n, n, a, lda);
            }
            0
        }
        Err(info) => info,
    }
}

fn jobz_flag(jobz: u8) -> Option<bool> {
    match upper(jobz) {
        b'V' => Some(true),
        b'N' => Some(false),
        _ => None,
    }
}

fn uplo_flag(uplo: u8) -> Option<bool> {
    match upper(uplo) {
        b'U' => Some(true),
        b'L' => Some(false),
        _ => None,
    }
}

impl Lapack for RustKernels {
    fn dgeqrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, tau: &mut [f64], work: &mut [f64], lwork: i32) -> i32 {
        if m < 0 {
            return -1;
        }
        if n < 0 {
            return -2;
        }
        if lda < m.max(1) {
            return -4;
        }
        let lwmin = dim(n).max(1);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -7;
        }
        qr::geqrf(dim(m), dim(n), a, dim(lda), tau);
        report(work, lwmin);
        0
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
        let left = match upper(side) {
            b'L' => true,
            b'R' => false,
            _ => return -1,
        };
        let transpose = match upper(trans) {
            b'N' => false,
            b'T' | b'C' => true,
            _ => return -2,
        };
        if m < 0 {
            return -3;
        }
        if n < 0 {
            return -4;
        }
        let nq = if left { m } else { n };
        if k < 0 || k > nq {
            return -5;
        }
        if lda < nq.max(1) {
            return -7;
        }
        if ldc < m.max(1) {
            return -10;
        }
        let nw = if left { n } else { m };
        let lwmin = dim(nw).max(1);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -12;
        }
        qr::ormqr(left, transpose, dim(m), dim(n), dim(k), a, dim(lda), tau, c, dim(ldc));
        report(work, lwmin);
        0
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
        let Some(vectors) = jobz_flag(jobz) else {
            return -1;
        };
        let Some(up) = uplo_flag(uplo) else {
            return -2;
        };
        if n < 0 {
            return -3;
        }
        if lda < n.max(1) {
            return -5;
        }
        let lwmin = (3 * dim(n)).saturating_sub(1).max(1);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -8;
        }
        let info = symmetric_eigen(vectors, up, dim(n), a, dim(lda), w);
        report(work, lwmin);
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
        let Some(vectors) = jobz_flag(jobz) else {
            return -1;
        };
        let Some(up) = uplo_flag(uplo) else {
            return -2;
        };
        if n < 0 {
            return -3;
        }
        if lda < n.max(1) {
            return -5;
        }
        let nu = dim(n);
        let (lwmin, liwmin) = if nu <= 1 {
            (1, 1)
        } else if vectors {
            (1 + 6 * nu + 2 * nu * nu, 3 + 5 * nu)
        } else {
            (2 * nu + 1, 1)
        };
        if lwork == -1 || liwork == -1 {
            report(work, lwmin);
            report(iwork, liwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -8;
        }
        if liwork < 0 || (liwork as usize) < liwmin {
            return -10;
        }
        let info = symmetric_eigen(vectors, up, nu, a, dim(lda), w);
        report(work, lwmin);
        report(iwork, liwmin);
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
        _abstol: f64,
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
        let Some(vectors) = jobz_flag(jobz) else {
            return -1;
        };
        let range = upper(range);
        if !matches!(range, b'A' | b'V' | b'I') {
            return -2;
        }
        let Some(up) = uplo_flag(uplo) else {
            return -3;
        };
        if n < 0 {
            return -4;
        }
        if lda < n.max(1) {
            return -6;
        }
        if range == b'V' && n > 0 && vu <= vl {
            return -8;
        }
        if range == b'I' {
            if il < 1 || il > n.max(1) {
                return -9;
            }
            if iu < n.min(il) || iu > n {
                return -10;
            }
        }
        if ldz < 1 || (vectors && ldz < n) {
            return -15;
        }
        let nu = dim(n);
        let (lwmin, liwmin) = ((26 * nu).max(1), (10 * nu).max(1));
        if lwork == -1 || liwork == -1 {
            report(work, lwmin);
            report(iwork, liwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -18;
        }
        if liwork < 0 || (liwork as usize) < liwmin {
            return -20;
        }
        *m = 0;
        if nu == 0 {
            return 0;
        }
        let (values, v) = match eigen::symmetric(Mat::symmetric(a, dim(lda), nu, up)) {
            Ok(r) => r,
            Err(info) => return info,
        };
        let selected: Vec<usize> = match range {
            b'V' => (0..nu).filter(|&i| values[i] > vl && values[i] <= vu).collect(),
            b'I' => (dim(il) - 1..dim(iu)).collect(),
            _ => (0..nu).collect(),
        };
        let ldz = dim(ldz);
        for (k, &i) in selected.iter().enumerate() {
            w[k] = values[i];
            if vectors {
                let col = v.col(i);
                z[k * ldz..k * ldz + nu].copy_from_slice(col);
                let first = col.iter().position(|&x| x != 0.0).unwrap_or(0);
                let last = col.iter().rposition(|&x| x != 0.0).unwrap_or(0);
                isuppz[2 * k] = first as i32 + 1;
                isuppz[2 * k + 1] = last as i32 + 1;
            }
        }
        *m = selected.len() as i32;
        report(work, lwmin);
        report(iwork, liwmin);
        0
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
        let Some(want_vl) = jobz_flag(jobvl) else {
            return -1;
        };
        let Some(want_vr) = jobz_flag(jobvr) else {
            return -2;
        };
        if n < 0 {
            return -3;
        }
        if lda < n.max(1) {
            return -5;
        }
        if ldvl < 1 || (want_vl && ldvl < n) {
            return -9;
        }
        if ldvr < 1 || (want_vr && ldvr < n) {
            return -11;
        }
        let nu = dim(n);
        let lwmin = if want_vl || want_vr { 4 * nu } else { 3 * nu }.max(1);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -13;
        }
        if nu == 0 {
            return 0;
        }
        let g = match eigen::general(Mat::from_slice(a, dim(lda), nu, nu)) {
            Ok(g) => g,
            Err(info) => return info,
        };
        wr[..nu].copy_from_slice(&g.wr);
        wi[..nu].copy_from_slice(&g.wi);
        if want_vl {
            let mut left = match eigen::left_vectors(&g.v) {
                Ok(left) => left,
                Err(_) => return n,
            };
            eigen::normalize_vectors(&mut left, &g.wi);
            left.write_block(nu, nu, vl, dim(ldvl));
        }
        if want_vr {
            let mut right = g.v;
            eigen::normalize_vectors(&mut right, &g.wi);
            right.write_block(nu, nu, vr, dim(ldvr));
        }
        report(work, lwmin);
        0
    }

    fn dgetrf(&self, m: i32, n: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32]) -> i32 {
        if m < 0 {
            return -1;
        }
        if n < 0 {
            return -2;
        }
        if lda < m.max(1) {
            return -4;
        }
        lu::getrf(dim(m), dim(n), a, dim(lda), ipiv)
    }

    fn dgetri(&self, n: i32, a: &mut [f64], lda: i32, ipiv: &[i32], work: &mut [f64], lwork: i32) -> i32 {
        if n < 0 {
            return -1;
        }
        if lda < n.max(1) {
            return -3;
        }
        let lwmin = dim(n).max(1);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -6;
        }
        let info = lu::getri(dim(n), a, dim(lda), ipiv);
        report(work, lwmin);
        info
    }

    fn dgesv(&self, n: i32, nrhs: i32, a: &mut [f64], lda: i32, ipiv: &mut [i32], b: &mut [f64], ldb: i32) -> i32 {
        if n < 0 {
            return -1;
        }
        if nrhs < 0 {
            return -2;
        }
        if lda < n.max(1) {
            return -4;
        }
        if ldb < n.max(1) {
            return -7;
        }
        let (nu, lda) = (dim(n), dim(lda));
        let info = lu::getrf(nu, nu, a, lda, ipiv);
        if info == 0 {
            lu::getrs(nu, dim(nrhs), a, lda, ipiv, b, dim(ldb));
        }
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
        if m < 0 {
            return -1;
        }
        if n < 0 {
            return -2;
        }
        if nrhs < 0 {
            return -3;
        }
        if lda < m.max(1) {
            return -5;
        }
        if ldb < m.max(n).max(1) {
            return -7;
        }
        let (mu, nu, nr) = (dim(m), dim(n), dim(nrhs));
        let mn = mu.min(nu);
        let lwmin = (mn + 3 * nu + 1).max(2 * mn + nr);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -12;
        }
        *rank = lstsq::gelsy(mu, nu, nr, a, dim(lda), b, dim(ldb), jpvt, rcond) as i32;
        report(work, lwmin);
        0
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
        let Some(ju) = Job::from_flag(jobu) else {
            return -1;
        };
        let jv = match Job::from_flag(jobvt) {
            Some(Job::Overwrite) if ju == Job::Overwrite => return -2,
            Some(jv) => jv,
            None => return -2,
        };
        if m < 0 {
            return -3;
        }
        if n < 0 {
            return -4;
        }
        if lda < m.max(1) {
            return -6;
        }
        let mn = m.min(n);
        if ldu < 1 || (matches!(ju, Job::All | Job::Thin) && ldu < m) {
            return -9;
        }
        if ldvt < 1 || (jv == Job::All && ldvt < n) || (jv == Job::Thin && ldvt < mn) {
            return -11;
        }
        let (mu, nu) = (dim(m), dim(n));
        let (mn, mx) = (mu.min(nu), mu.max(nu));
        let lwmin = (3 * mn + mx).max(5 * mn).max(1);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -13;
        }
        let info = svd::store(ju, jv, mu, nu, a, dim(lda), s, u, dim(ldu), vt, dim(ldvt));
        report(work, lwmin);
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
        _iwork: &mut [i32],
    ) -> i32 {
        let Some(job) = Job::from_flag(jobz) else {
            return -1;
        };
        if m < 0 {
            return -2;
        }
        if n < 0 {
            return -3;
        }
        if lda < m.max(1) {
            return -5;
        }
        let (ju, jv) = match job {
            Job::All => (Job::All, Job::All),
            Job::Thin => (Job::Thin, Job::Thin),
            Job::Overwrite if m >= n => (Job::Overwrite, Job::All),
            Job::Overwrite => (Job::All, Job::Overwrite),
            Job::None => (Job::None, Job::None),
        };
        let mn = m.min(n);
        if ldu < 1 || (matches!(ju, Job::All | Job::Thin) && ldu < m) {
            return -8;
        }
        if ldvt < 1 || (jv == Job::All && ldvt < n) || (jv == Job::Thin && ldvt < mn) {
            return -10;
        }
        let (mu, nu) = (dim(m), dim(n));
        let (mn, mx) = (mu.min(nu), mu.max(nu));
        let lwmin = match job {
            Job::None => 3 * mn + mx.max(7 * mn),
            Job::Overwrite => 3 * mn + mx.max(5 * mn * mn + 4 * mn),
            Job::All | Job::Thin => mn * (6 + 4 * mn) + mx,
        }
        .max(1);
        if lwork == -1 {
            report(work, lwmin);
            return 0;
        }
        if lwork < 0 || (lwork as usize) < lwmin {
            return -12;
        }
        let info = svd::store(ju, jv, mu, nu, a, dim(lda), s, u, dim(ldu), vt, dim(ldvt));
        report(work, lwmin);
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn workspace_queries_report_minimum() {
        let k = RustKernels;
        let mut work = [0.0];
        let mut a = [0.0; 9];
        let mut tau = [0.0; 3];
        assert_eq!(k.dgeqrf(3, 3, &mut a, 3, &mut tau, &mut work, -1), 0);
        assert_eq!(work[0], 3.0);
        let mut w = [0.0; 3];
        assert_eq!(k.dsyev(b'V', b'U', 3, &mut a, 3, &mut w, &mut work, -1), 0);
        assert_eq!(work[0], 8.0);
        // too small
        assert_eq!(k.dsyev(b'V', b'U', 3, &mut a, 3, &mut w, &mut work, 1), -8);
    }

    #[test]
    fn illegal_arguments() {
        let k = RustKernels;
        let mut a = [0.0; 4];
        let mut w = [0.0; 2];
        let mut work = [0.0; 16];
        assert_eq!(k.dsyev(b'X', b'U', 2, &mut a, 2, &mut w, &mut work, 16), -1);
        assert_eq!(k.dsyev(b'n', b'x', 2, &mut a, 2, &mut w, &mut work, 16), -2);
        assert_eq!(k.dsyev(b'n', b'l', 2, &mut a, 1, &mut w, &mut work, 16), -5);
        let mut ipiv = [0; 2];
        assert_eq!(k.dgetrf(2, 2, &mut a, 1, &mut ipiv), -4);
    }

    #[test]
    fn syevr_selects_by_index() {
        let k = RustKernels;
        // diag(3, 1, 2)
        let mut a = [3., 0., 0., 0., 1., 0., 0., 0., 2.];
        let (mut m, mut w, mut z) = (0, [0.; 3], [0.; 9]);
        let mut isuppz = [0; 6];
        let (mut work, mut iwork) = ([0.; 78], [0; 30]);
        let info = k.dsyevr(
            b'V', b'I', b'U', 3, &mut a, 3, 0., 0., 2, 3, 0., &mut m, &mut w, &mut z, 3, &mut isuppz, &mut work,
            78, &mut iwork, 30,
        );
        assert_eq!(info, 0);
        assert_eq!(m, 2);
        assert_eq!(&w[..2], &[2., 3.]);
        // eigenvector of 2 is ±e3
        assert_eq!(&isuppz[..2], &[3, 3]);
    }

    #[test]
    fn gesv_solves() {
        let k = RustKernels;
        let mut a = [2., 1., 1., 3.];
        let mut b = [3., 5.];
        let mut ipiv = [0; 2];
        assert_eq!(k.dgesv(2, 1, &mut a, 2, &mut ipiv, &mut b, 2), 0);
        assert!((b[0] - 0.8).abs() < 1e-12 && (b[1] - 1.4).abs() < 1e-12);
    }
}
