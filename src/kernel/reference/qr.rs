// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Householder QR factorization.
//!
//! A reflector is `H = I - tau * v * vᵀ` with `v[0] == 1`; the tail of `v`
//! is stored below the diagonal, as LAPACK does.

use super::blas::dnrm2;

/// Generate the reflector that maps `[alpha; x]` to `[beta; 0]`.
///
/// `x` is overwritten with the tail of `v`; returns `(beta, tau)`.
pub(super) fn householder(alpha: f64, x: &mut [f64]) -> (f64, f64) {
    let xnorm = dnrm2(x.len(), x, 1);
    if xnorm == 0.0 {
        return (alpha, 0.0);
    }
    let norm = alpha.hypot(xnorm);
    let beta = if alpha >= 0.0 { -norm } else { norm };
    let tau = (beta - alpha) / beta;
    let scale = 1.0 / (alpha - beta);
    for v in x.iter_mut() {
        *v *= scale;
    }
    (beta, tau)
}

/// Apply `H` from the left to rows `r0..r0 + v.len()` of columns `cols`.
pub(super) fn apply_left(
    v: &[f64],
    tau: f64,
    c: &mut [f64],
    ldc: usize,
    r0: usize,
    cols: std::ops::Range<usize>,
) {
    if tau == 0.0 {
        return;
    }
    for j in cols {
        let col = &mut c[j * ldc + r0..j * ldc + r0 + v.len()];
        let w: f64 = v.iter().zip(col.iter()).map(|(a, b)| a * b).sum();
        let f = tau * w;
        for (ci, &vi) in col.iter_mut().zip(v) {
            *ci -= f * vi;
        }
    }
}

/// Apply `H` from the right to columns `c0..c0 + v.len()` of rows `rows`.
pub(super) fn apply_right(
    v: &[f64],
    tau: f64,
    c: &mut [f64],
    ldc: usize,
    c0: usize,
    rows: std::ops::Range<usize>,
) {
    if tau == 0.0 {
        return;
    }
    for i in rows {
        let w: f64 = v.iter().enumerate().map(|(l, &vl)| c[i + (c0 + l) * ldc] * vl).sum();
        let f = tau * w;
        for (l, &vl) in v.iter().enumerate() {
            c[i + (c0 + l) * ldc] -= f * vl;
        }
    }
}

/// The `k`-th reflector vector of a factored matrix, `[1; a[k+1.., k]]`.
fn reflector(a: &[f64], lda: usize, nq: usize, k: usize) -> Vec<f64> {
    let mut v = Vec::with_capacity(nq - k);
    v.push(1.0);
    v.extend_from_slice(&a[k * lda + k + 1..k * lda + nq]);
    v
}

/// Factor step `k`: reflect column `k` and update the trailing columns.
fn qr_step(m: usize, n: usize, a: &mut [f64], lda: usize, tau: &mut [f64], k: usize) {
    let start = k * lda + k;
    let alpha = a[start];
    let (beta, t) = householder(alpha, &mut a[start + 1..k * lda + m]);
    tau[k] = t;
    let v = reflector(a, lda, m, k);
    apply_left(&v, t, a, lda, k, k + 1..n);
    a[start] = beta;
}

/// Unblocked QR factorization of the `m × n` matrix `a`.
pub(super) fn geqrf(m: usize, n: usize, a: &mut [f64], lda: usize, tau: &mut [f64]) {
    for k in 0..m.min(n) {
        qr_step(m, n, a, lda, tau, k);
    }
}

/// QR factorization with column pivoting.
///
/// The first `nfixed` columns are factored in place; the rest are
/// pivoted by largest remaining norm. `perm[j]` receives the original
/// index of column `j`, and must hold the initial order on entry.
pub(super) fn geqp3(
    m: usize,
    n: usize,
    a: &mut [f64],
    lda: usize,
    perm: &mut [usize],
    nfixed: usize,
    tau: &mut [f64],
) {
    for k in 0..m.min(n) {
        if k >= nfixed {
            let mut best = k;
            let mut best_norm = -1.0;
            for j in k..n {
                let norm = dnrm2(m - k, &a[j * lda + k..j * lda + m], 1);
                if norm > best_norm {
                    best_norm = norm;
                    best = j;
                }
            }
            if best != k {
                for i in 0..m {
                    a.swap(i + k * lda, i + best * lda);
                }
                perm.swap(k, best);
            }
        }
        qr_step(m, n, a, lda, tau, k);
    }
}

/// Overwrite the `m × n` matrix `c` with `op(Q) * C` or `C * op(Q)`,
/// where `Q = H(0) H(1) ... H(k-1)`.
pub(super) fn ormqr(
    left: bool,
    transpose: bool,
    m: usize,
    n: usize,
    k: usize,
    a: &[f64],
    lda: usize,
    tau: &[f64],
    c: &mut [f64],
    ldc: usize,
) {
    let nq = if left { m } else { n };
    // Q * C and C * Qᵀ apply the reflectors last to first
    let backward = left != transpose;
    let order: Vec<usize> = if backward {
        (0..k).rev().collect()
    } else {
        (0..k).collect()
    };
    for i in order {
        let v = reflector(a, lda, nq, i);
        if left {
            apply_left(&v, tau[i], c, ldc, i, 0..n);
        } else {
            apply_right(&v, tau[i], c, ldc, i, 0..m);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn geqrf_known_factors() {
        let mut a = vec![0., 2., 2., 0., 2., 2., 2., -1., -1., 1.5, -1., -1.];
        let mut tau = [0.; 2];
        geqrf(6, 2, &mut a, 6, &mut tau);
        assert!(close(tau[0], 1.0) && close(tau[1], 1.4), "{:?}", tau);
        let expected = [-4., 0.5, 0.5, 0., 0.5, 0.5, 2., 2.5, 0.286, -0.429, 0.286, 0.286];
        for (x, e) in a.iter().zip(&expected) {
            assert!(close(*x, *e), "{:?}", a);
        }
    }

    #[test]
    fn q_is_orthogonal() {
        let mut a = vec![4., 1., 2., 1., 3., 0., 2., 0., 5.];
        let mut tau = [0.; 3];
        geqrf(3, 3, &mut a, 3, &mut tau);
        // Qᵀ Q = I
        let mut q = vec![1., 0., 0., 0., 1., 0., 0., 0., 1.];
        ormqr(true, false, 3, 3, 3, &a, 3, &tau, &mut q, 3);
        let mut qtq = q.clone();
        ormqr(true, true, 3, 3, 3, &a, 3, &tau, &mut qtq, 3);
        for i in 0..3 {
            for j in 0..3 {
                let e = if i == j { 1. } else { 0. };
                assert!((qtq[i + 3 * j] - e).abs() < 1e-12);
            }
        }
        // Q from the right matches Q from the left
        let mut q2 = vec![1., 0., 0., 0., 1., 0., 0., 0., 1.];
        ormqr(false, false, 3, 3, 3, &a, 3, &tau, &mut q2, 3);
        for (x, y) in q.iter().zip(&q2) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn pivoting_moves_largest_column_first() {
        let mut a = vec![1., 0., 0., 10., 0., 0.];
        let mut perm = [0, 1];
        let mut tau = [0.; 2];
        geqp3(3, 2, &mut a, 3, &mut perm, 0, &mut tau);
        assert_eq!(perm, [1, 0]);
        assert!((a[0].abs() - 10.).abs() < 1e-12);
    }
}
