// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! LU factorization with partial pivoting and the solvers built on it.

use super::blas::idamax;

/// Factor the `m × n` matrix `a` as `P * L * U`.
///
/// Returns 0, or `i + 1` if `U(i, i)` is exactly zero; the factorization
/// is completed in that case. `ipiv` is 1-based.
pub(super) fn getrf(m: usize, n: usize, a: &mut [f64], lda: usize, ipiv: &mut [i32]) -> i32 {
    let mut info = 0;
    for j in 0..m.min(n) {
        let p = j + idamax(m - j, &a[j * lda + j..j * lda + m], 1);
        ipiv[j] = (p + 1) as i32;
        if a[p + j * lda] != 0.0 {
            if p != j {
                for col in 0..n {
                    a.swap(j + col * lda, p + col * lda);
                }
            }
            let r = 1.0 / a[j + j * lda];
            for i in j + 1..m {
                a[i + j * lda] *= r;
            }
        } else if info == 0 {
            info = (j + 1) as i32;
        }
        // rank-one update of the trailing submatrix
        for col in j + 1..n {
            let t = a[j + col * lda];
            if t != 0.0 {
                for i in j + 1..m {
                    a[i + col * lda] -= a[i + j * lda] * t;
                }
            }
        }
    }
    info
}

/// Solve `A * X = B` with the factors from [`getrf`]; `b` is overwritten.
pub(super) fn getrs(n: usize, nrhs: usize, a: &[f64], lda: usize, ipiv: &[i32], b: &mut [f64], ldb: usize) {
    for col in 0..nrhs {
        let x = &mut b[col * ldb..col * ldb + n];
        for (i, &p) in ipiv.iter().enumerate().take(n) {
            let p = (p - 1) as usize;
            if p != i {
                x.swap(i, p);
            }
        }
        // L y = P b
        for j in 0..n {
            let t = x[j];
            if t != 0.0 {
                for i in j + 1..n {
                    x[i] -= t * a[i + j * lda];
                }
            }
        }
        // U x = y
        for j in (0..n).rev() {
            if x[j] != 0.0 {
                x[j] /= a[j + j * lda];
                let t = x[j];
                for i in 0..j {
                    x[i] -= t * a[i + j * lda];
                }
            }
        }
    }
}

/// Replace the factors in `a` by the inverse of the original matrix.
///
/// Returns `i + 1` if `U(i, i)` is zero, leaving `a` untouched.
pub(super) fn getri(n: usize, a: &mut [f64], lda: usize, ipiv: &[i32]) -> i32 {
    if let Some(i) = (0..n).find(|&i| a[i + i * lda] == 0.0) {
        return (i + 1) as i32;
    }
    let mut inv = vec![0.0; n * n];
    for i in 0..n {
        inv[i + i * n] = 1.0;
    }
    getrs(n, n, a, lda, ipiv, &mut inv, n);
    for j in 0..n {
        a[j * lda..j * lda + n].copy_from_slice(&inv[j * n..(j + 1) * n]);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col_major(rows: &[&[f64]]) -> Vec<f64> {
        let (m, n) = (rows.len(), rows[0].len());
        let mut out = vec![0.; m * n];
        for (i, row) in rows.iter().enumerate() {
            for (j, &x) in row.iter().enumerate() {
                out[i + j * m] = x;
            }
        }
        out
    }

    #[test]
    fn getrf_pivots() {
        let mut a = col_major(&[
            &[1.80, 2.88, 2.05, -0.89],
            &[5.25, -2.95, -0.95, -3.80],
            &[1.58, -2.69, -2.90, -1.04],
            &[-1.11, -0.66, -0.59, 0.80],
        ]);
        let mut ipiv = [0; 4];
        assert_eq!(getrf(4, 4, &mut a, 4, &mut ipiv), 0);
        assert_eq!(ipiv, [2, 2, 3, 4]);
        assert!((a[0] - 5.25).abs() < 1e-12);
    }

    #[test]
    fn getrf_reports_zero_pivot() {
        let mut a = vec![1., 2., 2., 4.];
        let mut ipiv = [0; 2];
        assert_eq!(getrf(2, 2, &mut a, 2, &mut ipiv), 2);
    }

    #[test]
    fn inverse_of_small_matrix() {
        // [[4, 7], [2, 6]]⁻¹ = [[0.6, -0.7], [-0.2, 0.4]]
        let mut a = vec![4., 2., 7., 6.];
        let mut ipiv = [0; 2];
        assert_eq!(getrf(2, 2, &mut a, 2, &mut ipiv), 0);
        assert_eq!(getri(2, &mut a, 2, &ipiv), 0);
        let expected = [0.6, -0.2, -0.7, 0.4];
        for (x, e) in a.iter().zip(&expected) {
            assert!((x - e).abs() < 1e-12);
        }
    }
}
