// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Minimum norm least squares through a complete orthogonal
//! factorization.

use super::mat::Mat;
use super::qr;

/// Solve `min ‖A x - b‖` for each column of `b`, choosing the solution of
/// minimum norm among the minimizers of the rank-`r` truncation.
///
/// `A * P = Q * R` is computed with column pivoting; columns with a
/// nonzero `jpvt` entry are moved to the front and not pivoted. The
/// effective rank `r` is the number of leading diagonal elements of `R`
/// with `|R(i, i)| > rcond * |R(0, 0)|`. With `M = R[..r, ..]` the
/// solution is `x = P * Mᵀ (M Mᵀ)⁻¹ * (Qᵀ b)[..r]`, computed from a QR
/// factorization of `Mᵀ`.
///
/// On exit `a` holds the pivoted QR factors, `b[..n]` the solutions and
/// `jpvt` the 1-based column permutation. Returns the rank.
#[allow(clippy::too_many_arguments)]
pub(super) fn gelsy(
    m: usize,
    n: usize,
    nrhs: usize,
    a: &mut [f64],
    lda: usize,
    b: &mut [f64],
    ldb: usize,
    jpvt: &mut [i32],
    rcond: f64,
) -> usize {
    let mn = m.min(n);
    let mut perm: Vec<usize> = (0..n).filter(|&j| jpvt[j] != 0).collect();
    let nfixed = perm.len();
    perm.extend((0..n).filter(|&j| jpvt[j] == 0));

    let original = Mat::from_slice(a, lda, m, n);
    for (dst, &src) in perm.iter().enumerate() {
        a[dst * lda..dst * lda + m].copy_from_slice(original.col(src));
    }
    let mut tau = vec![0.0; mn];
    qr::geqp3(m, n, a, lda, &mut perm, nfixed, &mut tau);
    for (j, &p) in perm.iter().enumerate() {
        jpvt[j] = (p + 1) as i32;
    }

    let r00 = if mn > 0 { a[0].abs() } else { 0.0 };
    let rank = (0..mn)
        .take_while(|&i| r00 > 0.0 && a[i + i * lda].abs() > rcond * r00)
        .count();

    // c = Qᵀ b
    let mut c = Mat::from_slice(b, ldb, m, nrhs);
    qr::ormqr(true, true, m, nrhs, mn, a, lda, &tau, &mut c.data, m.max(1));

    let mut x = Mat::zeros(n, nrhs);
    if rank > 0 {
        // Mᵀ is n × rank
        let mut mt = Mat::zeros(n, rank);
        for i in 0..rank {
            for j in i..n {
                mt[(j, i)] = a[i + j * lda];
            }
        }
        let mut tau2 = vec![0.0; rank];
        qr::geqrf(n, rank, &mut mt.data, n, &mut tau2);
        let mut y = Mat::zeros(n, nrhs);
        for col in 0..nrhs {
            // R2ᵀ z = c[..rank]
            for i in 0..rank {
                let mut acc = c[(i, col)];
                for l in 0..i {
                    acc -= mt[(l, i)] * y[(l, col)];
                }
                y[(i, col)] = acc / mt[(i, i)];
            }
        }
        qr::ormqr(true, false, n, nrhs, rank, &mt.data, n, &tau2, &mut y.data, n);
        for (i, &p) in perm.iter().enumerate() {
            for col in 0..nrhs {
                x[(p, col)] = y[(i, col)];
            }
        }
    }
    x.write_block(n, nrhs, b, ldb);
    rank
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overdetermined_line_fit() {
        // fit y = c0 + c1 t through (0, 1), (1, 3), (2, 5)
        let mut a = vec![1., 1., 1., 0., 1., 2.];
        let mut b = vec![1., 3., 5.];
        let mut jpvt = [0; 2];
        let rank = gelsy(3, 2, 1, &mut a, 3, &mut b, 3, &mut jpvt, 1e-10);
        assert_eq!(rank, 2);
        assert!((b[0] - 1.).abs() < 1e-12 && (b[1] - 2.).abs() < 1e-12);
    }

    #[test]
    fn rank_deficient_minimum_norm() {
        // x0 + x1 = 2 has minimum norm solution (1, 1)
        let mut a = vec![1., 1., 1., 1.];
        let mut b = vec![2., 2.];
        let mut jpvt = [0; 2];
        let rank = gelsy(2, 2, 1, &mut a, 2, &mut b, 2, &mut jpvt, 1e-10);
        assert_eq!(rank, 1);
        assert!((b[0] - 1.).abs() < 1e-12 && (b[1] - 1.).abs() < 1e-12);
    }

    #[test]
    fn underdetermined_writes_all_unknowns() {
        // [1 0 1] x = 2 with ldb = 3
        let mut a = vec![1., 0., 1.];
        let mut b = vec![2., 0., 0.];
        let mut jpvt = [0; 3];
        let rank = gelsy(1, 3, 1, &mut a, 1, &mut b, 3, &mut jpvt, 1e-10);
        assert_eq!(rank, 1);
        for (x, e) in b.iter().zip(&[1., 0., 1.]) {
            assert!((x - e).abs() < 1e-12);
        }
    }
}
