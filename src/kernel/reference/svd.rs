// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Singular value decomposition by one-sided Jacobi rotations.

use super::mat::Mat;

const MAX_SWEEPS: usize = 75;

/// Thin decomposition `A = U * diag(s) * Vᵀ` with `k = min(m, n)`
/// descending singular values; `u` is `m × k` and `v` is `n × k`, both
/// with orthonormal columns.
pub(super) struct Thin {
    pub s: Vec<f64>,
    pub u: Mat,
    pub v: Mat,
}

/// **Errors** if the rotations do not converge.
pub(super) fn thin(a: &Mat) -> Result<Thin, i32> {
    if a.rows >= a.cols {
        tall(a.clone())
    } else {
        // Aᵀ = U' S V'ᵀ gives A = V' S U'ᵀ
        let t = tall(a.transpose())?;
        Ok(Thin {
            s: t.s,
            u: t.v,
            v: t.u,
        })
    }
}

/// Hestenes' method for `m >= n`: rotate column pairs of `A` until they
/// are mutually orthogonal.
fn tall(mut u: Mat) -> Result<Thin, i32> {
    let (m, n) = (u.rows, u.cols);
    let mut v = Mat::identity(n);
    // columns below this squared norm are numerically zero
    let floor = {
        let frob2: f64 = u.data.iter().map(|x| x * x).sum();
        f64::EPSILON * f64::EPSILON * frob2
    };
    let mut converged = n <= 1;
    let mut sweeps = 0;
    while !converged {
        if sweeps == MAX_SWEEPS {
            return Err(1);
        }
        sweeps += 1;
        converged = true;
        for p in 0..n {
            for q in p + 1..n {
                let (mut alpha, mut beta, mut gamma) = (0.0, 0.0, 0.0);
                for i in 0..m {
                    let (up, uq) = (u[(i, p)], u[(i, q)]);
                    alpha += up * up;
                    beta += uq * uq;
                    gamma += up * uq;
                }
                if gamma == 0.0
                    || alpha.min(beta) <= floor
                    || gamma.abs() <= f64::EPSILON * (alpha * beta).sqrt()
                {
                    continue;
                }
                converged = false;
                let zeta = (beta - alpha) / (2.0 * gamma);
                let t = zeta.signum() / (zeta.abs() + zeta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let s = c * t;
                u.rotate_cols(p, q, c, s);
                v.rotate_cols(p, q, c, s);
            }
        }
    }

    let mut s: Vec<f64> = (0..n)
        .map(|j| u.col(j).iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| s[j].total_cmp(&s[i]));
    let smax = s.iter().cloned().fold(0.0, f64::max);
    let tol = m.max(n) as f64 * f64::EPSILON * smax;

    let mut us = Mat::zeros(m, n);
    let mut vs = Mat::zeros(n, n);
    let mut rank = 0;
    for (dst, &src) in order.iter().enumerate() {
        vs.col_mut(dst).copy_from_slice(v.col(src));
        if s[src] > tol {
            for (o, x) in us.col_mut(dst).iter_mut().zip(u.col(src)) {
                *o = x / s[src];
            }
            rank += 1;
        }
    }
    s = order.iter().map(|&i| s[i]).collect();
    // columns of negligible singular values are replaced by a basis of
    // the orthogonal complement
    if rank < n {
        us = us.complete_basis(rank, n);
    }
    Ok(Thin { s, u: us, v: vs })
}

/// Which part of a factor to compute.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum Job {
    /// All columns.
    All,
    /// The leading `min(m, n)` columns.
    Thin,
    /// The leading `min(m, n)` columns, written over `a`.
    Overwrite,
    None,
}

impl Job {
    pub fn from_flag(flag: u8) -> Option<Job> {
        match flag.to_ascii_uppercase() {
            b'A' => Some(Job::All),
            b'S' => Some(Job::Thin),
            b'O' => Some(Job::Overwrite),
            b'N' => Some(Job::None),
            _ => None,
        }
    }
}

/// Compute the decomposition and store the requested factors, LAPACK
/// style: `u` is `m × m` or `m × k`, `vt` is `n × n` or `k × n`.
#[allow(clippy::too_many_arguments)]
pub(super) fn store(
    jobu: Job,
    jobvt: Job,
    m: usize,
    n: usize,
    a: &mut [f64],
    lda: usize,
    s: &mut [f64],
    u: &mut [f64],
    ldu: usize,
    vt: &mut [f64],
    ldvt: usize,
) -> i32 {
    let k = m.min(n);
    if k == 0 {
        return 0;
    }
    let d = match thin(&Mat::from_slice(a, lda, m, n)) {
        Ok(d) => d,
        Err(info) => return info,
    };
    s[..k].copy_from_slice(&d.s);
    match jobu {
        Job::All => d.u.complete_basis(k, m).write_block(m, m, u, ldu),
        Job::Thin => d.u.write_block(m, k, u, ldu),
        Job::Overwrite => d.u.write_block(m, k, a, lda),
        Job::None => {}
    }
    match jobvt {
        Job::All => d.v.complete_basis(k, n).write_transposed(n, n, vt, ldvt),
        Job::Thin => d.v.write_transposed(k, n, vt, ldvt),
        Job::Overwrite => d.v.write_transposed(k, n, a, lda),
        Job::None => {}
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(d: &Thin, m: usize, n: usize) -> Mat {
        let mut r = Mat::zeros(m, n);
        for (l, s) in d.s.iter().enumerate() {
            for j in 0..n {
                for i in 0..m {
                    r[(i, j)] += d.u[(i, l)] * s * d.v[(j, l)];
                }
            }
        }
        r
    }

    #[test]
    fn wide_matrix() {
        // [[3, 2, 2], [2, 3, -2]] has singular values 5 and 3
        let a = Mat {
            rows: 2,
            cols: 3,
            data: vec![3., 2., 2., 3., 2., -2.],
        };
        let d = thin(&a).unwrap();
        assert!((d.s[0] - 5.).abs() < 1e-12 && (d.s[1] - 3.).abs() < 1e-12);
        let r = reconstruct(&d, 2, 3);
        for (x, y) in r.data.iter().zip(&a.data) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    #[test]
    fn rank_deficient_has_orthonormal_u() {
        let a = Mat {
            rows: 3,
            cols: 2,
            data: vec![1., 1., 1., 2., 2., 2.],
        };
        let d = thin(&a).unwrap();
        assert!(d.s[1].abs() < 1e-12);
        let dot: f64 = d.u.col(0).iter().zip(d.u.col(1)).map(|(a, b)| a * b).sum();
        assert!(dot.abs() < 1e-12);
        let norm: f64 = d.u.col(1).iter().map(|x| x * x).sum();
        assert!((norm - 1.).abs() < 1e-12);
    }

    #[test]
    fn full_factors() {
        let mut a = vec![1., 0., 0., 0., 2., 0.];
        let (mut s, mut u, mut vt) = (vec![0.; 2], vec![0.; 9], vec![0.; 4]);
        assert_eq!(store(Job::All, Job::All, 3, 2, &mut a, 3, &mut s, &mut u, 3, &mut vt, 2), 0);
        assert_eq!(s, vec![2., 1.]);
        // third column of U is ±e3
        assert!((u[8].abs() - 1.).abs() < 1e-12);
    }
}
