// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Eigenvalue solvers.
//!
//! Symmetric matrices use cyclic Jacobi rotations. General matrices are
//! reduced to Hessenberg form by orthogonal similarity transformations and
//! then to real Schur form by the shifted double QR step; eigenvectors
//! are found by back substitution.

use super::lu;
use super::mat::Mat;

const MAX_SWEEPS: usize = 100;

/// Eigenvalues in ascending order and the matching orthonormal
/// eigenvectors of the symmetric matrix `a`.
///
/// **Errors** with the number of off-diagonal elements that did not
/// converge.
pub(super) fn symmetric(mut a: Mat) -> Result<(Vec<f64>, Mat), i32> {
    let n = a.rows;
    let mut v = Mat::identity(n);
    let frob = a.data.iter().map(|x| x * x).sum::<f64>().sqrt();
    let tol = f64::EPSILON * frob;
    let mut converged = n <= 1 || frob == 0.0;
    for _ in 0..MAX_SWEEPS {
        if converged {
            break;
        }
        for p in 0..n {
            for q in p + 1..n {
                let apq = a[(p, q)];
                if apq == 0.0 {
                    continue;
                }
                let theta = (a[(q, q)] - a[(p, p)]) / (2.0 * apq);
                let t = theta.signum() / (theta.abs() + theta.hypot(1.0));
                let c = 1.0 / t.hypot(1.0);
                let s = t * c;
                a.rotate_cols(p, q, c, s);
                for k in 0..n {
                    let (xp, xq) = (a[(p, k)], a[(q, k)]);
                    a[(p, k)] = c * xp - s * xq;
                    a[(q, k)] = s * xp + c * xq;
                }
                a[(p, q)] = 0.0;
                a[(q, p)] = 0.0;
                v.rotate_cols(p, q, c, s);
            }
        }
        converged = off_diagonal(&a) <= tol;
    }
    if !converged {
        let count = (0..n)
            .flat_map(|j| (0..n).map(move |i| (i, j)))
            .filter(|&(i, j)| i < j && a[(i, j)].abs() > tol)
            .count();
        return Err(count.max(1) as i32);
    }
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[(i, i)].total_cmp(&a[(j, j)]));
    let w = order.iter().map(|&i| a[(i, i)]).collect();
    let mut sorted = Mat::zeros(n, n);
    for (dst, &src) in order.iter().enumerate() {
        sorted.col_mut(dst).copy_from_slice(v.col(src));
    }
    Ok((w, sorted))
}

fn off_diagonal(a: &Mat) -> f64 {
    let mut sum = 0.0;
    for j in 0..a.cols {
        for i in 0..a.rows {
            if i != j {
                sum += a[(i, j)] * a[(i, j)];
            }
        }
    }
    sum.sqrt()
}

/// Eigenvalues and eigenvectors of a general real matrix.
pub(super) struct General {
    pub wr: Vec<f64>,
    pub wi: Vec<f64>,
    /// Right eigenvectors; a complex pair `wi[j] > 0` is stored as
    /// `v[:, j] ± i v[:, j + 1]`.
    pub v: Mat,
}

/// **Errors** with the 1-based index of the eigenvalue on which the QR
/// iteration failed.
pub(super) fn general(a: Mat) -> Result<General, i32> {
    let n = a.rows;
    let mut h = a;
    let mut v = Mat::identity(n);
    let mut d = vec![0.0; n];
    let mut e = vec![0.0; n];
    if n > 0 {
        orthes(&mut h, &mut v);
        hqr2(&mut h, &mut v, &mut d, &mut e)?;
    }
    Ok(General { wr: d, wi: e, v })
}

/// Reduce `h` to upper Hessenberg form, accumulating the transformation
/// in `v`.
fn orthes(h: &mut Mat, v: &mut Mat) {
    let n = h.rows;
    let high = n - 1;
    let mut ort = vec![0.0; n];
    for m in 1..high {
        let scale: f64 = (m..=high).map(|i| h[(i, m - 1)].abs()).sum();
        if scale == 0.0 {
            continue;
        }
        let mut hh = 0.0;
        for i in (m..=high).rev() {
            ort[i] = h[(i, m - 1)] / scale;
            hh += ort[i] * ort[i];
        }
        let mut g = hh.sqrt();
        if ort[m] > 0.0 {
            g = -g;
        }
        hh -= ort[m] * g;
        ort[m] -= g;
        // H = (I - u uᵀ / h) H (I - u uᵀ / h)
        for j in m..n {
            let f = (m..=high).rev().map(|i| ort[i] * h[(i, j)]).sum::<f64>() / hh;
            for i in m..=high {
                h[(i, j)] -= f * ort[i];
            }
        }
        for i in 0..=high {
            let f = (m..=high).rev().map(|j| ort[j] * h[(i, j)]).sum::<f64>() / hh;
            for j in m..=high {
                h[(i, j)] -= f * ort[j];
            }
        }
        ort[m] *= scale;
        h[(m, m - 1)] = scale * g;
    }
    for m in (1..high).rev() {
        if h[(m, m - 1)] == 0.0 {
            continue;
        }
        for i in m + 1..=high {
            ort[i] = h[(i, m - 1)];
        }
        for j in m..=high {
            let g: f64 = (m..=high).map(|i| ort[i] * v[(i, j)]).sum();
            // double division avoids underflow
            let g = (g / ort[m]) / h[(m, m - 1)];
            for i in m..=high {
                v[(i, j)] += g * ort[i];
            }
        }
    }
}

/// Complex division `(xr + i xi) / (yr + i yi)`.
fn cdiv(xr: f64, xi: f64, yr: f64, yi: f64) -> (f64, f64) {
    if yr.abs() > yi.abs() {
        let r = yi / yr;
        let d = yr + r * yi;
        ((xr + r * xi) / d, (xi - r * xr) / d)
    } else {
        let r = yr / yi;
        let d = yi + r * yr;
        ((r * xr + xi) / d, (r * xi - xr) / d)
    }
}

/// Reduce the Hessenberg matrix `h` to real Schur form and compute the
/// eigenvectors.
#[allow(clippy::many_single_char_names)]
fn hqr2(h: &mut Mat, v: &mut Mat, d: &mut [f64], e: &mut [f64]) -> Result<(), i32> {
    let nn = h.rows;
    let max_iter = 30 * nn.max(10);
    let eps = f64::EPSILON;
    let mut exshift = 0.0;
    let (mut p, mut q, mut r, mut s, mut z) = (0.0f64, 0.0f64, 0.0f64, 0.0f64, 0.0f64);
    let (mut t, mut w, mut x, mut y);

    let mut norm = 0.0;
    for i in 0..nn {
        for j in i.saturating_sub(1)..nn {
            norm += h[(i, j)].abs();
        }
    }

    // n is the active block's last row; it goes below zero when done
    let mut n = nn as isize - 1;
    let mut iter = 0;
    while n >= 0 {
        let nu = n as usize;
        // look for a single small subdiagonal element
        let mut l = nu;
        while l > 0 {
            s = h[(l - 1, l - 1)].abs() + h[(l, l)].abs();
            if s == 0.0 {
                s = norm;
            }
            if h[(l, l - 1)].abs() < eps * s {
                break;
            }
            l -= 1;
        }

        if l == nu {
            // one root
            h[(nu, nu)] += exshift;
            d[nu] = h[(nu, nu)];
            e[nu] = 0.0;
            n -= 1;
            iter = 0;
        } else if l + 1 == nu {
            // two roots
            w = h[(nu, nu - 1)] * h[(nu - 1, nu)];
            p = (h[(nu - 1, nu - 1)] - h[(nu, nu)]) / 2.0;
            q = p * p + w;
            z = q.abs().sqrt();
            h[(nu, nu)] += exshift;
            h[(nu - 1, nu - 1)] += exshift;
            x = h[(nu, nu)];

            if q >= 0.0 {
                // real pair
                z = if p >= 0.0 { p + z } else { p - z };
                d[nu - 1] = x + z;
                d[nu] = d[nu - 1];
                if z != 0.0 {
                    d[nu] = x - w / z;
                }
                e[nu - 1] = 0.0;
                e[nu] = 0.0;
                x = h[(nu, nu - 1)];
                s = x.abs() + z.abs();
                p = x / s;
                q = z / s;
                r = (p * p + q * q).sqrt();
                p /= r;
                q /= r;
                for j in nu - 1..nn {
                    z = h[(nu - 1, j)];
                    h[(nu - 1, j)] = q * z + p * h[(nu, j)];
                    h[(nu, j)] = q * h[(nu, j)] - p * z;
                }
                for i in 0..=nu {
                    z = h[(i, nu - 1)];
                    h[(i, nu - 1)] = q * z + p * h[(i, nu)];
                    h[(i, nu)] = q * h[(i, nu)] - p * z;
                }
                for i in 0..nn {
                    z = v[(i, nu - 1)];
                    v[(i, nu - 1)] = q * z + p * v[(i, nu)];
                    v[(i, nu)] = q * v[(i, nu)] - p * z;
                }
            } else {
                // complex pair
                d[nu - 1] = x + p;
                d[nu] = x + p;
                e[nu - 1] = z;
                e[nu] = -z;
            }
            n -= 2;
            iter = 0;
        } else {
            // form shift
            x = h[(nu, nu)];
            y = h[(nu - 1, nu - 1)];
            w = h[(nu, nu - 1)] * h[(nu - 1, nu)];

            // Wilkinson's ad hoc shift
            if iter == 10 {
                exshift += x;
                for i in 0..=nu {
                    h[(i, i)] -= x;
                }
                s = h[(nu, nu - 1)].abs() + h[(nu - 1, nu - 2)].abs();
                x = 0.75 * s;
                y = x;
                w = -0.4375 * s * s;
            }

            if iter == 30 {
                s = (y - x) / 2.0;
                s = s * s + w;
                if s > 0.0 {
                    s = s.sqrt();
                    if y < x {
                        s = -s;
                    }
                    s = x - w / ((y - x) / 2.0 + s);
                    for i in 0..=nu {
                        h[(i, i)] -= s;
                    }
                    exshift += s;
                    x = 0.964;
                    y = x;
                    w = x;
                }
            }

            iter += 1;
            if iter > max_iter {
                return Err(n as i32 + 1);
            }

            // look for two consecutive small subdiagonal elements
            let mut m = nu - 2;
            loop {
                z = h[(m, m)];
                r = x - z;
                s = y - z;
                p = (r * s - w) / h[(m + 1, m)] + h[(m, m + 1)];
                q = h[(m + 1, m + 1)] - z - r - s;
                r = h[(m + 2, m + 1)];
                s = p.abs() + q.abs() + r.abs();
                p /= s;
                q /= s;
                r /= s;
                if m == l {
                    break;
                }
                if h[(m, m - 1)].abs() * (q.abs() + r.abs())
                    < eps * (p.abs() * (h[(m - 1, m - 1)].abs() + z.abs() + h[(m + 1, m + 1)].abs()))
                {
                    break;
                }
                m -= 1;
            }

            for i in m + 2..=nu {
                h[(i, i - 2)] = 0.0;
                if i > m + 2 {
                    h[(i, i - 3)] = 0.0;
                }
            }

            // double QR step on rows l..=n and columns m..=n
            for k in m..nu {
                let notlast = k != nu - 1;
                if k != m {
                    p = h[(k, k - 1)];
                    q = h[(k + 1, k - 1)];
                    r = if notlast { h[(k + 2, k - 1)] } else { 0.0 };
                    x = p.abs() + q.abs() + r.abs();
                    if x == 0.0 {
                        continue;
                    }
                    p /= x;
                    q /= x;
                    r /= x;
                }
                s = (p * p + q * q + r * r).sqrt();
                if p < 0.0 {
                    s = -s;
                }
                if s != 0.0 {
                    if k != m {
                        h[(k, k - 1)] = -s * x;
                    } else if l != m {
                        h[(k, k - 1)] = -h[(k, k - 1)];
                    }
                    p += s;
                    x = p / s;
                    y = q / s;
                    z = r / s;
                    q /= p;
                    r /= p;

                    for j in k..nn {
                        p = h[(k, j)] + q * h[(k + 1, j)];
                        if notlast {
                            p += r * h[(k + 2, j)];
                            h[(k + 2, j)] -= p * z;
                        }
                        h[(k, j)] -= p * x;
                        h[(k + 1, j)] -= p * y;
                    }
                    for i in 0..=nu.min(k + 3) {
                        p = x * h[(i, k)] + y * h[(i, k + 1)];
                        if notlast {
                            p += z * h[(i, k + 2)];
                            h[(i, k + 2)] -= p * r;
                        }
                        h[(i, k)] -= p;
                        h[(i, k + 1)] -= p * q;
                    }
                    for i in 0..nn {
                        p = x * v[(i, k)] + y * v[(i, k + 1)];
                        if notlast {
                            p += z * v[(i, k + 2)];
                            v[(i, k + 2)] -= p * r;
                        }
                        v[(i, k)] -= p;
                        v[(i, k + 1)] -= p * q;
                    }
                }
            }
        }
    }

    if norm == 0.0 {
        return Ok(());
    }

    // back substitute to find the vectors of the upper triangular form
    for nu in (0..nn).rev() {
        p = d[nu];
        q = e[nu];
        if q == 0.0 {
            let mut l = nu;
            h[(nu, nu)] = 1.0;
            for i in (0..nu).rev() {
                w = h[(i, i)] - p;
                r = (l..=nu).map(|j| h[(i, j)] * h[(j, nu)]).sum();
                if e[i] < 0.0 {
                    z = w;
                    s = r;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        h[(i, nu)] = if w != 0.0 { -r / w } else { -r / (eps * norm) };
                    } else {
                        // solve real equations
                        x = h[(i, i + 1)];
                        y = h[(i + 1, i)];
                        q = (d[i] - p) * (d[i] - p) + e[i] * e[i];
                        t = (x * s - z * r) / q;
                        h[(i, nu)] = t;
                        h[(i + 1, nu)] = if x.abs() > z.abs() {
                            (-r - w * t) / x
                        } else {
                            (-s - y * t) / z
                        };
                    }
                    // overflow control
                    t = h[(i, nu)].abs();
                    if (eps * t) * t > 1.0 {
                        for j in i..=nu {
                            h[(j, nu)] /= t;
                        }
                    }
                }
            }
        } else if q < 0.0 {
            let mut l = nu - 1;
            // last vector component imaginary so the matrix is triangular
            if h[(nu, nu - 1)].abs() > h[(nu - 1, nu)].abs() {
                h[(nu - 1, nu - 1)] = q / h[(nu, nu - 1)];
                h[(nu - 1, nu)] = -(h[(nu, nu)] - p) / h[(nu, nu - 1)];
            } else {
                let (cr, ci) = cdiv(0.0, -h[(nu - 1, nu)], h[(nu - 1, nu - 1)] - p, q);
                h[(nu - 1, nu - 1)] = cr;
                h[(nu - 1, nu)] = ci;
            }
            h[(nu, nu - 1)] = 0.0;
            h[(nu, nu)] = 1.0;
            for i in (0..nu.saturating_sub(1)).rev() {
                let ra: f64 = (l..=nu).map(|j| h[(i, j)] * h[(j, nu - 1)]).sum();
                let sa: f64 = (l..=nu).map(|j| h[(i, j)] * h[(j, nu)]).sum();
                w = h[(i, i)] - p;
                if e[i] < 0.0 {
                    z = w;
                    r = ra;
                    s = sa;
                } else {
                    l = i;
                    if e[i] == 0.0 {
                        let (cr, ci) = cdiv(-ra, -sa, w, q);
                        h[(i, nu - 1)] = cr;
                        h[(i, nu)] = ci;
                    } else {
                        // solve complex equations
                        x = h[(i, i + 1)];
                        y = h[(i + 1, i)];
                        let mut vr = (d[i] - p) * (d[i] - p) + e[i] * e[i] - q * q;
                        let vi = (d[i] - p) * 2.0 * q;
                        if vr == 0.0 && vi == 0.0 {
                            vr = eps * norm * (w.abs() + q.abs() + x.abs() + y.abs() + z.abs());
                        }
                        let (cr, ci) = cdiv(x * r - z * ra + q * sa, x * s - z * sa - q * ra, vr, vi);
                        h[(i, nu - 1)] = cr;
                        h[(i, nu)] = ci;
                        if x.abs() > z.abs() + q.abs() {
                            h[(i + 1, nu - 1)] = (-ra - w * h[(i, nu - 1)] + q * h[(i, nu)]) / x;
                            h[(i + 1, nu)] = (-sa - w * h[(i, nu)] - q * h[(i, nu - 1)]) / x;
                        } else {
                            let (cr, ci) = cdiv(-r - y * h[(i, nu - 1)], -s - y * h[(i, nu)], z, q);
                            h[(i + 1, nu - 1)] = cr;
                            h[(i + 1, nu)] = ci;
                        }
                    }
                    t = h[(i, nu - 1)].abs().max(h[(i, nu)].abs());
                    if (eps * t) * t > 1.0 {
                        for j in i..=nu {
                            h[(j, nu - 1)] /= t;
                            h[(j, nu)] /= t;
                        }
                    }
                }
            }
        }
    }

    // back transformation to the eigenvectors of the original matrix
    for j in (0..nn).rev() {
        for i in 0..nn {
            z = (0..=j).map(|k| v[(i, k)] * h[(k, j)]).sum();
            v[(i, j)] = z;
        }
    }
    Ok(())
}

/// Scale each eigenvector to unit norm with its largest component real,
/// pairing columns `j, j + 1` where `wi[j] > 0`.
pub(super) fn normalize_vectors(v: &mut Mat, wi: &[f64]) {
    let n = v.cols;
    let mut j = 0;
    while j < n {
        if wi[j] == 0.0 || j + 1 == n {
            let norm = v.col(j).iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                v.col_mut(j).iter_mut().for_each(|x| *x /= norm);
            }
            j += 1;
            continue;
        }
        let (mut norm, mut k, mut best) = (0.0, 0, -1.0);
        for i in 0..v.rows {
            let m = v[(i, j)] * v[(i, j)] + v[(i, j + 1)] * v[(i, j + 1)];
            norm += m;
            if m > best {
                best = m;
                k = i;
            }
        }
        if norm > 0.0 {
            let norm = norm.sqrt();
            let modulus = best.sqrt();
            // multiply by conj(z_k) / |z_k| / norm
            let (cr, ci) = (v[(k, j)] / modulus / norm, -v[(k, j + 1)] / modulus / norm);
            for i in 0..v.rows {
                let (re, im) = (v[(i, j)], v[(i, j + 1)]);
                v[(i, j)] = re * cr - im * ci;
                v[(i, j + 1)] = re * ci + im * cr;
            }
            v[(k, j + 1)] = 0.0;
        }
        j += 2;
    }
}

/// Left eigenvectors from the right ones: the rows of `V⁻¹`.
///
/// **Errors** if `v` is singular, which happens for defective matrices.
pub(super) fn left_vectors(v: &Mat) -> Result<Mat, i32> {
    let n = v.rows;
    let mut lu_factors = v.data.clone();
    let mut ipiv = vec![0; n];
    let info = lu::getrf(n, n, &mut lu_factors, n.max(1), &mut ipiv);
    if info != 0 {
        return Err(info);
    }
    let mut inv = Mat::identity(n);
    lu::getrs(n, n, &lu_factors, n.max(1), &ipiv, &mut inv.data, n.max(1));
    Ok(inv.transpose())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_ascending() {
        let a = Mat {
            rows: 2,
            cols: 2,
            data: vec![2., 1., 1., 2.],
        };
        let (w, v) = symmetric(a).unwrap();
        assert!((w[0] - 1.).abs() < 1e-12 && (w[1] - 3.).abs() < 1e-12);
        // A v = w v
        let r = 2. * v[(0, 1)] + v[(1, 1)];
        assert!((r - 3. * v[(0, 1)]).abs() < 1e-12);
    }

    #[test]
    fn general_complex_pair() {
        // rotation by 90 degrees: eigenvalues ±i
        let a = Mat {
            rows: 2,
            cols: 2,
            data: vec![0., 1., -1., 0.],
        };
        let g = general(a).unwrap();
        assert!(g.wr.iter().all(|x| x.abs() < 1e-12));
        assert!((g.wi[0] - 1.).abs() < 1e-12 && (g.wi[1] + 1.).abs() < 1e-12);
    }

    #[test]
    fn general_triangular() {
        let a = Mat {
            rows: 3,
            cols: 3,
            data: vec![1., 0., 0., 2., 3., 0., 4., 5., 6.],
        };
        let g = general(a).unwrap();
        let mut wr = g.wr.clone();
        wr.sort_by(f64::total_cmp);
        for (x, e) in wr.iter().zip(&[1., 3., 6.]) {
            assert!((x - e).abs() < 1e-10);
        }
        assert!(g.wi.iter().all(|&x| x == 0.));
    }
}
