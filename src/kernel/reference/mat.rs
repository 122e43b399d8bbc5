// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::ops::{Index, IndexMut};

/// A dense, column-major working matrix.
#[derive(Clone, Debug, PartialEq)]
pub(super) struct Mat {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl Mat {
    pub fn zeros(rows: usize, cols: usize) -> Mat {
        Mat {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn identity(n: usize) -> Mat {
        let mut m = Mat::zeros(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// Copy the `rows × cols` matrix stored in `a` with leading dimension
    /// `lda`.
    pub fn from_slice(a: &[f64], lda: usize, rows: usize, cols: usize) -> Mat {
        let mut m = Mat::zeros(rows, cols);
        for j in 0..cols {
            m.data[j * rows..(j + 1) * rows].copy_from_slice(&a[j * lda..j * lda + rows]);
        }
        m
    }

    /// The full symmetric matrix stored in one triangle of `a`.
    pub fn symmetric(a: &[f64], lda: usize, n: usize, upper: bool) -> Mat {
        let mut m = Mat::zeros(n, n);
        for j in 0..n {
            for i in 0..n {
                let (r, c) = if (i <= j) == upper { (i, j) } else { (j, i) };
                m[(i, j)] = a[r + c * lda];
            }
        }
        m
    }

    /// Write the leading `rows × cols` block to `a` with leading dimension
    /// `lda`.
    pub fn write_block(&self, rows: usize, cols: usize, a: &mut [f64], lda: usize) {
        for j in 0..cols {
            a[j * lda..j * lda + rows].copy_from_slice(&self.data[j * self.rows..j * self.rows + rows]);
        }
    }

    /// Write the transpose of the leading `cols × rows` block, i.e. a
    /// `rows × cols` matrix, to `a`.
    pub fn write_transposed(&self, rows: usize, cols: usize, a: &mut [f64], lda: usize) {
        for j in 0..cols {
            for i in 0..rows {
                a[i + j * lda] = self[(j, i)];
            }
        }
    }

    pub fn transpose(&self) -> Mat {
        let mut t = Mat::zeros(self.cols, self.rows);
        for j in 0..self.cols {
            for i in 0..self.rows {
                t[(j, i)] = self[(i, j)];
            }
        }
        t
    }

    pub fn col(&self, j: usize) -> &[f64] {
        &self.data[j * self.rows..(j + 1) * self.rows]
    }

    pub fn col_mut(&mut self, j: usize) -> &mut [f64] {
        &mut self.data[j * self.rows..(j + 1) * self.rows]
    }

    pub fn swap_cols(&mut self, a: usize, b: usize) {
        if a != b {
            for i in 0..self.rows {
                self.data.swap(i + a * self.rows, i + b * self.rows);
            }
        }
    }

    /// Apply the plane rotation `(c, s)` to columns `p` and `q`:
    /// `p ← c p - s q`, `q ← s p + c q`.
    pub fn rotate_cols(&mut self, p: usize, q: usize, c: f64, s: f64) {
        for i in 0..self.rows {
            let (xp, xq) = (self[(i, p)], self[(i, q)]);
            self[(i, p)] = c * xp - s * xq;
            self[(i, q)] = s * xp + c * xq;
        }
    }

    /// Extend the orthonormal columns `0..have` to `cols` orthonormal
    /// columns, replacing columns `have..` and adding columns as needed.
    pub fn complete_basis(&self, have: usize, cols: usize) -> Mat {
        let mut out = Mat::zeros(self.rows, cols);
        let keep = have.min(cols);
        out.data[..keep * self.rows].copy_from_slice(&self.data[..keep * self.rows]);
        for j in keep..cols {
            let mut best = Vec::new();
            let mut best_norm = -1.0;
            for k in 0..self.rows {
                let mut e = vec![0.0; self.rows];
                e[k] = 1.0;
                // twice is enough
                for _ in 0..2 {
                    for l in 0..j {
                        let q = out.col(l);
                        let d: f64 = q.iter().zip(&e).map(|(a, b)| a * b).sum();
                        for (ei, qi) in e.iter_mut().zip(q) {
                            *ei -= d * qi;
                        }
                    }
                }
                let norm = e.iter().map(|x| x * x).sum::<f64>().sqrt();
                if norm > best_norm {
                    best_norm = norm;
                    best = e;
                }
            }
            if best_norm > 0.0 {
                for (o, b) in out.col_mut(j).iter_mut().zip(&best) {
                    *o = b / best_norm;
                }
            }
        }
        out
    }
}

impl Index<(usize, usize)> for Mat {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i + j * self.rows]
    }
}

impl IndexMut<(usize, usize)> for Mat {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i + j * self.rows]
    }
}

#[cfg(test)]
mod tests {
    use super::Mat;

    #[test]
    fn symmetric_from_either_triangle() {
        // lower triangle holds 1, 2, 3 and garbage above
        let a = [1., 2., 9., 3.];
        let lower = Mat::symmetric(&a, 2, 2, false);
        assert_eq!(lower.data, vec![1., 2., 2., 3.]);
        let upper = Mat::symmetric(&a, 2, 2, true);
        assert_eq!(upper.data, vec![1., 9., 9., 3.]);
    }

    #[test]
    fn completes_to_orthonormal_basis() {
        let mut q = Mat::zeros(3, 1);
        q[(0, 0)] = 0.6;
        q[(1, 0)] = 0.8;
        let full = q.complete_basis(1, 3);
        for i in 0..3 {
            for j in 0..3 {
                let d: f64 = full.col(i).iter().zip(full.col(j)).map(|(a, b)| a * b).sum();
                let e = if i == j { 1. } else { 0. };
                assert!((d - e).abs() < 1e-12);
            }
        }
    }
}
