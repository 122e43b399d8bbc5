// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! BLAS level 1, 2 and 3 in Rust.
//!
//! Sizes are `usize` here; the trait impl converts and checks. All
//! matrices are column-major with leading dimension `ld`.

use crate::routines::Op;

/// Number of elements a strided vector of `n` elements spans.
#[inline]
pub(crate) fn vec_span(n: usize, inc: usize) -> usize {
    if n == 0 {
        0
    } else {
        (n - 1) * inc + 1
    }
}

/// Number of elements a column-major `m × n` matrix spans.
#[inline]
pub(crate) fn mat_span(m: usize, n: usize, ld: usize) -> usize {
    if m == 0 || n == 0 {
        0
    } else {
        (n - 1) * ld + m
    }
}

pub(crate) fn ddot(n: usize, x: &[f64], incx: usize, y: &[f64], incy: usize) -> f64 {
    if incx == 1 && incy == 1 {
        return x[..n].iter().zip(&y[..n]).map(|(a, b)| a * b).sum();
    }
    (0..n).map(|i| x[i * incx] * y[i * incy]).sum()
}

/// Euclidean norm with scaling against overflow.
pub(crate) fn dnrm2(n: usize, x: &[f64], incx: usize) -> f64 {
    let mut scale = 0.0f64;
    let mut ssq = 1.0f64;
    for i in 0..n {
        let v = x[i * incx];
        if v != 0.0 {
            let absxi = v.abs();
            if scale < absxi {
                ssq = 1.0 + ssq * (scale / absxi) * (scale / absxi);
                scale = absxi;
            } else {
                ssq += (absxi / scale) * (absxi / scale);
            }
        }
    }
    scale * ssq.sqrt()
}

pub(crate) fn dasum(n: usize, x: &[f64], incx: usize) -> f64 {
    (0..n).map(|i| x[i * incx].abs()).sum()
}

pub(crate) fn idamax(n: usize, x: &[f64], incx: usize) -> usize {
    let mut best = 0;
    let mut max = f64::NEG_INFINITY;
    for i in 0..n {
        let v = x[i * incx].abs();
        if v > max {
            max = v;
            best = i;
        }
    }
    best
}

pub(crate) fn dscal(n: usize, alpha: f64, x: &mut [f64], incx: usize) {
    for i in 0..n {
        x[i * incx] *= alpha;
    }
}

pub(crate) fn daxpy(n: usize, alpha: f64, x: &[f64], incx: usize, y: &mut [f64], incy: usize) {
    if alpha == 0.0 {
        return;
    }
    for i in 0..n {
        y[i * incy] += alpha * x[i * incx];
    }
}

pub(crate) fn dcopy(n: usize, x: &[f64], incx: usize, y: &mut [f64], incy: usize) {
    if incx == 1 && incy == 1 {
        y[..n].copy_from_slice(&x[..n]);
        return;
    }
    for i in 0..n {
        y[i * incy] = x[i * incx];
    }
}

pub(crate) fn dgemv(
    trans: Op,
    m: usize,
    n: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    x: &[f64],
    incx: usize,
    beta: f64,
    y: &mut [f64],
    incy: usize,
) {
    let (leny, lenx) = match trans {
        Op::Keep => (m, n),
        Op::Transpose => (n, m),
    };
    if beta == 0.0 {
        for i in 0..leny {
            y[i * incy] = 0.0;
        }
    } else if beta != 1.0 {
        dscal(leny, beta, y, incy);
    }
    if alpha == 0.0 {
        return;
    }
    match trans {
        Op::Keep => {
            // y += alpha * A * x, one column at a time
            for j in 0..lenx {
                let temp = alpha * x[j * incx];
                if temp != 0.0 {
                    let col = &a[j * lda..j * lda + m];
                    for (i, &aij) in col.iter().enumerate() {
                        y[i * incy] += temp * aij;
                    }
                }
            }
        }
        Op::Transpose => {
            for j in 0..leny {
                let col = &a[j * lda..j * lda + m];
                let temp: f64 = col.iter().enumerate().map(|(i, &aij)| aij * x[i * incx]).sum();
                y[j * incy] += alpha * temp;
            }
        }
    }
}

pub(crate) fn dger(
    m: usize,
    n: usize,
    alpha: f64,
    x: &[f64],
    incx: usize,
    y: &[f64],
    incy: usize,
    a: &mut [f64],
    lda: usize,
) {
    if alpha == 0.0 {
        return;
    }
    for j in 0..n {
        let temp = alpha * y[j * incy];
        if temp != 0.0 {
            for i in 0..m {
                a[i + j * lda] += x[i * incx] * temp;
            }
        }
    }
}

/// `C ← alpha * op(A) * op(B) + beta * C`; slices must cover the spans of
/// their matrices.
pub(crate) fn dgemm(
    transa: Op,
    transb: Op,
    m: usize,
    n: usize,
    k: usize,
    alpha: f64,
    a: &[f64],
    lda: usize,
    b: &[f64],
    ldb: usize,
    beta: f64,
    c: &mut [f64],
    ldc: usize,
) {
    let (rsa, csa, a_rows, a_cols) = match transa {
        Op::Keep => (1, lda, m, k),
        Op::Transpose => (lda, 1, k, m),
    };
    let (rsb, csb, b_rows, b_cols) = match transb {
        Op::Keep => (1, ldb, k, n),
        Op::Transpose => (ldb, 1, n, k),
    };
    assert!(a.len() >= mat_span(a_rows, a_cols, lda), "dgemm: a too short");
    assert!(b.len() >= mat_span(b_rows, b_cols, ldb), "dgemm: b too short");
    assert!(c.len() >= mat_span(m, n, ldc), "dgemm: c too short");
    if m == 0 || n == 0 {
        return;
    }
    // matrixmultiply reads nothing when k == 0 and only scales C
    unsafe {
        matrixmultiply::dgemm(
            m,
            k,
            n,
            alpha,
            a.as_ptr(),
            rsa as isize,
            csa as isize,
            b.as_ptr(),
            rsb as isize,
            csb as isize,
            beta,
            c.as_mut_ptr(),
            1,
            ldc as isize,
        );
    }
}
