// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use log::trace;

use super::{generic, ArrayRoutines, Op, VECTOR_REQUIRED};
use crate::backend::quiet_native;
use crate::error::{check_argument, ArrayError};
use crate::kernel::Blas;
use crate::DoubleArray;

/// Array routines that call a BLAS kernel for operands with a BLAS
/// compatible layout.
///
/// Eligibility is decided for each call from the current shape and
/// strides of the operands (see [`Array::blas_vector`](crate::Array::blas_vector)
/// and [`Array::blas_matrix`](crate::Array::blas_matrix)). Level 1 and 2
/// operations with an ineligible operand run the generic algorithm;
/// [`gemm`](ArrayRoutines::gemm) instead copies such operands into packed
/// temporaries and always calls the kernel.
pub struct BlasArrayRoutines<K> {
    kernel: K,
}

impl<K> BlasArrayRoutines<K> {
    pub fn new(kernel: K) -> Self {
        BlasArrayRoutines { kernel }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

impl<K: fmt::Debug> fmt::Debug for BlasArrayRoutines<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlasArrayRoutines")
            .field("kernel", &self.kernel)
            .finish()
    }
}

/// The part of the buffer starting at `offset`; empty past its end.
#[inline]
fn from(data: &[f64], offset: usize) -> &[f64] {
    data.get(offset..).unwrap_or(&[])
}

#[inline]
fn from_mut(data: &mut [f64], offset: usize) -> &mut [f64] {
    data.get_mut(offset..).unwrap_or(&mut [])
}

#[inline]
fn fallback(op: &str) {
    trace!("{}: operand layout not supported by the kernel, using generic path", op);
}

#[inline]
fn native(op: &str, n: usize) {
    if !quiet_native() {
        trace!("{}: native call, n = {}", op, n);
    }
}

impl<K> ArrayRoutines for BlasArrayRoutines<K>
where
    K: Blas + Send + Sync + fmt::Debug,
{
    fn dot(&self, a: &DoubleArray, b: &DoubleArray) -> Result<f64, ArrayError> {
        generic::check_vectors(a, b)?;
        match (a.blas_vector(), b.blas_vector()) {
            (Some(la), Some(lb)) => {
                native("dot", la.len);
                let (da, db) = (a.data(), b.data());
                Ok(self
                    .kernel
                    .ddot(la.len as i32, from(&da, la.offset), la.inc, from(&db, lb.offset), lb.inc))
            }
            _ => {
                fallback("dot");
                generic::dot(a, b)
            }
        }
    }

    fn norm2(&self, a: &DoubleArray) -> Result<f64, ArrayError> {
        check_argument(a.is_vector(), VECTOR_REQUIRED)?;
        match a.blas_vector() {
            Some(l) => {
                native("norm2", l.len);
                Ok(self.kernel.dnrm2(l.len as i32, from(&a.data(), l.offset), l.inc))
            }
            None => {
                fallback("norm2");
                generic::norm2(a)
            }
        }
    }

    fn asum(&self, a: &DoubleArray) -> Result<f64, ArrayError> {
        check_argument(a.is_vector(), VECTOR_REQUIRED)?;
        match a.blas_vector() {
            Some(l) => {
                native("asum", l.len);
                Ok(self.kernel.dasum(l.len as i32, from(&a.data(), l.offset), l.inc))
            }
            None => {
                fallback("asum");
                generic::asum(a)
            }
        }
    }

    fn iamax(&self, a: &DoubleArray) -> Result<usize, ArrayError> {
        check_argument(a.is_vector(), VECTOR_REQUIRED)?;
        match a.blas_vector() {
            Some(l) => {
                native("iamax", l.len);
                Ok(self.kernel.idamax(l.len as i32, from(&a.data(), l.offset), l.inc))
            }
            None => {
                fallback("iamax");
                generic::iamax(a)
            }
        }
    }

    fn scal(&self, alpha: f64, a: &DoubleArray) -> Result<(), ArrayError> {
        check_argument(a.is_vector(), VECTOR_REQUIRED)?;
        a.ensure_writable()?;
        if alpha == 1.0 {
            return Ok(());
        }
        match a.blas_vector() {
            Some(l) => {
                native("scal", l.len);
                let mut data = a.data_mut()?;
                self.kernel
                    .dscal(l.len as i32, alpha, from_mut(&mut data, l.offset), l.inc);
                Ok(())
            }
            None => {
                fallback("scal");
                generic::scal(alpha, a)
            }
        }
    }

    fn axpy(&self, alpha: f64, x: &DoubleArray, y: &DoubleArray) -> Result<(), ArrayError> {
        generic::check_vectors(x, y)?;
        y.ensure_writable()?;
        if alpha == 0.0 {
            return Ok(());
        }
        match (x.blas_vector(), y.blas_vector()) {
            (Some(lx), Some(ly)) if !x.shares_buffer(y) => {
                native("axpy", lx.len);
                let xd = x.data();
                let mut yd = y.data_mut()?;
                self.kernel.daxpy(
                    lx.len as i32,
                    alpha,
                    from(&xd, lx.offset),
                    lx.inc,
                    from_mut(&mut yd, ly.offset),
                    ly.inc,
                );
                Ok(())
            }
            (Some(_), Some(ly)) => {
                trace!("axpy: x shares the buffer of y, copying x");
                let xs = x.to_vec();
                let mut yd = y.data_mut()?;
                self.kernel
                    .daxpy(ly.len as i32, alpha, &xs, 1, from_mut(&mut yd, ly.offset), ly.inc);
                Ok(())
            }
            _ => {
                fallback("axpy");
                generic::axpy(alpha, x, y)
            }
        }
    }

    fn gemv(
        &self,
        trans: Op,
        alpha: f64,
        a: &DoubleArray,
        x: &DoubleArray,
        beta: f64,
        y: &DoubleArray,
    ) -> Result<(), ArrayError> {
        let (m, n) = generic::check_gemv(trans, a, x, y)?;
        y.ensure_writable()?;
        let (la, lx, ly) = match (a.blas_matrix(), x.blas_vector(), y.blas_vector()) {
            (Some(la), Some(lx), Some(ly)) => (la, lx, ly),
            _ => {
                fallback("gemv");
                return generic::gemv(trans, alpha, a, x, beta, y);
            }
        };
        native("gemv", m * n);
        // inputs sharing the buffer of y are read from snapshots
        let (a_shared, x_shared) = (a.shares_buffer(y), x.shares_buffer(y));
        let a_snap = if a_shared { a.to_vec() } else { Vec::new() };
        let x_snap = if x_shared { x.to_vec() } else { Vec::new() };
        let ad = (!a_shared).then(|| a.data());
        let xd = (!x_shared).then(|| x.data());
        let (a_slice, lda) = match ad {
            Some(ref d) => (from(d, la.offset), la.ld),
            None => (&a_snap[..], m.max(1) as i32),
        };
        let (x_slice, incx) = match xd {
            Some(ref d) => (from(d, lx.offset), lx.inc),
            None => (&x_snap[..], 1),
        };
        let mut yd = y.data_mut()?;
        self.kernel.dgemv(
            trans,
            m as i32,
            n as i32,
            alpha,
            a_slice,
            lda,
            x_slice,
            incx,
            beta,
            from_mut(&mut yd, ly.offset),
            ly.inc,
        );
        Ok(())
    }

    fn ger(&self, alpha: f64, x: &DoubleArray, y: &DoubleArray, a: &DoubleArray) -> Result<(), ArrayError> {
        generic::check_ger(x, y, a)?;
        a.ensure_writable()?;
        let (la, lx, ly) = match (a.blas_matrix(), x.blas_vector(), y.blas_vector()) {
            (Some(la), Some(lx), Some(ly)) => (la, lx, ly),
            _ => {
                fallback("ger");
                return generic::ger(alpha, x, y, a);
            }
        };
        native("ger", la.rows * la.cols);
        // the kernel reads x and y from packed snapshots when they live in
        // the buffer of a
        let (xs, incx) = if x.shares_buffer(a) { (x.to_vec(), 1) } else { (Vec::new(), lx.inc) };
        let (ys, incy) = if y.shares_buffer(a) { (y.to_vec(), 1) } else { (Vec::new(), ly.inc) };
        let xd = (!x.shares_buffer(a)).then(|| x.data());
        let yd = (!y.shares_buffer(a)).then(|| y.data());
        let x_slice = match xd {
            Some(ref d) => from(d, lx.offset),
            None => &xs[..],
        };
        let y_slice = match yd {
            Some(ref d) => from(d, ly.offset),
            None => &ys[..],
        };
        let mut ad = a.data_mut()?;
        self.kernel.dger(
            la.rows as i32,
            la.cols as i32,
            alpha,
            x_slice,
            incx,
            y_slice,
            incy,
            from_mut(&mut ad, la.offset),
            la.ld,
        );
        Ok(())
    }

    fn gemm(
        &self,
        transa: Op,
        transb: Op,
        alpha: f64,
        a: &DoubleArray,
        b: &DoubleArray,
        beta: f64,
        c: &DoubleArray,
    ) -> Result<(), ArrayError> {
        let (m, n, k) = generic::check_gemm(transa, transb, a, b, c)?;
        c.ensure_writable()?;
        // operands without a kernel layout, or living in the buffer of c,
        // are packed first
        let packed = |x: &DoubleArray, name: &str| {
            if x.blas_matrix().is_none() || x.shares_buffer(c) {
                trace!("gemm: copying {} into a packed temporary", name);
                Some(x.copy())
            } else {
                None
            }
        };
        let a_tmp = packed(a, "a");
        let b_tmp = packed(b, "b");
        let a = a_tmp.as_ref().unwrap_or(a);
        let b = b_tmp.as_ref().unwrap_or(b);
        let c_tmp = if c.blas_matrix().is_none() {
            trace!("gemm: copying c into a packed temporary");
            Some(c.copy())
        } else {
            None
        };
        let target = c_tmp.as_ref().unwrap_or(c);
        let (la, lb, lc) = match (a.blas_matrix(), b.blas_matrix(), target.blas_matrix()) {
            (Some(la), Some(lb), Some(lc)) => (la, lb, lc),
            _ => {
                // packed copies always have a kernel layout
                fallback("gemm");
                return generic::gemm(transa, transb, alpha, a, b, beta, c);
            }
        };
        native("gemm", m * n * k);
        {
            let (ad, bd) = (a.data(), b.data());
            let mut cd = target.data_mut()?;
            self.kernel.dgemm(
                transa,
                transb,
                m as i32,
                n as i32,
                k as i32,
                alpha,
                from(&ad, la.offset),
                la.ld,
                from(&bd, lb.offset),
                lb.ld,
                beta,
                from_mut(&mut cd, lc.offset),
                lc.ld,
            );
        }
        if let Some(tmp) = c_tmp {
            trace!("gemm: writing the packed result back to c");
            c.assign(&tmp)?;
        }
        Ok(())
    }

    fn copy(&self, from_array: &DoubleArray, to: &DoubleArray) -> Result<(), ArrayError> {
        to.ensure_writable()?;
        match (from_array.blas_vector(), to.blas_vector()) {
            (Some(lf), Some(lt)) if lf.len == lt.len && !from_array.shares_buffer(to) => {
                native("copy", lf.len);
                let src = from_array.data();
                let mut dst = to.data_mut()?;
                self.kernel.dcopy(
                    lf.len as i32,
                    from(&src, lf.offset),
                    lf.inc,
                    from_mut(&mut dst, lt.offset),
                    lt.inc,
                );
                Ok(())
            }
            _ => generic::copy(from_array, to),
        }
    }
}
