// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::fmt;

use log::trace;

use super::workspace::{
    check_info, check_parameters, query_workspace, query_workspaces, Arguments, CONVERGENCE_FAILURE, INTERNAL_ERROR,
};
use super::LinearAlgebraRoutines;
use crate::backend::quiet_native;
use crate::error::{check_argument, illegal_argument, invalid_character, ArrayError};
use crate::kernel::Lapack;
use crate::routines::{Op, MATRIX_REQUIRED};
use crate::{Array, DoubleArray, IntArray};

const JOB: &[char] = &['a', 's', 'o', 'n'];
const JOBZ: &[char] = &['n', 'v'];
const RANGE: &[char] = &['a', 'v', 'i'];
const UPLO: &[char] = &['l', 'u'];
const SIDE: &[char] = &['l', 'r'];

/// LAPACK routines on top of a [`Lapack`] kernel.
///
/// Every routine validates shapes and flags before touching any array.
/// Arguments that are writable dense roots are handed to the kernel in
/// place; all others are copied to packed temporaries and, if the kernel
/// writes them, copied back afterwards.
pub struct LapackRoutines<K> {
    kernel: K,
}

impl<K> LapackRoutines<K> {
    pub fn new(kernel: K) -> Self {
        LapackRoutines { kernel }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

impl<K: fmt::Debug> fmt::Debug for LapackRoutines<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LapackRoutines")
            .field("kernel", &self.kernel)
            .finish()
    }
}

/// Lower-case `c` and check it against `allowed`.
fn flag(parameter: &str, c: char, allowed: &[char]) -> Result<char, ArrayError> {
    let c = c.to_ascii_lowercase();
    if allowed.contains(&c) {
        Ok(c)
    } else {
        Err(invalid_character(parameter, c, allowed))
    }
}

#[inline]
fn byte(c: char) -> u8 {
    c.to_ascii_uppercase() as u8
}

fn trans_byte(op: Op) -> u8 {
    match op {
        Op::Keep => b'N',
        Op::Transpose => b'T',
    }
}

/// A dimension as a kernel argument.
fn dim(n: usize) -> Result<i32, ArrayError> {
    i32::try_from(n).map_err(|_| illegal_argument(format!("dimension {} is too large", n)))
}

/// Leading dimension of a packed matrix with `rows` rows.
fn ld(rows: usize) -> Result<i32, ArrayError> {
    dim(rows.max(1))
}

fn require_square(name: &str, a: &DoubleArray) -> Result<usize, ArrayError> {
    check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
    if a.is_square() {
        Ok(a.rows())
    } else {
        Err(illegal_argument(format!("{} is not square, shape {:?}", name, a.shape())))
    }
}

fn require_vector<T>(name: &str, x: &Array<T>, size: usize) -> Result<(), ArrayError> {
    if x.is_vector() && x.size() == size {
        Ok(())
    } else {
        Err(illegal_argument(format!(
            "Invalid shape for {} ({:?}), expected a vector of size {}",
            name,
            x.shape(),
            size
        )))
    }
}

fn require_shape(name: &str, x: &DoubleArray, rows: usize, cols: usize) -> Result<(), ArrayError> {
    if x.is_matrix() && x.rows() == rows && x.columns() == cols {
        Ok(())
    } else {
        Err(illegal_argument(format!(
            "Invalid shape for {} ({:?}), expected [{}, {}]",
            name,
            x.shape(),
            rows,
            cols
        )))
    }
}

/// Return the array of a job dependent argument, which must be present.
fn required<'a>(name: &str, x: Option<&'a DoubleArray>, job: &str) -> Result<&'a DoubleArray, ArrayError> {
    x.ok_or_else(|| illegal_argument(format!("{} is required when {}", name, job)))
}

fn native(routine: &str, m: usize, n: usize) {
    if !quiet_native() {
        trace!("{}: native call, m = {}, n = {}", routine, m, n);
    }
}

impl<K> LinearAlgebraRoutines for LapackRoutines<K>
where
    K: Lapack + Send + Sync + fmt::Debug,
{
    fn geqrf(&self, a: &DoubleArray, tau: &DoubleArray) -> Result<(), ArrayError> {
        check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n) = (a.rows(), a.columns());
        require_vector("tau", tau, m.min(n))?;
        let (mi, ni, lda) = (dim(m)?, dim(n)?, ld(m)?);

        let mut args = Arguments::new("geqrf");
        let a_op = args.output("a", a)?;
        let tau_op = args.output("tau", tau)?;
        native("geqrf", m, n);
        {
            let mut ad = a_op.write()?;
            let mut td = tau_op.write()?;
            let mut call = |work: &mut [f64], lwork: i32| self.kernel.dgeqrf(mi, ni, &mut ad, lda, &mut td, work, lwork);
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_info(call(&mut work, lwork as i32), INTERNAL_ERROR)?;
        }
        a_op.write_back()?;
        tau_op.write_back()
    }

    fn ormqr(&self, side: char, trans: Op, a: &DoubleArray, tau: &DoubleArray, c: &DoubleArray) -> Result<(), ArrayError> {
        let side = flag("side", side, SIDE)?;
        check_argument(a.is_matrix() && c.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n, k) = (c.rows(), c.columns(), a.columns());
        let nq = if side == 'l' { m } else { n };
        if a.rows() != nq || k > nq {
            return Err(illegal_argument(format!(
                "Invalid shape for a ({:?}), expected {} rows and at most {} columns",
                a.shape(),
                nq,
                nq
            )));
        }
        require_vector("tau", tau, k)?;
        let (mi, ni, ki, lda, ldc) = (dim(m)?, dim(n)?, dim(k)?, ld(nq)?, ld(m)?);

        let mut args = Arguments::new("ormqr");
        let a_op = args.operand("a", a);
        let tau_op = args.operand("tau", tau);
        let c_op = args.output("c", c)?;
        native("ormqr", m, n);
        {
            let ad = a_op.read();
            let td = tau_op.read();
            let mut cd = c_op.write()?;
            let mut call = |work: &mut [f64], lwork: i32| {
                self.kernel
                    .dormqr(byte(side), trans_byte(trans), mi, ni, ki, &ad, lda, &td, &mut cd, ldc, work, lwork)
            };
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_info(call(&mut work, lwork as i32), INTERNAL_ERROR)?;
        }
        c_op.write_back()
    }

    fn syev(&self, jobz: char, uplo: char, a: &DoubleArray, w: &DoubleArray) -> Result<(), ArrayError> {
        let jobz = flag("jobz", jobz, JOBZ)?;
        let uplo = flag("uplo", uplo, UPLO)?;
        let n = require_square("a", a)?;
        require_vector("w", w, n)?;
        let (ni, lda) = (dim(n)?, ld(n)?);

        let mut args = Arguments::new("syev");
        let a_op = args.output("a", a)?;
        let w_op = args.output("w", w)?;
        native("syev", n, n);
        {
            let mut ad = a_op.write()?;
            let mut wd = w_op.write()?;
            let mut call =
                |work: &mut [f64], lwork: i32| self.kernel.dsyev(byte(jobz), byte(uplo), ni, &mut ad, lda, &mut wd, work, lwork);
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_info(call(&mut work, lwork as i32), CONVERGENCE_FAILURE)?;
        }
        a_op.write_back()?;
        w_op.write_back()
    }

    fn syevd(&self, jobz: char, uplo: char, a: &DoubleArray, w: &DoubleArray) -> Result<(), ArrayError> {
        let jobz = flag("jobz", jobz, JOBZ)?;
        let uplo = flag("uplo", uplo, UPLO)?;
        let n = require_square("a", a)?;
        require_vector("w", w, n)?;
        let (ni, lda) = (dim(n)?, ld(n)?);

        let mut args = Arguments::new("syevd");
        let a_op = args.output("a", a)?;
        let w_op = args.output("w", w)?;
        native("syevd", n, n);
        {
            let mut ad = a_op.write()?;
            let mut wd = w_op.write()?;
            let mut call = |work: &mut [f64], lwork: i32, iwork: &mut [i32], liwork: i32| {
                self.kernel
                    .dsyevd(byte(jobz), byte(uplo), ni, &mut ad, lda, &mut wd, work, lwork, iwork, liwork)
            };
            let (lwork, liwork) = query_workspaces(&mut call)?;
            let mut work = vec![0.0; lwork];
            let mut iwork = vec![0; liwork];
            check_info(call(&mut work, lwork as i32, &mut iwork, liwork as i32), CONVERGENCE_FAILURE)?;
        }
        a_op.write_back()?;
        w_op.write_back()
    }

    fn syevr(
        &self,
        jobz: char,
        range: char,
        uplo: char,
        a: &DoubleArray,
        vl: f64,
        vu: f64,
        il: i32,
        iu: i32,
        abstol: f64,
        w: &DoubleArray,
        z: Option<&DoubleArray>,
        isuppz: Option<&IntArray>,
    ) -> Result<usize, ArrayError> {
        let jobz = flag("jobz", jobz, JOBZ)?;
        let range = flag("range", range, RANGE)?;
        let uplo = flag("uplo", uplo, UPLO)?;
        let n = require_square("a", a)?;
        require_vector("w", w, n)?;
        let wanted = match range {
            'i' => {
                let valid = if n == 0 {
                    il == 1 && iu == 0
                } else {
                    1 <= il && il <= iu && iu as usize <= n
                };
                if !valid {
                    return Err(illegal_argument(format!(
                        "il = {} and iu = {} are not a valid index range for n = {}",
                        il, iu, n
                    )));
                }
                (iu - il + 1) as usize
            }
            'v' => {
                if vl >= vu {
                    return Err(illegal_argument(format!("vl = {} must be smaller than vu = {}", vl, vu)));
                }
                n
            }
            _ => n,
        };
        let z = if jobz == 'v' {
            let z = required("z", z, "jobz = 'v'")?;
            if !z.is_matrix() || z.rows() != n || z.columns() < wanted {
                return Err(illegal_argument(format!(
                    "Invalid shape for z ({:?}), expected {} rows and at least {} columns",
                    z.shape(),
                    n,
                    wanted
                )));
            }
            Some(z)
        } else {
            None
        };
        let support = 2 * n.max(1);
        if jobz == 'v' && range == 'a' && isuppz.is_none() {
            return Err(illegal_argument("isuppz is required when jobz = 'v' and range = 'a'"));
        }
        if let Some(isuppz) = isuppz {
            require_vector("isuppz", isuppz, support)?;
        }
        let (ni, lda, ldz) = (dim(n)?, ld(n)?, if z.is_some() { ld(n)? } else { 1 });

        let mut args = Arguments::new("syevr");
        let a_op = args.output("a", a)?;
        let w_op = args.output("w", w)?;
        let z_op = z.map(|z| args.output("z", z)).transpose()?;
        let isuppz_op = isuppz.map(|s| args.output("isuppz", s)).transpose()?;
        let mut found = 0;
        native("syevr", n, n);
        {
            let mut ad = a_op.write()?;
            let mut wd = w_op.write()?;
            let mut zd = z_op.as_ref().map(|op| op.write()).transpose()?;
            let mut sd = isuppz_op.as_ref().map(|op| op.write()).transpose()?;
            let mut scratch = if sd.is_none() { vec![0; support] } else { Vec::new() };
            let mut call = |work: &mut [f64], lwork: i32, iwork: &mut [i32], liwork: i32| {
                self.kernel.dsyevr(
                    byte(jobz),
                    byte(range),
                    byte(uplo),
                    ni,
                    &mut ad,
                    lda,
                    vl,
                    vu,
                    il,
                    iu,
                    abstol,
                    &mut found,
                    &mut wd,
                    zd.as_deref_mut().unwrap_or(&mut []),
                    ldz,
                    sd.as_deref_mut().unwrap_or(&mut scratch),
                    work,
                    lwork,
                    iwork,
                    liwork,
                )
            };
            let (lwork, liwork) = query_workspaces(&mut call)?;
            let mut work = vec![0.0; lwork];
            let mut iwork = vec![0; liwork];
            check_info(call(&mut work, lwork as i32, &mut iwork, liwork as i32), CONVERGENCE_FAILURE)?;
        }
        a_op.write_back()?;
        w_op.write_back()?;
        if let Some(op) = z_op {
            op.write_back()?;
        }
        if let Some(op) = isuppz_op {
            op.write_back()?;
        }
        Ok(found.max(0) as usize)
    }

    fn geev(
        &self,
        jobvl: char,
        jobvr: char,
        a: &DoubleArray,
        wr: &DoubleArray,
        wi: &DoubleArray,
        vl: Option<&DoubleArray>,
        vr: Option<&DoubleArray>,
    ) -> Result<(), ArrayError> {
        let jobvl = flag("jobvl", jobvl, JOBZ)?;
        let jobvr = flag("jobvr", jobvr, JOBZ)?;
        let n = require_square("a", a)?;
        require_vector("wr", wr, n)?;
        require_vector("wi", wi, n)?;
        let vl = if jobvl == 'v' {
            let vl = required("vl", vl, "jobvl = 'v'")?;
            require_shape("vl", vl, n, n)?;
            Some(vl)
        } else {
            None
        };
        let vr = if jobvr == 'v' {
            let vr = required("vr", vr, "jobvr = 'v'")?;
            require_shape("vr", vr, n, n)?;
            Some(vr)
        } else {
            None
        };
        let ni = dim(n)?;
        let lda = ld(n)?;
        let ldvl = if vl.is_some() { lda } else { 1 };
        let ldvr = if vr.is_some() { lda } else { 1 };

        let mut args = Arguments::new("geev");
        let a_op = args.output("a", a)?;
        let wr_op = args.output("wr", wr)?;
        let wi_op = args.output("wi", wi)?;
        let vl_op = vl.map(|v| args.output("vl", v)).transpose()?;
        let vr_op = vr.map(|v| args.output("vr", v)).transpose()?;
        native("geev", n, n);
        {
            let mut ad = a_op.write()?;
            let mut wrd = wr_op.write()?;
            let mut wid = wi_op.write()?;
            let mut vld = vl_op.as_ref().map(|op| op.write()).transpose()?;
            let mut vrd = vr_op.as_ref().map(|op| op.write()).transpose()?;
            let mut call = |work: &mut [f64], lwork: i32| {
                self.kernel.dgeev(
                    byte(jobvl),
                    byte(jobvr),
                    ni,
                    &mut ad,
                    lda,
                    &mut wrd,
                    &mut wid,
                    vld.as_deref_mut().unwrap_or(&mut []),
                    ldvl,
                    vrd.as_deref_mut().unwrap_or(&mut []),
                    ldvr,
                    work,
                    lwork,
                )
            };
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_info(call(&mut work, lwork as i32), CONVERGENCE_FAILURE)?;
        }
        a_op.write_back()?;
        wr_op.write_back()?;
        wi_op.write_back()?;
        if let Some(op) = vl_op {
            op.write_back()?;
        }
        if let Some(op) = vr_op {
            op.write_back()?;
        }
        Ok(())
    }

    fn getrf(&self, a: &DoubleArray, ipiv: &IntArray) -> Result<i32, ArrayError> {
        check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n) = (a.rows(), a.columns());
        require_vector("ipiv", ipiv, m.min(n))?;
        let (mi, ni, lda) = (dim(m)?, dim(n)?, ld(m)?);

        let mut args = Arguments::new("getrf");
        let a_op = args.output("a", a)?;
        let ipiv_op = args.output("ipiv", ipiv)?;
        native("getrf", m, n);
        let info = {
            let mut ad = a_op.write()?;
            let mut pd = ipiv_op.write()?;
            check_parameters(self.kernel.dgetrf(mi, ni, &mut ad, lda, &mut pd))?
        };
        a_op.write_back()?;
        ipiv_op.write_back()?;
        Ok(info)
    }

    fn getri(&self, a: &DoubleArray, ipiv: &IntArray) -> Result<i32, ArrayError> {
        let n = require_square("a", a)?;
        require_vector("ipiv", ipiv, n)?;
        let (ni, lda) = (dim(n)?, ld(n)?);

        let mut args = Arguments::new("getri");
        let a_op = args.output("a", a)?;
        let ipiv_op = args.operand("ipiv", ipiv);
        native("getri", n, n);
        let info = {
            let mut ad = a_op.write()?;
            let pd = ipiv_op.read();
            let mut call = |work: &mut [f64], lwork: i32| self.kernel.dgetri(ni, &mut ad, lda, &pd, work, lwork);
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_parameters(call(&mut work, lwork as i32))?
        };
        a_op.write_back()?;
        Ok(info)
    }

    fn gesv(&self, a: &DoubleArray, ipiv: &IntArray, b: &DoubleArray) -> Result<i32, ArrayError> {
        let n = require_square("a", a)?;
        if b.ndim() > 2 || b.rows() != n {
            return Err(ArrayError::NonConformant(format!(
                "a has size ({},{}), b has shape {:?}",
                n,
                n,
                b.shape()
            )));
        }
        require_vector("ipiv", ipiv, n)?;
        let (ni, nrhs, lda) = (dim(n)?, dim(b.columns())?, ld(n)?);

        let mut args = Arguments::new("gesv");
        let a_op = args.output("a", a)?;
        let ipiv_op = args.output("ipiv", ipiv)?;
        let b_op = args.output("b", b)?;
        native("gesv", n, b.columns());
        let info = {
            let mut ad = a_op.write()?;
            let mut pd = ipiv_op.write()?;
            let mut bd = b_op.write()?;
            check_parameters(self.kernel.dgesv(ni, nrhs, &mut ad, lda, &mut pd, &mut bd, lda))?
        };
        a_op.write_back()?;
        ipiv_op.write_back()?;
        b_op.write_back()?;
        Ok(info)
    }

    fn gelsy(&self, a: &DoubleArray, b: &DoubleArray, jpvt: &IntArray, rcond: f64) -> Result<usize, ArrayError> {
        check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n) = (a.rows(), a.columns());
        if b.ndim() > 2 || b.rows() != m.max(n) {
            return Err(illegal_argument(format!(
                "Invalid shape for b ({:?}), expected {} rows",
                b.shape(),
                m.max(n)
            )));
        }
        require_vector("jpvt", jpvt, n)?;
        let (mi, ni, nrhs, lda, ldb) = (dim(m)?, dim(n)?, dim(b.columns())?, ld(m)?, ld(m.max(n))?);

        let mut args = Arguments::new("gelsy");
        let a_op = args.output("a", a)?;
        let b_op = args.output("b", b)?;
        let jpvt_op = args.output("jpvt", jpvt)?;
        let mut rank = 0;
        native("gelsy", m, n);
        {
            let mut ad = a_op.write()?;
            let mut bd = b_op.write()?;
            let mut jd = jpvt_op.write()?;
            let mut call = |work: &mut [f64], lwork: i32| {
                self.kernel
                    .dgelsy(mi, ni, nrhs, &mut ad, lda, &mut bd, ldb, &mut jd, rcond, &mut rank, work, lwork)
            };
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_info(call(&mut work, lwork as i32), INTERNAL_ERROR)?;
        }
        a_op.write_back()?;
        b_op.write_back()?;
        jpvt_op.write_back()?;
        Ok(rank.max(0) as usize)
    }

    fn gesvd(
        &self,
        jobu: char,
        jobvt: char,
        a: &DoubleArray,
        s: &DoubleArray,
        u: Option<&DoubleArray>,
        vt: Option<&DoubleArray>,
    ) -> Result<(), ArrayError> {
        let jobu = flag("jobu", jobu, JOB)?;
        let jobvt = flag("jobvt", jobvt, JOB)?;
        if jobu == 'o' && jobvt == 'o' {
            return Err(illegal_argument("jobu and jobvt cannot both be 'o'"));
        }
        check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n) = (a.rows(), a.columns());
        let k = m.min(n);
        require_vector("s", s, k)?;
        let u = match jobu {
            'a' | 's' => {
                let u = required("u", u, "jobu is 'a' or 's'")?;
                require_shape("u", u, m, if jobu == 'a' { m } else { k })?;
                Some(u)
            }
            _ => None,
        };
        let vt = match jobvt {
            'a' | 's' => {
                let vt = required("vt", vt, "jobvt is 'a' or 's'")?;
                let rows = if jobvt == 'a' { n } else { k };
                require_shape("vt", vt, rows, n)?;
                Some(vt)
            }
            _ => None,
        };
        let (mi, ni, lda) = (dim(m)?, dim(n)?, ld(m)?);
        let ldu = if u.is_some() { ld(m)? } else { 1 };
        let ldvt = match vt {
            Some(vt) => ld(vt.rows())?,
            None => 1,
        };

        let mut args = Arguments::new("gesvd");
        let a_op = args.output("a", a)?;
        let s_op = args.output("s", s)?;
        let u_op = u.map(|u| args.output("u", u)).transpose()?;
        let vt_op = vt.map(|vt| args.output("vt", vt)).transpose()?;
        native("gesvd", m, n);
        {
            let mut ad = a_op.write()?;
            let mut sd = s_op.write()?;
            let mut ud = u_op.as_ref().map(|op| op.write()).transpose()?;
            let mut vtd = vt_op.as_ref().map(|op| op.write()).transpose()?;
            let mut call = |work: &mut [f64], lwork: i32| {
                self.kernel.dgesvd(
                    byte(jobu),
                    byte(jobvt),
                    mi,
                    ni,
                    &mut ad,
                    lda,
                    &mut sd,
                    ud.as_deref_mut().unwrap_or(&mut []),
                    ldu,
                    vtd.as_deref_mut().unwrap_or(&mut []),
                    ldvt,
                    work,
                    lwork,
                )
            };
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_info(call(&mut work, lwork as i32), CONVERGENCE_FAILURE)?;
        }
        a_op.write_back()?;
        s_op.write_back()?;
        if let Some(op) = u_op {
            op.write_back()?;
        }
        if let Some(op) = vt_op {
            op.write_back()?;
        }
        Ok(())
    }

    fn gesdd(
        &self,
        jobz: char,
        a: &DoubleArray,
        s: &DoubleArray,
        u: Option<&DoubleArray>,
        vt: Option<&DoubleArray>,
    ) -> Result<(), ArrayError> {
        let jobz = flag("jobz", jobz, JOB)?;
        check_argument(a.is_matrix(), MATRIX_REQUIRED)?;
        let (m, n) = (a.rows(), a.columns());
        let k = m.min(n);
        require_vector("s", s, k)?;
        // columns of u and rows of vt, if referenced
        let (ucols, vtrows) = match jobz {
            'a' => (Some(m), Some(n)),
            's' => (Some(k), Some(k)),
            'o' if m >= n => (None, Some(n)),
            'o' => (Some(m), None),
            _ => (None, None),
        };
        let u = match ucols {
            Some(cols) => {
                let u = required("u", u, "jobz references u")?;
                require_shape("u", u, m, cols)?;
                Some(u)
            }
            None => None,
        };
        let vt = match vtrows {
            Some(rows) => {
                let vt = required("vt", vt, "jobz references vt")?;
                require_shape("vt", vt, rows, n)?;
                Some(vt)
            }
            None => None,
        };
        let (mi, ni, lda) = (dim(m)?, dim(n)?, ld(m)?);
        let ldu = if u.is_some() { ld(m)? } else { 1 };
        let ldvt = match vtrows {
            Some(rows) => ld(rows)?,
            None => 1,
        };

        let mut args = Arguments::new("gesdd");
        let a_op = args.output("a", a)?;
        let s_op = args.output("s", s)?;
        let u_op = u.map(|u| args.output("u", u)).transpose()?;
        let vt_op = vt.map(|vt| args.output("vt", vt)).transpose()?;
        native("gesdd", m, n);
        {
            let mut ad = a_op.write()?;
            let mut sd = s_op.write()?;
            let mut ud = u_op.as_ref().map(|op| op.write()).transpose()?;
            let mut vtd = vt_op.as_ref().map(|op| op.write()).transpose()?;
            let mut iwork = vec![0; 8 * k];
            let mut call = |work: &mut [f64], lwork: i32| {
                self.kernel.dgesdd(
                    byte(jobz),
                    mi,
                    ni,
                    &mut ad,
                    lda,
                    &mut sd,
                    ud.as_deref_mut().unwrap_or(&mut []),
                    ldu,
                    vtd.as_deref_mut().unwrap_or(&mut []),
                    ldvt,
                    work,
                    lwork,
                    &mut iwork,
                )
            };
            let lwork = query_workspace(&mut call)?;
            let mut work = vec![0.0; lwork];
            check_info(call(&mut work, lwork as i32), CONVERGENCE_FAILURE)?;
        }
        a_op.write_back()?;
        s_op.write_back()?;
        if let Some(op) = u_op {
            op.write_back()?;
        }
        if let Some(op) = vt_op {
            op.write_back()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::RustKernels;
    use crate::{ErrorKind, Slice};

    fn routines() -> LapackRoutines<RustKernels> {
        LapackRoutines::new(RustKernels)
    }

    #[test]
    fn invalid_flag_names_parameter_and_set() {
        let a = DoubleArray::eye(2);
        let w = DoubleArray::zeros(&[2]);
        let err = routines().syev('x', 'u', &a, &w).unwrap_err();
        assert_eq!(err, illegal_argument("jobz x not in ['n', 'v']."));
    }

    #[test]
    fn flags_are_case_insensitive() {
        let a = DoubleArray::from_rows(&[[2., 1.], [1., 2.]]).unwrap();
        let w = DoubleArray::zeros(&[2]);
        routines().syev('V', 'U', &a, &w).unwrap();
        let w = w.to_vec();
        assert!((w[0] - 1.).abs() < 1e-12 && (w[1] - 3.).abs() < 1e-12);
    }

    #[test]
    fn strided_operands_are_written_back() {
        // the matrix lives in every other column of a larger one
        let big = DoubleArray::zeros(&[2, 4]);
        let a = big.slice(&[Slice::from(..), Slice::new(0, None, 2)]).unwrap();
        a.assign_slice(&[3., 4., 3., 6.]).unwrap();
        let ipiv = IntArray::zeros(&[2]);
        assert_eq!(routines().getrf(&a, &ipiv).unwrap(), 0);
        assert_eq!(ipiv.to_vec(), vec![2, 2]);
        // column 1 of big is untouched
        assert_eq!(big.column(1).unwrap().to_vec(), vec![0., 0.]);
        assert_eq!(a.get(&[0, 0]).unwrap(), 4.);
        assert_eq!(a.get(&[1, 1]).unwrap(), -1.5);
    }

    #[test]
    fn gesv_singular_returns_info() {
        let a = DoubleArray::from_rows(&[[1., 2.], [2., 4.]]).unwrap();
        let b = DoubleArray::from_vec(vec![1., 2.]);
        let ipiv = IntArray::zeros(&[2]);
        assert_eq!(routines().gesv(&a, &ipiv, &b).unwrap(), 2);
    }

    #[test]
    fn gesv_rows_must_agree() {
        let a = DoubleArray::eye(2);
        let b = DoubleArray::zeros(&[3]);
        let ipiv = IntArray::zeros(&[2]);
        let err = routines().gesv(&a, &ipiv, &b).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NonConformant);
    }

    #[test]
    fn gesvd_shape_errors() {
        let a = DoubleArray::zeros(&[3, 2]);
        let s = DoubleArray::zeros(&[2]);
        let u = DoubleArray::zeros(&[3, 2]);
        let vt = DoubleArray::zeros(&[2, 2]);
        let err = routines().gesvd('a', 'a', &a, &s, Some(&u), Some(&vt)).unwrap_err();
        assert_eq!(err, illegal_argument("Invalid shape for u ([3, 2]), expected [3, 3]"));
        routines().gesvd('s', 'a', &a, &s, Some(&u), Some(&vt)).unwrap();
    }

    #[test]
    fn syevr_selects_by_value() {
        let a = DoubleArray::from_diag(&DoubleArray::from_vec(vec![3., 1., 2.])).unwrap();
        let w = DoubleArray::zeros(&[3]);
        let z = DoubleArray::zeros(&[3, 3]);
        let found = routines()
            .syevr('v', 'v', 'u', &a, 1.5, 3.5, 0, 0, 0., &w, Some(&z), None)
            .unwrap();
        assert_eq!(found, 2);
        assert_eq!(&w.to_vec()[..2], &[2., 3.]);
    }

    #[test]
    fn syevr_requires_support_for_all() {
        let a = DoubleArray::eye(2);
        let w = DoubleArray::zeros(&[2]);
        let z = DoubleArray::zeros(&[2, 2]);
        assert!(routines()
            .syevr('v', 'a', 'u', &a, 0., 0., 0, 0, 0., &w, Some(&z), None)
            .is_err());
        let isuppz = IntArray::zeros(&[4]);
        assert_eq!(
            routines()
                .syevr('v', 'a', 'u', &a, 0., 0., 0, 0, 0., &w, Some(&z), Some(&isuppz))
                .unwrap(),
            2
        );
    }
}
