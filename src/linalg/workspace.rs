// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Argument handling shared by the LAPACK routines: packing array
//! arguments for the kernel, workspace queries and `info` codes.

use log::trace;

use crate::data_repr::{ArrayData, ArrayDataMut};
use crate::error::{ArrayError, LapackError};
use crate::Array;

pub(crate) const INTERNAL_ERROR: &str = "Internal error.";
pub(crate) const CONVERGENCE_FAILURE: &str = "Convergence failure";
pub(crate) const SINGULAR_MATRIX: &str = "Singular matrix";

/// An array argument of one LAPACK call: the caller's array when its
/// buffer can be handed to the kernel as it is, a packed copy otherwise.
pub(crate) struct Operand<'a, T> {
    array: &'a Array<T>,
    copy: Option<Array<T>>,
}

impl<'a, T: Clone> Operand<'a, T> {
    fn target(&self) -> &Array<T> {
        self.copy.as_ref().unwrap_or(self.array)
    }

    pub fn read(&self) -> ArrayData<'_, T> {
        self.target().data()
    }

    pub fn write(&self) -> Result<ArrayDataMut<'_, T>, ArrayError> {
        self.target().data_mut()
    }

    /// Copy the kernel's output into the caller's array, if the kernel
    /// worked on a copy.
    pub fn write_back(self) -> Result<(), ArrayError> {
        match self.copy {
            Some(copy) => self.array.assign(&copy),
            None => Ok(()),
        }
    }
}

/// Decides for the arguments of one call whether they are used in place.
///
/// An argument is used in place only if it is a writable dense root and no
/// earlier argument of the same call holds its buffer.
pub(crate) struct Arguments {
    routine: &'static str,
    held: Vec<usize>,
}

impl Arguments {
    pub fn new(routine: &'static str) -> Self {
        Arguments {
            routine,
            held: Vec::new(),
        }
    }

    pub fn operand<'a, T: Clone>(&mut self, name: &str, array: &'a Array<T>) -> Operand<'a, T> {
        let addr = array.data.addr();
        let in_place = array.is_dense_root() && !self.held.contains(&addr);
        self.held.push(addr);
        let copy = if in_place {
            None
        } else {
            trace!("{}: copying {} to a packed temporary", self.routine, name);
            Some(array.copy())
        };
        Operand { array, copy }
    }

    /// Like [`operand`](Self::operand) for an argument the kernel writes.
    /// A read-only array is rejected here, before any kernel call.
    pub fn output<'a, T: Clone>(&mut self, name: &str, array: &'a Array<T>) -> Result<Operand<'a, T>, ArrayError> {
        array.ensure_writable()?;
        Ok(self.operand(name, array))
    }
}

/// Fail on any non-zero `info`, with `failure` as the message of a
/// positive code.
pub(crate) fn check_info(info: i32, failure: &str) -> Result<(), ArrayError> {
    match info {
        0 => Ok(()),
        i if i < 0 => Err(LapackError::new(i, INTERNAL_ERROR).into()),
        i => Err(LapackError::new(i, failure).into()),
    }
}

/// Fail on a negative `info` only and return it otherwise.
pub(crate) fn check_parameters(info: i32) -> Result<i32, ArrayError> {
    if info < 0 {
        Err(LapackError::new(info, INTERNAL_ERROR).into())
    } else {
        Ok(info)
    }
}

/// Run `call` as a workspace query and return the reported size of the
/// floating point workspace.
///
/// `call` receives the workspace and `lwork`; it is the same closure that
/// later performs the real call.
pub(crate) fn query_workspace<F>(call: &mut F) -> Result<usize, ArrayError>
where
    F: FnMut(&mut [f64], i32) -> i32,
{
    let mut work = [0.0];
    check_info(call(&mut work, -1), INTERNAL_ERROR)?;
    Ok(size_of(work[0]))
}

/// Like [`query_workspace`] for routines that also take an integer
/// workspace; returns `(lwork, liwork)`.
pub(crate) fn query_workspaces<F>(call: &mut F) -> Result<(usize, usize), ArrayError>
where
    F: FnMut(&mut [f64], i32, &mut [i32], i32) -> i32,
{
    let mut work = [0.0];
    let mut iwork = [0];
    check_info(call(&mut work, -1, &mut iwork, -1), INTERNAL_ERROR)?;
    Ok((size_of(work[0]), iwork[0].max(1) as usize))
}

fn size_of(reported: f64) -> usize {
    // LAPACK reports the size as a float
    (reported.max(1.0) as usize).min(i32::MAX as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DoubleArray, ErrorKind};

    #[test]
    fn second_handle_to_a_buffer_is_copied() {
        let a = DoubleArray::zeros(&[2, 2]);
        let mut args = Arguments::new("test");
        let first = args.operand("a", &a);
        let second = args.operand("b", &a);
        assert!(first.copy.is_none());
        assert!(second.copy.is_some());
    }

    #[test]
    fn views_are_copied_and_written_back() {
        let a = DoubleArray::zeros(&[2, 2]);
        let col = a.column(1).unwrap();
        let mut args = Arguments::new("test");
        let op = args.operand("col", &col);
        op.write().unwrap()[1] = 5.;
        op.write_back().unwrap();
        assert_eq!(a.to_vec(), vec![0., 0., 0., 5.]);
    }

    #[test]
    fn read_only_output_is_rejected() {
        let r = crate::Range::exclusive(0, 2).unwrap();
        let mut args = Arguments::new("test");
        assert!(args.operand("r", r.as_array()).copy.is_some());
        let err = args.output("r", r.as_array()).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }

    #[test]
    fn info_codes() {
        assert!(check_info(0, CONVERGENCE_FAILURE).is_ok());
        let e = check_info(-3, CONVERGENCE_FAILURE).unwrap_err();
        assert_eq!(e, ArrayError::Lapack(LapackError::new(-3, INTERNAL_ERROR)));
        let e = check_info(2, CONVERGENCE_FAILURE).unwrap_err();
        assert_eq!(e.kind(), ErrorKind::Lapack);
        assert_eq!(check_parameters(2).unwrap(), 2);
        assert!(check_parameters(-1).is_err());
    }

    #[test]
    fn query_reports_at_least_one() {
        let mut call = |work: &mut [f64], lwork: i32| {
            assert_eq!(lwork, -1);
            work[0] = 0.;
            0
        };
        assert_eq!(query_workspace(&mut call).unwrap(), 1);
    }
}
