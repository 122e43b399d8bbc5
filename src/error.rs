// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::error::Error;
use std::fmt;

/// An error produced by an array operation or a routine.
///
/// Every variant is fatal to the call that produced it; no operation in
/// this crate retries or recovers from an error internally.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayError {
    /// A precondition on an argument was violated (wrong dimensionality,
    /// wrong size, invalid flag character, ...).
    IllegalArgument(String),
    /// A multi-index was outside of the shape of the array.
    IndexOutOfBounds {
        /// The offending index
        index: Vec<usize>,
        /// The shape of the array
        shape: Vec<usize>,
    },
    /// The operation is not supported by this array, e.g. mutating an
    /// immutable range.
    Unsupported(&'static str),
    /// The shapes of the operands of a linear algebra operation do not
    /// agree.
    NonConformant(String),
    /// A native linear algebra routine reported a non-zero `info` code.
    Lapack(LapackError),
}

/// Error kind of an [`ArrayError`], without its payload.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// see [`ArrayError::IllegalArgument`]
    IllegalArgument,
    /// see [`ArrayError::IndexOutOfBounds`]
    IndexOutOfBounds,
    /// see [`ArrayError::Unsupported`]
    Unsupported,
    /// see [`ArrayError::NonConformant`]
    NonConformant,
    /// see [`ArrayError::Lapack`]
    Lapack,
}

impl ArrayError {
    /// Return the `ErrorKind` of this error.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        match *self {
            ArrayError::IllegalArgument(_) => ErrorKind::IllegalArgument,
            ArrayError::IndexOutOfBounds { .. } => ErrorKind::IndexOutOfBounds,
            ArrayError::Unsupported(_) => ErrorKind::Unsupported,
            ArrayError::NonConformant(_) => ErrorKind::NonConformant,
            ArrayError::Lapack(_) => ErrorKind::Lapack,
        }
    }
}

impl Error for ArrayError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ArrayError::Lapack(ref e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ArrayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ArrayError::IllegalArgument(ref msg) => write!(f, "illegal argument: {}", msg),
            ArrayError::IndexOutOfBounds { ref index, ref shape } => {
                write!(f, "index {:?} is out of bounds for shape {:?}", index, shape)
            }
            ArrayError::Unsupported(msg) => write!(f, "unsupported operation: {}", msg),
            ArrayError::NonConformant(ref msg) => write!(f, "non-conformant arrays: {}", msg),
            ArrayError::Lapack(ref e) => e.fmt(f),
        }
    }
}

impl From<LapackError> for ArrayError {
    fn from(e: LapackError) -> Self {
        ArrayError::Lapack(e)
    }
}

/// A non-zero `info` status reported by a LAPACK routine.
///
/// A negative code `-i` means that the `i`-th argument had an illegal
/// value, which is always an internal error of the caller. A positive code
/// is a routine specific numerical failure (non-convergence, singular
/// factor, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LapackError {
    info: i32,
    message: String,
}

impl LapackError {
    pub(crate) fn new(info: i32, message: impl Into<String>) -> LapackError {
        LapackError {
            info,
            message: message.into(),
        }
    }

    /// The `info` code reported by the routine.
    pub fn info(&self) -> i32 {
        self.info
    }

    /// A short description of the failure.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True if the routine rejected one of its arguments.
    pub fn is_invalid_argument(&self) -> bool {
        self.info < 0
    }

    /// True if the routine failed for numerical reasons.
    pub fn is_numerical_failure(&self) -> bool {
        self.info > 0
    }
}

impl Error for LapackError {}

impl fmt::Display for LapackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LAPACK error (info = {}): {}", self.info, self.message)
    }
}

/// Construct an `IllegalArgument` error from a message.
#[inline]
pub(crate) fn illegal_argument(msg: impl Into<String>) -> ArrayError {
    ArrayError::IllegalArgument(msg.into())
}

/// Return an `IllegalArgument` error with `msg` unless `cond` holds.
#[inline]
pub(crate) fn check_argument(cond: bool, msg: &str) -> Result<(), ArrayError> {
    if cond {
        Ok(())
    } else {
        Err(illegal_argument(msg))
    }
}

/// Error for a character flag outside of its allowed set.
pub(crate) fn invalid_character(parameter: &str, c: char, allowed: &[char]) -> ArrayError {
    ArrayError::IllegalArgument(format!("{} {} not in {:?}.", parameter, c, allowed))
}

/// Error for two arrays that must have the same size.
pub(crate) fn size_mismatch(a: &[usize], b: &[usize]) -> ArrayError {
    ArrayError::IllegalArgument(format!("size mismatch: {:?} and {:?}", a, b))
}
