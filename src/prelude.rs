// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! ndbackend prelude.
//!
//! This module contains the most used types, type aliases, traits and
//! functions that you can import easily as a group.
//!
//! ```
//! use ndbackend::prelude::*;
//!
//! let a = DoubleArray::zeros(&[2, 2]);
//! assert!(a.is_square());
//! ```

#[doc(no_inline)]
pub use crate::{Array, BooleanArray, DoubleArray, IntArray, ObjectArray, Range, Slice};

#[doc(no_inline)]
pub use crate::{ArrayBackend, ArrayFactory, ArrayRoutines, LinearAlgebraRoutines, Op};

#[doc(no_inline)]
pub use crate::{default_backend, ArrayError, ErrorKind};
