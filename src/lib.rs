// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
#![crate_name = "ndbackend"]
#![doc(html_root_url = "https://docs.rs/ndbackend/0.1/")]
#![allow(
    clippy::many_single_char_names,
    clippy::deref_addrof,
    clippy::unreadable_literal,
    clippy::manual_map, // is not an error
    clippy::while_let_on_iterator, // is not an error
    clippy::too_many_arguments, // LAPACK signatures
)]
#![doc(test(attr(deny(warnings))))]
#![doc(test(attr(allow(unused_variables))))]
#![doc(test(attr(allow(deprecated))))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The `ndbackend` crate provides a strided *n*-dimensional array, [`Array`],
//! together with linear algebra routines that dispatch to a BLAS/LAPACK
//! kernel whenever the memory layout of the operands allows it.
//!
//! - An [`Array`] is a *handle*: a shape, strides and an offset into a
//!   shared backing buffer. Views ([`Array::as_view`], [`Array::row`],
//!   [`Array::transpose`], ...) share the buffer with the array they were
//!   derived from; writing through one handle is visible through all
//!   others. [`Array::copy`] makes an independent, densely packed copy.
//! - Arrays are column-major by default: the first axis varies fastest and
//!   "flat index" means the column-major logical position.
//! - Routines are grouped per backend, see [`backend`]. The
//!   [`ArrayRoutines`] (BLAS level 1-3 and reductions) and
//!   [`LinearAlgebraRoutines`] (LAPACK drivers) of a native backend check
//!   for each call whether the operands can be handed to the kernel as
//!   they are; when they cannot, the operation either runs a generic
//!   element-wise algorithm or copies its operands into dense temporaries
//!   and writes results back.
//!
//! ## Crate Summary and Status
//!
//! - Generic element type `A` for storage, views, copying and sorting;
//!   routines work with `f64` arrays ([`DoubleArray`]).
//! - Two kernels ship with the crate: [`RustKernels`](kernel::RustKernels),
//!   portable reference implementations in Rust, and
//!   `NetlibKernels`, bindings to a system CBLAS/LAPACK.
//! - Mutation goes through `&self`: arrays behave like shared handles, the
//!   buffer is guarded by a lock and no lock is held across calls.
//!
//! ## Crate Feature Flags
//!
//! The following crate feature flags are available. They are configured in
//! your `Cargo.toml`.
//!
//! - `std`
//!   - Enabled by default. Forwards `std` to `num-traits` and
//!     `matrixmultiply`, the latter using it for runtime CPU feature
//!     detection in its gemm kernels. The crate itself always links the
//!     standard library (buffer locks, backend registry, environment
//!     configuration), with or without this feature.
//! - `netlib`
//!   - Enable the `NetlibKernels` and the `NetlibBackend`. A BLAS/LAPACK
//!     implementation must be linked by the final binary, for example
//!     through `blas-src`/`lapack-src`.
//! - `approx`
//!   - Implementations of traits from the [`approx`] crate.
//! - `serde`
//!   - Enables serialization support for serde 1.x
//!
//! ## Example
//!
//! ```
//! use ndbackend::prelude::*;
//!
//! let backend = default_backend();
//! let bj = backend.array_factory();
//! let a = bj.matrix(&[vec![1., 2.], vec![3., 4.]]).unwrap();
//! let x = bj.array(vec![1., 1.]);
//! let y = bj.double_array(&[2]);
//! backend
//!     .array_routines()
//!     .gemv(Op::Keep, 1., &a, &x, 0., &y)
//!     .unwrap();
//! assert_eq!(y.to_vec(), vec![3., 7.]);
//! ```

#[cfg(feature = "approx")]
pub use approx;

pub use crate::backend::{
    default_backend, initialize, select_backend, ArrayBackend, BackendConfig, BaseBackend, NativeBackend,
    PortableBackend,
};
#[cfg(feature = "netlib")]
pub use crate::backend::NetlibBackend;
pub use crate::data_repr::{ArrayData, ArrayDataMut};
pub use crate::error::{ArrayError, ErrorKind, LapackError};
pub use crate::factory::ArrayFactory;
pub use crate::layout::{MatrixLayout, VectorLayout};
pub use crate::linalg::{EigenDecomposition, LinearAlgebraRoutines, LuDecomposition, SingularValueDecomposition};
pub use crate::range::Range;
pub use crate::routines::{ArrayRoutines, Op};
pub use crate::slice::Slice;
pub use crate::stacking::{hsplit, hstack, repeat, repmat, take, vsplit, vstack};

use crate::data_repr::Buffer;

#[cfg(feature = "approx")]
mod array_approx;
#[cfg(feature = "serde")]
mod array_serde;
mod arrayformat;
mod arraytraits;
pub mod backend;
mod data_repr;
pub mod dimension;
mod error;
mod factory;
mod impl_constructors;
mod impl_methods;
mod impl_views;
pub mod kernel;
mod layout;
pub mod linalg;
pub mod prelude;
mod range;
pub mod routines;
mod slice;
mod stacking;

/// A strided *n*-dimensional array.
///
/// The array is a descriptor over a shared, fixed-length buffer: element
/// `(i0, .., ik)` lives at buffer position `offset + Σ ij * strides[j]`.
/// A *root* array owns a fresh buffer with the default column-major
/// strides (see [`dimension::compute_stride`]); a *view* is any array
/// derived from another one and shares its buffer.
///
/// `Array` deliberately does not implement `Clone`: use [`.view()`](Array::view)
/// for another handle to the same elements or [`.copy()`](Array::copy) for
/// a deep copy.
///
/// ```
/// use ndbackend::DoubleArray;
///
/// let a = DoubleArray::from_shape_vec(&[2, 3], vec![1., 2., 3., 4., 5., 6.]).unwrap();
/// let row = a.row(1).unwrap();
/// assert_eq!(row.to_vec(), vec![2., 4., 6.]);
///
/// row.set(&[2], 10.).unwrap();
/// assert_eq!(a.get(&[1, 2]).unwrap(), 10.);
/// ```
pub struct Array<A> {
    /// Buffer shared with every view of the same root.
    data: Buffer<A>,
    /// Position of the first element in `data`.
    offset: usize,
    shape: Vec<usize>,
    /// Signed distance, in elements, between neighbours along each axis.
    strides: Vec<isize>,
    /// Axis whose stride is the stride of the array seen as a vector.
    major_axis: usize,
    view: bool,
    read_only: bool,
}

/// An array of `f64`, the element type of all numeric routines.
pub type DoubleArray = Array<f64>;

/// An array of `i32`, used for pivot indices and ranges.
pub type IntArray = Array<i32>;

/// An array of `bool`.
pub type BooleanArray = Array<bool>;

/// An array of arbitrary values.
pub type ObjectArray<T> = Array<T>;
