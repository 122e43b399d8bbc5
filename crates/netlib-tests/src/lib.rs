// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Runs the routine tests against a system BLAS/LAPACK; see the features
//! in `Cargo.toml` for the supported implementations.
