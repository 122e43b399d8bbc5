// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::hash;
use std::iter::FromIterator;

use crate::Array;

/// Version of the serialized representation.
#[cfg(feature = "serde")]
pub(crate) const ARRAY_FORMAT_VERSION: u8 = 1u8;

/// Return `true` if the array shapes and all elements of `self` and
/// `other` are equal. Return `false` otherwise.
///
/// Strides, offsets and whether either side is a view do not take part in
/// the comparison.
impl<A, B> PartialEq<Array<B>> for Array<A>
where
    A: PartialEq<B>,
{
    fn eq(&self, rhs: &Array<B>) -> bool {
        if self.shape() != rhs.shape() {
            return false;
        }
        let a = self.data();
        let b = rhs.data();
        self.positions()
            .zip(rhs.positions())
            .all(|(i, j)| a[i] == b[j])
    }
}

impl<A: Eq> Eq for Array<A> {}

impl<A: hash::Hash> hash::Hash for Array<A> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.shape().hash(state);
        let data = self.data();
        for p in self.positions() {
            data[p].hash(state);
        }
    }
}

impl<A> From<Vec<A>> for Array<A> {
    /// Create a one-dimensional array from a vector (no copying needed).
    fn from(v: Vec<A>) -> Self {
        Array::from_vec(v)
    }
}

impl<A> FromIterator<A> for Array<A> {
    /// Create a one-dimensional array from an iterable.
    fn from_iter<I>(iterable: I) -> Array<A>
    where
        I: IntoIterator<Item = A>,
    {
        Array::from_vec(iterable.into_iter().collect())
    }
}
