// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Array's backing storage.
///
/// One allocation per root array; every view of the root holds another
/// reference to the same allocation. The buffer never changes length
/// after construction.
///
/// The lock only protects individual accesses. Two views that address
/// overlapping elements may still be written in an interleaved fashion by
/// different threads; callers serialize such writes themselves.
pub(crate) struct Buffer<A> {
    inner: Arc<RwLock<Vec<A>>>,
}

impl<A> Buffer<A> {
    pub(crate) fn from_vec(v: Vec<A>) -> Self {
        Buffer {
            inner: Arc::new(RwLock::new(v)),
        }
    }

    /// Return another handle to the same allocation.
    pub(crate) fn share(&self) -> Self {
        Buffer {
            inner: Arc::clone(&self.inner),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.read_recursive().len()
    }

    pub(crate) fn ptr_eq(&self, other: &Buffer<A>) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Address of the allocation, used to detect aliasing between
    /// arguments of different element types.
    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const u8 as usize
    }

    /// Shared access; may be taken again by the same thread while held,
    /// e.g. when both operands of `dot` are views of one buffer.
    pub(crate) fn read(&self) -> ArrayData<'_, A> {
        ArrayData {
            guard: self.inner.read_recursive(),
        }
    }

    pub(crate) fn write(&self) -> ArrayDataMut<'_, A> {
        ArrayDataMut {
            guard: self.inner.write(),
        }
    }
}

impl<A> fmt::Debug for Buffer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

/// Shared access to the whole backing buffer of an array.
///
/// Dereferences to the raw buffer, including elements that are not part of
/// the array when the array is a view.
pub struct ArrayData<'a, A> {
    guard: RwLockReadGuard<'a, Vec<A>>,
}

impl<'a, A> Deref for ArrayData<'a, A> {
    type Target = [A];

    fn deref(&self) -> &[A] {
        &self.guard
    }
}

/// Exclusive access to the whole backing buffer of an array.
pub struct ArrayDataMut<'a, A> {
    guard: RwLockWriteGuard<'a, Vec<A>>,
}

impl<'a, A> Deref for ArrayDataMut<'a, A> {
    type Target = [A];

    fn deref(&self) -> &[A] {
        &self.guard
    }
}

impl<'a, A> DerefMut for ArrayDataMut<'a, A> {
    fn deref_mut(&mut self) -> &mut [A] {
        &mut self.guard
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_handles_see_writes() {
        let a = Buffer::from_vec(vec![1, 2, 3]);
        let b = a.share();
        assert!(a.ptr_eq(&b));
        b.write()[1] = 10;
        assert_eq!(&*a.read(), &[1, 10, 3]);
        assert_eq!(a.addr(), b.addr());
        assert!(!a.ptr_eq(&Buffer::from_vec(vec![1, 10, 3])));
    }
}
