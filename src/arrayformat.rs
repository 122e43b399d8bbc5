// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::fmt;

use crate::dimension;
use crate::Array;

fn format_array<A, F>(array: &Array<A>, f: &mut fmt::Formatter<'_>, mut format: F) -> fmt::Result
where
    F: FnMut(&A, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    let data = array.data();
    let mut index = vec![0; array.ndim()];
    format_axis(array, &data, 0, &mut index, f, &mut format)
}

// Rows are printed one per line: the last axis varies fastest on screen,
// whatever the memory order.
fn format_axis<A, F>(
    array: &Array<A>,
    data: &[A],
    axis: usize,
    index: &mut Vec<usize>,
    f: &mut fmt::Formatter<'_>,
    format: &mut F,
) -> fmt::Result
where
    F: FnMut(&A, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    let ndim = array.ndim();
    if axis == ndim {
        return format(&data[dimension::offset(index, array.offset(), array.strides())], f);
    }
    write!(f, "[")?;
    for i in 0..array.shape()[axis] {
        if i > 0 {
            if axis + 1 == ndim {
                write!(f, ", ")?;
            } else {
                write!(f, ",")?;
                for _ in axis + 1..ndim - 1 {
                    writeln!(f)?;
                }
                writeln!(f)?;
                for _ in 0..=axis {
                    write!(f, " ")?;
                }
            }
        }
        index[axis] = i;
        format_axis(array, data, axis + 1, index, f, format)?;
    }
    write!(f, "]")
}

/// Format the array using `Display` and apply the formatting parameters used
/// to each element.
///
/// The array is shown in multiline style, one row per line.
impl<A: fmt::Display> fmt::Display for Array<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_array(self, f, <_>::fmt)
    }
}

/// Format the array using `Debug` and apply the formatting parameters used
/// to each element.
impl<A: fmt::Debug> fmt::Debug for Array<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Add extra information for Debug
        format_array(self, f, <_>::fmt)?;
        write!(
            f,
            " shape={:?}, strides={:?}, offset={}",
            self.shape(),
            self.strides(),
            self.offset()
        )?;
        if self.is_view() {
            write!(f, ", view")?;
        }
        if self.is_read_only() {
            write!(f, ", read-only")?;
        }
        Ok(())
    }
}

/// Format the array using `LowerExp` and apply the formatting parameters used
/// to each element.
impl<A: fmt::LowerExp> fmt::LowerExp for Array<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        format_array(self, f, <_>::fmt)
    }
}
