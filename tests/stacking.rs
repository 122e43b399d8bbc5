use ndbackend::prelude::*;
use ndbackend::{hstack, repmat, vsplit, vstack, PortableBackend};

use approx::assert_abs_diff_eq;

fn assert_close(a: &DoubleArray, b: &[f64])
{
    assert_eq!(a.size(), b.len(), "size of {:?}", a.shape());
    for (x, &y) in a.iter().zip(b) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-12);
    }
}

/// A 2 × 3 matrix over every other column of a 2 × 6 parent:
/// [[1, 2, 3], [4, 5, 6]]
fn strided() -> (DoubleArray, DoubleArray)
{
    let parent = DoubleArray::from_rows(&[
        [1., 0., 2., 0., 3., 0.],
        [4., 0., 5., 0., 6., 0.],
    ])
    .unwrap();
    let view = parent
        .slice(&[Slice::from(..), Slice::new(0, None, 2)])
        .unwrap();
    (parent, view)
}

#[test]
fn axis_reductions_on_a_strided_view()
{
    let backend = PortableBackend::new();
    let r = backend.array_routines();
    let (_parent, x) = strided();
    assert!(!x.is_contiguous());

    assert_close(&r.sum_axis(&x, 0).unwrap(), &[5., 7., 9.]);
    assert_close(&r.sum_axis(&x, 1).unwrap(), &[6., 15.]);
    assert_close(&r.mean_axis(&x, 1).unwrap(), &[2., 5.]);
    assert_close(&r.var_axis(&x, 0).unwrap(), &[2.25, 2.25, 2.25]);
    assert_close(&r.std_axis(&x, 0).unwrap(), &[1.5, 1.5, 1.5]);
    assert_close(&r.min_axis(&x, 0).unwrap(), &[1., 2., 3.]);
    assert_close(&r.max_axis(&x, 1).unwrap(), &[3., 6.]);
    assert_close(&r.prod_axis(&x, 1).unwrap(), &[6., 120.]);

    let c = r.cumsum_axis(&x, 1).unwrap();
    assert_eq!(c.shape(), &[2, 3]);
    assert!(!c.is_view());
    assert_close(&c.row(1).unwrap(), &[4., 9., 15.]);

    assert_eq!(r.sum_axis(&x, 2).unwrap_err().kind(), ErrorKind::IllegalArgument);
}

#[test]
fn reduction_of_a_vector_is_zero_dimensional()
{
    let backend = PortableBackend::new();
    let x = DoubleArray::from_vec(vec![1., 2., 3.]);
    let s = backend.array_routines().sum_axis(&x, 0).unwrap();
    assert_eq!(s.ndim(), 0);
    assert_eq!(s.get(&[]).unwrap(), 6.);
}

#[test]
fn stack_and_split_strided_views()
{
    let (parent, x) = strided();
    let v = vstack(&[&x, &x.row(0).unwrap().reshape(&[1, 3]).unwrap()]).unwrap();
    assert_eq!(v.shape(), &[3, 3]);
    assert_close(&v.column(2).unwrap(), &[3., 6., 3.]);

    let h = hstack(&[&x, &x.transpose().column(1).unwrap()]).unwrap_err();
    assert_eq!(h.kind(), ErrorKind::IllegalArgument);
    let h = hstack(&[&x, &x.column(1).unwrap()]).unwrap();
    assert_eq!(h.shape(), &[2, 4]);
    assert_close(&h.row(0).unwrap(), &[1., 2., 3., 2.]);

    let rows = vsplit(&x, 2).unwrap();
    assert_close(&rows[1], &[4., 5., 6.]);
    rows[1].set(&[0, 2], 60.).unwrap();
    assert_eq!(parent.get(&[1, 4]).unwrap(), 60.);

    let backend = PortableBackend::new();
    let cols = backend.array_routines().hsplit(&x, 3).unwrap();
    assert_eq!(cols.len(), 3);
    assert_close(&cols[2], &[3., 60.]);
}

#[test]
fn repmat_repeat_take_follow_logical_order()
{
    let backend = PortableBackend::new();
    let r = backend.array_routines();
    let (_parent, x) = strided();
    let t = repmat(&x, 1, 2).unwrap();
    assert_eq!(t.shape(), &[2, 6]);
    assert_close(&t.row(0).unwrap(), &[1., 2., 3., 1., 2., 3.]);
    assert_close(&r.repeat(&x.row(1).unwrap(), 2), &[4., 4., 5., 5., 6., 6.]);
    assert_close(&r.take(&x, 3).unwrap(), &[1., 4., 2.]);
    assert!(r.take(&x, 7).is_err());
}
