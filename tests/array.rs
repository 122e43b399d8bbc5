use ndbackend::{Array, ArrayError, DoubleArray, ErrorKind, IntArray, Slice};

use approx::assert_abs_diff_eq;

fn assert_close(a: &DoubleArray, b: &[f64])
{
    assert_eq!(a.size(), b.len());
    for (x, &y) in a.iter().zip(b) {
        assert_abs_diff_eq!(x, y, epsilon = 1e-15);
    }
}

#[test]
fn views_alias_their_root()
{
    let a = DoubleArray::zeros(&[3, 4]);
    let col = a.column(2).unwrap();
    let row = a.row(1).unwrap();
    col.set(&[1], 5.).unwrap();
    assert_eq!(a.get(&[1, 2]).unwrap(), 5.);
    assert_eq!(row.get(&[2]).unwrap(), 5.);
    assert!(col.shares_buffer(&a));
    assert!(col.is_view());
    assert!(!a.is_view());
}

#[test]
fn strided_view_alias()
{
    let a = Array::from_vec((0..12).collect::<Vec<i32>>());
    // every third element, as a 2 × 2 matrix
    let m = a.as_view(1, &[2, 2], &[3, 6]).unwrap();
    assert_eq!(m.to_vec(), vec![1, 4, 7, 10]);
    m.set(&[1, 1], 100).unwrap();
    assert_eq!(a.get_flat(10).unwrap(), 100);
    assert!(!m.is_contiguous());
}

#[test]
fn as_view_is_checked_eagerly()
{
    let a = DoubleArray::zeros(&[6]);
    let err = a.as_view(2, &[3, 2], &[1, 3]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalArgument);
    assert!(a.as_view(0, &[2], &[1, 1]).is_err());
    assert!(a.as_view(5, &[0, 3], &[1, 1]).is_ok());
}

#[test]
fn copy_is_independent()
{
    let a = DoubleArray::from_rows(&[[1., 2., 3.], [4., 5., 6.]]).unwrap();
    let t = a.transpose();
    let c = t.copy();
    assert_eq!(c, t);
    assert!(!c.shares_buffer(&a));
    assert!(c.is_contiguous());
    c.set(&[0, 0], -1.).unwrap();
    assert_eq!(a.get(&[0, 0]).unwrap(), 1.);
    assert_eq!(c.copy(), c);
}

#[test]
fn column_major_flat_order()
{
    let a = DoubleArray::from_rows(&[[1., 2.], [3., 4.], [5., 6.]]).unwrap();
    assert_eq!(a.to_vec(), vec![1., 3., 5., 2., 4., 6.]);
    assert_eq!(a.get_flat(3).unwrap(), 2.);
    assert_eq!(a.strides(), &[1, 3]);
}

#[test]
fn index_errors()
{
    let a = IntArray::zeros(&[2, 3]);
    match a.get(&[2, 0]) {
        Err(ArrayError::IndexOutOfBounds { index, shape }) => {
            assert_eq!(index, vec![2, 0]);
            assert_eq!(shape, vec![2, 3]);
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(a.get(&[0]).is_err());
    assert!(a.set_flat(6, 1).is_err());
}

#[test]
fn slices_and_blocks()
{
    let a = DoubleArray::from_shape_fn(&[4, 5], |ix| (ix[0] * 10 + ix[1]) as f64);
    let block = a.sub_matrix(1, 2, 2, 3).unwrap();
    assert_eq!(block.shape(), &[2, 3]);
    assert_eq!(block.get(&[1, 2]).unwrap(), 24.);
    let odd_rows = a.slice(&[Slice::new(1, None, 2), Slice::from(..)]).unwrap();
    assert_eq!(odd_rows.shape(), &[2, 5]);
    assert_eq!(odd_rows.get(&[1, 4]).unwrap(), 34.);
    assert!(a.sub_matrix(3, 0, 2, 1).is_err());
}

#[test]
fn assign_between_overlapping_views()
{
    let a = DoubleArray::from_vec(vec![1., 2., 3., 4., 5.]);
    let head = a.slice(&[Slice::new(0, Some(4), 1)]).unwrap();
    let tail = a.slice(&[Slice::new(1, None, 1)]).unwrap();
    tail.assign(&head).unwrap();
    assert_eq!(a.to_vec(), vec![1., 1., 2., 3., 4.]);
}

#[test]
fn sort_respects_strides()
{
    let a = Array::from_vec(vec![5, 0, 3, 0, 1, 0]);
    let evens = a.slice(&[Slice::from(..).step_by(2)]).unwrap();
    evens.sort().unwrap();
    assert_eq!(a.to_vec(), vec![1, 0, 3, 0, 5, 0]);
}

#[test]
fn diag_and_eye()
{
    let d = DoubleArray::from_diag(&DoubleArray::from_vec(vec![1., 2.])).unwrap();
    assert_eq!(d.to_vec(), vec![1., 0., 0., 2.]);
    assert_close(&DoubleArray::eye(2).diagonal().unwrap(), &[1., 1.]);
}

#[test]
fn linspace_endpoints()
{
    let l = DoubleArray::linspace(0., 1., 5);
    assert_close(&l, &[0., 0.25, 0.5, 0.75, 1.]);
}

#[test]
fn shape_predicates()
{
    let m = DoubleArray::zeros(&[3, 2]);
    assert_eq!(m.dims(), 2);
    assert!(m.is_matrix() && !m.is_square() && !m.is_vector());
    assert_eq!((m.rows(), m.columns()), (3, 2));

    let c = m.column(0).unwrap();
    assert_eq!(c.dims(), 1);
    assert!(c.is_vector());
    assert_eq!((c.rows(), c.columns()), (3, 1));

    let r = DoubleArray::zeros(&[1, 4]);
    assert!(r.is_vector() && r.is_matrix());
}
