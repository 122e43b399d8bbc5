use ndbackend::dimension::{compute_stride, linear_offset, offset, size, unravel_index};
use ndbackend::DoubleArray;

use quickcheck::{quickcheck, TestResult};

fn small_shape(dims: Vec<u8>) -> Vec<usize>
{
    dims.into_iter().take(4).map(|d| (d % 5) as usize + 1).collect()
}

quickcheck! {
    fn unravel_then_offset_round_trips(dims: Vec<u8>, i: usize) -> TestResult {
        let shape = small_shape(dims);
        let n = size(&shape);
        if shape.is_empty() {
            return TestResult::discard();
        }
        let i = i % n;
        let index = unravel_index(i, &shape);
        let strides = compute_stride(&shape);
        TestResult::from_bool(offset(&index, 0, &strides) == i)
    }

    fn transposed_view_addresses_same_element(dims: Vec<u8>, i: usize) -> TestResult {
        let shape = small_shape(dims);
        if shape.len() != 2 {
            return TestResult::discard();
        }
        let a = DoubleArray::from_shape_fn(&shape, |ix| (ix[0] * 100 + ix[1]) as f64);
        let t = a.transpose();
        let i = i % a.size();
        let index = unravel_index(i, &shape);
        let expected = a.get(&index).unwrap();
        TestResult::from_bool(t.get(&[index[1], index[0]]).unwrap() == expected)
    }

    fn linear_offset_matches_get_flat(dims: Vec<u8>, i: usize) -> TestResult {
        let shape = small_shape(dims);
        if shape.len() != 2 {
            return TestResult::discard();
        }
        let a = DoubleArray::from_shape_fn(&shape, |ix| (ix[0] * 100 + ix[1]) as f64);
        let t = a.transpose();
        let i = i % t.size();
        let p = linear_offset(i, t.offset(), t.strides(), t.shape());
        TestResult::from_bool(a.to_vec()[p] == t.get_flat(i).unwrap())
    }
}

#[test]
fn strides_are_column_major()
{
    assert_eq!(compute_stride(&[2, 3, 4]), vec![1, 2, 6]);
    assert_eq!(compute_stride(&[]), Vec::<isize>::new());
    assert_eq!(size(&[2, 0, 3]), 0);
}
