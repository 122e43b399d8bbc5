#[cfg(feature = "blas-src")]
extern crate blas_src;
#[cfg(feature = "lapack-src")]
extern crate lapack_src;

use ndbackend::prelude::*;
use ndbackend::{NetlibBackend, PortableBackend};
use ndbackend_gen::array_builder::{ArrayBuilder, ElementGenerator, MemoryOrder};

use approx::assert_relative_eq;
use itertools::iproduct;

fn random(shape: &[usize], seed: u64) -> DoubleArray
{
    ArrayBuilder::new(shape)
        .generator(ElementGenerator::Random(seed))
        .build()
}

fn row_major(shape: &[usize]) -> DoubleArray
{
    ArrayBuilder::new(shape)
        .memory_order(MemoryOrder::RowMajor)
        .build()
}

#[test]
fn netlib_is_preferred()
{
    let _ = env_logger::builder().is_test(true).try_init();
    assert_eq!(default_backend().name(), "netlib");
}

#[test]
fn level1_agrees_with_portable()
{
    let netlib = NetlibBackend::new();
    let portable = PortableBackend::new();
    let (n, p) = (netlib.array_routines(), portable.array_routines());
    let x = random(&[17], 1);
    let y = random(&[17], 2);
    assert_relative_eq!(n.dot(&x, &y).unwrap(), p.dot(&x, &y).unwrap(), max_relative = 1e-12);
    assert_relative_eq!(n.norm2(&x).unwrap(), p.norm2(&x).unwrap(), max_relative = 1e-12);
    assert_relative_eq!(n.asum(&x).unwrap(), p.asum(&x).unwrap(), max_relative = 1e-12);
    assert_eq!(n.iamax(&x).unwrap(), p.iamax(&x).unwrap());
}

#[test]
fn gemm_agrees_with_portable()
{
    let netlib = NetlibBackend::new();
    let portable = PortableBackend::new();
    let sizes = [1, 4, 7];
    for ((m, k, n), (ta, tb)) in iproduct!(
        iproduct!(sizes, sizes, sizes),
        iproduct!([Op::Keep, Op::Transpose], [Op::Keep, Op::Transpose])
    ) {
        let a = if ta.is_transpose() { row_major(&[k, m]) } else { random(&[m, k], 3) };
        let b = if tb.is_transpose() { random(&[n, k], 4) } else { row_major(&[k, n]) };
        let c1 = random(&[m, n], 5);
        let c2 = c1.copy();
        netlib
            .array_routines()
            .gemm(ta, tb, 0.5, &a, &b, 2., &c1)
            .unwrap();
        portable
            .array_routines()
            .gemm(ta, tb, 0.5, &a, &b, 2., &c2)
            .unwrap();
        assert_relative_eq!(c1, c2, epsilon = 1e-9, max_relative = 1e-9);
    }
}

#[test]
fn gemv_into_strided_view()
{
    let netlib = NetlibBackend::new();
    let a = random(&[6, 5], 6);
    let x = random(&[5], 7);
    let y = DoubleArray::zeros(&[2, 6]);
    let y_row = y.row(1).unwrap();
    netlib
        .array_routines()
        .gemv(Op::Keep, 1., &a, &x, 0., &y_row)
        .unwrap();
    let expected = DoubleArray::zeros(&[6]);
    PortableBackend::new()
        .array_routines()
        .gemv(Op::Keep, 1., &a, &x, 0., &expected)
        .unwrap();
    assert_relative_eq!(y.row(1).unwrap(), expected, epsilon = 1e-12);
    assert_eq!(y.row(0).unwrap().to_vec(), vec![0.; 6]);
}

#[test]
fn solve_and_inverse()
{
    let netlib = NetlibBackend::new();
    let linalg = netlib.linear_algebra_routines();
    let a = random(&[5, 5], 8);
    let b = random(&[5, 2], 9);
    let x = linalg.solve(&a, &b).unwrap();
    let ax = DoubleArray::zeros(&[5, 2]);
    netlib
        .array_routines()
        .gemm(Op::Keep, Op::Keep, 1., &a, &x, 0., &ax)
        .unwrap();
    assert_relative_eq!(ax, b, epsilon = 1e-9);

    let inv = linalg.inv(&a).unwrap();
    let id = DoubleArray::zeros(&[5, 5]);
    netlib
        .array_routines()
        .gemm(Op::Keep, Op::Keep, 1., &a, &inv, 0., &id)
        .unwrap();
    assert_relative_eq!(id, DoubleArray::eye(5), epsilon = 1e-9);
}

#[test]
fn svd_agrees_with_portable()
{
    let netlib = NetlibBackend::new();
    let portable = PortableBackend::new();
    let a = random(&[6, 4], 10);
    let s1 = netlib.linear_algebra_routines().svd(&a).unwrap();
    let s2 = portable.linear_algebra_routines().svd(&a).unwrap();
    assert_relative_eq!(
        s1.singular_values(),
        s2.singular_values(),
        epsilon = 1e-9,
        max_relative = 1e-9
    );
}

#[test]
fn symmetric_eigenvalues_agree()
{
    let netlib = NetlibBackend::new();
    let portable = PortableBackend::new();
    let r = random(&[4, 4], 11);
    let a = DoubleArray::from_shape_fn(&[4, 4], |ix| {
        r.get(&[ix[0], ix[1]]).unwrap() + r.get(&[ix[1], ix[0]]).unwrap()
    });
    let e1 = netlib.linear_algebra_routines().eigh(&a).unwrap();
    let e2 = portable.linear_algebra_routines().eigh(&a).unwrap();
    assert_relative_eq!(
        e1.real_eigenvalues(),
        e2.real_eigenvalues(),
        epsilon = 1e-9,
        max_relative = 1e-9
    );
}
