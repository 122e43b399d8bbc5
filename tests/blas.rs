use std::sync::atomic::{AtomicUsize, Ordering};

use ndbackend::kernel::{Blas, RustKernels};
use ndbackend::prelude::*;
use ndbackend::routines::BlasArrayRoutines;
use ndbackend::{BaseBackend, PortableBackend};
use ndbackend_gen::array_builder::{ArrayBuilder, ElementGenerator, MemoryOrder};

use approx::assert_relative_eq;
use itertools::iproduct;

fn random(shape: &[usize], seed: u64) -> DoubleArray
{
    ArrayBuilder::new(shape)
        .generator(ElementGenerator::Random(seed))
        .build()
}

fn assert_arrays_close(a: &DoubleArray, b: &DoubleArray)
{
    assert_eq!(a.shape(), b.shape());
    for (x, y) in a.iter().zip(b.iter()) {
        assert_relative_eq!(x, y, epsilon = 1e-12, max_relative = 1e-9);
    }
}

/// Counts the kernel calls and forwards them to the Rust kernels.
#[derive(Debug, Default)]
struct CountingKernel
{
    calls: AtomicUsize,
}

impl CountingKernel
{
    fn count(&self) -> RustKernels
    {
        self.calls.fetch_add(1, Ordering::SeqCst);
        RustKernels
    }

    fn calls(&self) -> usize
    {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Blas for CountingKernel
{
    fn ddot(&self, n: i32, x: &[f64], incx: i32, y: &[f64], incy: i32) -> f64
    {
        self.count().ddot(n, x, incx, y, incy)
    }

    fn dnrm2(&self, n: i32, x: &[f64], incx: i32) -> f64
    {
        self.count().dnrm2(n, x, incx)
    }

    fn dasum(&self, n: i32, x: &[f64], incx: i32) -> f64
    {
        self.count().dasum(n, x, incx)
    }

    fn idamax(&self, n: i32, x: &[f64], incx: i32) -> usize
    {
        self.count().idamax(n, x, incx)
    }

    fn dscal(&self, n: i32, alpha: f64, x: &mut [f64], incx: i32)
    {
        self.count().dscal(n, alpha, x, incx)
    }

    fn daxpy(&self, n: i32, alpha: f64, x: &[f64], incx: i32, y: &mut [f64], incy: i32)
    {
        self.count().daxpy(n, alpha, x, incx, y, incy)
    }

    fn dcopy(&self, n: i32, x: &[f64], incx: i32, y: &mut [f64], incy: i32)
    {
        self.count().dcopy(n, x, incx, y, incy)
    }

    fn dgemv(
        &self, trans: Op, m: i32, n: i32, alpha: f64, a: &[f64], lda: i32, x: &[f64], incx: i32, beta: f64,
        y: &mut [f64], incy: i32,
    )
    {
        self.count()
            .dgemv(trans, m, n, alpha, a, lda, x, incx, beta, y, incy)
    }

    fn dger(&self, m: i32, n: i32, alpha: f64, x: &[f64], incx: i32, y: &[f64], incy: i32, a: &mut [f64], lda: i32)
    {
        self.count().dger(m, n, alpha, x, incx, y, incy, a, lda)
    }

    fn dgemm(
        &self, transa: Op, transb: Op, m: i32, n: i32, k: i32, alpha: f64, a: &[f64], lda: i32, b: &[f64],
        ldb: i32, beta: f64, c: &mut [f64], ldc: i32,
    )
    {
        self.count()
            .dgemm(transa, transb, m, n, k, alpha, a, lda, b, ldb, beta, c, ldc)
    }
}

#[test]
fn dot_norm_and_identity_gemv()
{
    let backend = default_backend();
    let bj = backend.array_factory();
    let r = backend.array_routines();
    let x = bj.array(vec![1., 2., 3.]);
    let y = bj.array(vec![4., 5., 6.]);
    assert_eq!(r.dot(&x, &y).unwrap(), 32.);
    assert_eq!(r.norm2(&bj.array(vec![3., 4.])).unwrap(), 5.);

    let out = bj.double_array(&[3]);
    r.gemv(Op::Keep, 1., &bj.eye(3), &x, 0., &out).unwrap();
    assert_eq!(out.to_vec(), x.to_vec());
}

#[test]
fn gemm_into_strided_view_is_visible_in_parent()
{
    let backend = PortableBackend::new();
    let parent = DoubleArray::zeros(&[4, 4]);
    // rows 0 and 2, columns 1 and 3
    let c = parent
        .slice(&[Slice::new(0, None, 2), Slice::new(1, None, 2)])
        .unwrap();
    assert!(c.blas_matrix().is_none());
    let a = DoubleArray::from_rows(&[[1., 2.], [3., 4.]]).unwrap();
    let b = DoubleArray::from_rows(&[[5., 6.], [7., 8.]]).unwrap();
    backend
        .array_routines()
        .gemm(Op::Keep, Op::Keep, 1., &a, &b, 0., &c)
        .unwrap();
    assert_eq!(parent.get(&[0, 1]).unwrap(), 19.);
    assert_eq!(parent.get(&[0, 3]).unwrap(), 22.);
    assert_eq!(parent.get(&[2, 1]).unwrap(), 43.);
    assert_eq!(parent.get(&[2, 3]).unwrap(), 50.);
    assert_eq!(parent.get(&[1, 1]).unwrap(), 0.);
    assert_eq!(parent.get(&[0, 0]).unwrap(), 0.);
}

#[test]
fn native_and_generic_paths_agree()
{
    let native = PortableBackend::new();
    let generic = BaseBackend::new();
    let (n, g) = (native.array_routines(), generic.array_routines());

    let x = random(&[9], 1);
    let y = random(&[9], 2);
    // a row of a row-major matrix has unit stride, its column does not
    let strided = ArrayBuilder::new(&[3, 9])
        .memory_order(MemoryOrder::RowMajor)
        .generator(ElementGenerator::Random(3))
        .build::<f64>()
        .column(4)
        .unwrap();
    assert_relative_eq!(n.dot(&x, &y).unwrap(), g.dot(&x, &y).unwrap(), max_relative = 1e-9);
    assert_relative_eq!(
        n.dot(&x.slice(&[Slice::new(0, Some(3), 1)]).unwrap(), &strided).unwrap(),
        g.dot(&x.slice(&[Slice::new(0, Some(3), 1)]).unwrap(), &strided).unwrap(),
        max_relative = 1e-9
    );

    let y1 = y.copy();
    let y2 = y.copy();
    n.axpy(0.5, &x, &y1).unwrap();
    g.axpy(0.5, &x, &y2).unwrap();
    assert_arrays_close(&y1, &y2);

    for (m, k, ta) in iproduct!([1, 3, 5], [2, 4], [Op::Keep, Op::Transpose]) {
        let (rows, cols) = if ta.is_transpose() { (k, m) } else { (m, k) };
        let a = random(&[rows, cols], 4);
        let v = random(&[k], 5);
        let w1 = random(&[m], 6);
        let w2 = w1.copy();
        n.gemv(ta, 1.5, &a, &v, 0.5, &w1).unwrap();
        g.gemv(ta, 1.5, &a, &v, 0.5, &w2).unwrap();
        assert_arrays_close(&w1, &w2);

        let b = random(&[k, 3], 7);
        let parent = random(&[m + 1, 6], 8);
        let c1 = parent.slice(&[Slice::new(1, None, 1), Slice::new(0, None, 2)]).unwrap();
        let c2 = c1.copy();
        n.gemm(ta, Op::Keep, 1., &a, &b, -1., &c1).unwrap();
        g.gemm(ta, Op::Keep, 1., &a, &b, -1., &c2).unwrap();
        assert_arrays_close(&c1, &c2);
    }
}

#[test]
fn kernel_is_called_for_eligible_operands_only()
{
    let r = BlasArrayRoutines::new(CountingKernel::default());
    let m = DoubleArray::from_rows(&[[1., 2., 3.], [4., 5., 6.]]).unwrap();

    // a column is packed, a row is not
    assert_eq!(r.asum(&m.column(1).unwrap()).unwrap(), 7.);
    assert_eq!(r.kernel().calls(), 1);
    assert_eq!(r.asum(&m.row(1).unwrap()).unwrap(), 15.);
    assert_eq!(r.kernel().calls(), 1);

    // gemm always reaches the kernel, on packed copies if needed
    let c = DoubleArray::zeros(&[3, 3]);
    r.gemm(Op::Transpose, Op::Keep, 1., &m, &m, 0., &c).unwrap();
    assert_eq!(r.kernel().calls(), 2);
    assert_eq!(c.get(&[0, 0]).unwrap(), 17.);

    // reductions never do
    assert_eq!(r.sum(&m), 21.);
    assert_eq!(r.kernel().calls(), 2);
}

#[test]
fn scal_through_view_updates_root()
{
    let backend = PortableBackend::new();
    let x = DoubleArray::ones(&[2, 3]);
    backend
        .array_routines()
        .scal(2., &x.row(1).unwrap())
        .unwrap();
    backend
        .array_routines()
        .scal(3., &x.column(2).unwrap())
        .unwrap();
    assert_eq!(x.to_vec(), vec![1., 2., 1., 2., 3., 6.]);
}
