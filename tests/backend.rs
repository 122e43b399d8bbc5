use ndbackend::backend::builtin_backends;
use ndbackend::prelude::*;
use ndbackend::{initialize, select_backend, BackendConfig, BaseBackend, PortableBackend};

#[test]
fn builtin_backends_by_priority()
{
    let backends = builtin_backends();
    let names: Vec<_> = backends.iter().map(|b| b.name()).collect();
    assert!(names.contains(&"base"));
    assert!(names.contains(&"portable"));
    let best = select_backend(&backends).unwrap();
    assert!(backends.iter().all(|b| b.priority() <= best.priority()));
}

#[test]
fn initialize_fixes_the_default()
{
    let _ = env_logger::builder().is_test(true).try_init();
    let config = BackendConfig {
        preferred: None,
        quiet_native: true,
    };
    let first = initialize(&config);
    let again = default_backend();
    assert_eq!(first.name(), again.name());
    assert!(first.is_available());
}

#[test]
fn factories_build_interchangeable_arrays()
{
    let base = BaseBackend::new();
    let portable = PortableBackend::new();
    let x = base.array_factory().array(vec![1., 2.]);
    let y = portable.array_factory().ones(&[2]);
    assert_eq!(portable.array_routines().dot(&x, &y).unwrap(), 3.);
    assert_eq!(base.array_routines().dot(&x, &y).unwrap(), 3.);
}

#[test]
fn every_backend_solves_the_same_system()
{
    let a = DoubleArray::from_rows(&[[2., 1.], [1., 3.]]).unwrap();
    let b = DoubleArray::from_vec(vec![3., 5.]);
    for backend in builtin_backends() {
        let x = backend.linear_algebra_routines().solve(&a, &b).unwrap();
        let x = x.to_vec();
        assert!((x[0] - 0.8).abs() < 1e-12, "{}: {:?}", backend.name(), x);
        assert!((x[1] - 1.4).abs() < 1e-12, "{}: {:?}", backend.name(), x);
    }
}
