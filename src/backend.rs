// Copyright 2026 ndbackend developers.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Backends: a factory for arrays plus the routines that operate on them.
//!
//! | Backend | Routines | Priority |
//! |---------|----------|----------|
//! | [`BaseBackend`] | generic element-wise routines, Rust LAPACK kernels | 0 |
//! | [`PortableBackend`] | Rust BLAS/LAPACK kernels | 10 |
//! | `NetlibBackend` | system CBLAS/LAPACK (feature `netlib`) | 100 |
//!
//! [`default_backend`] picks the available backend with the highest
//! priority, unless the environment variable `NDBACKEND_BACKEND` names
//! another one. Call [`initialize`] once at process start to configure
//! the selection explicitly.

use std::env;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use log::{debug, warn};

use crate::factory::ArrayFactory;
use crate::kernel::{Blas, Lapack, RustKernels};
#[cfg(feature = "netlib")]
use crate::kernel::NetlibKernels;
use crate::linalg::{LapackRoutines, LinearAlgebraRoutines};
use crate::routines::{ArrayRoutines, BaseArrayRoutines, BlasArrayRoutines};

/// Environment variable naming the preferred backend.
pub const BACKEND_VAR: &str = "NDBACKEND_BACKEND";
/// Environment variable that silences the native path messages when set
/// to `1`, `true` or `yes`.
pub const QUIET_NATIVE_VAR: &str = "NDBACKEND_QUIET_NATIVE";

static QUIET_NATIVE: AtomicBool = AtomicBool::new(false);

/// True if native path messages are suppressed.
pub(crate) fn quiet_native() -> bool {
    QUIET_NATIVE.load(Ordering::Relaxed)
}

/// Process wide backend configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackendConfig {
    /// Name of the backend to use if it is available, compared case
    /// insensitively with [`ArrayBackend::name`].
    pub preferred: Option<String>,
    /// Do not log which calls take the native path.
    pub quiet_native: bool,
}

impl BackendConfig {
    /// Read the configuration from `NDBACKEND_BACKEND` and
    /// `NDBACKEND_QUIET_NATIVE`.
    pub fn from_env() -> Self {
        Self::from_vars(env::var(BACKEND_VAR).ok(), env::var(QUIET_NATIVE_VAR).ok())
    }

    fn from_vars(backend: Option<String>, quiet: Option<String>) -> Self {
        let preferred = backend.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        let quiet_native = quiet
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        BackendConfig {
            preferred,
            quiet_native,
        }
    }
}

/// A source of arrays and of the routines that operate on them.
///
/// The factory and routines are built on first use and cached for the
/// lifetime of the backend.
pub trait ArrayBackend: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// False if the backend cannot be used in this build or process.
    fn is_available(&self) -> bool;

    /// Higher is preferred by [`select_backend`].
    fn priority(&self) -> i32;

    fn array_factory(&self) -> &ArrayFactory;

    fn array_routines(&self) -> &dyn ArrayRoutines;

    fn linear_algebra_routines(&self) -> &dyn LinearAlgebraRoutines;
}

/// The fallback backend: element-wise routines that accept any array
/// layout, and LAPACK through the Rust kernels.
#[derive(Debug, Default)]
pub struct BaseBackend {
    factory: OnceLock<ArrayFactory>,
    routines: OnceLock<BaseArrayRoutines>,
    linalg: OnceLock<LapackRoutines<RustKernels>>,
}

impl BaseBackend {
    pub const fn new() -> Self {
        BaseBackend {
            factory: OnceLock::new(),
            routines: OnceLock::new(),
            linalg: OnceLock::new(),
        }
    }
}

impl ArrayBackend for BaseBackend {
    fn name(&self) -> &'static str {
        "base"
    }

    fn is_available(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        0
    }

    fn array_factory(&self) -> &ArrayFactory {
        self.factory.get_or_init(ArrayFactory::new)
    }

    fn array_routines(&self) -> &dyn ArrayRoutines {
        self.routines.get_or_init(|| BaseArrayRoutines)
    }

    fn linear_algebra_routines(&self) -> &dyn LinearAlgebraRoutines {
        self.linalg.get_or_init(|| LapackRoutines::new(RustKernels))
    }
}

/// A backend whose routines call the kernel `K` whenever the operands'
/// layout allows it.
pub struct NativeBackend<K> {
    name: &'static str,
    priority: i32,
    kernel: K,
    factory: OnceLock<ArrayFactory>,
    routines: OnceLock<BlasArrayRoutines<K>>,
    linalg: OnceLock<LapackRoutines<K>>,
}

/// The native backend over the kernels written in Rust.
pub type PortableBackend = NativeBackend<RustKernels>;

/// The native backend over the system CBLAS/LAPACK.
#[cfg(feature = "netlib")]
pub type NetlibBackend = NativeBackend<NetlibKernels>;

impl<K> NativeBackend<K> {
    /// A backend named `name` over `kernel`.
    pub const fn with_kernel(name: &'static str, priority: i32, kernel: K) -> Self {
        NativeBackend {
            name,
            priority,
            kernel,
            factory: OnceLock::new(),
            routines: OnceLock::new(),
            linalg: OnceLock::new(),
        }
    }

    pub fn kernel(&self) -> &K {
        &self.kernel
    }
}

impl NativeBackend<RustKernels> {
    pub const fn new() -> Self {
        Self::with_kernel("portable", 10, RustKernels)
    }
}

impl Default for NativeBackend<RustKernels> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "netlib")]
impl NativeBackend<NetlibKernels> {
    pub const fn new() -> Self {
        Self::with_kernel("netlib", 100, NetlibKernels)
    }
}

impl<K: fmt::Debug> fmt::Debug for NativeBackend<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeBackend")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("kernel", &self.kernel)
            .finish()
    }
}

impl<K> ArrayBackend for NativeBackend<K>
where K: Blas + Lapack + Clone + Send + Sync + fmt::Debug + 'static
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> bool {
        true
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn array_factory(&self) -> &ArrayFactory {
        self.factory.get_or_init(ArrayFactory::new)
    }

    fn array_routines(&self) -> &dyn ArrayRoutines {
        self.routines.get_or_init(|| BlasArrayRoutines::new(self.kernel.clone()))
    }

    fn linear_algebra_routines(&self) -> &dyn LinearAlgebraRoutines {
        self.linalg.get_or_init(|| LapackRoutines::new(self.kernel.clone()))
    }
}

static BASE: BaseBackend = BaseBackend::new();
static PORTABLE: PortableBackend = PortableBackend::new();
#[cfg(feature = "netlib")]
static NETLIB: NetlibBackend = NetlibBackend::new();

/// The backends built into this crate, in no particular order.
pub fn builtin_backends() -> Vec<&'static dyn ArrayBackend> {
    #[allow(unused_mut)]
    let mut backends: Vec<&'static dyn ArrayBackend> = vec![&BASE, &PORTABLE];
    #[cfg(feature = "netlib")]
    backends.push(&NETLIB);
    backends
}

/// The available backend with the highest priority; the first one listed
/// among equals.
pub fn select_backend<'a>(candidates: &[&'a dyn ArrayBackend]) -> Option<&'a dyn ArrayBackend> {
    let mut selected: Option<&'a dyn ArrayBackend> = None;
    for &backend in candidates {
        if !backend.is_available() {
            debug!("backend {} is not available", backend.name());
            continue;
        }
        if selected.map_or(true, |s| backend.priority() > s.priority()) {
            selected = Some(backend);
        }
    }
    if let Some(backend) = selected {
        debug!("selected backend {} (priority {})", backend.name(), backend.priority());
    }
    selected
}

fn choose(config: &BackendConfig) -> &'static dyn ArrayBackend {
    let candidates = builtin_backends();
    if let Some(ref name) = config.preferred {
        match candidates.iter().find(|b| b.name().eq_ignore_ascii_case(name)) {
            Some(b) if b.is_available() => {
                debug!("using requested backend {}", b.name());
                return *b;
            }
            Some(_) => warn!("requested backend {} is not available", name),
            None => warn!("requested backend {} is unknown", name),
        }
    }
    select_backend(&candidates).unwrap_or(&BASE)
}

static DEFAULT: OnceLock<&'static dyn ArrayBackend> = OnceLock::new();

/// Apply `config` to the process and return the backend it selects.
///
/// The first call to `initialize` or [`default_backend`] fixes the
/// default backend; a later call only updates the logging setting.
pub fn initialize(config: &BackendConfig) -> &'static dyn ArrayBackend {
    QUIET_NATIVE.store(config.quiet_native, Ordering::Relaxed);
    let backend = *DEFAULT.get_or_init(|| choose(config));
    if let Some(ref name) = config.preferred {
        if !backend.name().eq_ignore_ascii_case(name) {
            warn!("default backend is already {}, ignoring {}", backend.name(), name);
        }
    }
    backend
}

/// The process wide default backend, configured from the environment on
/// first use unless [`initialize`] was called before.
pub fn default_backend() -> &'static dyn ArrayBackend {
    *DEFAULT.get_or_init(|| {
        let config = BackendConfig::from_env();
        QUIET_NATIVE.store(config.quiet_native, Ordering::Relaxed);
        choose(&config)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DoubleArray;

    #[derive(Debug)]
    struct Unavailable;

    impl ArrayBackend for Unavailable {
        fn name(&self) -> &'static str {
            "unavailable"
        }

        fn is_available(&self) -> bool {
            false
        }

        fn priority(&self) -> i32 {
            1000
        }

        fn array_factory(&self) -> &ArrayFactory {
            BASE.array_factory()
        }

        fn array_routines(&self) -> &dyn ArrayRoutines {
            BASE.array_routines()
        }

        fn linear_algebra_routines(&self) -> &dyn LinearAlgebraRoutines {
            BASE.linear_algebra_routines()
        }
    }

    #[test]
    fn highest_available_priority_wins() {
        let base = BaseBackend::new();
        let portable = PortableBackend::new();
        let selected = select_backend(&[&base, &Unavailable, &portable]).unwrap();
        assert_eq!(selected.name(), "portable");
        assert!(select_backend(&[&Unavailable]).is_none());
        assert!(select_backend(&[]).is_none());
    }

    #[test]
    fn config_from_variables() {
        let config = BackendConfig::from_vars(Some(" Base ".into()), Some("TRUE".into()));
        assert_eq!(config.preferred.as_deref(), Some("Base"));
        assert!(config.quiet_native);
        let config = BackendConfig::from_vars(Some(String::new()), Some("0".into()));
        assert_eq!(config, BackendConfig::default());
    }

    #[test]
    fn preferred_backend_is_honored() {
        let config = BackendConfig {
            preferred: Some("BASE".into()),
            quiet_native: false,
        };
        assert_eq!(choose(&config).name(), "base");
        let config = BackendConfig {
            preferred: Some("gpu".into()),
            quiet_native: false,
        };
        assert_ne!(choose(&config).name(), "gpu");
    }

    #[test]
    fn routines_are_cached() {
        let backend = PortableBackend::new();
        let a = backend.array_routines() as *const dyn ArrayRoutines as *const ();
        let b = backend.array_routines() as *const dyn ArrayRoutines as *const ();
        assert_eq!(a, b);
        let x = DoubleArray::from_vec(vec![3., 4.]);
        assert_eq!(backend.array_routines().norm2(&x).unwrap(), 5.);
    }
}
