//! Runtime binding to the libnrsc5 shared library.
//!
//! Symbols are resolved once into a table of plain function pointers. The
//! [`Library`] is kept alive next to them for as long as the table exists.

use std::ffi::{c_int, c_uint, c_void, OsStr};

use libloading::Library;
use thiserror::Error;

use nrsc5_core::ffi::raw::RawEvent;
use nrsc5_core::RadioError;

/// Platform file name of the decoder library.
#[cfg(target_os = "windows")]
pub const DEFAULT_LIBRARY_NAME: &str = "libnrsc5.dll";
#[cfg(target_os = "macos")]
pub const DEFAULT_LIBRARY_NAME: &str = "libnrsc5.dylib";
#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub const DEFAULT_LIBRARY_NAME: &str = "libnrsc5.so";

/// Opaque `nrsc5_t` handle.
pub type Nrsc5Handle = *mut c_void;

/// `void (*)(const nrsc5_event_t *evt, void *opaque)`
pub type EventCallbackFn = unsafe extern "C" fn(event: *const RawEvent, opaque: *mut c_void);

type OpenFn = unsafe extern "C" fn(*mut Nrsc5Handle, c_int, c_int) -> c_int;
type OpenPipeFn = unsafe extern "C" fn(*mut Nrsc5Handle) -> c_int;
type HandleFn = unsafe extern "C" fn(Nrsc5Handle);
type GetFloatFn = unsafe extern "C" fn(Nrsc5Handle, *mut f32);
type SetFloatFn = unsafe extern "C" fn(Nrsc5Handle, f32) -> c_int;
type SetAutoGainFn = unsafe extern "C" fn(Nrsc5Handle, c_int);
type SetCallbackFn = unsafe extern "C" fn(Nrsc5Handle, EventCallbackFn, *mut c_void);
type PipeSamplesFn = unsafe extern "C" fn(Nrsc5Handle, *const u8, c_uint) -> c_int;

/// Failures while binding the shared library.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: libloading::Error,
    },

    #[error("{name}: {source}")]
    Symbol {
        name: &'static str,
        #[source]
        source: libloading::Error,
    },
}

impl From<LoadError> for RadioError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Open { .. } => RadioError::LibraryLoad(err.to_string()),
            LoadError::Symbol { .. } => RadioError::MissingSymbol(err.to_string()),
        }
    }
}

/// Resolved libnrsc5 entry points.
pub struct Nrsc5Library {
    pub(crate) open: OpenFn,
    pub(crate) open_pipe: OpenPipeFn,
    pub(crate) close: HandleFn,
    pub(crate) start: HandleFn,
    pub(crate) stop: HandleFn,
    pub(crate) get_frequency: GetFloatFn,
    pub(crate) set_frequency: SetFloatFn,
    pub(crate) get_gain: GetFloatFn,
    pub(crate) set_gain: SetFloatFn,
    pub(crate) set_auto_gain: SetAutoGainFn,
    pub(crate) set_callback: SetCallbackFn,
    pub(crate) pipe_samples: PipeSamplesFn,
    _library: Library,
}

impl Nrsc5Library {
    /// Load the library by its platform file name from the system search path.
    pub fn load() -> Result<Self, LoadError> {
        Self::load_from(DEFAULT_LIBRARY_NAME)
    }

    /// Load the library from an explicit file name or path.
    pub fn load_from(path: impl AsRef<OsStr>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        // SAFETY: libnrsc5 has no load-time initialisers with preconditions.
        let library = unsafe { Library::new(path) }.map_err(|source| LoadError::Open {
            path: path.to_string_lossy().into_owned(),
            source,
        })?;
        log::debug!("loaded {}", path.to_string_lossy());

        // SAFETY: each type alias matches the C prototype of the named symbol.
        unsafe {
            Ok(Self {
                open: symbol(&library, "nrsc5_open")?,
                open_pipe: symbol(&library, "nrsc5_open_pipe")?,
                close: symbol(&library, "nrsc5_close")?,
                start: symbol(&library, "nrsc5_start")?,
                stop: symbol(&library, "nrsc5_stop")?,
                get_frequency: symbol(&library, "nrsc5_get_frequency")?,
                set_frequency: symbol(&library, "nrsc5_set_frequency")?,
                get_gain: symbol(&library, "nrsc5_get_gain")?,
                set_gain: symbol(&library, "nrsc5_set_gain")?,
                set_auto_gain: symbol(&library, "nrsc5_set_auto_gain")?,
                set_callback: symbol(&library, "nrsc5_set_callback")?,
                pipe_samples: symbol(&library, "nrsc5_pipe_samples")?,
                _library: library,
            })
        }
    }
}

/// Copy a function pointer out of `library`.
///
/// # Safety
///
/// `T` must be the exact function pointer type of the symbol, and the result
/// must not outlive `library`.
unsafe fn symbol<T: Copy>(library: &Library, name: &'static str) -> Result<T, LoadError> {
    let symbol = unsafe { library.get::<T>(name.as_bytes()) }
        .map_err(|source| LoadError::Symbol { name, source })?;
    Ok(*symbol)
}
