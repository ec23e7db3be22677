//! `RadioBackend` over a runtime-loaded libnrsc5.
//!
//! The engine calls back into Rust through [`event_trampoline`]. Its opaque
//! context pointer is a boxed [`RawEventCallback`] owned by the
//! [`NativeRadio`], so the context lives exactly as long as the handle that
//! can invoke it.

use std::any::Any;
use std::ffi::{c_int, c_uint, c_void, OsStr};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;
use std::sync::Arc;

use nrsc5_core::ffi::raw::RawEvent;
use nrsc5_core::{RadioBackend, RadioError, RawEventCallback};

use crate::library::{Nrsc5Handle, Nrsc5Library};

/// libnrsc5 consumes complex 8-bit samples two at a time.
const PIPE_SAMPLE_ALIGN: usize = 4;

/// One libnrsc5 engine handle.
pub struct NativeRadio {
    library: Arc<Nrsc5Library>,
    handle: Nrsc5Handle,
    callback: Option<Box<RawEventCallback>>,
}

// SAFETY: the handle is only touched through `&mut self` or `&self` getters,
// and libnrsc5 handles may be driven from any thread.
unsafe impl Send for NativeRadio {}

impl NativeRadio {
    /// Load libnrsc5 from the system search path.
    pub fn load() -> Result<Self, RadioError> {
        Ok(Self::with_library(Arc::new(Nrsc5Library::load()?)))
    }

    /// Load libnrsc5 from an explicit path.
    pub fn load_from(path: impl AsRef<OsStr>) -> Result<Self, RadioError> {
        Ok(Self::with_library(Arc::new(Nrsc5Library::load_from(path)?)))
    }

    /// Create a closed radio over an already loaded library.
    pub fn with_library(library: Arc<Nrsc5Library>) -> Self {
        Self {
            library,
            handle: ptr::null_mut(),
            callback: None,
        }
    }

    pub fn library(&self) -> &Arc<Nrsc5Library> {
        &self.library
    }

    pub fn is_open(&self) -> bool {
        !self.handle.is_null()
    }

    // --- Internal helpers ---

    fn open_handle(&self) -> Result<Nrsc5Handle, RadioError> {
        if self.handle.is_null() {
            Err(RadioError::NotOpen)
        } else {
            Ok(self.handle)
        }
    }

    fn ensure_closed(&self) -> Result<(), RadioError> {
        if self.handle.is_null() {
            Ok(())
        } else {
            Err(RadioError::AlreadyOpen)
        }
    }

    fn read_float(&self, getter: unsafe extern "C" fn(Nrsc5Handle, *mut f32)) -> f32 {
        let mut value = 0.0f32;
        if !self.handle.is_null() {
            // SAFETY: the handle is open and `value` outlives the call.
            unsafe { getter(self.handle, &mut value) };
        }
        value
    }
}

// SAFETY: libnrsc5 only invokes the callback with a valid event whose union
// member matches its discriminant, from its single worker thread.
unsafe impl RadioBackend for NativeRadio {
    fn open(&mut self, device_index: u32, ppm_error: i32) -> Result<(), RadioError> {
        self.ensure_closed()?;
        let index = c_int::try_from(device_index).map_err(|_| {
            RadioError::ConfigurationFailed(format!("device index {device_index} out of range"))
        })?;

        let mut handle: Nrsc5Handle = ptr::null_mut();
        // SAFETY: `handle` is a valid out-pointer for the duration of the call.
        let code = unsafe { (self.library.open)(&mut handle, index, ppm_error) };
        if code != 0 || handle.is_null() {
            return Err(RadioError::OpenFailed { device_index, code });
        }
        self.handle = handle;
        log::debug!("opened device {} (ppm {})", device_index, ppm_error);
        Ok(())
    }

    fn open_pipe(&mut self) -> Result<(), RadioError> {
        self.ensure_closed()?;

        let mut handle: Nrsc5Handle = ptr::null_mut();
        // SAFETY: `handle` is a valid out-pointer for the duration of the call.
        let code = unsafe { (self.library.open_pipe)(&mut handle) };
        if code != 0 || handle.is_null() {
            return Err(RadioError::OpenPipeFailed { code });
        }
        self.handle = handle;
        log::debug!("opened pipe");
        Ok(())
    }

    fn close(&mut self) {
        if self.handle.is_null() {
            return;
        }
        // SAFETY: the handle is open; libnrsc5 joins its worker before returning.
        unsafe { (self.library.close)(self.handle) };
        self.handle = ptr::null_mut();
        self.callback = None;
        log::debug!("closed engine handle");
    }

    fn start(&mut self) -> Result<(), RadioError> {
        let handle = self.open_handle()?;
        // SAFETY: the handle is open.
        unsafe { (self.library.start)(handle) };
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RadioError> {
        let handle = self.open_handle()?;
        // SAFETY: the handle is open.
        unsafe { (self.library.stop)(handle) };
        Ok(())
    }

    fn frequency(&self) -> f32 {
        self.read_float(self.library.get_frequency)
    }

    fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), RadioError> {
        let handle = self.open_handle()?;
        // SAFETY: the handle is open.
        let code = unsafe { (self.library.set_frequency)(handle, frequency_hz) };
        if code != 0 {
            return Err(RadioError::SetFrequencyFailed { frequency_hz, code });
        }
        Ok(())
    }

    fn gain(&self) -> f32 {
        self.read_float(self.library.get_gain)
    }

    fn set_gain(&mut self, gain_db: f32) -> Result<(), RadioError> {
        let handle = self.open_handle()?;
        // SAFETY: the handle is open.
        let code = unsafe { (self.library.set_gain)(handle, gain_db) };
        if code != 0 {
            return Err(RadioError::SetGainFailed { gain_db, code });
        }
        Ok(())
    }

    fn set_auto_gain(&mut self, enabled: bool) -> Result<(), RadioError> {
        let handle = self.open_handle()?;
        // SAFETY: the handle is open.
        unsafe { (self.library.set_auto_gain)(handle, c_int::from(enabled)) };
        Ok(())
    }

    fn set_callback(&mut self, callback: RawEventCallback) -> Result<(), RadioError> {
        let handle = self.open_handle()?;
        let context = Box::new(callback);
        let opaque = ptr::from_ref::<RawEventCallback>(&*context).cast_mut().cast::<c_void>();
        // SAFETY: `opaque` points into a box kept in `self.callback` until the
        // handle is closed or the callback replaced.
        unsafe { (self.library.set_callback)(handle, event_trampoline, opaque) };
        self.callback = Some(context);
        Ok(())
    }

    fn pipe_samples(&mut self, samples: &[u8]) -> Result<(), RadioError> {
        if samples.len() % PIPE_SAMPLE_ALIGN != 0 {
            return Err(RadioError::InvalidSampleLength { len: samples.len() });
        }
        let len = c_uint::try_from(samples.len())
            .map_err(|_| RadioError::InvalidSampleLength { len: samples.len() })?;
        let handle = self.open_handle()?;
        // SAFETY: the handle is open and `samples` is valid for `len` bytes.
        let code = unsafe { (self.library.pipe_samples)(handle, samples.as_ptr(), len) };
        if code != 0 {
            return Err(RadioError::PipeSamplesFailed { code });
        }
        Ok(())
    }
}

impl Drop for NativeRadio {
    fn drop(&mut self) {
        self.close();
    }
}

/// C entry point registered with `nrsc5_set_callback`.
///
/// Panics never unwind into the engine; they are logged and the event dropped.
///
/// # Safety
///
/// `opaque` must be null or point to a live `RawEventCallback`, and `event`
/// must be null or valid for the duration of the call.
pub(crate) unsafe extern "C" fn event_trampoline(event: *const RawEvent, opaque: *mut c_void) {
    if event.is_null() || opaque.is_null() {
        return;
    }
    // SAFETY: guaranteed by the caller.
    let (callback, event) = unsafe { (&*opaque.cast::<RawEventCallback>(), &*event) };
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback(event))) {
        log::error!("event callback panicked: {}", panic_message(payload.as_ref()));
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::stub;
    use nrsc5_core::EventKind;
    use parking_lot::Mutex;

    fn opaque(callback: &RawEventCallback) -> *mut c_void {
        ptr::from_ref(callback).cast_mut().cast()
    }

    #[test]
    fn trampoline_forwards_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: RawEventCallback = Arc::new(move |raw: &RawEvent| sink.lock().push(raw.event));

        let events = [
            RawEvent::bare(EventKind::Sync.code()),
            RawEvent::bare(EventKind::LostSync.code()),
        ];
        for raw in &events {
            unsafe { event_trampoline(raw, opaque(&callback)) };
        }
        assert_eq!(
            *seen.lock(),
            vec![EventKind::Sync.code(), EventKind::LostSync.code()]
        );
    }

    #[test]
    fn trampoline_ignores_null_pointers() {
        let calls = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&calls);
        let callback: RawEventCallback = Arc::new(move |_: &RawEvent| *counter.lock() += 1);
        let event = RawEvent::bare(EventKind::Sync.code());

        unsafe {
            event_trampoline(ptr::null(), opaque(&callback));
            event_trampoline(&event, ptr::null_mut());
        }
        assert_eq!(*calls.lock(), 0);
    }

    #[test]
    fn trampoline_contains_panics() {
        let callback: RawEventCallback = Arc::new(|_: &RawEvent| panic!("handler failed"));
        let event = RawEvent::bare(EventKind::Sync.code());
        unsafe { event_trampoline(&event, opaque(&callback)) };
    }

    #[test]
    fn panic_message_extracts_text() {
        let boxed: Box<dyn Any + Send> = Box::new("static message");
        assert_eq!(panic_message(boxed.as_ref()), "static message");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("owned message"));
        assert_eq!(panic_message(boxed.as_ref()), "owned message");
        let boxed: Box<dyn Any + Send> = Box::new(7u8);
        assert_eq!(panic_message(boxed.as_ref()), "non-string panic payload");
    }

    fn stub_radio() -> NativeRadio {
        NativeRadio::with_library(Arc::new(stub::library()))
    }

    fn noop_callback() -> RawEventCallback {
        Arc::new(|_: &RawEvent| {})
    }

    #[test]
    fn closed_handle_rejects_control_calls() {
        let mut radio = stub_radio();
        assert!(!radio.is_open());

        assert_eq!(radio.start(), Err(RadioError::NotOpen));
        assert_eq!(radio.stop(), Err(RadioError::NotOpen));
        assert_eq!(radio.set_auto_gain(true), Err(RadioError::NotOpen));
        assert_eq!(radio.set_frequency(88_100_000.0), Err(RadioError::NotOpen));
        assert_eq!(radio.set_callback(noop_callback()), Err(RadioError::NotOpen));
        assert!(radio.callback.is_none());
    }

    #[test]
    fn open_handle_accepts_control_calls() {
        let mut radio = stub_radio();
        radio.open_pipe().unwrap();
        assert!(radio.is_open());
        assert_eq!(radio.open(0, 0), Err(RadioError::AlreadyOpen));

        radio.set_callback(noop_callback()).unwrap();
        assert!(radio.callback.is_some());
        radio.set_auto_gain(false).unwrap();
        radio.start().unwrap();
        radio.stop().unwrap();
        assert_eq!(radio.frequency(), 1.5);

        radio.close();
        assert!(!radio.is_open());
        assert!(radio.callback.is_none());
        assert_eq!(radio.start(), Err(RadioError::NotOpen));
    }

    #[test]
    fn nonzero_return_codes_map_to_errors() {
        let mut radio = stub_radio();
        radio.open(0, 0).unwrap();
        assert_eq!(
            radio.set_frequency(-1.0),
            Err(RadioError::SetFrequencyFailed {
                frequency_hz: -1.0,
                code: stub::REJECTED,
            })
        );
        assert_eq!(
            radio.set_gain(-2.0),
            Err(RadioError::SetGainFailed {
                gain_db: -2.0,
                code: stub::REJECTED,
            })
        );
        radio.pipe_samples(&[0u8; 8]).unwrap();
        assert_eq!(
            radio.pipe_samples(&[0u8; 5]),
            Err(RadioError::InvalidSampleLength { len: 5 })
        );
    }

    #[test]
    fn load_from_missing_path_fails() {
        let err = NativeRadio::load_from("/nonexistent/libnrsc5.so").err().unwrap();
        assert!(matches!(err, RadioError::LibraryLoad(_)));
    }
}
