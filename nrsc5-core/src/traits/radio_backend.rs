use std::sync::Arc;

use crate::ffi::raw::RawEvent;
use crate::models::error::RadioError;

/// Callback invoked by a backend for every raw engine event.
///
/// Called on whatever thread the engine uses, one event at a time. The event
/// and all memory it points to are only valid until the callback returns.
pub type RawEventCallback = Arc<dyn Fn(&RawEvent) + Send + Sync + 'static>;

/// The control surface of the native decoding engine.
///
/// Implemented by:
/// - `NativeRadio` (libnrsc5 loaded at runtime, in `nrsc5-native`)
/// - test doubles that fabricate raw events
///
/// # Safety
///
/// Every `RawEvent` an implementation passes to the registered callback must
/// satisfy the contract of [`EventDecoder::decode`](crate::EventDecoder::decode):
/// the live union member matches the discriminant and all pointers reachable
/// from it are null or valid for the duration of the call. Callbacks must not
/// be invoked concurrently with themselves.
pub unsafe trait RadioBackend: Send {
    /// Open an RTL-SDR device.
    fn open(&mut self, device_index: u32, ppm_error: i32) -> Result<(), RadioError>;

    /// Open the engine with no device; samples arrive through `pipe_samples`.
    fn open_pipe(&mut self) -> Result<(), RadioError>;

    /// Release the engine handle. No callbacks are delivered afterwards.
    fn close(&mut self);

    /// Begin delivering events. Fails with [`RadioError::NotOpen`] on a closed handle.
    fn start(&mut self) -> Result<(), RadioError>;

    /// Stop delivering events. A callback already in progress runs to completion.
    fn stop(&mut self) -> Result<(), RadioError>;

    fn frequency(&self) -> f32;

    fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), RadioError>;

    fn gain(&self) -> f32;

    fn set_gain(&mut self, gain_db: f32) -> Result<(), RadioError>;

    fn set_auto_gain(&mut self, enabled: bool) -> Result<(), RadioError>;

    /// Register the event callback for the open handle.
    ///
    /// A closed handle rejects the callback with [`RadioError::NotOpen`]
    /// instead of dropping it.
    fn set_callback(&mut self, callback: RawEventCallback) -> Result<(), RadioError>;

    /// Feed interleaved 8-bit I/Q bytes to a pipe-opened engine.
    fn pipe_samples(&mut self, samples: &[u8]) -> Result<(), RadioError>;
}
