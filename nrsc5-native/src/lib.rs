//! # nrsc5-native
//!
//! libnrsc5 backend for nrsc5-core.
//!
//! Provides:
//! - `Nrsc5Library`: the engine's C entry points, resolved at runtime
//! - `NativeRadio`: `RadioBackend` over one engine handle
//!
//! Nothing is linked at build time. The shared library is opened by
//! `NativeRadio::load`, either by its platform name (`libnrsc5.so`, `libnrsc5.dylib`,
//! `libnrsc5.dll`) or by an explicit path.
//!
//! ## Usage
//! ```ignore
//! use std::sync::Arc;
//! use nrsc5_core::{Event, EventKind, RadioSession, SessionConfiguration};
//! use nrsc5_native::NativeRadio;
//!
//! let radio = NativeRadio::load()?;
//! let mut session = RadioSession::new(radio, Arc::new(|kind: EventKind, event: Event| {
//!     log::info!("{kind}: {event:?}");
//! }));
//! session.open_with(&SessionConfiguration {
//!     frequency_hz: Some(90_500_000.0),
//!     ..Default::default()
//! })?;
//! session.start()?;
//! ```

pub mod library;
pub mod native_radio;

pub use library::{LoadError, Nrsc5Library, DEFAULT_LIBRARY_NAME};
pub use native_radio::NativeRadio;
