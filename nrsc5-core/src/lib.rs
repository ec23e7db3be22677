//! # nrsc5-core
//!
//! Safe, owned event model for the nrsc5 HD Radio decoding engine.
//!
//! The engine reports everything it decodes through one C callback carrying a
//! tagged union. This crate turns each of those raw events into an owned
//! [`Event`] and wraps the engine's control calls in a [`RadioSession`].
//! Backends (libnrsc5 loaded at runtime, test doubles) implement the
//! [`RadioBackend`] trait and plug into the session.
//!
//! ## Architecture
//!
//! ```text
//! nrsc5-core (this crate)
//! ├── models/    ← EventKind, Event, records, registries, errors, config, state
//! ├── ffi/       ← #[repr(C)] event layout, linked-list flattening
//! ├── decode/    ← EventDecoder (raw event → Event)
//! ├── traits/    ← RadioBackend, EventHandler
//! ├── session/   ← RadioSession (lifecycle + callback dispatch)
//! └── storage/   ← WAV recording, delivered-file store
//! ```

pub mod decode;
pub mod ffi;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use decode::event_decoder::{decode_event, EventDecoder};
pub use models::config::SessionConfiguration;
pub use models::diagnostics::SessionDiagnostics;
pub use models::error::{DecodeError, RadioError};
pub use models::event::{Event, EventKind};
pub use models::records::{
    AudioComponent, AudioSamples, Ber, ComponentDetail, DataComponent, HdcFrame, Id3, IqSamples,
    Lot, Mer, SigComponent, SigService, StationGuide, Ufid, Xhdr,
};
pub use models::registry::{ComponentKind, MimeType, ServiceKind};
pub use models::state::{SampleSource, SessionState};
pub use session::radio::RadioSession;
pub use storage::lot_store::{LotMetadata, LotStore};
pub use storage::wav_writer::AudioFileWriter;
pub use traits::event_handler::EventHandler;
pub use traits::radio_backend::{RadioBackend, RawEventCallback};
