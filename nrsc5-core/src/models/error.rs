use thiserror::Error;

use super::event::EventKind;

/// Errors raised while turning a raw engine event into an [`Event`](super::event::Event).
///
/// Every variant names the offending field and the event kind it was found
/// under. A failed decode never yields a partial record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown event kind code {code}")]
    UnknownEventKind { code: u32 },

    #[error("unknown {field} code {code:#x} in {event} event")]
    UnknownCode {
        event: EventKind,
        field: &'static str,
        code: u32,
    },

    #[error("invalid sentinel value {value} for {field} in {event} event")]
    InvalidSentinel {
        event: EventKind,
        field: &'static str,
        value: i32,
    },

    #[error("{field} in {event} event is not valid UTF-8")]
    InvalidText {
        event: EventKind,
        field: &'static str,
    },

    #[error("{field} in {event} event has a length but no data")]
    NullPayload {
        event: EventKind,
        field: &'static str,
    },

    #[error("{field} length {len} in {event} event is out of range")]
    InvalidLength {
        event: EventKind,
        field: &'static str,
        len: usize,
    },

    #[error("{field} chain in {event} event exceeds {limit} nodes")]
    ChainTooLong {
        event: EventKind,
        field: &'static str,
        limit: usize,
    },
}

impl DecodeError {
    /// The event kind under which the error occurred, if the discriminant itself was valid.
    pub fn event_kind(&self) -> Option<EventKind> {
        match self {
            Self::UnknownEventKind { .. } => None,
            Self::UnknownCode { event, .. }
            | Self::InvalidSentinel { event, .. }
            | Self::InvalidText { event, .. }
            | Self::NullPayload { event, .. }
            | Self::InvalidLength { event, .. }
            | Self::ChainTooLong { event, .. } => Some(*event),
        }
    }
}

/// Errors from session control calls that cross the engine boundary.
///
/// Each failing operation has its own variant; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RadioError {
    #[error("failed to open device {device_index} (code {code})")]
    OpenFailed { device_index: u32, code: i32 },

    #[error("failed to open pipe (code {code})")]
    OpenPipeFailed { code: i32 },

    #[error("failed to set frequency to {frequency_hz} Hz (code {code})")]
    SetFrequencyFailed { frequency_hz: f32, code: i32 },

    #[error("failed to set gain to {gain_db} dB (code {code})")]
    SetGainFailed { gain_db: f32, code: i32 },

    #[error("failed to pipe samples (code {code})")]
    PipeSamplesFailed { code: i32 },

    #[error("sample buffer length {len} is not a multiple of 4")]
    InvalidSampleLength { len: usize },

    #[error("session is already open")]
    AlreadyOpen,

    #[error("session is not open")]
    NotOpen,

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("configuration failed: {0}")]
    ConfigurationFailed(String),

    #[error("failed to load decoder library: {0}")]
    LibraryLoad(String),

    #[error("missing decoder symbol: {0}")]
    MissingSymbol(String),

    #[error("storage error: {0}")]
    StorageError(String),
}
