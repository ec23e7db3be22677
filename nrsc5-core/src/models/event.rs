use std::fmt;

use serde::{Deserialize, Serialize};

use super::records::{AudioSamples, Ber, HdcFrame, Id3, IqSamples, Lot, Mer, StationGuide};

/// Discriminant of an engine event, with the codes libnrsc5 uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    LostDevice,
    Iq,
    Sync,
    LostSync,
    Mer,
    Ber,
    Hdc,
    Audio,
    Id3,
    Sig,
    Lot,
}

impl EventKind {
    pub const ALL: [EventKind; 11] = [
        Self::LostDevice,
        Self::Iq,
        Self::Sync,
        Self::LostSync,
        Self::Mer,
        Self::Ber,
        Self::Hdc,
        Self::Audio,
        Self::Id3,
        Self::Sig,
        Self::Lot,
    ];

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::LostDevice => "lost_device",
            Self::Iq => "iq",
            Self::Sync => "sync",
            Self::LostSync => "lost_sync",
            Self::Mer => "mer",
            Self::Ber => "ber",
            Self::Hdc => "hdc",
            Self::Audio => "audio",
            Self::Id3 => "id3",
            Self::Sig => "sig",
            Self::Lot => "lot",
        }
    }
}

impl TryFrom<u32> for EventKind {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded engine event. Owns all of its data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    LostDevice,
    Iq(IqSamples),
    Sync,
    LostSync,
    Mer(Mer),
    Ber(Ber),
    Hdc(HdcFrame),
    Audio(AudioSamples),
    Id3(Id3),
    Sig(StationGuide),
    Lot(Lot),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::LostDevice => EventKind::LostDevice,
            Self::Iq(_) => EventKind::Iq,
            Self::Sync => EventKind::Sync,
            Self::LostSync => EventKind::LostSync,
            Self::Mer(_) => EventKind::Mer,
            Self::Ber(_) => EventKind::Ber,
            Self::Hdc(_) => EventKind::Hdc,
            Self::Audio(_) => EventKind::Audio,
            Self::Id3(_) => EventKind::Id3,
            Self::Sig(_) => EventKind::Sig,
            Self::Lot(_) => EventKind::Lot,
        }
    }
}
