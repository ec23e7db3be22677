use serde::{Deserialize, Serialize};

use super::registry::{ComponentKind, MimeType, ServiceKind};

/// Bytes per decoded audio sample (16-bit PCM).
pub const AUDIO_SAMPLE_BYTES: usize = 2;

/// Raw 8-bit I/Q samples, interleaved as `I, Q, I, Q, ...`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IqSamples {
    pub data: Vec<u8>,
}

/// Modulation error ratio of the lower and upper sidebands, in dB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mer {
    pub lower: f32,
    pub upper: f32,
}

/// Channel bit error rate, as a fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ber {
    pub cber: f32,
}

/// One compressed HDC audio frame for a program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HdcFrame {
    pub program: u32,
    pub data: Vec<u8>,
}

/// Decoded audio for a program: interleaved stereo 16-bit PCM in native byte order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioSamples {
    pub program: u32,
    pub data: Vec<u8>,
}

impl AudioSamples {
    /// Number of 16-bit samples (both channels counted).
    pub fn sample_count(&self) -> usize {
        self.data.len() / AUDIO_SAMPLE_BYTES
    }

    /// Copies the payload out as 16-bit samples.
    pub fn samples(&self) -> Vec<i16> {
        self.data
            .chunks_exact(AUDIO_SAMPLE_BYTES)
            .map(|pair| i16::from_ne_bytes([pair[0], pair[1]]))
            .collect()
    }
}

/// Unique file identifier frame of an ID3 tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ufid {
    pub owner: Option<String>,
    pub id: Option<String>,
}

/// NRSC-5 extended header (XHDR) frame of an ID3 tag.
///
/// `lot` refers to the [`Lot`] carrying the associated image, when present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Xhdr {
    pub mime: Option<MimeType>,
    pub param: Option<u32>,
    pub lot: Option<u32>,
}

/// Program service data (ID3) for one program.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Id3 {
    pub program: u32,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    pub ufid: Ufid,
    pub xhdr: Xhdr,
}

/// Station information guide: the services the station advertises, in broadcast order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationGuide {
    pub services: Vec<SigService>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigService {
    pub kind: ServiceKind,
    pub number: u16,
    pub name: Option<String>,
    pub components: Vec<SigComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioComponent {
    pub port: u8,
    pub kind: u8,
    pub mime: MimeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataComponent {
    pub port: u16,
    pub service_data_type: u16,
    pub kind: u8,
    pub mime: MimeType,
}

/// The populated half of a component; its variant is the component's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentDetail {
    Audio(AudioComponent),
    Data(DataComponent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigComponent {
    pub id: u8,
    pub detail: ComponentDetail,
}

impl SigComponent {
    pub fn kind(&self) -> ComponentKind {
        match self.detail {
            ComponentDetail::Audio(_) => ComponentKind::Audio,
            ComponentDetail::Data(_) => ComponentKind::Data,
        }
    }

    pub fn audio(&self) -> Option<&AudioComponent> {
        match &self.detail {
            ComponentDetail::Audio(audio) => Some(audio),
            ComponentDetail::Data(_) => None,
        }
    }

    pub fn data(&self) -> Option<&DataComponent> {
        match &self.detail {
            ComponentDetail::Data(data) => Some(data),
            ComponentDetail::Audio(_) => None,
        }
    }

    pub fn mime(&self) -> MimeType {
        match self.detail {
            ComponentDetail::Audio(audio) => audio.mime,
            ComponentDetail::Data(data) => data.mime,
        }
    }
}

/// A file delivered over a data service (album art, station logo, traffic data, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lot {
    pub port: u16,
    pub lot: u32,
    pub mime: MimeType,
    pub name: Option<String>,
    pub data: Vec<u8>,
}
