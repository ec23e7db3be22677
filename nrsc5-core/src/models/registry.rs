//! Closed code registries used inside event payloads.
//!
//! Codes are fixed by the NRSC-5 wire format and by libnrsc5; they are not
//! contiguous for [`MimeType`], so lookups go through explicit tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a service announced in the station information guide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceKind {
    Audio,
    Data,
}

impl ServiceKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Audio),
            1 => Some(Self::Data),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Audio => 0,
            Self::Data => 1,
        }
    }
}

impl TryFrom<u8> for ServiceKind {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Audio => "audio",
            Self::Data => "data",
        })
    }
}

/// Kind of a component within a service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Audio,
    Data,
}

impl ComponentKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Audio),
            1 => Some(Self::Data),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Audio => 0,
            Self::Data => 1,
        }
    }
}

impl TryFrom<u8> for ComponentKind {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Audio => "audio",
            Self::Data => "data",
        })
    }
}

/// MIME identifiers carried as 32-bit hashes in SIG, ID3 XHDR and LOT payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MimeType {
    PrimaryImage,
    StationLogo,
    Navteq,
    HereTpeg,
    HereImage,
    HdTmc,
    Hdc,
    Text,
    Jpeg,
    Png,
    TtnTpeg1,
    TtnTpeg2,
    TtnTpeg3,
    TtnStmTraffic,
    TtnStmWeather,
}

const MIME_CODES: [(MimeType, u32); 15] = [
    (MimeType::PrimaryImage, 0xBE4B_7536),
    (MimeType::StationLogo, 0xD9C7_2536),
    (MimeType::Navteq, 0x2D42_AC3E),
    (MimeType::HereTpeg, 0x82F0_3DFC),
    (MimeType::HereImage, 0xB7F0_3DFC),
    (MimeType::HdTmc, 0xEECB_55B6),
    (MimeType::Hdc, 0x4DC6_6C5A),
    (MimeType::Text, 0xBB49_2AAC),
    (MimeType::Jpeg, 0x1E65_3E9C),
    (MimeType::Png, 0x4F32_8CA0),
    (MimeType::TtnTpeg1, 0xB39E_BEB2),
    (MimeType::TtnTpeg2, 0x4EB0_3469),
    (MimeType::TtnTpeg3, 0x5210_3469),
    (MimeType::TtnStmTraffic, 0xFF84_22D7),
    (MimeType::TtnStmWeather, 0xEF04_2E96),
];

impl MimeType {
    pub fn from_code(code: u32) -> Option<Self> {
        MIME_CODES
            .iter()
            .find(|(_, c)| *c == code)
            .map(|(mime, _)| *mime)
    }

    pub fn code(self) -> u32 {
        match self {
            Self::PrimaryImage => 0xBE4B_7536,
            Self::StationLogo => 0xD9C7_2536,
            Self::Navteq => 0x2D42_AC3E,
            Self::HereTpeg => 0x82F0_3DFC,
            Self::HereImage => 0xB7F0_3DFC,
            Self::HdTmc => 0xEECB_55B6,
            Self::Hdc => 0x4DC6_6C5A,
            Self::Text => 0xBB49_2AAC,
            Self::Jpeg => 0x1E65_3E9C,
            Self::Png => 0x4F32_8CA0,
            Self::TtnTpeg1 => 0xB39E_BEB2,
            Self::TtnTpeg2 => 0x4EB0_3469,
            Self::TtnTpeg3 => 0x5210_3469,
            Self::TtnStmTraffic => 0xFF84_22D7,
            Self::TtnStmWeather => 0xEF04_2E96,
        }
    }

    /// File extension used when storing a delivered file of this type.
    pub fn file_extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Text => "txt",
            Self::Hdc => "hdc",
            _ => "bin",
        }
    }
}

impl TryFrom<u32> for MimeType {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(code)
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PrimaryImage => "primary-image",
            Self::StationLogo => "station-logo",
            Self::Navteq => "navteq",
            Self::HereTpeg => "here-tpeg",
            Self::HereImage => "here-image",
            Self::HdTmc => "hd-tmc",
            Self::Hdc => "hdc",
            Self::Text => "text",
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::TtnTpeg1 => "ttn-tpeg-1",
            Self::TtnTpeg2 => "ttn-tpeg-2",
            Self::TtnTpeg3 => "ttn-tpeg-3",
            Self::TtnStmTraffic => "ttn-stm-traffic",
            Self::TtnStmWeather => "ttn-stm-weather",
        };
        f.write_str(name)
    }
}
