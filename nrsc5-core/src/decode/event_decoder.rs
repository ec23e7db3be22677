//! Decoding of raw engine events into owned values.
//!
//! Everything an event points at (strings, byte buffers, the station guide's
//! nested lists) is copied before the callback returns. A rejected field
//! fails the whole event; no partial record is produced.

use std::ffi::{c_char, c_int, CStr};
use std::slice;

use crate::ffi::chain::{flatten_chain, ChainError};
use crate::ffi::raw::{RawEvent, RawId3, RawLot, RawSig, RawSigComponent, RawSigService};
use crate::models::config::DEFAULT_MAX_CHAIN_LEN;
use crate::models::error::DecodeError;
use crate::models::event::{Event, EventKind};
use crate::models::records::{
    AudioComponent, AudioSamples, Ber, ComponentDetail, DataComponent, HdcFrame, Id3, IqSamples,
    Lot, Mer, SigComponent, SigService, StationGuide, Ufid, Xhdr, AUDIO_SAMPLE_BYTES,
};
use crate::models::registry::{ComponentKind, MimeType, ServiceKind};

/// Wire value meaning "no parameter" / "no LOT" in an XHDR frame.
const XHDR_ABSENT: c_int = -1;

/// Wire value meaning "no MIME type" in an XHDR frame.
const XHDR_NO_MIME: u32 = 0;

/// Turns raw engine events into owned [`Event`]s.
///
/// Stateless apart from the traversal limit, so one decoder can serve any
/// number of callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDecoder {
    max_chain_len: usize,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHAIN_LEN)
    }
}

impl EventDecoder {
    pub fn new(max_chain_len: usize) -> Self {
        Self { max_chain_len }
    }

    pub fn max_chain_len(&self) -> usize {
        self.max_chain_len
    }

    /// Decode one event, copying everything it references into owned memory.
    ///
    /// # Safety
    ///
    /// The union member selected by `raw.event` must be initialized, and every
    /// pointer reachable from it (strings, byte buffers, linked lists) must be
    /// null or valid for the duration of the call. Byte buffers must hold at
    /// least the number of bytes their length field announces.
    pub unsafe fn decode(&self, raw: &RawEvent) -> Result<Event, DecodeError> {
        let kind =
            EventKind::from_code(raw.event).ok_or(DecodeError::UnknownEventKind { code: raw.event })?;

        let event = match kind {
            EventKind::LostDevice => Event::LostDevice,
            EventKind::Sync => Event::Sync,
            EventKind::LostSync => Event::LostSync,
            EventKind::Iq => {
                let iq = unsafe { raw.u.iq };
                Event::Iq(IqSamples {
                    data: unsafe { copy_bytes(kind, "data", iq.data, iq.count)? },
                })
            }
            EventKind::Mer => {
                let mer = unsafe { raw.u.mer };
                Event::Mer(Mer {
                    lower: mer.lower,
                    upper: mer.upper,
                })
            }
            EventKind::Ber => {
                let ber = unsafe { raw.u.ber };
                Event::Ber(Ber { cber: ber.cber })
            }
            EventKind::Hdc => {
                let hdc = unsafe { raw.u.hdc };
                Event::Hdc(HdcFrame {
                    program: hdc.program,
                    data: unsafe { copy_bytes(kind, "data", hdc.data, hdc.count)? },
                })
            }
            EventKind::Audio => {
                let audio = unsafe { raw.u.audio };
                let len = audio
                    .count
                    .checked_mul(AUDIO_SAMPLE_BYTES)
                    .ok_or(DecodeError::InvalidLength {
                        event: kind,
                        field: "count",
                        len: audio.count,
                    })?;
                Event::Audio(AudioSamples {
                    program: audio.program,
                    data: unsafe { copy_bytes(kind, "data", audio.data.cast::<u8>(), len)? },
                })
            }
            EventKind::Id3 => Event::Id3(unsafe { decode_id3(&raw.u.id3)? }),
            EventKind::Sig => Event::Sig(unsafe { self.decode_sig(&raw.u.sig)? }),
            EventKind::Lot => Event::Lot(unsafe { decode_lot(&raw.u.lot)? }),
        };

        Ok(event)
    }

    unsafe fn decode_sig(&self, sig: &RawSig) -> Result<StationGuide, DecodeError> {
        let services = unsafe {
            flatten_chain(sig.services, self.max_chain_len, |service| self.decode_service(service))
        }
        .map_err(|e| chain_error(e, "services"))?;
        Ok(StationGuide { services })
    }

    unsafe fn decode_service(&self, service: &RawSigService) -> Result<SigService, DecodeError> {
        let kind = ServiceKind::from_code(service.kind).ok_or(DecodeError::UnknownCode {
            event: EventKind::Sig,
            field: "service type",
            code: u32::from(service.kind),
        })?;
        let name = unsafe { optional_text(EventKind::Sig, "service name", service.name)? };
        let components = unsafe {
            flatten_chain(service.components, self.max_chain_len, |component| {
                decode_component(component)
            })
        }
        .map_err(|e| chain_error(e, "components"))?;

        Ok(SigService {
            kind,
            number: service.number,
            name,
            components,
        })
    }
}

/// Decode one event with the default traversal limit.
///
/// # Safety
///
/// See [`EventDecoder::decode`].
pub unsafe fn decode_event(raw: &RawEvent) -> Result<Event, DecodeError> {
    unsafe { EventDecoder::default().decode(raw) }
}

fn chain_error(err: ChainError<DecodeError>, field: &'static str) -> DecodeError {
    match err {
        ChainError::TooLong { limit } => DecodeError::ChainTooLong {
            event: EventKind::Sig,
            field,
            limit,
        },
        ChainError::Node(inner) => inner,
    }
}

fn decode_component(component: &RawSigComponent) -> Result<SigComponent, DecodeError> {
    let kind = ComponentKind::from_code(component.kind).ok_or(DecodeError::UnknownCode {
        event: EventKind::Sig,
        field: "component type",
        code: u32::from(component.kind),
    })?;

    // The kind selects which union member the engine filled in.
    let detail = match kind {
        ComponentKind::Audio => {
            let audio = unsafe { component.u.audio };
            ComponentDetail::Audio(AudioComponent {
                port: audio.port,
                kind: audio.kind,
                mime: required_mime(EventKind::Sig, "component mime", audio.mime)?,
            })
        }
        ComponentKind::Data => {
            let data = unsafe { component.u.data };
            ComponentDetail::Data(DataComponent {
                port: data.port,
                service_data_type: data.service_data_type,
                kind: data.kind,
                mime: required_mime(EventKind::Sig, "component mime", data.mime)?,
            })
        }
    };

    Ok(SigComponent {
        id: component.id,
        detail,
    })
}

unsafe fn decode_id3(id3: &RawId3) -> Result<Id3, DecodeError> {
    const EVENT: EventKind = EventKind::Id3;
    unsafe {
        Ok(Id3 {
            program: id3.program,
            title: optional_text(EVENT, "title", id3.title)?,
            artist: optional_text(EVENT, "artist", id3.artist)?,
            album: optional_text(EVENT, "album", id3.album)?,
            genre: optional_text(EVENT, "genre", id3.genre)?,
            ufid: Ufid {
                owner: optional_text(EVENT, "ufid owner", id3.ufid.owner)?,
                id: optional_text(EVENT, "ufid id", id3.ufid.id)?,
            },
            xhdr: Xhdr {
                mime: optional_mime(EVENT, "xhdr mime", id3.xhdr.mime)?,
                param: optional_index(EVENT, "xhdr param", id3.xhdr.param)?,
                lot: optional_index(EVENT, "xhdr lot", id3.xhdr.lot)?,
            },
        })
    }
}

unsafe fn decode_lot(lot: &RawLot) -> Result<Lot, DecodeError> {
    const EVENT: EventKind = EventKind::Lot;
    let mime = required_mime(EVENT, "mime", lot.mime)?;
    let name = unsafe { optional_text(EVENT, "name", lot.name)? };
    let data = unsafe { copy_bytes(EVENT, "data", lot.data, lot.size as usize)? };
    Ok(Lot {
        port: lot.port,
        lot: lot.lot,
        mime,
        name,
        data,
    })
}

/// Copy `len` bytes out of engine memory. The length is authoritative; the
/// buffer may contain zero bytes.
unsafe fn copy_bytes(
    event: EventKind,
    field: &'static str,
    data: *const u8,
    len: usize,
) -> Result<Vec<u8>, DecodeError> {
    if len == 0 {
        return Ok(Vec::new());
    }
    if data.is_null() {
        return Err(DecodeError::NullPayload { event, field });
    }
    Ok(unsafe { slice::from_raw_parts(data, len) }.to_vec())
}

/// A null pointer is an absent value, never an empty string.
unsafe fn optional_text(
    event: EventKind,
    field: &'static str,
    ptr: *const c_char,
) -> Result<Option<String>, DecodeError> {
    if ptr.is_null() {
        return Ok(None);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(|s| Some(s.to_owned()))
        .map_err(|_| DecodeError::InvalidText { event, field })
}

fn required_mime(event: EventKind, field: &'static str, code: u32) -> Result<MimeType, DecodeError> {
    MimeType::from_code(code).ok_or(DecodeError::UnknownCode { event, field, code })
}

fn optional_mime(
    event: EventKind,
    field: &'static str,
    code: u32,
) -> Result<Option<MimeType>, DecodeError> {
    if code == XHDR_NO_MIME {
        return Ok(None);
    }
    required_mime(event, field, code).map(Some)
}

fn optional_index(
    event: EventKind,
    field: &'static str,
    value: c_int,
) -> Result<Option<u32>, DecodeError> {
    match value {
        XHDR_ABSENT => Ok(None),
        v if v >= 0 => Ok(Some(v as u32)),
        v => Err(DecodeError::InvalidSentinel {
            event,
            field,
            value: v,
        }),
    }
}
