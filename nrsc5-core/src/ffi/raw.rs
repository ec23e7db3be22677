//! `#[repr(C)]` mirrors of the event structures libnrsc5 hands to its callback.
//!
//! Layout follows `nrsc5.h`. All pointers are owned by the engine and are only
//! valid for the duration of the callback that delivered the event.

use std::ffi::{c_char, c_int, c_uint};
use std::ptr;

use crate::models::event::EventKind;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawIq {
    pub data: *const u8,
    pub count: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawMer {
    pub lower: f32,
    pub upper: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawBer {
    pub cber: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawHdc {
    pub program: c_uint,
    pub data: *const u8,
    pub count: usize,
}

/// `count` is in 16-bit samples, not bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawAudio {
    pub program: c_uint,
    pub data: *const i16,
    pub count: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawUfid {
    pub owner: *const c_char,
    pub id: *const c_char,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawXhdr {
    pub mime: u32,
    pub param: c_int,
    pub lot: c_int,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawId3 {
    pub program: c_uint,
    pub title: *const c_char,
    pub artist: *const c_char,
    pub album: *const c_char,
    pub genre: *const c_char,
    pub ufid: RawUfid,
    pub xhdr: RawXhdr,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawSigData {
    pub port: u16,
    pub service_data_type: u16,
    pub kind: u8,
    pub mime: u32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawSigAudio {
    pub port: u8,
    pub kind: u8,
    pub mime: u32,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub union RawSigComponentUnion {
    pub audio: RawSigAudio,
    pub data: RawSigData,
}

#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawSigComponent {
    pub next: *const RawSigComponent,
    pub kind: u8,
    pub id: u8,
    pub u: RawSigComponentUnion,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawSigService {
    pub next: *const RawSigService,
    pub kind: u8,
    pub number: u16,
    pub name: *const c_char,
    pub components: *const RawSigComponent,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawSig {
    pub services: *const RawSigService,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawLot {
    pub port: u16,
    pub lot: c_uint,
    pub size: c_uint,
    pub mime: u32,
    pub name: *const c_char,
    pub data: *const u8,
}

/// Payload union; which field is live is decided by [`RawEvent::event`].
#[repr(C)]
#[derive(Clone, Copy)]
pub union RawEventUnion {
    pub iq: RawIq,
    pub mer: RawMer,
    pub ber: RawBer,
    pub hdc: RawHdc,
    pub audio: RawAudio,
    pub id3: RawId3,
    pub sig: RawSig,
    pub lot: RawLot,
}

/// `nrsc5_event_t`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawEvent {
    pub event: c_uint,
    pub u: RawEventUnion,
}

impl RawEvent {
    /// An event with no payload (lost device, sync, lost sync) or an unknown discriminant.
    pub fn bare(event: c_uint) -> Self {
        Self {
            event,
            u: RawEventUnion {
                sig: RawSig {
                    services: ptr::null(),
                },
            },
        }
    }

    pub fn iq(iq: RawIq) -> Self {
        Self {
            event: EventKind::Iq.code(),
            u: RawEventUnion { iq },
        }
    }

    pub fn mer(mer: RawMer) -> Self {
        Self {
            event: EventKind::Mer.code(),
            u: RawEventUnion { mer },
        }
    }

    pub fn ber(ber: RawBer) -> Self {
        Self {
            event: EventKind::Ber.code(),
            u: RawEventUnion { ber },
        }
    }

    pub fn hdc(hdc: RawHdc) -> Self {
        Self {
            event: EventKind::Hdc.code(),
            u: RawEventUnion { hdc },
        }
    }

    pub fn audio(audio: RawAudio) -> Self {
        Self {
            event: EventKind::Audio.code(),
            u: RawEventUnion { audio },
        }
    }

    pub fn id3(id3: RawId3) -> Self {
        Self {
            event: EventKind::Id3.code(),
            u: RawEventUnion { id3 },
        }
    }

    pub fn sig(sig: RawSig) -> Self {
        Self {
            event: EventKind::Sig.code(),
            u: RawEventUnion { sig },
        }
    }

    pub fn lot(lot: RawLot) -> Self {
        Self {
            event: EventKind::Lot.code(),
            u: RawEventUnion { lot },
        }
    }
}
