use std::collections::BTreeMap;

use super::event::{Event, EventKind};

/// Counters for debugging a radio session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDiagnostics {
    pub events_by_kind: BTreeMap<EventKind, u64>,
    pub decode_errors: u64,
    pub iq_bytes: u64,
    pub audio_bytes: u64,
    pub files_received: u64,
}

impl SessionDiagnostics {
    pub fn record_event(&mut self, event: &Event) {
        *self.events_by_kind.entry(event.kind()).or_default() += 1;
        match event {
            Event::Iq(iq) => self.iq_bytes += iq.data.len() as u64,
            Event::Audio(audio) => self.audio_bytes += audio.data.len() as u64,
            Event::Lot(_) => self.files_received += 1,
            _ => {}
        }
    }

    pub fn events(&self, kind: EventKind) -> u64 {
        self.events_by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn total_events(&self) -> u64 {
        self.events_by_kind.values().sum()
    }
}
