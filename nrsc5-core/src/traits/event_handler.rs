use crate::models::error::DecodeError;
use crate::models::event::{Event, EventKind};
use crate::models::state::SessionState;

/// Receiver for everything a radio session produces.
///
/// Event and error methods are called from the engine's callback thread, in
/// the order the engine produced the events. Implementations should hand off
/// heavy work to another thread.
pub trait EventHandler: Send + Sync {
    /// Called with every successfully decoded event.
    fn on_event(&self, kind: EventKind, event: Event);

    /// Called when an event could not be decoded. The session keeps running.
    fn on_decode_error(&self, error: &DecodeError) {
        log::warn!("dropping undecodable event: {}", error);
    }

    /// Called when the session state changes.
    fn on_state_changed(&self, _state: &SessionState) {}
}

impl<F> EventHandler for F
where
    F: Fn(EventKind, Event) + Send + Sync,
{
    fn on_event(&self, kind: EventKind, event: Event) {
        self(kind, event)
    }
}
