use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::decode::event_decoder::EventDecoder;
use crate::ffi::raw::RawEvent;
use crate::models::config::SessionConfiguration;
use crate::models::diagnostics::SessionDiagnostics;
use crate::models::error::RadioError;
use crate::models::state::{SampleSource, SessionState};
use crate::traits::event_handler::EventHandler;
use crate::traits::radio_backend::{RadioBackend, RawEventCallback};

/// Piped sample buffers must be a whole number of 4-byte words.
const PIPE_SAMPLE_ALIGN: usize = 4;

/// State shared with the engine callback, protected by `parking_lot::Mutex`.
struct SharedState {
    state: SessionState,
    diagnostics: SessionDiagnostics,
}

/// Safe façade over one decoding engine handle.
///
/// Owns its backend exclusively, so a handle can never be opened twice
/// through two sessions. Every raw event the engine emits is decoded and
/// passed to the session's [`EventHandler`]:
///
/// ```text
/// [engine thread] → RawEvent → EventDecoder → Event → EventHandler::on_event
///                                   └─ DecodeError → EventHandler::on_decode_error
/// ```
///
/// A malformed event is reported and skipped; the session keeps running.
pub struct RadioSession<B: RadioBackend> {
    backend: B,
    handler: Arc<dyn EventHandler>,
    decoder: EventDecoder,
    shared: Arc<Mutex<SharedState>>,
}

impl<B: RadioBackend> RadioSession<B> {
    pub fn new(backend: B, handler: Arc<dyn EventHandler>) -> Self {
        Self {
            backend,
            handler,
            decoder: EventDecoder::default(),
            shared: Arc::new(Mutex::new(SharedState {
                state: SessionState::Closed,
                diagnostics: SessionDiagnostics::default(),
            })),
        }
    }

    /// Replace the decoder used for events delivered after the next open.
    pub fn with_decoder(mut self, decoder: EventDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    pub fn state(&self) -> SessionState {
        self.shared.lock().state
    }

    pub fn diagnostics(&self) -> SessionDiagnostics {
        self.shared.lock().diagnostics.clone()
    }

    /// Decoder applied to events delivered by the current or next open handle.
    pub fn decoder(&self) -> EventDecoder {
        self.decoder
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Open an RTL-SDR device. Transitions: closed → open.
    pub fn open(&mut self, device_index: u32, ppm_error: i32) -> Result<(), RadioError> {
        self.ensure_closed()?;
        self.backend.open(device_index, ppm_error)?;
        self.register_callback()?;
        self.set_state(SessionState::Open {
            source: SampleSource::Device {
                index: device_index,
                ppm_error,
            },
        });
        Ok(())
    }

    /// Open without a device; samples are supplied through [`pipe_samples`](Self::pipe_samples).
    pub fn open_pipe(&mut self) -> Result<(), RadioError> {
        self.ensure_closed()?;
        self.backend.open_pipe()?;
        self.register_callback()?;
        self.set_state(SessionState::Open {
            source: SampleSource::Pipe,
        });
        Ok(())
    }

    /// Validate `config`, open its source and apply tuning and gain.
    ///
    /// If tuning or gain fails the session is closed again before returning.
    /// On any failure the previous decoder stays in place.
    pub fn open_with(&mut self, config: &SessionConfiguration) -> Result<(), RadioError> {
        config.validate().map_err(RadioError::ConfigurationFailed)?;
        self.ensure_closed()?;

        // The callback registered by `open` captures the decoder, so it has to
        // be in place before opening.
        let previous = mem::replace(&mut self.decoder, EventDecoder::new(config.max_chain_len));
        let opened = match config.source {
            SampleSource::Device { index, ppm_error } => self.open(index, ppm_error),
            SampleSource::Pipe => self.open_pipe(),
        };
        if let Err(e) = opened {
            self.decoder = previous;
            return Err(e);
        }

        if let Err(e) = self.apply_tuning(config) {
            self.close();
            self.decoder = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Stop if running and release the engine handle. Closing a closed session does nothing.
    pub fn close(&mut self) {
        let state = self.state();
        if state.is_closed() {
            return;
        }
        if state.is_running() {
            if let Err(e) = self.backend.stop() {
                log::warn!("stop before close failed: {}", e);
            }
        }
        self.backend.close();
        self.set_state(SessionState::Closed);
    }

    /// Start event delivery. Transitions: open → running.
    pub fn start(&mut self) -> Result<(), RadioError> {
        match self.state() {
            SessionState::Closed => Err(RadioError::NotOpen),
            SessionState::Running { .. } => Ok(()),
            SessionState::Open { source } => {
                self.backend.start()?;
                self.set_state(SessionState::Running { source });
                Ok(())
            }
        }
    }

    /// Stop event delivery. Transitions: running → open.
    ///
    /// A callback already in progress is not interrupted.
    pub fn stop(&mut self) -> Result<(), RadioError> {
        match self.state() {
            SessionState::Closed => Err(RadioError::NotOpen),
            SessionState::Open { .. } => Ok(()),
            SessionState::Running { source } => {
                self.backend.stop()?;
                self.set_state(SessionState::Open { source });
                Ok(())
            }
        }
    }

    pub fn frequency(&self) -> Result<f32, RadioError> {
        self.ensure_open()?;
        Ok(self.backend.frequency())
    }

    pub fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), RadioError> {
        self.ensure_open()?;
        self.backend.set_frequency(frequency_hz)
    }

    pub fn gain(&self) -> Result<f32, RadioError> {
        self.ensure_open()?;
        Ok(self.backend.gain())
    }

    pub fn set_gain(&mut self, gain_db: f32) -> Result<(), RadioError> {
        self.ensure_open()?;
        self.backend.set_gain(gain_db)
    }

    pub fn set_auto_gain(&mut self, enabled: bool) -> Result<(), RadioError> {
        self.ensure_open()?;
        self.backend.set_auto_gain(enabled)
    }

    /// Push interleaved 8-bit I/Q bytes into a pipe session.
    ///
    /// The length must be a multiple of 4; anything else is rejected before
    /// the engine sees it.
    pub fn pipe_samples(&mut self, samples: &[u8]) -> Result<(), RadioError> {
        if samples.len() % PIPE_SAMPLE_ALIGN != 0 {
            return Err(RadioError::InvalidSampleLength { len: samples.len() });
        }
        match self.state().source() {
            None => Err(RadioError::NotOpen),
            Some(SampleSource::Device { .. }) => Err(RadioError::InvalidState(
                "samples can only be piped into a pipe session".into(),
            )),
            Some(SampleSource::Pipe) => self.backend.pipe_samples(samples),
        }
    }

    // --- Internal helpers ---

    fn apply_tuning(&mut self, config: &SessionConfiguration) -> Result<(), RadioError> {
        if let Some(frequency_hz) = config.frequency_hz {
            self.set_frequency(frequency_hz)?;
        }
        match config.gain_db {
            Some(gain_db) => {
                self.set_auto_gain(false)?;
                self.set_gain(gain_db)?;
            }
            None => self.set_auto_gain(config.auto_gain)?,
        }
        Ok(())
    }

    fn ensure_closed(&self) -> Result<(), RadioError> {
        if self.state().is_closed() {
            Ok(())
        } else {
            Err(RadioError::AlreadyOpen)
        }
    }

    fn ensure_open(&self) -> Result<(), RadioError> {
        if self.state().is_closed() {
            Err(RadioError::NotOpen)
        } else {
            Ok(())
        }
    }

    fn set_state(&self, new_state: SessionState) {
        self.shared.lock().state = new_state;
        log::debug!("radio session state: {:?}", new_state);
        self.handler.on_state_changed(&new_state);
    }

    /// Install the decode-and-dispatch callback on the freshly opened handle.
    ///
    /// If the backend rejects it the handle is closed again, so a session is
    /// never open without a way to deliver events.
    fn register_callback(&mut self) -> Result<(), RadioError> {
        let handler = Arc::clone(&self.handler);
        let shared = Arc::clone(&self.shared);
        let decoder = self.decoder;

        let callback: RawEventCallback = Arc::new(move |raw: &RawEvent| {
            // SAFETY: `RadioBackend` implementors only deliver events that are
            // valid for the duration of this call.
            match unsafe { decoder.decode(raw) } {
                Ok(event) => {
                    shared.lock().diagnostics.record_event(&event);
                    handler.on_event(event.kind(), event);
                }
                Err(err) => {
                    shared.lock().diagnostics.decode_errors += 1;
                    handler.on_decode_error(&err);
                }
            }
        });

        if let Err(e) = self.backend.set_callback(callback) {
            self.backend.close();
            return Err(e);
        }
        Ok(())
    }
}

impl<B: RadioBackend> Drop for RadioSession<B> {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::ffi::raw::{RawBer, RawIq};
    use crate::models::config::DEFAULT_MAX_CHAIN_LEN;
    use crate::models::error::DecodeError;
    use crate::models::event::{Event, EventKind};

    #[derive(Default)]
    struct FakeEngine {
        calls: Vec<String>,
        callback: Option<RawEventCallback>,
        frequency: f32,
        gain: f32,
        fail_gain: bool,
        fail_open: bool,
        fail_start: bool,
        reject_callback: bool,
    }

    #[derive(Clone, Default)]
    struct FakeRadio(Arc<Mutex<FakeEngine>>);

    impl FakeRadio {
        fn emit(&self, raw: &RawEvent) {
            let callback = self.0.lock().callback.clone();
            if let Some(cb) = callback {
                cb(raw);
            }
        }

        fn calls(&self) -> Vec<String> {
            self.0.lock().calls.clone()
        }
    }

    // SAFETY: tests only emit events built from live stack values.
    unsafe impl RadioBackend for FakeRadio {
        fn open(&mut self, device_index: u32, ppm_error: i32) -> Result<(), RadioError> {
            let mut engine = self.0.lock();
            if engine.fail_open {
                return Err(RadioError::OpenFailed { device_index, code: -1 });
            }
            engine.calls.push(format!("open {} {}", device_index, ppm_error));
            Ok(())
        }

        fn open_pipe(&mut self) -> Result<(), RadioError> {
            self.0.lock().calls.push("open_pipe".into());
            Ok(())
        }

        fn close(&mut self) {
            let mut engine = self.0.lock();
            engine.calls.push("close".into());
            engine.callback = None;
        }

        fn start(&mut self) -> Result<(), RadioError> {
            let mut engine = self.0.lock();
            if engine.fail_start {
                return Err(RadioError::NotOpen);
            }
            engine.calls.push("start".into());
            Ok(())
        }

        fn stop(&mut self) -> Result<(), RadioError> {
            self.0.lock().calls.push("stop".into());
            Ok(())
        }

        fn frequency(&self) -> f32 {
            self.0.lock().frequency
        }

        fn set_frequency(&mut self, frequency_hz: f32) -> Result<(), RadioError> {
            self.0.lock().frequency = frequency_hz;
            Ok(())
        }

        fn gain(&self) -> f32 {
            self.0.lock().gain
        }

        fn set_gain(&mut self, gain_db: f32) -> Result<(), RadioError> {
            let mut engine = self.0.lock();
            if engine.fail_gain {
                return Err(RadioError::SetGainFailed { gain_db, code: -1 });
            }
            engine.gain = gain_db;
            Ok(())
        }

        fn set_auto_gain(&mut self, enabled: bool) -> Result<(), RadioError> {
            self.0.lock().calls.push(format!("auto_gain {}", enabled));
            Ok(())
        }

        fn set_callback(&mut self, callback: RawEventCallback) -> Result<(), RadioError> {
            let mut engine = self.0.lock();
            if engine.reject_callback {
                return Err(RadioError::NotOpen);
            }
            engine.calls.push("set_callback".into());
            engine.callback = Some(callback);
            Ok(())
        }

        fn pipe_samples(&mut self, samples: &[u8]) -> Result<(), RadioError> {
            self.0.lock().calls.push(format!("pipe {}", samples.len()));
            Ok(())
        }
    }

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<Event>>,
        errors: Mutex<Vec<DecodeError>>,
        states: Mutex<Vec<SessionState>>,
    }

    impl EventHandler for Recorder {
        fn on_event(&self, kind: EventKind, event: Event) {
            assert_eq!(kind, event.kind());
            self.events.lock().push(event);
        }

        fn on_decode_error(&self, error: &DecodeError) {
            self.errors.lock().push(error.clone());
        }

        fn on_state_changed(&self, state: &SessionState) {
            self.states.lock().push(*state);
        }
    }

    fn session() -> (RadioSession<FakeRadio>, FakeRadio, Arc<Recorder>) {
        let radio = FakeRadio::default();
        let recorder = Arc::new(Recorder::default());
        let session = RadioSession::new(radio.clone(), recorder.clone());
        (session, radio, recorder)
    }

    #[test]
    fn lifecycle_transitions() {
        let (mut session, radio, recorder) = session();
        assert_eq!(session.start(), Err(RadioError::NotOpen));

        session.open(0, 12).unwrap();
        session.start().unwrap();
        session.stop().unwrap();
        session.close();

        assert_eq!(
            radio.calls(),
            vec!["open 0 12", "set_callback", "start", "stop", "close"]
        );
        let source = SampleSource::Device {
            index: 0,
            ppm_error: 12,
        };
        assert_eq!(
            *recorder.states.lock(),
            vec![
                SessionState::Open { source },
                SessionState::Running { source },
                SessionState::Open { source },
                SessionState::Closed,
            ]
        );
    }

    #[test]
    fn second_open_is_rejected() {
        let (mut session, radio, _) = session();
        session.open_pipe().unwrap();
        assert_eq!(session.open(0, 0), Err(RadioError::AlreadyOpen));
        assert_eq!(session.open_pipe(), Err(RadioError::AlreadyOpen));
        assert_eq!(radio.calls(), vec!["open_pipe", "set_callback"]);
    }

    #[test]
    fn misaligned_samples_never_reach_engine() {
        let (mut session, radio, _) = session();
        session.open_pipe().unwrap();

        assert_eq!(
            session.pipe_samples(&[0u8; 6]),
            Err(RadioError::InvalidSampleLength { len: 6 })
        );
        session.pipe_samples(&[0u8; 8]).unwrap();
        assert_eq!(radio.calls(), vec!["open_pipe", "set_callback", "pipe 8"]);
    }

    #[test]
    fn piping_requires_pipe_source() {
        let (mut session, _, _) = session();
        assert_eq!(session.pipe_samples(&[0u8; 4]), Err(RadioError::NotOpen));
        session.open(1, 0).unwrap();
        assert!(matches!(
            session.pipe_samples(&[0u8; 4]),
            Err(RadioError::InvalidState(_))
        ));
    }

    #[test]
    fn events_are_decoded_and_counted() {
        let (mut session, radio, recorder) = session();
        session.open_pipe().unwrap();
        session.start().unwrap();

        let bytes = [9u8; 8];
        radio.emit(&RawEvent::bare(2));
        radio.emit(&RawEvent::iq(RawIq {
            data: bytes.as_ptr(),
            count: bytes.len(),
        }));
        radio.emit(&RawEvent::bare(99));
        radio.emit(&RawEvent::ber(RawBer { cber: 0.25 }));

        let events = recorder.events.lock().clone();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], Event::Sync);
        assert_eq!(events[1].kind(), EventKind::Iq);
        assert_eq!(events[2].kind(), EventKind::Ber);
        assert_eq!(
            *recorder.errors.lock(),
            vec![DecodeError::UnknownEventKind { code: 99 }]
        );

        let diagnostics = session.diagnostics();
        assert_eq!(diagnostics.total_events(), 3);
        assert_eq!(diagnostics.decode_errors, 1);
        assert_eq!(diagnostics.iq_bytes, 8);
        assert_eq!(diagnostics.events(EventKind::Sync), 1);
    }

    #[test]
    fn open_with_applies_tuning() {
        let (mut session, radio, _) = session();
        let config = SessionConfiguration {
            source: SampleSource::Pipe,
            frequency_hz: Some(90_500_000.0),
            gain_db: Some(20.0),
            auto_gain: false,
            ..Default::default()
        };
        session.open_with(&config).unwrap();

        assert_eq!(session.frequency(), Ok(90_500_000.0));
        assert_eq!(session.gain(), Ok(20.0));
        assert!(radio.calls().contains(&"auto_gain false".to_string()));
    }

    #[test]
    fn open_with_closes_on_failure() {
        let (mut session, radio, _) = session();
        radio.0.lock().fail_gain = true;
        let config = SessionConfiguration {
            gain_db: Some(20.0),
            auto_gain: false,
            ..Default::default()
        };
        let err = session.open_with(&config).unwrap_err();

        assert!(matches!(err, RadioError::SetGainFailed { .. }));
        assert!(session.state().is_closed());
        assert_eq!(radio.calls().last().map(String::as_str), Some("close"));
    }

    #[test]
    fn open_with_rejects_invalid_config() {
        let (mut session, radio, _) = session();
        let config = SessionConfiguration {
            max_chain_len: 0,
            ..Default::default()
        };
        assert!(matches!(
            session.open_with(&config),
            Err(RadioError::ConfigurationFailed(_))
        ));
        assert!(radio.calls().is_empty());
    }

    #[test]
    fn drop_closes_running_session() {
        let (mut session, radio, _) = session();
        session.open(0, 0).unwrap();
        session.start().unwrap();
        drop(session);
        assert_eq!(
            radio.calls(),
            vec!["open 0 0", "set_callback", "start", "stop", "close"]
        );
        assert!(radio.0.lock().callback.is_none());
    }

    #[test]
    fn failed_open_keeps_previous_decoder() {
        let radio = FakeRadio::default();
        radio.0.lock().fail_open = true;
        let mut session = RadioSession::new(radio.clone(), Arc::new(Recorder::default()))
            .with_decoder(EventDecoder::new(7));
        let config = SessionConfiguration {
            max_chain_len: 3,
            ..Default::default()
        };

        assert!(matches!(
            session.open_with(&config),
            Err(RadioError::OpenFailed { .. })
        ));
        assert_eq!(session.decoder().max_chain_len(), 7);
        assert!(session.state().is_closed());
    }

    #[test]
    fn failed_tuning_keeps_previous_decoder() {
        let (mut session, radio, _) = session();
        radio.0.lock().fail_gain = true;
        let config = SessionConfiguration {
            gain_db: Some(10.0),
            auto_gain: false,
            max_chain_len: 3,
            ..Default::default()
        };

        assert!(session.open_with(&config).is_err());
        assert_eq!(session.decoder().max_chain_len(), DEFAULT_MAX_CHAIN_LEN);
    }

    #[test]
    fn successful_open_applies_configured_decoder() {
        let (mut session, _, _) = session();
        let config = SessionConfiguration {
            source: SampleSource::Pipe,
            max_chain_len: 3,
            ..Default::default()
        };
        session.open_with(&config).unwrap();
        assert_eq!(session.decoder().max_chain_len(), 3);
    }

    #[test]
    fn rejected_callback_closes_backend() {
        let (mut session, radio, recorder) = session();
        radio.0.lock().reject_callback = true;

        assert_eq!(session.open_pipe(), Err(RadioError::NotOpen));
        assert!(session.state().is_closed());
        assert_eq!(radio.calls(), vec!["open_pipe", "close"]);
        assert!(recorder.states.lock().is_empty());
    }

    #[test]
    fn backend_start_failure_leaves_session_open() {
        let (mut session, radio, _) = session();
        session.open_pipe().unwrap();
        radio.0.lock().fail_start = true;

        assert_eq!(session.start(), Err(RadioError::NotOpen));
        assert_eq!(
            session.state(),
            SessionState::Open {
                source: SampleSource::Pipe
            }
        );
    }
}
