use serde::{Deserialize, Serialize};

/// Where an open session reads samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleSource {
    /// An RTL-SDR device opened by the engine.
    Device { index: u32, ppm_error: i32 },
    /// Samples pushed by the caller through `pipe_samples`.
    Pipe,
}

/// Radio session state machine.
///
/// State transitions:
/// ```text
/// closed → open ⇄ running
///   ↑        │       │
///   └────────┴───────┘  (close)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Closed,
    Open { source: SampleSource },
    Running { source: SampleSource },
}

impl SessionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// The sample source, if the session is open.
    pub fn source(&self) -> Option<SampleSource> {
        match self {
            Self::Open { source } | Self::Running { source } => Some(*source),
            Self::Closed => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_follows_state() {
        assert_eq!(SessionState::Closed.source(), None);
        let running = SessionState::Running {
            source: SampleSource::Pipe,
        };
        assert!(running.is_running());
        assert_eq!(running.source(), Some(SampleSource::Pipe));
    }
}
