use serde::{Deserialize, Serialize};

use super::state::SampleSource;

/// Default bound on the number of nodes walked in one native linked list.
pub const DEFAULT_MAX_CHAIN_LEN: usize = 4096;

/// Configuration applied by [`RadioSession::open_with`](crate::RadioSession::open_with).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfiguration {
    /// Where the engine gets its samples from.
    pub source: SampleSource,

    /// Center frequency to tune to after opening, in Hz.
    pub frequency_hz: Option<f32>,

    /// Fixed tuner gain in dB. Mutually exclusive with `auto_gain`.
    pub gain_db: Option<f32>,

    /// Let the engine pick the tuner gain (default: true).
    pub auto_gain: bool,

    /// Upper bound on services per guide and components per service.
    pub max_chain_len: usize,
}

impl SessionConfiguration {
    pub fn validate(&self) -> Result<(), String> {
        if let Some(freq) = self.frequency_hz {
            if !freq.is_finite() || freq <= 0.0 {
                return Err(format!("frequency must be positive: {}", freq));
            }
        }
        if let Some(gain) = self.gain_db {
            if !gain.is_finite() {
                return Err(format!("gain must be finite: {}", gain));
            }
            if self.auto_gain {
                return Err("fixed gain and auto gain are mutually exclusive".into());
            }
        }
        if self.max_chain_len == 0 {
            return Err("max chain length must be at least 1".into());
        }
        Ok(())
    }
}

impl Default for SessionConfiguration {
    fn default() -> Self {
        Self {
            source: SampleSource::Device {
                index: 0,
                ppm_error: 0,
            },
            frequency_hz: None,
            gain_db: None,
            auto_gain: true,
            max_chain_len: DEFAULT_MAX_CHAIN_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(SessionConfiguration::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_frequency() {
        let config = SessionConfiguration {
            frequency_hz: Some(-1.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfiguration {
            frequency_hz: Some(f32::NAN),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn fixed_gain_requires_auto_gain_off() {
        let config = SessionConfiguration {
            gain_db: Some(49.6),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfiguration {
            gain_db: Some(49.6),
            auto_gain: false,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_chain_limit() {
        let config = SessionConfiguration {
            max_chain_len: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: SessionConfiguration =
            serde_json::from_str(r#"{"source":"pipe","frequency_hz":90500000.0}"#).unwrap();
        assert_eq!(config.source, SampleSource::Pipe);
        assert_eq!(config.frequency_hz, Some(90_500_000.0));
        assert!(config.auto_gain);
        assert_eq!(config.max_chain_len, DEFAULT_MAX_CHAIN_LEN);
    }
}
