//! Station configuration: seeding and malfunction odds.
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

/// Errors raised when station configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("malfunction_chance must be between 0.00 and 1.00 (got {value:.2})")]
    ChanceOutOfRange { value: f32 },
    #[error("station config is not valid JSON: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Root seed from which every pod's degradation stream is derived.
    #[serde(default = "StationConfig::default_seed")]
    pub seed: u64,
    /// Odds that a single check of a pod knocks it out of service.
    #[serde(default = "StationConfig::default_malfunction_chance")]
    pub malfunction_chance: f32,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            seed: Self::default_seed(),
            malfunction_chance: Self::default_malfunction_chance(),
        }
    }
}

impl StationConfig {
    const fn default_seed() -> u64 {
        0x100B_57A7
    }

    const fn default_malfunction_chance() -> f32 {
        0.05
    }

    /// Configuration whose pods never degrade on their own.
    #[must_use]
    pub fn reliable(seed: u64) -> Self {
        Self {
            seed,
            malfunction_chance: 0.0,
        }
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the values fail validation.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ChanceOutOfRange`] when the chance is not a probability.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.malfunction_chance) {
            return Err(ConfigError::ChanceOutOfRange {
                value: self.malfunction_chance,
            });
        }
        Ok(())
    }
}

/// Derive an independent stream seed for one pod from the station seed.
pub(crate) fn derive_pod_seed(station_seed: u64, serial: u64) -> u64 {
    let mut mac = Hmac::<Sha256>::new_from_slice(&station_seed.to_le_bytes())
        .expect("64-bit seed is valid key");
    mac.update(b"pod");
    mac.update(&serial.to_le_bytes());
    let digest = mac.finalize().into_bytes();
    let mut seed_bytes = [0u8; 8];
    seed_bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(seed_bytes)
}
