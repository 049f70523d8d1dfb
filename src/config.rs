//! Runtime configuration: ring parameters and batch parallelism.
//!
//! Defaults suit tests (tiny ring, seed-derived parameters). Production sets
//! `JAM_NATIVE_SRS_PATH` to the uncompressed ceremony SRS.

use std::path::PathBuf;

use jam_bandersnatch::{InvalidKeyPolicy, RingVrf};
use jam_primitives::constants::TINY_RING_SIZE;
use serde::{Deserialize, Serialize};

use crate::NativeError;

pub const ENV_RING_SIZE: &str = "JAM_NATIVE_RING_SIZE";
pub const ENV_SRS_PATH: &str = "JAM_NATIVE_SRS_PATH";
pub const ENV_INVALID_KEYS: &str = "JAM_NATIVE_INVALID_KEYS";
pub const ENV_PARALLEL: &str = "JAM_NATIVE_PARALLEL";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    /// Ring size the parameters are built for (6 tiny, 1023 full).
    ///
    /// Must match the chain's validator count; commitments under other
    /// parameters do not interoperate.
    pub ring_size: usize,
    /// `zcash-srs-2-11-uncompressed.bin`; `None` derives parameters from `srs_seed`.
    pub srs_path: Option<PathBuf>,
    pub srs_seed: [u8; 32],
    pub invalid_keys: InvalidKeyPolicy,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            ring_size: TINY_RING_SIZE,
            srs_path: None,
            srs_seed: [0u8; 32],
            invalid_keys: InvalidKeyPolicy::Reject,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NativeConfig {
    pub ring: RingConfig,
    /// Only honoured when built with the `parallel` feature.
    pub parallel: bool,
}

impl Default for NativeConfig {
    fn default() -> Self {
        Self {
            ring: RingConfig::default(),
            parallel: true,
        }
    }
}

impl NativeConfig {
    /// Defaults overridden by `JAM_NATIVE_*` environment variables.
    pub fn from_env() -> Result<Self, NativeError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`Self::from_env`] with an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, NativeError> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_RING_SIZE) {
            config.ring.ring_size = match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(invalid(ENV_RING_SIZE, value)),
            };
        }
        if let Some(value) = lookup(ENV_SRS_PATH) {
            if !value.is_empty() {
                config.ring.srs_path = Some(PathBuf::from(value));
            }
        }
        if let Some(value) = lookup(ENV_INVALID_KEYS) {
            config.ring.invalid_keys = match value.trim().to_ascii_lowercase().as_str() {
                "reject" => InvalidKeyPolicy::Reject,
                "pad" => InvalidKeyPolicy::Pad,
                _ => return Err(invalid(ENV_INVALID_KEYS, value)),
            };
        }
        if let Some(value) = lookup(ENV_PARALLEL) {
            config.parallel = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                _ => return Err(invalid(ENV_PARALLEL, value)),
            };
        }
        Ok(config)
    }

    /// Build the ring VRF context described by this configuration.
    pub fn build_ring_vrf(&self) -> Result<RingVrf, NativeError> {
        let ring = &self.ring;
        let vrf = match &ring.srs_path {
            Some(path) => RingVrf::from_srs_file(ring.ring_size, path)?,
            None => {
                tracing::warn!(
                    ring_size = ring.ring_size,
                    "no SRS configured; using seed-derived ring parameters"
                );
                RingVrf::from_seed(ring.ring_size, ring.srs_seed)
            }
        };
        Ok(vrf
            .with_invalid_key_policy(ring.invalid_keys)
            .with_parallel(self.parallel))
    }
}

fn invalid(var: &'static str, value: String) -> NativeError {
    NativeError::Config { var, value }
}
