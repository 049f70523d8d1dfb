#![forbid(unsafe_code)]
#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::result_large_err,
    clippy::missing_const_for_fn,
    clippy::multiple_crate_versions
)]

//! Bandersnatch VRF engine for JAM seals and tickets.
//!
//! Suite: `Bandersnatch_SHA-512_ELL2` via `ark-vrf`.
//!
//! - [`keys`]: seed → public key derivation, ring decoding
//! - [`ietf`]: non-anonymous seals (block seal, entropy source)
//! - [`ring`]: ring commitments and anonymous ticket proofs
//!
//! Every operation is a pure function of its arguments. The only long-lived
//! value is [`RingVrf`], which owns the immutable ring proof parameters and is
//! built once by the caller.

use ark_vrf::reexports::ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_vrf::suites::bandersnatch::{Input, Output};
use jam_primitives::{
    codec::CodecError,
    constants::{TAG_ENTROPY, TAG_FALLBACK_SEAL, TAG_TICKET_SEAL, VRF_OUTPUT_POINT_LEN},
    OutputHash, Status, ToStatus,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod ietf;
pub mod keys;
pub mod ring;

pub use ietf::{generate_seal, verify_seal, verify_seal_with_key};
pub use keys::{derive_public_key, vrf_output_hash};
pub use ring::{RingVrf, TicketVerdict};

pub use ark_vrf::suites::bandersnatch::BandersnatchSha512Ell2 as Suite;

/// Precise failure reasons for the VRF engine.
#[derive(Debug, Error)]
pub enum VrfError {
    #[error("seed must be {expected} bytes, got {got}")]
    InvalidSeedLength { expected: usize, got: usize },
    #[error("ring key at position {position} does not decode to a subgroup point")]
    InvalidKeyEncoding { position: usize },
    #[error("ring buffer of {len} bytes is not a whole number of keys")]
    RingLength { len: usize },
    #[error("ring of {len} keys exceeds the parameter limit of {max}")]
    RingTooLarge { len: usize, max: usize },
    #[error("signer index {index} not in [0, {ring_len})")]
    IndexOutOfRange { index: usize, ring_len: usize },
    #[error("signature must be {expected} bytes, got {got}")]
    SignatureLength { expected: usize, got: usize },
    #[error("malformed signature encoding")]
    InvalidSignature,
    #[error("malformed ring commitment")]
    InvalidCommitment,
    #[error("VRF input does not hash to a curve point")]
    InvalidInput,
    #[error("unknown VRF context byte {0}")]
    UnknownContext(u8),
    #[error("tickets buffer: {0}")]
    TicketsPacking(#[from] CodecError),
    #[error("VRF verification failed")]
    VerificationFailed,
    #[error("ring proof parameters: {0}")]
    Setup(String),
    #[error("reading ring proof parameters: {0}")]
    Io(#[from] std::io::Error),
}

impl ToStatus for VrfError {
    fn status(&self) -> Status {
        match self {
            Self::VerificationFailed => Status::VerificationFailed,
            Self::InvalidKeyEncoding { .. }
            | Self::InvalidSignature
            | Self::InvalidCommitment
            | Self::InvalidInput => Status::InvalidEncoding,
            Self::InvalidSeedLength { .. }
            | Self::RingLength { .. }
            | Self::SignatureLength { .. }
            | Self::RingTooLarge { .. } => Status::LengthMismatch,
            Self::IndexOutOfRange { .. } => Status::IndexOutOfRange,
            Self::UnknownContext(_) | Self::TicketsPacking(_) => Status::ContractViolation,
            Self::Setup(_) | Self::Io(_) => Status::SetupFailed,
        }
    }
}

/// How VRF input bytes are assembled from a caller payload.
///
/// The prefix is prepended verbatim; no length framing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum VrfContext {
    /// Payload is already the complete VRF input.
    #[default]
    Raw = 0,
    /// `jam_entropy ‖ Y(seal)`: per-block entropy contribution.
    Entropy = 1,
    /// `jam_fallback_seal ‖ η₃`: seal when no ticket won the slot.
    FallbackSeal = 2,
    /// `jam_ticket_seal ‖ η ‖ attempt`: ticket proofs and ticket-mode seals.
    TicketSeal = 3,
}

impl VrfContext {
    #[must_use]
    pub const fn prefix(self) -> &'static [u8] {
        match self {
            Self::Raw => &[],
            Self::Entropy => TAG_ENTROPY,
            Self::FallbackSeal => TAG_FALLBACK_SEAL,
            Self::TicketSeal => TAG_TICKET_SEAL,
        }
    }

    /// `prefix ‖ payload`
    #[must_use]
    pub fn input_data(self, payload: &[u8]) -> Vec<u8> {
        let prefix = self.prefix();
        let mut data = Vec::with_capacity(prefix.len() + payload.len());
        data.extend_from_slice(prefix);
        data.extend_from_slice(payload);
        data
    }
}

impl TryFrom<u8> for VrfContext {
    type Error = VrfError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Raw),
            1 => Ok(Self::Entropy),
            2 => Ok(Self::FallbackSeal),
            3 => Ok(Self::TicketSeal),
            other => Err(VrfError::UnknownContext(other)),
        }
    }
}

/// What to do with ring members whose bytes are not a valid public key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidKeyPolicy {
    /// Fail the call with [`VrfError::InvalidKeyEncoding`].
    #[default]
    Reject,
    /// Substitute the ring padding point (offender keys are zeroed on chain).
    Pad,
}

/// Map arbitrary bytes onto a VRF input point (Elligator2).
pub(crate) fn vrf_input_point(data: &[u8]) -> Result<Input, VrfError> {
    Input::new(data).ok_or(VrfError::InvalidInput)
}

/// The value JAM uses as ticket id / entropy: the output hash truncated to 32 bytes.
pub(crate) fn output_hash(output: &Output) -> OutputHash {
    let mut out = [0u8; 32];
    out.copy_from_slice(&output.hash()[..32]);
    tracing::trace!(vrf_output_hash = %HexBytes(&out), "vrf output");
    out
}

pub(crate) fn decode_output(bytes: &[u8]) -> Result<Output, VrfError> {
    if bytes.len() != VRF_OUTPUT_POINT_LEN {
        return Err(VrfError::InvalidSignature);
    }
    Output::deserialize_compressed(bytes).map_err(|_| VrfError::InvalidSignature)
}

/// Compressed encoding into a fixed-width array.
pub(crate) fn encode_fixed<T: CanonicalSerialize, const N: usize>(
    value: &T,
) -> Result<[u8; N], VrfError> {
    let mut buf = Vec::with_capacity(N);
    value
        .serialize_compressed(&mut buf)
        .map_err(|e| VrfError::Setup(format!("serialization: {e:?}")))?;
    buf.try_into()
        .map_err(|b: Vec<u8>| VrfError::Setup(format!("unexpected encoded length {}", b.len())))
}

/// Output hash embedded in a seal (96 bytes) or ring proof (784 bytes), unverified.
///
/// Block import uses this to read `Y(H_s)` before the entropy VRF is checked.
pub fn entropy_hash(signature: &[u8]) -> Result<OutputHash, VrfError> {
    use jam_primitives::constants::{IETF_SIGNATURE_LEN, RING_SIGNATURE_LEN};
    if signature.len() != IETF_SIGNATURE_LEN && signature.len() != RING_SIGNATURE_LEN {
        return Err(VrfError::SignatureLength {
            expected: IETF_SIGNATURE_LEN,
            got: signature.len(),
        });
    }
    let output = decode_output(&signature[..VRF_OUTPUT_POINT_LEN])?;
    Ok(output_hash(&output))
}

struct HexBytes<'a>(&'a [u8]);

impl core::fmt::Display for HexBytes<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for b in self.0 {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_bytes_round_trip() {
        for ctx in [
            VrfContext::Raw,
            VrfContext::Entropy,
            VrfContext::FallbackSeal,
            VrfContext::TicketSeal,
        ] {
            assert_eq!(VrfContext::try_from(ctx as u8).unwrap(), ctx);
        }
        assert!(matches!(
            VrfContext::try_from(4),
            Err(VrfError::UnknownContext(4))
        ));
    }

    #[test]
    fn context_prefixes_payload() {
        assert_eq!(VrfContext::Raw.input_data(b"abc"), b"abc");
        assert_eq!(
            VrfContext::FallbackSeal.input_data(&[1, 2]),
            [b"jam_fallback_seal".as_slice(), &[1, 2]].concat()
        );
    }

    #[test]
    fn entropy_hash_rejects_odd_lengths() {
        assert!(matches!(
            entropy_hash(&[0u8; 95]),
            Err(VrfError::SignatureLength { got: 95, .. })
        ));
    }

    #[test]
    fn status_mapping_separates_failure_from_misuse() {
        assert_eq!(VrfError::VerificationFailed.status(), Status::VerificationFailed);
        assert_eq!(
            VrfError::InvalidKeyEncoding { position: 0 }.status(),
            Status::InvalidEncoding
        );
        assert_eq!(
            VrfError::IndexOutOfRange { index: 9, ring_len: 6 }.status(),
            Status::IndexOutOfRange
        );
        assert_eq!(VrfError::UnknownContext(9).status(), Status::ContractViolation);
    }
}
