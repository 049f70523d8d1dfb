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

//! Primitives shared by the JAM native engines.
//!
//! - Status taxonomy reported across the byte boundary
//! - VRF input domain separators and fixed encoding lengths
//! - Cursor-style readers for packed request buffers

use core::fmt;

pub mod codec;
pub mod constants;

/// 32-byte compressed public key (Bandersnatch or Ed25519).
pub type Pk32 = [u8; 32];

/// 64-byte Ed25519 signature.
pub type Sig64 = [u8; 64];

/// Truncated VRF output hash.
pub type OutputHash = [u8; constants::VRF_OUTPUT_HASH_LEN];

/// Outcome code written as the leading byte of every boundary response.
///
/// `Ok` is zero so callers can test for success without decoding the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Status {
    Ok = 0,
    /// Well-formed input whose proof or signature does not verify.
    VerificationFailed = 1,
    InvalidEncoding = 2,
    LengthMismatch = 3,
    IndexOutOfRange = 4,
    InsufficientShards = 5,
    DuplicateIndex = 6,
    /// The caller broke the call contract (spent resource, unknown mode, ...).
    ContractViolation = 7,
    TooManyShards = 8,
    SetupFailed = 9,
}

impl Status {
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Ok,
            1 => Self::VerificationFailed,
            2 => Self::InvalidEncoding,
            3 => Self::LengthMismatch,
            4 => Self::IndexOutOfRange,
            5 => Self::InsufficientShards,
            6 => Self::DuplicateIndex,
            7 => Self::ContractViolation,
            8 => Self::TooManyShards,
            9 => Self::SetupFailed,
            _ => return None,
        })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::VerificationFailed => "verification failed",
            Self::InvalidEncoding => "invalid encoding",
            Self::LengthMismatch => "length mismatch",
            Self::IndexOutOfRange => "index out of range",
            Self::InsufficientShards => "insufficient shards",
            Self::DuplicateIndex => "duplicate index",
            Self::ContractViolation => "contract violation",
            Self::TooManyShards => "too many shards",
            Self::SetupFailed => "setup failed",
        })
    }
}

/// Errors that know which boundary status they map to.
pub trait ToStatus {
    fn status(&self) -> Status;
}

impl ToStatus for codec::CodecError {
    fn status(&self) -> Status {
        Status::LengthMismatch
    }
}

/// Status byte followed by `payload`, or by `N` zero bytes when `payload` is absent.
///
/// Keeps failure responses the same width as success responses.
#[must_use]
pub fn status_prefixed<const N: usize>(status: Status, payload: Option<&[u8; N]>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + N);
    out.push(status.code());
    match payload {
        Some(p) if status.is_ok() => out.extend_from_slice(p),
        _ => out.extend_from_slice(&[0u8; N]),
    }
    out
}
