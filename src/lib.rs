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

//! JAM native primitives: byte-oriented boundary over the engine crates.
//!
//! - [`bandersnatch`]: ring commitments, seals, tickets (`jam_bandersnatch`)
//! - [`ed25519`]: strict and batch signature checks (`jam_ed25519`)
//! - [`reed_solomon`]: GF(2^16) erasure coding (`jam_erasure`)
//!
// Boundary conventions:
// - Fixed-width responses start with a status byte (0 = ok) and keep their
//   width on failure, payload zeroed.
// - Ring proof parameters are owned by the caller's `RingVrf`; nothing here
//   caches across calls.
// - Verification failure and malformed input map to different statuses.

pub mod bandersnatch;
pub mod config;
pub mod ed25519;
pub mod errors;
pub mod logging;
pub mod reed_solomon;

pub use config::{NativeConfig, RingConfig};
pub use errors::NativeError;
pub use jam_bandersnatch::{InvalidKeyPolicy, RingVrf, VrfContext};
pub use jam_erasure::ShardsCollection;
pub use jam_primitives::{Status, ToStatus};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
