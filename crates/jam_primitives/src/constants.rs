#![forbid(unsafe_code)]

/// Compressed Bandersnatch public key.
pub const BANDERSNATCH_KEY_LEN: usize = 32;
/// Secret seed fed to `Secret::from_seed`.
pub const SEED_LEN: usize = 32;
/// Compressed VRF output point.
pub const VRF_OUTPUT_POINT_LEN: usize = 32;
/// Truncated VRF output hash handed to the consensus layer.
pub const VRF_OUTPUT_HASH_LEN: usize = 32;
/// IETF proof `(c, s)`.
pub const IETF_PROOF_LEN: usize = 64;
/// IETF VRF signature: output point || IETF proof.
pub const IETF_SIGNATURE_LEN: usize = VRF_OUTPUT_POINT_LEN + IETF_PROOF_LEN; // 96
/// Ring proof (Pedersen proof + ring membership proof).
pub const RING_PROOF_LEN: usize = 752;
/// Ring VRF signature: output point || ring proof.
pub const RING_SIGNATURE_LEN: usize = VRF_OUTPUT_POINT_LEN + RING_PROOF_LEN; // 784
/// Compressed ring commitment (three BLS12-381 G1 points).
pub const RING_COMMITMENT_LEN: usize = 144;

/// Ring size used by the tiny (test) chain configuration.
pub const TINY_RING_SIZE: usize = 6;
/// Ring size used by the full chain configuration.
pub const FULL_RING_SIZE: usize = 1023;

pub const ED25519_KEY_LEN: usize = 32;
pub const ED25519_SIGNATURE_LEN: usize = 64;

/// Largest shard count addressable in GF(2^16).
pub const GF16_ORDER: usize = 65_536;

// VRF input domain separators.
pub const TAG_ENTROPY: &[u8] = b"jam_entropy";
pub const TAG_FALLBACK_SEAL: &[u8] = b"jam_fallback_seal";
pub const TAG_TICKET_SEAL: &[u8] = b"jam_ticket_seal";
