//! Key derivation and ring decoding.

use ark_vrf::reexports::ark_serialize::CanonicalDeserialize;
use ark_vrf::suites::bandersnatch::{AffinePoint, Public, RingProofParams, Secret};
use jam_primitives::{
    codec::exact_chunks,
    constants::{BANDERSNATCH_KEY_LEN, SEED_LEN},
    OutputHash, Pk32,
};

use crate::{encode_fixed, output_hash, vrf_input_point, InvalidKeyPolicy, VrfError};

pub(crate) fn secret_from_seed(seed: &[u8]) -> Result<Secret, VrfError> {
    if seed.len() != SEED_LEN {
        return Err(VrfError::InvalidSeedLength {
            expected: SEED_LEN,
            got: seed.len(),
        });
    }
    Ok(Secret::from_seed(seed))
}

/// Derive the compressed public key for a 32-byte seed.
///
/// Deterministic: the same seed yields the same key on every platform.
pub fn derive_public_key(seed: &[u8]) -> Result<Pk32, VrfError> {
    let secret = secret_from_seed(seed)?;
    encode_fixed(&secret.public())
}

/// VRF output hash for `input_data` under the seed's key, without producing a proof.
pub fn vrf_output_hash(seed: &[u8], input_data: &[u8]) -> Result<OutputHash, VrfError> {
    let secret = secret_from_seed(seed)?;
    let input = vrf_input_point(input_data)?;
    Ok(output_hash(&secret.output(input)))
}

/// Decode one compressed key; `position` is only used for error reporting.
pub fn decode_public(bytes: &[u8], position: usize) -> Result<Public, VrfError> {
    if bytes.len() != BANDERSNATCH_KEY_LEN {
        return Err(VrfError::InvalidKeyEncoding { position });
    }
    Public::deserialize_compressed(bytes).map_err(|_| VrfError::InvalidKeyEncoding { position })
}

/// Number of keys in a concatenated ring buffer.
pub fn ring_len(ring: &[u8]) -> Result<usize, VrfError> {
    exact_chunks(ring, BANDERSNATCH_KEY_LEN)
        .map(|chunks| chunks.len())
        .map_err(|_| VrfError::RingLength { len: ring.len() })
}

/// The key at `index` of a concatenated ring buffer.
pub fn ring_member(ring: &[u8], index: usize) -> Result<Public, VrfError> {
    let ring_len = ring_len(ring)?;
    if index >= ring_len {
        return Err(VrfError::IndexOutOfRange { index, ring_len });
    }
    let start = index * BANDERSNATCH_KEY_LEN;
    decode_public(&ring[start..start + BANDERSNATCH_KEY_LEN], index)
}

/// Decode a whole ring into curve points, in ring order.
pub fn ring_points(ring: &[u8], policy: InvalidKeyPolicy) -> Result<Vec<AffinePoint>, VrfError> {
    let chunks = exact_chunks(ring, BANDERSNATCH_KEY_LEN)
        .map_err(|_| VrfError::RingLength { len: ring.len() })?;
    chunks
        .enumerate()
        .map(|(position, chunk)| match decode_public(chunk, position) {
            Ok(public) => Ok(public.0),
            Err(e) => match policy {
                InvalidKeyPolicy::Reject => Err(e),
                InvalidKeyPolicy::Pad => {
                    tracing::debug!(position, "undecodable ring key replaced by padding point");
                    Ok(RingProofParams::padding_point())
                }
            },
        })
        .collect()
}
