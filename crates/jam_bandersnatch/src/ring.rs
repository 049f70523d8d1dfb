//! Ring commitments and anonymous ticket proofs.

use std::path::Path;

use ark_vrf::reexports::ark_serialize::CanonicalDeserialize;
use ark_vrf::ring::{Prover as _, Verifier as _};
use ark_vrf::suites::bandersnatch::{
    AffinePoint, Output, PcsParams, Public, RingProof, RingProofParams, RingVerifier,
};
use jam_primitives::{
    codec::{exact_chunks, record_len},
    constants::{RING_COMMITMENT_LEN, RING_PROOF_LEN, RING_SIGNATURE_LEN, VRF_OUTPUT_POINT_LEN},
    OutputHash,
};

use crate::{
    decode_output, encode_fixed, keys, output_hash, vrf_input_point, InvalidKeyPolicy,
    VrfContext, VrfError,
};

pub type RingCommitment = ark_vrf::ring::RingCommitment<crate::Suite>;

/// Per-ticket result of a batch: the output hash (ticket id) or why it was rejected.
pub type TicketVerdict = Result<OutputHash, VrfError>;

struct RingSignature {
    output: Output,
    proof: RingProof,
}

impl RingSignature {
    fn decode(bytes: &[u8]) -> Result<Self, VrfError> {
        if bytes.len() != RING_SIGNATURE_LEN {
            return Err(VrfError::SignatureLength {
                expected: RING_SIGNATURE_LEN,
                got: bytes.len(),
            });
        }
        let (output, proof) = bytes.split_at(VRF_OUTPUT_POINT_LEN);
        Ok(Self {
            output: decode_output(output)?,
            proof: RingProof::deserialize_compressed(proof)
                .map_err(|_| VrfError::InvalidSignature)?,
        })
    }
}

/// Ring VRF context: immutable ring proof parameters plus call policy.
///
/// Build once per ring size and share by reference; every method is a pure
/// function of its arguments.
pub struct RingVrf {
    params: RingProofParams,
    invalid_keys: InvalidKeyPolicy,
    parallel: bool,
}

impl RingVrf {
    #[must_use]
    pub fn new(params: RingProofParams) -> Self {
        Self {
            params,
            invalid_keys: InvalidKeyPolicy::default(),
            parallel: true,
        }
    }

    /// Parameters derived from a seed instead of the ceremony SRS.
    ///
    /// Deterministic but not interoperable with commitments produced from the
    /// published SRS. Tests and local tooling only.
    #[must_use]
    pub fn from_seed(ring_size: usize, seed: [u8; 32]) -> Self {
        Self::new(RingProofParams::from_seed(ring_size, seed))
    }

    /// Parameters from the uncompressed KZG SRS (`zcash-srs-2-11-uncompressed.bin`).
    pub fn from_srs_bytes(ring_size: usize, srs: &[u8]) -> Result<Self, VrfError> {
        let pcs_params = PcsParams::deserialize_uncompressed_unchecked(&mut &srs[..])
            .map_err(|e| VrfError::Setup(format!("invalid SRS: {e:?}")))?;
        let params = RingProofParams::from_pcs_params(ring_size, pcs_params)
            .map_err(|e| VrfError::Setup(format!("ring size {ring_size}: {e:?}")))?;
        Ok(Self::new(params))
    }

    pub fn from_srs_file(ring_size: usize, path: impl AsRef<Path>) -> Result<Self, VrfError> {
        let srs = std::fs::read(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), bytes = srs.len(), ring_size, "loaded SRS");
        Self::from_srs_bytes(ring_size, &srs)
    }

    #[must_use]
    pub const fn with_invalid_key_policy(mut self, policy: InvalidKeyPolicy) -> Self {
        self.invalid_keys = policy;
        self
    }

    /// Toggle rayon for batches. No effect without the `parallel` feature.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    #[must_use]
    pub fn max_ring_size(&self) -> usize {
        self.params.max_ring_size()
    }

    #[must_use]
    pub const fn invalid_key_policy(&self) -> InvalidKeyPolicy {
        self.invalid_keys
    }

    #[must_use]
    pub const fn parallel(&self) -> bool {
        self.parallel
    }

    fn ring_points(&self, ring: &[u8]) -> Result<Vec<AffinePoint>, VrfError> {
        let points = keys::ring_points(ring, self.invalid_keys)?;
        let max = self.max_ring_size();
        if points.len() > max {
            return Err(VrfError::RingTooLarge {
                len: points.len(),
                max,
            });
        }
        if points.len() != max {
            tracing::debug!(ring_len = points.len(), max, "ring padded to parameter capacity");
        }
        Ok(points)
    }

    pub fn commitment(&self, ring: &[u8]) -> Result<RingCommitment, VrfError> {
        let points = self.ring_points(ring)?;
        Ok(self.params.verifier_key(&points).commitment())
    }

    /// Compressed commitment for a concatenated ring of 32-byte keys.
    ///
    /// Depends only on ring content, ring order and the parameters.
    ///
    /// The ring is padded up to [`Self::max_ring_size`], so the same keys
    /// commit differently under parameters built for another ring size. JAM
    /// commitments come from parameters sized for the validator count.
    pub fn ring_commitment(&self, ring: &[u8]) -> Result<[u8; RING_COMMITMENT_LEN], VrfError> {
        encode_fixed(&self.commitment(ring)?)
    }

    pub fn decode_commitment(bytes: &[u8]) -> Result<RingCommitment, VrfError> {
        if bytes.len() != RING_COMMITMENT_LEN {
            return Err(VrfError::InvalidCommitment);
        }
        RingCommitment::deserialize_compressed(bytes).map_err(|_| VrfError::InvalidCommitment)
    }

    /// Verifier rebuilt from the commitment and the constant part of the parameters.
    #[must_use]
    pub fn verifier(&self, commitment: RingCommitment) -> RingVerifier {
        let verifier_key = self.params.verifier_key_from_commitment(commitment);
        self.params.verifier(verifier_key)
    }

    /// Verify tickets against the ring given as concatenated keys.
    pub fn batch_verify_tickets(
        &self,
        ring: &[u8],
        tickets: &[u8],
        vrf_input_data_len: usize,
    ) -> Result<Vec<TicketVerdict>, VrfError> {
        let commitment = self.commitment(ring)?;
        self.verify_tickets(&commitment, tickets, vrf_input_data_len, VrfContext::TicketSeal)
    }

    /// Verify tickets against a precomputed 144-byte commitment.
    pub fn batch_verify_tickets_with_commitment(
        &self,
        commitment: &[u8],
        tickets: &[u8],
        vrf_input_data_len: usize,
    ) -> Result<Vec<TicketVerdict>, VrfError> {
        let commitment = Self::decode_commitment(commitment)?;
        self.verify_tickets(&commitment, tickets, vrf_input_data_len, VrfContext::TicketSeal)
    }

    /// Each ticket is `ring signature (784) ‖ payload (vrf_input_data_len)`.
    ///
    /// Aux data is empty for tickets. A ragged buffer or a ticket width that
    /// overflows `usize` fails the whole call;
    /// everything after that is reported per ticket, in order.
    pub fn verify_tickets(
        &self,
        commitment: &RingCommitment,
        tickets: &[u8],
        vrf_input_data_len: usize,
        context: VrfContext,
    ) -> Result<Vec<TicketVerdict>, VrfError> {
        let ticket_len = record_len(RING_SIGNATURE_LEN, vrf_input_data_len)?;
        let chunks: Vec<&[u8]> = exact_chunks(tickets, ticket_len)?.collect();
        let make_verifier = || self.verifier(commitment.clone());
        let check = |verifier: &RingVerifier, (index, chunk): (usize, &[u8])| {
            let (signature, payload) = chunk.split_at(RING_SIGNATURE_LEN);
            let input_data = context.input_data(payload);
            ring_vrf_verify(verifier, &input_data, &[], signature).inspect_err(|e| {
                tracing::debug!(index, error = %e, "ticket rejected");
            })
        };

        #[cfg(feature = "parallel")]
        {
            if self.parallel && chunks.len() > 1 {
                use rayon::prelude::*;
                return Ok(chunks
                    .par_iter()
                    .enumerate()
                    .map_init(make_verifier, |verifier, (index, chunk)| {
                        check(verifier, (index, *chunk))
                    })
                    .collect());
            }
        }

        let verifier = make_verifier();
        Ok(chunks
            .iter()
            .enumerate()
            .map(|(index, chunk)| check(&verifier, (index, *chunk)))
            .collect())
    }

    /// Anonymous ticket proof by the ring member at `prover_index`.
    ///
    /// The proof only verifies if `seed` is the secret behind that member.
    pub fn ring_vrf_sign(
        &self,
        ring: &[u8],
        prover_index: usize,
        seed: &[u8],
        input_data: &[u8],
        aux_data: &[u8],
    ) -> Result<[u8; RING_SIGNATURE_LEN], VrfError> {
        let points = self.ring_points(ring)?;
        if prover_index >= points.len() {
            return Err(VrfError::IndexOutOfRange {
                index: prover_index,
                ring_len: points.len(),
            });
        }
        let secret = keys::secret_from_seed(seed)?;
        let input = vrf_input_point(input_data)?;
        let output = secret.output(input);

        let prover_key = self.params.prover_key(&points);
        let prover = self.params.prover(prover_key, prover_index);
        let proof = secret.prove(input, output, aux_data, &prover);

        let output_bytes: [u8; VRF_OUTPUT_POINT_LEN] = encode_fixed(&output)?;
        let proof_bytes: [u8; RING_PROOF_LEN] = encode_fixed(&proof)?;
        let mut signature = [0u8; RING_SIGNATURE_LEN];
        signature[..VRF_OUTPUT_POINT_LEN].copy_from_slice(&output_bytes);
        signature[VRF_OUTPUT_POINT_LEN..].copy_from_slice(&proof_bytes);
        Ok(signature)
    }
}

/// Check one ring signature; returns the output hash (ticket id) on success.
pub fn ring_vrf_verify(
    verifier: &RingVerifier,
    input_data: &[u8],
    aux_data: &[u8],
    signature: &[u8],
) -> Result<OutputHash, VrfError> {
    let signature = RingSignature::decode(signature)?;
    let input = vrf_input_point(input_data)?;
    if Public::verify(input, signature.output, aux_data, &signature.proof, verifier).is_err() {
        return Err(VrfError::VerificationFailed);
    }
    Ok(output_hash(&signature.output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive_public_key;
    use jam_primitives::constants::TINY_RING_SIZE;

    fn ring_of(n: u8) -> Vec<u8> {
        (0..n)
            .flat_map(|i| derive_public_key(&[i; 32]).unwrap())
            .collect()
    }

    #[test]
    fn commitment_is_deterministic_and_order_sensitive() {
        let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
        let ring = ring_of(6);
        let c1 = vrf.ring_commitment(&ring).unwrap();
        let c2 = vrf.ring_commitment(&ring).unwrap();
        assert_eq!(c1, c2);

        let mut swapped = ring.clone();
        swapped[..32].copy_from_slice(&ring[32..64]);
        swapped[32..64].copy_from_slice(&ring[..32]);
        assert_ne!(vrf.ring_commitment(&swapped).unwrap(), c1);

        let mut replaced = ring.clone();
        replaced[5 * 32..].copy_from_slice(&derive_public_key(&[42u8; 32]).unwrap());
        assert_ne!(vrf.ring_commitment(&replaced).unwrap(), c1);

        let decoded = RingVrf::decode_commitment(&c1).unwrap();
        assert_eq!(encode_fixed::<_, RING_COMMITMENT_LEN>(&decoded).unwrap(), c1);
    }

    #[test]
    fn oversized_ring_is_rejected() {
        let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
        let max = vrf.max_ring_size();
        let ring = derive_public_key(&[1u8; 32]).unwrap().repeat(max + 1);
        assert!(matches!(
            vrf.ring_commitment(&ring),
            Err(VrfError::RingTooLarge { len, max: m }) if len == max + 1 && m == max
        ));
    }

    #[test]
    fn ring_signature_verifies_only_for_its_input() {
        let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
        let ring = ring_of(6);
        let input = VrfContext::TicketSeal.input_data(b"eta2-attempt0");
        let sig = vrf.ring_vrf_sign(&ring, 4, &[4u8; 32], &input, b"").unwrap();

        let verifier = vrf.verifier(vrf.commitment(&ring).unwrap());
        let id = ring_vrf_verify(&verifier, &input, b"", &sig).unwrap();
        assert_eq!(id, crate::vrf_output_hash(&[4u8; 32], &input).unwrap());

        let other = VrfContext::TicketSeal.input_data(b"eta2-attempt1");
        assert!(matches!(
            ring_vrf_verify(&verifier, &other, b"", &sig),
            Err(VrfError::VerificationFailed)
        ));
    }
}
