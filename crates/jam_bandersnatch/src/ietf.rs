//! Non-anonymous (IETF) VRF seals.
//!
//! A seal is `output (32) ‖ proof (64)`. The signer is disclosed, either as an
//! explicit key or as an index into the ring the caller passes in.

use ark_vrf::ietf::{Prover as _, Verifier as _};
use ark_vrf::reexports::ark_serialize::CanonicalDeserialize;
use ark_vrf::suites::bandersnatch::{IetfProof, Output, Public};
use jam_primitives::{
    constants::{IETF_SIGNATURE_LEN, VRF_OUTPUT_POINT_LEN},
    OutputHash,
};

use crate::{
    decode_output, encode_fixed, keys, output_hash, vrf_input_point, VrfContext, VrfError,
};

struct IetfSignature {
    output: Output,
    proof: IetfProof,
}

impl IetfSignature {
    fn decode(bytes: &[u8]) -> Result<Self, VrfError> {
        if bytes.len() != IETF_SIGNATURE_LEN {
            return Err(VrfError::SignatureLength {
                expected: IETF_SIGNATURE_LEN,
                got: bytes.len(),
            });
        }
        let (output, proof) = bytes.split_at(VRF_OUTPUT_POINT_LEN);
        Ok(Self {
            output: decode_output(output)?,
            proof: IetfProof::deserialize_compressed(proof)
                .map_err(|_| VrfError::InvalidSignature)?,
        })
    }
}

/// Verify a seal against an explicit signer key.
///
/// `input_data` is the complete VRF input. On success returns the output hash,
/// which matches the ring VRF output for the same input and key regardless of
/// `aux_data`.
pub fn verify_seal_with_key(
    signer: &Public,
    seal: &[u8],
    input_data: &[u8],
    aux_data: &[u8],
) -> Result<OutputHash, VrfError> {
    let signature = IetfSignature::decode(seal)?;
    let input = vrf_input_point(input_data)?;
    if signer
        .verify(input, signature.output, aux_data, &signature.proof)
        .is_err()
    {
        tracing::debug!("ietf seal verification failure");
        return Err(VrfError::VerificationFailed);
    }
    Ok(output_hash(&signature.output))
}

/// Verify a block seal made by the ring member at `signer_index`.
///
/// The VRF input is `context.prefix() ‖ payload`; `aux_data` is bound into
/// the proof only.
pub fn verify_seal(
    ring: &[u8],
    signer_index: usize,
    seal: &[u8],
    payload: &[u8],
    aux_data: &[u8],
    context: VrfContext,
) -> Result<OutputHash, VrfError> {
    let signer = keys::ring_member(ring, signer_index)?;
    let input_data = context.input_data(payload);
    verify_seal_with_key(&signer, seal, &input_data, aux_data).inspect_err(|e| {
        tracing::debug!(signer_index, ?context, error = %e, "seal rejected");
    })
}

/// Produce a seal over `input_data` that [`verify_seal_with_key`] accepts.
pub fn generate_seal(
    seed: &[u8],
    input_data: &[u8],
    aux_data: &[u8],
) -> Result<[u8; IETF_SIGNATURE_LEN], VrfError> {
    let secret = keys::secret_from_seed(seed)?;
    let input = vrf_input_point(input_data)?;
    let output = secret.output(input);
    let proof = secret.prove(input, output, aux_data);

    let output_bytes: [u8; VRF_OUTPUT_POINT_LEN] = encode_fixed(&output)?;
    let proof_bytes: [u8; IETF_SIGNATURE_LEN - VRF_OUTPUT_POINT_LEN] = encode_fixed(&proof)?;
    let mut seal = [0u8; IETF_SIGNATURE_LEN];
    seal[..VRF_OUTPUT_POINT_LEN].copy_from_slice(&output_bytes);
    seal[VRF_OUTPUT_POINT_LEN..].copy_from_slice(&proof_bytes);
    Ok(seal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{derive_public_key, vrf_output_hash};

    fn ring_of(n: u8) -> Vec<u8> {
        (0..n)
            .flat_map(|i| derive_public_key(&[i; 32]).unwrap())
            .collect()
    }

    #[test]
    fn seal_round_trip_and_tamper() {
        let ring = ring_of(6);
        let seed = [3u8; 32];
        let payload = b"eta3";
        let input = VrfContext::FallbackSeal.input_data(payload);
        let seal = generate_seal(&seed, &input, b"header").unwrap();

        let out = verify_seal(&ring, 3, &seal, payload, b"header", VrfContext::FallbackSeal).unwrap();
        assert_eq!(out, vrf_output_hash(&seed, &input).unwrap());

        // wrong signer, wrong payload, wrong aux, wrong context
        assert!(matches!(
            verify_seal(&ring, 2, &seal, payload, b"header", VrfContext::FallbackSeal),
            Err(VrfError::VerificationFailed)
        ));
        assert!(matches!(
            verify_seal(&ring, 3, &seal, b"eta4", b"header", VrfContext::FallbackSeal),
            Err(VrfError::VerificationFailed)
        ));
        assert!(matches!(
            verify_seal(&ring, 3, &seal, payload, b"heade", VrfContext::FallbackSeal),
            Err(VrfError::VerificationFailed)
        ));
        assert!(matches!(
            verify_seal(&ring, 3, &seal, payload, b"header", VrfContext::TicketSeal),
            Err(VrfError::VerificationFailed)
        ));
    }

    #[test]
    fn output_ignores_aux_data() {
        let seed = [9u8; 32];
        let public = keys::decode_public(&derive_public_key(&seed).unwrap(), 0).unwrap();
        let a = generate_seal(&seed, b"input", b"aux-a").unwrap();
        let b = generate_seal(&seed, b"input", b"aux-b").unwrap();
        let ya = verify_seal_with_key(&public, &a, b"input", b"aux-a").unwrap();
        let yb = verify_seal_with_key(&public, &b, b"input", b"aux-b").unwrap();
        assert_eq!(ya, yb);
    }

    #[test]
    fn malformed_seal_is_not_a_verification_failure() {
        let ring = ring_of(2);
        assert!(matches!(
            verify_seal(&ring, 0, &[0u8; 95], b"", b"", VrfContext::Raw),
            Err(VrfError::SignatureLength { expected: 96, got: 95 })
        ));
        assert!(matches!(
            verify_seal(&ring, 5, &[0u8; 96], b"", b"", VrfContext::Raw),
            Err(VrfError::IndexOutOfRange { index: 5, ring_len: 2 })
        ));
    }
}
