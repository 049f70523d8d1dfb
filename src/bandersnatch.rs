//! Bandersnatch boundary: status-prefixed fixed-width responses.
//!
//! Every response is `status (1) ‖ payload (N)`; on failure the payload is
//! zeroed so the width never changes.

use jam_bandersnatch::{self as engine, RingVrf, VrfContext, VrfError};
use jam_primitives::{
    constants::{
        BANDERSNATCH_KEY_LEN, IETF_SIGNATURE_LEN, RING_COMMITMENT_LEN, RING_SIGNATURE_LEN,
        VRF_OUTPUT_HASH_LEN,
    },
    status_prefixed, Status, ToStatus,
};

/// Width of one entry in a ticket batch response.
pub const TICKET_RESULT_LEN: usize = 1 + VRF_OUTPUT_HASH_LEN;

fn respond<const N: usize>(result: Result<[u8; N], VrfError>) -> Vec<u8> {
    match result {
        Ok(payload) => status_prefixed(Status::Ok, Some(&payload)),
        Err(e) => status_prefixed::<N>(e.status(), None),
    }
}

/// `status ‖ commitment (144)` for concatenated 32-byte keys.
#[must_use]
pub fn ring_commitment(vrf: &RingVrf, ring: &[u8]) -> Vec<u8> {
    respond::<RING_COMMITMENT_LEN>(vrf.ring_commitment(ring))
}

/// `status ‖ public key (32)`.
#[must_use]
pub fn derive_public_key(seed: &[u8]) -> Vec<u8> {
    respond::<BANDERSNATCH_KEY_LEN>(engine::derive_public_key(seed))
}

/// `status ‖ output hash (32)` for a seal by `ring[signer_index]`.
///
/// `context` selects the input prefix: 0 raw, 1 entropy, 2 fallback, 3 ticket.
#[must_use]
pub fn verify_seal(
    ring: &[u8],
    signer_index: usize,
    seal: &[u8],
    payload: &[u8],
    aux_data: &[u8],
    context: u8,
) -> Vec<u8> {
    respond::<VRF_OUTPUT_HASH_LEN>(VrfContext::try_from(context).and_then(|context| {
        engine::verify_seal(ring, signer_index, seal, payload, aux_data, context)
    }))
}

/// `status ‖ output hash (32)` for a seal by an explicit key; `input_data` is complete.
#[must_use]
pub fn verify_seal_with_key(
    public_key: &[u8],
    seal: &[u8],
    input_data: &[u8],
    aux_data: &[u8],
) -> Vec<u8> {
    respond::<VRF_OUTPUT_HASH_LEN>(
        engine::keys::decode_public(public_key, 0)
            .and_then(|key| engine::verify_seal_with_key(&key, seal, input_data, aux_data)),
    )
}

/// `status ‖ seal (96)`.
#[must_use]
pub fn generate_seal(seed: &[u8], input_data: &[u8], aux_data: &[u8]) -> Vec<u8> {
    respond::<IETF_SIGNATURE_LEN>(engine::generate_seal(seed, input_data, aux_data))
}

/// `status ‖ ring signature (784)`.
#[must_use]
pub fn ring_vrf_sign(
    vrf: &RingVrf,
    ring: &[u8],
    prover_index: usize,
    seed: &[u8],
    input_data: &[u8],
    aux_data: &[u8],
) -> Vec<u8> {
    respond::<RING_SIGNATURE_LEN>(vrf.ring_vrf_sign(ring, prover_index, seed, input_data, aux_data))
}

/// `status ‖ output hash (32)` without producing a proof.
#[must_use]
pub fn vrf_output_hash(seed: &[u8], input_data: &[u8]) -> Vec<u8> {
    respond::<VRF_OUTPUT_HASH_LEN>(engine::vrf_output_hash(seed, input_data))
}

/// `status ‖ output hash (32)` read from a 96-byte seal or 784-byte ring signature.
#[must_use]
pub fn entropy_hash(signature: &[u8]) -> Vec<u8> {
    respond::<VRF_OUTPUT_HASH_LEN>(engine::entropy_hash(signature))
}

fn ticket_response(result: Result<Vec<engine::TicketVerdict>, VrfError>) -> Vec<u8> {
    match result {
        Ok(verdicts) => {
            let mut out = Vec::with_capacity(verdicts.len() * TICKET_RESULT_LEN);
            for verdict in verdicts {
                out.extend(respond::<VRF_OUTPUT_HASH_LEN>(verdict));
            }
            out
        }
        Err(e) => vec![e.status().code()],
    }
}

/// `(status ‖ output hash)` per ticket, in order, or one status byte when the
/// ring or the ticket buffer is unusable as a whole.
#[must_use]
pub fn batch_verify_tickets(
    vrf: &RingVrf,
    ring: &[u8],
    tickets: &[u8],
    vrf_input_data_len: usize,
) -> Vec<u8> {
    ticket_response(vrf.batch_verify_tickets(ring, tickets, vrf_input_data_len))
}

/// [`batch_verify_tickets`] against a precomputed 144-byte commitment.
#[must_use]
pub fn batch_verify_tickets_with_commitment(
    vrf: &RingVrf,
    commitment: &[u8],
    tickets: &[u8],
    vrf_input_data_len: usize,
) -> Vec<u8> {
    ticket_response(vrf.batch_verify_tickets_with_commitment(
        commitment,
        tickets,
        vrf_input_data_len,
    ))
}
