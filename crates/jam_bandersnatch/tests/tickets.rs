use jam_bandersnatch::{derive_public_key, ring::RingVrf, VrfContext, VrfError};
use jam_primitives::constants::{RING_SIGNATURE_LEN, TINY_RING_SIZE};

const PAYLOAD_LEN: usize = 33;

fn ring_of(n: u8) -> Vec<u8> {
    (0..n)
        .flat_map(|i| derive_public_key(&[i; 32]).unwrap())
        .collect()
}

fn payload(attempt: u8) -> Vec<u8> {
    let mut p = vec![0xeeu8; 32];
    p.push(attempt);
    p
}

fn ticket(vrf: &RingVrf, ring: &[u8], member: u8, attempt: u8) -> Vec<u8> {
    let payload = payload(attempt);
    let input = VrfContext::TicketSeal.input_data(&payload);
    let sig = vrf
        .ring_vrf_sign(ring, usize::from(member), &[member; 32], &input, &[])
        .unwrap();
    [sig.as_slice(), &payload].concat()
}

#[test]
fn tampered_ticket_fails_alone() {
    let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
    let ring = ring_of(6);
    let mut tickets = Vec::new();
    for (member, attempt) in [(0u8, 0u8), (3, 1), (5, 0)] {
        tickets.extend(ticket(&vrf, &ring, member, attempt));
    }
    // flip one proof byte of the middle ticket
    let chunk = RING_SIGNATURE_LEN + PAYLOAD_LEN;
    tickets[chunk + 100] ^= 0x01;

    let verdicts = vrf.batch_verify_tickets(&ring, &tickets, PAYLOAD_LEN).unwrap();
    assert_eq!(verdicts.len(), 3);
    assert!(verdicts[0].is_ok());
    assert!(verdicts[1].is_err());
    assert!(verdicts[2].is_ok());
    assert_ne!(verdicts[0].as_ref().unwrap(), verdicts[2].as_ref().unwrap());
}

#[test]
fn sequential_and_parallel_agree() {
    let ring = ring_of(6);
    let par = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]).with_parallel(true);
    let seq = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]).with_parallel(false);
    let mut tickets = Vec::new();
    for member in 0..4u8 {
        tickets.extend(ticket(&par, &ring, member, member % 2));
    }
    tickets[RING_SIGNATURE_LEN + 1] ^= 0x80; // payload of ticket 0

    let a = par.batch_verify_tickets(&ring, &tickets, PAYLOAD_LEN).unwrap();
    let b = seq.batch_verify_tickets(&ring, &tickets, PAYLOAD_LEN).unwrap();
    let a: Vec<_> = a.iter().map(|v| v.as_ref().ok().copied()).collect();
    let b: Vec<_> = b.iter().map(|v| v.as_ref().ok().copied()).collect();
    assert_eq!(a, b);
    assert!(a[0].is_none());
    assert!(a[1..].iter().all(Option::is_some));
}

#[test]
fn precomputed_commitment_gives_same_verdicts() {
    let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
    let ring = ring_of(6);
    let tickets = [ticket(&vrf, &ring, 1, 0), ticket(&vrf, &ring, 2, 1)].concat();
    let commitment = vrf.ring_commitment(&ring).unwrap();

    let by_ring = vrf.batch_verify_tickets(&ring, &tickets, PAYLOAD_LEN).unwrap();
    let by_commitment = vrf
        .batch_verify_tickets_with_commitment(&commitment, &tickets, PAYLOAD_LEN)
        .unwrap();
    for (x, y) in by_ring.iter().zip(&by_commitment) {
        assert_eq!(x.as_ref().unwrap(), y.as_ref().unwrap());
    }
}

#[test]
fn ticket_from_outside_the_ring_is_rejected() {
    let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
    let ring = ring_of(6);
    let other_ring = [&ring[..5 * 32], &derive_public_key(&[77u8; 32]).unwrap()[..]].concat();
    let tickets = ticket(&vrf, &ring, 5, 0);
    let verdicts = vrf.batch_verify_tickets(&other_ring, &tickets, PAYLOAD_LEN).unwrap();
    assert!(matches!(verdicts[0], Err(VrfError::VerificationFailed)));
}

#[test]
fn ragged_or_empty_buffers() {
    let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
    let ring = ring_of(6);
    assert!(vrf.batch_verify_tickets(&ring, &[], PAYLOAD_LEN).unwrap().is_empty());
    assert!(matches!(
        vrf.batch_verify_tickets(&ring, &[0u8; RING_SIGNATURE_LEN + PAYLOAD_LEN + 1], PAYLOAD_LEN),
        Err(VrfError::TicketsPacking(_))
    ));
    assert!(matches!(
        vrf.batch_verify_tickets_with_commitment(&[0u8; 10], &[], PAYLOAD_LEN),
        Err(VrfError::InvalidCommitment)
    ));
}

#[test]
fn ticket_width_overflow_is_a_packing_error() {
    let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
    let ring = ring_of(6);
    let commitment = vrf.ring_commitment(&ring).unwrap();
    // 784 + usize::MAX wraps to this width
    let tickets = [0u8; RING_SIGNATURE_LEN - 1];
    assert!(matches!(
        vrf.batch_verify_tickets(&ring, &tickets, usize::MAX),
        Err(VrfError::TicketsPacking(_))
    ));
    assert!(matches!(
        vrf.batch_verify_tickets_with_commitment(&commitment, &tickets, usize::MAX),
        Err(VrfError::TicketsPacking(_))
    ));
    assert!(matches!(
        vrf.batch_verify_tickets(&ring, &[], usize::MAX),
        Err(VrfError::TicketsPacking(_))
    ));
}

#[test]
fn commitment_depends_on_parameter_ring_size() {
    let ring = ring_of(6);
    let tiny = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]);
    // next evaluation domain up
    let wider = RingVrf::from_seed(300, [0u8; 32]);
    assert!(wider.max_ring_size() > tiny.max_ring_size());
    assert_ne!(
        tiny.ring_commitment(&ring).unwrap(),
        wider.ring_commitment(&ring).unwrap()
    );
}
