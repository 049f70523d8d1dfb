#![no_main]

use std::sync::OnceLock;

use jam_bandersnatch::{derive_public_key, RingVrf};
use jam_primitives::constants::TINY_RING_SIZE;
use libfuzzer_sys::fuzz_target;

fn fixture() -> &'static (RingVrf, Vec<u8>) {
    static FIXTURE: OnceLock<(RingVrf, Vec<u8>)> = OnceLock::new();
    FIXTURE.get_or_init(|| {
        let vrf = RingVrf::from_seed(TINY_RING_SIZE, [0u8; 32]).with_parallel(false);
        let ring = (0u8..6)
            .flat_map(|i| derive_public_key(&[i; 32]).unwrap())
            .collect();
        (vrf, ring)
    })
}

fuzz_target!(|data: &[u8]| {
    // first byte picks the payload length, the rest is the ticket buffer
    let Some((&len, tickets)) = data.split_first() else {
        return;
    };
    let (vrf, ring) = fixture();
    if let Ok(verdicts) = vrf.batch_verify_tickets(ring, tickets, usize::from(len)) {
        assert_eq!(verdicts.len(), tickets.len() / (784 + usize::from(len)));
    }
});
