//! Exercise every engine once with known inputs; non-zero exit on any mismatch.
//!
//! ```text
//! RUST_LOG=debug JAM_NATIVE_SRS_PATH=/path/to/zcash-srs-2-11-uncompressed.bin jam-native-selfcheck
//! ```

use std::process::ExitCode;

use jam_native::{
    bandersnatch, ed25519, logging, reed_solomon, NativeConfig, NativeError, RingVrf,
    ShardsCollection, VrfContext,
};

const SEED: &str = "007596986419e027e65499cc87027a236bf4a78b5e8bd7f675759d73e7a9c799";
const PUBLIC_KEY: &str = "ff71c6c03ff88adb5ed52c9681de1629a54e702fc14729f6b50d2f0a76f185b3";

const ED25519_ITEM: &str = concat!(
    "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29",
    "f23e45d7f8977a8eda61513bd5cab1451eb64f265edf340c415f25480123391364521f9bb4c14f840a0dae20eb4dc4a735c961d9966da51dde0d85281dc1dc0b",
    "2d",
    "6a616d5f67756172616e74656511da6d1f761ddf9bdb4c9d6e5303ebd41f61858d0a5647a1a7bfe089bf921be9",
);

type Check = Result<(), String>;

fn ensure(ok: bool, what: &str) -> Check {
    if ok {
        Ok(())
    } else {
        Err(what.to_string())
    }
}

fn unhex(s: &str) -> Result<Vec<u8>, String> {
    hex::decode(s).map_err(|e| format!("bad hex constant: {e}"))
}

fn check_public_key() -> Check {
    let out = bandersnatch::derive_public_key(&unhex(SEED)?);
    ensure(out[0] == 0, "derive_public_key status")?;
    ensure(hex::encode(&out[1..]) == PUBLIC_KEY, "derive_public_key vector")
}

/// Six members; member `i` has seed `[i; 32]` except member 0, the known seed.
fn ring_and_seeds() -> Result<(Vec<u8>, Vec<Vec<u8>>), String> {
    let mut seeds = vec![unhex(SEED)?];
    seeds.extend((1u8..6).map(|i| vec![i; 32]));
    let mut ring = Vec::new();
    for seed in &seeds {
        let out = bandersnatch::derive_public_key(seed);
        ensure(out[0] == 0, "ring member derivation")?;
        ring.extend_from_slice(&out[1..]);
    }
    Ok((ring, seeds))
}

fn check_seal(ring: &[u8], seeds: &[Vec<u8>]) -> Check {
    let payload = [0x42u8; 32];
    let input = VrfContext::FallbackSeal.input_data(&payload);
    let seal = bandersnatch::generate_seal(&seeds[2], &input, b"header");
    ensure(seal[0] == 0, "generate_seal status")?;

    let ok = bandersnatch::verify_seal(ring, 2, &seal[1..], &payload, b"header", 2);
    ensure(ok[0] == 0, "seal verifies")?;
    let again = bandersnatch::verify_seal(ring, 2, &seal[1..], &payload, b"header", 2);
    ensure(ok == again, "seal output reproducible")?;

    let mut tampered = payload;
    tampered[0] ^= 1;
    let bad = bandersnatch::verify_seal(ring, 2, &seal[1..], &tampered, b"header", 2);
    ensure(bad[0] == 1, "tampered payload rejected as verification failure")
}

fn check_tickets(vrf: &RingVrf, ring: &[u8], seeds: &[Vec<u8>]) -> Check {
    const PAYLOAD_LEN: usize = 33;
    if vrf.max_ring_size() < ring.len() / 32 {
        return Err("configured ring size below 6".into());
    }
    let mut tickets = Vec::new();
    for (index, seed) in seeds.iter().enumerate().take(3) {
        let mut payload = vec![0x11u8; 32];
        payload.push(u8::try_from(index).map_err(|e| e.to_string())?);
        let input = VrfContext::TicketSeal.input_data(&payload);
        let sig = bandersnatch::ring_vrf_sign(vrf, ring, index, seed, &input, b"");
        ensure(sig[0] == 0, "ring_vrf_sign status")?;
        tickets.extend_from_slice(&sig[1..]);
        tickets.extend_from_slice(&payload);
    }
    // corrupt the payload of the second ticket
    let second_payload = 784 + PAYLOAD_LEN + 784;
    tickets[second_payload] ^= 1;

    let out = bandersnatch::batch_verify_tickets(vrf, ring, &tickets, PAYLOAD_LEN);
    ensure(out.len() == 3 * bandersnatch::TICKET_RESULT_LEN, "ticket response width")?;
    let statuses: Vec<u8> = out
        .chunks_exact(bandersnatch::TICKET_RESULT_LEN)
        .map(|c| c[0])
        .collect();
    ensure(statuses == [0, 1, 0], "only the tampered ticket fails")
}

fn check_ed25519() -> Check {
    let item = unhex(ED25519_ITEM)?;
    let strict = ed25519::verify_ed25519(&item).map_err(|e| e.to_string())?;
    ensure(strict == [1], "ed25519 strict vector")?;
    let batch = ed25519::verify_ed25519_batch(&[item.clone(), item].concat())
        .map_err(|e| e.to_string())?;
    ensure(batch, "ed25519 batch vector")
}

fn erasure_round_trip(data: &[u8]) -> Result<Vec<u8>, NativeError> {
    let shards = ShardsCollection::new(64, data.to_vec(), None)?;
    let all = reed_solomon::encode(6, shards)?.take_data();
    // recovery shards only
    let survivors = ShardsCollection::new(64, all[4 * 64..8 * 64].to_vec(), Some(vec![4, 5, 6, 7]))?;
    Ok(reed_solomon::decode(4, 6, survivors)?.take_data())
}

fn check_erasure() -> Check {
    let data: Vec<u8> = (0u8..=255).cycle().take(4 * 64).collect();
    let restored = erasure_round_trip(&data).map_err(|e| e.to_string())?;
    ensure(restored == data, "erasure round trip")
}

fn run() -> Result<(), String> {
    let config = NativeConfig::from_env().map_err(|e| e.to_string())?;
    tracing::info!(?config, version = jam_native::VERSION, "self-check");
    let vrf = config.build_ring_vrf().map_err(|e| e.to_string())?;

    check_public_key()?;
    let (ring, seeds) = ring_and_seeds()?;
    check_seal(&ring, &seeds)?;
    check_tickets(&vrf, &ring, &seeds)?;
    check_ed25519()?;
    check_erasure()?;
    Ok(())
}

fn main() -> ExitCode {
    logging::init();
    match run() {
        Ok(()) => {
            tracing::info!("all checks passed");
            ExitCode::SUCCESS
        }
        Err(what) => {
            tracing::error!(check = %what, "self-check failed");
            ExitCode::FAILURE
        }
    }
}
