#![no_main]

use jam_erasure::{decode, ShardsCollection};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // [original_count, recovery_count, shard_len/2, shard_count, indices (2 bytes each)..., shard bytes...]
    let [original, recovery, half, count, rest @ ..] = data else {
        return;
    };
    let (original, recovery) = (usize::from(*original), usize::from(*recovery));
    let shard_len = usize::from(*half) * 2;
    let count = usize::from(*count);
    if rest.len() < count * 2 {
        return;
    }
    let (index_bytes, shard_bytes) = rest.split_at(count * 2);
    let indices: Vec<u16> = index_bytes
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect();
    let Ok(shards) = ShardsCollection::new(shard_len, shard_bytes.to_vec(), Some(indices)) else {
        return;
    };
    if let Ok(out) = decode(original, recovery, shards) {
        assert_eq!(out.len(), original);
    }
});
