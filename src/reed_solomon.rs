//! Erasure coding boundary.

use jam_erasure::ShardsCollection;

use crate::NativeError;

/// Originals followed by `recovery_count` recovery shards; no indices.
pub fn encode(
    recovery_count: usize,
    shards: ShardsCollection,
) -> Result<ShardsCollection, NativeError> {
    Ok(jam_erasure::encode(recovery_count, shards)?)
}

/// The `original_count` originals in order, from any sufficient subset of shards.
///
/// Shards without indices sit at positions `0..len` in array order.
pub fn decode(
    original_count: usize,
    recovery_count: usize,
    shards: ShardsCollection,
) -> Result<ShardsCollection, NativeError> {
    Ok(jam_erasure::decode(original_count, recovery_count, shards)?)
}
