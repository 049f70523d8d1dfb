#![forbid(unsafe_code)]
#![deny(
    warnings,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::result_large_err,
    clippy::missing_const_for_fn,
    clippy::multiple_crate_versions
)]

//! Systematic Reed-Solomon erasure coding over GF(2^16).
//!
//! Shard positions `0..original_count` are the originals, followed by
//! `recovery_count` recovery shards. Any `original_count` distinct positions
//! reconstruct the originals. Backed by `reed-solomon-simd` (Leopard-style
//! FFT codec, the construction JAM uses).

use std::collections::BTreeMap;

use jam_primitives::{constants::GF16_ORDER, Status, ToStatus};
use thiserror::Error;

pub mod shards;

pub use shards::ShardsCollection;

#[derive(Debug, Error)]
pub enum ErasureError {
    #[error("shard length {shard_len} does not fit {data_len} bytes of shard data")]
    ShardLength { shard_len: usize, data_len: usize },
    #[error("shard length {0} must be a non-zero even number of bytes")]
    OddShardLength(usize),
    #[error("{indices} indices for {shards} shards")]
    IndicesCount { indices: usize, shards: usize },
    #[error("{original} original and {recovery} recovery shards are not addressable in GF(2^16)")]
    TooManyShards { original: usize, recovery: usize },
    #[error("shard index {index} outside 0..{total}")]
    IndexOutOfRange { index: u16, total: usize },
    #[error("conflicting shards at index {0}")]
    DuplicateIndex(u16),
    #[error("{have} distinct shards, {need} needed")]
    InsufficientShards { have: usize, need: usize },
    #[error("shard indices were already taken")]
    IndicesTaken,
    #[error("reed-solomon: {0}")]
    Codec(#[from] reed_solomon_simd::Error),
}

impl ToStatus for ErasureError {
    fn status(&self) -> Status {
        match self {
            Self::ShardLength { .. } | Self::OddShardLength(_) => Status::LengthMismatch,
            Self::TooManyShards { .. } => Status::TooManyShards,
            Self::IndexOutOfRange { .. } => Status::IndexOutOfRange,
            Self::DuplicateIndex(_) => Status::DuplicateIndex,
            Self::InsufficientShards { .. } => Status::InsufficientShards,
            Self::IndicesCount { .. } | Self::IndicesTaken => Status::ContractViolation,
            Self::Codec(_) => Status::InvalidEncoding,
        }
    }
}

fn check_shard_len(shard_len: usize) -> Result<(), ErasureError> {
    if shard_len == 0 || shard_len % 2 != 0 {
        return Err(ErasureError::OddShardLength(shard_len));
    }
    Ok(())
}

/// Whether the codec can address this many shards.
///
/// Both counts must be non-zero and the smaller one, rounded up to a power of
/// two, plus the larger one must fit the field.
#[must_use]
pub fn supports(original_count: usize, recovery_count: usize) -> bool {
    if original_count == 0 || recovery_count == 0 {
        return false;
    }
    if original_count >= GF16_ORDER || recovery_count >= GF16_ORDER {
        return false;
    }
    let small = original_count.min(recovery_count).next_power_of_two();
    let large = original_count.max(recovery_count);
    small + large <= GF16_ORDER
}

/// Append `recovery_count` recovery shards to the originals.
///
/// The originals are taken in array order; input indices are ignored and the
/// output carries none.
pub fn encode(
    recovery_count: usize,
    shards: ShardsCollection,
) -> Result<ShardsCollection, ErasureError> {
    let shard_len = shards.shard_len();
    check_shard_len(shard_len)?;
    let original_count = shards.len();
    let mut data = shards.take_data();
    if recovery_count == 0 {
        return ShardsCollection::new(shard_len, data, None);
    }
    if !supports(original_count, recovery_count) {
        return Err(ErasureError::TooManyShards {
            original: original_count,
            recovery: recovery_count,
        });
    }

    let recovery =
        reed_solomon_simd::encode(original_count, recovery_count, data.chunks_exact(shard_len))?;
    data.reserve(recovery_count * shard_len);
    for shard in &recovery {
        data.extend_from_slice(shard);
    }
    tracing::debug!(original_count, recovery_count, shard_len, "erasure encoded");
    ShardsCollection::new(shard_len, data, None)
}

/// Shard positions when the collection carries no indices: array order.
fn array_positions(len: usize, total: usize) -> Result<Vec<u16>, ErasureError> {
    (0..len)
        .map(|i| {
            u16::try_from(i).map_err(|_| ErasureError::IndexOutOfRange {
                index: u16::MAX,
                total,
            })
        })
        .collect()
}

/// Reconstruct the `original_count` originals, in order, from any sufficient subset.
///
/// Without indices the shards are taken to sit at positions `0..len` in
/// array order; indices are only needed for a lossy or reordered subset.
pub fn decode(
    original_count: usize,
    recovery_count: usize,
    mut shards: ShardsCollection,
) -> Result<ShardsCollection, ErasureError> {
    let shard_len = shards.shard_len();
    check_shard_len(shard_len)?;
    if original_count == 0
        || (recovery_count > 0 && !supports(original_count, recovery_count))
        || original_count >= GF16_ORDER
    {
        return Err(ErasureError::TooManyShards {
            original: original_count,
            recovery: recovery_count,
        });
    }
    let total = original_count + recovery_count;
    let indices = match shards.take_indices()? {
        Some(indices) => indices,
        None => array_positions(shards.len(), total)?,
    };

    let mut by_index: BTreeMap<u16, &[u8]> = BTreeMap::new();
    for (&index, shard) in indices.iter().zip(shards.shards()) {
        if usize::from(index) >= total {
            return Err(ErasureError::IndexOutOfRange { index, total });
        }
        if let Some(prev) = by_index.insert(index, shard) {
            if prev != shard {
                return Err(ErasureError::DuplicateIndex(index));
            }
        }
    }
    if by_index.len() < original_count {
        tracing::debug!(have = by_index.len(), need = original_count, "not enough shards");
        return Err(ErasureError::InsufficientShards {
            have: by_index.len(),
            need: original_count,
        });
    }

    let originals: Vec<(usize, &[u8])> = by_index
        .iter()
        .map(|(&i, &s)| (usize::from(i), s))
        .filter(|(i, _)| *i < original_count)
        .collect();

    let mut out = vec![0u8; original_count * shard_len];
    for (i, shard) in &originals {
        out[i * shard_len..(i + 1) * shard_len].copy_from_slice(shard);
    }
    if originals.len() == original_count {
        return ShardsCollection::new(shard_len, out, None);
    }

    let recovery = by_index
        .iter()
        .map(|(&i, &s)| (usize::from(i), s))
        .filter(|(i, _)| *i >= original_count)
        .map(|(i, s)| (i - original_count, s));
    let restored = reed_solomon_simd::decode(
        original_count,
        recovery_count,
        originals.iter().copied(),
        recovery,
    )?;
    tracing::debug!(
        restored = restored.len(),
        original_count,
        recovery_count,
        "erasure decoded"
    );
    for (i, shard) in restored {
        out[i * shard_len..(i + 1) * shard_len].copy_from_slice(&shard);
    }
    ShardsCollection::new(shard_len, out, None)
}
