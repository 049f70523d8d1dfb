//! Fixed-length shard buffers tagged with optional positions.

use crate::ErasureError;

/// Concatenated shards of `shard_len` bytes each.
///
/// `indices[i]`, when present, is the coding position of shard `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardsCollection {
    shard_len: usize,
    data: Vec<u8>,
    indices: Option<Vec<u16>>,
    indices_taken: bool,
}

impl ShardsCollection {
    pub fn new(
        shard_len: usize,
        data: Vec<u8>,
        indices: Option<Vec<u16>>,
    ) -> Result<Self, ErasureError> {
        if shard_len == 0 || data.len() % shard_len != 0 {
            return Err(ErasureError::ShardLength {
                shard_len,
                data_len: data.len(),
            });
        }
        if let Some(indices) = &indices {
            let shards = data.len() / shard_len;
            if indices.len() != shards {
                return Err(ErasureError::IndicesCount {
                    indices: indices.len(),
                    shards,
                });
            }
        }
        Ok(Self {
            shard_len,
            data,
            indices,
            indices_taken: false,
        })
    }

    /// Build from separate shards; they must all have the same length.
    pub fn from_shards<S: AsRef<[u8]>>(
        shards: &[S],
        indices: Option<Vec<u16>>,
    ) -> Result<Self, ErasureError> {
        let shard_len = shards.first().map_or(0, |s| s.as_ref().len());
        let mut data = Vec::with_capacity(shard_len * shards.len());
        for shard in shards {
            let shard = shard.as_ref();
            if shard.len() != shard_len {
                return Err(ErasureError::ShardLength {
                    shard_len,
                    data_len: shard.len(),
                });
            }
            data.extend_from_slice(shard);
        }
        Self::new(shard_len, data, indices)
    }

    #[must_use]
    pub const fn shard_len(&self) -> usize {
        self.shard_len
    }

    /// Number of shards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.shard_len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[must_use]
    pub fn shard(&self, i: usize) -> Option<&[u8]> {
        let start = i.checked_mul(self.shard_len)?;
        let end = start.checked_add(self.shard_len)?;
        self.data.get(start..end)
    }

    pub fn shards(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.shard_len)
    }

    #[must_use]
    pub fn indices(&self) -> Option<&[u16]> {
        self.indices.as_deref()
    }

    /// Move the indices out. Only the first call succeeds.
    pub fn take_indices(&mut self) -> Result<Option<Vec<u16>>, ErasureError> {
        if self.indices_taken {
            return Err(ErasureError::IndicesTaken);
        }
        self.indices_taken = true;
        Ok(self.indices.take())
    }

    /// Move the shard bytes out, consuming the collection.
    #[must_use]
    pub fn take_data(self) -> Vec<u8> {
        self.data
    }
}
