//! Cursor-style readers over caller-owned byte buffers.
//!
//! Every reader advances `src` past the bytes it consumed and never copies
//! more than the fixed-size value it returns.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("input too short: need {need} bytes, have {have}")]
    Short { need: usize, have: usize },
    #[error("buffer length {len} is not a multiple of {chunk}")]
    Ragged { len: usize, chunk: usize },
    #[error("record length {base} + {extra} overflows")]
    LengthOverflow { base: usize, extra: usize },
}

pub const fn read_exact<'a>(src: &mut &'a [u8], n: usize) -> Result<&'a [u8], CodecError> {
    if src.len() < n {
        return Err(CodecError::Short {
            need: n,
            have: src.len(),
        });
    }
    let (a, b) = src.split_at(n);
    *src = b;
    Ok(a)
}

pub fn read_array<const N: usize>(src: &mut &[u8]) -> Result<[u8; N], CodecError> {
    let b = read_exact(src, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(b);
    Ok(out)
}

pub fn read_u8(src: &mut &[u8]) -> Result<u8, CodecError> {
    let [b] = read_array::<1>(src)?;
    Ok(b)
}

/// Width of a record made of a fixed `base` part and a caller-declared `extra` part.
pub const fn record_len(base: usize, extra: usize) -> Result<usize, CodecError> {
    match base.checked_add(extra) {
        Some(len) => Ok(len),
        None => Err(CodecError::LengthOverflow { base, extra }),
    }
}

/// Split `buf` into `chunk`-sized pieces, rejecting a ragged tail.
///
/// A zero `chunk` only accepts an empty buffer.
pub fn exact_chunks(buf: &[u8], chunk: usize) -> Result<std::slice::ChunksExact<'_, u8>, CodecError> {
    if chunk == 0 {
        return if buf.is_empty() {
            Ok(buf.chunks_exact(1))
        } else {
            Err(CodecError::Ragged {
                len: buf.len(),
                chunk,
            })
        };
    }
    if buf.len() % chunk != 0 {
        return Err(CodecError::Ragged {
            len: buf.len(),
            chunk,
        });
    }
    Ok(buf.chunks_exact(chunk))
}
