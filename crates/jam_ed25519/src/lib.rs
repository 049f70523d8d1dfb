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

//! Ed25519 verification of packed signature items.
//!
//! Item layout: `key (32) ‖ signature (64) ‖ message_len (1) ‖ message`.
//! Items are concatenated with no outer framing.
//!
//! Two modes:
//! - [`verify_ed25519_strict`]: one verdict per item, `verify_strict` semantics
//! - [`verify_ed25519_batch`]: one verdict for the whole batch, randomized
//!   linear combination. It can accept sets that strict verification rejects,
//!   so strict results are authoritative when the two disagree.

use ed25519_dalek::{Signature, VerifyingKey};
use jam_primitives::{
    codec::{read_array, read_exact, read_u8, CodecError},
    constants::{ED25519_KEY_LEN, ED25519_SIGNATURE_LEN},
    Pk32, Sig64, Status, ToStatus,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("item {index}: {source}")]
    Packing {
        index: usize,
        #[source]
        source: CodecError,
    },
    #[error("message of {len} bytes does not fit the one-byte length prefix")]
    MessageTooLong { len: usize },
}

impl ToStatus for SignatureError {
    fn status(&self) -> Status {
        match self {
            Self::Packing { .. } | Self::MessageTooLong { .. } => Status::LengthMismatch,
        }
    }
}

/// One signed message, borrowed from the request buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedItem<'a> {
    pub key: Pk32,
    pub signature: Sig64,
    pub message: &'a [u8],
}

impl<'a> SignedItem<'a> {
    fn read(src: &mut &'a [u8]) -> Result<Self, CodecError> {
        let key = read_array::<ED25519_KEY_LEN>(src)?;
        let signature = read_array::<ED25519_SIGNATURE_LEN>(src)?;
        let len = read_u8(src)?;
        let message = read_exact(src, usize::from(len))?;
        Ok(Self {
            key,
            signature,
            message,
        })
    }

    /// Append this item in wire layout.
    pub fn write_to(&self, out: &mut Vec<u8>) -> Result<(), SignatureError> {
        let len = u8::try_from(self.message.len()).map_err(|_| SignatureError::MessageTooLong {
            len: self.message.len(),
        })?;
        out.extend_from_slice(&self.key);
        out.extend_from_slice(&self.signature);
        out.push(len);
        out.extend_from_slice(self.message);
        Ok(())
    }

    /// Strict check: canonical `S`, no small-order `A` or `R`.
    #[must_use]
    pub fn verify_strict(&self) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&self.key) else {
            return false;
        };
        let signature = Signature::from_bytes(&self.signature);
        key.verify_strict(self.message, &signature).is_ok()
    }
}

/// Split a packed buffer into items. A trailing partial item fails the whole call.
pub fn parse_items(buf: &[u8]) -> Result<Vec<SignedItem<'_>>, SignatureError> {
    let mut src = buf;
    let mut items = Vec::new();
    while !src.is_empty() {
        let item = SignedItem::read(&mut src).map_err(|source| SignatureError::Packing {
            index: items.len(),
            source,
        })?;
        items.push(item);
    }
    Ok(items)
}

/// Strict verdicts, one per item, in input order.
#[must_use]
pub fn verify_items_strict(items: &[SignedItem<'_>], parallel: bool) -> Vec<bool> {
    let check = |(index, item): (usize, &SignedItem<'_>)| {
        let ok = item.verify_strict();
        if !ok {
            tracing::debug!(index, "ed25519 strict verification failed");
        }
        ok
    };

    #[cfg(feature = "parallel")]
    {
        if parallel && items.len() > 1 {
            use rayon::prelude::*;
            return items.par_iter().enumerate().map(check).collect();
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = parallel;

    items.iter().enumerate().map(check).collect()
}

/// All-or-nothing check of the whole set.
///
/// Empty is `true`. Any undecodable key makes the set `false`.
#[must_use]
pub fn verify_items_batch(items: &[SignedItem<'_>]) -> bool {
    if items.is_empty() {
        return true;
    }
    let mut keys = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match VerifyingKey::from_bytes(&item.key) {
            Ok(key) => keys.push(key),
            Err(_) => {
                tracing::debug!(index, "ed25519 batch: undecodable key");
                return false;
            }
        }
    }
    let messages: Vec<&[u8]> = items.iter().map(|item| item.message).collect();
    let signatures: Vec<Signature> = items
        .iter()
        .map(|item| Signature::from_bytes(&item.signature))
        .collect();
    let ok = ed25519_dalek::verify_batch(&messages, &signatures, &keys).is_ok();
    if !ok {
        tracing::debug!(items = items.len(), "ed25519 batch verification failed");
    }
    ok
}

/// Parse and strictly verify a packed buffer.
pub fn verify_ed25519_strict(buf: &[u8], parallel: bool) -> Result<Vec<bool>, SignatureError> {
    let items = parse_items(buf)?;
    Ok(verify_items_strict(&items, parallel))
}

/// Parse and batch-verify a packed buffer.
pub fn verify_ed25519_batch(buf: &[u8]) -> Result<bool, SignatureError> {
    let items = parse_items(buf)?;
    Ok(verify_items_batch(&items))
}
