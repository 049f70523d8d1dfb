//! Ed25519 boundary over packed `key ‖ signature ‖ len ‖ message` items.

use crate::NativeError;

/// One byte per item, `1` valid and `0` invalid, in input order.
pub fn verify_ed25519(data: &[u8]) -> Result<Vec<u8>, NativeError> {
    verify_ed25519_with(data, true)
}

/// [`verify_ed25519`] with explicit control over rayon.
pub fn verify_ed25519_with(data: &[u8], parallel: bool) -> Result<Vec<u8>, NativeError> {
    let verdicts = jam_ed25519::verify_ed25519_strict(data, parallel)?;
    Ok(verdicts.into_iter().map(u8::from).collect())
}

/// One verdict for the whole set; empty input is `true`.
///
/// `true` here does not imply every item passes [`verify_ed25519`].
pub fn verify_ed25519_batch(data: &[u8]) -> Result<bool, NativeError> {
    Ok(jam_ed25519::verify_ed25519_batch(data)?)
}
