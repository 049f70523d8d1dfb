use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use hex_literal::hex;
use jam_ed25519::{
    parse_items, verify_ed25519_batch, verify_ed25519_strict, verify_items_batch,
    verify_items_strict, SignedItem,
};

struct Owned {
    key: [u8; 32],
    signature: [u8; 64],
    message: Vec<u8>,
}

fn signed(seed: u8, message: &[u8]) -> Owned {
    let sk = SigningKey::from_bytes(&[seed; 32]);
    Owned {
        key: sk.verifying_key().to_bytes(),
        signature: sk.sign(message).to_bytes(),
        message: message.to_vec(),
    }
}

/// Group order of edwards25519, little-endian.
const L: [u8; 32] = hex!("edd3f55c1a631258d69cf7a2def9de1400000000000000000000000000000010");

/// Compressed neutral element, a point of order 1.
const IDENTITY: [u8; 32] = hex!("0100000000000000000000000000000000000000000000000000000000000000");

/// `S + L` in place of `S`: same scalar mod L, non-canonical encoding.
fn with_unreduced_s(mut item: Owned) -> Owned {
    let mut carry = 0u16;
    for (s, l) in item.signature[32..].iter_mut().zip(L) {
        let sum = u16::from(*s) + u16::from(l) + carry;
        *s = sum.to_le_bytes()[0];
        carry = sum >> 8;
    }
    assert_eq!(carry, 0);
    item
}

/// Key and `R` both the identity with `S = 0`: the cofactored equation holds
/// for every message.
fn small_order(message: &[u8]) -> Owned {
    let mut signature = [0u8; 64];
    signature[..32].copy_from_slice(&IDENTITY);
    Owned {
        key: IDENTITY,
        signature,
        message: message.to_vec(),
    }
}

fn pack(items: &[Owned]) -> Vec<u8> {
    let mut out = Vec::new();
    for it in items {
        SignedItem {
            key: it.key,
            signature: it.signature,
            message: &it.message,
        }
        .write_to(&mut out)
        .unwrap();
    }
    out
}

#[test]
fn every_flipped_bit_is_rejected_strictly() {
    let item = signed(7, b"jam_guarantee work-report");
    let good = pack(&[item]);
    assert_eq!(verify_ed25519_strict(&good, false).unwrap(), vec![true]);

    // signature occupies [32, 96), message starts at 97
    for byte in (32..96).chain(97..good.len()) {
        for bit in [0u8, 3, 7] {
            let mut bad = good.clone();
            bad[byte] ^= 1 << bit;
            assert_eq!(
                verify_ed25519_strict(&bad, false).unwrap(),
                vec![false],
                "byte {byte} bit {bit}"
            );
        }
    }
}

#[test]
fn verdicts_are_per_item_and_ordered() {
    let mut items: Vec<Owned> = (0..5u8).map(|i| signed(i, &[i; 40])).collect();
    items[1].message[0] ^= 1;
    items[3].key = [0xffu8; 32]; // not a point
    let buf = pack(&items);

    let strict = verify_ed25519_strict(&buf, true).unwrap();
    assert_eq!(strict, vec![true, false, true, false, true]);
    assert_eq!(strict, verify_ed25519_strict(&buf, false).unwrap());
    assert!(!verify_ed25519_batch(&buf).unwrap());
}

#[test]
fn batch_accepts_whenever_all_strict_checks_pass() {
    let items: Vec<Owned> = (0..16u8)
        .map(|i| signed(i, format!("message {i}").as_bytes()))
        .collect();
    let buf = pack(&items);
    let parsed = parse_items(&buf).unwrap();
    assert!(verify_items_strict(&parsed, true).iter().all(|ok| *ok));
    assert!(verify_items_batch(&parsed));
}

#[test]
fn zero_length_messages_are_allowed() {
    let buf = pack(&[signed(1, b""), signed(2, b"")]);
    assert_eq!(parse_items(&buf).unwrap().len(), 2);
    assert_eq!(verify_ed25519_strict(&buf, false).unwrap(), vec![true, true]);
}

#[test]
fn unreduced_scalar_is_rejected() {
    let good = signed(9, b"jam_available");
    let bad = with_unreduced_s(signed(9, b"jam_available"));
    assert_ne!(good.signature, bad.signature);
    assert_eq!(verify_ed25519_strict(&pack(&[bad]), false).unwrap(), vec![false]);

    let buf = pack(&[
        signed(1, b"before"),
        with_unreduced_s(signed(2, b"middle")),
        signed(3, b"after"),
    ]);
    let items = parse_items(&buf).unwrap();
    assert_eq!(verify_items_strict(&items, false), vec![true, false, true]);
    assert_eq!(verify_items_strict(&items, true), vec![true, false, true]);
}

#[test]
fn small_order_key_is_rejected() {
    let weak = small_order(b"any message at all");
    let key = VerifyingKey::from_bytes(&weak.key).unwrap();
    let signature = Signature::from_bytes(&weak.signature);
    // lenient verification accepts it
    assert!(key.verify(&weak.message, &signature).is_ok());
    assert!(key.verify_strict(&weak.message, &signature).is_err());

    assert_eq!(verify_ed25519_strict(&pack(&[weak]), false).unwrap(), vec![false]);

    let buf = pack(&[
        signed(4, b"first"),
        signed(5, b"second"),
        small_order(b"third"),
        signed(6, b"fourth"),
    ]);
    let items = parse_items(&buf).unwrap();
    assert_eq!(verify_items_strict(&items, true), vec![true, true, false, true]);
    assert_eq!(verify_items_strict(&items, false), vec![true, true, false, true]);
}
