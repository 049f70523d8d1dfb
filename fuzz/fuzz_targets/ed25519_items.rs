#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(items) = jam_ed25519::parse_items(data) else {
        return;
    };
    let strict = jam_ed25519::verify_items_strict(&items, false);
    assert_eq!(strict.len(), items.len());
    if strict.iter().all(|ok| *ok) {
        assert!(jam_ed25519::verify_items_batch(&items));
    }
});
