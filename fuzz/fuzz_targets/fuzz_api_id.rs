#![no_main]
use alfen_bridge::props::{normalize_api_id, parse_api_id, to_api_id};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary text as a wire id
    if let Ok(s) = std::str::from_utf8(data) {
        let once = normalize_api_id(s);
        assert_eq!(normalize_api_id(&once), once);
        if let Ok(id) = parse_api_id(s) {
            assert_eq!(parse_api_id(&to_api_id(id)).ok(), Some(id));
        }
    }

    // First three bytes as a numeric id
    if data.len() >= 3 {
        let id = u32::from_be_bytes([0, data[0], data[1], data[2]]);
        let api = to_api_id(id);
        assert_eq!(normalize_api_id(&api), api);
        assert_eq!(parse_api_id(&api).ok(), Some(id));
    }
});
