#![no_main]
use alfen_bridge::capability::CapabilityMap;
use alfen_bridge::models::PropertyResponseBody;
use alfen_bridge::normalize::{normalize, synthesize_derived};
use alfen_bridge::props::{SocketIndex, normalize_api_id};
use alfen_bridge::transport::{ResponseBody, decode_body};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data).into_owned();
    let Ok(ResponseBody::Json(value)) = decode_body(Some("alfen/json"), text) else {
        return;
    };
    let Ok(body) = serde_json::from_value::<PropertyResponseBody>(value) else {
        return;
    };

    // Normalization must never panic on device input
    let map = CapabilityMap::for_socket(SocketIndex::One);
    let mut values = Vec::new();
    for prop in &body.properties {
        let id = normalize_api_id(&prop.id);
        if let Some(cap) = map.get(&id) {
            values.extend(normalize(cap, prop.value.as_ref(), &id).into_values());
        }
    }
    let _ = synthesize_derived(&values);
});
