use alfen_bridge::props::catalog::socket_base;
use alfen_bridge::props::{
    PropId, SOCKET2_OFFSET, SocketIndex, actual_value_prop_ids, for_socket, normalize_api_id,
    parse_api_id, to_api_id,
};
use std::collections::HashSet;

#[test]
fn api_id_round_trip_samples() {
    for id in [0x000000, 0x0000FF, 0x222116, 0x22210A, 0x328003, 0x322126, 0xFFFFFF] {
        let api = to_api_id(id);
        assert_eq!(normalize_api_id(&api), api);
        assert_eq!(parse_api_id(&api).unwrap(), id);
    }
    assert_eq!(to_api_id(0x0000FF), "0000_FF");
}

#[test]
fn legacy_variants_normalize_to_the_same_id() {
    let variants = ["2221_0a", "2221_A", "2221_00A", "2221_a", " 2221_0A"];
    let normalized: HashSet<_> = variants.iter().map(|v| normalize_api_id(v)).collect();
    assert_eq!(normalized.len(), 1);
    assert_eq!(
        PropId::from("2221_0a").as_api_id(),
        PropId::from(socket_base::CURRENT_L1).as_api_id()
    );
}

#[test]
fn socket_two_meters_are_offset_copies() {
    let one: HashSet<String> = actual_value_prop_ids(SocketIndex::One)
        .iter()
        .map(PropId::as_api_id)
        .collect();
    let two: HashSet<String> = actual_value_prop_ids(SocketIndex::Two)
        .iter()
        .map(PropId::as_api_id)
        .collect();

    for meter in socket_base::METER_CANDIDATES {
        let s1 = to_api_id(meter);
        let s2 = to_api_id(for_socket(meter, SocketIndex::Two));
        assert_eq!(for_socket(meter, SocketIndex::Two), meter + SOCKET2_OFFSET);
        assert!(one.contains(&s1));
        assert!(!two.contains(&s1));
        assert!(two.contains(&s2));
    }
}
