//! Conversion between numeric property ids and their wire form

use crate::error::{AlfenError, Result};
use std::fmt;

/// Largest id representable in the 24-bit id space
pub const MAX_PROP_ID: u32 = 0x00FF_FFFF;

/// A property id in either of its two encodings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropId {
    /// 24-bit id: 16-bit group followed by an 8-bit index
    Numeric(u32),
    /// Legacy `"GGGG_I"` string id as exposed by older firmwares
    Legacy(String),
}

impl PropId {
    /// Canonical wire form of this id
    pub fn as_api_id(&self) -> String {
        match self {
            PropId::Numeric(id) => to_api_id(*id),
            PropId::Legacy(id) => normalize_api_id(id),
        }
    }
}

impl From<u32> for PropId {
    fn from(id: u32) -> Self {
        PropId::Numeric(id)
    }
}

impl From<&str> for PropId {
    fn from(id: &str) -> Self {
        PropId::Legacy(id.to_string())
    }
}

impl fmt::Display for PropId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_api_id())
    }
}

/// Convert `0x222111` into `"2221_11"`.
///
/// Ids wider than 24 bits are masked to 24 bits.
pub fn to_api_id(prop_id: u32) -> String {
    let prop_id = prop_id & MAX_PROP_ID;
    let group = prop_id >> 8;
    let index = prop_id & 0xFF;
    format!("{:04X}_{:X}", group, index)
}

/// Normalize any wire-form id to `"GGGG_I"`: uppercase, index without
/// leading zeros (at least `"0"`). A missing index means `"0"`.
pub fn normalize_api_id(id: &str) -> String {
    let id: String = id.chars().filter(|c| !c.is_whitespace()).collect();
    let (group, index) = id.split_once('_').unwrap_or((&id, "0"));
    let group = group.to_uppercase();
    let index = index.to_uppercase();
    let index = index.trim_start_matches('0');
    let index = if index.is_empty() { "0" } else { index };
    format!("{}_{}", group, index)
}

/// Decode a wire-form id back into its numeric form
pub fn parse_api_id(id: &str) -> Result<u32> {
    let normalized = normalize_api_id(id);
    let (group, index) = normalized
        .split_once('_')
        .ok_or_else(|| AlfenError::parse(format!("Invalid property id: {}", id)))?;

    if group.is_empty() || group.len() > 4 {
        return Err(AlfenError::parse(format!(
            "Invalid property group in id: {}",
            id
        )));
    }
    let group = u32::from_str_radix(group, 16)
        .map_err(|e| AlfenError::parse(format!("Invalid property group in {}: {}", id, e)))?;
    let index = u32::from_str_radix(index, 16)
        .map_err(|e| AlfenError::parse(format!("Invalid property index in {}: {}", id, e)))?;
    if index > 0xFF {
        return Err(AlfenError::parse(format!(
            "Property index out of range in id: {}",
            id
        )));
    }

    Ok((group << 8) | index)
}

/// Build the comma-separated value of the `ids=` query parameter
pub fn build_ids(prop_ids: &[PropId]) -> String {
    prop_ids
        .iter()
        .map(PropId::as_api_id)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_api_id() {
        assert_eq!(to_api_id(0x222116), "2221_16");
        assert_eq!(to_api_id(0x222103), "2221_3");
        assert_eq!(to_api_id(0x22210a), "2221_A");
        assert_eq!(to_api_id(0x220100), "2201_0");
        assert_eq!(to_api_id(0x322126), "3221_26");
    }

    #[test]
    fn test_normalize_api_id() {
        assert_eq!(normalize_api_id("2221_0a"), "2221_A");
        assert_eq!(normalize_api_id("2221_00"), "2221_0");
        assert_eq!(normalize_api_id("2221_0001"), "2221_1");
        assert_eq!(normalize_api_id(" 2221_16 "), "2221_16");
        assert_eq!(normalize_api_id("2062"), "2062_0");
        assert_eq!(normalize_api_id("3280_"), "3280_0");
        assert_eq!(normalize_api_id("2221_0 5"), "2221_5");
        assert_eq!(normalize_api_id("22 21_ 0a"), "2221_A");
    }

    #[test]
    fn test_normalize_is_idempotent_for_odd_input() {
        for raw in ["2221_0 5", " _ 0", "a_0_5", "2221", "", "_", "2221__", "\t2221_00\n"] {
            let once = normalize_api_id(raw);
            assert_eq!(normalize_api_id(&once), once, "input {:?}", raw);
        }
    }

    #[test]
    fn test_normalize_is_idempotent_over_id_space() {
        for id in (0..=MAX_PROP_ID).step_by(0x3F1) {
            let api = to_api_id(id);
            assert_eq!(normalize_api_id(&api), api);
            assert_eq!(normalize_api_id(&normalize_api_id(&api)), api);
            assert_eq!(parse_api_id(&api).unwrap(), id);
        }
    }

    #[test]
    fn test_parse_api_id_rejects_garbage() {
        assert!(parse_api_id("zz_1").is_err());
        assert!(parse_api_id("2221_1FF").is_err());
        assert!(parse_api_id("12345_1").is_err());
        assert_eq!(parse_api_id("2221_a").unwrap(), 0x22210a);
    }

    #[test]
    fn test_build_ids_mixes_encodings() {
        let ids = vec![
            PropId::from(0x220100),
            PropId::from("2221_0A"),
            PropId::from(0x322116),
        ];
        assert_eq!(build_ids(&ids), "2201_0,2221_A,3221_16");
    }
}
