//! Alfen property identifiers
//!
//! The charger addresses every value by a property id. Current firmwares use
//! 24-bit numeric ids (`0x222116`); on the wire they travel as `"GGGG_I"`
//! strings (`"2221_16"`). Socket 2 of a Duo charger mirrors the socket 1 ids
//! with a fixed group offset.

pub mod catalog;
pub mod codec;

pub use catalog::{SOCKET2_OFFSET, SocketIndex, actual_value_prop_ids, for_socket};
pub use codec::{PropId, build_ids, normalize_api_id, parse_api_id, to_api_id};
