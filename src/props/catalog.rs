//! Static property catalog of the Alfen Eve chargers

use super::codec::PropId;
use crate::error::{AlfenError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Group offset between socket 1 and socket 2 ids (`0x2221xx` -> `0x3221xx`)
pub const SOCKET2_OFFSET: u32 = 0x10_0000;

/// Physical charging socket of a (possibly Duo) station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SocketIndex {
    One,
    Two,
}

impl SocketIndex {
    pub fn as_u8(self) -> u8 {
        match self {
            SocketIndex::One => 1,
            SocketIndex::Two => 2,
        }
    }
}

impl TryFrom<u8> for SocketIndex {
    type Error = AlfenError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(SocketIndex::One),
            2 => Ok(SocketIndex::Two),
            other => Err(AlfenError::validation(
                "socket".to_string(),
                format!("Invalid socket index {}, expected 1 or 2", other),
            )),
        }
    }
}

impl From<SocketIndex> for u8 {
    fn from(socket: SocketIndex) -> Self {
        socket.as_u8()
    }
}

impl std::fmt::Display for SocketIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Station-wide properties (no socket variant)
pub mod general {
    /// Internal temperature (°C)
    pub const TEMPERATURE_INTERNAL: u32 = 0x220100;
    /// Authorization mode
    pub const AUTH_MODE: u32 = 0x212600;
    /// Plug & Charge id
    pub const CHARGE_ID: u32 = 0x206300;
    /// Station maximum current (A)
    pub const STATION_LIMIT: u32 = 0x206200;
}

/// Solar charging settings, only available on socket 1
pub mod solar {
    pub const CHARGE_TYPE: u32 = 0x328001;
    pub const GREEN_SHARE: u32 = 0x328002;
    pub const COMFORT_CHARGE_LEVEL: u32 = 0x328003;
}

/// Per-socket status properties. These do not follow the socket offset.
pub mod status {
    use super::SocketIndex;

    pub fn device_state(socket: SocketIndex) -> u32 {
        match socket {
            SocketIndex::One => 0x319001,
            SocketIndex::Two => 0x319101,
        }
    }

    pub fn operating_mode(socket: SocketIndex) -> u32 {
        match socket {
            SocketIndex::One => 0x250102,
            SocketIndex::Two => 0x250202,
        }
    }
}

/// Socket 1 meter ids; socket 2 ids are derived with [`for_socket`]
pub mod socket_base {
    /// Socket current limit (A)
    pub const CURRENT_LIMIT: u32 = 0x212900;

    pub const VOLTAGE_L1: u32 = 0x222103;
    pub const VOLTAGE_L2: u32 = 0x222104;
    pub const VOLTAGE_L3: u32 = 0x222105;

    pub const CURRENT_L1: u32 = 0x22210a;
    pub const CURRENT_L2: u32 = 0x22210b;
    pub const CURRENT_L3: u32 = 0x22210c;

    pub const POWER_REAL_L1: u32 = 0x222113;
    pub const POWER_REAL_L2: u32 = 0x222114;
    pub const POWER_REAL_L3: u32 = 0x222115;
    pub const POWER_REAL_TOTAL: u32 = 0x222116;

    /// Delivered energy (Wh)
    pub const ENERGY_DELIVERED_TOTAL: u32 = 0x222122;

    pub const ENERGY_CONSUMED_L1: u32 = 0x222123;
    pub const ENERGY_CONSUMED_L2: u32 = 0x222124;
    pub const ENERGY_CONSUMED_L3: u32 = 0x222125;
    pub const ENERGY_CONSUMED_TOTAL: u32 = 0x222126;

    /// Meter ids polled for every socket, in request order
    pub const METER_CANDIDATES: [u32; 16] = [
        VOLTAGE_L1,
        VOLTAGE_L2,
        VOLTAGE_L3,
        CURRENT_L1,
        CURRENT_L2,
        CURRENT_L3,
        CURRENT_LIMIT,
        POWER_REAL_TOTAL,
        POWER_REAL_L1,
        POWER_REAL_L2,
        POWER_REAL_L3,
        ENERGY_DELIVERED_TOTAL,
        ENERGY_CONSUMED_TOTAL,
        ENERGY_CONSUMED_L1,
        ENERGY_CONSUMED_L2,
        ENERGY_CONSUMED_L3,
    ];
}

/// Apply the socket offset to a socket 1 based numeric id
pub fn for_socket(socket1_id: u32, socket: SocketIndex) -> u32 {
    match socket {
        SocketIndex::One => socket1_id,
        SocketIndex::Two => socket1_id + SOCKET2_OFFSET,
    }
}

/// Ids requested on every poll for the given socket, deduplicated and in
/// request order: station-wide ids, solar ids (socket 1 only), the socket's
/// status ids and its meter ids.
pub fn actual_value_prop_ids(socket: SocketIndex) -> Vec<PropId> {
    let shared = [
        general::TEMPERATURE_INTERNAL,
        general::STATION_LIMIT,
        general::AUTH_MODE,
        general::CHARGE_ID,
    ];
    let solar_ids = [
        solar::CHARGE_TYPE,
        solar::GREEN_SHARE,
        solar::COMFORT_CHARGE_LEVEL,
    ];
    let socket_status = [status::device_state(socket), status::operating_mode(socket)];
    let meters = socket_base::METER_CANDIDATES
        .iter()
        .map(|id| for_socket(*id, socket));

    let solar: &[u32] = match socket {
        SocketIndex::One => &solar_ids,
        SocketIndex::Two => &[],
    };

    let mut seen = HashSet::new();
    shared
        .iter()
        .chain(solar)
        .chain(socket_status.iter())
        .copied()
        .chain(meters)
        .filter(|id| seen.insert(*id))
        .map(PropId::Numeric)
        .collect()
}
