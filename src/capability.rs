//! Capability ids and the property-to-capability mapping
//!
//! A capability is the unit-normalized value name handed to the consuming
//! home-automation layer. Which property feeds a capability depends on the
//! socket being polled.

use crate::props::catalog::{general, socket_base, solar, status};
use crate::props::{SocketIndex, for_socket, to_api_id};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Closed set of capabilities produced by a poll
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapabilityId {
    #[serde(rename = "operatingmode")]
    OperatingMode,
    #[serde(rename = "evcharger_charging")]
    EvCharging,
    #[serde(rename = "evcharger_charging_state")]
    EvChargingState,

    #[serde(rename = "measure_temperature")]
    MeasureTemperature,

    #[serde(rename = "measure_voltage.l1")]
    MeasureVoltageL1,
    #[serde(rename = "measure_voltage.l2")]
    MeasureVoltageL2,
    #[serde(rename = "measure_voltage.l3")]
    MeasureVoltageL3,

    #[serde(rename = "measure_current.l1")]
    MeasureCurrentL1,
    #[serde(rename = "measure_current.l2")]
    MeasureCurrentL2,
    #[serde(rename = "measure_current.l3")]
    MeasureCurrentL3,
    #[serde(rename = "measure_current")]
    MeasureCurrentTotal,

    #[serde(rename = "measure_power")]
    MeasurePower,
    #[serde(rename = "measure_power.l1")]
    MeasurePowerL1,
    #[serde(rename = "measure_power.l2")]
    MeasurePowerL2,
    #[serde(rename = "measure_power.l3")]
    MeasurePowerL3,

    #[serde(rename = "meter_power")]
    MeterPower,

    #[serde(rename = "authmode")]
    AuthMode,
    #[serde(rename = "chargetype")]
    ChargeType,
    #[serde(rename = "greenshare")]
    GreenShare,
    #[serde(rename = "comfortchargelevel")]
    ComfortChargeLevel,
    #[serde(rename = "chargeid")]
    ChargeId,

    #[serde(rename = "measure_current.limit")]
    CurrentLimit,
    #[serde(rename = "measure_current.stationlimit")]
    StationLimit,
}

impl CapabilityId {
    pub const ALL: [CapabilityId; 23] = [
        CapabilityId::OperatingMode,
        CapabilityId::EvCharging,
        CapabilityId::EvChargingState,
        CapabilityId::MeasureTemperature,
        CapabilityId::MeasureVoltageL1,
        CapabilityId::MeasureVoltageL2,
        CapabilityId::MeasureVoltageL3,
        CapabilityId::MeasureCurrentL1,
        CapabilityId::MeasureCurrentL2,
        CapabilityId::MeasureCurrentL3,
        CapabilityId::MeasureCurrentTotal,
        CapabilityId::MeasurePower,
        CapabilityId::MeasurePowerL1,
        CapabilityId::MeasurePowerL2,
        CapabilityId::MeasurePowerL3,
        CapabilityId::MeterPower,
        CapabilityId::AuthMode,
        CapabilityId::ChargeType,
        CapabilityId::GreenShare,
        CapabilityId::ComfortChargeLevel,
        CapabilityId::ChargeId,
        CapabilityId::CurrentLimit,
        CapabilityId::StationLimit,
    ];

    /// Capability name as used by the home-automation platform
    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityId::OperatingMode => "operatingmode",
            CapabilityId::EvCharging => "evcharger_charging",
            CapabilityId::EvChargingState => "evcharger_charging_state",
            CapabilityId::MeasureTemperature => "measure_temperature",
            CapabilityId::MeasureVoltageL1 => "measure_voltage.l1",
            CapabilityId::MeasureVoltageL2 => "measure_voltage.l2",
            CapabilityId::MeasureVoltageL3 => "measure_voltage.l3",
            CapabilityId::MeasureCurrentL1 => "measure_current.l1",
            CapabilityId::MeasureCurrentL2 => "measure_current.l2",
            CapabilityId::MeasureCurrentL3 => "measure_current.l3",
            CapabilityId::MeasureCurrentTotal => "measure_current",
            CapabilityId::MeasurePower => "measure_power",
            CapabilityId::MeasurePowerL1 => "measure_power.l1",
            CapabilityId::MeasurePowerL2 => "measure_power.l2",
            CapabilityId::MeasurePowerL3 => "measure_power.l3",
            CapabilityId::MeterPower => "meter_power",
            CapabilityId::AuthMode => "authmode",
            CapabilityId::ChargeType => "chargetype",
            CapabilityId::GreenShare => "greenshare",
            CapabilityId::ComfortChargeLevel => "comfortchargelevel",
            CapabilityId::ChargeId => "chargeid",
            CapabilityId::CurrentLimit => "measure_current.limit",
            CapabilityId::StationLimit => "measure_current.stationlimit",
        }
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property id (wire form) to capability mapping for one socket.
///
/// Only properties that are sane to expose are mapped; the remaining polled
/// ids (per-phase real power, consumed energy, device state) are requested
/// but not reported.
#[derive(Debug, Clone)]
pub struct CapabilityMap {
    socket: SocketIndex,
    entries: HashMap<String, CapabilityId>,
}

impl CapabilityMap {
    pub fn for_socket(socket: SocketIndex) -> Self {
        let s = |id: u32| to_api_id(for_socket(id, socket));

        let entries = [
            (to_api_id(general::TEMPERATURE_INTERNAL), CapabilityId::MeasureTemperature),
            (to_api_id(general::STATION_LIMIT), CapabilityId::StationLimit),
            (to_api_id(general::AUTH_MODE), CapabilityId::AuthMode),
            (to_api_id(general::CHARGE_ID), CapabilityId::ChargeId),
            (to_api_id(solar::CHARGE_TYPE), CapabilityId::ChargeType),
            (to_api_id(solar::GREEN_SHARE), CapabilityId::GreenShare),
            (to_api_id(solar::COMFORT_CHARGE_LEVEL), CapabilityId::ComfortChargeLevel),
            (to_api_id(status::operating_mode(socket)), CapabilityId::OperatingMode),
            (s(socket_base::CURRENT_LIMIT), CapabilityId::CurrentLimit),
            (s(socket_base::VOLTAGE_L1), CapabilityId::MeasureVoltageL1),
            (s(socket_base::VOLTAGE_L2), CapabilityId::MeasureVoltageL2),
            (s(socket_base::VOLTAGE_L3), CapabilityId::MeasureVoltageL3),
            (s(socket_base::CURRENT_L1), CapabilityId::MeasureCurrentL1),
            (s(socket_base::CURRENT_L2), CapabilityId::MeasureCurrentL2),
            (s(socket_base::CURRENT_L3), CapabilityId::MeasureCurrentL3),
            (s(socket_base::POWER_REAL_TOTAL), CapabilityId::MeasurePower),
            (s(socket_base::ENERGY_DELIVERED_TOTAL), CapabilityId::MeterPower),
        ]
        .into_iter()
        .collect();

        Self { socket, entries }
    }

    pub fn socket(&self) -> SocketIndex {
        self.socket
    }

    /// Capability fed by a wire id. The id must already be normalized.
    pub fn get(&self, api_id: &str) -> Option<CapabilityId> {
        self.entries.get(api_id).copied()
    }

    /// Wire id feeding a capability, if any
    pub fn api_id_of(&self, capability: CapabilityId) -> Option<&str> {
        self.entries
            .iter()
            .find(|(_, c)| **c == capability)
            .map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, CapabilityId)> {
        self.entries.iter().map(|(id, c)| (id.as_str(), *c))
    }
}
