//! Value normalization and derivation
//!
//! Turns raw property values into unit-corrected capability values and
//! synthesizes the values the charger does not report directly (charging
//! state from the status code, per-phase power from voltage and current).

use crate::capability::CapabilityId;
use crate::logging::get_logger;
use crate::models::{CapabilityValue, CapabilityValueKind, WireValue};
use serde::{Deserialize, Serialize};

/// Raw power readings in `(0, POWER_KW_THRESHOLD]` are taken as kilowatts.
///
/// The charger reports watts on most firmwares, but some report kilowatts.
/// A genuine reading of 200 W or less is therefore misread as kilowatts;
/// kept for compatibility with the reported values of existing installs.
pub const POWER_KW_THRESHOLD: f64 = 200.0;

/// Plug/charge state derived from the socket status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargingState {
    PluggedOut,
    PluggedIn,
    PluggedInCharging,
    PluggedInPaused,
}

impl ChargingState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChargingState::PluggedOut => "plugged_out",
            ChargingState::PluggedIn => "plugged_in",
            ChargingState::PluggedInCharging => "plugged_in_charging",
            ChargingState::PluggedInPaused => "plugged_in_paused",
        }
    }

    pub fn is_charging(&self) -> bool {
        matches!(self, ChargingState::PluggedInCharging)
    }
}

/// Human readable description of a socket status code
pub fn status_description(code: i64) -> Option<&'static str> {
    let text = match code {
        0 => "Unknown",
        1 => "Off",
        2 => "Booting",
        3 => "Booting check mains",
        4 => "Available",
        5 => "Preparing: authorising",
        6 => "Preparing: authorised",
        7 => "Cable connected",
        8 => "EV connected",
        9 => "Charging preparing",
        10 => "Vehicle connected",
        11 => "Charging",
        12 => "Charging (simplified)",
        13 => "Suspended: over-current",
        14 => "Suspended: HF switching",
        15 => "Suspended: EV disconnected",
        16 => "Finished: waiting for vehicle",
        17 => "Session end",
        18 => "Error: protective earth",
        19 => "Error: powerline fault",
        20 => "Error: contactor fault",
        21 => "Error: charging",
        22 => "Error: power failure",
        23 => "Error: temperature",
        24 => "Error: illegal CP value",
        25 => "Error: illegal PP value",
        26 => "Connector lock failure",
        27 => "Error",
        28 => "Error: message",
        29 => "Error: not authorised",
        30 => "Error: cable not supported",
        31 => "Error: S2 not opened",
        32 => "Error: time-out",
        33 => "Reserved",
        34 => "Blocked",
        35 => "Load balancing limited",
        36 => "Paused",
        38 => "Not charging",
        39 => "Solar charging: waiting",
        41 => "Solar charging",
        42 => "Ready: waiting for power",
        43 => "Partial solar charging",
        _ => return None,
    };
    Some(text)
}

/// Charging state for a status code. Undefined codes count as unplugged.
pub fn charging_state(code: i64) -> ChargingState {
    match code {
        0..=6 => ChargingState::PluggedOut,
        7..=10 => ChargingState::PluggedIn,
        11 | 12 | 35 | 36 | 41 | 43 => ChargingState::PluggedInCharging,
        c if status_description(c).is_some() => ChargingState::PluggedInPaused,
        _ => ChargingState::PluggedOut,
    }
}

/// Result of normalizing one property
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Normalized {
    /// Value of the capability itself; `None` when the raw value is unusable
    pub value: Option<CapabilityValue>,
    /// Capabilities synthesized from this property
    pub derived: Vec<CapabilityValue>,
}

impl Normalized {
    fn none() -> Self {
        Self::default()
    }

    fn single(value: CapabilityValue) -> Self {
        Self {
            value: Some(value),
            derived: Vec::new(),
        }
    }

    /// Value followed by its derived values, in emission order
    pub fn into_values(self) -> impl Iterator<Item = CapabilityValue> {
        self.value.into_iter().chain(self.derived)
    }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Normalize the raw value of `prop_id` for `capability`
pub fn normalize(capability: CapabilityId, raw: Option<&WireValue>, prop_id: &str) -> Normalized {
    let Some(raw) = raw else {
        return Normalized::none();
    };

    match capability {
        CapabilityId::OperatingMode => normalize_operating_mode(raw, prop_id),

        CapabilityId::AuthMode | CapabilityId::ChargeType | CapabilityId::ChargeId => {
            Normalized::single(CapabilityValue::text(capability, raw.to_string()))
        }

        CapabilityId::GreenShare | CapabilityId::ComfortChargeLevel => {
            match raw.coerce_f64().filter(|v| v.is_finite()) {
                Some(v) => Normalized::single(CapabilityValue::number(capability, v)),
                None => {
                    dropped(capability, raw, prop_id);
                    Normalized::none()
                }
            }
        }

        CapabilityId::EvCharging | CapabilityId::EvChargingState => {
            // Only ever derived from the operating mode
            dropped(capability, raw, prop_id);
            Normalized::none()
        }

        _ => match raw.as_f64().filter(|v| v.is_finite()) {
            Some(v) => Normalized::single(CapabilityValue::number(
                capability,
                scale_numeric(capability, v),
            )),
            None => {
                dropped(capability, raw, prop_id);
                Normalized::none()
            }
        },
    }
}

fn normalize_operating_mode(raw: &WireValue, prop_id: &str) -> Normalized {
    let code = match raw.as_f64() {
        Some(v) if v.is_finite() && v.fract() == 0.0 => v as i64,
        _ => {
            dropped(CapabilityId::OperatingMode, raw, prop_id);
            return Normalized::none();
        }
    };

    let state = charging_state(code);
    Normalized {
        value: Some(CapabilityValue::text(
            CapabilityId::OperatingMode,
            status_description(code).unwrap_or("Unknown"),
        )),
        derived: vec![
            CapabilityValue::text(CapabilityId::EvChargingState, state.as_str()),
            CapabilityValue::boolean(CapabilityId::EvCharging, state.is_charging()),
        ],
    }
}

/// Fixed rounding and unit policy of the plain numeric capabilities
fn scale_numeric(capability: CapabilityId, v: f64) -> f64 {
    match capability {
        CapabilityId::MeasureVoltageL1
        | CapabilityId::MeasureVoltageL2
        | CapabilityId::MeasureVoltageL3 => v.round(),

        // Raw energy is in Wh
        CapabilityId::MeterPower => round_to(v / 1000.0, 2),

        CapabilityId::MeasurePower => {
            let watts = if v > 0.0 && v <= POWER_KW_THRESHOLD {
                v * 1000.0
            } else {
                v
            };
            round_to(watts, 1)
        }

        _ => round_to(v, 1),
    }
}

fn dropped(capability: CapabilityId, raw: &WireValue, prop_id: &str) {
    get_logger("normalize").debug(&format!(
        "Dropping unusable value {:?} of {} for {}",
        raw, prop_id, capability
    ));
}

fn numeric_of(values: &[CapabilityValue], capability: CapabilityId) -> Option<f64> {
    values
        .iter()
        .find(|v| v.capability == capability)
        .and_then(|v| v.value.as_f64())
        .filter(|v| v.is_finite())
}

/// Values synthesized from a normalized poll: the station current (largest
/// phase current) and per-phase power (voltage × current). Phases with a
/// missing input report zero so the capability set stays stable.
pub fn synthesize_derived(values: &[CapabilityValue]) -> Vec<CapabilityValue> {
    let phases = [
        (
            CapabilityId::MeasureVoltageL1,
            CapabilityId::MeasureCurrentL1,
            CapabilityId::MeasurePowerL1,
        ),
        (
            CapabilityId::MeasureVoltageL2,
            CapabilityId::MeasureCurrentL2,
            CapabilityId::MeasurePowerL2,
        ),
        (
            CapabilityId::MeasureVoltageL3,
            CapabilityId::MeasureCurrentL3,
            CapabilityId::MeasurePowerL3,
        ),
    ];

    let max_current = phases
        .iter()
        .filter_map(|(_, current, _)| numeric_of(values, *current))
        .fold(None, |acc: Option<f64>, c| Some(acc.map_or(c, |a| a.max(c))))
        .unwrap_or(0.0);

    let mut derived = vec![CapabilityValue::number(
        CapabilityId::MeasureCurrentTotal,
        round_to(max_current, 1),
    )];

    for (voltage, current, power) in phases {
        let watts = match (numeric_of(values, voltage), numeric_of(values, current)) {
            (Some(v), Some(i)) => round_to(v * i, 1),
            _ => 0.0,
        };
        derived.push(CapabilityValue::number(power, watts));
    }

    derived
}

/// Pull a typed number back out of a capability list
pub fn find_number(values: &[CapabilityValue], capability: CapabilityId) -> Option<f64> {
    values
        .iter()
        .find(|v| v.capability == capability)
        .and_then(|v| match &v.value {
            CapabilityValueKind::Number(n) => Some(*n),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn num(v: f64) -> WireValue {
        WireValue::Number(v)
    }

    fn value_of(n: &Normalized) -> &CapabilityValueKind {
        &n.value.as_ref().unwrap().value
    }

    #[test]
    fn test_status_11_is_charging() {
        let n = normalize(CapabilityId::OperatingMode, Some(&num(11.0)), "2501_2");
        assert_eq!(value_of(&n).as_str(), Some("Charging"));
        assert_eq!(
            n.derived,
            vec![
                CapabilityValue::text(CapabilityId::EvChargingState, "plugged_in_charging"),
                CapabilityValue::boolean(CapabilityId::EvCharging, true),
            ]
        );
    }

    #[test]
    fn test_status_4_is_unplugged() {
        let n = normalize(CapabilityId::OperatingMode, Some(&num(4.0)), "2501_2");
        assert_eq!(value_of(&n).as_str(), Some("Available"));
        assert_eq!(n.derived[0].value.as_str(), Some("plugged_out"));
        assert_eq!(n.derived[1].value.as_bool(), Some(false));
    }

    #[test]
    fn test_undefined_status_falls_back_to_unplugged() {
        assert_eq!(charging_state(99), ChargingState::PluggedOut);
        assert_eq!(charging_state(37), ChargingState::PluggedOut);
        assert_eq!(charging_state(-1), ChargingState::PluggedOut);
        let n = normalize(CapabilityId::OperatingMode, Some(&num(99.0)), "2501_2");
        assert_eq!(value_of(&n).as_str(), Some("Unknown"));
        assert_eq!(n.derived[1].value.as_bool(), Some(false));
    }

    #[test]
    fn test_charging_state_table() {
        for code in 0..=6 {
            assert_eq!(charging_state(code), ChargingState::PluggedOut);
        }
        for code in 7..=10 {
            assert_eq!(charging_state(code), ChargingState::PluggedIn);
        }
        for code in [11, 12, 35, 36, 41, 43] {
            assert!(charging_state(code).is_charging());
        }
        for code in [13, 17, 26, 34, 42] {
            assert_eq!(charging_state(code), ChargingState::PluggedInPaused);
        }
    }

    #[test]
    fn test_operating_mode_requires_integer_code() {
        let n = normalize(
            CapabilityId::OperatingMode,
            Some(&WireValue::Text("11".into())),
            "2501_2",
        );
        assert_eq!(n, Normalized::default());
        let n = normalize(CapabilityId::OperatingMode, Some(&num(11.5)), "2501_2");
        assert!(n.value.is_none());
    }

    #[test]
    fn test_string_form_capabilities() {
        let n = normalize(CapabilityId::AuthMode, Some(&num(2.0)), "2126_0");
        assert_eq!(value_of(&n).as_str(), Some("2"));
        let n = normalize(
            CapabilityId::ChargeType,
            Some(&WireValue::Text("Green".into())),
            "3280_1",
        );
        assert_eq!(value_of(&n).as_str(), Some("Green"));
    }

    #[test]
    fn test_green_share_coercion() {
        let n = normalize(
            CapabilityId::GreenShare,
            Some(&WireValue::Text("80".into())),
            "3280_2",
        );
        assert_eq!(value_of(&n).as_f64(), Some(80.0));

        let n = normalize(
            CapabilityId::ComfortChargeLevel,
            Some(&WireValue::Text("lots".into())),
            "3280_3",
        );
        assert!(n.value.is_none());

        let n = normalize(CapabilityId::GreenShare, Some(&num(f64::NAN)), "3280_2");
        assert!(n.value.is_none());
    }

    #[test]
    fn test_rounding_policy() {
        let t = normalize(CapabilityId::MeasureTemperature, Some(&num(31.4567)), "2201_0");
        assert_eq!(value_of(&t).as_f64(), Some(31.5));

        let v = normalize(CapabilityId::MeasureVoltageL1, Some(&num(229.62)), "2221_3");
        assert_eq!(value_of(&v).as_f64(), Some(230.0));

        let c = normalize(CapabilityId::MeasureCurrentL2, Some(&num(15.96)), "2221_B");
        assert_eq!(value_of(&c).as_f64(), Some(16.0));

        let e = normalize(CapabilityId::MeterPower, Some(&num(1_234_567.0)), "2221_22");
        assert_eq!(value_of(&e).as_f64(), Some(1234.57));
    }

    #[test]
    fn test_power_heuristic() {
        let kw = normalize(CapabilityId::MeasurePower, Some(&num(7.4)), "2221_16");
        assert_eq!(value_of(&kw).as_f64(), Some(7400.0));

        let boundary = normalize(CapabilityId::MeasurePower, Some(&num(200.0)), "2221_16");
        assert_eq!(value_of(&boundary).as_f64(), Some(200_000.0));

        let watts = normalize(CapabilityId::MeasurePower, Some(&num(3680.25)), "2221_16");
        assert_eq!(value_of(&watts).as_f64(), Some(3680.3));

        let zero = normalize(CapabilityId::MeasurePower, Some(&num(0.0)), "2221_16");
        assert_eq!(value_of(&zero).as_f64(), Some(0.0));

        // Per-phase power is already in watts
        let phase = normalize(CapabilityId::MeasurePowerL1, Some(&num(150.04)), "2221_16");
        assert_eq!(value_of(&phase).as_f64(), Some(150.0));
    }

    #[test]
    fn test_numeric_capability_rejects_text() {
        let n = normalize(
            CapabilityId::MeasureVoltageL1,
            Some(&WireValue::Text("230".into())),
            "2221_3",
        );
        assert!(n.value.is_none());
        assert_eq!(normalize(CapabilityId::MeasurePower, None, "2221_16"), Normalized::default());
    }

    #[test]
    fn test_derived_power_and_current() {
        let values = vec![
            CapabilityValue::number(CapabilityId::MeasureVoltageL1, 230.0),
            CapabilityValue::number(CapabilityId::MeasureCurrentL1, 10.0),
            CapabilityValue::number(CapabilityId::MeasureVoltageL2, 231.0),
            CapabilityValue::number(CapabilityId::MeasureCurrentL3, 12.3),
        ];
        let derived = synthesize_derived(&values);

        assert_eq!(find_number(&derived, CapabilityId::MeasureCurrentTotal), Some(12.3));
        assert_eq!(find_number(&derived, CapabilityId::MeasurePowerL1), Some(2300.0));
        assert_eq!(find_number(&derived, CapabilityId::MeasurePowerL2), Some(0.0));
        assert_eq!(find_number(&derived, CapabilityId::MeasurePowerL3), Some(0.0));
        assert_eq!(derived.len(), 4);
    }

    #[test]
    fn test_derived_with_no_readings_is_stable() {
        let derived = synthesize_derived(&[]);
        assert_eq!(derived.len(), 4);
        assert!(derived.iter().all(|v| v.value.as_f64() == Some(0.0)));
    }
}
