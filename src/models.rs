//! Wire payloads and charger description types

use crate::capability::CapabilityId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw property value as sent by the charger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl WireValue {
    /// Numeric value without any string coercion
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            WireValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value, parsing numeric strings
    pub fn coerce_f64(&self) -> Option<f64> {
        match self {
            WireValue::Number(n) => Some(*n),
            WireValue::Text(s) => s.trim().parse::<f64>().ok(),
            WireValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WireValue::Bool(b) => write!(f, "{}", b),
            WireValue::Number(n) => write!(f, "{}", n),
            WireValue::Text(s) => f.write_str(s),
        }
    }
}

/// One entry of the `/api/prop` response
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyResponse {
    pub id: String,
    #[serde(default)]
    pub access: Option<u32>,
    #[serde(default, rename = "type")]
    pub kind: Option<u32>,
    #[serde(default)]
    pub len: Option<u32>,
    #[serde(default)]
    pub cat: Option<String>,
    #[serde(default)]
    pub value: Option<WireValue>,
}

/// Envelope of the `/api/prop` response
#[derive(Debug, Clone, Deserialize)]
pub struct PropertyResponseBody {
    pub properties: Vec<PropertyResponse>,
    /// Total number of properties matching the query, when reported
    #[serde(default)]
    pub total: Option<u32>,
}

/// Normalized value handed to the consuming layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CapabilityValueKind {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl CapabilityValueKind {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CapabilityValueKind::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CapabilityValueKind::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CapabilityValueKind::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for CapabilityValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CapabilityValueKind::Bool(b) => write!(f, "{}", b),
            CapabilityValueKind::Number(n) => write!(f, "{}", n),
            CapabilityValueKind::Text(s) => f.write_str(s),
        }
    }
}

/// `{capabilityId, value}` pair produced by a poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapabilityValue {
    #[serde(rename = "capabilityId")]
    pub capability: CapabilityId,
    pub value: CapabilityValueKind,
}

impl CapabilityValue {
    pub fn number(capability: CapabilityId, value: f64) -> Self {
        Self {
            capability,
            value: CapabilityValueKind::Number(value),
        }
    }

    pub fn text<S: Into<String>>(capability: CapabilityId, value: S) -> Self {
        Self {
            capability,
            value: CapabilityValueKind::Text(value.into()),
        }
    }

    pub fn boolean(capability: CapabilityId, value: bool) -> Self {
        Self {
            capability,
            value: CapabilityValueKind::Bool(value),
        }
    }
}

/// Raw `/api/info` payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InfoResponse {
    #[serde(default)]
    pub identity: Option<String>,
    #[serde(default, rename = "SCNNetwork")]
    pub scn_network: Option<String>,
    #[serde(default, rename = "FWVersion")]
    pub fw_version: Option<String>,
    #[serde(default)]
    pub last_config: Option<u64>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub object_id: Option<String>,
    /// Socket topology string `"x.y.z"`
    #[serde(default, rename = "Type")]
    pub kind: Option<String>,
    #[serde(default, rename = "BOConnection")]
    pub bo_connection: Option<String>,
}

/// Connector type of a socket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SocketType {
    FixedCable = 0,
    Mennekes = 1,
    Fct = 2,
    Schuko = 3,
    FixCable1 = 4,
    FixCable2 = 5,
    FixCableCcs = 6,
    FixCableChaDeMo = 7,
}

impl SocketType {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(SocketType::FixedCable),
            1 => Some(SocketType::Mennekes),
            2 => Some(SocketType::Fct),
            3 => Some(SocketType::Schuko),
            4 => Some(SocketType::FixCable1),
            5 => Some(SocketType::FixCable2),
            6 => Some(SocketType::FixCableCcs),
            7 => Some(SocketType::FixCableChaDeMo),
            _ => None,
        }
    }

    fn parse_or_default(part: Option<&str>) -> Self {
        part.and_then(|p| p.trim().parse::<u8>().ok())
            .and_then(Self::from_code)
            .unwrap_or(SocketType::Mennekes)
    }
}

/// Socket configuration of a station (single or Duo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargerSockets {
    pub number_of_sockets: u8,
    pub socket_type_1: SocketType,
    pub socket_type_2: Option<SocketType>,
}

impl Default for ChargerSockets {
    fn default() -> Self {
        Self {
            number_of_sockets: 1,
            socket_type_1: SocketType::Mennekes,
            socket_type_2: None,
        }
    }
}

/// Parse the `"x.y.z"` topology string of `/api/info`.
///
/// `x == 2` means a Duo station; `y` and `z` are the connector types of
/// socket 1 and 2. Missing or invalid parts fall back to a Mennekes socket.
pub fn parse_charger_sockets(type_str: Option<&str>) -> ChargerSockets {
    let Some(type_str) = type_str.filter(|s| !s.trim().is_empty()) else {
        return ChargerSockets::default();
    };

    let mut parts = type_str.split('.');
    let x = parts.next().and_then(|p| p.trim().parse::<u8>().ok());
    let socket_type_1 = SocketType::parse_or_default(parts.next());
    let z = parts.next();

    if x == Some(2) {
        ChargerSockets {
            number_of_sockets: 2,
            socket_type_1,
            socket_type_2: Some(SocketType::parse_or_default(z)),
        }
    } else {
        ChargerSockets {
            number_of_sockets: 1,
            socket_type_1,
            socket_type_2: None,
        }
    }
}

/// Charger description assembled from `/api/info`
#[derive(Debug, Clone, Serialize)]
pub struct ChargerDetails {
    pub identity: Option<String>,
    pub model: Option<String>,
    pub firmware_version: Option<String>,
    pub content_type: Option<String>,
    pub object_id: Option<String>,
    pub sockets: ChargerSockets,
    /// Raw info payload
    pub info: InfoResponse,
}

impl From<InfoResponse> for ChargerDetails {
    fn from(info: InfoResponse) -> Self {
        Self {
            identity: info.identity.clone(),
            model: info.model.clone(),
            firmware_version: info.fw_version.clone(),
            content_type: info.content_type.clone(),
            object_id: info.object_id.clone(),
            sockets: parse_charger_sockets(info.kind.as_deref()),
            info,
        }
    }
}
