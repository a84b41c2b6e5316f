//! Charger API client
//!
//! [`AlfenClient`] is the facade used by the consuming layer. The raw
//! operations (`get_actual_values`, the setters, `reboot_ev_charger`) expect
//! the caller to hold a session; `poll_actual_values` and `write_setting`
//! wrap a single operation in its own login/logout pair.

use crate::capability::CapabilityMap;
use crate::config::{ChargerCredentials, Config};
use crate::error::{AlfenError, Result};
use crate::logging::{LogContext, StructuredLogger, get_logger_with_context};
use crate::models::{CapabilityValue, ChargerDetails, InfoResponse, PropertyResponseBody};
use crate::normalize::{normalize, synthesize_derived};
use crate::props::catalog::{general, socket_base, solar};
use crate::props::{SocketIndex, actual_value_prop_ids, build_ids, for_socket, normalize_api_id, to_api_id};
use crate::session::SessionManager;
use crate::transport::{ApiRequest, Connector, HttpConnector};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

pub const CURRENT_LIMIT_RANGE: (f64, f64) = (1.0, 32.0);
pub const GREEN_SHARE_RANGE: (u32, u32) = (0, 100);
pub const COMFORT_LEVEL_RANGE: (u32, u32) = (1400, 5000);

/// Authorization mode of the station
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    PlugAndCharge,
    Rfid,
}

impl AuthMode {
    pub fn code(self) -> u8 {
        match self {
            AuthMode::PlugAndCharge => 0,
            AuthMode::Rfid => 2,
        }
    }
}

/// Solar charging behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeType {
    Disable,
    Comfort,
    Green,
}

impl ChargeType {
    pub fn code(self) -> u8 {
        match self {
            ChargeType::Disable => 0,
            ChargeType::Comfort => 1,
            ChargeType::Green => 2,
        }
    }
}

/// A single write accepted by [`AlfenClient::write_setting`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "setting", content = "value", rename_all = "snake_case")]
pub enum Setting {
    CurrentLimit { amps: f64, socket: SocketIndex },
    ChargeType(ChargeType),
    GreenShare(u32),
    ComfortChargeLevel(u32),
    AuthMode(AuthMode),
    Reboot,
}

impl Setting {
    /// Range check without any I/O
    pub fn validate(&self) -> Result<()> {
        match *self {
            Setting::CurrentLimit { amps, socket } => check_current_limit(amps, socket),
            Setting::GreenShare(p) => check_range(
                &to_api_id(solar::GREEN_SHARE),
                p,
                GREEN_SHARE_RANGE,
                "%",
            ),
            Setting::ComfortChargeLevel(w) => check_range(
                &to_api_id(solar::COMFORT_CHARGE_LEVEL),
                w,
                COMFORT_LEVEL_RANGE,
                " W",
            ),
            Setting::ChargeType(_) | Setting::AuthMode(_) | Setting::Reboot => Ok(()),
        }
    }
}

fn check_current_limit(amps: f64, socket: SocketIndex) -> Result<()> {
    let (min, max) = CURRENT_LIMIT_RANGE;
    if amps.is_finite() && (min..=max).contains(&amps) {
        return Ok(());
    }
    Err(AlfenError::property_write(
        to_api_id(for_socket(socket_base::CURRENT_LIMIT, socket)),
        format!("current limit {} A outside {}..={} A", amps, min, max),
    ))
}

fn check_range(property: &str, value: u32, (min, max): (u32, u32), unit: &str) -> Result<()> {
    if (min..=max).contains(&value) {
        return Ok(());
    }
    Err(AlfenError::property_write(
        property.to_string(),
        format!("{}{} outside {}..={}{}", value, unit, min, max, unit),
    ))
}

/// Client for one charger
pub struct AlfenClient {
    session: SessionManager,
    logger: StructuredLogger,
}

impl AlfenClient {
    /// Client talking HTTPS to the configured charger
    pub fn from_config(config: &Config) -> Self {
        let connector = HttpConnector::new(
            config.charger.base_url(),
            config.http.request_timeout(),
            config.http.pool_idle_timeout(),
        );
        Self::with_connector(Arc::new(connector), config.charger.credentials())
    }

    pub fn with_connector(connector: Arc<dyn Connector>, credentials: ChargerCredentials) -> Self {
        let logger = get_logger_with_context(
            LogContext::new("client").with_field("host", credentials.host.clone()),
        );
        Self {
            session: SessionManager::new(connector, credentials),
            logger,
        }
    }

    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    pub async fn login(&self) -> Result<()> {
        self.session.login().await
    }

    pub async fn logout(&self) {
        self.session.logout().await
    }

    /// Query `/api/info` and derive the socket topology
    pub async fn get_charger_details(&self) -> Result<ChargerDetails> {
        let body = self.get_json("/api/info").await?;
        let info: InfoResponse = serde_json::from_value(body)
            .map_err(|e| AlfenError::parse(format!("Invalid info response: {}", e)))?;
        let details = ChargerDetails::from(info);
        self.logger.debug(&format!(
            "Charger {} ({}), firmware {}, {} socket(s)",
            details.identity.as_deref().unwrap_or("?"),
            details.model.as_deref().unwrap_or("?"),
            details.firmware_version.as_deref().unwrap_or("?"),
            details.sockets.number_of_sockets
        ));
        Ok(details)
    }

    /// Read and normalize the actual values of one socket.
    ///
    /// Values come in response order, followed by the derived values.
    pub async fn get_actual_values(&self, socket: SocketIndex) -> Result<Vec<CapabilityValue>> {
        let ids = actual_value_prop_ids(socket);
        let body = self
            .get_json(&format!("/api/prop?ids={}", build_ids(&ids)))
            .await?;
        let parsed: PropertyResponseBody = serde_json::from_value(body)
            .map_err(|e| AlfenError::parse(format!("Invalid property response: {}", e)))?;

        if let Some(total) = parsed.total {
            if total as usize > parsed.properties.len() {
                self.logger.debug(&format!(
                    "Charger reported {} of {} properties",
                    parsed.properties.len(),
                    total
                ));
            }
        }

        let map = CapabilityMap::for_socket(socket);
        let mut values = Vec::with_capacity(map.len() + 6);
        for prop in &parsed.properties {
            let id = normalize_api_id(&prop.id);
            let Some(capability) = map.get(&id) else {
                continue;
            };
            values.extend(normalize(capability, prop.value.as_ref(), &id).into_values());
        }
        let derived = synthesize_derived(&values);
        values.extend(derived);

        Ok(values)
    }

    pub async fn set_current_limit(&self, amps: f64, socket: SocketIndex) -> Result<()> {
        check_current_limit(amps, socket)?;
        let id = to_api_id(for_socket(socket_base::CURRENT_LIMIT, socket));
        self.write_property(&id, json!(amps)).await
    }

    pub async fn set_charge_type(&self, charge_type: ChargeType) -> Result<()> {
        self.write_property(&to_api_id(solar::CHARGE_TYPE), json!(charge_type.code()))
            .await
    }

    pub async fn set_green_share_percentage(&self, percentage: u32) -> Result<()> {
        Setting::GreenShare(percentage).validate()?;
        self.write_property(&to_api_id(solar::GREEN_SHARE), json!(percentage))
            .await
    }

    pub async fn set_comfort_charge_level(&self, watts: u32) -> Result<()> {
        Setting::ComfortChargeLevel(watts).validate()?;
        self.write_property(&to_api_id(solar::COMFORT_CHARGE_LEVEL), json!(watts))
            .await
    }

    pub async fn set_auth_mode(&self, mode: AuthMode) -> Result<()> {
        self.write_property(&to_api_id(general::AUTH_MODE), json!(mode.code()))
            .await
    }

    pub async fn reboot_ev_charger(&self) -> Result<()> {
        let connection = self.session.connection().await?;
        let body = json!({"command": "reboot"}).to_string();
        connection
            .send(ApiRequest::post("/api/cmd", Some(body)))
            .await?;
        self.logger.info("Reboot requested");
        Ok(())
    }

    /// `login`, read, and always `logout`
    pub async fn poll_actual_values(&self, socket: SocketIndex) -> Result<Vec<CapabilityValue>> {
        self.login().await?;
        let result = self.get_actual_values(socket).await;
        self.logout().await;
        result
    }

    /// Validate, `login`, write, and always `logout`
    pub async fn write_setting(&self, setting: Setting) -> Result<()> {
        setting.validate()?;
        self.login().await?;
        let result = match setting {
            Setting::CurrentLimit { amps, socket } => self.set_current_limit(amps, socket).await,
            Setting::ChargeType(t) => self.set_charge_type(t).await,
            Setting::GreenShare(p) => self.set_green_share_percentage(p).await,
            Setting::ComfortChargeLevel(w) => self.set_comfort_charge_level(w).await,
            Setting::AuthMode(m) => self.set_auth_mode(m).await,
            Setting::Reboot => self.reboot_ev_charger().await,
        };
        self.logout().await;
        result
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let connection = self.session.connection().await?;
        connection
            .send(ApiRequest::get(path))
            .await?
            .body
            .into_json()
    }

    async fn write_property(&self, id: &str, value: Value) -> Result<()> {
        let connection = self.session.connection().await?;
        let mut payload = serde_json::Map::new();
        payload.insert(id.to_string(), json!({ "id": id, "value": value }));
        let body = Value::Object(payload).to_string();

        match connection
            .send(ApiRequest::post("/api/prop", Some(body)))
            .await
        {
            Ok(_) => {
                self.logger.info(&format!("Wrote {} = {}", id, value));
                Ok(())
            }
            Err(e) => {
                self.logger
                    .warn(&format!("Writing {} = {} failed: {}", id, value, e));
                Err(AlfenError::property_write(id.to_string(), e.to_string()))
            }
        }
    }
}
