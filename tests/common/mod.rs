//! In-memory charger used by the client and session tests

#![allow(dead_code)]

use alfen_bridge::config::ChargerCredentials;
use alfen_bridge::error::{AlfenError, Result};
use alfen_bridge::transport::{ApiRequest, ApiResponse, Connector, Method, ResponseBody, Transport};
use alfen_bridge::AlfenClient;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct MockState {
    pub connects: usize,
    pub requests: Vec<ApiRequest>,
    pub login_status: Option<u16>,
    pub prop_status: Option<u16>,
    pub write_status: Option<u16>,
    pub logout_fails: bool,
    pub login_delay: Option<Duration>,
    pub prop_body: Value,
    pub info_body: Value,
}

#[derive(Clone, Default)]
pub struct MockCharger {
    pub state: Arc<Mutex<MockState>>,
}

impl MockCharger {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().prop_body = json!({"properties": [], "total": 0});
        mock
    }

    pub fn with(self, f: impl FnOnce(&mut MockState)) -> Self {
        f(&mut self.state.lock().unwrap());
        self
    }

    pub fn client(&self) -> AlfenClient {
        AlfenClient::with_connector(
            Arc::new(self.clone()),
            ChargerCredentials {
                host: "charger.local".into(),
                username: "admin".into(),
                password: "secret".into(),
            },
        )
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    /// Paths of all requests, query stripped
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| r.path.split('?').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.paths().iter().filter(|p| *p == path).count()
    }
}

impl Connector for MockCharger {
    fn connect(&self) -> Result<Arc<dyn Transport>> {
        self.state.lock().unwrap().connects += 1;
        Ok(Arc::new(self.clone()))
    }
}

fn ok(body: ResponseBody) -> Result<ApiResponse> {
    Ok(ApiResponse {
        status: 200,
        content_type: Some("alfen/json; charset=utf-8".into()),
        body,
    })
}

fn fail(status: u16, path: &str) -> Result<ApiResponse> {
    Err(AlfenError::status(status, format!("Request to {} failed", path)))
}

#[async_trait::async_trait]
impl Transport for MockCharger {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let (delay, login_status, prop_status, write_status, logout_fails, prop_body, info_body) = {
            let mut s = self.state.lock().unwrap();
            s.requests.push(request.clone());
            (
                s.login_delay,
                s.login_status,
                s.prop_status,
                s.write_status,
                s.logout_fails,
                s.prop_body.clone(),
                s.info_body.clone(),
            )
        };

        let path = request.path.split('?').next().unwrap_or_default();
        match (request.method, path) {
            (Method::Post, "/api/login") => {
                if let Some(d) = delay {
                    tokio::time::sleep(d).await;
                }
                match login_status {
                    Some(status) => fail(status, path),
                    None => ok(ResponseBody::Text(String::new())),
                }
            }
            (Method::Post, "/api/logout") if logout_fails => {
                Err(AlfenError::request("connection reset by peer"))
            }
            (Method::Post, "/api/logout") => ok(ResponseBody::Text(String::new())),
            (Method::Get, "/api/prop") => match prop_status {
                Some(status) => fail(status, path),
                None => ok(ResponseBody::Json(prop_body)),
            },
            (Method::Post, "/api/prop") => match write_status {
                Some(status) => fail(status, path),
                None => ok(ResponseBody::Text(String::new())),
            },
            (Method::Get, "/api/info") => ok(ResponseBody::Json(info_body)),
            (Method::Post, "/api/cmd") => ok(ResponseBody::Text(String::new())),
            _ => fail(404, path),
        }
    }
}

/// Property body of a socket 1 charger that is charging on one phase
pub fn charging_socket1_body() -> Value {
    json!({
        "version": 2,
        "properties": [
            {"id": "2201_0", "access": 1, "type": 8, "len": 0, "cat": "temp", "value": 34.56},
            {"id": "2062_0", "access": 1, "type": 8, "len": 0, "cat": "generic", "value": 32.0},
            {"id": "2126_0", "access": 3, "type": 5, "len": 0, "cat": "generic", "value": 2},
            {"id": "2063_0", "access": 3, "type": 9, "len": 32, "cat": "generic", "value": "ABC123"},
            {"id": "3280_1", "access": 3, "type": 5, "len": 0, "cat": "generic", "value": 1},
            {"id": "3280_2", "access": 3, "type": 5, "len": 0, "cat": "generic", "value": "80"},
            {"id": "3280_3", "access": 3, "type": 5, "len": 0, "cat": "generic", "value": 1400},
            {"id": "3190_1", "access": 1, "type": 5, "len": 0, "cat": "states", "value": 3},
            {"id": "2501_2", "access": 1, "type": 5, "len": 0, "cat": "states", "value": 11},
            {"id": "2221_3", "access": 1, "type": 8, "len": 0, "cat": "meter1", "value": 229.8},
            {"id": "2221_4", "access": 1, "type": 8, "len": 0, "cat": "meter1", "value": 231.2},
            {"id": "2221_5", "access": 1, "type": 8, "len": 0, "cat": "meter1", "value": 230.4},
            {"id": "2221_A", "access": 1, "type": 8, "len": 0, "cat": "meter1", "value": 10.0},
            {"id": "2221_b", "access": 1, "type": 8, "len": 0, "cat": "meter1", "value": 0.04},
            {"id": "2221_0C", "access": 1, "type": 8, "len": 0, "cat": "meter1", "value": 0.0},
            {"id": "2129_0", "access": 3, "type": 8, "len": 0, "cat": "generic", "value": 16.0},
            {"id": "2221_16", "access": 1, "type": 8, "len": 0, "cat": "meter4", "value": 2298.0},
            {"id": "2221_22", "access": 1, "type": 8, "len": 0, "cat": "meter4", "value": 1234567.0},
            {"id": "2221_26", "access": 1, "type": 8, "len": 0, "cat": "meter4", "value": 42.0}
        ],
        "offset": 0,
        "total": 19
    })
}
