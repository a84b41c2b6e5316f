//! Charger session management
//!
//! The charger accepts a single authenticated session, bound to the
//! keep-alive connection it was opened on. [`SessionManager`] shares that
//! session between overlapping callers with a reference count: the first
//! `login()` authenticates, later ones reuse the connection, and the last
//! matching `logout()` deauthenticates and drops it.
//!
//! Every `login()` must be paired with exactly one `logout()`.

use crate::config::ChargerCredentials;
use crate::error::{AlfenError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::transport::{ApiRequest, Connector, Transport};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Reference count above which the session is assumed leaked
pub const MAX_SESSION_REFS: u32 = 10;

#[derive(Serialize)]
struct LoginBody<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Default)]
struct SessionState {
    connection: Option<Arc<dyn Transport>>,
    ref_count: u32,
}

/// Reference counted charger session
pub struct SessionManager {
    connector: Arc<dyn Connector>,
    credentials: ChargerCredentials,
    state: Mutex<SessionState>,
    logger: StructuredLogger,
}

impl SessionManager {
    pub fn new(connector: Arc<dyn Connector>, credentials: ChargerCredentials) -> Self {
        Self {
            connector,
            credentials,
            state: Mutex::new(SessionState::default()),
            logger: get_logger("session"),
        }
    }

    /// Establish a session or join the existing one
    pub async fn login(&self) -> Result<()> {
        // Held across the network login so nobody reuses an
        // unauthenticated connection
        let mut state = self.state.lock().await;
        let body = serde_json::to_string(&LoginBody {
            username: &self.credentials.username,
            password: &self.credentials.password,
        })?;

        if state.ref_count > MAX_SESSION_REFS {
            self.logger.warn(&format!(
                "Session reference count {} exceeds {}, forcing a logout",
                state.ref_count, MAX_SESSION_REFS
            ));
            self.release(&mut state).await;
            state.ref_count = 1;
        }

        if state.connection.is_none() {
            state.ref_count = 0;
        }
        state.ref_count += 1;

        if state.connection.is_some() {
            self.logger.trace(&format!(
                "Reusing session (references: {})",
                state.ref_count
            ));
            return Ok(());
        }

        let connection = match self.connector.connect() {
            Ok(c) => c,
            Err(e) => {
                state.ref_count = 0;
                return Err(AlfenError::auth(format!("Could not open connection: {}", e)));
            }
        };

        match connection.send(ApiRequest::post("/api/login", Some(body))).await {
            Ok(_) => {
                self.logger
                    .debug(&format!("Logged in to {}", self.credentials.host));
                state.connection = Some(connection);
                Ok(())
            }
            Err(e) => {
                state.ref_count = 0;
                self.logger.warn(&format!("Login failed: {}", e));
                Err(AlfenError::auth(format!(
                    "Login to {} failed: {}",
                    self.credentials.host, e
                )))
            }
        }
    }

    /// Release one reference; the last one logs out. Never fails.
    pub async fn logout(&self) {
        let mut state = self.state.lock().await;
        self.release(&mut state).await;
    }

    async fn release(&self, state: &mut SessionState) {
        state.ref_count = state.ref_count.saturating_sub(1);
        if state.ref_count > 0 {
            return;
        }

        let Some(connection) = state.connection.take() else {
            return;
        };
        match connection
            .send(ApiRequest::post("/api/logout", None).closing())
            .await
        {
            Ok(_) => self
                .logger
                .debug(&format!("Logged out of {}", self.credentials.host)),
            Err(e) => self.logger.warn(&format!("Logout failed: {}", e)),
        }
    }

    /// Connection of the active session
    pub async fn connection(&self) -> Result<Arc<dyn Transport>> {
        self.state
            .lock()
            .await
            .connection
            .clone()
            .ok_or(AlfenError::NotLoggedIn)
    }

    pub async fn ref_count(&self) -> u32 {
        self.state.lock().await.ref_count
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.connection.is_some()
    }
}
