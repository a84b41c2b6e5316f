//! # alfen-bridge - Alfen Eve charger client for home automation
//!
//! Polls the proprietary HTTP property API of Alfen Eve (single and Duo)
//! chargers and turns raw property ids and values into normalized,
//! typed capability values.
//!
//! ## Architecture
//!
//! - `props`: property catalog and id codec (`0x222116` <-> `"2221_16"`)
//! - `capability`: per-socket property to capability mapping
//! - `transport`: HTTP requests over one keep-alive connection pool
//! - `session`: reference counted login/logout shared by concurrent callers
//! - `normalize`: rounding, unit conversion and derived values
//! - `client`: public facade (`AlfenClient`)
//! - `poller`: last-known values and the polling loop
//! - `config`: YAML configuration with validation
//! - `logging`: structured logging and tracing
//!
//! ## Usage
//!
//! ```no_run
//! use alfen_bridge::{AlfenClient, Config, SocketIndex};
//!
//! # async fn run() -> alfen_bridge::Result<()> {
//! let config = Config::load()?;
//! let client = AlfenClient::from_config(&config);
//! for value in client.poll_actual_values(SocketIndex::One).await? {
//!     println!("{} = {}", value.capability, value.value);
//! }
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod poller;
pub mod props;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use capability::{CapabilityId, CapabilityMap};
pub use client::{AlfenClient, AuthMode, ChargeType, Setting};
pub use config::Config;
pub use error::{AlfenError, Result};
pub use models::{CapabilityValue, ChargerDetails};
pub use props::SocketIndex;
