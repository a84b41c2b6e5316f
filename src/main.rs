use alfen_bridge::logging::{get_logger, init_logging};
use alfen_bridge::poller::Poller;
use alfen_bridge::{AlfenClient, Config};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load configuration from {}", path))?,
        None => Config::load().context("Failed to load configuration")?,
    };
    config.validate().context("Invalid configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    let logger = get_logger("main");
    logger.info(&format!(
        "alfen-bridge {} starting, charger {}",
        env!("APP_VERSION"),
        config.charger.base_url()
    ));

    let socket = config.charger.socket_index()?;
    let client = Arc::new(AlfenClient::from_config(&config));

    client.login().await.context("Login failed")?;
    let details = client.get_charger_details().await;
    client.logout().await;
    let details = details.context("Failed to read charger details")?;
    println!("{}", serde_json::to_string_pretty(&details)?);

    if socket.as_u8() > details.sockets.number_of_sockets {
        logger.warn(&format!(
            "Socket {} configured but the charger has {} socket(s)",
            socket, details.sockets.number_of_sockets
        ));
    }

    let mut poller = Poller::new(
        client,
        socket,
        Duration::from_secs(config.poll_interval_secs),
    );
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            get_logger("main").error(&format!("Failed to listen for ctrl-c: {}", e));
            std::future::pending::<()>().await;
        }
    };
    poller
        .run(shutdown, |changed| {
            for v in changed {
                println!("{} = {}", v.capability, v.value);
            }
        })
        .await;

    logger.info("alfen-bridge stopped");
    Ok(())
}
