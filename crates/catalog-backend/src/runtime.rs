//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, the HTTP client boundary, and
//! the message dispatch loop that listens to frontend bridge requests.

use std::{sync::Arc, thread};

use catalog_bridge::config::Config;
use catalog_bridge::notification::NotificationType;
use catalog_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::app::AppContext;
use crate::client::{ApiClient, ClientError};
use crate::state::State;

/// Initialize backend state and start processing frontend messages.
async fn setup_backend(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    let mut warnings = Vec::new();
    let (mut config, config_path) = match crate::config::load_config().await {
        Ok((config, path)) => (config, Some(path)),
        Err(error) => {
            log::error!("Failed to load configuration, using defaults: {error}");
            warnings.push(format!("Configuration could not be loaded ({error}), using defaults."));
            (Config::default(), None)
        }
    };
    crate::config::apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    let client = match ApiClient::new(&config.api) {
        Ok(client) => client,
        Err(error) => {
            report_fatal(&tx, error).await;
            return;
        }
    };
    log::info!("Talking to the catalog service at {}", client.base_url());

    let state = Arc::new(State {
        config,
        config_path,
        client,
    });

    let context = Arc::new(AppContext { state, tx });
    for warning in warnings {
        context
            .send_notification(NotificationType::Warning, warning)
            .await;
    }
    context.consume_bridge_messages(rx).await;
}

/// Tells the frontend why the backend cannot start. Dropping `tx` afterwards
/// closes the bridge.
async fn report_fatal(tx: &Sender<MessageFromBackend>, error: ClientError) {
    log::error!("Cannot start backend: {error}");
    let message = MessageFromBackend::NotificationMessage(
        catalog_bridge::notification::NotificationMessage {
            notification_type: NotificationType::Error,
            message: error.to_string(),
        },
    );
    if let Err(error) = tx.send(message).await {
        log::warn!("Frontend is gone, dropping startup failure: {:?}", error.0);
    }
}

/// Spawn the backend runtime and begin processing bridge messages.
///
/// The returned handle finishes once the frontend closes its side of the
/// bridge or the backend fails to start.
pub fn run(
    rx: Receiver<MessageToBackend>,
    tx: Sender<MessageFromBackend>,
) -> std::io::Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("catalog-backend".into())
        .spawn(move || runtime.block_on(setup_backend(rx, tx)))
}
