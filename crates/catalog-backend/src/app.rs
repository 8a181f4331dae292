//! Application context and message dispatching utilities.
//!
//! The context contains the shared state and provides helpers for sending
//! responses and notifications back to the frontend bridge.

use std::sync::Arc;

use catalog_bridge::notification::{NotificationMessage, NotificationType};
use catalog_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::services;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Runtime application state shared across services.
    pub state: SharedState,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl AppContext {
    /// Read and dispatch messages from the frontend bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a frontend message: {message:?}");
            self.dispatch_message(message).await;
        }
        log::debug!("Frontend bridge closed, stopping dispatch");
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    ///
    /// Resource requests run on their own tasks, so a slow request never
    /// holds up the ones issued after it.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::ConfigurationRequest => {
                services::config_service::handle_config_request(self.clone()).await;
            }
            MessageToBackend::ProductRequest { request_id, action } => {
                tokio::spawn(services::product_service::handle_product_request(
                    self.clone(),
                    request_id,
                    action,
                ));
            }
            MessageToBackend::CategoryRequest { request_id, action } => {
                tokio::spawn(services::category_service::handle_category_request(
                    self.clone(),
                    request_id,
                    action,
                ));
            }
        }
    }

    /// Send a message to the frontend bridge. Messages sent after the
    /// frontend has gone away are dropped.
    pub async fn send(&self, message: MessageFromBackend) {
        if let Err(error) = self.tx.send(message).await {
            log::warn!("Frontend is gone, dropping message: {:?}", error.0);
        }
    }

    /// Send a notification message to the frontend bridge.
    pub async fn send_notification(
        &self,
        notification_type: NotificationType,
        content: impl Into<String>,
    ) {
        self.send(MessageFromBackend::NotificationMessage(
            NotificationMessage {
                notification_type,
                message: content.into(),
            },
        ))
        .await;
    }
}
