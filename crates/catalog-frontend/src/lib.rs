//! Headless frontend for the catalog admin.
//!
//! UI actions go through [`BackendBridge`]; responses come back over the
//! bridge and are rendered as text, while outcomes are surfaced through the
//! [`notifications::NotificationQueue`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::{Context, bail};
use catalog_bridge::config::Config;
use catalog_bridge::error::ApiError;
use catalog_bridge::models::{CategoryDraft, ProductDraft};
use catalog_bridge::notification::NotificationMessage;
use catalog_bridge::{
    MessageFromBackend, MessageToBackend, RequestId, ResourceAction, ResourceResponse,
};
use tokio::sync::mpsc;

use crate::notifications::NotificationQueue;

pub mod formatting;
pub mod notifications;
pub mod views;

/// A single UI action against one of the resource collections.
#[derive(Debug, Clone)]
pub enum Command {
    Products(ResourceAction<ProductDraft>),
    Categories(ResourceAction<CategoryDraft>),
}

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
    next_request_id: Arc<AtomicU64>,
}

impl BackendBridge {
    pub fn new(to_backend: mpsc::Sender<MessageToBackend>) -> Self {
        Self {
            to_backend,
            next_request_id: Arc::new(AtomicU64::new(1)),
        }
    }

    fn allocate_request_id(&self) -> RequestId {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    pub async fn request_config(&self) -> anyhow::Result<()> {
        self.to_backend
            .send(MessageToBackend::ConfigurationRequest)
            .await
            .context("failed to request config")
    }

    pub async fn products(
        &self,
        action: ResourceAction<ProductDraft>,
    ) -> anyhow::Result<RequestId> {
        let request_id = self.allocate_request_id();
        self.to_backend
            .send(MessageToBackend::ProductRequest { request_id, action })
            .await
            .context("failed to send product request")?;
        Ok(request_id)
    }

    pub async fn categories(
        &self,
        action: ResourceAction<CategoryDraft>,
    ) -> anyhow::Result<RequestId> {
        let request_id = self.allocate_request_id();
        self.to_backend
            .send(MessageToBackend::CategoryRequest { request_id, action })
            .await
            .context("failed to send category request")?;
        Ok(request_id)
    }
}

/// Frontend side of one run: the bridge plus the inbound message stream.
struct Session {
    bridge: BackendBridge,
    rx: mpsc::Receiver<MessageFromBackend>,
}

impl Session {
    /// Waits for the configuration, collecting any notifications the backend
    /// pushes before it.
    async fn configuration(&mut self) -> anyhow::Result<(Config, Vec<NotificationMessage>)> {
        self.bridge.request_config().await?;

        let mut early = Vec::new();
        loop {
            match self.rx.recv().await {
                Some(MessageFromBackend::ConfigurationResponse(config)) => {
                    return Ok((config, early));
                }
                Some(MessageFromBackend::NotificationMessage(notification)) => {
                    early.push(notification);
                }
                Some(other) => log::debug!("Ignoring message before configuration: {other:?}"),
                None => {
                    if early.is_empty() {
                        bail!("backend stopped before sending its configuration");
                    }
                    let reasons: Vec<String> =
                        early.into_iter().map(|notification| notification.message).collect();
                    bail!(
                        "backend stopped before sending its configuration: {}",
                        reasons.join("; ")
                    );
                }
            }
        }
    }

    /// Waits for the response to `request_id`, forwarding backend
    /// notifications to the queue in the meantime.
    async fn response_to(
        &mut self,
        request_id: RequestId,
        queue: &NotificationQueue,
    ) -> anyhow::Result<MessageFromBackend> {
        while let Some(message) = self.rx.recv().await {
            if response_id(&message) == Some(request_id) {
                return Ok(message);
            }
            match message {
                MessageFromBackend::NotificationMessage(notification) => {
                    queue.add(notification.message, notification.notification_type, None);
                }
                other => log::debug!("Ignoring unrelated message: {other:?}"),
            }
        }
        bail!("backend stopped before answering request #{request_id}")
    }

    /// Runs one command and reports the outcome through the queue.
    async fn execute(&mut self, command: Command, queue: &NotificationQueue) -> anyhow::Result<()> {
        let (noun, verb) = match &command {
            Command::Products(action) => ("Product", action.verb()),
            Command::Categories(action) => ("Category", action.verb()),
        };

        let request_id = match command {
            Command::Products(action) => self.bridge.products(action).await?,
            Command::Categories(action) => self.bridge.categories(action).await?,
        };

        let outcome = match self.response_to(request_id, queue).await? {
            MessageFromBackend::ProductResponse { result, .. } => {
                result.map(|response| print_response(&response, views::product_line))
            }
            MessageFromBackend::CategoryResponse { result, .. } => {
                result.map(|response| print_response(&response, views::category_line))
            }
            other => bail!("unexpected response: {other:?}"),
        };

        report(outcome, noun, verb, queue)
    }
}

fn response_id(message: &MessageFromBackend) -> Option<RequestId> {
    match message {
        MessageFromBackend::ProductResponse { request_id, .. }
        | MessageFromBackend::CategoryResponse { request_id, .. } => Some(*request_id),
        _ => None,
    }
}

/// Prints the rendered response and returns how many records it carried.
fn print_response<T>(response: &ResourceResponse<T>, line: impl Fn(&T) -> String) -> usize {
    for rendered in views::render_response(response, line) {
        println!("{rendered}");
    }
    match response {
        ResourceResponse::Many(envelope) => envelope.data.len(),
        ResourceResponse::One(_) => 1,
    }
}

/// Pushes the success or failure notification for a finished command. A
/// failure is also returned so the caller can exit unsuccessfully.
fn report(
    outcome: Result<usize, ApiError>,
    noun: &str,
    verb: &str,
    queue: &NotificationQueue,
) -> anyhow::Result<()> {
    match outcome {
        Ok(count) => {
            queue.success(success_message(noun, verb, count), None);
            Ok(())
        }
        Err(error) => {
            queue.error(error.describe(), None);
            Err(error.into())
        }
    }
}

fn success_message(noun: &str, verb: &str, count: usize) -> String {
    match verb {
        "list" => format!("Loaded {count} {} record(s)", noun.to_lowercase()),
        "fetch" => format!("{noun} loaded"),
        "create" => format!("{noun} created"),
        "update" => format!("{noun} updated"),
        "delete" => format!("{noun} deleted"),
        other => format!("{noun} {other} succeeded"),
    }
}

/// Runs the frontend for a single command on a single-threaded runtime.
///
/// Returns the [`ApiError`] (wrapped in `anyhow`) when the service rejected
/// the command, after it has been shown as an error notification.
pub fn run(
    rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
    command: Command,
) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async move {
        let mut session = Session {
            bridge: BackendBridge::new(tx),
            rx,
        };

        let (config, early) = session.configuration().await?;
        let queue = NotificationQueue::with_default_duration(config.notifications.default_duration_ms);
        let toasts = tokio::spawn(views::render_toasts(queue.subscribe()));

        for notification in early {
            queue.add(notification.message, notification.notification_type, None);
        }

        let outcome = session.execute(command, &queue).await;

        // dropping the last handle closes the subscription after a final render
        drop(queue);
        toasts.await?;
        outcome
    })
}
