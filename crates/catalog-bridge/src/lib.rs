//! Communication bridge between frontend and backend.
//!
//! This crate defines the types and protocols used to connect the catalog
//! admin frontend with an asynchronous backend that talks to the remote
//! catalog REST service.
//!
//! The design is deliberately lightweight and unidirectional:
//! - The frontend sends commands (e.g., list products, delete a category,
//!   request config).
//! - The backend pushes events (e.g., resource responses, normalized
//!   failures, notifications).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod config;
pub mod envelope;
pub mod error;
pub mod models;
pub mod notification;

use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::envelope::ResponseEnvelope;
use crate::error::ApiError;
use crate::models::{Category, CategoryDraft, Product, ProductDraft, QueryParams};

/// Identifier the frontend attaches to a resource request so the matching
/// response can be found; responses may arrive in any order.
pub type RequestId = u64;

/// One operation against a resource collection.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceAction<D> {
    /// List the collection, filtered by the given query parameters.
    List(QueryParams),
    /// Fetch a single record by id.
    Fetch(String),
    /// Create a record from a partial body.
    Create(D),
    /// Update the record with the given id.
    Update(String, D),
    /// Delete the record with the given id.
    Delete(String),
}

impl<D> ResourceAction<D> {
    /// Short verb describing the action, used in logs and notifications.
    pub fn verb(&self) -> &'static str {
        match self {
            ResourceAction::List(_) => "list",
            ResourceAction::Fetch(_) => "fetch",
            ResourceAction::Create(_) => "create",
            ResourceAction::Update(_, _) => "update",
            ResourceAction::Delete(_) => "delete",
        }
    }
}

/// Successful outcome of a [`ResourceAction`].
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceResponse<T> {
    /// Result of a list action.
    Many(ResponseEnvelope<Vec<T>>),
    /// Result of any single-record action.
    One(ResponseEnvelope<T>),
}

/// Outcome of a resource request as delivered to the frontend.
pub type ResourceResult<T> = Result<ResourceResponse<T>, ApiError>;

/// Messages emitted by the backend to inform the frontend of state updates.
///
/// These are typically sent in response to frontend requests or to push
/// asynchronous events (e.g., notifications).
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Generic message for backend-originated notifications.
    NotificationMessage(notification::NotificationMessage),
    /// Response to the configuration request from the frontend.
    ConfigurationResponse(config::Config),
    /// Response to a [`MessageToBackend::ProductRequest`].
    ProductResponse {
        request_id: RequestId,
        result: ResourceResult<Product>,
    },
    /// Response to a [`MessageToBackend::CategoryRequest`].
    CategoryResponse {
        request_id: RequestId,
        result: ResourceResult<Category>,
    },
}

/// Commands issued by the frontend to control or query the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Request for the application configuration.
    ConfigurationRequest,
    /// Run an action against the products collection.
    ProductRequest {
        request_id: RequestId,
        action: ResourceAction<ProductDraft>,
    },
    /// Run an action against the categories collection.
    CategoryRequest {
        request_id: RequestId,
        action: ResourceAction<CategoryDraft>,
    },
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
