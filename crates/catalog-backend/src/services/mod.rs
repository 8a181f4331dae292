//! Backend service handlers for frontend-driven requests.
//!
//! Each resource service fixes a collection path on top of the HTTP client
//! boundary and carries the handler that runs a bridged action and sends the
//! correlated response back to the frontend.

pub mod category_service;
pub mod config_service;
pub mod product_service;
pub mod resource;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::app::AppContext>;
