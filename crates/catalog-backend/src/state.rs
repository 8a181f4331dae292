use crate::client::ApiClient;

/// The core application state that holds configuration and the HTTP client
/// boundary.
///
/// Everything here is fixed once the backend has started, so tasks share it
/// through a plain [`std::sync::Arc`] (see [`SharedState`]).
#[derive(Debug, Clone)]
pub struct State {
    /// The loaded application configuration, environment overrides applied.
    pub config: catalog_bridge::config::Config,
    /// Where the configuration was loaded from, if it came from disk.
    pub config_path: Option<std::path::PathBuf>,
    /// The single outbound channel to the catalog service.
    pub client: ApiClient,
}

/// Thread-safe shared reference to the application [`State`].
pub type SharedState = std::sync::Arc<State>;
