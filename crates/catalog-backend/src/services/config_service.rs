/// Handles an incoming configuration request (see
/// [`catalog_bridge::MessageToBackend::ConfigurationRequest`]).
pub async fn handle_config_request(context: super::AppContextHandle) {
    log::debug!(
        "Serving configuration loaded from {:?}",
        context.state.config_path
    );
    let config = context.state.config.clone();
    context
        .send(catalog_bridge::MessageFromBackend::ConfigurationResponse(
            config,
        ))
        .await;
}
