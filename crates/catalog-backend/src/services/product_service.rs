use catalog_bridge::models::{Product, ProductDraft};
use catalog_bridge::{MessageFromBackend, RequestId, ResourceAction};

use super::resource::ResourceService;
use crate::client::ApiClient;

pub const PRODUCTS_PATH: &str = "/products";

/// Operations on the products collection.
pub fn products(client: &ApiClient) -> ResourceService<'_, Product, ProductDraft> {
    ResourceService::new(client, PRODUCTS_PATH)
}

/// Handles an incoming product request (see
/// [`catalog_bridge::MessageToBackend::ProductRequest`]).
pub async fn handle_product_request(
    context: super::AppContextHandle,
    request_id: RequestId,
    action: ResourceAction<ProductDraft>,
) {
    let service = products(&context.state.client);
    log::info!(
        "Running product {} request #{request_id} against {}",
        action.verb(),
        service.path()
    );
    let result = service.run(action).await;

    context
        .send(MessageFromBackend::ProductResponse { request_id, result })
        .await;
}
