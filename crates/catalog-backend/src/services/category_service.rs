use catalog_bridge::models::{Category, CategoryDraft};
use catalog_bridge::{MessageFromBackend, RequestId, ResourceAction};

use super::resource::ResourceService;
use crate::client::ApiClient;

pub const CATEGORIES_PATH: &str = "/categories";

/// Operations on the categories collection.
pub fn categories(client: &ApiClient) -> ResourceService<'_, Category, CategoryDraft> {
    ResourceService::new(client, CATEGORIES_PATH)
}

/// Handles an incoming category request (see
/// [`catalog_bridge::MessageToBackend::CategoryRequest`]).
pub async fn handle_category_request(
    context: super::AppContextHandle,
    request_id: RequestId,
    action: ResourceAction<CategoryDraft>,
) {
    let service = categories(&context.state.client);
    log::info!(
        "Running category {} request #{request_id} against {}",
        action.verb(),
        service.path()
    );
    let result = service.run(action).await;

    context
        .send(MessageFromBackend::CategoryResponse { request_id, result })
        .await;
}

#[cfg(test)]
mod tests {
    use catalog_bridge::config::ApiConfig;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::test_support::serve_once;

    #[tokio::test]
    async fn create_posts_to_collection_path() {
        let (base_url, server) = serve_once(
            201,
            r#"{"success":true,"data":{"_id":"c9","name":"Garden","slug":"garden","createdAt":"2024-02-01T00:00:00Z","updatedAt":"2024-02-01T00:00:00Z"}}"#,
        )
        .await;
        let client = ApiClient::new(&ApiConfig {
            base_url,
            request_timeout_secs: None,
        })
        .unwrap();

        let draft = CategoryDraft {
            name: Some("Garden".into()),
            ..Default::default()
        };
        let envelope = categories(&client).create(&draft).await.unwrap();
        assert_eq!(envelope.data.id, "c9");
        assert_eq!(envelope.data.description, None);

        let request = server.await.unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.target, "/api/categories");
        assert_eq!(request.body, r#"{"name":"Garden"}"#);
    }
}
