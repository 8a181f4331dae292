//! HTTP client boundary for the catalog REST service.
//!
//! Every outbound request goes through [`ApiClient`]. Callers get back either
//! the decoded [`ResponseEnvelope`] or an [`ApiError`]; raw transport errors
//! and un-normalized error bodies never leave this module.

use std::time::Duration;

use catalog_bridge::config::ApiConfig;
use catalog_bridge::envelope::ResponseEnvelope;
use catalog_bridge::error::{ApiError, FailureCause, FieldError};
use catalog_bridge::models::QueryParams;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};

/// Errors raised while constructing an [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The configured base address is not an absolute URL.
    #[error("invalid API base address {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    /// The base address uses a scheme other than `http` or `https`.
    #[error("unsupported scheme in API base address {0:?}")]
    UnsupportedScheme(String),
    /// The underlying HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),
}

/// The single outbound channel to the catalog service.
///
/// Base address and default headers are fixed at construction. Cloning is
/// cheap and shares the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let parsed = Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::UnsupportedScheme(config.base_url.clone()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full request URL for a path such as `/products/42`.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &QueryParams,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        let url = self.url(path);
        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(&query.pairs());
        }
        self.execute(Method::GET, &url, request).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<ResponseEnvelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.client.post(&url).json(body);
        self.execute(Method::POST, &url, request).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> Result<ResponseEnvelope<T>, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let request = self.client.put(&url).json(body);
        self.execute(Method::PUT, &url, request).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        let url = self.url(path);
        let request = self.client.delete(&url);
        self.execute(Method::DELETE, &url, request).await
    }

    /// Sends the request once and normalizes whatever comes back.
    async fn execute<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        request: RequestBuilder,
    ) -> Result<ResponseEnvelope<T>, ApiError> {
        log::debug!("{method} {url}");

        let result = match request.send().await {
            Ok(response) => read_response(response).await,
            Err(error) => Err(transport_failure(error)),
        };

        if let Err(error) = &result {
            log::warn!(
                "{method} {url} failed with status {}: {} ({:?})",
                error.status_code,
                error.message,
                error.cause
            );
        }
        result
    }
}

async fn read_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ResponseEnvelope<T>, ApiError> {
    let status = response.status().as_u16();

    if !response.status().is_success() {
        let body = response.text().await.ok().filter(|body| !body.is_empty());
        return Err(status_failure(status, body));
    }

    let bytes = response.bytes().await.map_err(transport_failure)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        ApiError::normalize(
            None,
            None,
            None,
            FailureCause::Decode {
                status,
                detail: e.to_string(),
            },
        )
    })
}

fn transport_failure(error: reqwest::Error) -> ApiError {
    let timeout = error.is_timeout();
    let connect = error.is_connect();
    ApiError::transport(error.without_url().to_string(), timeout, connect)
}

/// Normalizes a non-2xx response. `message` and `errors` are read from the
/// body independently; a body that is not a JSON object contributes neither.
fn status_failure(status: u16, body: Option<String>) -> ApiError {
    let parsed = body
        .as_deref()
        .and_then(|body| serde_json::from_str::<serde_json::Value>(body).ok());

    let message = parsed
        .as_ref()
        .and_then(|value| value.get("message"))
        .and_then(|message| message.as_str())
        .map(str::to_string);
    let errors = parsed
        .as_ref()
        .and_then(|value| value.get("errors"))
        .and_then(|errors| errors.as_array())
        .map(|entries| entries.iter().filter_map(field_error).collect());

    ApiError::normalize(
        message,
        errors,
        Some(status),
        FailureCause::Status { status, body },
    )
}

/// Reads one entry of an `errors` array. Entries without a string `message`
/// are skipped; a path that cannot be rendered is dropped on its own.
fn field_error(entry: &serde_json::Value) -> Option<FieldError> {
    let message = entry.get("message")?.as_str()?.to_string();
    let path = entry
        .get("path")
        .and_then(|path| path.as_array())
        .and_then(|segments| segments.iter().map(path_segment).collect());
    Some(FieldError { message, path })
}

fn path_segment(segment: &serde_json::Value) -> Option<String> {
    match segment {
        serde_json::Value::String(name) => Some(name.clone()),
        serde_json::Value::Number(index) => Some(index.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use catalog_bridge::error::DEFAULT_ERROR_MESSAGE;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::test_support::{serve_once, unused_base_url};

    fn client(base_url: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base_url.to_string(),
            request_timeout_secs: None,
        })
        .unwrap()
    }

    #[test]
    fn rejects_relative_base_address() {
        let error = ApiClient::new(&ApiConfig {
            base_url: "/api".into(),
            request_timeout_secs: None,
        })
        .unwrap_err();
        assert!(matches!(error, ClientError::InvalidBaseUrl { .. }));

        let error = ApiClient::new(&ApiConfig {
            base_url: "ftp://example.com/api".into(),
            request_timeout_secs: None,
        })
        .unwrap_err();
        assert!(matches!(error, ClientError::UnsupportedScheme(_)));
    }

    #[test]
    fn paths_are_appended_to_base_address() {
        let client = client("http://localhost:3000/api/");
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url("/products/7"), "http://localhost:3000/api/products/7");
    }

    #[tokio::test]
    async fn returns_whole_envelope_on_success() {
        let (base_url, server) = serve_once(
            200,
            r#"{"success":true,"data":[1,2,3],"pagination":{"total":3,"page":1,"limit":10,"totalPages":1}}"#,
        )
        .await;

        let query = QueryParams::new().with("page", 1u32).with("search", "lamp");
        let envelope: ResponseEnvelope<Vec<u32>> =
            client(&base_url).get("/products", &query).await.unwrap();

        assert!(envelope.success);
        assert_eq!(envelope.data, vec![1, 2, 3]);
        assert_eq!(envelope.pagination.map(|p| p.total_pages), Some(1));

        let request = server.await.unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.target, "/api/products?page=1&search=lamp");
        assert_eq!(request.header("content-type"), Some("application/json"));
    }

    #[tokio::test]
    async fn sends_json_bodies() {
        let (base_url, server) = serve_once(201, r#"{"success":true,"data":"ok"}"#).await;

        let envelope: ResponseEnvelope<String> = client(&base_url)
            .put("/categories/c1", &json!({ "name": "Lighting" }))
            .await
            .unwrap();
        assert_eq!(envelope.data, "ok");

        let request = server.await.unwrap();
        assert_eq!(request.method, "PUT");
        assert_eq!(request.target, "/api/categories/c1");
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&request.body).unwrap(),
            json!({ "name": "Lighting" })
        );
    }

    #[tokio::test]
    async fn normalizes_validation_failures() {
        let body = r#"{"message":"Invalid SKU","errors":[{"message":"required","path":["sku"]}]}"#;
        let (base_url, _server) = serve_once(422, body).await;

        let error = client(&base_url)
            .post::<_, serde_json::Value>("/products", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(error.message, "Invalid SKU");
        assert_eq!(
            error.errors,
            Some(vec![FieldError {
                message: "required".into(),
                path: Some(vec!["sku".into()]),
            }])
        );
        assert_eq!(error.status_code, 422);
        assert_eq!(
            error.cause,
            FailureCause::Status {
                status: 422,
                body: Some(body.to_string()),
            }
        );
    }

    #[tokio::test]
    async fn keeps_each_well_formed_field_error() {
        let body = r#"{"message":"Validation failed","errors":[{"message":"required","path":["sku"]},{"message":"too short","path":["tags",0]},{"message":"bad path","path":[{"key":"x"}]},{"path":["name"]}]}"#;
        let (base_url, _server) = serve_once(422, body).await;

        let error = client(&base_url)
            .post::<_, serde_json::Value>("/products", &json!({}))
            .await
            .unwrap_err();

        assert_eq!(error.message, "Validation failed");
        assert_eq!(
            error.errors,
            Some(vec![
                FieldError {
                    message: "required".into(),
                    path: Some(vec!["sku".into()]),
                },
                FieldError {
                    message: "too short".into(),
                    path: Some(vec!["tags".into(), "0".into()]),
                },
                FieldError {
                    message: "bad path".into(),
                    path: None,
                },
            ])
        );
        assert_eq!(error.status_code, 422);
    }

    #[tokio::test]
    async fn empty_failure_body_uses_default_message() {
        let (base_url, _server) = serve_once(503, "").await;

        let error = client(&base_url)
            .delete::<serde_json::Value>("/products/p1")
            .await
            .unwrap_err();

        assert_eq!(error.message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(error.errors, None);
        assert_eq!(error.status_code, 503);
    }

    #[tokio::test]
    async fn non_json_failure_body_keeps_status() {
        let (base_url, _server) = serve_once(502, "<html>Bad Gateway</html>").await;

        let error = client(&base_url)
            .get::<serde_json::Value>("/categories", &QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(error.message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(error.errors, None);
        assert_eq!(error.status_code, 502);
    }

    #[tokio::test]
    async fn message_and_errors_default_independently() {
        let (base_url, _server) =
            serve_once(400, r#"{"errors":[{"message":"too long"}]}"#).await;

        let error = client(&base_url)
            .get::<serde_json::Value>("/categories", &QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(error.message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(
            error.errors,
            Some(vec![FieldError {
                message: "too long".into(),
                path: None,
            }])
        );
        assert_eq!(error.status_code, 400);
    }

    #[tokio::test]
    async fn transport_failure_defaults_to_500() {
        let base_url = unused_base_url();

        let error = client(&base_url)
            .get::<serde_json::Value>("/products", &QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(error.message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(error.errors, None);
        assert_eq!(error.status_code, 500);
        assert!(matches!(error.cause, FailureCause::Transport { .. }));
    }

    #[tokio::test]
    async fn undecodable_success_body_is_normalized() {
        let (base_url, _server) = serve_once(200, r#"{"data":"missing success flag"}"#).await;

        let error = client(&base_url)
            .get::<String>("/products/p1", &QueryParams::new())
            .await
            .unwrap_err();

        assert_eq!(error.message, DEFAULT_ERROR_MESSAGE);
        assert_eq!(error.status_code, 500);
        assert!(matches!(error.cause, FailureCause::Decode { status: 200, .. }));
    }
}
