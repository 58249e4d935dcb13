//! Axum request handlers for all service endpoints.

use axum::{extract::Query, http::StatusCode, response::IntoResponse, Json};
use common::protocol::{ErrorResponse, HelloQuery, HelloResponse, StatusResponse};
use openapiv3::OpenAPI;
use tracing::debug;

use super::openapi;

/// `GET /` — health check and welcome message.
///
/// Always `200 OK` while the process is reachable.
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse::alive())
}

/// `GET /hello` — echo the `name` query parameter back in a greeting.
///
/// `name` defaults to `"world"` when absent; if it is repeated, the last value
/// is used. Query strings the extractor cannot decode are rejected by axum
/// before this handler runs.
pub async fn hello(Query(pairs): Query<Vec<(String, String)>>) -> Json<HelloResponse> {
    let query = HelloQuery::from_pairs(pairs);
    debug!(name_len = query.name.len(), "greeting");
    Json(HelloResponse::greet(&query.name))
}

/// `GET /openapi.json` — machine-readable description of the routes above.
pub async fn openapi_document() -> Json<&'static OpenAPI> {
    Json(openapi::document())
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found()))
}

/// 405 for a known path requested with a method it does not serve.
pub async fn method_not_allowed() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::method_not_allowed()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
        routing::get,
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_router() -> Router {
        Router::new()
            .route("/", get(root))
            .route("/hello", get(hello).fallback(method_not_allowed))
            .fallback(not_found)
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        send_json("GET", uri).await
    }

    async fn send_json(method: &str, uri: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = test_router().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn root_reports_ok() {
        let (status, body) = get_json("/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["msg"], "OCSP Stapling Demo backend is alive");
    }

    #[tokio::test]
    async fn hello_defaults_to_world() {
        let (status, body) = get_json("/hello").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Hello, world!"}));
    }

    #[tokio::test]
    async fn hello_echoes_name() {
        let (_, body) = get_json("/hello?name=Ada").await;
        assert_eq!(body, json!({"message": "Hello, Ada!"}));
    }

    #[tokio::test]
    async fn hello_decodes_percent_encoding() {
        let (_, body) = get_json("/hello?name=J%C3%BCrgen%20M.").await;
        assert_eq!(body, json!({"message": "Hello, Jürgen M.!"}));
    }

    #[tokio::test]
    async fn hello_keeps_empty_name() {
        let (_, body) = get_json("/hello?name=").await;
        assert_eq!(body, json!({"message": "Hello, !"}));
    }

    #[tokio::test]
    async fn hello_repeated_name_uses_last_value() {
        let (status, body) = get_json("/hello?name=a&name=b").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Hello, b!"}));
    }

    #[tokio::test]
    async fn hello_ignores_unknown_params() {
        let (_, body) = get_json("/hello?lang=fr&name=Zo%C3%A9").await;
        assert_eq!(body, json!({"message": "Hello, Zoé!"}));
    }

    #[tokio::test]
    async fn responses_are_json() {
        for uri in ["/", "/hello"] {
            let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
            let resp = test_router().oneshot(req).await.unwrap();
            let ct = resp.headers()[header::CONTENT_TYPE].to_str().unwrap();
            assert_eq!(ct, "application/json", "content type for {uri}");
        }
    }

    #[tokio::test]
    async fn unknown_path_is_404_with_detail() {
        let (status, body) = get_json("/nonexistent").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"detail": "Not Found"}));
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_detail() {
        let (status, body) = send_json("POST", "/hello").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({"detail": "Method Not Allowed"}));
    }
}
