//! Axum router construction.

use std::time::Duration;

use axum::{routing::get, Router};

use super::{handlers, middleware};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(request_timeout: Duration) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::root).fallback(handlers::method_not_allowed))
        .route(
            "/hello",
            get(handlers::hello).fallback(handlers::method_not_allowed),
        )
        .route(
            "/openapi.json",
            get(handlers::openapi_document).fallback(handlers::method_not_allowed),
        )
        .fallback(handlers::not_found);

    middleware::apply(routes, request_timeout)
}
