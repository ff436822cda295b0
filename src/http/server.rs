//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the contact API and the static page
//! - Wire up middleware (request ID, tracing, timeout, body limit, panics)
//! - Bind server to listener and drain on shutdown

use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::DefaultBodyLimit,
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::handlers;
use crate::http::page;
use crate::http::request::{request_id_of, MakeRequestUuid};
use crate::http::response::ApiError;
use crate::observability::metrics::track_requests;
use crate::store::ContactStore;

/// Request context injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ContactStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn ContactStore>) -> Self {
        Self { store }
    }
}

/// HTTP server for the contact API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over `store`.
    pub fn new(config: &ServerConfig, store: Arc<dyn ContactStore>) -> Self {
        let router = Self::build_router(config, AppState::new(store));
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServerConfig, state: AppState) -> Router {
        let layers = ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %request_id_of(request),
                    )
                }),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::custom(panic_response))
            .layer(middleware::map_response(timeout_as_json))
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )));

        Router::new()
            .route("/", get(page::index))
            .route("/static/js/main.js", get(page::main_js))
            .route(
                "/api/contacts",
                get(handlers::list_contacts).post(handlers::create_contact),
            )
            .route(
                "/api/contacts/{id}",
                get(handlers::get_contact)
                    .put(handlers::update_contact)
                    .delete(handlers::delete_contact),
            )
            .route_layer(middleware::from_fn(track_requests))
            .fallback(handlers::route_not_found)
            .method_not_allowed_fallback(handlers::method_not_allowed)
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.listener.max_body_bytes))
            .layer(layers)
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Consume the server, returning its router.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Give the timeout layer's bare 408 the API error shape.
async fn timeout_as_json(response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        return ApiError::Timeout.into_response();
    }
    response
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!(panic = %detail, "Handler panicked");
    ApiError::internal().into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{
        Contact, ContactFields, ContactId, SqliteContactStore, StoreError, StoreResult,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Store whose every call fails as if the disk were gone.
    struct BrokenStore;

    impl ContactStore for BrokenStore {
        fn list_all(&self) -> StoreResult<Vec<Contact>> {
            Err(StoreError::Unavailable("disk I/O error at /var/db".into()))
        }
        fn get(&self, _id: ContactId) -> StoreResult<Contact> {
            Err(StoreError::Unavailable("disk I/O error at /var/db".into()))
        }
        fn create(&self, _fields: ContactFields) -> StoreResult<Contact> {
            Err(StoreError::Unavailable("disk I/O error at /var/db".into()))
        }
        fn update(&self, _id: ContactId, _fields: ContactFields) -> StoreResult<Contact> {
            Err(StoreError::Unavailable("disk I/O error at /var/db".into()))
        }
        fn delete(&self, _id: ContactId) -> StoreResult<()> {
            Err(StoreError::Unavailable("disk I/O error at /var/db".into()))
        }
    }

    async fn json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn router() -> Router {
        let store = Arc::new(SqliteContactStore::open_in_memory().unwrap());
        HttpServer::new(&ServerConfig::default(), store).into_router()
    }

    async fn send(method: &str, uri: &str, body: &'static str) -> Response {
        router()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn serves_index_page() {
        let response = send("GET", "/", "").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_route_is_json_404() {
        let response = send("GET", "/nope", "").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"error":"Resource not found"}"#);
    }

    #[tokio::test]
    async fn wrong_method_is_405() {
        let response = send("PATCH", "/api/contacts/1", "{}").await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = ServerConfig::default();
        config.listener.max_body_bytes = 8;
        let store = Arc::new(SqliteContactStore::open_in_memory().unwrap());
        let response = HttpServer::new(&config, store)
            .into_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/contacts")
                    .body(Body::from(r#"{"name":"A very long name"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Request body too large" })
        );
    }

    #[tokio::test]
    async fn malformed_query_is_json_400() {
        let response = send("GET", "/api/contacts?search=a&search=b", "").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Invalid query string" })
        );
    }

    #[tokio::test]
    async fn timeouts_are_json_408() {
        let bare = StatusCode::REQUEST_TIMEOUT.into_response();
        let response = timeout_as_json(bare).await;
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
        assert_eq!(
            json_body(response).await,
            json!({ "error": "Request timed out" })
        );

        let ok = timeout_as_json(StatusCode::OK.into_response()).await;
        assert_eq!(ok.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn store_failures_are_generic_500s() {
        let router = HttpServer::new(&ServerConfig::default(), Arc::new(BrokenStore)).into_router();

        let cases = [
            ("POST", "/api/contacts", r#"{"name":"Alice"}"#, "Failed to create contact"),
            ("GET", "/api/contacts", "", "Failed to fetch contacts"),
            ("GET", "/api/contacts/3", "", "Failed to fetch contact 3"),
            ("PUT", "/api/contacts/3", r#"{"name":"Alice"}"#, "Failed to update contact 3"),
            ("DELETE", "/api/contacts/3", "", "Failed to delete contact 3"),
        ];
        for (method, uri, body, message) in cases {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method(method)
                        .uri(uri)
                        .body(Body::from(body))
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");

            let body = json_body(response).await;
            assert_eq!(body, json!({ "error": message }));
            assert!(!body.to_string().contains("disk"));
        }
    }
}
