use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// The review UI runs on its own origin and calls the store directly.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
