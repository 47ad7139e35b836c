//! Contains all the routes that this application can handle.

mod api;

// re-export errors
pub use api::waitlist::WaitlistError;

use crate::{web, AppState};

use axum::{
    http::{header::CONTENT_TYPE, Method, StatusCode},
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Turns axum's empty 405 into the regular JSON error, the `Allow` header is kept.
async fn method_not_allowed(method: Method) -> web::Error {
    web::Error::MethodNotAllowed(method)
}

/// All the routes of the server.
/// The waitlist routes are served both at the root and nested under "/api".
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .merge(waitlist_routes(app_state.clone()))
        .nest("/api", waitlist_routes(app_state))
        .route("/health-check", get(health_check))
}

/// WAITLIST - every route gets its own CORS policy limited to its method.
/// The `CorsLayer` answers every `OPTIONS` request, preflight or not.
fn waitlist_routes(app_state: AppState) -> Router {
    let submit = Router::new()
        .route("/waitlist", post(api::waitlist_submit))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors_layer(Method::POST));

    let count = Router::new()
        .route("/waitlist/count", get(api::waitlist_count))
        .method_not_allowed_fallback(method_not_allowed)
        .layer(cors_layer(Method::GET));

    submit.merge(count).with_state(app_state)
}

fn cors_layer(method: Method) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([method, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}
