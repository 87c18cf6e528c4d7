//! API router.
//!
//! Returns a composable `Router` with every route nested under `/api/`,
//! wrapped in request tracing and permissive CORS for browser front ends.

use axum::extract::DefaultBodyLimit;
use axum::http::Uri;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, MAX_UPLOAD_BYTES};

pub fn api_router(ctx: ApiContext) -> Router {
    // Both audit routes lift axum's 2 MB default body limit to the upload limit.
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route(
            "/audit",
            post(endpoints::audit::upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route(
            "/audit/text",
            post(endpoints::audit::text).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
