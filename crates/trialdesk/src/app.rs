use std::time::Duration;

use axum::{
    extract::OriginalUri,
    http::{header, Method, StatusCode},
    response::IntoResponse,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use trialdesk_core::response::ApiResponse;

use crate::{
    handlers::{resource_routes, Envelope},
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    // CORS configuration for API endpoints
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::CONTENT_TYPE]);

    // One route pair per collection
    let api_routes = Router::new()
        .merge(resource_routes(state.trials))
        .merge(resource_routes(state.sites))
        .merge(resource_routes(state.patients))
        .merge(resource_routes(state.documents))
        .merge(resource_routes(state.adverse_events))
        .merge(resource_routes(state.regulatory_approvals))
        .merge(resource_routes(state.audit_logs))
        .merge(resource_routes(state.users))
        .layer(cors);

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> impl IntoResponse {
    Envelope(ApiResponse::<()>::error(
        404,
        format!("No route for {method} {}", uri.path()),
    ))
}
