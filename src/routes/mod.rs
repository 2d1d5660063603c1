//! Router assembly: API routes, common routes, 404 fallback and middleware.

mod api;
mod common;

pub use api::{company_routes, industry_routes, invoice_routes};
pub use common::common_routes;

use crate::config::DEFAULT_BODY_LIMIT_BYTES;
use crate::error::AppError;
use crate::state::AppState;
use axum::http::StatusCode;
use axum::middleware::map_response;
use axum::response::{IntoResponse, Response};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

pub const BODY_TOO_LARGE: &str = "Request body too large.";

async fn not_found() -> AppError {
    AppError::NotFound("Not Found".into())
}

/// `RequestBodyLimitLayer` answers a too-long Content-Length with its own plain-text 413.
async fn wrap_body_limit(resp: Response) -> Response {
    if resp.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return AppError::PayloadTooLarge(BODY_TOO_LARGE.into()).into_response();
    }
    resp
}

/// Full application router with the default body limit.
pub fn app(state: AppState) -> Router {
    app_with_body_limit(state, DEFAULT_BODY_LIMIT_BYTES)
}

pub fn app_with_body_limit(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .merge(common_routes(state.clone()))
        .merge(company_routes(state.clone()))
        .merge(invoice_routes(state.clone()))
        .merge(industry_routes(state))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .layer(RequestBodyLimitLayer::new(body_limit_bytes))
        .layer(map_response(wrap_body_limit))
        .layer(TraceLayer::new_for_http())
}
