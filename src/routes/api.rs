//! Company, invoice and industry routes.

use crate::handlers::{company, industry, invoice};
use crate::state::AppState;
use axum::{routing::get, routing::post, Router};

pub fn company_routes(state: AppState) -> Router {
    Router::new()
        .route("/companies", get(company::list).post(company::create))
        .route(
            "/companies/:code",
            get(company::read).put(company::update).delete(company::delete),
        )
        .with_state(state)
}

pub fn invoice_routes(state: AppState) -> Router {
    Router::new()
        .route("/invoices", get(invoice::list).post(invoice::create))
        .route(
            "/invoices/:id",
            get(invoice::read).put(invoice::update).delete(invoice::delete),
        )
        .with_state(state)
}

/// GET and POST on `/industries/:industry` share one path pattern; the POST handler
/// (explicit association) ignores the segment.
pub fn industry_routes(state: AppState) -> Router {
    Router::new()
        .route("/industries", post(industry::create))
        .route(
            "/industries/:industry",
            get(industry::codes_by_industry).post(industry::associate),
        )
        .with_state(state)
}
