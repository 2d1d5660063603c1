//! Industry handlers: code lookup by industry name, creation with automatic company
//! link, and explicit company/industry association.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::NewIndustry;
use crate::response::added;
use crate::service::RequestValidator;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

/// Codes of every industry row carrying this name. No match is an empty array.
pub async fn codes_by_industry(
    State(state): State<AppState>,
    Path(industry): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let codes = state.store.industry_codes(&industry).await?;
    Ok(Json(codes))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let industry = RequestValidator::industry(&body)?;
    let created = state.store.insert_industry(&industry).await?;
    tracing::info!(
        industry_id = created.industry.id,
        code = %created.industry.code,
        linked = created.linked,
        "industry created"
    );
    Ok(added(NewIndustry {
        code: created.industry.code,
        industry: created.industry.industry,
    }))
}

/// Links the body's company code to the body's industry id. The path segment is not
/// consulted and neither side is checked for existence.
pub async fn associate(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let link = RequestValidator::company_industry(&body)?;
    state.store.insert_company_industry(&link).await?;
    Ok(added(link))
}
