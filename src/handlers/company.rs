//! Company handlers: list, read with invoices, create, full update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::model::CompanyDetail;
use crate::response::{company_created, company_ok, deleted};
use crate::service::{RequestValidator, COMPANY_CREATE_MISSING, COMPANY_UPDATE_MISSING};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

/// An empty table is reported as a 400, unlike the invoice list.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let companies = state.store.list_companies().await?;
    if companies.is_empty() {
        return Err(AppError::Validation("No company data found.".into()));
    }
    Ok(Json(companies))
}

pub async fn read(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let company = state
        .store
        .get_company(&code)
        .await?
        .ok_or_else(|| AppError::NotFound("Not Found".into()))?;
    let invoices = state.store.invoices_for_company(&code).await?;
    Ok(Json(CompanyDetail { company, invoices }))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let company = RequestValidator::company(&body, COMPANY_CREATE_MISSING)?;
    let company = state.store.insert_company(&company).await?;
    tracing::info!(code = %company.code, "company created");
    Ok(company_created(company))
}

/// Replaces every column of the row at the path code; the body may carry a new code.
pub async fn update(
    State(state): State<AppState>,
    Path(code): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let company = RequestValidator::company(&body, COMPANY_UPDATE_MISSING)?;
    let company = state
        .store
        .update_company(&code, &company)
        .await?
        .ok_or_else(|| AppError::NotFound("No rows found.".into()))?;
    Ok(company_ok(company))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if !state.store.delete_company(&code).await? {
        return Err(AppError::NotFound("Company not found.".into()));
    }
    tracing::info!(code = %code, "company deleted");
    Ok(deleted())
}
