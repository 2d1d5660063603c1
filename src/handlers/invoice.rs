//! Invoice handlers: list, read, create, full update, delete.

use crate::error::AppError;
use crate::extractors::JsonBody;
use crate::response::{deleted, invoice_ok};
use crate::service::{RequestValidator, INVOICE_CREATE_MISSING, INVOICE_UPDATE_MISSING};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};

const INVOICE_NOT_FOUND: &str = "Invoice not found.";

fn parse_id(id_str: &str) -> Result<i64, AppError> {
    id_str
        .parse()
        .map_err(|_| AppError::BadRequest("invalid invoice id".into()))
}

/// An empty table is a valid empty array.
pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let invoices = state.store.list_invoices().await?;
    Ok(Json(invoices))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let invoice = state
        .store
        .get_invoice(id)
        .await?
        .ok_or_else(|| AppError::NotFound(INVOICE_NOT_FOUND.into()))?;
    Ok(Json(invoice))
}

pub async fn create(
    State(state): State<AppState>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let invoice = RequestValidator::invoice(&body, INVOICE_CREATE_MISSING)?;
    let invoice = state.store.insert_invoice(&invoice).await?;
    tracing::info!(id = invoice.id, comp_code = %invoice.comp_code, "invoice created");
    Ok(invoice_ok(invoice))
}

/// Full-row replacement; the updated row is returned without an envelope.
pub async fn update(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let invoice = RequestValidator::invoice(&body, INVOICE_UPDATE_MISSING)?;
    let invoice = state
        .store
        .update_invoice(id, &invoice)
        .await?
        .ok_or_else(|| AppError::NotFound(INVOICE_NOT_FOUND.into()))?;
    Ok(Json(invoice))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    if !state.store.delete_invoice(id).await? {
        return Err(AppError::NotFound(INVOICE_NOT_FOUND.into()));
    }
    tracing::info!(id, "invoice deleted");
    Ok(deleted())
}
