//! Success envelopes.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct CompanyEnvelope<T> {
    pub company: T,
}

#[derive(Serialize)]
pub struct InvoiceEnvelope<T> {
    pub invoice: T,
}

#[derive(Serialize)]
pub struct AddedEnvelope<T> {
    pub added: T,
}

#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

pub fn company_created<T: Serialize>(company: T) -> (StatusCode, Json<CompanyEnvelope<T>>) {
    (StatusCode::CREATED, Json(CompanyEnvelope { company }))
}

pub fn company_ok<T: Serialize>(company: T) -> Json<CompanyEnvelope<T>> {
    Json(CompanyEnvelope { company })
}

pub fn invoice_ok<T: Serialize>(invoice: T) -> Json<InvoiceEnvelope<T>> {
    Json(InvoiceEnvelope { invoice })
}

pub fn added<T: Serialize>(added: T) -> Json<AddedEnvelope<T>> {
    Json(AddedEnvelope { added })
}

pub fn deleted() -> Json<StatusBody> {
    Json(StatusBody { status: "deleted" })
}
