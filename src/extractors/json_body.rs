//! Extract a JSON object body as a field map, with failures in the error envelope.

use crate::error::AppError;
use crate::routes::BODY_TOO_LARGE;
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde_json::Value;
use std::collections::HashMap;

/// JSON object body keyed by field name. An empty body is an empty map, so handlers
/// report their own missing-field message rather than a parse error.
#[derive(Clone, Debug, Default)]
pub struct JsonBody(pub HashMap<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                AppError::PayloadTooLarge(BODY_TOO_LARGE.into())
            } else {
                AppError::BadRequest(format!("failed to read body: {}", e))
            }
        })?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(JsonBody::default());
        }
        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::BadRequest(format!("invalid JSON body: {}", e)))?;
        body_to_map(value).map(JsonBody)
    }
}

fn body_to_map(value: Value) -> Result<HashMap<String, Value>, AppError> {
    match value {
        Value::Object(m) => Ok(m.into_iter().collect()),
        _ => Err(AppError::BadRequest("body must be a JSON object".into())),
    }
}
