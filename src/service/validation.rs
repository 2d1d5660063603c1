//! Request validation: presence, type and boolean-domain checks that turn a JSON body
//! into typed input. Runs before any write.

use crate::error::AppError;
use crate::model::{Company, CompanyIndustry, NewIndustry, NewInvoice};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use std::collections::HashMap;

pub const COMPANY_CREATE_MISSING: &str = "Not enough data to add company.";
pub const COMPANY_UPDATE_MISSING: &str = "Not enough data.";
pub const INVOICE_CREATE_MISSING: &str = "Not enough data to add item.";
pub const INVOICE_UPDATE_MISSING: &str =
    "You must update every field to update item. Use same values on other columns if necessary";
pub const PAID_NOT_BOOLEAN: &str = "Paid column must be true or false.";
pub const INDUSTRY_MISSING: &str = "Not enough data to add new industry.";
pub const ASSOCIATION_MISSING: &str = "Not enough data to add association.";

pub struct RequestValidator;

impl RequestValidator {
    /// `code`, `name` and `description` must all be non-empty strings.
    pub fn company(body: &HashMap<String, Value>, missing: &str) -> Result<Company, AppError> {
        match (
            non_empty_str(body, "code"),
            non_empty_str(body, "name"),
            non_empty_str(body, "description"),
        ) {
            (Some(code), Some(name), Some(description)) => Ok(Company {
                code,
                name,
                description,
            }),
            _ => Err(AppError::Validation(missing.to_string())),
        }
    }

    /// Full invoice body. Presence first (`missing` message), then `paid` in {true, false},
    /// then the types of `amt`, `add_date` and `paid_date`. `paid_date` may be `null`, but
    /// any other absent-looking value counts as missing.
    pub fn invoice(body: &HashMap<String, Value>, missing: &str) -> Result<NewInvoice, AppError> {
        let comp_code = non_empty_str(body, "comp_code");
        let amt = body.get("amt").filter(|v| is_present(v));
        let add_date = body.get("add_date").filter(|v| is_present(v));
        let paid_date = body.get("paid_date").filter(|v| v.is_null() || is_present(v));
        let (Some(comp_code), Some(amt), Some(add_date), Some(paid_date)) =
            (comp_code, amt, add_date, paid_date)
        else {
            return Err(AppError::Validation(missing.to_string()));
        };

        let paid = match body.get("paid") {
            Some(Value::Bool(b)) => *b,
            _ => return Err(AppError::Validation(PAID_NOT_BOOLEAN.to_string())),
        };

        let amt = amt
            .as_f64()
            .ok_or_else(|| AppError::Validation("amt must be a number.".into()))?;
        let add_date = add_date
            .as_str()
            .and_then(parse_timestamp)
            .ok_or_else(|| AppError::Validation("add_date must be a timestamp.".into()))?;
        let paid_date = match paid_date {
            Value::Null => None,
            v => Some(
                v.as_str()
                    .and_then(parse_timestamp)
                    .ok_or_else(|| AppError::Validation("paid_date must be a timestamp or null.".into()))?,
            ),
        };

        Ok(NewInvoice {
            comp_code,
            amt,
            paid,
            add_date,
            paid_date,
        })
    }

    /// `code` and `industry` must both be non-empty strings.
    pub fn industry(body: &HashMap<String, Value>) -> Result<NewIndustry, AppError> {
        match (non_empty_str(body, "code"), non_empty_str(body, "industry")) {
            (Some(code), Some(industry)) => Ok(NewIndustry { code, industry }),
            _ => Err(AppError::Validation(INDUSTRY_MISSING.to_string())),
        }
    }

    /// `code` (company) as a non-empty string and `id` (industry) as an integer.
    pub fn company_industry(body: &HashMap<String, Value>) -> Result<CompanyIndustry, AppError> {
        let industry_id = body.get("id").and_then(Value::as_i64);
        match (non_empty_str(body, "code"), industry_id) {
            (Some(company_code), Some(industry_id)) => Ok(CompanyIndustry {
                company_code,
                industry_id,
            }),
            _ => Err(AppError::Validation(ASSOCIATION_MISSING.to_string())),
        }
    }
}

fn non_empty_str(body: &HashMap<String, Value>, key: &str) -> Option<String> {
    body.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Presence the way a required form field is judged: null, false, zero and "" are absent.
fn is_present(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// RFC 3339 timestamp, or a bare `YYYY-MM-DD` date taken as midnight UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
