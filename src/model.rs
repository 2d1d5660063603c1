//! Row types for companies, invoices, industries and their association.

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: String,
}

/// A company together with every invoice whose `comp_code` matches it.
#[derive(Clone, Debug, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    pub invoices: Vec<Invoice>,
}

/// Stored invoice. The generated `id` addresses the row but is not part of the JSON shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Invoice {
    #[serde(skip)]
    pub id: i64,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
}

/// Validated invoice fields for an insert or a full-row update.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewInvoice {
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<DateTime<Utc>>,
}

impl NewInvoice {
    pub fn into_invoice(self, id: i64) -> Invoice {
        Invoice {
            id,
            comp_code: self.comp_code,
            amt: self.amt,
            paid: self.paid,
            add_date: self.add_date,
            paid_date: self.paid_date,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Industry {
    pub id: i64,
    pub code: String,
    pub industry: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewIndustry {
    pub code: String,
    pub industry: String,
}

/// Result of creating an industry: the stored row, and whether a company with the
/// same code existed and was linked to it.
#[derive(Clone, Debug)]
pub struct IndustryCreated {
    pub industry: Industry,
    pub linked: bool,
}

/// Row of `companyindustries`. Serialized as `{code, id}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanyIndustry {
    #[serde(rename = "code")]
    pub company_code: String,
    #[serde(rename = "id")]
    pub industry_id: i64,
}
