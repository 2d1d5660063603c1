//! Data store seam. Handlers receive a `Store` through `AppState`; the PostgreSQL and
//! in-memory implementations live in the submodules.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, ensure_tables, PgStore};

use crate::error::AppError;
use crate::model::{Company, CompanyIndustry, IndustryCreated, Invoice, NewIndustry, NewInvoice};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    async fn list_companies(&self) -> Result<Vec<Company>, AppError>;
    async fn get_company(&self, code: &str) -> Result<Option<Company>, AppError>;
    async fn insert_company(&self, company: &Company) -> Result<Company, AppError>;
    /// Replace every column of the row currently keyed by `code`. `None` when no row matched.
    async fn update_company(&self, code: &str, company: &Company) -> Result<Option<Company>, AppError>;
    /// `false` when no row was deleted.
    async fn delete_company(&self, code: &str) -> Result<bool, AppError>;

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError>;
    async fn invoices_for_company(&self, comp_code: &str) -> Result<Vec<Invoice>, AppError>;
    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>, AppError>;
    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError>;
    async fn update_invoice(&self, id: i64, invoice: &NewInvoice) -> Result<Option<Invoice>, AppError>;
    async fn delete_invoice(&self, id: i64) -> Result<bool, AppError>;

    /// Codes of the industries whose name equals `industry`.
    async fn industry_codes(&self, industry: &str) -> Result<Vec<String>, AppError>;
    /// Insert the industry and, when a company with the same code exists, the
    /// association row. Both writes commit together or not at all.
    async fn insert_industry(&self, industry: &NewIndustry) -> Result<IndustryCreated, AppError>;
    /// Insert an association row as given; neither side is checked.
    async fn insert_company_industry(&self, link: &CompanyIndustry) -> Result<(), AppError>;
    async fn company_industries(&self, company_code: &str) -> Result<Vec<CompanyIndustry>, AppError>;
}
