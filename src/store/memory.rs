//! In-memory store for development and tests. Tables sit behind one `RwLock`, so every
//! operation, including industry creation with its link, is atomic.

use super::Store;
use crate::error::AppError;
use crate::model::{Company, CompanyIndustry, Industry, IndustryCreated, Invoice, NewIndustry, NewInvoice};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    /// Insertion order is the listing order, as with an unordered SELECT on a fresh table.
    companies: Vec<Company>,
    invoices: BTreeMap<i64, Invoice>,
    industries: BTreeMap<i64, Industry>,
    company_industries: Vec<CompanyIndustry>,
    next_invoice_id: i64,
    next_industry_id: i64,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, AppError> {
        self.tables
            .read()
            .map_err(|e| AppError::Store(format!("failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, AppError> {
        self.tables
            .write()
            .map_err(|e| AppError::Store(format!("failed to acquire write lock: {}", e)))
    }
}

impl Tables {
    fn company_exists(&self, code: &str) -> bool {
        self.companies.iter().any(|c| c.code == code)
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        Ok(self.read()?.companies.clone())
    }

    async fn get_company(&self, code: &str) -> Result<Option<Company>, AppError> {
        Ok(self.read()?.companies.iter().find(|c| c.code == code).cloned())
    }

    async fn insert_company(&self, company: &Company) -> Result<Company, AppError> {
        let mut tables = self.write()?;
        if tables.company_exists(&company.code) {
            return Err(AppError::Store(format!("duplicate company code '{}'", company.code)));
        }
        tables.companies.push(company.clone());
        Ok(company.clone())
    }

    async fn update_company(&self, code: &str, company: &Company) -> Result<Option<Company>, AppError> {
        let mut tables = self.write()?;
        let Some(pos) = tables.companies.iter().position(|c| c.code == code) else {
            return Ok(None);
        };
        if company.code != code && tables.company_exists(&company.code) {
            return Err(AppError::Store(format!("duplicate company code '{}'", company.code)));
        }
        tables.companies[pos] = company.clone();
        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, code: &str) -> Result<bool, AppError> {
        let mut tables = self.write()?;
        let before = tables.companies.len();
        tables.companies.retain(|c| c.code != code);
        Ok(tables.companies.len() != before)
    }

    async fn list_invoices(&self) -> Result<Vec<Invoice>, AppError> {
        Ok(self.read()?.invoices.values().cloned().collect())
    }

    async fn invoices_for_company(&self, comp_code: &str) -> Result<Vec<Invoice>, AppError> {
        Ok(self
            .read()?
            .invoices
            .values()
            .filter(|i| i.comp_code == comp_code)
            .cloned()
            .collect())
    }

    async fn get_invoice(&self, id: i64) -> Result<Option<Invoice>, AppError> {
        Ok(self.read()?.invoices.get(&id).cloned())
    }

    async fn insert_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        let mut tables = self.write()?;
        tables.next_invoice_id += 1;
        let row = invoice.clone().into_invoice(tables.next_invoice_id);
        tables.invoices.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_invoice(&self, id: i64, invoice: &NewInvoice) -> Result<Option<Invoice>, AppError> {
        let mut tables = self.write()?;
        Ok(tables.invoices.get_mut(&id).map(|row| {
            *row = invoice.clone().into_invoice(id);
            row.clone()
        }))
    }

    async fn delete_invoice(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.write()?.invoices.remove(&id).is_some())
    }

    async fn industry_codes(&self, industry: &str) -> Result<Vec<String>, AppError> {
        Ok(self
            .read()?
            .industries
            .values()
            .filter(|i| i.industry == industry)
            .map(|i| i.code.clone())
            .collect())
    }

    async fn insert_industry(&self, industry: &NewIndustry) -> Result<IndustryCreated, AppError> {
        let mut tables = self.write()?;
        tables.next_industry_id += 1;
        let row = Industry {
            id: tables.next_industry_id,
            code: industry.code.clone(),
            industry: industry.industry.clone(),
        };
        tables.industries.insert(row.id, row.clone());
        let linked = tables.company_exists(&row.code);
        if linked {
            tables.company_industries.push(CompanyIndustry {
                company_code: row.code.clone(),
                industry_id: row.id,
            });
        }
        Ok(IndustryCreated { industry: row, linked })
    }

    async fn insert_company_industry(&self, link: &CompanyIndustry) -> Result<(), AppError> {
        self.write()?.company_industries.push(link.clone());
        Ok(())
    }

    async fn company_industries(&self, company_code: &str) -> Result<Vec<CompanyIndustry>, AppError> {
        Ok(self
            .read()?
            .company_industries
            .iter()
            .filter(|l| l.company_code == company_code)
            .cloned()
            .collect())
    }
}
